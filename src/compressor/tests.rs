use super::*;
use crate::wavelet::bookkeeping::band_offsets;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A smooth field with some noise on top, X fastest.
fn field(dims: &[usize], seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..product(dims))
        .map(|i| {
            let x = (i % dims[0]) as f64;
            let rest = (i / dims[0]) as f64;
            (x * 0.2).sin() * 10.0 + (rest * 0.05).cos() * 4.0 + rng.random_range(-0.5..0.5)
        })
        .collect()
}

fn reference(dims: &[usize], src: &[f64]) -> (Wavedec, Vec<f64>, Vec<usize>, usize) {
    let w = Wavedec::new("bior4.4", None).unwrap();
    let n = w.wmaxlev(dims);
    let (c, l) = w.wavedec_to_vec(src, dims, n).unwrap();
    (w, c, l, n)
}

#[test]
fn test_keeps_largest_details() {
    let dims = [256];
    let src = field(&dims, 1);
    let mut cmp = Compressor::new(&dims, "bior4.4", None).unwrap();
    let numkeep = cmp.min_compression();
    let k = numkeep + 40;

    let (dst, sigmap) = cmp.compress_to_vec(&src, k).unwrap();
    assert_eq!(sigmap.num_significant(), k);
    assert_eq!(sigmap.dims(), &[cmp.num_coefficients()]);
    assert!(sigmap.is_sorted());

    let (_, full, _, _) = reference(&dims, &src);
    for (value, &idx) in dst.iter().zip(sigmap.entries()) {
        assert_eq!(*value, full[idx]);
    }
    assert_eq!(&sigmap.entries()[..numkeep], (0..numkeep).collect::<Vec<_>>().as_slice());

    let kept_min = sigmap.entries()[numkeep..]
        .iter()
        .map(|&i| full[i].abs())
        .fold(f64::INFINITY, f64::min);
    let dropped_max = (numkeep..full.len())
        .filter(|i| !sigmap.test(*i))
        .map(|i| full[i].abs())
        .fold(0.0, f64::max);
    assert!(kept_min >= dropped_max);
}

#[test]
fn test_full_capacity_roundtrip_3d() {
    let dims = [20, 18, 16];
    let src = field(&dims, 2);
    let mut cmp = Compressor::new(&dims, "bior4.4", None).unwrap();
    let (dst, mut sigmap) = cmp.compress_to_vec(&src, cmp.num_coefficients()).unwrap();
    let out = cmp.decompress_to_vec(&dst, &mut sigmap).unwrap();
    for (a, b) in src.iter().zip(&out) {
        assert!((a - b).abs() < 1e-7);
    }
}

#[test]
fn test_decompress_inverts_masked_coefficients() {
    let dims = [40, 30];
    let src = field(&dims, 3);
    let mut cmp = Compressor::new(&dims, "bior4.4", None).unwrap();
    let (dst, mut sigmap) = cmp.compress_to_vec(&src, 150).unwrap();
    let out = cmp.decompress_to_vec(&dst, &mut sigmap).unwrap();

    let (w, mut c, l, n) = reference(&dims, &src);
    for (i, v) in c.iter_mut().enumerate() {
        if !sigmap.test(i) {
            *v = 0.0;
        }
    }
    let mut expected = vec![0.0; src.len()];
    w.waverec(&c, &l, n, &mut expected).unwrap();
    assert_eq!(out, expected);
}

#[test]
fn test_capacity_out_of_range_writes_nothing() {
    let dims = [64];
    let src = field(&dims, 4);
    let mut cmp = Compressor::new(&dims, "bior4.4", None).unwrap();
    let mut sigmap = SignificanceMap::new(&[5]).unwrap();
    sigmap.set(2).unwrap();

    let mut too_big = vec![-7.0; cmp.num_coefficients() + 1];
    assert!(matches!(
        cmp.compress(&src, &mut too_big, &mut sigmap),
        Err(WavepackError::CapacityOutOfRange { .. })
    ));
    assert!(too_big.iter().all(|&v| v == -7.0));

    let mut too_small = vec![-7.0; cmp.min_compression() - 1];
    assert!(cmp.compress(&src, &mut too_small, &mut sigmap).is_err());
    assert!(too_small.iter().all(|&v| v == -7.0));
    assert_eq!(sigmap.entries(), &[2]);
}

#[test]
fn test_decompose_matches_single_shot() {
    let dims = [48, 40];
    let src = field(&dims, 5);
    let mut cmp = Compressor::new(&dims, "bior4.4", None).unwrap();
    let k1 = cmp.min_compression() + 25;
    let k2 = 60;

    let mut parts = vec![0.0; k1 + k2];
    let mut maps = vec![SignificanceMap::default(), SignificanceMap::default()];
    cmp.decompose(&src, &mut parts, &[k1, k2], &mut maps).unwrap();
    assert_eq!(maps[0].num_significant(), k1);
    assert_eq!(maps[1].num_significant(), k2);
    assert!(maps.iter().all(|m| m.is_sorted()));

    let (single, mut sigmap) = cmp.compress_to_vec(&src, k1 + k2).unwrap();
    let mut union = maps[0].clone();
    union.append(&maps[1]).unwrap();
    union.sort();
    assert_eq!(union.entries(), sigmap.entries());

    let mut progressive = vec![0.0; src.len()];
    cmp.reconstruct(&parts, &mut progressive, &mut maps, None).unwrap();
    let direct = cmp.decompress_to_vec(&single, &mut sigmap).unwrap();
    assert_eq!(progressive, direct);
}

#[test]
fn test_first_partition_is_single_shot_prefix() {
    let dims = [128];
    let src = field(&dims, 6);
    let mut cmp = Compressor::new(&dims, "bior4.4", None).unwrap();
    let k1 = cmp.min_compression() + 10;

    let mut parts = vec![0.0; k1 + 30];
    let mut maps = vec![SignificanceMap::default(), SignificanceMap::default()];
    cmp.decompose(&src, &mut parts, &[k1, 30], &mut maps).unwrap();
    let (_, sigmap) = cmp.compress_to_vec(&src, k1).unwrap();
    assert_eq!(maps[0].entries(), sigmap.entries());
}

#[test]
fn test_reconstruct_lower_resolution() {
    let dims = [64, 64];
    let src = field(&dims, 7);
    let mut cmp = Compressor::new(&dims, "bior4.4", None).unwrap();
    assert_eq!(cmp.num_levels(), 3);
    assert_eq!(cmp.dimension(0), vec![8, 8]);
    assert_eq!(cmp.dimension(2), vec![32, 32]);
    assert_eq!(cmp.dimension(9), vec![64, 64]);

    let total = cmp.num_coefficients();
    let mut parts = vec![0.0; total];
    let mut maps = vec![SignificanceMap::default()];
    cmp.decompose(&src, &mut parts, &[total], &mut maps).unwrap();

    let mut coarse = vec![0.0; 32 * 32];
    cmp.reconstruct(&parts, &mut coarse, &mut maps, Some(2)).unwrap();

    let (w, c, l, n) = reference(&dims, &src);
    let expected = w.appcoef_to_vec(&c, &l, n, 2, true).unwrap();
    assert_eq!(coarse, expected);

    let mut small = vec![0.0; 10];
    assert!(matches!(
        cmp.reconstruct(&parts, &mut small, &mut maps, Some(2)),
        Err(WavepackError::DestinationTooSmall { required: 1024, .. })
    ));
}

#[test]
fn test_integer_blocks_are_exact() {
    let dims = [33, 17];
    let mut rng = StdRng::seed_from_u64(8);
    let src: Vec<i32> = (0..product(&dims)).map(|_| rng.random_range(-1000..1000)).collect();
    let mut cmp = Compressor::new(&dims, "intbior2.2", None).unwrap();
    let (dst, mut sigmap) = cmp.compress_to_vec(&src, cmp.num_coefficients()).unwrap();
    let out = cmp.decompress_to_vec(&dst, &mut sigmap).unwrap();
    assert_eq!(out, src);

    let floats = vec![0.0f64; src.len()];
    assert!(matches!(
        cmp.compress_to_vec(&floats, 10),
        Err(WavepackError::UnsupportedSampleType { .. })
    ));
}

#[test]
fn test_integer_overflow_fails_without_output() {
    let dims = [64];
    let src: Vec<i32> = (0..64).map(|i| if i % 2 == 0 { -1_500_000_000 } else { 1_500_000_000 }).collect();
    let mut cmp = Compressor::new(&dims, "intbior2.2", None).unwrap();
    let capacity = cmp.num_coefficients();
    let mut dst = vec![3i32; capacity];
    let mut sigmap = SignificanceMap::new(&[4]).unwrap();
    sigmap.set(2).unwrap();
    assert!(matches!(
        cmp.compress(&src, &mut dst, &mut sigmap),
        Err(WavepackError::CoefficientOverflow { .. })
    ));
    assert!(dst.iter().all(|&v| v == 3));
    assert_eq!(sigmap.dims(), &[4]);
    assert_eq!(sigmap.num_significant(), 1);

    let mut parts = vec![SignificanceMap::default(), SignificanceMap::default()];
    let lens = [cmp.min_compression(), capacity - cmp.min_compression()];
    assert!(matches!(
        cmp.decompose(&src, &mut dst, &lens, &mut parts),
        Err(WavepackError::CoefficientOverflow { .. })
    ));
    assert!(dst.iter().all(|&v| v == 3));

    // The same block is exact when carried as i64.
    let wide: Vec<i64> = src.iter().map(|&v| v as i64).collect();
    let (coeffs, mut map) = cmp.compress_to_vec(&wide, capacity).unwrap();
    assert_eq!(cmp.decompress_to_vec(&coeffs, &mut map).unwrap(), wide);
}

#[test]
fn test_without_approximation_band() {
    let dims = [64];
    let src = field(&dims, 9);
    let mut cmp = Compressor::new(&dims, "db2", None).unwrap();
    cmp.set_keep_approx(false);
    assert_eq!(cmp.min_compression(), 1);
    let (_, sigmap) = cmp.compress_to_vec(&src, 1).unwrap();
    assert_eq!(sigmap.num_significant(), 1);
}

#[test]
fn test_filters_on_reconstruction() {
    let dims = [64];
    let src = field(&dims, 10);
    let mut cmp = Compressor::new(&dims, "bior4.4", None).unwrap();
    let (dst, mut sigmap) = cmp.compress_to_vec(&src, 30).unwrap();

    cmp.set_clamp_min(Some(-1.0));
    cmp.set_clamp_max(Some(1.0));
    let clamped = cmp.decompress_to_vec(&dst, &mut sigmap).unwrap();
    assert!(clamped.iter().all(|v| (-1.0..=1.0).contains(v)));

    cmp.set_clamp_min(None);
    cmp.set_clamp_max(None);
    cmp.set_epsilon(Some(-1e9));
    let flushed = cmp.decompress_to_vec(&dst, &mut sigmap).unwrap();
    assert!(flushed.iter().all(|&v| v == 0.0));

    // Only decompress applies epsilon.
    let mut out = vec![0.0; 64];
    cmp.reconstruct(&dst, &mut out, std::slice::from_mut(&mut sigmap), None)
        .unwrap();
    assert!(out.iter().any(|&v| v != 0.0));
}

#[test]
fn test_map_shape_and_length_checks() {
    let dims = [32];
    let src = field(&dims, 11);
    let mut cmp = Compressor::new(&dims, "haar", None).unwrap();
    let (dst, mut sigmap) = cmp.compress_to_vec(&src, 8).unwrap();

    let mut wrong = SignificanceMap::new(&[7]).unwrap();
    assert!(matches!(
        cmp.decompress_to_vec(&dst, &mut wrong),
        Err(WavepackError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        cmp.decompress_to_vec(&dst[..4], &mut sigmap),
        Err(WavepackError::LengthMismatch { expected: 8, actual: 4 })
    ));
    let mut no_maps: Vec<SignificanceMap> = Vec::new();
    let mut parts = vec![0.0; 8];
    assert!(matches!(
        cmp.decompose(&src, &mut parts, &[], &mut no_maps),
        Err(WavepackError::InvalidArgument(_))
    ));
}

#[test]
fn test_compression_info() {
    let info = Compressor::compression_info(&[64, 64], "bior4.4", true).unwrap();
    assert_eq!(
        info,
        CompressionInfo {
            nlevels: 3,
            num_lods: 4,
            max_ratio: 64
        }
    );
    let info = Compressor::compression_info(&[64, 64], "bior4.4", false).unwrap();
    assert_eq!(info.max_ratio, 4096);
    assert!(Compressor::compression_info(&[64], "nope", true).is_err());
}

#[test]
fn test_from_config_and_display() {
    let config = CompressorConfig::from_json(r#"{"wavelet": "db3", "mode": "per", "epsilon": 0.5}"#).unwrap();
    let cmp = Compressor::from_config(&[100, 20], &config).unwrap();
    assert_eq!(cmp.wavelet(), "db3");
    assert_eq!(cmp.mode(), BoundaryMode::Per);
    assert_eq!(cmp.epsilon(), Some(0.5));
    assert!(cmp.keep_approx());

    let text = cmp.to_string();
    assert!(text.contains("dims: [100, 20]"));
    assert!(text.contains("wavelet: db3 (per)"));
}

#[test]
fn test_reshape_rebinds_bookkeeping() {
    let mut cmp = Compressor::new(&[64], "haar", Some("per")).unwrap();
    assert_eq!(cmp.bookkeeping().len(), 6 + 2);
    cmp.reshape(&[16, 8]).unwrap();
    assert_eq!(cmp.num_levels(), 3);
    assert_eq!(cmp.num_coefficients(), 128);
    assert_eq!(band_offsets(cmp.bookkeeping(), 2).len(), 1 + 3 * 3);
    assert!(cmp.reshape(&[2, 2, 2, 2]).is_err());
}
