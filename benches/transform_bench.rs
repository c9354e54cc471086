// In benches/transform_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use wavepack::Wavedec;

// --- Mock Data Generation ---

/// A smooth field with a ripple, X fastest.
fn generate_field(dims: &[usize]) -> Vec<f64> {
    let len: usize = dims.iter().product();
    (0..len)
        .map(|i| {
            let x = (i % dims[0]) as f64;
            let rest = (i / dims[0]) as f64;
            (x * 0.05).sin() * 100.0 + (rest * 0.02).cos() * 25.0 + (i % 7) as f64
        })
        .collect()
}

fn generate_ints(len: usize) -> Vec<i32> {
    (0..len).map(|i| ((i * 37) % 1021) as i32 - 510).collect()
}

// --- Benchmark Suite ---

fn bench_wavedec_waverec(c: &mut Criterion) {
    let shapes: [&[usize]; 3] = [&[65_536], &[256, 256], &[64, 64, 64]];

    for dims in shapes {
        let len: usize = dims.iter().product();
        let mut group = c.benchmark_group(format!("Transform {dims:?}"));
        group.throughput(criterion::Throughput::Elements(len as u64));

        let signal = generate_field(dims);
        for (wavelet, mode) in [("bior4.4", "symw"), ("db4", "per")] {
            let w = Wavedec::new(wavelet, Some(mode)).unwrap();
            let n = w.wmaxlev(dims);
            let (coeffs, l) = w.wavedec_to_vec(&signal, dims, n).unwrap();
            let mut c_buf = vec![0.0; coeffs.len()];
            let mut l_buf = Vec::new();
            let mut out = vec![0.0; len];

            group.bench_function(format!("wavedec {wavelet}/{mode}"), |b| {
                b.iter(|| {
                    w.wavedec(black_box(&signal), dims, n, &mut c_buf, &mut l_buf)
                        .unwrap()
                })
            });
            group.bench_function(format!("waverec {wavelet}/{mode}"), |b| {
                b.iter(|| w.waverec(black_box(&coeffs), &l, n, &mut out).unwrap())
            });
        }

        let w = Wavedec::new("intbior2.2", None).unwrap();
        let ints = generate_ints(len);
        let n = w.wmaxlev(dims);
        let mut c_buf = vec![0i32; w.coefflength(dims, n).unwrap()];
        let mut l_buf = Vec::new();
        group.bench_function("wavedec intbior2.2 (lifting)", |b| {
            b.iter(|| w.wavedec(black_box(&ints), dims, n, &mut c_buf, &mut l_buf).unwrap())
        });

        group.finish();
    }
}

criterion_group!(benches, bench_wavedec_waverec);
criterion_main!(benches);
