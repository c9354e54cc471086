// In: src/sigmap/format.rs

//! Defines the on-disk layout of a serialized significance map.
//!
//! ```text
//! [0..3)   magic "ccc"
//! [3]      version byte
//! [4..)    u64 little-endian fields: count, ndims, dims[0..ndims)
//!          zero-padded to HEADER_SIZE
//! [64..)   `count` indices, each `bits_per_index` wide, MSB first, ascending
//! ```
//!
//! Version 1 maps carry a 16-byte header holding only the count; their shape is
//! supplied by the reader.

use crate::error::WavepackError;

//==================================================================================
// I. Constants
//==================================================================================

/// The magic number at the start of every serialized map.
pub const MAP_MAGIC: &[u8; 3] = b"ccc";
/// The version written by this crate.
pub const MAP_FORMAT_VERSION: u8 = 2;
/// The version-1 (shape-less) layout, still readable.
pub const LEGACY_FORMAT_VERSION: u8 = 1;

/// Size of the version-2 header in bytes.
pub const HEADER_SIZE: usize = 64;
/// Size of the version-1 header in bytes.
pub const LEGACY_HEADER_SIZE: usize = 16;

/// Most dims a version-2 header can describe.
pub const MAX_MAP_DIMS: usize = 5;

const FIELDS_START: usize = 4;
const FIELD_SIZE: usize = 8;

//==================================================================================
// II. Header Codec
//==================================================================================

/// A decoded map header. `dims` is `None` for version-1 maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHeader {
    pub version: u8,
    pub count: usize,
    pub dims: Option<Vec<usize>>,
}

impl MapHeader {
    /// Where the packed indices begin.
    pub fn payload_offset(&self) -> usize {
        if self.version == LEGACY_FORMAT_VERSION {
            LEGACY_HEADER_SIZE
        } else {
            HEADER_SIZE
        }
    }
}

/// Width in bits of one stored index for a universe of `size` entries.
pub fn bits_per_index(size: usize) -> u8 {
    let bits = usize::BITS - size.saturating_sub(1).leading_zeros();
    bits.max(1) as u8
}

/// Bytes needed for `count` packed indices of `bits` bits each.
pub fn payload_len(count: usize, bits: u8) -> Result<usize, WavepackError> {
    count
        .checked_mul(bits as usize)
        .map(|total| total.div_ceil(8))
        .ok_or_else(|| {
            WavepackError::InvalidArgument(format!("{count} indices of {bits} bits overflow the map size"))
        })
}

/// Appends a version-2 header for `count` entries over `dims` to `out`.
pub fn encode_header(count: usize, dims: &[usize], out: &mut Vec<u8>) -> Result<(), WavepackError> {
    if dims.is_empty() || dims.len() > MAX_MAP_DIMS {
        return Err(WavepackError::InvalidShape {
            dims: dims.to_vec(),
            max_dims: MAX_MAP_DIMS,
        });
    }
    let start = out.len();
    out.extend_from_slice(MAP_MAGIC);
    out.push(MAP_FORMAT_VERSION);
    out.extend_from_slice(&(count as u64).to_le_bytes());
    out.extend_from_slice(&(dims.len() as u64).to_le_bytes());
    for &d in dims {
        out.extend_from_slice(&(d as u64).to_le_bytes());
    }
    out.resize(start + HEADER_SIZE, 0);
    Ok(())
}

fn read_field(bytes: &[u8], index: usize) -> Result<u64, WavepackError> {
    let at = FIELDS_START + index * FIELD_SIZE;
    let field: [u8; FIELD_SIZE] = bytes
        .get(at..at + FIELD_SIZE)
        .and_then(|s| s.try_into().ok())
        .ok_or(WavepackError::TruncatedMap {
            required: at + FIELD_SIZE,
            actual: bytes.len(),
        })?;
    Ok(u64::from_le_bytes(field))
}

fn to_usize(value: u64, what: &str) -> Result<usize, WavepackError> {
    usize::try_from(value).map_err(|_| WavepackError::CorruptHeader(format!("{what} {value} overflows")))
}

/// Parses and validates the header at the start of `bytes`.
pub fn decode_header(bytes: &[u8]) -> Result<MapHeader, WavepackError> {
    if bytes.len() < FIELDS_START {
        return Err(WavepackError::TruncatedMap {
            required: FIELDS_START,
            actual: bytes.len(),
        });
    }
    if &bytes[..3] != MAP_MAGIC {
        return Err(WavepackError::BadMagic);
    }
    let version = bytes[3];
    match version {
        LEGACY_FORMAT_VERSION => {
            if bytes.len() < LEGACY_HEADER_SIZE {
                return Err(WavepackError::TruncatedMap {
                    required: LEGACY_HEADER_SIZE,
                    actual: bytes.len(),
                });
            }
            let count = to_usize(read_field(bytes, 0)?, "count")?;
            Ok(MapHeader {
                version,
                count,
                dims: None,
            })
        }
        MAP_FORMAT_VERSION => {
            if bytes.len() < HEADER_SIZE {
                return Err(WavepackError::TruncatedMap {
                    required: HEADER_SIZE,
                    actual: bytes.len(),
                });
            }
            let count = to_usize(read_field(bytes, 0)?, "count")?;
            let ndims = to_usize(read_field(bytes, 1)?, "ndims")?;
            if ndims == 0 || ndims > MAX_MAP_DIMS {
                return Err(WavepackError::CorruptHeader(format!(
                    "ndims {ndims} outside 1..={MAX_MAP_DIMS}"
                )));
            }
            let mut dims = Vec::with_capacity(ndims);
            let mut size = 1usize;
            for i in 0..ndims {
                let d = to_usize(read_field(bytes, 2 + i)?, "dim")?;
                if d == 0 {
                    return Err(WavepackError::CorruptHeader(format!("dim {i} is zero")));
                }
                size = size
                    .checked_mul(d)
                    .ok_or_else(|| WavepackError::CorruptHeader("universe size overflows".to_string()))?;
                dims.push(d);
            }
            Ok(MapHeader {
                version,
                count,
                dims: Some(dims),
            })
        }
        other => Err(WavepackError::UnsupportedVersion(other)),
    }
}

//==================================================================================
// III. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_per_index() {
        assert_eq!(bits_per_index(1), 1);
        assert_eq!(bits_per_index(2), 1);
        assert_eq!(bits_per_index(3), 2);
        assert_eq!(bits_per_index(16), 4);
        assert_eq!(bits_per_index(17), 5);
        assert_eq!(bits_per_index(1 << 20), 20);
    }

    #[test]
    fn test_payload_len() {
        assert_eq!(payload_len(0, 4).unwrap(), 0);
        assert_eq!(payload_len(3, 4).unwrap(), 2);
        assert_eq!(payload_len(8, 35).unwrap(), 35);
        assert!(matches!(
            payload_len(usize::MAX, 4),
            Err(WavepackError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_header_layout_is_little_endian() {
        let mut out = Vec::new();
        encode_header(3, &[16, 2], &mut out).unwrap();
        assert_eq!(out.len(), HEADER_SIZE);
        assert_eq!(&out[..4], b"ccc\x02");
        assert_eq!(&out[4..12], &[3, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&out[12..20], &[2, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&out[20..28], &[16, 0, 0, 0, 0, 0, 0, 0]);
        assert!(out[36..].iter().all(|&b| b == 0));

        let header = decode_header(&out).unwrap();
        assert_eq!(header.count, 3);
        assert_eq!(header.dims, Some(vec![16, 2]));
        assert_eq!(header.payload_offset(), HEADER_SIZE);
    }

    #[test]
    fn test_legacy_header() {
        let mut bytes = vec![0u8; LEGACY_HEADER_SIZE];
        bytes[..4].copy_from_slice(b"ccc\x01");
        bytes[4] = 9;
        let header = decode_header(&bytes).unwrap();
        assert_eq!(header.count, 9);
        assert_eq!(header.dims, None);
        assert_eq!(header.payload_offset(), LEGACY_HEADER_SIZE);
    }

    #[test]
    fn test_corrupt_headers() {
        assert!(matches!(decode_header(b"cc"), Err(WavepackError::TruncatedMap { .. })));
        assert!(matches!(decode_header(b"abc\x02"), Err(WavepackError::BadMagic)));
        assert!(matches!(
            decode_header(b"ccc\x03"),
            Err(WavepackError::UnsupportedVersion(3))
        ));

        let mut out = Vec::new();
        encode_header(0, &[4], &mut out).unwrap();
        assert!(matches!(
            decode_header(&out[..40]),
            Err(WavepackError::TruncatedMap { .. })
        ));

        let mut zero_dim = out.clone();
        zero_dim[20] = 0;
        assert!(matches!(decode_header(&zero_dim), Err(WavepackError::CorruptHeader(_))));

        let mut many_dims = out.clone();
        many_dims[12] = 6;
        assert!(matches!(decode_header(&many_dims), Err(WavepackError::CorruptHeader(_))));
    }

    #[test]
    fn test_encode_rejects_oversized_shape() {
        let mut out = Vec::new();
        assert!(encode_header(0, &[1; 6], &mut out).is_err());
        assert!(out.is_empty());
    }
}
