//! This module contains the fixed-width bit-packing primitives used by the
//! significance map codec.
//!
//! Values are written most-significant bit first, back to back with no padding
//! between them. The final byte is zero-padded.

use bitvec::prelude::*;

use crate::error::WavepackError;

fn check_width(width: u8) -> Result<(), WavepackError> {
    if width == 0 || width > 64 {
        return Err(WavepackError::InvalidArgument(format!(
            "bit width must be in 1..=64, got {width}"
        )));
    }
    Ok(())
}

/// Accumulates fixed-width values into a packed byte buffer.
#[derive(Debug, Default)]
pub struct BitWriter {
    bits: BitVec<u8, Msb0>,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(num_bits: usize) -> Self {
        Self {
            bits: BitVec::with_capacity(num_bits),
        }
    }

    /// Appends the low `width` bits of `value`.
    pub fn write(&mut self, value: u64, width: u8) -> Result<(), WavepackError> {
        check_width(width)?;
        if width < 64 && value >> width != 0 {
            return Err(WavepackError::InvalidArgument(format!(
                "value {value} does not fit in {width} bits"
            )));
        }
        let start = 64 - width as usize;
        self.bits
            .extend_from_bitslice(&value.view_bits::<Msb0>()[start..]);
        Ok(())
    }

    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.bits.set_uninitialized(false);
        self.bits.into_vec()
    }
}

/// Reads fixed-width values back out of a packed byte buffer.
#[derive(Debug)]
pub struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bits: bytes.view_bits::<Msb0>(),
            pos: 0,
        }
    }

    pub fn read(&mut self, width: u8) -> Result<u64, WavepackError> {
        check_width(width)?;
        let end = self.pos + width as usize;
        if end > self.bits.len() {
            return Err(WavepackError::TruncatedMap {
                required: end.div_ceil(8),
                actual: self.bits.len() / 8,
            });
        }
        let value = self.bits[self.pos..end].load_be::<u64>();
        self.pos = end;
        Ok(value)
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_layout() {
        let mut w = BitWriter::new();
        w.write(0b101, 3).unwrap();
        w.write(0b11, 2).unwrap();
        w.write(1, 1).unwrap();
        assert_eq!(w.bit_len(), 6);
        assert_eq!(w.into_bytes(), vec![0b1011_1100]);
    }

    #[test]
    fn test_roundtrip_every_width() {
        for width in 1..=64u8 {
            let max = if width == 64 { u64::MAX } else { (1u64 << width) - 1 };
            let values = [0, max, max / 3, 1 & max];
            let mut w = BitWriter::new();
            for &v in &values {
                w.write(v, width).unwrap();
            }
            let bytes = w.into_bytes();
            assert_eq!(bytes.len(), (values.len() * width as usize).div_ceil(8));
            let mut r = BitReader::new(&bytes);
            for &v in &values {
                assert_eq!(r.read(width).unwrap(), v, "width {width}");
            }
        }
    }

    #[test]
    fn test_rejects_bad_widths_and_values() {
        let mut w = BitWriter::new();
        assert!(w.write(1, 0).is_err());
        assert!(w.write(1, 65).is_err());
        assert!(w.write(8, 3).is_err());
    }

    #[test]
    fn test_reads_straddle_byte_boundaries() {
        let bytes = [0xABu8, 0xCD, 0xEF];
        let mut r = BitReader::new(&bytes);
        assert_eq!(r.read(4).unwrap(), 0xA);
        assert_eq!(r.read(12).unwrap(), 0xBCD);
        assert_eq!(r.read(3).unwrap(), 0b111);
        assert_eq!(r.read(5).unwrap(), 0b01111);
        assert_eq!(r.position(), 24);
    }

    #[test]
    fn test_read_past_end_is_truncation() {
        let bytes = [0xffu8];
        let mut r = BitReader::new(&bytes);
        assert_eq!(r.read(5).unwrap(), 0b11111);
        assert!(matches!(
            r.read(5),
            Err(WavepackError::TruncatedMap { .. })
        ));
    }
}
