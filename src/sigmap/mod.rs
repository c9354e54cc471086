// In: src/sigmap/mod.rs

//! The significance map: the set of coefficient indices a compressed block keeps.
//!
//! A map has a fixed universe (`Π dims`) and stores indices in insertion order,
//! tracking whether they happen to be ascending. Iteration through the cursor API
//! and serialization both sort first. Serialized maps are self-describing: they
//! carry their shape and are validated against it when read back (see `format`).

use bitvec::prelude::*;
use std::fmt;

use crate::error::WavepackError;
use crate::kernels::bitstream::{BitReader, BitWriter};
use crate::utils::{product, validate_dims};

pub mod format;

use format::{bits_per_index, decode_header, encode_header, payload_len, HEADER_SIZE, MAX_MAP_DIMS};

/// Dimensionality reachable through the `*_xyzt` helpers.
pub const MAX_XYZT_DIMS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignificanceMap {
    dims: Vec<usize>,
    universe_size: usize,
    bits_per_index: u8,
    entries: Vec<usize>,
    sorted: bool,
    cursor: usize,
}

impl Default for SignificanceMap {
    fn default() -> Self {
        Self {
            dims: vec![1],
            universe_size: 1,
            bits_per_index: 1,
            entries: Vec::new(),
            sorted: true,
            cursor: 0,
        }
    }
}

impl SignificanceMap {
    pub fn new(dims: &[usize]) -> Result<Self, WavepackError> {
        let mut map = Self::default();
        map.reshape(dims)?;
        Ok(map)
    }

    //==============================================================================
    // Shape
    //==============================================================================

    /// Sets the universe to `dims`. Entries are dropped only when the shape changes.
    pub fn reshape(&mut self, dims: &[usize]) -> Result<(), WavepackError> {
        validate_dims(dims, MAX_MAP_DIMS)?;
        if dims == self.dims.as_slice() {
            return Ok(());
        }
        let size = dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| WavepackError::InvalidArgument(format!("universe of {dims:?} overflows")))?;
        self.dims = dims.to_vec();
        self.universe_size = size;
        self.bits_per_index = bits_per_index(size);
        self.entries.clear();
        self.sorted = true;
        self.cursor = 0;
        Ok(())
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn universe_size(&self) -> usize {
        self.universe_size
    }

    pub fn bits_per_index(&self) -> u8 {
        self.bits_per_index
    }

    /// Number of stored entries.
    pub fn num_significant(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Entries in their current order.
    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    //==============================================================================
    // Membership
    //==============================================================================

    /// Adds `idx`. An index equal to the current sorted tail is ignored.
    pub fn set(&mut self, idx: usize) -> Result<(), WavepackError> {
        if idx >= self.universe_size {
            return Err(WavepackError::IndexOutOfRange {
                index: idx,
                size: self.universe_size,
            });
        }
        if let Some(&last) = self.entries.last() {
            if self.sorted && last == idx {
                return Ok(());
            }
            if idx < last {
                self.sorted = false;
            }
        }
        self.entries.push(idx);
        Ok(())
    }

    pub fn set_xyzt(&mut self, x: usize, y: usize, z: usize, t: usize) -> Result<(), WavepackError> {
        let idx = self.index_of([x, y, z, t])?;
        self.set(idx)
    }

    /// Removes every occurrence of `idx`.
    pub fn clear_index(&mut self, idx: usize) {
        self.entries.retain(|&e| e != idx);
        self.cursor = self.cursor.min(self.entries.len());
    }

    pub fn clear_xyzt(&mut self, x: usize, y: usize, z: usize, t: usize) -> Result<(), WavepackError> {
        let idx = self.index_of([x, y, z, t])?;
        self.clear_index(idx);
        Ok(())
    }

    /// Drops every entry, keeping the shape.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sorted = true;
        self.cursor = 0;
    }

    pub fn test(&self, idx: usize) -> bool {
        if self.sorted {
            self.entries.binary_search(&idx).is_ok()
        } else {
            self.entries.contains(&idx)
        }
    }

    /// Membership by coordinates; coordinates outside the shape are an error.
    pub fn test_xyzt(&self, x: usize, y: usize, z: usize, t: usize) -> Result<bool, WavepackError> {
        Ok(self.test(self.index_of([x, y, z, t])?))
    }

    pub fn sort(&mut self) {
        if !self.sorted {
            self.entries.sort_unstable();
            self.sorted = true;
        }
    }

    /// Adds every entry of `other`. An empty map adopts `other`'s shape first.
    pub fn append(&mut self, other: &SignificanceMap) -> Result<(), WavepackError> {
        if self.dims != other.dims {
            if !self.entries.is_empty() {
                return Err(WavepackError::ShapeMismatch {
                    expected: self.dims.clone(),
                    actual: other.dims.clone(),
                });
            }
            self.reshape(&other.dims)?;
        }
        for &idx in &other.entries {
            self.set(idx)?;
        }
        Ok(())
    }

    /// Replaces the entries with their complement in `[0, universe_size)`.
    pub fn invert(&mut self) {
        let mut present = bitvec![0; self.universe_size];
        for &idx in &self.entries {
            present.set(idx, true);
        }
        self.entries = present.iter_zeros().collect();
        self.sorted = true;
        self.cursor = 0;
    }

    //==============================================================================
    // Iteration
    //==============================================================================

    /// Sorts if needed and rewinds the cursor.
    pub fn next_entry_restart(&mut self) {
        self.sort();
        self.cursor = 0;
    }

    pub fn next_entry(&mut self) -> Option<usize> {
        let idx = self.entries.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(idx)
    }

    pub fn next_entry_xyzt(&mut self) -> Option<[usize; 4]> {
        self.next_entry().map(|idx| self.coords_of(idx))
    }

    /// Entry stored at insertion position `offset`.
    pub fn coordinates(&self, offset: usize) -> Result<usize, WavepackError> {
        self.entries
            .get(offset)
            .copied()
            .ok_or(WavepackError::IndexOutOfRange {
                index: offset,
                size: self.entries.len(),
            })
    }

    pub fn coordinates_xyzt(&self, offset: usize) -> Result<[usize; 4], WavepackError> {
        Ok(self.coords_of(self.coordinates(offset)?))
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    //==============================================================================
    // Serialization
    //==============================================================================

    /// Serialized size of a map over `dims` holding `count` entries.
    pub fn map_size(dims: &[usize], count: usize) -> Result<usize, WavepackError> {
        validate_dims(dims, MAX_MAP_DIMS)?;
        Ok(HEADER_SIZE + payload_len(count, bits_per_index(product(dims)))?)
    }

    /// Serialized size of a map with this shape holding `count` entries.
    pub fn map_size_for(&self, count: usize) -> Result<usize, WavepackError> {
        Self::map_size(&self.dims, count)
    }

    /// Size of the buffer `get_map` would produce for the current entries.
    pub fn encoded_len(&self) -> Result<usize, WavepackError> {
        self.map_size_for(self.entries.len())
    }

    /// Sorts the entries and serializes the map.
    pub fn get_map(&mut self) -> Result<Vec<u8>, WavepackError> {
        self.sort();
        let width = self.bits_per_index;
        let mut out = Vec::with_capacity(self.encoded_len()?);
        encode_header(self.entries.len(), &self.dims, &mut out)?;
        let mut writer = BitWriter::with_capacity(self.entries.len() * width as usize);
        for &idx in &self.entries {
            writer.write(idx as u64, width)?;
        }
        out.extend(writer.into_bytes());
        Ok(out)
    }

    /// Replaces this map with the one serialized in `bytes`.
    ///
    /// Version-1 maps carry no shape and are read against the current one. On
    /// error the map is left unchanged.
    pub fn set_map(&mut self, bytes: &[u8]) -> Result<(), WavepackError> {
        let header = decode_header(bytes)?;
        let mut target = Self::default();
        match &header.dims {
            Some(dims) => target.reshape(dims)?,
            None => {
                target.reshape(&self.dims)?;
                if header.count > target.universe_size {
                    return Err(WavepackError::CorruptHeader(format!(
                        "count {} exceeds universe size {}",
                        header.count, target.universe_size
                    )));
                }
            }
        }

        let width = target.bits_per_index;
        let start = header.payload_offset();
        let needed = payload_len(header.count, width)
            .map(|len| start + len)
            .map_err(|_| WavepackError::CorruptHeader(format!("count {} overflows", header.count)))?;
        if bytes.len() < needed {
            return Err(WavepackError::TruncatedMap {
                required: needed,
                actual: bytes.len(),
            });
        }

        let mut reader = BitReader::new(&bytes[start..needed]);
        let mut entries = Vec::with_capacity(header.count);
        for _ in 0..header.count {
            let raw = reader.read(width)?;
            if raw >= target.universe_size as u64 {
                return Err(WavepackError::CorruptIndex {
                    index: raw,
                    size: target.universe_size as u64,
                });
            }
            entries.push(raw as usize);
        }
        target.sorted = entries.windows(2).all(|w| w[0] <= w[1]);
        target.entries = entries;
        *self = target;
        Ok(())
    }

    //==============================================================================
    // Coordinates
    //==============================================================================

    fn index_of(&self, coords: [usize; 4]) -> Result<usize, WavepackError> {
        let out_of_range = || WavepackError::CoordinatesOutOfRange {
            coords: coords.to_vec(),
            dims: self.dims.clone(),
        };
        if self.dims.len() > MAX_XYZT_DIMS {
            return Err(out_of_range());
        }
        let mut idx = 0;
        let mut stride = 1;
        for (axis, &c) in coords.iter().enumerate() {
            let extent = self.dims.get(axis).copied().unwrap_or(1);
            if c >= extent {
                return Err(out_of_range());
            }
            idx += c * stride;
            stride *= extent;
        }
        Ok(idx)
    }

    fn coords_of(&self, mut idx: usize) -> [usize; 4] {
        let mut coords = [0; 4];
        for (axis, &extent) in self.dims.iter().take(MAX_XYZT_DIMS).enumerate() {
            coords[axis] = idx % extent;
            idx /= extent;
        }
        coords
    }
}

impl fmt::Display for SignificanceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dims: {:?}", self.dims)?;
        writeln!(f, "universe size: {}", self.universe_size)?;
        writeln!(f, "bits per index: {}", self.bits_per_index)?;
        writeln!(f, "sorted: {}", self.sorted)?;
        writeln!(f, "cursor: {}", self.cursor)?;
        writeln!(f, "entries ({}):", self.entries.len())?;
        for idx in &self.entries {
            writeln!(f, "  {idx}")?;
        }
        Ok(())
    }
}
