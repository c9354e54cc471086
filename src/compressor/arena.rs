// In: src/compressor/arena.rs

//! An owned, reusable coefficient buffer.
//!
//! The arena stores `u64` words and hands out typed views of any `Sample` type, so one
//! allocation serves a compressor that is driven with `f32` blocks on one call and
//! `i64` blocks on the next. Every sample type is at most 8 bytes wide and no more
//! strictly aligned than `u64`.

use crate::error::WavepackError;
use crate::traits::Sample;

const WORD: usize = std::mem::size_of::<u64>();

#[derive(Debug, Default, Clone)]
pub struct ScratchArena {
    words: Vec<u64>,
}

impl ScratchArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures room for `bytes` bytes without reallocating on the next view.
    pub fn reserve(&mut self, bytes: usize) {
        let words = bytes.div_ceil(WORD);
        if words > self.words.len() {
            self.words.resize(words, 0);
        }
    }

    /// Shrinks or grows the backing store to exactly `bytes` (rounded up to a word).
    pub fn resize(&mut self, bytes: usize) {
        self.words.resize(bytes.div_ceil(WORD), 0);
        self.words.shrink_to_fit();
    }

    pub fn capacity_bytes(&self) -> usize {
        self.words.len() * WORD
    }

    /// A view of the first `len` samples of type `T`, growing the arena if needed.
    /// The contents are whatever the previous call left behind.
    pub fn view_mut<T: Sample>(&mut self, len: usize) -> Result<&mut [T], WavepackError> {
        let bytes = len * T::SAMPLE_TYPE.byte_width();
        self.reserve(bytes);
        let all: &mut [T] = bytemuck::try_cast_slice_mut(&mut self.words[..])?;
        Ok(&mut all[..len])
    }

    /// Like `view_mut`, but zero-filled.
    pub fn zeroed_mut<T: Sample>(&mut self, len: usize) -> Result<&mut [T], WavepackError> {
        let view = self.view_mut::<T>(len)?;
        view.fill(T::zero());
        Ok(view)
    }
}
