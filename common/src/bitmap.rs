//! Bounded Bitmap
//!
//! A length-bounded bit vector backed by `u64` words. Used for the
//! symbol-by-RB occupancy storage of the carrier resource grids and for
//! the per-CRB usage vectors returned to the scheduling policy. Range
//! operations work word-at-a-time so that fill and collision queries stay
//! within a handful of CPU cycles.

use serde::{Deserialize, Serialize};

const WORD_BITS: usize = 64;

/// Fixed-length bit vector over `u64` words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bitmap {
    words: Vec<u64>,
    len: usize,
}

impl Bitmap {
    /// Create an all-zero bitmap of the given bit length
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Number of bits in the bitmap
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the bitmap has zero length
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set the bit at `pos`
    pub fn set(&mut self, pos: usize) {
        assert!(pos < self.len, "bit {} out of range (len {})", pos, self.len);
        self.words[pos / WORD_BITS] |= 1u64 << (pos % WORD_BITS);
    }

    /// Test the bit at `pos`
    pub fn test(&self, pos: usize) -> bool {
        assert!(pos < self.len, "bit {} out of range (len {})", pos, self.len);
        (self.words[pos / WORD_BITS] >> (pos % WORD_BITS)) & 1 != 0
    }

    /// Reset every bit to zero. Keeps the allocation.
    pub fn reset(&mut self) {
        self.words.fill(0);
    }

    /// Set every bit in the half-open range `[start, stop)`
    pub fn set_range(&mut self, start: usize, stop: usize) {
        self.check_range(start, stop);
        if start == stop {
            return;
        }
        for w in start / WORD_BITS..=(stop - 1) / WORD_BITS {
            self.words[w] |= word_mask(w, start, stop);
        }
    }

    /// True if any bit in `[start, stop)` is set
    pub fn any_in_range(&self, start: usize, stop: usize) -> bool {
        self.check_range(start, stop);
        if start == stop {
            return false;
        }
        for w in start / WORD_BITS..=(stop - 1) / WORD_BITS {
            if self.words[w] & word_mask(w, start, stop) != 0 {
                return true;
            }
        }
        false
    }

    /// True if every bit in `[start, stop)` is set. An empty range is
    /// trivially all-set.
    pub fn all_in_range(&self, start: usize, stop: usize) -> bool {
        self.check_range(start, stop);
        if start == stop {
            return true;
        }
        for w in start / WORD_BITS..=(stop - 1) / WORD_BITS {
            let mask = word_mask(w, start, stop);
            if self.words[w] & mask != mask {
                return false;
            }
        }
        true
    }

    /// True if any bit is set
    pub fn any(&self) -> bool {
        self.words.iter().any(|&w| w != 0)
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Read 64 bits starting at an arbitrary bit position. Bits past the
    /// end of the bitmap read as zero. This is the word-level primitive
    /// behind the per-symbol fold of `used_crbs`.
    pub fn extract_word(&self, pos: usize) -> u64 {
        let w = pos / WORD_BITS;
        let b = pos % WORD_BITS;
        let mut out = self.words.get(w).copied().unwrap_or(0) >> b;
        if b != 0 {
            out |= self.words.get(w + 1).copied().unwrap_or(0) << (WORD_BITS - b);
        }
        out
    }

    /// OR 64 bits into the bitmap starting at an arbitrary bit position.
    /// `word` must not carry bits that would land past the end.
    pub fn or_word_at(&mut self, pos: usize, word: u64) {
        if word == 0 {
            return;
        }
        let highest = WORD_BITS - 1 - word.leading_zeros() as usize;
        assert!(
            pos + highest < self.len,
            "bit {} out of range (len {})",
            pos + highest,
            self.len
        );
        let w = pos / WORD_BITS;
        let b = pos % WORD_BITS;
        self.words[w] |= word << b;
        if b != 0 && w + 1 < self.words.len() {
            self.words[w + 1] |= word >> (WORD_BITS - b);
        }
    }

    fn check_range(&self, start: usize, stop: usize) {
        assert!(
            start <= stop && stop <= self.len,
            "bit range [{}, {}) out of range (len {})",
            start,
            stop,
            self.len
        );
    }
}

/// Mask of the bits of word `w` that fall inside `[start, stop)`
fn word_mask(w: usize, start: usize, stop: usize) -> u64 {
    let lo = start.max(w * WORD_BITS);
    let hi = stop.min(w * WORD_BITS + WORD_BITS);
    debug_assert!(lo < hi);
    if hi - lo == WORD_BITS {
        u64::MAX
    } else {
        ((1u64 << (hi - lo)) - 1) << (lo % WORD_BITS)
    }
}
