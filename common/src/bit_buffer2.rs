//! Bit-packed 2D mask.
//!
//! One bit per pixel, stored in `u64` words in LSB order. Used for edge masks,
//! flood-fill visited bitmaps and "already painted" masks where a `Vec<bool>`
//! would cost 8x the memory on large images.

/// Number of bits per storage word.
const BITS_PER_WORD: usize = 64;

/// A 2D boolean mask packed as bits, addressed by `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitBuffer2 {
    words: Vec<u64>,
    width: usize,
    height: usize,
    /// Total number of bits (width * height).
    len: usize,
}

impl BitBuffer2 {
    /// Create a new mask filled with the given value.
    #[inline]
    pub fn new_filled(width: usize, height: usize, value: bool) -> Self {
        let len = width * height;
        let num_words = len.div_ceil(BITS_PER_WORD);
        let fill = if value { !0u64 } else { 0u64 };
        let mut buffer = Self {
            words: vec![fill; num_words],
            width,
            height,
            len,
        };
        buffer.clear_tail();
        buffer
    }

    /// Create a new mask with all bits cleared.
    #[inline]
    pub fn new_default(width: usize, height: usize) -> Self {
        Self::new_filled(width, height, false)
    }

    /// Create a mask from a slice of booleans in row-major order.
    ///
    /// The slice length must equal `width * height`.
    pub fn from_slice(width: usize, height: usize, data: &[bool]) -> Self {
        let len = width * height;
        assert_eq!(
            data.len(),
            len,
            "data length {} does not match dimensions {}x{}={}",
            data.len(),
            width,
            height,
            len
        );

        let mut words = vec![0u64; len.div_ceil(BITS_PER_WORD)];
        for (i, _) in data.iter().enumerate().filter(|(_, &value)| value) {
            words[i / BITS_PER_WORD] |= 1u64 << (i % BITS_PER_WORD);
        }

        Self {
            words,
            width,
            height,
            len,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len);
        (self.words[idx / BITS_PER_WORD] >> (idx % BITS_PER_WORD)) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, idx: usize, value: bool) {
        debug_assert!(idx < self.len);
        let mask = 1u64 << (idx % BITS_PER_WORD);
        let word = &mut self.words[idx / BITS_PER_WORD];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Set the bit and return its previous value.
    ///
    /// Lets a flood fill test and mark a pixel as visited in one word access.
    #[inline]
    pub fn test_and_set(&mut self, idx: usize) -> bool {
        debug_assert!(idx < self.len);
        let mask = 1u64 << (idx % BITS_PER_WORD);
        let word = &mut self.words[idx / BITS_PER_WORD];
        let was_set = *word & mask != 0;
        *word |= mask;
        was_set
    }

    #[inline]
    pub fn get_xy(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width && y < self.height);
        self.get(y * self.width + x)
    }

    #[inline]
    pub fn set_xy(&mut self, x: usize, y: usize, value: bool) {
        debug_assert!(x < self.width && y < self.height);
        self.set(y * self.width + x, value);
    }

    /// Count the number of set bits.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Index of the first cleared bit at or after `start`, skipping full words.
    pub fn next_zero(&self, start: usize) -> Option<usize> {
        if start >= self.len {
            return None;
        }

        let mut word_idx = start / BITS_PER_WORD;
        let mut word = !self.words[word_idx] & (!0u64 << (start % BITS_PER_WORD));
        loop {
            if word != 0 {
                let idx = word_idx * BITS_PER_WORD + word.trailing_zeros() as usize;
                return (idx < self.len).then_some(idx);
            }
            word_idx += 1;
            if word_idx >= self.words.len() {
                return None;
            }
            word = !self.words[word_idx];
        }
    }

    /// Iterate over all bit values in row-major order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        (0..self.len).map(move |idx| self.get(idx))
    }

    /// Keeps the unused high bits of the last word cleared so that word-level
    /// scans and `count_ones` never see pixels outside the image.
    fn clear_tail(&mut self) {
        let tail = self.len % BITS_PER_WORD;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_filled_true_counts_only_real_pixels() {
        let buf = BitBuffer2::new_filled(10, 7, true);
        assert_eq!(buf.len(), 70);
        assert_eq!(buf.count_ones(), 70);
    }

    #[test]
    fn set_get_across_word_boundary() {
        let mut buf = BitBuffer2::new_default(64, 2);

        buf.set(63, true);
        buf.set(64, true);

        assert!(buf.get(63));
        assert!(buf.get(64));
        assert!(!buf.get(62));
        assert!(!buf.get(65));

        buf.set(63, false);
        assert!(!buf.get(63));
    }

    #[test]
    fn xy_addressing_is_row_major() {
        let mut buf = BitBuffer2::new_default(5, 4);
        buf.set_xy(3, 2, true);

        assert!(buf.get(2 * 5 + 3));
        assert!(buf.get_xy(3, 2));
        assert!(!buf.get_xy(2, 3));
    }

    #[test]
    fn test_and_set_reports_previous_value() {
        let mut buf = BitBuffer2::new_default(4, 4);

        assert!(!buf.test_and_set(5));
        assert!(buf.test_and_set(5));
        assert_eq!(buf.count_ones(), 1);
    }

    #[test]
    fn next_zero_skips_full_words() {
        let mut buf = BitBuffer2::new_filled(20, 10, true);
        buf.set(150, false);
        buf.set(199, false);

        assert_eq!(buf.next_zero(0), Some(150));
        assert_eq!(buf.next_zero(150), Some(150));
        assert_eq!(buf.next_zero(151), Some(199));
        assert_eq!(buf.next_zero(200), None);
    }

    #[test]
    fn next_zero_ignores_tail_padding() {
        let buf = BitBuffer2::new_filled(3, 3, true);
        assert_eq!(buf.next_zero(0), None);
    }

    #[test]
    fn from_slice_matches_iter() {
        let data = vec![true, false, true, false, false, true];
        let buf = BitBuffer2::from_slice(3, 2, &data);

        assert_eq!(buf.iter().collect::<Vec<_>>(), data);
    }

    #[test]
    #[should_panic(expected = "data length")]
    fn from_slice_wrong_length() {
        BitBuffer2::from_slice(2, 2, &[true, false, true]);
    }
}
