//! Fixed-length packed bit vectors.
//!
//! Bits live in `u64` words, least significant bit first. Every array
//! allocates one word of slack past its last bit so streaming cursors can
//! always load the word after the current one. Bits at or beyond `len()` read
//! as zero no matter what the slack holds.

mod indexed;
mod stream;

pub use collective::Word;
pub use indexed::{Builder, FastBitArray, DEFAULT_CHECKPOINT_LOG2};
pub use stream::{Reader, Writer};

pub(crate) const LOG_W: usize = 6;
pub(crate) const BIT_W: usize = 1 << LOG_W;
pub(crate) const ONES: Word = !0;

/// Word with the low `n` bits set.
#[inline(always)]
pub(crate) fn low_mask(n: usize) -> Word {
    if n >= BIT_W {
        ONES
    } else {
        (1 << n) - 1
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitArray {
    len: usize,
    words: Vec<Word>,
}

impl BitArray {
    /// All-zero array of `len` bits.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            words: vec![0; (len + BIT_W) >> LOG_W],
        }
    }

    pub fn from_bools(values: &[bool]) -> Self {
        let mut bits = BitArray::new(values.len());
        {
            let mut w = Writer::new(&mut bits, 0);
            for &v in values {
                w.write(1, v as Word);
            }
        }
        bits
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of words holding the array's bits, slack excluded.
    #[inline(always)]
    pub fn word_count(&self) -> usize {
        (self.len + BIT_W - 1) >> LOG_W
    }

    pub fn words(&self) -> &[Word] {
        &self.words[..self.word_count()]
    }

    /// Raw packed words, the buffer handed to collective reductions.
    pub fn words_mut(&mut self) -> &mut [Word] {
        let n = self.word_count();
        &mut self.words[..n]
    }

    /// Word `iw` with everything at or past `len()` cleared.
    #[inline(always)]
    pub(crate) fn word_or_zero(&self, iw: usize) -> Word {
        let base = iw << LOG_W;
        if base >= self.len {
            return 0;
        }
        let rem = self.len - base;
        if rem >= BIT_W {
            self.words[iw]
        } else {
            self.words[iw] & low_mask(rem)
        }
    }

    #[inline(always)]
    pub fn get(&self, ix: usize) -> bool {
        ix < self.len && (self.words[ix >> LOG_W] >> (ix & (BIT_W - 1))) & 1 == 1
    }

    /// Sets bit `ix`, returning whether it changed.
    ///
    /// # Panics
    /// If `ix >= len()`.
    pub fn set(&mut self, ix: usize, value: bool) -> bool {
        assert!(
            ix < self.len,
            "bit index {} out of range for length {}",
            ix,
            self.len
        );
        let w0 = self.words[ix >> LOG_W];
        let bit = 1 << (ix & (BIT_W - 1));
        let w1 = if value { w0 | bit } else { w0 & !bit };
        self.words[ix >> LOG_W] = w1;
        w1 != w0
    }

    pub fn fill(&mut self, value: bool) {
        self.fill_range(value, 0, self.len);
    }

    /// Sets every bit of `[ix0, ix1)`, clamped to the array.
    pub fn fill_range(&mut self, value: bool, ix0: usize, ix1: usize) {
        let ix1 = ix1.min(self.len);
        if ix1 <= ix0 {
            return;
        }
        let iw0 = ix0 >> LOG_W;
        let iw1 = (ix1 - 1) >> LOG_W;
        let mut m = ONES << (ix0 & (BIT_W - 1));
        for iw in iw0..=iw1 {
            if iw == iw1 {
                m &= ONES >> (BIT_W - 1 - ((ix1 - 1) & (BIT_W - 1)));
            }
            if value {
                self.words[iw] |= m;
            } else {
                self.words[iw] &= !m;
            }
            m = ONES;
        }
    }

    pub fn count(&self) -> usize {
        self.count_range(0, self.len)
    }

    /// Number of set bits in `[ix0, ix1)`; the range is clamped to the array.
    pub fn count_range(&self, ix0: usize, ix1: usize) -> usize {
        let ix1 = ix1.min(self.len);
        if ix1 <= ix0 {
            return 0;
        }
        let iw0 = ix0 >> LOG_W;
        let iw1 = (ix1 - 1) >> LOG_W;
        let mut m = ONES << (ix0 & (BIT_W - 1));
        let mut pop = 0;
        for iw in iw0..=iw1 {
            if iw == iw1 {
                m &= ONES >> (BIT_W - 1 - ((ix1 - 1) & (BIT_W - 1)));
            }
            pop += (self.words[iw] & m).count_ones() as usize;
            m = ONES;
        }
        pop
    }

    /// Number of positions in `[ix0, ix1)` where `a` and `b` differ. Positions
    /// past either array's length count as zero bits of that array.
    pub fn count_xor(a: &BitArray, b: &BitArray, ix0: usize, ix1: usize) -> usize {
        let ix1 = ix1.min(a.len.max(b.len));
        if ix1 <= ix0 {
            return 0;
        }
        let iw0 = ix0 >> LOG_W;
        let iw1 = (ix1 - 1) >> LOG_W;
        let mut m = ONES << (ix0 & (BIT_W - 1));
        let mut pop = 0;
        for iw in iw0..=iw1 {
            if iw == iw1 {
                m &= ONES >> (BIT_W - 1 - ((ix1 - 1) & (BIT_W - 1)));
            }
            pop += ((a.word_or_zero(iw) ^ b.word_or_zero(iw)) & m).count_ones() as usize;
            m = ONES;
        }
        pop
    }

    /// Position of the `nth` (0-based) set bit at or after `ix0`, if any.
    pub fn try_find(&self, ix0: usize, mut nth: usize) -> Option<usize> {
        if ix0 >= self.len {
            return None;
        }
        let last = (self.len - 1) >> LOG_W;
        let mut iw = ix0 >> LOG_W;
        let mut m = ONES << (ix0 & (BIT_W - 1));
        while iw <= last {
            let mut w = self.word_or_zero(iw) & m;
            let pop = w.count_ones() as usize;
            if pop > nth {
                for _ in 0..nth {
                    w &= w - 1;
                }
                return Some((iw << LOG_W) + w.trailing_zeros() as usize);
            }
            nth -= pop;
            m = ONES;
            iw += 1;
        }
        None
    }

    /// Like [`BitArray::try_find`], for callers that know the bit exists.
    ///
    /// # Panics
    /// If fewer than `nth + 1` bits are set at or after `ix0`.
    pub fn find(&self, ix0: usize, nth: usize) -> usize {
        match self.try_find(ix0, nth) {
            Some(ix) => ix,
            None => panic!(
                "select past the last set bit (ix0 = {}, nth = {}, len = {})",
                ix0, nth, self.len
            ),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |ix| self.get(ix))
    }
}

impl FromIterator<bool> for BitArray {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let values: Vec<bool> = iter.into_iter().collect();
        BitArray::from_bools(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_count(bits: &BitArray, ix0: usize, ix1: usize) -> usize {
        (ix0..ix1).filter(|&ix| bits.get(ix)).count()
    }

    #[test]
    fn get_past_end_is_zero() {
        let mut bits = BitArray::new(70);
        bits.fill(true);
        assert!(bits.get(69));
        assert!(!bits.get(70));
        assert!(!bits.get(1_000));
        assert_eq!(bits.count(), 70);
    }

    #[test]
    fn set_reports_change() {
        let mut bits = BitArray::new(10);
        assert!(bits.set(3, true));
        assert!(!bits.set(3, true));
        assert!(bits.set(3, false));
        assert!(!bits.set(9, false));
        assert_eq!(bits.count(), 0);
    }

    #[test]
    fn count_masks_partial_words() {
        let mut bits = BitArray::new(200);
        for ix in (0..200).step_by(3) {
            bits.set(ix, true);
        }
        for &(a, b) in &[(0, 200), (1, 64), (63, 65), (64, 128), (5, 5), (9, 2), (130, 400)] {
            assert_eq!(bits.count_range(a, b), naive_count(&bits, a, b.min(200)), "[{a}, {b})");
        }
    }

    #[test]
    fn fill_range_stays_inside() {
        let mut bits = BitArray::new(150);
        bits.fill_range(true, 60, 130);
        assert_eq!(bits.count(), 70);
        assert!(!bits.get(59));
        assert!(bits.get(60));
        assert!(bits.get(129));
        assert!(!bits.get(130));
        bits.fill_range(false, 64, 128);
        assert_eq!(bits.count(), 6);
        bits.fill_range(true, 140, 10_000);
        assert_eq!(bits.count(), 16);
        assert_eq!(bits.words()[2] >> (150 - 128), 0);
    }

    #[test]
    fn count_xor_treats_missing_tail_as_zero() {
        let mut a = BitArray::new(10);
        let mut b = BitArray::new(100);
        a.set(2, true);
        b.set(2, true);
        b.set(3, true);
        b.set(90, true);
        assert_eq!(BitArray::count_xor(&a, &b, 0, 100), 2);
        assert_eq!(BitArray::count_xor(&b, &a, 0, 100), 2);
        assert_eq!(BitArray::count_xor(&a, &b, 4, 90), 0);
        assert_eq!(BitArray::count_xor(&a, &b, 50, 10), 0);
    }

    #[test]
    fn find_selects_nth_set_bit() {
        let mut bits = BitArray::new(300);
        let set = [0, 5, 63, 64, 127, 200, 299];
        for &ix in &set {
            bits.set(ix, true);
        }
        for (nth, &ix) in set.iter().enumerate() {
            assert_eq!(bits.find(0, nth), ix);
        }
        assert_eq!(bits.find(6, 0), 63);
        assert_eq!(bits.find(64, 2), 200);
        assert_eq!(bits.try_find(0, set.len()), None);
        assert_eq!(bits.try_find(300, 0), None);
    }

    #[test]
    #[should_panic(expected = "select past the last set bit")]
    fn find_past_end_panics() {
        let bits = BitArray::new(40);
        bits.find(0, 0);
    }

    #[test]
    fn from_bools_round_trip() {
        let values: Vec<bool> = (0..131).map(|i| i % 7 == 0 || i % 11 == 3).collect();
        let bits = BitArray::from_bools(&values);
        assert_eq!(bits.len(), values.len());
        assert_eq!(bits.iter().collect::<Vec<_>>(), values);
        assert_eq!(bits.word_count(), 3);
    }
}
