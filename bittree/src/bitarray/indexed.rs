use super::stream::{Cursor, Reader};
use super::{low_mask, BitArray, Word};

/// Checkpoint interval used when none is configured: one every 512 bits.
pub const DEFAULT_CHECKPOINT_LOG2: usize = 9;

/// A [`BitArray`] with cumulative popcounts cached every `2^log_c` bits.
///
/// `checks[i]` holds the number of set bits in `[0, (i + 1) << log_c)`. The
/// table is derived from the bits while they are written and is never touched
/// afterwards, so the only way to get one is through a [`Builder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FastBitArray {
    bits: BitArray,
    log_c: usize,
    checks: Vec<usize>,
}

impl FastBitArray {
    /// Indexes an existing array by streaming it through a builder.
    pub fn from_bit_array(bits: &BitArray, log_c: usize) -> Self {
        let mut b = Builder::with_checkpoint_log2(bits.len(), log_c);
        let mut r = Reader::new(bits, 0);
        while r.index() + 8 <= bits.len() {
            b.write(8, r.read(8));
        }
        while r.index() < bits.len() {
            b.write(1, r.read(1));
        }
        b.finish()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline(always)]
    pub fn get(&self, ix: usize) -> bool {
        self.bits.get(ix)
    }

    pub fn as_bit_array(&self) -> &BitArray {
        &self.bits
    }

    pub fn checkpoint_log2(&self) -> usize {
        self.log_c
    }

    /// Set bits in `[0, chunk << log_c)`.
    #[inline(always)]
    fn cumulative(&self, chunk: usize) -> usize {
        if chunk == 0 {
            0
        } else {
            self.checks[chunk - 1]
        }
    }

    pub fn count(&self) -> usize {
        self.count_range(0, self.len())
    }

    /// Same result as [`BitArray::count_range`]; whole chunks come from the
    /// checkpoint table.
    pub fn count_range(&self, ix0: usize, ix1: usize) -> usize {
        let ix1 = ix1.min(self.len());
        if ix1 <= ix0 {
            return 0;
        }
        let log_c = self.log_c;
        if ix1 >> log_c > ix0 >> log_c {
            let bitc = 1usize << log_c;
            let up = (ix0 + bitc - 1) & !(bitc - 1);
            let down = ix1 & !(bitc - 1);
            self.bits.count_range(ix0, up)
                + (self.cumulative(down >> log_c) - self.cumulative(up >> log_c))
                + self.bits.count_range(down, ix1)
        } else {
            self.bits.count_range(ix0, ix1)
        }
    }

    /// Same result as [`BitArray::try_find`]: binary search over the
    /// checkpoints for the chunk holding the target bit, then a linear scan.
    pub fn try_find(&self, ix0: usize, nth: usize) -> Option<usize> {
        let bitc = 1usize << self.log_c;
        let first = (ix0 + bitc - 1) >> self.log_c;
        if first > self.checks.len() {
            return self.bits.try_find(ix0, nth);
        }
        let target = self.count_range(0, ix0) + nth;
        let chunk = self.checks.partition_point(|&pop| pop <= target);
        if chunk < first {
            self.bits.try_find(ix0, nth)
        } else {
            self.bits
                .try_find(chunk << self.log_c, target - self.cumulative(chunk))
        }
    }

    /// # Panics
    /// If fewer than `nth + 1` bits are set at or after `ix0`.
    pub fn find(&self, ix0: usize, nth: usize) -> usize {
        match self.try_find(ix0, nth) {
            Some(ix) => ix,
            None => panic!(
                "select past the last set bit (ix0 = {}, nth = {}, len = {})",
                ix0,
                nth,
                self.len()
            ),
        }
    }
}

/// Forward-only writer producing a [`FastBitArray`].
///
/// Bits are appended 1 to 8 at a time; checkpoints are recorded as the write
/// position crosses each chunk boundary. The array is only reachable through
/// [`Builder::finish`], which flushes the buffered word.
pub struct Builder {
    bits: BitArray,
    cursor: Cursor,
    log_c: usize,
    pop: usize,
    checks: Vec<usize>,
}

impl Builder {
    pub fn new(len: usize) -> Self {
        Self::with_checkpoint_log2(len, DEFAULT_CHECKPOINT_LOG2)
    }

    /// # Panics
    /// If `log_c < 3`: a write must not span more than one checkpoint.
    pub fn with_checkpoint_log2(len: usize, log_c: usize) -> Self {
        assert!(log_c >= 3, "checkpoint interval of 2^{} bits is below one byte", log_c);
        let bits = BitArray::new(len);
        let cursor = Cursor::new(&bits.words, 0);
        Self {
            bits,
            cursor,
            log_c,
            pop: 0,
            checks: Vec::with_capacity(len >> log_c),
        }
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.cursor.ix
    }

    #[inline(always)]
    pub fn write_bit(&mut self, x: bool) {
        self.write(1, x as Word);
    }

    /// Appends the low `n` bits of `x`.
    ///
    /// # Panics
    /// If the write would run past the declared length.
    pub fn write(&mut self, n: usize, x: Word) {
        let ix = self.cursor.ix;
        assert!(
            ix + n <= self.bits.len,
            "write of {} bits at {} runs past length {}",
            n,
            ix,
            self.bits.len
        );
        let x = x & low_mask(n);
        let bitc = 1usize << self.log_c;
        debug_assert!(n <= bitc);
        let into = ix & (bitc - 1);
        if into + n >= bitc {
            let before = bitc - into;
            self.checks
                .push(self.pop + (x & low_mask(before)).count_ones() as usize);
        }
        self.pop += x.count_ones() as usize;
        self.cursor.write(&mut self.bits.words, n, x);
    }

    pub fn finish(mut self) -> FastBitArray {
        self.cursor.flush(&mut self.bits.words);
        // Chunks never written to are all zeros.
        let full = self.bits.len >> self.log_c;
        while self.checks.len() < full {
            self.checks.push(self.pop);
        }
        FastBitArray {
            bits: self.bits,
            log_c: self.log_c,
            checks: self.checks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoints_hold_cumulative_counts() {
        let mut b = Builder::with_checkpoint_log2(40, 3);
        for _ in 0..5 {
            b.write(8, 0b1000_0011);
        }
        let fast = b.finish();
        assert_eq!(fast.checks, vec![3, 6, 9, 12, 15]);
        assert_eq!(fast.count(), 15);
    }

    #[test]
    fn checkpoint_inside_a_multi_bit_write() {
        let mut b = Builder::with_checkpoint_log2(16, 3);
        b.write(4, 0b1111);
        b.write(8, 0b1111_0011);
        b.write(4, 0);
        let fast = b.finish();
        assert_eq!(fast.checks, vec![6, 10]);
    }

    #[test]
    fn unfinished_tail_is_padded() {
        let mut b = Builder::with_checkpoint_log2(64, 3);
        b.write(2, 0b11);
        let fast = b.finish();
        assert_eq!(fast.checks, vec![2; 8]);
        assert_eq!(fast.count_range(1, 64), 1);
    }

    #[test]
    fn find_uses_checkpoints() {
        let mut bits = BitArray::new(4096);
        for ix in (0..4096).step_by(37) {
            bits.set(ix, true);
        }
        let fast = FastBitArray::from_bit_array(&bits, 6);
        for ix0 in [0, 1, 100, 511, 512, 3000] {
            for nth in [0, 1, 5, 30] {
                assert_eq!(fast.try_find(ix0, nth), bits.try_find(ix0, nth));
            }
        }
        assert_eq!(fast.try_find(4095, 0), None);
    }
}
