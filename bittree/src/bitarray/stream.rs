use super::{low_mask, BitArray, Word, BIT_W, LOG_W};

/// Write position plus the buffered word it points into.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor {
    pub(crate) ix: usize,
    word: Word,
}

impl Cursor {
    pub(crate) fn new(words: &[Word], ix: usize) -> Self {
        Self {
            ix,
            word: words.get(ix >> LOG_W).copied().unwrap_or(0),
        }
    }

    /// Stores the low `n` bits of `x` at the cursor and advances it. Words
    /// are stored back to `words` as soon as the cursor leaves them; the word
    /// under the cursor stays buffered until [`Cursor::flush`].
    #[inline(always)]
    pub(crate) fn write(&mut self, words: &mut [Word], n: usize, x: Word) {
        debug_assert!(n > 0 && n < BIT_W);
        let x = x & low_mask(n);
        let off = self.ix & (BIT_W - 1);
        let m = low_mask(n) << off;
        self.word = (self.word & !m) | (x << off);
        if off + n >= BIT_W {
            let iw = self.ix >> LOG_W;
            words[iw] = self.word;
            self.word = words.get(iw + 1).copied().unwrap_or(0);
            let spill = off + n - BIT_W;
            if spill > 0 {
                let m = low_mask(spill);
                self.word = (self.word & !m) | (x >> (n - spill));
            }
        }
        self.ix += n;
    }

    pub(crate) fn flush(&self, words: &mut [Word]) {
        if let Some(w) = words.get_mut(self.ix >> LOG_W) {
            *w = self.word;
        }
    }
}

/// Sequential reader over a [`BitArray`]. Reading past the end yields zeros.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    bits: &'a BitArray,
    ix: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bits: &'a BitArray, ix0: usize) -> Self {
        Self { bits, ix: ix0 }
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.ix
    }

    pub fn seek(&mut self, ix: usize) {
        self.ix = ix;
    }

    /// Next `n` bits (`0 < n < 64`), first bit in the least significant place.
    #[inline(always)]
    pub fn read(&mut self, n: usize) -> Word {
        debug_assert!(n > 0 && n < BIT_W);
        let off = self.ix & (BIT_W - 1);
        let iw = self.ix >> LOG_W;
        let mut ans = self.bits.word_or_zero(iw) >> off;
        if off + n > BIT_W {
            ans |= self.bits.word_or_zero(iw + 1) << (BIT_W - off);
        }
        self.ix += n;
        ans & low_mask(n)
    }

    #[inline(always)]
    pub fn read_bit(&mut self) -> bool {
        self.read(1) != 0
    }
}

/// Sequential writer over a [`BitArray`]. Flushes on drop.
pub struct Writer<'a> {
    bits: &'a mut BitArray,
    cursor: Cursor,
}

impl<'a> Writer<'a> {
    pub fn new(bits: &'a mut BitArray, ix0: usize) -> Self {
        let cursor = Cursor::new(&bits.words, ix0);
        Self { bits, cursor }
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.cursor.ix
    }

    pub fn seek(&mut self, ix: usize) {
        self.flush();
        self.cursor = Cursor::new(&self.bits.words, ix);
    }

    /// Writes the low `n` bits of `x` (`0 < n < 64`).
    ///
    /// # Panics
    /// If the write would run past the end of the array.
    pub fn write(&mut self, n: usize, x: Word) {
        assert!(
            self.cursor.ix + n <= self.bits.len,
            "write of {} bits at {} runs past length {}",
            n,
            self.cursor.ix,
            self.bits.len
        );
        self.cursor.write(&mut self.bits.words, n, x);
    }

    pub fn flush(&mut self) {
        self.cursor.flush(&mut self.bits.words);
    }
}

impl Drop for Writer<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}
