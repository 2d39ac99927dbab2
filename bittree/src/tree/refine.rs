use super::MortonTree;
use crate::bitarray::{BitArray, Builder, Reader};
use crate::error::{BittreeError, BittreeResult};

impl<const D: usize> MortonTree<D> {
    /// Derives the tree obtained by toggling the parent/leaf status of every
    /// block whose bit is set in `delta`.
    ///
    /// `delta` is indexed by block id and must be exactly
    /// [`MortonTree::id_upper_bound`] bits long. Blocks that turn into parents
    /// get 2^D leaf children. Children of blocks that turn into leaves
    /// disappear, so they must be leaves themselves and carry no flip.
    pub fn refine(&self, delta: &BitArray) -> BittreeResult<Self> {
        if delta.len() != self.id_upper_bound() {
            return Err(BittreeError::DeltaLengthMismatch {
                expected: self.id_upper_bound(),
                found: delta.len(),
            });
        }
        self.check_derefines(delta)?;
        Ok(self.derive(delta))
    }

    fn check_derefines(&self, delta: &BitArray) -> BittreeResult<()> {
        let parents_end = self.bits.len().min(self.id_upper_bound());
        let mut ix = self.id0;
        while let Some(id) = delta.try_find(ix, 0).filter(|&id| id < parents_end) {
            if let Some(mut kids) = self.child_ids(id) {
                if kids.any(|k| self.block_is_parent(k) || delta.get(k)) {
                    return Err(BittreeError::InvalidDerefine { id });
                }
            }
            ix = id + 1;
        }
        Ok(())
    }

    fn derive(&self, delta: &BitArray) -> Self {
        let nk = Self::CHILDREN;
        let a_bits = self.bits.as_bit_array();

        // A level with no parents after the toggle is the new deepest level.
        let mut b_id1 = self.level_id1[0];
        let mut b_bitlen = self.id0;
        let mut b_levs = 1;
        for lev in 0..self.levels() {
            let b_pars =
                BitArray::count_xor(a_bits, delta, self.level_id0(lev), self.level_id1(lev));
            if b_pars == 0 {
                break;
            }
            b_bitlen = b_id1;
            b_id1 += b_pars << D;
            b_levs += 1;
        }

        let mut level_id1 = vec![0; b_levs];
        let mut a_r = Reader::new(a_bits, 0);
        let mut del_r = Reader::new(delta, self.id0);
        let mut b_w = Builder::with_checkpoint_log2(b_bitlen, self.bits.checkpoint_log2());

        // inclusion mask
        while a_r.index() < self.id0 {
            b_w.write_bit(a_r.read_bit());
        }

        level_id1[0] = self.level_id1[0];
        while b_w.index() < b_bitlen && a_r.index() < self.level_id1[0] {
            b_w.write(1, a_r.read(1) ^ del_r.read(1));
        }

        // a_rp/del_rp walk the parents of the blocks a_r/del_r are reading
        let mut a_rp = Reader::new(a_bits, self.id0);
        let mut del_rp = Reader::new(delta, self.id0);
        let mut lev = 1;
        while b_w.index() < b_bitlen {
            if a_rp.read_bit() {
                let still_parent = !del_rp.read_bit();
                let kids = a_r.read(nk) ^ del_r.read(nk);
                if still_parent {
                    b_w.write(nk, kids);
                }
            } else if del_rp.read_bit() {
                b_w.write(nk, 0);
            }
            if self.level_id1.get(lev - 1) == Some(&a_rp.index()) || b_w.index() == b_bitlen {
                level_id1[lev] = b_w.index();
                lev += 1;
            }
        }
        level_id1[b_levs - 1] = b_id1;

        Self {
            top: self.top,
            id0: self.id0,
            level_id1,
            bits: b_w.finish(),
        }
    }
}
