use super::MortonTree;
use crate::error::{BittreeError, BittreeResult};
use smallvec::{smallvec, SmallVec};

impl<const D: usize> MortonTree<D> {
    /// Ids of the blocks at Morton positions `mort_min..mort_max`, in Morton
    /// order. Parents occupy the position right before their first child.
    pub fn bitid_list(&self, mort_min: usize, mort_max: usize) -> BittreeResult<Vec<usize>> {
        let blocks = self.blocks();
        if mort_min > mort_max || mort_max > blocks {
            return Err(BittreeError::InvalidMortonRange {
                min: mort_min,
                max: mort_max,
                blocks,
            });
        }

        let nk = Self::CHILDREN;
        let levs = self.levels();
        let mut out = Vec::with_capacity(mort_max - mort_min);
        // per-level position and whether the block at it has had its children walked
        let mut pos: SmallVec<[usize; 16]> = smallvec![0; levs];
        let mut children_done: SmallVec<[bool; 16]> = smallvec![false; levs];
        let mut ix = self.id0;
        let mut lev = 0;
        let mut mort = 0;

        while mort < mort_max {
            let is_par = self.block_is_parent(ix);
            if is_par && !children_done[lev] {
                if mort >= mort_min {
                    out.push(ix);
                }
                mort += 1;
                let first = nk * self.parents_before(lev, pos[lev]);
                ix = self.level_id1[lev] + first;
                lev += 1;
                pos[lev] = first;
                children_done[lev] = false;
                continue;
            }
            if !is_par {
                if mort >= mort_min {
                    out.push(ix);
                }
                mort += 1;
            }
            if lev > 0 && (pos[lev] + 1) % nk == 0 {
                // last of its siblings: back to the parent
                pos[lev] += 1;
                lev -= 1;
                children_done[lev] = true;
                ix = self.level_id0(lev) + pos[lev];
            } else if lev == 0 && ix + 1 == self.level_id1[0] {
                break;
            } else {
                pos[lev] += 1;
                ix += 1;
                children_done[lev] = false;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitarray::BitArray;

    #[test]
    fn flat_tree_lists_ids_in_order() {
        let tree = MortonTree::new([2, 3], &[true; 6]).unwrap();
        assert_eq!(tree.bitid_list(0, 6).unwrap(), vec![6, 7, 8, 9, 10, 11]);
        assert_eq!(tree.bitid_list(1, 4).unwrap(), vec![7, 8, 9]);
        assert!(tree.bitid_list(2, 2).unwrap().is_empty());
    }

    #[test]
    fn parent_comes_before_children() {
        let tree = MortonTree::new([2, 3], &[true; 6]).unwrap();
        let mut delta = BitArray::new(tree.id_upper_bound());
        delta.set(6, true);
        let tree = tree.refine(&delta).unwrap();
        assert_eq!(
            tree.bitid_list(0, 10).unwrap(),
            vec![6, 12, 13, 14, 15, 7, 8, 9, 10, 11]
        );
    }

    #[test]
    fn agrees_with_locate() {
        let tree = MortonTree::new([3, 2], &[true, true, false, true, true, true]).unwrap();
        let mut delta = BitArray::new(tree.id_upper_bound());
        delta.set(7, true);
        delta.set(9, true);
        let tree = tree.refine(&delta).unwrap();
        let mut delta = BitArray::new(tree.id_upper_bound());
        delta.set(15, true);
        delta.set(18, true);
        let tree = tree.refine(&delta).unwrap();

        let list = tree.bitid_list(0, tree.blocks()).unwrap();
        assert_eq!(list.len(), tree.blocks());
        for (mort, &id) in list.iter().enumerate() {
            assert_eq!(tree.locate(id).unwrap().mort, mort);
        }
    }

    #[test]
    fn rejects_bad_ranges() {
        let tree = MortonTree::new([2, 3], &[true; 6]).unwrap();
        assert!(tree.bitid_list(0, 7).is_err());
        assert!(tree.bitid_list(4, 3).is_err());
    }
}
