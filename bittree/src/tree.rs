//! Immutable Morton-ordered bit tree.
//!
//! One [`FastBitArray`] holds the whole tree:
//!
//! ```text
//! [ inclusion mask | level 0 | level 1 | ... | level L-2 ]
//! ```
//!
//! The inclusion mask has one bit per top-level cell in Morton order. Every
//! other bit belongs to one block and says whether it is a parent. Blocks of
//! a level are stored contiguously, children of one parent are 2^D
//! consecutive bits, and children groups follow their parents' order. Block
//! ids are bit positions, so the first id is the size of the inclusion mask.
//! The deepest level holds only leaves and stores no bits.

mod morton;
mod refine;
mod render;
mod walk;

pub use morton::{rect_coord_to_mort, rect_mort_to_coord};
pub use render::RenderKind;

use crate::bitarray::{Builder, FastBitArray, DEFAULT_CHECKPOINT_LOG2};
use crate::config::Config;
use crate::error::{BittreeError, BittreeResult};
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block<const D: usize> {
    pub id: usize,
    /// Position in depth-first order, parents before their children.
    pub mort: usize,
    pub level: usize,
    pub is_parent: bool,
    /// Coordinate in units of this block's own level.
    pub coord: [u32; D],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MortonTree<const D: usize> {
    top: [u32; D],
    id0: usize,
    /// Exclusive upper bound on the ids of each level.
    level_id1: Vec<usize>,
    bits: FastBitArray,
}

#[inline(always)]
fn coarsen(x: u32, by: usize) -> u32 {
    if by >= 32 {
        0
    } else {
        x >> by
    }
}

impl<const D: usize> MortonTree<D> {
    pub const CHILDREN: usize = 1 << D;

    const DIM_OK: () = assert!(D >= 1 && D <= 3, "bit trees are 1, 2 or 3 dimensional");

    /// Single-level tree over a `top` grid of blocks.
    ///
    /// `includes` has one entry per top-level cell in row-major order with
    /// dimension 0 varying fastest; excluded cells get no block.
    pub fn new(top: [u32; D], includes: &[bool]) -> BittreeResult<Self> {
        Self::with_checkpoint_log2(top, includes, DEFAULT_CHECKPOINT_LOG2)
    }

    pub fn with_checkpoint_log2(
        top: [u32; D],
        includes: &[bool],
        log_c: usize,
    ) -> BittreeResult<Self> {
        #[allow(clippy::let_unit_value)]
        let () = Self::DIM_OK;
        if !(Config::MIN_CHECKPOINT_LOG2..=Config::MAX_CHECKPOINT_LOG2).contains(&log_c) {
            return Err(BittreeError::InvalidConfig {
                reason: format!("checkpoint_log2 {} out of range", log_c),
            });
        }
        if top.iter().any(|&extent| extent == 0) {
            return Err(BittreeError::InvalidTopSize { top: top.to_vec() });
        }
        let pop: usize = top.iter().map(|&extent| extent as usize).product();
        if includes.len() != pop {
            return Err(BittreeError::IncludeLengthMismatch {
                expected: pop,
                found: includes.len(),
            });
        }

        let mut b = Builder::with_checkpoint_log2(pop, log_c);
        let mut id1 = pop;
        for mort in 0..pop {
            let x = rect_mort_to_coord(&top, mort);
            let ix = (0..D)
                .rev()
                .fold(0usize, |ix, d| top[d] as usize * ix + x[d] as usize);
            let include = includes[ix];
            id1 += include as usize;
            b.write_bit(include);
        }

        Ok(Self {
            top,
            id0: pop,
            level_id1: vec![id1],
            bits: b.finish(),
        })
    }

    #[inline(always)]
    pub fn levels(&self) -> usize {
        self.level_id1.len()
    }

    pub fn blocks(&self) -> usize {
        self.id_upper_bound() - self.id0
    }

    pub fn leaves(&self) -> usize {
        self.blocks() - self.bits.count_range(self.id0, self.id_upper_bound())
    }

    pub fn top_sizes(&self) -> [u32; D] {
        self.top
    }

    /// Top-level extent along `dim`, 0 past the last dimension.
    pub fn top_size(&self, dim: usize) -> u32 {
        self.top.get(dim).copied().unwrap_or(0)
    }

    /// First block id; equal to the number of top-level cells, included or not.
    #[inline(always)]
    pub fn id0(&self) -> usize {
        self.id0
    }

    #[inline(always)]
    pub fn id_upper_bound(&self) -> usize {
        self.level_id1[self.levels() - 1]
    }

    /// First id of level `lev`. `lev == levels()` gives the id upper bound.
    #[inline(always)]
    pub fn level_id0(&self, lev: usize) -> usize {
        if lev == 0 {
            self.id0
        } else {
            self.level_id1[lev - 1]
        }
    }

    #[inline(always)]
    pub fn level_id1(&self, lev: usize) -> usize {
        self.level_id1[lev]
    }

    pub fn level_ids(&self, lev: usize) -> Option<Range<usize>> {
        (lev < self.levels()).then(|| self.level_id0(lev)..self.level_id1(lev))
    }

    pub fn level_blocks(&self, lev: usize) -> usize {
        self.level_id1(lev) - self.level_id0(lev)
    }

    pub fn bits(&self) -> &FastBitArray {
        &self.bits
    }

    pub fn is_valid_id(&self, id: usize) -> bool {
        (self.id0..self.id_upper_bound()).contains(&id)
    }

    pub fn block_is_parent(&self, id: usize) -> bool {
        // Bits past the end belong to the deepest level: all leaves.
        id >= self.id0 && self.bits.get(id)
    }

    pub fn block_level(&self, id: usize) -> Option<usize> {
        self.is_valid_id(id)
            .then(|| self.level_id1.partition_point(|&id1| id1 <= id))
    }

    pub fn parent_id(&self, id: usize) -> Option<usize> {
        let lev = self.block_level(id)?;
        if lev == 0 {
            return None;
        }
        let ix = id - self.level_id0(lev);
        Some(self.parent_find(lev - 1, ix >> D))
    }

    /// Ids of the children of `id`, or None when it is a leaf.
    pub fn child_ids(&self, id: usize) -> Option<Range<usize>> {
        if !self.block_is_parent(id) {
            return None;
        }
        let lev = self.block_level(id)?;
        let first = self.level_id1(lev) + (self.parents_before(lev, id - self.level_id0(lev)) << D);
        Some(first..first + Self::CHILDREN)
    }

    /// Whether `x`, a coordinate on level `lev`, falls in an included
    /// top-level cell.
    pub fn inside(&self, lev: usize, x: &[u32; D]) -> bool {
        let mut x0 = [0u32; D];
        for d in 0..D {
            x0[d] = coarsen(x[d], lev);
            if x0[d] >= self.top[d] {
                return false;
            }
        }
        self.bits.get(rect_coord_to_mort(&self.top, &x0))
    }

    /// Parents among the first `ix` blocks of level `lev`.
    #[inline(always)]
    fn parents_before(&self, lev: usize, ix: usize) -> usize {
        if lev + 1 >= self.levels() {
            return 0;
        }
        let id0 = self.level_id0(lev);
        self.bits.count_range(id0, id0 + ix)
    }

    /// Id of the `par_ix`-th parent of level `lev`.
    #[inline(always)]
    fn parent_find(&self, lev: usize, par_ix: usize) -> usize {
        self.bits.find(self.level_id0(lev), par_ix)
    }

    /// The block covering `x` on level `lev`.
    ///
    /// When the tree is not that deep at `x`, the deepest block covering it is
    /// returned instead (with a smaller `level`). None when `x` is outside
    /// the domain or in an excluded top-level cell.
    pub fn identify(&self, lev: usize, x: &[u32; D]) -> Option<Block<D>> {
        if !self.inside(lev, x) {
            return None;
        }
        let mut target = lev;
        let mut coord = [0u32; D];
        for d in 0..D {
            coord[d] = coarsen(x[d], lev);
        }
        // index of the current block within its level
        let mut ix = self
            .bits
            .count_range(0, rect_coord_to_mort(&self.top, &coord));
        let mut mort = 0;
        let mut found = None;

        for a_lev in 0..self.levels() {
            let a_id = self.level_id0(a_lev) + ix;
            mort += ix;
            let mut child = 0;
            let is_par = a_lev + 1 < self.levels() && self.bits.get(a_id);
            if is_par && a_lev < target {
                // the parent precedes its children
                mort += 1;
                for d in 0..D {
                    let xd = coarsen(x[d], target - a_lev - 1);
                    coord[d] <<= 1;
                    if xd > coord[d] {
                        coord[d] += 1;
                        child += 1 << d;
                    }
                }
            } else if a_lev <= target {
                target = a_lev;
                found = Some((a_id, a_lev, is_par));
            }
            // below the result this counts the descendants of earlier blocks
            ix = (self.parents_before(a_lev, ix) << D) + child;
        }

        found.map(|(id, level, is_parent)| Block {
            id,
            mort,
            level,
            is_parent,
            coord,
        })
    }

    /// The block with id `id`, or None if no block has it.
    pub fn locate(&self, id: usize) -> Option<Block<D>> {
        let level = self.block_level(id)?;
        let mut coord = [0u32; D];
        let mut ix = id - self.level_id0(level);

        let mut mort = 0;
        let mut down = ix;
        for lev in level..self.levels() {
            down = self.parents_before(lev, down) << D;
            mort += down;
        }

        let mut lev = level;
        while lev > 0 {
            for d in 0..D {
                coord[d] += (((ix >> d) & 1) as u32) << (level - lev);
            }
            mort += ix + 1;
            ix = self.parent_find(lev - 1, ix >> D) - self.level_id0(lev - 1);
            lev -= 1;
        }
        mort += ix;

        // skip excluded top-level cells
        let x0 = rect_mort_to_coord(&self.top, self.bits.find(0, ix));
        for d in 0..D {
            coord[d] += x0[d] << level;
        }

        Some(Block {
            id,
            mort,
            level,
            is_parent: self.block_is_parent(id),
            coord,
        })
    }
}
