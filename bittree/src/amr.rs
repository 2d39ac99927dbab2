//! Refinement controller around a committed [`MortonTree`].
//!
//! A refine transaction runs `refine_init`, any number of `refine_mark`,
//! optionally `refine_reduce`/`refine_reduce_and` to merge the marks of every
//! rank, `refine_update` to derive the proposed tree and `refine_apply` to
//! commit it. Queries take an `updated` flag: `true` reads the proposed tree
//! during a transaction (deriving it first when marks made it stale) and the
//! committed tree otherwise.

use crate::bitarray::BitArray;
use crate::config::Config;
use crate::error::{BittreeError, BittreeResult};
use crate::tree::{Block, MortonTree, RenderKind};
use collective::{Communicator, ReduceOp};
use log::{debug, error, warn};
use std::cell::RefCell;
use std::fmt::Write;
use std::ops::Range;
use std::sync::Arc;

struct Transaction<const D: usize> {
    delta: BitArray,
    proposed: Option<Arc<MortonTree<D>>>,
    reduced: bool,
}

struct MeshInner<const D: usize> {
    config: Config,
    tree: Arc<MortonTree<D>>,
    refine: Option<Transaction<D>>,
}

pub struct AmrMesh<const D: usize> {
    inner: RefCell<MeshInner<D>>,
}

impl<const D: usize> MeshInner<D> {
    fn update(&mut self) -> BittreeResult<()> {
        let Some(tx) = self.refine.as_mut() else {
            warn!("refine_update outside a refine transaction; ignored");
            return Ok(());
        };
        if !tx.reduced && self.config.warn_unreduced_update {
            warn!("updating the bit tree before reducing the refine delta");
        }
        let proposed = self.tree.refine(&tx.delta)?;
        debug!(
            "proposed tree: {} levels, {} blocks, {} leaves",
            proposed.levels(),
            proposed.blocks(),
            proposed.leaves()
        );
        tx.proposed = Some(Arc::new(proposed));
        Ok(())
    }

    fn tree(&mut self, updated: bool) -> Arc<MortonTree<D>> {
        if !updated || self.refine.is_none() {
            return Arc::clone(&self.tree);
        }
        if let Some(proposed) = self.refine.as_ref().and_then(|tx| tx.proposed.as_ref()) {
            return Arc::clone(proposed);
        }
        if let Err(err) = self.update() {
            error!("serving the committed tree, the proposed one is invalid: {err}");
        }
        match self.refine.as_ref().and_then(|tx| tx.proposed.as_ref()) {
            Some(proposed) => Arc::clone(proposed),
            None => Arc::clone(&self.tree),
        }
    }

    fn reduce(&mut self, comm: &impl Communicator, op: ReduceOp) -> BittreeResult<()> {
        let Some(tx) = self.refine.as_mut() else {
            warn!("refine reduction outside a refine transaction; ignored");
            return Ok(());
        };
        comm.all_reduce(tx.delta.words_mut(), op)?;
        debug!(
            "rank {}/{}: delta reduced ({:?}), {} marks",
            comm.rank(),
            comm.size(),
            op,
            tx.delta.count()
        );
        tx.reduced = true;
        tx.proposed = None;
        Ok(())
    }
}

impl<const D: usize> AmrMesh<D> {
    pub fn new(top: [u32; D], includes: &[bool]) -> BittreeResult<Self> {
        Self::new_with_config(top, includes, Config::default())
    }

    pub fn new_with_config(top: [u32; D], includes: &[bool], config: Config) -> BittreeResult<Self> {
        config.validate()?;
        let tree = MortonTree::with_checkpoint_log2(top, includes, config.checkpoint_log2)?;
        debug!("bit tree over {:?}: {} top-level blocks", top, tree.blocks());
        Ok(Self {
            inner: RefCell::new(MeshInner {
                config,
                tree: Arc::new(tree),
                refine: None,
            }),
        })
    }

    pub fn config(&self) -> Config {
        self.inner.borrow().config.clone()
    }

    /// Shared handle on the committed tree, or on the proposed tree when
    /// `updated` is set during a transaction. The handle stays valid after
    /// the transaction ends.
    pub fn tree(&self, updated: bool) -> Arc<MortonTree<D>> {
        self.inner.borrow_mut().tree(updated)
    }

    pub fn is_refining(&self) -> bool {
        self.inner.borrow().refine.is_some()
    }

    /// Whether the marks of the current transaction have been merged across
    /// ranks since the last mark. False when idle.
    pub fn is_reduced(&self) -> bool {
        self.inner
            .borrow()
            .refine
            .as_ref()
            .map_or(false, |tx| tx.reduced)
    }

    pub fn level_count(&self, updated: bool) -> usize {
        self.tree(updated).levels()
    }

    pub fn block_count(&self, updated: bool) -> usize {
        self.tree(updated).blocks()
    }

    pub fn leaf_count(&self, updated: bool) -> usize {
        self.tree(updated).leaves()
    }

    /// Number of blocks marked for a parent/leaf flip; 0 when idle.
    pub fn delta_count(&self) -> usize {
        self.inner
            .borrow()
            .refine
            .as_ref()
            .map_or(0, |tx| tx.delta.count())
    }

    pub fn check_refine_bit(&self, id: usize) -> bool {
        self.inner
            .borrow()
            .refine
            .as_ref()
            .map_or(false, |tx| tx.delta.get(id))
    }

    pub fn is_parent(&self, updated: bool, id: usize) -> bool {
        self.tree(updated).block_is_parent(id)
    }

    pub fn identify(&self, updated: bool, level: usize, coord: &[u32; D]) -> Option<Block<D>> {
        self.tree(updated).identify(level, coord)
    }

    pub fn locate(&self, updated: bool, id: usize) -> Option<Block<D>> {
        self.tree(updated).locate(id)
    }

    pub fn top_id0(&self, updated: bool) -> usize {
        self.tree(updated).id0()
    }

    pub fn level_id_limits(&self, updated: bool, level: usize) -> Option<Range<usize>> {
        self.tree(updated).level_ids(level)
    }

    pub fn bitid_list(
        &self,
        updated: bool,
        mort_min: usize,
        mort_max: usize,
    ) -> BittreeResult<Vec<usize>> {
        self.tree(updated).bitid_list(mort_min, mort_max)
    }

    /// Starts a refine transaction with an empty delta.
    ///
    /// Inside a transaction this starts over, dropping earlier marks, unless
    /// `allow_reinit` is off.
    pub fn refine_init(&self) -> BittreeResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.refine.is_some() {
            if !inner.config.allow_reinit {
                return Err(BittreeError::AlreadyRefining);
            }
            debug!("refine_init inside a transaction; dropping pending marks");
        }
        let delta = BitArray::new(inner.tree.id_upper_bound());
        debug!("refine transaction started over {} ids", delta.len());
        inner.refine = Some(Transaction {
            delta,
            proposed: None,
            reduced: true,
        });
        Ok(())
    }

    /// Sets the flip bit of block `id`. Ignored when idle.
    pub fn refine_mark(&self, id: usize, value: bool) -> BittreeResult<()> {
        let mut inner = self.inner.borrow_mut();
        let Some(tx) = inner.refine.as_mut() else {
            warn!("refine_mark({id}) outside a refine transaction; ignored");
            return Ok(());
        };
        if id >= tx.delta.len() {
            return Err(BittreeError::IdOutOfRange {
                id,
                upper: tx.delta.len(),
            });
        }
        tx.delta.set(id, value);
        tx.reduced = false;
        tx.proposed = None;
        Ok(())
    }

    /// OR-merges the delta across every rank of `comm`. Collective.
    pub fn refine_reduce(&self, comm: &impl Communicator) -> BittreeResult<()> {
        self.inner.borrow_mut().reduce(comm, ReduceOp::Or)
    }

    /// AND-merges the delta across every rank of `comm`. Collective.
    pub fn refine_reduce_and(&self, comm: &impl Communicator) -> BittreeResult<()> {
        self.inner.borrow_mut().reduce(comm, ReduceOp::And)
    }

    /// Derives the proposed tree from the committed tree and the delta.
    ///
    /// Fails with [`BittreeError::InvalidDerefine`] when a block marked to
    /// become a leaf has children that are parents or marked themselves.
    pub fn refine_update(&self) -> BittreeResult<()> {
        self.inner.borrow_mut().update()
    }

    /// Commits the proposed tree, deriving it first if needed, and ends the
    /// transaction. On error the transaction stays open.
    pub fn refine_apply(&self) -> BittreeResult<()> {
        let mut inner = self.inner.borrow_mut();
        let Some(tx) = inner.refine.as_ref() else {
            warn!("refine_apply outside a refine transaction; ignored");
            return Ok(());
        };
        if tx.proposed.is_none() {
            inner.update()?;
        }
        if let Some(tree) = inner.refine.take().and_then(|tx| tx.proposed) {
            debug!(
                "refine applied: {} -> {} blocks",
                inner.tree.blocks(),
                tree.blocks()
            );
            inner.tree = tree;
        }
        Ok(())
    }

    /// Committed tree, then during a transaction the marked ids and the
    /// proposed tree if it has been derived.
    pub fn render(&self, kind: RenderKind, slice: u32) -> String {
        let inner = self.inner.borrow();
        let mut out = format!("committed tree (datatype={}):\n", kind.name());
        out.push_str(&inner.tree.render(kind, slice));
        if let Some(tx) = inner.refine.as_ref() {
            out.push_str("refine delta (marked ids):");
            for id in (0..tx.delta.len()).filter(|&id| tx.delta.get(id)) {
                let _ = write!(out, " {id}");
            }
            out.push('\n');
            if let Some(proposed) = tx.proposed.as_ref() {
                let _ = writeln!(out, "proposed tree (datatype={}):", kind.name());
                out.push_str(&proposed.render(kind, slice));
            }
        }
        out
    }
}
