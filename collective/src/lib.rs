//! Collective reductions over packed bit words.
//!
//! A refine transaction merges its delta across every participating rank at
//! exactly one point. This crate owns that seam: the [`Communicator`] trait and
//! two in-tree implementations, [`SelfComm`] for a single process and
//! [`ThreadComm`] for a group of ranks living on threads of one process.

mod thread;

pub use thread::ThreadComm;

pub type Word = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    Or,
    And,
}

impl ReduceOp {
    #[inline(always)]
    pub fn apply(self, a: Word, b: Word) -> Word {
        match self {
            ReduceOp::Or => a | b,
            ReduceOp::And => a & b,
        }
    }

    #[inline(always)]
    pub fn identity(self) -> Word {
        match self {
            ReduceOp::Or => 0,
            ReduceOp::And => !0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommError {
    #[error("rank {rank} contributed {found} words to the reduction, expected {expected}")]
    LengthMismatch {
        rank: usize,
        expected: usize,
        found: usize,
    },
    #[error("communicator state poisoned by a panicking rank")]
    Poisoned,
    #[error("host reduction failed with status {status}")]
    Callback { status: i32 },
}

pub type CommResult<T> = Result<T, CommError>;

pub trait Communicator {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Element-wise in-place all-reduce of `words`.
    ///
    /// Collective: every rank of the group must call it with the same length,
    /// otherwise the result is an error (or a hang, for implementations that
    /// cannot see the other ranks' buffers).
    fn all_reduce(&self, words: &mut [Word], op: ReduceOp) -> CommResult<()>;
}

impl<C: Communicator + ?Sized> Communicator for &C {
    fn rank(&self) -> usize {
        (**self).rank()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn all_reduce(&self, words: &mut [Word], op: ReduceOp) -> CommResult<()> {
        (**self).all_reduce(words, op)
    }
}

/// The group made of the calling process only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfComm;

impl Communicator for SelfComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn all_reduce(&self, _words: &mut [Word], _op: ReduceOp) -> CommResult<()> {
        Ok(())
    }
}
