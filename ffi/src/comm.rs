use collective::{CommError, CommResult, Communicator, ReduceOp, Word};
use std::os::raw::{c_int, c_void};

/// Reduction operator codes passed to [`BittreeAllReduce`].
pub const BITTREE_OP_OR: c_int = 0;
pub const BITTREE_OP_AND: c_int = 1;

/// In-place element-wise all-reduce of `count` words, supplied by the host
/// (typically a wrapper over its message-passing library). Returns 0 on
/// success.
pub type BittreeAllReduce =
    unsafe extern "C" fn(ctx: *mut c_void, words: *mut u64, count: usize, op: c_int) -> c_int;

/// The host's communicator as seen through the C interface.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct BittreeComm {
    pub ctx: *mut c_void,
    pub rank: c_int,
    pub size: c_int,
    pub all_reduce: Option<BittreeAllReduce>,
}

pub(crate) struct CallbackComm {
    comm: BittreeComm,
}

impl CallbackComm {
    pub(crate) fn new(comm: BittreeComm) -> Self {
        Self { comm }
    }
}

impl Communicator for CallbackComm {
    fn rank(&self) -> usize {
        self.comm.rank.max(0) as usize
    }

    fn size(&self) -> usize {
        self.comm.size.max(1) as usize
    }

    fn all_reduce(&self, words: &mut [Word], op: ReduceOp) -> CommResult<()> {
        // no callback: the host runs a single rank
        let Some(all_reduce) = self.comm.all_reduce else {
            return Ok(());
        };
        let op = match op {
            ReduceOp::Or => BITTREE_OP_OR,
            ReduceOp::And => BITTREE_OP_AND,
        };
        // SAFETY: the host promised `all_reduce` accepts `ctx` and a buffer
        // of `count` words; the buffer is exclusively ours for the call.
        let status = unsafe { all_reduce(self.comm.ctx, words.as_mut_ptr(), words.len(), op) };
        if status == 0 {
            Ok(())
        } else {
            Err(CommError::Callback { status })
        }
    }
}
