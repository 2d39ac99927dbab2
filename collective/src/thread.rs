use crate::{CommError, CommResult, Communicator, ReduceOp, Word};
use std::sync::{Arc, Barrier, Mutex};

struct Shared {
    barrier: Barrier,
    slots: Mutex<Vec<Vec<Word>>>,
}

/// One rank of a group of ranks that share a process.
///
/// Every reduction is two barrier phases: all ranks deposit their buffer,
/// then all ranks fold every deposit. The second barrier keeps a fast rank
/// from overwriting its slot for the next reduction while a slow rank is
/// still folding.
pub struct ThreadComm {
    rank: usize,
    size: usize,
    shared: Arc<Shared>,
}

impl ThreadComm {
    pub fn group(size: usize) -> Vec<ThreadComm> {
        let size = size.max(1);
        let shared = Arc::new(Shared {
            barrier: Barrier::new(size),
            slots: Mutex::new(vec![Vec::new(); size]),
        });
        (0..size)
            .map(|rank| ThreadComm {
                rank,
                size,
                shared: Arc::clone(&shared),
            })
            .collect()
    }

    fn deposit(&self, words: &[Word]) -> CommResult<()> {
        let mut slots = self.shared.slots.lock().map_err(|_| CommError::Poisoned)?;
        let slot = &mut slots[self.rank];
        slot.clear();
        slot.extend_from_slice(words);
        Ok(())
    }

    fn fold(&self, len: usize, op: ReduceOp) -> CommResult<Vec<Word>> {
        let slots = self.shared.slots.lock().map_err(|_| CommError::Poisoned)?;
        let mut out = vec![op.identity(); len];
        for (rank, slot) in slots.iter().enumerate() {
            if slot.len() != len {
                return Err(CommError::LengthMismatch {
                    rank,
                    expected: len,
                    found: slot.len(),
                });
            }
            for (acc, &w) in out.iter_mut().zip(slot.iter()) {
                *acc = op.apply(*acc, w);
            }
        }
        Ok(out)
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn all_reduce(&self, words: &mut [Word], op: ReduceOp) -> CommResult<()> {
        // Every rank must reach both barriers, even on error.
        let deposited = self.deposit(words);
        self.shared.barrier.wait();
        let folded = deposited.and_then(|()| self.fold(words.len(), op));
        self.shared.barrier.wait();
        words.copy_from_slice(&folded?);
        Ok(())
    }
}
