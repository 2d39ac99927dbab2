use crate::bitarray::DEFAULT_CHECKPOINT_LOG2;
use crate::error::{BittreeError, BittreeResult};

#[derive(Debug, Clone)]
pub struct Config {
    /// Log2 of the bit interval between popcount checkpoints.
    pub checkpoint_log2: usize,
    /// Whether `refine_init` inside a transaction restarts it (true) or fails.
    pub allow_reinit: bool,
    pub warn_unreduced_update: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            checkpoint_log2: DEFAULT_CHECKPOINT_LOG2,
            allow_reinit: true,
            warn_unreduced_update: true,
        }
    }
}

impl Config {
    pub const MIN_CHECKPOINT_LOG2: usize = 3;
    pub const MAX_CHECKPOINT_LOG2: usize = 20;

    pub fn validate(&self) -> BittreeResult<()> {
        if !(Self::MIN_CHECKPOINT_LOG2..=Self::MAX_CHECKPOINT_LOG2).contains(&self.checkpoint_log2)
        {
            return Err(BittreeError::InvalidConfig {
                reason: format!(
                    "checkpoint_log2 must be in {}..={} (got {})",
                    Self::MIN_CHECKPOINT_LOG2,
                    Self::MAX_CHECKPOINT_LOG2,
                    self.checkpoint_log2
                ),
            });
        }
        Ok(())
    }
}
