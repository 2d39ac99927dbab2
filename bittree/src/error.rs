use collective::CommError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BittreeError {
    #[error("top-level block counts must all be positive (got {top:?})")]
    InvalidTopSize { top: Vec<u32> },
    #[error("inclusion mask has {found} entries, top level has {expected} cells")]
    IncludeLengthMismatch { expected: usize, found: usize },
    #[error("refine delta has {found} bits, tree id upper bound is {expected}")]
    DeltaLengthMismatch { expected: usize, found: usize },
    #[error("morton range [{min}, {max}) must lie within [0, {blocks}]")]
    InvalidMortonRange { min: usize, max: usize, blocks: usize },
    #[error("block {id} cannot become a leaf: a child is a parent or is flipped too")]
    InvalidDerefine { id: usize },
    #[error("block id {id} out of range (upper bound {upper})")]
    IdOutOfRange { id: usize, upper: usize },
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
    #[error("a refine transaction is already in progress")]
    AlreadyRefining,
    #[error("delta reduction failed: {0}")]
    Collective(#[from] CommError),
}

pub type BittreeResult<T> = Result<T, BittreeError>;
