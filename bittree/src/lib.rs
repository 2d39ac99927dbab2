pub mod amr;
pub mod bitarray;
pub mod config;
pub mod error;
pub mod tree;

pub use amr::AmrMesh;
pub use bitarray::{BitArray, FastBitArray};
pub use collective::{Communicator, ReduceOp, SelfComm, ThreadComm};
pub use config::Config;
pub use error::{BittreeError, BittreeResult};
pub use tree::{rect_coord_to_mort, rect_mort_to_coord, Block, MortonTree, RenderKind};
