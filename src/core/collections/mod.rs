mod bucket;
mod chain;
pub(crate) mod hash;

pub use bucket::AllocErr;
pub use chain::{Builder, ChainedHashSet, IntoIter, Sizing, TryInsertError};
