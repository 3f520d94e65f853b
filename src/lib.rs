//! A separate chaining hash set, and the benchmark that feeds it Melbourne
//! house sales in sorted, shuffled and reversed order.

mod core;
pub mod bench;
pub mod config;
pub mod dataset;
mod error;
pub mod housing;
pub mod report;

pub use crate::core::collections::hash::{BuildHasher, Hasher};
pub use crate::core::collections::{
    AllocErr, Builder, ChainedHashSet, IntoIter, Sizing, TryInsertError,
};
pub use crate::core::log;
pub use crate::core::random::Rng;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
