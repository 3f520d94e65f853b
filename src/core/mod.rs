pub(crate) mod collections;
pub mod log;
pub(crate) mod random;
