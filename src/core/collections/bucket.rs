//! The bucket store: an array of collision chains addressed by index.
//!
//! It knows nothing about hashing or load factors, that policy lives in
//! [`ChainedHashSet`](super::ChainedHashSet). Each slot keeps the hash the
//! table computed for it so a rehash only has to reduce it again.

use std::alloc::Layout;
use std::fmt::Display;

/// A stored value plus the full hash it was addressed with.
#[derive(Debug, Clone)]
pub(crate) struct Slot<T> {
    pub hash: u64,
    pub value: T,
}

/// A chain of values sharing the same bucket index.
pub(crate) type Chain<T> = Vec<Slot<T>>;

#[derive(Debug, Clone)]
pub(crate) struct Buckets<T> {
    chains: Box<[Chain<T>]>,
}

/// Growth failures. Everything else in the table is infallible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocErr {
    /// The requested number of buckets does not fit in `usize`.
    CapacityOverflow,
    /// The allocator refused the request.
    Allocation { layout: Layout },
}

impl<T> Buckets<T> {
    /// Allocates `capacity` empty chains, reporting allocation failure
    /// instead of aborting.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocErr> {
        let mut chains = Vec::new();
        chains
            .try_reserve_exact(capacity)
            .map_err(|_| allocation_failure::<Chain<T>>(capacity))?;
        chains.resize_with(capacity, Vec::new);

        Ok(Self {
            chains: chains.into_boxed_slice(),
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.chains.len()
    }

    #[inline]
    pub fn append(&mut self, index: usize, slot: Slot<T>) {
        self.chains[index].push(slot);
    }

    /// Makes sure `index` can take `additional` more slots without
    /// allocating.
    pub fn try_reserve(&mut self, index: usize, additional: usize) -> Result<(), AllocErr> {
        let chain = &mut self.chains[index];
        let wanted = chain.len().checked_add(additional).ok_or(AllocErr::CapacityOverflow)?;

        chain
            .try_reserve(additional)
            .map_err(|_| allocation_failure::<Slot<T>>(wanted))
    }

    pub fn find(&self, index: usize, mut matches: impl FnMut(&Slot<T>) -> bool) -> Option<&T> {
        self.chains[index]
            .iter()
            .find(|slot| matches(slot))
            .map(|slot| &slot.value)
    }

    /// Unlinks the first slot of the chain that satisfies `matches`.
    ///
    /// The chain is unordered, so the hole is filled with its last slot.
    pub fn remove_first(
        &mut self,
        index: usize,
        mut matches: impl FnMut(&Slot<T>) -> bool,
    ) -> Option<T> {
        let chain = &mut self.chains[index];
        let position = chain.iter().position(|slot| matches(slot))?;

        Some(chain.swap_remove(position).value)
    }

    #[inline]
    pub fn chain_len(&self, index: usize) -> usize {
        self.chains[index].len()
    }

    #[inline]
    pub fn chain(&self, index: usize) -> &Chain<T> {
        &self.chains[index]
    }

    pub fn chains(&self) -> impl Iterator<Item = &Chain<T>> {
        self.chains.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.chains.iter().flatten().map(|slot| &slot.value)
    }

    /// Empties every chain, handing the slots out by value.
    pub fn drain(&mut self) -> impl Iterator<Item = Slot<T>> + '_ {
        self.chains.iter_mut().flat_map(|chain| chain.drain(..))
    }

    pub fn into_chains(self) -> Vec<Chain<T>> {
        self.chains.into_vec()
    }
}

pub(crate) fn allocation_failure<E>(count: usize) -> AllocErr {
    match Layout::array::<E>(count) {
        Ok(layout) => AllocErr::Allocation { layout },
        Err(_) => AllocErr::CapacityOverflow,
    }
}

impl Display for AllocErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityOverflow => f.write_str("capacity overflow"),
            Self::Allocation { layout } => {
                write!(f, "failed to allocate {} bytes for buckets", layout.size())
            }
        }
    }
}

impl std::error::Error for AllocErr {}

/// Turns a growth failure into the process-level failure the allocator
/// would have raised anyway.
pub(crate) fn infallible<T>(result: Result<T, AllocErr>) -> T {
    match result {
        Ok(value) => value,
        Err(AllocErr::CapacityOverflow) => panic!("capacity overflow"),
        Err(AllocErr::Allocation { layout }) => std::alloc::handle_alloc_error(layout),
    }
}
