//! # Separate Chaining Hash Set
//!
//! [`ChainedHashSet`] stores values in an array of chains. A value lives in
//! the chain at `hash(value) mod capacity`, and colliding values simply share
//! the chain.
//!
//! Example of a table with `capacity = 4` after inserting values whose hashes
//! are `[1, 1, 2, 3]`:
//!
//! ```text
//!   BUCKETS            CHAINS
//! +---------+
//! |    0    | -> (empty)
//! +---------+    +-------+   +-------+
//! |    1    | -> | h = 1 | , | h = 1 |
//! +---------+    +-------+   +-------+
//! |    2    | -> | h = 2 |
//! +---------+    +-------+
//! |    3    | -> | h = 3 |
//! +---------+    +-------+
//! ```
//!
//! ## Growth
//!
//! Whenever an insertion would push `len / capacity` above the maximum load
//! factor, a new bucket array is allocated at the next capacity tier (see
//! [`Sizing`]) and every value is moved into it at `hash mod new_capacity`.
//! Capacity never decreases, except by [`ChainedHashSet::clear`] which goes
//! back to the initial one.
//!
//! ## Multiset semantics
//!
//! Inserting doesn't look for duplicates, so equal values pile up in the
//! same chain and [`ChainedHashSet::remove`] takes them out one at a time.
//!
//! ## Hash and equality
//!
//! The only thing asked of `T` is `Hash + Eq`, where equal values must hash
//! equally. The table can't tell when that doesn't hold, it will just fail to
//! find values that are there.

use std::fmt::Debug;
use std::hash::Hash;

use super::bucket::{allocation_failure, infallible, AllocErr, Buckets, Chain, Slot};
use super::hash::BuildHasher;

pub(crate) const DEFAULT_CAPACITY: usize = 16;
pub(crate) const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// How the bucket array grows once the load factor is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sizing {
    /// Twice the current number of buckets.
    #[default]
    Doubling,
    /// The smallest prime not below twice the current number of buckets.
    Prime,
}

pub struct ChainedHashSet<T, S = BuildHasher> {
    buckets: Buckets<T>,
    len: usize,
    initial_capacity: usize,
    max_load_factor: f64,
    sizing: Sizing,
    hasher: S,
}

/// Configures a [`ChainedHashSet`] before it allocates anything.
#[derive(Debug, Clone)]
pub struct Builder<S = BuildHasher> {
    capacity: usize,
    max_load_factor: f64,
    sizing: Sizing,
    hasher: S,
}

/// Hands the value back when it couldn't be stored.
#[derive(Debug, PartialEq, Eq)]
pub struct TryInsertError<T> {
    pub value: T,
    pub error: AllocErr,
}

macro_rules! method_builder {
    ($field:ident, $ty:ty) => {
        pub fn $field(mut self, value: $ty) -> Self {
            self.$field = value;
            self
        }
    };
}

impl Builder<BuildHasher> {
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            sizing: Sizing::default(),
            hasher: BuildHasher,
        }
    }
}

impl Default for Builder<BuildHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Builder<S> {
    method_builder!(sizing, Sizing);

    /// Number of buckets the table starts with (and goes back to on
    /// [`clear`](ChainedHashSet::clear)). Zero is bumped to one.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// # Panics
    ///
    /// If `factor` isn't a positive, finite number.
    pub fn max_load_factor(mut self, factor: f64) -> Self {
        assert!(
            factor.is_finite() && factor > 0.0,
            "load factor must be positive, got {factor}"
        );
        self.max_load_factor = factor;
        self
    }

    pub fn hasher<H>(self, hasher: H) -> Builder<H> {
        Builder {
            capacity: self.capacity,
            max_load_factor: self.max_load_factor,
            sizing: self.sizing,
            hasher,
        }
    }

    pub fn try_build<T>(self) -> Result<ChainedHashSet<T, S>, AllocErr> {
        Ok(ChainedHashSet {
            buckets: Buckets::try_with_capacity(self.capacity)?,
            len: 0,
            initial_capacity: self.capacity,
            max_load_factor: self.max_load_factor,
            sizing: self.sizing,
            hasher: self.hasher,
        })
    }

    pub fn build<T>(self) -> ChainedHashSet<T, S> {
        infallible(self.try_build())
    }
}

impl<T> ChainedHashSet<T, BuildHasher> {
    /// Creates an empty table with the default capacity and load factor.
    pub fn new() -> Self {
        Builder::new().build()
    }
}

impl<T, S> ChainedHashSet<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Builder::new().hasher(hasher).build()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    pub fn sizing(&self) -> Sizing {
        self.sizing
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Length of the chain at `index`.
    ///
    /// # Panics
    ///
    /// If `index >= capacity`.
    pub fn bucket_len(&self, index: usize) -> usize {
        self.buckets.chain_len(index)
    }

    pub fn longest_chain(&self) -> usize {
        self.buckets.chains().map(Vec::len).max().unwrap_or(0)
    }

    /// Visits every value in bucket order. Order inside a bucket is whatever
    /// insertions and removals left behind.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buckets.iter()
    }

    /// Drops every value and goes back to the initial capacity.
    pub fn clear(&mut self) {
        self.buckets = infallible(Buckets::try_with_capacity(self.initial_capacity));
        self.len = 0;
    }

    /// Same as [`clear`](Self::clear).
    pub fn make_empty(&mut self) {
        self.clear()
    }

    #[inline]
    fn index_of(&self, hash: u64) -> usize {
        (hash % self.capacity() as u64) as usize
    }

    fn exceeds_load(&self, len: usize, capacity: usize) -> bool {
        len as f64 > self.max_load_factor * capacity as f64
    }

    fn next_capacity(&self, current: usize) -> Result<usize, AllocErr> {
        let mut capacity = current.checked_mul(2).ok_or(AllocErr::CapacityOverflow)?;
        if self.sizing == Sizing::Prime {
            capacity = next_prime(capacity).ok_or(AllocErr::CapacityOverflow)?;
        }

        Ok(capacity)
    }

    /// Grows the table until `len` values fit under the load factor.
    ///
    /// The whole new array is allocated, and every chain in it sized, before
    /// a single value moves, so a failure leaves `self` untouched. `incoming`
    /// is the hash of a value about to be appended; its chain gets room for
    /// it too, so the append that follows can't fail after a rehash.
    fn try_grow_for(&mut self, len: usize, incoming: Option<u64>) -> Result<(), AllocErr> {
        let old_capacity = self.capacity();
        let mut capacity = old_capacity;
        while self.exceeds_load(len, capacity) {
            capacity = self.next_capacity(capacity)?;
        }

        if capacity == old_capacity {
            return Ok(());
        }

        let mut buckets = Buckets::try_with_capacity(capacity)?;
        let mut counts = Vec::new();
        counts
            .try_reserve_exact(capacity)
            .map_err(|_| allocation_failure::<usize>(capacity))?;
        counts.resize(capacity, 0usize);

        for chain in self.buckets.chains() {
            for slot in chain {
                counts[(slot.hash % capacity as u64) as usize] += 1;
            }
        }
        if let Some(hash) = incoming {
            counts[(hash % capacity as u64) as usize] += 1;
        }
        for (index, &count) in counts.iter().enumerate() {
            if count > 0 {
                buckets.try_reserve(index, count)?;
            }
        }

        for slot in self.buckets.drain() {
            let index = (slot.hash % capacity as u64) as usize;
            buckets.append(index, slot);
        }
        self.buckets = buckets;

        crate::debug!(
            "rehashed {} values from {old_capacity} to {capacity} buckets",
            self.len
        );

        Ok(())
    }
}

impl<T: Hash + Eq, S: std::hash::BuildHasher> ChainedHashSet<T, S> {
    /// Adds `value` even when an equal one is already stored.
    ///
    /// Growth happens before this returns, and is the only `O(n)` path.
    /// Allocation failure during growth aborts like any other allocation;
    /// see [`try_insert`](Self::try_insert) to handle it instead.
    pub fn insert(&mut self, value: T) {
        if let Err(TryInsertError { error, .. }) = self.try_insert(value) {
            infallible::<()>(Err(error))
        }
    }

    /// Like [`insert`](Self::insert), but reports growth failure. On error
    /// the table is exactly as it was before the call, capacity included.
    pub fn try_insert(&mut self, value: T) -> Result<(), TryInsertError<T>> {
        let hash = self.hasher.hash_one(&value);

        match self.reserve_slot(hash) {
            Ok(index) => {
                self.buckets.append(index, Slot { hash, value });
                self.len += 1;
                Ok(())
            }
            Err(error) => Err(TryInsertError { value, error }),
        }
    }

    /// Grows if needed and makes sure the chain for `hash` can take one more
    /// slot, returning its index.
    fn reserve_slot(&mut self, hash: u64) -> Result<usize, AllocErr> {
        let len = self.len.checked_add(1).ok_or(AllocErr::CapacityOverflow)?;
        self.try_grow_for(len, Some(hash))?;

        // a no-op right after a rehash, which already made the room.
        let index = self.index_of(hash);
        self.buckets.try_reserve(index, 1)?;

        Ok(index)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns the stored value equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hasher.hash_one(value);

        self.buckets
            .find(self.index_of(hash), |slot| slot.hash == hash && slot.value == *value)
    }

    /// Removes one value equal to `value`. Capacity is left as is.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes one value equal to `value` and hands it back.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.hasher.hash_one(value);
        let index = self.index_of(hash);
        let taken = self
            .buckets
            .remove_first(index, |slot| slot.hash == hash && slot.value == *value)?;

        self.len -= 1;
        Some(taken)
    }

    /// Number of stored values equal to `value`.
    pub fn count(&self, value: &T) -> usize {
        let hash = self.hasher.hash_one(value);

        self.buckets
            .chain(self.index_of(hash))
            .iter()
            .filter(|slot| slot.hash == hash && slot.value == *value)
            .count()
    }

    /// Makes room for `additional` more values without growing again.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocErr> {
        let len = self
            .len
            .checked_add(additional)
            .ok_or(AllocErr::CapacityOverflow)?;

        self.try_grow_for(len, None)
    }

    pub fn reserve(&mut self, additional: usize) {
        infallible(self.try_reserve(additional))
    }
}

/// Smallest prime `>= n`, if one fits in `usize`.
fn next_prime(n: usize) -> Option<usize> {
    let is_prime = |n: usize| n >= 2 && (2..).take_while(|&d| d <= n / d).all(|d| n % d != 0);

    (n.max(2)..=usize::MAX).find(|&candidate| is_prime(candidate))
}

impl<T> Default for ChainedHashSet<T, BuildHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug, S> Debug for ChainedHashSet<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Clone, S: Clone> Clone for ChainedHashSet<T, S> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            len: self.len,
            initial_capacity: self.initial_capacity,
            max_load_factor: self.max_load_factor,
            sizing: self.sizing,
            hasher: self.hasher.clone(),
        }
    }
}

impl<T: Hash + Eq, S: std::hash::BuildHasher> Extend<T> for ChainedHashSet<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        iter.for_each(|value| self.insert(value));
    }
}

impl<T: Hash + Eq> FromIterator<T> for ChainedHashSet<T, BuildHasher> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// Owning iterator over the values of a [`ChainedHashSet`].
pub struct IntoIter<T> {
    slots: std::iter::Flatten<std::vec::IntoIter<Chain<T>>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.slots.next().map(|slot| slot.value)
    }
}

impl<T, S> IntoIterator for ChainedHashSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.buckets.into_chains().into_iter().flatten(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::Hasher;

    /// Hashes a [`Keyed`] to exactly its key, so tests can pick buckets.
    #[derive(Default, Clone)]
    struct Identity(u64);

    impl Hasher for Identity {
        fn write(&mut self, _: &[u8]) {
            unreachable!("only keys are hashed")
        }

        fn write_u64(&mut self, key: u64) {
            self.0 = key;
        }

        fn finish(&self) -> u64 {
            self.0
        }
    }

    #[derive(Default, Clone)]
    struct IdentityState;

    impl std::hash::BuildHasher for IdentityState {
        type Hasher = Identity;

        fn build_hasher(&self) -> Identity {
            Identity::default()
        }
    }

    /// Hashes as `key`, compares as `(key, name)`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Keyed {
        key: u64,
        name: &'static str,
    }

    impl Hash for Keyed {
        fn hash<H: Hasher>(&self, state: &mut H) {
            state.write_u64(self.key)
        }
    }

    fn keyed(key: u64, name: &'static str) -> Keyed {
        Keyed { key, name }
    }

    fn identity_table(capacity: usize, load: f64) -> ChainedHashSet<Keyed, IdentityState> {
        Builder::new()
            .capacity(capacity)
            .max_load_factor(load)
            .hasher(IdentityState)
            .build()
    }

    #[test]
    fn new_table_is_empty() {
        let table = ChainedHashSet::<u32>::new();

        assert!(table.is_empty());
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
        assert_eq!(table.max_load_factor(), DEFAULT_MAX_LOAD_FACTOR);
        assert!(!table.contains(&7));
        assert_eq!(table.longest_chain(), 0);
    }

    #[test]
    fn insert_then_contains() {
        let mut table = ChainedHashSet::new();
        table.insert("Collingwood");
        table.insert("Footscray");

        assert!(table.contains(&"Collingwood"));
        assert!(table.contains(&"Footscray"));
        assert!(!table.contains(&"Brighton"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn collisions_share_a_chain() {
        let mut table = identity_table(4, 1.0);
        let values = [
            keyed(1, "Kew"),
            keyed(1, "Hawthorn"),
            keyed(2, "Carlton"),
            keyed(3, "Parkville"),
        ];
        values.iter().cloned().for_each(|value| table.insert(value));

        assert_eq!(table.capacity(), 4);
        assert_eq!(table.len(), 4);
        assert_eq!(table.bucket_len(0), 0);
        assert_eq!(table.bucket_len(1), 2);
        assert_eq!(table.bucket_len(2), 1);
        assert_eq!(table.bucket_len(3), 1);
        assert!(!table.contains(&keyed(1, "Richmond")));
        assert!(!table.contains(&keyed(5, "Kew")));

        assert!(table.remove(&keyed(1, "Kew")));
        assert_eq!(table.bucket_len(1), 1);
        assert_eq!(table.len(), 3);
        assert!(table.contains(&keyed(1, "Hawthorn")));
        assert!(!table.contains(&keyed(1, "Kew")));
    }

    #[test]
    fn seventh_insert_grows_at_capacity_eight() {
        let mut table = identity_table(8, 0.75);
        let values: Vec<Keyed> = (0..7).map(|key| keyed(key, "Northcote")).collect();

        for value in &values[..6] {
            table.insert(value.clone());
        }
        assert_eq!(table.capacity(), 8);

        table.insert(values[6].clone());
        assert!(table.capacity() > 8);
        assert!(table.load_factor() <= 0.75);
        assert_eq!(table.len(), 7);
        assert!(values.iter().all(|value| table.contains(value)));
    }

    #[test]
    fn load_factor_holds_after_every_insert() {
        for sizing in [Sizing::Doubling, Sizing::Prime] {
            let mut table = Builder::new().capacity(3).sizing(sizing).build();
            let mut capacity = table.capacity();

            for n in 0..2_000u32 {
                table.insert(n);
                assert!(table.load_factor() <= table.max_load_factor());
                assert!(table.capacity() >= capacity);
                capacity = table.capacity();
            }

            assert!((0..2_000).all(|n| table.contains(&n)));
        }
    }

    #[test]
    fn prime_sizing_picks_primes() {
        let mut table = Builder::new()
            .capacity(11)
            .sizing(Sizing::Prime)
            .build();
        (0..9u64).for_each(|n| table.insert(n));

        assert_eq!(table.capacity(), 23);
        assert_eq!(next_prime(24), Some(29));
        assert_eq!(next_prime(0), Some(2));
    }

    #[test]
    fn duplicates_are_kept_and_removed_one_at_a_time() {
        let mut table = ChainedHashSet::new();
        (0..3).for_each(|_| table.insert("Brunswick"));

        assert_eq!(table.len(), 3);
        assert_eq!(table.count(&"Brunswick"), 3);

        assert!(table.remove(&"Brunswick"));
        assert_eq!(table.count(&"Brunswick"), 2);
        assert!(table.contains(&"Brunswick"));

        assert!(table.remove(&"Brunswick"));
        assert!(table.remove(&"Brunswick"));
        assert!(!table.remove(&"Brunswick"));
        assert!(table.is_empty());
    }

    #[test]
    fn remove_never_shrinks() {
        let mut table: ChainedHashSet<u32> = (0..100).collect();
        let capacity = table.capacity();

        (0..100).for_each(|n| assert!(table.remove(&n)));

        assert_eq!(table.capacity(), capacity);
        assert!(table.is_empty());
    }

    #[test]
    fn clear_goes_back_to_initial_capacity() {
        let mut table = Builder::new().capacity(4).build();
        (0..50u32).for_each(|n| table.insert(n));
        assert!(table.capacity() > 4);

        table.clear();
        assert_eq!(table.capacity(), 4);
        assert_eq!(table.len(), 0);
        assert!((0..50).all(|n| !table.contains(&n)));

        table.make_empty();
        table.clear();
        assert!(table.is_empty());

        table.insert(1);
        assert!(table.contains(&1));
    }

    #[test]
    fn take_returns_the_stored_value() {
        let mut table = identity_table(4, 1.0);
        table.insert(keyed(9, "Elwood"));

        assert_eq!(table.get(&keyed(9, "Elwood")), Some(&keyed(9, "Elwood")));
        assert_eq!(table.take(&keyed(9, "Elwood")), Some(keyed(9, "Elwood")));
        assert_eq!(table.take(&keyed(9, "Elwood")), None);
    }

    #[test]
    fn reserve_grows_up_front() {
        let mut table = ChainedHashSet::<u32>::new();
        table.reserve(1_000);
        let capacity = table.capacity();

        (0..1_000).for_each(|n| table.insert(n));
        assert_eq!(table.capacity(), capacity);
    }

    #[test]
    fn try_reserve_reports_overflow() {
        let mut table = ChainedHashSet::<u32>::new();
        table.insert(1);

        assert_eq!(table.try_reserve(usize::MAX), Err(AllocErr::CapacityOverflow));
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
        assert!(table.contains(&1));
    }

    #[test]
    fn rehash_makes_room_for_the_incoming_value() {
        let mut table = identity_table(4, 0.75);
        (0..3).for_each(|key| table.insert(keyed(key, "Fitzroy")));

        table.try_grow_for(4, Some(7)).unwrap();
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.bucket_len(7), 0);
        assert!(table.buckets.chain(7).capacity() >= 1);
        assert_eq!(table.buckets.chain(6).capacity(), 0);

        table.try_insert(keyed(7, "Fitzroy")).unwrap();
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.bucket_len(7), 1);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn into_iter_yields_every_value() {
        let table: ChainedHashSet<u32> = (0..40).collect();
        let mut values: Vec<u32> = table.into_iter().collect();
        values.sort();

        assert_eq!(values, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn iter_and_debug() {
        let table: ChainedHashSet<u8> = [3, 3].into_iter().collect();

        assert_eq!(table.iter().count(), 2);
        assert_eq!(format!("{table:?}"), "{3, 3}");
    }
}
