//! Random numbers for shuffling datasets, without dependencies.
//! A trimmed down take on https://github.com/smol-rs/fastrand.

use std::cell::Cell;
use std::ops::{Bound, RangeBounds};

/// Random number generator (wyrand).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rng(u64);

const FALLBACK_SEED: u64 = 0xa3f4c92d57e8b6c3;

std::thread_local! {
    /// Seeds every [`Rng::new`] of this thread.
    static RNG_THREAD: Cell<u64> = Cell::new(random_seed());
}

/// Generates the ranged methods of [`Rng`] for unsigned integers.
macro_rules! rng_int {
    ($t:tt, $gen:tt, $doc:tt) => {
        #[doc = $doc]
        ///
        /// # Panics
        ///
        /// If the range is empty.
        #[inline]
        pub fn $t(&mut self, range: impl RangeBounds<$t>) -> $t {
            let panic_empty_range = || -> $t {
                panic!(
                    "empty range: {:?}..{:?}",
                    range.start_bound(),
                    range.end_bound()
                )
            };

            let low = match range.start_bound() {
                Bound::Unbounded => $t::MIN,
                Bound::Included(&x) => x,
                Bound::Excluded(&x) => x.checked_add(1).unwrap_or_else(panic_empty_range),
            };

            let high = match range.end_bound() {
                Bound::Unbounded => $t::MAX,
                Bound::Included(&x) => x,
                Bound::Excluded(&x) => x.checked_sub(1).unwrap_or_else(panic_empty_range),
            };

            if low > high {
                panic_empty_range();
            }

            if low == $t::MIN && high == $t::MAX {
                self.$gen() as $t
            } else {
                let len = high.wrapping_sub(low).wrapping_add(1);
                low.wrapping_add(self.bounded(len as u64) as $t)
            }
        }
    };
}

impl Rng {
    /// Seeded from the thread, which in turn is seeded from the clock.
    pub fn new() -> Self {
        let seed = RNG_THREAD
            .try_with(|seed| {
                let mut rng = Rng(seed.get());
                let branch = rng.next_u64();
                seed.set(rng.0);
                branch
            })
            .unwrap_or(FALLBACK_SEED);

        Self::with_seed(seed)
    }

    /// Same seed, same sequence.
    pub fn with_seed(seed: u64) -> Self {
        Rng(seed)
    }

    rng_int!(u32, next_u64, "Generates a random `u32` in the given range.");

    rng_int!(u64, next_u64, "Generates a random `u64` in the given range.");

    rng_int!(usize, next_u64, "Generates a random `usize` in the given range.");

    /// Fisher-Yates, walking down from the last element.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.usize(..=i);
            slice.swap(i, j);
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        // Constants taken from: https://github.com/wangyi-fudan/wyhash/blob/master/wyhash.h#L151.
        const WY_CONST_0: u64 = 0x2d35_8dcc_aa6c_78a5;
        const WY_CONST_1: u64 = 0x8bb8_4b93_962e_acc9;

        self.0 = self.0.wrapping_add(WY_CONST_0);

        let tail = u128::from(self.0) * u128::from(self.0 ^ WY_CONST_1);
        (tail as u64) ^ (tail >> 64) as u64
    }

    /// Uniform in `0..bound`, rejecting the biased low products.
    ///
    /// Read more here: https://lemire.me/blog/2016/06/30/fast-random-shuffling
    fn bounded(&mut self, bound: u64) -> u64 {
        let mut product = u128::from(self.next_u64()) * u128::from(bound);

        if (product as u64) < bound {
            let threshold = bound.wrapping_neg() % bound;
            while (product as u64) < threshold {
                product = u128::from(self.next_u64()) * u128::from(bound);
            }
        }

        (product >> 64) as u64
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::new()
    }
}

/// Mixes the clock and thread id through the std hasher. For more about
/// dependency free seeds, see [here](https://blog.orhun.dev/zero-deps-random-in-rust/).
fn random_seed() -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::thread;
    use std::time::{Instant, SystemTime};

    let mut hasher = DefaultHasher::new();
    Instant::now().hash(&mut hasher);
    SystemTime::now().hash(&mut hasher);
    thread::current().id().hash(&mut hasher);

    match hasher.finish() {
        0 => FALLBACK_SEED,
        seed => seed,
    }
}
