//! The three orderings the benchmark feeds to the table. All of them hold
//! the very same records, only the sequence changes.

use std::fmt::Display;

use crate::core::random::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ordering {
    /// Most expensive first, see [`HouseSale`](crate::housing::HouseSale)'s `Ord`.
    Sorted,
    Shuffled,
    /// Cheapest first.
    Reversed,
}

impl Ordering {
    pub const ALL: [Ordering; 3] = [Ordering::Sorted, Ordering::Shuffled, Ordering::Reversed];
}

#[derive(Debug, Clone)]
pub struct Datasets<T> {
    pub sorted: Vec<T>,
    pub shuffled: Vec<T>,
    pub reversed: Vec<T>,
}

impl<T: Ord + Clone> Datasets<T> {
    pub fn prepare(records: &[T], rng: &mut Rng) -> Self {
        let mut sorted = records.to_vec();
        sorted.sort();

        let mut shuffled = records.to_vec();
        rng.shuffle(&mut shuffled);

        let mut reversed = records.to_vec();
        reversed.sort_by(|a, b| b.cmp(a));

        Self {
            sorted,
            shuffled,
            reversed,
        }
    }
}

impl<T> Datasets<T> {
    pub fn get(&self, ordering: Ordering) -> &[T] {
        match ordering {
            Ordering::Sorted => &self.sorted,
            Ordering::Shuffled => &self.shuffled,
            Ordering::Reversed => &self.reversed,
        }
    }

    /// Every ordering, in the order the benchmark runs them.
    pub fn iter(&self) -> impl Iterator<Item = (Ordering, &[T])> {
        Ordering::ALL
            .into_iter()
            .map(move |ordering| (ordering, self.get(ordering)))
    }
}

impl Display for Ordering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Sorted => "Sorted",
            Self::Shuffled => "Shuffled",
            Self::Reversed => "Reversed",
        };

        f.write_str(name)
    }
}
