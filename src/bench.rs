//! Times batches of table operations.

use std::fmt::Display;
use std::hash::{BuildHasher, Hash};
use std::time::{Duration, Instant};

use crate::core::collections::ChainedHashSet;
use crate::dataset::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Search,
    Delete,
}

/// How long one batch took.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub operation: Operation,
    pub ordering: Ordering,
    /// How many lines were requested on the command line.
    pub lines: usize,
    pub elapsed: Duration,
}

/// The three batches run over one dataset, plus what they found.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub insert: Measurement,
    pub search: Measurement,
    pub delete: Measurement,
    /// `contains` calls that answered `true`.
    pub hits: usize,
    /// `remove` calls that found something to remove.
    pub removed: usize,
}

impl Measurement {
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

impl Outcome {
    pub fn measurements(&self) -> [&Measurement; 3] {
        [&self.insert, &self.search, &self.delete]
    }
}

/// Inserts every value, looks every value up, then removes every value,
/// timing each pass on its own.
///
/// The table is expected to start out empty and is left empty again when
/// every removal succeeds.
pub fn run<T, S>(
    table: &mut ChainedHashSet<T, S>,
    data: &[T],
    ordering: Ordering,
    lines: usize,
) -> Outcome
where
    T: Hash + Eq + Clone,
    S: BuildHasher,
{
    let measure = |operation, elapsed| Measurement {
        operation,
        ordering,
        lines,
        elapsed,
    };

    let start = Instant::now();
    for value in data {
        table.insert(value.clone());
    }
    let insert = measure(Operation::Insert, start.elapsed());

    let start = Instant::now();
    let hits = data.iter().filter(|value| table.contains(value)).count();
    let search = measure(Operation::Search, start.elapsed());

    let start = Instant::now();
    let removed = data.iter().filter(|value| table.remove(value)).count();
    let delete = measure(Operation::Delete, start.elapsed());

    Outcome {
        insert,
        search,
        delete,
        hits,
        removed,
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Insert => "Insert",
            Self::Search => "Search",
            Self::Delete => "Delete",
        };

        f.write_str(name)
    }
}
