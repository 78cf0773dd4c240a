//! Canonical unordered pairs and candidate-pair generation.

use std::collections::HashMap;

/// An unordered pair of file indices, canonicalized so `a < b`.
///
/// Because construction always orders the endpoints, `(x, y)` and
/// `(y, x)` are the same `Pair` and a scan never produces both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    /// Lower file index
    pub a: usize,
    /// Higher file index
    pub b: usize,
}

impl Pair {
    /// Create a canonical pair from two distinct indices.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if `x == y`; a file is never paired with itself.
    #[must_use]
    pub fn new(x: usize, y: usize) -> Self {
        debug_assert_ne!(x, y, "a file cannot be paired with itself");
        if x < y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }
}

/// Generate all unique pairs within each size group.
///
/// Cross-group pairs are never produced: files of different sizes
/// cannot be byte-identical. The result is sorted so the comparison
/// schedule is deterministic for a given input.
///
/// # Example
///
/// ```
/// use dupecheck::duplicates::{size_group_pairs, Pair};
/// use std::collections::HashMap;
///
/// let mut groups = HashMap::new();
/// groups.insert(100u64, vec![0, 1, 2]);
/// let pairs = size_group_pairs(&groups);
///
/// assert_eq!(pairs, vec![Pair::new(0, 1), Pair::new(0, 2), Pair::new(1, 2)]);
/// ```
#[must_use]
pub fn size_group_pairs(groups: &HashMap<u64, Vec<usize>>) -> Vec<Pair> {
    let mut pairs = Vec::new();
    for members in groups.values() {
        for (i, &x) in members.iter().enumerate() {
            for &y in &members[i + 1..] {
                pairs.push(Pair::new(x, y));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

/// Generate all unique pairs over `n` files.
///
/// Used by fuzzy mode, where files of different sizes can still be
/// similar and the size prefilter does not apply.
#[must_use]
pub fn all_pairs(n: usize) -> Vec<Pair> {
    let mut pairs = Vec::with_capacity(n.saturating_mul(n.saturating_sub(1)) / 2);
    for a in 0..n {
        for b in a + 1..n {
            pairs.push(Pair { a, b });
        }
    }
    pairs
}
