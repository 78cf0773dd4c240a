//! Match aggregation: merge pairwise matches into maximal clusters.
//!
//! Each matching pair is an edge in an equivalence graph; the clusters
//! are its connected components. A union-find (disjoint-set) structure
//! with path compression and union by rank does the merging in near
//! O(E α(V)), and the final membership is independent of the order the
//! edges arrive in.

use std::collections::HashMap;

use crate::scanner::FileRef;

use super::Pair;

/// Union-Find (disjoint set union) over dense indices.
#[derive(Debug)]
pub struct UnionFind {
    /// Parent pointers; parent[i] == i marks a root.
    parent: Vec<usize>,
    /// Approximate tree depth for union by rank.
    rank: Vec<u8>,
}

impl UnionFind {
    /// Create a structure with `n` singleton sets.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Find the representative of the set containing `x`.
    ///
    /// Iterative with full path compression, so deep chains cannot
    /// overflow the stack.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `x` and `y`.
    ///
    /// Returns true if they were previously in different sets.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return false;
        }

        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry,
            std::cmp::Ordering::Greater => self.parent[ry] = rx,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
            }
        }
        true
    }

    /// Check whether `x` and `y` are in the same set.
    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether the structure is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

/// A maximal set of mutually duplicate files.
///
/// Members are reachable from each other through a chain of matching
/// pairs; every cluster has at least 2 members and no file appears in
/// two clusters.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Member files, sorted by path
    pub files: Vec<FileRef>,
}

impl Cluster {
    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the cluster has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size of all members in bytes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Space reclaimable by keeping one member (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.total_size()
            .saturating_sub(self.files.first().map_or(0, |f| f.size))
    }

    /// Member paths.
    #[must_use]
    pub fn paths(&self) -> Vec<std::path::PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Aggregate matching pairs into clusters.
///
/// Every edge joins its endpoints in the union-find; the components
/// with 2+ members become clusters. Files never named by an edge stay
/// unclustered. Members are sorted by path and clusters by their first
/// member, so the output is deterministic regardless of edge order and
/// running the aggregation twice yields identical results.
///
/// # Example
///
/// ```
/// use dupecheck::duplicates::{cluster_matches, Pair};
/// use dupecheck::scanner::FileRef;
/// use std::path::PathBuf;
/// use std::time::SystemTime;
///
/// let files: Vec<FileRef> = ["/a", "/b", "/c", "/d"]
///     .iter()
///     .map(|p| FileRef::new(PathBuf::from(p), 10, SystemTime::now()))
///     .collect();
///
/// // a-b and b-c chain into one cluster; d stays unclustered.
/// let clusters = cluster_matches(&files, &[Pair::new(0, 1), Pair::new(1, 2)]);
///
/// assert_eq!(clusters.len(), 1);
/// assert_eq!(clusters[0].len(), 3);
/// ```
#[must_use]
pub fn cluster_matches(files: &[FileRef], edges: &[Pair]) -> Vec<Cluster> {
    let mut uf = UnionFind::new(files.len());
    for edge in edges {
        uf.union(edge.a, edge.b);
    }

    // Only indices that appear in an edge can be members; everything
    // else is a singleton by construction.
    let mut components: HashMap<usize, Vec<usize>> = HashMap::new();
    for edge in edges {
        for idx in [edge.a, edge.b] {
            let root = uf.find(idx);
            let members = components.entry(root).or_default();
            if !members.contains(&idx) {
                members.push(idx);
            }
        }
    }

    let mut clusters: Vec<Cluster> = components
        .into_values()
        .filter(|members| members.len() > 1)
        .map(|members| {
            let mut files: Vec<FileRef> = members.into_iter().map(|i| files[i].clone()).collect();
            files.sort_by(|a, b| a.path.cmp(&b.path));
            Cluster { files }
        })
        .collect();

    clusters.sort_by(|a, b| a.files[0].path.cmp(&b.files[0].path));

    log::debug!(
        "Aggregated {} matching pairs into {} clusters",
        edges.len(),
        clusters.len()
    );

    clusters
}
