//! Recursive van Emde Boas node.
//!
//! A node over the universe `[0, bound)` caches its two extremes in `min` and
//! `max` and routes every other value `x` to the cluster `x >> shift`, which
//! stores `x & lo_mask`. The `summary` node stores the indices of the
//! non-empty clusters, so it answers "next/previous populated cluster" with
//! the same algorithms one level down.
//!
//! Clusters and the summary are created on demand and dropped as soon as they
//! become empty:
//!
//! | `len` | shape                                        |
//! |-------|----------------------------------------------|
//! | 0     | `min == max == EMPTY`, no children           |
//! | 1     | `min == max`, no children                    |
//! | 2     | `min < max`, no children                     |
//! | >= 3  | `min < max`, `len - 2` values in clusters    |

use std::collections::hash_map::Entry;
use std::collections::HashMap;

// =============================================================================
// Configuration
// =============================================================================

/// Sentinel stored in `min`/`max` of an empty node.
///
/// Universes are bounded by `u32::MAX`, so the sentinel is never a storable
/// value and compares unequal to every valid argument.
pub(crate) const EMPTY: u32 = u32::MAX;

// =============================================================================
// Node
// =============================================================================

#[derive(Clone, Debug)]
pub(crate) struct Node {
    bound: u32,
    /// Number of low-order bits routed into a cluster.
    shift: u32,
    lo_mask: u32,
    pub(crate) min: u32,
    pub(crate) max: u32,
    pub(crate) len: u32,
    /// Cluster index -> cluster over `[0, 1 << shift)`.
    pub(crate) clusters: HashMap<u32, Node>,
    /// Set of populated cluster indices, present iff `clusters` is non-empty.
    pub(crate) summary: Option<Box<Node>>,
}

impl Node {
    pub(crate) fn new(bound: u32) -> Self {
        debug_assert!(bound > 0);
        let shift = bound.ilog2() / 2;
        Self {
            bound,
            shift,
            lo_mask: (1u32 << shift) - 1,
            min: EMPTY,
            max: EMPTY,
            len: 0,
            clusters: HashMap::new(),
            summary: None,
        }
    }

    #[inline]
    pub(crate) fn bound(&self) -> u32 {
        self.bound
    }

    #[inline]
    pub(crate) fn shift(&self) -> u32 {
        self.shift
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Universe of every cluster.
    #[inline]
    pub(crate) fn cluster_size(&self) -> u32 {
        1u32 << self.shift
    }

    /// Universe of the summary: the number of clusters needed to cover `bound`.
    #[inline]
    pub(crate) fn row_count(&self) -> u32 {
        self.bound.div_ceil(self.cluster_size())
    }

    #[inline]
    fn split(&self, x: u32) -> (u32, u32) {
        (x >> self.shift, x & self.lo_mask)
    }

    #[inline]
    fn join(&self, high: u32, low: u32) -> u32 {
        (high << self.shift) | low
    }

    #[inline]
    fn summary(&self) -> &Node {
        self.summary
            .as_deref()
            .expect("node with clusters must have a summary")
    }

    pub(crate) fn clear(&mut self) {
        self.min = EMPTY;
        self.max = EMPTY;
        self.len = 0;
        self.clusters = HashMap::new();
        self.summary = None;
    }
}

// =============================================================================
// Mutation
// =============================================================================

impl Node {
    /// Inserts `x`, returning whether it was not already present.
    pub(crate) fn insert(&mut self, mut x: u32) -> bool {
        if x == self.min || x == self.max {
            return false;
        }
        if self.len == 0 {
            self.min = x;
            self.max = x;
            self.len = 1;
            return true;
        }

        // A new extreme takes the slot; the displaced extreme goes down instead.
        if x < self.min {
            std::mem::swap(&mut self.min, &mut x);
        } else if x > self.max {
            std::mem::swap(&mut self.max, &mut x);
        }

        if self.len == 1 {
            self.len = 2;
            return true;
        }

        let (high, low) = self.split(x);
        let cluster_size = self.cluster_size();
        let row_count = self.row_count();
        let cluster = match self.clusters.entry(high) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(bound = self.bound, high, "cluster: CREATE");

                self.summary
                    .get_or_insert_with(|| Box::new(Node::new(row_count)))
                    .insert(high);
                e.insert(Node::new(cluster_size))
            }
        };

        let added = cluster.insert(low);
        if added {
            self.len += 1;
        }
        added
    }

    /// Removes `x`, returning whether it was present.
    pub(crate) fn remove(&mut self, x: u32) -> bool {
        let (high, low) = if x == self.min {
            match self.len {
                1 => {
                    self.clear();
                    return true;
                }
                2 => {
                    self.min = self.max;
                    self.len = 1;
                    return true;
                }
                _ => {}
            }
            // Pull the smallest clustered value up into `min`.
            let high = self.summary().min;
            let low = self.clusters[&high].min;
            self.min = self.join(high, low);
            (high, low)
        } else if x == self.max {
            match self.len {
                1 => {
                    self.clear();
                    return true;
                }
                2 => {
                    self.max = self.min;
                    self.len = 1;
                    return true;
                }
                _ => {}
            }
            let high = self.summary().max;
            let low = self.clusters[&high].max;
            self.max = self.join(high, low);
            (high, low)
        } else {
            let (high, low) = self.split(x);
            if !self.clusters.contains_key(&high) {
                return false;
            }
            (high, low)
        };

        let cluster = self
            .clusters
            .get_mut(&high)
            .expect("cluster selected for removal must exist");
        let removed = cluster.remove(low);
        if cluster.is_empty() {
            self.clusters.remove(&high);
            self.prune_summary(high);
        }
        if removed {
            self.len -= 1;
        }
        removed
    }

    fn prune_summary(&mut self, high: u32) {
        #[cfg(feature = "tracing")]
        tracing::trace!(bound = self.bound, high, "cluster: PRUNE");

        let summary = self
            .summary
            .as_deref_mut()
            .expect("node with clusters must have a summary");
        summary.remove(high);
        if summary.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::trace!(bound = self.bound, "summary: DROP");

            self.summary = None;
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

impl Node {
    pub(crate) fn contains(&self, mut x: u32) -> bool {
        let mut node = self;
        loop {
            if x == node.min || x == node.max {
                return true;
            }
            let (high, low) = node.split(x);
            match node.clusters.get(&high) {
                Some(cluster) => {
                    node = cluster;
                    x = low;
                }
                None => return false,
            }
        }
    }

    /// Smallest stored value `>= x`. The node must be non-empty.
    pub(crate) fn next(&self, mut x: u32) -> Option<u32> {
        debug_assert!(!self.is_empty());
        let mut node = self;
        let mut hi = 0u32;
        loop {
            if x <= node.min {
                return Some(hi | node.min);
            }

            let (high, low) = node.split(x);
            if let Some(cluster) = node.clusters.get(&high) {
                if low <= cluster.max {
                    hi |= high << node.shift;
                    node = cluster;
                    x = low;
                    continue;
                }
            }

            // Nothing at or after `x` inside its own cluster; jump to the next populated one.
            let found = match node.summary.as_deref() {
                Some(summary) if high + 1 < summary.bound => summary.next(high + 1),
                _ => None,
            };
            return match found {
                Some(k) => Some(hi | node.join(k, node.clusters[&k].min)),
                None => (x <= node.max).then_some(hi | node.max),
            };
        }
    }

    /// Largest stored value `<= x`. The node must be non-empty.
    pub(crate) fn prev(&self, mut x: u32) -> Option<u32> {
        debug_assert!(!self.is_empty());
        let mut node = self;
        let mut hi = 0u32;
        loop {
            if x >= node.max {
                return Some(hi | node.max);
            }

            let (high, low) = node.split(x);
            if let Some(cluster) = node.clusters.get(&high) {
                if low >= cluster.min {
                    hi |= high << node.shift;
                    node = cluster;
                    x = low;
                    continue;
                }
            }

            let found = match node.summary.as_deref() {
                Some(summary) if high > 0 => summary.prev(high - 1),
                _ => None,
            };
            return match found {
                Some(k) => Some(hi | node.join(k, node.clusters[&k].max)),
                None => (x >= node.min).then_some(hi | node.min),
            };
        }
    }
}
