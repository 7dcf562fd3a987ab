//! # veb-rs
//!
//! An ordered set of `u32` values from a fixed universe `[0, bound)`, stored
//! in a van Emde Boas tree.
//!
//! Insert, remove, membership and successor/predecessor queries run in
//! `O(log log bound)`. Sub-structure is allocated lazily, so memory grows with
//! the number of stored values rather than with `bound`.
//!
//! ## Example
//!
//! ```rust
//! use veb_rs::VebTree;
//!
//! let mut set = VebTree::new(64);
//! set.insert(5);
//! set.insert(12);
//! set.insert(40);
//!
//! assert!(set.contains(12));
//! assert_eq!(set.next(6), Some(12));
//! assert_eq!(set.prev(39), Some(12));
//! assert_eq!(set.keys().collect::<Vec<_>>(), vec![5, 12, 40]);
//!
//! set.remove(12);
//! assert_eq!(set.next(6), Some(40));
//! assert_eq!(set.len(), 2);
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `trace` events when clusters and summaries are created
//!   or pruned.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod iter;
mod node;

pub use error::VebError;
pub use iter::{Entries, Keys};

use node::Node;

/// Ordered set over the universe `[0, bound)`.
///
/// The largest supported universe is `[0, u32::MAX)`.
///
/// Values outside the universe are never stored: [`insert`](Self::insert)
/// panics on them, [`try_insert`](Self::try_insert) reports them, and the
/// read-only queries treat them as absent.
#[derive(Clone)]
pub struct VebTree {
    root: Node,
}

impl VebTree {
    /// Creates an empty set over `[0, bound)`.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero.
    pub fn new(bound: u32) -> Self {
        match Self::try_new(bound) {
            Ok(tree) => tree,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates an empty set over `[0, bound)`, rejecting an empty universe.
    pub fn try_new(bound: u32) -> Result<Self, VebError> {
        if bound == 0 {
            return Err(VebError::ZeroBound);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(bound, "veb: NEW");

        Ok(Self {
            root: Node::new(bound),
        })
    }

    /// Exclusive upper limit of the universe.
    #[inline]
    pub fn bound(&self) -> u32 {
        self.root.bound()
    }

    /// Number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.root.len as usize
    }

    /// Whether the set holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Adds `x` to the set. Returns `true` if it was not already present.
    ///
    /// # Panics
    ///
    /// Panics if `x >= self.bound()`.
    pub fn insert(&mut self, x: u32) -> bool {
        match self.try_insert(x) {
            Ok(added) => added,
            Err(err) => panic!("{err}"),
        }
    }

    /// Adds `x` to the set, reporting values outside the universe instead of
    /// panicking. The set is unchanged on error.
    pub fn try_insert(&mut self, x: u32) -> Result<bool, VebError> {
        self.check(x)?;
        Ok(self.root.insert(x))
    }

    /// Removes `x` from the set. Returns `true` if it was present.
    pub fn remove(&mut self, x: u32) -> bool {
        x < self.bound() && self.root.remove(x)
    }

    /// Whether `x` is in the set.
    #[inline]
    pub fn contains(&self, x: u32) -> bool {
        x < self.bound() && self.root.contains(x)
    }

    /// Smallest stored value `>= x`.
    pub fn next(&self, x: u32) -> Option<u32> {
        if self.is_empty() || x >= self.bound() {
            return None;
        }
        self.root.next(x)
    }

    /// Largest stored value `<= x`.
    pub fn prev(&self, x: u32) -> Option<u32> {
        if self.is_empty() {
            return None;
        }
        self.root.prev(x.min(self.bound() - 1))
    }

    /// Smallest stored value.
    #[inline]
    pub fn min(&self) -> Option<u32> {
        (!self.is_empty()).then_some(self.root.min)
    }

    /// Largest stored value.
    #[inline]
    pub fn max(&self) -> Option<u32> {
        (!self.is_empty()).then_some(self.root.max)
    }

    /// Removes every value, releasing all clusters.
    pub fn clear(&mut self) {
        self.root.clear();
    }

    /// Values in ascending order.
    pub fn keys(&self) -> Keys<'_> {
        Keys::new(&self.root, 0)
    }

    /// Same as [`keys`](Self::keys).
    pub fn values(&self) -> Keys<'_> {
        self.keys()
    }

    /// `(value, value)` pairs in ascending order.
    pub fn entries(&self) -> Entries<'_> {
        Entries::new(self.keys())
    }

    /// Same as [`keys`](Self::keys).
    pub fn iter(&self) -> Keys<'_> {
        self.keys()
    }

    fn check(&self, x: u32) -> Result<(), VebError> {
        if x < self.bound() {
            Ok(())
        } else {
            Err(VebError::OutOfRange {
                value: x,
                bound: self.bound(),
            })
        }
    }
}

impl<'a> IntoIterator for &'a VebTree {
    type Item = u32;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Keys<'a> {
        self.keys()
    }
}

impl Extend<u32> for VebTree {
    /// # Panics
    ///
    /// Panics on the first value outside the universe.
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        for x in iter {
            self.insert(x);
        }
    }
}

impl std::fmt::Debug for VebTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}


#[cfg(test)]
mod proptests;
