//! Ascending iteration.
//!
//! A node is walked as `min`, then every clustered value, then `max`. The
//! clustered values come from walking the summary (which yields populated
//! cluster indices in order) and, for each index, walking that cluster. Both
//! nested walks are themselves [`Keys`] iterators, so the traversal is lazy at
//! every level and holds one boxed iterator per level of the summary chain and
//! per level of the cluster chain.

use std::iter::FusedIterator;

use crate::node::Node;

/// Iterator over the values of a [`VebTree`](crate::VebTree) in ascending order.
///
/// Created by [`VebTree::keys`](crate::VebTree::keys),
/// [`VebTree::values`](crate::VebTree::values) and
/// [`VebTree::iter`](crate::VebTree::iter).
pub struct Keys<'a> {
    node: &'a Node,
    /// High bits already resolved by the ancestors of `node`.
    base: u32,
    stage: Stage<'a>,
}

enum Stage<'a> {
    Min,
    Clusters {
        rows: Box<Keys<'a>>,
        /// Walk of the cluster currently being drained; reused across clusters.
        cluster: Option<Box<Keys<'a>>>,
    },
    Max,
    Done,
}

impl<'a> Keys<'a> {
    pub(crate) fn new(node: &'a Node, base: u32) -> Self {
        Self {
            node,
            base,
            stage: Stage::Min,
        }
    }
}

impl Iterator for Keys<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let node = self.node;
        loop {
            match &mut self.stage {
                Stage::Min => {
                    if node.is_empty() {
                        self.stage = Stage::Done;
                        return None;
                    }
                    self.stage = if node.min == node.max {
                        Stage::Done
                    } else {
                        match node.summary.as_deref() {
                            Some(summary) => Stage::Clusters {
                                rows: Box::new(Keys::new(summary, 0)),
                                cluster: None,
                            },
                            None => Stage::Max,
                        }
                    };
                    return Some(self.base | node.min);
                }
                Stage::Clusters { rows, cluster } => {
                    if let Some(walk) = cluster {
                        if let Some(x) = walk.next() {
                            return Some(x);
                        }
                    }
                    let Some(high) = rows.next() else {
                        self.stage = Stage::Max;
                        continue;
                    };
                    let child = &node.clusters[&high];
                    let walk = Keys::new(child, self.base | (high << node.shift()));
                    match cluster {
                        Some(boxed) => **boxed = walk,
                        None => *cluster = Some(Box::new(walk)),
                    }
                }
                Stage::Max => {
                    self.stage = Stage::Done;
                    return Some(self.base | node.max);
                }
                Stage::Done => return None,
            }
        }
    }
}

impl FusedIterator for Keys<'_> {}

/// Iterator over `(value, value)` pairs in ascending order.
///
/// Created by [`VebTree::entries`](crate::VebTree::entries).
pub struct Entries<'a> {
    keys: Keys<'a>,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(keys: Keys<'a>) -> Self {
        Self { keys }
    }
}

impl Iterator for Entries<'_> {
    type Item = (u32, u32);

    #[inline]
    fn next(&mut self) -> Option<(u32, u32)> {
        self.keys.next().map(|x| (x, x))
    }
}

impl FusedIterator for Entries<'_> {}
