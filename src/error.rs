use thiserror::Error;

/// Errors reported by the checked [`VebTree`](crate::VebTree) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VebError {
    /// A tree was requested over the empty universe.
    #[error("universe bound must be greater than zero")]
    ZeroBound,
    /// A value was not below the universe bound.
    #[error("value {value} is outside the universe [0, {bound})")]
    OutOfRange {
        /// The rejected value.
        value: u32,
        /// Exclusive upper limit of the tree's universe.
        bound: u32,
    },
}
