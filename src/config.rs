//! Pluggable algorithm choices.
//!
//! Some operations are built on top of other whole-ring algorithms: k-group
//! reversal reverses each group with one of the reversal variants, and the
//! chain merge sorts its accumulator with one of the sorting engines. These
//! enums select which one, and [`Strategies`] bundles them.

use std::ptr::NonNull;

use sentinel_ring::RingLink;

use crate::sort::{self, Comparator};
use crate::transform;

/// Which full-reversal algorithm to apply to a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReverseStrategy {
    /// Move each node to the front in turn.
    #[default]
    Iterative,
    /// Recursive front insertion; stack depth grows with the ring length.
    Recursive,
    /// Swap the outermost pair and walk inward.
    Bidirectional,
}

impl ReverseStrategy {
    /// All variants, for exhaustive testing and benchmarking.
    pub const ALL: [ReverseStrategy; 3] = [
        ReverseStrategy::Iterative,
        ReverseStrategy::Recursive,
        ReverseStrategy::Bidirectional,
    ];

    /// Reverses the ring anchored at `head`.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised sentinel whose members are elements.
    pub(crate) unsafe fn apply(self, head: NonNull<RingLink>) {
        match self {
            ReverseStrategy::Iterative => transform::reverse_ring(head),
            ReverseStrategy::Recursive => transform::reverse_ring_recursive(head),
            ReverseStrategy::Bidirectional => transform::reverse_ring_bidirectional(head),
        }
    }
}

/// Which sorting engine to run over a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortStrategy {
    /// Recursive top-down merge sort split at the middle node.
    #[default]
    MergeSort,
    /// Iterative bottom-up merge sort with a fixed set of run buckets.
    BottomUp,
}

impl SortStrategy {
    /// All variants, for exhaustive testing and benchmarking.
    pub const ALL: [SortStrategy; 2] = [SortStrategy::MergeSort, SortStrategy::BottomUp];

    /// Sorts the ring anchored at `head` with `cmp`.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised sentinel whose members are elements.
    pub(crate) unsafe fn apply<C>(self, head: NonNull<RingLink>, cmp: &C)
    where
        C: Comparator + ?Sized,
    {
        match self {
            SortStrategy::MergeSort => sort::merge_sort(head, cmp),
            SortStrategy::BottomUp => sort::bottom_up_sort(head, cmp),
        }
    }
}

/// Algorithm selection for composite operations.
///
/// # Example
///
/// ```rust
/// use ring_queue::{ReverseStrategy, SortStrategy, Strategies};
///
/// let strategies = Strategies::default()
///     .with_reverse(ReverseStrategy::Bidirectional)
///     .with_sort(SortStrategy::BottomUp);
/// assert_eq!(strategies.reverse, ReverseStrategy::Bidirectional);
/// assert_eq!(strategies.sort, SortStrategy::BottomUp);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Strategies {
    /// Reversal used for each group by [`Chain::reverse_k`](crate::Chain::reverse_k).
    pub reverse: ReverseStrategy,
    /// Sorting engine used by the chain merge.
    pub sort: SortStrategy,
}

impl Strategies {
    /// Replaces the reversal strategy.
    pub fn with_reverse(mut self, reverse: ReverseStrategy) -> Self {
        self.reverse = reverse;
        self
    }

    /// Replaces the sorting strategy.
    pub fn with_sort(mut self, sort: SortStrategy) -> Self {
        self.sort = sort;
        self
    }
}
