//! Sorting engine: stable top-down and bottom-up merge sorts over a ring.
//!
//! Both engines compare payloads through a [`Comparator`]. [`SortOrder`]
//! is the built-in byte-wise lexicographic comparator; any
//! `Fn(&str, &str) -> Ordering` can be injected instead.
//!
//! Merging always takes from the left run on ties, so equal payloads keep
//! their original relative order.

use std::cmp::Ordering;
use std::ptr::NonNull;

use sentinel_ring::RingLink;
use tracing::debug;

use crate::queue::{middle, value_of, Queue, OPS};

/// A two-argument ordering over payloads.
pub trait Comparator {
    /// Compares two payloads.
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

impl<F> Comparator for F
where
    F: Fn(&str, &str) -> Ordering + ?Sized,
{
    #[inline]
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

/// Direction of the built-in lexicographic comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Smallest payload first (byte-wise, like `strcmp`).
    #[default]
    Ascending,
    /// Largest payload first.
    Descending,
}

impl SortOrder {
    /// Maps a "descending" flag to an order.
    #[inline]
    pub fn from_descending(descend: bool) -> Self {
        if descend {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}

impl Comparator for SortOrder {
    #[inline]
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            SortOrder::Ascending => a.as_bytes().cmp(b.as_bytes()),
            SortOrder::Descending => b.as_bytes().cmp(a.as_bytes()),
        }
    }
}

/// Merges the sorted rings `left` and `right` onto the tail of `out`.
///
/// Both inputs end empty. Ties go to `left`.
///
/// # Safety
///
/// All three must be distinct initialised sentinels; `left` and `right`
/// must hold elements.
pub(crate) unsafe fn merge_into<C>(
    left: NonNull<RingLink>,
    right: NonNull<RingLink>,
    out: NonNull<RingLink>,
    cmp: &C,
) where
    C: Comparator + ?Sized,
{
    while let (Some(l), Some(r)) = (OPS.first(left), OPS.first(right)) {
        let take = if cmp.compare(value_of(l), value_of(r)) != Ordering::Greater {
            l
        } else {
            r
        };
        OPS.move_before(take, out);
    }

    let rest = if OPS.is_empty(left) { right } else { left };
    OPS.splice_before(rest, out);
}

/// Top-down merge sort.
///
/// Splits after the slow/fast middle node (the left half gets the extra
/// element on odd lengths), sorts both halves recursively and merges them.
/// Recursion depth is ⌈log2 n⌉.
///
/// # Safety
///
/// `head` must be an initialised sentinel holding elements.
pub(crate) unsafe fn merge_sort<C>(head: NonNull<RingLink>, cmp: &C)
where
    C: Comparator + ?Sized,
{
    if OPS.is_empty(head) || OPS.is_singular(head) {
        return;
    }

    let left = RingLink::new();
    let left = NonNull::from(&left);
    let sorted = RingLink::new();
    let sorted = NonNull::from(&sorted);
    OPS.init(left);
    OPS.init(sorted);

    OPS.cut_position(left, head, middle(head));
    merge_sort(left, cmp);
    merge_sort(head, cmp);

    merge_into(left, head, sorted, cmp);
    OPS.splice_before(sorted, head);
}

/// One bucket per bit of the element count, plus one for the carry slot.
const BUCKETS: usize = usize::BITS as usize + 1;

/// Bottom-up merge sort driven by a binary counter of sorted runs.
///
/// Elements are taken from the front one at a time. Bucket `i` holds either
/// nothing or a sorted run of 2^i elements; a new element ripples upward
/// merging with full buckets like a carry. Lower buckets always hold newer
/// elements than higher ones, so every merge passes the higher (older)
/// bucket as the left run and the sort is stable. No recursion and no heap
/// allocation: the buckets are stack sentinels.
///
/// # Safety
///
/// `head` must be an initialised sentinel holding elements.
pub(crate) unsafe fn bottom_up_sort<C>(head: NonNull<RingLink>, cmp: &C)
where
    C: Comparator + ?Sized,
{
    if OPS.is_empty(head) || OPS.is_singular(head) {
        return;
    }

    let carry = RingLink::new();
    let carry = NonNull::from(&carry);
    let scratch = RingLink::new();
    let scratch = NonNull::from(&scratch);
    let buckets: [RingLink; BUCKETS] = std::array::from_fn(|_| RingLink::new());
    let bucket = |i: usize| NonNull::from(&buckets[i]);

    OPS.init(carry);
    OPS.init(scratch);
    for i in 0..BUCKETS {
        OPS.init(bucket(i));
    }

    let mut fill = 0;
    while let Some(first) = OPS.first(head) {
        OPS.move_after(first, carry);

        let mut i = 0;
        while i < fill && !OPS.is_empty(bucket(i)) {
            merge_into(bucket(i), carry, scratch, cmp);
            OPS.splice_after(scratch, carry);
            i += 1;
        }
        OPS.splice_after(carry, bucket(i));
        if i == fill {
            fill += 1;
        }
    }

    for i in 1..fill {
        merge_into(bucket(i), bucket(i - 1), scratch, cmp);
        OPS.splice_after(scratch, bucket(i));
    }
    OPS.splice_after(bucket(fill - 1), head);
}

impl Queue {
    /// Sorts the queue by payload, stable, with the top-down merge sort.
    pub fn sort(&mut self, order: SortOrder) {
        self.merge_sort_by(&order);
        debug!(?order, "sorted queue");
    }

    /// Top-down merge sort with an injected comparator.
    pub fn merge_sort_by<C>(&mut self, cmp: &C)
    where
        C: Comparator + ?Sized,
    {
        unsafe { merge_sort(self.head(), cmp) };
        self.check_ring();
    }

    /// Stable sort with an injected comparator, using the iterative
    /// bottom-up engine.
    ///
    /// Orders exactly like [`merge_sort_by`](Queue::merge_sort_by) and
    /// [`sort`](Queue::sort), without recursion.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ring_queue::{Queue, SortOrder};
    ///
    /// let mut queue = Queue::try_from_iter(["ccc", "a", "bb"]).unwrap();
    /// queue.sort_by(&|a: &str, b: &str| a.len().cmp(&b.len()));
    /// assert_eq!(queue.to_string(), "[a bb ccc]");
    ///
    /// queue.sort_by(&SortOrder::Descending);
    /// assert_eq!(queue.to_string(), "[ccc bb a]");
    /// ```
    pub fn sort_by<C>(&mut self, cmp: &C)
    where
        C: Comparator + ?Sized,
    {
        unsafe { bottom_up_sort(self.head(), cmp) };
        self.check_ring();
    }
}
