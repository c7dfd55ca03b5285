//! The queue: a sentinel-anchored ring of [`Element`]s.
//!
//! This module holds construction, head/tail insertion and removal, size
//! queries and iteration. Whole-queue algorithms live in sibling modules and
//! extend [`Queue`] with further `impl` blocks.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use sentinel_ring::{RingLink, RingOps};
use tracing::trace;

use crate::element::Element;
use crate::error::QueueError;

/// Ring operations shared by every module of the crate.
pub(crate) const OPS: RingOps = RingOps::new();

/// A queue of owned strings on a circular doubly-linked ring.
///
/// The sentinel lives in its own heap allocation so the queue value can move
/// freely while elements keep pointing at it.
///
/// # Example
///
/// ```rust
/// use ring_queue::{Queue, SortOrder};
///
/// let mut queue = Queue::new();
/// queue.insert_tail("b").unwrap();
/// queue.insert_tail("a").unwrap();
/// queue.insert_tail("c").unwrap();
///
/// queue.sort(SortOrder::Ascending);
/// assert_eq!(queue.iter().collect::<Vec<_>>(), ["a", "b", "c"]);
///
/// let mut buf = [0u8; 8];
/// let head = queue.remove_head(Some(&mut buf)).unwrap();
/// assert_eq!(head.value(), "a");
/// assert_eq!(&buf[..2], b"a\0");
/// ```
pub struct Queue {
    head: NonNull<RingLink>,
    // Owns the elements threaded through `head`.
    _marker: PhantomData<Box<Element>>,
}

// The queue exclusively owns its sentinel and every element on it.
unsafe impl Send for Queue {}

impl Queue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let head = NonNull::from(Box::leak(Box::new(RingLink::new())));
        unsafe { OPS.init(head) };
        Queue {
            head,
            _marker: PhantomData,
        }
    }

    /// Builds a queue holding `values` in order.
    ///
    /// On allocation failure the partially built queue is dropped and the
    /// error returned.
    pub fn try_from_iter<I, S>(values: I) -> Result<Self, QueueError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut queue = Queue::new();
        for value in values {
            queue.insert_tail(value.as_ref())?;
        }
        Ok(queue)
    }

    /// The sentinel of this queue's ring.
    #[inline]
    pub(crate) fn head(&self) -> NonNull<RingLink> {
        self.head
    }

    /// Inserts a copy of `text` at the head of the queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Alloc`] if the payload could not be allocated
    /// and [`QueueError::OutOfMemory`] if the node could not; either way the
    /// queue is unchanged.
    pub fn insert_head(&mut self, text: &str) -> Result<(), QueueError> {
        let link = Element::try_new(text)?;
        unsafe { OPS.insert_after(self.head, link) };
        trace!(len = text.len(), "inserted at head");
        Ok(())
    }

    /// Inserts a copy of `text` at the tail of the queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Alloc`] if the payload could not be allocated
    /// and [`QueueError::OutOfMemory`] if the node could not; either way the
    /// queue is unchanged.
    pub fn insert_tail(&mut self, text: &str) -> Result<(), QueueError> {
        let link = Element::try_new(text)?;
        unsafe { OPS.insert_before(self.head, link) };
        trace!(len = text.len(), "inserted at tail");
        Ok(())
    }

    /// Removes the head element and hands it to the caller.
    ///
    /// If `buf` is given, the payload is copied into it truncated to
    /// `buf.len() - 1` bytes and NUL-terminated (see [`Element::copy_to`]).
    /// Returns `None` without touching `buf` when the queue is empty.
    pub fn remove_head(&mut self, buf: Option<&mut [u8]>) -> Option<Element> {
        let link = unsafe { OPS.first(self.head)? };
        Some(self.take(link, buf))
    }

    /// Removes the tail element and hands it to the caller.
    ///
    /// Buffer handling matches [`remove_head`](Queue::remove_head).
    pub fn remove_tail(&mut self, buf: Option<&mut [u8]>) -> Option<Element> {
        let link = unsafe { OPS.last(self.head)? };
        Some(self.take(link, buf))
    }

    fn take(&mut self, link: NonNull<RingLink>, buf: Option<&mut [u8]>) -> Element {
        let element = unsafe {
            OPS.remove(link);
            *Element::reclaim(link)
        };
        if let Some(buf) = buf {
            element.copy_to(buf);
        }
        trace!(len = element.value().len(), "removed element");
        element
    }

    /// Number of elements. This walks the ring, O(n).
    pub fn size(&self) -> usize {
        unsafe { OPS.count(self.head) }
    }

    /// Returns `true` if the queue holds no elements. O(1).
    #[inline]
    pub fn is_empty(&self) -> bool {
        unsafe { OPS.is_empty(self.head) }
    }

    /// Iterates over the payloads from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            head: self.head,
            current: unsafe { OPS.next(self.head) },
            _marker: PhantomData,
        }
    }

    /// Moves every element of `other` to the tail of `self`, leaving
    /// `other` empty. O(1).
    pub fn append(&mut self, other: &mut Queue) {
        unsafe { OPS.splice_before(other.head, self.head) };
    }

    /// Releases every element.
    pub fn clear(&mut self) {
        unsafe {
            while let Some(link) = OPS.first(self.head) {
                release(link);
            }
        }
    }

    /// Asserts ring consistency in debug builds and with the
    /// `check-invariants` feature.
    #[inline]
    pub(crate) fn check_ring(&self) {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        assert!(
            unsafe { OPS.is_consistent(self.head) },
            "queue ring links are inconsistent"
        );
    }
}

impl Default for Queue {
    fn default() -> Self {
        Queue::new()
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.clear();
        unsafe { drop(Box::from_raw(self.head.as_ptr())) };
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for Queue {
    /// Formats as `[a b c]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(value)?;
        }
        f.write_str("]")
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator over queue payloads, head to tail.
pub struct Iter<'a> {
    head: NonNull<RingLink>,
    current: NonNull<RingLink>,
    _marker: PhantomData<&'a Element>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.current == self.head {
            return None;
        }
        unsafe {
            let element = Element::from_link(self.current);
            self.current = OPS.next(self.current);
            Some(element.value())
        }
    }
}

/// Unlinks the element at `link` and frees it.
///
/// # Safety
///
/// `link` must be a linked element (not a sentinel) owned by a queue.
#[inline]
pub(crate) unsafe fn release(link: NonNull<RingLink>) {
    OPS.remove(link);
    drop(Element::reclaim(link));
}

/// Payload of the element at `link`.
///
/// # Safety
///
/// `link` must be a live element, which must stay alive for `'a`.
#[inline]
pub(crate) unsafe fn value_of<'a>(link: NonNull<RingLink>) -> &'a str {
    Element::from_link(link).value()
}

/// Slow/fast two-pointer walk to the middle of a ring.
///
/// The fast pointer advances two steps per step of the slow pointer and
/// stops once one or two steps would reach the sentinel, so the result is
/// element ⌊(n-1)/2⌋ (0-indexed): the last element of the left half when
/// the ring is split into halves of ⌈n/2⌉ and ⌊n/2⌋.
///
/// # Safety
///
/// `head` must be a non-empty sentinel.
pub(crate) unsafe fn middle(head: NonNull<RingLink>) -> NonNull<RingLink> {
    let mut slow = OPS.next(head);
    let mut fast = slow;
    loop {
        let step = OPS.next(fast);
        if step == head || OPS.next(step) == head {
            return slow;
        }
        fast = OPS.next(step);
        slow = OPS.next(slow);
    }
}
