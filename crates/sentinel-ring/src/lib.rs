//! Sentinel-anchored intrusive circular doubly-linked ring.
//!
//! A ring is anchored by a *sentinel* [`RingLink`] that never carries data.
//! Data nodes embed their own `RingLink` and are threaded between the
//! sentinel's `next` and `prev` pointers:
//!
//! ```text
//!   +---------------------------------------------+
//!   v                                             |
//! sentinel <-> node0 <-> node1 <-> ... <-> nodeN -+
//! ```
//!
//! An empty ring is a sentinel pointing at itself in both directions.
//! Every node in a ring satisfies `node.next.prev == node` and
//! `node.prev.next == node`; [`RingOps::is_consistent`] checks that.
//!
//! Nodes outside any ring have both pointers `None`, so linkage is a
//! checkable state. Every relinking operation here unlinks first.
//!
//! # Example
//!
//! ```rust
//! use sentinel_ring::{container_of, RingLink, RingOps};
//! use std::ptr::NonNull;
//!
//! struct Node {
//!     link: RingLink,
//!     value: i32,
//! }
//!
//! let ops = RingOps::new();
//! let head = RingLink::new();
//! let a = Node { link: RingLink::new(), value: 1 };
//! let b = Node { link: RingLink::new(), value: 2 };
//!
//! unsafe {
//!     let head = NonNull::from(&head);
//!     ops.init(head);
//!     ops.insert_before(head, NonNull::from(&a.link));
//!     ops.insert_before(head, NonNull::from(&b.link));
//!
//!     let mut seen = Vec::new();
//!     ops.for_each(head, |link| {
//!         let node: *const Node = container_of!(link.as_ptr(), Node, link);
//!         seen.push((*node).value);
//!     });
//!     assert_eq!(seen, vec![1, 2]);
//!     assert_eq!(ops.count(head), 2);
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

use core::cell::Cell;
use core::fmt;
use core::ptr::NonNull;

// =============================================================================
// RingLink
// =============================================================================

/// Intrusive link that places an object in a sentinel-anchored ring.
///
/// When unlinked, both `next` and `prev` are `None`. A sentinel is always
/// linked: once initialised it points at itself or at ring members.
#[repr(C)]
pub struct RingLink {
    next: Cell<Option<NonNull<RingLink>>>,
    prev: Cell<Option<NonNull<RingLink>>>,
}

impl RingLink {
    /// Creates a new unlinked `RingLink`.
    #[inline]
    pub const fn new() -> RingLink {
        RingLink {
            next: Cell::new(None),
            prev: Cell::new(None),
        }
    }

    /// Checks whether the link is part of a ring.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.next.get().is_some()
    }

    /// Forcibly marks this link as unlinked.
    ///
    /// # Safety
    ///
    /// Neighbouring nodes are not updated. Only call this once the node
    /// has already been spliced out of its ring.
    #[inline]
    pub unsafe fn force_unlink(&self) {
        self.next.set(None);
        self.prev.set(None);
    }

    /// Gets the next link pointer.
    #[inline]
    pub fn next(&self) -> Option<NonNull<RingLink>> {
        self.next.get()
    }

    /// Gets the previous link pointer.
    #[inline]
    pub fn prev(&self) -> Option<NonNull<RingLink>> {
        self.prev.get()
    }

    #[inline]
    fn set_next(&self, next: NonNull<RingLink>) {
        self.next.set(Some(next));
    }

    #[inline]
    fn set_prev(&self, prev: NonNull<RingLink>) {
        self.prev.set(Some(prev));
    }
}

impl Default for RingLink {
    #[inline]
    fn default() -> Self {
        RingLink::new()
    }
}

impl Clone for RingLink {
    /// Cloning a link creates a new unlinked link.
    #[inline]
    fn clone(&self) -> Self {
        RingLink::new()
    }
}

impl fmt::Debug for RingLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_linked() {
            write!(f, "RingLink(linked)")
        } else {
            write!(f, "RingLink(unlinked)")
        }
    }
}

// A RingLink can be sent to another thread together with the ring that owns it.
unsafe impl Send for RingLink {}

// =============================================================================
// RingOps
// =============================================================================

/// Operations on sentinel-anchored rings of [`RingLink`]s.
///
/// Methods taking a `head` expect a sentinel (or, for [`cut_position`],
/// any linked node acting as the start of the range).
///
/// # Safety
///
/// Most methods are unsafe because they operate on raw pointers.
/// The caller must ensure:
/// - Pointers are valid and properly aligned for the duration of the call
/// - Nodes being inserted are unlinked, nodes being moved or removed are linked
/// - No other reference observes the ring while it is being mutated
///
/// [`cut_position`]: RingOps::cut_position
#[derive(Clone, Copy, Default, Debug)]
pub struct RingOps;

impl RingOps {
    /// Creates a new `RingOps`.
    #[inline]
    pub const fn new() -> Self {
        RingOps
    }

    /// Checks if a node is linked.
    #[inline]
    pub fn is_linked(&self, ptr: NonNull<RingLink>) -> bool {
        unsafe { ptr.as_ref().is_linked() }
    }

    /// Turns `head` into an empty ring.
    ///
    /// Any previous linkage of `head` is forgotten, so this also resets a
    /// sentinel whose members have all been moved elsewhere.
    ///
    /// # Safety
    ///
    /// The pointer must be valid. If `head` still anchored members, they are
    /// left dangling.
    #[inline]
    pub unsafe fn init(&self, head: NonNull<RingLink>) {
        head.as_ref().set_next(head);
        head.as_ref().set_prev(head);
    }

    /// Gets the node after `ptr`.
    ///
    /// # Safety
    ///
    /// The pointer must be valid and linked.
    #[inline]
    pub unsafe fn next(&self, ptr: NonNull<RingLink>) -> NonNull<RingLink> {
        debug_assert!(ptr.as_ref().is_linked(), "node is not linked");
        ptr.as_ref().next().unwrap_unchecked()
    }

    /// Gets the node before `ptr`.
    ///
    /// # Safety
    ///
    /// The pointer must be valid and linked.
    #[inline]
    pub unsafe fn prev(&self, ptr: NonNull<RingLink>) -> NonNull<RingLink> {
        debug_assert!(ptr.as_ref().is_linked(), "node is not linked");
        ptr.as_ref().prev().unwrap_unchecked()
    }

    /// Returns `true` if the ring anchored at `head` has no members.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised sentinel.
    #[inline]
    pub unsafe fn is_empty(&self, head: NonNull<RingLink>) -> bool {
        self.next(head) == head
    }

    /// Returns `true` if the ring anchored at `head` has exactly one member.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised sentinel.
    #[inline]
    pub unsafe fn is_singular(&self, head: NonNull<RingLink>) -> bool {
        !self.is_empty(head) && self.next(head) == self.prev(head)
    }

    /// First member of the ring, or `None` if empty.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised sentinel.
    #[inline]
    pub unsafe fn first(&self, head: NonNull<RingLink>) -> Option<NonNull<RingLink>> {
        let first = self.next(head);
        (first != head).then_some(first)
    }

    /// Last member of the ring, or `None` if empty.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised sentinel.
    #[inline]
    pub unsafe fn last(&self, head: NonNull<RingLink>) -> Option<NonNull<RingLink>> {
        let last = self.prev(head);
        (last != head).then_some(last)
    }

    /// Member at zero-based `index`, walking forward from `head`.
    ///
    /// O(index). Returns `None` when the ring is shorter than `index + 1`.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised sentinel.
    pub unsafe fn nth(&self, head: NonNull<RingLink>, index: usize) -> Option<NonNull<RingLink>> {
        let mut current = self.next(head);
        for _ in 0..index {
            if current == head {
                return None;
            }
            current = self.next(current);
        }
        (current != head).then_some(current)
    }

    /// Inserts `new` immediately after `at`.
    ///
    /// # Safety
    ///
    /// - `at` must be linked
    /// - `new` must NOT be linked
    #[inline]
    pub unsafe fn insert_after(&self, at: NonNull<RingLink>, new: NonNull<RingLink>) {
        debug_assert!(!new.as_ref().is_linked(), "new is already linked");

        let next = self.next(at);

        at.as_ref().set_next(new);
        new.as_ref().set_prev(at);
        new.as_ref().set_next(next);
        next.as_ref().set_prev(new);
    }

    /// Inserts `new` immediately before `at`.
    ///
    /// # Safety
    ///
    /// - `at` must be linked
    /// - `new` must NOT be linked
    #[inline]
    pub unsafe fn insert_before(&self, at: NonNull<RingLink>, new: NonNull<RingLink>) {
        debug_assert!(!new.as_ref().is_linked(), "new is already linked");

        let prev = self.prev(at);

        at.as_ref().set_prev(new);
        new.as_ref().set_next(at);
        new.as_ref().set_prev(prev);
        prev.as_ref().set_next(new);
    }

    /// Removes a node from its ring and marks it unlinked.
    ///
    /// # Safety
    ///
    /// The node must be a linked ring member, not the sentinel of a ring
    /// that is still in use.
    #[inline]
    pub unsafe fn remove(&self, ptr: NonNull<RingLink>) {
        let next = self.next(ptr);
        let prev = self.prev(ptr);

        prev.as_ref().set_next(next);
        next.as_ref().set_prev(prev);
        ptr.as_ref().force_unlink();
    }

    /// Puts `new` in the slot occupied by `old`; `old` ends up unlinked.
    ///
    /// # Safety
    ///
    /// - `old` must be linked
    /// - `new` must NOT be linked
    #[inline]
    pub unsafe fn replace(&self, old: NonNull<RingLink>, new: NonNull<RingLink>) {
        debug_assert!(!new.as_ref().is_linked(), "new is already linked");

        let next = self.next(old);
        let prev = self.prev(old);

        new.as_ref().set_next(next);
        next.as_ref().set_prev(new);
        new.as_ref().set_prev(prev);
        prev.as_ref().set_next(new);
        old.as_ref().force_unlink();
    }

    /// Unlinks `node` and reinserts it right after `at`.
    ///
    /// `at` may belong to a different ring.
    ///
    /// # Safety
    ///
    /// Both nodes must be linked and distinct.
    #[inline]
    pub unsafe fn move_after(&self, node: NonNull<RingLink>, at: NonNull<RingLink>) {
        debug_assert!(node != at, "cannot move a node relative to itself");
        self.remove(node);
        self.insert_after(at, node);
    }

    /// Unlinks `node` and reinserts it right before `at`.
    ///
    /// # Safety
    ///
    /// Both nodes must be linked and distinct.
    #[inline]
    pub unsafe fn move_before(&self, node: NonNull<RingLink>, at: NonNull<RingLink>) {
        debug_assert!(node != at, "cannot move a node relative to itself");
        self.remove(node);
        self.insert_before(at, node);
    }

    /// Exchanges the positions of `a` and `b`.
    ///
    /// `b` takes `a`'s slot and `a` takes the slot `b` left behind. When the
    /// two are adjacent (in either order) the pair simply trades places.
    ///
    /// # Safety
    ///
    /// Both nodes must be linked members of the same ring.
    pub unsafe fn swap(&self, a: NonNull<RingLink>, b: NonNull<RingLink>) {
        if a == b {
            return;
        }

        let mut pos = self.prev(b);
        self.remove(b);
        self.replace(a, b);
        if pos == a {
            pos = b;
        }
        self.insert_after(pos, a);
    }

    /// Moves every member of the ring `list` to just after `at`, keeping
    /// their order, and leaves `list` empty.
    ///
    /// # Safety
    ///
    /// `list` must be an initialised sentinel, `at` must be linked and must
    /// not be a member of `list`.
    pub unsafe fn splice_after(&self, list: NonNull<RingLink>, at: NonNull<RingLink>) {
        if self.is_empty(list) {
            return;
        }

        // Before:
        //   list: list <-> first <-> ... <-> last <-> list
        //   dest: ... <-> at <-> at_next <-> ...
        //
        // After:
        //   dest: ... <-> at <-> first <-> ... <-> last <-> at_next <-> ...
        //   list: list <-> list
        let first = self.next(list);
        let last = self.prev(list);
        let at_next = self.next(at);

        at.as_ref().set_next(first);
        first.as_ref().set_prev(at);
        last.as_ref().set_next(at_next);
        at_next.as_ref().set_prev(last);

        self.init(list);
    }

    /// Moves every member of the ring `list` to just before `at`, keeping
    /// their order, and leaves `list` empty.
    ///
    /// With `at` a sentinel this appends `list` to the tail of that ring.
    ///
    /// # Safety
    ///
    /// Same requirements as [`splice_after`](RingOps::splice_after).
    #[inline]
    pub unsafe fn splice_before(&self, list: NonNull<RingLink>, at: NonNull<RingLink>) {
        self.splice_after(list, self.prev(at));
    }

    /// Moves the range `head.next ..= entry` into the empty ring `dst`.
    ///
    /// `head` may be a sentinel or any linked node; in the latter case the
    /// range starts right after it. Nothing moves when the range is empty
    /// (`entry == head`).
    ///
    /// # Safety
    ///
    /// - `dst` must be an initialised, empty sentinel
    /// - `entry` must be reachable from `head` going forward without passing
    ///   the ring's sentinel
    pub unsafe fn cut_position(
        &self,
        dst: NonNull<RingLink>,
        head: NonNull<RingLink>,
        entry: NonNull<RingLink>,
    ) {
        debug_assert!(self.is_empty(dst), "cut destination is not empty");

        if entry == head || self.next(head) == head {
            return;
        }

        let first = self.next(head);
        let after = self.next(entry);

        dst.as_ref().set_next(first);
        first.as_ref().set_prev(dst);
        dst.as_ref().set_prev(entry);
        entry.as_ref().set_next(dst);

        head.as_ref().set_next(after);
        after.as_ref().set_prev(head);
    }

    /// Counts the members of the ring, excluding the sentinel.
    ///
    /// This is O(n) - use sparingly.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised sentinel.
    pub unsafe fn count(&self, head: NonNull<RingLink>) -> usize {
        let mut count = 0;
        let mut current = self.next(head);

        while current != head {
            count += 1;
            current = self.next(current);
        }

        count
    }

    /// Calls `f` for every member of the ring, head to tail.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised sentinel.
    /// The callback must not modify the ring structure.
    pub unsafe fn for_each<F>(&self, head: NonNull<RingLink>, mut f: F)
    where
        F: FnMut(NonNull<RingLink>),
    {
        let mut current = self.next(head);

        while current != head {
            f(current);
            current = self.next(current);
        }
    }

    /// Verifies `node.next.prev == node` and `node.prev.next == node` for the
    /// sentinel and every member, and that a forward walk returns to `head`.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised sentinel whose members are all valid.
    pub unsafe fn is_consistent(&self, head: NonNull<RingLink>) -> bool {
        let mut current = head;
        loop {
            let (Some(next), Some(prev)) = (current.as_ref().next(), current.as_ref().prev())
            else {
                return false;
            };
            if next.as_ref().prev() != Some(current) || prev.as_ref().next() != Some(current) {
                return false;
            }
            current = next;
            if current == head {
                return true;
            }
        }
    }
}

// =============================================================================
// Container recovery
// =============================================================================

/// Recovers a pointer to the struct embedding a `RingLink` field.
///
/// # Example
///
/// ```rust
/// use sentinel_ring::{container_of, RingLink};
/// use std::ptr::NonNull;
///
/// struct Node {
///     value: i32,
///     link: RingLink,
/// }
///
/// let node = Node { value: 42, link: RingLink::new() };
/// let link_ptr = NonNull::from(&node.link);
///
/// unsafe {
///     let node_ptr: *const Node = container_of!(link_ptr.as_ptr(), Node, link);
///     assert_eq!((*node_ptr).value, 42);
/// }
/// ```
#[macro_export]
macro_rules! container_of {
    ($ptr:expr, $type:ty, $field:ident) => {{
        let ptr = $ptr as *const u8;
        let offset = core::mem::offset_of!($type, $field);
        ptr.sub(offset) as *const $type
    }};
}

/// Mutable version of `container_of`.
#[macro_export]
macro_rules! container_of_mut {
    ($ptr:expr, $type:ty, $field:ident) => {{
        let ptr = $ptr as *mut u8;
        let offset = core::mem::offset_of!($type, $field);
        ptr.sub(offset) as *mut $type
    }};
}

// =============================================================================
// Tests
// =============================================================================
