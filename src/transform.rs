//! Structural transforms: middle deletion, pair swaps and reversals.
//!
//! None of these allocate or copy payloads; they only relink nodes. The
//! ring-level functions work on any sentinel so that k-group reversal can
//! apply them to a detached sub-ring.

use std::ptr::NonNull;

use sentinel_ring::RingLink;
use tracing::debug;

use crate::config::ReverseStrategy;
use crate::queue::{middle, release, Queue, OPS};

/// Reverses a ring by moving every node, in order, to the front.
///
/// # Safety
///
/// `head` must be an initialised sentinel.
pub(crate) unsafe fn reverse_ring(head: NonNull<RingLink>) {
    let mut node = OPS.next(head);
    while node != head {
        let next = OPS.next(node);
        OPS.move_after(node, head);
        node = next;
    }
}

/// Reverses a ring with one recursive call per node.
///
/// # Safety
///
/// `head` must be an initialised sentinel. Stack usage is linear in the ring
/// length.
pub(crate) unsafe fn reverse_ring_recursive(head: NonNull<RingLink>) {
    reverse_from(OPS.next(head), head);
}

unsafe fn reverse_from(node: NonNull<RingLink>, head: NonNull<RingLink>) {
    if node == head {
        return;
    }
    let next = OPS.next(node);
    OPS.move_after(node, head);
    reverse_from(next, head);
}

/// Reverses a ring by swapping nodes from both ends, walking inward.
///
/// Stops when the cursors meet on the middle node (odd length) or right
/// after swapping the two middle nodes (even length).
///
/// # Safety
///
/// `head` must be an initialised sentinel.
pub(crate) unsafe fn reverse_ring_bidirectional(head: NonNull<RingLink>) {
    let mut front = OPS.next(head);
    let mut back = OPS.prev(head);

    while front != head && front != back {
        let front_next = OPS.next(front);
        let back_prev = OPS.prev(back);
        let adjacent = front_next == back;

        OPS.swap(front, back);
        if adjacent {
            break;
        }

        front = front_next;
        back = back_prev;
    }
}

impl Queue {
    /// Deletes the middle element: the ⌈n/2⌉-th counting from one, so the
    /// first of the two middles when the length is even.
    ///
    /// Returns `false` on an empty queue.
    pub fn delete_mid(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        unsafe { release(middle(self.head())) };
        self.check_ring();
        true
    }

    /// Swaps every two adjacent elements by moving the second of each pair
    /// in front of the first. A trailing odd element stays in place.
    pub fn swap_pairs(&mut self) {
        let head = self.head();
        unsafe {
            let mut node = OPS.next(head);
            while node != head {
                let second = OPS.next(node);
                if second == head {
                    break;
                }
                OPS.move_before(second, node);
                node = OPS.next(node);
            }
        }
        self.check_ring();
    }

    /// Swaps every two adjacent elements by exchanging the nodes' slots.
    ///
    /// Produces the same order as [`swap_pairs`](Queue::swap_pairs), using
    /// the ring's two-node exchange instead of a single move.
    pub fn swap_pairs_positional(&mut self) {
        let head = self.head();
        unsafe {
            let mut node = OPS.next(head);
            while node != head {
                let second = OPS.next(node);
                if second == head {
                    break;
                }
                OPS.swap(second, node);
                node = OPS.next(node);
            }
        }
        self.check_ring();
    }

    /// Reverses the queue in O(n) time and O(1) space.
    pub fn reverse(&mut self) {
        unsafe { reverse_ring(self.head()) };
        self.check_ring();
    }

    /// Reverses the queue recursively.
    ///
    /// Same result as [`reverse`](Queue::reverse), but every element costs
    /// one stack frame: very long queues can overflow the thread's stack.
    pub fn reverse_recursive(&mut self) {
        unsafe { reverse_ring_recursive(self.head()) };
        self.check_ring();
    }

    /// Reverses the queue by exchanging elements from both ends inward,
    /// with about half the relinking of [`reverse`](Queue::reverse).
    pub fn reverse_bidirectional(&mut self) {
        unsafe { reverse_ring_bidirectional(self.head()) };
        self.check_ring();
    }

    /// Reverses every complete run of `k` consecutive elements; a shorter
    /// trailing run keeps its order. `k <= 1` is a no-op.
    pub fn reverse_k(&mut self, k: usize) {
        self.reverse_k_with(k, ReverseStrategy::default());
    }

    /// [`reverse_k`](Queue::reverse_k) with an explicit reversal algorithm
    /// for each group.
    pub fn reverse_k_with(&mut self, k: usize, strategy: ReverseStrategy) {
        if k <= 1 {
            return;
        }

        let head = self.head();
        let group = RingLink::new();
        let group = NonNull::from(&group);
        let mut groups = 0usize;

        unsafe {
            OPS.init(group);

            let mut anchor = head;
            let mut count = 0;
            let mut node = OPS.next(head);
            while node != head {
                let next = OPS.next(node);
                count += 1;
                if count == k {
                    OPS.cut_position(group, anchor, node);
                    strategy.apply(group);
                    OPS.splice_after(group, anchor);
                    anchor = OPS.prev(next);
                    count = 0;
                    groups += 1;
                }
                node = next;
            }
        }

        debug!(k, groups, ?strategy, "reversed k-groups");
        self.check_ring();
    }
}
