//! Filtering passes that release elements: duplicate runs and dominated
//! values.

use tracing::debug;

use crate::queue::{release, value_of, Queue, OPS};

impl Queue {
    /// Deletes every element that belongs to a run of equal adjacent
    /// payloads, including the run's first member. On a sorted queue this
    /// leaves only the values that occurred exactly once.
    ///
    /// Returns `false` on an empty queue.
    ///
    /// ```rust
    /// use ring_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["a", "a", "b", "c", "c", "c", "d"]).unwrap();
    /// assert!(queue.delete_dup());
    /// assert_eq!(queue.to_string(), "[b d]");
    /// ```
    pub fn delete_dup(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }

        let head = self.head();
        let mut removed = 0usize;
        unsafe {
            let mut in_run = false;
            let mut node = OPS.next(head);
            while node != head {
                let next = OPS.next(node);
                if next != head && value_of(node) == value_of(next) {
                    in_run = true;
                    release(node);
                    removed += 1;
                } else if in_run {
                    in_run = false;
                    release(node);
                    removed += 1;
                }
                node = next;
            }
        }

        debug!(removed, "deleted duplicate runs");
        self.check_ring();
        true
    }

    /// Keeps only elements strictly greater than everything before them,
    /// scanning head to tail. Returns the number of survivors.
    ///
    /// The running maximum starts at the empty string, so empty payloads
    /// never survive. Survivors are strictly increasing.
    ///
    /// ```rust
    /// use ring_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["2", "1", "3", "3", "5", "4"]).unwrap();
    /// assert_eq!(queue.ascend(), 3);
    /// assert_eq!(queue.to_string(), "[2 3 5]");
    /// ```
    pub fn ascend(&mut self) -> usize {
        let head = self.head();
        let mut survivors = 0usize;
        unsafe {
            // Survivors are never released during the pass, so borrowing
            // the running maximum from one is sound.
            let mut max: &str = "";
            let mut node = OPS.next(head);
            while node != head {
                let next = OPS.next(node);
                let value = value_of(node);
                if value > max {
                    max = value;
                    survivors += 1;
                } else {
                    release(node);
                }
                node = next;
            }
        }

        debug!(survivors, "ascend filter");
        self.check_ring();
        survivors
    }

    /// Keeps only elements strictly greater than everything after them,
    /// scanning tail to head. Returns the number of survivors.
    ///
    /// Survivors read as a strictly decreasing sequence from head to tail,
    /// ending with the maximum. Empty payloads never survive.
    ///
    /// ```rust
    /// use ring_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["e", "b", "m", "c", "h"]).unwrap();
    /// assert_eq!(queue.descend(), 2);
    /// assert_eq!(queue.to_string(), "[m h]");
    /// ```
    pub fn descend(&mut self) -> usize {
        let head = self.head();
        let mut survivors = 0usize;
        unsafe {
            let mut max: &str = "";
            let mut node = OPS.prev(head);
            while node != head {
                let prev = OPS.prev(node);
                let value = value_of(node);
                if value > max {
                    max = value;
                    survivors += 1;
                } else {
                    release(node);
                }
                node = prev;
            }
        }

        debug!(survivors, "descend filter");
        self.check_ring();
        survivors
    }
}
