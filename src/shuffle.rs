//! Random permutations of a queue.
//!
//! Both algorithms draw from a caller-supplied [`Rng`]; the queue never
//! seeds or owns a random source. Seed the generator yourself (for example
//! `StdRng::seed_from_u64`) for reproducible results.

use std::ptr::NonNull;

use rand::Rng;
use sentinel_ring::RingLink;
use tracing::debug;

use crate::queue::{Queue, OPS};

impl Queue {
    /// Shuffles by repeated uniform draws.
    ///
    /// Each step picks one of the remaining elements uniformly at random and
    /// moves it to the tail of a result ring; when the queue is exhausted the
    /// result is spliced back. Every permutation is equally likely under an
    /// unbiased `rng`. O(n²) walking, no allocation.
    ///
    /// ```rust
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use ring_queue::Queue;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let mut queue = Queue::try_from_iter(["a", "b", "c", "d"]).unwrap();
    /// queue.shuffle(&mut rng);
    ///
    /// let mut values: Vec<_> = queue.iter().collect();
    /// values.sort();
    /// assert_eq!(values, ["a", "b", "c", "d"]);
    /// ```
    pub fn shuffle<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let head = self.head();
        let result = RingLink::new();
        let result = NonNull::from(&result);

        unsafe {
            if OPS.is_empty(head) || OPS.is_singular(head) {
                return;
            }
            OPS.init(result);

            let mut remaining = OPS.count(head);
            while remaining > 0 {
                let index = rng.gen_range(0..remaining);
                if let Some(node) = OPS.nth(head, index) {
                    OPS.move_before(node, result);
                }
                remaining -= 1;
            }

            OPS.splice_before(result, head);
        }

        debug!("shuffled queue by draws");
        self.check_ring();
    }

    /// Shuffles in place, Fisher–Yates style, from the tail inward.
    ///
    /// For each position `i` from the last down to the second, a position
    /// `j` in `0..=i` is drawn and the two nodes exchange slots. Every
    /// permutation is equally likely under an unbiased `rng`. O(n²)
    /// walking, no allocation.
    pub fn shuffle_in_place<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let head = self.head();

        unsafe {
            if OPS.is_empty(head) || OPS.is_singular(head) {
                return;
            }

            let len = OPS.count(head);
            let mut current = OPS.prev(head);
            for i in (1..len).rev() {
                let j = rng.gen_range(0..=i);
                if let Some(chosen) = OPS.nth(head, j) {
                    if chosen != current {
                        OPS.swap(current, chosen);
                        // `chosen` now sits at position `i`.
                        current = chosen;
                    }
                }
                current = OPS.prev(current);
            }
        }

        debug!("shuffled queue in place");
        self.check_ring();
    }
}
