//! A chain of queues and the multi-queue merge.
//!
//! The chain is itself a sentinel ring: each [`QueueContext`] embeds a link
//! into the chain next to the [`Queue`] it owns. Merging drains every queue
//! into a single sorted run held by the first one.

use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use sentinel_ring::{container_of, container_of_mut, RingLink};
use tracing::debug;

use crate::config::{ReverseStrategy, SortStrategy, Strategies};
use crate::error::QueueError;
use crate::queue::{Queue, OPS};
use crate::sort::SortOrder;

/// One entry of a [`Chain`]: a queue plus its numeric id.
#[repr(C)]
pub struct QueueContext {
    chain: RingLink,
    queue: Queue,
    id: usize,
}

impl QueueContext {
    /// Id assigned by the chain when the queue was pushed.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// The queue held by this entry.
    #[inline]
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Mutable access to the queue held by this entry.
    #[inline]
    pub fn queue_mut(&mut self) -> &mut Queue {
        &mut self.queue
    }

    fn boxed(queue: Queue, id: usize) -> NonNull<RingLink> {
        let context = Box::into_raw(Box::new(QueueContext {
            chain: RingLink::new(),
            queue,
            id,
        }));
        unsafe { NonNull::new_unchecked(ptr::addr_of_mut!((*context).chain)) }
    }

    /// # Safety
    ///
    /// `link` must be the chain link of a live context.
    unsafe fn from_link<'a>(link: NonNull<RingLink>) -> &'a QueueContext {
        &*container_of!(link.as_ptr(), QueueContext, chain)
    }

    /// # Safety
    ///
    /// `link` must be the chain link of a live context, not aliased for `'a`.
    unsafe fn from_link_mut<'a>(link: NonNull<RingLink>) -> &'a mut QueueContext {
        &mut *container_of_mut!(link.as_ptr(), QueueContext, chain)
    }

    /// # Safety
    ///
    /// `link` must be the chain link of an unlinked context allocated by
    /// [`boxed`](QueueContext::boxed).
    unsafe fn reclaim(link: NonNull<RingLink>) -> Box<QueueContext> {
        Box::from_raw(container_of_mut!(link.as_ptr(), QueueContext, chain))
    }
}

impl std::fmt::Debug for QueueContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueContext")
            .field("id", &self.id)
            .field("queue", &self.queue)
            .finish()
    }
}

/// An ordered collection of queues linked through a sentinel ring.
///
/// # Example
///
/// ```rust
/// use ring_queue::{Chain, Queue, SortOrder};
///
/// let mut chain = Chain::new();
/// let first = chain.push(Queue::try_from_iter(["5", "1", "3"]).unwrap());
/// let second = chain.push(Queue::try_from_iter(["4", "2"]).unwrap());
///
/// assert_eq!(chain.merge(SortOrder::Ascending), 5);
/// assert_eq!(chain.get(first).unwrap().to_string(), "[1 2 3 4 5]");
/// assert!(chain.get(second).unwrap().is_empty());
/// ```
pub struct Chain {
    head: NonNull<RingLink>,
    next_id: usize,
    strategies: Strategies,
    _marker: PhantomData<Box<QueueContext>>,
}

// The chain exclusively owns its sentinel and every context on it.
unsafe impl Send for Chain {}

impl Chain {
    /// Creates an empty chain with default strategies.
    pub fn new() -> Self {
        Chain::with_strategies(Strategies::default())
    }

    /// Creates an empty chain with the given strategies.
    pub fn with_strategies(strategies: Strategies) -> Self {
        let head = NonNull::from(Box::leak(Box::new(RingLink::new())));
        unsafe { OPS.init(head) };
        Chain {
            head,
            next_id: 0,
            strategies,
            _marker: PhantomData,
        }
    }

    /// Strategies used by [`merge`](Chain::merge) and
    /// [`reverse_k`](Chain::reverse_k).
    #[inline]
    pub fn strategies(&self) -> Strategies {
        self.strategies
    }

    /// Appends `queue` to the end of the chain and returns its id.
    pub fn push(&mut self, queue: Queue) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        let link = QueueContext::boxed(queue, id);
        unsafe { OPS.insert_before(self.head, link) };
        debug!(id, "pushed queue onto chain");
        id
    }

    /// Appends an empty queue and returns its id.
    pub fn new_queue(&mut self) -> usize {
        self.push(Queue::new())
    }

    fn find(&self, id: usize) -> Option<NonNull<RingLink>> {
        let mut link = unsafe { OPS.next(self.head) };
        while link != self.head {
            unsafe {
                if QueueContext::from_link(link).id == id {
                    return Some(link);
                }
                link = OPS.next(link);
            }
        }
        None
    }

    /// The queue with the given id.
    pub fn get(&self, id: usize) -> Option<&Queue> {
        let link = self.find(id)?;
        Some(unsafe { &QueueContext::from_link(link).queue })
    }

    /// Mutable access to the queue with the given id.
    pub fn get_mut(&mut self, id: usize) -> Option<&mut Queue> {
        let link = self.find(id)?;
        Some(unsafe { &mut QueueContext::from_link_mut(link).queue })
    }

    /// The first entry, which receives the result of a merge.
    pub fn first(&self) -> Option<&QueueContext> {
        unsafe {
            let link = OPS.first(self.head)?;
            Some(QueueContext::from_link(link))
        }
    }

    /// Mutable access to the first entry.
    pub fn first_mut(&mut self) -> Option<&mut QueueContext> {
        unsafe {
            let link = OPS.first(self.head)?;
            Some(QueueContext::from_link_mut(link))
        }
    }

    /// Reverses every complete group of `k` elements of the queue with the
    /// given id, using the chain's reversal strategy. Returns the strategy
    /// that was applied.
    ///
    /// # Errors
    ///
    /// [`QueueError::UnknownQueue`] if no entry has that id.
    pub fn reverse_k(&mut self, id: usize, k: usize) -> Result<ReverseStrategy, QueueError> {
        let strategy = self.strategies.reverse;
        self.get_mut(id)
            .ok_or(QueueError::UnknownQueue(id))?
            .reverse_k_with(k, strategy);
        Ok(strategy)
    }

    /// Unlinks the queue with the given id and returns it.
    ///
    /// # Errors
    ///
    /// [`QueueError::UnknownQueue`] if no entry has that id.
    pub fn remove(&mut self, id: usize) -> Result<Queue, QueueError> {
        let link = self.find(id).ok_or(QueueError::UnknownQueue(id))?;
        let context = unsafe {
            OPS.remove(link);
            QueueContext::reclaim(link)
        };
        debug!(id, "removed queue from chain");
        Ok(context.queue)
    }

    /// Number of queues in the chain. O(n).
    pub fn len(&self) -> usize {
        unsafe { OPS.count(self.head) }
    }

    /// Returns `true` if the chain holds no queues.
    #[inline]
    pub fn is_empty(&self) -> bool {
        unsafe { OPS.is_empty(self.head) }
    }

    /// Iterates over the entries in chain order.
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            head: self.head,
            current: unsafe { OPS.next(self.head) },
            _marker: PhantomData,
        }
    }

    /// Sum of the sizes of every queue.
    pub fn total_size(&self) -> usize {
        self.iter().map(|context| context.queue.size()).sum()
    }

    /// Merges every queue into the first one, sorted by `order` with the
    /// chain's sort strategy. Returns the merged element count.
    ///
    /// All other queues end empty but stay on the chain. An empty chain
    /// returns 0.
    pub fn merge(&mut self, order: SortOrder) -> usize {
        self.merge_with(order, self.strategies.sort)
    }

    /// [`merge`](Chain::merge) with an explicit sorting engine.
    pub fn merge_with(&mut self, order: SortOrder, strategy: SortStrategy) -> usize {
        let head = self.head;
        let sorted = RingLink::new();
        let sorted = NonNull::from(&sorted);
        let mut queues = 0usize;

        let total = unsafe {
            let Some(first) = OPS.first(head) else {
                return 0;
            };
            OPS.init(sorted);

            let mut front = first;
            let mut back = OPS.prev(head);
            loop {
                OPS.splice_after(QueueContext::from_link(front).queue.head(), sorted);
                queues += 1;
                if front == back {
                    break;
                }
                OPS.splice_after(QueueContext::from_link(back).queue.head(), sorted);
                queues += 1;

                front = OPS.next(front);
                if front == back {
                    break;
                }
                back = OPS.prev(back);
            }

            strategy.apply(sorted, &order);
            let total = OPS.count(sorted);
            let target = &QueueContext::from_link(first).queue;
            OPS.splice_after(sorted, target.head());
            target.check_ring();
            total
        };

        debug!(queues, total, ?order, ?strategy, "merged chain");
        total
    }
}

impl Default for Chain {
    fn default() -> Self {
        Chain::new()
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        unsafe {
            while let Some(link) = OPS.first(self.head) {
                OPS.remove(link);
                drop(QueueContext::reclaim(link));
            }
            drop(Box::from_raw(self.head.as_ptr()));
        }
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a QueueContext;
    type IntoIter = ChainIter<'a>;

    fn into_iter(self) -> ChainIter<'a> {
        self.iter()
    }
}

/// Iterator over chain entries.
pub struct ChainIter<'a> {
    head: NonNull<RingLink>,
    current: NonNull<RingLink>,
    _marker: PhantomData<&'a QueueContext>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a QueueContext;

    fn next(&mut self) -> Option<&'a QueueContext> {
        if self.current == self.head {
            return None;
        }
        unsafe {
            let context = QueueContext::from_link(self.current);
            self.current = OPS.next(self.current);
            Some(context)
        }
    }
}
