//! String Queues on a Sentinel Ring
//!
//! This crate provides a queue of owned strings stored on a circular
//! doubly-linked list with a sentinel node, together with a set of in-place
//! list algorithms that only relink nodes and never copy payloads.
//!
//! # Features
//!
//! - **Queue basics**: O(1) insert/remove at either end, O(n) size
//! - **Deletion**: middle element, runs of adjacent duplicates
//! - **Reordering**: pair swaps, three full reversals, k-group reversal
//! - **Sorting**: stable top-down merge sort and an iterative bottom-up
//!   engine driven by any [`Comparator`]
//! - **Filters**: `ascend`/`descend` keep strictly dominating values
//! - **Chains**: merge any number of queues into one sorted queue
//! - **Shuffles**: two uniform permutations driven by a caller's `Rng`
//!
//! # Example
//!
//! ```rust
//! use ring_queue::{Queue, SortOrder};
//!
//! let mut queue = Queue::try_from_iter(["pear", "apple", "fig", "apple"]).unwrap();
//! queue.sort(SortOrder::Ascending);
//! assert_eq!(queue.to_string(), "[apple apple fig pear]");
//!
//! queue.delete_dup();
//! queue.reverse();
//! assert_eq!(queue.to_string(), "[pear fig]");
//! ```

pub mod chain;
pub mod config;
mod dot;
pub mod element;
pub mod error;
mod filter;
pub mod queue;
mod shuffle;
pub mod sort;
mod transform;

pub use chain::{Chain, ChainIter, QueueContext};
pub use config::{ReverseStrategy, SortStrategy, Strategies};
pub use element::Element;
pub use error::QueueError;
pub use queue::{Iter, Queue};
pub use sort::{Comparator, SortOrder};
