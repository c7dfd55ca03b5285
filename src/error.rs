//! Error type for queue and chain operations

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors reported by fallible queue and chain operations.
///
/// Operations on an empty queue are not errors: they return a neutral value
/// (`None`, `false` or `0`) and leave the queue untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Copying the payload into owned storage failed. Nothing was linked.
    #[error("failed to allocate element payload: {0}")]
    Alloc(#[from] TryReserveError),

    /// The element node itself could not be allocated. Nothing was linked.
    #[error("failed to allocate queue element")]
    OutOfMemory,

    /// No queue with this id is held by the chain.
    #[error("chain has no queue with id {0}")]
    UnknownQueue(usize),
}
