//! Batch send orchestration
//!
//! Splits a recipient list into fixed-size batches, sends each batch
//! concurrently over one transport and pauses between batches to stay under
//! provider rate limits.

pub mod dispatcher;
pub mod types;

pub use dispatcher::BatchDispatcher;
pub use types::{
    DeliveryOutcome, DispatchOptions, SendReport, SendRequest, DEFAULT_BATCH_DELAY,
    DEFAULT_BATCH_SIZE,
};
