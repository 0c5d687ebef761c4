//! Retry policy for JSON-RPC calls.
//!
//! ```text
//! Request → [RetryPolicy] → [Transport]
//! ```

pub mod retry;

pub use retry::{RetryConfig, RetryPolicy};
