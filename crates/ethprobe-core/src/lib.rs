//! ethprobe-core — foundation types for the ethprobe node health check.
//!
//! # Overview
//!
//! - [`RpcTransport`] — the async seam every JSON-RPC transport implements
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`] — wire types
//! - [`ProbeError`] — transport / protocol / format error taxonomy
//! - [`hex`] — Ethereum hex quantity codec
//! - [`policy`] — fixed-delay retry
//! - [`ProbeConfig`] — run configuration

pub mod config;
pub mod error;
pub mod hex;
pub mod policy;
pub mod request;
pub mod transport;

pub use config::ProbeConfig;
pub use error::{ErrorClass, FormatError, ProbeError};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use transport::{Reachability, RpcTransport};
