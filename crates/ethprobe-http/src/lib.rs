//! ethprobe-http — HTTP JSON-RPC transport for ethprobe.

pub mod client;

pub use client::HttpRpcClient;
