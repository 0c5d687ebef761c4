//! The `RpcTransport` trait — the seam between probes and the wire.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProbeError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// Outcome of the pre-flight reachability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reachability {
    /// The endpoint answered with a status below 500.
    Reachable { status: u16 },
    /// Connection failed or the endpoint answered with a 5xx status.
    Unreachable { reason: String },
}

impl Reachability {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable { .. })
    }
}

/// A JSON-RPC transport bound to one endpoint.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Box<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Send a single JSON-RPC request and return the response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, ProbeError>;

    /// Lightweight liveness check performed before any JSON-RPC call.
    async fn reachability(&self) -> Reachability {
        Reachability::Reachable { status: 200 }
    }

    /// Return the transport's identifier (URL or name).
    fn url(&self) -> &str;

    /// Convenience: call a method and return the raw result value.
    ///
    /// An error envelope is returned as [`ProbeError::Rpc`], never as a result.
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, ProbeError> {
        let req = JsonRpcRequest::new(method, params);
        let resp = self.send(req).await?;
        resp.into_result().map_err(ProbeError::Rpc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::JsonRpcError;

    struct Canned(JsonRpcResponse);

    #[async_trait]
    impl RpcTransport for Canned {
        async fn send(&self, _req: JsonRpcRequest) -> Result<JsonRpcResponse, ProbeError> {
            Ok(self.0.clone())
        }
        fn url(&self) -> &str {
            "canned"
        }
    }

    #[tokio::test]
    async fn call_returns_result() {
        let t = Canned(JsonRpcResponse::success(Value::String("0x3".into())));
        assert_eq!(t.call("net_peerCount", vec![]).await.unwrap(), "0x3");
        assert!(t.reachability().await.is_reachable());
    }

    #[tokio::test]
    async fn call_surfaces_error_envelope() {
        let mut resp = JsonRpcResponse::success(Value::Null);
        resp.error = Some(JsonRpcError {
            code: -32000,
            message: "boom".into(),
            data: None,
        });
        let err = Canned(resp).call("eth_blockNumber", vec![]).await.unwrap_err();
        assert!(matches!(err, ProbeError::Rpc(ref e) if e.code == -32000));
    }
}
