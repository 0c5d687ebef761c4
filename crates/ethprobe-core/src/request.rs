//! JSON-RPC 2.0 wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every probe call uses this id; there is never more than one request in flight.
pub const REQUEST_ID: u64 = 1;

/// JSON-RPC request ID — string, number, or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(u64),
    String(String),
    #[default]
    Null,
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: RpcId,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: RpcId::Number(REQUEST_ID),
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: RpcId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id: RpcId::Number(REQUEST_ID),
            result: Some(result),
            error: None,
        }
    }

    /// Decode a response body, rejecting JSON that is not a JSON-RPC 2.0
    /// envelope: `jsonrpc` must be `"2.0"` and the object must carry a
    /// `result` key (possibly `null`) or a non-null `error`.
    pub fn from_slice(body: &[u8]) -> Result<Self, String> {
        let value: Value = serde_json::from_slice(body).map_err(|e| e.to_string())?;
        let obj = value
            .as_object()
            .ok_or_else(|| format!("expected a JSON-RPC object, got {value}"))?;
        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            return Err(format!("not a JSON-RPC 2.0 envelope: {value}"));
        }
        let has_error = obj.get("error").is_some_and(|e| !e.is_null());
        if !obj.contains_key("result") && !has_error {
            return Err(format!("envelope has neither result nor error: {value}"));
        }
        serde_json::from_value(value).map_err(|e| e.to_string())
    }

    /// Unwrap the result value or return the error envelope.
    ///
    /// A missing or `null` result without an error is returned as `Value::Null`;
    /// callers decide whether that shape is acceptable.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(self.result.unwrap_or(Value::Null))
        }
    }
}
