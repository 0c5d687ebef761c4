//! HTTP JSON-RPC client backed by `reqwest`.
//!
//! Features:
//! - Fixed-delay retry for transport faults
//! - JSON-RPC error envelopes returned without retrying
//! - Pre-flight reachability GET with its own short timeout
//! - Optional dump of request/response bodies to stdout

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use ethprobe_core::config::ProbeConfig;
use ethprobe_core::error::ProbeError;
use ethprobe_core::policy::RetryPolicy;
use ethprobe_core::request::{JsonRpcRequest, JsonRpcResponse};
use ethprobe_core::transport::{Reachability, RpcTransport};

/// HTTP JSON-RPC client bound to a single endpoint.
pub struct HttpRpcClient {
    url: String,
    http: reqwest::Client,
    retry: RetryPolicy,
    request_timeout: Duration,
    reachability_timeout: Duration,
    debug: bool,
}

impl HttpRpcClient {
    /// Create a client for `url` using the timeouts, retry and debug settings
    /// from `config`.
    pub fn new(url: impl Into<String>, config: &ProbeConfig) -> Result<Self, ProbeError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ProbeError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            http,
            retry: RetryPolicy::new(config.retry.clone()),
            request_timeout: config.timeout,
            reachability_timeout: config.reachability_timeout,
            debug: config.debug,
        })
    }

    /// Create a client for the configured execution endpoint.
    pub fn for_execution(config: &ProbeConfig) -> Result<Self, ProbeError> {
        Self::new(config.execution_url.clone(), config)
    }

    async fn send_once(&self, body: &[u8]) -> Result<JsonRpcResponse, ProbeError> {
        let resp = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.request_timeout)
            .body(body.to_vec())
            .send()
            .await
            .map_err(|e| transport_error(e, self.request_timeout))?;

        let status = resp.status();
        if self.debug {
            println!("DEBUG: Response status: {status}");
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProbeError::Http(format!("HTTP {}: {body}", status.as_u16())));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| transport_error(e, self.request_timeout))?;
        if self.debug {
            println!("DEBUG: Response body: {}", String::from_utf8_lossy(&bytes));
        }

        let mut envelope = JsonRpcResponse::from_slice(&bytes).map_err(ProbeError::Malformed)?;
        if let Some(err) = envelope.error.take() {
            return Err(ProbeError::Rpc(err));
        }
        Ok(envelope)
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, ProbeError> {
        let body = serde_json::to_vec(&req)?;
        if self.debug {
            println!(
                "DEBUG: Sending request to {}\nMethod: {}\nRequest body: {}",
                self.url,
                req.method,
                String::from_utf8_lossy(&body)
            );
        }
        tracing::debug!(method = %req.method, url = %self.url, "sending request");

        self.retry
            .run(&req.method, |_attempt| self.send_once(&body))
            .await
    }

    async fn reachability(&self) -> Reachability {
        let result = self
            .http
            .get(&self.url)
            .timeout(self.reachability_timeout)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().as_u16() < 500 => Reachability::Reachable {
                status: resp.status().as_u16(),
            },
            Ok(resp) => Reachability::Unreachable {
                reason: format!("endpoint answered HTTP {}", resp.status()),
            },
            Err(e) => Reachability::Unreachable {
                reason: describe(&e),
            },
        }
    }

    fn url(&self) -> &str {
        &self.url
    }
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> ProbeError {
    if e.is_timeout() {
        ProbeError::Timeout {
            ms: timeout.as_millis() as u64,
        }
    } else {
        ProbeError::Http(describe(&e))
    }
}

/// reqwest's top-level message hides the cause ("connection refused" etc.),
/// so append the source chain.
fn describe(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethprobe_core::policy::RetryConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    // Nothing listens on port 1.
    const CLOSED_PORT_URL: &str = "http://127.0.0.1:1";

    fn config(max_retries: u32) -> ProbeConfig {
        ProbeConfig {
            timeout: Duration::from_secs(2),
            reachability_timeout: Duration::from_secs(2),
            retry: RetryConfig {
                max_retries,
                delay: Duration::ZERO,
            },
            ..ProbeConfig::default()
        }
    }

    #[tokio::test]
    async fn posts_json_rpc_and_decodes_result() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "jsonrpc": "2.0",
                        "method": "eth_blockNumber",
                        "params": [],
                        "id": 1
                    }));
                then.status(200)
                    .json_body(json!({"jsonrpc": "2.0", "id": 1, "result": "0x10"}));
            })
            .await;

        let client = HttpRpcClient::new(server.url("/"), &config(3)).unwrap();
        let result = client.call("eth_blockNumber", vec![]).await.unwrap();

        assert_eq!(result, json!("0x10"));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn error_envelope_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200).json_body(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": {"code": -32601, "message": "the method net_peerCount does not exist"}
                }));
            })
            .await;

        let client = HttpRpcClient::new(server.url("/"), &config(3)).unwrap();
        let err = client.call("net_peerCount", vec![]).await.unwrap_err();

        match err {
            ProbeError::Rpc(e) => {
                assert_eq!(e.code, -32601);
                assert!(e.message.contains("does not exist"));
            }
            other => panic!("expected Rpc, got {other:?}"),
        }
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn malformed_body_is_protocol_error() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let client = HttpRpcClient::new(server.url("/"), &config(3)).unwrap();
        let err = client.call("eth_blockNumber", vec![]).await.unwrap_err();

        assert!(matches!(err, ProbeError::Malformed(_)), "got {err:?}");
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn json_without_envelope_is_protocol_error() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200).json_body(json!({"status": "ok"}));
            })
            .await;

        let client = HttpRpcClient::new(server.url("/"), &config(3)).unwrap();
        let err = client.call("eth_blockNumber", vec![]).await.unwrap_err();

        assert!(matches!(err, ProbeError::Malformed(_)), "got {err:?}");
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn null_result_is_accepted() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200)
                    .json_body(json!({"jsonrpc": "2.0", "id": 1, "result": null}));
            })
            .await;

        let client = HttpRpcClient::new(server.url("/"), &config(0)).unwrap();
        let result = client.call("eth_getBlockByNumber", vec![]).await.unwrap();
        assert!(result.is_null());
    }

    #[tokio::test]
    async fn recovers_after_transient_server_errors() {
        let server = MockServer::start_async().await;
        // Registered first, so it wins while it exists.
        let mut failing = server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(503).body("warming up");
            })
            .await;
        let ok = server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200)
                    .json_body(json!({"jsonrpc": "2.0", "id": 1, "result": "0x10"}));
            })
            .await;

        let mut cfg = config(3);
        cfg.retry.delay = Duration::from_millis(300);
        let client = HttpRpcClient::new(server.url("/"), &cfg).unwrap();

        // Take the failing endpoint away after two hits, between attempts.
        let failures = async {
            loop {
                let hits = failing.hits_async().await;
                if hits >= 2 {
                    failing.delete_async().await;
                    return hits;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        let (result, failed_hits) =
            tokio::join!(client.call("eth_blockNumber", vec![]), failures);

        assert_eq!(result.unwrap(), json!("0x10"));
        assert_eq!(failed_hits, 2);
        ok.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn server_errors_are_retried_until_exhausted() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(503).body("upstream unavailable");
            })
            .await;

        let client = HttpRpcClient::new(server.url("/"), &config(2)).unwrap();
        let err = client.call("eth_blockNumber", vec![]).await.unwrap_err();

        match err {
            ProbeError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(last.to_string().contains("HTTP 503"), "last: {last}");
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
        mock.assert_hits_async(3).await;
    }

    #[tokio::test]
    async fn connection_refused_is_retried() {
        let client = HttpRpcClient::new(CLOSED_PORT_URL, &config(1)).unwrap();
        let err = client.call("eth_blockNumber", vec![]).await.unwrap_err();

        match err {
            ProbeError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 2);
                assert!(matches!(*last, ProbeError::Http(_)), "last: {last:?}");
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"}));
            })
            .await;

        let mut cfg = config(0);
        cfg.timeout = Duration::from_millis(50);
        let client = HttpRpcClient::new(server.url("/"), &cfg).unwrap();
        let err = client.call("eth_blockNumber", vec![]).await.unwrap_err();

        match err {
            ProbeError::Exhausted { attempts: 1, last } => {
                assert!(matches!(*last, ProbeError::Timeout { ms: 50 }), "last: {last:?}");
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reachable_below_500() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/");
                then.status(405);
            })
            .await;

        let client = HttpRpcClient::new(server.url("/"), &config(0)).unwrap();
        assert_eq!(
            client.reachability().await,
            Reachability::Reachable { status: 405 }
        );
    }

    #[tokio::test]
    async fn unreachable_on_5xx() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/");
                then.status(502);
            })
            .await;

        let client = HttpRpcClient::new(server.url("/"), &config(0)).unwrap();
        let reach = client.reachability().await;
        assert!(!reach.is_reachable());
        assert!(matches!(reach, Reachability::Unreachable { reason } if reason.contains("502")));
    }

    #[tokio::test]
    async fn unreachable_on_connection_failure() {
        let client = HttpRpcClient::new(CLOSED_PORT_URL, &config(0)).unwrap();
        assert!(!client.reachability().await.is_reachable());
    }
}
