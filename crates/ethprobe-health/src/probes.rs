//! Narrow node queries built on [`RpcTransport`].
//!
//! Each probe issues exactly one call and checks the shape of its result
//! before converting it. An unexpected shape is a [`FormatError`] naming the
//! field that was being read.

use serde_json::{json, Value};

use ethprobe_core::error::{FormatError, ProbeError};
use ethprobe_core::hex::{hex_to_u64, u64_to_hex};
use ethprobe_core::transport::RpcTransport;

/// Progress reported by `eth_syncing` while the node is catching up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncProgress {
    pub current: u64,
    pub highest: u64,
}

impl SyncProgress {
    /// Percentage of `highest` reached, 0 when the head is not yet known.
    pub fn percent(&self) -> f64 {
        if self.highest == 0 {
            return 0.0;
        }
        self.current as f64 / self.highest as f64 * 100.0
    }
}

/// Decoded `eth_syncing` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Synced,
    Syncing(SyncProgress),
}

impl SyncStatus {
    pub fn is_syncing(&self) -> bool {
        matches!(self, Self::Syncing(_))
    }

    pub fn progress(&self) -> Option<SyncProgress> {
        match self {
            Self::Synced => None,
            Self::Syncing(p) => Some(*p),
        }
    }
}

/// Network id from `net_version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkId(pub String);

impl NetworkId {
    /// Human-readable name. Informational only.
    pub fn name(&self) -> &'static str {
        match self.0.as_str() {
            "1" => "Ethereum Mainnet",
            "5" => "Goerli Testnet",
            "11155111" => "Sepolia Testnet",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (ID: {})", self.name(), self.0)
    }
}

/// Node queries over a borrowed transport.
pub struct NodeProbes<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: RpcTransport + ?Sized> NodeProbes<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// `web3_clientVersion` — free-form client identifier.
    pub async fn client_version(&self) -> Result<String, ProbeError> {
        let value = self.transport.call("web3_clientVersion", vec![]).await?;
        Ok(expect_str(&value, "clientVersion")?.to_string())
    }

    /// `eth_blockNumber` — current head.
    pub async fn latest_block_number(&self) -> Result<u64, ProbeError> {
        let value = self.transport.call("eth_blockNumber", vec![]).await?;
        Ok(expect_quantity(&value, "blockNumber")?)
    }

    /// `net_peerCount` — connected peers.
    pub async fn peer_count(&self) -> Result<u64, ProbeError> {
        let value = self.transport.call("net_peerCount", vec![]).await?;
        Ok(expect_quantity(&value, "peerCount")?)
    }

    /// `eth_syncing` — `false`, or an object with `currentBlock`/`highestBlock`.
    pub async fn sync_status(&self) -> Result<SyncStatus, ProbeError> {
        let value = self.transport.call("eth_syncing", vec![]).await?;
        Ok(decode_sync_status(&value)?)
    }

    /// `net_version` — decimal network id as a string.
    pub async fn network_id(&self) -> Result<NetworkId, ProbeError> {
        let value = self.transport.call("net_version", vec![]).await?;
        Ok(NetworkId(expect_str(&value, "networkId")?.to_string()))
    }

    /// `eth_getBlockByNumber` — block timestamp in Unix seconds.
    pub async fn block_timestamp(&self, number: u64) -> Result<u64, ProbeError> {
        let value = self
            .transport
            .call("eth_getBlockByNumber", vec![json!(u64_to_hex(number)), json!(false)])
            .await?;
        let block = match &value {
            Value::Object(block) => block,
            Value::Null => {
                return Err(FormatError::new("block", format!("block {number} not found")).into())
            }
            other => return Err(unexpected("block", "an object", other).into()),
        };
        let timestamp = block
            .get("timestamp")
            .ok_or_else(|| FormatError::new("timestamp", "missing from block"))?;
        Ok(expect_quantity(timestamp, "timestamp")?)
    }
}

fn decode_sync_status(value: &Value) -> Result<SyncStatus, FormatError> {
    match value {
        Value::Bool(false) => Ok(SyncStatus::Synced),
        Value::Object(progress) => {
            let field = |name: &str| {
                progress
                    .get(name)
                    .ok_or_else(|| FormatError::new(name, "missing from sync status"))
                    .and_then(|v| expect_quantity(v, name))
            };
            Ok(SyncStatus::Syncing(SyncProgress {
                current: field("currentBlock")?,
                highest: field("highestBlock")?,
            }))
        }
        other => Err(unexpected("syncStatus", "false or an object", other)),
    }
}

fn expect_str<'v>(value: &'v Value, field: &str) -> Result<&'v str, FormatError> {
    value
        .as_str()
        .ok_or_else(|| unexpected(field, "a string", value))
}

fn expect_quantity(value: &Value, field: &str) -> Result<u64, FormatError> {
    let s = expect_str(value, field)?;
    hex_to_u64(s).map_err(|e| e.in_field(field))
}

fn unexpected(field: &str, expected: &str, got: &Value) -> FormatError {
    FormatError::new(field, format!("expected {expected}, got {got}"))
}
