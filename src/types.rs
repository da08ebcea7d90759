use serde::{de, Deserialize, Deserializer};
use std::fmt;

/// 32-byte block or transaction identifier, hex encoded on the wire.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Self(out))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Hash256::from_hex(&s).map_err(|e| de::Error::custom(format!("invalid 32-byte hex: {e}")))
    }
}

/// `json-minimal-chain_main` payload: `ids[0]` sits at `first_height`, its parent is `first_prev_id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MinimalChain {
    pub first_height: u64,
    pub first_prev_id: Hash256,
    pub ids: Vec<Hash256>,
}

impl MinimalChain {
    /// Height of the last id in the update.
    pub fn top_height(&self) -> u64 {
        self.first_height
            .saturating_add(self.ids.len().saturating_sub(1) as u64)
    }

    /// Newest block id in the update.
    pub fn last_id(&self) -> Option<Hash256> {
        self.ids.last().copied()
    }

    /// Parent of the newest block: `first_prev_id` for a single id, the
    /// penultimate id otherwise.
    pub fn last_prev_id(&self) -> Hash256 {
        match self.ids.len() {
            0 | 1 => self.first_prev_id,
            n => self.ids[n - 2],
        }
    }
}

/// One block from `json-full-chain_main`; only the fields the view needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Block {
    pub prev_id: Hash256,
    pub tx_hashes: Vec<Hash256>,
}

/// One entry of `json-minimal-txpool_add`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MinimalTx {
    pub id: Hash256,
}

/// `get_info` result, `result.info` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeInfo {
    pub height: u64,
    pub target_height: u64,
    #[serde(alias = "outgoing_connections")]
    pub outgoing_connections_count: u64,
    #[serde(alias = "incoming_connections")]
    pub incoming_connections_count: u64,
    pub top_block_hash: Hash256,
    pub mainnet: bool,
    pub testnet: bool,
    pub stagenet: bool,
}

impl NodeInfo {
    pub fn is_offline(&self) -> bool {
        self.outgoing_connections_count == 0 && self.incoming_connections_count == 0
    }

    /// Network label; empty when no network flag is set.
    pub fn chain_type(&self) -> &'static str {
        if self.mainnet {
            "mainnet"
        } else if self.stagenet {
            "stagenet"
        } else if self.testnet {
            "testnet"
        } else {
            ""
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetInfoResult {
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxPoolEntry {
    pub tx_hash: Hash256,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionPoolResult {
    pub transactions: Vec<TxPoolEntry>,
}
