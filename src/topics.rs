//! Splits received pub frames into topic and payload, and decodes the known topics.

use crate::{
    constants::topics::{FULL_CHAIN, MINIMAL_CHAIN, MINIMAL_TXPOOL},
    error::{Error, Result},
    types::{Block, MinimalChain, MinimalTx},
};

/// Subscribable topics published by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    MinimalChain,
    FullChain,
    MinimalTxpool,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::MinimalChain => MINIMAL_CHAIN,
            Topic::FullChain => FULL_CHAIN,
            Topic::MinimalTxpool => MINIMAL_TXPOOL,
        }
    }

    pub fn from_bytes(topic: &[u8]) -> Option<Self> {
        [Topic::MinimalChain, Topic::FullChain, Topic::MinimalTxpool]
            .into_iter()
            .find(|t| t.as_str().as_bytes() == topic)
    }
}

/// A received frame: `topic ':' payload`, parts already concatenated.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    raw: Vec<u8>,
    split: Option<usize>,
}

impl Frame {
    pub fn new(raw: Vec<u8>) -> Self {
        let split = raw.iter().position(|b| *b == b':');
        Self { raw, split }
    }

    /// Marker frame injected when the feed has been silent too long.
    pub fn silence() -> Self {
        Self {
            raw: Vec::new(),
            split: None,
        }
    }

    pub fn topic(&self) -> &[u8] {
        match self.split {
            Some(k) => &self.raw[..k],
            None => &[],
        }
    }

    pub fn payload(&self) -> &[u8] {
        match self.split {
            Some(k) => &self.raw[k + 1..],
            None => &[],
        }
    }

    /// True for the empty-topic, empty-payload marker.
    pub fn is_silence(&self) -> bool {
        self.topic().is_empty() && self.payload().is_empty()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("topic", &String::from_utf8_lossy(self.topic()))
            .field("payload_len", &self.payload().len())
            .finish()
    }
}

/// Decoded pub message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PubMessage {
    MinimalChain(MinimalChain),
    FullChain(Vec<Block>),
    MinimalTxpool(Vec<MinimalTx>),
    /// No-pub timeout marker (or a frame without a topic separator).
    Silence,
    /// Topic this view does not handle; discarded by the caller.
    Unknown,
}

/// Decodes a frame by topic. Malformed payloads of known topics are errors.
pub fn dispatch(frame: &Frame) -> Result<PubMessage> {
    if frame.is_silence() {
        return Ok(PubMessage::Silence);
    }

    let Some(topic) = Topic::from_bytes(frame.topic()) else {
        log::debug!(
            "discarding pub with unknown topic {:?}",
            String::from_utf8_lossy(frame.topic())
        );
        return Ok(PubMessage::Unknown);
    };

    let payload = frame.payload();
    match topic {
        Topic::MinimalChain => {
            let chain: MinimalChain = serde_json::from_slice(payload)
                .map_err(|e| Error::schema(MINIMAL_CHAIN, e))?;
            if chain.ids.is_empty() {
                return Err(Error::InvalidPayload {
                    context: MINIMAL_CHAIN,
                    reason: "field `ids` must not be empty",
                });
            }
            Ok(PubMessage::MinimalChain(chain))
        }
        Topic::FullChain => {
            let blocks: Vec<Block> =
                serde_json::from_slice(payload).map_err(|e| Error::schema(FULL_CHAIN, e))?;
            if blocks.is_empty() {
                return Err(Error::InvalidPayload {
                    context: FULL_CHAIN,
                    reason: "block list must not be empty",
                });
            }
            Ok(PubMessage::FullChain(blocks))
        }
        Topic::MinimalTxpool => {
            let txs: Vec<MinimalTx> =
                serde_json::from_slice(payload).map_err(|e| Error::schema(MINIMAL_TXPOOL, e))?;
            Ok(PubMessage::MinimalTxpool(txs))
        }
    }
}
