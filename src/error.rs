//! Error types shared by the transports, the topic dispatcher and the coordination loop.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Exit was requested through the wake channel, or the transport shut down.
    #[error("terminated")]
    Terminated,

    /// Socket level failure other than a shutdown.
    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: zmq::Error,
    },

    /// The socket reported readable but had nothing to receive.
    #[error("socket reported readable but no frame was pending")]
    WouldBlock,

    /// RPC reply did not arrive within the configured timeout.
    #[error("{method} timed out waiting for the daemon")]
    RpcTimeout { method: &'static str },

    /// The daemon answered with a JSON-RPC error object.
    #[error("rpc {code} {message}")]
    Rpc { code: i64, message: String },

    /// Payload did not match the expected shape (missing field, wrong type, bad JSON).
    #[error("{context}: {source}")]
    Schema {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Payload parsed but violated a protocol rule.
    #[error("{context}: {reason}")]
    InvalidPayload {
        context: &'static str,
        reason: &'static str,
    },

    #[error("z85 encoding failed")]
    Encoding,

    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Setup failed before the coordination loop started.
    #[error("initialization failed: {0}")]
    Init(String),
}

impl Error {
    /// Classifies whether the error is the clean shutdown path.
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Errors the view loop cannot recover from by reconnecting.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Init(_) | Self::Encoding)
    }

    pub(crate) fn transport(context: &'static str, source: zmq::Error) -> Self {
        if source == zmq::Error::ETERM {
            Self::Terminated
        } else {
            Self::Transport { context, source }
        }
    }

    pub(crate) fn schema(context: &'static str, source: serde_json::Error) -> Self {
        Self::Schema { context, source }
    }

    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }
}
