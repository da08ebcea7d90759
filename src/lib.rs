//! blockrain - falling-text visualizer for a Monero daemon
//!
//! The daemon publishes chain and mempool events on a ZMQ pub socket and
//! answers JSON-RPC on a ZMQ request/reply socket. blockrain renders the
//! identifiers it sees as falling base85 text, with a progress meter while the
//! daemon syncs and a notice for every new block once it has caught up.
//!
//! ## Architecture
//!
//! Everything runs on one thread. [`engine::Engine`] owns the sockets, the
//! animation and the view state, and blocks only in polls that also watch the
//! process-wide [`wake::WakeChannel`].

// Core modules
pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Theme system
pub mod theme;

// Daemon transports and wire decoding
pub mod rpc_utils;
pub mod source_rpc;
pub mod source_sub;
pub mod topics;

// Animation and view state
pub mod carousel;
pub mod falling_text;
pub mod view;

// Coordination loop
pub mod engine;

// Terminal integration (signals, raw mode, drawing)
pub mod terminal;
pub mod ui;
pub mod wake;

// Re-export commonly used types
pub use config::Config;
pub use engine::{Clock, Engine, NodeRpc, RpcConnector, Screen, Subscription, SystemClock};
pub use error::{Error, Result};
pub use theme::{ColorScheme, Palette};
