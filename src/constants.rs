//! Application constants
//!
//! Centralized timing, sizing and protocol constants used by the coordination
//! loop, the falling-text engine and the node transports.

/// Falling-text animation constants
pub mod animation {
    use std::time::Duration;

    /// Characters per animated group (one base85-rendered 32-byte hash)
    pub const TEXT_SIZE: usize = 40;

    /// Number of independently animated text groups
    pub const GROUP_COUNT: usize = 8;

    /// Number of color bands the slots are split into
    pub const COLOR_COUNT: usize = 2;

    /// Percentage of terminal columns that receive a falling slot
    pub const FILL_PERCENT: u16 = 60;

    /// Delay between two animation frames
    pub const FALL_DELAY: Duration = Duration::from_millis(80);
}

/// View state machine constants
pub mod view {
    use std::time::Duration;

    /// Maximum number of block hashes kept for the animation during sync
    pub const MAX_BLOCK_BUFFER: usize = 50;

    /// How long the "new block" notice stays on screen
    pub const BLOCK_DISPLAY_TIME: Duration = Duration::from_secs(16);

    /// The RPC socket is closed while the daemon is within this many blocks of its target
    pub const BIG_SYNC_INTERVAL: u64 = 5000;

    /// Target height is refreshed via `get_info` at this frequency while syncing
    pub const TARGET_SYNC_INTERVAL: Duration = Duration::from_secs(15 * 60);

    /// Daemon status is re-checked when no pub events arrive within this interval.
    ///
    /// A synced daemon still publishes txpool events, so silence this long means
    /// the feed is gone.
    pub const NO_PUBS_TIMEOUT: Duration = Duration::from_secs(5 * 60);

    /// Pause on the completed sync meter before switching to the mempool view
    pub const CAUGHT_UP_HOLD: Duration = Duration::from_secs(3);

    /// Pause after an abandoned view before the node is queried again
    pub const ERROR_RETRY_DELAY: Duration = Duration::from_secs(2);

    /// Minimum time a sync meter footer message stays on screen
    pub const MINIMUM_FOOTER_TIME: Duration = Duration::from_secs(3);
}

/// Published topic names
pub mod topics {
    pub const MINIMAL_CHAIN: &str = "json-minimal-chain_main";
    pub const FULL_CHAIN: &str = "json-full-chain_main";
    pub const MINIMAL_TXPOOL: &str = "json-minimal-txpool_add";
}

/// User-facing strings
pub mod messages {
    /// Chain label shown while the daemon has no peers
    pub const OFFLINE: &str = "offline";

    /// Address label shown while the daemon status is unknown
    pub const DISCONNECTED: &str = "disconnected";

    /// Title of the new block notice
    pub const NEW_BLOCK_TITLE: &str = "INCOMING TRANSMISSION";
}
