//! View state and the overlays drawn on top of the animation.

use std::time::Instant;

use rand::{seq::SliceRandom, Rng};

use crate::{
    constants::{
        messages::{DISCONNECTED, NEW_BLOCK_TITLE, OFFLINE},
        view::MINIMUM_FOOTER_TIME,
    },
    types::Hash256,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Disconnected,
    CatchingUp,
    CaughtUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Syncing(SyncPhase),
    Steady,
}

impl Default for View {
    fn default() -> Self {
        View::Syncing(SyncPhase::Disconnected)
    }
}

/// What the loop knows about the daemon.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub view: View,
    pub last_block_id: Hash256,
    pub daemon_height: u64,
    /// Zero until the first successful `get_info`.
    pub target_height: u64,
    pub last_info_poll_at: Option<Instant>,
    pub last_pub_at: Option<Instant>,
    /// Block the last new-block notice was shown for.
    pub current_head: Hash256,
}

/// Chain label and address shown in the sync meter header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub chain: String,
    pub address: String,
}

impl Header {
    pub fn disconnected() -> Self {
        Self {
            chain: String::new(),
            address: DISCONNECTED.to_string(),
        }
    }

    pub fn offline(address: &str) -> Self {
        Self {
            chain: OFFLINE.to_string(),
            address: address.to_string(),
        }
    }

    pub fn connected(chain: &str, address: &str) -> Self {
        Self {
            chain: chain.to_string(),
            address: address.to_string(),
        }
    }

    /// `chain@address`
    pub fn label(&self) -> String {
        format!("{}@{}", self.chain, self.address)
    }

    pub fn title(&self) -> String {
        if self.chain.is_empty() {
            format!("Watching chain sync @ {}", self.address)
        } else {
            format!("Watching {} chain sync @ {}", self.chain, self.address)
        }
    }
}

const LOADING_MESSAGES: &[&str] = &[
    "Reticulating ring signatures",
    "Counting decoys",
    "Untangling the mempool",
    "Polishing block headers",
    "Rehydrating key images",
    "Asking peers nicely",
    "Bulletproofing the range",
    "Herding stealth addresses",
    "Warming up RandomX",
    "Verifying what cannot be seen",
    "Reading the fine print of the blockchain",
    "Brewing more coffee for the daemon",
    "Shuffling outputs",
    "Aligning Pedersen commitments",
    "Feeding the hash rate",
    "Checking under the merkle tree",
    "Negotiating with the difficulty adjustment",
    "Rolling out the long-term ring",
    "Following the tail emission",
    "Whispering to dandelions",
    "Decoding the subaddress zoo",
    "Catching falling blocks",
    "Dusting off old checkpoints",
    "Balancing the ledger without looking",
    "Tuning the fungibility engine",
    "Sweeping unspent outputs into piles",
    "Cross-referencing nothing at all",
    "Spinning up the entropy",
    "Reassembling the chain one link at a time",
    "Convincing the clock to tick faster",
];

/// Progress meter shown while the daemon catches up with the network.
#[derive(Debug, Clone)]
pub struct SyncMeter {
    header: Header,
    current: u64,
    target: u64,
    messages: Vec<&'static str>,
    next_message: usize,
    footer: Option<&'static str>,
    footer_progress: f64,
    last_footer: Option<Instant>,
    notice: Option<String>,
}

impl SyncMeter {
    pub fn new<R: Rng>(header: Header, rng: &mut R) -> Self {
        let mut messages = LOADING_MESSAGES.to_vec();
        messages.shuffle(rng);
        Self {
            header,
            current: 0,
            target: 0,
            messages,
            next_message: 0,
            footer: None,
            footer_progress: 0.0,
            last_footer: None,
            notice: None,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn set_header(&mut self, header: Header) {
        self.header = header;
    }

    /// Records progress; the footer rotates only when progress advanced and
    /// the previous message has been up long enough.
    pub fn set_progress(&mut self, current: u64, target: u64, now: Instant) {
        self.current = current.min(target);
        self.target = target;

        let progress = self.fraction();
        let footer_due = self
            .last_footer
            .map_or(true, |at| at + MINIMUM_FOOTER_TIME <= now);
        if progress > self.footer_progress && footer_due && !self.messages.is_empty() {
            self.footer = Some(self.messages[self.next_message % self.messages.len()]);
            self.next_message += 1;
            self.footer_progress = progress;
            self.last_footer = Some(now);
        }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn fraction(&self) -> f64 {
        if self.target == 0 {
            0.0
        } else {
            self.current as f64 / self.target as f64
        }
    }

    pub fn percent(&self) -> u8 {
        if self.target == 0 {
            return 0;
        }
        let pct = u128::from(self.current) * 100 / u128::from(self.target);
        pct.min(100) as u8
    }

    /// A pending error takes the footer line until cleared.
    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    pub fn footer(&self) -> Option<String> {
        match (&self.notice, self.footer) {
            (Some(notice), _) => Some(notice.clone()),
            (None, Some(message)) => Some(format!("... {message} ...")),
            (None, None) => None,
        }
    }
}

/// Contents of the new-block notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNotice {
    pub id: Hash256,
    pub height: u64,
    pub tx_count: usize,
}

impl BlockNotice {
    pub fn lines(&self) -> [String; 4] {
        [
            NEW_BLOCK_TITLE.to_string(),
            format!("{} transaction(s) processed", self.tx_count),
            format!("Height: {}", self.height),
            format!("Block ID: {}", self.id.to_hex()),
        ]
    }
}

/// Window drawn over the falling text.
#[derive(Debug, Clone, Copy)]
pub enum Overlay<'a> {
    None,
    Sync(&'a SyncMeter),
    NewBlock(&'a BlockNotice),
}
