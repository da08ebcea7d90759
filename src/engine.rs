//! Coordination loop.
//!
//! Single threaded and deadline driven: at any moment the loop is either
//! painting an animation frame or blocked on the pub socket (and the wake
//! channel) with a timeout no later than the next paint deadline. The view
//! alternates between syncing (progress meter over the falling chain hashes)
//! and steady (falling mempool hashes, a notice per new block).

use std::time::{Duration, Instant};

use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::{buffer::Buffer, layout::Rect, style::Style};

use crate::{
    carousel::{z85, Carousel},
    constants::{
        animation::COLOR_COUNT,
        view::{
            BIG_SYNC_INTERVAL, BLOCK_DISPLAY_TIME, CAUGHT_UP_HOLD, ERROR_RETRY_DELAY,
            MAX_BLOCK_BUFFER, NO_PUBS_TIMEOUT, TARGET_SYNC_INTERVAL,
        },
    },
    error::{Error, Result},
    falling_text::{FallingText, Text},
    topics::{dispatch, Frame, PubMessage, Topic},
    types::{Hash256, MinimalChain, NodeInfo},
    view::{BlockNotice, Header, Overlay, SyncMeter, SyncPhase, View, ViewState},
};

/// Pub/sub side of the daemon connection. Every blocking call also wakes on
/// the wake channel and reports that as [`Error::Terminated`].
pub trait Subscription {
    fn subscribe(&mut self, topic: Topic) -> Result<()>;
    fn unsubscribe(&mut self, topic: Topic) -> Result<()>;
    /// `Ok(true)` when a frame is ready; `None` waits without a deadline.
    fn poll_readable(&mut self, timeout: Option<Duration>) -> Result<bool>;
    /// `Ok(None)` when nothing is pending.
    fn receive_nonblocking(&mut self) -> Result<Option<Frame>>;
    /// Sleeps, waking early only to terminate. Frames stay queued.
    fn pause(&mut self, duration: Duration) -> Result<()>;
}

/// One request/reply connection to the daemon.
pub trait NodeRpc {
    fn get_info(&mut self) -> Result<NodeInfo>;
    fn get_transaction_pool(&mut self) -> Result<Vec<Hash256>>;
}

/// Opens short-lived [`NodeRpc`] clients.
pub trait RpcConnector {
    type Client: NodeRpc;

    fn address(&self) -> &str;
    fn connect(&mut self) -> Result<Self::Client>;
}

pub trait Screen {
    fn area(&mut self) -> Result<Rect>;
    /// Shows `canvas` with `overlay` drawn on top.
    fn present(&mut self, canvas: &Buffer, overlay: Overlay<'_>) -> Result<()>;
}

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

pub struct Engine<S, R: RpcConnector, D, C> {
    sub: S,
    connector: R,
    rpc: Option<R::Client>,
    screen: D,
    clock: C,
    text: FallingText,
    carousel: Carousel,
    state: ViewState,
    rng: StdRng,
}

impl<S, R, D, C> Engine<S, R, D, C>
where
    S: Subscription,
    R: RpcConnector,
    D: Screen,
    C: Clock,
{
    pub fn new(
        mut sub: S,
        connector: R,
        mut screen: D,
        clock: C,
        styles: [Style; COLOR_COUNT],
        mut rng: StdRng,
    ) -> Result<Self> {
        // permanent; the steady view adds the other two topics
        sub.subscribe(Topic::MinimalChain)?;
        let area = screen.area()?;
        let text = FallingText::new(area, styles, StdRng::seed_from_u64(rng.gen()));
        Ok(Self {
            sub,
            connector,
            rpc: None,
            screen,
            clock,
            text,
            carousel: Carousel::new(MAX_BLOCK_BUFFER),
            state: ViewState::default(),
            rng,
        })
    }

    pub fn view(&self) -> View {
        self.state.view
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn falling_text(&self) -> &FallingText {
        &self.text
    }

    /// Runs until the wake channel fires (`Ok`) or a fatal error occurs.
    pub fn run(&mut self) -> Result<()> {
        let mut notice = None;
        loop {
            let result = self
                .display_sync_progress(notice.take())
                .and_then(|()| self.display_txpool());

            let err = match result {
                Ok(()) => continue,
                Err(e) if e.is_terminated() => break,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => e,
            };

            log::warn!("⚠️ view abandoned: {err}");
            self.rpc = None;
            let message = err.to_string();
            let mut meter = SyncMeter::new(Header::disconnected(), &mut self.rng);
            meter.set_notice(Some(message.clone()));
            match self.animate_for(ERROR_RETRY_DELAY, Overlay::Sync(&meter)) {
                Ok(()) => notice = Some(message),
                Err(e) if e.is_terminated() => break,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    log::warn!("⚠️ retry pause interrupted: {e}");
                    notice = Some(e.to_string());
                }
            }
        }
        log::info!("exit requested, leaving coordination loop");
        Ok(())
    }

    /// Seed for the next text group: the carousel, or the last known block.
    pub fn next_seed(&mut self) -> Result<Text> {
        match self.carousel.next_identifier()? {
            Some(text) => Ok(text),
            None => z85(&self.state.last_block_id),
        }
    }

    fn display_sync_progress(&mut self, notice: Option<String>) -> Result<()> {
        self.state.view = View::Syncing(SyncPhase::Disconnected);
        self.state.last_info_poll_at = None;
        self.state.last_pub_at = Some(self.clock.now());
        self.carousel.clear_txpool();

        let mut meter = SyncMeter::new(Header::disconnected(), &mut self.rng);
        meter.set_notice(notice);
        self.present(Overlay::Sync(&meter))?;

        loop {
            while self.info_refresh_due() {
                let info = self.rpc_call(|rpc| rpc.get_info())?;
                let address = self.connector.address().to_string();
                if info.is_offline() {
                    self.state.view = View::Syncing(SyncPhase::Disconnected);
                    meter.set_header(Header::offline(&address));
                    self.present(Overlay::Sync(&meter))?;
                    self.wait_while_offline()?;
                    continue;
                }

                self.state.last_info_poll_at = Some(self.clock.now());
                self.state.last_block_id = info.top_block_hash;
                self.state.daemon_height = info.height;
                // a synchronized daemon may report no target at all
                self.state.target_height = info.target_height.max(info.height);
                log::info!(
                    "daemon at {}/{} on {}",
                    info.height,
                    info.target_height,
                    info.chain_type()
                );

                meter.set_notice(None);
                meter.set_header(Header::connected(info.chain_type(), &address));
                if self.state.target_height - self.state.daemon_height <= BIG_SYNC_INTERVAL {
                    self.rpc = None;
                }
            }

            meter.set_progress(
                self.state.daemon_height,
                self.state.target_height,
                self.clock.now(),
            );
            if self.state.target_height <= self.state.daemon_height {
                self.state.view = View::Syncing(SyncPhase::CaughtUp);
                self.present(Overlay::Sync(&meter))?;
                self.sub.pause(CAUGHT_UP_HOLD)?;
                return Ok(());
            }

            self.state.view = View::Syncing(SyncPhase::CatchingUp);
            let frame = self.wait_for_pub(Overlay::Sync(&meter))?;
            match dispatch(&frame)? {
                PubMessage::MinimalChain(chain) => self.record_chain(&chain),
                PubMessage::Silence => {
                    // shown on the next progress update
                    self.state.last_info_poll_at = None;
                    self.state.view = View::Syncing(SyncPhase::Disconnected);
                    meter.set_header(Header::disconnected());
                    self.present(Overlay::Sync(&meter))?;
                }
                PubMessage::FullChain(_) | PubMessage::MinimalTxpool(_) | PubMessage::Unknown => {}
            }
        }
    }

    fn display_txpool(&mut self) -> Result<()> {
        self.state.view = View::Steady;
        log::info!(
            "caught up at height {}, watching the mempool",
            self.state.daemon_height
        );

        self.sub.subscribe(Topic::FullChain)?;
        self.sub.subscribe(Topic::MinimalTxpool)?;
        self.state.last_pub_at = Some(self.clock.now());
        let watched = self.watch_txpool();
        let unsubscribed = self
            .sub
            .unsubscribe(Topic::MinimalTxpool)
            .and_then(|()| self.sub.unsubscribe(Topic::FullChain));
        watched.and(unsubscribed)
    }

    fn watch_txpool(&mut self) -> Result<()> {
        self.sync_mempool()?;
        self.state.current_head = self.state.last_block_id;

        let mut last_txs_count = 0;
        let mut full_block_prev: Option<Hash256> = None;
        let mut minimal_block_prev: Option<Hash256> = None;

        loop {
            let frame = self.wait_for_pub(Overlay::None)?;
            match dispatch(&frame)? {
                PubMessage::MinimalChain(chain) => {
                    if chain.first_height < self.state.daemon_height {
                        log::info!(
                            "reorg: chain event at {} below height {}",
                            chain.first_height,
                            self.state.daemon_height
                        );
                        self.state.daemon_height = chain.first_height;
                        return Ok(());
                    }

                    let gap = self.state.last_block_id != chain.first_prev_id;
                    self.record_chain(&chain);
                    minimal_block_prev = Some(chain.last_prev_id());
                    if gap {
                        log::debug!("gap before height {}, resyncing mempool", chain.first_height);
                        self.sync_mempool()?;
                    }

                    if let Some(parent) = full_block_prev.filter(|p| Some(*p) == minimal_block_prev)
                    {
                        self.show_new_block(parent, last_txs_count)?;
                        full_block_prev = None;
                        minimal_block_prev = None;
                    }
                }
                PubMessage::FullChain(blocks) => {
                    let Some(last) = blocks.last() else {
                        continue;
                    };
                    last_txs_count = last.tx_hashes.len();
                    full_block_prev = Some(last.prev_id);
                    for hash in blocks.iter().flat_map(|b| b.tx_hashes.iter()) {
                        self.carousel.remove_tx(hash);
                    }

                    if let Some(parent) = minimal_block_prev.filter(|p| Some(*p) == full_block_prev)
                    {
                        self.show_new_block(parent, last_txs_count)?;
                        full_block_prev = None;
                        minimal_block_prev = None;
                    }
                }
                PubMessage::MinimalTxpool(txs) => {
                    for tx in txs {
                        self.carousel.insert_tx(tx.id);
                    }
                }
                PubMessage::Silence => {
                    log::info!("no pub events for {NO_PUBS_TIMEOUT:?}, re-checking daemon");
                    return Ok(());
                }
                PubMessage::Unknown => {}
            }
        }
    }

    fn show_new_block(&mut self, parent: Hash256, tx_count: usize) -> Result<()> {
        let notice = BlockNotice {
            id: self.state.last_block_id,
            height: self.state.daemon_height,
            tx_count,
        };
        log::info!(
            "🔔 block {} at height {} with {} tx(s)",
            notice.id,
            notice.height,
            notice.tx_count
        );
        self.present(Overlay::NewBlock(&notice))?;

        if self.state.current_head != parent {
            self.sync_mempool()?;
        }
        self.state.current_head = self.state.last_block_id;
        self.animate_for(BLOCK_DISPLAY_TIME, Overlay::NewBlock(&notice))
    }

    /// Blocks until the pub socket has something, then applies it.
    fn wait_while_offline(&mut self) -> Result<()> {
        log::info!("daemon has no peers, waiting for a chain event");
        while !self.sub.poll_readable(None)? {}
        if let Some(frame) = self.sub.receive_nonblocking()? {
            self.state.last_pub_at = Some(self.clock.now());
            if let PubMessage::MinimalChain(chain) = dispatch(&frame)? {
                self.record_chain(&chain);
            }
        }
        Ok(())
    }

    fn record_chain(&mut self, chain: &MinimalChain) {
        self.state.daemon_height = chain.top_height();
        if let Some(id) = chain.last_id() {
            self.state.last_block_id = id;
        }
        for id in &chain.ids {
            self.carousel.push_block(*id);
        }
    }

    fn info_refresh_due(&self) -> bool {
        self.state.last_info_poll_at.map_or(true, |at| {
            self.clock.now().saturating_duration_since(at) >= TARGET_SYNC_INTERVAL
        })
    }

    /// Runs `call` on the cached client, connecting first if needed. The
    /// client is dropped on error.
    fn rpc_call<T>(&mut self, call: impl FnOnce(&mut R::Client) -> Result<T>) -> Result<T> {
        let mut client = match self.rpc.take() {
            Some(client) => client,
            None => self.connector.connect()?,
        };
        let value = call(&mut client)?;
        self.rpc = Some(client);
        Ok(value)
    }

    fn sync_mempool(&mut self) -> Result<()> {
        self.carousel.clear_txpool();
        let pool = self.rpc_call(|rpc| rpc.get_transaction_pool())?;
        log::debug!("mempool holds {} transaction(s)", pool.len());
        for hash in pool {
            self.carousel.insert_tx(hash);
        }
        self.rpc = None;
        Ok(())
    }

    /// Waits for the next pub frame while keeping the animation on schedule.
    /// Returns [`Frame::silence`] once [`NO_PUBS_TIMEOUT`] has passed since
    /// the last frame (or since the view started).
    fn wait_for_pub(&mut self, overlay: Overlay<'_>) -> Result<Frame> {
        self.carousel.randomize_cursor(&mut self.rng);
        let mut now = self.clock.now();
        let quiet_since = *self.state.last_pub_at.get_or_insert(now);
        let mut slippage: i128 = 0;

        loop {
            if now.saturating_duration_since(quiet_since) >= NO_PUBS_TIMEOUT {
                self.state.last_pub_at = Some(now);
                return Ok(Frame::silence());
            }

            self.advance_animation(now)?;
            self.present(overlay)?;

            let next_fall = self.text.next_fall().unwrap_or(now);
            let text_delay = signed_nanos(next_fall, self.clock.now()) - slippage;
            let readable = if text_delay > 0 {
                let timeout = Duration::from_nanos(u64::try_from(text_delay).unwrap_or(u64::MAX));
                self.sub.poll_readable(Some(timeout))?
            } else {
                // behind schedule: check the wake channel, then try the socket anyway
                self.sub.poll_readable(Some(Duration::ZERO))?;
                true
            };

            if readable {
                match self.sub.receive_nonblocking()? {
                    Some(frame) => {
                        self.state.last_pub_at = Some(self.clock.now());
                        log::debug!("pub {frame:?}");
                        return Ok(frame);
                    }
                    None if text_delay > 0 => return Err(Error::WouldBlock),
                    None => {}
                }
            }

            now = self.clock.now();
            slippage = signed_nanos(now, next_fall);
        }
    }

    /// Keeps the animation running under `overlay` for `duration`.
    fn animate_for(&mut self, duration: Duration, overlay: Overlay<'_>) -> Result<()> {
        let end = self.clock.now() + duration;
        loop {
            let now = self.clock.now();
            if now >= end {
                return Ok(());
            }
            self.advance_animation(now)?;
            self.present(overlay)?;
            let wake_at = self.text.next_fall().map_or(end, |t| t.min(end));
            self.sub
                .pause(wake_at.saturating_duration_since(self.clock.now()))?;
        }
    }

    fn advance_animation(&mut self, now: Instant) -> Result<()> {
        if !self.text.is_due(now) {
            return Ok(());
        }
        while !self.text.draw_next(now) {
            let seed = self.next_seed()?;
            self.text.add_text(&seed);
        }
        Ok(())
    }

    fn present(&mut self, overlay: Overlay<'_>) -> Result<()> {
        let area = self.screen.area()?;
        self.text.resize(area);
        self.screen.present(self.text.canvas(), overlay)
    }
}

/// `later - earlier` in nanoseconds, negative when `later` is earlier.
fn signed_nanos(later: Instant, earlier: Instant) -> i128 {
    match later.checked_duration_since(earlier) {
        Some(d) => d.as_nanos() as i128,
        None => -(earlier.duration_since(later).as_nanos() as i128),
    }
}
