//! Coordination loop scenarios driven through in-memory fakes and a simulated clock.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
    time::{Duration, Instant},
};

use blockrain::{
    carousel::z85,
    constants::view::{BLOCK_DISPLAY_TIME, CAUGHT_UP_HOLD, NO_PUBS_TIMEOUT},
    engine::{Clock, Engine, NodeRpc, RpcConnector, Screen, Subscription},
    error::{Error, Result},
    constants::animation::FALL_DELAY,
    theme::Palette,
    topics::{Frame, Topic},
    types::{Hash256, NodeInfo},
    view::{Overlay, SyncPhase, View},
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{buffer::Buffer, layout::Rect};

const RPC_ADDRESS: &str = "tcp://127.0.0.1:18082";

fn h(byte: u8) -> Hash256 {
    Hash256([byte; 32])
}

// ===============================
// Fakes
// ===============================

#[derive(Clone)]
struct SimClock(Rc<Cell<Instant>>);

impl SimClock {
    fn advance(&self, d: Duration) {
        self.0.set(self.0.get() + d);
    }
}

impl Clock for SimClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

enum Step {
    Frame(Vec<u8>),
    /// Nothing arrives for this long.
    Quiet(Duration),
    /// One empty poll that returns this much later than its timeout.
    Late(Duration),
}

#[derive(Default)]
struct Log {
    subscriptions: Vec<String>,
    calls: Vec<&'static str>,
    connects: usize,
    polls: Vec<Option<Duration>>,
    shown: Vec<Shown>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Shown {
    Plain,
    Sync {
        label: String,
        percent: u8,
        footer: Option<String>,
    },
    NewBlock {
        id: Hash256,
        height: u64,
        tx_count: usize,
    },
}

struct FakeSub {
    feed: VecDeque<Step>,
    clock: SimClock,
    log: Rc<RefCell<Log>>,
}

impl Subscription for FakeSub {
    fn subscribe(&mut self, topic: Topic) -> Result<()> {
        self.log
            .borrow_mut()
            .subscriptions
            .push(format!("+{}", topic.as_str()));
        Ok(())
    }

    fn unsubscribe(&mut self, topic: Topic) -> Result<()> {
        self.log
            .borrow_mut()
            .subscriptions
            .push(format!("-{}", topic.as_str()));
        Ok(())
    }

    fn poll_readable(&mut self, timeout: Option<Duration>) -> Result<bool> {
        self.log.borrow_mut().polls.push(timeout);
        match self.feed.front_mut() {
            Some(Step::Frame(_)) => Ok(true),
            Some(Step::Quiet(remaining)) => {
                let waited = timeout.map_or(*remaining, |t| t.min(*remaining));
                self.clock.advance(waited);
                *remaining -= waited;
                if remaining.is_zero() {
                    self.feed.pop_front();
                }
                Ok(false)
            }
            Some(Step::Late(overshoot)) => {
                self.clock.advance(timeout.unwrap_or_default() + *overshoot);
                self.feed.pop_front();
                Ok(false)
            }
            // script exhausted: behave like the wake channel firing
            None => Err(Error::Terminated),
        }
    }

    fn receive_nonblocking(&mut self) -> Result<Option<Frame>> {
        match self.feed.front() {
            Some(Step::Frame(_)) => match self.feed.pop_front() {
                Some(Step::Frame(raw)) => Ok(Some(Frame::new(raw))),
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }

    fn pause(&mut self, duration: Duration) -> Result<()> {
        self.clock.advance(duration);
        Ok(())
    }
}

enum Reply {
    Info(NodeInfo),
    Pool(Vec<Hash256>),
    Fail,
}

struct FakeConnector {
    replies: Rc<RefCell<VecDeque<Reply>>>,
    log: Rc<RefCell<Log>>,
}

struct FakeRpc {
    replies: Rc<RefCell<VecDeque<Reply>>>,
    log: Rc<RefCell<Log>>,
}

impl RpcConnector for FakeConnector {
    type Client = FakeRpc;

    fn address(&self) -> &str {
        RPC_ADDRESS
    }

    fn connect(&mut self) -> Result<FakeRpc> {
        self.log.borrow_mut().connects += 1;
        Ok(FakeRpc {
            replies: Rc::clone(&self.replies),
            log: Rc::clone(&self.log),
        })
    }
}

impl FakeRpc {
    fn next(&mut self, method: &'static str) -> Result<Reply> {
        self.log.borrow_mut().calls.push(method);
        match self.replies.borrow_mut().pop_front() {
            Some(Reply::Fail) => Err(Error::RpcTimeout { method }),
            Some(reply) => Ok(reply),
            None => Err(Error::Terminated),
        }
    }
}

impl NodeRpc for FakeRpc {
    fn get_info(&mut self) -> Result<NodeInfo> {
        match self.next("get_info")? {
            Reply::Info(info) => Ok(info),
            _ => panic!("script expected get_transaction_pool next"),
        }
    }

    fn get_transaction_pool(&mut self) -> Result<Vec<Hash256>> {
        match self.next("get_transaction_pool")? {
            Reply::Pool(pool) => Ok(pool),
            _ => panic!("script expected get_info next"),
        }
    }
}

struct FakeScreen {
    area: Rect,
    fail: bool,
    log: Rc<RefCell<Log>>,
}

impl Screen for FakeScreen {
    fn area(&mut self) -> Result<Rect> {
        Ok(self.area)
    }

    fn present(&mut self, canvas: &Buffer, overlay: Overlay<'_>) -> Result<()> {
        if self.fail {
            return Err(Error::Io {
                context: "draw frame",
                source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"),
            });
        }
        assert_eq!(canvas.area, self.area);
        let shown = match overlay {
            Overlay::None => Shown::Plain,
            Overlay::Sync(meter) => Shown::Sync {
                label: meter.header().label(),
                percent: meter.percent(),
                footer: meter.footer(),
            },
            Overlay::NewBlock(notice) => Shown::NewBlock {
                id: notice.id,
                height: notice.height,
                tx_count: notice.tx_count,
            },
        };
        let mut log = self.log.borrow_mut();
        if log.shown.last() != Some(&shown) {
            log.shown.push(shown);
        }
        Ok(())
    }
}

type TestEngine = Engine<FakeSub, FakeConnector, FakeScreen, SimClock>;

struct Harness {
    engine: TestEngine,
    clock: SimClock,
    log: Rc<RefCell<Log>>,
    start: Instant,
}

impl Harness {
    fn new(feed: Vec<Step>, replies: Vec<Reply>) -> Self {
        Self::build(feed, replies, false)
    }

    fn build(feed: Vec<Step>, replies: Vec<Reply>, fail_screen: bool) -> Self {
        let start = Instant::now();
        let clock = SimClock(Rc::new(Cell::new(start)));
        let log = Rc::new(RefCell::new(Log::default()));
        let sub = FakeSub {
            feed: feed.into(),
            clock: clock.clone(),
            log: Rc::clone(&log),
        };
        let connector = FakeConnector {
            replies: Rc::new(RefCell::new(replies.into())),
            log: Rc::clone(&log),
        };
        let screen = FakeScreen {
            area: Rect::new(0, 0, 80, 24),
            fail: fail_screen,
            log: Rc::clone(&log),
        };
        let engine = Engine::new(
            sub,
            connector,
            screen,
            clock.clone(),
            Palette::monero().falling_styles(),
            StdRng::seed_from_u64(42),
        )
        .unwrap();
        Self {
            engine,
            clock,
            log,
            start,
        }
    }

    fn run(&mut self) {
        self.engine.run().expect("loop ends cleanly when the script runs out");
    }

    fn polls(&self) -> Vec<Option<Duration>> {
        self.log.borrow().polls.clone()
    }

    fn connects(&self) -> usize {
        self.log.borrow().connects
    }

    fn calls(&self) -> Vec<&'static str> {
        self.log.borrow().calls.clone()
    }

    fn sync_labels(&self) -> Vec<(String, u8)> {
        let mut labels: Vec<(String, u8)> = Vec::new();
        for shown in &self.log.borrow().shown {
            if let Shown::Sync { label, percent, .. } = shown {
                let entry = (label.clone(), *percent);
                if labels.last() != Some(&entry) {
                    labels.push(entry);
                }
            }
        }
        labels
    }

    fn notices(&self) -> Vec<Shown> {
        self.log
            .borrow()
            .shown
            .iter()
            .filter(|s| matches!(s, Shown::NewBlock { .. }))
            .cloned()
            .collect()
    }

    fn elapsed(&self) -> Duration {
        self.clock.now() - self.start
    }
}

fn info(height: u64, target_height: u64, top: Hash256) -> NodeInfo {
    NodeInfo {
        height,
        target_height,
        outgoing_connections_count: 1,
        incoming_connections_count: 0,
        top_block_hash: top,
        mainnet: true,
        testnet: false,
        stagenet: false,
    }
}

fn offline_info() -> NodeInfo {
    NodeInfo {
        outgoing_connections_count: 0,
        ..info(0, 0, Hash256::default())
    }
}

fn minimal_chain(first_height: u64, first_prev_id: Hash256, ids: &[Hash256]) -> Step {
    let ids: Vec<String> = ids.iter().map(|id| format!("\"{id}\"")).collect();
    Step::Frame(
        format!(
            r#"json-minimal-chain_main:{{"first_height":{first_height},"first_prev_id":"{first_prev_id}","ids":[{}]}}"#,
            ids.join(",")
        )
        .into_bytes(),
    )
}

fn full_chain(prev_id: Hash256, txs: &[Hash256]) -> Step {
    let txs: Vec<String> = txs.iter().map(|t| format!("\"{t}\"")).collect();
    Step::Frame(
        format!(
            r#"json-full-chain_main:[{{"prev_id":"{prev_id}","tx_hashes":[{}]}}]"#,
            txs.join(",")
        )
        .into_bytes(),
    )
}

fn txpool_add(ids: &[Hash256]) -> Step {
    let ids: Vec<String> = ids.iter().map(|t| format!(r#"{{"id":"{t}"}}"#)).collect();
    Step::Frame(format!("json-minimal-txpool_add:[{}]", ids.join(",")).into_bytes())
}

// ===============================
// Scenarios
// ===============================

#[test]
fn clean_sync_hands_off_to_steady_view() {
    let top = h(0xaa);
    let mut harness = Harness::new(
        vec![],
        vec![Reply::Info(info(100, 100, top)), Reply::Pool(vec![])],
    );
    harness.run();

    let label = format!("mainnet@{RPC_ADDRESS}");
    assert_eq!(
        harness.sync_labels(),
        vec![("@disconnected".to_string(), 0), (label, 100)]
    );
    assert_eq!(harness.engine.view(), View::Steady);
    assert!(harness.elapsed() >= CAUGHT_UP_HOLD);
    assert_eq!(harness.calls(), vec!["get_info", "get_transaction_pool"]);

    let subs = harness.log.borrow().subscriptions.clone();
    assert_eq!(
        subs,
        vec![
            "+json-minimal-chain_main",
            "+json-full-chain_main",
            "+json-minimal-txpool_add",
            "-json-minimal-txpool_add",
            "-json-full-chain_main",
        ]
    );
}

#[test]
fn matched_minimal_and_full_chain_show_one_notice() {
    let top = h(0x10);
    let block = h(0x11);
    let (t1, t2, t3) = (h(0x21), h(0x22), h(0x23));
    let mut harness = Harness::new(
        vec![minimal_chain(101, top, &[block]), full_chain(top, &[t1, t2])],
        vec![Reply::Info(info(100, 100, top)), Reply::Pool(vec![t1, t2, t3])],
    );
    harness.run();

    assert_eq!(
        harness.notices(),
        vec![Shown::NewBlock {
            id: block,
            height: 101,
            tx_count: 2
        }]
    );
    let carousel = harness.engine.carousel();
    assert!(!carousel.contains_tx(&t1));
    assert!(!carousel.contains_tx(&t2));
    assert!(carousel.contains_tx(&t3));
    // head was already current, no extra mempool sync
    assert_eq!(harness.calls(), vec!["get_info", "get_transaction_pool"]);
    assert!(harness.elapsed() >= CAUGHT_UP_HOLD + BLOCK_DISPLAY_TIME);
}

#[test]
fn full_chain_first_still_matches() {
    let top = h(0x30);
    let block = h(0x31);
    let tx = h(0x40);
    let mut harness = Harness::new(
        vec![full_chain(top, &[tx]), minimal_chain(101, top, &[block])],
        vec![Reply::Info(info(100, 100, top)), Reply::Pool(vec![tx])],
    );
    harness.run();

    assert_eq!(
        harness.notices(),
        vec![Shown::NewBlock {
            id: block,
            height: 101,
            tx_count: 1
        }]
    );
    assert_eq!(harness.engine.carousel().txpool_len(), 0);
}

#[test]
fn gap_in_the_chain_resyncs_the_mempool() {
    let top = h(0x50);
    let missed = h(0x51);
    let block = h(0x52);
    let mut harness = Harness::new(
        vec![
            minimal_chain(102, missed, &[block]),
            full_chain(missed, &[]),
        ],
        vec![
            Reply::Info(info(100, 100, top)),
            Reply::Pool(vec![]),
            Reply::Pool(vec![h(0x60)]),
            Reply::Pool(vec![h(0x61)]),
        ],
    );
    harness.run();

    // once for the gap, once because the shown head moved past its parent
    assert_eq!(
        harness.calls(),
        vec![
            "get_info",
            "get_transaction_pool",
            "get_transaction_pool",
            "get_transaction_pool"
        ]
    );
    assert!(harness.engine.carousel().contains_tx(&h(0x61)));
    assert_eq!(harness.notices().len(), 1);
}

#[test]
fn reorg_returns_to_sync_view() {
    let top = h(0x70);
    let mut harness = Harness::new(
        vec![minimal_chain(199, h(0x6f), &[h(0x71)])],
        vec![
            Reply::Info(info(200, 200, top)),
            Reply::Pool(vec![]),
            Reply::Info(info(199, 199, h(0x71))),
        ],
    );
    harness.run();

    assert!(harness.notices().is_empty());
    // the last mempool call finds the script exhausted and ends the run
    assert_eq!(
        harness.calls(),
        vec![
            "get_info",
            "get_transaction_pool",
            "get_info",
            "get_transaction_pool"
        ]
    );
    let labels = harness.sync_labels();
    let disconnected = labels.iter().filter(|(l, _)| l == "@disconnected").count();
    assert_eq!(disconnected, 2, "{labels:?}");
}

#[test]
fn silence_times_out_and_rechecks_the_daemon() {
    let top = h(0x80);
    let mut harness = Harness::new(
        vec![Step::Quiet(NO_PUBS_TIMEOUT + Duration::from_secs(1))],
        vec![
            Reply::Info(info(300, 300, top)),
            Reply::Pool(vec![]),
            Reply::Info(info(300, 300, top)),
        ],
    );
    harness.run();

    assert_eq!(
        harness.calls(),
        vec![
            "get_info",
            "get_transaction_pool",
            "get_info",
            "get_transaction_pool"
        ]
    );
    assert!(harness.elapsed() >= NO_PUBS_TIMEOUT + CAUGHT_UP_HOLD);
    let labels = harness.sync_labels();
    assert_eq!(labels[0].0, "@disconnected");
    assert!(labels[1..].iter().any(|(l, _)| l == "@disconnected"));
}

#[test]
fn empty_carousel_seeds_with_last_block_id() {
    let top = h(0x90);
    let mut harness = Harness::new(
        vec![Step::Quiet(Duration::from_secs(1))],
        vec![Reply::Info(info(10, 10, top)), Reply::Pool(vec![])],
    );
    harness.run();

    assert!(harness.engine.carousel().is_empty());
    let expected = z85(&top).unwrap();
    assert_eq!(harness.engine.next_seed().unwrap(), expected);
    assert!(harness
        .engine
        .falling_text()
        .groups()
        .iter()
        .any(|g| g.text() == &expected));
}

#[test]
fn catching_up_follows_chain_events() {
    let top = h(0xa0);
    let ids = [h(0xa1), h(0xa2), h(0xa3)];
    let mut harness = Harness::new(
        vec![
            Step::Quiet(Duration::from_millis(500)),
            minimal_chain(8_000, top, &ids),
            minimal_chain(10_000, ids[2], &[h(0xa4)]),
        ],
        vec![Reply::Info(info(7_999, 10_000, top)), Reply::Pool(vec![])],
    );
    harness.run();

    let label = format!("mainnet@{RPC_ADDRESS}");
    let labels = harness.sync_labels();
    assert!(labels.contains(&(label.clone(), 79)), "{labels:?}");
    assert!(labels.contains(&(label, 100)), "{labels:?}");
    assert_eq!(harness.engine.state().daemon_height, 10_000);
    assert_eq!(harness.engine.state().last_block_id, h(0xa4));
    assert!(harness.engine.carousel().contains_block(&ids[0]));
    assert_eq!(harness.engine.view(), View::Steady);
}

#[test]
fn offline_daemon_waits_for_a_chain_event() {
    let block = h(0xb1);
    let mut harness = Harness::new(
        vec![minimal_chain(5, h(0xb0), &[block])],
        vec![
            Reply::Info(offline_info()),
            Reply::Info(info(5, 5, block)),
            Reply::Pool(vec![]),
        ],
    );
    harness.run();

    let labels = harness.sync_labels();
    assert!(labels.contains(&(format!("offline@{RPC_ADDRESS}"), 0)), "{labels:?}");
    assert_eq!(
        harness.calls(),
        vec!["get_info", "get_info", "get_transaction_pool"]
    );
    assert!(harness.engine.carousel().contains_block(&block));
}

#[test]
fn txpool_events_feed_the_carousel() {
    let top = h(0xc0);
    let mut harness = Harness::new(
        vec![txpool_add(&[h(0xc1), h(0xc2)]), txpool_add(&[h(0xc1)])],
        vec![Reply::Info(info(1, 1, top)), Reply::Pool(vec![])],
    );
    harness.run();

    assert_eq!(harness.engine.carousel().txpool_len(), 2);
}

#[test]
fn rpc_failure_shows_error_and_retries() {
    let top = h(0xd0);
    let mut harness = Harness::new(
        vec![],
        vec![
            Reply::Fail,
            Reply::Info(info(1, 1, top)),
            Reply::Pool(vec![]),
        ],
    );
    harness.run();

    assert_eq!(
        harness.calls(),
        vec!["get_info", "get_info", "get_transaction_pool"]
    );
    // the failed client is not reused
    assert!(harness.log.borrow().connects >= 2);
    let shown = harness.log.borrow().shown.clone();
    assert!(shown.iter().any(|s| matches!(
        s,
        Shown::Sync { footer: Some(f), .. } if f.contains("get_info timed out")
    )));
    assert_eq!(harness.engine.view(), View::Steady);
}

#[test]
fn fatal_screen_error_stops_the_loop() {
    let mut harness = Harness::build(vec![], vec![Reply::Info(info(1, 1, h(1)))], true);
    let err = harness.engine.run().unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(
        harness.engine.view(),
        View::Syncing(SyncPhase::Disconnected)
    );
}

#[test]
fn poll_timeouts_track_the_fall_schedule() {
    let top = h(0xe0);
    let overshoot = Duration::from_millis(30);
    let mut harness = Harness::new(
        vec![
            Step::Quiet(FALL_DELAY * 5),
            Step::Late(overshoot),
            Step::Quiet(Duration::from_secs(1)),
        ],
        vec![Reply::Info(info(1, 1, top)), Reply::Pool(vec![])],
    );
    harness.run();

    let polls = harness.polls();
    // on schedule: each wait lasts exactly one fall delay
    assert_eq!(polls[..6], [Some(FALL_DELAY); 6]);
    // the late return is taken out of the next wait
    assert_eq!(polls[6], Some(FALL_DELAY - overshoot));
    assert!(polls
        .iter()
        .all(|t| t.is_some_and(|t| t <= FALL_DELAY)), "{polls:?}");
}

/// Frames four minutes apart, so the feed never goes silent.
fn chain_every_four_minutes(first_height: u64, top: Hash256, count: u64) -> Vec<Step> {
    let mut feed = Vec::new();
    for i in 0..count {
        feed.push(Step::Quiet(Duration::from_secs(4 * 60)));
        feed.push(minimal_chain(first_height + i, top, &[h(0xf0 + i as u8)]));
    }
    feed
}

#[test]
fn far_behind_daemon_keeps_one_rpc_client() {
    let top = h(0xe1);
    let mut harness = Harness::new(
        chain_every_four_minutes(1_001, top, 4),
        vec![
            Reply::Info(info(1_000, 10_000, top)),
            Reply::Info(info(10_000, 10_000, top)),
            Reply::Pool(vec![]),
        ],
    );
    harness.run();

    // target refreshed after 15 minutes on the same client
    assert_eq!(
        harness.calls(),
        vec!["get_info", "get_info", "get_transaction_pool"]
    );
    assert_eq!(harness.connects(), 2);
    assert_eq!(harness.engine.view(), View::Steady);
}

#[test]
fn near_target_daemon_closes_the_rpc_client() {
    let top = h(0xe2);
    let mut harness = Harness::new(
        chain_every_four_minutes(7_001, top, 4),
        vec![
            Reply::Info(info(7_000, 10_000, top)),
            Reply::Info(info(10_000, 10_000, top)),
            Reply::Pool(vec![]),
        ],
    );
    harness.run();

    assert_eq!(
        harness.calls(),
        vec!["get_info", "get_info", "get_transaction_pool"]
    );
    assert_eq!(harness.connects(), 3);
}

#[test]
fn target_is_not_refreshed_before_the_interval() {
    let top = h(0xe3);
    let mut harness = Harness::new(
        chain_every_four_minutes(1_001, top, 3),
        vec![Reply::Info(info(1_000, 10_000, top))],
    );
    harness.run();

    assert_eq!(harness.calls(), vec!["get_info"]);
    assert!(harness.elapsed() >= Duration::from_secs(12 * 60));
    assert_eq!(
        harness.engine.view(),
        View::Syncing(SyncPhase::CatchingUp)
    );
}

#[test]
fn silence_while_catching_up_rechecks_the_daemon() {
    let top = h(0xe4);
    let mut harness = Harness::new(
        vec![Step::Quiet(NO_PUBS_TIMEOUT + Duration::from_secs(1))],
        vec![
            Reply::Info(info(1_000, 10_000, top)),
            Reply::Info(info(10_000, 10_000, top)),
            Reply::Pool(vec![]),
        ],
    );
    harness.run();

    let label = format!("mainnet@{RPC_ADDRESS}");
    assert_eq!(
        harness.sync_labels(),
        vec![
            ("@disconnected".to_string(), 0),
            (label.clone(), 10),
            ("@disconnected".to_string(), 10),
            (label, 100),
        ]
    );
    assert_eq!(
        harness.calls(),
        vec!["get_info", "get_info", "get_transaction_pool"]
    );
    assert!(harness.elapsed() >= NO_PUBS_TIMEOUT + CAUGHT_UP_HOLD);
}

#[test]
fn each_frame_restarts_the_silence_window() {
    let top = h(0xe5);
    let mut harness = Harness::new(
        vec![
            Step::Quiet(Duration::from_secs(4 * 60)),
            txpool_add(&[h(0xe6)]),
            Step::Quiet(Duration::from_secs(4 * 60)),
        ],
        vec![Reply::Info(info(1, 1, top)), Reply::Pool(vec![])],
    );
    harness.run();

    // eight quiet minutes in total, never five in a row
    assert_eq!(harness.calls(), vec!["get_info", "get_transaction_pool"]);
    assert_eq!(harness.engine.view(), View::Steady);
    let last = harness.engine.state().last_pub_at.unwrap();
    assert_eq!(last - harness.start, CAUGHT_UP_HOLD + Duration::from_secs(4 * 60));
}

#[test]
fn carousel_start_is_redrawn_for_every_wait() {
    let txs: Vec<Hash256> = (0..8).map(|i| h(0x70 + i)).collect();
    let encoded: Vec<_> = txs.iter().map(|t| z85(t).unwrap()).collect();

    let mut seeds = Vec::new();
    for frames in 1..=8 {
        let feed = (0..frames).map(|_| txpool_add(&[txs[0]])).collect();
        let mut harness = Harness::new(
            feed,
            vec![Reply::Info(info(1, 1, h(0x6f))), Reply::Pool(txs.clone())],
        );
        harness.run();
        let seed = harness.engine.next_seed().unwrap();
        assert!(encoded.contains(&seed));
        seeds.push(seed);
    }
    // frames cost no simulated time, so only the cursor draws differ
    seeds.dedup();
    assert!(seeds.len() > 1, "cursor start never moved");
}
