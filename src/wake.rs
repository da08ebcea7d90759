//! Process-wide wake channel.
//!
//! SIGINT and SIGTERM write one byte into a socket pair through signal-hook's
//! self-pipe registration. The read end is never drained, so once signalled it
//! stays readable and every poll that includes it returns `Terminated`.
//! Keyboard quit requests raise SIGINT so they take the same path.

use std::{
    io::IsTerminal,
    os::{
        fd::{AsRawFd, RawFd},
        unix::net::UnixStream,
    },
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};

use signal_hook::consts::signal::{SIGINT, SIGTERM};

use crate::error::{Error, Result};

struct Shared {
    reader: UnixStream,
    signaled: Arc<AtomicBool>,
}

static SHARED: Mutex<Option<Arc<Shared>>> = Mutex::new(None);

#[derive(Clone)]
pub struct WakeChannel {
    shared: Arc<Shared>,
    input_fd: Option<RawFd>,
}

impl WakeChannel {
    /// Registers the signal handlers once per process and returns the channel.
    pub fn install() -> Result<Self> {
        let mut slot = SHARED
            .lock()
            .map_err(|_| Error::Init("wake channel lock poisoned".into()))?;
        if let Some(shared) = slot.as_ref() {
            return Ok(Self {
                shared: Arc::clone(shared),
                input_fd: None,
            });
        }

        let (reader, writer) =
            UnixStream::pair().map_err(|e| Error::Init(format!("wake channel: {e}")))?;
        reader
            .set_nonblocking(true)
            .and_then(|()| writer.set_nonblocking(true))
            .map_err(|e| Error::Init(format!("wake channel: {e}")))?;

        let signaled = Arc::new(AtomicBool::new(false));
        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&signaled))
                .map_err(|e| Error::Init(format!("signal {signal}: {e}")))?;
            let end = writer
                .try_clone()
                .map_err(|e| Error::Init(format!("wake channel: {e}")))?;
            signal_hook::low_level::pipe::register(signal, end)
                .map_err(|e| Error::Init(format!("signal {signal}: {e}")))?;
        }

        let shared = Arc::new(Shared { reader, signaled });
        *slot = Some(Arc::clone(&shared));
        log::debug!("wake channel installed on fd {}", shared.reader.as_raw_fd());
        Ok(Self {
            shared,
            input_fd: None,
        })
    }

    /// Also watches stdin for quit keys when it is a terminal.
    pub fn watch_terminal_input(mut self) -> Self {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            self.input_fd = Some(stdin.as_raw_fd());
        }
        self
    }

    pub fn fd(&self) -> RawFd {
        self.shared.reader.as_raw_fd()
    }

    pub fn is_signaled(&self) -> bool {
        self.shared.signaled.load(Ordering::SeqCst)
    }

    /// Signals the channel from inside the process.
    pub fn request_exit(&self) -> Result<()> {
        signal_hook::low_level::raise(SIGINT).map_err(|e| Error::io("raise SIGINT", e))
    }

    /// Waits for `socket` to become readable. `Ok(false)` on timeout,
    /// `Err(Terminated)` once the channel fires. `None` waits indefinitely.
    pub fn poll(&self, socket: Option<&zmq::Socket>, timeout: Option<Duration>) -> Result<bool> {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            let wait_ms = match deadline {
                Some(d) => ceil_millis(d.saturating_duration_since(Instant::now())),
                None => -1,
            };

            let mut items = Vec::with_capacity(3);
            items.push(zmq::PollItem::from_fd(self.fd(), zmq::POLLIN));
            if let Some(fd) = self.input_fd {
                items.push(zmq::PollItem::from_fd(fd, zmq::POLLIN));
            }
            if let Some(socket) = socket {
                items.push(socket.as_poll_item(zmq::POLLIN));
            }

            match zmq::poll(&mut items, wait_ms) {
                Ok(_) => {}
                Err(zmq::Error::EINTR) => continue,
                Err(e) => return Err(Error::transport("poll", e)),
            }

            if items[0].is_readable() || self.is_signaled() {
                return Err(Error::Terminated);
            }
            if socket.is_some() && items[items.len() - 1].is_readable() {
                return Ok(true);
            }
            if self.input_fd.is_some() && items[1].is_readable() {
                if crate::terminal::drain_input().map_err(|e| Error::io("terminal input", e))? {
                    log::info!("quit requested from keyboard");
                    self.request_exit()?;
                    return Err(Error::Terminated);
                }
                if deadline.map_or(true, |d| Instant::now() < d) {
                    continue;
                }
            }
            return Ok(false);
        }
    }

    /// Sleeps for `timeout` unless the channel fires first.
    pub fn sleep(&self, timeout: Duration) -> Result<()> {
        self.poll(None, Some(timeout)).map(|_| ())
    }
}

fn ceil_millis(d: Duration) -> i64 {
    let nanos = d.as_nanos();
    i64::try_from(nanos.div_ceil(1_000_000)).unwrap_or(i64::MAX)
}
