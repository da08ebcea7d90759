//! ZMQ SUB client for the daemon's pub socket.

use std::time::Duration;

use crate::{
    engine::Subscription,
    error::{Error, Result},
    topics::{Frame, Topic},
    wake::WakeChannel,
};

pub struct ZmqSubscription {
    socket: zmq::Socket,
    wake: WakeChannel,
}

impl ZmqSubscription {
    pub fn connect(ctx: &zmq::Context, address: &str, wake: WakeChannel) -> Result<Self> {
        let socket = ctx
            .socket(zmq::SUB)
            .map_err(|e| Error::transport("create SUB socket", e))?;
        socket
            .set_linger(0)
            .map_err(|e| Error::transport("set SUB linger", e))?;
        socket
            .connect(address)
            .map_err(|e| Error::transport("connect SUB socket", e))?;
        log::info!("📡 subscribed to pub socket at {address}");
        Ok(Self { socket, wake })
    }
}

impl Subscription for ZmqSubscription {
    fn subscribe(&mut self, topic: Topic) -> Result<()> {
        log::debug!("subscribe {}", topic.as_str());
        self.socket
            .set_subscribe(topic.as_str().as_bytes())
            .map_err(|e| Error::transport("subscribe", e))
    }

    fn unsubscribe(&mut self, topic: Topic) -> Result<()> {
        log::debug!("unsubscribe {}", topic.as_str());
        self.socket
            .set_unsubscribe(topic.as_str().as_bytes())
            .map_err(|e| Error::transport("unsubscribe", e))
    }

    fn poll_readable(&mut self, timeout: Option<Duration>) -> Result<bool> {
        self.wake.poll(Some(&self.socket), timeout)
    }

    fn receive_nonblocking(&mut self) -> Result<Option<Frame>> {
        loop {
            match self.socket.recv_multipart(zmq::DONTWAIT) {
                Ok(parts) => return Ok(Some(Frame::new(parts.concat()))),
                Err(zmq::Error::EAGAIN) => return Ok(None),
                Err(zmq::Error::EINTR) => continue,
                Err(e) => return Err(Error::transport("receive pub", e)),
            }
        }
    }

    fn pause(&mut self, duration: Duration) -> Result<()> {
        self.wake.sleep(duration)
    }
}
