//! ZMQ REQ client for the daemon's JSON-RPC socket.
//!
//! A client is one REQ socket. The coordination loop drops it after any error
//! and whenever the daemon is close to its target, so a half-finished
//! request/reply exchange never poisons the next call.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::{
    engine::{NodeRpc, RpcConnector},
    error::{Error, Result},
    rpc_utils::{parse_reply, request_body, GET_INFO, GET_TRANSACTION_POOL},
    types::{GetInfoResult, Hash256, NodeInfo, TransactionPoolResult},
    wake::WakeChannel,
};

pub struct ZmqRpcConnector {
    ctx: zmq::Context,
    address: String,
    wake: WakeChannel,
    timeout: Duration,
}

impl ZmqRpcConnector {
    pub fn new(ctx: zmq::Context, address: String, wake: WakeChannel, timeout: Duration) -> Self {
        Self {
            ctx,
            address,
            wake,
            timeout,
        }
    }
}

impl RpcConnector for ZmqRpcConnector {
    type Client = ZmqRpc;

    fn address(&self) -> &str {
        &self.address
    }

    fn connect(&mut self) -> Result<ZmqRpc> {
        let socket = self
            .ctx
            .socket(zmq::REQ)
            .map_err(|e| Error::transport("create REQ socket", e))?;
        socket
            .set_linger(0)
            .map_err(|e| Error::transport("set REQ linger", e))?;
        socket
            .connect(&self.address)
            .map_err(|e| Error::transport("connect REQ socket", e))?;
        log::debug!("rpc socket opened to {}", self.address);
        Ok(ZmqRpc {
            socket,
            wake: self.wake.clone(),
            timeout: self.timeout,
            next_id: 0,
        })
    }
}

pub struct ZmqRpc {
    socket: zmq::Socket,
    wake: WakeChannel,
    timeout: Duration,
    next_id: u32,
}

impl ZmqRpc {
    fn call<T: DeserializeOwned>(&mut self, method: &'static str) -> Result<T> {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let body = request_body(id, method);
        loop {
            match self.socket.send(body.as_slice(), 0) {
                Ok(()) => break,
                Err(zmq::Error::EINTR) => continue,
                Err(e) => return Err(Error::transport("send rpc request", e)),
            }
        }

        if !self.wake.poll(Some(&self.socket), Some(self.timeout))? {
            log::warn!("⚠️ {method} got no reply within {:?}", self.timeout);
            return Err(Error::RpcTimeout { method });
        }

        let reply = loop {
            match self.socket.recv_multipart(zmq::DONTWAIT) {
                Ok(parts) => break parts.concat(),
                Err(zmq::Error::EINTR) => continue,
                Err(zmq::Error::EAGAIN) => return Err(Error::WouldBlock),
                Err(e) => return Err(Error::transport("receive rpc reply", e)),
            }
        };
        parse_reply(method, &reply)
    }
}

impl NodeRpc for ZmqRpc {
    fn get_info(&mut self) -> Result<NodeInfo> {
        let result: GetInfoResult = self.call(GET_INFO)?;
        Ok(result.info)
    }

    fn get_transaction_pool(&mut self) -> Result<Vec<Hash256>> {
        let result: TransactionPoolResult = self.call(GET_TRANSACTION_POOL)?;
        Ok(result.transactions.into_iter().map(|t| t.tx_hash).collect())
    }
}
