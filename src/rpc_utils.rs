//! JSON-RPC 2.0 envelopes for the daemon's request/reply socket.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{Error, Result};

pub const GET_INFO: &str = "get_info";
pub const GET_TRANSACTION_POOL: &str = "get_transaction_pool";

pub fn request_body(id: u32, method: &str) -> Vec<u8> {
    json!({"jsonrpc":"2.0","id":id,"method":method,"params":{}})
        .to_string()
        .into_bytes()
}

/// Extracts and decodes `result`, surfacing a JSON-RPC `error` object as [`Error::Rpc`].
pub fn parse_reply<T: DeserializeOwned>(method: &'static str, reply: &[u8]) -> Result<T> {
    let mut v: Value = serde_json::from_slice(reply).map_err(|e| Error::schema(method, e))?;
    if let Some(err) = v.get("error").filter(|e| !e.is_null()) {
        let code = err.get("code").and_then(|c| c.as_i64()).unwrap_or_default();
        let message = err
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("rpc error")
            .to_string();
        return Err(Error::Rpc { code, message });
    }
    match v.get_mut("result") {
        Some(result) => serde_json::from_value(result.take()).map_err(|e| Error::schema(method, e)),
        None => Err(Error::InvalidPayload {
            context: method,
            reason: "reply missing field `result`",
        }),
    }
}
