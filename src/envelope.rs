//! Call envelopes exchanged between script and native code.
//!
//! Wire format: `{"id": <integer>, "method": "<name>", "params": [...]}`.

use crate::json;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

/// An inbound call request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Sequence number minted by the caller, as raw text
    pub id: String,
    /// Name of the binding to invoke
    pub method: String,
    /// Raw JSON text of the argument array
    pub params: String,
}

impl Envelope {
    /// Pull `id`, `method` and `params` out of a raw message.
    ///
    /// Missing members come back empty. Returns `None` when there is no
    /// method to dispatch to.
    pub fn parse(raw: &str) -> Option<Self> {
        let method = json::parse(raw, "method", 0);
        if method.is_empty() {
            return None;
        }
        Some(Self {
            id: json::parse(raw, "id", 0),
            method,
            params: json::parse(raw, "params", 0),
        })
    }

    /// Encode a call envelope
    pub fn encode(id: u64, method: &str, params: &[Value]) -> String {
        serde_json::json!({
            "id": id,
            "method": method,
            "params": params,
        })
        .to_string()
    }
}

/// Native counterpart of the script-side RPC namespace.
///
/// Mints monotonically increasing sequence numbers starting at 1, the same way
/// the installed stubs do, so native code can originate calls in the wire
/// format.
#[derive(Debug)]
pub struct RpcNamespace {
    next_seq: AtomicU64,
}

impl Default for RpcNamespace {
    fn default() -> Self {
        Self {
            next_seq: AtomicU64::new(1),
        }
    }
}

impl RpcNamespace {
    /// Create a namespace whose first call gets id 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the envelope for a call, returning its id and text
    pub fn call(&self, method: &str, params: &[Value]) -> (u64, String) {
        let id = self.next_seq.fetch_add(1, Ordering::Relaxed);
        (id, Envelope::encode(id, method, params))
    }

    /// Id the next call will receive
    pub fn peek_next(&self) -> u64 {
        self.next_seq.load(Ordering::Relaxed)
    }
}
