//! The per-request bag handed to a procedure handler.
//!
//! A `Context` is created fresh for every dispatched request on an arena
//! owned by the connection worker; handler code never frees anything
//! itself, it just borrows from `arena` for the lifetime of the call.

use std::collections::BTreeMap;

use bumpalo::Bump;
use serde_json::Value;

/// The mutable response slots a handler may write through `json`.
///
/// Handlers normally communicate their result via their `Result<Value,
/// HandlerError>` return value; `response` exists for parity with the
/// HTTP/WebSocket collaborators that share this same `Context` shape (see
/// the `websocket` crate) and for handlers that want to set a non-default
/// status.
#[derive(Debug, Default)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

/// The request-side view a handler can read: the raw frame payload that
/// was dispatched (JSON-RPC envelope and all).
pub struct RequestView<'a> {
    pub body: &'a [u8],
}

/// Per-request context: an arena, the resolved procedure name, the raw
/// request body, and a mutable response buffer.
pub struct Context<'a> {
    pub arena: &'a Bump,
    pub params: BTreeMap<String, String>,
    pub request: RequestView<'a>,
    pub response: Response,
}

impl<'a> Context<'a> {
    pub fn new(arena: &'a Bump, procedure: &str, request_body: &'a [u8]) -> Self {
        let mut params = BTreeMap::new();
        params.insert("procedure".to_string(), procedure.to_string());
        Self {
            arena,
            params,
            request: RequestView { body: request_body },
            response: Response::default(),
        }
    }

    /// Serializes `value` into `response.body` and sets `response.status`
    /// to 200. A convenience for collaborators that want a JSON body
    /// without going through the handler's `Result` return value.
    pub fn json(&mut self, value: &Value) {
        self.response.body = serde_json::to_vec(value).expect("JSON value always serializes");
        self.response.status = 200;
    }
}
