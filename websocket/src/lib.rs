//! Contract stub for a future HTTP/WebSocket collaborator.
//!
//! The RPC core in `procd-server`/`procd-rpc` never depends on this crate —
//! the dependency only runs the other way, so "the core is implementable
//! without HTTP/WebSocket" is a fact `cargo` enforces, not just a claim in
//! a document. This crate documents the shape a real collaborator would
//! take: its own accept/upgrade path, its own framing, sharing only the
//! data types in `procd_types` (`Schema`, the JSON-RPC envelope) with the
//! core if it wants typed subscription payloads.
//!
//! Nothing here is wired up; `WebSocketServer::start` is unimplemented.

pub mod server;
pub mod subscriptions;

pub use server::WebSocketServer;
