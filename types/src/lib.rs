//! Fundamental types for the procd RPC engine.
//!
//! This crate defines the data model shared across every other crate in
//! the workspace: the wire frame shape, the JSON-RPC envelope, the schema
//! tree used for input/output validation, and the gRPC status codes
//! procedures fail with.

pub mod envelope;
pub mod frame;
pub mod schema;
pub mod status;

pub use envelope::{JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse};
pub use frame::{Frame, DEFAULT_MAX_PAYLOAD_BYTES, FRAME_HEADER_LEN};
pub use schema::Schema;
pub use status::GrpcStatus;
