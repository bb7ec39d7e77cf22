//! Procedure registry, schema validation, and JSON-RPC dispatch.
//!
//! This crate is the dispatcher half of the RPC engine: given a registry
//! of named procedures and a raw request frame body, it parses the
//! JSON-RPC envelope, validates input/output against any registered
//! schema, runs the handler, and assembles the response envelope. The
//! `server` crate owns everything about *how* bytes get here (accept
//! loop, per-connection worker, framing) — this crate only knows about
//! one request body in, one response envelope out.

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod schema_validator;

pub use context::Context;
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, HandlerError, SchemaViolation};
pub use registry::{Handler, Procedure, Registry, RegistryBuilder, RegistryError};
pub use schema_validator::SchemaValidator;
