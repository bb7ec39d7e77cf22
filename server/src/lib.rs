//! The concurrent TCP server: accept loop, per-connection workers, and
//! the ambient stack (config, logging, metrics, cooperative shutdown)
//! around them.
//!
//! `rpc` owns *what* a request means (registry, schema, dispatch); this
//! crate owns *how bytes get there* — binding a socket, reading exactly
//! one request frame per connection, writing exactly one response frame
//! back, and tearing everything down within a bounded budget.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod server;
pub mod shutdown;
pub mod worker;

pub use config::ServerConfig;
pub use error::ServerError;
pub use logging::{init_logging, LogFormat};
pub use metrics::ServerMetrics;
pub use server::Server;
pub use shutdown::ShutdownController;
