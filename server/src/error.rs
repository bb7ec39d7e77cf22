use thiserror::Error;

/// The server crate's single error seam. Anything that can fail while
/// binding or configuring the server surfaces through here. Per-connection
/// failures (framing, dispatch) never reach this type — they're handled
/// locally by the connection worker and turned into an error response
/// instead, per the propagation policy in the error handling design.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
