use thiserror::Error;

/// Errors produced by the wire layer. These are caught by the connection
/// worker, never by the dispatcher: a `Timeout` or `ConnectionReset`
/// happens before there is an envelope to dispatch at all.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("incomplete header")]
    IncompleteHeader,

    #[error("message too large: {len} bytes exceeds the {max} byte limit")]
    MessageTooLarge { len: u32, max: u32 },

    #[error("timed out waiting for {0} bytes")]
    Timeout(usize),

    #[error("connection reset before any bytes were read")]
    ConnectionReset,

    #[error("peer closed connection mid-message")]
    UnexpectedEof,

    #[error("connection closed during shutdown")]
    ConnectionClosed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
