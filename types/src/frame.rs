//! The gRPC-style length-prefixed frame carried over a plain TCP connection.
//!
//! On the wire a frame is `[u8 compressed][u32 length, big-endian][length
//! bytes of payload]`. This module only describes the shape; encoding and
//! decoding live in the `wire` crate, which can fail in ways this crate's
//! plain data type does not need to model.

/// Size of the frame header: one flag byte plus a 4-byte big-endian length.
pub const FRAME_HEADER_LEN: usize = 5;

/// Default cap on a frame's payload size (10 MiB), matching the hard
/// constant the wire layer enforces unless a server overrides it via
/// `ServerConfig::max_message_bytes`.
pub const DEFAULT_MAX_PAYLOAD_BYTES: u32 = 10 * 1024 * 1024;

/// A decoded frame: whether the payload is (declared) compressed, and the
/// payload bytes themselves. `length` is always `payload.len()` for a
/// frame constructed through [`Frame::new`]; it is kept separately only
/// because it is what actually travels on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub compressed: bool,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(compressed: bool, payload: Vec<u8>) -> Self {
        Self { compressed, payload }
    }

    pub fn uncompressed(payload: Vec<u8>) -> Self {
        Self::new(false, payload)
    }

    pub fn length(&self) -> u32 {
        self.payload.len() as u32
    }
}
