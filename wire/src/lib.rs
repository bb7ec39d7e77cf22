//! The wire layer: encoding/decoding the length-prefixed frame, and a
//! bounded reader that enforces per-read deadlines and cooperative
//! cancellation over an async stream.

pub mod codec;
pub mod error;
pub mod reader;

pub use codec::FrameCodec;
pub use error::WireError;
pub use reader::BoundedReader;
