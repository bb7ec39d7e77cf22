//! The connection worker: one task per accepted connection, carrying it
//! through `ReadingHeader -> ReadingBody -> Dispatching -> Writing ->
//! Done`. Every failure is handled locally — nothing here propagates
//! past this function, matching the "unrecoverable errors terminate only
//! this worker" failure semantics.

use std::sync::Arc;
use std::time::Instant;

use bumpalo::Bump;
use procd_rpc::{Dispatcher, Registry};
use procd_types::{Frame, GrpcStatus, JsonRpcResponse, FRAME_HEADER_LEN};
use procd_utils::format_duration;
use procd_wire::{BoundedReader, FrameCodec, WireError};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::metrics::ServerMetrics;

enum WorkOutcome {
    Responded { bytes: Vec<u8>, is_error: bool },
    Abandoned,
}

/// Drives one connection to completion and reports its outcome to the
/// metrics registry. The `TcpStream` is owned by this task alone for its
/// entire lifetime, so closing it (on any exit path, via `Drop` or the
/// explicit `shutdown()` call below) is inherently one-shot — no atomic
/// `is_closed` flag is needed the way the spec's original design uses one.
pub async fn handle_connection(
    mut stream: TcpStream,
    registry: Arc<Registry>,
    config: ServerConfig,
    metrics: Arc<ServerMetrics>,
    mut shutdown: watch::Receiver<bool>,
) {
    let start = Instant::now();
    metrics.connections_accepted.inc();
    metrics.active_workers.inc();

    let outcome = serve_one_request(&mut stream, &registry, &config, &mut shutdown).await;

    match outcome {
        WorkOutcome::Responded { bytes, is_error } => {
            metrics.requests_total.inc();
            if is_error {
                metrics.requests_failed.inc();
            } else {
                metrics.requests_succeeded.inc();
            }
            if let Err(e) = stream.write_all(&bytes).await {
                warn!(error = %e, "failed to write response frame");
            } else if let Err(e) = stream.flush().await {
                warn!(error = %e, "failed to flush response frame");
            }
        }
        WorkOutcome::Abandoned => {
            debug!("connection abandoned without a response");
        }
    }

    metrics.active_workers.dec();
    let elapsed = start.elapsed();
    metrics.connection_duration_ms.observe(elapsed.as_secs_f64() * 1000.0);
    debug!(duration = %format_duration(elapsed.as_secs()), "connection handled");
    let _ = stream.shutdown().await;
}

async fn serve_one_request(
    stream: &mut TcpStream,
    registry: &Registry,
    config: &ServerConfig,
    shutdown: &mut watch::Receiver<bool>,
) -> WorkOutcome {
    let mut header = [0u8; FRAME_HEADER_LEN];
    if let Err(e) = BoundedReader::read_exact(stream, &mut header, config.read_timeout, shutdown).await {
        return match e {
            WireError::Timeout(_) => responded(config, GrpcStatus::DeadlineExceeded, e.to_string()),
            WireError::UnexpectedEof => {
                responded(config, GrpcStatus::InvalidArgument, WireError::IncompleteHeader.to_string())
            }
            WireError::ConnectionReset | WireError::ConnectionClosed => WorkOutcome::Abandoned,
            WireError::Io(err) => {
                warn!(error = %err, "io error reading frame header");
                WorkOutcome::Abandoned
            }
            WireError::IncompleteHeader | WireError::MessageTooLarge { .. } => WorkOutcome::Abandoned,
        };
    }

    let (compressed, length) = match FrameCodec::decode_header(&header) {
        Ok(parsed) => parsed,
        Err(_) => {
            return responded(config, GrpcStatus::InvalidArgument, WireError::IncompleteHeader.to_string())
        }
    };

    if length > config.max_message_bytes {
        // Rejected before allocating a buffer for the declared length, so
        // an oversized declared length never costs a proportional
        // allocation (the quantified invariant in the testable properties).
        return responded(config, GrpcStatus::InvalidArgument, "Message too large".to_string());
    }

    let mut body = vec![0u8; length as usize];
    if !body.is_empty() {
        if let Err(e) = BoundedReader::read_exact(stream, &mut body, config.read_timeout, shutdown).await {
            return match e {
                WireError::Timeout(_) => responded(config, GrpcStatus::DeadlineExceeded, e.to_string()),
                _ => WorkOutcome::Abandoned,
            };
        }
    }

    let arena = Bump::new();
    let response = Dispatcher::dispatch(registry, compressed, &body, &arena);
    let is_error = response.is_error();
    match encode_response(config, &response) {
        Ok(bytes) => WorkOutcome::Responded { bytes, is_error },
        Err(_) => WorkOutcome::Abandoned,
    }
}

fn responded(config: &ServerConfig, status: GrpcStatus, message: String) -> WorkOutcome {
    let response = JsonRpcResponse::error(None, status.code(), message);
    match encode_response(config, &response) {
        Ok(bytes) => WorkOutcome::Responded { bytes, is_error: true },
        Err(_) => WorkOutcome::Abandoned,
    }
}

fn encode_response(config: &ServerConfig, response: &JsonRpcResponse) -> Result<Vec<u8>, WireError> {
    let payload = serde_json::to_vec(&response.to_value()).expect("envelope always serializes");
    let frame = Frame::uncompressed(payload);
    FrameCodec::encode(&frame, config.max_message_bytes)
}
