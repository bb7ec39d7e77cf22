use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::trace;

use crate::WireError;

/// Default budget for a single header or body read. Header and body reads
/// each get their own fresh deadline; they do not share a budget.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads an exact number of bytes from an async stream under a deadline,
/// bailing out early if `shutdown` flips to `true`.
///
/// `shutdown` is a `tokio::sync::watch` receiver rather than an atomic
/// bool so the read can `select!` on it instead of polling — the
/// cooperative-cancellation contract from the cancellation model, expressed
/// without a manual spin loop.
pub struct BoundedReader;

impl BoundedReader {
    pub async fn read_exact<R>(
        stream: &mut R,
        buf: &mut [u8],
        timeout: Duration,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<(), WireError>
    where
        R: tokio::io::AsyncRead + Unpin,
    {
        if *shutdown.borrow() {
            return Err(WireError::ConnectionClosed);
        }

        let deadline = Instant::now() + timeout;
        let mut filled = 0usize;

        while filled < buf.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(WireError::Timeout(buf.len() - filled));
            }

            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {
                    return Err(WireError::Timeout(buf.len() - filled));
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        // sender dropped; treat like a never-firing signal and keep reading
                        continue;
                    }
                    if *shutdown.borrow() {
                        return Err(WireError::ConnectionClosed);
                    }
                }
                result = stream.read(&mut buf[filled..]) => {
                    match result {
                        Ok(0) if filled == 0 => return Err(WireError::ConnectionReset),
                        Ok(0) => return Err(WireError::UnexpectedEof),
                        Ok(n) => {
                            filled += n;
                            trace!(filled, total = buf.len(), "bounded read progress");
                        }
                        Err(e) => return Err(WireError::Io(e)),
                    }
                }
            }
        }

        Ok(())
    }
}
