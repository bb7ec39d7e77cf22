//! Stub WebSocket server.

/// A placeholder for a real HTTP/WebSocket listener.
///
/// A complete implementation would bind its own socket, speak HTTP/1.1
/// well enough to perform the WebSocket upgrade handshake, and push
/// `procd_types`-shaped events to subscribed clients. None of that is
/// implemented here — this crate exists to keep the dependency direction
/// (this crate depends on `procd-types`, nothing depends on this crate)
/// a structural fact rather than a convention someone could quietly break.
pub struct WebSocketServer {
    pub port: u16,
}

impl WebSocketServer {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        todo!("bind a socket, perform the WebSocket upgrade handshake, and fan out subscription events")
    }
}
