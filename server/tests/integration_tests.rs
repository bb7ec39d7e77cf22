//! Integration tests driving the real `Server` over a loopback `TcpStream`:
//! accept loop → connection worker → wire codec → dispatcher → response,
//! exactly the stack the scenarios in the spec's testable-properties
//! section describe. Unit-level coverage of the dispatcher and schema
//! validator lives next to those modules in `rpc`; this file only covers
//! what can't be observed without a real socket.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use procd_rpc::{Registry, RegistryBuilder};
use procd_server::{Server, ServerConfig, ServerMetrics};
use procd_types::Schema;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn counter_registry() -> Registry {
    let counter = Arc::new(AtomicI64::new(0));
    let mut builder = RegistryBuilder::new();
    builder
        .register(
            "counter",
            Arc::new(move |_ctx, _params| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(json!(n))
            }),
            None,
            None,
        )
        .unwrap();
    builder.build()
}

/// Registry backing S3: an input-schema-validated identity procedure,
/// alongside the plain counter so a single server can also be used for
/// mixed scenarios.
fn validate_registry() -> Registry {
    let mut builder = RegistryBuilder::new();
    builder
        .register(
            "validate",
            Arc::new(|_ctx, params| Ok(params.unwrap_or(serde_json::Value::Null))),
            Some(Schema::object(
                &["message", "count"],
                vec![("message", Schema::String), ("count", Schema::Number)],
            )),
            None,
        )
        .unwrap();
    builder.build()
}

async fn start_server(registry: Registry) -> Server {
    let metrics = Arc::new(ServerMetrics::new());
    let config = ServerConfig { port: 0, ..ServerConfig::default() };
    Server::listen("127.0.0.1:0", registry, config, metrics).await.unwrap()
}

fn frame(compressed: bool, body: &[u8]) -> Vec<u8> {
    let mut out = vec![compressed as u8];
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

async fn read_response(stream: &mut TcpStream) -> serde_json::Value {
    let mut header = [0u8; 5];
    stream.read_exact(&mut header).await.unwrap();
    let len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;
    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn send_request(addr: SocketAddr, body: &[u8]) -> serde_json::Value {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(&frame(false, body)).await.unwrap();
    read_response(&mut stream).await
}

// ---------------------------------------------------------------------------
// S1. Basic counter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn s1_basic_counter_over_real_tcp() {
    let server = start_server(counter_registry()).await;
    let addr = server.local_addr();

    let first = send_request(addr, br#"{"jsonrpc":"2.0","id":"1","method":"counter"}"#).await;
    assert_eq!(first["result"], json!(1));

    let second = send_request(addr, br#"{"jsonrpc":"2.0","id":"2","method":"counter"}"#).await;
    assert_eq!(second["result"], json!(2));

    server.shutdown().await;
}

// ---------------------------------------------------------------------------
// S2. Concurrent counter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn s2_concurrent_counter_then_sequential_call() {
    let server = start_server(counter_registry()).await;
    let addr = server.local_addr();

    let mut handles = Vec::new();
    for _ in 0..3 {
        handles.push(tokio::spawn(async move {
            send_request(addr, br#"{"jsonrpc":"2.0","id":"1","method":"counter"}"#).await
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let fourth = send_request(addr, br#"{"jsonrpc":"2.0","id":"4","method":"counter"}"#).await;
    assert_eq!(fourth["result"], json!(4));

    server.shutdown().await;
}

// ---------------------------------------------------------------------------
// S3. Input schema validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn s3_input_schema_validation_over_real_tcp() {
    let server = start_server(validate_registry()).await;
    let addr = server.local_addr();

    let ok = send_request(
        addr,
        br#"{"id":"1","method":"validate","params":{"message":"hello","count":42}}"#,
    )
    .await;
    assert_eq!(ok["result"], json!({"message": "hello", "count": 42}));

    let missing_count = send_request(
        addr,
        br#"{"id":"1","method":"validate","params":{"message":"hello"}}"#,
    )
    .await;
    assert_eq!(missing_count["error"]["code"], json!(9));
    assert!(missing_count["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid input parameters"));

    let wrong_type = send_request(
        addr,
        br#"{"id":"1","method":"validate","params":{"message":"hello","count":"42"}}"#,
    )
    .await;
    assert_eq!(wrong_type["error"]["code"], json!(9));

    server.shutdown().await;
}

// ---------------------------------------------------------------------------
// S4. Framing errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn s4_compressed_frame_rejected() {
    let server = start_server(counter_registry()).await;
    let addr = server.local_addr();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let body = br#"{"jsonrpc":"2.0","id":"1","method":"counter"}"#;
    stream.write_all(&frame(true, body)).await.unwrap();

    let response = read_response(&mut stream).await;
    assert_eq!(response["error"]["code"], json!(12));
    assert!(response["error"]["message"].as_str().unwrap().contains("Compression not supported"));

    server.shutdown().await;
}

#[tokio::test]
async fn s4_incomplete_header_then_close_yields_invalid_argument() {
    let server = start_server(counter_registry()).await;
    let addr = server.local_addr();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(&[0u8, 0u8, 0u8, 0u8]).await.unwrap();
    stream.shutdown().await.unwrap();

    let response = read_response(&mut stream).await;
    assert_eq!(response["error"]["code"], json!(3));
    assert!(response["error"]["message"].as_str().unwrap().to_lowercase().contains("incomplete header"));

    server.shutdown().await;
}

#[tokio::test]
async fn s4_oversized_declared_length_rejected_without_reading_body() {
    let server = start_server(counter_registry()).await;
    let addr = server.local_addr();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut header = vec![0u8]; // uncompressed
    header.extend_from_slice(&(11u32 * 1024 * 1024).to_be_bytes()); // 11 MiB declared
    stream.write_all(&header).await.unwrap();
    // Deliberately never send the body; the rejection must happen right
    // after the header is decoded, before any body read starts.

    let response = read_response(&mut stream).await;
    assert_eq!(response["error"]["code"], json!(3));
    assert!(response["error"]["message"].as_str().unwrap().contains("Message too large"));

    server.shutdown().await;
}

// ---------------------------------------------------------------------------
// S5. Unknown procedure and bad envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn s5_unknown_procedure_over_real_tcp() {
    let server = start_server(counter_registry()).await;
    let addr = server.local_addr();

    let response = send_request(addr, br#"{"id":"1","method":"nope"}"#).await;
    assert_eq!(response["error"]["code"], json!(3));
    assert!(response["error"]["message"].as_str().unwrap().contains("Method not found: nope"));

    server.shutdown().await;
}

#[tokio::test]
async fn s5_invalid_method_type_over_real_tcp() {
    let server = start_server(counter_registry()).await;
    let addr = server.local_addr();

    let response = send_request(addr, br#"{"id":"1","method":42}"#).await;
    assert_eq!(response["error"]["code"], json!(3));
    assert!(response["error"]["message"].as_str().unwrap().contains("Invalid method type"));

    server.shutdown().await;
}

#[tokio::test]
async fn s5_invalid_json_over_real_tcp() {
    let server = start_server(counter_registry()).await;
    let addr = server.local_addr();

    let response = send_request(addr, b"invalid json").await;
    assert_eq!(response["error"]["code"], json!(3));
    assert!(response["error"]["message"].as_str().unwrap().contains("Invalid JSON request"));
    assert!(response.get("id").is_none());

    server.shutdown().await;
}

// ---------------------------------------------------------------------------
// S6. Shutdown while reading
// ---------------------------------------------------------------------------

#[tokio::test]
async fn s6_shutdown_while_reading_closes_connection_without_response() {
    let server = start_server(counter_registry()).await;
    let addr = server.local_addr();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(&[0u8, 0u8, 0u8]).await.unwrap();

    let shutdown_started = std::time::Instant::now();
    server.shutdown().await;
    assert!(shutdown_started.elapsed() < Duration::from_secs(5));

    let mut buf = [0u8; 1];
    let read = stream.read(&mut buf).await.unwrap();
    assert_eq!(read, 0, "peer should observe the connection closed, not a response");
}
