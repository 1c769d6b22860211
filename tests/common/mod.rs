//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Read one HTTP/1.1 request, returning (method, path, body).
async fn read_request(socket: &mut TcpStream) -> Option<(String, String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some((method, path, body))
}

/// Start a programmable HTTP backend on an ephemeral port.
///
/// The handler gets (method, path, body) and returns (status, content type, body).
pub async fn start_programmable_backend<F>(f: F) -> SocketAddr
where
    F: Fn(&str, &str, &str) -> (u16, &'static str, String) + Send + Sync + 'static,
{
    start_async_backend(move |method, path, body| {
        let response = f(&method, &path, &body);
        async move { response }
    })
    .await
}

/// Like [`start_programmable_backend`], with a handler that may await
/// before answering.
pub async fn start_async_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String, String, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, &'static str, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some((method, path, body)) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, content_type, body) = f(method, path, body).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            content_type,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a static file host serving `files` by path; anything else is 404.
pub async fn start_static_host(files: Vec<(&'static str, String)>) -> SocketAddr {
    start_programmable_backend(move |_, path, _| {
        match files.iter().find(|(p, _)| *p == path) {
            Some((_, body)) => (200, "application/json", body.clone()),
            None => (404, "text/plain", "not found".to_string()),
        }
    })
    .await
}

/// Start a JSON-RPC node. The handler maps (method, params) to a result;
/// `None` becomes a JSON-RPC error.
pub async fn start_rpc_node<F>(f: F) -> SocketAddr
where
    F: Fn(&str, &Value) -> Option<Value> + Send + Sync + 'static,
{
    start_programmable_backend(move |_, _, body| {
        let request: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let method = request.get("method").and_then(Value::as_str).unwrap_or_default();
        let params = request.get("params").cloned().unwrap_or(Value::Null);

        let response = match f(method, &params) {
            Some(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            None => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("unsupported: {}", method) }
            }),
        };
        (200, "application/json", response.to_string())
    })
    .await
}

/// Calldata of an `eth_call` request, hex encoded with 0x prefix.
pub fn call_input(params: &Value) -> String {
    let tx = &params[0];
    tx.get("input")
        .or_else(|| tx.get("data"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase()
}
