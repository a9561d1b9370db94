// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use riak_client_rs::config::{ClusterConfig, NodeConfig};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

/// What a mock node does in response to one incoming frame.
pub enum MockAction {
    /// Send back one frame: `(message code, already-encoded body)`.
    Reply(u8, BytesMut),
    /// Drop the connection without replying, simulating a dead node.
    Close,
}

pub type MockHandler = Arc<dyn Fn(u8, Bytes) -> Vec<MockAction> + Send + Sync>;

/// A scripted single-node Riak stand-in: accepts TCP connections, decodes
/// the one-byte code and body of each frame, and hands them to `handler`
/// to script a reply. Closed on drop.
pub struct MockNode {
    pub config: NodeConfig,
    server: JoinHandle<()>,
    connections_accepted: Arc<AtomicUsize>,
}

impl MockNode {
    pub async fn start(name: &str, handler: MockHandler) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock node");
        let addr = listener.local_addr().expect("local addr");

        let connections_accepted = Arc::new(AtomicUsize::new(0));
        let accepted = connections_accepted.clone();
        let server = tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else { return };
                accepted.fetch_add(1, Ordering::SeqCst);
                let handler = handler.clone();
                tokio::spawn(serve_connection(socket, handler));
            }
        });

        let config = NodeConfig {
            name: name.to_string(),
            host: "127.0.0.1".to_string(),
            pb_port: addr.port(),
            http_port: addr.port(),
            pool_size: 4,
            connect_timeout: Duration::from_millis(500),
            read_timeout: Duration::from_secs(2),
            write_timeout: Duration::from_secs(2),
            idle_timeout: Duration::from_secs(60),
        };
        Self { config, server, connections_accepted }
    }

    /// A one-node cluster config pointing at this mock, with no retries.
    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig { nodes: vec![self.config.clone()], retries: 0, cooldown: Duration::from_secs(30) }
    }

    /// A one-node cluster config with the given retry count, for tests
    /// that exercise retry-across-nodes behavior against an unreachable
    /// address instead of a live mock.
    pub fn cluster_config_with_retries(&self, retries: u32) -> ClusterConfig {
        ClusterConfig { nodes: vec![self.config.clone()], retries, cooldown: Duration::from_secs(30) }
    }

    /// How many distinct TCP connections this mock has accepted so far.
    pub fn connections_accepted(&self) -> usize {
        self.connections_accepted.load(Ordering::SeqCst)
    }
}

impl Drop for MockNode {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn serve_connection(mut socket: tokio::net::TcpStream, handler: MockHandler) {
    loop {
        let mut len_buf = [0u8; 4];
        if socket.read_exact(&mut len_buf).await.is_err() {
            return;
        }
        let total = u32::from_be_bytes(len_buf) as usize;
        if total == 0 {
            return;
        }
        let mut rest = vec![0u8; total];
        if socket.read_exact(&mut rest).await.is_err() {
            return;
        }
        let code = rest[0];
        let body = Bytes::copy_from_slice(&rest[1..]);

        for action in handler(code, body) {
            match action {
                MockAction::Reply(resp_code, resp_body) => {
                    let total = 1u32 + resp_body.len() as u32;
                    let mut header = BytesMut::with_capacity(5);
                    header.extend_from_slice(&total.to_be_bytes());
                    header.extend_from_slice(&[resp_code]);
                    if socket.write_all(&header).await.is_err() {
                        return;
                    }
                    if socket.write_all(&resp_body).await.is_err() {
                        return;
                    }
                    if socket.flush().await.is_err() {
                        return;
                    }
                },
                MockAction::Close => return,
            }
        }
    }
}

/// Scripts one HTTP status code per request, for the legacy
/// bucket-properties PUT/DELETE path (`spec.md` §6). Hand-rolled rather
/// than pulled from a mock-HTTP crate, matching `MockNode`'s own
/// raw-`TcpListener` style above.
pub type HttpHandler = Arc<dyn Fn(&str, &str, Vec<u8>) -> u16 + Send + Sync>;

pub struct MockHttpServer {
    pub port: u16,
    server: JoinHandle<()>,
}

impl MockHttpServer {
    pub async fn start(handler: HttpHandler) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock http server");
        let port = listener.local_addr().expect("local addr").port();
        let server = tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else { return };
                tokio::spawn(serve_http_connection(socket, handler.clone()));
            }
        });
        Self { port, server }
    }
}

impl Drop for MockHttpServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn serve_http_connection(mut socket: tokio::net::TcpStream, handler: HttpHandler) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        if buf.len() > 64 * 1024 {
            return;
        }
    };

    let header_str = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = header_str.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let content_length: usize = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => body.extend_from_slice(&chunk[..n]),
        }
    }

    let status = handler(&method, &path, body);
    let reason = match status {
        204 => "No Content",
        404 => "Not Found",
        200 => "OK",
        _ => "Error",
    };
    let response = format!("HTTP/1.1 {status} {reason}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.flush().await;
}

/// A node address nothing is listening on, for retry-exhaustion tests.
pub fn unreachable_node(name: &str) -> NodeConfig {
    NodeConfig {
        name: name.to_string(),
        host: "127.0.0.1".to_string(),
        pb_port: 1,
        http_port: 2,
        pool_size: 1,
        connect_timeout: Duration::from_millis(100),
        read_timeout: Duration::from_millis(100),
        write_timeout: Duration::from_millis(100),
        idle_timeout: Duration::from_secs(60),
    }
}
