// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A single TCP connection to one node, plus the legacy HTTP transport
//! used for bucket-property resets (`spec.md` §4.B, §6).
//!
//! Unlike the teacher's `ClientConnection`, which multiplexes many
//! concurrent requests over one socket by initiator task tag, a Riak
//! binary-protocol connection serves exactly one request at a time: the
//! pool hands out whole connections, never shares one across concurrent
//! callers (`spec.md` §4.B, §4.C).

use std::time::Duration;

use tokio::{net::TcpStream, time::timeout};

use crate::{
    config::NodeConfig,
    error::RiakError,
    protocol::{
        frame,
        wire::WireMessage,
    },
};

/// Marks a streaming response payload as carrying its own
/// terminal-frame marker, so [`Connection::write_read_streaming`] knows
/// when to stop reading (`spec.md` §4.B "Streaming").
pub trait StreamingResponse: WireMessage {
    fn is_done(&self) -> bool;
    fn continuation(&self) -> Option<&bytes::Bytes> {
        None
    }
}

impl StreamingResponse for crate::protocol::messages::ListBucketsResp {
    fn is_done(&self) -> bool {
        self.done
    }
}

impl StreamingResponse for crate::protocol::messages::ListKeysResp {
    fn is_done(&self) -> bool {
        self.done
    }
}

impl StreamingResponse for crate::protocol::messages::IndexResp {
    fn is_done(&self) -> bool {
        self.done
    }

    fn continuation(&self) -> Option<&bytes::Bytes> {
        self.continuation.as_ref()
    }
}

impl StreamingResponse for crate::protocol::messages::MapRedResp {
    fn is_done(&self) -> bool {
        self.done
    }
}

impl StreamingResponse for crate::protocol::messages::SearchQueryResp {
    fn is_done(&self) -> bool {
        self.done
    }
}

/// One live TCP connection, bound to a single node.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    pub node_name: String,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl Connection {
    pub async fn connect(node: &NodeConfig) -> Result<Self, RiakError> {
        let addr = node.pb_address();
        let stream = timeout(node.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| RiakError::communication(format!("connect to {addr} timed out")))?
            .map_err(|e| RiakError::communication(format!("connect to {addr} failed: {e}")))?;
        stream
            .set_nodelay(true)
            .map_err(|e| RiakError::communication(format!("set_nodelay failed: {e}")))?;
        Ok(Self {
            stream,
            node_name: node.name.clone(),
            read_timeout: node.read_timeout,
            write_timeout: node.write_timeout,
        })
    }

    /// Writes `req` without reading anything back; the first half of a
    /// caller-driven lazy stream (`spec.md` §4.B
    /// `write_read_streaming_delayed`). Crate-internal: used by
    /// [`crate::stream::RiakStream`].
    pub(crate) async fn write_request<T: WireMessage>(&mut self, req: &T) -> Result<(), RiakError> {
        self.write(req).await
    }

    /// Reads one typed frame without writing a request first; the
    /// per-item half of the lazy-stream contract above.
    pub(crate) async fn read_response<T: WireMessage>(&mut self) -> Result<T, RiakError> {
        self.read().await
    }

    async fn write<T: WireMessage>(&mut self, msg: &T) -> Result<(), RiakError> {
        timeout(self.write_timeout, frame::write_typed(&mut self.stream, msg))
            .await
            .map_err(|_| RiakError::communication(format!("write to {} timed out", self.node_name)))?
    }

    async fn read<T: WireMessage>(&mut self) -> Result<T, RiakError> {
        timeout(self.read_timeout, frame::read_typed::<_, T>(&mut self.stream))
            .await
            .map_err(|_| RiakError::communication(format!("read from {} timed out", self.node_name)))?
    }

    /// Sends `req` and reads back one typed response frame.
    pub async fn write_read<Req, Resp>(&mut self, req: &Req) -> Result<Resp, RiakError>
    where
        Req: WireMessage,
        Resp: WireMessage,
    {
        self.write(req).await?;
        self.read().await
    }

    /// Sends `req` and drives a streaming response to completion,
    /// invoking `on_item` for every frame (including the terminal one).
    ///
    /// Returns the terminal frame's continuation token, if any
    /// (`spec.md` §4.B: 2i and map-reduce queries resume from it).
    pub async fn write_read_streaming<Req, Resp, F>(
        &mut self,
        req: &Req,
        mut on_item: F,
    ) -> Result<Option<bytes::Bytes>, RiakError>
    where
        Req: WireMessage,
        Resp: StreamingResponse,
        F: FnMut(Resp) -> Result<(), RiakError>,
    {
        self.write(req).await?;
        loop {
            let resp: Resp = self.read().await?;
            let done = resp.is_done();
            let continuation = resp.continuation().cloned();
            on_item(resp)?;
            if done {
                return Ok(continuation);
            }
        }
    }
}

/// The legacy HTTP transport for operations with no binary-protocol
/// counterpart (`spec.md` §6: bucket-properties reset).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, RiakError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RiakError::communication(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// `DELETE /buckets/<bucket>/props`. Maps `204 -> Ok`, `404 -> NotFound`,
    /// anything else to `InvalidResponse` carrying the status code.
    pub async fn reset_bucket_properties(&self, node: &NodeConfig, bucket: &[u8]) -> Result<(), RiakError> {
        let bucket = String::from_utf8_lossy(bucket);
        let url = format!("{}/buckets/{}/props", node.http_base_url(), bucket);
        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| RiakError::communication(format!("HTTP request to {url} failed: {e}")))?;
        match resp.status().as_u16() {
            204 => Ok(()),
            404 => Err(RiakError::not_found()),
            status => Err(RiakError::invalid_response(format!("unexpected HTTP status {status} from {url}"))),
        }
    }

    /// `PUT /buckets/<bucket>/props` with a JSON-encoded `{"props": {...}}`
    /// body; the legacy companion to [`Self::reset_bucket_properties`] for
    /// servers reached only over the HTTP sub-interface (`spec.md` §6).
    /// Only the fields the caller set are included in the body, mirroring
    /// [`crate::options`]'s populate-only-what's-set discipline.
    pub async fn set_bucket_properties(
        &self,
        node: &NodeConfig,
        bucket: &[u8],
        props: &crate::model::BucketProps,
    ) -> Result<(), RiakError> {
        let bucket = String::from_utf8_lossy(bucket);
        let url = format!("{}/buckets/{}/props", node.http_base_url(), bucket);

        let mut fields = serde_json::Map::new();
        if let Some(n_val) = props.n_val {
            fields.insert("n_val".to_string(), serde_json::Value::from(n_val));
        }
        if let Some(allow_mult) = props.allow_mult {
            fields.insert("allow_mult".to_string(), serde_json::Value::from(allow_mult));
        }
        if let Some(last_write_wins) = props.last_write_wins {
            fields.insert("last_write_wins".to_string(), serde_json::Value::from(last_write_wins));
        }
        let mut body = serde_json::Map::new();
        body.insert("props".to_string(), serde_json::Value::Object(fields));

        let resp = self
            .client
            .put(&url)
            .json(&serde_json::Value::Object(body))
            .send()
            .await
            .map_err(|e| RiakError::communication(format!("HTTP request to {url} failed: {e}")))?;
        match resp.status().as_u16() {
            204 => Ok(()),
            status => Err(RiakError::invalid_response(format!("unexpected HTTP status {status} from {url}"))),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new().expect("default HTTP client configuration is always valid")
    }
}
