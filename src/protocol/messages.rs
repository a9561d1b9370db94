// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Typed request/response payloads for every message code this crate
//! knows how to frame.
//!
//! Each type implements [`WireMessage`]; the frame codec calls
//! `encode`/`decode` and otherwise never looks inside a payload
//! (`spec.md` §4.A). The wire format used here is this crate's own
//! stand-in for Riak's actual Protocol Buffers schema (see the module
//! doc on `crate::protocol::wire`).

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{
    error::RiakError,
    model::{BucketProps, Content, ContentMetadata, CrdtKind, CrdtOp, CrdtValue, MapEntryKey, MapFieldOp},
    protocol::{
        codes::MessageCode,
        wire::{get_bytes, get_opt_bytes, get_string, put_bytes, put_opt_bytes, require, WireMessage},
    },
};

/// The `error-resp` payload: every round-trip can receive this instead
/// of its expected response code.
#[derive(Debug, Clone)]
pub struct ErrorResp {
    pub errcode: u32,
    pub errmsg: String,
}

impl WireMessage for ErrorResp {
    const CODE: u8 = MessageCode::ErrorResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.errcode);
        put_bytes(buf, self.errmsg.as_bytes());
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        require(buf, 4, "error code")?;
        let errcode = buf.get_u32();
        let errmsg = get_string(buf)?;
        Ok(Self { errcode, errmsg })
    }
}

macro_rules! empty_message {
    ($name:ident, $code:expr) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl WireMessage for $name {
            const CODE: u8 = $code as u8;

            fn encode(&self, _buf: &mut BytesMut) {}

            fn decode(_buf: &mut Bytes) -> Result<Self, RiakError> {
                Ok(Self)
            }
        }
    };
}

empty_message!(PingReq, MessageCode::PingReq);
empty_message!(PingResp, MessageCode::PingResp);
empty_message!(GetServerInfoReq, MessageCode::GetServerInfoReq);
empty_message!(DelResp, MessageCode::DelResp);
empty_message!(SetBucketResp, MessageCode::SetBucketResp);

#[derive(Debug, Clone, Default)]
pub struct GetServerInfoResp {
    pub node: Option<String>,
    pub server_version: Option<String>,
}

impl WireMessage for GetServerInfoResp {
    const CODE: u8 = MessageCode::GetServerInfoResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_bytes(buf, self.node.as_deref().map(str::as_bytes));
        put_opt_bytes(buf, self.server_version.as_deref().map(str::as_bytes));
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let node = get_opt_bytes(buf)?
            .map(|b| String::from_utf8(b.to_vec()))
            .transpose()
            .map_err(|e| RiakError::invalid_response(format!("invalid utf8: {e}")))?;
        let server_version = get_opt_bytes(buf)?
            .map(|b| String::from_utf8(b.to_vec()))
            .transpose()
            .map_err(|e| RiakError::invalid_response(format!("invalid utf8: {e}")))?;
        Ok(Self { node, server_version })
    }
}

fn put_opt_bucket_type(buf: &mut BytesMut, bucket_type: Option<&Bytes>) {
    put_opt_bytes(buf, bucket_type.map(|b| b.as_ref()));
}

fn get_opt_bucket_type(buf: &mut Bytes) -> Result<Option<Bytes>, RiakError> {
    get_opt_bytes(buf)
}

fn put_content(buf: &mut BytesMut, content: &Content) {
    put_bytes(buf, &content.value);
    put_opt_bytes(buf, content.metadata.content_type.as_deref().map(str::as_bytes));
    buf.put_u32(content.metadata.user_metadata.len() as u32);
    for (k, v) in &content.metadata.user_metadata {
        put_bytes(buf, k.as_bytes());
        put_bytes(buf, v.as_bytes());
    }
}

fn get_content(buf: &mut Bytes) -> Result<Content, RiakError> {
    let value = get_bytes(buf)?;
    let content_type = get_opt_bytes(buf)?
        .map(|b| String::from_utf8(b.to_vec()))
        .transpose()
        .map_err(|e| RiakError::invalid_response(format!("invalid utf8: {e}")))?;
    require(buf, 4, "usermeta count")?;
    let n = buf.get_u32() as usize;
    let mut user_metadata = Vec::with_capacity(n.min(64));
    for _ in 0..n {
        let k = get_string(buf)?;
        let v = get_string(buf)?;
        user_metadata.push((k, v));
    }
    Ok(Content { value, metadata: ContentMetadata { content_type, user_metadata } })
}

/// `get-req`. Quorum knobs (R/PR) and the `if_modified` vclock are
/// carried but only honored by a real Riak node; this crate just frames
/// them (`spec.md` §3 "Request options").
#[derive(Debug, Clone, Default)]
pub struct GetReq {
    pub bucket_type: Option<Bytes>,
    pub bucket: Bytes,
    pub key: Bytes,
    pub r: Option<u32>,
    pub pr: Option<u32>,
    pub basic_quorum: Option<bool>,
    pub notfound_ok: Option<bool>,
    pub timeout_ms: Option<u32>,
    pub head: bool,
}

impl WireMessage for GetReq {
    const CODE: u8 = MessageCode::GetReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_bucket_type(buf, self.bucket_type.as_ref());
        put_bytes(buf, &self.bucket);
        put_bytes(buf, &self.key);
        put_opt_u32(buf, self.r);
        put_opt_u32(buf, self.pr);
        put_opt_bool(buf, self.basic_quorum);
        put_opt_bool(buf, self.notfound_ok);
        put_opt_u32(buf, self.timeout_ms);
        buf.put_u8(self.head as u8);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let bucket_type = get_opt_bucket_type(buf)?;
        let bucket = get_bytes(buf)?;
        let key = get_bytes(buf)?;
        let r = get_opt_u32(buf)?;
        let pr = get_opt_u32(buf)?;
        let basic_quorum = get_opt_bool(buf)?;
        let notfound_ok = get_opt_bool(buf)?;
        let timeout_ms = get_opt_u32(buf)?;
        require(buf, 1, "head flag")?;
        let head = buf.get_u8() != 0;
        Ok(Self { bucket_type, bucket, key, r, pr, basic_quorum, notfound_ok, timeout_ms, head })
    }
}

fn put_opt_u32(buf: &mut BytesMut, v: Option<u32>) {
    match v {
        Some(v) => {
            buf.put_u8(1);
            buf.put_u32(v);
        },
        None => buf.put_u8(0),
    }
}

fn get_opt_u32(buf: &mut Bytes) -> Result<Option<u32>, RiakError> {
    require(buf, 1, "option tag")?;
    match buf.get_u8() {
        0 => Ok(None),
        _ => {
            require(buf, 4, "u32 value")?;
            Ok(Some(buf.get_u32()))
        },
    }
}

fn put_opt_bool(buf: &mut BytesMut, v: Option<bool>) {
    match v {
        Some(v) => {
            buf.put_u8(1);
            buf.put_u8(v as u8);
        },
        None => buf.put_u8(0),
    }
}

fn get_opt_bool(buf: &mut Bytes) -> Result<Option<bool>, RiakError> {
    require(buf, 1, "option tag")?;
    match buf.get_u8() {
        0 => Ok(None),
        _ => {
            require(buf, 1, "bool value")?;
            Ok(Some(buf.get_u8() != 0))
        },
    }
}

/// `get-resp`. An absent `vclock` means "no such object"
/// (`spec.md` §3 invariants: materialized as not-found by the façade).
#[derive(Debug, Clone, Default)]
pub struct GetResp {
    pub vclock: Option<Bytes>,
    pub content: Vec<Content>,
}

impl WireMessage for GetResp {
    const CODE: u8 = MessageCode::GetResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_bytes(buf, self.vclock.as_deref());
        buf.put_u32(self.content.len() as u32);
        for c in &self.content {
            put_content(buf, c);
        }
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let vclock = get_opt_bytes(buf)?;
        require(buf, 4, "content count")?;
        let n = buf.get_u32() as usize;
        let mut content = Vec::with_capacity(n.min(64));
        for _ in 0..n {
            content.push(get_content(buf)?);
        }
        Ok(Self { vclock, content })
    }
}

/// `put-req`.
#[derive(Debug, Clone)]
pub struct PutReq {
    pub bucket_type: Option<Bytes>,
    pub bucket: Bytes,
    pub key: Option<Bytes>,
    pub vclock: Option<Bytes>,
    pub content: Content,
    pub w: Option<u32>,
    pub dw: Option<u32>,
    pub pw: Option<u32>,
    pub return_body: bool,
    pub timeout_ms: Option<u32>,
}

impl WireMessage for PutReq {
    const CODE: u8 = MessageCode::PutReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_bucket_type(buf, self.bucket_type.as_ref());
        put_bytes(buf, &self.bucket);
        put_opt_bytes(buf, self.key.as_deref());
        put_opt_bytes(buf, self.vclock.as_deref());
        put_content(buf, &self.content);
        put_opt_u32(buf, self.w);
        put_opt_u32(buf, self.dw);
        put_opt_u32(buf, self.pw);
        buf.put_u8(self.return_body as u8);
        put_opt_u32(buf, self.timeout_ms);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let bucket_type = get_opt_bucket_type(buf)?;
        let bucket = get_bytes(buf)?;
        let key = get_opt_bytes(buf)?;
        let vclock = get_opt_bytes(buf)?;
        let content = get_content(buf)?;
        let w = get_opt_u32(buf)?;
        let dw = get_opt_u32(buf)?;
        let pw = get_opt_u32(buf)?;
        require(buf, 1, "return_body flag")?;
        let return_body = buf.get_u8() != 0;
        let timeout_ms = get_opt_u32(buf)?;
        Ok(Self { bucket_type, bucket, key, vclock, content, w, dw, pw, return_body, timeout_ms })
    }
}

/// `put-resp`. Only populated when the request's `return_body` was set.
#[derive(Debug, Clone, Default)]
pub struct PutResp {
    pub vclock: Option<Bytes>,
    pub content: Vec<Content>,
    pub key: Option<Bytes>,
}

impl WireMessage for PutResp {
    const CODE: u8 = MessageCode::PutResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_bytes(buf, self.vclock.as_deref());
        buf.put_u32(self.content.len() as u32);
        for c in &self.content {
            put_content(buf, c);
        }
        put_opt_bytes(buf, self.key.as_deref());
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let vclock = get_opt_bytes(buf)?;
        require(buf, 4, "content count")?;
        let n = buf.get_u32() as usize;
        let mut content = Vec::with_capacity(n.min(64));
        for _ in 0..n {
            content.push(get_content(buf)?);
        }
        let key = get_opt_bytes(buf)?;
        Ok(Self { vclock, content, key })
    }
}

/// `del-req`.
#[derive(Debug, Clone)]
pub struct DelReq {
    pub bucket_type: Option<Bytes>,
    pub bucket: Bytes,
    pub key: Bytes,
    pub vclock: Option<Bytes>,
    pub rw: Option<u32>,
    pub timeout_ms: Option<u32>,
}

impl WireMessage for DelReq {
    const CODE: u8 = MessageCode::DelReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_bucket_type(buf, self.bucket_type.as_ref());
        put_bytes(buf, &self.bucket);
        put_bytes(buf, &self.key);
        put_opt_bytes(buf, self.vclock.as_deref());
        put_opt_u32(buf, self.rw);
        put_opt_u32(buf, self.timeout_ms);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let bucket_type = get_opt_bucket_type(buf)?;
        let bucket = get_bytes(buf)?;
        let key = get_bytes(buf)?;
        let vclock = get_opt_bytes(buf)?;
        let rw = get_opt_u32(buf)?;
        let timeout_ms = get_opt_u32(buf)?;
        Ok(Self { bucket_type, bucket, key, vclock, rw, timeout_ms })
    }
}

/// `list-buckets-req`. `stream = true` requests the multi-frame
/// variant; the façade always drives it to completion (`spec.md` §4.E).
#[derive(Debug, Clone, Default)]
pub struct ListBucketsReq {
    pub bucket_type: Option<Bytes>,
    pub stream: bool,
}

impl WireMessage for ListBucketsReq {
    const CODE: u8 = MessageCode::ListBucketsReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_bucket_type(buf, self.bucket_type.as_ref());
        buf.put_u8(self.stream as u8);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let bucket_type = get_opt_bucket_type(buf)?;
        require(buf, 1, "stream flag")?;
        let stream = buf.get_u8() != 0;
        Ok(Self { bucket_type, stream })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListBucketsResp {
    pub buckets: Vec<Bytes>,
    pub done: bool,
}

impl WireMessage for ListBucketsResp {
    const CODE: u8 = MessageCode::ListBucketsResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.buckets.len() as u32);
        for b in &self.buckets {
            put_bytes(buf, b);
        }
        buf.put_u8(self.done as u8);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        require(buf, 4, "bucket count")?;
        let n = buf.get_u32() as usize;
        let mut buckets = Vec::with_capacity(n.min(64));
        for _ in 0..n {
            buckets.push(get_bytes(buf)?);
        }
        require(buf, 1, "done flag")?;
        let done = buf.get_u8() != 0;
        Ok(Self { buckets, done })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListKeysReq {
    pub bucket_type: Option<Bytes>,
    pub bucket: Bytes,
    pub timeout_ms: Option<u32>,
}

impl WireMessage for ListKeysReq {
    const CODE: u8 = MessageCode::ListKeysReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_bucket_type(buf, self.bucket_type.as_ref());
        put_bytes(buf, &self.bucket);
        put_opt_u32(buf, self.timeout_ms);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let bucket_type = get_opt_bucket_type(buf)?;
        let bucket = get_bytes(buf)?;
        let timeout_ms = get_opt_u32(buf)?;
        Ok(Self { bucket_type, bucket, timeout_ms })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListKeysResp {
    pub keys: Vec<Bytes>,
    pub done: bool,
}

impl WireMessage for ListKeysResp {
    const CODE: u8 = MessageCode::ListKeysResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.keys.len() as u32);
        for k in &self.keys {
            put_bytes(buf, k);
        }
        buf.put_u8(self.done as u8);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        require(buf, 4, "key count")?;
        let n = buf.get_u32() as usize;
        let mut keys = Vec::with_capacity(n.min(64));
        for _ in 0..n {
            keys.push(get_bytes(buf)?);
        }
        require(buf, 1, "done flag")?;
        let done = buf.get_u8() != 0;
        Ok(Self { keys, done })
    }
}

fn put_bucket_props(buf: &mut BytesMut, props: &BucketProps) {
    put_opt_u32(buf, props.n_val);
    put_opt_bool(buf, props.allow_mult);
    put_opt_bool(buf, props.last_write_wins);
}

fn get_bucket_props(buf: &mut Bytes) -> Result<BucketProps, RiakError> {
    let n_val = get_opt_u32(buf)?;
    let allow_mult = get_opt_bool(buf)?;
    let last_write_wins = get_opt_bool(buf)?;
    Ok(BucketProps { n_val, allow_mult, last_write_wins })
}

#[derive(Debug, Clone, Default)]
pub struct GetBucketReq {
    pub bucket_type: Option<Bytes>,
    pub bucket: Bytes,
}

impl WireMessage for GetBucketReq {
    const CODE: u8 = MessageCode::GetBucketReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_bucket_type(buf, self.bucket_type.as_ref());
        put_bytes(buf, &self.bucket);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let bucket_type = get_opt_bucket_type(buf)?;
        let bucket = get_bytes(buf)?;
        Ok(Self { bucket_type, bucket })
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetBucketResp {
    pub props: BucketProps,
}

impl WireMessage for GetBucketResp {
    const CODE: u8 = MessageCode::GetBucketResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_bucket_props(buf, &self.props);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        Ok(Self { props: get_bucket_props(buf)? })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SetBucketReq {
    pub bucket_type: Option<Bytes>,
    pub bucket: Bytes,
    pub props: BucketProps,
}

impl WireMessage for SetBucketReq {
    const CODE: u8 = MessageCode::SetBucketReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_bucket_type(buf, self.bucket_type.as_ref());
        put_bytes(buf, &self.bucket);
        put_bucket_props(buf, &self.props);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let bucket_type = get_opt_bucket_type(buf)?;
        let bucket = get_bytes(buf)?;
        let props = get_bucket_props(buf)?;
        Ok(Self { bucket_type, bucket, props })
    }
}

/// `map-red-req`. Query construction is out of scope (`spec.md` §1); the
/// core only frames the opaque query bytes plus a content-type tag.
#[derive(Debug, Clone)]
pub struct MapRedReq {
    pub request: Bytes,
    pub content_type: String,
}

impl WireMessage for MapRedReq {
    const CODE: u8 = MessageCode::MapRedReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_bytes(buf, &self.request);
        put_bytes(buf, self.content_type.as_bytes());
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let request = get_bytes(buf)?;
        let content_type = get_string(buf)?;
        Ok(Self { request, content_type })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapRedResp {
    pub phase: Option<u32>,
    pub response: Option<Bytes>,
    pub done: bool,
}

impl WireMessage for MapRedResp {
    const CODE: u8 = MessageCode::MapRedResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_u32(buf, self.phase);
        put_opt_bytes(buf, self.response.as_deref());
        buf.put_u8(self.done as u8);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let phase = get_opt_u32(buf)?;
        let response = get_opt_bytes(buf)?;
        require(buf, 1, "done flag")?;
        let done = buf.get_u8() != 0;
        Ok(Self { phase, response, done })
    }
}

/// Secondary-index (2i) query kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexQueryType {
    Eq,
    Range,
}

/// `index-req`.
#[derive(Debug, Clone)]
pub struct IndexReq {
    pub bucket_type: Option<Bytes>,
    pub bucket: Bytes,
    pub index: String,
    pub qtype: IndexQueryType,
    pub key: Option<Bytes>,
    pub range_min: Option<Bytes>,
    pub range_max: Option<Bytes>,
    pub return_terms: bool,
    pub max_results: Option<u32>,
    pub continuation: Option<Bytes>,
}

impl WireMessage for IndexReq {
    const CODE: u8 = MessageCode::IndexReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_bucket_type(buf, self.bucket_type.as_ref());
        put_bytes(buf, &self.bucket);
        put_bytes(buf, self.index.as_bytes());
        buf.put_u8(match self.qtype {
            IndexQueryType::Eq => 0,
            IndexQueryType::Range => 1,
        });
        put_opt_bytes(buf, self.key.as_deref());
        put_opt_bytes(buf, self.range_min.as_deref());
        put_opt_bytes(buf, self.range_max.as_deref());
        buf.put_u8(self.return_terms as u8);
        put_opt_u32(buf, self.max_results);
        put_opt_bytes(buf, self.continuation.as_deref());
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let bucket_type = get_opt_bucket_type(buf)?;
        let bucket = get_bytes(buf)?;
        let index = get_string(buf)?;
        require(buf, 1, "query type")?;
        let qtype = match buf.get_u8() {
            0 => IndexQueryType::Eq,
            1 => IndexQueryType::Range,
            other => return Err(RiakError::invalid_response(format!("unknown index query type {other}"))),
        };
        let key = get_opt_bytes(buf)?;
        let range_min = get_opt_bytes(buf)?;
        let range_max = get_opt_bytes(buf)?;
        require(buf, 1, "return_terms flag")?;
        let return_terms = buf.get_u8() != 0;
        let max_results = get_opt_u32(buf)?;
        let continuation = get_opt_bytes(buf)?;
        Ok(Self {
            bucket_type,
            bucket,
            index,
            qtype,
            key,
            range_min,
            range_max,
            return_terms,
            max_results,
            continuation,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndexResp {
    pub keys: Vec<Bytes>,
    /// `(term, key)` pairs, populated only when `return_terms` was set.
    pub results: Vec<(Bytes, Bytes)>,
    pub continuation: Option<Bytes>,
    pub done: bool,
}

impl WireMessage for IndexResp {
    const CODE: u8 = MessageCode::IndexResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.keys.len() as u32);
        for k in &self.keys {
            put_bytes(buf, k);
        }
        buf.put_u32(self.results.len() as u32);
        for (term, key) in &self.results {
            put_bytes(buf, term);
            put_bytes(buf, key);
        }
        put_opt_bytes(buf, self.continuation.as_deref());
        buf.put_u8(self.done as u8);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        require(buf, 4, "key count")?;
        let nk = buf.get_u32() as usize;
        let mut keys = Vec::with_capacity(nk.min(64));
        for _ in 0..nk {
            keys.push(get_bytes(buf)?);
        }
        require(buf, 4, "result count")?;
        let nr = buf.get_u32() as usize;
        let mut results = Vec::with_capacity(nr.min(64));
        for _ in 0..nr {
            let term = get_bytes(buf)?;
            let key = get_bytes(buf)?;
            results.push((term, key));
        }
        let continuation = get_opt_bytes(buf)?;
        require(buf, 1, "done flag")?;
        let done = buf.get_u8() != 0;
        Ok(Self { keys, results, continuation, done })
    }
}

/// `search-query-req` (Riak Search / Yokozuna).
#[derive(Debug, Clone)]
pub struct SearchQueryReq {
    pub index: String,
    pub query: String,
    pub rows: Option<u32>,
    pub start: Option<u32>,
}

impl WireMessage for SearchQueryReq {
    const CODE: u8 = MessageCode::SearchQueryReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_bytes(buf, self.index.as_bytes());
        put_bytes(buf, self.query.as_bytes());
        put_opt_u32(buf, self.rows);
        put_opt_u32(buf, self.start);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let index = get_string(buf)?;
        let query = get_string(buf)?;
        let rows = get_opt_u32(buf)?;
        let start = get_opt_u32(buf)?;
        Ok(Self { index, query, rows, start })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchQueryResp {
    /// Each doc is a flat list of `(field, value)` pairs.
    pub docs: Vec<Vec<(String, Bytes)>>,
    pub max_score: Option<f32>,
    pub num_found: Option<u32>,
    pub done: bool,
}

impl WireMessage for SearchQueryResp {
    const CODE: u8 = MessageCode::SearchQueryResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.docs.len() as u32);
        for doc in &self.docs {
            buf.put_u32(doc.len() as u32);
            for (field, value) in doc {
                put_bytes(buf, field.as_bytes());
                put_bytes(buf, value);
            }
        }
        match self.max_score {
            Some(s) => {
                buf.put_u8(1);
                buf.put_f32(s);
            },
            None => buf.put_u8(0),
        }
        put_opt_u32(buf, self.num_found);
        buf.put_u8(self.done as u8);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        require(buf, 4, "doc count")?;
        let nd = buf.get_u32() as usize;
        let mut docs = Vec::with_capacity(nd.min(64));
        for _ in 0..nd {
            require(buf, 4, "field count")?;
            let nf = buf.get_u32() as usize;
            let mut fields = Vec::with_capacity(nf.min(64));
            for _ in 0..nf {
                let field = get_string(buf)?;
                let value = get_bytes(buf)?;
                fields.push((field, value));
            }
            docs.push(fields);
        }
        require(buf, 1, "max_score tag")?;
        let max_score = match buf.get_u8() {
            0 => None,
            _ => {
                require(buf, 4, "max_score value")?;
                Some(buf.get_f32())
            },
        };
        let num_found = get_opt_u32(buf)?;
        require(buf, 1, "done flag")?;
        let done = buf.get_u8() != 0;
        Ok(Self { docs, max_score, num_found, done })
    }
}

/// `counter-update-req` / `counter-get-req`: the legacy, non-CRDT-map
/// counter path that predates `dt-update`/`dt-fetch`.
#[derive(Debug, Clone)]
pub struct CounterUpdateReq {
    pub bucket: Bytes,
    pub key: Bytes,
    pub amount: i64,
    pub returnvalue: bool,
}

impl WireMessage for CounterUpdateReq {
    const CODE: u8 = MessageCode::CounterUpdateReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_bytes(buf, &self.bucket);
        put_bytes(buf, &self.key);
        buf.put_i64(self.amount);
        buf.put_u8(self.returnvalue as u8);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let bucket = get_bytes(buf)?;
        let key = get_bytes(buf)?;
        require(buf, 8, "amount")?;
        let amount = buf.get_i64();
        require(buf, 1, "returnvalue flag")?;
        let returnvalue = buf.get_u8() != 0;
        Ok(Self { bucket, key, amount, returnvalue })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CounterUpdateResp {
    pub value: Option<i64>,
}

impl WireMessage for CounterUpdateResp {
    const CODE: u8 = MessageCode::CounterUpdateResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        match self.value {
            Some(v) => {
                buf.put_u8(1);
                buf.put_i64(v);
            },
            None => buf.put_u8(0),
        }
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        require(buf, 1, "value tag")?;
        let value = match buf.get_u8() {
            0 => None,
            _ => {
                require(buf, 8, "value")?;
                Some(buf.get_i64())
            },
        };
        Ok(Self { value })
    }
}

#[derive(Debug, Clone)]
pub struct CounterGetReq {
    pub bucket: Bytes,
    pub key: Bytes,
}

impl WireMessage for CounterGetReq {
    const CODE: u8 = MessageCode::CounterGetReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_bytes(buf, &self.bucket);
        put_bytes(buf, &self.key);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let bucket = get_bytes(buf)?;
        let key = get_bytes(buf)?;
        Ok(Self { bucket, key })
    }
}

pub type CounterGetResp = CounterUpdateResp;

fn crdt_kind_byte(kind: CrdtKind) -> u8 {
    match kind {
        CrdtKind::Counter => 0,
        CrdtKind::Set => 1,
        CrdtKind::Register => 2,
        CrdtKind::Flag => 3,
        CrdtKind::Map => 4,
    }
}

fn crdt_kind_from_byte(b: u8) -> Result<CrdtKind, RiakError> {
    Ok(match b {
        0 => CrdtKind::Counter,
        1 => CrdtKind::Set,
        2 => CrdtKind::Register,
        3 => CrdtKind::Flag,
        4 => CrdtKind::Map,
        other => return Err(RiakError::invalid_response(format!("unknown CRDT kind {other}"))),
    })
}

fn put_crdt_value(buf: &mut BytesMut, value: &CrdtValue) {
    match value {
        CrdtValue::Counter(v) => {
            buf.put_u8(crdt_kind_byte(CrdtKind::Counter));
            buf.put_i64(*v);
        },
        CrdtValue::Set(items) => {
            buf.put_u8(crdt_kind_byte(CrdtKind::Set));
            buf.put_u32(items.len() as u32);
            for item in items {
                put_bytes(buf, item);
            }
        },
        CrdtValue::Register(v) => {
            buf.put_u8(crdt_kind_byte(CrdtKind::Register));
            put_bytes(buf, v);
        },
        CrdtValue::Flag(v) => {
            buf.put_u8(crdt_kind_byte(CrdtKind::Flag));
            buf.put_u8(*v as u8);
        },
        CrdtValue::Map(entries) => {
            buf.put_u8(crdt_kind_byte(CrdtKind::Map));
            buf.put_u32(entries.len() as u32);
            for (key, value) in entries {
                buf.put_u8(crdt_kind_byte(key.kind));
                put_bytes(buf, &key.name);
                put_crdt_value(buf, value);
            }
        },
    }
}

fn get_crdt_value(buf: &mut Bytes) -> Result<CrdtValue, RiakError> {
    require(buf, 1, "CRDT value kind")?;
    let kind = crdt_kind_from_byte(buf.get_u8())?;
    Ok(match kind {
        CrdtKind::Counter => {
            require(buf, 8, "counter value")?;
            CrdtValue::Counter(buf.get_i64())
        },
        CrdtKind::Set => {
            require(buf, 4, "set size")?;
            let n = buf.get_u32() as usize;
            let mut items = Vec::with_capacity(n.min(64));
            for _ in 0..n {
                items.push(get_bytes(buf)?);
            }
            CrdtValue::Set(items)
        },
        CrdtKind::Register => CrdtValue::Register(get_bytes(buf)?),
        CrdtKind::Flag => {
            require(buf, 1, "flag value")?;
            CrdtValue::Flag(buf.get_u8() != 0)
        },
        CrdtKind::Map => {
            require(buf, 4, "map size")?;
            let n = buf.get_u32() as usize;
            let mut entries = Vec::with_capacity(n.min(64));
            for _ in 0..n {
                require(buf, 1, "map entry kind")?;
                let entry_kind = crdt_kind_from_byte(buf.get_u8())?;
                let name = get_bytes(buf)?;
                let value = get_crdt_value(buf)?;
                entries.push((MapEntryKey { name, kind: entry_kind }, value));
            }
            CrdtValue::Map(entries)
        },
    })
}

fn put_crdt_op(buf: &mut BytesMut, op: &CrdtOp) {
    match op {
        CrdtOp::Counter(delta) => {
            buf.put_u8(0);
            buf.put_i64(*delta);
        },
        CrdtOp::Set { adds, removes } => {
            buf.put_u8(1);
            buf.put_u32(adds.len() as u32);
            for a in adds {
                put_bytes(buf, a);
            }
            buf.put_u32(removes.len() as u32);
            for r in removes {
                put_bytes(buf, r);
            }
        },
        CrdtOp::Register(v) => {
            buf.put_u8(2);
            put_bytes(buf, v);
        },
        CrdtOp::Flag(v) => {
            buf.put_u8(3);
            buf.put_u8(*v as u8);
        },
        CrdtOp::Map { updates, removes } => {
            buf.put_u8(4);
            buf.put_u32(updates.len() as u32);
            for field in updates {
                put_bytes(buf, &field.name);
                buf.put_u8(crdt_kind_byte(field.kind));
                put_crdt_op(buf, &field.op);
            }
            buf.put_u32(removes.len() as u32);
            for key in removes {
                put_bytes(buf, &key.name);
                buf.put_u8(crdt_kind_byte(key.kind));
            }
        },
    }
}

fn get_crdt_op(buf: &mut Bytes) -> Result<CrdtOp, RiakError> {
    require(buf, 1, "CRDT op tag")?;
    Ok(match buf.get_u8() {
        0 => {
            require(buf, 8, "counter delta")?;
            CrdtOp::Counter(buf.get_i64())
        },
        1 => {
            require(buf, 4, "adds count")?;
            let na = buf.get_u32() as usize;
            let mut adds = Vec::with_capacity(na.min(64));
            for _ in 0..na {
                adds.push(get_bytes(buf)?);
            }
            require(buf, 4, "removes count")?;
            let nr = buf.get_u32() as usize;
            let mut removes = Vec::with_capacity(nr.min(64));
            for _ in 0..nr {
                removes.push(get_bytes(buf)?);
            }
            CrdtOp::Set { adds, removes }
        },
        2 => CrdtOp::Register(get_bytes(buf)?),
        3 => {
            require(buf, 1, "flag value")?;
            CrdtOp::Flag(buf.get_u8() != 0)
        },
        4 => {
            require(buf, 4, "update count")?;
            let nu = buf.get_u32() as usize;
            let mut updates = Vec::with_capacity(nu.min(64));
            for _ in 0..nu {
                let name = get_bytes(buf)?;
                require(buf, 1, "field kind")?;
                let kind = crdt_kind_from_byte(buf.get_u8())?;
                let op = get_crdt_op(buf)?;
                updates.push(MapFieldOp { name, kind, op });
            }
            require(buf, 4, "remove count")?;
            let nr = buf.get_u32() as usize;
            let mut removes = Vec::with_capacity(nr.min(64));
            for _ in 0..nr {
                let name = get_bytes(buf)?;
                require(buf, 1, "remove kind")?;
                let kind = crdt_kind_from_byte(buf.get_u8())?;
                removes.push(MapEntryKey { name, kind });
            }
            CrdtOp::Map { updates, removes }
        },
        other => return Err(RiakError::invalid_response(format!("unknown CRDT op tag {other}"))),
    })
}

/// `dt-fetch-req`.
#[derive(Debug, Clone)]
pub struct DtFetchReq {
    pub bucket_type: Bytes,
    pub bucket: Bytes,
    pub key: Bytes,
    pub r: Option<u32>,
    pub include_context: bool,
}

impl WireMessage for DtFetchReq {
    const CODE: u8 = MessageCode::DtFetchReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_bytes(buf, &self.bucket_type);
        put_bytes(buf, &self.bucket);
        put_bytes(buf, &self.key);
        put_opt_u32(buf, self.r);
        buf.put_u8(self.include_context as u8);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let bucket_type = get_bytes(buf)?;
        let bucket = get_bytes(buf)?;
        let key = get_bytes(buf)?;
        let r = get_opt_u32(buf)?;
        require(buf, 1, "include_context flag")?;
        let include_context = buf.get_u8() != 0;
        Ok(Self { bucket_type, bucket, key, r, include_context })
    }
}

#[derive(Debug, Clone)]
pub struct DtFetchResp {
    pub value: Option<CrdtValue>,
    pub context: Option<Bytes>,
}

impl WireMessage for DtFetchResp {
    const CODE: u8 = MessageCode::DtFetchResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        match &self.value {
            Some(v) => {
                buf.put_u8(1);
                put_crdt_value(buf, v);
            },
            None => buf.put_u8(0),
        }
        put_opt_bytes(buf, self.context.as_deref());
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        require(buf, 1, "value tag")?;
        let value = match buf.get_u8() {
            0 => None,
            _ => Some(get_crdt_value(buf)?),
        };
        let context = get_opt_bytes(buf)?;
        Ok(Self { value, context })
    }
}

/// `dt-update-req`. Callers echo the context observed from a prior fetch
/// when their op removes elements (`spec.md` §3 "CRDT value").
#[derive(Debug, Clone)]
pub struct DtUpdateReq {
    pub bucket_type: Bytes,
    pub bucket: Bytes,
    pub key: Option<Bytes>,
    pub context: Option<Bytes>,
    pub op: CrdtOp,
    pub w: Option<u32>,
    pub return_body: bool,
    pub include_context: bool,
}

impl WireMessage for DtUpdateReq {
    const CODE: u8 = MessageCode::DtUpdateReq as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_bytes(buf, &self.bucket_type);
        put_bytes(buf, &self.bucket);
        put_opt_bytes(buf, self.key.as_deref());
        put_opt_bytes(buf, self.context.as_deref());
        put_crdt_op(buf, &self.op);
        put_opt_u32(buf, self.w);
        buf.put_u8(self.return_body as u8);
        buf.put_u8(self.include_context as u8);
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let bucket_type = get_bytes(buf)?;
        let bucket = get_bytes(buf)?;
        let key = get_opt_bytes(buf)?;
        let context = get_opt_bytes(buf)?;
        let op = get_crdt_op(buf)?;
        let w = get_opt_u32(buf)?;
        require(buf, 1, "return_body flag")?;
        let return_body = buf.get_u8() != 0;
        require(buf, 1, "include_context flag")?;
        let include_context = buf.get_u8() != 0;
        Ok(Self { bucket_type, bucket, key, context, op, w, return_body, include_context })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DtUpdateResp {
    pub key: Option<Bytes>,
    pub context: Option<Bytes>,
    pub value: Option<CrdtValue>,
}

impl WireMessage for DtUpdateResp {
    const CODE: u8 = MessageCode::DtUpdateResp as u8;

    fn encode(&self, buf: &mut BytesMut) {
        put_opt_bytes(buf, self.key.as_deref());
        put_opt_bytes(buf, self.context.as_deref());
        match &self.value {
            Some(v) => {
                buf.put_u8(1);
                put_crdt_value(buf, v);
            },
            None => buf.put_u8(0),
        }
    }

    fn decode(buf: &mut Bytes) -> Result<Self, RiakError> {
        let key = get_opt_bytes(buf)?;
        let context = get_opt_bytes(buf)?;
        require(buf, 1, "value tag")?;
        let value = match buf.get_u8() {
            0 => None,
            _ => Some(get_crdt_value(buf)?),
        };
        Ok(Self { key, context, value })
    }
}
