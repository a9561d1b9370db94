// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The object model the façade speaks in: key triples, value objects
//! with siblings, bucket properties, and CRDT values (`spec.md` §3).

use bytes::Bytes;

use crate::error::RiakError;

/// An object identifier: `(bucket-type?, bucket, key)`.
///
/// Strings disallow embedded forward-slash and empty values; violation
/// is caught by [`KeyTriple::validate`] before anything touches the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTriple {
    pub bucket_type: Option<Bytes>,
    pub bucket: Bytes,
    pub key: Bytes,
}

impl KeyTriple {
    pub fn new(bucket: impl Into<Bytes>, key: impl Into<Bytes>) -> Self {
        Self { bucket_type: None, bucket: bucket.into(), key: key.into() }
    }

    pub fn with_bucket_type(
        bucket_type: impl Into<Bytes>,
        bucket: impl Into<Bytes>,
        key: impl Into<Bytes>,
    ) -> Self {
        Self {
            bucket_type: Some(bucket_type.into()),
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Validates bucket/key/bucket-type: non-empty, no embedded `/`.
    pub fn validate(&self) -> Result<(), RiakError> {
        validate_component("bucket", &self.bucket)?;
        validate_component("key", &self.key)?;
        if let Some(bt) = &self.bucket_type {
            validate_component("bucket-type", bt)?;
        }
        Ok(())
    }
}

/// Like [`KeyTriple`] but without a key, for bucket-scoped operations
/// (list-keys, bucket properties, delete-bucket).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketId {
    pub bucket_type: Option<Bytes>,
    pub bucket: Bytes,
}

impl BucketId {
    pub fn new(bucket: impl Into<Bytes>) -> Self {
        Self { bucket_type: None, bucket: bucket.into() }
    }

    pub fn validate(&self) -> Result<(), RiakError> {
        validate_component("bucket", &self.bucket)?;
        if let Some(bt) = &self.bucket_type {
            validate_component("bucket-type", bt)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_component(label: &'static str, value: &[u8]) -> Result<(), RiakError> {
    if value.is_empty() {
        return Err(RiakError::validation(format!("{label} must not be empty")));
    }
    if value.contains(&b'/') {
        return Err(RiakError::validation(format!(
            "{label} must not contain a forward-slash"
        )));
    }
    Ok(())
}

/// Per-content metadata the façade round-trips (a subset of Riak's real
/// content metadata, sufficient to exercise put/get/siblings).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentMetadata {
    pub content_type: Option<String>,
    pub user_metadata: Vec<(String, String)>,
}

/// One concurrent value for a key, with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub value: Bytes,
    pub metadata: ContentMetadata,
}

impl Content {
    pub fn new(value: impl Into<Bytes>) -> Self {
        Self { value: value.into(), metadata: ContentMetadata::default() }
    }
}

/// `(key-triple, value-bytes, causal-vector?, siblings?, content-metadata)`.
///
/// `siblings` is non-empty only when the server returned more than one
/// content for the key; every sibling shares the same causal vector as
/// the primary (`spec.md` §8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiakObject {
    pub key: KeyTriple,
    pub content: Content,
    pub vclock: Option<Bytes>,
    pub siblings: Vec<Content>,
}

impl RiakObject {
    pub fn new(key: KeyTriple, content: Content) -> Self {
        Self { key, content, vclock: None, siblings: Vec::new() }
    }

    pub fn has_siblings(&self) -> bool {
        !self.siblings.is_empty()
    }
}

/// A small, open set of bucket properties (`spec.md` §3 "Request
/// options").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketProps {
    pub n_val: Option<u32>,
    pub allow_mult: Option<bool>,
    pub last_write_wins: Option<bool>,
}

/// A CRDT value: counter, set, map (recursive), register, or flag
/// (`spec.md` §3 "CRDT value").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrdtValue {
    Counter(i64),
    Set(Vec<Bytes>),
    Register(Bytes),
    Flag(bool),
    Map(Vec<(MapEntryKey, CrdtValue)>),
}

/// A CRDT map is keyed by `(name, kind)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrdtKind {
    Counter,
    Set,
    Register,
    Flag,
    Map,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntryKey {
    pub name: Bytes,
    pub kind: CrdtKind,
}

/// A single mutation applied by a `dt-update` operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrdtOp {
    /// Increment (or decrement, with a negative delta) a counter.
    Counter(i64),
    /// Add and/or remove elements of a set.
    Set { adds: Vec<Bytes>, removes: Vec<Bytes> },
    /// Overwrite a register's value.
    Register(Bytes),
    /// Set or clear a flag.
    Flag(bool),
    /// Apply nested field operations to a map; removing a field requires
    /// an up-to-date context (`spec.md` §3).
    Map { updates: Vec<MapFieldOp>, removes: Vec<MapEntryKey> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFieldOp {
    pub name: Bytes,
    pub kind: CrdtKind,
    pub op: CrdtOp,
}

/// `ping`/`server-info` round trip result (`spec.md` §3 supplement).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    pub node: Option<String>,
    pub server_version: Option<String>,
}

/// Result of a secondary-index query: plain keys, or `(term, key)` pairs
/// when `return-terms` was set, plus an opaque pagination continuation
/// (`spec.md` §4.E "Map-reduce / search / 2i").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexQueryResult {
    pub keys: Vec<Bytes>,
    pub terms: Vec<(Bytes, Bytes)>,
    pub continuation: Option<Bytes>,
}

/// One exact-match or range secondary-index query.
#[derive(Debug, Clone)]
pub enum IndexQuery {
    Eq(Bytes),
    Range(Bytes, Bytes),
}

/// One map-reduce phase result, streamed as it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRedPhaseResult {
    pub phase: Option<u32>,
    pub response: Option<Bytes>,
}

/// A Riak Search (Yokozuna) result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub docs: Vec<Vec<(String, Bytes)>>,
    pub num_found: Option<u32>,
}

/// Result of a `dt-fetch`: the CRDT value (absent only when the server has
/// no object there yet) plus the context needed to echo back on a
/// removing update (`spec.md` §3 "CRDT value", §4.E "CRDT fetch").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrdtFetchResult {
    pub value: Option<CrdtValue>,
    pub context: Option<Bytes>,
}

/// Result of a `dt-update`: the server-assigned key (for key-generating
/// updates), the post-update value when `return-body` was set, and the
/// new context when `include-context` was set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrdtUpdateResult {
    pub key: Option<Bytes>,
    pub value: Option<CrdtValue>,
    pub context: Option<Bytes>,
}
