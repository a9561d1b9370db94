// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Pins one connection for the lifetime of a caller-supplied closure, so
//! every operation run through a [`BatchHandle`] rides the same
//! connection (`spec.md` §4.F).
//!
//! Grounded on the teacher's `Pool::execute_with` shape
//! (`client/pool_sessions.rs`): borrow once, hand the live session to
//! the caller, release on drop. [`crate::client::RiakClient::batch`]
//! wraps the callback in `tokio::spawn` for panic isolation; this type
//! is just the pinned connection the callback runs against.

use std::future::Future;

use bytes::Bytes;

use crate::{
    connection::{Connection, HttpTransport},
    dispatcher::Borrowed,
    error::{RiakError, RiakResult},
    model::{BucketId, BucketProps, CrdtFetchResult, CrdtOp, CrdtUpdateResult, IndexQuery, IndexQueryResult, KeyTriple, MapRedPhaseResult, RiakObject, SearchResults, ServerInfo},
    ops,
    options::{DeleteOptions, DtFetchOptions, DtUpdateOptions, GetOptions, IndexOptions, PutOptions},
};

/// A connection pinned for the duration of a batch callback.
///
/// Excluded from this surface, deliberately:
/// - `reset_bucket_props`, which has no binary-protocol counterpart and
///   so nothing here to pin (it would just dial its own HTTP request,
///   defeating the point of a batch).
/// - `stream_list_keys`, which would need a second delayed borrow
///   nested inside this one; callers that want both batching and
///   streaming should drive the stream from outside the batch.
pub struct BatchHandle {
    conn: tokio::sync::Mutex<Borrowed>,
    #[allow(dead_code)]
    http: HttpTransport,
}

impl BatchHandle {
    pub(crate) fn new(borrowed: Borrowed, http: HttpTransport) -> Self {
        Self { conn: tokio::sync::Mutex::new(borrowed), http }
    }

    async fn run<T, Fut>(&self, op: impl FnOnce(&mut Connection) -> Fut) -> RiakResult<T>
    where
        Fut: Future<Output = Result<T, RiakError>>,
    {
        let mut guard = self.conn.lock().await;
        let result = op(guard.connection_mut()).await;
        if let Err(e) = &result {
            if e.node_offline {
                guard.mark_unhealthy();
            }
        }
        result.into()
    }

    pub async fn ping(&self) -> RiakResult<()> {
        self.run(|conn| ops::ping(conn)).await
    }

    pub async fn server_info(&self) -> RiakResult<ServerInfo> {
        self.run(|conn| ops::server_info(conn)).await
    }

    pub async fn get(&self, key: &KeyTriple, opts: &GetOptions) -> RiakResult<RiakObject> {
        if let Err(e) = key.validate() {
            return RiakResult::err(e);
        }
        self.run(|conn| ops::get(conn, key, opts)).await
    }

    pub async fn put(&self, obj: &RiakObject, opts: &PutOptions) -> RiakResult<RiakObject> {
        if let Err(e) = obj.key.validate() {
            return RiakResult::err(e);
        }
        self.run(|conn| ops::put(conn, obj, opts)).await
    }

    pub async fn delete(&self, key: &KeyTriple, vclock: Option<&Bytes>, opts: &DeleteOptions) -> RiakResult<()> {
        if let Err(e) = key.validate() {
            return RiakResult::err(e);
        }
        self.run(|conn| ops::delete(conn, key, vclock, opts)).await
    }

    pub async fn multi_get(
        &self,
        keys: &[KeyTriple],
        opts: &GetOptions,
    ) -> RiakResult<Vec<(KeyTriple, Result<RiakObject, RiakError>)>> {
        for k in keys {
            if let Err(e) = k.validate() {
                return RiakResult::err(e);
            }
        }
        self.run(|conn| async move {
            let mut results = Vec::with_capacity(keys.len());
            for k in keys {
                match ops::get(conn, k, opts).await {
                    Err(e) if e.code.is_retryable() => return Err(e),
                    outcome => results.push((k.clone(), outcome)),
                }
            }
            Ok(results)
        })
        .await
    }

    pub async fn multi_put(
        &self,
        objs: &[RiakObject],
        opts: &PutOptions,
    ) -> RiakResult<Vec<(KeyTriple, Result<RiakObject, RiakError>)>> {
        for o in objs {
            if let Err(e) = o.key.validate() {
                return RiakResult::err(e);
            }
        }
        self.run(|conn| async move {
            let mut results = Vec::with_capacity(objs.len());
            for o in objs {
                match ops::put(conn, o, opts).await {
                    Err(e) if e.code.is_retryable() => return Err(e),
                    outcome => results.push((o.key.clone(), outcome)),
                }
            }
            Ok(results)
        })
        .await
    }

    pub async fn list_keys(&self, bucket: &BucketId) -> RiakResult<Vec<Bytes>> {
        if let Err(e) = bucket.validate() {
            return RiakResult::err(e);
        }
        self.run(|conn| ops::list_keys(conn, bucket)).await
    }

    pub async fn delete_bucket(&self, bucket: &BucketId, opts: &DeleteOptions) -> RiakResult<()> {
        if let Err(e) = bucket.validate() {
            return RiakResult::err(e);
        }
        self.run(|conn| ops::delete_bucket(conn, bucket, opts)).await
    }

    pub async fn get_bucket_props(&self, bucket: &BucketId) -> RiakResult<BucketProps> {
        if let Err(e) = bucket.validate() {
            return RiakResult::err(e);
        }
        self.run(|conn| ops::get_bucket_props(conn, bucket)).await
    }

    pub async fn set_bucket_props(&self, bucket: &BucketId, props: BucketProps) -> RiakResult<()> {
        if let Err(e) = bucket.validate() {
            return RiakResult::err(e);
        }
        self.run(|conn| ops::set_bucket_props(conn, bucket, props)).await
    }

    pub async fn query_index(
        &self,
        bucket: &BucketId,
        index: &str,
        query: IndexQuery,
        opts: &IndexOptions,
    ) -> RiakResult<IndexQueryResult> {
        if let Err(e) = bucket.validate() {
            return RiakResult::err(e);
        }
        self.run(|conn| ops::query_index(conn, bucket, index, query.clone(), opts)).await
    }

    pub async fn map_reduce(&self, request: Bytes, content_type: &str) -> RiakResult<Vec<MapRedPhaseResult>> {
        self.run(|conn| ops::map_reduce(conn, request.clone(), content_type)).await
    }

    pub async fn search(
        &self,
        index: &str,
        query: &str,
        rows: Option<u32>,
        start: Option<u32>,
    ) -> RiakResult<SearchResults> {
        self.run(|conn| ops::search(conn, index, query, rows, start)).await
    }

    pub async fn dt_fetch(
        &self,
        bucket_type: &Bytes,
        bucket: &Bytes,
        key: &Bytes,
        opts: &DtFetchOptions,
    ) -> RiakResult<CrdtFetchResult> {
        self.run(|conn| ops::dt_fetch(conn, bucket_type, bucket, key, opts)).await
    }

    pub async fn dt_update(
        &self,
        bucket_type: &Bytes,
        bucket: &Bytes,
        key: Option<&Bytes>,
        context: Option<&Bytes>,
        op: CrdtOp,
        opts: &DtUpdateOptions,
    ) -> RiakResult<CrdtUpdateResult> {
        self.run(|conn| ops::dt_update(conn, bucket_type, bucket, key, context, op.clone(), opts)).await
    }

    pub async fn counter_increment(
        &self,
        bucket: &Bytes,
        key: &Bytes,
        amount: i64,
        returnvalue: bool,
    ) -> RiakResult<Option<i64>> {
        self.run(|conn| ops::counter_increment(conn, bucket, key, amount, returnvalue)).await
    }

    pub async fn counter_get(&self, bucket: &Bytes, key: &Bytes) -> RiakResult<Option<i64>> {
        self.run(|conn| ops::counter_get(conn, bucket, key)).await
    }
}
