// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The public operation façade (`spec.md` §4.E).
//!
//! One method per operation family. Every method validates its inputs
//! first — a validation failure never touches the wire — then hands a
//! closure to the [`ClusterDispatcher`] and maps the typed response onto
//! [`RiakResult`]. Modeled on the teacher's `handlers/*.rs`
//! (`handlers::nop::send_nop`): validate, build, send, parse.

use std::{future::Future, sync::Arc};

use bytes::Bytes;

use crate::{
    batch::BatchHandle,
    config::ClusterConfig,
    connection::HttpTransport,
    dispatcher::ClusterDispatcher,
    error::{RiakError, RiakResult},
    model::{
        BucketId, BucketProps, CrdtFetchResult, CrdtOp, CrdtUpdateResult, IndexQuery,
        IndexQueryResult, KeyTriple, MapRedPhaseResult, RiakObject, SearchResults, ServerInfo,
    },
    ops,
    options::{
        CounterOptions, DeleteOptions, DtFetchOptions, DtUpdateOptions, GetOptions, IndexOptions,
        MapReduceOptions, PutOptions,
    },
    protocol::messages::ListKeysReq,
    stream::{KeyStream, RiakStream},
};

/// A cheap, cloneable handle over a cluster of Riak nodes.
///
/// Construction dials nothing; connections are dialed lazily as pools
/// are exercised (`spec.md` §3 "Lifecycles").
#[derive(Clone)]
pub struct RiakClient {
    dispatcher: Arc<ClusterDispatcher>,
    http: HttpTransport,
}

impl RiakClient {
    pub fn new(cfg: ClusterConfig) -> Result<Self, RiakError> {
        Ok(Self { dispatcher: Arc::new(ClusterDispatcher::new(cfg)), http: HttpTransport::new()? })
    }

    /// Stops handing out new connections; in-flight operations finish or
    /// fail on their own (`spec.md` §3 "Lifecycles").
    pub async fn shutdown(&self) {
        self.dispatcher.shutdown().await;
    }

    pub async fn ping(&self) -> RiakResult<()> {
        self.dispatcher.use_connection(|conn| ops::ping(conn)).await
    }

    pub async fn server_info(&self) -> RiakResult<ServerInfo> {
        self.dispatcher.use_connection(|conn| ops::server_info(conn)).await
    }

    pub async fn get(&self, key: &KeyTriple, opts: &GetOptions) -> RiakResult<RiakObject> {
        if let Err(e) = key.validate() {
            return RiakResult::err(e);
        }
        self.dispatcher.use_connection(|conn| ops::get(conn, key, opts)).await
    }

    pub async fn put(&self, obj: &RiakObject, opts: &PutOptions) -> RiakResult<RiakObject> {
        if let Err(e) = obj.key.validate() {
            return RiakResult::err(e);
        }
        self.dispatcher.use_connection(|conn| ops::put(conn, obj, opts)).await
    }

    pub async fn delete(&self, key: &KeyTriple, vclock: Option<&Bytes>, opts: &DeleteOptions) -> RiakResult<()> {
        if let Err(e) = key.validate() {
            return RiakResult::err(e);
        }
        self.dispatcher.use_connection(|conn| ops::delete(conn, key, vclock, opts)).await
    }

    /// `spec.md` §4.E "Multi-get": every sub-request rides the same
    /// borrowed connection; a per-key failure — including a missing key,
    /// captured as `Err(NotFound)` — is recorded inline rather than
    /// failing the whole call, *unless* it is the retryable
    /// communication kind — in that case the connection is presumed
    /// dead and the dispatcher retries the entire call against a fresh
    /// node (losing the partial results gathered so far, which is
    /// preferable to returning data read over a connection now known to
    /// be broken).
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
        self.dispatcher
            .use_connection(|conn| async move {
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
        self.dispatcher
            .use_connection(|conn| async move {
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

    /// Warns before every call (`spec.md` §4.E): listing keys is a
    /// full-bucket scan.
    pub async fn list_keys(&self, bucket: &BucketId) -> RiakResult<Vec<Bytes>> {
        if let Err(e) = bucket.validate() {
            return RiakResult::err(e);
        }
        tracing::warn!(bucket = %String::from_utf8_lossy(&bucket.bucket), "list-keys performs a full-bucket scan; avoid on a production hot path");
        self.dispatcher.use_connection(|conn| ops::list_keys(conn, bucket)).await
    }

    /// A lazily-drained, caller-driven view over the same operation;
    /// yields keys one at a time as frames arrive, releasing the
    /// borrowed connection as soon as the terminal frame is consumed or
    /// the stream is dropped (`spec.md` §8 scenario 6).
    pub async fn stream_list_keys(&self, bucket: &BucketId) -> RiakResult<KeyStream> {
        if let Err(e) = bucket.validate() {
            return RiakResult::err(e);
        }
        tracing::warn!(bucket = %String::from_utf8_lossy(&bucket.bucket), "list-keys performs a full-bucket scan; avoid on a production hot path");
        let borrowed = match self.dispatcher.use_delayed_connection().await {
            Ok(b) => b,
            Err(e) => return RiakResult::err(e),
        };
        let req = ListKeysReq {
            bucket_type: bucket.bucket_type.clone(),
            bucket: bucket.bucket.clone(),
            timeout_ms: None,
        };
        match RiakStream::open(borrowed, &req).await {
            Ok(s) => RiakResult::ok(KeyStream::new(s)),
            Err(e) => RiakResult::err(e),
        }
    }

    pub async fn list_buckets(&self, bucket_type: Option<&Bytes>) -> RiakResult<Vec<Bytes>> {
        tracing::warn!("list-buckets performs a full-cluster scan; avoid on a production hot path");
        let bucket_type = bucket_type.cloned();
        self.dispatcher.use_connection(|conn| ops::list_buckets(conn, bucket_type.clone())).await
    }

    /// `spec.md` §4.E "Delete-bucket": lists then deletes on one
    /// connection; a failed list surfaces its error without attempting
    /// any deletes.
    pub async fn delete_bucket(&self, bucket: &BucketId, opts: &DeleteOptions) -> RiakResult<()> {
        if let Err(e) = bucket.validate() {
            return RiakResult::err(e);
        }
        self.dispatcher.use_connection(|conn| ops::delete_bucket(conn, bucket, opts)).await
    }

    pub async fn get_bucket_props(&self, bucket: &BucketId) -> RiakResult<BucketProps> {
        if let Err(e) = bucket.validate() {
            return RiakResult::err(e);
        }
        self.dispatcher.use_connection(|conn| ops::get_bucket_props(conn, bucket)).await
    }

    pub async fn set_bucket_props(&self, bucket: &BucketId, props: BucketProps) -> RiakResult<()> {
        if let Err(e) = bucket.validate() {
            return RiakResult::err(e);
        }
        self.dispatcher.use_connection(|conn| ops::set_bucket_props(conn, bucket, props)).await
    }

    /// The legacy HTTP path (`spec.md` §6): `DELETE /buckets/<b>/props`.
    /// There is no binary-protocol equivalent of "reset to defaults", so
    /// this bypasses the node pool entirely and dials the first
    /// configured node's HTTP port directly (no pooling, no retry — the
    /// core's retry/dispatch machinery is scoped to the binary protocol
    /// collaborator, per `spec.md` §1).
    pub async fn reset_bucket_props(&self, bucket: &BucketId) -> RiakResult<()> {
        if let Err(e) = bucket.validate() {
            return RiakResult::err(e);
        }
        let Some(node) = self.dispatcher.node_configs().next() else {
            return RiakResult::err(RiakError::no_connections("no configured node for the HTTP path"));
        };
        self.http.reset_bucket_properties(node, &bucket.bucket).await.into()
    }

    /// The legacy HTTP companion to [`Self::set_bucket_props`]: `PUT
    /// /buckets/<b>/props` with a JSON body, for servers reached only
    /// over the HTTP sub-interface (`spec.md` §6). Prefer
    /// [`Self::set_bucket_props`] (the binary-protocol path) when it is
    /// available; this exists for the same reason
    /// [`Self::reset_bucket_props`] does — no pooling, no retry, dials
    /// the first configured node directly.
    pub async fn set_bucket_props_http(&self, bucket: &BucketId, props: BucketProps) -> RiakResult<()> {
        if let Err(e) = bucket.validate() {
            return RiakResult::err(e);
        }
        let Some(node) = self.dispatcher.node_configs().next() else {
            return RiakResult::err(RiakError::no_connections("no configured node for the HTTP path"));
        };
        self.http.set_bucket_properties(node, &bucket.bucket, &props).await.into()
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
        self.dispatcher
            .use_connection(|conn| ops::query_index(conn, bucket, index, query.clone(), opts))
            .await
    }

    /// Query DSL construction is out of scope (`spec.md` §1); callers
    /// build `request` themselves.
    pub async fn map_reduce(
        &self,
        request: Bytes,
        content_type: &str,
        _opts: &MapReduceOptions,
    ) -> RiakResult<Vec<MapRedPhaseResult>> {
        self.dispatcher.use_connection(|conn| ops::map_reduce(conn, request.clone(), content_type)).await
    }

    pub async fn search(
        &self,
        index: &str,
        query: &str,
        rows: Option<u32>,
        start: Option<u32>,
    ) -> RiakResult<SearchResults> {
        self.dispatcher.use_connection(|conn| ops::search(conn, index, query, rows, start)).await
    }

    pub async fn dt_fetch(
        &self,
        bucket_type: &Bytes,
        bucket: &Bytes,
        key: &Bytes,
        opts: &DtFetchOptions,
    ) -> RiakResult<CrdtFetchResult> {
        self.dispatcher.use_connection(|conn| ops::dt_fetch(conn, bucket_type, bucket, key, opts)).await
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
        self.dispatcher
            .use_connection(|conn| ops::dt_update(conn, bucket_type, bucket, key, context, op.clone(), opts))
            .await
    }

    pub async fn counter_increment(
        &self,
        bucket: &Bytes,
        key: &Bytes,
        amount: i64,
        opts: CounterOptions,
    ) -> RiakResult<Option<i64>> {
        self.dispatcher
            .use_connection(|conn| ops::counter_increment(conn, bucket, key, amount, opts.returnvalue))
            .await
    }

    pub async fn counter_get(&self, bucket: &Bytes, key: &Bytes) -> RiakResult<Option<i64>> {
        self.dispatcher.use_connection(|conn| ops::counter_get(conn, bucket, key)).await
    }

    /// Pins every operation run on the handle inside `f` to one
    /// connection (`spec.md` §4.F). A panic inside `f` is caught — via
    /// `tokio::spawn`'s `JoinError`, the idiomatic Rust stand-in for the
    /// source's "catch arbitrary exceptions" batch contract — and
    /// surfaced as `ResultCode::BatchException` rather than propagating.
    pub async fn batch<F, Fut, T>(&self, f: F) -> RiakResult<T>
    where
        T: Send + 'static,
        F: FnOnce(BatchHandle) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let borrowed = match self.dispatcher.use_delayed_connection().await {
            Ok(b) => b,
            Err(e) => return RiakResult::err(e),
        };
        let handle = BatchHandle::new(borrowed, self.http.clone());
        match tokio::spawn(async move { f(handle).await }).await {
            Ok(value) => RiakResult::ok(value),
            Err(join_err) => {
                RiakResult::err(RiakError::batch_exception(format!("batch callback panicked: {join_err}")))
            },
        }
    }
}
