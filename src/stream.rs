// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The lazy, once-iterable streaming sequence (`spec.md` §4.B
//! `write_read_streaming_delayed`, §9 "Unbounded streaming lifetimes").
//!
//! The source this was distilled from drives release through an
//! explicit `on_finish` callback the caller must be trusted to invoke.
//! Rust already has a guaranteed-release finalizer for exactly this
//! shape: [`Drop`]. [`RiakStream`] holds the dispatcher's
//! [`crate::dispatcher::Borrowed`] connection and simply lets it go out
//! of scope — on full consumption (the terminal frame takes it) or on
//! early drop (the caller stops polling) — rather than threading a
//! callback through every call site.

use std::collections::{HashSet, VecDeque};

use bytes::Bytes;

use crate::{
    connection::StreamingResponse,
    dispatcher::Borrowed,
    error::RiakError,
    protocol::{messages::ListKeysResp, wire::WireMessage},
};

/// A multi-frame response the caller drains one item at a time, pinned
/// to one borrowed connection for its whole lifetime.
pub struct RiakStream<Resp> {
    borrowed: Option<Borrowed>,
    _marker: std::marker::PhantomData<fn() -> Resp>,
}

impl<Resp: StreamingResponse> RiakStream<Resp> {
    /// Writes `req` on `borrowed` and returns a stream over its
    /// responses. On a write failure the connection is marked unhealthy
    /// and released immediately.
    pub(crate) async fn open<Req: WireMessage>(
        mut borrowed: Borrowed,
        req: &Req,
    ) -> Result<Self, RiakError> {
        if let Err(e) = borrowed.connection_mut().write_request(req).await {
            borrowed.mark_unhealthy();
            return Err(e);
        }
        Ok(Self { borrowed: Some(borrowed), _marker: std::marker::PhantomData })
    }

    /// Reads the next frame. Returns `None` once the terminal frame has
    /// been consumed (or an error was returned); the connection is
    /// released (or discarded, on error) at that exact point, not when
    /// the stream is later dropped.
    pub async fn next(&mut self) -> Option<Result<Resp, RiakError>> {
        let borrowed = self.borrowed.as_mut()?;
        match borrowed.connection_mut().read_response::<Resp>().await {
            Ok(resp) => {
                if resp.is_done() {
                    self.borrowed.take();
                }
                Some(Ok(resp))
            },
            Err(e) => {
                if let Some(mut b) = self.borrowed.take() {
                    b.mark_unhealthy();
                }
                Some(Err(e))
            },
        }
    }
}

/// A flattened, deduplicated view over [`RiakStream<ListKeysResp>`]: each
/// call to [`KeyStream::next`] yields one key not previously seen,
/// draining frames as needed (`spec.md` §8 scenario 6).
pub struct KeyStream {
    inner: RiakStream<ListKeysResp>,
    seen: HashSet<Bytes>,
    pending: VecDeque<Bytes>,
}

impl KeyStream {
    pub(crate) fn new(inner: RiakStream<ListKeysResp>) -> Self {
        Self { inner, seen: HashSet::new(), pending: VecDeque::new() }
    }

    pub async fn next(&mut self) -> Option<Result<Bytes, RiakError>> {
        loop {
            if let Some(k) = self.pending.pop_front() {
                return Some(Ok(k));
            }
            match self.inner.next().await {
                Some(Ok(resp)) => {
                    for k in resp.keys {
                        if self.seen.insert(k.clone()) {
                            self.pending.push_back(k);
                        }
                    }
                    if self.pending.is_empty() {
                        continue;
                    }
                },
                Some(Err(e)) => return Some(Err(e)),
                None => return None,
            }
        }
    }
}
