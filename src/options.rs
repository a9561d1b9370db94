// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Per-operation options records (`spec.md` §3 "Request options", §9
//! "Dynamic options records").
//!
//! Each kind is a plain value record built fluently by the caller; a
//! `populate` method writes only the fields the caller actually set onto
//! the outgoing request, leaving everything else at the request's
//! default. Options never touch the wire directly.

use bytes::Bytes;

use crate::protocol::messages::{DtFetchReq, DtUpdateReq, GetReq, IndexReq, PutReq};

#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    pub r: Option<u32>,
    pub pr: Option<u32>,
    pub basic_quorum: Option<bool>,
    pub notfound_ok: Option<bool>,
    pub timeout_ms: Option<u32>,
    pub head: bool,
}

impl GetOptions {
    pub fn with_r(mut self, r: u32) -> Self {
        self.r = Some(r);
        self
    }

    pub fn with_pr(mut self, pr: u32) -> Self {
        self.pr = Some(pr);
        self
    }

    pub fn with_basic_quorum(mut self, basic_quorum: bool) -> Self {
        self.basic_quorum = Some(basic_quorum);
        self
    }

    pub fn with_notfound_ok(mut self, notfound_ok: bool) -> Self {
        self.notfound_ok = Some(notfound_ok);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_head(mut self, head: bool) -> Self {
        self.head = head;
        self
    }

    pub(crate) fn populate(&self, req: &mut GetReq) {
        req.r = self.r;
        req.pr = self.pr;
        req.basic_quorum = self.basic_quorum;
        req.notfound_ok = self.notfound_ok;
        req.timeout_ms = self.timeout_ms;
        req.head = self.head;
    }
}

#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    pub w: Option<u32>,
    pub dw: Option<u32>,
    pub pw: Option<u32>,
    pub return_body: bool,
    pub timeout_ms: Option<u32>,
}

impl PutOptions {
    pub fn with_w(mut self, w: u32) -> Self {
        self.w = Some(w);
        self
    }

    pub fn with_dw(mut self, dw: u32) -> Self {
        self.dw = Some(dw);
        self
    }

    pub fn with_pw(mut self, pw: u32) -> Self {
        self.pw = Some(pw);
        self
    }

    pub fn with_return_body(mut self, return_body: bool) -> Self {
        self.return_body = return_body;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub(crate) fn populate(&self, req: &mut PutReq) {
        req.w = self.w;
        req.dw = self.dw;
        req.pw = self.pw;
        req.return_body = self.return_body;
        req.timeout_ms = self.timeout_ms;
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    pub rw: Option<u32>,
    pub timeout_ms: Option<u32>,
}

impl DeleteOptions {
    pub fn with_rw(mut self, rw: u32) -> Self {
        self.rw = Some(rw);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    pub return_terms: bool,
    pub max_results: Option<u32>,
    pub continuation: Option<Bytes>,
}

impl IndexOptions {
    pub fn with_return_terms(mut self, return_terms: bool) -> Self {
        self.return_terms = return_terms;
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_continuation(mut self, continuation: impl Into<Bytes>) -> Self {
        self.continuation = Some(continuation.into());
        self
    }

    pub(crate) fn populate(&self, req: &mut IndexReq) {
        req.return_terms = self.return_terms;
        req.max_results = self.max_results;
        req.continuation = self.continuation.clone();
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapReduceOptions {
    pub timeout_ms: Option<u32>,
}

impl MapReduceOptions {
    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DtFetchOptions {
    pub r: Option<u32>,
    pub include_context: bool,
}

impl DtFetchOptions {
    pub fn with_r(mut self, r: u32) -> Self {
        self.r = Some(r);
        self
    }

    pub fn with_include_context(mut self, include_context: bool) -> Self {
        self.include_context = include_context;
        self
    }

    pub(crate) fn populate(&self, req: &mut DtFetchReq) {
        req.r = self.r;
        req.include_context = self.include_context;
    }
}

#[derive(Debug, Clone, Default)]
pub struct DtUpdateOptions {
    pub w: Option<u32>,
    pub return_body: bool,
    pub include_context: bool,
}

impl DtUpdateOptions {
    pub fn with_w(mut self, w: u32) -> Self {
        self.w = Some(w);
        self
    }

    pub fn with_return_body(mut self, return_body: bool) -> Self {
        self.return_body = return_body;
        self
    }

    pub fn with_include_context(mut self, include_context: bool) -> Self {
        self.include_context = include_context;
        self
    }

    pub(crate) fn populate(&self, req: &mut DtUpdateReq) {
        req.w = self.w;
        req.return_body = self.return_body;
        req.include_context = self.include_context;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CounterOptions {
    pub returnvalue: bool,
}

impl CounterOptions {
    pub fn with_returnvalue(mut self, returnvalue: bool) -> Self {
        self.returnvalue = returnvalue;
        self
    }
}

// `spec.md` §3 lists "counter-get" among the named option kinds, but
// `CounterGetReq` (`protocol/messages.rs`) carries no optional fields
// to populate — a counter-get request is just a bucket and a key, no
// quorum or timeout knob on this wire. No `CounterGetOptions` record
// exists because there is nothing for one to hold; see `DESIGN.md`.
