// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The uniform success/error envelope returned by every façade operation.
//!
//! No façade method ever panics or propagates a Rust-level error out of
//! the crate boundary (the batch path is the one exception: a panic
//! caught inside a batch closure is captured and reported through this
//! same envelope as `ResultCode::BatchException`).

use std::fmt;

use thiserror::Error;

/// The result-code carried by every [`RiakResult`].
///
/// Mirrors `spec.md` §7 one-for-one; the dispatcher's retry policy
/// switches on this enum (see `crate::dispatcher`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResultCode {
    /// Caller-supplied input failed local validation; the wire was never
    /// touched.
    #[error("validation error")]
    Validation,
    /// Socket I/O failure, frame decode failure, or unexpected response
    /// code. Retryable.
    #[error("communication error")]
    Communication,
    /// No eligible node was available to serve the operation.
    #[error("no connections available")]
    NoConnections,
    /// The cluster dispatcher has been disposed.
    #[error("cluster is shutting down")]
    ShuttingDown,
    /// The server replied with an error-resp frame. Never retried.
    #[error("remote error")]
    RemoteError,
    /// A get/fetch succeeded at the transport level but the object (or
    /// causal vector) was absent.
    #[error("not found")]
    NotFound,
    /// HTTP status mismatch or a semantic protocol violation.
    #[error("invalid response")]
    InvalidResponse,
    /// An unhandled panic inside a batch callback, captured rather than
    /// propagated.
    #[error("batch exception")]
    BatchException,
}

impl ResultCode {
    /// Whether the dispatcher should retry an operation that failed with
    /// this code (`spec.md` §4.D retry policy).
    pub fn is_retryable(self) -> bool {
        matches!(self, ResultCode::Communication | ResultCode::NoConnections)
    }
}

/// A single error value carried by a failed [`RiakResult`].
#[derive(Debug, Clone)]
pub struct RiakError {
    pub code: ResultCode,
    pub message: String,
    /// Set when the failure should cause the dispatcher to mark the node
    /// that produced it as offline for the cool-down window.
    pub node_offline: bool,
}

impl RiakError {
    pub fn new(code: ResultCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), node_offline: false }
    }

    pub fn with_node_offline(mut self, node_offline: bool) -> Self {
        self.node_offline = node_offline;
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ResultCode::Validation, message)
    }

    pub fn communication(message: impl Into<String>) -> Self {
        Self::new(ResultCode::Communication, message).with_node_offline(true)
    }

    pub fn no_connections(message: impl Into<String>) -> Self {
        Self::new(ResultCode::NoConnections, message)
    }

    pub fn shutting_down() -> Self {
        Self::new(ResultCode::ShuttingDown, "cluster dispatcher is shutting down")
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::new(ResultCode::RemoteError, message)
    }

    pub fn not_found() -> Self {
        Self::new(ResultCode::NotFound, "Unable to find value in Riak")
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ResultCode::InvalidResponse, message)
    }

    pub fn batch_exception(message: impl Into<String>) -> Self {
        Self::new(ResultCode::BatchException, message)
    }
}

impl fmt::Display for RiakError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RiakError {}

/// The uniform result envelope returned by every façade operation.
///
/// `done`/`continuation` are only ever populated on the terminal frame of
/// a streaming response (`spec.md` §4.G).
#[derive(Debug, Clone)]
pub struct RiakResult<T> {
    result: Result<T, RiakError>,
    pub done: Option<bool>,
    pub continuation: Option<bytes::Bytes>,
}

impl<T> RiakResult<T> {
    pub fn ok(value: T) -> Self {
        Self { result: Ok(value), done: None, continuation: None }
    }

    pub fn err(error: RiakError) -> Self {
        Self { result: Err(error), done: None, continuation: None }
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }

    pub fn with_continuation(mut self, continuation: Option<bytes::Bytes>) -> Self {
        self.continuation = continuation;
        self
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn code(&self) -> Option<ResultCode> {
        self.result.as_ref().err().map(|e| e.code)
    }

    pub fn error(&self) -> Option<&RiakError> {
        self.result.as_ref().err()
    }

    /// Unwraps into a plain `Result`, the shape most call sites want.
    pub fn into_result(self) -> Result<T, RiakError> {
        self.result
    }

    pub fn as_ref(&self) -> RiakResult<&T> {
        match &self.result {
            Ok(v) => RiakResult {
                result: Ok(v),
                done: self.done,
                continuation: self.continuation.clone(),
            },
            Err(e) => RiakResult {
                result: Err(e.clone()),
                done: self.done,
                continuation: self.continuation.clone(),
            },
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RiakResult<U> {
        RiakResult {
            result: self.result.map(f),
            done: self.done,
            continuation: self.continuation,
        }
    }
}

impl<T> From<Result<T, RiakError>> for RiakResult<T> {
    fn from(result: Result<T, RiakError>) -> Self {
        Self { result, done: None, continuation: None }
    }
}
