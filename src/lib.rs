// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A pure-Rust client core for Riak's length-prefixed binary protocol,
//! plus the small legacy HTTP surface it still depends on.
//!
//! [`RiakClient`] is the public entry point: a cheap, cloneable handle
//! over a [`dispatcher::ClusterDispatcher`] that pools connections per
//! node, retries transient failures across nodes, and maps every
//! operation's typed response onto [`error::RiakResult`].

pub mod batch;
pub mod client;
pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod model;
pub mod ops;
pub mod options;
pub mod pool;
pub mod protocol;
pub mod stream;

pub use batch::BatchHandle;
pub use client::RiakClient;
pub use config::{ClusterConfig, NodeConfig};
pub use error::{RiakError, RiakResult, ResultCode};
