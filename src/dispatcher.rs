// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Picks a node, hands out a connection, retries across distinct nodes
//! on communication failure, and tracks per-node cool-down
//! (`spec.md` §4.D).

use std::{
    collections::HashSet,
    future::Future,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    config::ClusterConfig,
    connection::Connection,
    error::{RiakError, RiakResult},
    pool::NodePool,
};

/// A connection checked out for longer than one round-trip. Release (or
/// discard, if [`Borrowed::mark_unhealthy`] was called) happens in
/// `Drop`, so it runs even if the caller's future is cancelled mid-use
/// (`spec.md` §4.B "Streaming": a borrowed connection is always
/// eventually returned).
pub struct Borrowed {
    pool: Arc<NodePool>,
    conn: Option<Connection>,
    healthy: bool,
}

impl Borrowed {
    pub fn connection_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().expect("connection taken before drop")
    }

    /// Marks the connection as broken: on drop it is discarded rather
    /// than returned to the idle set.
    pub fn mark_unhealthy(&mut self) {
        self.healthy = false;
    }
}

impl Drop for Borrowed {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else { return };
        let pool = self.pool.clone();
        if self.healthy {
            tokio::spawn(async move {
                pool.release(conn).await;
            });
        } else {
            drop(conn);
            pool.discard();
        }
    }
}

struct NodeState {
    pool: Arc<NodePool>,
    offline_until: Mutex<Option<Instant>>,
}

/// Dispatches operations across a cluster's nodes.
pub struct ClusterDispatcher {
    nodes: Vec<NodeState>,
    retries: u32,
    cooldown: Duration,
    next: AtomicUsize,
    shutting_down: AtomicBool,
}

impl ClusterDispatcher {
    pub fn new(cfg: ClusterConfig) -> Self {
        let nodes = cfg
            .nodes
            .into_iter()
            .map(|n| NodeState { pool: Arc::new(NodePool::new(n)), offline_until: Mutex::new(None) })
            .collect();
        Self { nodes, retries: cfg.retries, cooldown: cfg.cooldown, next: AtomicUsize::new(0), shutting_down: AtomicBool::new(false) }
    }

    /// Stops handing out new connections; pools are drained but any
    /// checkout already in flight is left to finish or fail on its own.
    pub async fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::Release);
        for node in &self.nodes {
            node.pool.drain().await;
        }
    }

    pub fn node_configs(&self) -> impl Iterator<Item = &crate::config::NodeConfig> {
        self.nodes.iter().map(|n| n.pool.node())
    }

    async fn select_node(&self, exclude: &HashSet<usize>) -> Option<usize> {
        let n = self.nodes.len();
        if n == 0 {
            return None;
        }
        let start = self.next.fetch_add(1, Ordering::Relaxed) % n;
        let now = Instant::now();
        for step in 0..n {
            let idx = (start + step) % n;
            if exclude.contains(&idx) {
                continue;
            }
            let cooled_down = {
                let until = self.nodes[idx].offline_until.lock().await;
                until.is_none_or(|u| now >= u)
            };
            if cooled_down {
                return Some(idx);
            }
        }
        None
    }

    async fn set_cooldown(&self, idx: usize) {
        let mut until = self.nodes[idx].offline_until.lock().await;
        *until = Some(Instant::now() + self.cooldown);
        debug!(node = self.nodes[idx].pool.node().name, cooldown_secs = self.cooldown.as_secs(), "node marked offline");
    }

    /// Runs `op` against one connection, retrying on distinct nodes up to
    /// the configured retry count when the failure is retryable
    /// (`spec.md` §4.D).
    pub async fn use_connection<T, Fut>(&self, mut op: impl FnMut(&mut Connection) -> Fut) -> RiakResult<T>
    where Fut: Future<Output = Result<T, RiakError>> {
        if self.shutting_down.load(Ordering::Acquire) {
            return RiakResult::err(RiakError::shutting_down());
        }

        let attempts = self.retries + 1;
        let mut tried = HashSet::new();
        let mut last_err = None;

        for _ in 0..attempts {
            let Some(idx) = self.select_node(&tried).await else { break };
            tried.insert(idx);
            let pool = self.nodes[idx].pool.clone();

            let mut conn = match pool.acquire().await {
                Ok(c) => c,
                Err(e) => {
                    self.set_cooldown(idx).await;
                    last_err = Some(e);
                    continue;
                },
            };

            match op(&mut conn).await {
                Ok(value) => {
                    pool.release(conn).await;
                    return RiakResult::ok(value);
                },
                Err(e) => {
                    if e.node_offline {
                        pool.discard();
                        self.set_cooldown(idx).await;
                    } else {
                        pool.release(conn).await;
                    }
                    let retryable = e.code.is_retryable();
                    last_err = Some(e);
                    if !retryable {
                        break;
                    }
                },
            }
        }

        RiakResult::err(last_err.unwrap_or_else(|| RiakError::no_connections("no eligible node in cluster")))
    }

    /// Checks out a connection for a caller-driven streaming operation.
    /// No retry happens once a connection is handed out; the caller
    /// decides whether a mid-stream failure should be retried at a
    /// higher level (`spec.md` §4.D).
    pub async fn use_delayed_connection(&self) -> Result<Borrowed, RiakError> {
        if self.shutting_down.load(Ordering::Acquire) {
            return Err(RiakError::shutting_down());
        }

        let attempts = self.retries + 1;
        let mut tried = HashSet::new();
        let mut last_err = None;

        for _ in 0..attempts {
            let Some(idx) = self.select_node(&tried).await else { break };
            tried.insert(idx);
            let pool = self.nodes[idx].pool.clone();
            match pool.acquire().await {
                Ok(conn) => return Ok(Borrowed { pool, conn: Some(conn), healthy: true }),
                Err(e) => {
                    self.set_cooldown(idx).await;
                    warn!(node = self.nodes[idx].pool.node().name, error = %e, "failed to acquire connection");
                    last_err = Some(e);
                },
            }
        }

        Err(last_err.unwrap_or_else(|| RiakError::no_connections("no eligible node in cluster")))
    }
}
