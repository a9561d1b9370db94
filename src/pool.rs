// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A bounded pool of connections to a single node (`spec.md` §4.C).
//!
//! Where the teacher's `Pool` keys a `DashMap` of multiplexed iSCSI
//! sessions, this pool is plain: one node, up to `pool_size` live
//! connections, checked out whole and returned whole. Capacity is
//! enforced with a counting semaphore rather than a fixed-size
//! collection so that callers block (rather than fail) when the pool is
//! momentarily exhausted.

use std::collections::VecDeque;

use tokio::sync::{Mutex, Semaphore};

use crate::{config::NodeConfig, connection::Connection, error::RiakError};

/// Per-node connection pool.
#[derive(Debug)]
pub struct NodePool {
    node: NodeConfig,
    idle: Mutex<VecDeque<Connection>>,
    capacity: Semaphore,
}

impl NodePool {
    pub fn new(node: NodeConfig) -> Self {
        let capacity = Semaphore::new(node.pool_size as usize);
        Self { node, idle: Mutex::new(VecDeque::new()), capacity }
    }

    pub fn node(&self) -> &NodeConfig {
        &self.node
    }

    /// Checks out a connection, blocking until capacity is available.
    /// Reuses an idle connection when one exists, otherwise dials a new
    /// one (`spec.md` §4.C: capacity is counted against in-flight
    /// creation too, so a burst of acquires never exceeds `pool_size`
    /// concurrent connections).
    pub async fn acquire(&self) -> Result<Connection, RiakError> {
        let permit = self
            .capacity
            .acquire()
            .await
            .map_err(|_| RiakError::no_connections(format!("pool for {} is closed", self.node.name)))?;
        permit.forget();

        if let Some(conn) = self.idle.lock().await.pop_front() {
            return Ok(conn);
        }

        match Connection::connect(&self.node).await {
            Ok(conn) => Ok(conn),
            Err(e) => {
                self.capacity.add_permits(1);
                Err(e)
            },
        }
    }

    /// Returns a healthy connection to the idle set.
    pub async fn release(&self, conn: Connection) {
        self.idle.lock().await.push_back(conn);
        self.capacity.add_permits(1);
    }

    /// Gives up on a connection that failed mid-use: frees its capacity
    /// slot without putting the (presumably broken) socket back in the
    /// idle set.
    pub fn discard(&self) {
        self.capacity.add_permits(1);
    }

    /// Closes every idle connection. In-flight checkouts are left alone
    /// and will be discarded as they are returned.
    pub async fn drain(&self) {
        self.idle.lock().await.clear();
    }

    pub async fn idle_len(&self) -> usize {
        self.idle.lock().await.len()
    }
}
