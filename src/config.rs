// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Cluster configuration: the list of nodes and their per-node transport
//! parameters (`spec.md` §6 "Configuration").
//!
//! Loading is YAML via `serde_yaml`, matching the teacher's
//! `Config::load_from_file` / `validate_and_normalize` shape.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Enumerates the nodes in a Riak cluster plus dispatcher-wide knobs.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ClusterConfig {
    pub nodes: Vec<NodeConfig>,

    /// Number of retry attempts across other nodes before giving up.
    /// `0` (the default) means a single attempt, no retry.
    #[serde(default)]
    pub retries: u32,

    /// How long a node stays in cool-down after being marked offline.
    #[serde(default = "default_cooldown", with = "serde_secs")]
    pub cooldown: Duration,
}

fn default_cooldown() -> Duration {
    Duration::from_secs(30)
}

/// Per-node identity, ports, pool size, and timeouts.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct NodeConfig {
    /// Human-readable node name, used only for logging.
    pub name: String,
    pub host: String,
    /// The binary protocol (Protocol Buffers over TCP) port.
    pub pb_port: u16,
    /// The legacy HTTP port, used only by the bucket-properties set/reset
    /// path.
    pub http_port: u16,

    /// Number of connections this node's pool may hold concurrently.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    #[serde(default = "default_connect_timeout", with = "serde_secs")]
    pub connect_timeout: Duration,
    #[serde(default = "default_io_timeout", with = "serde_secs")]
    pub read_timeout: Duration,
    #[serde(default = "default_io_timeout", with = "serde_secs")]
    pub write_timeout: Duration,
    #[serde(default = "default_idle_timeout", with = "serde_secs")]
    pub idle_timeout: Duration,
}

fn default_pool_size() -> u32 {
    8
}
fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}
fn default_io_timeout() -> Duration {
    Duration::from_secs(10)
}
fn default_idle_timeout() -> Duration {
    Duration::from_secs(300)
}

impl NodeConfig {
    pub fn pb_address(&self) -> String {
        format!("{}:{}", self.host, self.pb_port)
    }

    pub fn http_base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.http_port)
    }
}

impl ClusterConfig {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let mut cfg: ClusterConfig =
            serde_yaml::from_str(&s).context("failed to parse cluster config YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates invariants that the types alone cannot express.
    pub fn validate(&mut self) -> Result<()> {
        ensure!(!self.nodes.is_empty(), "cluster config must list at least one node");
        for node in &self.nodes {
            ensure!(!node.host.is_empty(), "node {} has an empty host", node.name);
            ensure!(node.pool_size >= 1, "node {} pool_size must be >= 1", node.name);
        }
        Ok(())
    }
}

mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
