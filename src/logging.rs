// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Structured logging setup.
//!
//! Deliberately simpler than a full application's observability stack:
//! this crate is a library, so it only wires up a `tracing` subscriber
//! when the embedding binary asks it to (mirrors the teacher's
//! `init_logger`, minus the JSON span-capture layer, which was specific
//! to the teacher's own ops pipeline).

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes a process-global `tracing` subscriber reading its filter
/// from `level` (falling back to `RUST_LOG` if `level` fails to parse).
///
/// Returns an error if a global subscriber has already been installed;
/// callers embedding this crate in a larger application should usually
/// skip this and configure `tracing` themselves.
pub fn init_logger(level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .context("failed to parse log level")?;

    fmt()
        .with_env_filter(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
