// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use riak_client_rs::{config::ClusterConfig, ResultCode, RiakClient};

use crate::integration_tests::common::unreachable_node;

/// `spec.md` §8 scenario 4: every node unreachable, retries exhausted,
/// the call fails cleanly instead of hanging or panicking.
#[tokio::test]
async fn unreachable_nodes_exhaust_retries_and_fail_cleanly() {
    let cfg = ClusterConfig {
        nodes: vec![unreachable_node("n1"), unreachable_node("n2"), unreachable_node("n3")],
        retries: 2,
        cooldown: Duration::from_secs(30),
    };
    let client = RiakClient::new(cfg).expect("construct client");

    let result = client.ping().await;

    assert!(!result.is_success());
    let code = result.code().expect("a failed result carries a code");
    assert!(matches!(code, ResultCode::Communication | ResultCode::NoConnections));
}

/// An empty cluster reports `NoConnections` immediately — there is
/// nothing to even try dialing.
#[tokio::test]
async fn empty_cluster_reports_no_connections() {
    let cfg = ClusterConfig { nodes: vec![], retries: 0, cooldown: Duration::from_secs(30) };
    let client = RiakClient::new(cfg).expect("construct client");

    let result = client.ping().await;

    assert_eq!(result.code(), Some(ResultCode::NoConnections));
}
