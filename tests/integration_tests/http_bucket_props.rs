// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{sync::Arc, time::Duration};

use riak_client_rs::{
    config::{ClusterConfig, NodeConfig},
    model::{BucketId, BucketProps},
    RiakClient,
};

use crate::integration_tests::common::MockHttpServer;

fn cluster_config_for(http_port: u16) -> ClusterConfig {
    let node = NodeConfig {
        name: "n1".to_string(),
        host: "127.0.0.1".to_string(),
        // Nothing binds this; the HTTP path never dials it.
        pb_port: 1,
        http_port,
        pool_size: 1,
        connect_timeout: Duration::from_millis(100),
        read_timeout: Duration::from_millis(100),
        write_timeout: Duration::from_millis(100),
        idle_timeout: Duration::from_secs(60),
    };
    ClusterConfig { nodes: vec![node], retries: 0, cooldown: Duration::from_secs(30) }
}

#[tokio::test]
async fn set_bucket_props_http_succeeds_on_204() {
    let server = MockHttpServer::start(Arc::new(|method, path, body| {
        assert_eq!(method, "PUT");
        assert_eq!(path, "/buckets/people/props");
        let text = String::from_utf8(body).expect("utf8 body");
        assert!(text.contains("\"n_val\":3"));
        assert!(text.contains("\"props\""));
        204
    }))
    .await;

    let client = RiakClient::new(cluster_config_for(server.port)).expect("construct client");
    let bucket = BucketId::new(bytes_from("people"));
    let props = BucketProps { n_val: Some(3), allow_mult: None, last_write_wins: None };

    let result = client.set_bucket_props_http(&bucket, props).await;
    assert!(result.is_success(), "expected success: {:?}", result.error());
}

#[tokio::test]
async fn set_bucket_props_http_surfaces_invalid_response_on_unexpected_status() {
    let server = MockHttpServer::start(Arc::new(|_method, _path, _body| 500)).await;

    let client = RiakClient::new(cluster_config_for(server.port)).expect("construct client");
    let bucket = BucketId::new(bytes_from("people"));
    let props = BucketProps::default();

    let result = client.set_bucket_props_http(&bucket, props).await;
    assert!(!result.is_success());
    assert_eq!(result.code(), Some(riak_client_rs::error::ResultCode::InvalidResponse));
}

#[tokio::test]
async fn reset_bucket_props_maps_404_to_not_found() {
    let server = MockHttpServer::start(Arc::new(|method, path, _body| {
        assert_eq!(method, "DELETE");
        assert_eq!(path, "/buckets/people/props");
        404
    }))
    .await;

    let client = RiakClient::new(cluster_config_for(server.port)).expect("construct client");
    let bucket = BucketId::new(bytes_from("people"));

    let result = client.reset_bucket_props(&bucket).await;
    assert!(!result.is_success());
    assert_eq!(result.code(), Some(riak_client_rs::error::ResultCode::NotFound));
}

#[tokio::test]
async fn reset_bucket_props_succeeds_on_204() {
    let server = MockHttpServer::start(Arc::new(|_method, _path, _body| 204)).await;

    let client = RiakClient::new(cluster_config_for(server.port)).expect("construct client");
    let bucket = BucketId::new(bytes_from("people"));

    let result = client.reset_bucket_props(&bucket).await;
    assert!(result.is_success(), "expected success: {:?}", result.error());
}

fn bytes_from(s: &str) -> bytes::Bytes {
    bytes::Bytes::copy_from_slice(s.as_bytes())
}
