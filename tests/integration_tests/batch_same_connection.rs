// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use bytes::BytesMut;
use riak_client_rs::{protocol::{codes::MessageCode, wire::WireMessage}, ResultCode, RiakClient};

use crate::integration_tests::common::{MockAction, MockNode};

fn ping_handler() -> Arc<dyn Fn(u8, bytes::Bytes) -> Vec<MockAction> + Send + Sync> {
    Arc::new(|code: u8, _body: bytes::Bytes| -> Vec<MockAction> {
        assert_eq!(code, MessageCode::PingReq.as_u8());
        let mut body = BytesMut::new();
        riak_client_rs::protocol::messages::PingResp.encode(&mut body);
        vec![MockAction::Reply(MessageCode::PingResp.as_u8(), body)]
    })
}

/// `spec.md` §8 scenario 5: every operation run through one batch rides
/// the same connection — observable here as the mock node accepting
/// exactly one TCP connection for three pinged calls.
#[tokio::test]
async fn batch_pins_every_call_to_one_connection() {
    let node = MockNode::start("n1", ping_handler()).await;
    let client = RiakClient::new(node.cluster_config()).expect("construct client");

    let result = client
        .batch(|handle| async move {
            handle.ping().await.into_result().expect("ping 1");
            handle.ping().await.into_result().expect("ping 2");
            handle.ping().await.into_result().expect("ping 3");
        })
        .await;

    assert!(result.is_success());
    assert_eq!(node.connections_accepted(), 1);
}

/// A panic inside a batch callback is captured as `BatchException`
/// rather than propagating out of `batch` or poisoning the client.
#[tokio::test]
async fn panicking_batch_callback_surfaces_as_batch_exception() {
    let node = MockNode::start("n1", ping_handler()).await;
    let client = RiakClient::new(node.cluster_config()).expect("construct client");

    let result = client
        .batch(|handle| async move {
            handle.ping().await.into_result().expect("ping before panic");
            panic!("simulated callback failure");
        })
        .await;

    assert!(!result.is_success());
    assert_eq!(result.code(), Some(ResultCode::BatchException));

    // The client is still usable after a batch callback panics.
    let follow_up = client.ping().await;
    assert!(follow_up.is_success());
}
