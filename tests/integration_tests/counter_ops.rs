// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use riak_client_rs::{
    options::CounterOptions,
    protocol::{
        codes::MessageCode,
        messages::{CounterGetResp, CounterUpdateResp},
        wire::WireMessage,
    },
    RiakClient,
};

use crate::integration_tests::common::{MockAction, MockNode};

#[tokio::test]
async fn counter_increment_returns_the_post_increment_value() {
    let handler = Arc::new(|code: u8, _body: bytes::Bytes| -> Vec<MockAction> {
        assert_eq!(code, MessageCode::CounterUpdateReq.as_u8());
        let mut body = BytesMut::new();
        CounterUpdateResp { value: Some(7) }.encode(&mut body);
        vec![MockAction::Reply(MessageCode::CounterUpdateResp.as_u8(), body)]
    });
    let node = MockNode::start("n1", handler).await;
    let client = RiakClient::new(node.cluster_config()).expect("construct client");

    let result = client
        .counter_increment(
            &Bytes::from_static(b"counters"),
            &Bytes::from_static(b"visits"),
            3,
            CounterOptions::default().with_returnvalue(true),
        )
        .await;

    assert!(result.is_success(), "counter_increment should succeed: {:?}", result.error());
    assert_eq!(result.into_result().expect("success"), Some(7));
}

#[tokio::test]
async fn counter_get_returns_the_current_value() {
    let handler = Arc::new(|code: u8, _body: bytes::Bytes| -> Vec<MockAction> {
        assert_eq!(code, MessageCode::CounterGetReq.as_u8());
        let mut body = BytesMut::new();
        CounterGetResp { value: Some(99) }.encode(&mut body);
        vec![MockAction::Reply(MessageCode::CounterGetResp.as_u8(), body)]
    });
    let node = MockNode::start("n1", handler).await;
    let client = RiakClient::new(node.cluster_config()).expect("construct client");

    let result = client.counter_get(&Bytes::from_static(b"counters"), &Bytes::from_static(b"visits")).await;

    assert!(result.is_success(), "counter_get should succeed: {:?}", result.error());
    assert_eq!(result.into_result().expect("success"), Some(99));
}
