// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use bytes::BytesMut;
use riak_client_rs::{
    model::{BucketId, BucketProps},
    protocol::{
        codes::MessageCode,
        messages::{GetBucketResp, SetBucketResp},
        wire::WireMessage,
    },
    RiakClient,
};

use crate::integration_tests::common::{MockAction, MockNode};

#[tokio::test]
async fn get_bucket_props_returns_the_servers_properties() {
    let handler = Arc::new(|code: u8, _body: bytes::Bytes| -> Vec<MockAction> {
        assert_eq!(code, MessageCode::GetBucketReq.as_u8());
        let mut body = BytesMut::new();
        GetBucketResp {
            props: BucketProps { n_val: Some(3), allow_mult: Some(true), last_write_wins: Some(false) },
        }
        .encode(&mut body);
        vec![MockAction::Reply(MessageCode::GetBucketResp.as_u8(), body)]
    });
    let node = MockNode::start("n1", handler).await;
    let client = RiakClient::new(node.cluster_config()).expect("construct client");

    let bucket = BucketId::new("people");
    let result = client.get_bucket_props(&bucket).await;

    assert!(result.is_success(), "get_bucket_props should succeed: {:?}", result.error());
    let props = result.into_result().expect("success");
    assert_eq!(props.n_val, Some(3));
    assert_eq!(props.allow_mult, Some(true));
}

#[tokio::test]
async fn set_bucket_props_round_trips_over_the_binary_protocol() {
    let handler = Arc::new(|code: u8, _body: bytes::Bytes| -> Vec<MockAction> {
        assert_eq!(code, MessageCode::SetBucketReq.as_u8());
        let mut body = BytesMut::new();
        SetBucketResp.encode(&mut body);
        vec![MockAction::Reply(MessageCode::SetBucketResp.as_u8(), body)]
    });
    let node = MockNode::start("n1", handler).await;
    let client = RiakClient::new(node.cluster_config()).expect("construct client");

    let bucket = BucketId::new("people");
    let props = BucketProps { n_val: Some(5), allow_mult: None, last_write_wins: None };
    let result = client.set_bucket_props(&bucket, props).await;

    assert!(result.is_success(), "set_bucket_props should succeed: {:?}", result.error());
}
