// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use riak_client_rs::{
    model::{BucketId, IndexQuery},
    options::IndexOptions,
    protocol::{codes::MessageCode, messages::IndexResp, wire::WireMessage},
    RiakClient,
};

use crate::integration_tests::common::{MockAction, MockNode};

#[tokio::test]
async fn query_index_eq_returns_matching_keys_across_frames() {
    let handler = Arc::new(|code: u8, _body: bytes::Bytes| -> Vec<MockAction> {
        assert_eq!(code, MessageCode::IndexReq.as_u8());

        let mut first = BytesMut::new();
        IndexResp {
            keys: vec![Bytes::from_static(b"k1")],
            results: Vec::new(),
            continuation: None,
            done: false,
        }
        .encode(&mut first);

        let mut second = BytesMut::new();
        IndexResp {
            keys: vec![Bytes::from_static(b"k2")],
            results: Vec::new(),
            continuation: Some(Bytes::from_static(b"cont-1")),
            done: true,
        }
        .encode(&mut second);

        vec![
            MockAction::Reply(MessageCode::IndexResp.as_u8(), first),
            MockAction::Reply(MessageCode::IndexResp.as_u8(), second),
        ]
    });
    let node = MockNode::start("n1", handler).await;
    let client = RiakClient::new(node.cluster_config()).expect("construct client");

    let bucket = BucketId::new("bucket");
    let result = client
        .query_index(&bucket, "email_bin", IndexQuery::Eq(Bytes::from_static(b"a@b.com")), &IndexOptions::default())
        .await;

    assert!(result.is_success(), "query_index should succeed: {:?}", result.error());
    let found = result.into_result().expect("success");
    assert_eq!(found.keys, vec![Bytes::from_static(b"k1"), Bytes::from_static(b"k2")]);
    assert_eq!(found.continuation, Some(Bytes::from_static(b"cont-1")));
}
