// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{collections::HashSet, sync::Arc};

use bytes::{Bytes, BytesMut};
use riak_client_rs::{
    model::BucketId,
    protocol::{codes::MessageCode, messages::ListKeysResp, wire::WireMessage},
    RiakClient,
};

use crate::integration_tests::common::{MockAction, MockNode};

/// `spec.md` §8 scenario 6: draining a lazy `stream_list_keys` to
/// completion yields every distinct key across frames exactly once, and
/// releases its pinned connection once the terminal frame is consumed.
#[tokio::test]
async fn streaming_list_keys_dedupes_across_frames_and_releases_on_completion() {
    let handler = Arc::new(|code: u8, _body: bytes::Bytes| -> Vec<MockAction> {
        assert_eq!(code, MessageCode::ListKeysReq.as_u8());

        let mut first = BytesMut::new();
        ListKeysResp { keys: vec![Bytes::from_static(b"k1"), Bytes::from_static(b"k2")], done: false }
            .encode(&mut first);

        let mut second = BytesMut::new();
        ListKeysResp { keys: vec![Bytes::from_static(b"k2"), Bytes::from_static(b"k3")], done: true }
            .encode(&mut second);

        vec![
            MockAction::Reply(MessageCode::ListKeysResp.as_u8(), first),
            MockAction::Reply(MessageCode::ListKeysResp.as_u8(), second),
        ]
    });
    let node = MockNode::start("n1", handler).await;
    let client = RiakClient::new(node.cluster_config()).expect("construct client");

    let bucket = BucketId::new("bucket");
    let result = client.stream_list_keys(&bucket).await;
    assert!(result.is_success(), "stream_list_keys should succeed: {:?}", result.error());
    let mut stream = result.into_result().expect("success");

    let mut seen = HashSet::new();
    while let Some(item) = stream.next().await {
        seen.insert(item.expect("no mid-stream errors from a well-behaved mock"));
    }

    assert_eq!(seen.len(), 3);
    assert!(seen.contains(&Bytes::from_static(b"k1")));
    assert!(seen.contains(&Bytes::from_static(b"k2")));
    assert!(seen.contains(&Bytes::from_static(b"k3")));

    // The terminal frame released the pinned connection immediately,
    // not just on stream drop: one accepted connection served the
    // entire scan.
    assert_eq!(node.connections_accepted(), 1);
}
