// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use riak_client_rs::{
    model::{Content, KeyTriple, RiakObject},
    options::PutOptions,
    protocol::{codes::MessageCode, messages::PutResp, wire::WireMessage},
    RiakClient,
};

use crate::integration_tests::common::{MockAction, MockNode};

/// `spec.md` §8 scenario 3: a `put` with `return-body` set, against a
/// key with a concurrent conflict, surfaces every returned content
/// (primary included) in `siblings`.
#[tokio::test]
async fn put_with_return_body_surfaces_all_contents_as_siblings() {
    let c1 = Content::new(Bytes::from_static(b"first-writer"));
    let c2 = Content::new(Bytes::from_static(b"second-writer"));
    let resp_contents = vec![c1.clone(), c2.clone()];

    let handler = Arc::new(move |code: u8, _body: bytes::Bytes| -> Vec<MockAction> {
        assert_eq!(code, MessageCode::PutReq.as_u8());
        let mut body = BytesMut::new();
        PutResp {
            vclock: Some(Bytes::from_static(b"vclock-1")),
            content: resp_contents.clone(),
            key: None,
        }
        .encode(&mut body);
        vec![MockAction::Reply(MessageCode::PutResp.as_u8(), body)]
    });
    let node = MockNode::start("n1", handler).await;
    let client = RiakClient::new(node.cluster_config()).expect("construct client");

    let key = KeyTriple::new("bucket", "contested-key");
    let obj = RiakObject::new(key.clone(), Content::new(Bytes::from_static(b"my-write")));
    let opts = PutOptions::default().with_return_body(true);

    let result = client.put(&obj, &opts).await;
    assert!(result.is_success(), "put should succeed: {:?}", result.error());

    let returned = result.into_result().expect("success");
    assert_eq!(returned.vclock, Some(Bytes::from_static(b"vclock-1")));
    assert!(returned.has_siblings());
    assert_eq!(returned.siblings, vec![c1, c2]);
}
