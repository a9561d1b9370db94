// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use bytes::BytesMut;
use riak_client_rs::{
    error::ResultCode,
    model::KeyTriple,
    options::GetOptions,
    protocol::{codes::MessageCode, messages::GetResp, wire::WireMessage},
    RiakClient,
};

use crate::integration_tests::common::{MockAction, MockNode};

/// `spec.md` §8 scenario 2: an absent vclock materializes as a failed
/// result with `code=not-found`, never a successful empty one.
#[tokio::test]
async fn get_on_an_absent_key_returns_not_found() {
    let handler = Arc::new(|code: u8, _body: bytes::Bytes| -> Vec<MockAction> {
        assert_eq!(code, MessageCode::GetReq.as_u8());
        let mut body = BytesMut::new();
        GetResp { vclock: None, content: Vec::new() }.encode(&mut body);
        vec![MockAction::Reply(MessageCode::GetResp.as_u8(), body)]
    });
    let node = MockNode::start("n1", handler).await;
    let client = RiakClient::new(node.cluster_config()).expect("construct client");

    let key = KeyTriple::new("bucket", "missing-key");
    let result = client.get(&key, &GetOptions::default()).await;

    assert!(!result.is_success());
    assert_eq!(result.code(), Some(ResultCode::NotFound));
}
