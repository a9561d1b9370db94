// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use riak_client_rs::{
    options::MapReduceOptions,
    protocol::{codes::MessageCode, messages::MapRedResp, wire::WireMessage},
    RiakClient,
};

use crate::integration_tests::common::{MockAction, MockNode};

#[tokio::test]
async fn map_reduce_accumulates_phase_results_across_frames() {
    let handler = Arc::new(|code: u8, _body: bytes::Bytes| -> Vec<MockAction> {
        assert_eq!(code, MessageCode::MapRedReq.as_u8());

        let mut first = BytesMut::new();
        MapRedResp { phase: Some(0), response: Some(Bytes::from_static(b"[1,2]")), done: false }
            .encode(&mut first);

        let mut second = BytesMut::new();
        MapRedResp { phase: Some(1), response: Some(Bytes::from_static(b"[3]")), done: true }
            .encode(&mut second);

        vec![
            MockAction::Reply(MessageCode::MapRedResp.as_u8(), first),
            MockAction::Reply(MessageCode::MapRedResp.as_u8(), second),
        ]
    });
    let node = MockNode::start("n1", handler).await;
    let client = RiakClient::new(node.cluster_config()).expect("construct client");

    let request = Bytes::from_static(br#"{"inputs":"bucket","query":[]}"#);
    let result = client.map_reduce(request, "application/json", &MapReduceOptions::default()).await;

    assert!(result.is_success(), "map_reduce should succeed: {:?}", result.error());
    let phases = result.into_result().expect("success");
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0].phase, Some(0));
    assert_eq!(phases[0].response, Some(Bytes::from_static(b"[1,2]")));
    assert_eq!(phases[1].phase, Some(1));
    assert_eq!(phases[1].response, Some(Bytes::from_static(b"[3]")));
}
