// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use bytes::Bytes;
use riak_client_rs::{
    options::{CounterOptions, DtFetchOptions, DtUpdateOptions, IndexOptions},
    protocol::messages::{DtFetchReq, DtUpdateReq, IndexQueryType, IndexReq},
};

#[test]
fn index_options_populate_return_terms_and_continuation() {
    let opts = IndexOptions::default()
        .with_return_terms(true)
        .with_max_results(50)
        .with_continuation(Bytes::from_static(b"cont-token"));

    let mut req = IndexReq {
        bucket_type: None,
        bucket: Bytes::from_static(b"b"),
        index: "field_bin".to_string(),
        qtype: IndexQueryType::Eq,
        key: Some(Bytes::from_static(b"v")),
        range_min: None,
        range_max: None,
        return_terms: false,
        max_results: None,
        continuation: None,
    };
    opts.populate(&mut req);

    assert!(req.return_terms);
    assert_eq!(req.max_results, Some(50));
    assert_eq!(req.continuation, Some(Bytes::from_static(b"cont-token")));
}

#[test]
fn dt_fetch_options_default_to_no_context() {
    let opts = DtFetchOptions::default();
    let mut req = DtFetchReq {
        bucket_type: Bytes::from_static(b"maps"),
        bucket: Bytes::from_static(b"b"),
        key: Bytes::from_static(b"k"),
        r: None,
        include_context: false,
    };
    opts.populate(&mut req);
    assert!(!req.include_context);
    assert_eq!(req.r, None);
}

#[test]
fn dt_update_options_chain_return_body_and_context() {
    let opts = DtUpdateOptions::default().with_w(3).with_return_body(true).with_include_context(true);
    let mut req = DtUpdateReq {
        bucket_type: Bytes::from_static(b"maps"),
        bucket: Bytes::from_static(b"b"),
        key: None,
        context: None,
        op: riak_client_rs::model::CrdtOp::Counter(1),
        w: None,
        return_body: false,
        include_context: false,
    };
    opts.populate(&mut req);
    assert_eq!(req.w, Some(3));
    assert!(req.return_body);
    assert!(req.include_context);
}

#[test]
fn counter_options_builder_is_copy_and_chains() {
    let opts = CounterOptions::default().with_returnvalue(true);
    let copied = opts;
    assert!(opts.returnvalue);
    assert!(copied.returnvalue);
}
