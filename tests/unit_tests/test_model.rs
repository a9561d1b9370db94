// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use bytes::Bytes;
use riak_client_rs::model::{
    BucketId, Content, CrdtKind, CrdtOp, CrdtValue, KeyTriple, MapEntryKey, RiakObject,
};

#[test]
fn an_object_with_one_content_has_no_siblings() {
    let key = KeyTriple::new("b", "k");
    let obj = RiakObject::new(key, Content::new(Bytes::from_static(b"v")));
    assert!(!obj.has_siblings());
}

#[test]
fn an_object_with_recorded_siblings_reports_them() {
    let key = KeyTriple::new("b", "k");
    let mut obj = RiakObject::new(key, Content::new(Bytes::from_static(b"v1")));
    obj.siblings.push(Content::new(Bytes::from_static(b"v2")));
    assert!(obj.has_siblings());
}

#[test]
fn bucket_id_rejects_embedded_slash_the_same_way_key_triple_does() {
    let b = BucketId::new("bad/bucket");
    assert!(b.validate().is_err());
}

#[test]
fn bucket_type_is_validated_independently_of_bucket() {
    let kt = KeyTriple::with_bucket_type("bad/type", "bucket", "key");
    assert!(kt.validate().is_err());
}

#[test]
fn nested_map_update_carries_its_field_kind() {
    let op = CrdtOp::Map {
        updates: vec![],
        removes: vec![MapEntryKey { name: Bytes::from_static(b"count"), kind: CrdtKind::Counter }],
    };
    match op {
        CrdtOp::Map { removes, .. } => assert_eq!(removes[0].kind, CrdtKind::Counter),
        _ => panic!("expected a map op"),
    }
}

#[test]
fn a_set_crdt_value_holds_its_members_in_encounter_order() {
    let value = CrdtValue::Set(vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
    match value {
        CrdtValue::Set(members) => assert_eq!(members.len(), 2),
        _ => panic!("expected a set"),
    }
}
