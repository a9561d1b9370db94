// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The one-byte message codes that tag every frame (`spec.md` §6).
//!
//! The numeric values follow Riak's published protocol buffers message
//! table; this crate treats the values as opaque framing tags only — the
//! bodies themselves are this crate's own stand-in payload types (see
//! `crate::protocol::messages`), not Riak's actual `.proto` schema.

/// First-class message codes. `TryFrom<u8>` only recognizes the codes
/// this crate actually builds request/response types for; any other
/// code observed on the wire is surfaced as
/// [`crate::error::ResultCode::InvalidResponse`] by the frame codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageCode {
    ErrorResp = 0,
    PingReq = 1,
    PingResp = 2,
    GetServerInfoReq = 7,
    GetServerInfoResp = 8,
    GetReq = 9,
    GetResp = 10,
    PutReq = 11,
    PutResp = 12,
    DelReq = 13,
    DelResp = 14,
    ListBucketsReq = 15,
    ListBucketsResp = 16,
    ListKeysReq = 17,
    ListKeysResp = 18,
    GetBucketReq = 19,
    GetBucketResp = 20,
    SetBucketReq = 21,
    SetBucketResp = 22,
    MapRedReq = 23,
    MapRedResp = 24,
    IndexReq = 25,
    IndexResp = 26,
    SearchQueryReq = 27,
    SearchQueryResp = 28,
    ResetBucketReq = 29,
    ResetBucketResp = 30,
    CounterUpdateReq = 31,
    CounterUpdateResp = 32,
    CounterGetReq = 33,
    CounterGetResp = 34,
    DtFetchReq = 80,
    DtFetchResp = 81,
    DtUpdateReq = 82,
    DtUpdateResp = 83,
}

impl MessageCode {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageCode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use MessageCode::*;
        Ok(match value {
            0 => ErrorResp,
            1 => PingReq,
            2 => PingResp,
            7 => GetServerInfoReq,
            8 => GetServerInfoResp,
            9 => GetReq,
            10 => GetResp,
            11 => PutReq,
            12 => PutResp,
            13 => DelReq,
            14 => DelResp,
            15 => ListBucketsReq,
            16 => ListBucketsResp,
            17 => ListKeysReq,
            18 => ListKeysResp,
            19 => GetBucketReq,
            20 => GetBucketResp,
            21 => SetBucketReq,
            22 => SetBucketResp,
            23 => MapRedReq,
            24 => MapRedResp,
            25 => IndexReq,
            26 => IndexResp,
            27 => SearchQueryReq,
            28 => SearchQueryResp,
            29 => ResetBucketReq,
            30 => ResetBucketResp,
            31 => CounterUpdateReq,
            32 => CounterUpdateResp,
            33 => CounterGetReq,
            34 => CounterGetResp,
            80 => DtFetchReq,
            81 => DtFetchResp,
            82 => DtUpdateReq,
            83 => DtUpdateResp,
            other => return Err(other),
        })
    }
}
