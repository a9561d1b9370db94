// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Small hand-rolled encode/decode helpers shared by every payload type
//! in `crate::protocol::messages`.
//!
//! `spec.md` treats message bodies as opaque to the core, needing only a
//! serialize/deserialize callback per payload. This module is that
//! callback surface: a minimal, dependency-free binary format (a
//! byte-string is `u32-be length` + bytes; everything else is
//! fixed-width), standing in for what would be a generated Protocol
//! Buffers codec against Riak's real `.proto` schema.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::RiakError;

/// A payload that can be framed by [`crate::protocol::frame::FrameCodec`].
pub trait WireMessage: Sized {
    /// The [`crate::protocol::codes::MessageCode`] this payload encodes
    /// as, used by the codec to validate the frame tag on read.
    const CODE: u8;

    fn encode(&self, buf: &mut BytesMut);
    fn decode(buf: &mut Bytes) -> Result<Self, RiakError>;
}

pub fn put_bytes(buf: &mut BytesMut, data: &[u8]) {
    buf.put_u32(data.len() as u32);
    buf.put_slice(data);
}

pub fn get_bytes(buf: &mut Bytes) -> Result<Bytes, RiakError> {
    if buf.remaining() < 4 {
        return Err(RiakError::invalid_response("truncated length prefix"));
    }
    let len = buf.get_u32() as usize;
    if buf.remaining() < len {
        return Err(RiakError::invalid_response("truncated byte string"));
    }
    Ok(buf.copy_to_bytes(len))
}

pub fn get_string(buf: &mut Bytes) -> Result<String, RiakError> {
    let bytes = get_bytes(buf)?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| RiakError::invalid_response(format!("invalid utf8: {e}")))
}

pub fn put_opt_bytes(buf: &mut BytesMut, data: Option<&[u8]>) {
    match data {
        Some(d) => {
            buf.put_u8(1);
            put_bytes(buf, d);
        },
        None => buf.put_u8(0),
    }
}

pub fn get_opt_bytes(buf: &mut Bytes) -> Result<Option<Bytes>, RiakError> {
    if buf.remaining() < 1 {
        return Err(RiakError::invalid_response("truncated option tag"));
    }
    match buf.get_u8() {
        0 => Ok(None),
        _ => Ok(Some(get_bytes(buf)?)),
    }
}

pub fn require(buf: &Bytes, n: usize, what: &'static str) -> Result<(), RiakError> {
    if buf.remaining() < n {
        return Err(RiakError::invalid_response(format!("truncated {what}")));
    }
    Ok(())
}
