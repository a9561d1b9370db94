// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Length-prefixed frame I/O: `<u32-be total-length><u8 message-code><body>`
//! (`spec.md` §4.A, §6).
//!
//! A frame's `total-length` covers the message code byte plus the body;
//! it does not include itself. The codec never inspects a body's
//! contents beyond what [`WireMessage::decode`] does for the caller's
//! expected type.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    error::RiakError,
    protocol::{codes::MessageCode, messages::ErrorResp, wire::WireMessage},
};

/// Frames larger than this are rejected as malformed rather than trusted
/// to allocate (`spec.md` §4.A edge cases: guards against a corrupt or
/// hostile length prefix exhausting memory).
pub const MAX_FRAME_LEN: u32 = 64 * 1024 * 1024;

/// Writes one frame: `code` followed by `body`.
pub async fn write_frame<W>(writer: &mut W, code: u8, body: &[u8]) -> Result<(), RiakError>
where W: AsyncWrite + Unpin {
    let total = 1u32 + body.len() as u32;
    let mut header = BytesMut::with_capacity(5);
    header.put_u32(total);
    header.put_u8(code);
    writer
        .write_all(&header)
        .await
        .map_err(|e| RiakError::communication(format!("write frame header: {e}")))?;
    if !body.is_empty() {
        writer
            .write_all(body)
            .await
            .map_err(|e| RiakError::communication(format!("write frame body: {e}")))?;
    }
    writer.flush().await.map_err(|e| RiakError::communication(format!("flush: {e}")))?;
    Ok(())
}

/// Encodes `msg` and writes it as one frame.
pub async fn write_typed<W, T>(writer: &mut W, msg: &T) -> Result<(), RiakError>
where
    W: AsyncWrite + Unpin,
    T: WireMessage,
{
    let mut body = BytesMut::new();
    msg.encode(&mut body);
    write_frame(writer, T::CODE, &body).await
}

/// Reads one raw frame, returning its message code and body.
pub async fn read_frame<R>(reader: &mut R) -> Result<(u8, Bytes), RiakError>
where R: AsyncRead + Unpin {
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| RiakError::communication(format!("read frame length: {e}")))?;
    let total = u32::from_be_bytes(len_buf);
    if total == 0 {
        return Err(RiakError::invalid_response("zero-length frame"));
    }
    if total > MAX_FRAME_LEN {
        return Err(RiakError::invalid_response(format!("frame of {total} bytes exceeds limit")));
    }

    let mut rest = vec![0u8; total as usize];
    reader
        .read_exact(&mut rest)
        .await
        .map_err(|e| RiakError::communication(format!("read frame body: {e}")))?;

    let mut rest = Bytes::from(rest);
    let code = rest.get_u8();
    Ok((code, rest))
}

/// Reads one frame and decodes it as `T`.
///
/// An `error-resp` frame in place of the expected code is decoded and
/// surfaced as [`crate::error::ResultCode::RemoteError`]; any other
/// mismatched code is [`crate::error::ResultCode::InvalidResponse`].
pub async fn read_typed<R, T>(reader: &mut R) -> Result<T, RiakError>
where
    R: AsyncRead + Unpin,
    T: WireMessage,
{
    let (code, mut body) = read_frame(reader).await?;
    if code == T::CODE {
        return T::decode(&mut body);
    }
    if code == MessageCode::ErrorResp.as_u8() {
        let err = ErrorResp::decode(&mut body)?;
        return Err(RiakError::remote(err.errmsg));
    }
    Err(RiakError::invalid_response(format!(
        "expected message code {}, got {code}",
        T::CODE
    )))
}
