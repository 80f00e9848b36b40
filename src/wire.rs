// Wire codec - fixed-layout big-endian binary primitives shared by the
// handshaker, demuxer, and control channel.
//
// Every component in this crate reads and writes fields through these
// functions instead of reimplementing byte parsing at each call site, so the
// `u8/len32_blob/len16_string` shapes below are the single source of truth
// for the wire format.

use crate::error::{Result, ScrcpyError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// EOF with zero bytes read at a field boundary is a clean end-of-stream;
/// EOF partway through a field is a `TruncatedFrame`. Callers that need to
/// distinguish the two read a marker byte themselves and call the `_after`
/// variants below for the rest of the frame.
fn eof_is_truncated(e: std::io::Error) -> ScrcpyError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        ScrcpyError::truncated_frame("EOF inside a frame")
    } else {
        ScrcpyError::from(e)
    }
}

pub async fn read_u8<R: AsyncRead + Unpin>(r: &mut R) -> Result<u8> {
    r.read_u8().await.map_err(eof_is_truncated)
}

pub async fn read_bool<R: AsyncRead + Unpin>(r: &mut R) -> Result<bool> {
    Ok(read_u8(r).await? != 0)
}

pub async fn read_u16<R: AsyncRead + Unpin>(r: &mut R) -> Result<u16> {
    r.read_u16().await.map_err(eof_is_truncated)
}

pub async fn read_u32<R: AsyncRead + Unpin>(r: &mut R) -> Result<u32> {
    r.read_u32().await.map_err(eof_is_truncated)
}

pub async fn read_u64<R: AsyncRead + Unpin>(r: &mut R) -> Result<u64> {
    r.read_u64().await.map_err(eof_is_truncated)
}

pub async fn read_i16<R: AsyncRead + Unpin>(r: &mut R) -> Result<i16> {
    r.read_i16().await.map_err(eof_is_truncated)
}

pub async fn read_i32<R: AsyncRead + Unpin>(r: &mut R) -> Result<i32> {
    r.read_i32().await.map_err(eof_is_truncated)
}

pub async fn read_i64<R: AsyncRead + Unpin>(r: &mut R) -> Result<i64> {
    r.read_i64().await.map_err(eof_is_truncated)
}

/// Reads exactly `n` bytes, mapping a partial read into `TruncatedFrame`.
pub async fn read_exact_vec<R: AsyncRead + Unpin>(r: &mut R, n: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    r.read_exact(&mut buf).await.map_err(eof_is_truncated)?;
    Ok(buf)
}

/// `fixed_string(N)`: N bytes, NUL-padded, UTF-8, trailing NULs stripped.
pub async fn read_fixed_string<R: AsyncRead + Unpin>(r: &mut R, n: usize) -> Result<String> {
    let buf = read_exact_vec(r, n).await?;
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8(buf[..end].to_vec())
        .map_err(|e| ScrcpyError::malformed_frame(format!("fixed_string not UTF-8: {e}")))
}

/// `len32_blob`: `u32` length then that many bytes, capped by `max_len`.
pub async fn read_len32_blob<R: AsyncRead + Unpin>(r: &mut R, max_len: u32) -> Result<Vec<u8>> {
    let len = read_u32(r).await?;
    if len > max_len {
        return Err(ScrcpyError::malformed_frame(format!(
            "len32 blob length {len} exceeds cap {max_len}"
        )));
    }
    read_exact_vec(r, len as usize).await
}

/// `len32_string`: as `len32_blob`, decoded as UTF-8.
pub async fn read_len32_string<R: AsyncRead + Unpin>(r: &mut R, max_len: u32) -> Result<String> {
    let bytes = read_len32_blob(r, max_len).await?;
    String::from_utf8(bytes)
        .map_err(|e| ScrcpyError::malformed_frame(format!("len32 string not UTF-8: {e}")))
}

/// `len16_blob`: `u16` length then that many bytes.
pub async fn read_len16_blob<R: AsyncRead + Unpin>(r: &mut R) -> Result<Vec<u8>> {
    let len = read_u16(r).await?;
    read_exact_vec(r, len as usize).await
}

/// `len16_string`: as `len16_blob`, decoded as UTF-8.
pub async fn read_len16_string<R: AsyncRead + Unpin>(r: &mut R) -> Result<String> {
    let bytes = read_len16_blob(r).await?;
    String::from_utf8(bytes)
        .map_err(|e| ScrcpyError::malformed_frame(format!("len16 string not UTF-8: {e}")))
}

pub async fn write_u8<W: AsyncWrite + Unpin>(w: &mut W, v: u8) -> Result<()> {
    w.write_u8(v).await.map_err(ScrcpyError::from)
}

pub async fn write_bool<W: AsyncWrite + Unpin>(w: &mut W, v: bool) -> Result<()> {
    write_u8(w, v as u8).await
}

pub async fn write_u16<W: AsyncWrite + Unpin>(w: &mut W, v: u16) -> Result<()> {
    w.write_u16(v).await.map_err(ScrcpyError::from)
}

pub async fn write_u32<W: AsyncWrite + Unpin>(w: &mut W, v: u32) -> Result<()> {
    w.write_u32(v).await.map_err(ScrcpyError::from)
}

pub async fn write_u64<W: AsyncWrite + Unpin>(w: &mut W, v: u64) -> Result<()> {
    w.write_u64(v).await.map_err(ScrcpyError::from)
}

pub async fn write_i16<W: AsyncWrite + Unpin>(w: &mut W, v: i16) -> Result<()> {
    w.write_i16(v).await.map_err(ScrcpyError::from)
}

pub async fn write_i32<W: AsyncWrite + Unpin>(w: &mut W, v: i32) -> Result<()> {
    w.write_i32(v).await.map_err(ScrcpyError::from)
}

pub async fn write_i64<W: AsyncWrite + Unpin>(w: &mut W, v: i64) -> Result<()> {
    w.write_i64(v).await.map_err(ScrcpyError::from)
}

pub async fn write_bytes<W: AsyncWrite + Unpin>(w: &mut W, bytes: &[u8]) -> Result<()> {
    w.write_all(bytes).await.map_err(ScrcpyError::from)
}

pub async fn write_len32_blob<W: AsyncWrite + Unpin>(w: &mut W, bytes: &[u8]) -> Result<()> {
    write_u32(w, bytes.len() as u32).await?;
    write_bytes(w, bytes).await
}

pub async fn write_len32_string<W: AsyncWrite + Unpin>(w: &mut W, s: &str) -> Result<()> {
    write_len32_blob(w, s.as_bytes()).await
}

pub async fn write_len16_blob<W: AsyncWrite + Unpin>(w: &mut W, bytes: &[u8]) -> Result<()> {
    write_u16(w, bytes.len() as u16).await?;
    write_bytes(w, bytes).await
}

pub async fn write_len16_string<W: AsyncWrite + Unpin>(w: &mut W, s: &str) -> Result<()> {
    write_len16_blob(w, s.as_bytes()).await
}

/// NUL-pads `s` to exactly `n` bytes, truncating UTF-8 safely if it's longer.
pub fn pad_fixed_string(s: &str, n: usize) -> Vec<u8> {
    let mut bytes = s.as_bytes().to_vec();
    if bytes.len() > n {
        // Truncate on a UTF-8 boundary at or before `n`.
        while !bytes.is_empty() && bytes.len() > n {
            bytes.pop();
        }
        while !bytes.is_empty() && std::str::from_utf8(&bytes).is_err() {
            bytes.pop();
        }
    }
    bytes.resize(n, 0);
    bytes
}
