// Stream demuxer - parses the packet-frame sequence on a handshaked
// video/audio socket and reconstructs PTS/flags from the 64-bit header
// field.

use crate::error::{Result, ScrcpyError};
use crate::media_channel::MediaSender;
use crate::model::{CodecFrame, FrameFlags, MediaStreamId};
use crate::wire;
use tokio::io::{AsyncRead, AsyncReadExt};

const CONFIG_BIT: u64 = 1 << 63;
const KEYFRAME_BIT: u64 = 1 << 62;
const PTS_MASK: u64 = 0x3FFF_FFFF_FFFF_FFFF;

fn split_pts_and_flags(raw: u64) -> (FrameFlags, u64) {
    let flags = FrameFlags {
        config: raw & CONFIG_BIT != 0,
        keyframe: raw & KEYFRAME_BIT != 0,
    };
    (flags, raw & PTS_MASK)
}

/// Reads the leading `u64`, returning `Ok(None)` on a clean EOF before any
/// byte of it (normal end-of-stream) and `TruncatedFrame` on a partial read.
async fn read_header_u64<R: AsyncRead + Unpin>(r: &mut R) -> Result<Option<u64>> {
    let mut buf = [0u8; 8];
    let n = r.read(&mut buf[..1]).await.map_err(ScrcpyError::from)?;
    if n == 0 {
        return Ok(None);
    }
    r.read_exact(&mut buf[1..]).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            ScrcpyError::truncated_frame("EOF inside packet header")
        } else {
            ScrcpyError::from(e)
        }
    })?;
    Ok(Some(u64::from_be_bytes(buf)))
}

/// Parses packet frames off `reader` until clean EOF or a fatal error,
/// pushing each decoded `CodecFrame` to `sink`. Oversize payloads are fatal
/// and stop the loop; malformed config packets are logged and skipped.
pub struct Demuxer<R> {
    reader: R,
    stream_id: MediaStreamId,
    codec_id: u32,
    max_payload_len: u32,
    last_pts: Option<u64>,
}

impl<R: AsyncRead + Unpin> Demuxer<R> {
    pub fn new(reader: R, stream_id: MediaStreamId, codec_id: u32, max_payload_len: u32) -> Self {
        Self {
            reader,
            stream_id,
            codec_id,
            max_payload_len,
            last_pts: None,
        }
    }

    /// Reads and decodes exactly one frame. `Ok(None)` signals clean
    /// end-of-stream between frames.
    pub async fn next_frame(&mut self) -> Result<Option<CodecFrame>> {
        let raw = match read_header_u64(&mut self.reader).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let (flags, masked_pts) = split_pts_and_flags(raw);

        let payload_len = wire::read_u32(&mut self.reader).await?;
        if payload_len > self.max_payload_len {
            return Err(ScrcpyError::malformed_frame(format!(
                "{} payload_len {} exceeds cap {}",
                self.stream_id, payload_len, self.max_payload_len
            )));
        }
        let payload = wire::read_exact_vec(&mut self.reader, payload_len as usize).await?;

        let pts_us = if flags.config && masked_pts == 0 {
            None
        } else {
            Some(masked_pts)
        };

        if let (Some(prev), Some(pts)) = (self.last_pts, pts_us) {
            if pts < prev {
                log::warn!(
                    "{} PTS decreased: {} -> {} (forwarding anyway)",
                    self.stream_id,
                    prev,
                    pts
                );
            }
        }
        if let Some(pts) = pts_us {
            self.last_pts = Some(pts);
        }

        Ok(Some(CodecFrame {
            stream_id: self.stream_id,
            codec_id: self.codec_id,
            pts_us,
            flags,
            payload,
        }))
    }

    /// Drives the demuxer to completion, delivering frames to `sink` under
    /// its back-pressure policy. Returns `Ok(())` on clean end-of-stream or
    /// the first fatal error encountered. Races every read against `stop`
    /// so the coordinator's shutdown signal is observed at the next
    /// suspension point instead of only after a force-abort.
    pub async fn run(mut self, sink: MediaSender, mut stop: tokio::sync::watch::Receiver<bool>) -> Result<()> {
        loop {
            tokio::select! {
                biased;
                _ = stop.changed() => {
                    sink.close();
                    return Ok(());
                }
                frame = self.next_frame() => {
                    match frame {
                        Ok(Some(frame)) => sink.send(frame).await,
                        Ok(None) => {
                            sink.close();
                            return Ok(());
                        }
                        Err(e) => {
                            sink.close();
                            return Err(e);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media_channel::media_channel;
    use std::io::Cursor;

    fn packet(pts_and_flags: u64, payload: &[u8]) -> Vec<u8> {
        let mut buf = pts_and_flags.to_be_bytes().to_vec();
        buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        buf.extend_from_slice(payload);
        buf
    }

    #[tokio::test]
    async fn decodes_config_keyframe_packet() {
        let data = packet(CONFIG_BIT | KEYFRAME_BIT | 12345, &[0u8; 40]);
        let mut demux = Demuxer::new(Cursor::new(data), MediaStreamId::Video, 0x68323634, 1024 * 1024);

        let frame = demux.next_frame().await.unwrap().unwrap();
        assert!(frame.flags.config);
        assert!(frame.flags.keyframe);
        assert_eq!(frame.pts_us, Some(12345));
        assert_eq!(frame.payload.len(), 40);
    }

    #[tokio::test]
    async fn config_packet_with_zero_pts_has_no_timestamp() {
        let data = packet(CONFIG_BIT, &[1, 2, 3]);
        let mut demux = Demuxer::new(Cursor::new(data), MediaStreamId::Video, 0x68323634, 1024);

        let frame = demux.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.pts_us, None);
    }

    #[tokio::test]
    async fn oversize_payload_len_is_malformed_frame() {
        let mut data = 100u64.to_be_bytes().to_vec();
        data.extend_from_slice(&u32::MAX.to_be_bytes());
        let mut demux = Demuxer::new(Cursor::new(data), MediaStreamId::Video, 0x68323634, 1024);

        let err = demux.next_frame().await.unwrap_err();
        assert_eq!(err.kind, crate::error::ScrcpyErrorKind::MalformedFrame);
    }

    #[tokio::test]
    async fn clean_eof_between_frames_returns_none() {
        let mut demux = Demuxer::new(Cursor::new(Vec::new()), MediaStreamId::Video, 0, 1024);
        assert!(demux.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn eof_mid_frame_is_truncated() {
        let mut demux = Demuxer::new(Cursor::new(vec![0u8; 4]), MediaStreamId::Video, 0, 1024);
        let err = demux.next_frame().await.unwrap_err();
        assert_eq!(err.kind, crate::error::ScrcpyErrorKind::TruncatedFrame);
    }

    #[tokio::test]
    async fn run_delivers_frames_then_closes_sink() {
        let mut data = packet(100, &[1, 2]);
        data.extend_from_slice(&packet(200, &[3, 4]));
        let demux = Demuxer::new(Cursor::new(data), MediaStreamId::Audio, 0x6f707573, 1024);
        let (tx, mut rx) = media_channel(4);
        let (_stop_tx, stop_rx) = tokio::sync::watch::channel(false);

        demux.run(tx, stop_rx).await.unwrap();

        let f1 = rx.recv().await.unwrap();
        assert_eq!(f1.pts_us, Some(100));
        let f2 = rx.recv().await.unwrap();
        assert_eq!(f2.pts_us, Some(200));
        assert!(rx.recv().await.is_none());
    }
}
