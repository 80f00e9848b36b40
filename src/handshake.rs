// Session handshaker - dummy-byte + device metadata exchange across the
// video, audio, and control sockets, in the server-mandated order.

use crate::error::{Result, ScrcpyError};
use crate::model::DeviceMeta;
use crate::wire;
use std::time::Duration;
use tokio::io::AsyncRead;

const DEVICE_NAME_FIELD_LEN: usize = 64;

/// Outcome of the full handshake: the device metadata plus each enabled
/// media socket's codec id (`None` when that socket wasn't opened at all,
/// distinct from "audio unavailable" which is reported via `audio_available`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeResult {
    pub device_meta: DeviceMeta,
    pub video_codec_id: Option<u32>,
    pub audio_codec_id: Option<u32>,
    /// False when the audio socket reported codec id 0 ("audio unavailable").
    /// The socket is still considered handshaked; this just means the
    /// session proceeds without an audio stream.
    pub audio_available: bool,
}

async fn read_dummy_byte<R: AsyncRead + Unpin>(r: &mut R) -> Result<()> {
    let b = wire::read_u8(r).await?;
    if b != 0 {
        return Err(ScrcpyError::handshake(format!(
            "expected dummy byte 0x00, got {b:#04x}"
        )));
    }
    Ok(())
}

/// Reads `{dummy byte, fixed_string(64) name, u32 width, u32 height, u32 codec_id}`
/// off the video socket - the carrier of device metadata when video is enabled.
async fn read_video_handshake<R: AsyncRead + Unpin>(r: &mut R) -> Result<(DeviceMeta, u32)> {
    read_dummy_byte(r).await?;
    let device_name = wire::read_fixed_string(r, DEVICE_NAME_FIELD_LEN).await?;
    let width = wire::read_u32(r).await?;
    let height = wire::read_u32(r).await?;
    let codec_id = wire::read_u32(r).await?;
    Ok((
        DeviceMeta {
            device_name,
            initial_video_width: width,
            initial_video_height: height,
            initial_audio_sample_rate: None,
        },
        codec_id,
    ))
}

/// Reads `{dummy byte, fixed_string(64) name, u32 codec_id}` off the audio
/// socket - used only when video is disabled, so audio carries the device
/// metadata instead.
async fn read_audio_primary_handshake<R: AsyncRead + Unpin>(r: &mut R) -> Result<(DeviceMeta, u32)> {
    read_dummy_byte(r).await?;
    let device_name = wire::read_fixed_string(r, DEVICE_NAME_FIELD_LEN).await?;
    let codec_id = wire::read_u32(r).await?;
    Ok((
        DeviceMeta {
            device_name,
            initial_video_width: 0,
            initial_video_height: 0,
            initial_audio_sample_rate: None,
        },
        codec_id,
    ))
}

/// Reads just the `u32 codec_id` off the audio socket - used when video is
/// enabled and already carried the dummy byte and device name.
async fn read_audio_secondary_handshake<R: AsyncRead + Unpin>(r: &mut R) -> Result<u32> {
    wire::read_u32(r).await
}

/// Runs the full ordered handshake across whichever sockets are enabled,
/// bounded by `timeout`. `video`/`audio` are `None` when the corresponding
/// stream is disabled in `SessionConfig`.
pub async fn perform_handshake<RV, RA>(
    mut video: Option<&mut RV>,
    mut audio: Option<&mut RA>,
    timeout: Duration,
) -> Result<HandshakeResult>
where
    RV: AsyncRead + Unpin,
    RA: AsyncRead + Unpin,
{
    tokio::time::timeout(timeout, async {
        match (video.as_deref_mut(), audio.as_deref_mut()) {
            (Some(v), Some(a)) => {
                let (meta, video_codec_id) = read_video_handshake(v).await?;
                let audio_codec_id = read_audio_secondary_handshake(a).await?;
                let audio_available = audio_codec_id != 0;
                Ok(HandshakeResult {
                    device_meta: meta,
                    video_codec_id: Some(video_codec_id),
                    audio_codec_id: Some(audio_codec_id),
                    audio_available,
                })
            }
            (Some(v), None) => {
                let (meta, video_codec_id) = read_video_handshake(v).await?;
                Ok(HandshakeResult {
                    device_meta: meta,
                    video_codec_id: Some(video_codec_id),
                    audio_codec_id: None,
                    audio_available: false,
                })
            }
            (None, Some(a)) => {
                let (meta, audio_codec_id) = read_audio_primary_handshake(a).await?;
                let audio_available = audio_codec_id != 0;
                Ok(HandshakeResult {
                    device_meta: meta,
                    video_codec_id: None,
                    audio_codec_id: Some(audio_codec_id),
                    audio_available,
                })
            }
            (None, None) => Err(ScrcpyError::handshake(
                "neither video nor audio is enabled; nothing to handshake",
            )),
        }
    })
    .await
    .map_err(|_| ScrcpyError::timeout("handshake did not complete before the configured deadline"))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn video_handshake_bytes(name: &str, width: u32, height: u32, codec_id: u32) -> Vec<u8> {
        let mut buf = vec![0u8]; // dummy byte
        buf.extend_from_slice(&wire::pad_fixed_string(name, DEVICE_NAME_FIELD_LEN));
        buf.extend_from_slice(&width.to_be_bytes());
        buf.extend_from_slice(&height.to_be_bytes());
        buf.extend_from_slice(&codec_id.to_be_bytes());
        buf
    }

    #[tokio::test]
    async fn video_only_handshake_reports_device_meta() {
        let mut video = Cursor::new(video_handshake_bytes("Pixel", 1080, 2400, 0x68323634));
        let result = perform_handshake::<Cursor<Vec<u8>>, Cursor<Vec<u8>>>(
            Some(&mut video),
            None,
            Duration::from_secs(1),
        )
        .await
        .unwrap();

        assert_eq!(result.device_meta.device_name, "Pixel");
        assert_eq!(result.device_meta.initial_video_width, 1080);
        assert_eq!(result.device_meta.initial_video_height, 2400);
        assert_eq!(result.video_codec_id, Some(0x68323634));
        assert!(!result.audio_available);
    }

    #[tokio::test]
    async fn nonzero_dummy_byte_is_handshake_error() {
        let mut bad = Cursor::new(vec![1u8; 73]);
        let err = perform_handshake::<Cursor<Vec<u8>>, Cursor<Vec<u8>>>(
            Some(&mut bad),
            None,
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind, crate::error::ScrcpyErrorKind::Handshake);
    }

    #[tokio::test]
    async fn audio_codec_id_zero_marks_audio_unavailable_without_failing() {
        let mut video = Cursor::new(video_handshake_bytes("Pixel", 1080, 2400, 0x68323634));
        let mut audio = Cursor::new(0u32.to_be_bytes().to_vec());

        let result = perform_handshake(Some(&mut video), Some(&mut audio), Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(result.audio_codec_id, Some(0));
        assert!(!result.audio_available);
    }

    #[tokio::test]
    async fn audio_only_handshake_carries_device_meta() {
        let mut buf = vec![0u8];
        buf.extend_from_slice(&wire::pad_fixed_string("Pixel", DEVICE_NAME_FIELD_LEN));
        buf.extend_from_slice(&0x6f707573u32.to_be_bytes());
        let mut audio = Cursor::new(buf);

        let result = perform_handshake::<Cursor<Vec<u8>>, Cursor<Vec<u8>>>(
            None,
            Some(&mut audio),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

        assert_eq!(result.device_meta.device_name, "Pixel");
        assert_eq!(result.audio_codec_id, Some(0x6f707573));
        assert!(result.audio_available);
    }

    #[tokio::test]
    async fn handshake_times_out_on_stalled_socket() {
        struct Never;
        impl AsyncRead for Never {
            fn poll_read(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
                _buf: &mut tokio::io::ReadBuf<'_>,
            ) -> std::task::Poll<std::io::Result<()>> {
                std::task::Poll::Pending
            }
        }

        let mut video = Never;
        let err = perform_handshake::<Never, Never>(Some(&mut video), None, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert_eq!(err.kind, crate::error::ScrcpyErrorKind::Timeout);
    }
}
