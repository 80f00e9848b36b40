// Session configuration - immutable once a session is built from it.
// Mirrors the fluent-builder shape used elsewhere in this codebase
// (AdbCommandBuilder, RequirementCheck) but targets the scrcpy server's
// argv/handshake surface instead of adb subcommands.

use crate::error::{ScrcpyError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Device-side log verbosity, forwarded to the server and also usable by the
/// host application to set its own `log::LevelFilter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Verbose => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    H264,
    H265,
    Av1,
}

impl VideoCodec {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "h264",
            VideoCodec::H265 => "h265",
            VideoCodec::Av1 => "av1",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    Opus,
    Aac,
    Flac,
    Raw,
}

impl AudioCodec {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            AudioCodec::Opus => "opus",
            AudioCodec::Aac => "aac",
            AudioCodec::Flac => "flac",
            AudioCodec::Raw => "raw",
        }
    }
}

/// A 31-bit non-negative session identifier, rendered on the wire as exactly
/// eight lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scid(u32);

impl Scid {
    pub const MAX: u32 = (1u32 << 31) - 1;

    pub fn new(value: u32) -> Result<Self> {
        if value > Self::MAX {
            return Err(ScrcpyError::handshake(format!(
                "scid {value} exceeds 31-bit range"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Render as exactly eight lowercase hex digits, e.g. `"0000002a"`.
    pub fn to_hex8(&self) -> String {
        format!("{:08x}", self.0)
    }

    /// Parse a string matching `^[0-9a-f]{8}$`.
    pub fn from_hex8(s: &str) -> Result<Self> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()) {
            return Err(ScrcpyError::handshake(format!(
                "scid {s:?} is not 8 lowercase hex digits"
            )));
        }
        let value = u32::from_str_radix(s, 16)
            .map_err(|e| ScrcpyError::handshake(format!("invalid scid hex: {e}")))?;
        Self::new(value)
    }
}

impl Default for Scid {
    fn default() -> Self {
        Self(0)
    }
}

/// Immutable session configuration, built via [`SessionConfigBuilder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub scid: Scid,
    pub log_level: LogLevel,
    pub video_enabled: bool,
    pub audio_enabled: bool,
    pub control_enabled: bool,
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
    pub max_size: u32,
    pub video_bit_rate: u32,
    pub max_fps: u32,
    pub tunnel_forward: bool,
    pub server_version: String,

    // Ambient additions: resource knobs that the wire protocol doesn't carry
    // but the concurrency/back-pressure model in the design needs named.
    pub media_channel_capacity: usize,
    pub control_queue_capacity: usize,
    pub max_payload_len: u32,
    #[serde(with = "duration_millis")]
    pub worker_grace_period: Duration,
    #[serde(with = "duration_millis")]
    pub handshake_timeout: Duration,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scid: Scid::default(),
            log_level: LogLevel::Info,
            video_enabled: true,
            audio_enabled: true,
            control_enabled: true,
            video_codec: VideoCodec::H264,
            audio_codec: AudioCodec::Opus,
            max_size: 0,
            video_bit_rate: 8_000_000,
            max_fps: 0,
            tunnel_forward: true,
            server_version: String::new(),
            media_channel_capacity: 64,
            control_queue_capacity: 256,
            max_payload_len: 16 * 1024 * 1024,
            worker_grace_period: Duration::from_secs(2),
            handshake_timeout: Duration::from_secs(10),
        }
    }
}

impl SessionConfig {
    pub fn builder(server_version: impl Into<String>) -> SessionConfigBuilder {
        SessionConfigBuilder {
            config: Self {
                server_version: server_version.into(),
                ..Self::default()
            },
        }
    }

    /// The server argv tail as specified in §6, in order.
    pub fn server_argv(&self) -> Vec<String> {
        let mut args = vec![
            self.server_version.clone(),
            format!("scid={}", self.scid.to_hex8()),
            format!("log_level={}", self.log_level.as_wire_str()),
            format!("video={}", self.video_enabled),
            format!("audio={}", self.audio_enabled),
            format!("control={}", self.control_enabled),
        ];
        if self.video_enabled {
            args.push(format!("video_codec={}", self.video_codec.as_wire_str()));
        }
        if self.audio_enabled {
            args.push(format!("audio_codec={}", self.audio_codec.as_wire_str()));
        }
        if self.max_size > 0 {
            args.push(format!("max_size={}", self.max_size));
        }
        if self.video_bit_rate > 0 {
            args.push(format!("video_bit_rate={}", self.video_bit_rate));
        }
        if self.max_fps > 0 {
            args.push(format!("max_fps={}", self.max_fps));
        }
        args.push(format!("tunnel_forward={}", self.tunnel_forward));
        args
    }
}

/// Fluent builder, in the style of this codebase's `AdbCommandBuilder`.
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    pub fn scid(mut self, scid: u32) -> Result<Self> {
        self.config.scid = Scid::new(scid)?;
        Ok(self)
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.log_level = level;
        self
    }

    pub fn video_enabled(mut self, enabled: bool) -> Self {
        self.config.video_enabled = enabled;
        self
    }

    pub fn audio_enabled(mut self, enabled: bool) -> Self {
        self.config.audio_enabled = enabled;
        self
    }

    pub fn control_enabled(mut self, enabled: bool) -> Self {
        self.config.control_enabled = enabled;
        self
    }

    pub fn video_codec(mut self, codec: VideoCodec) -> Self {
        self.config.video_codec = codec;
        self
    }

    pub fn audio_codec(mut self, codec: AudioCodec) -> Self {
        self.config.audio_codec = codec;
        self
    }

    pub fn max_size(mut self, max_size: u32) -> Self {
        self.config.max_size = max_size;
        self
    }

    pub fn video_bit_rate(mut self, bit_rate: u32) -> Self {
        self.config.video_bit_rate = bit_rate;
        self
    }

    pub fn max_fps(mut self, max_fps: u32) -> Self {
        self.config.max_fps = max_fps;
        self
    }

    pub fn tunnel_forward(mut self, forward: bool) -> Self {
        self.config.tunnel_forward = forward;
        self
    }

    pub fn media_channel_capacity(mut self, capacity: usize) -> Self {
        self.config.media_channel_capacity = capacity;
        self
    }

    pub fn control_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.control_queue_capacity = capacity;
        self
    }

    pub fn max_payload_len(mut self, len: u32) -> Self {
        self.config.max_payload_len = len;
        self
    }

    pub fn worker_grace_period(mut self, grace: Duration) -> Self {
        self.config.worker_grace_period = grace;
        self
    }

    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.config.handshake_timeout = timeout;
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scid_round_trips_through_hex8() {
        for raw in [0u32, 1, 42, 0x7fffffff] {
            let scid = Scid::new(raw).unwrap();
            let hex = scid.to_hex8();
            assert_eq!(hex.len(), 8);
            assert!(hex.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
            assert_eq!(Scid::from_hex8(&hex).unwrap().value(), raw);
        }
    }

    #[test]
    fn scid_rejects_out_of_range() {
        assert!(Scid::new(1u32 << 31).is_err());
    }

    #[test]
    fn scid_from_hex8_rejects_bad_shape() {
        assert!(Scid::from_hex8("1234567").is_err()); // too short
        assert!(Scid::from_hex8("123456789").is_err()); // too long
        assert!(Scid::from_hex8("ABCDEF01").is_err()); // uppercase
        assert!(Scid::from_hex8("0000xx01").is_err()); // non-hex
    }

    #[test]
    fn builder_produces_ordered_argv() {
        let config = SessionConfig::builder("3.3.4")
            .scid(0x2a)
            .unwrap()
            .video_enabled(true)
            .audio_enabled(false)
            .control_enabled(true)
            .max_size(1024)
            .build();

        let argv = config.server_argv();
        assert_eq!(argv[0], "3.3.4");
        assert_eq!(argv[1], "scid=0000002a");
        assert!(argv.contains(&"video=true".to_string()));
        assert!(argv.contains(&"audio=false".to_string()));
        assert!(!argv.iter().any(|a| a.starts_with("audio_codec=")));
        assert!(argv.contains(&"max_size=1024".to_string()));
    }

    #[test]
    fn default_config_has_unbounded_max_size() {
        let config = SessionConfig::default();
        assert_eq!(config.max_size, 0);
        assert!(!config.server_argv().iter().any(|a| a.starts_with("max_size=")));
    }
}
