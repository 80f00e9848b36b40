// scrcpy protocol core
//
// Implements the host side of the scrcpy wire protocol: multi-socket
// handshake, video/audio demuxing with PTS reconstruction, a bidirectional
// control channel, and session lifecycle/shutdown. Device transport is a
// trait (`transport::Transport`) so the core itself never depends on adb
// directly; `transport::adb` is the reference implementation and
// `transport::mock` backs the test suite.
//
// Decoding media payloads, rendering, audio playback, clipboard/OS
// integration and any CLI or RPC surface are out of scope here - this crate
// only gets compressed frames and device events to a `Sink`.

pub mod command_utils;
pub mod config;
pub mod control;
pub mod demux;
pub mod error;
pub mod handshake;
pub mod media_channel;
pub mod model;
pub mod session;
pub mod sink;
pub mod transport;
pub mod wire;

pub use config::{AudioCodec, LogLevel, Scid, SessionConfig, SessionConfigBuilder, VideoCodec};
pub use error::{Result, ScrcpyError, ScrcpyErrorKind};
pub use model::{
    AppListEntry, CodecFrame, ControlMessage, CopyKey, DeviceMeta, DeviceMessage, FrameFlags,
    MediaStreamId, SessionState, TerminationReason,
};
pub use session::Session;
pub use sink::{NullSink, Sink};
pub use transport::{ServerHandle, Transport};
