// Core data model: stream identity, decoded frames, handshake metadata, and
// the outbound/inbound control message unions.

use std::fmt;

/// Which media socket a frame or event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaStreamId {
    Video,
    Audio,
}

impl fmt::Display for MediaStreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaStreamId::Video => f.write_str("video"),
            MediaStreamId::Audio => f.write_str("audio"),
        }
    }
}

/// Device metadata produced by the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMeta {
    pub device_name: String,
    pub initial_video_width: u32,
    pub initial_video_height: u32,
    pub initial_audio_sample_rate: Option<u32>,
}

/// Flags carried in a media packet's high bits (see `pts_and_flags`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameFlags {
    pub config: bool,
    pub keyframe: bool,
}

/// One decoded, still-compressed media frame.
#[derive(Debug, Clone)]
pub struct CodecFrame {
    pub stream_id: MediaStreamId,
    pub codec_id: u32,
    pub pts_us: Option<u64>,
    pub flags: FrameFlags,
    pub payload: Vec<u8>,
}

/// `COPY_KEY` argument to `GET_CLIPBOARD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyKey {
    None,
    Copy,
    Cut,
}

impl CopyKey {
    pub fn as_u8(self) -> u8 {
        match self {
            CopyKey::None => 0,
            CopyKey::Copy => 1,
            CopyKey::Cut => 2,
        }
    }
}

/// Outbound control messages, one variant per wire type id (§4.E).
#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    InjectKeycode {
        action: u8,
        keycode: i32,
        repeat: u32,
        metastate: u32,
    },
    InjectText(String),
    InjectTouchEvent {
        action: u8,
        pointer_id: i64,
        x: i32,
        y: i32,
        w: u16,
        h: u16,
        pressure: u16,
        action_button: u32,
        buttons: u32,
    },
    InjectScrollEvent {
        x: i32,
        y: i32,
        w: u16,
        h: u16,
        hscroll: i16,
        vscroll: i16,
        buttons: u32,
    },
    BackOrScreenOn {
        action: u8,
    },
    ExpandNotificationPanel,
    ExpandSettingsPanel,
    CollapsePanels,
    GetClipboard {
        copy_key: CopyKey,
    },
    SetClipboard {
        sequence: u64,
        paste: bool,
        text: String,
    },
    SetDisplayPower {
        on: bool,
    },
    RotateDevice,
    UhidCreate {
        id: u16,
        vendor_id: u16,
        product_id: u16,
        name: Vec<u8>,
        report_descriptor: Vec<u8>,
    },
    UhidInput {
        id: u16,
        data: Vec<u8>,
    },
    UhidDestroy {
        id: u16,
    },
    OpenHardKeyboardSettings,
    StartApp {
        name_or_package: String,
    },
    ResetVideo,
}

impl ControlMessage {
    /// The single-byte wire type id (table in §4.E).
    pub fn type_id(&self) -> u8 {
        match self {
            ControlMessage::InjectKeycode { .. } => 0,
            ControlMessage::InjectText(_) => 1,
            ControlMessage::InjectTouchEvent { .. } => 2,
            ControlMessage::InjectScrollEvent { .. } => 3,
            ControlMessage::BackOrScreenOn { .. } => 4,
            ControlMessage::ExpandNotificationPanel => 5,
            ControlMessage::ExpandSettingsPanel => 6,
            ControlMessage::CollapsePanels => 7,
            ControlMessage::GetClipboard { .. } => 8,
            ControlMessage::SetClipboard { .. } => 9,
            ControlMessage::SetDisplayPower { .. } => 10,
            ControlMessage::RotateDevice => 11,
            ControlMessage::UhidCreate { .. } => 12,
            ControlMessage::UhidInput { .. } => 13,
            ControlMessage::UhidDestroy { .. } => 14,
            ControlMessage::OpenHardKeyboardSettings => 15,
            ControlMessage::StartApp { .. } => 16,
            ControlMessage::ResetVideo => 17,
        }
    }
}

/// One inbound entry of an `APP_LIST` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppListEntry {
    pub name: String,
    pub package: String,
    pub system: bool,
}

/// Inbound device messages, one variant per wire type id (§4.E).
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceMessage {
    ClipboardText(String),
    AckClipboard(u64),
    UhidOutput { id: u16, data: Vec<u8> },
    AppList(Vec<AppListEntry>),
    DisplayPowerState(bool),
}

/// Session lifecycle. Transitions are monotonic - there is no path back to
/// an earlier variant. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    Configured,
    Deployed,
    Handshaking,
    Running,
    Stopping,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Configured => "configured",
            SessionState::Deployed => "deployed",
            SessionState::Handshaking => "handshaking",
            SessionState::Running => "running",
            SessionState::Stopping => "stopping",
            SessionState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Why a session reached `Closed`, set exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminationReason {
    /// The caller called `stop()`.
    Requested,
    /// A worker (video/audio demuxer, control reader/writer) reached clean
    /// end-of-stream with no error - e.g. the device closed a media socket
    /// normally. Not an error condition; distinct from `Error(ChannelBroken)`,
    /// which is reserved for an actual control-channel parse failure.
    StreamEnded,
    /// The device-side server process exited on its own, with its exit code
    /// if the transport could observe one.
    ServerExited(Option<i32>),
    /// A component failed; carries the stable error kind tag.
    Error(crate::error::ScrcpyErrorKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_state_transitions_are_monotonically_ordered() {
        assert!(SessionState::Configured < SessionState::Running);
        assert!(SessionState::Running < SessionState::Closed);
    }

    #[test]
    fn type_ids_match_the_wire_table() {
        assert_eq!(
            ControlMessage::InjectKeycode {
                action: 0,
                keycode: 0,
                repeat: 0,
                metastate: 0
            }
            .type_id(),
            0
        );
        assert_eq!(ControlMessage::ResetVideo.type_id(), 17);
        assert_eq!(
            ControlMessage::UhidDestroy { id: 1 }.type_id(),
            14
        );
    }
}
