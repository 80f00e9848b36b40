// Protocol core - Error Types
// Centralized error handling for the scrcpy protocol core

use std::fmt;
use thiserror::Error;

/// Stable taxonomy of core failure modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrcpyErrorKind {
    /// Device unreachable, push failed, spawn failed.
    Transport,
    /// Unexpected dummy byte, short metadata, unknown codec id, version mismatch.
    Handshake,
    /// Payload length over cap, negative derived values, unknown message type.
    MalformedFrame,
    /// EOF encountered inside a frame.
    TruncatedFrame,
    /// The control channel's inbound reader observed a parse error.
    ChannelBroken,
    /// An operation was attempted while the session was tearing down.
    SessionClosing,
    /// An operation was attempted after the session reached `Closed`.
    SessionClosed,
    /// A bounded operation (handshake, shutdown grace) exceeded its deadline.
    Timeout,
}

impl fmt::Display for ScrcpyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScrcpyErrorKind::Transport => "TRANSPORT",
            ScrcpyErrorKind::Handshake => "HANDSHAKE",
            ScrcpyErrorKind::MalformedFrame => "MALFORMED_FRAME",
            ScrcpyErrorKind::TruncatedFrame => "TRUNCATED_FRAME",
            ScrcpyErrorKind::ChannelBroken => "CHANNEL_BROKEN",
            ScrcpyErrorKind::SessionClosing => "SESSION_CLOSING",
            ScrcpyErrorKind::SessionClosed => "SESSION_CLOSED",
            ScrcpyErrorKind::Timeout => "TIMEOUT",
        };
        f.write_str(s)
    }
}

/// The core's single error type. `kind` is the stable tag consumers can match
/// on; `message` is the human-readable explanation; `source` chains to the
/// underlying cause when there is one (an I/O error, a joined task panic, ...).
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct ScrcpyError {
    pub kind: ScrcpyErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ScrcpyError {
    pub fn new(kind: ScrcpyErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: ScrcpyErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ScrcpyErrorKind::Transport, message)
    }

    pub fn handshake(message: impl Into<String>) -> Self {
        Self::new(ScrcpyErrorKind::Handshake, message)
    }

    pub fn malformed_frame(message: impl Into<String>) -> Self {
        Self::new(ScrcpyErrorKind::MalformedFrame, message)
    }

    pub fn truncated_frame(message: impl Into<String>) -> Self {
        Self::new(ScrcpyErrorKind::TruncatedFrame, message)
    }

    pub fn channel_broken(message: impl Into<String>) -> Self {
        Self::new(ScrcpyErrorKind::ChannelBroken, message)
    }

    pub fn session_closing() -> Self {
        Self::new(ScrcpyErrorKind::SessionClosing, "session is shutting down")
    }

    pub fn session_closed() -> Self {
        Self::new(ScrcpyErrorKind::SessionClosed, "session is closed")
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ScrcpyErrorKind::Timeout, message)
    }

    pub fn is_kind(&self, kind: &ScrcpyErrorKind) -> bool {
        &self.kind == kind
    }
}

impl From<std::io::Error> for ScrcpyError {
    fn from(e: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::UnexpectedEof => {
                Self::with_source(ScrcpyErrorKind::TruncatedFrame, "unexpected EOF", e)
            }
            ErrorKind::TimedOut => Self::with_source(ScrcpyErrorKind::Timeout, "I/O timed out", e),
            _ => Self::with_source(ScrcpyErrorKind::Transport, e.to_string(), e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrcpyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_tag() {
        let e = ScrcpyError::handshake("bad dummy byte");
        assert_eq!(e.to_string(), "[HANDSHAKE] bad dummy byte");
    }

    #[test]
    fn io_eof_maps_to_truncated_frame() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let e: ScrcpyError = io_err.into();
        assert_eq!(e.kind, ScrcpyErrorKind::TruncatedFrame);
    }

    #[test]
    fn is_kind_matches_tag_only() {
        let e = ScrcpyError::session_closing();
        assert!(e.is_kind(&ScrcpyErrorKind::SessionClosing));
        assert!(!e.is_kind(&ScrcpyErrorKind::SessionClosed));
    }
}
