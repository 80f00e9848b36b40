// Sink - the capability trait decoded frames and device events are
// delivered through. Implementations run on the worker's own task; any
// long-running work must be offloaded by the sink itself (e.g. handing off
// to its own channel) rather than blocking the demuxer or control reader.

use crate::model::{CodecFrame, DeviceMessage, MediaStreamId, TerminationReason};

pub trait Sink: Send + Sync {
    /// A decoded media frame is available.
    fn on_frame(&self, frame: CodecFrame) {
        let _ = frame;
    }

    /// An unsolicited device message arrived on the control channel
    /// (clipboard changed on-device, UHID output, app list, power state).
    fn on_device_event(&self, event: DeviceMessage) {
        let _ = event;
    }

    /// A media stream reached end-of-stream (clean or due to an error that
    /// is about to tear down the session). No further frames for
    /// `stream_id` follow this call.
    fn on_stream_end(&self, stream_id: MediaStreamId) {
        let _ = stream_id;
    }

    /// The session reached `Closed`. Called exactly once.
    fn on_terminated(&self, reason: TerminationReason) {
        let _ = reason;
    }
}

/// A sink that discards everything, useful as a default or in tests that
/// only care about the session's own externally observable state.
pub struct NullSink;

impl Sink for NullSink {}
