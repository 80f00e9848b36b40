// Session coordinator - owns the transport, drives the start sequence,
// spawns per-stream workers, fans out frames/events to the sink, and runs
// the multi-phase shutdown described in the control-flow design.

use crate::config::SessionConfig;
use crate::control::{self, ControlHandle};
use crate::demux::Demuxer;
use crate::error::{Result, ScrcpyError, ScrcpyErrorKind};
use crate::handshake;
use crate::media_channel::media_channel;
use crate::model::{CodecFrame, CopyKey, DeviceMeta, MediaStreamId, SessionState, TerminationReason};
use crate::sink::Sink;
use crate::transport::{ServerHandle, Transport};
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinHandle};

const SCRCPY_SERVER_REMOTE_PATH: &str = "/data/local/tmp/scrcpy-server.jar";

fn state_to_u8(s: SessionState) -> u8 {
    match s {
        SessionState::Configured => 0,
        SessionState::Deployed => 1,
        SessionState::Handshaking => 2,
        SessionState::Running => 3,
        SessionState::Stopping => 4,
        SessionState::Closed => 5,
    }
}

fn state_from_u8(v: u8) -> SessionState {
    match v {
        0 => SessionState::Configured,
        1 => SessionState::Deployed,
        2 => SessionState::Handshaking,
        3 => SessionState::Running,
        4 => SessionState::Stopping,
        _ => SessionState::Closed,
    }
}

struct WorkerOutcome {
    name: &'static str,
    result: Result<()>,
}

/// Owns one scrcpy session end to end. Generic over the transport so tests
/// drive it with `transport::mock::MockTransport` instead of a real device.
pub struct Session<T: Transport> {
    config: SessionConfig,
    transport: T,
    sink: Arc<dyn Sink>,
    state: AtomicU8,
    termination: OnceLock<TerminationReason>,
    stop_tx: watch::Sender<bool>,
    stop_rx: watch::Receiver<bool>,
    done_tx: mpsc::Sender<WorkerOutcome>,
    done_rx: mpsc::Receiver<WorkerOutcome>,
    worker_aborts: Vec<AbortHandle>,
    worker_joins: Vec<JoinHandle<()>>,
    control: Option<ControlHandle>,
    server_handle: Option<T::Handle>,
    video_sender_diag: Option<crate::media_channel::MediaSender>,
}

impl<T: Transport + 'static> Session<T> {
    pub fn new(config: SessionConfig, transport: T, sink: Arc<dyn Sink>) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (done_tx, done_rx) = mpsc::channel(8);
        Self {
            config,
            transport,
            sink,
            state: AtomicU8::new(state_to_u8(SessionState::Configured)),
            termination: OnceLock::new(),
            stop_tx,
            stop_rx,
            done_tx,
            done_rx,
            worker_aborts: Vec::new(),
            worker_joins: Vec::new(),
            control: None,
            server_handle: None,
            video_sender_diag: None,
        }
    }

    pub fn state(&self) -> SessionState {
        state_from_u8(self.state.load(Ordering::Acquire))
    }

    fn advance(&self, state: SessionState) {
        self.state.store(state_to_u8(state), Ordering::Release);
    }

    pub fn termination_reason(&self) -> Option<&TerminationReason> {
        self.termination.get()
    }

    fn track_worker(&mut self, name: &'static str, fut: impl std::future::Future<Output = Result<()>> + Send + 'static) {
        let handle = tokio::spawn(fut);
        self.worker_aborts.push(handle.abort_handle());
        let done_tx = self.done_tx.clone();
        let supervisor = tokio::spawn(async move {
            let result = match handle.await {
                Ok(r) => r,
                Err(_) => Err(ScrcpyError::channel_broken(format!("{name} worker panicked"))),
            };
            let _ = done_tx.send(WorkerOutcome { name, result }).await;
        });
        self.worker_joins.push(supervisor);
    }

    /// Runs the start sequence: deploy, spawn, open sockets, handshake,
    /// spawn workers. Returns the negotiated device metadata once `Running`.
    pub async fn start(&mut self, local_server_path: &Path, port: u16) -> Result<DeviceMeta> {
        if self.state() != SessionState::Configured {
            return Err(ScrcpyError::handshake("start() called outside Configured state"));
        }

        self.transport
            .push(local_server_path, SCRCPY_SERVER_REMOTE_PATH)
            .await?;
        self.advance(SessionState::Deployed);

        let argv = self.config.server_argv();
        let server_handle = self
            .transport
            .spawn_server(SCRCPY_SERVER_REMOTE_PATH, &argv)
            .await?;
        self.server_handle = Some(server_handle);

        let socket_count = [
            self.config.video_enabled,
            self.config.audio_enabled,
            self.config.control_enabled,
        ]
        .into_iter()
        .filter(|e| *e)
        .count();

        let mut streams = self
            .transport
            .open_tunnel(port, socket_count, self.config.tunnel_forward)
            .await?;
        streams.reverse(); // pop() from the front in video, audio, control order

        self.advance(SessionState::Handshaking);

        let mut video_stream = if self.config.video_enabled { streams.pop() } else { None };
        let mut audio_stream = if self.config.audio_enabled { streams.pop() } else { None };
        let control_stream = if self.config.control_enabled { streams.pop() } else { None };

        let handshake_result = handshake::perform_handshake(
            video_stream.as_mut(),
            audio_stream.as_mut(),
            self.config.handshake_timeout,
        )
        .await?;

        let device_meta = handshake_result.device_meta.clone();
        let audio_available = handshake_result.audio_available;

        if let (Some(stream), Some(codec_id)) = (video_stream, handshake_result.video_codec_id) {
            let (tx, mut rx) = media_channel(self.config.media_channel_capacity);
            self.video_sender_diag = Some(tx.clone());
            let demuxer = Demuxer::new(stream, MediaStreamId::Video, codec_id, self.config.max_payload_len);
            let stop_rx = self.stop_rx.clone();
            self.track_worker("video-demux", async move { demuxer.run(tx, stop_rx).await });

            let sink = self.sink.clone();
            let forward = tokio::spawn(async move {
                while let Some(frame) = rx.recv().await {
                    sink.on_frame(frame);
                }
                sink.on_stream_end(MediaStreamId::Video);
            });
            self.worker_joins.push(forward);
        }

        if audio_available {
            if let (Some(stream), Some(codec_id)) = (audio_stream, handshake_result.audio_codec_id) {
                let (tx, mut rx) = media_channel(self.config.media_channel_capacity);
                let demuxer = Demuxer::new(stream, MediaStreamId::Audio, codec_id, self.config.max_payload_len);
                let stop_rx = self.stop_rx.clone();
                self.track_worker("audio-demux", async move { demuxer.run(tx, stop_rx).await });

                let sink = self.sink.clone();
                let forward = tokio::spawn(async move {
                    while let Some(frame) = rx.recv().await {
                        sink.on_frame(frame);
                    }
                    sink.on_stream_end(MediaStreamId::Audio);
                });
                self.worker_joins.push(forward);
            }
        }

        if let Some(stream) = control_stream {
            let (read_half, write_half) = tokio::io::split(stream);
            let (handle, reader_task, writer_task) = control::spawn(
                read_half,
                write_half,
                self.config.control_queue_capacity,
                self.config.max_payload_len,
                self.sink.clone(),
                self.stop_rx.clone(),
            );
            self.control = Some(handle);
            self.worker_aborts.push(reader_task.abort_handle());
            self.worker_aborts.push(writer_task.abort_handle());

            let done_tx = self.done_tx.clone();
            let supervisor = tokio::spawn(async move {
                let result = match reader_task.await {
                    Ok(r) => r,
                    Err(_) => Err(ScrcpyError::channel_broken("control reader panicked")),
                };
                let _ = done_tx.send(WorkerOutcome { name: "control", result }).await;
            });
            self.worker_joins.push(supervisor);

            let writer_done_tx = self.done_tx.clone();
            let writer_supervisor = tokio::spawn(async move {
                let result = match writer_task.await {
                    Ok(r) => r,
                    Err(_) => Err(ScrcpyError::channel_broken("control writer panicked")),
                };
                let _ = writer_done_tx
                    .send(WorkerOutcome {
                        name: "control-writer",
                        result,
                    })
                    .await;
            });
            self.worker_joins.push(writer_supervisor);
        }

        self.advance(SessionState::Running);
        Ok(device_meta)
    }

    /// Waits until the session is asked to stop (by `stop()`), a worker
    /// reports a fatal condition or clean end-of-stream, or the device-side
    /// server process exits on its own - the three shutdown triggers - then
    /// runs the shutdown sequence.
    pub async fn run_until_closed(&mut self) {
        if self.state() != SessionState::Running {
            return;
        }
        let mut server_handle = self.server_handle.take();
        let reason = tokio::select! {
            _ = self.stop_rx.changed() => TerminationReason::Requested,
            Some(outcome) = self.done_rx.recv() => {
                match outcome.result {
                    Ok(()) => TerminationReason::StreamEnded,
                    Err(e) => TerminationReason::Error(e.kind),
                }
            }
            result = async {
                match server_handle.as_mut() {
                    Some(handle) => handle.wait().await,
                    None => std::future::pending::<Result<Option<i32>>>().await,
                }
            } => {
                match result {
                    Ok(code) => TerminationReason::ServerExited(code),
                    Err(e) => TerminationReason::Error(e.kind),
                }
            }
        };
        self.server_handle = server_handle;
        self.shutdown(reason).await;
    }

    /// Caller-initiated shutdown (testable property #5).
    pub async fn stop(&mut self) {
        if self.state() >= SessionState::Stopping {
            return;
        }
        let _ = self.stop_tx.send(true);
        self.shutdown(TerminationReason::Requested).await;
    }

    async fn shutdown(&mut self, reason: TerminationReason) {
        if self.state() >= SessionState::Stopping {
            return;
        }
        self.advance(SessionState::Stopping);
        log::info!("session shutting down: {reason:?}");

        // Step 1 is `advance(Stopping)` above: further `send_control` calls
        // now fail with `SessionClosing`.
        // Step 2: dropping our clone of the control handle closes the
        // outbound queue, which the writer task turns into a half-close.
        self.control = None;
        let _ = self.stop_tx.send(true);

        // Step 3: bound worker teardown by `worker_grace_period`, then
        // force-abort stragglers.
        let joins = std::mem::take(&mut self.worker_joins);
        let grace = self.config.worker_grace_period;
        let _ = tokio::time::timeout(grace, futures_join_all(joins)).await;
        for abort in &self.worker_aborts {
            abort.abort();
        }

        // Step 5: terminate the server process if still alive.
        if let Some(mut handle) = self.server_handle.take() {
            let _ = handle.terminate().await;
        }

        // Steps 4 and 6: pending waiters already failed via the control
        // reader's `Broken` transition or the dropped handle; set the
        // terminal state and write-once termination reason.
        let _ = self.termination.set(reason);
        self.advance(SessionState::Closed);
        if let Some(reason) = self.termination.get() {
            self.sink.on_terminated(reason.clone());
        }
    }

    pub async fn send_control(&self, msg: crate::model::ControlMessage) -> Result<()> {
        self.require_running()?;
        self.control
            .as_ref()
            .ok_or_else(|| ScrcpyError::handshake("control channel is not enabled for this session"))?
            .send(msg)
            .await
    }

    pub async fn set_clipboard(&self, sequence: u64, paste: bool, text: impl Into<String>) -> Result<()> {
        self.require_running()?;
        self.control
            .as_ref()
            .ok_or_else(|| ScrcpyError::handshake("control channel is not enabled for this session"))?
            .set_clipboard(sequence, paste, text)
            .await
    }

    pub async fn get_clipboard(&self, copy_key: CopyKey) -> Result<String> {
        self.require_running()?;
        self.control
            .as_ref()
            .ok_or_else(|| ScrcpyError::handshake("control channel is not enabled for this session"))?
            .get_clipboard(copy_key)
            .await
    }

    fn require_running(&self) -> Result<()> {
        match self.state() {
            SessionState::Running => Ok(()),
            SessionState::Stopping => Err(ScrcpyError::session_closing()),
            SessionState::Closed => Err(ScrcpyError::session_closed()),
            _ => Err(ScrcpyError::handshake("session is not yet running")),
        }
    }

    /// Number of video frames ever dropped by the back-pressure policy,
    /// exposed for diagnostics per the concurrency design.
    pub fn video_frames_dropped(&self) -> u64 {
        self.video_sender_diag
            .as_ref()
            .map(|s| s.dropped_count())
            .unwrap_or(0)
    }
}

/// Small local stand-in for `futures::future::join_all` so this crate
/// doesn't need to pull in the `futures` crate for one call site.
async fn futures_join_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        let _ = handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::model::{ControlMessage, DeviceMessage, FrameFlags};
    use crate::sink::Sink;
    use crate::transport::mock::MockTransport;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Mutex as StdMutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct RecordingSink {
        frames: StdMutex<Vec<CodecFrame>>,
        terminated: AtomicUsize,
        events: StdMutex<Vec<DeviceMessage>>,
    }

    impl Sink for RecordingSink {
        fn on_frame(&self, frame: CodecFrame) {
            self.frames.lock().unwrap().push(frame);
        }
        fn on_device_event(&self, event: DeviceMessage) {
            self.events.lock().unwrap().push(event);
        }
        fn on_terminated(&self, _reason: TerminationReason) {
            self.terminated.fetch_add(1, AtomicOrdering::SeqCst);
        }
    }

    fn video_handshake_bytes(name: &str, width: u32, height: u32, codec_id: u32) -> Vec<u8> {
        let mut buf = vec![0u8];
        buf.extend_from_slice(&crate::wire::pad_fixed_string(name, 64));
        buf.extend_from_slice(&width.to_be_bytes());
        buf.extend_from_slice(&height.to_be_bytes());
        buf.extend_from_slice(&codec_id.to_be_bytes());
        buf
    }

    fn packet(pts_and_flags: u64, payload: &[u8]) -> Vec<u8> {
        let mut buf = pts_and_flags.to_be_bytes().to_vec();
        buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        buf.extend_from_slice(payload);
        buf
    }

    /// Scenario S1 + S2: a mock server offering only a video socket sends a
    /// handshake followed by one config+keyframe packet.
    #[tokio::test]
    async fn s1_s2_handshake_and_video_frame_delivery() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut hello = video_handshake_bytes("Pixel", 1080, 2400, 0x68323634);
            hello.extend_from_slice(&packet(
                (1u64 << 63) | (1u64 << 62) | 12345,
                &[0u8; 40],
            ));
            stream.write_all(&hello).await.unwrap();
            // Keep the connection open until the client is done with it.
            let mut discard = [0u8; 1];
            let _ = stream.read(&mut discard).await;
        });

        let config = SessionConfig::builder("3.3.4")
            .scid(1)
            .unwrap()
            .audio_enabled(false)
            .control_enabled(false)
            .build();

        let transport = MockTransport::new(addr.to_string());
        let sink = Arc::new(RecordingSink::default());
        let mut session = Session::new(config, transport, sink.clone());

        let meta = session
            .start(Path::new("scrcpy-server.jar"), addr.port())
            .await
            .unwrap();

        assert_eq!(meta.device_name, "Pixel");
        assert_eq!(session.state(), SessionState::Running);

        // Give the forwarding task a moment to deliver the frame.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        {
            let frames = sink.frames.lock().unwrap();
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0].pts_us, Some(12345));
            assert!(frames[0].flags.config && frames[0].flags.keyframe);
        }

        session.stop().await;
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(sink.terminated.load(AtomicOrdering::SeqCst), 1);
        server.abort();
    }

    /// Scenario S3: an oversize payload length is rejected and tears the
    /// session down with `MalformedFrame` as the termination reason.
    #[tokio::test]
    async fn s3_oversize_payload_terminates_session() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut hello = video_handshake_bytes("Pixel", 1080, 2400, 0x68323634);
            hello.extend_from_slice(&0u64.to_be_bytes());
            hello.extend_from_slice(&u32::MAX.to_be_bytes());
            stream.write_all(&hello).await.unwrap();
            let mut discard = [0u8; 1];
            let _ = stream.read(&mut discard).await;
        });

        let config = SessionConfig::builder("3.3.4")
            .scid(2)
            .unwrap()
            .audio_enabled(false)
            .control_enabled(false)
            .build();

        let transport = MockTransport::new(addr.to_string());
        let sink = Arc::new(RecordingSink::default());
        let mut session = Session::new(config, transport, sink.clone());
        session
            .start(Path::new("scrcpy-server.jar"), addr.port())
            .await
            .unwrap();

        session.run_until_closed().await;

        assert_eq!(session.state(), SessionState::Closed);
        match session.termination_reason() {
            Some(TerminationReason::Error(ScrcpyErrorKind::MalformedFrame)) => {}
            other => panic!("unexpected termination reason: {other:?}"),
        }
        server.abort();
    }

    /// Scenario S4 through the full session: `set_clipboard` completes once
    /// the mock server replies with the matching `ACK_CLIPBOARD`.
    #[tokio::test]
    async fn s4_clipboard_round_trip_through_session() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut header = [0u8; 9];
            stream.read_exact(&mut header).await.unwrap();
            assert_eq!(header[0], 9); // SET_CLIPBOARD
            let sequence = u64::from_be_bytes(header[1..9].try_into().unwrap());
            assert_eq!(sequence, 7); // caller-chosen sequence round-trips as-is
            let mut paste_and_len = [0u8; 5];
            stream.read_exact(&mut paste_and_len).await.unwrap();
            let text_len = u32::from_be_bytes(paste_and_len[1..5].try_into().unwrap());
            let mut text = vec![0u8; text_len as usize];
            stream.read_exact(&mut text).await.unwrap();

            let mut ack = vec![1u8];
            ack.extend_from_slice(&sequence.to_be_bytes());
            stream.write_all(&ack).await.unwrap();

            let mut discard = [0u8; 1];
            let _ = stream.read(&mut discard).await;
        });

        let config = SessionConfig::builder("3.3.4")
            .scid(3)
            .unwrap()
            .video_enabled(false)
            .audio_enabled(false)
            .build();

        let transport = MockTransport::new(addr.to_string());
        let sink = Arc::new(RecordingSink::default());
        let mut session = Session::new(config, transport, sink.clone());
        session
            .start(Path::new("scrcpy-server.jar"), addr.port())
            .await
            .unwrap();

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(200),
            session.set_clipboard(7, true, "hi"),
        )
        .await
        .unwrap();
        assert!(result.is_ok());

        session.stop().await;
        server.abort();
    }

    #[tokio::test]
    async fn send_control_fails_with_session_closed_after_stop() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let hello = video_handshake_bytes("Pixel", 1080, 2400, 0x68323634);
            stream.write_all(&hello).await.unwrap();
            let mut discard = [0u8; 1];
            let _ = stream.read(&mut discard).await;
        });

        let config = SessionConfig::builder("3.3.4")
            .scid(4)
            .unwrap()
            .audio_enabled(false)
            .control_enabled(false)
            .build();
        let transport = MockTransport::new(addr.to_string());
        let sink = Arc::new(RecordingSink::default());
        let mut session = Session::new(config, transport, sink);
        session
            .start(Path::new("scrcpy-server.jar"), addr.port())
            .await
            .unwrap();

        session.stop().await;
        let err = session
            .send_control(ControlMessage::RotateDevice)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ScrcpyErrorKind::SessionClosed);
        server.abort();
    }

    /// Scenario S5: a `CLIPBOARD` message arrives with no `GET_CLIPBOARD`
    /// outstanding and is forwarded to the sink as an unsolicited event.
    #[tokio::test]
    async fn s5_unsolicited_clipboard_reaches_sink() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut clipboard = vec![0u8]; // CLIPBOARD device-message type id
            clipboard.extend_from_slice(&5u32.to_be_bytes());
            clipboard.extend_from_slice(b"hello");
            stream.write_all(&clipboard).await.unwrap();
            let mut discard = [0u8; 1];
            let _ = stream.read(&mut discard).await;
        });

        let config = SessionConfig::builder("3.3.4")
            .scid(5)
            .unwrap()
            .video_enabled(false)
            .audio_enabled(false)
            .build();

        let transport = MockTransport::new(addr.to_string());
        let sink = Arc::new(RecordingSink::default());
        let mut session = Session::new(config, transport, sink.clone());
        session
            .start(Path::new("scrcpy-server.jar"), addr.port())
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        {
            let events = sink.events.lock().unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0], DeviceMessage::ClipboardText("hello".to_string()));
        }

        session.stop().await;
        server.abort();
    }

    /// Scenario S6: two video frames already read off the socket before
    /// `stop()` are still delivered to the sink, and the session reaches
    /// `Closed` well inside the configured grace period.
    #[tokio::test]
    async fn s6_graceful_shutdown_drains_in_flight_frames() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut hello = video_handshake_bytes("Pixel", 1080, 2400, 0x68323634);
            hello.extend_from_slice(&packet((1u64 << 63) | (1u64 << 62) | 1, &[1u8; 8]));
            hello.extend_from_slice(&packet(2, &[2u8; 8]));
            stream.write_all(&hello).await.unwrap();
            let mut discard = [0u8; 1];
            let _ = stream.read(&mut discard).await;
        });

        let config = SessionConfig::builder("3.3.4")
            .scid(6)
            .unwrap()
            .audio_enabled(false)
            .control_enabled(false)
            .worker_grace_period(std::time::Duration::from_secs(2))
            .build();

        let transport = MockTransport::new(addr.to_string());
        let sink = Arc::new(RecordingSink::default());
        let mut session = Session::new(config, transport, sink.clone());
        session
            .start(Path::new("scrcpy-server.jar"), addr.port())
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let stopped_at = std::time::Instant::now();
        session.stop().await;
        assert!(stopped_at.elapsed() < std::time::Duration::from_secs(2));
        assert_eq!(session.state(), SessionState::Closed);

        let frames = sink.frames.lock().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].pts_us, Some(1));
        assert_eq!(frames[1].pts_us, Some(2));
        server.abort();
    }

    #[test]
    fn default_demuxer_flags_have_no_timestamp_override() {
        // Smoke test that FrameFlags::default() means "not config, not
        // keyframe", matching the demuxer's bit-extraction defaults.
        assert_eq!(
            FrameFlags::default(),
            FrameFlags {
                config: false,
                keyframe: false
            }
        );
    }
}
