// Control channel - encodes outbound control messages, decodes inbound
// device messages, and correlates request/reply pairs (SET_CLIPBOARD/
// ACK_CLIPBOARD, GET_CLIPBOARD/CLIPBOARD) across the two independent
// reader/writer tasks that own the socket halves.

use crate::error::{Result, ScrcpyError};
use crate::model::{AppListEntry, ControlMessage, CopyKey, DeviceMessage};
use crate::sink::Sink;
use crate::wire;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot, Mutex};

/// Encodes one outbound control message, type byte first.
pub async fn encode_control_message<W: AsyncWrite + Unpin>(
    w: &mut W,
    msg: &ControlMessage,
) -> Result<()> {
    wire::write_u8(w, msg.type_id()).await?;
    match msg {
        ControlMessage::InjectKeycode {
            action,
            keycode,
            repeat,
            metastate,
        } => {
            wire::write_u8(w, *action).await?;
            wire::write_i32(w, *keycode).await?;
            wire::write_u32(w, *repeat).await?;
            wire::write_u32(w, *metastate).await?;
        }
        ControlMessage::InjectText(text) => {
            wire::write_len32_string(w, text).await?;
        }
        ControlMessage::InjectTouchEvent {
            action,
            pointer_id,
            x,
            y,
            w: width,
            h: height,
            pressure,
            action_button,
            buttons,
        } => {
            wire::write_u8(w, *action).await?;
            wire::write_i64(w, *pointer_id).await?;
            wire::write_i32(w, *x).await?;
            wire::write_i32(w, *y).await?;
            wire::write_u16(w, *width).await?;
            wire::write_u16(w, *height).await?;
            wire::write_u16(w, *pressure).await?;
            wire::write_u32(w, *action_button).await?;
            wire::write_u32(w, *buttons).await?;
        }
        ControlMessage::InjectScrollEvent {
            x,
            y,
            w: width,
            h: height,
            hscroll,
            vscroll,
            buttons,
        } => {
            wire::write_i32(w, *x).await?;
            wire::write_i32(w, *y).await?;
            wire::write_u16(w, *width).await?;
            wire::write_u16(w, *height).await?;
            wire::write_i16(w, *hscroll).await?;
            wire::write_i16(w, *vscroll).await?;
            wire::write_u32(w, *buttons).await?;
        }
        ControlMessage::BackOrScreenOn { action } => {
            wire::write_u8(w, *action).await?;
        }
        ControlMessage::ExpandNotificationPanel
        | ControlMessage::ExpandSettingsPanel
        | ControlMessage::CollapsePanels
        | ControlMessage::RotateDevice
        | ControlMessage::OpenHardKeyboardSettings
        | ControlMessage::ResetVideo => {}
        ControlMessage::GetClipboard { copy_key } => {
            wire::write_u8(w, copy_key.as_u8()).await?;
        }
        ControlMessage::SetClipboard {
            sequence,
            paste,
            text,
        } => {
            wire::write_u64(w, *sequence).await?;
            wire::write_bool(w, *paste).await?;
            wire::write_len32_string(w, text).await?;
        }
        ControlMessage::SetDisplayPower { on } => {
            wire::write_bool(w, *on).await?;
        }
        ControlMessage::UhidCreate {
            id,
            vendor_id,
            product_id,
            name,
            report_descriptor,
        } => {
            wire::write_u16(w, *id).await?;
            wire::write_u16(w, *vendor_id).await?;
            wire::write_u16(w, *product_id).await?;
            wire::write_len16_blob(w, name).await?;
            wire::write_len16_blob(w, report_descriptor).await?;
        }
        ControlMessage::UhidInput { id, data } => {
            wire::write_u16(w, *id).await?;
            wire::write_len16_blob(w, data).await?;
        }
        ControlMessage::UhidDestroy { id } => {
            wire::write_u16(w, *id).await?;
        }
        ControlMessage::StartApp { name_or_package } => {
            wire::write_len32_string(w, name_or_package).await?;
        }
    }
    Ok(())
}

fn copy_key_from_u8(v: u8) -> Result<CopyKey> {
    match v {
        0 => Ok(CopyKey::None),
        1 => Ok(CopyKey::Copy),
        2 => Ok(CopyKey::Cut),
        other => Err(ScrcpyError::malformed_frame(format!(
            "unknown copy_key {other}"
        ))),
    }
}

/// Decodes one inbound device message. `max_string_len` bounds `len32_string`
/// fields the same way `SessionConfig::max_payload_len` bounds media
/// payloads.
pub async fn decode_device_message<R: AsyncRead + Unpin>(
    r: &mut R,
    max_string_len: u32,
) -> Result<DeviceMessage> {
    let type_id = wire::read_u8(r).await?;
    match type_id {
        0 => {
            let text = wire::read_len32_string(r, max_string_len).await?;
            Ok(DeviceMessage::ClipboardText(text))
        }
        1 => {
            let sequence = wire::read_u64(r).await?;
            Ok(DeviceMessage::AckClipboard(sequence))
        }
        2 => {
            let id = wire::read_u16(r).await?;
            let data = wire::read_len16_blob(r).await?;
            Ok(DeviceMessage::UhidOutput { id, data })
        }
        3 => {
            let count = wire::read_u32(r).await?;
            let mut entries = Vec::with_capacity(count.min(4096) as usize);
            for _ in 0..count {
                let name = wire::read_len16_string(r).await?;
                let package = wire::read_len16_string(r).await?;
                let system = wire::read_bool(r).await?;
                entries.push(AppListEntry {
                    name,
                    package,
                    system,
                });
            }
            Ok(DeviceMessage::AppList(entries))
        }
        4 => {
            let on = wire::read_bool(r).await?;
            Ok(DeviceMessage::DisplayPowerState(on))
        }
        other => Err(ScrcpyError::malformed_frame(format!(
            "unknown device message type {other}"
        ))),
    }
}

/// `copy_key` argument helper so tests / callers can go straight from a
/// wire byte; used only in tests below, exported for symmetry with decode.
#[cfg(test)]
fn copy_key_to_u8(k: CopyKey) -> u8 {
    k.as_u8()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChannelState {
    Ready,
    Broken,
}

struct PendingTable {
    acks: HashMap<u64, oneshot::Sender<Result<()>>>,
    gets: VecDeque<oneshot::Sender<Result<String>>>,
    state: ChannelState,
}

impl PendingTable {
    fn new() -> Self {
        Self {
            acks: HashMap::new(),
            gets: VecDeque::new(),
            state: ChannelState::Ready,
        }
    }

    fn fail_all(&mut self, make_err: impl Fn() -> ScrcpyError) {
        for (_, tx) in self.acks.drain() {
            let _ = tx.send(Err(make_err()));
        }
        while let Some(tx) = self.gets.pop_front() {
            let _ = tx.send(Err(make_err()));
        }
    }
}

/// A handle to a running control channel: submit outbound messages, await
/// clipboard correlation. Cloning shares the same outbound queue and
/// pending-ack table.
#[derive(Clone)]
pub struct ControlHandle {
    outbound: mpsc::Sender<ControlMessage>,
    pending: Arc<Mutex<PendingTable>>,
}

impl ControlHandle {
    /// Enqueues a message with no reply correlation (everything except
    /// `GET_CLIPBOARD`/`SET_CLIPBOARD`). Blocks if the outbound queue is
    /// full per §5 ("control must not be silently lost").
    pub async fn send(&self, msg: ControlMessage) -> Result<()> {
        self.outbound
            .send(msg)
            .await
            .map_err(|_| ScrcpyError::channel_broken("control writer task is gone"))
    }

    /// Sends `SET_CLIPBOARD` with the caller-chosen `sequence` and awaits the
    /// matching `ACK_CLIPBOARD`.
    pub async fn set_clipboard(&self, sequence: u64, paste: bool, text: impl Into<String>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            if pending.state == ChannelState::Broken {
                return Err(ScrcpyError::channel_broken("control channel is broken"));
            }
            pending.acks.insert(sequence, tx);
        }
        self.send(ControlMessage::SetClipboard {
            sequence,
            paste,
            text: text.into(),
        })
        .await?;
        rx.await
            .map_err(|_| ScrcpyError::channel_broken("ack waiter dropped"))?
    }

    /// Sends `GET_CLIPBOARD` and awaits the next unsolicited `CLIPBOARD`
    /// reply, FIFO against any other outstanding gets.
    pub async fn get_clipboard(&self, copy_key: CopyKey) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            if pending.state == ChannelState::Broken {
                return Err(ScrcpyError::channel_broken("control channel is broken"));
            }
            pending.gets.push_back(tx);
        }
        self.send(ControlMessage::GetClipboard { copy_key }).await?;
        rx.await
            .map_err(|_| ScrcpyError::channel_broken("get-clipboard waiter dropped"))?
    }
}

/// Spawns the writer and reader tasks for a handshaked control socket split
/// into its read/write halves. Returns a handle for submitting outbound
/// messages; the two `JoinHandle`s are owned by the caller (the session
/// coordinator) so it can bound their shutdown with `worker_grace_period`.
pub fn spawn<R, W>(
    mut reader: R,
    mut writer: W,
    queue_capacity: usize,
    max_string_len: u32,
    sink: Arc<dyn Sink>,
    mut stop: tokio::sync::watch::Receiver<bool>,
) -> (
    ControlHandle,
    tokio::task::JoinHandle<Result<()>>,
    tokio::task::JoinHandle<Result<()>>,
)
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let pending = Arc::new(Mutex::new(PendingTable::new()));
    let (tx, mut rx) = mpsc::channel::<ControlMessage>(queue_capacity);

    let handle = ControlHandle {
        outbound: tx,
        pending: pending.clone(),
    };

    // The writer's cancellation mechanism *is* the outbound queue closing -
    // once every `ControlHandle` clone is dropped, `rx.recv()` returns
    // `None` and the write half is shut down, giving the peer a clean EOF.
    let writer_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            encode_control_message(&mut writer, &msg).await?;
        }
        use tokio::io::AsyncWriteExt;
        let _ = writer.shutdown().await;
        Ok(())
    });

    let reader_pending = pending.clone();
    let reader_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = stop.changed() => return Ok(()),
                decoded = decode_device_message(&mut reader, max_string_len) => {
                    match decoded {
                        Ok(DeviceMessage::AckClipboard(sequence)) => {
                            let mut table = reader_pending.lock().await;
                            if let Some(tx) = table.acks.remove(&sequence) {
                                let _ = tx.send(Ok(()));
                            }
                        }
                        Ok(DeviceMessage::ClipboardText(text)) => {
                            let mut table = reader_pending.lock().await;
                            if let Some(tx) = table.gets.pop_front() {
                                let _ = tx.send(Ok(text));
                            } else {
                                drop(table);
                                sink.on_device_event(DeviceMessage::ClipboardText(text));
                            }
                        }
                        Ok(other) => {
                            sink.on_device_event(other);
                        }
                        Err(e) => {
                            let mut table = reader_pending.lock().await;
                            table.state = ChannelState::Broken;
                            table.fail_all(|| ScrcpyError::channel_broken("control channel reader failed"));
                            return Err(e);
                        }
                    }
                }
            }
        }
    });

    (handle, reader_task, writer_task)
}
