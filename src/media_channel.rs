// Bounded media frame channel implementing the drop-oldest-non-config-
// non-keyframe back-pressure policy. `tokio::sync::mpsc` doesn't expose
// enough of its internal queue to remove an arbitrary element, so frames
// are held in a small `Mutex<VecDeque>` instead, woken by a pair of
// `Notify`s (one per direction) the way a hand-rolled bounded channel would
// be built on top of the primitives `tokio::sync` already exports.

use crate::model::CodecFrame;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

struct Inner {
    queue: Mutex<VecDeque<CodecFrame>>,
    capacity: usize,
    readable: Notify,
    space: Notify,
    closed: AtomicBool,
    dropped: AtomicU64,
}

pub fn media_channel(capacity: usize) -> (MediaSender, MediaReceiver) {
    let inner = Arc::new(Inner {
        queue: Mutex::new(VecDeque::with_capacity(capacity.min(256))),
        capacity: capacity.max(1),
        readable: Notify::new(),
        space: Notify::new(),
        closed: AtomicBool::new(false),
        dropped: AtomicU64::new(0),
    });
    (
        MediaSender {
            inner: inner.clone(),
        },
        MediaReceiver { inner },
    )
}

#[derive(Clone)]
pub struct MediaSender {
    inner: Arc<Inner>,
}

impl MediaSender {
    /// Delivers `frame`, applying the drop-oldest-non-config-non-keyframe
    /// policy on overflow. Only blocks when the channel is saturated with
    /// undroppable frames and `frame` itself is undroppable.
    pub async fn send(&self, frame: CodecFrame) {
        let must_keep = frame.flags.config || frame.flags.keyframe;
        let mut frame = Some(frame);

        loop {
            {
                let mut queue = self.inner.queue.lock().await;
                if queue.len() < self.inner.capacity {
                    queue.push_back(frame.take().unwrap());
                    self.inner.readable.notify_one();
                    return;
                }

                let droppable_index = queue
                    .iter()
                    .position(|f| !f.flags.config && !f.flags.keyframe);

                if let Some(idx) = droppable_index {
                    queue.remove(idx);
                    queue.push_back(frame.take().unwrap());
                    self.inner.dropped.fetch_add(1, Ordering::Relaxed);
                    self.inner.readable.notify_one();
                    return;
                }

                if !must_keep {
                    // Queue is full of config/keyframes and the incoming
                    // frame isn't one either: discard it instead of blocking.
                    self.inner.dropped.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                // Fall through: queue is saturated with undroppable frames
                // and this frame must be kept. Wait for the receiver to
                // free a slot.
            }
            self.inner.space.notified().await;
        }
    }

    pub fn dropped_count(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }

    /// Marks end-of-stream. Frames already queued are still delivered.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        self.inner.readable.notify_one();
    }
}

pub struct MediaReceiver {
    inner: Arc<Inner>,
}

impl MediaReceiver {
    /// Returns the next frame, or `None` once the channel is closed and
    /// drained.
    pub async fn recv(&mut self) -> Option<CodecFrame> {
        loop {
            {
                let mut queue = self.inner.queue.lock().await;
                if let Some(frame) = queue.pop_front() {
                    self.inner.space.notify_one();
                    return Some(frame);
                }
                if self.inner.closed.load(Ordering::Acquire) {
                    return None;
                }
            }
            self.inner.readable.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FrameFlags, MediaStreamId};

    fn plain_frame(pts: u64) -> CodecFrame {
        CodecFrame {
            stream_id: MediaStreamId::Video,
            codec_id: 0x68323634,
            pts_us: Some(pts),
            flags: FrameFlags::default(),
            payload: vec![0u8; 4],
        }
    }

    fn keyframe(pts: u64) -> CodecFrame {
        CodecFrame {
            flags: FrameFlags {
                config: false,
                keyframe: true,
            },
            ..plain_frame(pts)
        }
    }

    #[tokio::test]
    async fn drops_oldest_droppable_frame_on_overflow() {
        let (tx, mut rx) = media_channel(2);
        tx.send(plain_frame(1)).await;
        tx.send(plain_frame(2)).await;
        tx.send(plain_frame(3)).await; // overflow: drops pts=1

        let first = rx.recv().await.unwrap();
        assert_eq!(first.pts_us, Some(2));
        let second = rx.recv().await.unwrap();
        assert_eq!(second.pts_us, Some(3));
        assert_eq!(tx.dropped_count(), 1);
    }

    #[tokio::test]
    async fn never_drops_keyframes_discards_incoming_plain_frame_instead() {
        let (tx, mut rx) = media_channel(1);
        tx.send(keyframe(1)).await;
        tx.send(plain_frame(2)).await; // no droppable slot, and this frame is droppable -> discarded

        let only = rx.recv().await.unwrap();
        assert_eq!(only.pts_us, Some(1));
        assert_eq!(tx.dropped_count(), 1);
    }

    #[tokio::test]
    async fn recv_returns_none_after_close_and_drain() {
        let (tx, mut rx) = media_channel(4);
        tx.send(plain_frame(1)).await;
        tx.close();

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }
}
