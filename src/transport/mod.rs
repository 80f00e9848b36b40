// Transport adapter - abstracts the device tunnel so the protocol core is
// testable without a real device. `adb` is the default/reference
// implementation (see `adb.rs`); tests drive the core over `mock.rs` instead.

pub mod adb;
pub mod mock;

use crate::error::Result;
use std::path::Path;
use tokio::net::TcpStream;

/// A spawned server process: readable stderr/stdout lines and a way to tear
/// it down. Mirrors this codebase's `Child`-wrapping session handles, but
/// async and generalized away from a single hardcoded session map.
pub trait ServerHandle: Send {
    /// Waits for the process to exit, returning its status code if known.
    fn wait(&mut self) -> impl std::future::Future<Output = Result<Option<i32>>> + Send;

    /// Kills the process if it is still running. Idempotent.
    fn terminate(&mut self) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// The minimal device-transport surface the session coordinator depends on.
/// One concrete implementation (`adb::AdbTransport`) ships with this crate;
/// a second (`mock::MockTransport`) backs the integration tests in `session.rs`.
pub trait Transport: Send + Sync {
    type Handle: ServerHandle;

    /// Pushes a local file to a path on the device. Idempotent at the
    /// caller's discretion - the core calls this once per session.
    fn push(
        &self,
        local_path: &Path,
        remote_path: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Spawns the server process on the device with the given argv tail
    /// (everything after the classpath/entrypoint).
    fn spawn_server(
        &self,
        remote_path: &str,
        argv_tail: &[String],
    ) -> impl std::future::Future<Output = Result<Self::Handle>> + Send;

    /// Opens `socket_count` ordered TCP streams to the device's forwarded
    /// port (video, audio, control - whichever are enabled, in that order).
    /// `forward` selects host-initiates (`adb forward`) vs device-initiates
    /// (`adb reverse`) tunnel discipline.
    fn open_tunnel(
        &self,
        port: u16,
        socket_count: usize,
        forward: bool,
    ) -> impl std::future::Future<Output = Result<Vec<TcpStream>>> + Send;
}
