// Loopback transport for tests - `push`/`spawn_server` are no-ops that
// record their arguments, `open_tunnel` dials a pre-bound local mock server
// instead of shelling out to `adb`. Session-level integration tests use this
// to drive the coordinator through the S1-S6 scenarios without a device.

use super::{ServerHandle, Transport};
use crate::error::{Result, ScrcpyError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

#[derive(Debug, Default, Clone)]
pub struct MockCallLog {
    pub pushed: Vec<(PathBuf, String)>,
    pub spawned_argv: Vec<Vec<String>>,
}

pub struct MockTransport {
    connect_addr: String,
    log: Arc<Mutex<MockCallLog>>,
}

impl MockTransport {
    /// `connect_addr` is the address of a test-owned `TcpListener` standing
    /// in for the device's forwarded port.
    pub fn new(connect_addr: impl Into<String>) -> Self {
        Self {
            connect_addr: connect_addr.into(),
            log: Arc::new(Mutex::new(MockCallLog::default())),
        }
    }

    pub fn log(&self) -> Arc<Mutex<MockCallLog>> {
        self.log.clone()
    }
}

pub struct MockServerHandle {
    terminated: bool,
}

impl ServerHandle for MockServerHandle {
    async fn wait(&mut self) -> Result<Option<i32>> {
        // The mock server is driven entirely by the test; it never exits on
        // its own, it is only ever force-terminated.
        std::future::pending::<()>().await;
        unreachable!()
    }

    async fn terminate(&mut self) -> Result<()> {
        self.terminated = true;
        Ok(())
    }
}

impl Transport for MockTransport {
    type Handle = MockServerHandle;

    async fn push(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        self.log
            .lock()
            .await
            .pushed
            .push((local_path.to_path_buf(), remote_path.to_string()));
        Ok(())
    }

    async fn spawn_server(&self, _remote_path: &str, argv_tail: &[String]) -> Result<Self::Handle> {
        self.log.lock().await.spawned_argv.push(argv_tail.to_vec());
        Ok(MockServerHandle { terminated: false })
    }

    async fn open_tunnel(&self, _port: u16, socket_count: usize, _forward: bool) -> Result<Vec<TcpStream>> {
        let mut streams = Vec::with_capacity(socket_count);
        for _ in 0..socket_count {
            let stream = TcpStream::connect(&self.connect_addr)
                .await
                .map_err(|e| ScrcpyError::transport(format!("mock connect failed: {e}")))?;
            streams.push(stream);
        }
        Ok(streams)
    }
}
