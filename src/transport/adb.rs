// adb-backed transport - the reference Transport implementation, built over
// the real `adb` executable. Generalizes this codebase's existing
// push/shell/forward process-execution stack from device management to
// scrcpy-server deployment.

use super::{ServerHandle, Transport};
use crate::command_utils::TokioCommandExt;
use crate::error::{Result, ScrcpyError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::process::{Child, Command};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Locates the `adb` binary and runs commands against a specific device
/// (or the sole attached device, if `device_id` is `None`).
pub struct AdbTransport {
    adb_path: PathBuf,
    device_id: Option<String>,
}

impl AdbTransport {
    pub fn new(device_id: Option<String>) -> Self {
        Self {
            adb_path: Self::find_adb(),
            device_id,
        }
    }

    pub fn with_adb_path(adb_path: PathBuf, device_id: Option<String>) -> Self {
        Self { adb_path, device_id }
    }

    pub fn adb_path(&self) -> &Path {
        &self.adb_path
    }

    /// Bundled path next to the host executable first, `adb` on `$PATH`
    /// otherwise - same discovery order as the rest of this codebase.
    fn find_adb() -> PathBuf {
        if let Some(bundled) = Self::find_bundled_adb() {
            return bundled;
        }
        PathBuf::from(Self::adb_executable_name())
    }

    fn find_bundled_adb() -> Option<PathBuf> {
        let exe_dir = std::env::current_exe().ok()?.parent()?.to_path_buf();
        let candidate = exe_dir.join(Self::adb_executable_name());
        candidate.exists().then_some(candidate)
    }

    fn adb_executable_name() -> &'static str {
        if cfg!(target_os = "windows") {
            "adb.exe"
        } else {
            "adb"
        }
    }

    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.adb_path);
        cmd.hide_window();
        if let Some(id) = &self.device_id {
            cmd.args(["-s", id]);
        }
        cmd
    }

    /// Runs a one-shot `adb` invocation with a timeout and a single retry,
    /// mirroring the existing retry-with-backoff policy for device commands.
    async fn run_with_retry(&self, args: &[&str], timeout: Duration, retries: u32) -> Result<std::process::Output> {
        let mut last_err = None;
        for attempt in 0..=retries {
            if attempt > 0 {
                tokio::time::sleep(RETRY_DELAY).await;
            }
            let mut cmd = self.base_command();
            cmd.args(args);
            cmd.stdout(std::process::Stdio::piped());
            cmd.stderr(std::process::Stdio::piped());

            let run = async {
                let child = cmd
                    .spawn()
                    .map_err(|e| ScrcpyError::transport(format!("failed to spawn adb: {e}")))?;
                child
                    .wait_with_output()
                    .await
                    .map_err(|e| ScrcpyError::transport(format!("adb exited abnormally: {e}")))
            };

            match tokio::time::timeout(timeout, run).await {
                Ok(Ok(output)) => return Ok(output),
                Ok(Err(e)) => last_err = Some(e),
                Err(_) => last_err = Some(ScrcpyError::timeout("adb invocation timed out")),
            }
        }
        Err(last_err.unwrap_or_else(|| ScrcpyError::transport("adb invocation failed with no attempts made")))
    }
}

pub struct AdbServerHandle {
    child: Child,
}

impl ServerHandle for AdbServerHandle {
    async fn wait(&mut self) -> Result<Option<i32>> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| ScrcpyError::transport(format!("waiting on server process failed: {e}")))?;
        Ok(status.code())
    }

    async fn terminate(&mut self) -> Result<()> {
        match self.child.try_wait() {
            Ok(Some(_)) => Ok(()),
            _ => self
                .child
                .kill()
                .await
                .map_err(|e| ScrcpyError::transport(format!("failed to kill server process: {e}"))),
        }
    }
}

impl Transport for AdbTransport {
    type Handle = AdbServerHandle;

    async fn push(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        let local_str = local_path
            .to_str()
            .ok_or_else(|| ScrcpyError::transport("local path is not valid UTF-8"))?;
        let output = self
            .run_with_retry(&["push", local_str, remote_path], DEFAULT_TIMEOUT, 1)
            .await?;
        if !output.status.success() {
            return Err(ScrcpyError::transport(format!(
                "adb push failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }

    async fn spawn_server(&self, remote_path: &str, argv_tail: &[String]) -> Result<Self::Handle> {
        let classpath_cmd = format!(
            "CLASSPATH={} app_process / com.genymobile.scrcpy.Server {}",
            remote_path,
            argv_tail.join(" ")
        );

        let mut cmd = self.base_command();
        cmd.args(["shell", &classpath_cmd]);
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());

        let child = cmd
            .spawn()
            .map_err(|e| ScrcpyError::transport(format!("failed to spawn scrcpy-server: {e}")))?;

        Ok(AdbServerHandle { child })
    }

    async fn open_tunnel(&self, port: u16, socket_count: usize, forward: bool) -> Result<Vec<TcpStream>> {
        let local_addr = format!("tcp:{port}");

        if forward {
            let output = self
                .run_with_retry(&["forward", &local_addr, &local_addr], DEFAULT_TIMEOUT, 1)
                .await?;
            if !output.status.success() {
                return Err(ScrcpyError::transport(format!(
                    "adb forward failed: {}",
                    String::from_utf8_lossy(&output.stderr)
                )));
            }

            let mut streams = Vec::with_capacity(socket_count);
            for _ in 0..socket_count {
                let stream = tokio::time::timeout(
                    DEFAULT_TIMEOUT,
                    TcpStream::connect(("127.0.0.1", port)),
                )
                .await
                .map_err(|_| ScrcpyError::timeout("timed out connecting to forwarded port"))?
                .map_err(|e| ScrcpyError::transport(format!("connect to forwarded port failed: {e}")))?;
                streams.push(stream);
            }
            Ok(streams)
        } else {
            let output = self
                .run_with_retry(&["reverse", &local_addr, &local_addr], DEFAULT_TIMEOUT, 1)
                .await?;
            if !output.status.success() {
                return Err(ScrcpyError::transport(format!(
                    "adb reverse failed: {}",
                    String::from_utf8_lossy(&output.stderr)
                )));
            }

            let listener = TcpListener::bind(("127.0.0.1", port))
                .await
                .map_err(|e| ScrcpyError::transport(format!("failed to bind local listener: {e}")))?;

            let mut streams = Vec::with_capacity(socket_count);
            for _ in 0..socket_count {
                let (stream, _) = tokio::time::timeout(DEFAULT_TIMEOUT, listener.accept())
                    .await
                    .map_err(|_| ScrcpyError::timeout("timed out accepting reverse tunnel connection"))?
                    .map_err(|e| ScrcpyError::transport(format!("accept failed: {e}")))?;
                streams.push(stream);
            }
            Ok(streams)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adb_executable_name_matches_platform() {
        let name = AdbTransport::adb_executable_name();
        if cfg!(target_os = "windows") {
            assert_eq!(name, "adb.exe");
        } else {
            assert_eq!(name, "adb");
        }
    }

    #[test]
    fn falls_back_to_path_adb_when_no_bundle_present() {
        let transport = AdbTransport::new(None);
        // Either a bundled binary happened to exist next to the test binary,
        // or we fall back to the bare `adb`/`adb.exe` name on $PATH.
        let name = transport.adb_path().file_name().unwrap().to_str().unwrap();
        assert!(name == "adb" || name == "adb.exe" || transport.adb_path().exists());
    }
}
