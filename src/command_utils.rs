// Cross-platform command utilities
// Provides helpers for running subprocesses without popping up a terminal window on Windows

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

/// Windows flag to prevent showing console window
#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Extension trait for Tokio Command to hide console window on Windows
pub trait TokioCommandExt {
    fn hide_window(&mut self) -> &mut Self;
}

impl TokioCommandExt for tokio::process::Command {
    #[cfg(target_os = "windows")]
    fn hide_window(&mut self) -> &mut Self {
        self.creation_flags(CREATE_NO_WINDOW);
        self
    }

    #[cfg(not(target_os = "windows"))]
    fn hide_window(&mut self) -> &mut Self {
        self
    }
}
