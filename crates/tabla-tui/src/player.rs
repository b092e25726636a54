//! Player: one headless mpv child process per live stream.
//!
//! Starting a stream kills whatever was playing before; stopping kills the
//! process.  mpv's stderr is appended to `<data_dir>/mpv-stderr.log`.

use std::path::PathBuf;

use tracing::{info, warn};

use tabla_core::config::PlayerConfig;
use tabla_core::platform;

pub struct Player {
    binary: Option<PathBuf>,
    volume: f32,
    process: Option<tokio::process::Child>,
    url: Option<String>,
}

/// mpv arguments for a live stream at `volume` (0.0–1.0).
pub fn mpv_args(url: &str, volume: f32) -> Vec<String> {
    vec![
        "--no-video".to_string(),
        "--quiet".to_string(),
        format!(
            "--volume={}",
            (volume * 100.0).clamp(0.0, 100.0).round() as i64
        ),
        url.to_string(),
    ]
}

impl Player {
    pub fn new(cfg: &PlayerConfig) -> Self {
        let binary = platform::find_mpv_binary(cfg.mpv_path.as_deref());
        match &binary {
            Some(path) => info!("player: using mpv at {:?}", path),
            None => warn!("player: mpv binary not found, playback disabled"),
        }
        Self {
            binary,
            volume: cfg.default_volume,
            process: None,
            url: None,
        }
    }

    /// Replace the current stream with `url`.
    pub async fn play(&mut self, url: &str) -> anyhow::Result<()> {
        self.stop().await;

        let binary = self
            .binary
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("mpv binary not found"))?;

        let stderr_path = platform::data_dir().join("mpv-stderr.log");
        let stderr_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&stderr_path)?;

        let child = tokio::process::Command::new(binary)
            .args(mpv_args(url, self.volume))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(stderr_file)
            .kill_on_drop(true)
            .spawn()?;
        info!("player: mpv pid {:?} playing {}", child.id(), url);
        self.process = Some(child);
        self.url = Some(url.to_string());
        Ok(())
    }

    pub async fn stop(&mut self) {
        if let Some(mut p) = self.process.take() {
            if let Err(e) = p.kill().await {
                warn!("player: kill failed: {}", e);
            }
            info!("player: stopped {}", self.url.as_deref().unwrap_or("-"));
        }
        self.url = None;
    }

    /// True while a spawned mpv is still running.  A process that exited on
    /// its own is forgotten so the caller can report it once.
    pub fn process_alive(&mut self) -> bool {
        let Some(child) = self.process.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                match status.code() {
                    Some(code) => warn!("player: mpv exited with code {}", code),
                    None => warn!("player: mpv terminated by signal"),
                }
                self.process = None;
                self.url = None;
                false
            }
            Err(e) => {
                warn!("player: liveness check failed: {}", e);
                false
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mpv_args() {
        assert_eq!(
            mpv_args("https://x/p1.mp3", 0.5),
            vec!["--no-video", "--quiet", "--volume=50", "https://x/p1.mp3"]
        );
        assert_eq!(mpv_args("u", 3.0)[2], "--volume=100");
    }

    #[tokio::test]
    async fn test_play_without_binary_fails_and_stays_stopped() {
        let mut player = Player {
            binary: None,
            volume: 0.5,
            process: None,
            url: None,
        };
        assert!(player.play("https://x/p1.mp3").await.is_err());
        assert!(!player.is_running());
        assert!(player.url.is_none());
        assert!(!player.process_alive());
    }
}
