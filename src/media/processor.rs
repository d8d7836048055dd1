use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::config::EncoderConfig;
use crate::error::{Result, MediaConvError};
use super::{Encoder, MediaCommand, MediaCommandBuilder};

/// Number of trailing stderr lines kept in encoder errors
const STDERR_TAIL_LINES: usize = 5;

/// Concrete implementation of the encoder (FFmpeg-based).
///
/// Only [`detect`](Self::detect) constructs one, so holding a value means the
/// binary answered `-version` at startup.
#[derive(Debug)]
pub struct MediaProcessorImpl {
    config: EncoderConfig,
    version: String,
}

impl MediaProcessorImpl {
    /// Check that the configured binary runs and capture its version
    pub async fn detect(config: EncoderConfig) -> Result<Self> {
        let command = MediaCommandBuilder::new(&config.binary_path).version_check();
        debug!("Checking encoder availability: {}", command);

        let output = Command::new(&command.binary_path)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| MediaConvError::EncoderUnavailable(format!(
                "{}: {}", config.binary_path, e
            )))?;

        if !output.status.success() {
            return Err(MediaConvError::EncoderUnavailable(format!(
                "{} -version exited with {}",
                config.binary_path, output.status
            )));
        }

        let banner = String::from_utf8_lossy(&output.stdout);
        let version = banner.lines().next().unwrap_or("Unknown version").to_string();
        debug!("Encoder answered: {}", version);

        Ok(Self { config, version })
    }
}

#[async_trait]
impl Encoder for MediaProcessorImpl {
    async fn execute(&self, command: &MediaCommand) -> Result<()> {
        debug!("Executing media processing command: {} {:?}", command.binary_path, command.args);

        let mut cmd = Command::new(&command.binary_path);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let result = match self.config.timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), cmd.output())
                .await
                .map_err(|_| MediaConvError::Timeout {
                    description: command.description.clone(),
                    secs,
                })?,
            None => cmd.output().await,
        };

        let output = result.map_err(|e| MediaConvError::Encoder {
            description: command.description.clone(),
            status: "failed to start".to_string(),
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("Encoder stderr:\n{}", stderr);
            return Err(MediaConvError::Encoder {
                description: command.description.clone(),
                status: output.status.to_string(),
                stderr: stderr_tail(&stderr, STDERR_TAIL_LINES),
            });
        }

        Ok(())
    }

    fn version(&self) -> String {
        self.version.clone()
    }
}

/// Last `lines` non-empty lines of encoder diagnostics, joined on one line
fn stderr_tail(stderr: &str, lines: usize) -> String {
    let kept: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join(" | ")
}
