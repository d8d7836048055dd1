use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, MediaConvError};

/// Upper bound on candidate names tried by the output path allocator
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Kill the encoder if a single invocation runs longer than this
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Maximum number of `name`, `name_1`, ... candidates to try
    pub max_attempts: u32,
    /// Claim output names with an exclusive create instead of an existence check
    pub reserve: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub ext: String,
    pub vcodec: String,
    pub acodec: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub ext: String,
    pub acodec: String,
    /// Audio bitrate passed as `-b:a` (e.g. "192k")
    pub bitrate: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub ext: String,
    pub vcodec: String,
    pub acodec: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the rolling log file; console only when unset
    pub directory: Option<PathBuf>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            reserve: true,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            ext: ".mp4".to_string(),
            vcodec: "libx264".to_string(),
            acodec: "aac".to_string(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ext: ".m4a".to_string(),
            acodec: "aac".to_string(),
            bitrate: None,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            ext: ".mp4".to_string(),
            vcodec: "copy".to_string(),
            acodec: "copy".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MediaConvError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| MediaConvError::Config(format!("Failed to parse config file: {}", e)))?;

        if config.output.max_attempts == 0 {
            return Err(MediaConvError::Config(
                "output.max_attempts must be at least 1".to_string(),
            ));
        }

        if config.encoder.timeout_secs == Some(0) {
            return Err(MediaConvError::Config(
                "encoder.timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MediaConvError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| MediaConvError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
