// Media processing through an external encoder binary
//
// - Commands: argument vector builders for conversion and stream download
// - Processor: ffmpeg-backed encoder that runs those commands

pub mod commands;
pub mod processor;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

pub use commands::*;
pub use processor::*;

use crate::config::EncoderConfig;
use crate::error::Result;

/// Runs encoder commands and reports only success or failure
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Run one command to completion
    async fn execute(&self, command: &MediaCommand) -> Result<()>;

    /// First line of the encoder's version banner
    fn version(&self) -> String;
}

/// Factory for creating encoder instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Locate the configured ffmpeg binary, failing fast when it cannot run
    pub async fn create_processor(config: EncoderConfig) -> Result<Box<dyn Encoder>> {
        let processor = MediaProcessorImpl::detect(config).await?;
        Ok(Box::new(processor))
    }
}
