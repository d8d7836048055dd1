use std::path::{Path, PathBuf};

use crate::allocator::validated_extension;
use crate::error::Result;

/// One requested input-to-output conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    input_path: PathBuf,
    output_extension: String,
    output_base_name: Option<String>,
    video_codec: Option<String>,
    audio_codec: Option<String>,
    bitrate: Option<String>,
    extract_only: bool,
}

impl ConversionJob {
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Always starts with `.`
    pub fn output_extension(&self) -> &str {
        &self.output_extension
    }

    pub fn output_base_name(&self) -> Option<&str> {
        self.output_base_name.as_deref()
    }

    pub fn video_codec(&self) -> Option<&str> {
        self.video_codec.as_deref()
    }

    pub fn audio_codec(&self) -> Option<&str> {
        self.audio_codec.as_deref()
    }

    pub fn bitrate(&self) -> Option<&str> {
        self.bitrate.as_deref()
    }

    pub fn extract_only(&self) -> bool {
        self.extract_only
    }

    /// Short label used in logs and encoder error messages
    pub fn description(&self) -> &'static str {
        if self.extract_only {
            "Audio extraction"
        } else if self.video_codec.is_some() {
            "Video conversion"
        } else {
            "Audio conversion"
        }
    }
}

/// Settings shared by every job of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTemplate {
    output_extension: String,
    output_base_name: Option<String>,
    video_codec: Option<String>,
    audio_codec: Option<String>,
    bitrate: Option<String>,
    extract_only: bool,
}

impl JobTemplate {
    pub fn new<S: AsRef<str>>(output_extension: S) -> Result<Self> {
        Ok(Self {
            output_extension: validated_extension(output_extension.as_ref())?,
            output_base_name: None,
            video_codec: None,
            audio_codec: None,
            bitrate: None,
            extract_only: false,
        })
    }

    /// Template for the `video` command
    pub fn video<S: Into<String>>(ext: &str, vcodec: S, acodec: S) -> Result<Self> {
        Ok(Self::new(ext)?.video_codec(vcodec).audio_codec(acodec))
    }

    /// Template for the `audio` command
    pub fn audio<S: Into<String>>(ext: &str, acodec: S, bitrate: Option<String>, extract: bool) -> Result<Self> {
        let template = Self::new(ext)?.audio_codec(acodec).extract_only(extract);
        Ok(match bitrate {
            Some(bitrate) => template.bitrate(bitrate),
            None => template,
        })
    }

    pub fn output_base_name<S: Into<String>>(mut self, name: S) -> Self {
        self.output_base_name = Some(name.into());
        self
    }

    pub fn video_codec<S: Into<String>>(mut self, codec: S) -> Self {
        self.video_codec = Some(codec.into());
        self
    }

    pub fn audio_codec<S: Into<String>>(mut self, codec: S) -> Self {
        self.audio_codec = Some(codec.into());
        self
    }

    pub fn bitrate<S: Into<String>>(mut self, bitrate: S) -> Self {
        self.bitrate = Some(bitrate.into());
        self
    }

    pub fn extract_only(mut self, extract: bool) -> Self {
        self.extract_only = extract;
        self
    }

    pub fn extension(&self) -> &str {
        &self.output_extension
    }

    /// Build the job for one batch item
    pub fn job_for<P: AsRef<Path>>(&self, input: P) -> ConversionJob {
        ConversionJob {
            input_path: input.as_ref().to_path_buf(),
            output_extension: self.output_extension.clone(),
            output_base_name: self.output_base_name.clone(),
            video_codec: self.video_codec.clone(),
            audio_codec: self.audio_codec.clone(),
            bitrate: self.bitrate.clone(),
            extract_only: self.extract_only,
        }
    }
}
