use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::allocator::validated_extension;
use crate::error::{Result, MediaConvError};

/// Download of a remote playlist (m3u8) stream into a local file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamJob {
    url: String,
    output_dir: PathBuf,
    base_name: String,
    output_extension: String,
    video_codec: String,
    audio_codec: String,
}

impl StreamJob {
    /// `base_name` falls back to `output_<timestamp>` taken from `now`
    pub fn new(
        url: &str,
        output_dir: &Path,
        base_name: Option<String>,
        ext: &str,
        vcodec: &str,
        acodec: &str,
        now: DateTime<Local>,
    ) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(MediaConvError::InvalidInput("Stream URL is empty".to_string()));
        }

        Ok(Self {
            url: url.to_string(),
            output_dir: output_dir.to_path_buf(),
            base_name: base_name.unwrap_or_else(|| default_base_name(now)),
            output_extension: validated_extension(ext)?,
            video_codec: vcodec.to_string(),
            audio_codec: acodec.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn output_extension(&self) -> &str {
        &self.output_extension
    }

    pub fn video_codec(&self) -> &str {
        &self.video_codec
    }

    pub fn audio_codec(&self) -> &str {
        &self.audio_codec
    }
}

fn default_base_name(now: DateTime<Local>) -> String {
    format!("output_{}", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    #[test]
    fn test_default_base_name_uses_timestamp() {
        let job = StreamJob::new(
            "https://example.com/live.m3u8",
            Path::new("downloads"),
            None,
            "mp4",
            "copy",
            "copy",
            fixed_now(),
        )
        .unwrap();

        assert_eq!(job.base_name(), "output_20240309_070501");
        assert_eq!(job.output_extension(), ".mp4");
        assert_eq!(job.output_dir(), Path::new("downloads"));
    }

    #[test]
    fn test_explicit_base_name() {
        let job = StreamJob::new(
            " https://example.com/live.m3u8 ",
            Path::new("."),
            Some("concert".to_string()),
            ".mkv",
            "copy",
            "aac",
            fixed_now(),
        )
        .unwrap();

        assert_eq!(job.url(), "https://example.com/live.m3u8");
        assert_eq!(job.base_name(), "concert");
        assert_eq!(job.audio_codec(), "aac");
    }

    #[test]
    fn test_extension_trimmed_and_validated() {
        let url = "https://example.com/a.m3u8";
        let job = StreamJob::new(url, Path::new("."), None, " mp4", "copy", "copy", fixed_now()).unwrap();
        assert_eq!(job.output_extension(), ".mp4");

        let result = StreamJob::new(url, Path::new("."), None, " . ", "copy", "copy", fixed_now());
        assert!(matches!(result, Err(MediaConvError::InvalidExtension(_))));
    }

    #[test]
    fn test_empty_url_rejected() {
        let result = StreamJob::new("  ", Path::new("."), None, ".mp4", "copy", "copy", fixed_now());
        assert!(matches!(result, Err(MediaConvError::InvalidInput(_))));
    }
}
