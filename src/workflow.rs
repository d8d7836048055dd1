use std::path::{Path, PathBuf};
use tracing::info;

use crate::allocator::PathAllocator;
use crate::batch::{BatchDriver, BatchReport};
use crate::config::Config;
use crate::error::{Result, MediaConvError};
use crate::job::JobTemplate;
use crate::media::Encoder;
use crate::report::log_summary;
use crate::scan::{list_media_files, MediaKind};
use crate::stream::StreamJob;

pub struct Workflow {
    config: Config,
    encoder: Box<dyn Encoder>,
}

impl Workflow {
    /// `encoder` is the handle returned by the startup availability check
    pub fn new(config: Config, encoder: Box<dyn Encoder>) -> Self {
        Self { config, encoder }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convert one file, or every `kind` file directly inside a directory.
    ///
    /// Directory scans select by `kind` alone, so audio extraction over a
    /// folder of videos finds nothing; pass video files individually.
    pub async fn convert<P: AsRef<Path>>(
        &self,
        input: P,
        kind: MediaKind,
        template: &JobTemplate,
    ) -> Result<BatchReport> {
        let inputs = resolve_inputs(input.as_ref(), kind)?;
        info!("Converting {} {} file(s) to {}", inputs.len(), kind, template.extension());

        let report = self.driver().run(&inputs, template).await;
        log_summary(&report);
        Ok(report)
    }

    /// Download a playlist stream into a single local file
    pub async fn download_stream(&self, job: &StreamJob) -> BatchReport {
        let result = self.driver().run_stream(job).await;
        let report = BatchReport::from(vec![result]);
        log_summary(&report);
        report
    }

    fn driver(&self) -> BatchDriver<'_> {
        BatchDriver::new(self.encoder.as_ref(), &self.config.encoder.binary_path)
            .with_allocator(PathAllocator::new(self.config.output.max_attempts))
            .reserve_outputs(self.config.output.reserve)
    }
}

/// Expand the CLI input into the ordered list of files to convert
pub fn resolve_inputs(input: &Path, kind: MediaKind) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        let files = list_media_files(input, kind)?;
        if files.is_empty() {
            return Err(MediaConvError::NoMediaFiles(input.display().to_string()));
        }
        Ok(files)
    } else if input.is_file() {
        Ok(vec![input.to_path_buf()])
    } else {
        Err(MediaConvError::FileNotFound(input.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaCommand, MockEncoder};
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use tokio_test::{assert_err, assert_ok};

    fn write_output(command: &MediaCommand) -> Result<()> {
        std::fs::write(command.output_path().expect("output argument"), b"out")?;
        Ok(())
    }

    #[test]
    fn test_resolve_single_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.child("notes.txt");
        file.touch().unwrap();

        // an explicit file is taken as-is, whatever its extension
        let inputs = assert_ok!(resolve_inputs(file.path(), MediaKind::Video));
        assert_eq!(inputs, vec![file.path().to_path_buf()]);
    }

    #[test]
    fn test_resolve_missing_input() {
        let err = assert_err!(resolve_inputs(Path::new("/nonexistent/clip.mov"), MediaKind::Video));
        assert!(matches!(err, MediaConvError::FileNotFound(_)));
    }

    #[test]
    fn test_resolve_directory_without_media() {
        let temp = TempDir::new().unwrap();
        temp.child("readme.txt").touch().unwrap();
        temp.child("song.mp3").touch().unwrap();

        let err = assert_err!(resolve_inputs(temp.path(), MediaKind::Video));
        assert!(matches!(err, MediaConvError::NoMediaFiles(_)));
    }

    #[tokio::test]
    async fn test_convert_directory() {
        let temp = TempDir::new().unwrap();
        temp.child("b.MOV").touch().unwrap();
        temp.child("a.mp4").touch().unwrap();
        temp.child("c.txt").touch().unwrap();

        let mut encoder = MockEncoder::new();
        encoder.expect_execute().times(2).returning(write_output);

        let workflow = Workflow::new(Config::default(), Box::new(encoder));
        let template = JobTemplate::video("mkv", "libx265", "aac").unwrap();
        let report = assert_ok!(workflow.convert(temp.path(), MediaKind::Video, &template).await);

        assert!(report.is_success());
        let outputs: Vec<_> = report
            .results()
            .iter()
            .map(|r| r.output_path.clone().unwrap())
            .collect();
        assert_eq!(outputs, vec![temp.path().join("a.mkv"), temp.path().join("b.mkv")]);
    }

    #[tokio::test]
    async fn test_convert_reports_failures() {
        let temp = TempDir::new().unwrap();
        temp.child("one.wav").touch().unwrap();
        temp.child("two.wav").touch().unwrap();

        let mut encoder = MockEncoder::new();
        encoder.expect_execute().times(2).returning(|cmd| {
            Err(MediaConvError::Encoder {
                description: cmd.description.clone(),
                status: "exit status: 1".to_string(),
                stderr: String::new(),
            })
        });

        let workflow = Workflow::new(Config::default(), Box::new(encoder));
        let template = JobTemplate::audio("m4a", "aac", None, true).unwrap();
        let report = assert_ok!(workflow.convert(temp.path(), MediaKind::Audio, &template).await);

        assert_eq!(report.failed().count(), 2);
        assert!(!report.is_success());
    }
}
