//! Sequential batch conversion with per-item failure isolation.
//!
//! Every input becomes exactly one [`BatchResult`]. A failing item (missing
//! file, no free output name, encoder error) is logged and recorded, and the
//! driver moves on to the next input.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn, error, debug};

use crate::allocator::PathAllocator;
use crate::error::{Result, MediaConvError};
use crate::job::{ConversionJob, JobTemplate};
use crate::media::{Encoder, MediaCommand, MediaCommandBuilder};
use crate::report::SizeChange;
use crate::stream::StreamJob;

/// Outcome of one batch item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Input path, or the URL for stream downloads
    pub input: String,
    pub succeeded: bool,
    pub output_path: Option<PathBuf>,
    pub error: Option<String>,
    pub size_change: Option<SizeChange>,
}

impl BatchResult {
    pub fn success<S: Into<String>>(input: S, output_path: PathBuf, size_change: Option<SizeChange>) -> Self {
        Self {
            input: input.into(),
            succeeded: true,
            output_path: Some(output_path),
            error: None,
            size_change,
        }
    }

    pub fn failure<S: Into<String>, E: Into<String>>(input: S, output_path: Option<PathBuf>, error: E) -> Self {
        Self {
            input: input.into(),
            succeeded: false,
            output_path,
            error: Some(error.into()),
            size_change: None,
        }
    }
}

/// Ordered outcomes of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    results: Vec<BatchResult>,
}

impl From<Vec<BatchResult>> for BatchReport {
    fn from(results: Vec<BatchResult>) -> Self {
        Self { results }
    }
}

impl BatchReport {
    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &BatchResult> {
        self.results.iter().filter(|r| r.succeeded)
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchResult> {
        self.results.iter().filter(|r| !r.succeeded)
    }

    /// True only if every item succeeded
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.succeeded)
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

pub struct BatchDriver<'a> {
    encoder: &'a dyn Encoder,
    commands: MediaCommandBuilder,
    allocator: PathAllocator,
    reserve_outputs: bool,
}

impl<'a> BatchDriver<'a> {
    pub fn new(encoder: &'a dyn Encoder, binary_path: &str) -> Self {
        Self {
            encoder,
            commands: MediaCommandBuilder::new(binary_path),
            allocator: PathAllocator::default(),
            reserve_outputs: true,
        }
    }

    pub fn with_allocator(mut self, allocator: PathAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Claim output names with an exclusive create before invoking the encoder
    pub fn reserve_outputs(mut self, reserve: bool) -> Self {
        self.reserve_outputs = reserve;
        self
    }

    /// Convert every input in order with the settings from `template`
    pub async fn run<P: AsRef<Path>>(&self, inputs: &[P], template: &JobTemplate) -> BatchReport {
        let mut results = Vec::with_capacity(inputs.len());

        for input in inputs {
            let input = input.as_ref();
            info!("Processing {}", input.display());
            let job = template.job_for(input);
            results.push(self.run_job(&job).await);
        }

        BatchReport::from(results)
    }

    pub async fn run_job(&self, job: &ConversionJob) -> BatchResult {
        let input = job.input_path().display().to_string();

        if !job.input_path().is_file() {
            let err = MediaConvError::FileNotFound(input.clone());
            error!("Failed to process {}: {}", input, err);
            return BatchResult::failure(input, None, err.to_string());
        }

        let output = match self.claim_job_output(job) {
            Ok(path) => path,
            Err(e) => {
                error!("Failed to process {}: {}", input, e);
                return BatchResult::failure(input, None, e.to_string());
            }
        };

        let command = self.commands.convert(job, &output);
        self.invoke(input, Some(job.input_path()), command, output).await
    }

    /// Download one playlist stream; reported like a single batch item
    pub async fn run_stream(&self, job: &StreamJob) -> BatchResult {
        let input = job.url().to_string();
        info!("Processing {}", input);

        let claimed = if self.reserve_outputs {
            self.allocator.reserve_in(job.output_dir(), job.base_name(), job.output_extension())
        } else {
            self.allocator.allocate_in(job.output_dir(), job.base_name(), job.output_extension())
        };

        let output = match claimed {
            Ok(path) => path,
            Err(e) => {
                error!("Failed to process {}: {}", input, e);
                return BatchResult::failure(input, None, e.to_string());
            }
        };

        let command = self.commands.download_stream(job, &output);
        self.invoke(input, None, command, output).await
    }

    fn claim_job_output(&self, job: &ConversionJob) -> Result<PathBuf> {
        if self.reserve_outputs {
            self.allocator.reserve(job.input_path(), job.output_extension(), job.output_base_name())
        } else {
            self.allocator.allocate(job.input_path(), job.output_extension(), job.output_base_name())
        }
    }

    async fn invoke(
        &self,
        input: String,
        input_path: Option<&Path>,
        command: MediaCommand,
        output: PathBuf,
    ) -> BatchResult {
        info!("Running: {}", command);

        match self.encoder.execute(&command).await {
            Ok(()) => {
                info!("Success -> {}", output.display());
                let size_change = input_path.and_then(|path| SizeChange::measure(path, &output));
                if let Some(change) = &size_change {
                    info!("{}", change);
                }
                BatchResult::success(input, output, size_change)
            }
            Err(e) => {
                error!("Failed to process {}: {}", input, e);
                if self.reserve_outputs {
                    discard_placeholder(&output);
                }
                BatchResult::failure(input, None, e.to_string())
            }
        }
    }
}

// Only an untouched reservation is removed; partial encoder output stays.
fn discard_placeholder(path: &Path) {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() == 0 => {
            if let Err(e) = fs::remove_file(path) {
                warn!("Could not remove placeholder {}: {}", path.display(), e);
            } else {
                debug!("Removed placeholder {}", path.display());
            }
        }
        _ => {}
    }
}
