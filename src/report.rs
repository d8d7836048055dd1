use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, error};

use crate::batch::BatchReport;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Input and output file sizes of a finished conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeChange {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl SizeChange {
    /// `None` when either file cannot be read, e.g. the output was never written
    pub fn measure(input: &Path, output: &Path) -> Option<Self> {
        let input_bytes = fs::metadata(input).ok()?.len();
        let output_bytes = fs::metadata(output).ok()?.len();
        Some(Self { input_bytes, output_bytes })
    }

    pub fn input_mb(&self) -> f64 {
        self.input_bytes as f64 / BYTES_PER_MB
    }

    pub fn output_mb(&self) -> f64 {
        self.output_bytes as f64 / BYTES_PER_MB
    }

    pub fn delta_mb(&self) -> f64 {
        self.output_mb() - self.input_mb()
    }
}

impl fmt::Display for SizeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Size: {:.2} MB → {:.2} MB ({:+.2} MB)",
            self.input_mb(),
            self.output_mb(),
            self.delta_mb()
        )
    }
}

/// Human readable batch summary: one count line, then one line per failure
pub fn summary_lines(report: &BatchReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Processed {} item(s): {} succeeded, {} failed",
        report.len(),
        report.succeeded().count(),
        report.failed().count()
    )];

    for result in report.failed() {
        lines.push(format!(
            "  {}: {}",
            result.input,
            result.error.as_deref().unwrap_or("unknown error")
        ));
    }

    lines
}

pub fn log_summary(report: &BatchReport) {
    let lines = summary_lines(report);
    if report.is_success() {
        for line in &lines {
            info!("{}", line);
        }
    } else {
        for line in &lines {
            error!("{}", line);
        }
    }
}
