//! mediaconv - convert video, extract audio and download streams with ffmpeg
//!
//! Single files and whole directories are supported. In directory mode each
//! file is converted independently, and the process exits non-zero if any of
//! them failed.

use anyhow::Result;
use chrono::Local;
use clap::{CommandFactory, Parser};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mediaconv::batch::BatchReport;
use mediaconv::cli::{Args, Commands};
use mediaconv::config::Config;
use mediaconv::job::JobTemplate;
use mediaconv::media::{Encoder, MediaProcessorFactory};
use mediaconv::scan::MediaKind;
use mediaconv::stream::StreamJob;
use mediaconv::workflow::Workflow;

const DEFAULT_CONFIG_FILE: &str = "mediaconv.toml";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let Some(command) = args.command else {
        Args::command().print_help()?;
        println!();
        return Ok(ExitCode::SUCCESS);
    };

    // Load configuration, then apply command line overrides
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Config::from_file(DEFAULT_CONFIG_FILE)?,
        None => Config::default(),
    };
    if let Some(secs) = args.timeout {
        config.encoder.timeout_secs = Some(secs);
    }
    if let Some(dir) = args.log_dir {
        config.logging.directory = Some(dir);
    }

    let _guard = setup_logging(args.verbose, config.logging.directory.as_deref())?;

    // Nothing runs unless the encoder answers at startup
    let encoder = match MediaProcessorFactory::create_processor(config.encoder.clone()).await {
        Ok(encoder) => encoder,
        Err(e) => {
            error!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    info!("Using {}", encoder.version());

    let workflow = Workflow::new(config, encoder);

    match run_command(&workflow, command).await {
        Ok(report) => {
            if report.is_success() {
                info!("All items completed successfully");
            }
            Ok(report.exit_code())
        }
        Err(e) => {
            error!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_command(workflow: &Workflow, command: Commands) -> mediaconv::error::Result<BatchReport> {
    let config = workflow.config();

    match command {
        Commands::Video { input, ext, vcodec, acodec, output } => {
            let mut template = JobTemplate::video(
                ext.as_deref().unwrap_or(&config.video.ext),
                vcodec.unwrap_or_else(|| config.video.vcodec.clone()),
                acodec.unwrap_or_else(|| config.video.acodec.clone()),
            )?;
            if let Some(name) = output {
                template = template.output_base_name(name);
            }

            workflow.convert(&input, MediaKind::Video, &template).await
        }
        Commands::Audio { input, extract, ext, acodec, bitrate, output } => {
            let mut template = JobTemplate::audio(
                ext.as_deref().unwrap_or(&config.audio.ext),
                acodec.unwrap_or_else(|| config.audio.acodec.clone()),
                bitrate.or_else(|| config.audio.bitrate.clone()),
                extract,
            )?;
            if let Some(name) = output {
                template = template.output_base_name(name);
            }

            workflow.convert(&input, MediaKind::Audio, &template).await
        }
        Commands::Stream { url, output, dir, ext, vcodec, acodec } => {
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let job = StreamJob::new(
                &url,
                &dir,
                output,
                ext.as_deref().unwrap_or(&config.stream.ext),
                vcodec.as_deref().unwrap_or(&config.stream.vcodec),
                acodec.as_deref().unwrap_or(&config.stream.acodec),
                Local::now(),
            )?;

            Ok(workflow.download_stream(&job).await)
        }
    }
}

/// Setup console logging, plus a daily rolling file when `log_dir` is set
fn setup_logging(verbose: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let (non_blocking_file, guard) = non_blocking(rolling::daily(dir, "mediaconv.log"));
            let layer = fmt::layer()
                .with_writer(non_blocking_file)
                .with_target(false)
                .with_ansi(false); // No ANSI colors in file
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Some(dir) = log_dir {
        info!("Logging to {}", dir.join("mediaconv.log").display());
    }

    Ok(guard)
}
