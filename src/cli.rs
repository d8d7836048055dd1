use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Media converter using ffmpeg (single or batch)", long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Kill an encoder run after this many seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert video file(s)
    Video {
        /// Input file or directory
        input: PathBuf,

        /// Output extension [default: .mp4]
        #[arg(long)]
        ext: Option<String>,

        /// Video codec [default: libx264]
        #[arg(long)]
        vcodec: Option<String>,

        /// Audio codec [default: aac]
        #[arg(long)]
        acodec: Option<String>,

        /// Output file name without extension
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Convert or extract audio file(s)
    Audio {
        /// Input file or directory
        input: PathBuf,

        /// Extract audio from video (drop the video stream). A directory input
        /// is still scanned for audio files only (mp3 m4a aac flac wav)
        #[arg(long)]
        extract: bool,

        /// Output extension [default: .m4a]
        #[arg(long)]
        ext: Option<String>,

        /// Audio codec [default: aac]
        #[arg(long)]
        acodec: Option<String>,

        /// Audio bitrate, e.g. 192k
        #[arg(long)]
        bitrate: Option<String>,

        /// Output file name without extension
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Download an m3u8 video stream
    #[command(alias = "m3u8")]
    Stream {
        /// URL of the m3u8 playlist
        url: String,

        /// Output file name without extension [default: output_<timestamp>]
        #[arg(short, long)]
        output: Option<String>,

        /// Directory to save the output (default is current directory)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output extension [default: .mp4]
        #[arg(long)]
        ext: Option<String>,

        /// Video codec [default: copy]
        #[arg(long)]
        vcodec: Option<String>,

        /// Audio codec [default: copy]
        #[arg(long)]
        acodec: Option<String>,
    },
}
