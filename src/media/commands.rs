use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::Path;

use crate::job::ConversionJob;
use crate::stream::StreamJob;

/// Abstract media processing command representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCommand {
    pub binary_path: String,
    /// Kept as OS strings so paths reach the encoder byte-for-byte
    pub args: Vec<OsString>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add input file or URL
    pub fn input<S: AsRef<OsStr>>(self, source: S) -> Self {
        self.arg("-i").arg(source.as_ref())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().as_os_str())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Set video codec
    pub fn video_codec<S: Into<OsString>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Set audio codec
    pub fn audio_codec<S: Into<OsString>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Set audio bitrate
    pub fn audio_bitrate<S: Into<OsString>>(self, bitrate: S) -> Self {
        self.arg("-b:a").arg(bitrate)
    }

    /// Disable video
    pub fn no_video(self) -> Self {
        self.arg("-vn")
    }

    /// Allow playlist segments with any extension (HLS demuxer option)
    pub fn allow_all_extensions(self) -> Self {
        self.arg("-allowed_extensions").arg("ALL")
    }

    /// Output path, which is always the final argument
    pub fn output_path(&self) -> Option<&Path> {
        self.args.last().map(Path::new)
    }
}

impl fmt::Display for MediaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary_path)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Builder for common media processing operations
#[derive(Debug, Clone)]
pub struct MediaCommandBuilder {
    binary_path: String,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Build the conversion command for one job
    pub fn convert<P: AsRef<Path>>(&self, job: &ConversionJob, output_path: P) -> MediaCommand {
        let mut cmd = MediaCommand::new(&self.binary_path, job.description())
            .overwrite()
            .input(job.input_path());

        if job.extract_only() {
            cmd = cmd.no_video();
        } else if let Some(vcodec) = job.video_codec() {
            cmd = cmd.video_codec(vcodec);
        }

        if let Some(acodec) = job.audio_codec() {
            cmd = cmd.audio_codec(acodec);
        }

        if let Some(bitrate) = job.bitrate() {
            cmd = cmd.audio_bitrate(bitrate);
        }

        cmd.output(output_path)
    }

    /// Build playlist stream download command
    pub fn download_stream<P: AsRef<Path>>(&self, job: &StreamJob, output_path: P) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Stream download")
            .overwrite()
            .allow_all_extensions()
            .input(job.url())
            .video_codec(job.video_codec())
            .audio_codec(job.audio_codec())
            .output(output_path)
    }

    /// Build version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Version check")
            .arg("-version")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobTemplate;
    use chrono::Local;

    fn count(args: &[OsString], flag: &str) -> usize {
        args.iter().filter(|a| a.as_os_str() == flag).count()
    }

    #[test]
    fn test_video_conversion_args() {
        let job = JobTemplate::video(".mp4", "libx264", "aac").unwrap().job_for("clip.mov");
        let cmd = MediaCommandBuilder::new("ffmpeg").convert(&job, "clip.mp4");

        assert_eq!(cmd.binary_path, "ffmpeg");
        assert_eq!(
            cmd.args,
            vec!["-y", "-i", "clip.mov", "-c:v", "libx264", "-c:a", "aac", "clip.mp4"]
        );
        assert_eq!(cmd.output_path(), Some(Path::new("clip.mp4")));
        assert_eq!(cmd.to_string(), "ffmpeg -y -i clip.mov -c:v libx264 -c:a aac clip.mp4");
    }

    #[test]
    fn test_extract_drops_video_once() {
        let job = JobTemplate::audio(".m4a", "aac", None, true)
            .unwrap()
            .video_codec("libx264")
            .job_for("talk.mp4");
        let cmd = MediaCommandBuilder::new("ffmpeg").convert(&job, "talk.m4a");

        assert_eq!(count(&cmd.args, "-vn"), 1);
        assert_eq!(count(&cmd.args, "-c:v"), 0);
        assert_eq!(cmd.description, "Audio extraction");
    }

    #[test]
    fn test_audio_bitrate() {
        let job = JobTemplate::audio("mp3", "libmp3lame", Some("192k".to_string()), false)
            .unwrap()
            .job_for("song.wav");
        let cmd = MediaCommandBuilder::new("/usr/bin/ffmpeg").convert(&job, "song.mp3");

        assert_eq!(
            cmd.args,
            vec!["-y", "-i", "song.wav", "-c:a", "libmp3lame", "-b:a", "192k", "song.mp3"]
        );
        assert_eq!(count(&cmd.args, "-vn"), 0);
    }

    #[test]
    fn test_stream_download_args() {
        let job = StreamJob::new(
            "https://example.com/a.m3u8",
            Path::new("."),
            Some("live".to_string()),
            ".mp4",
            "copy",
            "copy",
            Local::now(),
        )
        .unwrap();
        let cmd = MediaCommandBuilder::new("ffmpeg").download_stream(&job, "live.mp4");

        assert_eq!(
            cmd.args,
            vec![
                "-y", "-allowed_extensions", "ALL", "-i", "https://example.com/a.m3u8",
                "-c:v", "copy", "-c:a", "copy", "live.mp4",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_pass_through() {
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new(OsStr::from_bytes(b"media/caf\xe9.mov"));
        let output = Path::new(OsStr::from_bytes(b"media/caf\xe9.mp4"));
        let job = JobTemplate::video(".mp4", "libx264", "aac").unwrap().job_for(input);
        let cmd = MediaCommandBuilder::new("ffmpeg").convert(&job, output);

        assert_eq!(cmd.args[2].as_os_str(), input.as_os_str());
        assert_eq!(cmd.output_path(), Some(output));
        assert_eq!(cmd.args[2].as_bytes(), b"media/caf\xe9.mov");
    }

    #[test]
    fn test_version_check() {
        let cmd = MediaCommandBuilder::new("ffmpeg").version_check();
        assert_eq!(cmd.args, vec!["-version"]);
    }
}
