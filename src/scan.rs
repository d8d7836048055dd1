use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::Result;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "webm"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "aac", "flac", "wav"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Video => VIDEO_EXTENSIONS,
            MediaKind::Audio => AUDIO_EXTENSIONS,
        }
    }

    /// Classify a path by its extension, ignoring case
    pub fn of(path: &Path) -> Option<MediaKind> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        [MediaKind::Video, MediaKind::Audio]
            .into_iter()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

/// List regular files directly inside `dir` whose extension belongs to `kind`.
///
/// Subdirectories are not descended into. The result is sorted by path so
/// batches run in a stable order.
pub fn list_media_files(dir: &Path, kind: MediaKind) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        // symlinks to regular files count
        if !entry.path().is_file() {
            continue;
        }
        if MediaKind::of(entry.path()) == Some(kind) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!("Found {} {} file(s) in {}", files.len(), kind, dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    #[test]
    fn test_classification_ignores_case() {
        assert_eq!(MediaKind::of(Path::new("a.mp4")), Some(MediaKind::Video));
        assert_eq!(MediaKind::of(Path::new("a.MOV")), Some(MediaKind::Video));
        assert_eq!(MediaKind::of(Path::new("b.Flac")), Some(MediaKind::Audio));
        assert_eq!(MediaKind::of(Path::new("c.txt")), None);
        assert_eq!(MediaKind::of(Path::new("mp4")), None);
    }

    #[test]
    fn test_extension_sets_are_disjoint() {
        for ext in VIDEO_EXTENSIONS {
            assert!(!AUDIO_EXTENSIONS.contains(ext));
        }
    }

    #[test]
    fn test_list_video_files() {
        let temp = TempDir::new().unwrap();
        temp.child("a.mp4").touch().unwrap();
        temp.child("b.txt").touch().unwrap();
        temp.child("c.MP4").touch().unwrap();

        let files = list_media_files(temp.path(), MediaKind::Video).unwrap();
        assert_eq!(
            files,
            vec![temp.path().join("a.mp4"), temp.path().join("c.MP4")]
        );
    }

    #[test]
    fn test_list_skips_subdirectories_and_other_kind() {
        let temp = TempDir::new().unwrap();
        temp.child("nested/deep.mp3").touch().unwrap();
        temp.child("folder.mp3").create_dir_all().unwrap();
        temp.child("clip.mkv").touch().unwrap();
        temp.child("track.mp3").touch().unwrap();

        let audio = list_media_files(temp.path(), MediaKind::Audio).unwrap();
        assert_eq!(audio, vec![temp.path().join("track.mp3")]);

        let video = list_media_files(temp.path(), MediaKind::Video).unwrap();
        assert_eq!(video, vec![temp.path().join("clip.mkv")]);
    }

    #[test]
    fn test_list_empty_directory() {
        let temp = TempDir::new().unwrap();
        let files = list_media_files(temp.path(), MediaKind::Audio).unwrap();
        assert!(files.is_empty());
    }
}
