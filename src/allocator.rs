//! Collision-free output path allocation.
//!
//! Candidates are tried in a fixed order: `base.ext`, `base_1.ext`,
//! `base_2.ext`, ... The first one not occupied by any filesystem entry wins.

use std::ffi::{OsStr, OsString};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::DEFAULT_MAX_ATTEMPTS;
use crate::error::{Result, MediaConvError};

/// Prefix `ext` with a dot unless it already has one
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

/// Trim, reject empty or bare-dot extensions, then normalize
pub fn validated_extension(ext: &str) -> Result<String> {
    let trimmed = ext.trim();
    if trimmed.is_empty() || trimmed == "." {
        return Err(MediaConvError::InvalidExtension(ext.to_string()));
    }
    Ok(normalize_extension(trimmed))
}

/// Directory an output for `input` is placed in
pub fn output_dir_for(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Input file name with its extension stripped
pub fn base_name_of(input: &Path) -> Result<OsString> {
    input
        .file_stem()
        .map(OsStr::to_os_string)
        .ok_or_else(|| MediaConvError::InvalidInput(format!(
            "Cannot derive an output name from {}",
            input.display()
        )))
}

#[derive(Debug, Clone, Copy)]
pub struct PathAllocator {
    max_attempts: u32,
}

impl Default for PathAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl PathAllocator {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts: max_attempts.max(1) }
    }

    /// Compute a free output path next to `input` without touching the filesystem
    pub fn allocate(&self, input: &Path, ext: &str, base_name: Option<&str>) -> Result<PathBuf> {
        let base = match base_name {
            Some(name) => OsString::from(name),
            None => base_name_of(input)?,
        };
        self.allocate_in(&output_dir_for(input), &base, ext)
    }

    /// Compute a free path for `base` + `ext` inside `dir`
    pub fn allocate_in<B: AsRef<OsStr>>(&self, dir: &Path, base: B, ext: &str) -> Result<PathBuf> {
        let base = base.as_ref();
        let ext = normalize_extension(ext);

        for candidate in self.candidates(dir, base, &ext) {
            if !is_occupied(&candidate) {
                debug!("Allocated output path {}", candidate.display());
                return Ok(candidate);
            }
        }

        Err(self.exhausted(base))
    }

    /// Like [`allocate`](Self::allocate), but claims the name by creating an
    /// empty file with create-if-absent semantics
    pub fn reserve(&self, input: &Path, ext: &str, base_name: Option<&str>) -> Result<PathBuf> {
        let base = match base_name {
            Some(name) => OsString::from(name),
            None => base_name_of(input)?,
        };
        self.reserve_in(&output_dir_for(input), &base, ext)
    }

    pub fn reserve_in<B: AsRef<OsStr>>(&self, dir: &Path, base: B, ext: &str) -> Result<PathBuf> {
        let base = base.as_ref();
        let ext = normalize_extension(ext);

        for candidate in self.candidates(dir, base, &ext) {
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(_) => {
                    debug!("Reserved output path {}", candidate.display());
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(self.exhausted(base))
    }

    fn candidates<'a>(
        &self,
        dir: &'a Path,
        base: &'a OsStr,
        ext: &'a str,
    ) -> impl Iterator<Item = PathBuf> + 'a {
        (0..self.max_attempts).map(move |index| {
            let mut file_name = base.to_os_string();
            if index > 0 {
                file_name.push(format!("_{}", index));
            }
            file_name.push(ext);
            dir.join(file_name)
        })
    }

    fn exhausted(&self, base: &OsStr) -> MediaConvError {
        MediaConvError::AllocatorExhausted {
            base: base.to_string_lossy().into_owned(),
            attempts: self.max_attempts,
        }
    }
}

// Dangling symlinks count as taken.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
