use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaConvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Encoder is not available: {0}")]
    EncoderUnavailable(String),

    #[error("{description} failed ({status}): {stderr}")]
    Encoder {
        description: String,
        status: String,
        stderr: String,
    },

    #[error("{description} timed out after {secs}s")]
    Timeout { description: String, secs: u64 },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No supported media files found in directory: {0}")]
    NoMediaFiles(String),

    #[error("Invalid output extension: {0:?}")]
    InvalidExtension(String),

    #[error("No free output name for {base} after {attempts} attempts")]
    AllocatorExhausted { base: String, attempts: u32 },
}

pub type Result<T> = std::result::Result<T, MediaConvError>;
