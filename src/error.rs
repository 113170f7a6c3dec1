use thiserror::Error;

/// One mebibyte, the unit upload sizes are reported in.
pub const MIB: u64 = 1024 * 1024;

/// Main error type for content analysis
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Please enter some text to analyze")]
    EmptyInput,

    #[error("Please upload a video file (got {0}). Supported formats: MP4, MOV, WebM")]
    UnsupportedMediaType(String),

    #[error(
        "File too large: maximum file size is {}MB, your file is {:.2}MB",
        .limit_bytes / MIB,
        as_mib(.size_bytes)
    )]
    MediaTooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("Please upload a video first")]
    NoVideoLoaded,

    #[error("Analysis superseded by a newer request")]
    Superseded,

    #[error("No video stream found in source file")]
    NoVideoStream,

    #[error("FFmpeg error: {0}")]
    Ffmpeg(#[from] FfmpegError),

    #[error("Image encoding error: {0}")]
    Image(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScoreError {
    /// Validation errors are reported to the user as-is; everything else is
    /// an environment failure.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ScoreError::EmptyInput
                | ScoreError::UnsupportedMediaType(_)
                | ScoreError::MediaTooLarge { .. }
                | ScoreError::NoVideoLoaded
        )
    }
}

/// FFmpeg-specific errors
#[derive(Error, Debug)]
pub enum FfmpegError {
    #[error("FFmpeg initialization failed: {0}")]
    InitFailed(String),

    #[error("Failed to open input file: {0}")]
    OpenInput(String),

    #[error("Failed to create decoder: {0}")]
    DecoderCreate(String),

    #[error("Failed to seek: {0}")]
    Seek(String),

    #[error("Failed to decode packet: {0}")]
    DecodePacket(String),

    #[error("Failed to create scaler: {0}")]
    ScalerCreate(String),

    #[error("Failed to scale frame: {0}")]
    Scale(String),

    #[error("No frame decoded yet")]
    NoFrame,

    #[error("Decoder thread is gone")]
    WorkerGone,
}

/// Byte count expressed in MiB, for user-facing size messages
pub fn as_mib(bytes: &u64) -> f64 {
    *bytes as f64 / MIB as f64
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ScoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_too_large_message() {
        let err = ScoreError::MediaTooLarge {
            size_bytes: 150 * MIB + MIB / 2,
            limit_bytes: 100 * MIB,
        };
        assert_eq!(
            err.to_string(),
            "File too large: maximum file size is 100MB, your file is 150.50MB"
        );
    }

    #[test]
    fn test_user_facing() {
        assert!(ScoreError::EmptyInput.is_user_facing());
        assert!(ScoreError::NoVideoLoaded.is_user_facing());
        assert!(!ScoreError::Superseded.is_user_facing());
        assert!(!ScoreError::Ffmpeg(FfmpegError::NoFrame).is_user_facing());
    }
}
