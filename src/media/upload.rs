//! Upload validation

use std::path::{Path, PathBuf};

use crate::error::{Result, ScoreError};

/// Media type prefix every accepted upload must carry
pub const VIDEO_MEDIA_PREFIX: &str = "video/";

/// A file offered for video analysis
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub path: PathBuf,
    pub file_name: String,
    /// Declared media type, e.g. `video/mp4`
    pub media_type: String,
    pub size_bytes: u64,
}

impl MediaUpload {
    pub fn new<P: AsRef<Path>>(path: P, media_type: &str, size_bytes: u64) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            file_name,
            media_type: media_type.to_string(),
            size_bytes,
        }
    }

    /// Describe a file on disk. The media type is guessed from the extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let media_type = mime_guess::from_path(path).first_or_octet_stream();
        Ok(Self::new(path, media_type.essence_str(), metadata.len()))
    }

    /// Reject anything that is not a video or is larger than `max_bytes`.
    pub fn validate(&self, max_bytes: u64) -> Result<()> {
        if !self.media_type.starts_with(VIDEO_MEDIA_PREFIX) {
            return Err(ScoreError::UnsupportedMediaType(self.media_type.clone()));
        }
        if self.size_bytes > max_bytes {
            return Err(ScoreError::MediaTooLarge {
                size_bytes: self.size_bytes,
                limit_bytes: max_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MIB;
    use std::io::Write;

    const LIMIT: u64 = 100 * MIB;

    #[test]
    fn test_accepts_video_within_limit() {
        let upload = MediaUpload::new("/tmp/clip.mp4", "video/mp4", 5 * MIB);
        assert_eq!(upload.file_name, "clip.mp4");
        assert!(upload.validate(LIMIT).is_ok());

        let exact = MediaUpload::new("clip.webm", "video/webm", LIMIT);
        assert!(exact.validate(LIMIT).is_ok());
    }

    #[test]
    fn test_rejects_non_video() {
        let upload = MediaUpload::new("photo.png", "image/png", 1024);
        match upload.validate(LIMIT) {
            Err(ScoreError::UnsupportedMediaType(media_type)) => assert_eq!(media_type, "image/png"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_oversized() {
        let upload = MediaUpload::new("big.mov", "video/quicktime", LIMIT + 1);
        let err = upload.validate(LIMIT).unwrap_err();
        assert!(matches!(err, ScoreError::MediaTooLarge { .. }));
        assert_eq!(
            err.to_string(),
            "File too large: maximum file size is 100MB, your file is 100.00MB"
        );
    }

    #[test]
    fn test_from_path_guesses_type() {
        let mut file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        file.write_all(&[0u8; 2048]).unwrap();

        let upload = MediaUpload::from_path(file.path()).unwrap();
        assert_eq!(upload.media_type, "video/mp4");
        assert_eq!(upload.size_bytes, 2048);

        let text = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let upload = MediaUpload::from_path(text.path()).unwrap();
        assert!(upload.validate(LIMIT).is_err());
    }

    #[test]
    fn test_from_path_missing_file() {
        assert!(matches!(
            MediaUpload::from_path("/nonexistent/clip.mp4"),
            Err(ScoreError::Io(_))
        ));
    }
}
