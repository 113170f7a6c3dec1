//! Media module - FFmpeg access for video analysis
//!
//! This module handles:
//! - FFmpeg initialization and log level
//! - Upload validation (media type, size limit)
//! - Metadata probing of the best video stream
//! - The FFmpeg-backed `PlayableVideo` used for hook sampling

pub mod player;
pub mod probe;
pub mod scaler;
pub mod upload;

use serde::Serialize;
use std::sync::Once;

pub use ffmpeg_next as ffmpeg;
pub use player::FfmpegVideo;
pub use probe::{probe_video, StreamProbe};
pub use upload::MediaUpload;

use crate::error::{as_mib, FfmpegError, Result};
use crate::session::{AnalysisSession, LoadedVideo};

/// Initialize FFmpeg library
///
/// Safe to call repeatedly; only the first call does any work.
pub fn init() -> std::result::Result<(), FfmpegError> {
    static QUIET: Once = Once::new();

    ffmpeg::init().map_err(|e| FfmpegError::InitFailed(format!("ffmpeg::init() failed: {}", e)))?;

    // Demuxer/decoder chatter goes to stderr otherwise
    QUIET.call_once(|| ffmpeg::util::log::set_level(ffmpeg::util::log::Level::Warning));
    Ok(())
}

/// File information shown once a video is loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoInfo {
    pub file_name: String,
    pub size_bytes: u64,
    pub duration_secs: f64,
    pub width: u32,
    pub height: u32,
    pub codec: String,
}

impl VideoInfo {
    pub fn new(upload: &MediaUpload, probe: &StreamProbe) -> Self {
        Self {
            file_name: upload.file_name.clone(),
            size_bytes: upload.size_bytes,
            duration_secs: probe.duration_secs,
            width: probe.width,
            height: probe.height,
            codec: probe.codec.clone(),
        }
    }

    pub fn size_mib(&self) -> f64 {
        as_mib(&self.size_bytes)
    }
}

/// Session over real video files
pub type FfmpegSession = AnalysisSession<FfmpegVideo>;

impl AnalysisSession<FfmpegVideo> {
    /// Validate `upload`, open it and make it the session's current video.
    ///
    /// On failure the previously loaded video, if any, stays in place.
    pub async fn open_upload(&mut self, upload: &MediaUpload) -> Result<&VideoInfo> {
        upload.validate(self.max_upload_bytes())?;

        let handle = FfmpegVideo::open(&upload.path).await?;
        let info = VideoInfo::new(upload, handle.probe());
        Ok(self.attach_video(LoadedVideo { handle, info }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScorerConfig;
    use crate::error::{ScoreError, MIB};

    #[test]
    fn test_init_is_idempotent() {
        assert!(init().is_ok());
        assert!(init().is_ok());
    }

    #[test]
    fn test_video_info_from_probe() {
        let upload = MediaUpload::new("/videos/reel.mp4", "video/mp4", 3 * MIB / 2);
        let probe = StreamProbe {
            stream_index: 0,
            duration_secs: 12.5,
            width: 1080,
            height: 1920,
            codec: "h264".to_string(),
        };
        let info = VideoInfo::new(&upload, &probe);
        assert_eq!(info.file_name, "reel.mp4");
        assert_eq!(info.width, 1080);
        assert!((info.size_mib() - 1.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_open_upload_validates_first() {
        let mut session = FfmpegSession::new(&ScorerConfig::default());

        let image = MediaUpload::new("/nonexistent/cover.png", "image/png", 10);
        assert!(matches!(
            session.open_upload(&image).await,
            Err(ScoreError::UnsupportedMediaType(_))
        ));

        let huge = MediaUpload::new("/nonexistent/huge.mp4", "video/mp4", 101 * MIB);
        assert!(matches!(
            session.open_upload(&huge).await,
            Err(ScoreError::MediaTooLarge { .. })
        ));
        assert!(session.video_info().is_none());
    }
}
