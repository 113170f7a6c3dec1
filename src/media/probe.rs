//! Video metadata probing

use std::path::Path;

use ffmpeg_next as ffmpeg;

use crate::error::{FfmpegError, Result, ScoreError};

/// What the container says about its best video stream
#[derive(Debug, Clone, PartialEq)]
pub struct StreamProbe {
    pub stream_index: usize,
    pub duration_secs: f64,
    pub width: u32,
    pub height: u32,
    pub codec: String,
}

/// Open a media file and probe its best video stream
pub fn probe_video<P: AsRef<Path>>(path: P) -> Result<StreamProbe> {
    let path = path.as_ref();
    crate::media::init()?;

    let context = ffmpeg::format::input(&path)
        .map_err(|e| FfmpegError::OpenInput(format!("Failed to open {:?}: {}", path, e)))?;
    probe_input(&context)
}

/// Probe an already opened input
pub fn probe_input(context: &ffmpeg::format::context::Input) -> Result<StreamProbe> {
    let stream = context
        .streams()
        .best(ffmpeg::media::Type::Video)
        .ok_or(ScoreError::NoVideoStream)?;

    let (width, height) = unsafe {
        let params_ptr = stream.parameters().as_ptr();
        ((*params_ptr).width as u32, (*params_ptr).height as u32)
    };

    let mut duration_secs = context.duration() as f64 / ffmpeg::ffi::AV_TIME_BASE as f64;
    if duration_secs <= 0.0 {
        // No container duration (e.g. some WebM): fall back to the stream
        duration_secs = pts_to_seconds(stream.duration(), stream.time_base()).max(0.0);
    }

    let probe = StreamProbe {
        stream_index: stream.index(),
        duration_secs,
        width,
        height,
        codec: stream.parameters().id().name().to_string(),
    };

    tracing::debug!(
        "Probed video stream {}: {}x{}, {:.2}s, codec={}",
        probe.stream_index,
        probe.width,
        probe.height,
        probe.duration_secs,
        probe.codec
    );

    Ok(probe)
}

/// Calculate duration in seconds from PTS
pub fn pts_to_seconds(pts: i64, timebase: ffmpeg::Rational) -> f64 {
    let num = timebase.numerator() as f64;
    let den = timebase.denominator() as f64;
    if den == 0.0 {
        return 0.0;
    }
    (pts as f64 * num) / den
}

/// Convert seconds to PTS using timebase
pub fn seconds_to_pts(secs: f64, timebase: ffmpeg::Rational) -> i64 {
    let num = timebase.numerator() as f64;
    let den = timebase.denominator() as f64;
    if num == 0.0 {
        return 0;
    }
    ((secs * den) / num) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pts_conversion() {
        let timebase = ffmpeg::Rational::new(1, 90000);

        // 1 second = 90000 ticks
        assert!((pts_to_seconds(90000, timebase) - 1.0).abs() < 0.0001);
        assert!((pts_to_seconds(45000, timebase) - 0.5).abs() < 0.0001);

        let pts = seconds_to_pts(2.5, timebase);
        assert!((pts_to_seconds(pts, timebase) - 2.5).abs() < 0.0001);
    }

    #[test]
    fn test_degenerate_timebase() {
        assert_eq!(pts_to_seconds(1000, ffmpeg::Rational::new(1, 0)), 0.0);
        assert_eq!(seconds_to_pts(1.0, ffmpeg::Rational::new(0, 1)), 0);
    }

    #[test]
    fn test_probe_missing_file() {
        assert!(probe_video("/nonexistent/clip.mp4").is_err());
    }
}
