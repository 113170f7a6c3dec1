//! Captured hook thumbnails

use base64::Engine;
use bytes::Bytes;
use serde::Serialize;

/// Capture parameters handed to a video backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSpec {
    /// Output is 1/scale_divisor of the native width and height
    pub scale_divisor: u32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl CaptureSpec {
    /// Output dimensions for a source of the given size. Never zero.
    pub fn target_size(&self, width: u32, height: u32) -> (u32, u32) {
        let divisor = self.scale_divisor.max(1);
        ((width / divisor).max(1), (height / divisor).max(1))
    }
}

impl Default for CaptureSpec {
    fn default() -> Self {
        Self {
            scale_divisor: 3,
            jpeg_quality: 85,
        }
    }
}

/// A frame as returned by a backend capture
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub jpeg: Bytes,
    pub width: u32,
    pub height: u32,
    /// Presentation time of the captured frame, if the backend knows it
    pub presented_at: Option<f64>,
}

impl CapturedFrame {
    /// True when the backend reports a presentation time close enough to the
    /// seek target that the frame cannot be a stale one.
    pub fn is_fresh_for(&self, target_secs: f64, tolerance_secs: f64) -> bool {
        self.presented_at
            .map(|pts| (pts - target_secs).abs() <= tolerance_secs)
            .unwrap_or(false)
    }
}

/// A JPEG still sampled from a video at a fixed timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameThumbnail {
    pub timestamp_secs: f64,
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pub jpeg: Bytes,
}

impl FrameThumbnail {
    pub fn new(timestamp_secs: f64, frame: CapturedFrame) -> Self {
        Self {
            timestamp_secs,
            width: frame.width,
            height: frame.height,
            jpeg: frame.jpeg,
        }
    }

    /// Encode as a `data:` URL suitable for an `<img src>`
    pub fn data_url(&self) -> String {
        format!(
            "data:image/jpeg;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.jpeg)
        )
    }

    /// File name used when writing thumbnails to disk
    pub fn file_name(&self, index: usize) -> String {
        format!("frame_{}_{}s.jpg", index, self.timestamp_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(presented_at: Option<f64>) -> CapturedFrame {
        CapturedFrame {
            jpeg: Bytes::from_static(b"\xff\xd8jpeg"),
            width: 360,
            height: 640,
            presented_at,
        }
    }

    #[test]
    fn test_target_size() {
        let spec = CaptureSpec::default();
        assert_eq!(spec.target_size(1080, 1920), (360, 640));
        assert_eq!(spec.target_size(1280, 720), (426, 240));
        assert_eq!(spec.target_size(2, 2), (1, 1));
    }

    #[test]
    fn test_freshness() {
        assert!(frame(Some(1.04)).is_fresh_for(1.0, 0.1));
        assert!(!frame(Some(0.5)).is_fresh_for(1.0, 0.1));
        assert!(!frame(None).is_fresh_for(1.0, 0.1));
    }

    #[test]
    fn test_data_url() {
        let thumb = FrameThumbnail::new(0.0, frame(None));
        assert_eq!(thumb.data_url(), "data:image/jpeg;base64,/9hqcGVn");
        assert_eq!(thumb.file_name(2), "frame_2_0s.jpg");
    }
}
