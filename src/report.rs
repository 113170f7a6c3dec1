//! Analysis reports
//!
//! A `Report` bundles a result with its feedback and, for videos, the file
//! info and thumbnail summaries. It renders as plain text for terminals or as
//! JSON.

use serde::Serialize;
use std::fmt;

use crate::analysis::{AnalysisResult, MAX_SCORE};
use crate::feedback::Feedback;
use crate::media::VideoInfo;
use crate::sampler::FrameThumbnail;
use crate::session::Analysis;

/// What a report says about one thumbnail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSummary {
    pub timestamp_secs: f64,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
}

impl FrameSummary {
    pub fn new(frame: &FrameThumbnail, inline: bool) -> Self {
        Self {
            timestamp_secs: frame.timestamp_secs,
            width: frame.width,
            height: frame.height,
            bytes: frame.jpeg.len(),
            data_url: inline.then(|| frame.data_url()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub result: AnalysisResult,
    pub feedback: Feedback,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<FrameSummary>,
}

impl Report {
    /// Build a report; `inline_frames` embeds each thumbnail as a data URL.
    pub fn new(analysis: &Analysis, inline_frames: bool) -> Self {
        let result = analysis.result().clone();
        let feedback = Feedback::for_result(&result);
        let (video, frames) = match analysis {
            Analysis::Text(_) => (None, Vec::new()),
            Analysis::Video(v) => (
                Some(v.info.clone()),
                v.frames
                    .iter()
                    .map(|f| FrameSummary::new(f, inline_frames))
                    .collect(),
            ),
        };

        Self {
            result,
            feedback,
            video,
            frames,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Score: {}/{}  {}",
            self.result.score, MAX_SCORE, self.feedback.verdict
        )?;

        if let Some(video) = &self.video {
            writeln!(f)?;
            writeln!(f, "File: {}", video.file_name)?;
            writeln!(
                f,
                "  {:.2} MB, {:.1}s, {}x{}, {}",
                video.size_mib(),
                video.duration_secs,
                video.width,
                video.height,
                video.codec
            )?;
        }

        if !self.frames.is_empty() {
            writeln!(f)?;
            writeln!(f, "Hook frames")?;
            for frame in &self.frames {
                writeln!(
                    f,
                    "  {:>4.1}s  {}x{}  {} bytes",
                    frame.timestamp_secs, frame.width, frame.height, frame.bytes
                )?;
            }
        }

        for section in &self.feedback.sections {
            writeln!(f)?;
            writeln!(f, "{}", section.title)?;
            for line in &section.lines {
                match line.mark {
                    Some(mark) => writeln!(f, "  {} {}", mark.symbol(), line.text)?,
                    None => writeln!(f, "  {}", line.text)?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{text, video};
    use crate::session::VideoAnalysis;
    use bytes::Bytes;

    fn video_analysis() -> Analysis {
        Analysis::Video(VideoAnalysis {
            result: video::score(10.0, 1080, 1920),
            frames: vec![
                FrameThumbnail {
                    timestamp_secs: 0.0,
                    width: 360,
                    height: 640,
                    jpeg: Bytes::from_static(b"\xff\xd8abc"),
                },
                FrameThumbnail {
                    timestamp_secs: 1.0,
                    width: 360,
                    height: 640,
                    jpeg: Bytes::from_static(b"\xff\xd8abcdef"),
                },
            ],
            info: VideoInfo {
                file_name: "reel.mp4".to_string(),
                size_bytes: 2 * 1024 * 1024,
                duration_secs: 10.0,
                width: 1080,
                height: 1920,
                codec: "h264".to_string(),
            },
        })
    }

    #[test]
    fn test_text_report() {
        let report = Report::new(&Analysis::Text(text::score("Day 1")), false);
        assert!(report.video.is_none());
        assert!(report.frames.is_empty());

        let rendered = report.to_string();
        assert!(rendered.starts_with("Score: 85/100  Ready to post\n"));
        assert!(rendered.contains("Hook Analysis\n  Hook length: 5 characters\n"));
        assert!(!rendered.contains("Hook frames"));
    }

    #[test]
    fn test_video_report() {
        let report = Report::new(&video_analysis(), false);
        assert_eq!(report.frames.len(), 2);
        assert_eq!(report.frames[1].bytes, 8);
        assert!(report.frames[0].data_url.is_none());

        let rendered = report.to_string();
        assert!(rendered.contains("File: reel.mp4\n  2.00 MB, 10.0s, 1080x1920, h264\n"));
        assert!(rendered.contains("   0.0s  360x640  5 bytes\n"));
    }

    #[test]
    fn test_json_report() {
        let report = Report::new(&video_analysis(), true);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["result"]["score"], 100);
        assert_eq!(json["result"]["verdict"], "ready_to_post");
        assert_eq!(json["result"]["features"]["kind"], "video");
        assert_eq!(json["feedback"]["tier"], "success");
        assert_eq!(json["video"]["codec"], "h264");
        assert!(json["frames"][0]["data_url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));

        let text = Report::new(&Analysis::Text(text::score("Day 1")), true);
        let json: serde_json::Value = serde_json::from_str(&text.to_json().unwrap()).unwrap();
        assert!(json.get("video").is_none());
        assert!(json.get("frames").is_none());
    }
}
