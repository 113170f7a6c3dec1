//! Scoring module
//!
//! Rule-based scoring of a caption or a video:
//! - Feature extraction (pure, never mutates its input)
//! - Additive score heuristics clamped to 100
//! - Verdict derivation from the final score

pub mod text;
pub mod video;

use serde::{Deserialize, Serialize};

pub use text::TextFeatures;
pub use video::VideoFeatures;

/// Highest score any analysis can produce
pub const MAX_SCORE: u32 = 100;

/// Score at or above which content is ready to post
pub const READY_THRESHOLD: u8 = 85;

/// Score at or above which content is good but improvable
pub const GOOD_THRESHOLD: u8 = 70;

/// Which pipeline produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Text,
    Video,
}

/// Qualitative label derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    ReadyToPost,
    GoodButImprovable,
    NeedsImprovement,
}

impl Verdict {
    pub fn from_score(score: u8) -> Self {
        if score >= READY_THRESHOLD {
            Verdict::ReadyToPost
        } else if score >= GOOD_THRESHOLD {
            Verdict::GoodButImprovable
        } else {
            Verdict::NeedsImprovement
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::ReadyToPost => "Ready to post",
            Verdict::GoodButImprovable => "Good but can be better",
            Verdict::NeedsImprovement => "Needs improvement",
        }
    }
}

/// Kind-specific features behind a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Features {
    Text(TextFeatures),
    Video(VideoFeatures),
}

/// Outcome of a single analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u8,
    pub verdict: Verdict,
    pub features: Features,
}

impl AnalysisResult {
    /// Build a result from an unclamped score total.
    pub(crate) fn from_raw(raw_score: u32, features: Features) -> Self {
        let score = raw_score.min(MAX_SCORE) as u8;
        Self {
            score,
            verdict: Verdict::from_score(score),
            features,
        }
    }

    pub fn kind(&self) -> AnalysisKind {
        match self.features {
            Features::Text(_) => AnalysisKind::Text,
            Features::Video(_) => AnalysisKind::Video,
        }
    }

    pub fn text_features(&self) -> Option<&TextFeatures> {
        match &self.features {
            Features::Text(f) => Some(f),
            Features::Video(_) => None,
        }
    }

    pub fn video_features(&self) -> Option<&VideoFeatures> {
        match &self.features {
            Features::Video(f) => Some(f),
            Features::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(Verdict::from_score(100), Verdict::ReadyToPost);
        assert_eq!(Verdict::from_score(85), Verdict::ReadyToPost);
        assert_eq!(Verdict::from_score(84), Verdict::GoodButImprovable);
        assert_eq!(Verdict::from_score(70), Verdict::GoodButImprovable);
        assert_eq!(Verdict::from_score(69), Verdict::NeedsImprovement);
        assert_eq!(Verdict::from_score(0), Verdict::NeedsImprovement);
    }

    #[test]
    fn test_verdict_total_over_range() {
        for score in 0..=100u8 {
            let expected = match score {
                85..=100 => Verdict::ReadyToPost,
                70..=84 => Verdict::GoodButImprovable,
                _ => Verdict::NeedsImprovement,
            };
            assert_eq!(Verdict::from_score(score), expected, "score {}", score);
        }
    }

    #[test]
    fn test_from_raw_clamps_before_verdict() {
        let result = AnalysisResult::from_raw(
            103,
            Features::Video(VideoFeatures::extract(10.0, 1080, 1920)),
        );
        assert_eq!(result.score, 100);
        assert_eq!(result.verdict, Verdict::ReadyToPost);
        assert_eq!(result.kind(), AnalysisKind::Video);
        assert!(result.text_features().is_none());
    }

    #[test]
    fn test_features_serialize_with_kind_tag() {
        let result = text::score("Hello there");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["features"]["kind"], "text");
        // 60 + 10 for the short hook
        assert_eq!(result.score, 70);
        assert_eq!(json["verdict"], "good_but_improvable");
    }
}
