//! Video scoring from technical metadata

use serde::{Deserialize, Serialize};

use super::{AnalysisResult, Features};

const BASE_SCORE: u32 = 65;
const VERTICAL_BONUS: u32 = 11;

/// Width at or above which a video counts as HD
pub const HD_WIDTH: u32 = 1080;

/// Width at or above which a video earns the reduced resolution bonus
pub const SD_WIDTH: u32 = 720;

/// Duration tiers, first match wins: (exclusive upper bound in seconds, bonus)
const DURATION_TIERS: [(f64, u32); 3] = [(15.0, 15), (30.0, 12), (60.0, 5)];

/// Technical features of a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFeatures {
    pub duration_secs: f64,
    pub width: u32,
    pub height: u32,
    pub is_vertical: bool,
    pub has_hd: bool,
}

impl VideoFeatures {
    pub fn extract(duration_secs: f64, width: u32, height: u32) -> Self {
        Self {
            duration_secs,
            width,
            height,
            is_vertical: height > width,
            has_hd: width >= HD_WIDTH,
        }
    }
}

fn duration_bonus(duration_secs: f64) -> u32 {
    DURATION_TIERS
        .iter()
        .find(|(limit, _)| duration_secs < *limit)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0)
}

fn resolution_bonus(width: u32) -> u32 {
    if width >= HD_WIDTH {
        12
    } else if width >= SD_WIDTH {
        7
    } else {
        0
    }
}

/// Score a video. Run after hook frames have been sampled.
pub fn score(duration_secs: f64, width: u32, height: u32) -> AnalysisResult {
    let features = VideoFeatures::extract(duration_secs, width, height);

    let mut total = BASE_SCORE + duration_bonus(duration_secs) + resolution_bonus(width);
    if features.is_vertical {
        total += VERTICAL_BONUS;
    }

    tracing::debug!(
        duration_secs,
        width,
        height,
        raw_score = total,
        "scored video"
    );

    AnalysisResult::from_raw(total, Features::Video(features))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Verdict;

    #[test]
    fn test_duration_tier_boundaries() {
        assert_eq!(duration_bonus(0.0), 15);
        assert_eq!(duration_bonus(14.99), 15);
        assert_eq!(duration_bonus(15.0), 12);
        assert_eq!(duration_bonus(29.9), 12);
        assert_eq!(duration_bonus(30.0), 5);
        assert_eq!(duration_bonus(59.9), 5);
        assert_eq!(duration_bonus(60.0), 0);
        assert_eq!(duration_bonus(3600.0), 0);
    }

    #[test]
    fn test_resolution_tier_boundaries() {
        assert_eq!(resolution_bonus(1920), 12);
        assert_eq!(resolution_bonus(1080), 12);
        assert_eq!(resolution_bonus(1079), 7);
        assert_eq!(resolution_bonus(720), 7);
        assert_eq!(resolution_bonus(719), 0);
    }

    #[test]
    fn test_features() {
        let vertical = VideoFeatures::extract(10.0, 1080, 1920);
        assert!(vertical.is_vertical);
        assert!(vertical.has_hd);

        let square = VideoFeatures::extract(10.0, 720, 720);
        assert!(!square.is_vertical);
        assert!(!square.has_hd);
    }

    #[test]
    fn test_vertical_hd_short_clamps() {
        // 65 + 15 + 12 + 11 = 103
        let result = score(10.0, 1080, 1920);
        assert_eq!(result.score, 100);
        assert_eq!(result.verdict, Verdict::ReadyToPost);
    }

    #[test]
    fn test_horizontal_low_res() {
        // 65 + 5 + 0 + 0
        let result = score(45.0, 640, 360);
        assert_eq!(result.score, 70);
        assert_eq!(result.verdict, Verdict::GoodButImprovable);
    }

    #[test]
    fn test_boundary_duration_scores_lower_tier() {
        // 65 + 12 + 12 + 0
        assert_eq!(score(15.0, 1920, 1080).score, 89);
        // 65 + 0 + 7 + 11
        assert_eq!(score(60.0, 720, 1280).score, 83);
        // 65 + 0 + 0 + 0
        let result = score(120.0, 480, 360);
        assert_eq!(result.score, 65);
        assert_eq!(result.verdict, Verdict::NeedsImprovement);
    }
}
