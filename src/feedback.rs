//! Qualitative feedback
//!
//! Everything here is a pure function of an `AnalysisResult`: the color tier,
//! the verdict label and the tip lists. Each missing "good" feature maps to
//! exactly one tip.

use serde::Serialize;

use crate::analysis::{
    AnalysisResult, Features, TextFeatures, VideoFeatures, GOOD_THRESHOLD, READY_THRESHOLD,
};

/// Hooks shorter than this are called out as punchy
const PUNCHY_HOOK_CHARS: usize = 60;
/// Captions at or above this many words should be shortened
const LONG_CAPTION_WORDS: usize = 100;
/// Videos shorter than this hook viewers immediately
const INSTANT_HOOK_SECS: f64 = 3.0;
/// Ideal upper bound for retention
const RETENTION_SECS: f64 = 30.0;
/// Sweet spot upper bound for watch-through
const SWEET_SPOT_SECS: f64 = 15.0;

pub const HASHTAGS: [&str; 7] = [
    "#reels",
    "#viral",
    "#contentcreator",
    "#fyp",
    "#trending",
    "#explore",
    "#socialmedia",
];

/// Three-tier color scheme for the score badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Success,
    Warning,
    Danger,
}

impl ScoreTier {
    pub fn from_score(score: u8) -> Self {
        if score >= READY_THRESHOLD {
            ScoreTier::Success
        } else if score >= GOOD_THRESHOLD {
            ScoreTier::Warning
        } else {
            ScoreTier::Danger
        }
    }

    /// Hex color for the tier
    pub fn color(&self) -> &'static str {
        match self {
            ScoreTier::Success => "#10b981",
            ScoreTier::Warning => "#f59e0b",
            ScoreTier::Danger => "#ef4444",
        }
    }
}

/// How a feedback line should be flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Good,
    Warn,
    Hint,
}

impl Mark {
    fn from_check(ok: bool) -> Self {
        if ok {
            Mark::Good
        } else {
            Mark::Warn
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Mark::Good => "✅",
            Mark::Warn => "⚠️",
            Mark::Hint => "💡",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub mark: Option<Mark>,
    pub text: String,
}

impl Line {
    fn marked(mark: Mark, text: impl Into<String>) -> Self {
        Self {
            mark: Some(mark),
            text: text.into(),
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self {
            mark: None,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub lines: Vec<Line>,
}

/// Rendered-ready feedback for one result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub tier: ScoreTier,
    pub color: &'static str,
    pub verdict: &'static str,
    pub sections: Vec<Section>,
}

impl Feedback {
    pub fn for_result(result: &AnalysisResult) -> Self {
        let tier = ScoreTier::from_score(result.score);
        let mut sections = match &result.features {
            Features::Text(features) => text_sections(features),
            Features::Video(features) => video_sections(features),
        };
        sections.extend(shared_sections());

        Self {
            tier,
            color: tier.color(),
            verdict: result.verdict.label(),
            sections,
        }
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// Tips for each missing caption feature, in display order
pub fn text_tips(features: &TextFeatures) -> Vec<&'static str> {
    let mut tips = Vec::new();
    if !features.has_question {
        tips.push("❓ Add a compelling question to engage viewers and encourage comments");
    }
    if !features.has_numbers {
        tips.push("🔢 Include specific numbers or statistics to add credibility and grab attention");
    }
    if !features.has_emoji {
        tips.push("😊 Add 2-3 relevant emojis to make your text more visually appealing");
    }
    tips.extend([
        "🎬 Keep your script under 100 words for better pacing when filming",
        "📣 End with a clear call-to-action (Like, Follow, Comment, Share)",
        "🎵 Use trending audio when creating your video",
        "📝 Add text overlays for key points to help viewers who watch without sound",
    ]);
    tips
}

/// Tips for each missing video feature, in display order
pub fn video_tips(features: &VideoFeatures) -> Vec<&'static str> {
    let mut tips = Vec::new();
    if !features.is_vertical {
        tips.push("📱 Shoot in vertical format (9:16 aspect ratio) - essential for Reels, TikTok, and Shorts");
    }
    if !features.has_hd {
        tips.push("🎥 Record in 1080p or higher resolution for better quality and professionalism");
    }
    if features.duration_secs > RETENTION_SECS {
        tips.push("✂️ Edit your video down to under 30 seconds for better viewer retention");
    }
    if features.duration_secs > SWEET_SPOT_SECS {
        tips.push("⏱️ Aim for 15-20 seconds for maximum engagement and watch-through rate");
    }
    tips.extend([
        "📝 Add captions/subtitles - 85% of viewers watch without sound",
        "🎵 Use trending audio to boost discoverability by 50-70%",
        "🎨 Add bold text overlay in the first 3 seconds as a hook",
        "📊 Include a clear CTA (Call-To-Action) at the end",
    ]);
    tips
}

fn text_sections(features: &TextFeatures) -> Vec<Section> {
    let hook = if features.hook_length < PUNCHY_HOOK_CHARS {
        Line::marked(
            Mark::Good,
            "Perfect! Your hook is concise and punchy. Short hooks (under 60 characters) perform 40% better on social media.",
        )
    } else {
        Line::marked(
            Mark::Warn,
            "Too long. Your hook should be under 60 characters for maximum impact. Current viewers scroll past long intros.",
        )
    };

    let word_count = if features.word_count < LONG_CAPTION_WORDS {
        Line::marked(Mark::Good, format!("Word count: {} words", features.word_count))
    } else {
        Line::marked(
            Mark::Warn,
            format!("Word count: {} words - consider shortening", features.word_count),
        )
    };

    let emoji = if features.has_emoji {
        Line::marked(Mark::Good, "Emojis: Yes - Increases visual appeal")
    } else {
        Line::marked(Mark::Hint, "Emojis: Consider adding 2-3 relevant emojis")
    };

    vec![
        Section {
            title: "Hook Analysis",
            lines: vec![
                Line::plain(format!("Hook length: {} characters", features.hook_length)),
                hook,
            ],
        },
        Section {
            title: "Content Elements",
            lines: vec![
                word_count,
                Line::marked(
                    Mark::from_check(features.has_question),
                    if features.has_question {
                        "Question included: Yes - Great for engagement!"
                    } else {
                        "Question included: No - Add a question to boost comments"
                    },
                ),
                Line::marked(
                    Mark::from_check(features.has_numbers),
                    if features.has_numbers {
                        "Numbers/Stats: Yes - Adds credibility!"
                    } else {
                        "Numbers/Stats: No - Add specific numbers for more impact"
                    },
                ),
                emoji,
            ],
        },
        Section {
            title: "Optimization Tips",
            lines: text_tips(features).into_iter().map(Line::plain).collect(),
        },
    ]
}

fn video_sections(features: &VideoFeatures) -> Vec<Section> {
    let opening = if features.duration_secs < INSTANT_HOOK_SECS {
        Line::marked(
            Mark::Good,
            "Excellent! Your video hooks viewers immediately. The first 3 seconds are engaging and create curiosity.",
        )
    } else {
        Line::marked(
            Mark::Warn,
            "Consider improving: Make your opening more compelling. Add text overlays or visual interest in the first 3 seconds to grab attention faster.",
        )
    };

    let format = if features.is_vertical {
        "Format: Vertical (9:16) - Perfect for Instagram Reels, TikTok & YouTube Shorts"
    } else {
        "Format: Horizontal - Consider shooting in vertical format (9:16) for better social media performance"
    };
    let resolution = if features.has_hd {
        format!("Resolution: {}×{} HD Quality - Excellent!", features.width, features.height)
    } else {
        format!(
            "Resolution: {}×{} Low quality - Record in at least 1080p for best results",
            features.width, features.height
        )
    };
    let short_enough = features.duration_secs < RETENTION_SECS;
    let duration = if short_enough {
        format!("Duration: {:.1}s Great length for social media", features.duration_secs)
    } else {
        format!(
            "Duration: {:.1}s Too long - Keep videos under 30 seconds for maximum retention",
            features.duration_secs
        )
    };

    vec![
        Section {
            title: "Opening Hook (First 3 Seconds)",
            lines: vec![opening],
        },
        Section {
            title: "Technical Quality Assessment",
            lines: vec![
                Line::marked(Mark::from_check(features.is_vertical), format),
                Line::marked(Mark::from_check(features.has_hd), resolution),
                Line::marked(Mark::from_check(short_enough), duration),
            ],
        },
        Section {
            title: "Key Improvements",
            lines: video_tips(features).into_iter().map(Line::plain).collect(),
        },
    ]
}

fn shared_sections() -> Vec<Section> {
    vec![
        Section {
            title: "Recommended Hashtags",
            lines: vec![Line::plain(HASHTAGS.join(" "))],
        },
        Section {
            title: "Best Posting Time",
            lines: vec![
                Line::plain("7-9 PM in your timezone - engagement rates are highest (up to 3x normal)"),
                Line::plain("Alternative times: 11 AM - 1 PM (lunch break) or 6-8 AM (morning commute)"),
            ],
        },
        Section {
            title: "Pro Growth Tips",
            lines: vec![
                Line::plain("Consistency is key: Post at the same time every day to train the algorithm and build audience anticipation."),
                Line::plain("Engage immediately: Reply to ALL comments within the first 60 minutes. This signals the algorithm to boost your content to more viewers."),
                Line::plain("Use trending sounds: Content with trending audio gets 30-50% more reach. Check your platform's trending section daily."),
                Line::plain("Cross-post strategically: Share the same video on Instagram Reels, TikTok, and YouTube Shorts to maximize reach across platforms."),
            ],
        },
    ]
}
