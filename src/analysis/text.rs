//! Caption scoring

use serde::{Deserialize, Serialize};

use super::{AnalysisResult, Features};

const BASE_SCORE: u32 = 60;
const SHORT_HOOK_BONUS: u32 = 10;
const QUESTION_BONUS: u32 = 10;
const NUMBERS_BONUS: u32 = 15;
const WORD_RANGE_BONUS: u32 = 8;
const EMOJI_BONUS: u32 = 5;
const DIRECT_ADDRESS_BONUS: u32 = 2;

/// Hooks shorter than this many characters earn a bonus
pub const SHORT_HOOK_CHARS: usize = 80;

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Lexical features of a caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFeatures {
    /// Characters before the first sentence terminator
    pub hook_length: usize,
    pub has_question: bool,
    pub has_numbers: bool,
    pub has_emoji: bool,
    pub word_count: usize,
}

impl TextFeatures {
    pub fn extract(text: &str) -> Self {
        let hook = match regex!(r"[.!?]").find(text) {
            Some(m) => &text[..m.start()],
            None => text,
        };

        Self {
            hook_length: hook.chars().count(),
            has_question: text.contains('?'),
            has_numbers: regex!(r"[0-9]+").is_match(text),
            has_emoji: regex!(r"[\x{1F300}-\x{1F9FF}]").is_match(text),
            word_count: text.split_whitespace().count(),
        }
    }

    fn word_count_in_range(&self) -> bool {
        self.word_count > 20 && self.word_count < 100
    }
}

/// Score a caption. `text` must be non-empty; callers trim and reject blank
/// input first.
pub fn score(text: &str) -> AnalysisResult {
    let features = TextFeatures::extract(text);

    let mut total = BASE_SCORE;
    if features.hook_length < SHORT_HOOK_CHARS {
        total += SHORT_HOOK_BONUS;
    }
    if features.has_question {
        total += QUESTION_BONUS;
    }
    if features.has_numbers {
        total += NUMBERS_BONUS;
    }
    if features.word_count_in_range() {
        total += WORD_RANGE_BONUS;
    }
    if features.has_emoji {
        total += EMOJI_BONUS;
    }
    if text.to_lowercase().contains("you") {
        total += DIRECT_ADDRESS_BONUS;
    }

    tracing::debug!(
        hook_length = features.hook_length,
        word_count = features.word_count,
        raw_score = total,
        "scored caption"
    );

    AnalysisResult::from_raw(total, Features::Text(features))
}
