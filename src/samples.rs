//! Built-in example captions

pub const SAMPLE_CAPTIONS: [&str; 3] = [
    "In this video, I'll show you 5 AI tools that will save you 10 hours every week. Number 3 will blow your mind! Let's get started.",
    "Just spent 6 months building my dream app and finally launched today! 🚀 The journey was crazy but here's what I learned about staying consistent when nobody's watching. Link in bio 👆",
    "What if I told you that you're wasting 3 hours every day without even realizing it? In this short, I'll expose the hidden time-killers and show you exactly how to get those hours back.",
];

/// Sample caption by 1-based number
pub fn sample_caption(number: usize) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|i| SAMPLE_CAPTIONS.get(i))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::text;

    #[test]
    fn test_sample_lookup() {
        assert!(sample_caption(0).is_none());
        assert!(sample_caption(4).is_none());
        assert!(sample_caption(1).unwrap().starts_with("In this video"));
    }

    #[test]
    fn test_samples_score_high() {
        for caption in SAMPLE_CAPTIONS {
            let result = text::score(caption);
            assert!(result.score >= 85, "{} scored {}", caption, result.score);
        }
    }
}
