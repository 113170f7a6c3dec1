//! Reel readiness scoring
//!
//! Scores short-form captions and videos for how ready they are to post,
//! samples hook thumbnails from the opening seconds of a video, and turns
//! scores into feedback.

pub mod analysis;
pub mod config;
pub mod config_file;
pub mod error;
pub mod feedback;
pub mod media;
pub mod report;
pub mod samples;
pub mod sampler;
pub mod session;

pub use analysis::{AnalysisResult, Features, TextFeatures, Verdict, VideoFeatures};
pub use config::ScorerConfig;
pub use error::{FfmpegError, Result, ScoreError};
pub use feedback::{Feedback, ScoreTier};
pub use media::{FfmpegSession, FfmpegVideo, MediaUpload, VideoInfo};
pub use report::Report;
pub use sampler::{FrameSampler, FrameThumbnail, PlayableVideo};
pub use session::{Analysis, AnalysisSession, Mode, SessionCanceller};
