//! Scorer configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, ScoreError, MIB};

/// Hook frame sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Pause after each capture before seeking again, in milliseconds
    pub settle_delay_ms: u64,

    /// Upper bound on seek + capture for one timestamp, in milliseconds
    pub seek_timeout_ms: u64,

    /// Thumbnails are captured at 1/scale_divisor of the native size
    pub scale_divisor: u32,

    /// JPEG quality (1-100)
    pub jpeg_quality: u8,

    /// A captured frame within this many seconds of the target is fresh
    pub freshness_tolerance_secs: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 150,
            seek_timeout_ms: 5000,
            scale_divisor: 3,
            jpeg_quality: 85,
            freshness_tolerance_secs: 0.1,
        }
    }
}

impl SamplingConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn seek_timeout(&self) -> Duration {
        Duration::from_millis(self.seek_timeout_ms)
    }
}

/// Upload validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted video size in megabytes (MiB)
    pub max_size_mb: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_size_mb: 100 }
    }
}

impl UploadConfig {
    /// Get maximum upload size in bytes
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb * MIB
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Scorer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScorerConfig {
    pub sampling: SamplingConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

impl ScorerConfig {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.sampling.scale_divisor == 0 {
            return Err(ScoreError::Config(
                "sampling.scale_divisor must be at least 1".to_string(),
            ));
        }
        if !(1..=100).contains(&self.sampling.jpeg_quality) {
            return Err(ScoreError::Config(format!(
                "sampling.jpeg_quality must be between 1 and 100, got {}",
                self.sampling.jpeg_quality
            )));
        }
        if self.sampling.seek_timeout_ms == 0 {
            return Err(ScoreError::Config(
                "sampling.seek_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
