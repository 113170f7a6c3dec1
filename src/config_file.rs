//! Configuration file support
//!
//! Loads scorer configuration from TOML files. Every section and field is
//! optional; anything missing falls back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{LoggingConfig, SamplingConfig, ScorerConfig, UploadConfig};
use crate::error::{Result, ScoreError};

/// Configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Hook frame sampling settings
    pub sampling: Option<SamplingSettings>,
    /// Upload validation settings
    pub upload: Option<UploadSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SamplingSettings {
    /// Settle delay after each capture in milliseconds
    pub settle_delay_ms: Option<u64>,
    /// Per-timestamp seek + capture timeout in milliseconds
    pub seek_timeout_ms: Option<u64>,
    /// Thumbnail downscale divisor
    pub scale_divisor: Option<u32>,
    /// JPEG quality (1-100)
    pub jpeg_quality: Option<u8>,
    /// Frame freshness tolerance in seconds
    pub freshness_tolerance_secs: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Maximum video size in MB
    pub max_size_mb: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| {
            ScoreError::Config(format!("{}: {}", path.as_ref().display(), e))
        })
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ScoreError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = ScorerConfig::default();
        Self {
            sampling: Some(SamplingSettings {
                settle_delay_ms: Some(defaults.sampling.settle_delay_ms),
                seek_timeout_ms: Some(defaults.sampling.seek_timeout_ms),
                scale_divisor: Some(defaults.sampling.scale_divisor),
                jpeg_quality: Some(defaults.sampling.jpeg_quality),
                freshness_tolerance_secs: Some(defaults.sampling.freshness_tolerance_secs),
            }),
            upload: Some(UploadSettings {
                max_size_mb: Some(defaults.upload.max_size_mb),
            }),
            logging: Some(LoggingSettings {
                level: Some(defaults.logging.level),
                format: Some(defaults.logging.format),
            }),
        }
    }

    /// Convert to ScorerConfig, validating the merged values
    pub fn into_scorer_config(self) -> Result<ScorerConfig> {
        let sampling_defaults = SamplingConfig::default();
        let sampling = self.sampling.unwrap_or_default();
        let upload = self.upload.unwrap_or_default();
        let logging = self.logging.unwrap_or_default();
        let logging_defaults = LoggingConfig::default();

        let config = ScorerConfig {
            sampling: SamplingConfig {
                settle_delay_ms: sampling
                    .settle_delay_ms
                    .unwrap_or(sampling_defaults.settle_delay_ms),
                seek_timeout_ms: sampling
                    .seek_timeout_ms
                    .unwrap_or(sampling_defaults.seek_timeout_ms),
                scale_divisor: sampling
                    .scale_divisor
                    .unwrap_or(sampling_defaults.scale_divisor),
                jpeg_quality: sampling
                    .jpeg_quality
                    .unwrap_or(sampling_defaults.jpeg_quality),
                freshness_tolerance_secs: sampling
                    .freshness_tolerance_secs
                    .unwrap_or(sampling_defaults.freshness_tolerance_secs),
            },
            upload: UploadConfig {
                max_size_mb: upload
                    .max_size_mb
                    .unwrap_or(UploadConfig::default().max_size_mb),
            },
            logging: LoggingConfig {
                level: logging.level.unwrap_or(logging_defaults.level),
                format: logging.format.unwrap_or(logging_defaults.format),
            },
        };
        config.validate()?;
        Ok(config)
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    ConfigFile::default_config().to_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default_config();
        assert_eq!(config.sampling.unwrap().settle_delay_ms, Some(150));
        assert_eq!(config.upload.unwrap().max_size_mb, Some(100));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let config = ConfigFile::default_config();

        let mut temp_file = NamedTempFile::new().unwrap();
        let content = toml::to_string_pretty(&config).unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let loaded = ConfigFile::from_file(temp_file.path()).unwrap();
        let scorer = loaded.into_scorer_config().unwrap();
        assert_eq!(scorer.sampling.jpeg_quality, 85);
        assert_eq!(scorer.upload.max_size_mb, 100);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[sampling]\nsettle_delay_ms = 250\n\n[logging]\nformat = \"json\"\n")
            .unwrap();

        let config = ConfigFile::from_file(temp_file.path())
            .unwrap()
            .into_scorer_config()
            .unwrap();
        assert_eq!(config.sampling.settle_delay_ms, 250);
        assert_eq!(config.sampling.seek_timeout_ms, 5000);
        assert_eq!(config.upload.max_size_mb, 100);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[sampling]\nscale_divisor = 0\n")
            .unwrap();

        let result = ConfigFile::from_file(temp_file.path())
            .unwrap()
            .into_scorer_config();
        assert!(matches!(result, Err(ScoreError::Config(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[sampling\n").unwrap();
        assert!(matches!(
            ConfigFile::from_file(temp_file.path()),
            Err(ScoreError::Config(_))
        ));
    }

    #[test]
    fn test_generate_default_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        generate_default_config(&path).unwrap();

        assert!(path.exists());
        let loaded = ConfigFile::from_file(&path).unwrap();
        assert_eq!(loaded.logging.unwrap().level.as_deref(), Some("info"));
    }
}
