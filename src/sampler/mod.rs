//! Hook frame sampling
//!
//! Captures still thumbnails from the opening seconds of a video:
//! - Fixed timestamps, strictly serialized seek → capture → settle
//! - Timestamps at or past the end of the video are skipped
//! - Bounded wait per timestamp; a stuck seek costs one thumbnail
//! - Stops as soon as the owning request is superseded

pub mod thumbnail;

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::config::SamplingConfig;
use crate::error::{Result, ScoreError};
use crate::session::RequestTicket;

pub use thumbnail::{CaptureSpec, CapturedFrame, FrameThumbnail};

/// Seconds into the video at which hook thumbnails are taken
pub const HOOK_TIMESTAMPS: [f64; 3] = [0.0, 1.0, 3.0];

/// A video that can be positioned and captured
#[async_trait]
pub trait PlayableVideo: Send {
    /// Total duration in seconds
    fn duration(&self) -> f64;

    /// Native (width, height) in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Current playback position in seconds
    fn position(&self) -> f64;

    /// Move to `position` seconds. Resolves once the seek has completed.
    async fn seek(&mut self, position: f64) -> Result<()>;

    /// Capture the currently displayed frame as JPEG.
    async fn capture(&mut self, spec: &CaptureSpec) -> Result<CapturedFrame>;
}

/// Samples hook thumbnails from a [`PlayableVideo`]
#[derive(Debug, Clone)]
pub struct FrameSampler {
    settle_delay: Duration,
    seek_timeout: Duration,
    freshness_tolerance_secs: f64,
    capture: CaptureSpec,
}

impl FrameSampler {
    pub fn new(config: &SamplingConfig) -> Self {
        Self {
            settle_delay: config.settle_delay(),
            seek_timeout: config.seek_timeout(),
            freshness_tolerance_secs: config.freshness_tolerance_secs,
            capture: CaptureSpec {
                scale_divisor: config.scale_divisor,
                jpeg_quality: config.jpeg_quality,
            },
        }
    }

    /// Sample [`HOOK_TIMESTAMPS`] from `video`.
    ///
    /// Returns a fresh sequence in timestamp order. Fails only with
    /// [`ScoreError::Superseded`] when `ticket` stops being current; in that
    /// case no partial sequence escapes.
    pub async fn sample<V>(
        &self,
        video: &mut V,
        ticket: &mut RequestTicket,
    ) -> Result<Vec<FrameThumbnail>>
    where
        V: PlayableVideo + ?Sized,
    {
        let duration = video.duration();
        let mut frames = Vec::with_capacity(HOOK_TIMESTAMPS.len());

        for (index, &timestamp) in HOOK_TIMESTAMPS.iter().enumerate() {
            if timestamp >= duration {
                tracing::debug!(timestamp, duration, "skipping timestamp past end of video");
                continue;
            }

            let attempt = tokio::select! {
                biased;
                _ = ticket.superseded() => return Err(ScoreError::Superseded),
                r = timeout(self.seek_timeout, self.seek_and_capture(video, timestamp)) => r,
            };

            let frame = match attempt {
                Ok(Ok(frame)) => frame,
                Ok(Err(e)) => {
                    tracing::warn!(timestamp, "skipping thumbnail: {}", e);
                    continue;
                }
                Err(_) => {
                    tracing::warn!(
                        timestamp,
                        timeout_ms = self.seek_timeout.as_millis() as u64,
                        "skipping thumbnail: seek did not complete in time"
                    );
                    continue;
                }
            };

            let fresh = frame.is_fresh_for(timestamp, self.freshness_tolerance_secs);
            tracing::debug!(
                index,
                timestamp,
                position = video.position(),
                bytes = frame.jpeg.len(),
                fresh,
                "captured thumbnail"
            );
            frames.push(FrameThumbnail::new(timestamp, frame));

            // Some backends hand back the previous frame right after signalling
            // seek completion. Frames with a verified presentation time skip it.
            if !fresh {
                tokio::select! {
                    biased;
                    _ = ticket.superseded() => return Err(ScoreError::Superseded),
                    _ = sleep(self.settle_delay) => {}
                }
            }
        }

        if !ticket.is_current() {
            return Err(ScoreError::Superseded);
        }
        Ok(frames)
    }

    async fn seek_and_capture<V>(&self, video: &mut V, timestamp: f64) -> Result<CapturedFrame>
    where
        V: PlayableVideo + ?Sized,
    {
        video.seek(timestamp).await?;
        video.capture(&self.capture).await
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new(&SamplingConfig::default())
    }
}
