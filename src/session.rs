//! Analysis session
//!
//! Holds everything one user interaction needs between requests:
//! - Current mode (text or video)
//! - The loaded video handle and its file info
//! - Thumbnails from the last video analysis
//! - A generation counter that invalidates in-flight work

use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

use crate::analysis::{text, video, AnalysisResult};
use crate::config::ScorerConfig;
use crate::error::{Result, ScoreError};
use crate::media::VideoInfo;
use crate::sampler::{FrameSampler, FrameThumbnail, PlayableVideo};

/// Which input the session analyzes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Text,
    Video,
}

/// A video handle together with what was learned when loading it
pub struct LoadedVideo<V> {
    pub handle: V,
    pub info: VideoInfo,
}

/// Outcome of a video analysis
#[derive(Debug, Clone)]
pub struct VideoAnalysis {
    pub result: AnalysisResult,
    pub frames: Vec<FrameThumbnail>,
    pub info: VideoInfo,
}

/// Outcome of [`AnalysisSession::start_analysis`]
#[derive(Debug, Clone)]
pub enum Analysis {
    Text(AnalysisResult),
    Video(VideoAnalysis),
}

impl Analysis {
    pub fn result(&self) -> &AnalysisResult {
        match self {
            Analysis::Text(result) => result,
            Analysis::Video(analysis) => &analysis.result,
        }
    }
}

/// Invalidates the session's in-flight request from another task
#[derive(Debug, Clone)]
pub struct SessionCanceller {
    generation: Arc<watch::Sender<u64>>,
}

impl SessionCanceller {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            generation: Arc::new(tx),
        }
    }

    /// Supersede whatever request is currently running
    pub fn cancel(&self) {
        self.generation.send_modify(|g| *g += 1);
    }

    /// A ticket bound to the current generation
    pub fn ticket(&self) -> RequestTicket {
        let watcher = self.generation.subscribe();
        let generation = *watcher.borrow();
        RequestTicket {
            generation,
            watcher,
        }
    }

    fn generation(&self) -> u64 {
        *self.generation.borrow()
    }
}

impl Default for SessionCanceller {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that a request started under a given session generation
#[derive(Debug)]
pub struct RequestTicket {
    generation: u64,
    watcher: watch::Receiver<u64>,
}

impl RequestTicket {
    pub fn is_current(&self) -> bool {
        *self.watcher.borrow() == self.generation
    }

    /// Resolves once the session has moved past this ticket's generation.
    pub async fn superseded(&mut self) {
        let generation = self.generation;
        if self.watcher.wait_for(|g| *g != generation).await.is_err() {
            // Session dropped: nothing can supersede us any more
            std::future::pending::<()>().await;
        }
    }
}

/// Caller-owned analysis state
pub struct AnalysisSession<V> {
    mode: Mode,
    video: Option<LoadedVideo<V>>,
    frames: Vec<FrameThumbnail>,
    sampler: FrameSampler,
    canceller: SessionCanceller,
    max_upload_bytes: u64,
}

impl<V: PlayableVideo> AnalysisSession<V> {
    pub fn new(config: &ScorerConfig) -> Self {
        Self {
            mode: Mode::default(),
            video: None,
            frames: Vec::new(),
            sampler: FrameSampler::new(&config.sampling),
            canceller: SessionCanceller::new(),
            max_upload_bytes: config.upload.max_size_bytes(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch between text and video input. Any previous results are dropped.
    pub fn switch_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(?mode, "switching mode");
        }
        self.mode = mode;
        self.frames.clear();
    }

    pub fn video_info(&self) -> Option<&VideoInfo> {
        self.video.as_ref().map(|v| &v.info)
    }

    /// Thumbnails from the last completed video analysis
    pub fn frames(&self) -> &[FrameThumbnail] {
        &self.frames
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Handle for superseding the in-flight request from elsewhere
    pub fn canceller(&self) -> SessionCanceller {
        self.canceller.clone()
    }

    /// Replace the current video. The previous handle and anything still
    /// sampling from it are invalidated first.
    pub fn attach_video(&mut self, loaded: LoadedVideo<V>) -> &VideoInfo {
        self.invalidate();
        tracing::info!(
            file = %loaded.info.file_name,
            duration_secs = loaded.info.duration_secs,
            width = loaded.info.width,
            height = loaded.info.height,
            "video loaded"
        );
        &self.video.insert(loaded).info
    }

    /// Drop the current video and its thumbnails
    pub fn remove_video(&mut self) {
        if let Some(old) = self.video.as_ref() {
            tracing::info!(file = %old.info.file_name, "video removed");
        }
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.canceller.cancel();
        self.video = None;
        self.frames.clear();
    }

    /// Analyze whatever the current mode points at. `caption` is ignored in
    /// video mode.
    pub async fn start_analysis(&mut self, caption: &str) -> Result<Analysis> {
        match self.mode {
            Mode::Text => self.analyze_text(caption).map(Analysis::Text),
            Mode::Video => self.analyze_video().await.map(Analysis::Video),
        }
    }

    pub fn analyze_text(&mut self, caption: &str) -> Result<AnalysisResult> {
        let caption = caption.trim();
        if caption.is_empty() {
            return Err(ScoreError::EmptyInput);
        }

        let request_id = Uuid::new_v4();
        let _span = tracing::info_span!("analyze_text", %request_id).entered();
        let result = text::score(caption);
        tracing::info!(score = result.score, verdict = ?result.verdict, "text analyzed");
        Ok(result)
    }

    pub async fn analyze_video(&mut self) -> Result<VideoAnalysis> {
        if self.video.is_none() {
            return Err(ScoreError::NoVideoLoaded);
        }

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("analyze_video", %request_id);
        let mut ticket = self.canceller.ticket();
        let loaded = self.video.as_mut().ok_or(ScoreError::NoVideoLoaded)?;

        let frames = self
            .sampler
            .sample(&mut loaded.handle, &mut ticket)
            .instrument(span.clone())
            .await?;

        let _span = span.entered();
        let (width, height) = loaded.handle.dimensions();
        let result = video::score(loaded.handle.duration(), width, height);

        // Re-check: nothing from a superseded request may reach the session
        if !ticket.is_current() {
            return Err(ScoreError::Superseded);
        }

        self.frames = frames.clone();
        tracing::info!(
            score = result.score,
            verdict = ?result.verdict,
            thumbnails = frames.len(),
            "video analyzed"
        );

        Ok(VideoAnalysis {
            result,
            frames,
            info: loaded.info.clone(),
        })
    }

    /// Current generation, for diagnostics
    pub fn generation(&self) -> u64 {
        self.canceller.generation()
    }
}
