//! FFmpeg-backed playable video
//!
//! FFmpeg contexts are blocking and not meant to hop between threads, so each
//! `FfmpegVideo` owns a dedicated decoder thread. The async handle sends it
//! commands over a channel; every command answers on a oneshot, which doubles
//! as the "seek completed" signal. Dropping the handle closes the channel and
//! the thread winds down after its current command.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};

use ffmpeg_next as ffmpeg;

use super::probe::{self, pts_to_seconds, seconds_to_pts, StreamProbe};
use super::scaler::{encode_jpeg, FrameScaler};
use crate::error::{FfmpegError, Result, ScoreError};
use crate::sampler::{CaptureSpec, CapturedFrame, PlayableVideo};

/// Container-level seek timestamps are in microseconds
const AV_TIME_BASE_Q: ffmpeg::Rational = ffmpeg::Rational(1, ffmpeg::ffi::AV_TIME_BASE as i32);

/// Decoded frames this close to the target count as reaching it
const TARGET_EPSILON_SECS: f64 = 0.001;

enum Command {
    Seek {
        position: f64,
        reply: oneshot::Sender<Result<()>>,
    },
    Capture {
        spec: CaptureSpec,
        reply: oneshot::Sender<Result<CapturedFrame>>,
    },
}

/// Async handle to a video file decoded on its own thread
pub struct FfmpegVideo {
    commands: mpsc::UnboundedSender<Command>,
    probe: StreamProbe,
    position: f64,
}

impl FfmpegVideo {
    /// Open `path` and start its decoder thread.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (ready_tx, ready_rx) = oneshot::channel();
        let (commands, rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("reelscore-decoder".to_string())
            .spawn(move || match DecoderWorker::open(&path) {
                Ok(worker) => {
                    let probe = worker.probe.clone();
                    if ready_tx.send(Ok(probe)).is_ok() {
                        worker.run(rx);
                    }
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })?;

        let probe = ready_rx
            .await
            .map_err(|_| ScoreError::Ffmpeg(FfmpegError::WorkerGone))??;

        Ok(Self {
            commands,
            probe,
            position: 0.0,
        })
    }

    pub fn probe(&self) -> &StreamProbe {
        &self.probe
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .map_err(|_| ScoreError::Ffmpeg(FfmpegError::WorkerGone))?;
        response
            .await
            .map_err(|_| ScoreError::Ffmpeg(FfmpegError::WorkerGone))?
    }
}

#[async_trait]
impl PlayableVideo for FfmpegVideo {
    fn duration(&self) -> f64 {
        self.probe.duration_secs
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.probe.width, self.probe.height)
    }

    fn position(&self) -> f64 {
        self.position
    }

    async fn seek(&mut self, position: f64) -> Result<()> {
        self.request(|reply| Command::Seek { position, reply })
            .await?;
        self.position = position;
        Ok(())
    }

    async fn capture(&mut self, spec: &CaptureSpec) -> Result<CapturedFrame> {
        let spec = *spec;
        self.request(|reply| Command::Capture { spec, reply }).await
    }
}

/// Owns the FFmpeg state; lives entirely on the decoder thread
struct DecoderWorker {
    path: PathBuf,
    input: ffmpeg::format::context::Input,
    decoder: ffmpeg::decoder::Video,
    probe: StreamProbe,
    time_base: ffmpeg::Rational,
    start_secs: f64,
    current: Option<(ffmpeg::util::frame::Video, f64)>,
    scaler: Option<FrameScaler>,
}

impl DecoderWorker {
    fn open(path: &Path) -> Result<Self> {
        crate::media::init()?;

        let input = ffmpeg::format::input(&path)
            .map_err(|e| FfmpegError::OpenInput(format!("Failed to open {:?}: {}", path, e)))?;
        let probe = probe::probe_input(&input)?;

        let (decoder, time_base, start_secs) = {
            let stream = input
                .stream(probe.stream_index)
                .ok_or(ScoreError::NoVideoStream)?;
            let context = ffmpeg::codec::Context::from_parameters(stream.parameters())
                .map_err(|e| {
                    FfmpegError::DecoderCreate(format!(
                        "codec context for stream {}: {}",
                        probe.stream_index, e
                    ))
                })?;
            let decoder = context.decoder().video().map_err(|e| {
                FfmpegError::DecoderCreate(format!(
                    "video decoder for stream {}: {}",
                    probe.stream_index, e
                ))
            })?;

            let time_base = stream.time_base();
            let mut start_time = stream.start_time();
            if start_time == i64::MIN {
                // AV_NOPTS_VALUE
                start_time = 0;
            }
            (decoder, time_base, pts_to_seconds(start_time, time_base))
        };

        tracing::info!(
            "Opened {:?}: {}x{}, {:.2}s, codec={}",
            path,
            probe.width,
            probe.height,
            probe.duration_secs,
            probe.codec
        );

        Ok(Self {
            path: path.to_path_buf(),
            input,
            decoder,
            probe,
            time_base,
            start_secs,
            current: None,
            scaler: None,
        })
    }

    fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = commands.blocking_recv() {
            match command {
                Command::Seek { position, reply } => {
                    let _ = reply.send(self.seek(position));
                }
                Command::Capture { spec, reply } => {
                    let _ = reply.send(self.capture(&spec));
                }
            }
        }
        tracing::debug!("Decoder thread for {:?} exiting", self.path);
    }

    /// Seek to the keyframe before `position`, then decode forward to the
    /// first frame at or after it. At end of stream the last decoded frame
    /// stays current.
    fn seek(&mut self, position: f64) -> Result<()> {
        let seek_ts = seconds_to_pts(self.start_secs + position, AV_TIME_BASE_Q);
        self.input.seek(seek_ts, ..seek_ts).map_err(|e| {
            FfmpegError::Seek(format!("seek to {:.3}s in {:?}: {}", position, self.path, e))
        })?;
        self.decoder.flush();
        self.current = None;

        let stream_index = self.probe.stream_index;
        let mut reached = false;
        for (stream, packet) in self.input.packets() {
            if stream.index() != stream_index {
                continue;
            }
            match self.decoder.send_packet(&packet) {
                Ok(()) => {}
                Err(ffmpeg::Error::InvalidData) => {
                    tracing::debug!(stream_index, "send_packet: skipping invalid packet");
                    continue;
                }
                Err(e) => {
                    return Err(FfmpegError::DecodePacket(format!(
                        "send_packet on stream {}: {}",
                        stream_index, e
                    ))
                    .into())
                }
            }
            if receive_until(
                &mut self.decoder,
                self.time_base,
                self.start_secs,
                position,
                &mut self.current,
            )? {
                reached = true;
                break;
            }
        }

        if !reached {
            // EOF and EAGAIN only mean there is nothing left to flush
            let _ = self.decoder.send_eof();
            receive_until(
                &mut self.decoder,
                self.time_base,
                self.start_secs,
                position,
                &mut self.current,
            )?;
        }

        match &self.current {
            Some((_, secs)) => {
                tracing::debug!(position, frame_secs = secs, "seek completed");
                Ok(())
            }
            None => Err(FfmpegError::NoFrame.into()),
        }
    }

    fn capture(&mut self, spec: &CaptureSpec) -> Result<CapturedFrame> {
        let (frame, presented_at) = self
            .current
            .as_ref()
            .ok_or(ScoreError::Ffmpeg(FfmpegError::NoFrame))?;
        let (width, height) = spec.target_size(frame.width(), frame.height());

        let scaler = match self.scaler.take() {
            Some(scaler) if scaler.fits(frame, width, height) => scaler,
            _ => FrameScaler::new(frame, width, height)?,
        };
        let scaler = self.scaler.insert(scaler);

        let rgb = scaler.to_rgb(frame)?;
        let jpeg = encode_jpeg(&rgb, width, height, spec.jpeg_quality)?;

        Ok(CapturedFrame {
            jpeg,
            width,
            height,
            presented_at: Some(*presented_at),
        })
    }
}

/// Drain decoded frames into `current` until one reaches `target` seconds.
/// Returns whether the target was reached.
fn receive_until(
    decoder: &mut ffmpeg::decoder::Video,
    time_base: ffmpeg::Rational,
    start_secs: f64,
    target: f64,
    current: &mut Option<(ffmpeg::util::frame::Video, f64)>,
) -> Result<bool> {
    loop {
        let mut frame = ffmpeg::util::frame::Video::empty();
        match decoder.receive_frame(&mut frame) {
            Ok(()) => {
                let pts = frame.timestamp().or(frame.pts()).unwrap_or(0);
                let secs = pts_to_seconds(pts, time_base) - start_secs;
                *current = Some((frame, secs));
                if secs + TARGET_EPSILON_SECS >= target {
                    return Ok(true);
                }
            }
            Err(ffmpeg::Error::Other { errno }) if errno == ffmpeg::error::EAGAIN => {
                return Ok(false)
            }
            Err(ffmpeg::Error::Eof) => return Ok(false),
            Err(e) => {
                return Err(FfmpegError::DecodePacket(format!("receive_frame: {}", e)).into())
            }
        }
    }
}
