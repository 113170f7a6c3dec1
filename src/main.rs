//! reelscore command line
//!
//! Scores a caption or a video file and prints the report.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelscore::config::LoggingConfig;
use reelscore::config_file::{generate_default_config, ConfigFile};
use reelscore::samples::{sample_caption, SAMPLE_CAPTIONS};
use reelscore::session::{Analysis, Mode};
use reelscore::{media, FfmpegSession, MediaUpload, Report, Result, ScoreError, ScorerConfig};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_PATH: &str = "reelscore.toml";

#[derive(Parser, Debug)]
#[command(name = "reelscore")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a caption or video script
    Text {
        /// Caption text
        caption: Option<String>,

        /// Use a built-in example caption (1-3)
        #[arg(short, long, conflicts_with = "caption")]
        example: Option<usize>,
    },
    /// Score a video file and sample its hook frames
    Video {
        /// Video file
        path: PathBuf,

        /// Write hook thumbnails into this directory
        #[arg(long)]
        frames_dir: Option<PathBuf>,

        /// Embed thumbnails as data URLs in the report
        #[arg(long)]
        inline_frames: bool,
    },
    /// Write a default configuration file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let (config, config_error) = load_config(args.config.as_deref());
    init_logging(&config.logging);
    tracing::debug!("reelscore v{} starting", VERSION);
    if let Some((path, e)) = config_error {
        tracing::warn!(
            "Failed to load config file {:?}: {}. Using defaults.",
            path,
            e
        );
    }

    if let Err(e) = run(args, config).await {
        if e.is_user_facing() {
            eprintln!("{}", e);
        } else {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
        }
        std::process::exit(1);
    }
}

async fn run(args: Args, config: ScorerConfig) -> Result<()> {
    let mut session = FfmpegSession::new(&config);

    let (analysis, frames_dir, inline_frames) = match args.command {
        Command::InitConfig { path } => {
            generate_default_config(&path)?;
            println!("Wrote default configuration to {}", path.display());
            return Ok(());
        }
        Command::Text { caption, example } => {
            let caption = match (caption, example) {
                (Some(caption), _) => caption,
                (None, Some(n)) => sample_caption(n)
                    .ok_or_else(|| {
                        ScoreError::Config(format!(
                            "example must be between 1 and {}",
                            SAMPLE_CAPTIONS.len()
                        ))
                    })?
                    .to_string(),
                (None, None) => String::new(),
            };
            session.switch_mode(Mode::Text);
            (session.start_analysis(&caption).await?, None, false)
        }
        Command::Video {
            path,
            frames_dir,
            inline_frames,
        } => {
            media::init()?;
            tracing::debug!("FFmpeg version: {}", media::ffmpeg::util::version());

            let upload = MediaUpload::from_path(&path)?;
            session.switch_mode(Mode::Video);
            session.open_upload(&upload).await?;
            (session.start_analysis("").await?, frames_dir, inline_frames)
        }
    };

    if let (Some(dir), Analysis::Video(video)) = (&frames_dir, &analysis) {
        write_frames(dir, &video.frames)?;
    }

    let report = Report::new(&analysis, inline_frames);
    if args.json {
        let json = report
            .to_json()
            .map_err(|e| ScoreError::Config(format!("serializing report: {}", e)))?;
        println!("{}", json);
    } else {
        print!("{}", report);
    }
    Ok(())
}

/// Resolve and load the configuration; failures fall back to defaults and are
/// returned so they can be logged once logging is up.
fn load_config(explicit: Option<&Path>) -> (ScorerConfig, Option<(PathBuf, ScoreError)>) {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => PathBuf::from(DEFAULT_CONFIG_PATH),
        None => return (ScorerConfig::default(), None),
    };

    match ConfigFile::from_file(&path).and_then(ConfigFile::into_scorer_config) {
        Ok(config) => (config, None),
        Err(e) => (ScorerConfig::default(), Some((path, e))),
    }
}

fn write_frames(dir: &Path, frames: &[reelscore::FrameThumbnail]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    for (index, frame) in frames.iter().enumerate() {
        let path = dir.join(frame.file_name(index));
        std::fs::write(&path, &frame.jpeg)?;
        tracing::info!("Wrote {}", path.display());
    }
    Ok(())
}

/// Initialize logging with tracing
fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("reelscore={}", logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_text_example() {
        let args = Args::try_parse_from(["reelscore", "--json", "text", "--example", "2"]).unwrap();
        assert!(args.json);
        assert!(matches!(
            args.command,
            Command::Text {
                caption: None,
                example: Some(2)
            }
        ));
        assert!(Args::try_parse_from(["reelscore", "text", "hi", "--example", "1"]).is_err());
    }

    #[test]
    fn test_parse_video() {
        let args = Args::try_parse_from([
            "reelscore",
            "video",
            "clip.mp4",
            "--frames-dir",
            "out",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
        match args.command {
            Command::Video {
                path,
                frames_dir,
                inline_frames,
            } => {
                assert_eq!(path, PathBuf::from("clip.mp4"));
                assert_eq!(frames_dir, Some(PathBuf::from("out")));
                assert!(!inline_frames);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_load_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[sampling]\nscale_divisor = 0\n").unwrap();

        let (config, error) = load_config(Some(&path));
        assert_eq!(config.sampling.scale_divisor, 3);
        assert!(matches!(error, Some((_, ScoreError::Config(_)))));

        let missing = dir.path().join("missing.toml");
        let (_, error) = load_config(Some(&missing));
        assert!(error.is_some());
    }
}
