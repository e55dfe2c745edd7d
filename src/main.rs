// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use bytes::Bytes;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::PathBuf;

use subgen::app_config::{Config, LogLevel};
use subgen::app_controller::Controller;
use subgen::backends::{BackendCredential, BackendKind};
use subgen::file_utils::FileManager;
use subgen::language_utils;
use subgen::subtitle_processor::SubtitleTrack;
use subgen::transcription::TranscriptionOptions;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for BackendKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliService {
    GoogleFree,
    Libre,
    Azure,
}

impl From<CliService> for BackendKind {
    fn from(cli_service: CliService) -> Self {
        match cli_service {
            CliService::GoogleFree => BackendKind::GoogleFree,
            CliService::Libre => BackendKind::Libre,
            CliService::Azure => BackendKind::Azure,
        }
    }
}

/// Which generation artifacts to write
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormat {
    Srt,
    Vtt,
    Json,
    All,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate subtitle tracks from an audio or video file
    Generate(GenerateArgs),

    /// Translate an existing SRT track into other languages
    Translate(TranslateArgs),

    /// Generate shell completions for subgen
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input audio or video file to transcribe
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// API key for the transcription service
    #[arg(short, long, env = "ELEVENLABS_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Language of the audio (name or ISO code); autodetected if omitted
    #[arg(short, long)]
    language: Option<String>,

    /// Estimated number of distinct speakers
    #[arg(short, long)]
    num_speakers: Option<u32>,

    /// Disable speaker diarization
    #[arg(long)]
    no_diarize: bool,

    /// Disable audio event tagging (laughter, applause, ...)
    #[arg(long)]
    no_audio_events: bool,

    /// Treat the input as video and extract its audio stream first
    #[arg(long)]
    video: bool,

    /// Artifacts to write next to the input file
    #[arg(short, long, value_enum, default_value = "all")]
    format: OutputFormat,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input SRT file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Target languages (names or codes)
    #[arg(short, long, required = true, num_args = 1..)]
    languages: Vec<String>,

    /// Translation service to use
    #[arg(short, long, value_enum)]
    service: Option<CliService>,

    /// API key for credentialed services
    #[arg(long, env = "AZURE_TRANSLATOR_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Service region for credentialed services
    #[arg(long, env = "AZURE_TRANSLATOR_REGION")]
    region: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subgen - subtitle generation and translation
///
/// Generates subtitle tracks from speech transcriptions and translates them
/// into other languages while preserving cue timing and speaker labels.
#[derive(Parser, Debug)]
#[command(name = "subgen")]
#[command(version = "1.0.0")]
#[command(about = "Subtitle generation and structure-preserving translation")]
#[command(long_about = "subgen transcribes audio or video files into timed subtitle tracks and \
translates existing tracks into other languages.

EXAMPLES:
    subgen generate talk.mp3                         # Transcribe and write talk.srt/.vtt/.json
    subgen generate -l Spanish --video clip.mp4      # Extract audio, transcribe Spanish speech
    subgen translate talk.srt -l Spanish French      # Translate into two languages
    subgen translate talk.srt -s azure -l German     # Use the credentialed service
    subgen completions bash > subgen.bash            # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. Missing files fall back to built-in defaults.

SUPPORTED SERVICES:
    google-free - generic public translation endpoint (default)
    libre       - open alternative with multiple fallback endpoints
    azure       - commercial service (requires API key and region)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subgen", &mut std::io::stdout());
            Ok(())
        }
        Commands::Generate(args) => run_generate(args).await,
        Commands::Translate(args) => run_translate(args).await,
    }
}

/// Apply the effective log level from CLI override or config
fn apply_log_level(cli_level: Option<CliLogLevel>, config: &Config) {
    let level = match cli_level {
        Some(level) => LogLevel::from(level),
        None => config.log_level.clone(),
    };
    log::set_max_level(level.to_level_filter());
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = Config::load_or_default(&args.config_path)?;
    apply_log_level(args.log_level.clone(), &config);

    if !FileManager::file_exists(&args.input_path) {
        return Err(anyhow!("Input file not found: {}", args.input_path.display()));
    }

    // Resolve the audio language to the ISO code the service expects
    let language_code = match &args.language {
        Some(language) => match language_utils::transcription_language_code(language) {
            Ok(code) => Some(code),
            Err(e) => {
                warn!("{}; falling back to automatic language detection", e);
                None
            }
        },
        None => None,
    };

    let options = TranscriptionOptions {
        language_code,
        num_speakers: args.num_speakers,
        diarize: !args.no_diarize,
        tag_audio_events: !args.no_audio_events,
    };

    let controller = Controller::with_config(config)?;
    let media_bytes = Bytes::from(FileManager::read_bytes(&args.input_path)?);

    let output = controller
        .generate_subtitles(media_bytes, &args.api_key, &options, args.video)
        .await?;

    if output.track.is_empty() {
        warn!("Transcript contained no words; the emitted tracks are empty");
    }

    let (srt, vtt, json) = match args.format {
        OutputFormat::Srt => (true, false, false),
        OutputFormat::Vtt => (false, true, false),
        OutputFormat::Json => (false, false, true),
        OutputFormat::All => (true, true, true),
    };

    let written = controller.write_generation_outputs(&args.input_path, &output, srt, vtt, json)?;
    for path in &written {
        info!("Wrote {}", path.display());
    }

    Ok(())
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let mut config = Config::load_or_default(&args.config_path)?;
    apply_log_level(args.log_level.clone(), &config);

    if let Some(service) = args.service {
        config.translation.service = service.into();
    }

    let content = FileManager::read_string(&args.input_path)?;
    let source = SubtitleTrack::parse_srt_string(&content);
    if source.is_empty() {
        return Err(anyhow!(
            "No valid cues found in {}",
            args.input_path.display()
        ));
    }
    info!("Parsed {} cues from {}", source.len(), args.input_path.display());

    let credential = args.api_key.map(|api_key| BackendCredential {
        api_key,
        region: args
            .region
            .unwrap_or_else(|| config.translation.region.clone()),
    });

    let controller = Controller::with_config(config)?;
    let results = controller
        .translate_track(&source, &args.languages, credential)
        .await?;

    let written = controller.write_translation_outputs(&args.input_path, &results)?;
    for path in &written {
        info!("Wrote {}", path.display());
    }

    let success_count = results.iter().filter(|r| r.is_success()).count();
    info!(
        "Translation completed for {} of {} languages",
        success_count,
        results.len()
    );

    // Per-language failures are reported above; only a fully failed run is
    // an error exit.
    if success_count == 0 {
        return Err(anyhow!("Translation failed for every requested language"));
    }

    Ok(())
}
