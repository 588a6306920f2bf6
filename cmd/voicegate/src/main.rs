//! voicegate - voice-gated command capture CLI.

mod source;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use voicegate_capture::{
    CaptureOutcome, CaptureSession, HttpTranscriber, RecognitionError, Recorder,
    SessionConfig, Transcriber, DEFAULT_PROMPTS,
};
use voicegate_kv::RedbStore;
use voicegate_vad::{
    EnergyDetector, EnergyWindowClassifier, SpeechDetector, WindowedDetector,
    DEFAULT_ENERGY_THRESHOLD,
};
use voicegate_voiceprint::{
    AudioBuffer, ProfileStore, ProfileStoreConfig, SpectralModel, VoiceprintModel,
    DEFAULT_PROFILE_ID, DEFAULT_THRESHOLD,
};

/// Voice-gated command capture.
///
/// Captures audio, verifies the speaker against an enrolled voice profile,
/// and transcribes accepted commands. Until a profile is enrolled the gate
/// is open and every speaker passes.
///
/// Audio files are 16kHz mono: raw signed 16-bit little-endian PCM, or a
/// canonical-header WAV of the same encoding.
#[derive(Parser)]
#[command(name = "voicegate")]
#[command(about = "Voice-gated command capture")]
#[command(version)]
struct Cli {
    /// Profile database file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Profile identifier
    #[arg(long, global = true, default_value = DEFAULT_PROFILE_ID)]
    profile: String,

    /// Speaker acceptance threshold in (0, 1)
    #[arg(long, global = true, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Speech detection strategy
    #[arg(long, global = true, value_enum, default_value_t = VadStrategy::Energy)]
    vad: VadStrategy,

    /// RMS threshold for speech detection
    #[arg(long, global = true, default_value_t = DEFAULT_ENERGY_THRESHOLD)]
    energy_threshold: f32,

    /// Transcription endpoint accepting WAV POSTs (omit to skip transcription)
    #[arg(long, global = true)]
    transcribe_url: Option<String>,

    /// Capture window length in seconds
    #[arg(long, global = true, default_value_t = 4.0)]
    listen_secs: f32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VadStrategy {
    /// Full-buffer RMS threshold
    Energy,
    /// Per-window classification with a minimum speech ratio
    Windowed,
}

#[derive(Subcommand)]
enum Commands {
    /// Enroll a voice profile from sample recordings (at least two)
    Enroll {
        /// One audio file per enrollment sample
        files: Vec<PathBuf>,
    },
    /// Run one capture cycle on an audio file
    Listen {
        /// Audio file to process
        file: PathBuf,
    },
    /// Run capture cycles continuously, reading one audio file path per
    /// line from stdin, until Ctrl+C or end of input
    Run,
    /// Delete the enrolled voice profile
    Reset,
    /// Show profile status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Enroll { files } => enroll(&cli, files),
        Commands::Listen { file } => listen(&cli, file),
        Commands::Run => run(&cli).await,
        Commands::Reset => reset(&cli),
        Commands::Status => status(&cli),
    }
}

fn enroll(cli: &Cli, files: &[PathBuf]) -> Result<()> {
    if files.len() < 2 {
        bail!("enrollment needs at least two sample recordings");
    }

    let prompts: Vec<String> = (0..files.len())
        .map(|i| match DEFAULT_PROMPTS.get(i) {
            Some(p) => p.to_string(),
            None => format!("Enrollment sample {}", i + 1),
        })
        .collect();

    let session = build_session(
        cli,
        Box::new(source::FileSource::new(files.iter().cloned())),
        Some(prompts),
    )?;

    if session.enroll()? {
        println!("Voice profile enrolled from {} samples.", files.len());
    } else {
        bail!("enrollment failed: not enough usable samples, profile unchanged");
    }
    Ok(())
}

fn listen(cli: &Cli, file: &PathBuf) -> Result<()> {
    let session = build_session(
        cli,
        Box::new(source::FileSource::new([file.clone()])),
        None,
    )?;
    let outcome = session.listen_once()?;
    print_outcome(&outcome);
    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let cancel = Arc::new(AtomicBool::new(false));
    let session = build_session(
        cli,
        Box::new(source::StdinSource::new(Arc::clone(&cancel))),
        None,
    )?;

    if !session.trained() {
        println!("No voice profile enrolled; accepting all speakers.");
    }
    println!("Reading audio file paths from stdin; Ctrl+C to stop.");

    {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    tokio::task::spawn_blocking(move || {
        session.run_continuous(&cancel, |outcome| print_outcome(&outcome));
    })
    .await?;
    Ok(())
}

fn reset(cli: &Cli) -> Result<()> {
    let store = open_profile_store(cli)?;
    store.reset()?;
    println!("Voice profile deleted.");
    Ok(())
}

fn status(cli: &Cli) -> Result<()> {
    let store = open_profile_store(cli)?;
    println!("Profile:   {}", cli.profile);
    println!("Store:     {}", store_path(cli)?.display());
    println!("Threshold: {}", store.threshold());
    match store.dimension() {
        Some(dim) => println!("Trained:   yes (dimension {dim})"),
        None => println!("Trained:   no"),
    }
    Ok(())
}

fn print_outcome(outcome: &CaptureOutcome) {
    match outcome {
        CaptureOutcome::Silent => println!("[silent]"),
        CaptureOutcome::Rejected { score } => {
            println!("[rejected] speaker score {score:.3}");
        }
        CaptureOutcome::Report { text: Some(text) } => println!("> {text}"),
        CaptureOutcome::Report { text: None } => println!("[no words recognized]"),
    }
}

fn store_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(path) = &cli.store {
        return Ok(path.clone());
    }
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join(".voicegate").join("profile.redb"))
}

fn open_profile_store(cli: &Cli) -> Result<Arc<ProfileStore>> {
    let path = store_path(cli)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let storage = RedbStore::open(&path)
        .with_context(|| format!("opening profile store {}", path.display()))?;
    let store = ProfileStore::new(
        Box::new(storage),
        ProfileStoreConfig {
            profile_id: cli.profile.clone(),
            threshold: cli.threshold,
        },
    )?;
    store.load()?;
    Ok(Arc::new(store))
}

fn build_detector(cli: &Cli) -> Box<dyn SpeechDetector> {
    match cli.vad {
        VadStrategy::Energy => Box::new(EnergyDetector::new(cli.energy_threshold)),
        VadStrategy::Windowed => Box::new(WindowedDetector::new(Box::new(
            EnergyWindowClassifier::new(cli.energy_threshold),
        ))),
    }
}

fn build_session(
    cli: &Cli,
    recorder: Box<dyn Recorder>,
    prompts: Option<Vec<String>>,
) -> Result<CaptureSession> {
    let store = open_profile_store(cli)?;
    let model: Arc<dyn VoiceprintModel> = Arc::new(SpectralModel::new());

    let transcriber: Box<dyn Transcriber> = match &cli.transcribe_url {
        Some(url) => Box::new(HttpTranscriber::new(url.clone())),
        None => Box::new(NullTranscriber),
    };

    let mut cfg = SessionConfig {
        listen_secs: cli.listen_secs,
        enroll_secs: cli.listen_secs,
        ..SessionConfig::default()
    };
    if let Some(prompts) = prompts {
        cfg.prompts = prompts;
    }

    Ok(CaptureSession::new(
        recorder,
        build_detector(cli),
        Some(model),
        transcriber,
        store,
        cfg,
    ))
}

/// Stand-in when no transcription endpoint is configured: accepted audio
/// produces a report with no text.
struct NullTranscriber;

impl Transcriber for NullTranscriber {
    fn transcribe(&self, _audio: &AudioBuffer) -> Result<Option<String>, RecognitionError> {
        Ok(None)
    }
}
