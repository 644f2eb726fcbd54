//! Pitch Region Editor
//!
//! Command-line front end for the pitch processing server.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pitch_region_editor::constants::DEFAULT_SHIFT_SEMITONES;
use pitch_region_editor::core::history_store::JsonFileHistoryStore;
use pitch_region_editor::providers::{PitchServerClient, TaskBackend};
use pitch_region_editor::state::{
    AutoProcessOptions, DownloadKind, NewProjectRecord, PitchDirection, ProcessingMode,
    ProjectHistory,
};
use pitch_region_editor::timeline::{HeadlessSurface, HeadlessVideo, SurfaceEvent};
use pitch_region_editor::utils::{format_duration, format_time, validate_media_file};
use pitch_region_editor::{EditorConfig, EditorSession, JobCoordinator, JobSnapshot, Result};

#[derive(Parser)]
#[command(name = "pitch-editor")]
#[command(about = "Upload, edit and track pitch correction jobs")]
struct Cli {
    /// Processing server base URL (overrides config and environment)
    #[arg(long, global = true)]
    server: Option<String>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Ai,
    Simple,
    Precision,
}

impl From<ModeArg> for ProcessingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Ai => ProcessingMode::Ai,
            ModeArg::Simple => ProcessingMode::Simple,
            ModeArg::Precision => ProcessingMode::Precision,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Video,
    Audio,
}

impl From<KindArg> for DownloadKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Video => DownloadKind::Video,
            KindArg::Audio => DownloadKind::Audio,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file for automatic detection and shifting, then wait for it
    Process {
        file: PathBuf,

        #[arg(long, value_enum, default_value = "ai")]
        mode: ModeArg,

        /// Semitones applied to detected segments
        #[arg(long, default_value = "-3", allow_hyphen_values = true)]
        pitch: f64,

        #[arg(long)]
        no_double_check: bool,
    },
    /// Upload a file for manual editing and print its task id
    Edit { file: PathBuf },
    /// Submit manual regions from a JSON file and wait for the job
    Apply { task_id: String, regions: PathBuf },
    /// Show the status of a task
    Status { task_id: String },
    /// Download a finished result
    Download {
        task_id: String,

        #[arg(long, value_enum, default_value = "video")]
        kind: KindArg,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List recent processing runs
    History {
        #[arg(long)]
        clear: bool,
    },
}

/// One entry of the regions file passed to `apply`.
#[derive(Debug, Deserialize)]
struct RegionEdit {
    start: f64,
    end: f64,
    direction: PitchDirection,
    #[serde(default = "default_shift")]
    shift: f32,
}

fn default_shift() -> f32 {
    DEFAULT_SHIFT_SEMITONES
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match cli.config.as_deref() {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    }
    .with_env_overrides();
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    let client = PitchServerClient::new(config.server_url.clone());

    match cli.command {
        Commands::Process {
            file,
            mode,
            pitch,
            no_double_check,
        } => {
            validate_media_file(&file)?;
            let options = AutoProcessOptions {
                mode: mode.into(),
                pitch,
                double_check: !no_double_check,
            };
            let jobs = JobCoordinator::new(client, config.poll_interval());
            let printer = spawn_progress_printer(jobs.subscribe());
            let result = jobs.process_upload(&file, &options).await;
            printer.abort();
            let outcome = result?;

            let mut history = open_history(&config);
            history.add(NewProjectRecord {
                filename: display_name(&file),
                task_id: outcome.task_id.clone(),
                mode: options.mode,
                pitch_shift: options.pitch,
                status: outcome.status.status.clone(),
            })?;
            println!("{}", outcome.task_id);
        }
        Commands::Edit { file } => {
            let mut session = EditorSession::new(
                HeadlessSurface::new(),
                HeadlessVideo::default(),
                client,
                &config,
            );
            let task_id = session.upload_for_editing(&file).await?;
            println!("{}", task_id);
        }
        Commands::Apply { task_id, regions } => {
            let edits: Vec<RegionEdit> = serde_json::from_str(&tokio::fs::read_to_string(&regions).await?)?;
            let mut session = EditorSession::new(
                HeadlessSurface::new(),
                HeadlessVideo::default(),
                client,
                &config,
            );
            session.load_task(&task_id).await;
            for edit in &edits {
                session.handle_surface_event(SurfaceEvent::SelectionDrawn {
                    start: edit.start,
                    end: edit.end,
                });
                session.add_region(edit.direction, edit.shift)?;
            }
            info!(task_id = %task_id, regions = edits.len(), "Regions staged");

            let printer = spawn_progress_printer(session.jobs().subscribe());
            let result = session.apply_regions().await;
            printer.abort();
            let outcome = result?;
            println!("{}", outcome.task_id);
        }
        Commands::Status { task_id } => {
            let status = client.fetch_status(&task_id).await?;
            println!("{:?} {:.0}% {}", status.status, status.progress, status.display_message());
            for entry in status.logs.unwrap_or_default() {
                println!("  [{:?}] {}", entry.level, entry.message);
            }
            for segment in status.processed_segments.unwrap_or_default() {
                println!(
                    "  segment {} - {} [{}] {:+} st",
                    format_time(segment.start),
                    format_time(segment.end),
                    format_duration(segment.end - segment.start),
                    segment.pitch
                );
            }
        }
        Commands::Download {
            task_id,
            kind,
            output,
        } => {
            let kind = DownloadKind::from(kind);
            let dest = output.unwrap_or_else(|| default_download_path(&task_id, kind));
            let bytes = client.download(&task_id, kind, &dest).await?;
            println!("{} ({} bytes)", dest.display(), bytes);
        }
        Commands::History { clear } => {
            let mut history = open_history(&config);
            if clear {
                history.clear()?;
                println!("History cleared");
                return Ok(());
            }
            for record in history.records() {
                println!(
                    "{}  {}  {:?}  {:+}  {:?}  {}",
                    record.created_at.format("%Y-%m-%d %H:%M"),
                    record.task_id,
                    record.mode,
                    record.pitch_shift,
                    record.status,
                    record.filename
                );
            }
        }
    }
    Ok(())
}

fn open_history(config: &EditorConfig) -> ProjectHistory<JsonFileHistoryStore> {
    ProjectHistory::open(JsonFileHistoryStore::new(config.history_file()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn default_download_path(task_id: &str, kind: DownloadKind) -> PathBuf {
    let extension = match kind {
        DownloadKind::Video => "mp4",
        DownloadKind::Audio => "wav",
    };
    PathBuf::from(format!("{}_processed.{}", task_id, extension))
}

fn spawn_progress_printer(mut rx: watch::Receiver<JobSnapshot>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            eprintln!("{:?} {:>3.0}% {}", snapshot.phase, snapshot.progress, snapshot.message);
        }
    })
}
