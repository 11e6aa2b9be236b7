use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use voice_verify::error::ErrorCode;
use voice_verify::{AppConfig, DetectionPipeline, Language, LanguageHint};

/// Exit code for payloads the pipeline rejected
const EXIT_INGESTION_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "voice_verify_cli",
    about = "Classify speech recordings as AI-generated or human"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one audio file and print the JSON report
    Detect {
        #[arg(long)]
        input: PathBuf,
        /// auto, en, ta, hi, ml or te
        #[arg(long, default_value = "auto")]
        language: String,
        /// Declared container (defaults to the input's extension)
        #[arg(long)]
        format: Option<String>,
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Trained model artifact, overriding the configuration
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// List supported languages
    Languages,
    /// Serve the HTTP API
    #[cfg(feature = "http")]
    Serve {
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: std::net::SocketAddr,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        model: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect {
            input,
            language,
            format,
            config,
            model,
        } => run_detect(&input, &language, format, config, model),
        Commands::Languages => run_languages(),
        #[cfg(feature = "http")]
        Commands::Serve {
            addr,
            config,
            model,
        } => run_serve(addr, config, model),
    }
}

fn load_config(path: Option<PathBuf>, model: Option<PathBuf>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::try_load_from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if model.is_some() {
        config.classifier.model_path = model;
    }
    Ok(config)
}

fn run_detect(
    input: &Path,
    language: &str,
    format: Option<String>,
    config: Option<PathBuf>,
    model: Option<PathBuf>,
) -> Result<ExitCode> {
    let config = load_config(config, model)?;
    let pipeline = DetectionPipeline::from_config(&config);
    let payload = fs::read(input).with_context(|| format!("reading {}", input.display()))?;

    let declared = format.or_else(|| {
        input
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_string)
    });

    match pipeline.detect(&payload, declared.as_deref(), LanguageHint::parse(language)) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::from(0))
        }
        Err(err) => {
            let body = serde_json::json!({ "error": err.message(), "code": err.code() });
            eprintln!("{}", serde_json::to_string_pretty(&body)?);
            Ok(ExitCode::from(EXIT_INGESTION_ERROR))
        }
    }
}

fn run_languages() -> Result<ExitCode> {
    for language in Language::ALL {
        println!("{}\t{}", language.code(), language.name());
    }
    Ok(ExitCode::from(0))
}

#[cfg(feature = "http")]
fn run_serve(
    addr: std::net::SocketAddr,
    config: Option<PathBuf>,
    model: Option<PathBuf>,
) -> Result<ExitCode> {
    use voice_verify::http::{run_http_server, AppState};

    let config = load_config(config, model)?;
    let state = AppState::new(DetectionPipeline::from_config(&config));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime for HTTP server")?;
    runtime.block_on(run_http_server(state, addr))?;
    Ok(ExitCode::from(0))
}
