use clap::{Parser, Subcommand};
use phishguard_analysis::ai::{AiProvider, GeminiProvider, MockProvider};
use phishguard_analysis::analysis::analyze;
use phishguard_analysis::snapshot::PageSnapshot;
use phishguard_analysis::verdict::VerdictEnvelope;
use phishguard_core::config::{resolve_api_key, Config};
use phishguard_core::{AppError, AppResult};
use phishguard_quantum::random::verified_random_bit;
use phishguard_quantum::simulator::StatevectorSimulator;
use phishguard_server::http::HttpState;
use phishguard_server::serve::{serve, ServerSettings};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(name = "phishguard")]
#[command(
    about = "Phishing-risk verdicts for captured page snapshots: AI content analysis plus a quantum-sampled random bit."
)]
struct Cli {
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Serve {
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
    Check {
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,
        #[arg(long, value_name = "SEED")]
        quantum_seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{}", err.message());
        process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    validate_log_level(&cli.log_level)?;
    validate_log_format(&cli.log_format)?;
    init_logging(&cli.log_level, &cli.log_format)?;

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            config.validate()?;
            let provider = build_provider(&config)?;
            let backend = Arc::new(StatevectorSimulator::new());
            let settings = ServerSettings::from_config(&config)?;
            let state = HttpState::new(provider, backend, settings.max_request_bytes);
            serve(settings, state).await
        }
        Commands::Check {
            snapshot,
            quantum_seed,
        } => {
            config.validate()?;
            let provider = build_provider(&config)?;
            let simulator = match quantum_seed {
                Some(seed) => StatevectorSimulator::with_seed(seed),
                None => StatevectorSimulator::new(),
            };
            check_command(provider.as_ref(), &simulator, &snapshot)
        }
    }
}

fn build_provider(config: &Config) -> AppResult<Arc<dyn AiProvider + Send + Sync>> {
    if let Some(mock) = MockProvider::from_endpoint(&config.ai.endpoint) {
        return Ok(Arc::new(mock));
    }
    if config.ai.is_mock() {
        return Err(AppError::usage(format!(
            "unknown mock endpoint '{}'",
            config.ai.endpoint
        )));
    }
    let api_key = resolve_api_key()?;
    Ok(Arc::new(GeminiProvider::new(
        config.ai.endpoint.clone(),
        config.ai.model.clone(),
        api_key,
        Duration::from_secs(config.ai.timeout_secs),
    )))
}

fn check_command(
    provider: &dyn AiProvider,
    backend: &StatevectorSimulator,
    path: &Path,
) -> AppResult<()> {
    let raw = read_snapshot(path)?;
    let snapshot: PageSnapshot = serde_json::from_str(&raw)
        .map_err(|e| AppError::validation(format!("snapshot parse error: {e}")))?;
    let result = analyze(provider, &snapshot);
    let quantum_verified = verified_random_bit(backend)?;
    let envelope = VerdictEnvelope::new(result, quantum_verified);
    let text = serde_json::to_string_pretty(&envelope)
        .map_err(|e| AppError::internal(format!("envelope encode error: {e}")))?;
    println!("{text}");
    Ok(())
}

fn read_snapshot(path: &Path) -> AppResult<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|e| AppError::usage(format!("failed to read snapshot from stdin: {e}")))?;
        return Ok(raw);
    }
    std::fs::read_to_string(path)
        .map_err(|e| AppError::usage(format!("failed to read snapshot {}: {e}", path.display())))
}

fn init_logging(level: &str, format: &str) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let layer = if format == "json" {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| AppError::internal(format!("failed to init logging: {e}")))
}

fn validate_log_level(value: &str) -> AppResult<()> {
    match value {
        "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
        _ => Err(AppError::usage(format!(
            "invalid --log-level '{value}'; expected error|warn|info|debug|trace"
        ))),
    }
}

fn validate_log_format(value: &str) -> AppResult<()> {
    match value {
        "text" | "json" => Ok(()),
        _ => Err(AppError::usage(format!(
            "invalid --log-format '{value}'; expected text|json"
        ))),
    }
}
