// Agentic Studio - Command Line Entry Point

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use agentic_studio::{
    AnalysisInputs, AnalysisMode, AnalysisRequest, AppConfig, AppState, DomainEvent,
    SessionOutcome, SessionState, SettingsUpdate,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Exit code for a run interrupted with Ctrl-C.
const EXIT_CANCELLED: u8 = 130;

#[derive(Parser, Debug)]
#[command(name = "agentic-studio", version, about = "Stream multi-agent code analysis from the Agentic Code Studio backend")]
struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, global = true)]
    backend: Option<String>,
    /// Config file path (default: ~/.agentic-studio/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print each event as a JSON line instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    /// Write the final session state as JSON to this path
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    /// Force debug logging
    #[arg(long, global = true, default_value_t = false)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fix a bug described in plain language
    Fix {
        /// What is wrong with the code
        #[arg(long)]
        description: String,
        #[command(flatten)]
        source: CodeSource,
    },
    /// Optimize code for time and space complexity
    Optimize {
        #[command(flatten)]
        source: CodeSource,
        /// Input used to benchmark the original and optimized code
        #[arg(long, default_value = "")]
        test_input: String,
        /// Source language (defaults to the configured language)
        #[arg(long)]
        language: Option<String>,
    },
    /// Audit code for security vulnerabilities
    Security {
        #[command(flatten)]
        source: CodeSource,
    },
    /// Check that the backend is reachable
    Health,
    /// Show or change the stored configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the stored configuration as JSON
    Show,
    /// Print the config file path
    Path,
    /// Update one or more settings
    Set(ConfigSetArgs),
    /// Restore the default configuration
    Reset,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = true)]
struct ConfigSetArgs {
    #[arg(long)]
    backend_url: Option<String>,
    /// Overall request timeout in seconds, 0 for none
    #[arg(long)]
    request_timeout_secs: Option<u64>,
    #[arg(long)]
    connect_timeout_secs: Option<u64>,
    #[arg(long)]
    default_language: Option<String>,
    #[arg(long)]
    log_level: Option<String>,
}

impl From<ConfigSetArgs> for SettingsUpdate {
    fn from(args: ConfigSetArgs) -> Self {
        SettingsUpdate {
            backend_url: args.backend_url,
            request_timeout_secs: args.request_timeout_secs,
            connect_timeout_secs: args.connect_timeout_secs,
            default_language: args.default_language,
            log_level: args.log_level,
        }
    }
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct CodeSource {
    /// Code to analyze
    #[arg(long)]
    code: Option<String>,
    /// Read the code to analyze from a file
    #[arg(long)]
    code_file: Option<PathBuf>,
}

impl CodeSource {
    fn load(&self) -> Result<String> {
        match (&self.code, &self.code_file) {
            (Some(code), _) => Ok(code.clone()),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("failed to read code from {}", path.display())),
            (None, None) => anyhow::bail!("either --code or --code-file is required"),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut state = AppState::initialize(cli.config.clone()).context("failed to load configuration")?;
    if let Some(url) = &cli.backend {
        state = state.with_backend_override(url.clone())?;
    }
    let config = state.effective_config();
    init_logging(&config.log_level, cli.debug);
    let config_path = state.config_service().config_path().display().to_string();
    if state.config_service().was_created() {
        tracing::info!(path = %config_path, "Created default configuration");
    }
    tracing::debug!(path = %config_path, backend = %config.backend_url, "Configuration loaded");

    let (mode, inputs) = match cli.command {
        Command::Health => {
            let message = state.analysis_client()?.health_check().await?;
            println!("{message}");
            return Ok(ExitCode::SUCCESS);
        }
        Command::Config { action } => {
            run_config(&mut state, action)?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Fix {
            description,
            source,
        } => (
            AnalysisMode::Fix,
            AnalysisInputs {
                description,
                code: source.load()?,
                ..AnalysisInputs::default()
            },
        ),
        Command::Optimize {
            source,
            test_input,
            language,
        } => (
            AnalysisMode::Optimize,
            AnalysisInputs {
                code: source.load()?,
                test_input,
                language: Some(language.unwrap_or_else(|| config.default_language.clone())),
                ..AnalysisInputs::default()
            },
        ),
        Command::Security { source } => (
            AnalysisMode::Security,
            AnalysisInputs::with_code(source.load()?),
        ),
    };
    AnalysisRequest::build(mode, &inputs).validate()?;

    let final_state = stream_session(&state, mode, &inputs, cli.json).await?;

    if !cli.json {
        print_summary(&final_state);
    }
    if let Some(path) = &cli.output {
        write_state(path, &final_state)?;
    }

    Ok(match final_state.outcome {
        Some(SessionOutcome::Failed { .. }) => ExitCode::FAILURE,
        Some(SessionOutcome::Cancelled) => ExitCode::from(EXIT_CANCELLED),
        _ => ExitCode::SUCCESS,
    })
}

fn run_config(state: &mut AppState, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => print_config(state.config_service().get_config())?,
        ConfigAction::Path => println!("{}", state.config_service().config_path().display()),
        ConfigAction::Set(args) => {
            let stored = state
                .update_settings(args.into())
                .context("failed to update configuration")?;
            tracing::info!("Configuration updated");
            print_config(&stored)?;
        }
        ConfigAction::Reset => {
            let stored = state.reset_settings().context("failed to reset configuration")?;
            tracing::info!("Configuration reset to defaults");
            print_config(&stored)?;
        }
    }
    Ok(())
}

fn print_config(config: &AppConfig) -> Result<()> {
    let content = serde_json::to_string_pretty(config).context("failed to serialize configuration")?;
    println!("{content}");
    Ok(())
}

/// Run one session, printing events as they are reduced.
async fn stream_session(
    state: &AppState,
    mode: AnalysisMode,
    inputs: &AnalysisInputs,
    json: bool,
) -> Result<SessionState> {
    let (tx, mut rx) = mpsc::channel::<DomainEvent>(256);
    let mut orchestrator = state.orchestrator()?.with_event_sender(tx);

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_event(&event, json);
        }
    });

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling analysis");
            ctrl_c_token.cancel();
        }
    });

    let final_state = orchestrator.run_with_cancel(mode, inputs, token).await;
    signal.abort();
    // Dropping the orchestrator closes the event channel so the printer drains and exits.
    drop(orchestrator);
    printer.await.context("event printer task failed")?;

    Ok(final_state)
}

fn print_event(event: &DomainEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(err) => tracing::warn!(error = %err, "Failed to serialize event"),
        }
        return;
    }
    match event.message() {
        Some(message) => println!("[{}] {}", event.label(), message),
        None => println!("[{}]", event.label()),
    }
}

fn print_summary(state: &SessionState) {
    if let Some(artifact) = &state.latest_code {
        println!();
        println!("── Latest code ({}) ──", artifact.produced_by.label());
        println!("{}", artifact.code);
    }

    if let Some(report) = &state.latest_complexity {
        let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "?".to_string());
        println!();
        println!("── Complexity ──");
        println!(
            "original:  time {}  space {}",
            field(&report.original_time),
            field(&report.original_space)
        );
        println!(
            "optimized: time {}  space {}",
            field(&report.optimized_time),
            field(&report.optimized_space)
        );
    }

    if state.mode == Some(AnalysisMode::Security) {
        println!();
        println!("Vulnerabilities found: {}", state.vulnerability_count());
    }
}

fn write_state(path: &Path, state: &SessionState) -> Result<()> {
    let content = serde_json::to_string_pretty(state).context("failed to serialize session")?;
    fs::write(path, content)
        .with_context(|| format!("failed to write session to {}", path.display()))?;
    tracing::info!(path = %path.display(), "Session written");
    Ok(())
}

fn init_logging(level: &str, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
