//! checks-client CLI - Validate a dataset and data dictionary
//!
//! ```bash
//! checks-client dataset.csv datadic.csv async   # create task, poll until done
//! checks-client dataset.csv datadic.csv sync    # one blocking call
//! checks-client dataset.csv datadic.json schema # data dictionary only
//! checks-client                                 # bundled sample files, async
//! ```
//!
//! Set `DEPLOY_ENVIRONMENT=prod` and `API_BASE` (or `--base-url`) to target
//! a deployed server; `RUST_LOG` controls diagnostic output.

use checks_client::console::{
    log_error, log_info, log_info_indent, log_success, log_warning, print_result,
};
use checks_client::{Config, LoadOptions, Mode, PollOptions, ValidationClient};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_DATASET: &str = "./data/incorrect_dataset.csv";
const DEFAULT_DATADIC: &str = "./data/incorrect_data_dictionary.csv";
const DEFAULT_MODE: &str = "async";

const USAGE: &str = "Usage: checks-client <dataset_file> <datadic_file> <mode: async|sync>";

#[derive(Parser, Debug)]
#[command(name = "checks-client")]
#[command(
    about = "Submit a dataset and data dictionary to the QC Tool validation API",
    long_about = None
)]
struct Cli {
    /// Dataset file (.csv or .json)
    dataset: Option<PathBuf>,

    /// Data dictionary file (.csv or .json)
    datadic: Option<PathBuf>,

    /// async, sync, structure or schema
    mode: Option<String>,

    /// Anything after the mode is accepted and ignored
    #[arg(hide = true)]
    extra: Vec<String>,

    /// Milliseconds between two status polls
    #[arg(long, default_value = "1000")]
    interval_ms: u64,

    /// Status polls before giving up
    #[arg(long, default_value = "60")]
    max_attempts: u32,

    /// API base URL (overrides DEPLOY_ENVIRONMENT / API_BASE)
    #[arg(long)]
    base_url: Option<String>,

    /// CSV delimiter
    #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Query /health before validating
    #[arg(long)]
    health: bool,
}

/// Files and mode for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    dataset: PathBuf,
    datadic: PathBuf,
    mode: String,
}

impl Invocation {
    /// All three positionals, or the bundled defaults. The flag is true when
    /// defaults were substituted.
    fn resolve(
        dataset: Option<PathBuf>,
        datadic: Option<PathBuf>,
        mode: Option<String>,
    ) -> (Self, bool) {
        match (dataset, datadic, mode) {
            (Some(dataset), Some(datadic), Some(mode)) => {
                (Self { dataset, datadic, mode }, false)
            }
            _ => (
                Self {
                    dataset: PathBuf::from(DEFAULT_DATASET),
                    datadic: PathBuf::from(DEFAULT_DATADIC),
                    mode: DEFAULT_MODE.to_string(),
                },
                true,
            ),
        }
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ if s == "\\t" => Ok(b'\t'),
        _ => Err(format!("delimiter must be a single ASCII character, got '{}'", s)),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,checks_client=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Environment settings (`.env` included), then the `--base-url` override.
fn resolve_config(base_url: Option<String>) -> Config {
    let config = Config::from_env();
    match base_url {
        Some(base_url) => config.with_api_base(base_url),
        None => config,
    }
}

fn result_title(mode: Mode) -> &'static str {
    match mode {
        Mode::Async => "Final task response JSON:",
        Mode::Sync => "Sync validation response JSON:",
        Mode::Structure => "Structure validation response JSON:",
        Mode::Schema => "Schema validation response JSON:",
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Reads .env, so RUST_LOG from that file reaches the subscriber.
    let config = resolve_config(cli.base_url);
    init_tracing();
    tracing::debug!(
        environment = %config.environment,
        api_base = %config.api_base,
        "resolved configuration"
    );

    if !cli.extra.is_empty() {
        log_warning(format!("Ignoring extra arguments: {}", cli.extra.join(" ")));
    }

    let (invocation, defaulted) = Invocation::resolve(cli.dataset, cli.datadic, cli.mode);
    if defaulted {
        log_info(USAGE);
        log_info(format!(
            "Using defaults: {}, {}, mode={}",
            invocation.dataset.display(),
            invocation.datadic.display(),
            invocation.mode
        ));
    }

    let client = ValidationClient::new(&config).with_load_options(LoadOptions {
        delimiter: cli.delimiter,
        ..LoadOptions::default()
    });
    let poll = PollOptions::default()
        .with_interval(Duration::from_millis(cli.interval_ms))
        .with_max_attempts(cli.max_attempts);

    if cli.health {
        match client.health().await {
            Ok(body) => log_success(format!("Server healthy: {}", body)),
            Err(e) => log_warning(format!("Health check failed: {}", e)),
        }
    }

    // Failures are reported, not turned into an exit code.
    if let Err(e) = execute(&client, &invocation, &poll).await {
        log_error(format!("Error: {}", e));
    }
}

async fn execute(
    client: &ValidationClient,
    invocation: &Invocation,
    poll: &PollOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mode: Mode = invocation.mode.parse()?;

    log_info(format!("Mode: {}", mode));
    log_info_indent(format!("Dataset: {}", invocation.dataset.display()), 1);
    log_info_indent(format!("Data dictionary: {}", invocation.datadic.display()), 1);
    log_info_indent(format!("Server: {}", client.endpoints().base()), 1);

    let result = client.run(mode, &invocation.dataset, &invocation.datadic, poll).await?;

    match result.get("error").and_then(|e| e.as_str()) {
        Some(error) if mode == Mode::Async => log_warning(error),
        _ => log_success("Validation response received"),
    }

    print_result(result_title(mode), &result)?;
    Ok(())
}
