//! healthpass - validate a scanned health pass
//!
//! ## Usage
//!
//! ```bash
//! # Token as argument
//! healthpass 'KID.PAYLOAD.SIGNATURE'
//!
//! # Token from a file or stdin (e.g. piped from a QR scanner)
//! healthpass --file scan.txt
//! zbarimg -q --raw pass.png | healthpass
//!
//! # Local key set only, evaluated at a fixed time
//! healthpass --offline --keys-file cache/keys.json --now 2025-01-15T09:30:00Z 'KID.PAYLOAD.SIGNATURE'
//! ```
//!
//! The verdict is printed on stdout; logs go to stderr.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Parser;
use healthpass::{
    DEFAULT_CACHE_PATH, DEFAULT_KEYS_URL, Error, KeySourceConfig, PassValidator, report,
};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validate a health pass QR token.
#[derive(Parser)]
#[command(name = "healthpass")]
#[command(version = VERSION)]
#[command(about = "Validate a health pass QR token")]
struct Cli {
    /// Token to validate (read from --file or stdin when omitted)
    token: Option<String>,

    /// Read the token from a file
    #[arg(short, long, conflicts_with = "token")]
    file: Option<PathBuf>,

    /// Key set endpoint
    #[arg(long, default_value = DEFAULT_KEYS_URL)]
    keys_url: String,

    /// Local key set file, used when the endpoint is unreachable
    #[arg(long, default_value = DEFAULT_CACHE_PATH)]
    keys_file: PathBuf,

    /// Only use the local key set file
    #[arg(long)]
    offline: bool,

    /// Endpoint request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Evaluate expiry at this RFC 3339 instant instead of now
    #[arg(long, value_parser = parse_instant)]
    now: Option<DateTime<Utc>>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| format!("expected RFC 3339 timestamp: {e}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            tracing::error!(%error, "Validation aborted");
            println!("{}", report::render_error(&error));
            ExitCode::from(report::FATAL_EXIT_CODE)
        }
    }
}

fn run(cli: &Cli) -> healthpass::Result<u8> {
    let token = read_token(cli, std::io::stdin())?;

    let source = KeySourceConfig::new()
        .endpoint(cli.keys_url.clone())
        .cache_path(cli.keys_file.clone())
        .timeout(Duration::from_secs(cli.timeout))
        .offline(cli.offline)
        .build_source()?;
    let validator = PassValidator::new().source(source).build();

    let verdict = validator.verify_at(&token, cli.now.unwrap_or_else(Utc::now))?;
    println!("{}", report::render(&verdict));
    Ok(report::exit_code(&verdict))
}

/// Token from the argument, `--file`, or `stdin` when neither is given
fn read_token(cli: &Cli, mut stdin: impl Read) -> healthpass::Result<String> {
    let raw = match (&cli.token, &cli.file) {
        (Some(token), _) => token.clone(),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigurationInvalid(format!("cannot read {}: {e}", path.display()))
        })?,
        (None, None) => {
            let mut input = String::new();
            stdin
                .read_to_string(&mut input)
                .map_err(|e| Error::ConfigurationInvalid(format!("cannot read stdin: {e}")))?;
            input
        }
    };

    Ok(clean_input(&raw).to_string())
}

/// Strip a leading byte order mark and surrounding whitespace
fn clean_input(raw: &str) -> &str {
    raw.trim_start_matches('\u{feff}').trim()
}
