//! CLI binary entrypoint.

mod commands;
mod error;
mod format;

use clap::{Parser, Subcommand};
use commands::{run_config_show, run_heartbeat, run_load};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode};
use jgs_chroma_config::std_env_snapshot;
use jgs_chroma_infra::DEFAULT_DOCUMENT_PATH;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Chroma connection and document loading CLI.
#[derive(Debug, Parser)]
#[command(
    name = "jgs-chroma",
    version,
    about = "Resolve Chroma connections and load documents",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    /// Log at debug level (overrides `RUST_LOG`).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect the resolved connection configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Connect to Chroma and print the server heartbeat.
    Heartbeat {
        /// JSON object of connection overrides.
        #[arg(long)]
        overrides_json: Option<String>,
    },
    /// Load a text file into Chroma Cloud, one record per line.
    Load {
        /// Text file to load.
        #[arg(long, default_value = DEFAULT_DOCUMENT_PATH)]
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the effective connection with secrets redacted.
    Show {
        /// Resolve the way `load` does (credentials required).
        #[arg(long, conflicts_with = "overrides_json")]
        cloud: bool,
        /// JSON object of connection overrides.
        #[arg(long)]
        overrides_json: Option<String>,
    },
}

pub(crate) struct CliOutput {
    stdout: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    load_dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mode = OutputMode::from_args(&cli.output);

    match run(&cli.command, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(command: &Commands, mode: OutputMode) -> Result<CliOutput, CliError> {
    let env = std_env_snapshot();
    tracing::debug!(event = "cli.env", vars = env.len(), "collected chroma environment");
    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Show {
                cloud,
                overrides_json,
            } => run_config_show(mode, &env, *cloud, overrides_json.as_deref()),
        },
        Commands::Heartbeat { overrides_json } => {
            run_heartbeat(mode, &env, overrides_json.as_deref())
        },
        Commands::Load { file } => run_load(mode, &env, file),
    }
}

fn load_dotenv() {
    if let Err(error) = dotenvy::dotenv()
        && !error.not_found()
    {
        let _ = writeln!(io::stderr(), "warning: failed to load .env file: {error}");
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let layer = fmt::layer().with_writer(io::stderr).with_target(true);

    if let Err(error) = tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
    {
        let _ = writeln!(io::stderr(), "warning: failed to initialize logging: {error}");
    }
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
