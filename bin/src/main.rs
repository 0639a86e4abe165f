//! chartmill CLI - Candlestick, Heiken-Ashi and Renko chart conversion.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::{ChartArgs, Format};

#[derive(Parser)]
#[command(name = "chartmill")]
#[command(about = "Convert and replay bar data as candlestick, Heiken-Ashi and Renko charts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Pipeline configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a bar file and write the transformed chart series
    Convert {
        /// Input file (JSON array or newline-delimited JSON bars)
        input: PathBuf,

        #[command(flatten)]
        chart: ChartArgs,

        /// Output file path. Defaults to <input>.<chart>.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,
    },

    /// Load the head of a bar file as history and stream the rest as realtime events
    Replay {
        /// Input file (JSON array or newline-delimited JSON bars)
        input: PathBuf,

        #[command(flatten)]
        chart: ChartArgs,

        /// Number of records loaded as history
        #[arg(long, default_value = "100")]
        history: usize,

        /// Delay between realtime events in milliseconds
        #[arg(long, default_value = "0")]
        interval_ms: u64,
    },

    /// List resolution codes and tick bar sizes
    Resolutions,
}

/// Installs the log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Convert {
            input,
            chart,
            output,
            format,
        } => {
            let config = chart.pipeline_config(cli.config.as_deref())?;
            commands::convert::convert(&input, &chart, config, output, format, cli.quiet)
        }
        Commands::Replay {
            input,
            chart,
            history,
            interval_ms,
        } => {
            let config = chart.pipeline_config(cli.config.as_deref())?;
            commands::replay::replay(&input, &chart, config, history, interval_ms, cli.quiet).await
        }
        Commands::Resolutions => {
            commands::resolutions::list_resolutions();
            Ok(())
        }
    }
}
