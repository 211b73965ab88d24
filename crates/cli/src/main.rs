mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Trellis scenario planner.
#[derive(Parser)]
#[command(name = "trellis", version, about = "Trellis scenario planner for state graphs")]
struct Cli {
    /// Output format (text or json) [default: text]
    #[arg(long, global = true, value_enum)]
    output: Option<OutputFormat>,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to a trellis.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every scenario of a graph with its steps
    Plan {
        /// Path to the graph JSON document
        graph: PathBuf,
        /// Number of times each cycle is repeated during loop expansion
        #[arg(long)]
        repeat: Option<usize>,
    },

    /// Compile every scenario and report configuration errors
    Check {
        /// Path to the graph JSON document
        graph: PathBuf,
        /// Number of times each cycle is repeated during loop expansion
        #[arg(long)]
        repeat: Option<usize>,
    },

    /// Validate a graph document against the JSON Schema
    Validate {
        /// Path to the graph JSON document
        graph: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TRELLIS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let settings = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c.plan,
        Err(msg) => {
            report_error(&msg, cli.output.unwrap_or(OutputFormat::Text), cli.quiet);
            process::exit(1);
        }
    };
    let output = cli
        .output
        .or(settings.output)
        .unwrap_or(OutputFormat::Text);

    match cli.command {
        Commands::Plan { graph, repeat } => {
            let repeat = repeat.or(settings.repeat).unwrap_or(0);
            commands::plan::cmd_plan(&graph, repeat, output, cli.quiet);
        }
        Commands::Check { graph, repeat } => {
            let repeat = repeat.or(settings.repeat).unwrap_or(0);
            commands::check::cmd_check(&graph, repeat, output, cli.quiet);
        }
        Commands::Validate { graph } => {
            commands::validate::cmd_validate(&graph, output, cli.quiet);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
