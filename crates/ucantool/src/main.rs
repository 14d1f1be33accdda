//! ucantool - inspect UCAN invocations, delegations, receipts and containers.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use ucantool::{inspect, read_input, ContainerSelection, InspectConfig, OutputFormat};

/// ucantool - UCAN inspection tool
#[derive(Parser, Debug)]
#[command(name = "ucantool")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode and display information about a UCAN from a file or stdin
    ///
    /// Examples:
    ///   ucantool view ucan.bin
    ///   cat ucan.bin | ucantool view
    #[command(alias = "p")]
    View(ViewArgs),
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// File to read; standard input is read when omitted
    #[arg(value_name = "UCAN_FILE_PATH")]
    path: Option<PathBuf>,

    /// If input is a UCAN container, view the data at this index
    #[arg(
        short = 'i',
        long,
        default_value_t = -1,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(-1..)
    )]
    container_index: i64,

    /// Format output as DAG-JSON
    #[arg(short, long)]
    json: bool,
}

impl ViewArgs {
    fn config(&self) -> InspectConfig {
        InspectConfig {
            container: ContainerSelection::from_index(self.container_index),
            format: if self.json {
                OutputFormat::DagJson
            } else {
                OutputFormat::Table
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the rendering.
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match cli.command {
        Commands::View(args) => view(&args),
    }
}

fn view(args: &ViewArgs) -> Result<()> {
    let bytes = read_input(args.path.as_deref(), io::stdin().lock())
        .context("failed to read UCAN input")?;
    let output = inspect(&bytes, &args.config())?;
    println!("{output}");
    Ok(())
}
