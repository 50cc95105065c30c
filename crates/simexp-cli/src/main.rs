use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use commands::{
    plan::{self, PlanArgs},
    read::{self, ReadArgs},
    script::{self, ScriptArgs},
    write::{self, WriteArgs},
};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "simexp", about = "Simulation experiment preparation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand a design plan into its experiment table.
    Plan(PlanArgs),
    /// Write a Modelica script running every experiment of a design plan.
    Script(ScriptArgs),
    /// Read field values from an initialization file.
    Read(ReadArgs),
    /// Rewrite field values of an initialization file in place.
    Write(WriteArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "dispatching");
    match cli.command {
        Command::Plan(args) => plan::run(&args),
        Command::Script(args) => script::run(&args),
        Command::Read(args) => read::run(&args),
        Command::Write(args) => write::run(&args),
    }
}

/// `RUST_LOG` overrides the default `warn` filter. Logs go to stderr so that
/// command output on stdout stays machine readable.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn write_json<P: AsRef<Path>, T: serde::Serialize>(
    path: P,
    value: &T,
) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
