//! CLI frontend for the Questline campaign simulator.

mod commands;
mod loader;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "questline",
    about = "Questline: seeded tabletop campaign simulation",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one or more sessions and report what went wrong
    Run(commands::run::RunArgs),

    /// Generate a seeded party
    Party {
        /// Preset: balanced, hardcore, story-heavy, cos-survival
        #[arg(short, long, default_value = "balanced")]
        preset: String,

        /// Number of characters
        #[arg(long, default_value = "5")]
        size: usize,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Take backgrounds from this SRD dataset
        #[arg(long)]
        srd_json: Option<PathBuf>,

        /// Write the party JSON here instead of printing a table
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Suggest a policy profile for a party
    Policy {
        /// Party JSON to derive weights from
        party_json: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the sessions recorded for a campaign
    Ledger {
        /// Campaign identifier
        #[arg(long, default_value = "default")]
        campaign_id: String,

        /// Directory holding campaign ledgers
        #[arg(long, default_value = "data/ledger")]
        ledger_dir: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(&args),
        Commands::Party {
            preset,
            size,
            seed,
            srd_json,
            output,
        } => commands::party::run(&preset, size, seed, srd_json.as_deref(), output.as_deref()),
        Commands::Policy { party_json, output } => {
            commands::policy::run(&party_json, output.as_deref())
        }
        Commands::Ledger {
            campaign_id,
            ledger_dir,
        } => commands::ledger::run(&ledger_dir, &campaign_id),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
