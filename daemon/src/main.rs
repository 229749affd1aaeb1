//! Mirror bridge daemon: configuration tooling and scripted relay runs.

use anyhow::Context;
use bridge_node::{
    open_store, run_scenario, save_home, save_remote, BridgeConfig, Scenario, SimulationReport,
};
use bridge_types::Outcome;
use bridge_utils::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bridge-daemon", about = "Cross-chain governance mirror bridge")]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(long, global = true, env = "BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format: "human" or "json". Overrides the config file.
    #[arg(long, global = true, env = "BRIDGE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the config file.
    #[arg(long, global = true, env = "BRIDGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Inspect or generate configuration.
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run a scripted scenario through a home relay and a remote executor.
    #[command(name = "simulate")]
    Simulate {
        /// Scenario TOML file.
        scenario: PathBuf,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Save both final states to the configured state directory.
        #[arg(long)]
        persist: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Write the default configuration.
    Init {
        /// Output file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Load and validate a configuration file.
    Check {
        file: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<BridgeConfig> {
    match path {
        Some(path) => BridgeConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(BridgeConfig::default()),
    }
}

fn print_report(report: &SimulationReport) {
    println!("scenario: {}", report.scenario);
    for p in &report.proposals {
        let status = match (p.outcome, p.executed) {
            (Outcome::Succeeded, true) => "executed",
            (Outcome::Succeeded, false) => "pending",
            _ => "not executed",
        };
        println!(
            "  proposal {}: {} [{}] {}{}",
            p.id,
            p.outcome,
            p.tally,
            status,
            p.executor
                .as_deref()
                .map(|e| format!(" by {e}"))
                .unwrap_or_default(),
        );
    }
    for rejected in &report.rejected_votes {
        println!("  rejected vote: {rejected}");
    }
    let relay = &report.relay;
    println!(
        "relay: executed={} duplicates={} observed={} rejected={} failed={} deferred={} abandoned={}",
        relay.executed,
        relay.duplicates,
        relay.observed,
        relay.rejected,
        relay.failed,
        relay.deferred,
        relay.abandoned,
    );
    if report.undelivered > 0 {
        println!("undelivered messages: {} (replay with manual retry)", report.undelivered);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `config check` reports its own load errors, so it starts from defaults.
    let config = match &cli.command {
        Command::Config { .. } => BridgeConfig::default(),
        Command::Simulate { .. } => load_config(cli.config.as_ref())?,
    };

    let format = cli.log_format.unwrap_or(config.logging.format);
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    bridge_utils::init_logging(format, level).context("initialising logging")?;

    match cli.command {
        Command::Config { action } => match action {
            ConfigAction::Init { output } => {
                let rendered = BridgeConfig::default().to_toml_string()?;
                match output {
                    Some(path) => {
                        std::fs::write(&path, rendered)
                            .with_context(|| format!("writing {}", path.display()))?;
                        tracing::info!("wrote default config to {}", path.display());
                    }
                    None => print!("{rendered}"),
                }
            }
            ConfigAction::Check { file } => {
                let checked = load_config(Some(&file))?;
                println!(
                    "{}: ok (home chain {}, remote chain {}, quorum {} bps)",
                    file.display(),
                    checked.home_chain(),
                    checked.remote_chain(),
                    checked.home.quorum_bps,
                );
            }
        },
        Command::Simulate {
            scenario,
            json,
            persist,
        } => {
            let scenario = Scenario::from_toml_file(&scenario)?;
            tracing::info!(
                "simulating '{}' between chain {} and chain {}",
                scenario.name,
                config.home_chain(),
                config.remote_chain(),
            );
            let outcome = run_scenario(&config, &scenario).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else {
                print_report(&outcome.report);
            }

            if persist {
                let store = open_store(&config.state_dir)?;
                save_home(&store, &outcome.home)?;
                save_remote(&store, &outcome.remote)?;
                tracing::info!("state saved to {}", config.state_dir.display());
            }
        }
    }

    Ok(())
}
