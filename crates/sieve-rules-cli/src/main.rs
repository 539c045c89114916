//! `sieve-rules`: inspect and rewrite Sieve filter scripts from the shell.
//!
//! Usage:
//!   sieve-rules init <scripts-dir> [--force] - write a config file
//!   sieve-rules parse <script>               - script as a JSON rule document
//!   sieve-rules generate <document.json>     - JSON rule document as a script
//!   sieve-rules normalize <script> [--write] - canonical script text
//!   sieve-rules check <script>               - what was understood, and is it canonical
//!   sieve-rules list [--dir <dir>]           - scripts in the scripts directory

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sieve_rules_config::Config;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "sieve-rules")]
#[command(version, about = "Lossless Sieve script <-> rule document transform")]
struct Cli {
    /// Config file to use instead of ~/.config/sieve-rules/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a config file pointing at a scripts directory
    Init {
        scripts_dir: PathBuf,
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print a script as a JSON rule document
    Parse { script: PathBuf },
    /// Print the script for a JSON rule document
    Generate { document: PathBuf },
    /// Print a script in canonical form
    Normalize {
        script: PathBuf,
        /// Rewrite the file in place instead of printing
        #[arg(long)]
        write: bool,
    },
    /// Summarise a script and report whether it is already canonical
    Check { script: PathBuf },
    /// List scripts in the scripts directory
    List {
        /// Directory to list instead of the configured one
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Info unless RUST_LOG says otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match cli.command {
        Command::Init { .. } => None,
        _ => load_config(cli.config.as_ref())?,
    };
    let options = commands::generator_options(config.as_ref());

    match cli.command {
        Command::Init { scripts_dir, force } => {
            let config_path = cli.config.unwrap_or_else(Config::config_path);
            commands::init(&config_path, &scripts_dir, force)?;
            log::info!("Wrote {}", config_path.display());
        }
        Command::Parse { script } => print!("{}", commands::parse(&script)?),
        Command::Generate { document } => print!("{}", commands::generate(&document, &options)?),
        Command::Normalize { script, write } => {
            let text = commands::normalize(&script, &options)?;
            if write {
                sieve_rules_engine::write_script(&script, &text)?;
                log::info!("Normalized {}", script.display());
            } else {
                print!("{text}");
            }
        }
        Command::Check { script } => {
            let report = commands::check(&script, &options)?;
            print!("{report}");
            if !report.canonical {
                std::process::exit(1);
            }
        }
        Command::List { dir } => {
            let (dir, pattern) = match (dir, config) {
                (Some(dir), config) => (
                    dir,
                    config.map(|c| c.script_glob).unwrap_or_else(|| {
                        sieve_rules_config::DEFAULT_SCRIPT_GLOB.to_string()
                    }),
                ),
                (None, Some(config)) => (config.scripts_path, config.script_glob),
                (None, None) => anyhow::bail!(
                    "No --dir given and no config file found; create one at {}",
                    Config::config_path().display()
                ),
            };
            for path in commands::list(&dir, &pattern)? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Option<Config>> {
    let config_path = path.cloned().unwrap_or_else(Config::config_path);
    log::debug!("Config path: {}", config_path.display());

    let config = Config::load_from_path(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if config.is_none() && path.is_some() {
        anyhow::bail!("Config file {} does not exist", config_path.display());
    }
    Ok(config)
}
