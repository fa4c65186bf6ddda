//! attrpg - tabletop RPG session manager
//!
//! Entry point: parses the command line, loads configuration, sets up
//! logging and runs the interactive menu on stdin/stdout.

use std::io;

use clap::Parser;
use tracing::info;

use attrpg::cli::{Cli, Commands, ConfigSubcommand};
use attrpg::config::{self, GameConfig};
use attrpg::error::Result;
use attrpg::{logging, version, Menu, RosterStore};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        tracing::error!(error = %e.format_for_log(), "Exiting with error");
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<()> {
    match cli.effective_command() {
        Commands::Version => {
            version::print_version();
            Ok(())
        }
        Commands::Config { subcommand } => {
            logging::init_simple(if cli.verbose > 0 {
                tracing::Level::DEBUG
            } else {
                tracing::Level::WARN
            })?;
            handle_config_command(cli, subcommand)
        }
        Commands::Play => {
            let config = load_config(cli)?;

            // Keep the guards alive until the session ends so the log file is flushed
            let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

            let build = version::build_info();
            info!(
                version = %build.full_version(),
                data_file = %config.storage.data_file,
                "Starting attrpg"
            );

            play(&config)
        }
    }
}

/// Load configuration and apply the --data-file override
fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = GameConfig::load(cli.config.as_deref())?;
    if let Some(ref path) = cli.data_file {
        config.set_data_file(path);
    }
    Ok(config)
}

/// Run one interactive session: load, menu loop, save
fn play(config: &GameConfig) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(stdin.lock(), stdout.lock());

    let mut session = menu.open_session(RosterStore::new(config.data_file()))?;
    menu.run(&mut session)?;

    info!(
        characters = session.roster().character_count(),
        masters = session.roster().master_count(),
        path = %session.store().path().display(),
        "Session ended"
    );
    Ok(())
}

/// Handle configuration subcommands
fn handle_config_command(cli: &Cli, subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            let cfg = load_config(cli)?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration file created: {}", written.display());
        }
        ConfigSubcommand::Validate => {
            load_config(cli)?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}
