//! CLI argument parsing using clap v4
//!
//! With no subcommand the interactive menu starts, so `attrpg` on its own
//! behaves like `attrpg play`.

use clap::{Parser, Subcommand};

/// attrpg - tabletop RPG session manager
///
/// Keeps a roster of game masters and characters, lets them authenticate,
/// and saves the roster to a plain text file when the session ends.
#[derive(Parser, Debug)]
#[command(name = "attrpg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, env = "ATTRPG_CONFIG", global = true)]
    pub config: Option<String>,

    /// Roster save file (overrides configuration)
    #[arg(short, long, global = true)]
    pub data_file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive menu (default)
    Play,

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the configuration
    Validate,
}

impl Cli {
    /// The command to run, defaulting to the interactive menu
    pub fn effective_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Play)
    }
}
