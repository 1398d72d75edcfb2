// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use mikrus_toolbox::ssh::DEFAULT_EXEC_TIMEOUT;

#[derive(Parser)]
#[command(name = "mikrus-toolbox")]
#[command(about = "SSH access helpers for deploying to mikrus servers")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a command on a remote host through its SSH alias
    Exec {
        /// SSH alias of the target host
        alias: String,

        /// Command to run remotely
        command: String,

        /// Overall timeout in seconds
        #[arg(long, default_value_t = DEFAULT_EXEC_TIMEOUT.as_secs())]
        timeout: u64,
    },

    /// Check that an SSH alias resolves and accepts connections
    Test {
        /// SSH alias of the target host
        alias: String,
    },

    /// Bootstrap key material and an SSH config entry for a new host
    Setup {
        /// SSH alias to create
        alias: String,

        /// Remote hostname or IP
        #[arg(long)]
        host: String,

        /// SSH port
        #[arg(long, default_value_t = 22)]
        port: u16,

        /// Remote user
        #[arg(long, default_value = "root")]
        user: String,
    },

    /// Print the public key used for mikrus hosts
    Pubkey,

    /// Print resolved toolbox paths (repo root, deploy script, apps dir)
    Paths,
}
