// ABOUTME: Entry point for the mikrus-toolbox CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use mikrus_toolbox::error::{Error, Result};
use mikrus_toolbox::repo::RepoRoot;
use mikrus_toolbox::ssh::{HostEntry, SshClient, SshHome, copy_id_command};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Exec {
            alias,
            command,
            timeout,
        } => {
            let client = SshClient::new();
            let result = client
                .exec(&alias, &command, Duration::from_secs(timeout))
                .await;

            if cli.json {
                if let Ok(json) = serde_json::to_string(&result) {
                    println!("{json}");
                }
            } else {
                print!("{}", result.stdout);
                eprint!("{}", result.stderr);
            }

            Ok(result.exit_code)
        }
        Commands::Test { alias } => {
            let client = SshClient::new();
            let result = client.test_connection(&alias).await;

            if cli.json {
                if let Ok(json) = serde_json::to_string(&result) {
                    println!("{json}");
                }
            } else if result.ok {
                println!("✓ {alias} is reachable");
                if let (Some(user), Some(hostname)) = (&result.user, &result.hostname) {
                    println!("  resolves to {user}@{hostname}");
                }
            } else {
                eprintln!(
                    "✗ {alias} is unreachable: {}",
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }

            Ok(if result.ok { 0 } else { 1 })
        }
        Commands::Setup {
            alias,
            host,
            port,
            user,
        } => {
            let home = SshHome::new()?;

            if home.key_exists() {
                println!("Using existing key: {}", home.key_path().display());
            } else {
                println!("Generating ed25519 key pair...");
                home.generate_key().await?;
            }

            let entry = HostEntry {
                alias,
                host,
                port,
                user,
            };

            if home.alias_exists(&entry.alias)? {
                println!("Config entry for {} already present", entry.alias);
            } else {
                home.append_host_entry(&entry)?;
                println!(
                    "Added Host {} to {}",
                    entry.alias,
                    home.config_path().display()
                );
            }

            println!("Authorize the key on the server with:");
            println!("  {}", copy_id_command(&entry));

            Ok(0)
        }
        Commands::Pubkey => {
            let home = SshHome::new()?;
            match home.public_key()? {
                Some(key) => {
                    println!("{key}");
                    Ok(0)
                }
                None => Err(Error::MissingPublicKey(home.public_key_path())),
            }
        }
        Commands::Paths => {
            let root = RepoRoot::resolve()?;

            if cli.json {
                let paths = serde_json::json!({
                    "root": root.path(),
                    "deploy_script": root.deploy_script(),
                    "apps_dir": root.apps_dir(),
                });
                println!("{paths}");
            } else {
                println!("root:          {}", root.path().display());
                println!("deploy script: {}", root.deploy_script().display());
                println!("apps dir:      {}", root.apps_dir().display());
            }

            Ok(0)
        }
    }
}
