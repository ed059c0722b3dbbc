//! parley CLI: Command-line interface for the parley chat client

use clap::{Parser, Subcommand};
use parley_core::{Config, ExchangeClient};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Terminal chat client with optimistic transcript updates
#[derive(Parser)]
#[command(name = "parley")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Chat,

    /// Send a single message and print the reply
    Send {
        /// The message to send
        message: String,

        /// Override the configured endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Override the request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Initialize .parley/ directory and config
    Init,

    /// Print the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

const PARLEY_DIR: &str = ".parley";

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Chat) => {
            let config = load_config();
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(parley_tui::run_tui(&config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Send {
            message,
            endpoint,
            timeout,
        }) => {
            cmd_send(&message, endpoint, timeout);
        }
        Some(Commands::Init) => {
            cmd_init();
        }
        Some(Commands::Config { json }) => {
            cmd_config(json);
        }
    }
}

fn config_path() -> PathBuf {
    Path::new(PARLEY_DIR).join("config.json")
}

fn load_config() -> Config {
    let path = config_path();
    if path.exists() {
        match Config::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {e}");
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    }
}

fn cmd_send(message: &str, endpoint: Option<String>, timeout: Option<u64>) {
    // Same rule as the TUI: whitespace-only input is not a message.
    let message = message.trim();
    if message.is_empty() {
        return;
    }

    let mut config = load_config();
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }
    if let Some(timeout) = timeout {
        config.timeout_seconds = timeout;
    }

    let client = match ExchangeClient::with_timeout(
        &config.endpoint,
        Duration::from_secs(config.timeout_seconds),
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    match rt.block_on(client.send(message)) {
        Ok(reply) => println!("{reply}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_init() {
    let parley_dir = Path::new(PARLEY_DIR);

    if let Err(e) = std::fs::create_dir_all(parley_dir) {
        eprintln!("Failed to create {}: {e}", parley_dir.display());
        std::process::exit(1);
    }

    let config_path = config_path();
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return;
    }

    let config = Config::default();
    match config.save(&config_path) {
        Ok(()) => {
            println!("Created {}", config_path.display());
            println!("Default endpoint: {}", config.endpoint);
        }
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_config(json: bool) {
    let config = load_config();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&config).expect("failed to serialize")
        );
        return;
    }

    println!("Endpoint: {}", config.endpoint);
    println!("Timeout: {}s", config.timeout_seconds);
    println!("Show pending bubble: {}", config.show_pending);
}
