//! shardstore CLI - Command line interface for the blob store
//!
//! Exposes every store operation for manual inspection and scripting.
//! Results are printed to stdout as JSON; logs go to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use shardstore::{HashAlgorithm, Store, StoreConfig, TransformKind};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shardstore")]
#[command(about = "A content-addressable local blob store")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/shardstore/config.json when present)
    #[arg(short, long, conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore config files and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Root directory of the store
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Key transform: cas or identity
    #[arg(short, long)]
    transform: Option<TransformKind>,

    /// Digest for the cas transform: sha1 or blake3
    #[arg(long)]
    hash: Option<HashAlgorithm>,

    /// Directory segment width for the cas transform
    #[arg(short, long)]
    block_size: Option<usize>,

    /// Write through a temp file and rename into place
    #[arg(long)]
    atomic: bool,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a file (or stdin) under a key
    Put {
        /// The key
        key: String,
        /// File to store; stdin when omitted
        file: Option<PathBuf>,
    },

    /// Write the object stored under a key to stdout or a file
    Get {
        /// The key
        key: String,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check whether a key is stored
    Has {
        /// The key
        key: String,
    },

    /// Delete a key's whole first-segment directory
    Delete {
        /// The key
        key: String,
    },

    /// Remove the store root and everything in it
    Clear,

    /// Show where a key is stored
    Path {
        /// The key
        key: String,
    },

    /// Show the effective configuration
    Config {
        /// Save it to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let store = Store::new(config.to_options()?);

    match cli.command {
        Commands::Put { key, file } => {
            let bytes = match file {
                Some(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("open {}", path.display()))?;
                    store.write(&key, file)?
                }
                None => store.write(&key, io::stdin().lock())?,
            };
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "key": key,
                    "bytes": bytes,
                    "path": store.location(&key)?.display().to_string()
                }),
            );
        }

        Commands::Get { key, output: out } => {
            let mut blob = store.read(&key)?;
            match out {
                Some(path) => {
                    let size = blob.size();
                    let mut file = File::create(&path)
                        .with_context(|| format!("create {}", path.display()))?;
                    io::copy(&mut blob, &mut file)?;
                    output(
                        &cli.format,
                        &serde_json::json!({
                            "status": "ok",
                            "key": key,
                            "bytes": size,
                            "output": path.display().to_string()
                        }),
                    );
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    io::copy(&mut blob, &mut stdout)?;
                    stdout.flush()?;
                }
            }
        }

        Commands::Has { key } => {
            let exists = store.has(&key)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "key": key,
                    "exists": exists
                }),
            );
        }

        Commands::Delete { key } => {
            store.delete(&key)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "deleted": key
                }),
            );
        }

        Commands::Clear => {
            store.clear()?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "cleared": store.root().display().to_string()
                }),
            );
        }

        Commands::Path { key } => {
            let path_key = store.path_key(&key);
            output(
                &cli.format,
                &serde_json::json!({
                    "key": key,
                    "pathname": path_key.pathname,
                    "filename": path_key.filename,
                    "first_segment": path_key.first_segment(),
                    "location": store.location(&key)?.display().to_string()
                }),
            );
        }

        Commands::Config { save } => {
            let mut value = serde_json::to_value(&config)?;
            if save {
                let path = match &cli.config {
                    Some(path) => path.clone(),
                    None => StoreConfig::default_path()
                        .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?,
                };
                config.save(&path)?;
                value["saved"] = serde_json::json!(path.display().to_string());
            }
            output(&cli.format, &value);
        }
    }

    Ok(())
}

/// Config file values, overridden by command-line flags
fn load_config(cli: &Cli) -> anyhow::Result<StoreConfig> {
    let saving = matches!(cli.command, Commands::Config { save: true });
    let mut config = match &cli.config {
        _ if cli.no_config => StoreConfig::default(),
        Some(path) if path.exists() => StoreConfig::load(path)?,
        // Only `config --save` may name a file that does not exist yet
        Some(_) if saving => StoreConfig::default(),
        Some(path) => anyhow::bail!("config file {} does not exist", path.display()),
        None => StoreConfig::load_default()?,
    };

    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if let Some(transform) = cli.transform {
        config.transform = transform;
    }
    if let Some(hash) = cli.hash {
        config.hash = hash;
    }
    if let Some(block_size) = cli.block_size {
        config.block_size = block_size;
    }
    if cli.atomic {
        config.atomic_writes = true;
    }

    Ok(config)
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    match format {
        OutputFormat::Json => {
            println!("{}", value);
        }
        OutputFormat::Text => {
            println!(
                "{}",
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            );
        }
    }
}
