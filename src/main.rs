use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quill::build::build_site;
use quill::config::Config;
use quill::index::Indexer;
use quill::server;

/// Builds the article index for a markdown blog and serves it as JSON.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The project directory. `quill.yaml` is looked up from here through
    /// each parent directory.
    #[arg(long, short, global = true, default_value = ".")]
    project: PathBuf,

    /// Log more (-v for debug, -vv for trace). `RUST_LOG` takes precedence.
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve `/api/articles.json`, rebuilding the index on every request.
    Serve {
        /// Overrides the `address` from the project file.
        #[arg(long, short)]
        address: Option<SocketAddr>,
    },

    /// Write the index to `{output}/api/articles.json` for static hosting.
    Build {
        /// Overrides the `output_directory` from the project file.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::from_directory(&cli.project)?;
    match cli.command {
        Command::Serve { address } => {
            if let Some(address) = address {
                config.address = address;
            }
            let listener = tokio::net::TcpListener::bind(config.address)
                .await
                .with_context(|| format!("binding {}", config.address))?;
            server::serve(listener, Arc::new(Indexer::new(&config))).await?;
        }
        Command::Build { output } => {
            if let Some(output) = output {
                config.output_directory = output;
            }
            let path = build_site(&config).await?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
