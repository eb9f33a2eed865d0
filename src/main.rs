use batchsort::config::ServerConfig;
use batchsort::executor::{create_executor, ExecutionMode};
use batchsort::server::{process_body, SortServer};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::{debug, error, trace};

/// Sort batches of integer sequences
#[derive(Parser)]
#[command(name = "batchsort", version)]
#[command(about = "Sort batches of integer sequences sequentially or concurrently", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP sort server (default command)
    Serve {
        /// Path to a TOML configuration file
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Address to listen on (overrides config and environment)
        #[arg(short, long)]
        listen: Option<SocketAddr>,

        /// Worker count for the pooled executor
        #[arg(short, long)]
        workers: Option<NonZeroUsize>,
    },
    /// Sort a request body from a file or stdin and print the response
    Sort {
        /// Execution strategy
        #[arg(short, long, value_enum, default_value_t = ExecutionMode::Concurrent)]
        mode: ExecutionMode,

        /// Worker count for the pooled executor
        #[arg(short, long)]
        workers: Option<NonZeroUsize>,

        /// File holding a `{"to_sort": [...]}` body (reads stdin when omitted)
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        Some(Commands::Serve { config, .. }) => config.clone(),
        _ => None,
    };
    let config = match ServerConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let log_level = match cli.verbose {
        0 => config.log_level.as_str(),
        1 => "debug",
        2 => "trace",
        _ => "trace,hyper=debug,tower=debug", // -vvv shows everything including dependencies
    };

    // stdout carries the `sort` subcommand's JSON, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(cli.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .init();

    debug!("batchsort started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let result = match cli.command {
        Some(Commands::Serve {
            listen, workers, ..
        }) => run_serve(config, listen, workers).await,
        Some(Commands::Sort {
            mode,
            workers,
            input,
        }) => run_sort(config, mode, workers, input).await,
        None => run_serve(config, None, None).await,
    };

    if let Err(e) = result {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_serve(
    mut config: ServerConfig,
    listen: Option<SocketAddr>,
    workers: Option<NonZeroUsize>,
) -> anyhow::Result<()> {
    if let Some(listen) = listen {
        config.listen_addr = listen;
    }
    if let Some(workers) = workers {
        config.pool_workers = workers.get();
    }

    SortServer::new(config)?.start().await?;
    Ok(())
}

async fn run_sort(
    config: ServerConfig,
    mode: ExecutionMode,
    workers: Option<NonZeroUsize>,
    input: Option<PathBuf>,
) -> anyhow::Result<()> {
    let body = match input {
        Some(path) => tokio::fs::read(&path).await?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let workers = match workers {
        Some(workers) => workers,
        None => config.pool_workers()?,
    };
    let executor = create_executor(mode, workers);
    let response = process_body(executor.as_ref(), &body).await?;

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
