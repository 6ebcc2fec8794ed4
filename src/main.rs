//! centinela CLI entry point

use centinela::{
    commands::{
        cmd_ask, cmd_ingest, cmd_init, cmd_status, print_ask_result, print_ingest_stats,
        print_status,
    },
    config::Config,
    embed::{create_embedder, Embedder},
    error::Result,
    retrieve::RetrievalService,
    store::VectorStore,
    tools::{bandwidth, report},
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "centinela")]
#[command(version, about = "Manual-grounded assistant for electronic-security maintenance", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "CENTINELA_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize centinela configuration and index directory
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Ingest PDF manuals into the vector index
    Ingest {
        /// Directory of PDF manuals (defaults to data_dir from config)
        dir: Option<PathBuf>,
    },

    /// Retrieve manual context for a question
    Ask {
        /// The question
        question: String,

        /// Number of chunks to retrieve
        #[arg(short, long, default_value = "3")]
        limit: usize,
    },

    /// Show index status
    Status,

    /// File a maintenance incident report
    Report {
        /// Failing system or device
        #[arg(long)]
        equipment: String,

        /// Short description of the failure
        #[arg(long)]
        failure: String,

        /// Low, Medium, or High
        #[arg(long, default_value = "Medium")]
        priority: String,
    },

    /// Estimate CCTV network bandwidth
    Bandwidth {
        /// Number of cameras
        #[arg(long)]
        cameras: u32,

        /// 720p, 1080p, or 4K
        #[arg(long, default_value = "1080p")]
        resolution: String,

        /// Frames per second
        #[arg(long, default_value = "25")]
        fps: u32,
    },

    /// Print the tool definitions exposed to the agent host as JSON
    Tools,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Commands that need no config or index
    match &cli.command {
        Commands::Init { force } => {
            let base_dir = cli.config.as_ref().and_then(|p| p.parent().map(PathBuf::from));
            let config = cmd_init(base_dir, *force).await?;
            println!("✓ centinela initialized");
            println!("  Config: {}", config.paths.config_file.display());
            println!("\nNext steps:");
            println!("  1. Edit the config file to customize settings");
            println!("  2. Ingest manuals: centinela ingest /path/to/manuals");
            return Ok(());
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "centinela", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Tools => {
            let definitions = centinela::tools::get_tool_definitions();
            println!("{}", serde_json::to_string_pretty(&definitions)?);
            return Ok(());
        }
        Commands::Report {
            equipment,
            failure,
            priority,
        } => {
            let priority: report::Priority = priority.parse()?;
            println!("{}", report::create_report(equipment, failure, priority));
            return Ok(());
        }
        Commands::Bandwidth {
            cameras,
            resolution,
            fps,
        } => {
            let resolution: bandwidth::Resolution = resolution.parse()?;
            let estimate = bandwidth::calculate_bandwidth(*cameras, resolution, *fps);
            println!("{}", bandwidth::format_estimate(&estimate));
            return Ok(());
        }
        _ => {}
    }

    // Load configuration; validation fails fast before any processing
    let config = match cli.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::load_from(None)?,
    };

    match cli.command {
        Commands::Ingest { dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.data_dir));
            let embedder = create_embedder(&config.embedding)?;
            let store = VectorStore::open(
                &config.paths.index_dir,
                &config.embedding.model,
                config.embedding.dimension,
            )?;

            let stats = cmd_ingest(&config, embedder.as_ref(), &store, &dir).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_ingest_stats(&stats);
            }
        }

        Commands::Ask { question, limit } => {
            // Built once here and shared: the embedder and store live for
            // the whole process, however many questions come through
            let embedder: Arc<dyn Embedder> = Arc::from(create_embedder(&config.embedding)?);
            let store = Arc::new(VectorStore::open(
                &config.paths.index_dir,
                &config.embedding.model,
                config.embedding.dimension,
            )?);
            let service = RetrievalService::new(embedder, store, &config.query);

            let result = cmd_ask(&service, &question, limit).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_ask_result(&result);
            }
        }

        Commands::Status => {
            let store = VectorStore::open(
                &config.paths.index_dir,
                &config.embedding.model,
                config.embedding.dimension,
            )?;

            let status = cmd_status(&config, &store).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }

        Commands::Init { .. }
        | Commands::Completions { .. }
        | Commands::Tools
        | Commands::Report { .. }
        | Commands::Bandwidth { .. } => unreachable!(),
    }

    Ok(())
}
