use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "loadsim",
    about = "loadsim — discrete-time load balancer simulation",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Log output format: text or json
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation and print its summary.
    ///
    /// Settings come from --config, then flags. The server count and tick
    /// count are prompted for on stdin if neither supplies them.
    Run {
        #[command(flatten)]
        args: commands::RunArgs,
    },
    /// Run several seeds of the same simulation in parallel
    Batch {
        #[command(flatten)]
        args: commands::RunArgs,
        /// Number of runs
        #[arg(long, default_value = "4")]
        runs: usize,
        /// First seed; defaults to the configured seed
        #[arg(long)]
        seed_base: Option<u64>,
    },
    /// Write a scaffold loadsim.toml
    Init {
        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        path: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,loadsim=info"));
    match format {
        "json" => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_format);

    match cli.command {
        Commands::Run { args } => commands::run::run(&args),
        Commands::Batch {
            args,
            runs,
            seed_base,
        } => commands::batch::batch(&args, runs, seed_base).await,
        Commands::Init { path, force } => commands::init::init(&path, force),
    }
}
