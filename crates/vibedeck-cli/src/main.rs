use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vibedeck_core::Config;

mod commands;

#[derive(Parser)]
#[command(name = "vibedeck", version, about = "VibeDeck focus timer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Show the profile counters
    Profile,
    /// Show completed tasks, newest first
    History {
        /// Only show this many entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the idle timer view as JSON
    Status,
    /// Run an interactive focus session
    Focus {
        /// Start in deep mode
        #[arg(long)]
        deep: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_env("VIBEDECK_LOG")
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_logging(&config);

    let result = match cli.command {
        Commands::Task { action } => commands::task::run(&config, action),
        Commands::Profile => commands::profile::run(&config),
        Commands::History { limit } => commands::history::run(&config, limit),
        Commands::Status => commands::status::run(&config),
        Commands::Focus { deep } => commands::focus::run(&config, deep),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
