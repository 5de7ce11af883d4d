use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use parley::config::Config;
use parley::config::LogLevel;
use parley::nlu::CommandBuilder;
use parley::registry::DeviceRegistry;
use parley::registry::JsonFileStore;
use parley::session::Session;
use tracing_subscriber::filter::LevelFilter;

/// Rule-based natural-language assistant for lights and alarms.
#[derive(Debug, Parser)]
#[command(name = "parley", version)]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value = "parley.toml")]
    config: PathBuf,

    /// Override the device store path from the config
    #[arg(long)]
    store: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<LogLevel>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_file(&args.config)?;

    let level = args.log_level.unwrap_or(config.logging.level);
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from(level))
        .init();

    tracing::info!("parley starting");

    let store_path = args.store.unwrap_or(config.store.path);
    tracing::info!("device store: {}", store_path.display());

    // Store problems at startup are fatal; the registry can't run without
    // its backing store.
    let registry = DeviceRegistry::open(Box::new(JsonFileStore::new(&store_path)))?;
    let mut session = Session::new(CommandBuilder::with_defaults(), registry);

    let stdin = std::io::stdin();
    session.run(
        || {
            print!("You: ");
            let _ = std::io::stdout().flush();
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => None,
                Ok(_) => Some(line),
            }
        },
        |text| println!("Assistant: {text}"),
    );

    tracing::info!("parley session ended");
    Ok(())
}
