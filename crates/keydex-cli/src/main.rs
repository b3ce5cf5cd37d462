use clap::{Parser, Subcommand};
use tracing::Level;

mod commands;

#[derive(Parser)]
#[command(
    name = "keydex",
    about = "Build and query sorted binary key indexes over record streams",
    version,
    long_about = "Frames records out of an input stream, reduces each to a \
fixed-length key, and builds a radix-sorted binary index for later \
binary-search lookup. Pass `-` as a file argument to use stdin/stdout."
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from a record stream
    Build(commands::build::BuildArgs),

    /// Print index geometry and optionally dump entries
    Inspect(commands::inspect::InspectArgs),

    /// Print every entry matching a hex key
    Lookup(commands::lookup::LookupArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics on stderr; stdout stays clean for `-` output.
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build(args) => commands::build::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Lookup(args) => commands::lookup::run(args),
    }
}
