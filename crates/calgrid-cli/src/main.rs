use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "calgrid", version, about = "calgrid calendar layout CLI")]
struct Cli {
    /// Config file to use instead of ~/.config/calgrid/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one day's time grid
    Day(commands::day::DayArgs),
    /// Lay out a week: time grid plus header strip
    Week(commands::week::WeekArgs),
    /// Build the 42-cell month grid
    Month(commands::month::MonthArgs),
    /// List public holidays for a year
    Holidays(commands::holidays::HolidaysArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Day(args) => commands::day::run(args, config),
        Commands::Week(args) => commands::week::run(args, config),
        Commands::Month(args) => commands::month::run(args, config),
        Commands::Holidays(args) => commands::holidays::run(args, config),
        Commands::Config { action } => commands::config::run(action, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
