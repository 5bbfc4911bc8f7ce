use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "weekplan", version, about = "Weekplan CLI")]
struct Cli {
    /// Week offset from the current week (negative for past weeks)
    #[arg(long, short = 'o', global = true, default_value_t = 0, allow_negative_numbers = true)]
    offset: i64,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the week: days, habits, reminders and quote
    Show {
        /// Print the raw week as JSON
        #[arg(long)]
        json: bool,
    },
    /// List weeks with stored data
    Weeks,
    /// Persist the current snapshot of the week
    Save,
    /// Write the week snapshot to planner_<week key>.json
    Export {
        /// Target directory (default: current directory)
        #[arg(long)]
        dir: Option<std::path::PathBuf>,
    },
    /// Delete all data for the week
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Day priorities
    Priority {
        #[command(subcommand)]
        action: commands::priority::PriorityAction,
    },
    /// Day tasks
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Habit tracker
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Week reminders
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Motivational quote
    Quote {
        #[command(subcommand)]
        action: commands::quote::QuoteAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("WEEKPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let offset = cli.offset;
    let result = match cli.command {
        Commands::Show { json } => commands::week::show(offset, json),
        Commands::Weeks => commands::week::list(),
        Commands::Save => commands::week::save(offset),
        Commands::Export { dir } => commands::week::export(offset, dir),
        Commands::Reset { yes } => commands::week::reset(offset, yes),
        Commands::Priority { action } => commands::priority::run(offset, action),
        Commands::Task { action } => commands::task::run(offset, action),
        Commands::Habit { action } => commands::habit::run(offset, action),
        Commands::Reminder { action } => commands::reminder::run(offset, action),
        Commands::Quote { action } => commands::quote::run(offset, action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
