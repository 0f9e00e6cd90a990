use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "fittrack-cli", version, about = "FitTrack CLI")]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account with the step-by-step signup wizard
    Signup {
        /// Keep the session in memory instead of storing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Show steps, calories and progress toward today's goals
    Activity {
        /// Number of days to fetch
        #[arg(long, default_value_t = fittrack_core::activity::DEFAULT_DAYS)]
        days: u32,
        /// Chart period: weekly, monthly or yearly
        #[arg(long, default_value = "weekly")]
        filter: fittrack_core::TimeFilter,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record today's locally counted steps (used when the backend has none)
    Steps {
        /// Step count so far today
        count: u64,
    },
    /// Session management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Signup { dry_run } => commands::signup::run(dry_run),
        Commands::Activity { days, filter, json } => commands::activity::run(days, filter, json),
        Commands::Steps { count } => commands::activity::record_steps(count),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
