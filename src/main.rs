//! Repboard - daily workout-rep tracker
//!
//! A CLI tool that records repetition counts for a small group,
//! works out daily winners, keeps an all-time leaderboard and
//! flags new personal bests.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable or corrupt data file, unknown names, etc.)
//!   3 - No members or workouts registered yet, so nothing can be logged

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod store;
mod tracker;

use anyhow::{bail, Context, Result};
use chrono::{Days, Local, NaiveDate};
use cli::{Args, Command, OutputFormat, RegistryAction};
use config::{Config, CONFIG_FILE_NAME};
use store::SnapshotStore;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;
use tracker::{Tracker, TrackerError};

/// Exit code for "add members and workouts first".
const EXIT_MISSING_PREREQUISITES: i32 = 3;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if args.command == Command::InitConfig {
        return handle_init_config();
    }

    let (mut config, config_source) = load_config(&args)?;
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("Repboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {}", config_source);

    match run_command(&args, &config) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            if let Some(TrackerError::MissingPrerequisites) = e.downcast_ref::<TrackerError>() {
                eprintln!("⚠️  {}", e);
                eprintln!("   Try: repboard member add <NAME> / repboard workout add <NAME>");
                std::process::exit(EXIT_MISSING_PREREQUISITES);
            }

            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .repboard.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the data file, default workouts and output format.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems with the default file are
/// reported on stderr directly.
fn load_config(args: &Args) -> Result<(Config, String)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, format!("loaded from {}", config_path.display())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, format!("loaded from {}", CONFIG_FILE_NAME))),
        Ok(None) => Ok((Config::default(), "no config file found, using defaults".to_string())),
        Err(e) => {
            eprintln!("⚠️  Failed to load config: {:#}", e);
            Ok((Config::default(), "invalid config file, using defaults".to_string()))
        }
    }
}

/// Run one tracker action and return what should be printed.
fn run_command(args: &Args, config: &Config) -> Result<String> {
    let data_file = &config.general.data_file;
    let store = SnapshotStore::new(data_file, config.tracker.default_workouts.clone());
    let mut tracker = Tracker::open(store)
        .with_context(|| format!("Failed to load tracker data from {}", data_file.display()))?;

    let format = config.report.format;
    let today = Local::now().date_naive();

    match &args.command {
        Command::Member { action } => {
            handle_registry(&mut tracker, Registry::Members, action, format)
        }
        Command::Workout { action } => {
            handle_registry(&mut tracker, Registry::Workouts, action, format)
        }
        Command::Log {
            member,
            workout,
            count,
            date,
        } => {
            let submission =
                tracker.submit_entry(member, workout, *count, date.unwrap_or(today))?;
            report::render(&submission, format, report::submission_message)
        }
        Command::Today { date } => {
            let table = tracker.day_table(date.unwrap_or(today));
            report::render(&table, format, report::generate_day_section)
        }
        Command::Progress { from, to } => {
            let (from, to) = progress_range(
                *from,
                *to,
                today,
                config.tracker.progress_window_days,
            )?;
            let progress = tracker.progress_report(from, to);
            report::render(&progress, format, report::generate_progress_section)
        }
        Command::Leaderboard => {
            tracker.refresh_statistics()?;
            let board = tracker.leaderboard();
            let show_medals = config.report.show_medals;
            report::render(board.as_slice(), format, |entries| {
                report::generate_leaderboard_section(entries, show_medals)
            })
        }
        Command::Bests => report::render(
            tracker.personal_bests(),
            format,
            report::generate_bests_section,
        ),
        Command::InitConfig => unreachable!("init-config is handled before the tracker opens"),
    }
}

#[derive(Debug, Clone, Copy)]
enum Registry {
    Members,
    Workouts,
}

/// Add, remove or list members or workouts.
fn handle_registry(
    tracker: &mut Tracker,
    registry: Registry,
    action: &RegistryAction,
    format: OutputFormat,
) -> Result<String> {
    match action {
        RegistryAction::Add { name } => {
            let added = match registry {
                Registry::Members => tracker.add_member(name)?,
                Registry::Workouts => tracker.add_workout(name)?,
            };
            Ok(if added {
                format!("✅ Added {}", name.trim())
            } else {
                format!("ℹ️  {} is already registered, nothing changed", name.trim())
            })
        }
        RegistryAction::Remove { name } => {
            let removed = match registry {
                Registry::Members => tracker.remove_member(name)?,
                Registry::Workouts => tracker.remove_workout(name)?,
            };
            if !removed {
                bail!("{} is not registered", name.trim());
            }
            Ok(format!("🗑️  Removed {} and all associated data", name.trim()))
        }
        RegistryAction::List => {
            let (title, names) = match registry {
                Registry::Members => ("Members", &tracker.snapshot().members),
                Registry::Workouts => ("Workouts", &tracker.snapshot().workouts),
            };
            report::render(names.as_slice(), format, |names| {
                report::generate_registry_list(title, names)
            })
        }
    }
}

/// Resolve the progress range, defaulting to the configured window ending today.
fn progress_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
    window_days: u32,
) -> Result<(NaiveDate, NaiveDate)> {
    let to = to.unwrap_or(today);
    let from = match from {
        Some(from) => from,
        None => to
            .checked_sub_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MIN),
    };

    if from > to {
        bail!("--from ({}) must not be after --to ({})", from, to);
    }

    Ok((from, to))
}
