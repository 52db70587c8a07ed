//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Repboard - daily workout-rep tracker
///
/// Log repetition counts for a small group, see who won each day,
/// and keep an eye on personal bests.
///
/// Examples:
///   repboard member add Alice
///   repboard log Alice Push-ups 40
///   repboard log Alice Squats 55 --date 2024-03-01
///   repboard today
///   repboard progress --from 2024-03-01 --to 2024-03-31
///   repboard leaderboard --format json
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Snapshot file holding all tracker data
    ///
    /// Defaults to workout_data.json or the value in .repboard.toml.
    #[arg(short, long, global = true, value_name = "FILE", env = "REPBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .repboard.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, global = true, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Tracker actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add, remove or list members
    Member {
        #[command(subcommand)]
        action: RegistryAction,
    },

    /// Add, remove or list workouts
    Workout {
        #[command(subcommand)]
        action: RegistryAction,
    },

    /// Record a repetition count
    ///
    /// Logging the same member and workout twice on one day keeps the
    /// latest count.
    Log {
        /// Member name
        member: String,
        /// Workout name
        workout: String,
        /// Number of repetitions
        count: u64,
        /// Day to record (YYYY-MM-DD), defaults to today
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
    },

    /// Show one day's progress table and leader
    Today {
        /// Day to show (YYYY-MM-DD), defaults to today
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
    },

    /// Show daily totals and workout distribution over a date range
    Progress {
        /// First day of the range (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        from: Option<NaiveDate>,
        /// Last day of the range (YYYY-MM-DD), defaults to today
        #[arg(long, value_name = "DATE")]
        to: Option<NaiveDate>,
    },

    /// Recompute and show the all-time winners
    Leaderboard,

    /// Show every member's personal bests
    Bests,

    /// Generate a default .repboard.toml configuration file
    InitConfig,
}

/// Registry subcommands shared by members and workouts.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RegistryAction {
    /// Register a new name (ignored if it already exists)
    Add { name: String },
    /// Remove a name and everything recorded for it
    Remove { name: String },
    /// List registered names
    List,
}

/// Output format for rendered views.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            Command::Member {
                action: RegistryAction::Add { name } | RegistryAction::Remove { name },
            } if name.trim().is_empty() => Err("Member name must not be empty".to_string()),
            Command::Workout {
                action: RegistryAction::Add { name } | RegistryAction::Remove { name },
            } if name.trim().is_empty() => Err("Workout name must not be empty".to_string()),
            Command::Progress {
                from: Some(from),
                to: Some(to),
            } if from > to => Err(format!(
                "--from ({}) must not be after --to ({})",
                from, to
            )),
            _ => Ok(()),
        }
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
