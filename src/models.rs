//! Data models for the workout tracker.
//!
//! This module contains the persisted snapshot and the derived view
//! structures used throughout the application for day tables, progress,
//! leaderboards and personal bests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Workouts registered when no snapshot exists yet.
pub const DEFAULT_WORKOUTS: [&str; 3] = ["Push-ups", "Pull-ups", "Squats"];

/// Workout name → repetition count for one member on one day.
pub type WorkoutCounts = BTreeMap<String, u64>;

/// Member name → that member's workout counts for a single day.
pub type DayEntries = BTreeMap<String, WorkoutCounts>;

/// Date → every entry recorded on that date.
pub type DailyEntries = BTreeMap<NaiveDate, DayEntries>;

/// Member name → number of days won. Zero-win members are absent.
pub type Statistics = BTreeMap<String, u64>;

/// Member name → workout name → highest count seen.
pub type PersonalBests = BTreeMap<String, WorkoutCounts>;

/// The complete persisted state of the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Registered members, in the order they were added.
    pub members: Vec<String>,
    /// Registered workouts, in the order they were added.
    pub workouts: Vec<String>,
    /// Every recorded repetition count.
    #[serde(default)]
    pub daily_entries: DailyEntries,
    /// Derived win counts. Recomputed on load and before every save.
    #[serde(default)]
    pub statistics: Statistics,
    /// Best count per member and workout.
    #[serde(default)]
    pub personal_bests: PersonalBests,
}

impl Snapshot {
    /// Creates an empty snapshot with the given starting workouts.
    ///
    /// Duplicate names are dropped, keeping the first occurrence.
    pub fn with_workouts<I>(workouts: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut registered: Vec<String> = Vec::new();
        for workout in workouts {
            if !registered.contains(&workout) {
                registered.push(workout);
            }
        }

        Self {
            members: Vec::new(),
            workouts: registered,
            daily_entries: DailyEntries::new(),
            statistics: Statistics::new(),
            personal_bests: PersonalBests::new(),
        }
    }

    /// Returns true if the member is registered.
    pub fn has_member(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }

    /// Returns true if the workout is registered.
    pub fn has_workout(&self, workout: &str) -> bool {
        self.workouts.iter().any(|w| w == workout)
    }

    /// Entries recorded on a given date, if any.
    pub fn entries_on(&self, date: NaiveDate) -> Option<&DayEntries> {
        self.daily_entries.get(&date)
    }

    /// Stored count for one (date, member, workout) triple.
    pub fn entry(&self, date: NaiveDate, member: &str, workout: &str) -> Option<u64> {
        self.daily_entries
            .get(&date)
            .and_then(|day| day.get(member))
            .and_then(|counts| counts.get(workout))
            .copied()
    }

    /// Personal best for a member and workout, if one has been recorded.
    pub fn personal_best(&self, member: &str, workout: &str) -> Option<u64> {
        self.personal_bests
            .get(member)
            .and_then(|bests| bests.get(workout))
            .copied()
    }
}

/// Result of submitting a daily entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub date: NaiveDate,
    pub member: String,
    pub workout: String,
    pub count: u64,
    /// True when the count beat an existing personal best.
    pub new_personal_best: bool,
}

/// One member's line in a day table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRow {
    pub member: String,
    /// Counts aligned with [`DayTable::workouts`]; unrecorded workouts are 0.
    pub counts: Vec<u64>,
    pub total: u64,
}

/// Per-day progress table for every member that logged something.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTable {
    pub date: NaiveDate,
    pub workouts: Vec<String>,
    pub rows: Vec<DayRow>,
}

impl DayTable {
    /// The row with the highest total, when that total is positive.
    ///
    /// Ties go to the lexicographically smallest member name, matching the
    /// daily winner counted on the leaderboard.
    pub fn leader(&self) -> Option<&DayRow> {
        let mut leader: Option<&DayRow> = None;
        for row in &self.rows {
            match leader {
                Some(current)
                    if row.total < current.total
                        || (row.total == current.total && row.member >= current.member) => {}
                _ => leader = Some(row),
            }
        }
        leader.filter(|row| row.total > 0)
    }
}

/// A member's total for one day, used for progress over time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub member: String,
    pub total: u64,
}

/// Progress and workout distribution over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub points: Vec<ProgressPoint>,
    /// Member → workout → summed count over the range.
    pub distribution: BTreeMap<String, WorkoutCounts>,
}

/// Podium position on the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
    /// Everyone past third place.
    Applause,
}

impl Medal {
    /// Medal for a 1-indexed leaderboard rank.
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => Medal::Gold,
            2 => Medal::Silver,
            3 => Medal::Bronze,
            _ => Medal::Applause,
        }
    }

    /// Returns an emoji representation of the medal.
    pub fn emoji(&self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
            Medal::Applause => "👏",
        }
    }
}

/// One line of the all-time winners leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-indexed position.
    pub rank: usize,
    pub member: String,
    pub wins: u64,
    pub medal: Medal,
}
