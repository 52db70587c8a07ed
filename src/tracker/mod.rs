//! Tracker state and mutating actions.
//!
//! `Tracker` owns the loaded snapshot. Every mutating action changes the
//! in-memory state completely and then writes the whole snapshot back.

use crate::analysis::{self, record_personal_best};
use crate::models::{
    DayTable, LeaderboardEntry, PersonalBests, ProgressReport, Snapshot, Statistics, Submission,
};
use crate::store::{SnapshotStore, StoreError};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised by tracker actions.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Add at least one member and one workout before logging entries")]
    MissingPrerequisites,

    #[error("Unknown member: {0}")]
    UnknownMember(String),

    #[error("Unknown workout: {0}")]
    UnknownWorkout(String),

    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The application state: the snapshot plus where it is persisted.
#[derive(Debug)]
pub struct Tracker {
    snapshot: Snapshot,
    store: Option<SnapshotStore>,
}

impl Tracker {
    /// Load the snapshot from the store.
    ///
    /// Statistics are recomputed from the entries instead of trusting the
    /// stored values.
    pub fn open(store: SnapshotStore) -> Result<Self, TrackerError> {
        debug!("Using data file {}", store.path().display());
        let snapshot = store.load()?;
        let mut tracker = Self {
            snapshot,
            store: Some(store),
        };
        tracker.warn_on_orphans();
        tracker.snapshot.statistics = analysis::all_time_statistics(
            &tracker.snapshot.daily_entries,
            &tracker.snapshot.members,
        );
        Ok(tracker)
    }

    /// A tracker that never touches the filesystem.
    #[cfg(test)]
    pub fn in_memory(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            store: None,
        }
    }

    /// The current state.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Register a member. Returns false if the name was already registered.
    pub fn add_member(&mut self, name: &str) -> Result<bool, TrackerError> {
        let name = normalize(name, "Member")?;
        if self.snapshot.has_member(name) {
            info!("Member {} already exists, ignoring", name);
            return Ok(false);
        }

        self.snapshot.members.push(name.to_string());
        self.persist()?;
        info!("Added member {}", name);
        Ok(true)
    }

    /// Remove a member with all of their entries, wins and personal bests.
    ///
    /// Returns false if the member was not registered.
    pub fn remove_member(&mut self, name: &str) -> Result<bool, TrackerError> {
        let name = normalize(name, "Member")?;
        if !self.snapshot.has_member(name) {
            warn!("Member {} is not registered", name);
            return Ok(false);
        }

        self.snapshot.members.retain(|m| m != name);
        self.snapshot.daily_entries.retain(|_, day| {
            day.remove(name);
            !day.is_empty()
        });
        self.snapshot.statistics.remove(name);
        self.snapshot.personal_bests.remove(name);

        self.persist()?;
        info!("Removed member {} and all associated data", name);
        Ok(true)
    }

    /// Register a workout. Returns false if the name was already registered.
    pub fn add_workout(&mut self, name: &str) -> Result<bool, TrackerError> {
        let name = normalize(name, "Workout")?;
        if self.snapshot.has_workout(name) {
            info!("Workout {} already exists, ignoring", name);
            return Ok(false);
        }

        self.snapshot.workouts.push(name.to_string());
        self.persist()?;
        info!("Added workout {}", name);
        Ok(true)
    }

    /// Remove a workout and every count and personal best recorded for it.
    ///
    /// Returns false if the workout was not registered.
    pub fn remove_workout(&mut self, name: &str) -> Result<bool, TrackerError> {
        let name = normalize(name, "Workout")?;
        if !self.snapshot.has_workout(name) {
            warn!("Workout {} is not registered", name);
            return Ok(false);
        }

        self.snapshot.workouts.retain(|w| w != name);
        self.snapshot.daily_entries.retain(|_, day| {
            day.retain(|_, counts| {
                counts.remove(name);
                !counts.is_empty()
            });
            !day.is_empty()
        });
        self.snapshot.personal_bests.retain(|_, bests| {
            bests.remove(name);
            !bests.is_empty()
        });

        self.persist()?;
        info!("Removed workout {} and all associated data", name);
        Ok(true)
    }

    /// Record a count for a member and workout on a date.
    ///
    /// A second submission for the same triple overwrites the first. The
    /// personal best is checked before the entry is stored.
    pub fn submit_entry(
        &mut self,
        member: &str,
        workout: &str,
        count: u64,
        date: NaiveDate,
    ) -> Result<Submission, TrackerError> {
        if self.snapshot.members.is_empty() || self.snapshot.workouts.is_empty() {
            return Err(TrackerError::MissingPrerequisites);
        }

        let member = member.trim();
        let workout = workout.trim();
        if !self.snapshot.has_member(member) {
            return Err(TrackerError::UnknownMember(member.to_string()));
        }
        if !self.snapshot.has_workout(workout) {
            return Err(TrackerError::UnknownWorkout(workout.to_string()));
        }

        let new_personal_best =
            record_personal_best(&mut self.snapshot.personal_bests, member, workout, count);

        debug!(
            "Personal best for {} {}: {:?}",
            member,
            workout,
            self.snapshot.personal_best(member, workout)
        );

        if let Some(previous) = self.snapshot.entry(date, member, workout) {
            debug!(
                "Overwriting {} for {} on {} (was {})",
                workout, member, date, previous
            );
        }
        self.snapshot
            .daily_entries
            .entry(date)
            .or_default()
            .entry(member.to_string())
            .or_default()
            .insert(workout.to_string(), count);

        self.persist()?;
        info!("Recorded {} {} for {} on {}", count, workout, member, date);

        Ok(Submission {
            date,
            member: member.to_string(),
            workout: workout.to_string(),
            count,
            new_personal_best,
        })
    }

    /// Recompute the all-time win counts and persist them.
    pub fn refresh_statistics(&mut self) -> Result<&Statistics, TrackerError> {
        self.persist()?;
        Ok(&self.snapshot.statistics)
    }

    /// Current win counts, ranked.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        analysis::leaderboard(&self.snapshot.statistics)
    }

    /// Progress table for one date.
    pub fn day_table(&self, date: NaiveDate) -> DayTable {
        analysis::day_table(&self.snapshot, date)
    }

    /// Progress and workout distribution for `from..=to`.
    pub fn progress_report(&self, from: NaiveDate, to: NaiveDate) -> ProgressReport {
        analysis::progress_report(&self.snapshot.daily_entries, from, to)
    }

    /// Personal bests of every member.
    pub fn personal_bests(&self) -> &PersonalBests {
        &self.snapshot.personal_bests
    }

    /// Recompute derived statistics and write the full snapshot.
    fn persist(&mut self) -> Result<(), TrackerError> {
        self.snapshot.statistics =
            analysis::all_time_statistics(&self.snapshot.daily_entries, &self.snapshot.members);

        if let Some(ref store) = self.store {
            store.save(&self.snapshot)?;
        }
        Ok(())
    }

    /// Log entries that reference names missing from the registries.
    fn warn_on_orphans(&self) {
        let mut members = BTreeSet::new();
        let mut workouts = BTreeSet::new();

        for day in self.snapshot.daily_entries.values() {
            for (member, counts) in day {
                if !self.snapshot.has_member(member) {
                    members.insert(member.as_str());
                }
                for workout in counts.keys() {
                    if !self.snapshot.has_workout(workout) {
                        workouts.insert(workout.as_str());
                    }
                }
            }
        }

        for member in members {
            warn!("Entries reference unregistered member {}", member);
        }
        for workout in workouts {
            warn!("Entries reference unregistered workout {}", workout);
        }
    }
}

fn normalize<'a>(name: &'a str, kind: &'static str) -> Result<&'a str, TrackerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TrackerError::EmptyName(kind));
    }
    Ok(name)
}
