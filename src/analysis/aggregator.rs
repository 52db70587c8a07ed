//! Daily totals, winners and personal-best tracking.
//!
//! This module provides the aggregation over recorded entries: per-day
//! totals, the daily winner, all-time win counts, and the views built on
//! top of them (day tables, progress, workout distribution, leaderboard).

use crate::models::{
    DailyEntries, DayEntries, DayRow, DayTable, LeaderboardEntry, Medal, PersonalBests,
    ProgressPoint, ProgressReport, Snapshot, Statistics, WorkoutCounts,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Sum of a member's workout counts on one day.
///
/// Returns `None` when the member recorded nothing that day, which is
/// different from a recorded total of zero.
pub fn daily_total(day: &DayEntries, member: &str) -> Option<u64> {
    day.get(member).map(|counts| counts.values().sum())
}

/// Totals for every member recorded on one day.
pub fn daily_totals(day: &DayEntries) -> BTreeMap<String, u64> {
    day.iter()
        .map(|(member, counts)| (member.clone(), counts.values().sum()))
        .collect()
}

/// The registered member with the highest total on one day.
///
/// Members missing from `members` are skipped. Ties go to the member seen
/// first while iterating the day, which for a `BTreeMap` is the
/// lexicographically smallest name.
pub fn daily_winner<'a>(day: &'a DayEntries, members: &[String]) -> Option<&'a str> {
    let mut winner: Option<(&str, u64)> = None;

    for (member, counts) in day {
        if !members.contains(member) {
            continue;
        }
        let total: u64 = counts.values().sum();
        match winner {
            Some((_, best)) if total <= best => {}
            _ => winner = Some((member.as_str(), total)),
        }
    }

    winner.map(|(member, _)| member)
}

/// Count of days won per registered member, recomputed from the full history.
pub fn all_time_statistics(entries: &DailyEntries, members: &[String]) -> Statistics {
    let mut stats = Statistics::new();

    for (date, day) in entries {
        if let Some(winner) = daily_winner(day, members) {
            debug!("{} won {}", winner, date);
            *stats.entry(winner.to_string()).or_insert(0) += 1;
        }
    }

    stats
}

/// Record a submitted count against the stored personal best.
///
/// The first count for a pair becomes the best without being reported as
/// one. Returns true only when the count strictly beats an existing best.
pub fn record_personal_best(
    bests: &mut PersonalBests,
    member: &str,
    workout: &str,
    count: u64,
) -> bool {
    let member_bests = bests.entry(member.to_string()).or_default();

    match member_bests.get_mut(workout) {
        None => {
            member_bests.insert(workout.to_string(), count);
            false
        }
        Some(best) if count > *best => {
            *best = count;
            true
        }
        Some(_) => false,
    }
}

/// Build the progress table for one date.
///
/// Rows follow registry order and only include members with entries that
/// day; workouts a member did not record show as 0.
pub fn day_table(snapshot: &Snapshot, date: NaiveDate) -> DayTable {
    let rows = match snapshot.entries_on(date) {
        Some(day) => snapshot
            .members
            .iter()
            .filter_map(|member| {
                let total = daily_total(day, member)?;
                let counts = &day[member];
                Some(DayRow {
                    member: member.clone(),
                    counts: snapshot
                        .workouts
                        .iter()
                        .map(|w| counts.get(w).copied().unwrap_or(0))
                        .collect(),
                    total,
                })
            })
            .collect(),
        None => Vec::new(),
    };

    DayTable {
        date,
        workouts: snapshot.workouts.clone(),
        rows,
    }
}

/// Per-member daily totals for every date in `from..=to`.
pub fn progress(entries: &DailyEntries, from: NaiveDate, to: NaiveDate) -> Vec<ProgressPoint> {
    if from > to {
        return Vec::new();
    }

    entries
        .range(from..=to)
        .flat_map(|(date, day)| {
            daily_totals(day)
                .into_iter()
                .map(move |(member, total)| ProgressPoint {
                    date: *date,
                    member,
                    total,
                })
        })
        .collect()
}

/// Summed count per member and workout over `from..=to`.
pub fn workout_distribution(
    entries: &DailyEntries,
    from: NaiveDate,
    to: NaiveDate,
) -> BTreeMap<String, WorkoutCounts> {
    let mut dist: BTreeMap<String, WorkoutCounts> = BTreeMap::new();
    if from > to {
        return dist;
    }

    for day in entries.range(from..=to).map(|(_, day)| day) {
        for (member, counts) in day {
            let member_dist = dist.entry(member.clone()).or_default();
            for (workout, count) in counts {
                *member_dist.entry(workout.clone()).or_default() += count;
            }
        }
    }

    dist
}

/// Progress points and workout distribution for a date range.
pub fn progress_report(entries: &DailyEntries, from: NaiveDate, to: NaiveDate) -> ProgressReport {
    ProgressReport {
        from,
        to,
        points: progress(entries, from, to),
        distribution: workout_distribution(entries, from, to),
    }
}

/// Rank members by wins, most first. Equal wins are ordered by name.
pub fn leaderboard(stats: &Statistics) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<(&String, &u64)> = stats.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (member, wins))| LeaderboardEntry {
            rank: idx + 1,
            member: member.clone(),
            wins: *wins,
            medal: Medal::for_rank(idx + 1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn members(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn set(entries: &mut DailyEntries, day: &str, member: &str, workout: &str, count: u64) {
        entries
            .entry(date(day))
            .or_default()
            .entry(member.to_string())
            .or_default()
            .insert(workout.to_string(), count);
    }

    #[test]
    fn test_daily_total_absent_member() {
        let mut entries = DailyEntries::new();
        set(&mut entries, "2024-01-01", "A", "Push-ups", 10);
        set(&mut entries, "2024-01-01", "A", "Squats", 5);

        let day = &entries[&date("2024-01-01")];
        assert_eq!(daily_total(day, "A"), Some(15));
        assert_eq!(daily_total(day, "B"), None);
    }

    #[test]
    fn test_daily_winner_empty_day() {
        let day = DayEntries::new();
        assert_eq!(daily_winner(&day, &members(&["A"])), None);
    }

    #[test]
    fn test_winner_and_statistics_scenario() {
        let mut entries = DailyEntries::new();
        set(&mut entries, "2024-01-01", "A", "Pushups", 10);
        set(&mut entries, "2024-01-01", "B", "Pushups", 20);
        set(&mut entries, "2024-01-02", "A", "Pushups", 30);

        let registered = members(&["A", "B"]);
        assert_eq!(daily_winner(&entries[&date("2024-01-01")], &registered), Some("B"));
        // B has no entry on day 2 and is not counted as zero
        assert_eq!(daily_winner(&entries[&date("2024-01-02")], &registered), Some("A"));

        let stats = all_time_statistics(&entries, &registered);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats.get("A"), Some(&1));
        assert_eq!(stats.get("B"), Some(&1));
    }

    #[test]
    fn test_daily_winner_tie_goes_to_first_in_order() {
        let mut entries = DailyEntries::new();
        set(&mut entries, "2024-01-01", "Zoe", "Squats", 10);
        set(&mut entries, "2024-01-01", "Amy", "Squats", 10);

        let registered = members(&["Zoe", "Amy"]);
        assert_eq!(daily_winner(&entries[&date("2024-01-01")], &registered), Some("Amy"));
    }

    #[test]
    fn test_unregistered_member_never_wins() {
        let mut entries = DailyEntries::new();
        set(&mut entries, "2024-01-01", "A", "Squats", 3);
        set(&mut entries, "2024-01-01", "Ghost", "Squats", 50);
        set(&mut entries, "2024-01-02", "Ghost", "Squats", 10);

        let registered = members(&["A"]);
        assert_eq!(daily_winner(&entries[&date("2024-01-01")], &registered), Some("A"));
        assert_eq!(daily_winner(&entries[&date("2024-01-02")], &registered), None);

        let stats = all_time_statistics(&entries, &registered);
        assert_eq!(stats.get("A"), Some(&1));
        assert!(!stats.contains_key("Ghost"));
    }

    #[test]
    fn test_all_zero_day_still_has_winner() {
        let mut entries = DailyEntries::new();
        set(&mut entries, "2024-01-01", "A", "Squats", 0);
        set(&mut entries, "2024-01-01", "B", "Squats", 0);

        let stats = all_time_statistics(&entries, &members(&["A", "B"]));
        assert_eq!(stats.get("A"), Some(&1));
        assert_eq!(stats.get("B"), None);
    }

    #[test]
    fn test_statistics_are_stable() {
        let mut entries = DailyEntries::new();
        set(&mut entries, "2024-01-01", "A", "Squats", 3);
        set(&mut entries, "2024-01-02", "B", "Squats", 7);
        set(&mut entries, "2024-01-02", "A", "Squats", 2);

        let registered = members(&["A", "B"]);
        assert_eq!(
            all_time_statistics(&entries, &registered),
            all_time_statistics(&entries, &registered)
        );
    }

    #[test]
    fn test_zero_win_members_absent() {
        let mut entries = DailyEntries::new();
        set(&mut entries, "2024-01-01", "A", "Squats", 3);
        set(&mut entries, "2024-01-01", "B", "Squats", 1);

        let stats = all_time_statistics(&entries, &members(&["A", "B"]));
        assert!(!stats.contains_key("B"));
    }

    #[test]
    fn test_record_personal_best_sequence() {
        let mut bests = PersonalBests::new();

        assert!(!record_personal_best(&mut bests, "A", "Pushups", 5));
        assert_eq!(bests["A"]["Pushups"], 5);

        assert!(!record_personal_best(&mut bests, "A", "Pushups", 3));
        assert_eq!(bests["A"]["Pushups"], 5);

        assert!(!record_personal_best(&mut bests, "A", "Pushups", 5));
        assert_eq!(bests["A"]["Pushups"], 5);

        assert!(record_personal_best(&mut bests, "A", "Pushups", 8));
        assert_eq!(bests["A"]["Pushups"], 8);
    }

    #[test]
    fn test_day_table_registry_order_and_zero_fill() {
        let mut snapshot = Snapshot::with_workouts(
            ["Push-ups", "Squats"].iter().map(|s| s.to_string()),
        );
        snapshot.members = vec!["B".to_string(), "A".to_string(), "C".to_string()];
        set(&mut snapshot.daily_entries, "2024-01-01", "A", "Squats", 4);
        set(&mut snapshot.daily_entries, "2024-01-01", "B", "Push-ups", 6);
        set(&mut snapshot.daily_entries, "2024-01-01", "B", "Squats", 1);

        let table = day_table(&snapshot, date("2024-01-01"));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].member, "B");
        assert_eq!(table.rows[0].counts, vec![6, 1]);
        assert_eq!(table.rows[0].total, 7);
        assert_eq!(table.rows[1].member, "A");
        assert_eq!(table.rows[1].counts, vec![0, 4]);
        assert_eq!(table.leader().map(|r| r.member.as_str()), Some("B"));

        let empty = day_table(&snapshot, date("2024-01-02"));
        assert!(empty.rows.is_empty());
    }

    #[test]
    fn test_progress_respects_range() {
        let mut entries = DailyEntries::new();
        set(&mut entries, "2024-01-01", "A", "Squats", 1);
        set(&mut entries, "2024-01-05", "A", "Squats", 2);
        set(&mut entries, "2024-01-05", "A", "Lunges", 3);
        set(&mut entries, "2024-01-10", "A", "Squats", 4);

        let points = progress(&entries, date("2024-01-02"), date("2024-01-10"));
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, date("2024-01-05"));
        assert_eq!(points[0].total, 5);
        assert_eq!(points[1].total, 4);

        assert!(progress(&entries, date("2024-01-10"), date("2024-01-01")).is_empty());
    }

    #[test]
    fn test_workout_distribution_sums() {
        let mut entries = DailyEntries::new();
        set(&mut entries, "2024-01-01", "A", "Squats", 1);
        set(&mut entries, "2024-01-02", "A", "Squats", 2);
        set(&mut entries, "2024-01-02", "B", "Lunges", 3);
        set(&mut entries, "2024-02-01", "A", "Squats", 100);

        let dist = workout_distribution(&entries, date("2024-01-01"), date("2024-01-31"));
        assert_eq!(dist["A"]["Squats"], 3);
        assert_eq!(dist["B"]["Lunges"], 3);
    }

    #[test]
    fn test_leaderboard_ordering() {
        let stats: Statistics = [
            ("Cy".to_string(), 2),
            ("Al".to_string(), 5),
            ("Bo".to_string(), 2),
            ("Di".to_string(), 1),
        ]
        .into_iter()
        .collect();

        let board = leaderboard(&stats);
        let names: Vec<_> = board.iter().map(|e| e.member.as_str()).collect();
        assert_eq!(names, vec!["Al", "Bo", "Cy", "Di"]);
        assert_eq!(board[0].medal, Medal::Gold);
        assert_eq!(board[3].medal, Medal::Applause);
        assert_eq!(board[3].rank, 4);
    }
}
