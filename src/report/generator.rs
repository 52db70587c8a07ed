//! Markdown and JSON rendering of tracker views.
//!
//! Every view can be printed as Markdown tables for people or as JSON for
//! scripts.

use crate::cli::OutputFormat;
use crate::models::{DayTable, LeaderboardEntry, PersonalBests, ProgressReport, Submission};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;

/// Render a view in the requested format.
///
/// `markdown` is only called for [`OutputFormat::Markdown`].
pub fn render<T, F>(value: &T, format: OutputFormat, markdown: F) -> Result<String>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => generate_json(value),
        OutputFormat::Markdown => Ok(markdown(value)),
    }
}

/// Generate pretty JSON for any view.
pub fn generate_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// Confirmation line for a recorded entry.
pub fn submission_message(submission: &Submission) -> String {
    let mut message = format!(
        "Recorded {} {} for {} on {}!",
        submission.count, submission.workout, submission.member, submission.date
    );
    if submission.new_personal_best {
        message.push_str(" 🎉 New Personal Best!");
    }
    message
}

/// Bullet list of registered names.
pub fn generate_registry_list(title: &str, names: &[String]) -> String {
    let mut output = format!("## {}\n\n", title);

    if names.is_empty() {
        output.push_str("_None registered._\n");
        return output;
    }

    for name in names {
        output.push_str(&format!("- {}\n", name));
    }

    output
}

/// Progress table for one day, followed by the day's leader.
pub fn generate_day_section(table: &DayTable) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Progress for {}\n\n", table.date));

    if table.rows.is_empty() {
        section.push_str("No entries recorded for this day.\n");
        return section;
    }

    section.push_str("| Member | Total |");
    for workout in &table.workouts {
        section.push_str(&format!(" {} |", workout));
    }
    section.push('\n');

    section.push_str("|:---|:---:|");
    for _ in &table.workouts {
        section.push_str(":---:|");
    }
    section.push('\n');

    for row in &table.rows {
        section.push_str(&format!("| {} | **{}** |", row.member, row.total));
        for count in &row.counts {
            section.push_str(&format!(" {} |", count));
        }
        section.push('\n');
    }
    section.push('\n');

    if let Some(leader) = table.leader() {
        section.push_str(&format!(
            "🏆 **Leader:** {} with {} reps\n",
            leader.member, leader.total
        ));
    }

    section
}

/// Daily totals per member and the workout distribution over a range.
pub fn generate_progress_section(report: &ProgressReport) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## Progress from {} to {}\n\n",
        report.from, report.to
    ));

    if report.points.is_empty() {
        section.push_str("No entries recorded in this range.\n");
        return section;
    }

    let members: BTreeSet<&str> = report.points.iter().map(|p| p.member.as_str()).collect();
    let dates: BTreeSet<_> = report.points.iter().map(|p| p.date).collect();

    section.push_str("### Daily Totals\n\n");
    section.push_str("| Date |");
    for member in &members {
        section.push_str(&format!(" {} |", member));
    }
    section.push('\n');
    section.push_str("|:---|");
    for _ in &members {
        section.push_str(":---:|");
    }
    section.push('\n');

    for date in &dates {
        section.push_str(&format!("| {} |", date));
        for member in &members {
            let total = report
                .points
                .iter()
                .find(|p| p.date == *date && p.member == *member)
                .map(|p| p.total.to_string())
                .unwrap_or_else(|| "-".to_string());
            section.push_str(&format!(" {} |", total));
        }
        section.push('\n');
    }
    section.push('\n');

    section.push_str("### Workout Distribution\n\n");
    section.push_str("| Member | Workout | Count |\n");
    section.push_str("|:---|:---|:---:|\n");
    for (member, counts) in &report.distribution {
        for (workout, count) in counts {
            section.push_str(&format!("| {} | {} | {} |\n", member, workout, count));
        }
    }

    section
}

/// All-time winners, most wins first.
pub fn generate_leaderboard_section(entries: &[LeaderboardEntry], show_medals: bool) -> String {
    let mut section = String::new();

    section.push_str("## All-Time Winners\n\n");

    if entries.is_empty() {
        section.push_str("No daily winners yet.\n");
        return section;
    }

    for entry in entries {
        let plural = if entry.wins == 1 { "win" } else { "wins" };
        if show_medals {
            section.push_str(&format!(
                "{}. {} **{}** - {} {}\n",
                entry.rank,
                entry.medal.emoji(),
                entry.member,
                entry.wins,
                plural
            ));
        } else {
            section.push_str(&format!(
                "{}. **{}** - {} {}\n",
                entry.rank, entry.member, entry.wins, plural
            ));
        }
    }

    section
}

/// Personal bests grouped by member.
pub fn generate_bests_section(bests: &PersonalBests) -> String {
    let mut section = String::new();

    section.push_str("## Personal Bests\n\n");

    if bests.values().all(|b| b.is_empty()) {
        section.push_str("No personal bests recorded yet.\n");
        return section;
    }

    for (member, workouts) in bests {
        if workouts.is_empty() {
            continue;
        }
        section.push_str(&format!("### 💪 {}\n\n", member));
        for (workout, count) in workouts {
            section.push_str(&format!("- **{}**: {} reps\n", workout, count));
        }
        section.push('\n');
    }

    section
}
