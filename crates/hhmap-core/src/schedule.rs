//! Weekly schedule consolidation.
//!
//! Collapses raw `(day, start, end)` rows into the minimal set of
//! human-readable lines, grouping days that share an identical set of time
//! windows and collapsing consecutive day runs into `"Monday-Wednesday"`
//! style ranges.

use std::collections::BTreeMap;

use crate::venue::ScheduleEntry;

/// Shown when a venue has no valid schedule rows at all.
pub const NO_HOURS_SENTINEL: &str = "No happy hours listed";

/// One rendered schedule line: the day labels and the time windows they share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedLine {
    pub days_label: String,
    pub times_label: String,
}

/// Canonical weekday ordering, Monday=1 through Sunday=7.
///
/// Unrecognized day names sort after Sunday (weight 8) so that garbage
/// upstream values never displace real weekdays from the front of a label.
fn day_order(day: &str) -> u8 {
    match day {
        "Monday" => 1,
        "Tuesday" => 2,
        "Wednesday" => 3,
        "Thursday" => 4,
        "Friday" => 5,
        "Saturday" => 6,
        "Sunday" => 7,
        _ => 8,
    }
}

/// Groups schedule entries into consolidated lines.
///
/// Entries with a blank day, start, or end are dropped. Days collecting an
/// identical (sorted, deduplicated) set of `"start-end"` windows land in the
/// same line; within a line, consecutive days collapse into a range. A day
/// carrying two different windows contributes to two different lines — split
/// hours on one day are legal.
///
/// Line order is deterministic: lines sort by the earliest canonical day
/// they contain.
#[must_use]
pub fn consolidate(entries: &[ScheduleEntry]) -> Vec<ConsolidatedLine> {
    // day -> sorted distinct windows
    let mut day_windows: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for entry in entries {
        if entry.day.trim().is_empty() || entry.start.trim().is_empty() || entry.end.trim().is_empty()
        {
            continue;
        }
        let window = format!("{}-{}", entry.start, entry.end);
        let windows = day_windows.entry(entry.day.as_str()).or_default();
        if !windows.contains(&window) {
            windows.push(window);
        }
    }

    // windows key -> days sharing exactly that set
    let mut groups: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (day, mut windows) in day_windows {
        windows.sort();
        groups.entry(windows.join(", ")).or_default().push(day);
    }

    let mut lines: Vec<ConsolidatedLine> = groups
        .into_iter()
        .map(|(times_label, mut days)| {
            days.sort_by_key(|day| day_order(day));
            ConsolidatedLine {
                days_label: collapse_days(&days),
                times_label,
            }
        })
        .collect();

    lines.sort_by_key(|line| {
        line.days_label
            .split(['-', ','])
            .map(|day| day_order(day.trim()))
            .min()
            .unwrap_or(u8::MAX)
    });
    lines
}

/// Renders the consolidated schedule as display text, one line per group,
/// or the [`NO_HOURS_SENTINEL`] when nothing valid remains.
#[must_use]
pub fn format_schedule(entries: &[ScheduleEntry]) -> String {
    let lines = consolidate(entries);
    if lines.is_empty() {
        return NO_HOURS_SENTINEL.to_string();
    }
    lines
        .iter()
        .map(|line| format!("{} \u{2022} {}", line.days_label, line.times_label))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapses a canonically-ordered day list into range labels: runs of
/// consecutive days (order difference exactly 1) become `"First-Last"`,
/// singletons render as themselves, separate runs join with `", "`.
fn collapse_days(days: &[&str]) -> String {
    let mut ranges: Vec<String> = Vec::new();
    let mut i = 0;
    while i < days.len() {
        let mut j = i;
        while j + 1 < days.len() {
            let next = day_order(days[j + 1]);
            // Unrecognized names (weight 8) never extend a run.
            if next > 7 || next != day_order(days[j]) + 1 {
                break;
            }
            j += 1;
        }
        if i == j {
            ranges.push(days[i].to_string());
        } else {
            ranges.push(format!("{}-{}", days[i], days[j]));
        }
        i = j + 1;
    }
    ranges.join(", ")
}

/// Parses `"HH:MM"` into minutes since midnight.
///
/// Malformed input parses as 0. This leniency is deliberate — upstream time
/// strings are uncontrolled — but it means a venue with a garbled start time
/// can read as active at midnight.
#[must_use]
pub fn parse_time_minutes(text: &str) -> u32 {
    let mut parts = text.splitn(2, ':');
    let hours = parts.next().and_then(|h| h.trim().parse::<u32>().ok());
    let minutes = parts.next().and_then(|m| m.trim().parse::<u32>().ok());
    match (hours, minutes) {
        (Some(h), Some(m)) => h * 60 + m,
        _ => 0,
    }
}
