// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Running totals derived from the store: work time, billable time, lunch offset,
//! per-project-letter groups and the expected end of the working day.

use std::collections::BTreeMap;

use chrono::{NaiveTime, TimeDelta};

use crate::models::entry::TimesheetEntry;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Totals shown in the status area. Recomputed from scratch, never patched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    /// Hours of all non-lunch entries.
    pub total_time: f64,
    /// Hours of billable non-lunch entries.
    pub billable_time: f64,
    /// Hours logged under the lunch project.
    pub expected_time_offset: f64,
    /// Billable non-lunch hours keyed by uppercase project initial (`?` when blank).
    pub project_groups: BTreeMap<char, f64>,
}

impl Summary {
    /// Aggregate `entries`, treating `lunch_project` entries as non-work time.
    pub fn compute(entries: &[TimesheetEntry], lunch_project: &str) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            if entry.is_lunch(lunch_project) {
                summary.expected_time_offset += entry.hours;
                continue;
            }

            summary.total_time += entry.hours;
            if entry.billable {
                summary.billable_time += entry.hours;
                *summary
                    .project_groups
                    .entry(project_initial(&entry.project))
                    .or_insert(0.0) += entry.hours;
            }
        }
        summary
    }

    /// Clock time the day ends when it starts at `day_start`; wraps past midnight.
    pub fn expected_finish(&self, day_start: NaiveTime) -> NaiveTime {
        let hours = self.total_time + self.expected_time_offset;
        let minutes = (hours * 60.0).round() as i64;
        day_start + TimeDelta::minutes(minutes.rem_euclid(MINUTES_PER_DAY))
    }

    /// One-line totals label, e.g. `Total Time: 7.5 hours (Billable: 7.5 hours) [K: 7.5h]`.
    pub fn totals_label(&self) -> String {
        let mut label = format!(
            "Total Time: {:.1} hours (Billable: {:.1} hours)",
            self.total_time, self.billable_time
        );
        if !self.project_groups.is_empty() {
            let groups: Vec<String> = self
                .project_groups
                .iter()
                .map(|(letter, hours)| format!("{letter}: {hours:.1}h"))
                .collect();
            label.push_str(&format!(" [{}]", groups.join(", ")));
        }
        label
    }

    /// Label for the expected finish time, e.g. `Expected Time: 04:30 PM`.
    pub fn expected_label(&self, day_start: NaiveTime) -> String {
        format!(
            "Expected Time: {}",
            self.expected_finish(day_start).format("%I:%M %p")
        )
    }
}

fn project_initial(project: &str) -> char {
    project
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().next().unwrap_or(c))
        .unwrap_or('?')
}
