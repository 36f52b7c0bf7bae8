// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Timesheet entry domain model and the invariants every stored entry satisfies.

use chrono::{Local, NaiveDate};

/// Calendar format accepted for entry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wall-clock format used for the "recorded at" timestamp.
pub const TIMESTAMP_FORMAT: &str = "%I:%M:%S %p";

/// A single recorded unit of work.
#[derive(Clone, Debug, PartialEq)]
pub struct TimesheetEntry {
    /// Calendar date the work occurred.
    pub date: NaiveDate,
    /// Free-text label for the task.
    pub description: String,
    /// Duration in hours; always finite and non-negative.
    pub hours: f64,
    /// Short project code used for grouping.
    pub project: String,
    /// Whether the hours count as billable.
    pub billable: bool,
    /// Local wall-clock time the entry was recorded.
    pub timestamp: String,
}

impl TimesheetEntry {
    /// Build an entry stamped with the current local time.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        hours: f64,
        project: impl Into<String>,
        billable: bool,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            hours,
            project: project.into(),
            billable,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// True when the entry satisfies the hours invariant.
    pub fn has_valid_hours(&self) -> bool {
        self.hours.is_finite() && self.hours >= 0.0
    }

    /// True when the entry is logged against the given lunch project.
    pub fn is_lunch(&self, lunch_project: &str) -> bool {
        self.project
            .trim()
            .eq_ignore_ascii_case(lunch_project.trim())
    }

    /// Date rendered in [`DATE_FORMAT`].
    pub fn date_text(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// True when `hours` lands on a 0.1-hour step.
pub fn is_tenth_increment(hours: f64) -> bool {
    let scaled = hours * 10.0;
    (scaled - scaled.round()).abs() < 1e-6
}
