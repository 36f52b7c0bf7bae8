// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Entry form: raw text inputs validated into a [`TimesheetEntry`], MVU-style.

use chrono::{Local, NaiveDate};
use eframe::egui;
use egui_extras::DatePickerButton;
use thiserror::Error;

use crate::models::TimesheetEntry;
use crate::models::entry::{DATE_FORMAT, is_tenth_increment};

/// Why raw form input could not become an entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid hours '{input}': {reason}")]
    InvalidHours { input: String, reason: &'static str },
}

/// Text buffers backing the form plus edit state.
#[derive(Clone, Debug, PartialEq)]
pub struct FormModel {
    pub date: String,
    pub hours: String,
    pub project: String,
    pub description: String,
    pub billable: bool,
    /// Store index of the entry being edited, if any.
    editing: Option<usize>,
    /// Stored hours of the edited entry; kept when the hours text is left untouched.
    edit_hours: Option<f64>,
    /// Inline validation error for the last submit.
    error: Option<String>,
}

impl Default for FormModel {
    fn default() -> Self {
        Self {
            date: Local::now().date_naive().format(DATE_FORMAT).to_string(),
            hours: String::new(),
            project: String::new(),
            description: String::new(),
            billable: false,
            editing: None,
            edit_hours: None,
            error: None,
        }
    }
}

impl FormModel {
    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Populate the form from an existing entry and remember which one is edited.
    pub fn begin_edit(&mut self, index: usize, entry: &TimesheetEntry) {
        self.date = entry.date_text();
        self.hours = format_hours(entry.hours);
        self.project = entry.project.clone();
        self.description = entry.description.clone();
        self.billable = entry.billable;
        self.editing = Some(index);
        self.edit_hours = Some(entry.hours);
        self.error = None;
    }

    /// Clear per-entry fields after a successful submit; the date is kept for the next entry.
    pub fn clear_after_submit(&mut self) {
        self.hours.clear();
        self.project.clear();
        self.description.clear();
        self.billable = false;
        self.editing = None;
        self.edit_hours = None;
        self.error = None;
    }

    /// Keep the edit target pointing at the same entry after a removal at `removed`.
    pub fn on_entry_removed(&mut self, removed: usize) {
        match self.editing {
            Some(i) if i == removed => self.clear_after_submit(),
            Some(i) if i > removed => self.editing = Some(i - 1),
            _ => {}
        }
    }
}

/// Messages emitted by the form view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMsg {
    DateChanged(String),
    DatePicked(NaiveDate),
    HoursChanged(String),
    ProjectChanged(String),
    DescriptionChanged(String),
    BillableToggled(bool),
    Submit,
    CancelEdit,
}

/// Validated entry ready for the store.
#[derive(Clone, Debug, PartialEq)]
pub enum FormEvent {
    /// Append `entry`, or replace the entry at `replace` when editing.
    Submitted {
        entry: TimesheetEntry,
        replace: Option<usize>,
    },
}

/// Apply a message to the form. A successful submit yields the entry to store.
pub fn update(model: &mut FormModel, msg: FormMsg, default_project: &str) -> Option<FormEvent> {
    match msg {
        FormMsg::DateChanged(text) => model.date = text,
        FormMsg::DatePicked(date) => model.date = date.format(DATE_FORMAT).to_string(),
        FormMsg::HoursChanged(text) => model.hours = text,
        FormMsg::ProjectChanged(text) => model.project = text,
        FormMsg::DescriptionChanged(text) => model.description = text,
        FormMsg::BillableToggled(on) => model.billable = on,
        FormMsg::CancelEdit => model.clear_after_submit(),
        FormMsg::Submit => match validate(model, default_project) {
            Ok(entry) => {
                model.error = None;
                return Some(FormEvent::Submitted {
                    entry,
                    replace: model.editing,
                });
            }
            Err(err) => model.error = Some(err.to_string()),
        },
    }
    None
}

/// Turn the form buffers into an entry without touching the form.
pub fn validate(model: &FormModel, default_project: &str) -> Result<TimesheetEntry, FormError> {
    let date = parse_date(&model.date)?;
    let hours = match model.edit_hours {
        Some(stored) if model.hours.trim() == format_hours(stored) => stored,
        _ => parse_hours(&model.hours)?,
    };
    let project = match model.project.trim() {
        "" => default_project.to_string(),
        p => p.to_string(),
    };

    Ok(TimesheetEntry::new(
        date,
        model.description.trim(),
        hours,
        project,
        model.billable,
    ))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, FormError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| FormError::InvalidDate(trimmed.to_string()))
}

/// Parse a finite, non-negative number of hours on a 0.1 step.
pub fn parse_hours(raw: &str) -> Result<f64, FormError> {
    let trimmed = raw.trim();
    let invalid = |reason| FormError::InvalidHours {
        input: trimmed.to_string(),
        reason,
    };

    let hours: f64 = trimmed.parse().map_err(|_| invalid("not a number"))?;
    if !hours.is_finite() {
        return Err(invalid("not a number"));
    }
    if hours < 0.0 {
        return Err(invalid("must not be negative"));
    }
    if !is_tenth_increment(hours) {
        return Err(invalid("must be in increments of 0.1 hours"));
    }
    Ok(hours)
}

/// Render hours without trailing noise (`7.5`, `8.0`); off-step values keep every digit (`0.25`).
pub fn format_hours(hours: f64) -> String {
    if is_tenth_increment(hours) {
        format!("{:.1}", hours)
    } else {
        hours.to_string()
    }
}

/// Render the input row and return any messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &FormModel, default_project: &str) -> Vec<FormMsg> {
    let mut msgs = Vec::new();

    ui.horizontal_wrapped(|ui| {
        ui.label("Date:");
        let mut date_text = model.date.clone();
        if ui
            .add(
                egui::TextEdit::singleline(&mut date_text)
                    .hint_text("YYYY-MM-DD")
                    .desired_width(90.0),
            )
            .changed()
        {
            msgs.push(FormMsg::DateChanged(date_text));
        }
        let mut picked = parse_date(&model.date).unwrap_or_else(|_| Local::now().date_naive());
        if ui
            .add(DatePickerButton::new(&mut picked).show_icon(true))
            .changed()
        {
            msgs.push(FormMsg::DatePicked(picked));
        }

        ui.label("Hours:");
        let mut hours = model.hours.clone();
        if ui
            .add(
                egui::TextEdit::singleline(&mut hours)
                    .hint_text("0.0")
                    .desired_width(60.0),
            )
            .changed()
        {
            msgs.push(FormMsg::HoursChanged(hours));
        }

        let mut billable = model.billable;
        if ui
            .checkbox(&mut billable, "B")
            .on_hover_text("Billable")
            .changed()
        {
            msgs.push(FormMsg::BillableToggled(billable));
        }

        ui.label("Project:");
        let mut project = model.project.clone();
        if ui
            .add(
                egui::TextEdit::singleline(&mut project)
                    .hint_text(default_project)
                    .desired_width(60.0),
            )
            .changed()
        {
            msgs.push(FormMsg::ProjectChanged(project));
        }

        ui.label("Description:");
        let mut description = model.description.clone();
        let desc_resp = ui.add(
            egui::TextEdit::singleline(&mut description)
                .hint_text("wrote code and cried")
                .desired_width(220.0),
        );
        if desc_resp.changed() {
            msgs.push(FormMsg::DescriptionChanged(description));
        }
        if desc_resp.lost_focus() && ui.input(|inp| inp.key_pressed(egui::Key::Enter)) {
            msgs.push(FormMsg::Submit);
        }

        let submit_label = if model.editing.is_some() {
            format!("{} Save changes", egui_phosphor::regular::CHECK)
        } else {
            format!("{} Add Entry", egui_phosphor::regular::PLUS)
        };
        if ui.button(submit_label).clicked() {
            msgs.push(FormMsg::Submit);
        }
        if model.editing.is_some()
            && ui
                .button(format!("{} Cancel edit", egui_phosphor::regular::X))
                .clicked()
        {
            msgs.push(FormMsg::CancelEdit);
        }
    });

    if let Some(err) = model.error() {
        ui.label(egui::RichText::new(err).color(ui.visuals().error_fg_color));
    }

    msgs
}
