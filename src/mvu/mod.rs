// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring the entry store, form, table and persistence.

use std::path::PathBuf;

use crate::config::Settings;
use crate::logic::persistence::{self, PersistError, ensure_extension};
use crate::models::{Summary, TimesheetStore};
use crate::ui::components::entry_form::{self, FormEvent, FormModel, FormMsg};
use crate::ui::components::entry_table::{self, TableEvent, TableModel, TableMsg};

/// Destructive actions waiting for the user's confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirm {
    DiscardForNew,
    DiscardForOpen,
    Delete(usize),
    UnsavedOnExit,
}

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Entries of the current session.
    pub store: TimesheetStore,
    /// Input form state.
    pub form: FormModel,
    /// Table selection/sort state.
    pub table: TableModel,
    /// Preferences and last opened file.
    pub settings: Settings,
    /// File the session was loaded from or last saved to.
    pub current_file: Option<PathBuf>,
    /// Whether the store differs from `current_file`.
    pub dirty: bool,
    /// Pending confirmation dialog.
    pub confirm: Option<Confirm>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Set once the window may close.
    pub exit_approved: bool,
}

impl AppModel {
    /// Totals for the status area.
    pub fn summary(&self) -> Summary {
        Summary::compute(self.store.list(), &self.settings.lunch_project)
    }
}

/// Application messages routed through the update function.
#[derive(Debug)]
pub enum Msg {
    Form(FormMsg),
    Table(TableMsg),
    EditSelected,
    DeleteSelected,
    NewRequested,
    OpenRequested,
    OpenPathChosen(Option<PathBuf>),
    Loaded {
        path: PathBuf,
        result: Result<TimesheetStore, PersistError>,
    },
    SaveRequested,
    SaveAsRequested,
    SavePathChosen {
        path: Option<PathBuf>,
        close_after: bool,
    },
    Saved {
        path: PathBuf,
        result: Result<(), PersistError>,
        close_after: bool,
    },
    ExitRequested,
    ExitSaveAndClose,
    ExitDiscard,
    ConfirmAccepted,
    ConfirmRejected,
    SettingsPersisted(Result<(), String>),
    DismissError,
}

/// Commands represent side-effects executed between frames.
pub enum Command {
    PickOpenFile,
    PickSaveFile { close_after: bool },
    Load(PathBuf),
    Save(SavePayload),
    PersistSettings(Settings),
}

/// Snapshot of everything needed to write the timesheet.
pub struct SavePayload {
    /// Target file (with `.json` extension enforced).
    pub output: PathBuf,
    /// Entries to write.
    pub store: TimesheetStore,
    /// Lunch project used for the informational totals.
    pub lunch_project: String,
    /// Close the window once the save succeeds.
    pub close_after: bool,
}

/// Build the initial model; reopens the last timesheet when one is remembered.
pub fn init(settings: Settings) -> (AppModel, Vec<Command>) {
    let mut cmds = Vec::new();
    if let Some(path) = settings.last_file.clone() {
        cmds.push(Command::Load(path));
    }
    let model = AppModel {
        settings,
        ..Default::default()
    };
    (model, cmds)
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::Form(m) => {
            let event = entry_form::update(&mut model.form, m, &model.settings.default_project);
            if let Some(event) = event {
                apply_form_event(model, event);
            }
        }
        Msg::Table(m) => {
            if let Some(TableEvent::EditRequested(index)) = entry_table::update(&mut model.table, m)
            {
                begin_edit(model, Some(index));
            }
        }
        Msg::EditSelected => {
            let selected = model.table.selected();
            begin_edit(model, selected);
        }
        Msg::DeleteSelected => match model.table.selected() {
            Some(index) if index < model.store.len() => {
                model.confirm = Some(Confirm::Delete(index));
            }
            _ => surface_event(model, "Please select an entry to delete".into(), true),
        },
        Msg::NewRequested => {
            if model.dirty {
                model.confirm = Some(Confirm::DiscardForNew);
            } else {
                reset_session(model);
            }
        }
        Msg::OpenRequested => {
            if model.dirty {
                model.confirm = Some(Confirm::DiscardForOpen);
            } else {
                cmds.push(Command::PickOpenFile);
            }
        }
        Msg::OpenPathChosen(Some(path)) => cmds.push(Command::Load(path)),
        Msg::OpenPathChosen(None) => surface_event(model, "Open cancelled.".into(), false),
        Msg::Loaded { path, result } => apply_loaded(model, path, result, cmds),
        Msg::SaveRequested => request_save(model, false, cmds),
        Msg::SaveAsRequested => cmds.push(Command::PickSaveFile { close_after: false }),
        Msg::SavePathChosen {
            path: Some(path),
            close_after,
        } => {
            let output = ensure_extension(path, "json");
            cmds.push(save_command(model, output, close_after));
        }
        Msg::SavePathChosen { path: None, .. } => {
            surface_event(model, "Save cancelled.".into(), false)
        }
        Msg::Saved {
            path,
            result,
            close_after,
        } => match result {
            Ok(()) => {
                model.dirty = false;
                remember_file(model, path.clone(), cmds);
                surface_event(
                    model,
                    format!("Timesheet saved: {}", path.display()),
                    false,
                );
                if close_after {
                    model.exit_approved = true;
                }
            }
            Err(err) => {
                log::error!("save failed: {err}");
                surface_event(model, format!("Failed to save file:\n\n{err}"), true);
            }
        },
        Msg::ExitRequested => {
            if model.dirty {
                model.confirm = Some(Confirm::UnsavedOnExit);
            } else {
                model.exit_approved = true;
            }
        }
        Msg::ExitSaveAndClose => {
            model.confirm = None;
            request_save(model, true, cmds);
        }
        Msg::ExitDiscard => {
            model.confirm = None;
            model.exit_approved = true;
        }
        Msg::ConfirmAccepted => match model.confirm.take() {
            Some(Confirm::DiscardForNew) => reset_session(model),
            Some(Confirm::DiscardForOpen) => cmds.push(Command::PickOpenFile),
            Some(Confirm::Delete(index)) => delete_entry(model, index),
            Some(Confirm::UnsavedOnExit) => request_save(model, true, cmds),
            None => {}
        },
        Msg::ConfirmRejected => model.confirm = None,
        Msg::SettingsPersisted(Ok(())) => {}
        Msg::SettingsPersisted(Err(err)) => log::warn!("failed to persist settings: {err}"),
        Msg::DismissError => model.error = None,
    }
}

/// Execute a command synchronously and return the resulting message.
pub fn run_command(cmd: Command) -> Msg {
    match cmd {
        Command::PickOpenFile => {
            let file = rfd::FileDialog::new()
                .set_title("Open Timesheet")
                .add_filter("JSON Files", &["json"])
                .add_filter("All Files", &["*"])
                .pick_file();
            Msg::OpenPathChosen(file)
        }
        Command::PickSaveFile { close_after } => {
            let path = rfd::FileDialog::new()
                .set_title("Save Timesheet")
                .add_filter("JSON Files", &["json"])
                .set_file_name("timesheet.json")
                .save_file();
            Msg::SavePathChosen { path, close_after }
        }
        Command::Load(path) => {
            let result = persistence::load(&path);
            Msg::Loaded { path, result }
        }
        Command::Save(payload) => {
            let result = persistence::save(&payload.output, &payload.store, &payload.lunch_project);
            Msg::Saved {
                path: payload.output,
                result,
                close_after: payload.close_after,
            }
        }
        Command::PersistSettings(settings) => {
            Msg::SettingsPersisted(settings.save().map_err(|e| format!("{e:#}")))
        }
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

fn apply_form_event(model: &mut AppModel, event: FormEvent) {
    let FormEvent::Submitted { mut entry, replace } = event;
    match replace {
        Some(index) => {
            if let Some(previous) = model.store.get(index) {
                entry.timestamp = previous.timestamp.clone();
            }
            match model.store.update(index, entry) {
                Ok(_) => {
                    model.dirty = true;
                    model.form.clear_after_submit();
                    surface_event(model, "Entry updated.".into(), false);
                }
                Err(err) => surface_event(model, err.to_string(), true),
            }
        }
        None => {
            model.store.add(entry);
            model.dirty = true;
            model.form.clear_after_submit();
            surface_event(model, "Entry added.".into(), false);
        }
    }
}

fn begin_edit(model: &mut AppModel, index: Option<usize>) {
    match index.and_then(|i| model.store.get(i).map(|e| (i, e.clone()))) {
        Some((i, entry)) => {
            model.form.begin_edit(i, &entry);
            surface_event(model, format!("Editing entry from {}.", entry.date_text()), false);
        }
        None => surface_event(model, "Please select an entry to edit".into(), true),
    }
}

fn delete_entry(model: &mut AppModel, index: usize) {
    match model.store.remove(index) {
        Ok(_) => {
            model.dirty = true;
            model.table.on_entry_removed(index);
            model.form.on_entry_removed(index);
            surface_event(model, "Entry deleted.".into(), false);
        }
        Err(err) => surface_event(model, err.to_string(), true),
    }
}

fn reset_session(model: &mut AppModel) {
    model.confirm = None;
    model.store.clear();
    model.current_file = None;
    model.dirty = false;
    model.form = FormModel::default();
    model.table.clear_selection();
    surface_event(model, "New timesheet.".into(), false);
}

fn request_save(model: &mut AppModel, close_after: bool, cmds: &mut Vec<Command>) {
    match model.current_file.clone() {
        Some(path) => cmds.push(save_command(model, path, close_after)),
        None => cmds.push(Command::PickSaveFile { close_after }),
    }
}

fn save_command(model: &AppModel, output: PathBuf, close_after: bool) -> Command {
    Command::Save(SavePayload {
        output,
        store: model.store.clone(),
        lunch_project: model.settings.lunch_project.clone(),
        close_after,
    })
}

fn apply_loaded(
    model: &mut AppModel,
    path: PathBuf,
    result: Result<TimesheetStore, PersistError>,
    cmds: &mut Vec<Command>,
) {
    model.confirm = None;
    model.form = FormModel::default();
    model.table.clear_selection();
    model.dirty = false;

    match result {
        Ok(store) => {
            let count = store.len();
            model.store = store;
            remember_file(model, path.clone(), cmds);
            surface_event(
                model,
                format!("Loaded {count} entries from {}", path.display()),
                false,
            );
        }
        Err(PersistError::NotFound(_)) => {
            log::warn!("{} not found, starting empty", path.display());
            model.store.clear();
            model.current_file = Some(path.clone());
            surface_event(
                model,
                format!(
                    "{} not found; starting with an empty timesheet.",
                    path.display()
                ),
                false,
            );
        }
        Err(err) => {
            log::error!("load failed: {err}");
            model.store.clear();
            model.current_file = None;
            surface_event(model, format!("Failed to load file:\n\n{err}"), true);
        }
    }
}

fn remember_file(model: &mut AppModel, path: PathBuf, cmds: &mut Vec<Command>) {
    model.current_file = Some(path.clone());
    if model.settings.last_file.as_ref() != Some(&path) {
        model.settings.last_file = Some(path);
        cmds.push(Command::PersistSettings(model.settings.clone()));
    }
}
