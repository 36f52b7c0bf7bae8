// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for the timesheet.
//! Handles layout, file actions, dialogs, and wiring to persistence.

pub mod components;

use eframe::egui;

use crate::config::Settings;
use crate::mvu::{self, AppModel, Command, Confirm, Msg};
use crate::ui::components::{entry_form, entry_table};

/// Stateful egui application for recording timesheet entries.
pub struct TimesheetApp {
    model: AppModel,
    inbox: Vec<Msg>,
    pending: Vec<Command>,
    close_sent: bool,
}

impl TimesheetApp {
    /// Build the app from loaded settings; the remembered file is opened on the first frame.
    pub fn new(settings: Settings) -> Self {
        let (model, pending) = mvu::init(settings);
        Self {
            model,
            inbox: Vec::new(),
            pending,
            close_sent: false,
        }
    }
}

impl eframe::App for TimesheetApp {
    /// Drives a single UI frame: runs queued commands, applies messages to the model,
    /// then renders the top bar, entry form, table, totals and any open dialog.
    ///
    /// Commands run synchronously on the UI thread; each produces one message that is fed
    /// back through [`mvu::update`] within the same frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);

        if ctx.input(|i| i.viewport().close_requested()) && !self.model.exit_approved {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.inbox.push(Msg::ExitRequested);
        }

        self.process(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                self.render_file_actions(ui);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(2.0);
                    egui::widgets::global_theme_preference_switch(ui);
                    ui.separator();
                    self.render_file_label(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);
        self.render_confirm_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_totals(ui);
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            let form_msgs =
                entry_form::view(ui, &self.model.form, &self.model.settings.default_project);
            self.inbox.extend(form_msgs.into_iter().map(Msg::Form));
            ui.add_space(6.0);

            self.render_row_actions(ui);
            ui.separator();

            let table_msgs = entry_table::view(ui, &self.model.table, self.model.store.list());
            self.inbox.extend(table_msgs.into_iter().map(Msg::Table));
        });

        if !self.inbox.is_empty() || !self.pending.is_empty() {
            ctx.request_repaint();
        }
    }
}

impl TimesheetApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    /// Run queued commands and drain the inbox until no message is left.
    fn process(&mut self, ctx: &egui::Context) {
        for cmd in std::mem::take(&mut self.pending) {
            self.inbox.push(mvu::run_command(cmd));
        }

        let mut msgs = std::mem::take(&mut self.inbox);
        msgs.reverse();
        while let Some(msg) = msgs.pop() {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                msgs.push(mvu::run_command(cmd));
            }
        }

        if self.model.exit_approved && !self.close_sent {
            self.close_sent = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// File actions: New, Open, Save, Save As, Exit.
    fn render_file_actions(&mut self, ui: &mut egui::Ui) {
        use egui_phosphor::regular as icons;

        let actions: [(String, fn() -> Msg); 5] = [
            (format!("{} New", icons::FILE_PLUS), || Msg::NewRequested),
            (format!("{} Open", icons::FOLDER_OPEN), || Msg::OpenRequested),
            (format!("{} Save", icons::FLOPPY_DISK), || Msg::SaveRequested),
            (format!("{} Save As", icons::FLOPPY_DISK_BACK), || Msg::SaveAsRequested),
            (format!("{} Exit", icons::SIGN_OUT), || Msg::ExitRequested),
        ];
        for (label, msg) in actions {
            if ui.button(label).clicked() {
                self.inbox.push(msg());
            }
        }
    }

    /// Current file name with an unsaved-changes marker.
    fn render_file_label(&self, ui: &mut egui::Ui) {
        let name = self
            .model
            .current_file
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string());
        let marker = if self.model.dirty { " •" } else { "" };
        ui.label(
            egui::RichText::new(format!("{name}{marker}")).color(egui::Color32::from_gray(140)),
        );
    }

    /// Edit/Delete buttons acting on the selected row.
    fn render_row_actions(&mut self, ui: &mut egui::Ui) {
        let has_selection = self.model.table.selected().is_some();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    has_selection,
                    egui::Button::new(format!("{} Edit", egui_phosphor::regular::PENCIL_SIMPLE)),
                )
                .on_disabled_hover_text("Select an entry first")
                .clicked()
            {
                self.inbox.push(Msg::EditSelected);
            }
            if ui
                .add_enabled(
                    has_selection,
                    egui::Button::new(format!("{} Delete", egui_phosphor::regular::TRASH_SIMPLE)),
                )
                .on_disabled_hover_text("Select an entry first")
                .clicked()
            {
                self.inbox.push(Msg::DeleteSelected);
            }
        });
    }

    /// Totals and expected finish time.
    fn render_totals(&self, ui: &mut egui::Ui) {
        let summary = self.model.summary();
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(summary.totals_label());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(summary.expected_label(self.model.settings.day_start_time()));
            });
        });
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Yes/No (or Save/Discard/Cancel on exit) confirmation for destructive actions.
    /// Blocks the rest of the window while open.
    fn render_confirm_modal(&mut self, ctx: &egui::Context) {
        let Some(confirm) = self.model.confirm else {
            return;
        };
        let question = match confirm {
            Confirm::DiscardForNew | Confirm::DiscardForOpen => {
                "There are unsaved changes. Are you sure you want to discard them?"
            }
            Confirm::Delete(_) => "Are you sure you want to delete this entry?",
            Confirm::UnsavedOnExit => "There are unsaved changes. Save before exiting?",
        };

        let response = egui::Modal::new(egui::Id::new("confirm_modal")).show(ctx, |ui| {
            ui.heading("Confirm");
            ui.label(question);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if confirm == Confirm::UnsavedOnExit {
                    if ui.button("Save and exit").clicked() {
                        self.inbox.push(Msg::ExitSaveAndClose);
                    }
                    if ui.button("Discard").clicked() {
                        self.inbox.push(Msg::ExitDiscard);
                    }
                    if ui.button("Cancel").clicked() {
                        self.inbox.push(Msg::ConfirmRejected);
                    }
                } else {
                    if ui.button("Yes").clicked() {
                        self.inbox.push(Msg::ConfirmAccepted);
                    }
                    if ui.button("No").clicked() {
                        self.inbox.push(Msg::ConfirmRejected);
                    }
                }
            });
        });
        if response.should_close() {
            self.inbox.push(Msg::ConfirmRejected);
        }
    }

    /// Render latest status message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(text) = &self.model.status {
            ui.label(egui::RichText::new(text).color(egui::Color32::from_gray(110)));
        }
    }
}
