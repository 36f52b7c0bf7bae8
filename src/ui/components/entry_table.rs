// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Sortable entry table bound to the store.
//! Sorting only changes the presented order; store indices stay authoritative.

use std::cmp::Ordering;

use eframe::egui;

use crate::models::TimesheetEntry;
use crate::ui::components::entry_form::format_hours;

/// Table columns, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortColumn {
    Date,
    Hours,
    Billable,
    Project,
    Description,
    Recorded,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Date,
        SortColumn::Hours,
        SortColumn::Billable,
        SortColumn::Project,
        SortColumn::Description,
        SortColumn::Recorded,
    ];

    fn title(self) -> &'static str {
        match self {
            SortColumn::Date => "Date",
            SortColumn::Hours => "Hours",
            SortColumn::Billable => "B",
            SortColumn::Project => "Project",
            SortColumn::Description => "Description",
            SortColumn::Recorded => "Timestamp",
        }
    }

    fn compare(self, a: &TimesheetEntry, b: &TimesheetEntry) -> Ordering {
        match self {
            SortColumn::Date => a.date.cmp(&b.date),
            SortColumn::Hours => a.hours.total_cmp(&b.hours),
            SortColumn::Billable => b.billable.cmp(&a.billable),
            SortColumn::Project => a
                .project
                .to_ascii_lowercase()
                .cmp(&b.project.to_ascii_lowercase()),
            SortColumn::Description => a
                .description
                .to_ascii_lowercase()
                .cmp(&b.description.to_ascii_lowercase()),
            SortColumn::Recorded => a.timestamp.cmp(&b.timestamp),
        }
    }
}

/// Selection and sort state of the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableModel {
    /// Active sort column and whether it is ascending; `None` shows insertion order.
    sort: Option<(SortColumn, bool)>,
    /// Store index of the selected row.
    selected: Option<usize>,
}

impl Default for TableModel {
    fn default() -> Self {
        Self {
            sort: Some((SortColumn::Project, true)),
            selected: None,
        }
    }
}

impl TableModel {
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn sort(&self) -> Option<(SortColumn, bool)> {
        self.sort
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Keep the selection consistent after the store removed `removed`.
    pub fn on_entry_removed(&mut self, removed: usize) {
        self.selected = match self.selected {
            Some(i) if i == removed => None,
            Some(i) if i > removed => Some(i - 1),
            other => other,
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableMsg {
    Select(usize),
    /// Double-click on a row.
    Activate(usize),
    SortBy(SortColumn),
    ClearSort,
}

/// Follow-up the parent should act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableEvent {
    EditRequested(usize),
}

pub fn update(model: &mut TableModel, msg: TableMsg) -> Option<TableEvent> {
    match msg {
        TableMsg::Select(index) => model.selected = Some(index),
        TableMsg::Activate(index) => {
            model.selected = Some(index);
            return Some(TableEvent::EditRequested(index));
        }
        TableMsg::SortBy(column) => {
            model.sort = match model.sort {
                Some((current, ascending)) if current == column => Some((column, !ascending)),
                _ => Some((column, true)),
            };
        }
        TableMsg::ClearSort => model.sort = None,
    }
    None
}

/// Store indices in presentation order. Ties keep insertion order.
pub fn display_order(entries: &[TimesheetEntry], sort: Option<(SortColumn, bool)>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    if let Some((column, ascending)) = sort {
        order.sort_by(|&a, &b| {
            let ord = column.compare(&entries[a], &entries[b]);
            if ascending { ord } else { ord.reverse() }
        });
    }
    order
}

/// Render the table and return any messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &TableModel, entries: &[TimesheetEntry]) -> Vec<TableMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("Click a header to sort; double-click a row to edit.")
                .small()
                .color(egui::Color32::from_gray(110)),
        );
        if model.sort.is_some()
            && ui
                .small_button("Insertion order")
                .on_hover_text("Show entries in the order they were added")
                .clicked()
        {
            msgs.push(TableMsg::ClearSort);
        }
    });
    ui.add_space(4.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("entries_grid")
                .num_columns(SortColumn::ALL.len())
                .striped(true)
                .spacing(egui::vec2(10.0, 6.0))
                .show(ui, |ui| {
                    render_header(ui, model, &mut msgs);
                    ui.end_row();

                    if entries.is_empty() {
                        ui.label(
                            egui::RichText::new("No entries yet.")
                                .italics()
                                .color(egui::Color32::from_gray(110)),
                        );
                        ui.end_row();
                        return;
                    }

                    for index in display_order(entries, model.sort()) {
                        render_row(ui, index, &entries[index], model.selected == Some(index), &mut msgs);
                        ui.end_row();
                    }
                });
        });

    msgs
}

fn render_header(ui: &mut egui::Ui, model: &TableModel, msgs: &mut Vec<TableMsg>) {
    for column in SortColumn::ALL {
        let arrow = match model.sort {
            Some((c, true)) if c == column => format!(" {}", egui_phosphor::regular::CARET_UP),
            Some((c, false)) if c == column => format!(" {}", egui_phosphor::regular::CARET_DOWN),
            _ => String::new(),
        };
        let label = egui::RichText::new(format!("{}{}", column.title(), arrow)).strong();
        if ui.add(egui::Button::new(label).frame(false)).clicked() {
            msgs.push(TableMsg::SortBy(column));
        }
    }
}

fn render_row(
    ui: &mut egui::Ui,
    index: usize,
    entry: &TimesheetEntry,
    selected: bool,
    msgs: &mut Vec<TableMsg>,
) {
    let cells = [
        entry.date_text(),
        format_hours(entry.hours),
        if entry.billable { "X".to_string() } else { String::new() },
        entry.project.clone(),
        entry.description.clone(),
        entry.timestamp.clone(),
    ];

    for (col, text) in cells.into_iter().enumerate() {
        let mut cell = egui::Button::new(text).selected(selected).frame(selected);
        if col == 4 {
            cell = cell.wrap();
        }
        let resp = ui.add(cell);
        if resp.double_clicked() {
            msgs.push(TableMsg::Activate(index));
        } else if resp.clicked() {
            msgs.push(TableMsg::Select(index));
        }
    }
}
