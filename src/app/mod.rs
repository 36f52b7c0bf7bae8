// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring egui/eframe to launch the timesheet UI.

use crate::config::Settings;
use crate::ui::TimesheetApp;
use eframe::egui;
use egui_phosphor::Variant;

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run() -> eframe::Result<()> {
    let settings = Settings::load();
    log::info!(
        "starting with settings from {}",
        Settings::config_file().display()
    );

    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Timesheet Tracker")
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([600.0, 400.0]),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        "Timesheet Tracker",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_fonts(fonts);
            cc.egui_ctx.set_theme(egui::ThemePreference::Dark);
            Ok(Box::new(TimesheetApp::new(settings)))
        }),
    )
}
