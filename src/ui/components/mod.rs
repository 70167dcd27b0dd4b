// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reusable egui components structured for MVU-style updates.

pub mod avatar;
pub mod techs;

use eframe::egui;

/// Small red label shown underneath an invalid input.
pub(crate) fn field_error_label(ui: &mut egui::Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .small()
            .color(egui::Color32::from_rgb(220, 80, 80)),
    );
}
