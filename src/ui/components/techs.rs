// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Dynamic technology rows: add, edit, and remove entries by stable id.

use eframe::egui;

use crate::logic::schema::{FieldErrors, FieldPath, MIN_TECH_ENTRIES};
use crate::models::tech_list::{RawTechEntry, TechList, TechRowId};
use crate::ui::components::field_error_label;

/// MVU state for the technology list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TechsModel {
    list: TechList,
}

impl TechsModel {
    pub fn list(&self) -> &TechList {
        &self.list
    }
}

/// Messages produced by the technologies view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TechsMsg {
    /// Append a fresh row at the end of the list.
    Append,
    Remove(TechRowId),
    TitleChanged { id: TechRowId, value: String },
    KnowledgeChanged { id: TechRowId, value: String },
}

/// Feedback surfaced to the status bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TechsEvent {
    pub message: String,
    pub is_error: bool,
}

/// Update the model based on a message.
pub fn update(model: &mut TechsModel, msg: TechsMsg) -> Option<TechsEvent> {
    match msg {
        TechsMsg::Append => {
            model.list.append(RawTechEntry::default());
            None
        }
        TechsMsg::Remove(id) => {
            if model.list.remove(id) {
                Some(TechsEvent {
                    message: "Technology row removed.".into(),
                    is_error: false,
                })
            } else {
                None
            }
        }
        TechsMsg::TitleChanged { id, value } => {
            if let Some(entry) = model.list.entry_mut(id) {
                entry.title = value;
            }
            None
        }
        TechsMsg::KnowledgeChanged { id, value } => {
            if let Some(entry) = model.list.entry_mut(id) {
                entry.knowledge = value;
            }
            None
        }
    }
}

/// Render the component and return triggered messages.
///
/// Error labels are looked up by the row's current position, which is derived
/// from the list each frame, while widget state is keyed on the stable row id.
pub fn view(ui: &mut egui::Ui, model: &TechsModel, errors: &FieldErrors) -> Vec<TechsMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        ui.label("Technologies");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add(egui::Button::new(format!(
                    "{} Add",
                    egui_phosphor::regular::PLUS
                )))
                .clicked()
            {
                msgs.push(TechsMsg::Append);
            }
        });
    });
    ui.add_space(4.0);

    if model.list.is_empty() {
        ui.label(
            egui::RichText::new(format!(
                "No technologies yet. Add at least {MIN_TECH_ENTRIES}."
            ))
            .italics()
            .color(egui::Color32::from_gray(110)),
        );
    }

    for (index, row) in model.list.rows().iter().enumerate() {
        let id = row.id();
        ui.push_id(id, |ui| {
            ui.horizontal(|ui| {
                let mut title = row.entry.title.clone();
                if ui
                    .add(
                        egui::TextEdit::singleline(&mut title)
                            .hint_text("e.g., Rust")
                            .desired_width(200.0),
                    )
                    .changed()
                {
                    msgs.push(TechsMsg::TitleChanged { id, value: title });
                }

                let mut knowledge = row.entry.knowledge.clone();
                if ui
                    .add(
                        egui::TextEdit::singleline(&mut knowledge)
                            .hint_text("1-100")
                            .desired_width(64.0),
                    )
                    .changed()
                {
                    msgs.push(TechsMsg::KnowledgeChanged {
                        id,
                        value: knowledge,
                    });
                }

                if ui
                    .button(egui::RichText::new(egui_phosphor::regular::TRASH_SIMPLE))
                    .on_hover_text("Remove this technology")
                    .clicked()
                {
                    msgs.push(TechsMsg::Remove(id));
                }
            });

            if let Some(message) = errors.message_for(FieldPath::TechTitle(index)) {
                field_error_label(ui, message);
            }
            if let Some(message) = errors.message_for(FieldPath::TechKnowledge(index)) {
                field_error_label(ui, message);
            }
        });
        ui.add_space(4.0);
    }

    if let Some(message) = errors.message_for(FieldPath::Techs) {
        field_error_label(ui, message);
    }

    msgs
}
