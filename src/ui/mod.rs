// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for the create-user form.
//! Handles layout, form controls, and wiring to the upload worker.

pub mod components;

use std::sync::Arc;

use eframe::egui;

use crate::logic::schema::FieldPath;
use crate::logic::storage::{BucketClient, StorageConfig};
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::{avatar, field_error_label, techs};

/// Stateful egui application for filling and submitting the form.
pub struct SignupFormApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl Default for SignupFormApp {
    fn default() -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let config = StorageConfig::from_env().unwrap_or_else(|err| {
            log::warn!("falling back to local storage defaults: {err:#}");
            StorageConfig::local_default()
        });
        log::info!(
            "storage endpoint {} bucket '{}'",
            config.endpoint,
            config.bucket
        );
        let store = Arc::new(BucketClient::new(config));

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().max(2))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let store = store.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd, store.as_ref());
                    let _ = msg_tx.send(msg);
                }
            });
        }

        Self {
            model: AppModel::default(),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        }
    }
}

impl eframe::App for SignupFormApp {
    /// Drives a single UI frame: processes incoming messages and commands,
    /// updates the model, and renders the top bar, status, and form panels.
    fn ui(&mut self, ui: &mut egui::Ui, _frame: &mut eframe::Frame) {
        let ctx = ui.ctx().clone();
        let ctx = &ctx;
        self.ensure_spacing(ctx);

        // Pull messages produced by the command workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        // Process pending messages until exhausted.
        let mut msgs = std::mem::take(&mut self.inbox);
        while let Some(msg) = msgs.pop() {
            match msg {
                mvu::Msg::PreviewDecoded { path, image } => {
                    let texture = ctx.load_texture(
                        format!("avatar-{}", path.display()),
                        image,
                        egui::TextureOptions::default(),
                    );
                    msgs.push(mvu::Msg::Avatar(avatar::AvatarMsg::PreviewReady {
                        path,
                        texture,
                    }));
                }
                other => {
                    let mut commands = Vec::new();
                    mvu::update(&mut self.model, other, &mut commands);
                    for cmd in commands {
                        if self.cmd_tx.send(cmd).is_ok() {
                            self.model.pending_commands += 1;
                        }
                    }
                }
            }
        }
        self.inbox = msgs;

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Create user");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_theme_controls(ui);
                    ui.separator();
                    self.render_submit_button(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_avatar_section(ui);
                ui.add_space(12.0);

                self.render_account_inputs(ui);
                ui.add_space(12.0);

                self.render_techs_section(ui);

                self.render_output(ui);
                ui.add_space(8.0);
            });
        });
    }
}

impl SignupFormApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    fn render_theme_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(2.0);
        egui::widgets::global_theme_preference_switch(ui);
    }

    /// Render the Submit button in the top bar.
    ///
    /// The button is disabled while an upload is outstanding so a queued
    /// click cannot start a second upload of the same record.
    fn render_submit_button(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.model.uploading;
        let button = egui::Button::new(format!(
            "{} Submit",
            egui_phosphor::regular::PAPER_PLANE_TILT
        ));

        if ui
            .add_enabled(enabled, button)
            .on_disabled_hover_text("Waiting for the current upload to finish")
            .clicked()
        {
            self.inbox.push(Msg::SubmitRequested);
        }
    }

    /// Renders the avatar picker and forwards its messages into the inbox.
    fn render_avatar_section(&mut self, ui: &mut egui::Ui) {
        let error = self.model.field_errors.message_for(FieldPath::Avatar);
        let msgs = avatar::view(ui, &self.model.avatar, error);
        self.inbox.extend(msgs.into_iter().map(Msg::Avatar));
    }

    /// Name, e-mail, and password inputs with their inline error labels.
    fn render_account_inputs(&mut self, ui: &mut egui::Ui) {
        if let Some(changed) = render_text_input(
            ui,
            "Name",
            "e.g., Ana Maria",
            &self.model.name,
            false,
            self.model.field_errors.message_for(FieldPath::Name),
        ) {
            self.inbox.push(Msg::NameChanged(changed));
        }
        ui.add_space(8.0);

        if let Some(changed) = render_text_input(
            ui,
            "E-mail",
            "name@gmail.com",
            &self.model.email,
            false,
            self.model.field_errors.message_for(FieldPath::Email),
        ) {
            self.inbox.push(Msg::EmailChanged(changed));
        }
        ui.add_space(8.0);

        if let Some(changed) = render_text_input(
            ui,
            "Password",
            "at least 6 characters",
            &self.model.password,
            true,
            self.model.field_errors.message_for(FieldPath::Password),
        ) {
            self.inbox.push(Msg::PasswordChanged(changed));
        }
    }

    /// Renders the technology rows and forwards messages into the inbox.
    fn render_techs_section(&mut self, ui: &mut egui::Ui) {
        let msgs = techs::view(ui, &self.model.techs, &self.model.field_errors);
        self.inbox.extend(msgs.into_iter().map(Msg::Techs));
    }

    /// Echo the normalized record after a successful submit.
    fn render_output(&self, ui: &mut egui::Ui) {
        if let Some(output) = &self.model.output {
            ui.add_space(12.0);
            egui::CollapsingHeader::new("Submission")
                .default_open(true)
                .show(ui, |ui| {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(egui::RichText::new(output).monospace());
                    });
                });
        }
    }

    /// Render a simple modal window for upload and other non-field errors.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Upload error")
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

    /// Render latest status/error message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(text) = &self.model.status {
            let display = if self.model.pending_commands > 0 {
                format!("{}  ({} working…)", text, self.model.pending_commands)
            } else {
                text.to_string()
            };
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(68)));
                if self.model.pending_commands > 0 {
                    ui.add(egui::Spinner::new().size(14.0))
                        .on_hover_text(format!(
                            "{} task(s) running in background",
                            self.model.pending_commands
                        ));
                }
            });
        }
    }
}

/// Single-line labelled input; returns the new value when it changed.
fn render_text_input(
    ui: &mut egui::Ui,
    label: &str,
    hint: &str,
    value: &str,
    password: bool,
    error: Option<&str>,
) -> Option<String> {
    ui.label(label);
    ui.add_space(4.0);
    let mut text = value.to_string();
    let changed = ui
        .add(
            egui::TextEdit::singleline(&mut text)
                .hint_text(hint)
                .password(password),
        )
        .changed();
    if let Some(message) = error {
        field_error_label(ui, message);
    }
    changed.then_some(text)
}
