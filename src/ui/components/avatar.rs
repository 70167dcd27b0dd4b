// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Avatar picker panel structured for MVU-style updates.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use eframe::egui;

use crate::models::avatar::AvatarFile;
use crate::ui::components::field_error_label;

/// MVU state for the avatar picker and its preview.
#[derive(Default)]
pub struct AvatarModel {
    candidates: Vec<AvatarFile>,
    preview: Option<egui::TextureHandle>,
    preview_failures: HashSet<PathBuf>,
}

impl AvatarModel {
    /// Current file candidates in selection order; the first one is what a
    /// submit will validate and upload.
    pub fn candidates(&self) -> &[AvatarFile] {
        &self.candidates
    }
}

/// Messages emitted by the avatar view.
// Debug omitted because TextureHandle is not Debug.
pub enum AvatarMsg {
    RequestPick,
    FilePicked(PathBuf),
    PickCancelled,
    Inspected {
        path: PathBuf,
        file_name: String,
        mime: String,
        size: u64,
    },
    LoadPreview(PathBuf),
    PreviewReady {
        path: PathBuf,
        texture: egui::TextureHandle,
    },
    PreviewFailed {
        path: PathBuf,
    },
    Remove,
}

/// Side-effectful commands that run off the UI path.
pub enum AvatarCommand {
    PickFile,
    Inspect { path: PathBuf },
    LoadPreview { path: PathBuf },
}

/// User-facing events for the status bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvatarEvent {
    pub message: String,
    pub is_error: bool,
}

/// Apply a message to the avatar model. Returns a user-facing event when relevant.
pub fn update(
    model: &mut AvatarModel,
    msg: AvatarMsg,
    cmds: &mut Vec<AvatarCommand>,
) -> Option<AvatarEvent> {
    match msg {
        AvatarMsg::RequestPick => {
            cmds.push(AvatarCommand::PickFile);
            None
        }
        AvatarMsg::FilePicked(path) => {
            // Picking replaces the previous selection.
            model.candidates.clear();
            model.preview = None;
            cmds.push(AvatarCommand::Inspect { path });
            Some(AvatarEvent {
                message: "Reading image...".into(),
                is_error: false,
            })
        }
        AvatarMsg::PickCancelled => Some(AvatarEvent {
            message: "Avatar selection cancelled.".into(),
            is_error: false,
        }),
        AvatarMsg::Inspected {
            path,
            file_name,
            mime,
            size,
        } => {
            let message = format!("Selected '{file_name}'");
            model.candidates = vec![AvatarFile::new(path, file_name, mime, size)];
            Some(AvatarEvent {
                message,
                is_error: false,
            })
        }
        AvatarMsg::LoadPreview(path) => {
            cmds.push(AvatarCommand::LoadPreview { path });
            None
        }
        AvatarMsg::PreviewReady { path, texture } => {
            if model.candidates.first().map(|c| &c.path) == Some(&path) {
                model.preview = Some(texture);
            }
            None
        }
        AvatarMsg::PreviewFailed { path } => {
            model.preview_failures.insert(path);
            None
        }
        AvatarMsg::Remove => {
            model.candidates.clear();
            model.preview = None;
            Some(AvatarEvent {
                message: "Avatar removed.".into(),
                is_error: false,
            })
        }
    }
}

/// Render the avatar panel and return any messages triggered by interaction.
pub fn view(ui: &mut egui::Ui, model: &AvatarModel, error: Option<&str>) -> Vec<AvatarMsg> {
    let mut msgs = Vec::new();

    ui.label("Avatar");
    ui.add_space(4.0);

    if ui
        .add(egui::Button::new(format!(
            "{} Choose image...",
            egui_phosphor::regular::IMAGE
        )))
        .clicked()
    {
        msgs.push(AvatarMsg::RequestPick);
    }

    ui.add_space(6.0);

    let visuals = ui.visuals().clone();
    egui::Frame::new()
        .fill(visuals.panel_fill)
        .stroke(visuals.window_stroke())
        .inner_margin(8.0)
        .show(ui, |ui| match model.candidates.first() {
            None => {
                ui.label(
                    egui::RichText::new("No image selected").color(egui::Color32::from_gray(150)),
                );
            }
            Some(candidate) => render_candidate(ui, model, candidate, &mut msgs),
        });

    if let Some(message) = error {
        field_error_label(ui, message);
    }

    msgs
}

/// Render the selected file with preview, metadata, and a remove control.
fn render_candidate(
    ui: &mut egui::Ui,
    model: &AvatarModel,
    candidate: &AvatarFile,
    msgs: &mut Vec<AvatarMsg>,
) {
    ui.horizontal(|ui| {
        if let Some(texture) = &model.preview {
            let size = texture.size_vec2();
            let max = 96.0;
            let scale = (max / size.x).min(max / size.y).min(1.0);
            ui.add(egui::Image::new((texture.id(), size * scale)));
        } else {
            if !model.preview_failures.contains(&candidate.path)
                && candidate.mime.starts_with("image/")
            {
                msgs.push(AvatarMsg::LoadPreview(candidate.path.clone()));
            }
            let _ = ui.allocate_space(egui::vec2(96.0, 72.0));
        }

        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                if !candidate.fits_size_limit() {
                    ui.label(
                        egui::RichText::new(egui_phosphor::regular::WARNING)
                            .color(egui::Color32::from_rgb(232, 89, 12)),
                    )
                    .on_hover_text("Larger than the 5 MiB upload limit");
                }
                ui.label(candidate.file_name.clone());
            });
            ui.label(
                egui::RichText::new(candidate.path.to_string_lossy())
                    .small()
                    .color(egui::Color32::from_gray(102)),
            );
            ui.label(
                egui::RichText::new(format!(
                    "{} | {}",
                    candidate.mime,
                    format_bytes(candidate.size)
                ))
                .small()
                .color(egui::Color32::from_gray(90)),
            );
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button(egui::RichText::new(egui_phosphor::regular::TRASH_SIMPLE))
                .on_hover_text("Remove selected image")
                .clicked()
            {
                msgs.push(AvatarMsg::Remove);
            }
        });
    });
}

pub(crate) fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Human-readable formatting for byte sizes with binary units.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Load and resize a raster image to a preview-friendly `ColorImage`.
pub(crate) fn load_preview_image(path: &Path) -> Result<egui::ColorImage, String> {
    const MAX: u32 = 256;

    let dyn_img = image::open(path).map_err(|e| e.to_string())?;
    let resized = dyn_img.thumbnail(MAX, MAX).to_rgba8();
    let size = [resized.width() as usize, resized.height() as usize];
    let pixels = resized.into_raw();
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, &pixels))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use image::{ImageBuffer, Rgba};
    use tempfile::TempDir;

    use super::{AvatarCommand, AvatarModel, AvatarMsg, format_bytes, load_preview_image, update};

    // Picking a file replaces the old selection and schedules inspection.
    #[test]
    fn file_picked_resets_selection_and_enqueues_inspect() {
        let mut model = AvatarModel::default();
        let mut cmds = Vec::new();
        update(
            &mut model,
            AvatarMsg::Inspected {
                path: PathBuf::from("old.png"),
                file_name: "old.png".into(),
                mime: "image/png".into(),
                size: 10,
            },
            &mut cmds,
        );
        assert_eq!(model.candidates().len(), 1);

        let event = update(
            &mut model,
            AvatarMsg::FilePicked(PathBuf::from("new.png")),
            &mut cmds,
        )
        .unwrap();

        assert!(model.candidates().is_empty());
        assert!(!event.is_error);
        assert!(matches!(
            cmds.last(),
            Some(AvatarCommand::Inspect { path }) if path == &PathBuf::from("new.png")
        ));
    }

    // Inspection results become the single candidate.
    #[test]
    fn inspected_populates_the_candidate() {
        let mut model = AvatarModel::default();
        let mut cmds = Vec::new();

        let event = update(
            &mut model,
            AvatarMsg::Inspected {
                path: PathBuf::from("/tmp/me.png"),
                file_name: "me.png".into(),
                mime: "image/png".into(),
                size: 1024,
            },
            &mut cmds,
        )
        .unwrap();

        assert!(cmds.is_empty());
        assert_eq!(model.candidates().len(), 1);
        assert_eq!(model.candidates()[0].file_name, "me.png");
        assert_eq!(model.candidates()[0].size, 1024);
        assert!(event.message.contains("me.png"));
    }

    #[test]
    fn remove_clears_the_selection() {
        let mut model = AvatarModel::default();
        let mut cmds = Vec::new();
        update(
            &mut model,
            AvatarMsg::Inspected {
                path: PathBuf::from("me.png"),
                file_name: "me.png".into(),
                mime: "image/png".into(),
                size: 10,
            },
            &mut cmds,
        );

        let event = update(&mut model, AvatarMsg::Remove, &mut cmds).unwrap();

        assert!(model.candidates().is_empty());
        assert_eq!(event.message, "Avatar removed.");
    }

    // Raster previews should respect the max bounds.
    #[test]
    fn load_preview_image_handles_raster_image() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("preview.png");
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(10, 12, Rgba([0, 255, 0, 255]));
        img.save(&path).expect("png saved");

        let preview = load_preview_image(&path).expect("preview created");

        assert!(preview.size[0] <= 256 && preview.size[1] <= 256);
    }

    // Invalid image data should yield an error instead of panicking.
    #[test]
    fn load_preview_image_errors_on_invalid_image() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("invalid.png");
        fs::write(&path, b"not an image").expect("file written");

        assert!(load_preview_image(&path).is_err());
    }

    #[test]
    fn format_bytes_uses_binary_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
