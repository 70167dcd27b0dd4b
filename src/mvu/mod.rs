// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::logic::schema::{self, FieldErrors};
use crate::logic::storage::AvatarStore;
use crate::models::submission::{RawInput, SubmissionRecord};
use crate::ui::components::avatar::{self, AvatarCommand, AvatarModel, AvatarMsg};
use crate::ui::components::techs::{self, TechsModel, TechsMsg};

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Name field, as typed.
    pub name: String,
    /// E-mail field, as typed.
    pub email: String,
    /// Password field, as typed.
    pub password: String,
    /// Avatar picker state.
    pub avatar: AvatarModel,
    /// Technology rows state.
    pub techs: TechsModel,
    /// Field errors from the last failed validation pass.
    pub field_errors: FieldErrors,
    /// Serialized record shown after a successful submit.
    pub output: Option<String>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest non-field error to display in the modal.
    pub error: Option<String>,
    /// True while an upload is outstanding; blocks duplicate submits.
    pub uploading: bool,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

/// Application messages routed through the update function.
pub enum Msg {
    NameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    Avatar(AvatarMsg),
    Techs(TechsMsg),
    SubmitRequested,
    SubmitCompleted {
        record: SubmissionRecord,
        /// Destination key on success, upload error text on failure.
        result: Result<String, String>,
    },
    PreviewDecoded {
        path: PathBuf,
        image: eframe::egui::ColorImage,
    },
    DismissError,
}

/// Commands represent side-effects executed between frames.
pub enum Command {
    PickAvatar,
    InspectAvatar { path: PathBuf },
    LoadPreview { path: PathBuf },
    Upload(SubmitPayload),
}

/// Captured, validated data for the upload step.
pub struct SubmitPayload {
    /// The normalized record produced by the schema validator.
    pub record: SubmissionRecord,
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::NameChanged(text) => model.name = text,
        Msg::EmailChanged(text) => model.email = text,
        Msg::PasswordChanged(text) => model.password = text,
        Msg::DismissError => model.error = None,
        Msg::Avatar(m) => {
            let mut av_cmds = Vec::new();
            if let Some(event) = avatar::update(&mut model.avatar, m, &mut av_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            for c in av_cmds {
                match c {
                    AvatarCommand::PickFile => cmds.push(Command::PickAvatar),
                    AvatarCommand::Inspect { path } => cmds.push(Command::InspectAvatar { path }),
                    AvatarCommand::LoadPreview { path } => {
                        cmds.push(Command::LoadPreview { path })
                    }
                }
            }
        }
        Msg::Techs(m) => {
            if let Some(event) = techs::update(&mut model.techs, m) {
                surface_event(model, event.message, event.is_error);
            }
        }
        Msg::PreviewDecoded { path, image } => {
            // Texture creation must happen in ui.rs where ctx is available.
            // This variant is transformed before reaching update; keeping a
            // no-op to avoid panic.
            let _ = (path, image);
        }
        Msg::SubmitRequested => {
            if model.uploading {
                surface_event(model, "An upload is already in progress.".to_string(), false);
                return;
            }
            let raw = collect_raw(model);
            match schema::validate(&raw) {
                Ok(record) => {
                    model.field_errors = FieldErrors::default();
                    model.output = None;
                    model.uploading = true;
                    surface_event(
                        model,
                        format!("Uploading '{}'...", record.avatar.file_name),
                        false,
                    );
                    cmds.push(Command::Upload(SubmitPayload { record }));
                }
                Err(errors) => {
                    for error in errors.iter() {
                        log::debug!("validation failed at {}: {}", error.path, error.kind);
                    }
                    surface_event(
                        model,
                        format!("{} field(s) need attention.", errors.len()),
                        false,
                    );
                    model.field_errors = errors;
                }
            }
        }
        Msg::SubmitCompleted { record, result } => {
            model.uploading = false;
            match result {
                Ok(key) => {
                    match serde_json::to_string_pretty(&record) {
                        Ok(json) => model.output = Some(json),
                        Err(err) => surface_event(
                            model,
                            format!("Failed to render the submission: {err}"),
                            true,
                        ),
                    }
                    surface_event(
                        model,
                        format!("User created. Avatar stored as '{key}'."),
                        false,
                    );
                }
                Err(err) => {
                    // The record is not silently discarded: the form keeps its
                    // contents and a resubmit revalidates the same input.
                    surface_event(model, format!("Upload failed:\n\n{err}"), true);
                }
            }
        }
    }
}

/// Execute a command on a worker thread and return the resulting message.
pub fn run_command(cmd: Command, store: &dyn AvatarStore) -> Msg {
    match cmd {
        Command::PickAvatar => {
            let file = rfd::FileDialog::new()
                .set_title("Choose an avatar image")
                .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
                .pick_file();
            match file {
                Some(path) => Msg::Avatar(AvatarMsg::FilePicked(path)),
                None => Msg::Avatar(AvatarMsg::PickCancelled),
            }
        }
        Command::InspectAvatar { path } => {
            let size = path.metadata().map(|m| m.len()).unwrap_or(0);
            let mime = avatar::guess_mime(&path);
            let file_name = crate::models::avatar::object_key_for(&path);
            Msg::Avatar(AvatarMsg::Inspected {
                path,
                file_name,
                mime,
                size,
            })
        }
        Command::LoadPreview { path } => match avatar::load_preview_image(&path) {
            Ok(image) => Msg::PreviewDecoded { path, image },
            Err(_) => Msg::Avatar(AvatarMsg::PreviewFailed { path }),
        },
        Command::Upload(payload) => {
            let record = payload.record;
            let result = upload_avatar(store, &record).map_err(|e| format!("{e:#}"));
            if let Err(err) = &result {
                log::error!("avatar upload failed: {err}");
            }
            Msg::SubmitCompleted { record, result }
        }
    }
}

/// Read the avatar bytes and hand them to the store under their derived key.
fn upload_avatar(store: &dyn AvatarStore, record: &SubmissionRecord) -> Result<String> {
    let avatar = &record.avatar;
    let bytes = std::fs::read(&avatar.path)
        .with_context(|| format!("Failed to read avatar file: {:?}", avatar.path))?;
    store.upload(&avatar.file_name, &avatar.mime, &bytes)?;
    Ok(avatar.file_name.clone())
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

/// Snapshot the live form state into the raw input the validator consumes.
fn collect_raw(model: &AppModel) -> RawInput {
    RawInput {
        avatar: model.avatar.candidates().to_vec(),
        name: model.name.clone(),
        email: model.email.clone(),
        password: model.password.clone(),
        techs: model.techs.list().to_raw(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use anyhow::anyhow;
    use tempfile::TempDir;

    use super::*;
    use crate::logic::schema::{FieldErrorKind, FieldPath};

    /// In-memory store standing in for the bucket.
    #[derive(Default)]
    struct FakeStore {
        calls: Mutex<Vec<(String, String, usize)>>,
        fail: bool,
    }

    impl AvatarStore for FakeStore {
        fn upload(&self, key: &str, mime: &str, bytes: &[u8]) -> anyhow::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((key.to_string(), mime.to_string(), bytes.len()));
            if self.fail {
                return Err(anyhow!("bucket unreachable"));
            }
            Ok(())
        }
    }

    /// Drive the model to a fully valid form whose avatar lives at `path`.
    fn fill_valid_form(model: &mut AppModel, path: &Path, size: u64) {
        let mut cmds = Vec::new();
        update(model, Msg::NameChanged("ana maria".into()), &mut cmds);
        update(model, Msg::EmailChanged("Foo@Gmail.com".into()), &mut cmds);
        update(model, Msg::PasswordChanged("123456".into()), &mut cmds);
        update(
            model,
            Msg::Avatar(AvatarMsg::Inspected {
                path: path.to_path_buf(),
                file_name: "me.png".into(),
                mime: "image/png".into(),
                size,
            }),
            &mut cmds,
        );
        for (title, knowledge) in [("Go", "80"), ("Rust", "90")] {
            update(model, Msg::Techs(TechsMsg::Append), &mut cmds);
            let id = model.techs.list().rows().last().unwrap().id();
            update(
                model,
                Msg::Techs(TechsMsg::TitleChanged {
                    id,
                    value: title.into(),
                }),
                &mut cmds,
            );
            update(
                model,
                Msg::Techs(TechsMsg::KnowledgeChanged {
                    id,
                    value: knowledge.into(),
                }),
                &mut cmds,
            );
        }
        assert!(cmds.is_empty(), "form setup should not enqueue commands");
    }

    // An empty form collects errors for every field and uploads nothing.
    #[test]
    fn submit_with_empty_form_collects_field_errors() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(&mut model, Msg::SubmitRequested, &mut cmds);

        assert!(cmds.is_empty());
        assert!(!model.uploading);
        assert_eq!(model.field_errors.len(), 5);
        assert!(
            model
                .field_errors
                .contains(FieldPath::Techs, FieldErrorKind::TooFewEntries)
        );
        assert!(model.error.is_none(), "field errors are not modal errors");
    }

    // A valid submit enqueues exactly one upload and blocks a second submit
    // while it is outstanding.
    #[test]
    fn valid_submit_enqueues_upload_and_blocks_resubmission() {
        let mut model = AppModel::default();
        fill_valid_form(&mut model, Path::new("me.png"), 1024);

        let mut cmds = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds);

        assert_eq!(cmds.len(), 1, "submit should enqueue the upload");
        assert!(model.uploading);
        assert!(model.field_errors.is_empty());

        let mut cmds2 = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds2);

        assert!(cmds2.is_empty(), "no duplicate upload while one is pending");
    }

    // Full round trip: submit, run the upload command against a fake store,
    // and feed the completion back into the model.
    #[test]
    fn submit_uploads_and_echoes_the_record() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("me.png");
        std::fs::write(&path, vec![0u8; 1024]).unwrap();

        let mut model = AppModel::default();
        fill_valid_form(&mut model, &path, 1024);

        let mut cmds = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds);

        let store = FakeStore::default();
        let msg = run_command(cmds.pop().unwrap(), &store);
        let mut cmds2 = Vec::new();
        update(&mut model, msg, &mut cmds2);

        assert!(!model.uploading);
        assert!(model.error.is_none());
        let calls = store.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "me.png");
        assert_eq!(calls[0].1, "image/png");
        assert_eq!(calls[0].2, 1024);
        let output = model.output.as_deref().unwrap();
        assert!(output.contains("\"name\": \"Ana Maria\""));
        assert!(output.contains("\"email\": \"foo@gmail.com\""));
        assert!(
            model
                .status
                .as_deref()
                .map(|s| s.contains("User created"))
                .unwrap_or(false)
        );
    }

    // Upload failures surface in the modal and never produce output.
    #[test]
    fn upload_failure_surfaces_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("me.png");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        let mut model = AppModel::default();
        fill_valid_form(&mut model, &path, 64);

        let mut cmds = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds);

        let store = FakeStore {
            fail: true,
            ..FakeStore::default()
        };
        let msg = run_command(cmds.pop().unwrap(), &store);
        update(&mut model, msg, &mut Vec::new());

        assert!(!model.uploading, "a failed upload releases the submit lock");
        assert!(model.output.is_none());
        assert!(
            model
                .error
                .as_deref()
                .map(|e| e.contains("Upload failed"))
                .unwrap_or(false)
        );
        // The form still holds the typed input for a resubmit.
        assert_eq!(model.name, "ana maria");
        assert_eq!(model.techs.list().len(), 2);
    }

    // A vanished avatar file is an upload error, not a panic.
    #[test]
    fn missing_avatar_file_fails_the_upload_step() {
        let mut model = AppModel::default();
        fill_valid_form(&mut model, Path::new("/nonexistent/me.png"), 1024);

        let mut cmds = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds);

        let store = FakeStore::default();
        let msg = run_command(cmds.pop().unwrap(), &store);
        update(&mut model, msg, &mut Vec::new());

        assert!(store.calls.lock().unwrap().is_empty());
        assert!(model.error.is_some());
    }

    // Inspect derives the key, MIME, and size from the file itself.
    #[test]
    fn inspect_command_reports_file_metadata() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Café photo.png");
        std::fs::write(&path, vec![0u8; 32]).unwrap();

        let store = FakeStore::default();
        let msg = run_command(Command::InspectAvatar { path: path.clone() }, &store);

        match msg {
            Msg::Avatar(AvatarMsg::Inspected {
                path: p,
                file_name,
                mime,
                size,
            }) => {
                assert_eq!(p, path);
                assert_eq!(file_name, "Cafe_photo.png");
                assert_eq!(mime, "image/png");
                assert_eq!(size, 32);
            }
            _ => panic!("unexpected message"),
        }
    }

    #[test]
    fn dismiss_error_clears_the_modal() {
        let mut model = AppModel::default();
        surface_event(&mut model, "boom".into(), true);
        assert!(model.error.is_some());

        update(&mut model, Msg::DismissError, &mut Vec::new());

        assert!(model.error.is_none());
    }

    #[test]
    fn preview_failures_do_not_touch_the_candidate() {
        let mut model = AppModel::default();
        fill_valid_form(&mut model, Path::new("me.png"), 1024);

        update(
            &mut model,
            Msg::Avatar(AvatarMsg::PreviewFailed {
                path: PathBuf::from("me.png"),
            }),
            &mut Vec::new(),
        );

        assert_eq!(model.avatar.candidates().len(), 1);
    }
}
