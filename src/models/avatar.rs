// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Avatar file domain model and key derivation (UI-agnostic).

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::utils::sanitize_component;

/// Maximum accepted avatar size in bytes (5 MiB).
pub const MAX_AVATAR_BYTES: u64 = 5 * 1024 * 1024;

/// Metadata for a file offered as the avatar.
///
/// `file_name` doubles as the destination key in the storage bucket, so it is
/// already sanitized when the value is constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AvatarFile {
    /// Original filesystem path; never serialized into the output record.
    #[serde(skip)]
    pub path: PathBuf,
    /// Sanitized filename, used as the object key.
    pub file_name: String,
    /// Detected MIME type.
    pub mime: String,
    /// File size in bytes.
    pub size: u64,
}

impl AvatarFile {
    pub fn new(path: PathBuf, file_name: String, mime: String, size: u64) -> Self {
        Self {
            path,
            file_name,
            mime,
            size,
        }
    }

    /// Whether the file fits the upload size limit.
    pub fn fits_size_limit(&self) -> bool {
        self.size <= MAX_AVATAR_BYTES
    }
}

/// Derive the destination key from the file's own name.
pub fn object_key_for(path: &Path) -> String {
    let original = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "avatar".to_string());
    sanitize_component(&original)
}
