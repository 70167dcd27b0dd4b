// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Raw and validated shapes of a create-user submission.

use serde::{Serialize, Serializer};

use crate::models::avatar::AvatarFile;
use crate::models::tech_list::RawTechEntry;

/// Untyped form contents exactly as the user left them.
///
/// Built once per submit from the live UI state; validation never mutates it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawInput {
    /// Zero-or-more file candidates; only the first is considered.
    pub avatar: Vec<AvatarFile>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub techs: Vec<RawTechEntry>,
}

/// A technology with a validated knowledge score.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TechEntry {
    pub title: String,
    #[serde(serialize_with = "serialize_knowledge")]
    pub knowledge: f64,
}

/// Fully validated and normalized create-user submission.
///
/// Only ever constructed by the schema validator; no partially valid instance
/// exists. Handed to the upload collaborator and echoed to the output pane,
/// then discarded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmissionRecord {
    pub avatar: AvatarFile,
    pub name: String,
    pub email: String,
    pub password: String,
    pub techs: Vec<TechEntry>,
}

/// Emit integral scores without a decimal point so the echoed JSON reads like
/// the number the user typed.
fn serialize_knowledge<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && *value >= 0.0 {
        serializer.serialize_u64(*value as u64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{SubmissionRecord, TechEntry};
    use crate::models::avatar::AvatarFile;

    // Integral scores must serialize as integers, fractional ones as floats.
    #[test]
    fn knowledge_serializes_integers_without_decimal_point() {
        let record = SubmissionRecord {
            avatar: AvatarFile::new(
                PathBuf::from("me.png"),
                "me.png".into(),
                "image/png".into(),
                1024,
            ),
            name: "Ana Maria".into(),
            email: "foo@gmail.com".into(),
            password: "123456".into(),
            techs: vec![
                TechEntry {
                    title: "Go".into(),
                    knowledge: 80.0,
                },
                TechEntry {
                    title: "Rust".into(),
                    knowledge: 90.5,
                },
            ],
        };

        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"knowledge\":80"));
        assert!(!json.contains("\"knowledge\":80.0"));
        assert!(json.contains("\"knowledge\":90.5"));
    }
}
