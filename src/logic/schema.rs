// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Create-user submission schema.
//!
//! Each field owns an ordered pipeline of named rule checks; a passing check
//! may rewrite the value, a failing one reports a specific [`FieldErrorKind`].
//! Validation walks every field and collects all failures, so the UI can mark
//! every offending input at once; within a single field the pipeline stops at
//! the first failing rule.

use std::fmt;
use std::ops::RangeInclusive;

use email_address::EmailAddress;
use thiserror::Error;

use crate::models::submission::{RawInput, SubmissionRecord, TechEntry};

/// Required suffix for accepted e-mail addresses.
pub const REQUIRED_EMAIL_SUFFIX: &str = "gmail.com";
/// Minimum number of technology rows in a valid submission.
pub const MIN_TECH_ENTRIES: usize = 2;
/// Minimum password length in characters.
const MIN_PASSWORD_CHARS: usize = 6;
/// Inclusive range for the coerced knowledge score.
const KNOWLEDGE_RANGE: RangeInclusive<f64> = 1.0..=100.0;

/// Why a single field failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FieldErrorKind {
    #[error("no file selected")]
    MissingFile,
    #[error("file exceeds the size limit")]
    FileTooLarge,
    #[error("field is empty")]
    EmptyField,
    #[error("value is not in the expected format")]
    InvalidFormat,
    #[error("domain is not allowed")]
    DomainNotAllowed,
    #[error("value is too short")]
    TooShort,
    #[error("value is out of range")]
    OutOfRange,
    #[error("list has too few entries")]
    TooFewEntries,
}

/// Addresses a field, or an indexed sub-field of the technology list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldPath {
    Avatar,
    Name,
    Email,
    Password,
    Techs,
    TechTitle(usize),
    TechKnowledge(usize),
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Avatar => write!(f, "avatar"),
            FieldPath::Name => write!(f, "name"),
            FieldPath::Email => write!(f, "email"),
            FieldPath::Password => write!(f, "password"),
            FieldPath::Techs => write!(f, "techs"),
            FieldPath::TechTitle(index) => write!(f, "techs[{index}].title"),
            FieldPath::TechKnowledge(index) => write!(f, "techs[{index}].knowledge"),
        }
    }
}

/// A human-readable message attached to a specific field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub path: FieldPath,
    pub kind: FieldErrorKind,
    pub message: String,
}

/// All field errors from one validation pass, in schema order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    fn push(&mut self, path: FieldPath, kind: FieldErrorKind) {
        self.errors.push(FieldError {
            path,
            kind,
            message: message_for(path, kind),
        });
    }

    /// Message for one field, if that field failed.
    pub fn message_for(&self, path: FieldPath) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.message.as_str())
    }

    #[allow(dead_code)]
    pub fn contains(&self, path: FieldPath, kind: FieldErrorKind) -> bool {
        self.errors.iter().any(|e| e.path == path && e.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// One named check in a field's pipeline.
///
/// Checks receive the value produced by the previous rule, so transforms
/// (`capitalize_words`, `lowercase`) feed the rules after them.
struct TextRule {
    name: &'static str,
    check: fn(String) -> Result<String, FieldErrorKind>,
}

const NAME_RULES: &[TextRule] = &[
    TextRule {
        name: "nonempty",
        check: require_nonblank,
    },
    TextRule {
        name: "capitalize_words",
        check: capitalize_words,
    },
];

const EMAIL_RULES: &[TextRule] = &[
    TextRule {
        name: "nonempty",
        check: require_nonblank,
    },
    TextRule {
        name: "email_syntax",
        check: require_email_syntax,
    },
    TextRule {
        name: "lowercase",
        check: lowercase,
    },
    // Runs on the lowercased value, so the suffix check is case-insensitive.
    TextRule {
        name: "allowed_domain",
        check: require_allowed_domain,
    },
];

const PASSWORD_RULES: &[TextRule] = &[
    TextRule {
        name: "nonempty",
        check: require_nonblank,
    },
    TextRule {
        name: "min_length",
        check: require_min_length,
    },
];

const TECH_TITLE_RULES: &[TextRule] = &[TextRule {
    name: "nonempty",
    check: require_nonblank,
}];

/// Validate a raw submission into a normalized record, or collect every
/// field failure. Pure: no side effects, the input is never mutated.
pub fn validate(raw: &RawInput) -> Result<SubmissionRecord, FieldErrors> {
    let mut errors = FieldErrors::default();

    let avatar = match raw.avatar.first() {
        None => {
            errors.push(FieldPath::Avatar, FieldErrorKind::MissingFile);
            None
        }
        Some(file) if !file.fits_size_limit() => {
            errors.push(FieldPath::Avatar, FieldErrorKind::FileTooLarge);
            None
        }
        Some(file) => Some(file.clone()),
    };

    let name = run_rules(&raw.name, NAME_RULES, FieldPath::Name, &mut errors);
    let email = run_rules(&raw.email, EMAIL_RULES, FieldPath::Email, &mut errors);
    let password = run_rules(&raw.password, PASSWORD_RULES, FieldPath::Password, &mut errors);

    let mut techs = Vec::with_capacity(raw.techs.len());
    for (index, entry) in raw.techs.iter().enumerate() {
        let title = run_rules(
            &entry.title,
            TECH_TITLE_RULES,
            FieldPath::TechTitle(index),
            &mut errors,
        );
        let knowledge = match coerce_knowledge(&entry.knowledge) {
            Ok(score) => Some(score),
            Err(kind) => {
                errors.push(FieldPath::TechKnowledge(index), kind);
                None
            }
        };
        if let (Some(title), Some(knowledge)) = (title, knowledge) {
            techs.push(TechEntry { title, knowledge });
        }
    }

    // Length is judged on the raw sequence: a too-short list is reported even
    // when its entries also carry errors of their own.
    if raw.techs.len() < MIN_TECH_ENTRIES {
        errors.push(FieldPath::Techs, FieldErrorKind::TooFewEntries);
    }

    match (avatar, name, email, password) {
        (Some(avatar), Some(name), Some(email), Some(password)) if errors.is_empty() => {
            Ok(SubmissionRecord {
                avatar,
                name,
                email,
                password,
                techs,
            })
        }
        _ => Err(errors),
    }
}

/// Run one field's pipeline; on failure record the error and return None.
fn run_rules(
    value: &str,
    rules: &[TextRule],
    path: FieldPath,
    errors: &mut FieldErrors,
) -> Option<String> {
    let mut current = value.to_string();
    for rule in rules {
        match (rule.check)(current) {
            Ok(next) => current = next,
            Err(kind) => {
                log::debug!("rule '{}' failed for {path}", rule.name);
                errors.push(path, kind);
                return None;
            }
        }
    }
    Some(current)
}

fn require_nonblank(value: String) -> Result<String, FieldErrorKind> {
    if value.trim().is_empty() {
        Err(FieldErrorKind::EmptyField)
    } else {
        Ok(value)
    }
}

fn capitalize_words(value: String) -> Result<String, FieldErrorKind> {
    let capitalized = value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    Ok(capitalized)
}

fn require_email_syntax(value: String) -> Result<String, FieldErrorKind> {
    if EmailAddress::parse_with_options(&value, Default::default()).is_ok() {
        Ok(value)
    } else {
        Err(FieldErrorKind::InvalidFormat)
    }
}

fn lowercase(value: String) -> Result<String, FieldErrorKind> {
    Ok(value.to_lowercase())
}

fn require_allowed_domain(value: String) -> Result<String, FieldErrorKind> {
    if value.ends_with(REQUIRED_EMAIL_SUFFIX) {
        Ok(value)
    } else {
        Err(FieldErrorKind::DomainNotAllowed)
    }
}

fn require_min_length(value: String) -> Result<String, FieldErrorKind> {
    if value.chars().count() < MIN_PASSWORD_CHARS {
        Err(FieldErrorKind::TooShort)
    } else {
        Ok(value)
    }
}

/// Coerce a raw knowledge string to a score.
///
/// Mirrors the coercion the form always had: an empty box counts as 0 (and
/// then fails the range check), fractional values are accepted, and anything
/// unparseable is reported as out of range.
fn coerce_knowledge(raw: &str) -> Result<f64, FieldErrorKind> {
    let trimmed = raw.trim();
    let value = if trimmed.is_empty() {
        0.0
    } else {
        trimmed
            .parse::<f64>()
            .map_err(|_| FieldErrorKind::OutOfRange)?
    };

    if KNOWLEDGE_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(FieldErrorKind::OutOfRange)
    }
}

/// User-facing copy for a field failure.
fn message_for(path: FieldPath, kind: FieldErrorKind) -> String {
    match (path, kind) {
        (FieldPath::Avatar, FieldErrorKind::MissingFile) => "Choose an avatar image.".into(),
        (FieldPath::Avatar, FieldErrorKind::FileTooLarge) => {
            "The avatar must be 5 MiB or smaller.".into()
        }
        (FieldPath::Name, FieldErrorKind::EmptyField) => "Name is required.".into(),
        (FieldPath::Email, FieldErrorKind::EmptyField) => "E-mail is required.".into(),
        (FieldPath::Email, FieldErrorKind::InvalidFormat) => "Invalid e-mail format.".into(),
        (FieldPath::Email, FieldErrorKind::DomainNotAllowed) => {
            format!("E-mail must end with '{REQUIRED_EMAIL_SUFFIX}'.")
        }
        (FieldPath::Password, FieldErrorKind::EmptyField) => "Password is required.".into(),
        (FieldPath::Password, FieldErrorKind::TooShort) => {
            format!("Password needs at least {MIN_PASSWORD_CHARS} characters.")
        }
        (FieldPath::TechTitle(_), FieldErrorKind::EmptyField) => "Title is required.".into(),
        (FieldPath::TechKnowledge(_), FieldErrorKind::OutOfRange) => {
            "Knowledge must be between 1 and 100.".into()
        }
        (FieldPath::Techs, FieldErrorKind::TooFewEntries) => {
            format!("Add at least {MIN_TECH_ENTRIES} technologies.")
        }
        (_, kind) => kind.to_string(),
    }
}
