// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Produce storage-safe object key components shared across the app.

/// Produce a safe object key component from a user-provided filename.
///
/// # Steps
/// - Transliterate Unicode to ASCII with `deunicode` (e.g., "Å" → "A").
/// - Allow ASCII alphanumerics plus `-`, `_`, and `.`; treat other characters as `_`.
/// - Collapse runs of `_` and `.`; trim trailing dots.
/// - Fall back to `avatar` for empty or dot-only results.
///
/// Multi-part extensions stay intact (for example `photo.v2.tar.gz` stays
/// `photo.v2.tar.gz`), so the stored object keeps a recognizable name.
pub fn sanitize_component(value: &str) -> String {
    // Step 1: transliterate to ASCII to avoid multi-byte surprises in keys.
    let transliterated = deunicode::deunicode(value);
    let mut out = String::with_capacity(transliterated.len());
    let mut last: Option<char> = None;

    // Step 2: map characters into the allowed set and collapse runs of `_` and `.`.
    for ch in transliterated.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
            ch
        } else {
            '_'
        };

        match mapped {
            '_' => {
                if last != Some('_') {
                    out.push('_');
                    last = Some('_');
                }
            }
            '.' => {
                if last != Some('.') {
                    out.push('.');
                    last = Some('.');
                }
            }
            c => {
                out.push(c);
                last = Some(c);
            }
        }
    }

    // Additional cleanup: avoid a stray underscore immediately before a dot.
    while let Some(pos) = out.find("_.") {
        out.remove(pos);
    }

    while out.ends_with('.') || out.ends_with(' ') {
        out.pop();
    }

    // Fallback for empty or special dot-only names.
    if out.is_empty() || out == "." || out == ".." {
        return "avatar".to_string();
    }

    out
}
