//! crates/study_hub_core/src/filename.rs
//!
//! Rules for naming uploaded files: the extension allow-list and the
//! sanitizer that turns a client-supplied name into a safe on-disk name.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Extensions accepted by the upload form (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("static regex is valid"));

/// Returns the lowercased text after the last `.`, if there is one.
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// True when `filename` has an extension from [`ALLOWED_EXTENSIONS`].
pub fn is_allowed_file(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reduces a client-supplied filename to `[A-Za-z0-9_.-]`.
///
/// The name is NFKD-decomposed first so accented letters keep their base
/// letter; whatever is still non-ASCII is dropped. Path separators become word breaks,
/// words are joined with `_`, and leading/trailing `.`/`_` are stripped, so
/// `"../../etc/passwd"` becomes `"etc_passwd"`. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    UNSAFE_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// True when `filename` can be used as-is inside the upload directory.
pub fn is_safe_stored_name(filename: &str) -> bool {
    !filename.is_empty() && secure_filename(filename) == filename
}
