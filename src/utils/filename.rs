//! Filename sanitizing for download targets.
//!
//! Output names double as the skip-if-exists key on later runs, so the
//! transformation must be idempotent: sanitizing an already-sanitized name
//! returns it unchanged.

use regex::Regex;

/// Turns a raw display string into a filesystem-safe file stem.
///
/// Rules, in order: forbidden characters (`/ \ : * ? < > |`) become `_`,
/// double quotes are removed, newlines become spaces, the result is trimmed
/// and runs of whitespace collapse to a single space.
pub struct FilenameSanitizer {
    forbidden: Regex,
    whitespace: Regex,
}

impl FilenameSanitizer {
    pub fn new() -> Self {
        Self {
            forbidden: Regex::new(r#"[/\\:*?<>|]"#).expect("forbidden-character pattern"),
            whitespace: Regex::new(r"\s+").expect("whitespace pattern"),
        }
    }

    pub fn sanitize(&self, name: &str) -> String {
        let replaced = self.forbidden.replace_all(name, "_");
        let stripped = replaced.replace('"', "");
        let flattened = stripped.replace('\n', " ");
        self.whitespace
            .replace_all(flattened.trim(), " ")
            .into_owned()
    }
}

impl Default for FilenameSanitizer {
    fn default() -> Self {
        Self::new()
    }
}
