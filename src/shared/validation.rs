use lazy_static::lazy_static;
use regex::Regex;

use crate::shared::constants::ALLOWED_EXTENSIONS;

lazy_static! {
    /// Characters that may not appear in a stored filename
    /// - Kept: ASCII letters, digits, "_", "." and "-"
    /// - Everything else is removed after whitespace runs are joined with "_"
    pub static ref FILENAME_STRIP_REGEX: Regex = Regex::new(r"[^A-Za-z0-9_.\-]").unwrap();
}

/// Reduce a client-supplied filename to a safe, flat name.
///
/// Non-ASCII characters are dropped, path separators become spaces, whitespace runs
/// are joined with "_", and leading/trailing "." and "_" are trimmed. Returns an empty
/// string when nothing usable is left.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .filter(|c| c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    FILENAME_STRIP_REGEX
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Lowercased extension after the last ".", if any
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Whether the filename carries one of the accepted tabular extensions
pub fn is_allowed_file(filename: &str) -> bool {
    file_extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}
