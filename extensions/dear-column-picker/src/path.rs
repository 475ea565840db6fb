//! Path composition from a favorite root and the per-column selections.
//!
//! Composition is plain string concatenation: the root always ends with the
//! directory marker and every selected directory name does too, so no
//! separators are inserted here.

use crate::core::DIR_MARKER;

/// Concatenates `root` with each selected name, in column order.
///
/// Stops at the first empty name: an empty selection can only be the last
/// meaningful element of a chain.
pub fn compose<'a, I>(root: &str, selections: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::from(root);
    for name in selections {
        if name.is_empty() {
            break;
        }
        out.push_str(name);
    }
    out
}

/// Returns `path` with a trailing directory marker.
pub fn with_dir_marker(path: &str) -> String {
    if path.ends_with(DIR_MARKER) {
        path.to_string()
    } else {
        format!("{path}{DIR_MARKER}")
    }
}

/// Strips the trailing directory marker, except for the filesystem root.
pub fn without_dir_marker(path: &str) -> &str {
    let trimmed = path.trim_end_matches(DIR_MARKER);
    if trimmed.is_empty() || is_windows_drive_root(trimmed) {
        // "/" (or "C:\") stays as is.
        &path[..(trimmed.len() + DIR_MARKER.len_utf8()).min(path.len())]
    } else {
        trimmed
    }
}

fn is_windows_drive_root(trimmed: &str) -> bool {
    cfg!(windows) && trimmed.len() == 2 && trimmed.ends_with(':')
}
