use std::path::MAIN_SEPARATOR;

use thiserror::Error;

/// Suffix marking a directory entry name (and a composed directory path).
pub const DIR_MARKER: char = MAIN_SEPARATOR;

/// One listed name inside a column.
///
/// Directories carry a trailing [`DIR_MARKER`], files do not. Entries are
/// immutable snapshots of the listing that created the column.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    name: String,
}

impl Entry {
    /// Creates an entry from a name that already follows the marker convention.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Creates an entry from a raw listed name, appending the marker for directories.
    pub fn from_listing(name: &str, is_dir: bool) -> Self {
        if is_dir && !name.ends_with(DIR_MARKER) {
            Self::new(format!("{name}{DIR_MARKER}"))
        } else {
            Self::new(name)
        }
    }

    /// Entry name, including the directory marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this entry denotes a directory.
    pub fn is_dir(&self) -> bool {
        is_dir_name(&self.name)
    }
}

/// Whether a name or composed path follows the directory marker convention.
pub fn is_dir_name(name: &str) -> bool {
    name.ends_with(DIR_MARKER)
}

/// Result alias used across the picker.
pub type PickerResult<T> = Result<T, PickerError>;

/// Errors returned by the picker core
#[derive(Error, Debug)]
pub enum PickerError {
    /// Listing or persistence failure. Recoverable: the session keeps running.
    #[error("{context}: {source}")]
    Io {
        /// Short operation label, e.g. `readdir`.
        context: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// Favorites could not be read; no session can be started.
    #[error("loading favorites: {0}")]
    FavoritesLoad(#[source] std::io::Error),
    /// The caller drove the chain inconsistently (bad index, unknown entry).
    #[error("contract violation: {0}")]
    ContractViolation(String),
    /// Attempt to remove one of the fixed favorites.
    #[error("favorite is fixed and cannot be removed: {0}")]
    Immutable(String),
}

impl PickerError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn contract(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }
}
