use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use indexmap::IndexMap;

use crate::core::{PickerError, PickerResult};
use crate::path::with_dir_marker;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Favorite entry origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FavoriteOrigin {
    /// Home directory or filesystem root; always present and never removed.
    Fixed,
    /// Added by the user and persisted.
    User,
}

/// A named starting directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Favorite {
    /// Display name shown in UI.
    pub label: String,
    /// Absolute directory path, always ending with the directory marker.
    pub path: String,
    /// Origin of the entry (fixed vs user).
    pub origin: FavoriteOrigin,
}

impl Favorite {
    fn new(label: impl Into<String>, path: &str, origin: FavoriteOrigin) -> Self {
        Self {
            label: label.into(),
            path: with_dir_marker(path),
            origin,
        }
    }

    /// Returns whether this favorite can be removed.
    pub fn is_removable(&self) -> bool {
        self.origin == FavoriteOrigin::User
    }
}

/// The set of starting roots, keyed by path and kept in insertion order.
///
/// Always starts with the fixed entries (home, then root), followed by user
/// favorites in the order they were loaded or added.
#[derive(Clone, Debug)]
pub struct FavoritesRegistry {
    favorites: IndexMap<String, Favorite>,
}

impl FavoritesRegistry {
    /// Label of the fixed home entry.
    pub const HOME_LABEL: &'static str = "Home";
    /// Label of the fixed filesystem root entry.
    pub const ROOT_LABEL: &'static str = "Root";

    /// Creates a registry with the fixed entries for this machine.
    pub fn new() -> Self {
        Self::with_home(home_dir())
    }

    /// Creates a registry with an explicit home directory.
    pub fn with_home(home: Option<PathBuf>) -> Self {
        let mut reg = Self {
            favorites: IndexMap::new(),
        };
        if let Some(home) = home {
            reg.insert(Favorite::new(
                Self::HOME_LABEL,
                &home.to_string_lossy(),
                FavoriteOrigin::Fixed,
            ));
        }
        reg.insert(Favorite::new(
            Self::ROOT_LABEL,
            &MAIN_SEPARATOR.to_string(),
            FavoriteOrigin::Fixed,
        ));
        reg
    }

    /// Creates a registry from persisted user paths, after the fixed entries.
    pub fn from_persisted<I, S>(home: Option<PathBuf>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut reg = Self::with_home(home);
        for p in paths {
            reg.add(p.as_ref());
        }
        reg
    }

    /// All favorites, fixed entries first.
    pub fn list(&self) -> impl Iterator<Item = &Favorite> + '_ {
        self.favorites.values()
    }

    /// Number of favorites.
    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    /// Returns `true` if there are no favorites (never the case in practice).
    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// First favorite, the default starting root.
    pub fn first(&self) -> Option<&Favorite> {
        self.favorites.first().map(|(_, f)| f)
    }

    /// Adds a user favorite.
    ///
    /// Returns `false` when the path is already present or is not absolute.
    pub fn add(&mut self, path: &str) -> bool {
        if path.trim().is_empty() || !Path::new(path).is_absolute() {
            trace_favorite_added(path, false);
            return false;
        }
        let label = default_label_for_path(Path::new(path));
        let added = self.insert(Favorite::new(label, path, FavoriteOrigin::User));
        trace_favorite_added(path, added);
        added
    }

    /// Removes a user favorite by path.
    ///
    /// Returns `Ok(false)` when no favorite has that path and
    /// [`PickerError::Immutable`] for the fixed entries, which stay in place.
    pub fn remove(&mut self, path: &str) -> PickerResult<bool> {
        let key = with_dir_marker(path);
        match self.favorites.get(&key) {
            None => Ok(false),
            Some(f) if !f.is_removable() => {
                trace_favorite_rejected(&key);
                Err(PickerError::Immutable(key))
            }
            Some(_) => {
                self.favorites.shift_remove(&key);
                trace_favorite_removed(&key);
                Ok(true)
            }
        }
    }

    /// Looks a favorite up by path (with or without the trailing marker).
    pub fn find_by_path(&self, path: &str) -> Option<&Favorite> {
        if path.is_empty() {
            return None;
        }
        self.favorites.get(&with_dir_marker(path))
    }

    /// Paths of the user favorites, in order, as persisted.
    pub fn user_paths(&self) -> Vec<String> {
        self.favorites
            .values()
            .filter(|f| f.is_removable())
            .map(|f| f.path.clone())
            .collect()
    }

    fn insert(&mut self, favorite: Favorite) -> bool {
        if self.favorites.contains_key(&favorite.path) {
            return false;
        }
        self.favorites.insert(favorite.path.clone(), favorite);
        true
    }
}

impl Default for FavoritesRegistry {
    fn default() -> Self {
        FavoritesRegistry::new()
    }
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    dirs::home_dir().filter(|p| !p.as_os_str().is_empty())
}

fn default_label_for_path(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(feature = "tracing")]
fn trace_favorite_added(path: &str, added: bool) {
    debug!(event = "favorites.add", path, added, "favorite add");
}

#[cfg(not(feature = "tracing"))]
fn trace_favorite_added(_path: &str, _added: bool) {}

#[cfg(feature = "tracing")]
fn trace_favorite_removed(path: &str) {
    debug!(event = "favorites.remove", path, "favorite removed");
}

#[cfg(not(feature = "tracing"))]
fn trace_favorite_removed(_path: &str) {}

#[cfg(feature = "tracing")]
fn trace_favorite_rejected(path: &str) {
    debug!(event = "favorites.remove_rejected", path, "fixed favorite kept");
}

#[cfg(not(feature = "tracing"))]
fn trace_favorite_rejected(_path: &str) {}
