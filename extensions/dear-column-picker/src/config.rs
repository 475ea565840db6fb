use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing::debug;

/// Environment variable overriding the favorites file location.
pub const FAVORITES_ENV: &str = "DEAR_COLUMN_PICKER_FAVORITES";

const APP_DIR: &str = "dear-column-picker";
const FAVORITES_FILE: &str = "favorites";

/// Builder for a picker session configuration.
#[derive(Clone, Debug)]
pub struct PickerConfig {
    pub(crate) show_hidden: bool,
    pub(crate) auto_select_first_on_right: bool,
    pub(crate) favorites_file: Option<PathBuf>,
    pub(crate) home: Option<PathBuf>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            show_hidden: true,
            auto_select_first_on_right: true,
            favorites_file: None,
            home: crate::favorites::home_dir(),
        }
    }
}

impl PickerConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// List dot-files (default: true)
    pub fn show_hidden(mut self, yes: bool) -> Self {
        self.show_hidden = yes;
        self
    }

    /// Select the first entry of a directory opened with "move right" (default: true)
    pub fn auto_select_first_on_right(mut self, yes: bool) -> Self {
        self.auto_select_first_on_right = yes;
        self
    }

    /// Use an explicit favorites file instead of the platform location
    pub fn favorites_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.favorites_file = Some(path.into());
        self
    }

    /// Override the home directory used for the fixed "Home" favorite
    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Favorites file to use: explicit, then environment, then platform default.
    pub fn resolved_favorites_file(&self) -> Option<PathBuf> {
        self.favorites_file
            .clone()
            .or_else(|| std::env::var_os(FAVORITES_ENV).map(PathBuf::from))
            .or_else(|| config_dir().map(|d| d.join(APP_DIR).join(FAVORITES_FILE)))
    }
}

/// Platform configuration directory (`%APPDATA%`, `~/Library/Application Support`,
/// `$XDG_CONFIG_HOME` or `~/.config`).
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir()
}

/// Persistence of the user favorites, one absolute path per entry.
pub trait FavoritesStore {
    /// Load persisted favorite paths, in order.
    fn load(&self) -> std::io::Result<Vec<String>>;
    /// Replace the persisted favorite paths.
    fn save(&self, paths: &[String]) -> std::io::Result<()>;
}

/// Favorites stored in a plain text file: one path per line, trailing newline.
#[derive(Clone, Debug)]
pub struct FileFavoritesStore {
    path: PathBuf,
}

impl FileFavoritesStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the location resolved from `config`.
    pub fn from_config(config: &PickerConfig) -> Option<Self> {
        config.resolved_favorites_file().map(Self::new)
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStore for FileFavoritesStore {
    fn load(&self) -> std::io::Result<Vec<String>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let paths: Vec<String> = text.lines().map(str::to_string).collect();
        trace_favorites_io("load", &self.path, paths.len());
        Ok(paths)
    }

    fn save(&self, paths: &[String]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = String::new();
        for p in paths {
            out.push_str(p);
            out.push('\n');
        }
        std::fs::write(&self.path, out)?;
        trace_favorites_io("save", &self.path, paths.len());
        Ok(())
    }
}

/// Store that keeps nothing; used when no config location can be resolved.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFavoritesStore;

impl FavoritesStore for NoFavoritesStore {
    fn load(&self) -> std::io::Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn save(&self, _paths: &[String]) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(feature = "tracing")]
fn trace_favorites_io(op: &'static str, path: &Path, count: usize) {
    debug!(event = "favorites.io", op, path = %path.display(), count, "favorites file");
}

#[cfg(not(feature = "tracing"))]
fn trace_favorites_io(_op: &'static str, _path: &Path, _count: usize) {}
