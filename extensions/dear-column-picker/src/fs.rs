use std::path::Path;

/// Directory entry returned by [`FileSystem::read_dir`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsEntry {
    /// Base name (no parent path, no directory marker)
    pub name: String,
    /// Whether this entry is a directory (symlinks are followed).
    pub is_dir: bool,
}

impl FsEntry {
    /// Convenience constructor for a directory entry.
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    /// Convenience constructor for a file entry.
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }
}

/// Directory-listing abstraction used to populate columns.
///
/// Implementations return names without the directory marker; the picker core
/// appends it. Order is preserved as returned.
pub trait FileSystem {
    /// List entries of a directory.
    fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<FsEntry>>;
}

/// Default filesystem implementation using `std::fs`.
///
/// Entries come back sorted by name, so columns are stable between runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<FsEntry>> {
        let mut out = Vec::new();
        for e in std::fs::read_dir(dir)? {
            let e = e?;
            let name = e.file_name().to_string_lossy().to_string();
            let ft = e.file_type()?;
            // Follow links so a symlinked directory opens like a directory.
            let is_dir = if ft.is_symlink() {
                std::fs::metadata(e.path())
                    .map(|m| m.is_dir())
                    .unwrap_or(false)
            } else {
                ft.is_dir()
            };
            out.push(FsEntry { name, is_dir });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}
