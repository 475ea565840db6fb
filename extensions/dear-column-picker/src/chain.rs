use std::path::Path;

use crate::column::Column;
use crate::core::{Entry, PickerError, PickerResult, is_dir_name};
use crate::fs::FileSystem;
use crate::path::compose;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Result of [`ColumnChain::select_at`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOutcome {
    /// Composed path after the change, for display.
    pub path: String,
    /// Index of the column appended for a selected directory, if any.
    pub opened: Option<usize>,
}

/// The ordered columns from the favorite root down to the deepest opened directory.
///
/// Column 0 lists the root; column `i > 0` lists the directory selected in
/// column `i - 1`. Only the last column may lack a directory selection, so the
/// chain always spells out one consistent path prefix.
#[derive(Clone, Debug)]
pub struct ColumnChain {
    root: String,
    columns: Vec<Column>,
    show_hidden: bool,
}

impl ColumnChain {
    /// Lists `root` and builds a single-column chain from it.
    ///
    /// `root` must end with the directory marker.
    pub fn open(root: &str, fs: &dyn FileSystem, show_hidden: bool) -> PickerResult<Self> {
        let entries = list_dir(fs, root, show_hidden)?;
        Ok(Self::from_root_column(root, Column::new("", entries), show_hidden))
    }

    /// Builds a chain around an already populated root column.
    pub fn from_root_column(root: &str, column: Column, show_hidden: bool) -> Self {
        Self {
            root: root.to_string(),
            columns: vec![column],
            show_hidden,
        }
    }

    /// The favorite root this chain starts at.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// All columns, root first.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column at `index`, if present.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Mutable column at `index`.
    pub fn column_mut(&mut self, index: usize) -> PickerResult<&mut Column> {
        let len = self.columns.len();
        self.columns
            .get_mut(index)
            .ok_or_else(|| out_of_range(index, len))
    }

    /// Number of columns (never zero).
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always `false`; a chain owns at least its root column.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of the deepest column.
    pub fn deepest(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    /// Path of the root plus the selections of columns `0..upto`, followed by `name`.
    ///
    /// Every column before `upto` must carry a selection.
    pub fn compose(&self, upto: usize, name: &str) -> PickerResult<String> {
        if upto >= self.columns.len() {
            return Err(out_of_range(upto, self.columns.len()));
        }
        let mut parts = Vec::with_capacity(upto + 1);
        for (i, col) in self.columns[..upto].iter().enumerate() {
            let selected = col.selected_name();
            if selected.is_empty() {
                return Err(PickerError::contract(format!(
                    "column {i} has no selection but column {upto} is composed"
                )));
            }
            parts.push(selected);
        }
        parts.push(name);
        Ok(compose(&self.root, parts))
    }

    /// Root plus every selection down the chain, for display.
    pub fn composed_path(&self) -> String {
        compose(&self.root, self.columns.iter().map(Column::selected_name))
    }

    /// Changes the selection of column `index`.
    ///
    /// Drops every column after `index`, selects `name` (an empty name clears
    /// the selection) and, when `name` is a directory, appends a column listing
    /// it. A listing failure is returned after the truncation and selection
    /// took effect; the chain then simply ends at `index`.
    pub fn select_at(
        &mut self,
        index: usize,
        name: &str,
        fs: &dyn FileSystem,
    ) -> PickerResult<SelectOutcome> {
        let len = self.columns.len();
        let column = self
            .columns
            .get(index)
            .ok_or_else(|| out_of_range(index, len))?;
        if !name.is_empty() && !column.contains(name) {
            return Err(PickerError::contract(format!(
                "`{name}` is not listed in column {index}"
            )));
        }

        self.truncate(index + 1);
        let column = &mut self.columns[index];
        if name.is_empty() {
            column.clear_selection();
        } else {
            column.select(name)?;
        }
        trace_select(index, name);

        let path = self.compose(index, name)?;
        if name.is_empty() || !is_dir_name(name) {
            return Ok(SelectOutcome { path, opened: None });
        }

        let entries = list_dir(fs, &path, self.show_hidden)?;
        self.columns.push(Column::new(name, entries));
        let opened = self.columns.len() - 1;
        trace_column_opened(opened, &path, self.columns[opened].all_entries().len());
        Ok(SelectOutcome {
            path,
            opened: Some(opened),
        })
    }

    /// Re-lists the directory shown in column `index`.
    ///
    /// The filter text and the selection survive the refresh; deeper columns
    /// are kept while the selected entry is still listed, and dropped when it
    /// is gone.
    pub fn open_at(&mut self, index: usize, fs: &dyn FileSystem) -> PickerResult<()> {
        let path = self.compose(index, "")?;
        let entries = list_dir(fs, &path, self.show_hidden)?;
        let column = &mut self.columns[index];
        let selected = column.selected_name().to_string();
        let filter = column.filter_text().to_string();
        column.set_entries(entries);
        column.set_filter(&filter);
        if !selected.is_empty() && column.contains(&selected) {
            column.select(&selected)?;
        } else {
            self.truncate(index + 1);
        }
        Ok(())
    }

    /// Keeps the first `len` columns (at least one).
    pub fn truncate(&mut self, len: usize) {
        let len = len.max(1);
        if self.columns.len() > len {
            trace_truncated(self.columns.len(), len);
            self.columns.truncate(len);
        }
    }
}

/// Lists `path` through `fs`, marking directories and optionally hiding dot-files.
pub(crate) fn list_dir(
    fs: &dyn FileSystem,
    path: &str,
    show_hidden: bool,
) -> PickerResult<Vec<Entry>> {
    let listed = fs.read_dir(Path::new(path)).map_err(|e| {
        trace_list_failed(path, &e);
        PickerError::io("readdir", e)
    })?;
    Ok(listed
        .into_iter()
        .filter(|e| show_hidden || !e.name.starts_with('.'))
        .map(|e| Entry::from_listing(&e.name, e.is_dir))
        .collect())
}

fn out_of_range(index: usize, len: usize) -> PickerError {
    PickerError::contract(format!("column {index} out of range (chain has {len})"))
}

#[cfg(feature = "tracing")]
fn trace_select(index: usize, name: &str) {
    trace!(event = "chain.select", index, name, "column selection changed");
}

#[cfg(not(feature = "tracing"))]
fn trace_select(_index: usize, _name: &str) {}

#[cfg(feature = "tracing")]
fn trace_column_opened(index: usize, path: &str, entries: usize) {
    debug!(
        event = "chain.column_opened",
        index, path, entries, "column opened"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_column_opened(_index: usize, _path: &str, _entries: usize) {}

#[cfg(feature = "tracing")]
fn trace_truncated(from: usize, to: usize) {
    trace!(event = "chain.truncated", from, to, "chain truncated");
}

#[cfg(not(feature = "tracing"))]
fn trace_truncated(_from: usize, _to: usize) {}

#[cfg(feature = "tracing")]
fn trace_list_failed(path: &str, err: &std::io::Error) {
    debug!(event = "chain.list_failed", path, error = %err, "directory listing failed");
}

#[cfg(not(feature = "tracing"))]
fn trace_list_failed(_path: &str, _err: &std::io::Error) {}
