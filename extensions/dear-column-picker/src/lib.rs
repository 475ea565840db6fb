#![deny(missing_docs)]
//! Column-based file picker for `dear-imgui-rs`.
//!
//! The picker shows one column per directory level, from a favorite root down
//! to the deepest opened directory. Each column has a substring filter; typing
//! a full entry name selects it, Ctrl+F completes the common prefix, Left and
//! Right move between levels and Enter (or the "select" button) commits.
//!
//! Two layers:
//! - A UI-independent core ([`NavigationController`] over a [`ColumnChain`]
//!   of [`Column`]s, plus [`FavoritesRegistry`]) that can be driven and tested
//!   without a window.
//! - An ImGui adapter (feature `imgui`) translating input into
//!   [`PickerEvent`]s and drawing the resulting state.
//!
//! ```no_run
//! use dear_column_picker::{NavigationController, PickerConfig, PickerEvent, PickerOutcome};
//!
//! let mut picker = NavigationController::start_local(PickerConfig::new())?;
//! picker.handle_event(PickerEvent::FilterChanged { column: 0, text: "Doc".into() });
//! if let PickerOutcome::Committed(path) = picker.handle_event(PickerEvent::CommitRequest) {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), dear_column_picker::PickerError>(())
//! ```

mod chain;
mod column;
mod config;
mod core;
mod favorites;
mod fs;
mod navigator;
pub mod path;
#[cfg(feature = "imgui")]
mod ui;

pub use chain::{ColumnChain, SelectOutcome};
pub use column::{Column, FilterUpdate};
pub use config::{
    FAVORITES_ENV, FavoritesStore, FileFavoritesStore, NoFavoritesStore, PickerConfig, config_dir,
};
pub use core::{DIR_MARKER, Entry, PickerError, PickerResult, is_dir_name};
pub use favorites::{Favorite, FavoriteOrigin, FavoritesRegistry};
pub use fs::{FileSystem, FsEntry, StdFileSystem};
pub use navigator::{NavState, NavigationController, PickerEvent, PickerOutcome};
#[cfg(feature = "imgui")]
pub use ui::{ColumnPicker, ColumnPickerExt, ColumnPickerState};
