use std::path::{Path, PathBuf};

use crate::chain::ColumnChain;
use crate::column::Column;
use crate::config::{FavoritesStore, FileFavoritesStore, NoFavoritesStore, PickerConfig};
use crate::core::{PickerError, PickerResult, is_dir_name};
use crate::favorites::FavoritesRegistry;
use crate::fs::{FileSystem, StdFileSystem};
use crate::path::{with_dir_marker, without_dir_marker};

#[cfg(feature = "tracing")]
use tracing::{debug, info, trace};

/// User intents, as translated from raw input by the UI layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerEvent {
    /// An entry was clicked in a column (`""` deselects).
    Select {
        /// Column index.
        column: usize,
        /// Entry name, including the directory marker.
        name: String,
    },
    /// The filter field of a column changed.
    FilterChanged {
        /// Column index.
        column: usize,
        /// New filter text.
        text: String,
    },
    /// Prefix completion was requested in a column's filter field (Ctrl+F).
    CompleteRequest {
        /// Column index.
        column: usize,
    },
    /// "Back" gesture from a column (Left).
    NavigateLeft {
        /// Column index the gesture came from.
        column: usize,
    },
    /// "Drill in" gesture on a column's selected directory (Right).
    NavigateRight {
        /// Column index the gesture came from.
        column: usize,
    },
    /// Keyboard commit from a column's list (Enter).
    ActivateColumn {
        /// Column index.
        column: usize,
    },
    /// A favorite was chosen as the new root.
    ActivateFavorite(String),
    /// The add/remove favorite control was pressed for a path.
    ToggleFavorite(String),
    /// The "select" button: commit the composed path.
    CommitRequest,
    /// The error panel was dismissed.
    AcknowledgeError,
}

/// What the UI layer should do after an event was applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PickerOutcome {
    /// Nothing beyond redrawing.
    #[default]
    None,
    /// Move keyboard focus to the filter field of this column.
    FocusColumn(usize),
    /// Move keyboard focus to the entry list of this column, so list keys
    /// (Enter, Left, Right) keep working.
    FocusList(usize),
    /// A path was committed; the session is over.
    Committed(PathBuf),
}

/// Controller state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavState {
    /// Normal browsing.
    Browsing,
    /// A listing or persistence failure is displayed.
    Erroring {
        /// Formatted error, e.g. `readdir: No such file or directory`.
        message: String,
    },
    /// Terminal: a path was chosen.
    Committed,
}

/// Orchestrates user intents over the column chain and favorites.
///
/// The controller owns the chain; every operation runs to completion and
/// leaves the composed path and the favorite affordance up to date. Listing
/// and persistence failures never abort an operation with an error: they move
/// the controller into [`NavState::Erroring`] with the chain left at its last
/// good state. Errors returned from the operations are caller mistakes
/// ([`PickerError::ContractViolation`]) or rejected favorite removals
/// ([`PickerError::Immutable`]).
pub struct NavigationController {
    fs: Box<dyn FileSystem>,
    store: Box<dyn FavoritesStore>,
    config: PickerConfig,
    favorites: FavoritesRegistry,
    chain: ColumnChain,
    composed_path: String,
    path_is_favorite: bool,
    state: NavState,
    result: Option<PathBuf>,
}

impl NavigationController {
    /// Starts a session: loads favorites and opens the first one (home).
    ///
    /// Fails with [`PickerError::FavoritesLoad`] when the store cannot be read;
    /// no state is created in that case. A root that cannot be listed leaves
    /// an empty root column and the controller in [`NavState::Erroring`].
    pub fn start(
        config: PickerConfig,
        fs: impl FileSystem + 'static,
        store: impl FavoritesStore + 'static,
    ) -> PickerResult<Self> {
        let persisted = store.load().map_err(|e| {
            trace_favorites_load_failed(&e);
            PickerError::FavoritesLoad(e)
        })?;
        let favorites = FavoritesRegistry::from_persisted(config.home.clone(), persisted);
        let root = favorites
            .first()
            .map(|f| f.path.clone())
            .ok_or_else(|| PickerError::contract("no favorite to start browsing from"))?;

        let (chain, state) = match ColumnChain::open(&root, &fs, config.show_hidden) {
            Ok(chain) => (chain, NavState::Browsing),
            Err(err) => {
                trace_failed(&err);
                let empty =
                    ColumnChain::from_root_column(&root, Column::default(), config.show_hidden);
                (
                    empty,
                    NavState::Erroring {
                        message: err.to_string(),
                    },
                )
            }
        };

        let mut ctl = Self {
            fs: Box::new(fs),
            store: Box::new(store),
            config,
            favorites,
            chain,
            composed_path: String::new(),
            path_is_favorite: false,
            state,
            result: None,
        };
        ctl.refresh_path();
        trace_session_started(&root, ctl.favorites.len());
        Ok(ctl)
    }

    /// Starts a session on the local filesystem with the favorites file from `config`.
    pub fn start_local(config: PickerConfig) -> PickerResult<Self> {
        match FileFavoritesStore::from_config(&config) {
            Some(store) => Self::start(config, StdFileSystem, store),
            None => Self::start(config, StdFileSystem, NoFavoritesStore),
        }
    }

    /// Current state.
    pub fn state(&self) -> &NavState {
        &self.state
    }

    /// Message of the displayed error, if any.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            NavState::Erroring { message } => Some(message),
            _ => None,
        }
    }

    /// Whether a path was committed.
    pub fn is_committed(&self) -> bool {
        self.state == NavState::Committed
    }

    /// The column chain, for rendering.
    pub fn chain(&self) -> &ColumnChain {
        &self.chain
    }

    /// The favorites, for rendering.
    pub fn favorites(&self) -> &FavoritesRegistry {
        &self.favorites
    }

    /// Session configuration.
    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Root plus every selection down the chain.
    pub fn composed_path(&self) -> &str {
        &self.composed_path
    }

    /// Whether the composed path is itself a favorite (drives the `+`/`-` control).
    pub fn is_path_favorite(&self) -> bool {
        self.path_is_favorite
    }

    /// Hands out the committed path. Returns `Some` at most once per session.
    pub fn take_result(&mut self) -> Option<PathBuf> {
        self.result.take()
    }

    /// Applies one user intent.
    ///
    /// Caller mistakes and rejected favorite removals are logged and dropped;
    /// use the individual operations to observe them.
    pub fn handle_event(&mut self, event: PickerEvent) -> PickerOutcome {
        let applied = match event {
            PickerEvent::Select { column, name } => self.select_in_column(column, &name),
            PickerEvent::FilterChanged { column, text } => self.set_filter(column, &text),
            PickerEvent::CompleteRequest { column } => self.complete_filter(column),
            PickerEvent::NavigateLeft { column } => self.navigate_left(column),
            PickerEvent::NavigateRight { column } => self.navigate_right(column),
            PickerEvent::ActivateColumn { column } => self.activate_column(column),
            PickerEvent::ActivateFavorite(path) => Ok(self.switch_favorite(&path)),
            PickerEvent::ToggleFavorite(path) => self.toggle_favorite(&path),
            PickerEvent::CommitRequest => Ok(self.commit_composed()),
            PickerEvent::AcknowledgeError => {
                self.acknowledge_error();
                Ok(PickerOutcome::None)
            }
        };
        applied.unwrap_or_else(|err| {
            trace_event_rejected(&err);
            PickerOutcome::None
        })
    }

    /// Resets the chain to a single column listing `path`.
    ///
    /// On a listing failure the previous chain is kept and the error displayed.
    pub fn switch_favorite(&mut self, path: &str) -> PickerOutcome {
        if !self.accepting() {
            return PickerOutcome::None;
        }
        let root = with_dir_marker(path);
        match ColumnChain::open(&root, self.fs.as_ref(), self.config.show_hidden) {
            Ok(chain) => {
                self.chain = chain;
                self.refresh_path();
                trace_root_switched(&root);
                PickerOutcome::FocusColumn(0)
            }
            Err(err) => {
                self.fail(err);
                PickerOutcome::None
            }
        }
    }

    /// Selects `name` in column `index` (`""` clears), truncating and opening columns.
    ///
    /// Focus moves to a newly opened directory column.
    pub fn select_in_column(&mut self, index: usize, name: &str) -> PickerResult<PickerOutcome> {
        if !self.accepting() {
            return Ok(PickerOutcome::None);
        }
        Ok(match self.apply_select(index, name)? {
            Some(opened) => PickerOutcome::FocusColumn(opened),
            None => PickerOutcome::None,
        })
    }

    /// Clears the selection of the column left of `from` (or of column 0 itself).
    pub fn navigate_left(&mut self, from: usize) -> PickerResult<PickerOutcome> {
        if !self.accepting() {
            return Ok(PickerOutcome::None);
        }
        let target = from.saturating_sub(1);
        self.apply_select(target, "")?;
        Ok(PickerOutcome::FocusList(target))
    }

    /// Opens the directory selected in column `from`.
    ///
    /// With [`PickerConfig::auto_select_first_on_right`] the first entry of the
    /// opened column gets selected too. Focus moves to the deepest column's
    /// list. A selection that is not a directory is a no-op.
    pub fn navigate_right(&mut self, from: usize) -> PickerResult<PickerOutcome> {
        if !self.accepting() {
            return Ok(PickerOutcome::None);
        }
        let Some(name) = self
            .column(from)?
            .selected()
            .filter(|e| e.is_dir())
            .map(|e| e.name().to_string())
        else {
            return Ok(PickerOutcome::None);
        };
        let Some(opened) = self.apply_select(from, &name)? else {
            return Ok(PickerOutcome::None);
        };
        if self.config.auto_select_first_on_right {
            let first = self
                .chain
                .column(opened)
                .and_then(|c| c.all_entries().first())
                .map(|e| e.name().to_string());
            if let Some(first) = first {
                self.apply_select(opened, &first)?;
            }
        }
        Ok(PickerOutcome::FocusList(self.chain.deepest()))
    }

    /// Updates the filter of column `index`.
    ///
    /// Text equal to a listed name selects it as if clicked and moves focus
    /// to the deepest column. When the filter hides the selected entry the
    /// selection is cleared and deeper columns are dropped.
    pub fn set_filter(&mut self, index: usize, text: &str) -> PickerResult<PickerOutcome> {
        if !self.accepting() {
            return Ok(PickerOutcome::None);
        }
        let update = self.chain.column_mut(index)?.set_filter(text);
        trace_filter(index, text, update.exact_match);
        if update.exact_match {
            self.apply_select(index, text)?;
            return Ok(PickerOutcome::FocusColumn(self.chain.deepest()));
        }
        if update.selection_cleared {
            self.apply_select(index, "")?;
        }
        Ok(PickerOutcome::None)
    }

    /// Replaces the filter of column `index` with its prefix completion.
    ///
    /// The completed text goes through [`Self::set_filter`], so completing to
    /// a full name advances like typing it would.
    pub fn complete_filter(&mut self, index: usize) -> PickerResult<PickerOutcome> {
        if !self.accepting() {
            return Ok(PickerOutcome::None);
        }
        let text = self.column(index)?.complete_filter();
        self.set_filter(index, &text)
    }

    /// Commits the single visible entry of column `index`; no-op otherwise.
    pub fn activate_column(&mut self, index: usize) -> PickerResult<PickerOutcome> {
        if !self.accepting() {
            return Ok(PickerOutcome::None);
        }
        let Some(name) = self
            .column(index)?
            .sole_visible()
            .map(|e| e.name().to_string())
        else {
            return Ok(PickerOutcome::None);
        };
        let path = self.chain.compose(index, &name)?;
        Ok(self.commit(&path))
    }

    /// Adds `path` to the favorites, or removes it if present, and persists.
    ///
    /// Paths that are relative or do not denote a directory are ignored.
    /// Removing a fixed favorite fails with [`PickerError::Immutable`]. A
    /// failed save is displayed; the in-memory change stays.
    pub fn toggle_favorite(&mut self, path: &str) -> PickerResult<PickerOutcome> {
        if !self.accepting() {
            return Ok(PickerOutcome::None);
        }
        if !is_dir_name(path) {
            return Ok(PickerOutcome::None);
        }
        if self.favorites.find_by_path(path).is_some() {
            self.favorites.remove(path)?;
        } else if !self.favorites.add(path) {
            return Ok(PickerOutcome::None);
        }
        self.refresh_path();

        let paths = self.favorites.user_paths();
        match self.store.save(&paths) {
            Ok(()) => trace_favorites_saved(paths.len()),
            Err(e) => self.fail(PickerError::io("saving favorites", e)),
        }
        Ok(PickerOutcome::None)
    }

    /// Commits the composed path (the "select" button).
    pub fn commit_composed(&mut self) -> PickerOutcome {
        let path = self.composed_path.clone();
        self.commit(&path)
    }

    /// Ends the session with `path`, without its trailing marker unless it is the root.
    pub fn commit(&mut self, path: &str) -> PickerOutcome {
        if !self.accepting() {
            return PickerOutcome::None;
        }
        let path = PathBuf::from(without_dir_marker(path));
        trace_committed(&path);
        self.state = NavState::Committed;
        self.result = Some(path.clone());
        PickerOutcome::Committed(path)
    }

    /// Displays `err`. The chain is left untouched.
    pub fn fail(&mut self, err: PickerError) {
        if self.is_committed() {
            return;
        }
        trace_failed(&err);
        self.state = NavState::Erroring {
            message: err.to_string(),
        };
    }

    /// Dismisses a displayed error.
    pub fn acknowledge_error(&mut self) {
        if matches!(self.state, NavState::Erroring { .. }) {
            trace_acknowledged();
            self.state = NavState::Browsing;
        }
    }

    // Gate for user intents: nothing after commit, and any intent dismisses
    // a displayed error first.
    fn accepting(&mut self) -> bool {
        match self.state {
            NavState::Committed => false,
            NavState::Erroring { .. } => {
                self.acknowledge_error();
                true
            }
            NavState::Browsing => true,
        }
    }

    fn column(&self, index: usize) -> PickerResult<&Column> {
        self.chain.column(index).ok_or_else(|| {
            PickerError::contract(format!(
                "column {index} out of range (chain has {})",
                self.chain.len()
            ))
        })
    }

    /// Selects in the chain, routing listing failures into `Erroring`.
    /// Returns the index of the opened column, if any.
    fn apply_select(&mut self, index: usize, name: &str) -> PickerResult<Option<usize>> {
        let selected = self.chain.select_at(index, name, self.fs.as_ref());
        self.refresh_path();
        match selected {
            Ok(out) => Ok(out.opened),
            Err(err @ PickerError::Io { .. }) => {
                self.fail(err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn refresh_path(&mut self) {
        self.composed_path = self.chain.composed_path();
        self.path_is_favorite = self.favorites.find_by_path(&self.composed_path).is_some();
    }
}

#[cfg(feature = "tracing")]
fn trace_session_started(root: &str, favorites: usize) {
    info!(event = "picker.started", root, favorites, "picker session started");
}

#[cfg(not(feature = "tracing"))]
fn trace_session_started(_root: &str, _favorites: usize) {}

#[cfg(feature = "tracing")]
fn trace_favorites_load_failed(err: &std::io::Error) {
    debug!(event = "picker.favorites_load_failed", error = %err, "favorites load failed");
}

#[cfg(not(feature = "tracing"))]
fn trace_favorites_load_failed(_err: &std::io::Error) {}

#[cfg(feature = "tracing")]
fn trace_favorites_saved(count: usize) {
    debug!(event = "picker.favorites_saved", count, "favorites saved");
}

#[cfg(not(feature = "tracing"))]
fn trace_favorites_saved(_count: usize) {}

#[cfg(feature = "tracing")]
fn trace_root_switched(root: &str) {
    debug!(event = "picker.root_switched", root, "root switched");
}

#[cfg(not(feature = "tracing"))]
fn trace_root_switched(_root: &str) {}

#[cfg(feature = "tracing")]
fn trace_filter(column: usize, text: &str, exact_match: bool) {
    trace!(
        event = "picker.filter",
        column, text, exact_match, "filter changed"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_filter(_column: usize, _text: &str, _exact_match: bool) {}

#[cfg(feature = "tracing")]
fn trace_failed(err: &PickerError) {
    debug!(event = "picker.erroring", error = %err, "entered erroring state");
}

#[cfg(not(feature = "tracing"))]
fn trace_failed(_err: &PickerError) {}

#[cfg(feature = "tracing")]
fn trace_acknowledged() {
    trace!(event = "picker.browsing", "error acknowledged");
}

#[cfg(not(feature = "tracing"))]
fn trace_acknowledged() {}

#[cfg(feature = "tracing")]
fn trace_event_rejected(err: &PickerError) {
    debug!(event = "picker.event_rejected", error = %err, "event rejected");
}

#[cfg(not(feature = "tracing"))]
fn trace_event_rejected(_err: &PickerError) {}

#[cfg(feature = "tracing")]
fn trace_committed(path: &Path) {
    info!(event = "picker.committed", path = %path.display(), "path committed");
}

#[cfg(not(feature = "tracing"))]
fn trace_committed(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DIR_MARKER;
    use crate::fs::FsEntry;
    use crate::fs::test_support::TestFs;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn d(name: &str) -> String {
        format!("{name}{DIR_MARKER}")
    }

    #[derive(Clone, Default)]
    struct TestStore {
        persisted: Rc<RefCell<Vec<String>>>,
        saves: Rc<Cell<usize>>,
        fail_load: bool,
        fail_save: bool,
    }

    impl FavoritesStore for TestStore {
        fn load(&self) -> std::io::Result<Vec<String>> {
            if self.fail_load {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "denied",
                ));
            }
            Ok(self.persisted.borrow().clone())
        }

        fn save(&self, paths: &[String]) -> std::io::Result<()> {
            if self.fail_save {
                return Err(std::io::Error::other("disk full"));
            }
            self.saves.set(self.saves.get() + 1);
            *self.persisted.borrow_mut() = paths.to_vec();
            Ok(())
        }
    }

    fn home() -> String {
        d("/home/u")
    }

    fn docs() -> String {
        d(&format!("{}docs", home()))
    }

    fn home_fs() -> TestFs {
        TestFs::default()
            .with(
                &home(),
                vec![
                    FsEntry::dir("docs"),
                    FsEntry::file("photo.png"),
                    FsEntry::file("notes.txt"),
                ],
            )
            .with(
                &docs(),
                vec![FsEntry::dir("reports"), FsEntry::file("cv.pdf")],
            )
            .with(
                &d(&format!("{}reports", docs())),
                vec![FsEntry::file("q1.txt"), FsEntry::file("q2.txt")],
            )
            .with(&d("/srv"), vec![FsEntry::file("srv.conf")])
            .with(&DIR_MARKER.to_string(), vec![FsEntry::dir("home")])
    }

    fn config() -> PickerConfig {
        PickerConfig::new().home("/home/u")
    }

    fn controller() -> NavigationController {
        NavigationController::start(config(), home_fs(), TestStore::default()).unwrap()
    }

    fn column_count(ctl: &NavigationController) -> usize {
        ctl.chain().len()
    }

    #[test]
    fn start_opens_home_with_one_column() {
        let ctl = controller();
        assert_eq!(ctl.state(), &NavState::Browsing);
        assert_eq!(column_count(&ctl), 1);
        assert_eq!(ctl.composed_path(), home());
        assert!(ctl.is_path_favorite());
        let names: Vec<_> = ctl.chain().columns()[0]
            .visible_entries()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec![d("docs"), "photo.png".into(), "notes.txt".into()]);
    }

    #[test]
    fn favorites_load_failure_prevents_start() {
        let store = TestStore {
            fail_load: true,
            ..TestStore::default()
        };
        let err = NavigationController::start(config(), home_fs(), store)
            .err()
            .unwrap();
        assert!(matches!(err, PickerError::FavoritesLoad(_)));
    }

    #[test]
    fn unlistable_home_starts_in_erroring_with_empty_column() {
        let ctl = NavigationController::start(config(), TestFs::default(), TestStore::default())
            .unwrap();
        assert_eq!(column_count(&ctl), 1);
        assert_eq!(ctl.chain().columns()[0].visible_len(), 0);
        assert_eq!(ctl.error_message(), Some("readdir: not found"));
    }

    #[test]
    fn typing_an_exact_directory_name_opens_it() {
        let mut ctl = controller();

        let out = ctl.handle_event(PickerEvent::FilterChanged {
            column: 0,
            text: "doc".into(),
        });
        assert_eq!(out, PickerOutcome::None);
        assert_eq!(ctl.chain().columns()[0].visible_len(), 1);
        assert_eq!(column_count(&ctl), 1);

        let out = ctl.handle_event(PickerEvent::FilterChanged {
            column: 0,
            text: d("docs"),
        });
        assert_eq!(out, PickerOutcome::FocusColumn(1));
        assert_eq!(column_count(&ctl), 2);
        assert_eq!(ctl.composed_path(), docs());
        let names: Vec<_> = ctl.chain().columns()[1]
            .all_entries()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec![d("reports"), "cv.pdf".into()]);
    }

    #[test]
    fn clearing_a_middle_selection_truncates_the_chain() {
        let mut ctl = controller();
        ctl.select_in_column(0, &d("docs")).unwrap();
        ctl.select_in_column(1, &d("reports")).unwrap();
        assert_eq!(column_count(&ctl), 3);

        ctl.select_in_column(1, "").unwrap();
        assert_eq!(column_count(&ctl), 2);
        assert!(ctl.chain().columns()[1].selected().is_none());
        assert_eq!(ctl.composed_path(), docs());
    }

    #[test]
    fn selecting_a_file_reports_its_path_without_focus_change() {
        let mut ctl = controller();
        let out = ctl.select_in_column(0, "notes.txt").unwrap();
        assert_eq!(out, PickerOutcome::None);
        assert_eq!(ctl.composed_path(), format!("{}notes.txt", home()));
        assert!(!ctl.is_path_favorite());
    }

    #[test]
    fn navigate_left_clears_the_previous_column() {
        let mut ctl = controller();
        ctl.select_in_column(0, &d("docs")).unwrap();
        ctl.select_in_column(1, "cv.pdf").unwrap();

        let out = ctl.navigate_left(1).unwrap();
        assert_eq!(out, PickerOutcome::FocusList(0));
        assert_eq!(column_count(&ctl), 1);
        assert_eq!(ctl.composed_path(), home());

        ctl.select_in_column(0, "photo.png").unwrap();
        ctl.navigate_left(0).unwrap();
        assert!(ctl.chain().columns()[0].selected().is_none());
    }

    #[test]
    fn navigate_right_opens_and_selects_first_entry() {
        let mut ctl = controller();
        ctl.handle_event(PickerEvent::Select {
            column: 0,
            name: d("docs"),
        });

        // The first entry of docs/ is a directory, so it opens a third column.
        let out = ctl.handle_event(PickerEvent::NavigateRight { column: 0 });
        assert_eq!(out, PickerOutcome::FocusList(2));
        assert_eq!(ctl.chain().columns()[1].selected_name(), d("reports"));
        assert_eq!(column_count(&ctl), 3);

        let out = ctl.handle_event(PickerEvent::NavigateRight { column: 1 });
        assert_eq!(out, PickerOutcome::FocusList(2));
        assert_eq!(ctl.chain().columns()[2].selected_name(), "q1.txt");
        assert_eq!(
            ctl.composed_path(),
            format!("{}{}q1.txt", docs(), d("reports"))
        );
    }

    #[test]
    fn keyboard_drilling_chains_right_left_and_enter() {
        let mut ctl = controller();
        ctl.handle_event(PickerEvent::Select {
            column: 0,
            name: d("docs"),
        });
        let PickerOutcome::FocusList(focused) =
            ctl.handle_event(PickerEvent::NavigateRight { column: 0 })
        else {
            panic!("focus should move to a list");
        };
        assert_eq!(focused, 2);

        let out = ctl.handle_event(PickerEvent::NavigateLeft { column: focused });
        assert_eq!(out, PickerOutcome::FocusList(1));
        assert_eq!(column_count(&ctl), 2);
        assert!(ctl.chain().columns()[1].selected().is_none());

        ctl.handle_event(PickerEvent::FilterChanged {
            column: 1,
            text: "cv".into(),
        });
        let out = ctl.handle_event(PickerEvent::ActivateColumn { column: 1 });
        assert_eq!(
            out,
            PickerOutcome::Committed(PathBuf::from(format!("{}cv.pdf", docs())))
        );
    }

    #[test]
    fn navigate_right_without_auto_select_leaves_new_column_empty() {
        let cfg = config().auto_select_first_on_right(false);
        let mut ctl = NavigationController::start(cfg, home_fs(), TestStore::default()).unwrap();
        ctl.handle_event(PickerEvent::Select {
            column: 0,
            name: d("docs"),
        });

        let out = ctl.handle_event(PickerEvent::NavigateRight { column: 0 });
        assert_eq!(out, PickerOutcome::FocusList(1));
        assert_eq!(column_count(&ctl), 2);
        assert!(ctl.chain().columns()[1].selected().is_none());
    }

    #[test]
    fn navigate_right_on_a_file_does_nothing() {
        let mut ctl = controller();
        ctl.select_in_column(0, "photo.png").unwrap();
        assert_eq!(ctl.navigate_right(0).unwrap(), PickerOutcome::None);
        assert_eq!(column_count(&ctl), 1);
    }

    #[test]
    fn completion_to_an_exact_name_advances() {
        let mut ctl = controller();
        ctl.set_filter(0, "ocs").unwrap();
        let out = ctl.complete_filter(0).unwrap();
        assert_eq!(ctl.chain().columns()[0].filter_text(), d("docs"));
        assert_eq!(out, PickerOutcome::FocusColumn(1));
        assert_eq!(column_count(&ctl), 2);
    }

    #[test]
    fn filtering_out_the_selection_drops_deeper_columns() {
        let mut ctl = controller();
        ctl.select_in_column(0, &d("docs")).unwrap();
        assert_eq!(column_count(&ctl), 2);

        ctl.set_filter(0, "png").unwrap();
        assert_eq!(column_count(&ctl), 1);
        assert_eq!(ctl.composed_path(), home());
    }

    #[test]
    fn listing_failure_enters_erroring_and_keeps_last_good_chain() {
        let fs = home_fs().with(&home(), vec![FsEntry::dir("docs"), FsEntry::dir("locked")]);
        let mut ctl = NavigationController::start(config(), fs, TestStore::default()).unwrap();
        ctl.select_in_column(0, &d("docs")).unwrap();

        let out = ctl.select_in_column(0, &d("locked")).unwrap();
        assert_eq!(out, PickerOutcome::None);
        assert_eq!(ctl.error_message(), Some("readdir: not found"));
        assert_eq!(column_count(&ctl), 1);
        assert_eq!(ctl.composed_path(), d(&format!("{}locked", home())));

        ctl.handle_event(PickerEvent::AcknowledgeError);
        assert_eq!(ctl.state(), &NavState::Browsing);
        assert_eq!(column_count(&ctl), 1);
    }

    #[test]
    fn any_user_event_dismisses_the_error() {
        let fs = home_fs().with(&home(), vec![FsEntry::dir("locked"), FsEntry::file("f")]);
        let mut ctl = NavigationController::start(config(), fs, TestStore::default()).unwrap();
        ctl.select_in_column(0, &d("locked")).unwrap();
        assert!(ctl.error_message().is_some());

        ctl.handle_event(PickerEvent::Select {
            column: 0,
            name: "f".into(),
        });
        assert_eq!(ctl.state(), &NavState::Browsing);
        assert_eq!(ctl.composed_path(), format!("{}f", home()));
    }

    #[test]
    fn switching_to_an_unlistable_favorite_keeps_the_chain() {
        let mut ctl = controller();
        ctl.select_in_column(0, &d("docs")).unwrap();

        let out = ctl.switch_favorite("/nowhere");
        assert_eq!(out, PickerOutcome::None);
        assert!(ctl.error_message().is_some());
        assert_eq!(ctl.chain().root(), home());
        assert_eq!(column_count(&ctl), 2);
    }

    #[test]
    fn switching_favorites_resets_the_chain() {
        let mut ctl = controller();
        ctl.select_in_column(0, &d("docs")).unwrap();

        let out = ctl.handle_event(PickerEvent::ActivateFavorite("/srv".into()));
        assert_eq!(out, PickerOutcome::FocusColumn(0));
        assert_eq!(ctl.chain().root(), d("/srv"));
        assert_eq!(column_count(&ctl), 1);
        assert_eq!(ctl.composed_path(), d("/srv"));
    }

    #[test]
    fn enter_commits_only_a_sole_visible_entry() {
        let mut ctl = controller();
        assert_eq!(ctl.activate_column(0).unwrap(), PickerOutcome::None);
        assert!(!ctl.is_committed());

        ctl.set_filter(0, "note").unwrap();
        let out = ctl.activate_column(0).unwrap();
        let expected = PathBuf::from(format!("{}notes.txt", home()));
        assert_eq!(out, PickerOutcome::Committed(expected.clone()));
        assert_eq!(ctl.take_result(), Some(expected));
        assert_eq!(ctl.take_result(), None);
    }

    #[test]
    fn commit_strips_the_directory_marker_and_ends_the_session() {
        let mut ctl = controller();
        ctl.select_in_column(0, &d("docs")).unwrap();

        let out = ctl.handle_event(PickerEvent::CommitRequest);
        assert_eq!(out, PickerOutcome::Committed(PathBuf::from("/home/u/docs")));
        assert!(ctl.is_committed());

        // Everything after commit is ignored.
        let out = ctl.handle_event(PickerEvent::Select {
            column: 0,
            name: "photo.png".into(),
        });
        assert_eq!(out, PickerOutcome::None);
        assert_eq!(ctl.handle_event(PickerEvent::CommitRequest), PickerOutcome::None);
        assert_eq!(ctl.take_result(), Some(PathBuf::from("/home/u/docs")));
    }

    #[test]
    fn committing_the_root_keeps_its_separator() {
        let mut ctl = controller();
        ctl.switch_favorite(&DIR_MARKER.to_string());
        let out = ctl.commit_composed();
        assert_eq!(out, PickerOutcome::Committed(PathBuf::from(DIR_MARKER.to_string())));
    }

    #[test]
    fn toggle_adds_then_removes_and_persists() {
        let store = TestStore::default();
        let mut ctl = NavigationController::start(config(), home_fs(), store.clone()).unwrap();
        ctl.select_in_column(0, &d("docs")).unwrap();
        assert!(!ctl.is_path_favorite());

        let path = ctl.composed_path().to_string();
        ctl.handle_event(PickerEvent::ToggleFavorite(path.clone()));
        assert!(ctl.is_path_favorite());
        assert_eq!(store.persisted.borrow().clone(), vec![docs()]);
        assert_eq!(ctl.favorites().len(), 3);

        ctl.handle_event(PickerEvent::ToggleFavorite(path));
        assert!(!ctl.is_path_favorite());
        assert!(store.persisted.borrow().is_empty());
        assert_eq!(store.saves.get(), 2);
    }

    #[test]
    fn toggle_ignores_files_and_rejects_fixed_favorites() {
        let store = TestStore::default();
        let mut ctl = NavigationController::start(config(), home_fs(), store.clone()).unwrap();

        ctl.toggle_favorite(&format!("{}notes.txt", home())).unwrap();
        assert_eq!(store.saves.get(), 0);

        let err = ctl.toggle_favorite(&home()).unwrap_err();
        assert!(matches!(err, PickerError::Immutable(_)));
        assert!(ctl.is_path_favorite());
        assert_eq!(store.saves.get(), 0);
    }

    #[test]
    fn toggle_ignores_relative_directories() {
        let store = TestStore::default();
        let mut ctl = NavigationController::start(config(), home_fs(), store.clone()).unwrap();

        let out = ctl.handle_event(PickerEvent::ToggleFavorite(d("relative")));
        assert_eq!(out, PickerOutcome::None);
        assert_eq!(ctl.favorites().len(), 2);
        assert!(ctl.favorites().find_by_path(&d("relative")).is_none());
        assert_eq!(store.saves.get(), 0);
    }

    #[test]
    fn failed_save_is_displayed_but_keeps_the_favorite() {
        let store = TestStore {
            fail_save: true,
            ..TestStore::default()
        };
        let mut ctl = NavigationController::start(config(), home_fs(), store).unwrap();
        ctl.select_in_column(0, &d("docs")).unwrap();
        let path = ctl.composed_path().to_string();

        ctl.toggle_favorite(&path).unwrap();
        assert_eq!(ctl.error_message(), Some("saving favorites: disk full"));
        assert!(ctl.is_path_favorite());
    }

    #[test]
    fn persisted_favorites_are_listed_after_fixed_ones() {
        let store = TestStore::default();
        store.persisted.borrow_mut().push(d("/srv"));
        let ctl = NavigationController::start(config(), home_fs(), store).unwrap();
        let labels: Vec<_> = ctl.favorites().list().map(|f| f.label.clone()).collect();
        assert_eq!(labels, vec!["Home", "Root", "srv"]);
    }

    #[test]
    fn stale_column_index_is_a_contract_violation() {
        let mut ctl = controller();
        let err = ctl.select_in_column(4, "x").unwrap_err();
        assert!(matches!(err, PickerError::ContractViolation(_)));
        assert_eq!(
            ctl.handle_event(PickerEvent::NavigateRight { column: 9 }),
            PickerOutcome::None
        );
        assert_eq!(ctl.state(), &NavState::Browsing);
    }
}
