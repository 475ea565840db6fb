use crate::core::{Entry, PickerError, PickerResult};

/// Result of [`Column::set_filter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    /// The filter text equals the full name of a listed entry.
    pub exact_match: bool,
    /// The previous selection was filtered out and has been cleared.
    pub selection_cleared: bool,
}

/// One browsing level: the listing of a single directory.
///
/// Holds a snapshot of the entries, a live substring filter over them and at
/// most one selected entry. Filter and selection are independent: selecting a
/// name does not touch the filter text.
#[derive(Clone, Debug, Default)]
pub struct Column {
    directory_token: String,
    all_entries: Vec<Entry>,
    visible: Vec<usize>,
    selected: Option<usize>,
    filter_text: String,
}

impl Column {
    /// Creates a column listing `entries` of the directory named `directory_token`.
    ///
    /// The root column uses an empty token.
    pub fn new(directory_token: impl Into<String>, entries: Vec<Entry>) -> Self {
        let mut col = Self {
            directory_token: directory_token.into(),
            ..Self::default()
        };
        col.set_entries(entries);
        col
    }

    /// Replaces the listing, resetting filter and selection.
    pub fn set_entries(&mut self, entries: Vec<Entry>) {
        self.visible = (0..entries.len()).collect();
        self.all_entries = entries;
        self.filter_text.clear();
        self.selected = None;
    }

    /// Name of the directory this column lists (selected in the column to its left).
    pub fn directory_token(&self) -> &str {
        &self.directory_token
    }

    /// All listed entries, in listing order.
    pub fn all_entries(&self) -> &[Entry] {
        &self.all_entries
    }

    /// Entries passing the current filter, in listing order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.visible.iter().map(move |&i| &self.all_entries[i])
    }

    /// Number of entries passing the current filter.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Current filter text.
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Selected entry, if any.
    pub fn selected(&self) -> Option<&Entry> {
        self.selected.map(|i| &self.all_entries[i])
    }

    /// Selected entry name, or `""` when nothing is selected.
    pub fn selected_name(&self) -> &str {
        self.selected().map(Entry::name).unwrap_or("")
    }

    /// Whether `name` is a listed entry of this column.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Sets the filter and recomputes the visible subsequence (case-sensitive substring).
    ///
    /// Clears the selection when the selected entry is no longer visible.
    pub fn set_filter(&mut self, text: &str) -> FilterUpdate {
        self.filter_text = text.to_string();
        self.visible = self
            .all_entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.name().contains(text))
            .map(|(i, _)| i)
            .collect();

        let exact_match = self.all_entries.iter().any(|e| e.name() == text);
        let selection_cleared = match self.selected {
            Some(i) if !self.visible.contains(&i) => {
                self.selected = None;
                true
            }
            _ => false,
        };
        FilterUpdate {
            exact_match,
            selection_cleared,
        }
    }

    /// Computes a prefix completion for the current filter, like shell tab-completion.
    ///
    /// With a single visible entry its full name is returned. Otherwise the
    /// longest common prefix of the visible names starting with the filter text
    /// is returned, or the filter text itself when none does. The filter is not
    /// modified.
    pub fn complete_filter(&self) -> String {
        if self.visible.len() == 1 {
            return self.all_entries[self.visible[0]].name().to_string();
        }
        let mut candidates = self
            .visible_entries()
            .map(Entry::name)
            .filter(|n| n.starts_with(self.filter_text.as_str()));
        let Some(first) = candidates.next() else {
            return self.filter_text.clone();
        };
        let mut prefix = first;
        for name in candidates {
            let common = prefix
                .char_indices()
                .zip(name.chars())
                .find(|((_, a), b)| a != b)
                .map(|((i, _), _)| i)
                .unwrap_or_else(|| prefix.len().min(name.len()));
            prefix = &prefix[..common];
        }
        prefix.to_string()
    }

    /// Selects a listed entry by name; the entry need not be visible.
    pub fn select(&mut self, name: &str) -> PickerResult<()> {
        let i = self.position(name).ok_or_else(|| {
            PickerError::contract(format!(
                "`{name}` is not listed in column `{}`",
                self.directory_token
            ))
        })?;
        self.selected = Some(i);
        Ok(())
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The single visible entry, when exactly one passes the filter.
    ///
    /// Keyboard commit is only meaningful in that case.
    pub fn sole_visible(&self) -> Option<&Entry> {
        match self.visible.as_slice() {
            [i] => Some(&self.all_entries[*i]),
            _ => None,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.all_entries.iter().position(|e| e.name() == name)
    }
}
