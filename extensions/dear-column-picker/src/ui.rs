//! Dear ImGui adapter.
//!
//! Draws the favorites pane, the path bar, the error panel and one column per
//! chain level, collecting [`PickerEvent`]s while drawing. The events are
//! applied to the controller once drawing is done; no navigation logic lives
//! here.

use std::path::PathBuf;

use dear_imgui_rs::input::Key;
use dear_imgui_rs::{Condition, Ui, WindowFlags};

use crate::column::Column;
use crate::navigator::{NavigationController, PickerEvent, PickerOutcome};

const FAVORITES_WIDTH: f32 = 160.0;
const ERROR_COLOR: [f32; 4] = [0.95, 0.35, 0.35, 1.0];

/// Controller plus per-window UI state.
pub struct ColumnPickerState {
    /// The navigation state machine driven by this window.
    pub controller: NavigationController,
    /// Width of each column, in pixels.
    pub column_width: f32,
    focus_next: Option<FocusRequest>,
}

/// Keyboard focus to apply on the next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FocusRequest {
    Filter(usize),
    List(usize),
}

impl FocusRequest {
    fn column(self) -> usize {
        match self {
            FocusRequest::Filter(index) | FocusRequest::List(index) => index,
        }
    }
}

impl ColumnPickerState {
    /// Wraps a started controller; keyboard focus starts in the first column.
    pub fn new(controller: NavigationController) -> Self {
        Self {
            controller,
            column_width: 220.0,
            focus_next: Some(FocusRequest::Filter(0)),
        }
    }
}

/// UI handle for the column picker.
pub struct ColumnPicker<'ui> {
    /// Frame to draw into.
    pub ui: &'ui Ui,
}

/// Extend Ui with a column picker entry point
pub trait ColumnPickerExt {
    /// Entry point for drawing the column picker
    fn column_picker(&self) -> ColumnPicker<'_>;
}

impl ColumnPickerExt for Ui {
    fn column_picker(&self) -> ColumnPicker<'_> {
        ColumnPicker { ui: self }
    }
}

impl<'ui> ColumnPicker<'ui> {
    /// Draws the picker in its own window.
    ///
    /// Returns the committed path on the frame it is committed.
    pub fn show(&self, state: &mut ColumnPickerState) -> Option<PathBuf> {
        self.ui
            .window("Pick a file##column_picker")
            .size([900.0, 520.0], Condition::FirstUseEver)
            .build(|| self.draw_contents(state))
            .flatten()
    }

    /// Draws the picker into the current window.
    pub fn draw_contents(&self, state: &mut ColumnPickerState) -> Option<PathBuf> {
        let ui = self.ui;
        let focus = state.focus_next.take();
        let column_width = state.column_width;
        let ctl = &state.controller;
        let mut events = Vec::new();

        draw_path_bar(ui, ctl, &mut events);
        if let Some(message) = ctl.error_message() {
            ui.text_colored(ERROR_COLOR, message);
            ui.same_line();
            if ui.small_button("clear") {
                events.push(PickerEvent::AcknowledgeError);
            }
        }
        ui.separator();

        ui.child_window("##cp_favorites")
            .size([FAVORITES_WIDTH, 0.0])
            .border(true)
            .build(ui, || draw_favorites(ui, ctl, &mut events));
        ui.same_line();
        ui.child_window("##cp_columns")
            .size([0.0, 0.0])
            .flags(WindowFlags::HORIZONTAL_SCROLLBAR)
            .build(ui, || {
                for (index, column) in ctl.chain().columns().iter().enumerate() {
                    if index > 0 {
                        ui.same_line();
                    }
                    let _id = ui.push_id(index);
                    ui.child_window("##cp_column")
                        .size([column_width, 0.0])
                        .border(true)
                        .build(ui, || {
                            let focus = focus.filter(|f| f.column() == index);
                            draw_column(ui, index, column, focus, &mut events)
                        });
                }
            });

        apply_events(state, events)
    }
}

fn draw_path_bar(ui: &Ui, ctl: &NavigationController, events: &mut Vec<PickerEvent>) {
    let toggle = if ctl.is_path_favorite() { "-" } else { "+" };
    if ui.small_button(toggle) {
        events.push(PickerEvent::ToggleFavorite(ctl.composed_path().to_string()));
    }
    if ui.is_item_hovered() {
        ui.tooltip_text(if ctl.is_path_favorite() {
            "Remove from favorites"
        } else {
            "Add to favorites"
        });
    }
    ui.same_line();
    if ui.button("Select") {
        events.push(PickerEvent::CommitRequest);
    }
    ui.same_line();
    ui.text(ctl.composed_path());
}

fn draw_favorites(ui: &Ui, ctl: &NavigationController, events: &mut Vec<PickerEvent>) {
    ui.text_disabled("Favorites");
    ui.separator();
    let root = ctl.chain().root();
    for (i, fav) in ctl.favorites().list().enumerate() {
        let _id = ui.push_id(i);
        if ui
            .selectable_config(&fav.label)
            .selected(fav.path == root)
            .build()
        {
            events.push(PickerEvent::ActivateFavorite(fav.path.clone()));
        }
        if ui.is_item_hovered() {
            ui.tooltip_text(&fav.path);
        }
    }
}

fn draw_column(
    ui: &Ui,
    index: usize,
    column: &Column,
    focus: Option<FocusRequest>,
    events: &mut Vec<PickerEvent>,
) {
    let selected = column.selected_name();
    // Focus lands on the selected entry, else the first one; an empty list
    // falls back to the filter field.
    let list_target = match focus {
        Some(FocusRequest::List(_)) => column
            .visible_entries()
            .position(|e| e.name() == selected)
            .or_else(|| column.visible_entries().next().map(|_| 0)),
        _ => None,
    };
    let mut filter = column.filter_text().to_string();
    if focus.is_some() && list_target.is_none() {
        ui.set_keyboard_focus_here();
    }
    ui.set_next_item_width(-1.0);
    if ui.input_text("##filter", &mut filter).hint("filter").build() {
        events.push(PickerEvent::FilterChanged {
            column: index,
            text: filter,
        });
    }
    let field_focused = ui.is_item_focused();
    let ctrl = ui.is_key_down(Key::LeftCtrl) || ui.is_key_down(Key::RightCtrl);
    if field_focused && ctrl && ui.is_key_pressed(Key::F) {
        events.push(PickerEvent::CompleteRequest { column: index });
    }
    ui.separator();

    let enter = ui.is_key_pressed(Key::Enter);
    for (i, entry) in column.visible_entries().enumerate() {
        let _id = ui.push_id(i);
        let is_selected = entry.name() == selected;
        if list_target == Some(i) {
            ui.set_keyboard_focus_here();
        }
        let clicked = ui
            .selectable_config(entry.name())
            .selected(is_selected)
            .build();
        // Enter on a focused entry commits the column instead of toggling it.
        if clicked && !enter {
            // Clicking the selected entry again deselects it.
            let name = if is_selected { "" } else { entry.name() };
            events.push(PickerEvent::Select {
                column: index,
                name: name.to_string(),
            });
        }
    }

    if ui.is_window_focused() && !field_focused {
        if enter {
            events.push(PickerEvent::ActivateColumn { column: index });
        }
        if ui.is_key_pressed(Key::LeftArrow) {
            events.push(PickerEvent::NavigateLeft { column: index });
        }
        if ui.is_key_pressed(Key::RightArrow) {
            events.push(PickerEvent::NavigateRight { column: index });
        }
    }
}

fn apply_events(state: &mut ColumnPickerState, events: Vec<PickerEvent>) -> Option<PathBuf> {
    for event in events {
        match state.controller.handle_event(event) {
            PickerOutcome::FocusColumn(index) => {
                state.focus_next = Some(FocusRequest::Filter(index))
            }
            PickerOutcome::FocusList(index) => state.focus_next = Some(FocusRequest::List(index)),
            PickerOutcome::Committed(_) | PickerOutcome::None => {}
        }
    }
    state.controller.take_result()
}
