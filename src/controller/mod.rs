//! Interactive state machines for editable and selectable text.
//!
//! Both controllers follow the same contract: the caller owns the state
//! record, feeds it one [`Event`](crate::event::Event) at a time through
//! `apply`, and gets back an [`Outcome`] describing whether the event was
//! consumed and what the application should hear about.

pub mod blink;
pub mod selectable;
pub mod text_field;

use crate::text::{clamp_to_boundary, prev_boundary, prev_word_boundary};
use crate::text::{next_boundary, next_word_boundary};

pub use selectable::{SelectableTextConfig, SelectableTextController, SelectableTextState, SelectableView};
pub use text_field::{FieldView, TextFieldConfig, TextFieldController, TextFieldState};

/// Width of the insertion cursor in pixels
pub const CURSOR_WIDTH: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Ignored,
    Handled,
}

/// Something the application may want to react to after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Any observable part of the state changed; the widget needs a repaint.
    StateChanged,
    /// The text was edited; carries the new contents.
    TextChanged(String),
    /// The normalized selection moved (a collapsed selection is the caret).
    SelectionChanged { start: usize, end: usize },
    FocusChanged(bool),
    HoverChanged(bool),
    /// Enter pressed in a single-line field; carries the contents.
    Submit(String),
    /// The widget asks the focus manager to take focus away (Escape).
    RequestBlur,
    /// The widget was clicked while unfocused and wants focus.
    RequestFocus,
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub response: EventResponse,
    pub notifications: Vec<Notification>,
}

impl Outcome {
    pub fn ignored() -> Self {
        Self {
            response: EventResponse::Ignored,
            notifications: Vec::new(),
        }
    }

    pub fn is_handled(&self) -> bool {
        self.response == EventResponse::Handled
    }

    /// Whether the state changed in a way that should be repainted.
    pub fn needs_redraw(&self) -> bool {
        self.notifications.contains(&Notification::StateChanged)
    }

    pub fn contains(&self, notification: &Notification) -> bool {
        self.notifications.contains(notification)
    }

    /// New text carried by a `TextChanged` notification, if any.
    pub fn text_changed(&self) -> Option<&str> {
        self.notifications.iter().find_map(|n| match n {
            Notification::TextChanged(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub(crate) fn push(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Append the notifications implied by the difference between two snapshots.
    pub(crate) fn record_changes(
        &mut self,
        before: &Observed,
        after: &Observed,
        text: impl FnOnce() -> String,
    ) {
        if before.focused != after.focused {
            self.push(Notification::FocusChanged(after.focused));
        }
        if before.hovered != after.hovered {
            self.push(Notification::HoverChanged(after.hovered));
        }
        if before.revision != after.revision {
            self.push(Notification::TextChanged(text()));
        }
        if before.selection.range() != after.selection.range() {
            let (start, end) = after.selection.range();
            self.push(Notification::SelectionChanged { start, end });
        }
        if before != after {
            self.push(Notification::StateChanged);
        }
    }
}

/// The observable parts of a state record, compared before and after an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Observed {
    pub revision: u64,
    pub selection: Selection,
    pub focused: bool,
    pub hovered: bool,
    pub selecting: bool,
    pub cursor_visible: bool,
    pub scroll_x: f32,
}

/// Selection state tracking anchor and both raw edges.
///
/// `anchor` stays fixed while shift-extending and `end` is the moving edge,
/// which is where the caret is drawn. A collapsed selection is just a caret.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// A collapsed selection at `pos`
    pub fn new(pos: usize) -> Self {
        Self {
            anchor: pos,
            start: pos,
            end: pos,
        }
    }

    /// Selection from a fixed `anchor` to a moving `caret`
    pub fn spanning(anchor: usize, caret: usize) -> Self {
        Self {
            anchor,
            start: anchor,
            end: caret,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.start != self.end
    }

    /// Normalized `(min, max)` view used for rendering and deletion
    pub fn range(&self) -> (usize, usize) {
        (self.start.min(self.end), self.start.max(self.end))
    }

    /// Move the caret to `caret`, extending from the anchor or collapsing.
    ///
    /// Extending a collapsed selection anchors it at the current caret.
    pub fn move_caret(&mut self, caret: usize, extend: bool) {
        if extend {
            if !self.has_selection() {
                self.anchor = self.end;
            }
            *self = Self::spanning(self.anchor, caret);
        } else {
            *self = Self::new(caret);
        }
    }

    /// Snap every edge into the text and onto a codepoint boundary.
    pub fn clamp(&mut self, text: &str) {
        self.anchor = clamp_to_boundary(text, self.anchor);
        self.start = clamp_to_boundary(text, self.start);
        self.end = clamp_to_boundary(text, self.end);
    }

    pub fn selected<'a>(&self, text: &'a str) -> &'a str {
        let (lo, hi) = self.range();
        &text[lo.min(text.len())..hi.min(text.len())]
    }
}

/// Horizontal caret motion shared by both controllers.
///
/// Without shift, an existing selection collapses to its near edge instead of
/// moving. `word` jumps by word boundaries.
pub(crate) fn step_horizontal(
    text: &str,
    selection: &mut Selection,
    forward: bool,
    extend: bool,
    word: bool,
) {
    if !extend && !word && selection.has_selection() {
        let (lo, hi) = selection.range();
        *selection = Selection::new(if forward { hi } else { lo });
        return;
    }

    let caret = selection.end;
    let target = match (forward, word) {
        (true, true) => next_word_boundary(text, caret),
        (true, false) => next_boundary(text, caret),
        (false, true) => prev_word_boundary(text, caret),
        (false, false) => prev_boundary(text, caret),
    };
    selection.move_caret(target, extend);
}
