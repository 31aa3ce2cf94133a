//! Read-only selectable text controller.
//!
//! Selection works like the text field's (drag, shift-extend, word jumps) but
//! the text is never modified. The caret is the moving edge of the selection,
//! and vertical motion re-resolves it through the wrapped layout so the
//! horizontal position carries across lines without a stored column.

use std::rc::Rc;

use super::text_field::set_hover_hint;
use super::{step_horizontal, EventResponse, Notification, Observed, Outcome, Selection, CURSOR_WIDTH};
use crate::error::Result;
use crate::event::{Event, Key, Modifiers, PointerId};
use crate::host::{CursorHint, Host, Services};
use crate::primitives::Rect;
use crate::store::{StateArena, StateId};
use crate::text::{
    caret_for_point, caret_rect, selection_rects, vertical_target, LayoutCache, TextLayout,
    TextMeasure, TextStyle, WrapMode,
};

/// Lines moved by PageUp/PageDown when no viewport height is known
const DEFAULT_PAGE_LINES: usize = 10;

/// State of one selectable text block.
#[derive(Clone, Debug)]
pub struct SelectableTextState {
    text: String,
    pub selection: Selection,
    pub focused: bool,
    pub hovered: bool,
    pub selecting: bool,
    pub active_pointer: Option<PointerId>,
    pub cursor_hint: CursorHint,
    revision: u64,
    layout: LayoutCache,
}

impl SelectableTextState {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: Selection::new(0),
            focused: false,
            hovered: false,
            selecting: false,
            active_pointer: None,
            cursor_hint: CursorHint::Arrow,
            revision: 0,
            layout: LayoutCache::new(),
        }
    }

    /// The text snapshot being displayed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Swap in a new snapshot; the selection is clamped to it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.text = text;
        self.revision += 1;
        self.selection.clamp(&self.text);
    }

    /// The moving selection edge
    pub fn caret(&self) -> usize {
        self.selection.end
    }

    pub fn selection_range(&self) -> (usize, usize) {
        self.selection.range()
    }

    pub fn selected_text(&self) -> &str {
        self.selection.selected(&self.text)
    }

    fn observe(&self) -> Observed {
        Observed {
            revision: self.revision,
            selection: self.selection,
            focused: self.focused,
            hovered: self.hovered,
            selecting: self.selecting,
            cursor_visible: false,
            scroll_x: 0.0,
        }
    }
}

impl Default for SelectableTextState {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectableTextConfig {
    pub style: TextStyle,
    pub padding_x: f32,
    pub wrap_mode: WrapMode,
    /// Wrap width; 0 disables wrapping
    pub max_width: f32,
    /// Lines per PageUp/PageDown; derived from `viewport_height` when unset
    pub page_lines: Option<usize>,
    pub viewport_height: Option<f32>,
}

impl Default for SelectableTextConfig {
    fn default() -> Self {
        Self {
            style: TextStyle::default(),
            padding_x: 0.0,
            wrap_mode: WrapMode::Word,
            max_width: 0.0,
            page_lines: None,
            viewport_height: None,
        }
    }
}

/// Geometry for drawing a selectable text block.
#[derive(Clone, Debug)]
pub struct SelectableView {
    pub layout: Rc<TextLayout>,
    pub selection_rects: Vec<Rect>,
    /// Caret at the moving selection edge, for hosts that draw one
    pub caret: Rect,
    pub caret_offset: usize,
}

/// Applies events to [`SelectableTextState`] records.
#[derive(Clone, Debug, Default)]
pub struct SelectableTextController {
    config: SelectableTextConfig,
}

impl SelectableTextController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SelectableTextConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectableTextConfig {
        &self.config
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.config.style = style;
        self
    }

    pub fn padding_x(mut self, padding: f32) -> Self {
        self.config.padding_x = padding;
        self
    }

    pub fn wrap(mut self, mode: WrapMode) -> Self {
        self.config.wrap_mode = mode;
        self
    }

    pub fn max_width(mut self, width: f32) -> Self {
        self.config.max_width = width;
        self
    }

    pub fn page_lines(mut self, lines: usize) -> Self {
        self.config.page_lines = Some(lines);
        self
    }

    pub fn viewport_height(mut self, height: f32) -> Self {
        self.config.viewport_height = Some(height);
        self
    }

    pub fn apply(
        &self,
        state: &mut SelectableTextState,
        event: &Event,
        services: &mut Services<'_>,
    ) -> Outcome {
        log::trace!("selectable text event: {:?}", event);
        state.selection.clamp(&state.text);
        let before = state.observe();
        let mut outcome = Outcome::ignored();

        let response = match event {
            Event::PointerDown { x, y, pointer } => {
                if !state.focused {
                    outcome.push(Notification::RequestFocus);
                }
                let caret = self.hit_test(state, services.metrics, *x, *y);
                state.selection = Selection::new(caret);
                state.selecting = true;
                state.active_pointer = Some(*pointer);
                EventResponse::Handled
            }
            Event::PointerMove { x, y, pointer } => {
                if state.selecting && state.active_pointer == Some(*pointer) {
                    let caret = self.hit_test(state, services.metrics, *x, *y);
                    state.selection = Selection::spanning(state.selection.anchor, caret);
                    EventResponse::Handled
                } else {
                    EventResponse::Ignored
                }
            }
            Event::PointerUp { pointer, .. } | Event::PointerCancel { pointer } => {
                if state.active_pointer == Some(*pointer) {
                    state.selecting = false;
                    state.active_pointer = None;
                    EventResponse::Handled
                } else {
                    EventResponse::Ignored
                }
            }
            Event::PointerEnter | Event::PointerLeave => {
                let hovered = matches!(event, Event::PointerEnter);
                state.hovered = hovered;
                set_hover_hint(&mut state.cursor_hint, services.host, hovered);
                EventResponse::Handled
            }
            Event::KeyDown { key, modifiers } if state.focused => {
                self.key_down(state, services, *key, *modifiers)
            }
            Event::FocusGained => {
                state.focused = true;
                EventResponse::Handled
            }
            Event::FocusLost => {
                state.focused = false;
                state.selection = Selection::new(state.caret());
                state.selecting = false;
                state.active_pointer = None;
                EventResponse::Handled
            }
            Event::KeyDown { .. } | Event::TextInput { .. } | Event::BlinkTick { .. } => {
                EventResponse::Ignored
            }
        };
        outcome.response = response;

        let after = state.observe();
        outcome.record_changes(&before, &after, || state.text.clone());
        outcome
    }

    pub fn apply_in(
        &self,
        arena: &mut StateArena<SelectableTextState>,
        id: StateId,
        event: &Event,
        services: &mut Services<'_>,
    ) -> Result<Outcome> {
        let state = arena.try_get_mut(id)?;
        Ok(self.apply(state, event, services))
    }

    pub fn view(&self, state: &mut SelectableTextState, metrics: &dyn TextMeasure) -> SelectableView {
        state.selection.clamp(&state.text);
        let layout = self.layout(state, metrics);
        let style = &self.config.style;
        let (lo, hi) = state.selection.range();
        let selection_rects = selection_rects(
            metrics,
            style,
            &state.text,
            &layout,
            lo,
            hi,
            self.config.padding_x,
        );
        let caret_offset = state.caret();
        let caret = caret_rect(&layout, metrics, style, &state.text, caret_offset, CURSOR_WIDTH)
            .offset(self.config.padding_x, 0.0);

        SelectableView {
            layout,
            selection_rects,
            caret,
            caret_offset,
        }
    }

    fn layout(&self, state: &mut SelectableTextState, metrics: &dyn TextMeasure) -> Rc<TextLayout> {
        state.layout.get(
            state.revision,
            metrics,
            &self.config.style,
            &state.text,
            self.config.max_width - self.config.padding_x * 2.0,
            self.config.wrap_mode,
        )
    }

    fn hit_test(&self, state: &mut SelectableTextState, metrics: &dyn TextMeasure, x: f32, y: f32) -> usize {
        let layout = self.layout(state, metrics);
        caret_for_point(
            &layout,
            metrics,
            &self.config.style,
            &state.text,
            self.config.padding_x,
            x,
            y,
        )
    }

    /// Lines moved by one PageUp/PageDown.
    fn page_step(&self, layout: &TextLayout) -> usize {
        if let Some(lines) = self.config.page_lines {
            return lines.max(1);
        }
        match self.config.viewport_height {
            Some(height) if height > 0.0 && layout.line_height > 0.0 => {
                ((height / layout.line_height).floor() as usize).max(1)
            }
            _ => DEFAULT_PAGE_LINES,
        }
    }

    fn key_down(
        &self,
        state: &mut SelectableTextState,
        services: &mut Services<'_>,
        key: Key,
        modifiers: Modifiers,
    ) -> EventResponse {
        let shift = modifiers.shift();
        let metrics = services.metrics;

        match key {
            Key::Left | Key::Right => {
                step_horizontal(&state.text, &mut state.selection, key == Key::Right, shift, modifiers.alt());
            }
            Key::Home | Key::End => {
                let target = if modifiers.command() {
                    if key == Key::Home {
                        0
                    } else {
                        state.text.len()
                    }
                } else {
                    let layout = self.layout(state, metrics);
                    let line = &layout.lines[layout.line_for_offset(state.caret())];
                    if key == Key::Home {
                        line.content_start
                    } else {
                        line.content_end
                    }
                };
                state.selection.move_caret(target, shift);
            }
            Key::Up | Key::Down | Key::PageUp | Key::PageDown => {
                let layout = self.layout(state, metrics);
                let lines = match key {
                    Key::PageUp | Key::PageDown => self.page_step(&layout) as isize,
                    _ => 1,
                };
                let delta = if matches!(key, Key::Up | Key::PageUp) {
                    -lines
                } else {
                    lines
                };
                let target = vertical_target(
                    &layout,
                    metrics,
                    &self.config.style,
                    &state.text,
                    state.caret(),
                    delta,
                );
                state.selection.move_caret(target, shift);
            }
            Key::Char(c) if modifiers.command() => match c.to_ascii_lowercase() {
                'a' => state.selection = Selection::spanning(0, state.text.len()),
                'c' => copy(state, services.host),
                _ => return EventResponse::Ignored,
            },
            _ => return EventResponse::Ignored,
        }
        EventResponse::Handled
    }
}

fn copy(state: &SelectableTextState, host: &mut dyn Host) {
    let selected = state.selected_text();
    if !selected.is_empty() {
        log::debug!("copying {} bytes to clipboard", selected.len());
        host.set_clipboard_text(selected);
    }
}
