//! Editable text field controller.
//!
//! The controller handles:
//! - Text insertion, deletion and clipboard edits
//! - Caret movement and shift-extended selection from the keyboard
//! - Drag selection tracked per pointer id
//! - Cursor blinking from externally supplied ticks
//! - Password masking, placeholder text and horizontal scrolling
//!
//! Single-line by default. With `multiline` enabled, Enter inserts a newline,
//! Up/Down move between lines and the text wraps under the configured mode.

use std::borrow::Cow;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::blink;
use super::{step_horizontal, EventResponse, Notification, Observed, Outcome, Selection, CURSOR_WIDTH};
use crate::error::Result;
use crate::event::{Event, Key, Modifiers, PointerId};
use crate::host::{CursorHint, Host, Services};
use crate::primitives::Rect;
use crate::store::{StateArena, StateId};
use crate::text::utf8::{byte_offset_of_char, char_count_to};
use crate::text::{
    caret_for_point, caret_rect, caret_x, clamp_to_boundary, filter_single_line, next_boundary,
    normalize_newlines, prev_boundary, prev_word_boundary, selection_rects, vertical_target,
    LayoutCache, TextLayout, TextMeasure, TextStyle, WrapMode,
};

/// Margin kept between the caret and the visible edge when scrolling
const SCROLL_MARGIN: f32 = 4.0;

/// State of one text field. Owned by the caller or a [`StateArena`].
#[derive(Clone, Debug)]
pub struct TextFieldState {
    buffer: String,
    /// Insertion point; always equal to `selection.end`
    pub cursor: usize,
    pub selection: Selection,
    pub focused: bool,
    pub hovered: bool,
    /// A pointer drag is in progress
    pub selecting: bool,
    pub active_pointer: Option<PointerId>,
    pub cursor_visible: bool,
    pub next_blink_deadline: Option<Instant>,
    /// Last cursor hint sent to the host
    pub cursor_hint: CursorHint,
    /// Horizontal scroll of single-line content, in pixels
    pub scroll_x: f32,
    revision: u64,
    layout: LayoutCache,
}

impl TextFieldState {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            buffer: text.into(),
            cursor: 0,
            selection: Selection::new(0),
            focused: false,
            hovered: false,
            selecting: false,
            active_pointer: None,
            cursor_visible: false,
            next_blink_deadline: None,
            cursor_hint: CursorHint::Arrow,
            scroll_x: 0.0,
            revision: 0,
            layout: LayoutCache::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Bumped on every change to the text
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the whole text from outside the controller.
    ///
    /// Offsets are re-clamped; the caret keeps its position where possible.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.buffer {
            return;
        }
        self.buffer = text;
        self.revision += 1;
        self.clamp();
    }

    /// Normalized selection range
    pub fn selection_range(&self) -> (usize, usize) {
        self.selection.range()
    }

    pub fn selected_text(&self) -> &str {
        self.selection.selected(&self.buffer)
    }

    /// Snap every stored offset into the buffer and onto codepoint boundaries.
    fn clamp(&mut self) {
        self.cursor = clamp_to_boundary(&self.buffer, self.cursor);
        self.selection.clamp(&self.buffer);
        if self.selection.end != self.cursor {
            self.selection = Selection::new(self.cursor);
        }
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.cursor = selection.end;
    }

    /// Replace `start..end` with `insert` and put a collapsed caret after it.
    fn splice(&mut self, start: usize, end: usize, insert: &str) {
        if start == end && insert.is_empty() {
            return;
        }
        self.buffer.replace_range(start..end, insert);
        self.revision += 1;
        self.set_selection(Selection::new(start + insert.len()));
    }

    fn reset_blink(&mut self) {
        blink::reset(&mut self.cursor_visible, &mut self.next_blink_deadline);
    }

    fn observe(&self) -> Observed {
        Observed {
            revision: self.revision,
            selection: self.selection,
            focused: self.focused,
            hovered: self.hovered,
            selecting: self.selecting,
            cursor_visible: self.cursor_visible,
            scroll_x: self.scroll_x,
        }
    }
}

impl Default for TextFieldState {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Behavior and appearance settings for a text field.
#[derive(Clone, Debug, PartialEq)]
pub struct TextFieldConfig {
    pub style: TextStyle,
    pub read_only: bool,
    pub multiline: bool,
    /// Enable Ctrl/Cmd + A, C, X, V
    pub clipboard_shortcuts: bool,
    pub cursor_to_end_on_focus: bool,
    pub placeholder: Option<String>,
    /// Draw every character as this one (password fields)
    pub mask: Option<char>,
    pub padding_x: f32,
    /// Wrap policy for multiline fields; single-line fields scroll instead
    pub wrap_mode: WrapMode,
    /// Outer width of the field; 0 means unbounded
    pub max_width: f32,
    pub blink_interval: Duration,
}

impl Default for TextFieldConfig {
    fn default() -> Self {
        Self {
            style: TextStyle::default(),
            read_only: false,
            multiline: false,
            clipboard_shortcuts: true,
            cursor_to_end_on_focus: false,
            placeholder: None,
            mask: None,
            padding_x: 0.0,
            wrap_mode: WrapMode::None,
            max_width: 0.0,
            blink_interval: blink::default_interval(),
        }
    }
}

/// Everything the renderer needs to draw a field.
#[derive(Clone, Debug)]
pub struct FieldView {
    pub layout: Rc<TextLayout>,
    /// Text to draw: the buffer, or its mask
    pub text: String,
    /// Set when the buffer is empty and a placeholder is configured
    pub placeholder: Option<String>,
    pub cursor: Rect,
    pub cursor_visible: bool,
    pub selection_rects: Vec<Rect>,
    pub scroll_x: f32,
}

/// Applies events to [`TextFieldState`] records.
#[derive(Clone, Debug, Default)]
pub struct TextFieldController {
    config: TextFieldConfig,
}

impl TextFieldController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TextFieldConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TextFieldConfig {
        &self.config
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.config.style = style;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.config.read_only = read_only;
        self
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.config.multiline = multiline;
        self
    }

    pub fn clipboard_shortcuts(mut self, enabled: bool) -> Self {
        self.config.clipboard_shortcuts = enabled;
        self
    }

    pub fn cursor_to_end_on_focus(mut self, enabled: bool) -> Self {
        self.config.cursor_to_end_on_focus = enabled;
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.config.placeholder = Some(text.into());
        self
    }

    /// Enable password mode with the default mask character
    pub fn password(mut self, enabled: bool) -> Self {
        self.config.mask = enabled.then_some('•');
        self
    }

    pub fn mask_char(mut self, c: char) -> Self {
        self.config.mask = Some(c);
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

    pub fn blink_interval(mut self, interval: Duration) -> Self {
        self.config.blink_interval = interval;
        self
    }

    /// Apply one event to `state`.
    pub fn apply(
        &self,
        state: &mut TextFieldState,
        event: &Event,
        services: &mut Services<'_>,
    ) -> Outcome {
        log::trace!("text field event: {:?}", event);
        state.clamp();
        let before = state.observe();
        let mut outcome = Outcome::ignored();

        let response = match event {
            Event::PointerDown { x, y, pointer } => {
                self.pointer_down(state, services.metrics, *x, *y, *pointer, &mut outcome)
            }
            Event::PointerMove { x, y, pointer } => {
                self.pointer_move(state, services.metrics, *x, *y, *pointer)
            }
            Event::PointerUp { pointer, .. } | Event::PointerCancel { pointer } => {
                end_drag(state, *pointer)
            }
            Event::PointerEnter => set_hover(state, services.host, true),
            Event::PointerLeave => set_hover(state, services.host, false),
            Event::KeyDown { key, modifiers } => {
                self.key_down(state, services, *key, *modifiers, &mut outcome)
            }
            Event::TextInput { text } => self.text_input(state, text),
            Event::FocusGained => self.focus_gained(state),
            Event::FocusLost => focus_lost(state),
            Event::BlinkTick { now } => {
                if self.tick(state, *now) {
                    EventResponse::Handled
                } else {
                    EventResponse::Ignored
                }
            }
        };
        outcome.response = response;

        self.update_scroll(state, services.metrics);
        let after = state.observe();
        outcome.record_changes(&before, &after, || state.buffer.clone());
        outcome
    }

    /// Apply an event to the record behind `id`.
    pub fn apply_in(
        &self,
        arena: &mut StateArena<TextFieldState>,
        id: StateId,
        event: &Event,
        services: &mut Services<'_>,
    ) -> Result<Outcome> {
        let state = arena.try_get_mut(id)?;
        Ok(self.apply(state, event, services))
    }

    /// Advance the cursor blink to `now`. Returns whether anything changed.
    pub fn tick(&self, state: &mut TextFieldState, now: Instant) -> bool {
        blink::tick(
            state.focused,
            state.selecting,
            &mut state.cursor_visible,
            &mut state.next_blink_deadline,
            now,
            self.config.blink_interval,
        )
    }

    pub fn tick_in(
        &self,
        arena: &mut StateArena<TextFieldState>,
        id: StateId,
        now: Instant,
    ) -> Result<bool> {
        let state = arena.try_get_mut(id)?;
        Ok(self.tick(state, now))
    }

    /// Geometry and text for drawing `state`.
    pub fn view(&self, state: &mut TextFieldState, metrics: &dyn TextMeasure) -> FieldView {
        state.clamp();
        let layout = self.layout(state, metrics);
        let display = self.display_text(&state.buffer);
        let style = &self.config.style;
        let dx = self.config.padding_x - state.scroll_x;

        let caret = self.to_display(&state.buffer, state.cursor);
        let cursor = caret_rect(&layout, metrics, style, &display, caret, CURSOR_WIDTH).offset(dx, 0.0);

        let selection_rects = if state.focused && state.selection.has_selection() {
            let (lo, hi) = state.selection.range();
            selection_rects(
                metrics,
                style,
                &display,
                &layout,
                self.to_display(&state.buffer, lo),
                self.to_display(&state.buffer, hi),
                0.0,
            )
            .into_iter()
            .map(|r| r.offset(dx, 0.0))
            .collect()
        } else {
            Vec::new()
        };

        let placeholder = if state.buffer.is_empty() {
            self.config.placeholder.clone()
        } else {
            None
        };

        FieldView {
            layout,
            text: display.into_owned(),
            placeholder,
            cursor,
            cursor_visible: state.focused && state.cursor_visible,
            selection_rects,
            scroll_x: state.scroll_x,
        }
    }

    fn display_text<'a>(&self, buffer: &'a str) -> Cow<'a, str> {
        match self.config.mask {
            Some(mask) => Cow::Owned(mask.to_string().repeat(buffer.chars().count())),
            None => Cow::Borrowed(buffer),
        }
    }

    /// Map a buffer offset to the matching offset in the drawn text.
    fn to_display(&self, buffer: &str, offset: usize) -> usize {
        match self.config.mask {
            Some(mask) => char_count_to(buffer, offset) * mask.len_utf8(),
            None => offset,
        }
    }

    fn to_buffer(&self, buffer: &str, display_offset: usize) -> usize {
        match self.config.mask {
            Some(mask) => byte_offset_of_char(buffer, display_offset / mask.len_utf8()),
            None => display_offset,
        }
    }

    /// Inner width available to the text, 0 when unbounded.
    fn content_width(&self) -> f32 {
        (self.config.max_width - self.config.padding_x * 2.0).max(0.0)
    }

    fn layout(&self, state: &mut TextFieldState, metrics: &dyn TextMeasure) -> Rc<TextLayout> {
        let display = self.display_text(&state.buffer);
        let (width, mode) = if self.config.multiline {
            (self.content_width(), self.config.wrap_mode)
        } else {
            (0.0, WrapMode::None)
        };
        state
            .layout
            .get(state.revision, metrics, &self.config.style, &display, width, mode)
    }

    /// Caret offset in the buffer under a widget-local point.
    fn hit_test(&self, state: &mut TextFieldState, metrics: &dyn TextMeasure, x: f32, y: f32) -> usize {
        let layout = self.layout(state, metrics);
        let display = self.display_text(&state.buffer);
        let caret = caret_for_point(
            &layout,
            metrics,
            &self.config.style,
            &display,
            self.config.padding_x,
            x + state.scroll_x,
            y,
        );
        self.to_buffer(&state.buffer, caret)
    }

    fn pointer_down(
        &self,
        state: &mut TextFieldState,
        metrics: &dyn TextMeasure,
        x: f32,
        y: f32,
        pointer: PointerId,
        outcome: &mut Outcome,
    ) -> EventResponse {
        if !state.focused {
            outcome.push(Notification::RequestFocus);
        }
        let caret = self.hit_test(state, metrics, x, y);
        state.set_selection(Selection::new(caret));
        state.selecting = true;
        state.active_pointer = Some(pointer);
        state.reset_blink();
        EventResponse::Handled
    }

    fn pointer_move(
        &self,
        state: &mut TextFieldState,
        metrics: &dyn TextMeasure,
        x: f32,
        y: f32,
        pointer: PointerId,
    ) -> EventResponse {
        if !state.selecting || state.active_pointer != Some(pointer) {
            return EventResponse::Ignored;
        }
        let caret = self.hit_test(state, metrics, x, y);
        state.set_selection(Selection::spanning(state.selection.anchor, caret));
        state.reset_blink();
        EventResponse::Handled
    }

    fn key_down(
        &self,
        state: &mut TextFieldState,
        services: &mut Services<'_>,
        key: Key,
        modifiers: Modifiers,
        outcome: &mut Outcome,
    ) -> EventResponse {
        if !state.focused {
            return EventResponse::Ignored;
        }
        let shift = modifiers.shift();

        match key {
            Key::Left | Key::Right => {
                let forward = key == Key::Right;
                let mut selection = state.selection;
                if self.config.mask.is_some() && modifiers.alt() {
                    // Masked text has no visible words; jump to the edge.
                    let edge = if forward { state.buffer.len() } else { 0 };
                    selection.move_caret(edge, shift);
                } else {
                    step_horizontal(&state.buffer, &mut selection, forward, shift, modifiers.alt());
                }
                state.set_selection(selection);
                state.reset_blink();
                EventResponse::Handled
            }
            Key::Home | Key::End => {
                let target = if key == Key::Home { 0 } else { state.buffer.len() };
                let mut selection = state.selection;
                selection.move_caret(target, shift);
                state.set_selection(selection);
                state.reset_blink();
                EventResponse::Handled
            }
            Key::Up | Key::Down if self.config.multiline => {
                let delta = if key == Key::Up { -1 } else { 1 };
                let target = self.vertical_caret(state, services.metrics, delta);
                let mut selection = state.selection;
                selection.move_caret(target, shift);
                state.set_selection(selection);
                state.reset_blink();
                EventResponse::Handled
            }
            Key::Backspace | Key::Delete => {
                if !self.config.read_only {
                    let word = if !modifiers.alt() {
                        WordDelete::Off
                    } else if self.config.mask.is_some() {
                        // Masked text has no visible words; delete to the edge.
                        WordDelete::ToEdge
                    } else {
                        WordDelete::Word
                    };
                    delete(state, key == Key::Delete, word);
                    state.reset_blink();
                }
                EventResponse::Handled
            }
            Key::Enter => {
                if !self.config.multiline {
                    log::debug!("text field submitted ({} bytes)", state.buffer.len());
                    outcome.push(Notification::Submit(state.buffer.clone()));
                } else if !self.config.read_only {
                    insert(state, "\n");
                }
                EventResponse::Handled
            }
            Key::Escape => {
                log::debug!("text field requested blur");
                outcome.push(Notification::RequestBlur);
                EventResponse::Handled
            }
            Key::Char(c) if modifiers.command() && self.config.clipboard_shortcuts => {
                self.shortcut(state, services.host, c)
            }
            _ => EventResponse::Ignored,
        }
    }

    fn vertical_caret(&self, state: &mut TextFieldState, metrics: &dyn TextMeasure, delta: isize) -> usize {
        let layout = self.layout(state, metrics);
        let display = self.display_text(&state.buffer);
        let caret = self.to_display(&state.buffer, state.cursor);
        let target = vertical_target(&layout, metrics, &self.config.style, &display, caret, delta);
        self.to_buffer(&state.buffer, target)
    }

    fn shortcut(&self, state: &mut TextFieldState, host: &mut dyn Host, c: char) -> EventResponse {
        match c.to_ascii_lowercase() {
            'a' => {
                state.set_selection(Selection::spanning(0, state.buffer.len()));
                state.reset_blink();
            }
            'c' => {
                if self.config.mask.is_none() {
                    copy(state, host);
                }
            }
            'x' => {
                if self.config.mask.is_none() && !self.config.read_only && state.selection.has_selection() {
                    copy(state, host);
                    let (lo, hi) = state.selection.range();
                    state.splice(lo, hi, "");
                    state.reset_blink();
                }
            }
            'v' => {
                if !self.config.read_only {
                    if let Some(pasted) = host.clipboard_text() {
                        log::debug!("pasting {} bytes", pasted.len());
                        let pasted = self.filter_newlines(&pasted).into_owned();
                        insert(state, &pasted);
                        state.reset_blink();
                    }
                }
            }
            _ => return EventResponse::Ignored,
        }
        EventResponse::Handled
    }

    fn filter_newlines<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.config.multiline {
            normalize_newlines(text)
        } else {
            filter_single_line(text)
        }
    }

    fn text_input(&self, state: &mut TextFieldState, text: &str) -> EventResponse {
        if !state.focused {
            return EventResponse::Ignored;
        }
        if self.config.read_only {
            return EventResponse::Handled;
        }
        let text = self.filter_newlines(text);
        if !text.is_empty() {
            insert(state, &text);
            state.reset_blink();
        }
        EventResponse::Handled
    }

    fn focus_gained(&self, state: &mut TextFieldState) -> EventResponse {
        state.focused = true;
        let caret = if self.config.cursor_to_end_on_focus {
            state.buffer.len()
        } else {
            state.cursor
        };
        state.set_selection(Selection::new(caret));
        state.reset_blink();
        EventResponse::Handled
    }

    /// Keep the caret inside the visible width of a single-line field.
    fn update_scroll(&self, state: &mut TextFieldState, metrics: &dyn TextMeasure) {
        let available = self.content_width();
        if self.config.multiline || available <= 0.0 {
            state.scroll_x = 0.0;
            return;
        }

        let layout = self.layout(state, metrics);
        let display = self.display_text(&state.buffer);
        let text_w = layout.width();
        if text_w <= available {
            state.scroll_x = 0.0;
            return;
        }

        let caret = self.to_display(&state.buffer, state.cursor);
        let caret_px = caret_x(&layout, metrics, &self.config.style, &display, caret).clamp(0.0, text_w);
        let max_scroll = text_w - available;
        let mut scroll_x = state.scroll_x.clamp(0.0, max_scroll);

        let left_limit = SCROLL_MARGIN.min(available);
        let right_limit = (available - SCROLL_MARGIN).max(left_limit);
        let caret_in_view = caret_px - scroll_x;
        if caret_in_view < left_limit {
            scroll_x = (caret_px - left_limit).max(0.0);
        } else if caret_in_view > right_limit {
            scroll_x = (caret_px - right_limit).min(max_scroll);
        }
        state.scroll_x = scroll_x;
    }
}

/// Insert at the caret, replacing any selection.
fn insert(state: &mut TextFieldState, text: &str) {
    let (lo, hi) = state.selection.range();
    state.splice(lo, hi, text);
}

/// How far a backward delete reaches when the word modifier is held.
#[derive(Clone, Copy, PartialEq, Eq)]
enum WordDelete {
    Off,
    Word,
    ToEdge,
}

/// Delete the selection, or one codepoint (or more, per `word`) around the caret.
fn delete(state: &mut TextFieldState, forward: bool, word: WordDelete) {
    if state.selection.has_selection() {
        let (lo, hi) = state.selection.range();
        state.splice(lo, hi, "");
        return;
    }

    let caret = state.cursor;
    if forward {
        let end = next_boundary(&state.buffer, caret);
        state.splice(caret, end, "");
    } else {
        let start = match word {
            WordDelete::Off => prev_boundary(&state.buffer, caret),
            WordDelete::Word => prev_word_boundary(&state.buffer, caret),
            WordDelete::ToEdge => 0,
        };
        state.splice(start, caret, "");
    }
}

fn copy(state: &TextFieldState, host: &mut dyn Host) {
    let selected = state.selected_text();
    if !selected.is_empty() {
        log::debug!("copying {} bytes to clipboard", selected.len());
        host.set_clipboard_text(selected);
    }
}

fn end_drag(state: &mut TextFieldState, pointer: PointerId) -> EventResponse {
    if state.active_pointer != Some(pointer) {
        return EventResponse::Ignored;
    }
    state.selecting = false;
    state.active_pointer = None;
    EventResponse::Handled
}

fn focus_lost(state: &mut TextFieldState) -> EventResponse {
    state.focused = false;
    state.set_selection(Selection::new(state.cursor));
    state.cursor_visible = false;
    state.next_blink_deadline = None;
    state.selecting = false;
    state.active_pointer = None;
    EventResponse::Handled
}

pub(crate) fn set_hover_hint(current: &mut CursorHint, host: &mut dyn Host, hovered: bool) {
    let hint = if hovered {
        CursorHint::IBeam
    } else {
        CursorHint::Arrow
    };
    if *current != hint {
        *current = hint;
        host.set_cursor_hint(hint);
    }
}

fn set_hover(state: &mut TextFieldState, host: &mut dyn Host, hovered: bool) -> EventResponse {
    state.hovered = hovered;
    set_hover_hint(&mut state.cursor_hint, host, hovered);
    EventResponse::Handled
}
