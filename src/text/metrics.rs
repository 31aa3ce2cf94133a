//! Text measurement queries and the caret position table.

/// Style snapshot handed to the metrics provider.
///
/// Providers must answer identically for identical `(style, text)` pairs
/// within one layout build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    /// Explicit line height; derived from the font size when `None`.
    pub line_height: Option<f32>,
}

impl TextStyle {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            line_height: None,
        }
    }

    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = Some(line_height);
        self
    }

    /// Line height requested by this style, before any provider fallback.
    pub fn requested_line_height(&self) -> f32 {
        self.line_height.unwrap_or(self.font_size * 1.2)
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(14.0)
    }
}

/// Typography provider consulted for every width decision.
pub trait TextMeasure {
    /// Advance width of `text` laid out on a single line.
    fn measure_width(&self, style: &TextStyle, text: &str) -> f32;

    /// Height of one line of text in this style.
    fn line_height(&self, style: &TextStyle) -> f32;
}

impl<M: TextMeasure + ?Sized> TextMeasure for &M {
    fn measure_width(&self, style: &TextStyle, text: &str) -> f32 {
        (**self).measure_width(style, text)
    }

    fn line_height(&self, style: &TextStyle) -> f32 {
        (**self).line_height(style)
    }
}

/// Width of `text`; 0 for empty text or a nonsensical provider answer.
pub fn width(metrics: &dyn TextMeasure, style: &TextStyle, text: &str) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let w = metrics.measure_width(style, text);
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}

/// Line height with fallbacks: provider, then `font_size * 1.2`, then 1.0.
pub fn line_height(metrics: &dyn TextMeasure, style: &TextStyle) -> f32 {
    let h = metrics.line_height(style);
    if h.is_finite() && h > 0.0 {
        return h;
    }
    let derived = style.font_size * 1.2;
    if derived.is_finite() && derived > 0.0 {
        derived
    } else {
        1.0
    }
}

/// Prefix width at every byte offset of `text`, `len + 1` entries.
///
/// Entry 0 is 0 and entry `len` is the full width. Offsets inside a
/// multi-byte codepoint repeat the value of the boundary before them.
pub fn caret_positions(metrics: &dyn TextMeasure, style: &TextStyle, text: &str) -> Vec<f32> {
    let mut positions = vec![0.0; text.len() + 1];
    let mut last = 0.0;
    for (i, slot) in positions.iter_mut().enumerate().skip(1) {
        if text.is_char_boundary(i) {
            last = width(metrics, style, &text[..i]);
        }
        *slot = last;
    }
    positions
}

/// Fixed-advance provider: every codepoint is `advance` wide.
///
/// Deterministic, which makes it the provider of choice for tests and for
/// hosts rendering with a monospace font.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasure {
    pub advance: f32,
}

impl MonospaceMeasure {
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure_width(&self, _style: &TextStyle, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance
    }

    fn line_height(&self, style: &TextStyle) -> f32 {
        style.requested_line_height()
    }
}
