//! Metrics provider backed by cosmic-text shaping.

use std::cell::RefCell;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};

use super::metrics::{TextMeasure, TextStyle};

/// Measures strings by shaping them with a system font set.
///
/// The font system is discovered once on construction, which can take a
/// while on machines with many fonts installed.
pub struct CosmicMeasure {
    font_system: RefCell<FontSystem>,
}

impl CosmicMeasure {
    pub fn new() -> Self {
        Self::with_font_system(FontSystem::new())
    }

    pub fn with_font_system(font_system: FontSystem) -> Self {
        Self {
            font_system: RefCell::new(font_system),
        }
    }

    fn shape_width(&self, style: &TextStyle, text: &str) -> f32 {
        let mut font_system = self.font_system.borrow_mut();
        let metrics = Metrics::new(style.font_size, style.requested_line_height());
        let mut buffer = Buffer::new(&mut font_system, metrics);

        // Unbounded width: wrapping decisions belong to the line wrapper.
        buffer.set_size(&mut font_system, None, None);
        buffer.set_text(
            &mut font_system,
            text,
            &Attrs::new().family(Family::SansSerif),
            Shaping::Advanced,
            None,
        );
        buffer.shape_until_scroll(&mut font_system, true);

        let mut width = 0.0f32;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
        }
        width
    }
}

impl Default for CosmicMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for CosmicMeasure {
    fn measure_width(&self, style: &TextStyle, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        self.shape_width(style, text)
    }

    fn line_height(&self, style: &TextStyle) -> f32 {
        style.requested_line_height()
    }
}
