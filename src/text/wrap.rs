//! Line wrapping: splits text into contiguous byte ranges, one per visual line.
//!
//! Every byte of the text belongs to exactly one line. The bytes that separate
//! two lines (a hard `\n`, optionally preceded by `\r`, or the whitespace gap at
//! a soft wrap) stay at the tail of the earlier line, past its `content_end`.
//! When wrapping, whitespace is never part of a line's content except as the
//! gap between two words: whitespace before the first word of a segment sits in
//! `start..content_start`, and a whitespace-only segment has empty content.
//! Width, hit-testing and highlights only ever look at
//! `content_start..content_end`.

use std::rc::Rc;

use super::metrics::{self, TextMeasure, TextStyle};
use super::utf8::next_boundary;
use super::word::is_space_byte;

/// Policy for breaking lines that exceed the available width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// Break only at explicit newlines.
    #[default]
    None,
    /// Break between words; a word wider than the line overflows on its own.
    Word,
    /// Break between any two codepoints.
    Character,
}

/// One visual line: the half-open byte range `start..end` plus its width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
    /// Start of the drawn content. `start..content_start` holds skipped
    /// leading whitespace.
    pub content_start: usize,
    /// End of the drawn content. `content_end..end` holds the line break or
    /// the whitespace gap before the next soft-wrapped line.
    pub content_end: usize,
    /// Measured width of `content_start..content_end`.
    pub width: f32,
}

impl LineRange {
    pub fn new(start: usize, end: usize, width: f32) -> Self {
        Self {
            start,
            end,
            content_start: start,
            content_end: end,
            width,
        }
    }

    /// The drawn part of this line.
    pub fn content<'a>(&self, text: &'a str) -> &'a str {
        &text[self.content_start..self.content_end]
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `text` into lines under `mode`.
///
/// A non-positive or non-finite `max_width` disables wrapping. The result is
/// never empty; empty text yields a single `[0, 0)` line.
pub fn wrap(
    metrics: &dyn TextMeasure,
    style: &TextStyle,
    text: &str,
    max_width: f32,
    mode: WrapMode,
) -> Vec<LineRange> {
    let bytes = text.as_bytes();
    let wrapping = mode != WrapMode::None && max_width.is_finite() && max_width > 0.0;
    let mut lines = Vec::new();

    let mut seg_start = 0;
    loop {
        let newline = bytes[seg_start..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|p| seg_start + p);
        let (seg_end, hard_end) = match newline {
            Some(n) if n > seg_start && bytes[n - 1] == b'\r' => (n - 1, n + 1),
            Some(n) => (n, n + 1),
            None => (text.len(), text.len()),
        };

        if wrapping {
            wrap_segment(
                &mut lines,
                metrics,
                style,
                text,
                (seg_start, seg_end, hard_end),
                max_width,
                mode,
            );
        } else {
            lines.push(LineRange {
                start: seg_start,
                end: hard_end,
                content_start: seg_start,
                content_end: seg_end,
                width: metrics::width(metrics, style, &text[seg_start..seg_end]),
            });
        }

        match newline {
            Some(n) => seg_start = n + 1,
            None => break,
        }
    }

    lines
}

/// Greedy fill of one newline-free segment.
///
/// A unit joins the current line while the line measured from its first unit
/// through the candidate (gap included) fits in `max_width`. The first unit of
/// a line is always accepted, so an oversized word overflows on its own line.
fn wrap_segment(
    lines: &mut Vec<LineRange>,
    metrics: &dyn TextMeasure,
    style: &TextStyle,
    text: &str,
    (seg_start, seg_end, hard_end): (usize, usize, usize),
    max_width: f32,
    mode: WrapMode,
) {
    let bytes = text.as_bytes();
    let measure = |from: usize, to: usize| metrics::width(metrics, style, &text[from..to]);

    let mut line_start = seg_start;
    // First unit of the current line, once one has been seen.
    let mut first_unit: Option<usize> = None;
    let mut content_end = seg_start;
    let mut pos = seg_start;

    while pos < seg_end {
        if is_space_byte(bytes[pos]) {
            pos += 1;
            continue;
        }

        let unit_start = pos;
        let unit_end = match mode {
            WrapMode::Character => next_boundary(bytes, pos),
            _ => {
                let mut end = pos;
                while end < seg_end && !is_space_byte(bytes[end]) {
                    end = next_boundary(bytes, end);
                }
                end
            }
        };
        pos = unit_end;

        let Some(content_start) = first_unit else {
            first_unit = Some(unit_start);
            content_end = unit_end;
            continue;
        };
        if measure(content_start, unit_end) <= max_width {
            content_end = unit_end;
            continue;
        }

        lines.push(LineRange {
            start: line_start,
            end: unit_start,
            content_start,
            content_end,
            width: measure(content_start, content_end),
        });
        line_start = unit_start;
        first_unit = Some(unit_start);
        content_end = unit_end;
    }

    let content_start = first_unit.unwrap_or(seg_start);
    lines.push(LineRange {
        start: line_start,
        end: hard_end,
        content_start,
        content_end,
        width: measure(content_start, content_end),
    });
}

/// A wrapped text block, rebuilt whenever its inputs change.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<LineRange>,
    pub line_height: f32,
}

impl TextLayout {
    pub fn build(
        metrics: &dyn TextMeasure,
        style: &TextStyle,
        text: &str,
        max_width: f32,
        mode: WrapMode,
    ) -> Self {
        let lines = wrap(metrics, style, text, max_width, mode);
        let line_height = metrics::line_height(metrics, style);
        log::debug!(
            "built layout: {} bytes, {} lines, mode {:?}, max width {}",
            text.len(),
            lines.len(),
            mode,
            max_width
        );
        Self { lines, line_height }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line containing the caret at `offset`.
    ///
    /// An offset equal to a line's start belongs to that line, so a caret at
    /// a soft wrap sits at the beginning of the following line.
    pub fn line_for_offset(&self, offset: usize) -> usize {
        self.lines
            .partition_point(|line| line.start <= offset)
            .saturating_sub(1)
    }

    /// Line index under a y coordinate, clamped to existing lines.
    pub fn line_at_y(&self, y: f32) -> usize {
        let last = self.lines.len().saturating_sub(1);
        if y.is_nan() || y <= 0.0 || self.line_height <= 0.0 {
            return 0;
        }
        ((y / self.line_height).floor() as usize).min(last)
    }

    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    /// Width of the widest line.
    pub fn width(&self) -> f32 {
        self.lines.iter().fold(0.0, |w, line| w.max(line.width))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct LayoutKey {
    revision: u64,
    max_width: f32,
    mode: WrapMode,
    style: TextStyle,
}

/// Holds the most recent layout of a text and rebuilds it on any input change.
///
/// `revision` is bumped by the owner of the text on every edit; the cache
/// never inspects the text itself.
#[derive(Clone, Debug, Default)]
pub struct LayoutCache {
    key: Option<LayoutKey>,
    layout: Option<Rc<TextLayout>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        revision: u64,
        metrics: &dyn TextMeasure,
        style: &TextStyle,
        text: &str,
        max_width: f32,
        mode: WrapMode,
    ) -> Rc<TextLayout> {
        let key = LayoutKey {
            revision,
            max_width,
            mode,
            style: *style,
        };
        if self.key == Some(key) {
            if let Some(layout) = &self.layout {
                return Rc::clone(layout);
            }
        }

        let layout = Rc::new(TextLayout::build(metrics, style, text, max_width, mode));
        self.key = Some(key);
        self.layout = Some(Rc::clone(&layout));
        layout
    }
}
