//! Selection geometry: point-to-caret hit testing and highlight rectangles.

use super::metrics::{self, caret_positions, TextMeasure, TextStyle};
use super::utf8::next_boundary;
use super::wrap::{LineRange, TextLayout};
use crate::primitives::Rect;

/// Snap `x` to the nearest boundary in a caret position table.
///
/// Ties go to the earlier boundary. `x` outside `[0, total]` is clamped.
fn nearest_boundary(text: &str, positions: &[f32], x: f32) -> usize {
    let len = text.len();
    let total = positions.get(len).copied().unwrap_or(0.0);
    let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, total) };

    let mut prev = 0;
    while prev < len {
        let next = next_boundary(text, prev);
        if positions[next] >= x {
            let before = x - positions[prev];
            let after = positions[next] - x;
            return if before <= after { prev } else { next };
        }
        prev = next;
    }
    len
}

/// Caret offset nearest to `local_x` on a single unwrapped line.
///
/// Points left of `padding_x` give 0 and points past the end of the text give
/// `text.len()`.
pub fn caret_for_point_flat(
    metrics: &dyn TextMeasure,
    style: &TextStyle,
    text: &str,
    padding_x: f32,
    local_x: f32,
) -> usize {
    if text.is_empty() {
        return 0;
    }
    let positions = caret_positions(metrics, style, text);
    nearest_boundary(text, &positions, local_x - padding_x)
}

/// Caret offset nearest to a point inside a wrapped layout.
///
/// The line is picked from `local_y` (clamped to existing lines) and the
/// flat search runs over that line's drawn content.
pub fn caret_for_point(
    layout: &TextLayout,
    metrics: &dyn TextMeasure,
    style: &TextStyle,
    text: &str,
    padding_x: f32,
    local_x: f32,
    local_y: f32,
) -> usize {
    let Some(line) = layout.lines.get(layout.line_at_y(local_y)) else {
        return 0;
    };
    let content = line.content(text);
    line.content_start + caret_for_point_flat(metrics, style, content, padding_x, local_x)
}

/// Furthest offset a caret can be drawn at on `line`.
///
/// At a soft wrap this is the end of the content. At a hard break or the end
/// of the text, whitespace typed after the last word still moves the caret.
fn caret_limit(text: &str, line: &LineRange) -> usize {
    let soft_break = line.end < text.len() && !text[..line.end].ends_with('\n');
    if soft_break {
        return line.content_end;
    }
    let tail = &text[line.content_end..line.end];
    let tail = match tail.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => tail,
    };
    line.content_end + tail.len()
}

/// Horizontal advance of the caret at `offset` from the start of its line's
/// content.
pub fn caret_x(
    layout: &TextLayout,
    metrics: &dyn TextMeasure,
    style: &TextStyle,
    text: &str,
    offset: usize,
) -> f32 {
    let Some(line) = layout.lines.get(layout.line_for_offset(offset)) else {
        return 0.0;
    };
    let offset = offset.clamp(line.content_start, caret_limit(text, line));
    metrics::width(metrics, style, &text[line.content_start..offset])
}

/// Rectangle of a caret `width` wide at `offset`, excluding padding.
pub fn caret_rect(
    layout: &TextLayout,
    metrics: &dyn TextMeasure,
    style: &TextStyle,
    text: &str,
    offset: usize,
    width: f32,
) -> Rect {
    let line = layout.line_for_offset(offset);
    let x = caret_x(layout, metrics, style, text, offset);
    Rect::new(
        x,
        line as f32 * layout.line_height,
        width,
        layout.line_height,
    )
}

/// Highlight rectangles for the selection between `sel_start` and `sel_end`.
///
/// The endpoints may come in either order. At most one rectangle per line is
/// produced, in line order, and lines whose overlap has no width are skipped.
pub fn selection_rects(
    metrics: &dyn TextMeasure,
    style: &TextStyle,
    text: &str,
    layout: &TextLayout,
    sel_start: usize,
    sel_end: usize,
    padding_x: f32,
) -> Vec<Rect> {
    let (lo, hi) = (sel_start.min(sel_end), sel_start.max(sel_end));
    let mut rects = Vec::new();
    if lo == hi {
        return rects;
    }

    for (index, line) in layout.lines.iter().enumerate() {
        if line.end <= lo {
            continue;
        }
        if line.start >= hi {
            break;
        }
        let from = lo.clamp(line.content_start, line.content_end);
        let to = hi.clamp(line.content_start, line.content_end);
        if from >= to {
            continue;
        }
        let left = metrics::width(metrics, style, &text[line.content_start..from]);
        let right = metrics::width(metrics, style, &text[line.content_start..to]);
        if right > left {
            rects.push(Rect::new(
                padding_x + left,
                index as f32 * layout.line_height,
                right - left,
                layout.line_height,
            ));
        }
    }
    rects
}

/// Caret offset reached by moving `delta` lines from `caret`, keeping its
/// horizontal advance.
///
/// Moving up from the first line goes to offset 0 and moving down from the
/// last line goes to the end of the text.
pub fn vertical_target(
    layout: &TextLayout,
    metrics: &dyn TextMeasure,
    style: &TextStyle,
    text: &str,
    caret: usize,
    delta: isize,
) -> usize {
    let line = layout.line_for_offset(caret);
    let last = layout.line_count().saturating_sub(1);
    if delta < 0 && line == 0 {
        return 0;
    }
    if delta > 0 && line >= last {
        return text.len();
    }

    let target = if delta < 0 {
        line.saturating_sub(delta.unsigned_abs())
    } else {
        (line + delta.unsigned_abs()).min(last)
    };
    let x = caret_x(layout, metrics, style, text, caret);
    let y = (target as f32 + 0.5) * layout.line_height;
    caret_for_point(layout, metrics, style, text, 0.0, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::metrics::MonospaceMeasure;
    use crate::text::wrap::WrapMode;
    use crate::text::utf8::boundaries;

    const M: MonospaceMeasure = MonospaceMeasure { advance: 10.0 };

    fn style() -> TextStyle {
        TextStyle::new(10.0).with_line_height(20.0)
    }

    #[test]
    fn test_flat_hit_test_edges() {
        let text = "hello";
        assert_eq!(caret_for_point_flat(&M, &style(), text, 8.0, 3.0), 0);
        assert_eq!(caret_for_point_flat(&M, &style(), text, 8.0, 500.0), 5);
        assert_eq!(caret_for_point_flat(&M, &style(), "", 8.0, 500.0), 0);
    }

    #[test]
    fn test_flat_hit_test_nearest_and_ties() {
        let text = "abc";
        assert_eq!(caret_for_point_flat(&M, &style(), text, 0.0, 14.0), 1);
        assert_eq!(caret_for_point_flat(&M, &style(), text, 0.0, 16.0), 2);
        assert_eq!(caret_for_point_flat(&M, &style(), text, 0.0, 15.0), 1);
    }

    #[test]
    fn test_flat_hit_test_multibyte() {
        let text = "a€b";
        assert_eq!(caret_for_point_flat(&M, &style(), text, 0.0, 12.0), 1);
        assert_eq!(caret_for_point_flat(&M, &style(), text, 0.0, 18.0), 4);
    }

    #[test]
    fn test_flat_hit_test_monotonic() {
        let text = "héllo wörld";
        let valid = boundaries(text);
        let mut last = 0;
        let mut x = -20.0;
        while x < 150.0 {
            let caret = caret_for_point_flat(&M, &style(), text, 5.0, x);
            assert!(caret >= last);
            assert!(valid.contains(&caret));
            last = caret;
            x += 1.5;
        }
    }

    #[test]
    fn test_layout_hit_test() {
        let text = "Hello\nWorld";
        let layout = TextLayout::build(&M, &style(), text, 0.0, WrapMode::None);
        assert_eq!(caret_for_point(&layout, &M, &style(), text, 0.0, 21.0, 5.0), 2);
        assert_eq!(caret_for_point(&layout, &M, &style(), text, 0.0, 21.0, 25.0), 8);
        // Past the end of the first line stays before the newline.
        assert_eq!(caret_for_point(&layout, &M, &style(), text, 0.0, 900.0, 5.0), 5);
        assert_eq!(caret_for_point(&layout, &M, &style(), text, 0.0, 900.0, 900.0), 11);
        assert_eq!(caret_for_point(&layout, &M, &style(), text, 0.0, -4.0, -900.0), 0);
    }

    #[test]
    fn test_selection_rects_across_lines() {
        let text = "Hello\nWorld";
        let layout = TextLayout::build(&M, &style(), text, 0.0, WrapMode::None);
        let rects = selection_rects(&M, &style(), text, &layout, 2, 8, 4.0);
        assert_eq!(
            rects,
            vec![
                Rect::new(24.0, 0.0, 30.0, 20.0),
                Rect::new(4.0, 20.0, 20.0, 20.0),
            ]
        );
    }

    #[test]
    fn test_selection_rects_reversed_and_empty() {
        let text = "Hello\nWorld";
        let layout = TextLayout::build(&M, &style(), text, 0.0, WrapMode::None);
        assert_eq!(
            selection_rects(&M, &style(), text, &layout, 8, 2, 0.0).len(),
            2
        );
        assert!(selection_rects(&M, &style(), text, &layout, 3, 3, 0.0).is_empty());
        // Only the newline selected: nothing drawable.
        assert!(selection_rects(&M, &style(), text, &layout, 5, 6, 0.0).is_empty());
    }

    #[test]
    fn test_selection_rects_one_per_line() {
        let text = "aaa bb cc dddd";
        let layout = TextLayout::build(&M, &style(), text, 60.0, WrapMode::Word);
        let rects = selection_rects(&M, &style(), text, &layout, 0, text.len(), 0.0);
        assert_eq!(rects.len(), 3);
        for (i, rect) in rects.iter().enumerate() {
            assert_eq!(rect.y, i as f32 * 20.0);
            assert!(rect.width > 0.0);
        }
    }

    #[test]
    fn test_caret_rect() {
        let text = "Hello\nWorld";
        let layout = TextLayout::build(&M, &style(), text, 0.0, WrapMode::None);
        let rect = caret_rect(&layout, &M, &style(), text, 8, 1.5);
        assert_eq!(rect, Rect::new(20.0, 20.0, 1.5, 20.0));
    }

    #[test]
    fn test_leading_whitespace_outside_geometry() {
        let text = "  ab cd";
        let layout = TextLayout::build(&M, &style(), text, 50.0, WrapMode::Word);
        assert_eq!(caret_for_point(&layout, &M, &style(), text, 0.0, -5.0, 5.0), 2);
        assert_eq!(caret_x(&layout, &M, &style(), text, 0), 0.0);
        assert_eq!(caret_x(&layout, &M, &style(), text, 4), 20.0);
        let rects = selection_rects(&M, &style(), text, &layout, 0, 4, 0.0);
        assert_eq!(rects, vec![Rect::new(0.0, 0.0, 20.0, 20.0)]);
    }

    #[test]
    fn test_caret_follows_trailing_space_at_hard_end() {
        let text = "ab \ncd  ef";
        let layout = TextLayout::build(&M, &style(), text, 40.0, WrapMode::Word);
        // Space before the newline still advances the caret.
        assert_eq!(caret_x(&layout, &M, &style(), text, 3), 30.0);
        // Inside the gap of a soft wrap the caret stays at the content end.
        assert_eq!(layout.lines[1].content_end, 6);
        assert_eq!(caret_x(&layout, &M, &style(), text, 7), 20.0);
    }

    #[test]
    fn test_vertical_target_keeps_column() {
        let text = "abcdef\nxy\nlmnopq";
        let layout = TextLayout::build(&M, &style(), text, 0.0, WrapMode::None);
        // From column 4 on line 0 down to the short line clamps to its end.
        assert_eq!(vertical_target(&layout, &M, &style(), text, 4, 1), 9);
        assert_eq!(vertical_target(&layout, &M, &style(), text, 14, -2), 4);
        assert_eq!(vertical_target(&layout, &M, &style(), text, 14, -10), 4);
        assert_eq!(vertical_target(&layout, &M, &style(), text, 3, -1), 0);
        assert_eq!(vertical_target(&layout, &M, &style(), text, 12, 1), text.len());
    }
}
