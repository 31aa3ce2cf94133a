//! Text primitives shared by both controllers.
//!
//! - [`utf8`]: codepoint boundary navigation
//! - [`word`]: word boundary scanning
//! - [`metrics`]: measurement provider seam and caret position tables
//! - [`wrap`]: line wrapping and layouts
//! - [`geometry`]: hit testing and selection rectangles

mod cosmic;
pub mod geometry;
pub mod metrics;
pub mod utf8;
pub mod word;
pub mod wrap;

pub use cosmic::CosmicMeasure;
pub use geometry::{
    caret_for_point, caret_for_point_flat, caret_rect, caret_x, selection_rects, vertical_target,
};
pub use metrics::{caret_positions, MonospaceMeasure, TextMeasure, TextStyle};
pub use utf8::{
    boundaries, clamp_to_boundary, filter_single_line, is_boundary, next_boundary,
    normalize_newlines, prev_boundary,
};
pub use word::{is_space_byte, is_word_byte, next_word_boundary, prev_word_boundary};
pub use wrap::{wrap, LayoutCache, LineRange, TextLayout, WrapMode};
