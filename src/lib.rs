//! Text editing and selection engine.
//!
//! Turns UTF-8 text plus pointer and keyboard events into caret positions,
//! selection ranges, wrapped line layouts and highlight geometry. Two
//! controllers share the same primitives: [`TextFieldController`] edits text,
//! [`SelectableTextController`] only selects and copies it.
//!
//! The engine does no rendering and owns no windowing resources. Text
//! measurement comes from a [`TextMeasure`] provider and clipboard access from a
//! [`Host`]; both are passed in per call through [`Services`].

pub mod controller;
pub mod error;
pub mod event;
pub mod host;
pub mod primitives;
pub mod store;
pub mod text;

pub use controller::{
    EventResponse, FieldView, Notification, Outcome, SelectableTextConfig,
    SelectableTextController, SelectableTextState, SelectableView, Selection, TextFieldConfig,
    TextFieldController, TextFieldState,
};
pub use error::{Error, Result};
pub use event::{Event, Key, Modifiers, PointerId};
pub use host::{CursorHint, Host, NoopHost, RecordingHost, Services};
pub use primitives::Rect;
pub use store::{StateArena, StateId};
pub use text::{CosmicMeasure, MonospaceMeasure, TextMeasure, TextStyle, WrapMode};

pub mod prelude {
    pub use crate::controller::{
        EventResponse, Notification, Outcome, SelectableTextController, SelectableTextState,
        Selection, TextFieldController, TextFieldState,
    };
    pub use crate::event::{Event, Key, Modifiers, PointerId};
    pub use crate::host::{CursorHint, Host, Services};
    pub use crate::store::{StateArena, StateId};
    pub use crate::text::{MonospaceMeasure, TextLayout, TextMeasure, TextStyle, WrapMode};
}
