//! Host capabilities: clipboard access and pointer cursor hints.
//!
//! Controllers never talk to a windowing system directly. They call through
//! [`Host`], whose default methods do nothing, so a host without a clipboard
//! simply doesn't override them and clipboard shortcuts become silent no-ops.

use crate::text::TextMeasure;

/// Pointer cursor appearance requested by a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    /// The default arrow cursor.
    #[default]
    Arrow,
    /// Text selection cursor.
    IBeam,
}

/// Capabilities provided by the windowing layer.
pub trait Host {
    fn set_clipboard_text(&mut self, _text: &str) {}

    /// Current clipboard contents, `None` when empty or unsupported.
    fn clipboard_text(&mut self) -> Option<String> {
        None
    }

    fn set_cursor_hint(&mut self, _hint: CursorHint) {}
}

/// Host with no clipboard and no cursor control.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl Host for NoopHost {}

/// In-memory host that keeps the clipboard locally and records cursor hints.
///
/// Useful for tests and for hosts that only need an application-local clipboard.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub clipboard: Option<String>,
    pub cursor_hints: Vec<CursorHint>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clipboard(text: impl Into<String>) -> Self {
        Self {
            clipboard: Some(text.into()),
            ..Self::default()
        }
    }

    /// Most recent cursor hint, if any was set.
    pub fn cursor_hint(&self) -> Option<CursorHint> {
        self.cursor_hints.last().copied()
    }
}

impl Host for RecordingHost {
    fn set_clipboard_text(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }

    fn clipboard_text(&mut self) -> Option<String> {
        self.clipboard.clone()
    }

    fn set_cursor_hint(&mut self, hint: CursorHint) {
        self.cursor_hints.push(hint);
    }
}

/// External collaborators handed to a controller for the duration of one call.
pub struct Services<'a> {
    pub metrics: &'a dyn TextMeasure,
    pub host: &'a mut dyn Host,
}

impl<'a> Services<'a> {
    pub fn new(metrics: &'a dyn TextMeasure, host: &'a mut dyn Host) -> Self {
        Self { metrics, host }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_host_has_no_clipboard() {
        let mut host = NoopHost;
        host.set_clipboard_text("ignored");
        assert_eq!(host.clipboard_text(), None);
    }

    #[test]
    fn test_recording_host_round_trip() {
        let mut host = RecordingHost::new();
        host.set_clipboard_text("copied");
        host.set_cursor_hint(CursorHint::IBeam);
        assert_eq!(host.clipboard_text().as_deref(), Some("copied"));
        assert_eq!(host.cursor_hint(), Some(CursorHint::IBeam));
    }
}
