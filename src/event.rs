use std::time::Instant;

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier state at the time of a key event
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        /// Super / Cmd / Windows key
        const LOGO  = 0b1000;
    }
}

impl Modifiers {
    pub fn shift(self) -> bool {
        self.contains(Modifiers::SHIFT)
    }

    pub fn alt(self) -> bool {
        self.contains(Modifiers::ALT)
    }

    /// The platform shortcut modifier: Ctrl, or Cmd on hosts that report it as logo.
    pub fn command(self) -> bool {
        self.intersects(Modifiers::CTRL | Modifiers::LOGO)
    }
}

/// Identifies one pointer (mouse, pen, or touch contact) across a drag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

/// Named keys the controllers react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Enter/Return key
    Enter,
    /// Escape key
    Escape,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Home key
    Home,
    /// End key
    End,
    PageUp,
    PageDown,
    /// Character key, used for shortcuts such as Ctrl+A.
    /// Text insertion arrives separately as [`Event::TextInput`].
    Char(char),
}

/// Input delivered to a controller. Coordinates are widget-local.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer pressed
    PointerDown { x: f32, y: f32, pointer: PointerId },
    /// Pointer moved (with or without a button held)
    PointerMove { x: f32, y: f32, pointer: PointerId },
    /// Pointer released
    PointerUp { x: f32, y: f32, pointer: PointerId },
    /// The host aborted the pointer sequence
    PointerCancel { pointer: PointerId },
    /// Pointer entered the widget
    PointerEnter,
    /// Pointer left the widget
    PointerLeave,
    /// Key pressed
    KeyDown {
        /// The key that was pressed
        key: Key,
        /// Current modifier state
        modifiers: Modifiers,
    },
    /// Committed text from the keyboard or an input method
    TextInput { text: String },
    /// Widget gained keyboard focus
    FocusGained,
    /// Widget lost keyboard focus
    FocusLost,
    /// Periodic tick carrying the current time, drives cursor blink
    BlinkTick { now: Instant },
}

impl Event {
    pub fn key(key: Key) -> Self {
        Event::KeyDown {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn key_with(key: Key, modifiers: Modifiers) -> Self {
        Event::KeyDown { key, modifiers }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Event::TextInput { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_modifier() {
        assert!(Modifiers::CTRL.command());
        assert!(Modifiers::LOGO.command());
        assert!(!(Modifiers::SHIFT | Modifiers::ALT).command());
        assert!((Modifiers::SHIFT | Modifiers::CTRL).shift());
    }
}
