use std::time::{Duration, Instant};

use textedit::prelude::*;
use textedit::{Error, RecordingHost};

const M: MonospaceMeasure = MonospaceMeasure { advance: 10.0 };

#[test]
fn test_field_state_survives_rebind() {
    let controller = TextFieldController::new().cursor_to_end_on_focus(true);
    let mut arena = StateArena::new();
    let mut host = RecordingHost::new();

    let id = arena.bind(None, || TextFieldState::new("draft"));
    {
        let mut services = Services::new(&M, &mut host);
        controller
            .apply_in(&mut arena, id, &Event::FocusGained, &mut services)
            .expect("live handle");
        controller
            .apply_in(&mut arena, id, &Event::text("!"), &mut services)
            .expect("live handle");
    }

    // A rebuilt widget re-binds the same handle and sees the edit.
    let rebound = arena.bind(Some(id), TextFieldState::default);
    assert_eq!(rebound, id);
    assert_eq!(arena.get(id).map(|s| s.text()), Some("draft!"));

    arena.remove(id);
    let mut services = Services::new(&M, &mut host);
    let err = controller
        .apply_in(&mut arena, id, &Event::FocusLost, &mut services)
        .unwrap_err();
    assert_eq!(err, Error::StaleHandle(id));
}

#[test]
fn test_edit_session_notifications() {
    let controller = TextFieldController::new();
    let mut state = TextFieldState::new("");
    let mut host = RecordingHost::new();
    let mut services = Services::new(&M, &mut host);

    let outcome = controller.apply(&mut state, &Event::FocusGained, &mut services);
    assert!(outcome.contains(&Notification::FocusChanged(true)));

    let outcome = controller.apply(&mut state, &Event::text("hello"), &mut services);
    assert_eq!(outcome.text_changed(), Some("hello"));
    assert!(outcome.needs_redraw());

    let select_all = Event::key_with(Key::Char('a'), Modifiers::CTRL);
    let outcome = controller.apply(&mut state, &select_all, &mut services);
    assert!(outcome.contains(&Notification::SelectionChanged { start: 0, end: 5 }));

    let before_len = state.len();
    let (lo, hi) = state.selection_range();
    controller.apply(&mut state, &Event::text("hi"), &mut services);
    assert_eq!(state.len(), before_len - (hi - lo) + 2);
    assert_eq!(state.cursor, 2);
    assert!(!state.selection.has_selection());

    let outcome = controller.apply(&mut state, &Event::key(Key::Enter), &mut services);
    assert!(outcome.contains(&Notification::Submit("hi".into())));
}

#[test]
fn test_blink_cycle_through_ticks() {
    let controller = TextFieldController::new().blink_interval(Duration::from_millis(100));
    let mut state = TextFieldState::new("x");
    let mut host = RecordingHost::new();
    let mut services = Services::new(&M, &mut host);
    controller.apply(&mut state, &Event::FocusGained, &mut services);

    let t0 = Instant::now();
    assert!(!controller.tick(&mut state, t0));
    assert!(!controller.tick(&mut state, t0 + Duration::from_millis(50)));
    assert!(controller.tick(&mut state, t0 + Duration::from_millis(100)));
    assert!(!state.cursor_visible);
    assert!(controller.tick(&mut state, t0 + Duration::from_millis(200)));
    assert!(state.cursor_visible);

    controller.apply(&mut state, &Event::FocusLost, &mut services);
    assert!(!controller.tick(&mut state, t0 + Duration::from_millis(300)));
    assert!(!state.cursor_visible);
}

#[test]
fn test_selectable_copy_after_drag() {
    let controller = SelectableTextController::new();
    let mut state = SelectableTextState::new("read only text");
    let mut host = RecordingHost::new();
    {
        let mut services = Services::new(&M, &mut host);
        let pointer = PointerId(1);
        controller.apply(&mut state, &Event::PointerDown { x: 50.0, y: 1.0, pointer }, &mut services);
        controller.apply(&mut state, &Event::FocusGained, &mut services);
        controller.apply(&mut state, &Event::PointerMove { x: 90.0, y: 1.0, pointer }, &mut services);
        controller.apply(&mut state, &Event::PointerUp { x: 90.0, y: 1.0, pointer }, &mut services);
        let copy = Event::key_with(Key::Char('c'), Modifiers::CTRL);
        controller.apply(&mut state, &copy, &mut services);
    }
    assert_eq!(host.clipboard.as_deref(), Some("only"));
    assert_eq!(state.text(), "read only text");
}

#[test]
fn test_paste_into_single_line_field_drops_newlines() {
    let controller = TextFieldController::new();
    let mut state = TextFieldState::new("");
    let mut host = RecordingHost::with_clipboard("a\r\nb");
    let mut services = Services::new(&M, &mut host);
    controller.apply(&mut state, &Event::FocusGained, &mut services);

    let paste = Event::key_with(Key::Char('v'), Modifiers::CTRL);
    let outcome = controller.apply(&mut state, &paste, &mut services);
    assert_eq!(outcome.text_changed(), Some("ab"));
    assert_eq!(state.text(), "ab");
    assert_eq!(state.cursor, 2);
}

#[test]
fn test_noop_host_makes_clipboard_silent() {
    let controller = TextFieldController::new();
    let mut state = TextFieldState::new("abc");
    let mut host = textedit::NoopHost;
    let mut services = Services::new(&M, &mut host);
    controller.apply(&mut state, &Event::FocusGained, &mut services);
    let paste = Event::key_with(Key::Char('v'), Modifiers::CTRL);
    let outcome = controller.apply(&mut state, &paste, &mut services);
    assert!(outcome.is_handled());
    assert_eq!(state.text(), "abc");
}
