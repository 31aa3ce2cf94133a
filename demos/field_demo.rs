//! Drives a text field and a selectable block with scripted input and prints
//! what a renderer would draw.
//!
//! Run with `RUST_LOG=trace` to see every event, and pass `--cosmic` to
//! measure with system fonts instead of a fixed advance.

use std::time::{Duration, Instant};

use textedit::prelude::*;
use textedit::{CosmicMeasure, RecordingHost};

fn main() {
    env_logger::init();

    let metrics: Box<dyn TextMeasure> = if std::env::args().any(|a| a == "--cosmic") {
        Box::new(CosmicMeasure::new())
    } else {
        Box::new(MonospaceMeasure::new(8.0))
    };
    let mut host = RecordingHost::new();
    let mut fields = StateArena::new();

    let field = TextFieldController::new()
        .placeholder("Type here")
        .padding_x(6.0)
        .max_width(120.0);
    let id = fields.bind(None, TextFieldState::default);

    let script = [
        Event::PointerEnter,
        Event::PointerDown {
            x: 10.0,
            y: 4.0,
            pointer: PointerId(1),
        },
        Event::PointerUp {
            x: 10.0,
            y: 4.0,
            pointer: PointerId(1),
        },
        Event::FocusGained,
        Event::text("hello wide world"),
        Event::key_with(Key::Left, Modifiers::ALT | Modifiers::SHIFT),
        Event::key_with(Key::Char('x'), Modifiers::CTRL),
        Event::key(Key::Home),
        Event::key_with(Key::Char('v'), Modifiers::CTRL),
        Event::key(Key::Enter),
    ];

    for event in &script {
        let mut services = Services::new(metrics.as_ref(), &mut host);
        match field.apply_in(&mut fields, id, event, &mut services) {
            Ok(outcome) => println!("{:?} -> {:?}", event, outcome.notifications),
            Err(err) => eprintln!("{}", err),
        }
    }

    let start = Instant::now();
    for frame in 0..4u64 {
        let now = start + Duration::from_millis(frame * 300);
        if let Ok(true) = field.tick_in(&mut fields, id, now) {
            println!("frame {}: blink", frame);
        }
    }

    if let Some(state) = fields.get_mut(id) {
        let view = field.view(state, metrics.as_ref());
        println!(
            "field: {:?} cursor {:?} visible {} scroll {}",
            view.text, view.cursor, view.cursor_visible, view.scroll_x
        );
    }

    let block = SelectableTextController::new().max_width(100.0);
    let mut text = SelectableTextState::new("Selectable text wraps across several lines here");
    let mut services = Services::new(metrics.as_ref(), &mut host);
    block.apply(&mut text, &Event::FocusGained, &mut services);
    block.apply(&mut text, &Event::key_with(Key::Down, Modifiers::SHIFT), &mut services);
    block.apply(&mut text, &Event::key_with(Key::Char('c'), Modifiers::CTRL), &mut services);

    let view = block.view(&mut text, metrics.as_ref());
    for rect in &view.selection_rects {
        println!("highlight {:?}", rect);
    }
    println!("clipboard: {:?}", host.clipboard);
}
