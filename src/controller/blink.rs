//! Cursor blink timing driven by externally supplied timestamps.

use std::time::{Duration, Instant};

/// Cursor blink interval in milliseconds
pub const CURSOR_BLINK_MS: u64 = 530;

pub fn default_interval() -> Duration {
    Duration::from_millis(CURSOR_BLINK_MS)
}

/// Make the cursor visible and restart the blink cycle.
///
/// Events carry no timestamp, so the new deadline is armed by the next tick.
pub(crate) fn reset(visible: &mut bool, deadline: &mut Option<Instant>) {
    *visible = true;
    *deadline = None;
}

/// Advance the blink cycle to `now`. Returns whether visibility or the
/// deadline changed.
///
/// Unfocused fields hide the cursor. A drag in progress keeps it steady.
pub(crate) fn tick(
    focused: bool,
    selecting: bool,
    visible: &mut bool,
    deadline: &mut Option<Instant>,
    now: Instant,
    interval: Duration,
) -> bool {
    if !focused {
        let changed = *visible || deadline.is_some();
        *visible = false;
        *deadline = None;
        return changed;
    }

    if selecting {
        let changed = !*visible || deadline.is_some();
        reset(visible, deadline);
        return changed;
    }

    match *deadline {
        None => {
            let changed = !*visible;
            *visible = true;
            *deadline = Some(now + interval);
            changed
        }
        Some(due) if now >= due => {
            *visible = !*visible;
            *deadline = Some(now + interval);
            true
        }
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_tick_arms_deadline() {
        let now = Instant::now();
        let (mut visible, mut deadline) = (true, None);
        assert!(!tick(true, false, &mut visible, &mut deadline, now, ms(530)));
        assert!(visible);
        assert_eq!(deadline, Some(now + ms(530)));
    }

    #[test]
    fn test_toggles_once_deadline_passes() {
        let start = Instant::now();
        let (mut visible, mut deadline) = (true, Some(start + ms(530)));
        assert!(!tick(true, false, &mut visible, &mut deadline, start + ms(100), ms(530)));
        assert!(visible);

        assert!(tick(true, false, &mut visible, &mut deadline, start + ms(530), ms(530)));
        assert!(!visible);
        assert_eq!(deadline, Some(start + ms(1060)));

        assert!(tick(true, false, &mut visible, &mut deadline, start + ms(1100), ms(530)));
        assert!(visible);
    }

    #[test]
    fn test_unfocused_forces_hidden() {
        let now = Instant::now();
        let (mut visible, mut deadline) = (true, Some(now));
        assert!(tick(false, false, &mut visible, &mut deadline, now, ms(530)));
        assert!(!visible);
        assert_eq!(deadline, None);
        assert!(!tick(false, false, &mut visible, &mut deadline, now, ms(530)));
    }

    #[test]
    fn test_selecting_keeps_cursor_steady() {
        let now = Instant::now();
        let (mut visible, mut deadline) = (false, Some(now));
        assert!(tick(true, true, &mut visible, &mut deadline, now + ms(600), ms(530)));
        assert!(visible);
        assert!(!tick(true, true, &mut visible, &mut deadline, now + ms(5000), ms(530)));
    }
}
