use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use fruit_ninja::input::*;

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn repeat(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Repeat)
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
}

// ── Key mapping ───────────────────────────────────────────────────────────────

#[test]
fn arrows_and_wasd_map_to_directions() {
    assert_eq!(Key::from_code(KeyCode::Left), Some(Key::Left));
    assert_eq!(Key::from_code(KeyCode::Char('a')), Some(Key::Left));
    assert_eq!(Key::from_code(KeyCode::Right), Some(Key::Right));
    assert_eq!(Key::from_code(KeyCode::Char('D')), Some(Key::Right));
    assert_eq!(Key::from_code(KeyCode::Up), Some(Key::Up));
    assert_eq!(Key::from_code(KeyCode::Char('w')), Some(Key::Up));
    assert_eq!(Key::from_code(KeyCode::Down), Some(Key::Down));
    assert_eq!(Key::from_code(KeyCode::Char('s')), Some(Key::Down));
}

#[test]
fn quit_confirm_and_digits_map() {
    assert_eq!(Key::from_code(KeyCode::Char('q')), Some(Key::Quit));
    assert_eq!(Key::from_code(KeyCode::Char('Q')), Some(Key::Quit));
    assert_eq!(Key::from_code(KeyCode::Esc), Some(Key::Escape));
    assert_eq!(Key::from_code(KeyCode::Enter), Some(Key::Enter));
    assert_eq!(Key::from_code(KeyCode::Char('2')), Some(Key::Digit(2)));
    assert_eq!(Key::from_code(KeyCode::Char('z')), None);
}

// ── KeyboardState ─────────────────────────────────────────────────────────────

#[test]
fn pressed_key_is_held_within_window() {
    let t0 = Instant::now();
    let mut keys = KeyboardState::new(false);
    keys.record(&press(KeyCode::Left), t0);
    keys.sync(t0 + Duration::from_millis(100));
    assert!(keys.is_pressed(Key::Left));
    assert!(!keys.is_pressed(Key::Right));
}

#[test]
fn key_expires_after_hold_window() {
    let t0 = Instant::now();
    let mut keys = KeyboardState::new(false);
    keys.record(&press(KeyCode::Left), t0);
    keys.sync(t0 + HOLD_WINDOW + Duration::from_millis(1));
    assert!(!keys.is_pressed(Key::Left));
}

#[test]
fn repeat_events_keep_key_held() {
    let t0 = Instant::now();
    let mut keys = KeyboardState::new(false);
    keys.record(&press(KeyCode::Up), t0);
    let later = t0 + Duration::from_millis(120);
    keys.record(
        &KeyEvent::new_with_kind(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Repeat),
        later,
    );
    keys.sync(later + Duration::from_millis(120));
    assert!(keys.is_pressed(Key::Up));
}

#[test]
fn release_clears_key_immediately() {
    let t0 = Instant::now();
    let mut keys = KeyboardState::new(true);
    keys.record(&press(KeyCode::Enter), t0);
    keys.record(&release(KeyCode::Enter), t0);
    keys.sync(t0);
    assert!(!keys.is_pressed(Key::Enter));
}

/// A single held key as a keyboard reports it: press at 0 ms, the OS repeat
/// starting at 400 ms every 32 ms, and (when `with_release`) a release at
/// 800 ms. Offsets are in milliseconds.
fn held_key_timeline(code: KeyCode, with_release: bool) -> Vec<(u64, KeyEvent)> {
    let mut events = vec![(0, press(code))];
    events.extend((400..800).step_by(32).map(|ms| (ms, repeat(code))));
    if with_release {
        events.push((800, release(code)));
    }
    events
}

/// Feed `events` into `keys` and sample `key` every 16 ms up to `until_ms`.
fn sample_every_16ms(
    keys: &mut KeyboardState,
    events: &[(u64, KeyEvent)],
    key: Key,
    until_ms: u64,
) -> Vec<(u64, bool)> {
    let t0 = Instant::now();
    let mut pending = events.iter().peekable();
    let mut samples = Vec::new();
    for ms in (0..=until_ms).step_by(16) {
        while let Some((at, event)) = pending.next_if(|(at, _)| *at <= ms) {
            keys.record(event, t0 + Duration::from_millis(*at));
        }
        keys.sync(t0 + Duration::from_millis(ms));
        samples.push((ms, keys.is_pressed(key)));
    }
    samples
}

#[test]
fn release_mode_holds_across_first_repeat_delay() {
    let mut keys = KeyboardState::new(true);
    assert!(keys.reports_releases());
    let events = held_key_timeline(KeyCode::Down, true);
    for (ms, held) in sample_every_16ms(&mut keys, &events, Key::Down, 1000) {
        assert_eq!(held, ms < 800, "wrong key state at {ms} ms");
    }
}

#[test]
fn release_mode_never_expires_a_held_key() {
    let t0 = Instant::now();
    let mut keys = KeyboardState::new(true);
    keys.record(&press(KeyCode::Left), t0);
    keys.sync(t0 + Duration::from_secs(5));
    assert!(keys.is_pressed(Key::Left));
}

#[test]
fn classic_mode_holds_across_first_repeat_delay() {
    let mut keys = KeyboardState::new(false);
    assert!(!keys.reports_releases());
    let events = held_key_timeline(KeyCode::Down, false);
    let samples = sample_every_16ms(&mut keys, &events, Key::Down, 2000);
    let last_repeat = 784;
    for (ms, held) in samples {
        if ms <= last_repeat {
            assert!(held, "key dropped at {ms} ms");
        }
        if ms > last_repeat + HOLD_WINDOW.as_millis() as u64 {
            assert!(!held, "key still held at {ms} ms");
        }
    }
}

#[test]
fn ctrl_c_marks_interrupt() {
    let mut keys = KeyboardState::new(false);
    assert!(!keys.interrupted());
    keys.record(
        &KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        Instant::now(),
    );
    assert!(keys.interrupted());
}

// ── EdgeTrigger ───────────────────────────────────────────────────────────────

#[test]
fn edge_fires_once_per_press() {
    let mut edge = EdgeTrigger::default();
    assert!(!edge.poll(false));
    assert!(edge.poll(true));
    assert!(!edge.poll(true));
    assert!(!edge.poll(true));
    assert!(!edge.poll(false));
    assert!(edge.poll(true));
}

#[test]
fn primed_edge_waits_for_release() {
    let mut edge = EdgeTrigger::primed(true);
    assert!(!edge.poll(true));
    assert!(!edge.poll(false));
    assert!(edge.poll(true));
}

// ── TickInput ─────────────────────────────────────────────────────────────────

#[test]
fn tick_input_samples_held_keys() {
    let t0 = Instant::now();
    let mut keys = KeyboardState::new(false);
    keys.record(&press(KeyCode::Esc), t0);
    keys.record(&press(KeyCode::Right), t0);
    keys.record(&press(KeyCode::Down), t0);
    keys.sync(t0);

    let input = TickInput::sample(&keys);
    assert_eq!(
        input,
        TickInput {
            quit: true,
            left: false,
            right: true,
            up: false,
            down: true,
        }
    );
}
