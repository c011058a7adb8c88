use core::cell::Cell;
use std::vec::Vec;

use super::*;
use crate::input::FnSource;
use crate::types::{GestureKind, GestureMask, GestureState, SourceId};

type Pad<'a> = Keypad<'a, NoopRawMutex, 4>;

const TIMING: ScanTiming = ScanTiming::new()
    .with_filter_window(30)
    .with_double_click_interval(250);

fn queue(len: usize) -> EventQueue<NoopRawMutex, ButtonEvent> {
    EventQueue::new(len).expect("queue")
}

fn source(id: u32, level: &Cell<bool>) -> FnSource<impl FnMut() -> bool + '_> {
    FnSource::new(SourceId(id), move || level.get())
}

fn drain(keypad: &Pad<'_>) -> Vec<(GestureKind, u8)> {
    core::iter::from_fn(|| keypad.read_event())
        .map(|event| (event.kind, event.click_count))
        .collect()
}

/// Drives `level` and scans until the debounced level follows it.
fn settle(keypad: &mut Pad<'_>, handle: ButtonHandle, level: &Cell<bool>, active: bool, dt: u32) {
    level.set(active);
    for _ in 0..64 {
        keypad.scan(dt);
        let snap = keypad.snapshot(handle).expect("live button");
        if snap.debounced_level == active {
            return;
        }
    }
    panic!("level never settled");
}

/// Scans `ticks` more times at `dt`, recording when each event shows up,
/// relative to the current moment.
fn timed(keypad: &mut Pad<'_>, ticks: usize, dt: u32) -> Vec<(u32, GestureKind, u8)> {
    let mut out = Vec::new();
    for tick in 1..=ticks {
        keypad.scan(dt);
        while let Some(event) = keypad.read_event() {
            out.push((tick as u32 * dt, event.kind, event.click_count));
        }
    }
    out
}

#[test]
fn click_only_reports_once_on_press() {
    let events = queue(8);
    let level = Cell::new(false);
    let mut keypad = Pad::with_timing(&events, TIMING);
    let handle = keypad
        .register(source(1, &level), ButtonOptions::new(GestureMask::CLICK))
        .expect("register");

    settle(&mut keypad, handle, &level, true, 10);
    let event = keypad.peek_event().expect("click on press");
    assert_eq!(event.handle, handle);
    assert_eq!(drain(&keypad), [(GestureKind::Click, 1)]);

    timed(&mut keypad, 20, 10);
    settle(&mut keypad, handle, &level, false, 10);
    assert!(timed(&mut keypad, 40, 10).is_empty());
    assert_eq!(keypad.read_event(), None);
}

#[test]
fn two_quick_presses_make_one_double_click() {
    let events = queue(8);
    let level = Cell::new(false);
    let mut keypad = Pad::with_timing(&events, TIMING);
    let handle = keypad
        .register(
            source(1, &level),
            ButtonOptions::new(GestureMask::CLICK | GestureMask::DOUBLE_CLICK),
        )
        .expect("register");

    settle(&mut keypad, handle, &level, true, 10);
    timed(&mut keypad, 3, 10);
    settle(&mut keypad, handle, &level, false, 10);
    timed(&mut keypad, 5, 10);
    settle(&mut keypad, handle, &level, true, 10);
    assert_eq!(keypad.read_event(), None);

    timed(&mut keypad, 3, 10);
    settle(&mut keypad, handle, &level, false, 10);
    let out = timed(&mut keypad, 30, 10);
    assert_eq!(out, [(240, GestureKind::DoubleClick, 2)]);
}

#[test]
fn lone_press_followed_by_silence_is_a_click() {
    let events = queue(8);
    let level = Cell::new(false);
    let mut keypad = Pad::with_timing(&events, TIMING);
    let handle = keypad
        .register(
            source(1, &level),
            ButtonOptions::new(GestureMask::CLICK | GestureMask::DOUBLE_CLICK),
        )
        .expect("register");

    settle(&mut keypad, handle, &level, true, 10);
    timed(&mut keypad, 5, 10);
    settle(&mut keypad, handle, &level, false, 10);
    // the confirming tick already counted 10 toward the window
    let out = timed(&mut keypad, 30, 10);
    assert_eq!(out, [(240, GestureKind::Click, 1)]);
}

#[test]
fn long_press_with_repeat_only_repeats() {
    let events = queue(16);
    let level = Cell::new(false);
    let mut keypad = Pad::with_timing(&events, TIMING);
    let handle = keypad
        .register(
            source(1, &level),
            ButtonOptions::new(GestureMask::LONG_PRESS | GestureMask::REPEAT)
                .with_long_press_threshold(1000)
                .with_repeat_interval(100),
        )
        .expect("register");

    settle(&mut keypad, handle, &level, true, 100);
    let held = timed(&mut keypad, 14, 100);
    assert_eq!(
        held,
        [
            (1100, GestureKind::Repeat, 1),
            (1200, GestureKind::Repeat, 2),
            (1300, GestureKind::Repeat, 3),
            (1400, GestureKind::Repeat, 4),
        ]
    );
    assert_eq!(
        keypad.snapshot(handle).map(|s| s.gesture_state),
        Some(GestureState::ArmedLongOrRepeat)
    );

    settle(&mut keypad, handle, &level, false, 100);
    assert_eq!(drain(&keypad), [(GestureKind::Release, 5)]);
    assert_eq!(
        keypad.snapshot(handle).map(|s| s.gesture_state),
        Some(GestureState::Released)
    );
}

#[test]
fn repeat_only_fires_on_interval() {
    let events = queue(16);
    let level = Cell::new(false);
    let mut keypad = Pad::with_timing(&events, TIMING);
    let handle = keypad
        .register(
            source(1, &level),
            ButtonOptions::new(GestureMask::REPEAT).with_repeat_interval(200),
        )
        .expect("register");

    settle(&mut keypad, handle, &level, true, 50);
    let held = timed(&mut keypad, 13, 50);
    assert_eq!(
        held,
        [
            (200, GestureKind::Repeat, 1),
            (400, GestureKind::Repeat, 2),
            (600, GestureKind::Repeat, 3),
        ]
    );
}

#[test]
fn long_only_reports_long_press_then_release() {
    let events = queue(8);
    let level = Cell::new(false);
    let mut keypad = Pad::with_timing(&events, TIMING);
    let handle = keypad
        .register(
            source(1, &level),
            ButtonOptions::new(GestureMask::LONG_PRESS).with_long_press_threshold(500),
        )
        .expect("register");

    settle(&mut keypad, handle, &level, true, 20);
    let held = timed(&mut keypad, 40, 20);
    assert_eq!(held, [(500, GestureKind::LongPress, 1)]);
    settle(&mut keypad, handle, &level, false, 20);
    assert_eq!(drain(&keypad), [(GestureKind::Release, 1)]);
}

#[test]
fn duplicate_source_keeps_the_first_registration_working() {
    let events = queue(8);
    let level = Cell::new(false);
    let other = Cell::new(false);
    let mut keypad = Pad::with_timing(&events, TIMING);
    let first = keypad
        .register(source(1, &level), ButtonOptions::new(GestureMask::CLICK))
        .expect("first");
    assert_eq!(
        keypad
            .register(source(1, &other), ButtonOptions::new(GestureMask::CLICK))
            .err(),
        Some(RegistryError::Duplicate(SourceId(1)))
    );
    assert_eq!(keypad.buttons().count(), 1);

    settle(&mut keypad, first, &level, true, 10);
    let event = keypad.read_event().expect("click");
    assert_eq!(event.handle, first);
    assert_eq!(event.kind, GestureKind::Click);
}

#[test]
fn events_carry_the_handle_of_their_button() {
    let events = queue(8);
    let a_level = Cell::new(false);
    let b_level = Cell::new(false);
    let mut keypad = Pad::with_timing(&events, TIMING);
    let a = keypad
        .register(source(1, &a_level), ButtonOptions::new(GestureMask::CLICK))
        .expect("a");
    let b = keypad
        .register(source(2, &b_level), ButtonOptions::new(GestureMask::CLICK))
        .expect("b");

    settle(&mut keypad, b, &b_level, true, 10);
    settle(&mut keypad, a, &a_level, true, 10);
    let first = keypad.read_event().expect("b click");
    let second = keypad.read_event().expect("a click");
    assert_eq!(first.handle, b);
    assert_eq!(second.handle, a);
}

#[test]
fn full_queue_drops_events_and_counts_them() {
    let events = queue(3);
    let level = Cell::new(false);
    let mut keypad = Pad::with_timing(&events, TIMING);
    let handle = keypad
        .register(
            source(1, &level),
            ButtonOptions::new(GestureMask::REPEAT).with_repeat_interval(10),
        )
        .expect("register");

    settle(&mut keypad, handle, &level, true, 10);
    let before = keypad.stats().ticks;
    for _ in 0..5 {
        keypad.scan(10);
    }
    let stats = keypad.stats();
    assert_eq!(stats.ticks, before + 5);
    assert_eq!(stats.emitted, 2);
    assert_eq!(stats.dropped, 3);
    assert_eq!(
        drain(&keypad),
        [(GestureKind::Repeat, 1), (GestureKind::Repeat, 2)]
    );

    // scanning carried on while the queue was full
    keypad.scan(10);
    assert_eq!(drain(&keypad), [(GestureKind::Repeat, 6)]);
}

#[test]
fn unregistered_button_goes_quiet_and_its_handle_goes_stale() {
    let events = queue(8);
    let level = Cell::new(true);
    let mut keypad = Pad::with_timing(&events, TIMING);
    let handle = keypad
        .register(source(1, &level), ButtonOptions::new(GestureMask::CLICK))
        .expect("register");

    keypad.unregister(handle).expect("unregister");
    assert_eq!(
        keypad.unregister(handle),
        Err(RegistryError::UnknownHandle(handle))
    );
    assert_eq!(keypad.snapshot(handle), None);

    for _ in 0..20 {
        keypad.scan(10);
    }
    assert_eq!(keypad.read_event(), None);
    assert_eq!(keypad.stats().emitted, 0);

    let again = keypad
        .register(source(1, &level), ButtonOptions::new(GestureMask::CLICK))
        .expect("register again");
    assert_ne!(again, handle);
}

#[test]
fn empty_keypad_scans_and_logs() {
    let events = queue(2);
    let mut keypad: Keypad<'_> = Keypad::new(&events);
    keypad.scan(10);
    keypad.log_buttons();
    assert_eq!(keypad.stats().ticks, 1);
    assert_eq!(keypad.timing(), ScanTiming::default());
    assert!(keypad.registry().is_empty());
    assert_eq!(keypad.buttons().count(), 0);
}

#[test]
fn keypads_are_independent() {
    let left_events = queue(4);
    let right_events = queue(4);
    let level = Cell::new(false);
    let mut left = Pad::with_timing(&left_events, TIMING);
    let mut right = Pad::with_timing(&right_events, TIMING);
    let handle = left
        .register(source(1, &level), ButtonOptions::new(GestureMask::CLICK))
        .expect("left");
    // the same source id is fine in another keypad
    right
        .register(source(1, &level), ButtonOptions::new(GestureMask::REPEAT))
        .expect("right");

    settle(&mut left, handle, &level, true, 10);
    assert_eq!(drain(&left), [(GestureKind::Click, 1)]);
    assert!(right.queue().is_empty());
}

#[test]
fn full_slot_table_is_reported_as_an_error() {
    let events = queue(4);
    let level = Cell::new(false);
    let mut keypad: Keypad<'_, NoopRawMutex, 2> = Keypad::with_timing(&events, TIMING);
    keypad
        .register(source(1, &level), ButtonOptions::default())
        .expect("1");
    keypad
        .register(source(2, &level), ButtonOptions::default())
        .expect("2");
    assert_eq!(
        keypad
            .register(source(3, &level), ButtonOptions::default())
            .err(),
        Some(RegistryError::Full)
    );
    assert_eq!(keypad.buttons().count(), 2);
}
