//! End-to-end behavior through the public API: host commands, pointer
//! events and the virtual clock driving one mounted mascot.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_mascot::constants::{BLINK_DURATION_MS, POKE_DURATION_MS};
use spark_mascot::{
    EyePosition, EyelidState, FRAME_INTERVAL_MS, Lifecycle, Mascot, MascotOptions, MascotState,
    MascotView, PointerEvent, Rect, RenderSink, SignalSink, StaticEnvironment, TimerKey,
    advance_by, dispatch_pointer, min_delay, reset_clock, reset_pointer_state,
};

fn setup() {
    reset_clock();
    reset_pointer_state();
}

fn mascot(options: MascotOptions) -> Mascot {
    Mascot::builder()
        .options(options)
        .environment(StaticEnvironment::default())
        .random_delay(min_delay())
        .build()
}

/// Mounted on a 100x100 surface at the origin, center (50, 50).
fn mounted(options: MascotOptions) -> (Mascot, SignalSink) {
    let m = mascot(options);
    let sink = SignalSink::new();
    m.mount(Rc::new(Cell::new(Rect::new(0.0, 0.0, 100.0, 100.0))), sink.clone())
        .unwrap();
    (m, sink)
}

fn pointer_at(x: f64, y: f64) {
    dispatch_pointer(PointerEvent::move_to(x, y));
    advance_by(FRAME_INTERVAL_MS);
}

struct Recorder(Rc<RefCell<Vec<MascotView>>>);

impl RenderSink for Recorder {
    fn render(&mut self, view: &MascotView) {
        self.0.borrow_mut().push(*view);
    }
}

#[test]
fn test_poke_wins_while_very_close() {
    setup();
    let (m, _sink) = mounted(MascotOptions::default());

    pointer_at(60.0, 50.0);
    assert!(m.is_cursor_very_close());
    assert_eq!(m.get_state(), MascotState::Alert);

    m.poke();
    assert_eq!(m.get_state(), MascotState::Poke);
    assert_eq!(m.get_eyelid_state(), EyelidState::Closed);
    assert_eq!(m.poke_count(), 1);
}

#[test]
fn test_very_close_defers_and_replays_once() {
    setup();
    let (m, _sink) = mounted(MascotOptions::default());

    pointer_at(55.0, 50.0);
    m.set_state(MascotState::Relaxed);
    assert_eq!(m.get_state(), MascotState::Alert);

    pointer_at(300.0, 50.0);
    assert!(!m.is_cursor_very_close());
    assert_eq!(m.get_state(), MascotState::Relaxed);

    m.set_state(MascotState::Neutral);
    pointer_at(310.0, 50.0);
    assert_eq!(m.get_state(), MascotState::Neutral);
}

#[test]
fn test_very_close_last_request_wins() {
    setup();
    let (m, _sink) = mounted(MascotOptions::default());

    pointer_at(50.0, 55.0);
    m.set_state(MascotState::Relaxed);
    m.set_state(MascotState::Neutral);
    m.set_state(MascotState::Relaxed);
    assert_eq!(m.get_state(), MascotState::Alert);

    pointer_at(50.0, 400.0);
    assert_eq!(m.get_state(), MascotState::Relaxed);
}

#[test]
fn test_gaze_follows_pointer_within_clamp() {
    setup();
    let (m, sink) = mounted(MascotOptions::default());

    pointer_at(150.0, 50.0);
    assert_eq!(m.get_position(), EyePosition::new(10.0, 0.0));

    pointer_at(1050.0, -950.0);
    assert_eq!(m.get_position(), EyePosition::new(20.0, -15.0));
    assert_eq!(sink.view().position, EyePosition::new(20.0, -15.0));
}

#[test]
fn test_custom_clamp() {
    setup();
    let (m, _sink) = mounted(MascotOptions::default().with_clamp(5.0, 4.0));

    m.look_at(EyePosition::new(-50.0, 50.0));
    assert_eq!(m.get_position(), EyePosition::new(-5.0, 4.0));
}

#[test]
fn test_reduced_motion_keeps_gaze_centered() {
    setup();
    let (m, _sink) = mounted(MascotOptions::default().with_reduced_motion(true));

    m.look_at(EyePosition::new(10.0, 10.0));
    pointer_at(200.0, 200.0);
    assert_eq!(m.get_position(), EyePosition::CENTER);
    assert!(!m.has_timer(TimerKey::RandomGlance));
}

#[test]
fn test_blink_is_idempotent() {
    setup();
    let log = Rc::new(RefCell::new(Vec::new()));
    let m = mascot(MascotOptions::default());
    m.mount(
        Rc::new(Rect::new(0.0, 0.0, 100.0, 100.0)),
        Recorder(log.clone()),
    )
    .unwrap();

    m.blink();
    m.blink();
    assert!(m.is_blinking());
    assert_eq!(m.get_eyelid_state(), EyelidState::Blinking);
    assert_eq!(log.borrow().len(), 2);

    advance_by(BLINK_DURATION_MS);
    assert!(!m.is_blinking());
    assert_eq!(m.get_eyelid_state(), EyelidState::Open);
    assert_eq!(log.borrow().last().map(|v| v.eyelid_state), Some(EyelidState::Open));
}

#[test]
fn test_blink_skipped_when_not_open() {
    setup();
    let (m, _sink) = mounted(MascotOptions::default());

    m.set_eyelid_state(EyelidState::Squinting);
    m.blink();
    assert!(!m.is_blinking());
    assert_eq!(m.get_eyelid_state(), EyelidState::Squinting);
}

#[test]
fn test_poke_holds_eyelid_for_duration() {
    setup();
    let (m, _sink) = mounted(MascotOptions::default());

    m.poke();
    assert!(m.is_poked());

    m.set_eyelid_state(EyelidState::Squinting);
    m.open_eyelids();
    assert_eq!(m.get_eyelid_state(), EyelidState::Closed);

    advance_by(POKE_DURATION_MS - 1.0);
    assert!(m.is_poked());

    advance_by(1.0);
    assert!(!m.is_poked());
    assert_eq!(m.get_eyelid_state(), EyelidState::Open);
    assert_eq!(m.get_state(), MascotState::Poke);
}

#[test]
fn test_repeated_pokes_extend_hold() {
    setup();
    let (m, sink) = mounted(MascotOptions::default());

    m.poke();
    advance_by(1500.0);
    m.poke();
    advance_by(1500.0);
    assert!(m.is_poked());
    assert_eq!(sink.view().poke_count, 2);

    advance_by(500.0);
    assert!(!m.is_poked());
}

#[test]
fn test_pointer_down_inside_surface_pokes() {
    setup();
    let (m, _sink) = mounted(MascotOptions::default());

    dispatch_pointer(PointerEvent::down(500.0, 500.0));
    assert_eq!(m.poke_count(), 0);

    dispatch_pointer(PointerEvent::down(50.0, 50.0));
    assert_eq!(m.poke_count(), 1);
    assert_eq!(m.get_state(), MascotState::Poke);
}

#[test]
fn test_thinking_entry_and_exit() {
    setup();
    let (m, sink) = mounted(MascotOptions::default());

    m.look_at(EyePosition::new(8.0, 3.0));
    m.set_state(MascotState::Thinking);
    assert_eq!(m.get_eyelid_state(), EyelidState::Thinking);
    assert_eq!(m.get_position(), EyePosition::CENTER);
    assert!(!m.is_pointer_tracking_enabled());
    assert!(m.is_thinking_animating());

    advance_by(FRAME_INTERVAL_MS * 10.0);
    assert!(sink.thinking_offset().is_some());

    pointer_at(200.0, 50.0);
    assert_eq!(m.get_position(), EyePosition::CENTER);

    m.set_state(MascotState::Neutral);
    assert_eq!(m.get_eyelid_state(), EyelidState::Open);
    assert!(m.is_pointer_tracking_enabled());
    assert!(!m.is_thinking_animating());
    assert_eq!(sink.thinking_offset(), None);
}

#[test]
fn test_proximity_squints_lightly() {
    setup();
    let (m, _sink) = mounted(MascotOptions::default());

    pointer_at(110.0, 50.0);
    assert!(m.is_cursor_close());
    assert_eq!(m.get_eyelid_state(), EyelidState::SquintingLight);

    pointer_at(400.0, 50.0);
    assert!(!m.is_cursor_close());
    assert_eq!(m.get_eyelid_state(), EyelidState::Open);
}

#[test]
fn test_explicit_squint_survives_proximity() {
    setup();
    let (m, _sink) = mounted(MascotOptions::default());

    m.set_eyelid_state(EyelidState::Squinting);
    pointer_at(110.0, 50.0);
    assert_eq!(m.get_eyelid_state(), EyelidState::Squinting);
    pointer_at(400.0, 50.0);
    assert_eq!(m.get_eyelid_state(), EyelidState::Squinting);
}

#[test]
fn test_glance_suppression() {
    setup();
    let (touch, _sink) = mounted(MascotOptions::default().with_touch_device(true));
    assert!(!touch.has_timer(TimerKey::RandomGlance));
    touch.destroy();

    setup();
    let (m, _sink) = mounted(MascotOptions::default());
    assert!(m.has_timer(TimerKey::RandomGlance));

    pointer_at(52.0, 50.0);
    assert!(!m.has_timer(TimerKey::RandomGlance));

    pointer_at(400.0, 50.0);
    assert!(m.has_timer(TimerKey::RandomGlance));
}

#[test]
fn test_glance_returns_to_saved_gaze() {
    setup();
    let (m, sink) = mounted(MascotOptions::default());

    pointer_at(200.0, 50.0);
    assert_eq!(m.get_position(), EyePosition::new(15.0, 0.0));

    // Idle after 5s, then the idle bucket at its lower bound.
    advance_by(5000.0);
    assert!(m.is_cursor_idle());
    assert!(!m.is_glancing());

    advance_by(2000.0);
    assert!(m.is_glancing());
    assert_eq!(sink.view().position, EyePosition::CENTER);

    advance_by(500.0);
    assert!(!m.is_glancing());
    assert_eq!(m.get_position(), EyePosition::new(15.0, 0.0));
}

#[test]
fn test_destroy_stops_everything() {
    setup();
    let (m, sink) = mounted(MascotOptions::default());

    m.poke();
    m.blink();
    pointer_at(200.0, 50.0);
    let renders = sink.renders();

    m.destroy();
    assert_eq!(m.lifecycle(), Lifecycle::Destroyed);
    assert_eq!(m.active_timers(), 0);

    advance_by(100_000.0);
    pointer_at(10.0, 10.0);
    dispatch_pointer(PointerEvent::down(50.0, 50.0));
    assert_eq!(sink.renders(), renders);
    assert!(!sink.is_attached());
}

#[test]
fn test_unmount_then_remount_on_new_surface() {
    setup();
    let (m, first) = mounted(MascotOptions::default());
    m.set_state(MascotState::Relaxed);
    m.unmount();
    assert_eq!(m.lifecycle(), Lifecycle::Detached);

    advance_by(10_000.0);
    let renders = first.renders();

    let second = SignalSink::new();
    m.mount(Rc::new(Rect::new(500.0, 500.0, 40.0, 40.0)), second.clone())
        .unwrap();
    assert_eq!(second.view().state, MascotState::Relaxed);

    pointer_at(520.0, 530.0);
    assert!(m.is_cursor_very_close());
    assert_eq!(first.renders(), renders);
}
