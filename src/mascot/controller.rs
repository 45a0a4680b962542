//! Controller internals.
//!
//! All mutable state lives in `Cell`s so that re-entrant paths (a scheduler
//! callback calling back into `set_state`, `set_state` disabling pointer
//! tracking, which replays a deferred state) never hit a borrow conflict.
//! `RefCell`s are only used for owned collaborators and are never held across
//! a call back into the controller.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::Lifecycle;
use super::thinking::thinking_offset;
use crate::behavior::{EyelidInputs, resolve_eyelid_from_proximity, resolve_state_with_very_close};
use crate::config::{Environment, MascotConfig, MascotOptions, RandomDelay, resolve_runtime_config};
use crate::constants::*;
use crate::engine::clock::{self, FrameHandle};
use crate::engine::timers::{TimerKey, TimerRegistry};
use crate::error::{MascotError, Result};
use crate::renderer::RenderSink;
use crate::schedulers::{BlinkScheduler, BlinkTarget, GlanceHost, GlanceScheduler};
use crate::state::idle::IdleTracker;
use crate::state::pointer::{self, PointerEvent};
use crate::state::sampler::PointerSampler;
use crate::types::{
    EyePosition, EyelidState, MascotState, MascotView, PointerMetrics, Rect, Surface,
};

pub(super) struct MascotInner {
    this: Weak<MascotInner>,
    options: MascotOptions,
    environment: Box<dyn Environment>,
    random_delay: RandomDelay,

    lifecycle: Cell<Lifecycle>,
    config: Cell<MascotConfig>,

    state: Cell<MascotState>,
    eyelid_state: Cell<EyelidState>,
    position: Cell<EyePosition>,
    last_pointer_position: Cell<Option<EyePosition>>,
    poke_count: Cell<u32>,
    is_poked: Cell<bool>,
    is_blinking: Cell<bool>,
    is_glancing: Cell<bool>,
    is_cursor_close: Cell<bool>,
    is_cursor_very_close: Cell<bool>,
    is_explicitly_squinting: Cell<bool>,
    previous_state_before_very_close: Cell<Option<MascotState>>,
    pointer_tracking_enabled: Cell<bool>,

    timers: TimerRegistry,
    idle: IdleTracker,
    surface: RefCell<Option<Rc<dyn Surface>>>,
    sink: RefCell<Option<Box<dyn RenderSink>>>,
    sampler: RefCell<Option<PointerSampler>>,
    pointer_down: RefCell<Option<Box<dyn FnOnce()>>>,
    glance: RefCell<Option<GlanceScheduler>>,
    blink_scheduler: RefCell<Option<BlinkScheduler>>,
    thinking_frame: Cell<Option<FrameHandle>>,
    thinking_started_at: Cell<Option<f64>>,
    rendering: Cell<bool>,
}

impl MascotInner {
    pub(super) fn new(
        options: MascotOptions,
        environment: Box<dyn Environment>,
        random_delay: RandomDelay,
    ) -> Rc<Self> {
        let timers = TimerRegistry::new();
        let idle = IdleTracker::new(timers.clone(), IDLE_THRESHOLD_MS);

        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            config: Cell::new(MascotConfig::from_options(&options)),
            options,
            environment,
            random_delay,

            lifecycle: Cell::new(Lifecycle::Created),

            state: Cell::new(MascotState::Neutral),
            eyelid_state: Cell::new(EyelidState::Open),
            position: Cell::new(EyePosition::CENTER),
            last_pointer_position: Cell::new(None),
            poke_count: Cell::new(0),
            is_poked: Cell::new(false),
            is_blinking: Cell::new(false),
            is_glancing: Cell::new(false),
            is_cursor_close: Cell::new(false),
            is_cursor_very_close: Cell::new(false),
            is_explicitly_squinting: Cell::new(false),
            previous_state_before_very_close: Cell::new(None),
            pointer_tracking_enabled: Cell::new(true),

            timers,
            idle,
            surface: RefCell::new(None),
            sink: RefCell::new(None),
            sampler: RefCell::new(None),
            pointer_down: RefCell::new(None),
            glance: RefCell::new(None),
            blink_scheduler: RefCell::new(None),
            thinking_frame: Cell::new(None),
            thinking_started_at: Cell::new(None),
            rendering: Cell::new(false),
        })
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    pub(super) fn mount(&self, surface: Rc<dyn Surface>, sink: Box<dyn RenderSink>) -> Result<()> {
        match self.lifecycle.get() {
            Lifecycle::Mounted => return Err(MascotError::AlreadyMounted),
            Lifecycle::Destroyed => return Err(MascotError::Destroyed),
            Lifecycle::Created | Lifecycle::Detached => {}
        }

        let bounds = surface.bounds();
        if !bounds.is_valid() {
            return Err(MascotError::InvalidSurface {
                width: bounds.width,
                height: bounds.height,
            });
        }

        let config = resolve_runtime_config(&self.options, self.environment.as_ref());
        self.config.set(config);
        *self.surface.borrow_mut() = Some(surface);
        *self.sink.borrow_mut() = Some(sink);
        self.lifecycle.set(Lifecycle::Mounted);

        let host: Weak<dyn GlanceHost> = self.this.clone();
        let target: Weak<dyn BlinkTarget> = self.this.clone();
        let glance = GlanceScheduler::new(self.timers.clone(), host, self.random_delay.clone());
        let blink = BlinkScheduler::new(self.timers.clone(), target, self.random_delay.clone());
        *self.glance.borrow_mut() = Some(glance.clone());
        *self.blink_scheduler.borrow_mut() = Some(blink.clone());

        let this = self.this.clone();
        let unsubscribe = pointer::on_pointer_down(move |event| {
            if let Some(inner) = this.upgrade() {
                inner.handle_pointer_down(event);
            }
        });
        *self.pointer_down.borrow_mut() = Some(Box::new(unsubscribe));

        log::debug!(
            "mascot mounted (reduced_motion={}, touch={})",
            config.reduced_motion,
            config.is_touch_device
        );

        if !config.is_touch_device {
            self.start_pointer_tracking();
            glance.start();
        }

        self.render();
        blink.start();

        if self.state.get() == MascotState::Thinking {
            self.start_thinking_animation();
        }

        Ok(())
    }

    pub(super) fn unmount(&self) {
        if self.lifecycle.get() != Lifecycle::Mounted {
            return;
        }
        self.lifecycle.set(Lifecycle::Detached);
        self.teardown();
        log::debug!("mascot unmounted");
    }

    pub(super) fn destroy(&self) {
        match self.lifecycle.replace(Lifecycle::Destroyed) {
            Lifecycle::Destroyed => return,
            Lifecycle::Mounted => self.teardown(),
            Lifecycle::Created | Lifecycle::Detached => {
                // Timers armed by commands issued while unmounted.
                self.timers.clear_all();
                self.release_holds();
            }
        }
        log::debug!("mascot destroyed");
    }

    /// Total teardown. The lifecycle has already left `Mounted`, so nothing
    /// below can restart tracking or the thinking loop.
    fn teardown(&self) {
        self.timers.clear_all();
        self.stop_pointer_tracking();
        self.stop_thinking_animation();

        let glance = self.glance.borrow_mut().take();
        if let Some(glance) = glance {
            glance.stop();
        }
        let blink = self.blink_scheduler.borrow_mut().take();
        if let Some(blink) = blink {
            blink.stop();
        }
        let unsubscribe = self.pointer_down.borrow_mut().take();
        if let Some(unsubscribe) = unsubscribe {
            unsubscribe();
        }

        self.release_holds();
        self.is_cursor_close.set(false);

        let sink = self.sink.borrow_mut().take();
        if let Some(mut sink) = sink {
            sink.detach();
        }
        *self.surface.borrow_mut() = None;
    }

    /// Drop poke, blink and glance holds whose release timers were cleared.
    fn release_holds(&self) {
        if self.is_glancing.replace(false) {
            if let Some(back) = self.last_pointer_position.get() {
                self.position.set(back);
            }
        }

        let was_poked = self.is_poked.replace(false);
        let was_blinking = self.is_blinking.replace(false);
        if (was_poked || was_blinking)
            && matches!(
                self.eyelid_state.get(),
                EyelidState::Closed | EyelidState::Blinking
            )
        {
            self.eyelid_state.set(EyelidState::Open);
        }
    }

    // =========================================================================
    // HOST COMMANDS
    // =========================================================================

    pub(super) fn set_state(&self, requested: MascotState) {
        if self.is_destroyed() {
            return;
        }

        let current = self.state.get();
        let resolution = resolve_state_with_very_close(
            current,
            requested,
            self.is_cursor_very_close.get(),
            self.previous_state_before_very_close.get(),
        );
        self.previous_state_before_very_close
            .set(resolution.previous_requested);

        let next = resolution.next;
        if next == current {
            return;
        }

        log::debug!("state {current} -> {next}");
        self.state.set(next);

        let was_thinking = current == MascotState::Thinking;
        let will_be_thinking = next == MascotState::Thinking;

        if will_be_thinking && self.eyelid_state.get() != EyelidState::Thinking {
            self.eyelid_state.set(EyelidState::Thinking);
            self.disable_pointer_tracking();
            self.position.set(EyePosition::CENTER);
            self.start_thinking_animation();
        } else if was_thinking && !will_be_thinking {
            self.stop_thinking_animation();
            self.enable_pointer_tracking();
            if !self.is_poked.get()
                && !self.is_blinking.get()
                && !self.is_explicitly_squinting.get()
            {
                self.eyelid_state.set(EyelidState::Open);
            }
        }

        self.render();
    }

    pub(super) fn set_eyelid_state(&self, eyelid: EyelidState) {
        if self.is_destroyed() || !self.can_change_eyelid() {
            return;
        }
        self.eyelid_state.set(eyelid);
        self.is_explicitly_squinting
            .set(eyelid == EyelidState::Squinting);
        self.render();
    }

    pub(super) fn open_eyelids(&self) {
        if self.is_destroyed() || !self.can_change_eyelid() {
            return;
        }
        self.eyelid_state.set(EyelidState::Open);
        self.is_explicitly_squinting.set(false);
        self.render();
    }

    pub(super) fn look_at(&self, target: EyePosition) {
        if self.is_destroyed() {
            return;
        }
        let config = self.config.get();
        if config.reduced_motion {
            return;
        }

        let clamped = target.clamped(config.eye_clamp_x, config.eye_clamp_y);
        self.last_pointer_position.set(Some(clamped));

        // Mid-glance: only the restore target moves.
        if self.is_glancing.get() {
            return;
        }

        self.position.set(clamped);
        self.render();
    }

    pub(super) fn poke(&self) {
        if self.is_destroyed() {
            return;
        }

        self.is_poked.set(true);
        self.poke_count.set(self.poke_count.get() + 1);
        log::debug!("poked ({} total)", self.poke_count.get());

        self.set_state(MascotState::Poke);
        self.eyelid_state.set(EyelidState::Closed);

        let this = self.this.clone();
        self.timers.set(TimerKey::Poke, POKE_DURATION_MS, move || {
            if let Some(inner) = this.upgrade() {
                inner.release_poke();
            }
        });

        self.render();
    }

    fn release_poke(&self) {
        self.is_poked.set(false);
        self.eyelid_state.set(EyelidState::Open);
        self.render();
    }

    pub(super) fn blink(&self) {
        if self.is_destroyed()
            || self.is_blinking.get()
            || self.eyelid_state.get() != EyelidState::Open
        {
            return;
        }

        self.is_blinking.set(true);
        self.eyelid_state.set(EyelidState::Blinking);
        self.render();

        let this = self.this.clone();
        self.timers.set(TimerKey::Blink, BLINK_DURATION_MS, move || {
            if let Some(inner) = this.upgrade() {
                inner.end_blink();
            }
        });
    }

    fn end_blink(&self) {
        if !self.is_blinking.get() {
            return;
        }
        self.eyelid_state.set(EyelidState::Open);
        self.is_blinking.set(false);
        self.render();
    }

    pub(super) fn enable_pointer_tracking(&self) {
        if self.is_destroyed() {
            return;
        }
        self.pointer_tracking_enabled.set(true);
        self.start_pointer_tracking();
    }

    pub(super) fn disable_pointer_tracking(&self) {
        if self.is_destroyed() {
            return;
        }
        self.pointer_tracking_enabled.set(false);
        self.restore_from_very_close();
    }

    // =========================================================================
    // POINTER
    // =========================================================================

    fn start_pointer_tracking(&self) {
        if !self.is_mounted() || self.config.get().is_touch_device {
            return;
        }
        if self.sampler.borrow().is_some() {
            return;
        }

        let surface_of = self.this.clone();
        let enabled_of = self.this.clone();
        let metrics_to = self.this.clone();
        let sampler = PointerSampler::start(
            move || surface_of.upgrade().and_then(|inner| inner.surface_bounds()),
            move || {
                enabled_of
                    .upgrade()
                    .is_some_and(|inner| inner.is_mounted() && inner.pointer_tracking_enabled.get())
            },
            move |metrics| {
                if let Some(inner) = metrics_to.upgrade() {
                    inner.handle_pointer_metrics(metrics);
                }
            },
        );
        *self.sampler.borrow_mut() = Some(sampler);
    }

    fn stop_pointer_tracking(&self) {
        self.idle.reset();
        self.restore_from_very_close();
        let sampler = self.sampler.borrow_mut().take();
        if let Some(mut sampler) = sampler {
            sampler.stop();
        }
    }

    /// One pointer sample, in a fixed order: idle detection, proximity
    /// edges, eyelid, gaze.
    fn handle_pointer_metrics(&self, metrics: PointerMetrics) {
        if !self.is_mounted() || !self.pointer_tracking_enabled.get() {
            return;
        }

        let this = self.this.clone();
        self.idle.record_activity(
            || self.reschedule_glance(),
            move || {
                if let Some(inner) = this.upgrade() {
                    inner.reschedule_glance();
                }
            },
        );

        let was_close = self.is_cursor_close.get();
        let was_very_close = self.is_cursor_very_close.get();
        let close = metrics.distance < SQUINT_THRESHOLD;
        let very_close = metrics.distance < EXPAND_THRESHOLD;
        self.is_cursor_close.set(close);

        if was_very_close != very_close {
            if very_close {
                self.is_cursor_very_close.set(true);
                self.previous_state_before_very_close
                    .set(Some(self.state.get()));
                self.set_state(MascotState::Alert);
            } else {
                self.restore_from_very_close();
            }
            self.reschedule_glance();
        }

        if was_close != close {
            self.reschedule_glance();
        }

        self.update_eyelid_from_proximity();

        self.look_at(EyePosition::new(
            metrics.delta_x / POINTER_DELTA_DIVISOR,
            metrics.delta_y / POINTER_DELTA_DIVISOR,
        ));
    }

    fn handle_pointer_down(&self, event: &PointerEvent) {
        if !self.is_mounted() {
            return;
        }
        let inside = self
            .surface_bounds()
            .is_some_and(|bounds| bounds.contains(event.x, event.y));
        if inside {
            self.poke();
        }
    }

    /// Leave the very-close override and replay the deferred request once.
    fn restore_from_very_close(&self) {
        // Cleared first so the replay is not deferred again.
        self.is_cursor_very_close.set(false);
        if let Some(previous) = self.previous_state_before_very_close.take() {
            self.set_state(previous);
        }
    }

    fn update_eyelid_from_proximity(&self) {
        let next = resolve_eyelid_from_proximity(EyelidInputs {
            current: self.eyelid_state.get(),
            is_poked: self.is_poked.get(),
            is_blinking: self.is_blinking.get(),
            is_cursor_close: self.is_cursor_close.get(),
            is_explicitly_squinting: self.is_explicitly_squinting.get(),
        });

        if next != self.eyelid_state.get() {
            self.eyelid_state.set(next);
            self.render();
        }
    }

    fn reschedule_glance(&self) {
        let glance = self.glance.borrow().clone();
        if let Some(glance) = glance {
            glance.reschedule();
        }
    }

    fn surface_bounds(&self) -> Option<Rect> {
        self.surface.borrow().as_ref().map(|surface| surface.bounds())
    }

    // =========================================================================
    // THINKING LOOP
    // =========================================================================

    fn start_thinking_animation(&self) {
        if self.config.get().reduced_motion || !self.is_mounted() {
            return;
        }
        self.stop_thinking_animation();
        self.thinking_started_at.set(Some(clock::now()));
        self.request_thinking_frame();
    }

    fn request_thinking_frame(&self) {
        let this = self.this.clone();
        let frame = clock::request_animation_frame(move |now| {
            if let Some(inner) = this.upgrade() {
                inner.on_thinking_frame(now);
            }
        });
        self.thinking_frame.set(Some(frame));
    }

    fn on_thinking_frame(&self, now: f64) {
        self.thinking_frame.set(None);
        if !self.is_mounted() || self.state.get() != MascotState::Thinking {
            self.stop_thinking_animation();
            return;
        }

        let started = self.thinking_started_at.get().unwrap_or(now);
        self.push_thinking_offset(Some(thinking_offset(now - started)));
        self.request_thinking_frame();
    }

    fn stop_thinking_animation(&self) {
        if let Some(frame) = self.thinking_frame.take() {
            clock::cancel_animation_frame(frame);
        }
        if self.thinking_started_at.take().is_some() {
            self.push_thinking_offset(None);
        }
    }

    // =========================================================================
    // RENDER
    // =========================================================================

    fn render(&self) {
        let view = self.view();
        self.with_sink("render", |sink| sink.render(&view));
    }

    fn push_thinking_offset(&self, offset: Option<f64>) {
        self.with_sink("thinking offset", |sink| sink.set_thinking_offset(offset));
    }

    /// Hand the sink to `f` with the slot emptied, so the sink may call back
    /// into the controller, including `unmount` or `destroy`. A sink that is
    /// no longer the mounted one when `f` returns is detached.
    fn with_sink(&self, what: &str, f: impl FnOnce(&mut dyn RenderSink)) {
        if self.rendering.get() {
            log::warn!("{what} skipped: sink is already rendering");
            return;
        }
        let taken = self.sink.borrow_mut().take();
        let Some(mut sink) = taken else {
            return;
        };

        self.rendering.set(true);
        f(sink.as_mut());
        self.rendering.set(false);

        let mut slot = self.sink.borrow_mut();
        if self.is_mounted() && slot.is_none() {
            *slot = Some(sink);
        } else {
            drop(slot);
            log::debug!("sink released during {what}");
            sink.detach();
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub(super) fn view(&self) -> MascotView {
        MascotView {
            position: self.position.get(),
            state: self.state.get(),
            eyelid_state: self.eyelid_state.get(),
            poke_count: self.poke_count.get(),
        }
    }

    pub(super) fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    pub(super) fn is_mounted(&self) -> bool {
        self.lifecycle.get() == Lifecycle::Mounted
    }

    fn is_destroyed(&self) -> bool {
        self.lifecycle.get() == Lifecycle::Destroyed
    }

    fn can_change_eyelid(&self) -> bool {
        !self.is_poked.get()
            && !self.is_blinking.get()
            && self.eyelid_state.get() != EyelidState::Blinking
    }

    pub(super) fn config(&self) -> MascotConfig {
        self.config.get()
    }

    pub(super) fn state(&self) -> MascotState {
        self.state.get()
    }

    pub(super) fn eyelid_state(&self) -> EyelidState {
        self.eyelid_state.get()
    }

    pub(super) fn position(&self) -> EyePosition {
        self.position.get()
    }

    pub(super) fn poke_count(&self) -> u32 {
        self.poke_count.get()
    }

    pub(super) fn is_poked(&self) -> bool {
        self.is_poked.get()
    }

    pub(super) fn is_blinking(&self) -> bool {
        self.is_blinking.get()
    }

    pub(super) fn is_glancing(&self) -> bool {
        self.is_glancing.get()
    }

    pub(super) fn is_cursor_idle(&self) -> bool {
        self.idle.is_idle()
    }

    pub(super) fn is_cursor_close(&self) -> bool {
        self.is_cursor_close.get()
    }

    pub(super) fn is_cursor_very_close(&self) -> bool {
        self.is_cursor_very_close.get()
    }

    pub(super) fn is_pointer_tracking_enabled(&self) -> bool {
        self.pointer_tracking_enabled.get()
    }

    pub(super) fn is_thinking_animating(&self) -> bool {
        self.thinking_frame.get().is_some()
    }

    pub(super) fn timers(&self) -> &TimerRegistry {
        &self.timers
    }
}

// =============================================================================
// SCHEDULER CAPABILITIES
// =============================================================================

impl BlinkTarget for MascotInner {
    fn should_blink(&self) -> bool {
        !self.is_poked.get()
            && !self.is_blinking.get()
            && self.eyelid_state.get() == EyelidState::Open
    }

    fn do_blink(&self) {
        self.blink();
    }
}

impl GlanceHost for MascotInner {
    fn reduced_motion(&self) -> bool {
        self.config.get().reduced_motion
    }

    fn is_touch_device(&self) -> bool {
        self.config.get().is_touch_device
    }

    fn is_very_close(&self) -> bool {
        self.is_cursor_very_close.get()
    }

    fn is_poked(&self) -> bool {
        self.is_poked.get()
    }

    fn is_glancing(&self) -> bool {
        self.is_glancing.get()
    }

    fn is_cursor_idle(&self) -> bool {
        self.idle.is_idle()
    }

    fn is_cursor_close(&self) -> bool {
        self.is_cursor_close.get()
    }

    fn position(&self) -> EyePosition {
        self.position.get()
    }

    fn set_position(&self, position: EyePosition) {
        self.position.set(position);
    }

    fn last_pointer_position(&self) -> Option<EyePosition> {
        self.last_pointer_position.get()
    }

    fn set_last_pointer_position(&self, position: Option<EyePosition>) {
        self.last_pointer_position.set(position);
    }

    fn set_glancing(&self, glancing: bool) {
        if glancing != self.is_glancing.get() {
            log::trace!("glancing = {glancing}");
        }
        self.is_glancing.set(glancing);
    }

    fn request_render(&self) {
        self.render();
    }
}
