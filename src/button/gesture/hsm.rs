use statig::prelude::*;

use super::{DispatchContext, GestureInput};
use crate::config::ButtonOptions;
use crate::types::{GestureKind, GestureMask, GestureState};

pub(super) struct GestureHsm {
    mode: GestureMask,
    repeat_interval: u32,
    long_press_threshold: u32,
    pub(super) press_duration: u32,
    pub(super) repeat_timer: u32,
    pub(super) double_click_timer: u32,
    pub(super) click_count: u8,
    pub(super) state_id: GestureState,
}

impl GestureHsm {
    pub(super) fn new(options: ButtonOptions) -> Self {
        Self {
            mode: options.mode,
            repeat_interval: options.repeat_interval,
            long_press_threshold: options.long_press_threshold,
            press_duration: 0,
            repeat_timer: 0,
            double_click_timer: 0,
            click_count: 0,
            state_id: GestureState::Released,
        }
    }

    fn go(&mut self, next: GestureState) -> Outcome<State> {
        if self.state_id == next {
            return Handled;
        }
        self.state_id = next;
        Transition(match next {
            GestureState::Released => State::released(),
            GestureState::ArmedSingleOrDouble => State::armed_single_or_double(),
            GestureState::ArmedDoubleOnly => State::armed_double_only(),
            GestureState::ArmedSingleOnly => State::armed_single_only(),
            GestureState::ArmedLongOrRepeat => State::armed_long_or_repeat(),
            GestureState::ArmedLongOnly => State::armed_long_only(),
            GestureState::ArmedRepeatOnly => State::armed_repeat_only(),
        })
    }

    fn arm(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        self.click_count = 1;
        self.double_click_timer = 0;
        self.press_duration = 0;
        self.repeat_timer = 0;

        let click = self.mode.contains(GestureMask::CLICK);
        let double = self.mode.contains(GestureMask::DOUBLE_CLICK);
        if click && double {
            self.go(GestureState::ArmedSingleOrDouble)
        } else if click {
            // Nothing left to disambiguate at release.
            if !self.mode.has_held_gesture() {
                context.emit(GestureKind::Click, self.click_count);
            }
            self.go(GestureState::ArmedSingleOnly)
        } else if double {
            self.go(GestureState::ArmedDoubleOnly)
        } else {
            Handled
        }
    }

    fn count_click(&mut self) {
        self.double_click_timer = 0;
        self.click_count = self.click_count.saturating_add(1);
    }

    fn sustain(&mut self, context: &mut DispatchContext, dt: u32) -> Outcome<State> {
        let long = self.mode.contains(GestureMask::LONG_PRESS);
        let repeat = self.mode.contains(GestureMask::REPEAT);

        if long && repeat {
            // Long press only opens the repeat phase, it is never reported.
            if self.press_duration < self.long_press_threshold {
                self.press_duration = self.press_duration.saturating_add(dt);
                if self.press_duration >= self.long_press_threshold {
                    self.repeat_timer = 0;
                    return self.go(GestureState::ArmedLongOrRepeat);
                }
            } else if self.repeat_elapsed(dt) {
                self.emit_repeat(context);
                return self.go(GestureState::ArmedLongOrRepeat);
            }
        } else if long {
            if self.press_duration < self.long_press_threshold {
                self.press_duration = self.press_duration.saturating_add(dt);
                if self.press_duration >= self.long_press_threshold {
                    context.emit(GestureKind::LongPress, self.click_count);
                    return self.go(GestureState::ArmedLongOnly);
                }
            }
        } else if repeat && self.repeat_elapsed(dt) {
            self.emit_repeat(context);
            return self.go(GestureState::ArmedRepeatOnly);
        }
        Handled
    }

    fn repeat_elapsed(&mut self, dt: u32) -> bool {
        self.repeat_timer = self.repeat_timer.saturating_add(dt);
        if self.repeat_timer >= self.repeat_interval {
            self.repeat_timer = 0;
            true
        } else {
            false
        }
    }

    fn emit_repeat(&mut self, context: &mut DispatchContext) {
        context.emit(GestureKind::Repeat, self.click_count);
        self.click_count = self.click_count.saturating_add(1);
    }

    /// Counts release time toward the double-click window; true once the
    /// window has passed without a re-press.
    fn click_window_elapsed(&mut self, dt: u32, interval: u32) -> bool {
        self.double_click_timer = self.double_click_timer.saturating_add(dt);
        self.double_click_timer >= interval
    }

    fn finish(
        &mut self,
        context: &mut DispatchContext,
        kind: Option<GestureKind>,
    ) -> Outcome<State> {
        if let Some(kind) = kind {
            context.emit(kind, self.click_count);
        }
        self.click_count = 0;
        self.double_click_timer = 0;
        self.go(GestureState::Released)
    }
}

#[state_machine(initial = "State::released()")]
impl GestureHsm {
    #[state(superstate = "scanning")]
    fn released(&mut self, context: &mut DispatchContext, event: &GestureInput) -> Outcome<State> {
        match event {
            GestureInput::Press => self.arm(context),
            GestureInput::Idle { .. } => Handled,
            GestureInput::Hold { .. } => Super,
        }
    }

    #[state(superstate = "scanning")]
    fn armed_single_or_double(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureInput,
    ) -> Outcome<State> {
        match event {
            GestureInput::Press => {
                self.count_click();
                Handled
            }
            GestureInput::Idle {
                dt,
                double_click_interval,
            } => {
                if !self.click_window_elapsed(*dt, *double_click_interval) {
                    return Handled;
                }
                let kind = if self.click_count <= 1 {
                    GestureKind::Click
                } else {
                    GestureKind::DoubleClick
                };
                self.finish(context, Some(kind))
            }
            GestureInput::Hold { .. } => Super,
        }
    }

    #[state(superstate = "scanning")]
    fn armed_double_only(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureInput,
    ) -> Outcome<State> {
        match event {
            GestureInput::Press => {
                self.count_click();
                Handled
            }
            GestureInput::Idle {
                dt,
                double_click_interval,
            } => {
                if self.click_window_elapsed(*dt, *double_click_interval) {
                    self.finish(context, Some(GestureKind::DoubleClick))
                } else {
                    Handled
                }
            }
            GestureInput::Hold { .. } => Super,
        }
    }

    #[state(superstate = "scanning")]
    fn armed_single_only(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureInput,
    ) -> Outcome<State> {
        match event {
            GestureInput::Idle { .. } => {
                // Bare click buttons already reported on press.
                let kind = self.mode.has_held_gesture().then_some(GestureKind::Click);
                self.finish(context, kind)
            }
            _ => Super,
        }
    }

    #[state(superstate = "scanning")]
    fn armed_long_or_repeat(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureInput,
    ) -> Outcome<State> {
        match event {
            GestureInput::Idle { .. } => self.finish(context, Some(GestureKind::Release)),
            _ => Super,
        }
    }

    #[state(superstate = "scanning")]
    fn armed_long_only(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureInput,
    ) -> Outcome<State> {
        match event {
            GestureInput::Idle { .. } => self.finish(context, Some(GestureKind::Release)),
            _ => Super,
        }
    }

    #[state(superstate = "scanning")]
    fn armed_repeat_only(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureInput,
    ) -> Outcome<State> {
        match event {
            GestureInput::Idle { .. } => self.finish(context, Some(GestureKind::Release)),
            _ => Super,
        }
    }

    #[superstate]
    fn scanning(&mut self, context: &mut DispatchContext, event: &GestureInput) -> Outcome<State> {
        match event {
            GestureInput::Hold { dt } => self.sustain(context, *dt),
            _ => Handled,
        }
    }
}
