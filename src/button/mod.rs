//! Per-button descriptor: debounce filter feeding the gesture state machine.

use alloc::boxed::Box;

mod debounce;
mod gesture;

use debounce::{Debouncer, FilterOutcome};
pub(crate) use gesture::Gesture;
use gesture::{GestureEngine, GestureInput};

use crate::config::{ButtonOptions, ScanTiming};
use crate::input::InputSource;
use crate::types::{ButtonHandle, GestureMask, GestureState, SourceId};

/// Read-only copy of one registered button, for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonSnapshot {
    pub handle: ButtonHandle,
    pub source_id: SourceId,
    pub mode: GestureMask,
    pub repeat_interval: u32,
    pub long_press_threshold: u32,
    pub filter_timer: u32,
    pub debounced_level: bool,
    pub press_duration: u32,
    pub repeat_timer: u32,
    pub double_click_timer: u32,
    pub click_count: u8,
    pub gesture_state: GestureState,
}

pub(crate) struct Button<'a> {
    source: Box<dyn InputSource + 'a>,
    options: ButtonOptions,
    filter: Debouncer,
    gestures: GestureEngine,
}

impl<'a> Button<'a> {
    pub(crate) fn new(source: Box<dyn InputSource + 'a>, options: ButtonOptions) -> Self {
        Self {
            source,
            options,
            filter: Debouncer::default(),
            gestures: GestureEngine::new(options),
        }
    }

    pub(crate) fn source_id(&self) -> SourceId {
        self.source.source_id()
    }

    /// One tick: sample the source, run the filter, and on a confirmed level
    /// advance the gesture state machine.
    pub(crate) fn scan(&mut self, dt: u32, timing: &ScanTiming) -> Option<Gesture> {
        let active = self.source.is_active();
        let input = match self.filter.step(active, dt, timing.filter_window) {
            FilterOutcome::Settling => return None,
            FilterOutcome::Pressed => GestureInput::Press,
            FilterOutcome::Held => GestureInput::Hold { dt },
            FilterOutcome::Idle => GestureInput::Idle {
                dt,
                double_click_interval: timing.double_click_interval,
            },
        };
        self.gestures.handle(input)
    }

    pub(crate) fn snapshot(&self, handle: ButtonHandle) -> ButtonSnapshot {
        let timers = self.gestures.timers();
        ButtonSnapshot {
            handle,
            source_id: self.source_id(),
            mode: self.options.mode,
            repeat_interval: self.options.repeat_interval,
            long_press_threshold: self.options.long_press_threshold,
            filter_timer: self.filter.timer(),
            debounced_level: self.filter.level(),
            press_duration: timers.press_duration,
            repeat_timer: timers.repeat_timer,
            double_click_timer: timers.double_click_timer,
            click_count: timers.click_count,
            gesture_state: self.gestures.state(),
        }
    }
}
