use statig::blocking::IntoStateMachineExt as _;

mod hsm;

use hsm::GestureHsm;

use crate::config::ButtonOptions;
use crate::types::{GestureKind, GestureState};

/// Confirmed level change handed over by the debounce filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GestureInput {
    Press,
    Hold { dt: u32 },
    Idle { dt: u32, double_click_interval: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Gesture {
    pub(crate) kind: GestureKind,
    pub(crate) click_count: u8,
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    emitted: Option<Gesture>,
}

impl DispatchContext {
    fn emit(&mut self, kind: GestureKind, click_count: u8) {
        self.emitted = Some(Gesture { kind, click_count });
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct GestureTimers {
    pub(crate) press_duration: u32,
    pub(crate) repeat_timer: u32,
    pub(crate) double_click_timer: u32,
    pub(crate) click_count: u8,
}

pub(crate) struct GestureEngine {
    machine: statig::blocking::StateMachine<GestureHsm>,
}

impl GestureEngine {
    pub(crate) fn new(options: ButtonOptions) -> Self {
        Self {
            machine: GestureHsm::new(options).state_machine(),
        }
    }

    /// Feeds one confirmed tick. At most one gesture comes out per tick.
    pub(crate) fn handle(&mut self, input: GestureInput) -> Option<Gesture> {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&input, &mut context);
        context.emitted
    }

    pub(crate) fn state(&self) -> GestureState {
        self.machine.inner().state_id
    }

    pub(crate) fn timers(&self) -> GestureTimers {
        let hsm = self.machine.inner();
        GestureTimers {
            press_duration: hsm.press_duration,
            repeat_timer: hsm.repeat_timer,
            double_click_timer: hsm.double_click_timer,
            click_count: hsm.click_count,
        }
    }
}
