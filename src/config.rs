use crate::types::GestureMask;

include!(concat!(env!("OUT_DIR"), "/gesture_config.rs"));

/// Timing shared by every button of a keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanTiming {
    /// Debounce window `W`. The filter timer lives in `[0, 2W]`.
    pub filter_window: u32,
    /// Release gap that finalizes a click / multi-click sequence.
    pub double_click_interval: u32,
}

impl ScanTiming {
    pub const fn new() -> Self {
        Self {
            filter_window: FILTER_WINDOW,
            double_click_interval: DOUBLE_CLICK_INTERVAL,
        }
    }

    pub const fn with_filter_window(mut self, window: u32) -> Self {
        self.filter_window = window;
        self
    }

    pub const fn with_double_click_interval(mut self, interval: u32) -> Self {
        self.double_click_interval = interval;
        self
    }
}

impl Default for ScanTiming {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-button registration options. Constant for the life of the button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonOptions {
    pub mode: GestureMask,
    pub repeat_interval: u32,
    pub long_press_threshold: u32,
}

impl ButtonOptions {
    pub const fn new(mode: GestureMask) -> Self {
        Self {
            mode,
            repeat_interval: DEFAULT_REPEAT_INTERVAL,
            long_press_threshold: DEFAULT_LONG_PRESS_THRESHOLD,
        }
    }

    pub const fn with_repeat_interval(mut self, interval: u32) -> Self {
        self.repeat_interval = interval;
        self
    }

    pub const fn with_long_press_threshold(mut self, threshold: u32) -> Self {
        self.long_press_threshold = threshold;
        self
    }
}

impl Default for ButtonOptions {
    fn default() -> Self {
        Self::new(GestureMask::CLICK)
    }
}
