//! Tick-driven button debouncing and gesture classification.
//!
//! A [`Keypad`] owns the registered buttons and is scanned once per tick by
//! the periodic source (timer interrupt or main-loop poll). Each scan runs the
//! debounce filter and gesture state machine of every button and pushes the
//! resulting [`ButtonEvent`]s into a bounded [`EventQueue`] that the
//! application drains at its own pace.
//!
//! ```ignore
//! let queue: EventQueue<NoopRawMutex, ButtonEvent> = EventQueue::new(DEFAULT_QUEUE_LEN)?;
//! let mut keypad: Keypad = Keypad::new(&queue);
//! let ok = keypad.register(
//!     FnSource::new(SourceId(1), || ok_pin_low()),
//!     ButtonOptions::new(GestureMask::CLICK | GestureMask::DOUBLE_CLICK),
//! )?;
//!
//! // tick source, every 10 ms
//! keypad.scan(10);
//!
//! // application loop
//! while let Some(event) = queue.read_event() {
//!     if event.handle == ok { /* ... */ }
//! }
//! ```

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod button;
pub mod config;
pub mod input;
pub mod keypad;
pub mod queue;
pub mod registry;
pub mod types;

pub use button::ButtonSnapshot;
pub use config::{
    ButtonOptions, ScanTiming, DEFAULT_LONG_PRESS_THRESHOLD, DEFAULT_MAX_BUTTONS,
    DEFAULT_QUEUE_LEN, DEFAULT_REPEAT_INTERVAL, DOUBLE_CLICK_INTERVAL, FILTER_WINDOW,
};
pub use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex, RawMutex};
#[cfg(feature = "pin")]
pub use input::PinSource;
pub use input::{FnSource, InputSource};
pub use keypad::{Keypad, ScanStats};
pub use queue::{EventQueue, QueueError, RingQueue};
pub use registry::{Registry, RegistryError};
pub use types::{
    ButtonEvent, ButtonHandle, GestureKind, GestureMask, GestureState, SourceId,
};
