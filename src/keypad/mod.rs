//! Scan engine context: owns the registered buttons and feeds the event queue.

use alloc::boxed::Box;

use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};

use crate::button::{Button, ButtonSnapshot};
use crate::config::{ButtonOptions, ScanTiming, DEFAULT_MAX_BUTTONS};
use crate::input::InputSource;
use crate::queue::EventQueue;
use crate::registry::{Registry, RegistryError};
use crate::types::{ButtonEvent, ButtonHandle};

/// Counters since construction. All saturate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub ticks: u32,
    pub emitted: u32,
    /// Events lost because the queue was full.
    pub dropped: u32,
}

/// Registered buttons plus the queue their events go to.
///
/// `scan` must be driven from a single periodic context and must not overlap
/// `register`/`unregister`; holding the keypad by `&mut` enforces that. The
/// queue is shared by reference so the consumer can drain it from elsewhere,
/// under whatever lock `M` provides.
pub struct Keypad<'a, M: RawMutex = NoopRawMutex, const N: usize = { DEFAULT_MAX_BUTTONS }> {
    registry: Registry<'a, N>,
    queue: &'a EventQueue<M, ButtonEvent>,
    timing: ScanTiming,
    stats: ScanStats,
}

impl<'a, M: RawMutex, const N: usize> Keypad<'a, M, N> {
    pub fn new(queue: &'a EventQueue<M, ButtonEvent>) -> Self {
        Self::with_timing(queue, ScanTiming::default())
    }

    pub fn with_timing(queue: &'a EventQueue<M, ButtonEvent>, timing: ScanTiming) -> Self {
        Self {
            registry: Registry::new(),
            queue,
            timing,
            stats: ScanStats::default(),
        }
    }

    /// Registers a button. Fails if the same [`SourceId`](crate::SourceId)
    /// is already live or every slot is taken.
    ///
    /// The source is boxed on the global allocator, and an allocation
    /// failure there aborts through the allocation error handler instead of
    /// returning an error. Size the heap for `N` sources up front when that
    /// matters. A full slot table is reported as [`RegistryError::Full`].
    pub fn register(
        &mut self,
        source: impl InputSource + 'a,
        options: ButtonOptions,
    ) -> Result<ButtonHandle, RegistryError> {
        let source_id = source.source_id();
        let handle = self
            .registry
            .insert(Button::new(Box::new(source), options))?;
        log::debug!(
            "keypad: registered {} source={} mode={:?}",
            handle,
            source_id,
            options.mode
        );
        Ok(handle)
    }

    pub fn unregister(&mut self, handle: ButtonHandle) -> Result<(), RegistryError> {
        let button = self.registry.remove(handle)?;
        log::debug!(
            "keypad: unregistered {} source={}",
            handle,
            button.source_id()
        );
        Ok(())
    }

    /// One tick. `tick_interval` is the time since the previous scan, in the
    /// same unit as the configured windows and thresholds.
    pub fn scan(&mut self, tick_interval: u32) {
        self.stats.ticks = self.stats.ticks.saturating_add(1);
        let timing = self.timing;
        for (handle, button) in self.registry.iter_mut() {
            let Some(gesture) = button.scan(tick_interval, &timing) else {
                continue;
            };
            let event = ButtonEvent::new(handle, gesture.kind, gesture.click_count);
            match self.queue.push(event) {
                Ok(()) => self.stats.emitted = self.stats.emitted.saturating_add(1),
                Err(err) => {
                    self.stats.dropped = self.stats.dropped.saturating_add(1);
                    log::warn!(
                        "keypad: dropped {} kind={} count={} err={}",
                        handle,
                        event.kind,
                        event.click_count,
                        err
                    );
                }
            }
        }
    }

    pub fn read_event(&self) -> Option<ButtonEvent> {
        self.queue.read_event()
    }

    pub fn peek_event(&self) -> Option<ButtonEvent> {
        self.queue.peek_event()
    }

    pub fn queue(&self) -> &'a EventQueue<M, ButtonEvent> {
        self.queue
    }

    pub fn timing(&self) -> ScanTiming {
        self.timing
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn registry(&self) -> &Registry<'a, N> {
        &self.registry
    }

    pub fn snapshot(&self, handle: ButtonHandle) -> Option<ButtonSnapshot> {
        self.registry.snapshot(handle)
    }

    pub fn buttons(&self) -> impl Iterator<Item = ButtonSnapshot> + '_ {
        self.registry.snapshots()
    }

    pub fn log_buttons(&self) {
        if self.registry.is_empty() {
            log::info!("keypad: no buttons");
            return;
        }
        for button in self.buttons() {
            log::info!(
                "keypad: {} source={} mode={:?} repeat={} long={} state={:?} level={} clicks={}",
                button.handle,
                button.source_id,
                button.mode,
                button.repeat_interval,
                button.long_press_threshold,
                button.gesture_state,
                button.debounced_level,
                button.click_count
            );
        }
    }
}

#[cfg(test)]
mod tests;
