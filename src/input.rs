use crate::types::SourceId;

/// Raw electrical state of one button.
///
/// `is_active` is read once per scan tick and must report the instantaneous,
/// undebounced level. `source_id` must stay the same for the life of the
/// source; the registry uses it to refuse a second registration.
pub trait InputSource {
    fn source_id(&self) -> SourceId;

    fn is_active(&mut self) -> bool;
}

/// Closure-backed source.
pub struct FnSource<F> {
    id: SourceId,
    read: F,
}

impl<F: FnMut() -> bool> FnSource<F> {
    pub fn new(id: SourceId, read: F) -> Self {
        Self { id, read }
    }
}

impl<F: FnMut() -> bool> InputSource for FnSource<F> {
    fn source_id(&self) -> SourceId {
        self.id
    }

    fn is_active(&mut self) -> bool {
        (self.read)()
    }
}

#[cfg(feature = "pin")]
pub use pin::PinSource;

#[cfg(feature = "pin")]
mod pin {
    use embedded_hal::digital::InputPin;

    use super::InputSource;
    use crate::types::SourceId;

    /// GPIO-backed source. A failed read counts as released.
    pub struct PinSource<P> {
        id: SourceId,
        pin: P,
        active_low: bool,
    }

    impl<P: InputPin> PinSource<P> {
        /// Pressed pulls the line low (pull-up wiring).
        pub fn active_low(id: SourceId, pin: P) -> Self {
            Self {
                id,
                pin,
                active_low: true,
            }
        }

        pub fn active_high(id: SourceId, pin: P) -> Self {
            Self {
                id,
                pin,
                active_low: false,
            }
        }

        pub fn release(self) -> P {
            self.pin
        }
    }

    impl<P: InputPin> InputSource for PinSource<P> {
        fn source_id(&self) -> SourceId {
            self.id
        }

        fn is_active(&mut self) -> bool {
            let level = if self.active_low {
                self.pin.is_low()
            } else {
                self.pin.is_high()
            };
            match level {
                Ok(active) => active,
                Err(err) => {
                    log::warn!("input: {} read_error={:?}", self.id, err);
                    false
                }
            }
        }
    }

}
