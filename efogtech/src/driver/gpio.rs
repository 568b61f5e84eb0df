use embedded_hal::digital::{OutputPin, PinState};

/// The gpio driver is a wrapper for the embedded-hal digital output pin trait.
/// It wraps the low-active and high-active pins, and remembers the last level it drove.
pub(crate) struct OutputController<P: OutputPin> {
    pin: P,
    low_active: bool,
    active: Option<bool>,
}

impl<P: OutputPin> OutputController<P> {
    /// Create a new OutputController instance
    pub fn new(pin: P, low_active: bool) -> Self {
        Self {
            pin,
            low_active,
            active: None,
        }
    }

    /// Drive the pin to its active or inactive level
    pub fn set_active(&mut self, active: bool) -> Result<(), P::Error> {
        let state = PinState::from(active != self.low_active);
        self.pin.set_state(state)?;
        self.active = Some(active);
        Ok(())
    }

    /// The last level written successfully, `None` if the pin was never driven
    pub fn is_active(&self) -> Option<bool> {
        self.active
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}
