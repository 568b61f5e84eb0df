//! Power rails of the board
//!
//! The board switches three supplies through GPIO enable lines: the 3.3V rail, the RGB LED rail
//! and the backlight rail. All of them are held off at boot, other parts of the firmware turn
//! them on when needed.

use core::fmt;

use embedded_hal::digital::OutputPin;

use crate::driver::gpio::OutputController;

/// GPIO-switched supplies on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rail {
    /// 3.3V rail, `EN_3V3` on P1.00
    V3v3,
    /// RGB LED rail, `EN_RGB` on P1.03
    Rgb,
    /// Backlight rail, `EN_BL` on P0.20
    Backlight,
}

impl fmt::Display for Rail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rail::V3v3 => write!(f, "3V3"),
            Rail::Rgb => write!(f, "RGB"),
            Rail::Backlight => write!(f, "BL"),
        }
    }
}

/// Errors of the rail enable lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RailError {
    /// The enable pin of the rail could not be driven
    Gpio(Rail),
}

impl fmt::Display for RailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RailError::Gpio(rail) => write!(f, "failed to drive {} enable pin", rail),
        }
    }
}

impl core::error::Error for RailError {}

/// Last commanded level of each rail, `None` if the rail was never driven
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RailState {
    pub en_3v3: Option<bool>,
    pub en_rgb: Option<bool>,
    pub en_bl: Option<bool>,
}

/// Owner of the three rail enable pins.
///
/// The pins are handed over already configured as push-pull outputs, so each of them is
/// configured exactly once and can't be reconfigured while the rails own it.
pub struct PowerRails<P3, PR, PB>
where
    P3: OutputPin,
    PR: OutputPin,
    PB: OutputPin,
{
    en_3v3: OutputController<P3>,
    en_rgb: OutputController<PR>,
    en_bl: OutputController<PB>,
}

impl<P3: OutputPin, PR: OutputPin, PB: OutputPin> PowerRails<P3, PR, PB> {
    pub fn new(en_3v3: P3, en_rgb: PR, en_bl: PB) -> Self {
        Self {
            en_3v3: OutputController::new(en_3v3, false),
            en_rgb: OutputController::new(en_rgb, false),
            en_bl: OutputController::new(en_bl, false),
        }
    }

    /// Boot hook: disable all rails.
    ///
    /// Every rail is attempted even if an earlier one fails, the first error is returned.
    pub fn init(&mut self) -> Result<(), RailError> {
        let results = [self.set_3v3_en(false), self.set_rgb_en(false), self.set_bl_en(false)];
        match results.into_iter().find_map(Result::err) {
            Some(e) => Err(e),
            None => {
                info!("Power rails initialized, all disabled");
                Ok(())
            }
        }
    }

    pub fn set_3v3_en(&mut self, en: bool) -> Result<(), RailError> {
        set_rail(&mut self.en_3v3, Rail::V3v3, en)
    }

    pub fn set_rgb_en(&mut self, en: bool) -> Result<(), RailError> {
        set_rail(&mut self.en_rgb, Rail::Rgb, en)
    }

    pub fn set_bl_en(&mut self, en: bool) -> Result<(), RailError> {
        set_rail(&mut self.en_bl, Rail::Backlight, en)
    }

    pub fn state(&self) -> RailState {
        RailState {
            en_3v3: self.en_3v3.is_active(),
            en_rgb: self.en_rgb.is_active(),
            en_bl: self.en_bl.is_active(),
        }
    }

    /// Give the enable pins back, in `(3V3, RGB, BL)` order
    pub fn release(self) -> (P3, PR, PB) {
        (self.en_3v3.release(), self.en_rgb.release(), self.en_bl.release())
    }
}

fn set_rail<P: OutputPin>(pin: &mut OutputController<P>, rail: Rail, en: bool) -> Result<(), RailError> {
    match pin.set_active(en) {
        Ok(()) => {
            debug!("{:?} rail enable: {}", rail, en);
            Ok(())
        }
        Err(_) => {
            error!("Failed to set {:?} rail enable to {}", rail, en);
            Err(RailError::Gpio(rail))
        }
    }
}
