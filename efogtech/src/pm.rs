//! Device power management

/// Power management action requested from a device
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PmAction {
    /// Gate the device's power domain
    Suspend,
    /// Bring the device's power domain back up
    Resume,
}

/// Power state of a device's power domain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    Active,
    Suspended,
}

impl From<PmAction> for PowerState {
    fn from(action: PmAction) -> Self {
        match action {
            PmAction::Suspend => PowerState::Suspended,
            PmAction::Resume => PowerState::Active,
        }
    }
}

/// A peripheral whose power domain can be suspended and resumed independently of its
/// logical configuration.
pub trait PowerManaged {
    type Error;

    /// Run a power management action on the device
    fn pm_action(&mut self, action: PmAction) -> Result<(), Self::Error>;
}

impl<T: PowerManaged + ?Sized> PowerManaged for &mut T {
    type Error = T::Error;

    fn pm_action(&mut self, action: PmAction) -> Result<(), Self::Error> {
        T::pm_action(self, action)
    }
}
