//! Output endpoint selection
//!
//! Tracks which transport carries outgoing input reports.

use core::fmt;
use core::str::FromStr;
use core::sync::atomic::{AtomicU8, Ordering};

use crate::event::{TransportChangedEvent, publish_controller_event};

/// Output transport of input reports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transport {
    #[default]
    Usb,
    Ble,
}

impl From<u8> for Transport {
    fn from(value: u8) -> Self {
        match value {
            0 => Transport::Usb,
            1 => Transport::Ble,
            _ => Transport::Usb,
        }
    }
}

impl From<Transport> for u8 {
    fn from(value: Transport) -> Self {
        match value {
            Transport::Usb => 0,
            Transport::Ble => 1,
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Usb => write!(f, "USB"),
            Transport::Ble => write!(f, "BLE"),
        }
    }
}

/// Error of parsing a transport name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseTransportError;

impl fmt::Display for ParseTransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transport, expected `usb` or `ble`")
    }
}

impl core::error::Error for ParseTransportError {}

impl FromStr for Transport {
    type Err = ParseTransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "usb" => Ok(Transport::Usb),
            "ble" => Ok(Transport::Ble),
            _ => Err(ParseTransportError),
        }
    }
}

/// Query and select the active output transport.
///
/// `select_transport` is a single, complete operation: either the new transport is active
/// afterwards or nothing changed.
pub trait EndpointSelector {
    type Error: fmt::Debug;

    fn selected_transport(&self) -> Transport;

    fn select_transport(&mut self, transport: Transport) -> Result<(), Self::Error>;
}

impl<T: EndpointSelector + ?Sized> EndpointSelector for &mut T {
    type Error = T::Error;

    fn selected_transport(&self) -> Transport {
        T::selected_transport(self)
    }

    fn select_transport(&mut self, transport: Transport) -> Result<(), Self::Error> {
        T::select_transport(self, transport)
    }
}

/// Default endpoint state used by the firmware
pub static ENDPOINTS: Endpoints = Endpoints::new();

/// Lock-free endpoint state.
///
/// Selecting a different transport publishes a [`TransportChangedEvent`].
pub struct Endpoints {
    transport: AtomicU8,
}

impl Endpoints {
    pub const fn new() -> Self {
        Self {
            transport: AtomicU8::new(0),
        }
    }

    pub fn transport(&self) -> Transport {
        Transport::from(self.transport.load(Ordering::Acquire))
    }

    /// Make `transport` the active one. Returns whether it changed.
    pub fn set_transport(&self, transport: Transport) -> bool {
        let previous = Transport::from(self.transport.swap(transport.into(), Ordering::AcqRel));
        if previous == transport {
            debug!("Transport {:?} already selected", transport);
            return false;
        }
        info!("Transport changed: {:?} -> {:?}", previous, transport);
        publish_controller_event(TransportChangedEvent { transport });
        true
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointSelector for &Endpoints {
    type Error = core::convert::Infallible;

    fn selected_transport(&self) -> Transport {
        self.transport()
    }

    fn select_transport(&mut self, transport: Transport) -> Result<(), Self::Error> {
        self.set_transport(transport);
        Ok(())
    }
}
