//! USB connection events

use crate::controller_event;
use crate::usb::UsbConnState;

/// USB connection state changed event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsbConnStateChangedEvent {
    pub conn_state: UsbConnState,
}

controller_event!(UsbConnStateChangedEvent, channel_size = 4, subs = 2, pubs = 1);
