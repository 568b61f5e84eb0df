//! Endpoint selection events

use crate::controller_event;
use crate::endpoint::Transport;

/// Active output transport changed event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportChangedEvent {
    pub transport: Transport,
}

controller_event!(TransportChangedEvent, channel_size = 4, subs = 2, pubs = 1);
