//! USB connection tracking and the UART power reactor
//!
//! The UART is only powered while the board has an application-ready USB connection.
//! [`UsbConnHandler`] turns USB device callbacks into a [`UsbConnState`], [`UsbStatus`] publishes a
//! [`UsbConnStateChangedEvent`] whenever that state changes, and [`UartPowerController`] resumes or
//! suspends the UART in response.

use core::sync::atomic::{AtomicU8, Ordering};

use embassy_usb::Handler;

use crate::controller::Controller;
use crate::event::{UsbConnStateChangedEvent, publish_controller_event};
use crate::pm::{PmAction, PowerManaged, PowerState};

/// USB connection state
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbConnState {
    // Disconnected
    #[default]
    None = 0x0,
    // VBUS present, but NOT ready for HID reports
    Powered = 0x1,
    // Configured, ready to send HID reports
    Hid = 0x2,
}

impl From<u8> for UsbConnState {
    fn from(state: u8) -> Self {
        match state {
            0 => UsbConnState::None,
            1 => UsbConnState::Powered,
            2 => UsbConnState::Hid,
            _ => UsbConnState::None,
        }
    }
}

/// Default USB status used by the firmware
pub static USB_STATUS: UsbStatus = UsbStatus::new();

/// Current USB connection state.
///
/// All instances publish on the same [`UsbConnStateChangedEvent`] channel, so a firmware keeps a
/// single live status, [`USB_STATUS`]. A [`UartPowerController`] reacts to changes of every
/// status, and reads the state of its own.
pub struct UsbStatus {
    state: AtomicU8,
}

impl UsbStatus {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(UsbConnState::None as u8),
        }
    }

    pub fn conn_state(&self) -> UsbConnState {
        UsbConnState::from(self.state.load(Ordering::Acquire))
    }

    /// Whether the connection is ready for HID reports
    pub fn is_hid_ready(&self) -> bool {
        self.conn_state() == UsbConnState::Hid
    }

    /// Record a new connection state.
    ///
    /// Publishes a [`UsbConnStateChangedEvent`] and returns `true` when the state changed.
    pub fn update(&self, conn_state: UsbConnState) -> bool {
        let previous = UsbConnState::from(self.state.swap(conn_state as u8, Ordering::AcqRel));
        if previous == conn_state {
            return false;
        }
        info!("USB connection state: {:?} -> {:?}", previous, conn_state);
        publish_controller_event(UsbConnStateChangedEvent { conn_state });
        true
    }
}

impl Default for UsbStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// USB device handler which keeps a [`UsbStatus`] up to date.
///
/// Register it with `embassy_usb::Builder::handler`.
pub struct UsbConnHandler<'a> {
    status: &'a UsbStatus,
    configured: bool,
}

impl<'a> UsbConnHandler<'a> {
    pub fn new(status: &'a UsbStatus) -> Self {
        Self {
            status,
            configured: false,
        }
    }
}

impl Handler for UsbConnHandler<'_> {
    fn enabled(&mut self, enabled: bool) {
        if enabled {
            info!("USB device enabled");
            self.status.update(UsbConnState::Powered);
        } else {
            info!("USB device disabled");
            self.configured = false;
            self.status.update(UsbConnState::None);
        }
    }

    fn reset(&mut self) {
        info!("USB bus reset");
        self.configured = false;
        self.status.update(UsbConnState::Powered);
    }

    fn addressed(&mut self, addr: u8) {
        debug!("USB address set to: {}", addr);
    }

    fn configured(&mut self, configured: bool) {
        self.configured = configured;
        if configured {
            info!("USB device configured");
            self.status.update(UsbConnState::Hid);
        } else {
            info!("USB device is no longer configured");
            self.status.update(UsbConnState::Powered);
        }
    }

    // A suspended device keeps its configuration, so it stays HID-ready
    fn suspended(&mut self, suspended: bool) {
        if suspended {
            info!("USB device suspended");
        } else {
            info!("USB device resumed");
        }
        let conn_state = if self.configured {
            UsbConnState::Hid
        } else {
            UsbConnState::Powered
        };
        self.status.update(conn_state);
    }
}

/// Keeps the UART powered only while USB is ready for HID reports.
///
/// Every [`UsbConnStateChangedEvent`] results in exactly one power management action on the UART:
/// resume when the current state is [`UsbConnState::Hid`], suspend otherwise. The state is read
/// from the [`UsbStatus`] when the event is handled, not taken from the event.
pub struct UartPowerController<'a, D: PowerManaged> {
    uart: D,
    status: &'a UsbStatus,
    power_state: Option<PowerState>,
}

impl<'a, D: PowerManaged> UartPowerController<'a, D> {
    pub fn new(uart: D, status: &'a UsbStatus) -> Self {
        Self {
            uart,
            status,
            power_state: None,
        }
    }

    /// Apply the power state matching the current USB connection state, returns the action run.
    ///
    /// Power management failures are logged and otherwise ignored.
    pub fn sync_uart_power(&mut self) -> PmAction {
        let action = match self.status.conn_state() {
            UsbConnState::Hid => PmAction::Resume,
            UsbConnState::None | UsbConnState::Powered => PmAction::Suspend,
        };
        match self.uart.pm_action(action) {
            Ok(()) => debug!("UART power action {:?} done", action),
            Err(_) => warn!("UART power action {:?} failed", action),
        }
        self.power_state = Some(action.into());
        action
    }

    /// The last requested UART power state, `None` before the first event
    pub fn power_state(&self) -> Option<PowerState> {
        self.power_state
    }

    pub fn release(self) -> D {
        self.uart
    }
}

impl<D: PowerManaged> Controller for UartPowerController<'_, D> {
    type Event = UsbConnStateChangedEvent;

    async fn process_event(&mut self, event: Self::Event) {
        debug!("Received {:?}", event);
        self.sync_uart_power();
    }

    /// Dropped events still get their action, decided by the current state
    async fn process_missed(&mut self, missed: u64) {
        warn!("{} USB connection events dropped from the channel", missed);
        for _ in 0..missed {
            self.sync_uart_power();
        }
    }
}
