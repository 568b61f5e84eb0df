//! Board support for the efogtech trackball controller.
//!
//! The crate holds the board-level wiring of the firmware:
//!
//! - [`power_rail`]: the 3.3V, RGB and backlight rail enable pins, all disabled at boot
//! - [`shell`]: the `board` shell command group, reading the firmware version and selecting the
//!   output transport
//! - [`usb`]: USB connection tracking and the UART power reactor
//!
//! [`board::Board`] owns the device handles and wires them together.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod board;
pub mod config;
pub mod controller;
pub(crate) mod driver;
pub mod endpoint;
pub mod event;
pub mod pm;
pub mod power_rail;
#[cfg(feature = "shell")]
pub mod shell;
#[cfg(feature = "usb")]
pub mod usb;

pub use board::Board;
pub use config::{BoardConfig, FirmwareVersion};
pub use endpoint::{ENDPOINTS, EndpointSelector, Endpoints, Transport};
pub use pm::{PmAction, PowerManaged, PowerState};
pub use power_rail::{PowerRails, Rail, RailError};
#[cfg(feature = "usb")]
pub use usb::{USB_STATUS, UartPowerController, UsbConnHandler, UsbConnState, UsbStatus};

#[doc(hidden)]
pub use paste as __paste;

// Include generated constants
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

/// Mutex type used by all channels of the board
pub type RawMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
