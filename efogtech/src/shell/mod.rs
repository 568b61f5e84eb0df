//! The `board` shell command group
//!
//! ```text
//! board version          Read firmware version
//! board output           Print the active output transport
//! board output usb|ble   Select the output transport
//! ```
//!
//! [`BoardCommands`] executes single command lines and writes the output into any
//! [`core::fmt::Write`]. [`ShellSession`] runs an interactive line-editing session on top of it over
//! an `embedded-io-async` serial port.

mod command;
mod session;

use core::fmt;

pub use command::BoardCommands;
pub use session::ShellSession;

/// Errors of shell commands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShellError {
    /// Wrong argument value or count, nothing was changed
    InvalidArgument,
    /// No such command or subcommand
    UnknownCommand,
    /// The command line didn't fit in the line buffer
    LineTooLong,
    /// The endpoint selector rejected the request
    Endpoint,
    /// Writing the output or reading the input failed
    Io,
}

impl ShellError {
    /// Status code of the error, as a negative errno value
    pub const fn code(&self) -> i32 {
        match self {
            ShellError::InvalidArgument => -22,
            ShellError::UnknownCommand => -8,
            ShellError::LineTooLong => -7,
            ShellError::Endpoint => -5,
            ShellError::Io => -5,
        }
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::InvalidArgument => write!(f, "invalid argument"),
            ShellError::UnknownCommand => write!(f, "command not found"),
            ShellError::LineTooLong => write!(f, "line too long"),
            ShellError::Endpoint => write!(f, "endpoint selection failed"),
            ShellError::Io => write!(f, "I/O error"),
        }
    }
}

impl core::error::Error for ShellError {}

impl From<fmt::Error> for ShellError {
    fn from(_: fmt::Error) -> Self {
        ShellError::Io
    }
}
