use core::fmt;

use crate::{FIRMWARE_VERSION_MAJOR, FIRMWARE_VERSION_MINOR, FIRMWARE_VERSION_PATCH, SHELL_PROMPT};

/// The config struct for the board.
///
/// The default values come from `board.toml`, which is compiled in by the build script.
/// Fields can be overridden at runtime before the config is handed to [`crate::board::Board`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardConfig<'a> {
    pub version: FirmwareVersion,
    pub shell: ShellConfig<'a>,
}

impl Default for BoardConfig<'_> {
    fn default() -> Self {
        Self {
            version: FirmwareVersion::CURRENT,
            shell: ShellConfig::default(),
        }
    }
}

/// Config for the serial shell session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShellConfig<'a> {
    /// Prompt printed before each command line
    pub prompt: &'a str,
}

impl Default for ShellConfig<'_> {
    fn default() -> Self {
        Self { prompt: SHELL_PROMPT }
    }
}

/// Three-part firmware version
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl FirmwareVersion {
    /// Version compiled in from the board config
    pub const CURRENT: Self = Self::new(FIRMWARE_VERSION_MAJOR, FIRMWARE_VERSION_MINOR, FIRMWARE_VERSION_PATCH);

    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self { major, minor, patch }
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
