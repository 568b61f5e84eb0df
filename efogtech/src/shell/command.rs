use core::fmt::Write;

use heapless::Vec;

use super::ShellError;
use crate::config::FirmwareVersion;
use crate::endpoint::{EndpointSelector, Transport};

/// Maximum number of words in a command line
const MAX_ARGS: usize = 8;

const BOARD_HELP: &str = "Control the device";
const OUTPUT_USAGE: &str = "Usage: board output [usb|ble]";

/// Subcommands of `board`, with their help text
const BOARD_SUBCOMMANDS: [(&str, &str); 2] = [
    ("output", "Get or set output channel (USB/BLE)"),
    ("version", "Read firmware version"),
];

/// Root commands, with their help text
const ROOT_COMMANDS: [(&str, &str); 2] = [("board", BOARD_HELP), ("help", "Prints the help message.")];

/// Write one line of shell output, terminated with `\r\n`
macro_rules! shell_println {
    ($out:expr, $($arg:tt)*) => {{
        $out.write_fmt(format_args!($($arg)*))?;
        $out.write_str("\r\n")?;
    }};
}

/// The `board` command group, bound to an endpoint selector and a firmware version
pub struct BoardCommands<E: EndpointSelector> {
    endpoints: E,
    version: FirmwareVersion,
}

impl<E: EndpointSelector> BoardCommands<E> {
    pub fn new(endpoints: E, version: FirmwareVersion) -> Self {
        Self { endpoints, version }
    }

    pub fn endpoints(&self) -> &E {
        &self.endpoints
    }

    /// Execute a command line, writing its output to `out`.
    ///
    /// Empty lines are accepted and do nothing.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<(), ShellError> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(());
        };
        let mut args: Vec<&str, MAX_ARGS> = Vec::new();
        for word in words {
            if args.push(word).is_err() {
                shell_println!(out, "{}: too many arguments", command);
                return Err(ShellError::InvalidArgument);
            }
        }

        match command {
            "board" => self.board(&args, out),
            "help" => {
                print_root_help(out)?;
                Ok(())
            }
            other => {
                shell_println!(out, "{}: command not found", other);
                Err(ShellError::UnknownCommand)
            }
        }
    }

    fn board<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<(), ShellError> {
        match args.split_first() {
            None | Some((&("help" | "-h" | "--help"), _)) => {
                print_board_help(out)?;
                Ok(())
            }
            Some((&"version", rest)) => {
                if !rest.is_empty() {
                    shell_println!(out, "Usage: board version");
                    return Err(ShellError::InvalidArgument);
                }
                self.cmd_version(out)
            }
            Some((&"output", rest)) => self.cmd_output(rest, out),
            Some((other, _)) => {
                shell_println!(out, "{}: command not found", other);
                Err(ShellError::UnknownCommand)
            }
        }
    }

    /// `board version`
    fn cmd_version<W: Write>(&self, out: &mut W) -> Result<(), ShellError> {
        shell_println!(out, "Firmware version: {}", self.version);
        Ok(())
    }

    /// `board output [usb|ble]`
    fn cmd_output<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<(), ShellError> {
        let transport = match args {
            [] => {
                shell_println!(out, "Output: {}", self.endpoints.selected_transport());
                return Ok(());
            }
            [name] => match name.parse::<Transport>() {
                Ok(transport) => transport,
                Err(_) => {
                    shell_println!(out, "{}", OUTPUT_USAGE);
                    return Err(ShellError::InvalidArgument);
                }
            },
            _ => {
                shell_println!(out, "{}", OUTPUT_USAGE);
                return Err(ShellError::InvalidArgument);
            }
        };

        if let Err(e) = self.endpoints.select_transport(transport) {
            error!("Failed to select transport {:?}", transport);
            shell_println!(out, "Failed to select output: {:?}", e);
            return Err(ShellError::Endpoint);
        }
        shell_println!(out, "Done.");
        Ok(())
    }
}

fn print_board_help<W: Write>(out: &mut W) -> Result<(), ShellError> {
    shell_println!(out, "board - {}", BOARD_HELP);
    shell_println!(out, "Subcommands:");
    for (name, help) in BOARD_SUBCOMMANDS {
        shell_println!(out, "  {:<8}: {}", name, help);
    }
    Ok(())
}

fn print_root_help<W: Write>(out: &mut W) -> Result<(), ShellError> {
    shell_println!(out, "Available commands:");
    for (name, help) in ROOT_COMMANDS {
        shell_println!(out, "  {:<6}: {}", name, help);
    }
    Ok(())
}
