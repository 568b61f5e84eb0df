use std::path::Path;
use std::{env, fs};

use const_gen::*;
use serde::Deserialize;

#[derive(Deserialize, Default)]
#[serde(default)]
struct BoardToml {
    firmware: FirmwareToml,
    shell: ShellToml,
}

#[derive(Deserialize)]
#[serde(default)]
struct FirmwareToml {
    major: u8,
    minor: u8,
    patch: u8,
}

impl Default for FirmwareToml {
    fn default() -> Self {
        // Fall back to the crate version
        Self {
            major: pkg_version("CARGO_PKG_VERSION_MAJOR"),
            minor: pkg_version("CARGO_PKG_VERSION_MINOR"),
            patch: pkg_version("CARGO_PKG_VERSION_PATCH"),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct ShellToml {
    prompt: String,
    line_size: usize,
}

impl Default for ShellToml {
    fn default() -> Self {
        Self {
            prompt: "uart:~$ ".to_string(),
            line_size: 64,
        }
    }
}

fn pkg_version(key: &str) -> u8 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=board.toml");
    println!("cargo:rerun-if-env-changed=BOARD_TOML_PATH");

    // Read board.toml, or the file given by BOARD_TOML_PATH
    let toml_path = env::var("BOARD_TOML_PATH").unwrap_or_else(|_| "board.toml".to_string());
    println!("cargo:rerun-if-changed={toml_path}");
    let board_config_str = fs::read_to_string(&toml_path).unwrap_or_default();

    let board_toml: BoardToml = toml::from_str(&board_config_str).expect("Failed to parse board config file\n");
    if board_toml.shell.line_size < 8 {
        panic!("shell.line_size must be at least 8, got {}", board_toml.shell.line_size);
    }

    let constants = get_constants_str(&board_toml);

    // Write to constants.rs file
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("constants.rs");
    fs::write(&dest_path, constants).expect("Failed to write constants.rs file");
}

fn get_constants_str(board: &BoardToml) -> String {
    let constant_strs = vec![
        const_declaration!(pub(crate) FIRMWARE_VERSION_MAJOR = board.firmware.major),
        const_declaration!(pub(crate) FIRMWARE_VERSION_MINOR = board.firmware.minor),
        const_declaration!(pub(crate) FIRMWARE_VERSION_PATCH = board.firmware.patch),
        const_declaration!(#[allow(dead_code)] pub(crate) SHELL_PROMPT = board.shell.prompt),
        const_declaration!(#[allow(dead_code)] pub(crate) SHELL_LINE_SIZE = board.shell.line_size),
    ];
    constant_strs.join("\n")
}
