mod common;
pub(crate) use crate::common::*;

mod shell_test {
    use efogtech::config::FirmwareVersion;
    use efogtech::endpoint::{Endpoints, Transport};
    use efogtech::shell::{BoardCommands, ShellError, ShellSession};
    use embassy_futures::block_on;

    use super::*;

    fn exec<E: efogtech::EndpointSelector>(commands: &mut BoardCommands<E>, line: &str) -> (Result<(), ShellError>, String) {
        let mut out = String::new();
        let result = commands.execute(line, &mut out);
        (result, out)
    }

    #[test]
    fn test_output_query_never_selects() {
        let mut commands = BoardCommands::new(RecordingSelector::default(), FirmwareVersion::new(1, 0, 0));
        assert_eq!(exec(&mut commands, "board output"), (Ok(()), "Output: USB\r\n".to_string()));
        assert_eq!(exec(&mut commands, "board output"), (Ok(()), "Output: USB\r\n".to_string()));
        assert!(commands.endpoints().selects.is_empty());
    }

    #[test]
    fn test_output_select_round_trip() {
        let endpoints = Endpoints::new();
        let mut commands = BoardCommands::new(&endpoints, FirmwareVersion::new(1, 0, 0));

        assert_eq!(exec(&mut commands, "board output ble"), (Ok(()), "Done.\r\n".to_string()));
        assert_eq!(exec(&mut commands, "board output"), (Ok(()), "Output: BLE\r\n".to_string()));
        assert_eq!(endpoints.transport(), Transport::Ble);

        assert_eq!(exec(&mut commands, "board output usb"), (Ok(()), "Done.\r\n".to_string()));
        assert_eq!(exec(&mut commands, "board output"), (Ok(()), "Output: USB\r\n".to_string()));
        assert_eq!(endpoints.transport(), Transport::Usb);
    }

    #[test]
    fn test_output_select_calls_selector_once() {
        let mut commands = BoardCommands::new(RecordingSelector::default(), FirmwareVersion::new(1, 0, 0));
        exec(&mut commands, "board output ble").0.unwrap();
        assert_eq!(commands.endpoints().selects, vec![Transport::Ble]);
    }

    #[test]
    fn test_output_invalid_argument() {
        let mut commands = BoardCommands::new(
            RecordingSelector {
                transport: Transport::Ble,
                ..Default::default()
            },
            FirmwareVersion::new(1, 0, 0),
        );

        for line in ["board output foo", "board output USB", "board output usb ble"] {
            let (result, out) = exec(&mut commands, line);
            assert_eq!(result, Err(ShellError::InvalidArgument), "line: {line}");
            assert_eq!(out, "Usage: board output [usb|ble]\r\n");
        }
        assert_eq!(ShellError::InvalidArgument.code(), -22);
        // Nothing was selected, the previous transport is still active
        assert!(commands.endpoints().selects.is_empty());
        assert_eq!(exec(&mut commands, "board output").1, "Output: BLE\r\n");
    }

    #[test]
    fn test_output_selector_failure() {
        let mut commands = BoardCommands::new(
            RecordingSelector {
                reject: true,
                ..Default::default()
            },
            FirmwareVersion::new(1, 0, 0),
        );
        let (result, out) = exec(&mut commands, "board output ble");
        assert_eq!(result, Err(ShellError::Endpoint));
        assert_eq!(out, "Failed to select output: SelectRejected\r\n");
        assert_eq!(commands.endpoints().transport, Transport::Usb);
    }

    #[test]
    fn test_version_matches_compiled_version() {
        let version = FirmwareVersion::CURRENT;
        let mut commands = BoardCommands::new(RecordingSelector::default(), version);
        let expected = format!(
            "Firmware version: {}.{}.{}\r\n",
            version.major, version.minor, version.patch
        );
        assert_eq!(exec(&mut commands, "board version"), (Ok(()), expected));
    }

    #[test]
    fn test_session_executes_lines() {
        let commands = BoardCommands::new(RecordingSelector::default(), FirmwareVersion::new(2, 1, 0));
        let mut session: ShellSession<_, _, 32> =
            ShellSession::new(MockSerial::new(b"board version\r\nboard output ble\nboard output\r"), commands, "> ");

        assert_eq!(block_on(session.run()), Ok(()));
        let out = session.release().output_str();
        assert_eq!(
            out,
            "> board version\r\nFirmware version: 2.1.0\r\n\
             > board output ble\r\nDone.\r\n\
             > board output\r\nOutput: BLE\r\n\
             > "
        );
    }

    #[test]
    fn test_session_line_editing() {
        let commands = BoardCommands::new(RecordingSelector::default(), FirmwareVersion::new(1, 0, 0));
        // Typo fixed with backspace and DEL, control characters are dropped
        let mut session: ShellSession<_, _, 32> =
            ShellSession::new(MockSerial::new(b"board outpx\x08ut bl\x1b\x7fle\r\n"), commands, "$ ");

        assert_eq!(block_on(session.run()), Ok(()));
        let out = session.release().output_str();
        assert!(out.contains("\x08 \x08"));
        assert!(out.ends_with("Done.\r\n$ "));
    }

    #[test]
    fn test_session_empty_line_and_errors_continue() {
        let commands = BoardCommands::new(RecordingSelector::default(), FirmwareVersion::new(1, 0, 0));
        let mut session: ShellSession<_, _, 32> =
            ShellSession::new(MockSerial::new(b"\r\nfoo\r\nboard output\r\n"), commands, "$ ");

        assert_eq!(block_on(session.run()), Ok(()));
        assert_eq!(
            session.release().output_str(),
            "$ \r\n$ foo\r\nfoo: command not found\r\n$ board output\r\nOutput: USB\r\n$ "
        );
    }

    #[test]
    fn test_session_discards_long_line() {
        let commands = BoardCommands::new(RecordingSelector::default(), FirmwareVersion::new(1, 0, 0));
        let mut session: ShellSession<_, _, 8> =
            ShellSession::new(MockSerial::new(b"board output ble\rboard\r"), commands, "$ ");

        assert_eq!(block_on(session.run()), Ok(()));
        let serial = session.release();
        let out = serial.output_str();
        assert!(out.contains("line too long\r\n"));
        // The next line fits and runs normally
        assert!(out.contains("board - Control the device\r\n"));
    }

    #[test]
    fn test_session_long_line_erased_under_limit() {
        let commands = BoardCommands::new(RecordingSelector::default(), FirmwareVersion::new(1, 0, 0));
        // 11 characters typed into an 8 byte line, then 7 erased: `help` is left
        let mut session: ShellSession<_, _, 8> =
            ShellSession::new(MockSerial::new(b"helpxxxxxxx\x08\x08\x08\x7f\x7f\x7f\x7f\r"), commands, "$ ");

        assert_eq!(block_on(session.run()), Ok(()));
        let out = session.release().output_str();
        assert!(!out.contains("line too long"));
        assert_eq!(out.matches("\x08 \x08").count(), 7);
        assert!(out.contains("Available commands:\r\n"));
    }

    #[test]
    fn test_session_flushes_output() {
        let commands = BoardCommands::new(RecordingSelector::default(), FirmwareVersion::new(1, 0, 0));
        let mut session: ShellSession<_, _, 32> = ShellSession::new(MockSerial::new(b"board\r"), commands, "$ ");

        assert_eq!(block_on(session.run()), Ok(()));
        let serial = session.release();
        assert!(serial.flushes > 0);
        assert!(serial.output_str().ends_with("$ "));
    }

    #[test]
    fn test_session_read_error() {
        let commands = BoardCommands::new(RecordingSelector::default(), FirmwareVersion::new(1, 0, 0));
        let mut serial = MockSerial::new(b"board\r");
        serial.fail_read = true;
        let mut session: ShellSession<_, _, 32> = ShellSession::new(serial, commands, "$ ");

        assert_eq!(block_on(session.run()), Err(ShellError::Io));
    }
}
