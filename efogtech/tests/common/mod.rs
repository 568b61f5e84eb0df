#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use efogtech::endpoint::{EndpointSelector, Transport};
use efogtech::pm::{PmAction, PowerManaged};
use embedded_io_async::{ErrorKind, ErrorType, Read, Write};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Power managed device which records every action it runs
#[derive(Clone, Default)]
pub struct MockUart {
    pub actions: Rc<RefCell<Vec<PmAction>>>,
    pub fail: bool,
}

impl MockUart {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn take_actions(&self) -> Vec<PmAction> {
        self.actions.borrow_mut().drain(..).collect()
    }
}

#[derive(Debug, PartialEq)]
pub struct MockPmError;

impl PowerManaged for MockUart {
    type Error = MockPmError;

    fn pm_action(&mut self, action: PmAction) -> Result<(), Self::Error> {
        self.actions.borrow_mut().push(action);
        if self.fail { Err(MockPmError) } else { Ok(()) }
    }
}

/// Endpoint selector which counts selection requests
#[derive(Default)]
pub struct RecordingSelector {
    pub transport: Transport,
    pub selects: Vec<Transport>,
    pub reject: bool,
}

#[derive(Debug)]
pub struct SelectRejected;

impl EndpointSelector for RecordingSelector {
    type Error = SelectRejected;

    fn selected_transport(&self) -> Transport {
        self.transport
    }

    fn select_transport(&mut self, transport: Transport) -> Result<(), Self::Error> {
        self.selects.push(transport);
        if self.reject {
            return Err(SelectRejected);
        }
        self.transport = transport;
        Ok(())
    }
}

/// In-memory serial port: reads come from `input`, writes go to `output`
pub struct MockSerial {
    input: Vec<u8>,
    pos: usize,
    chunk: usize,
    pub output: Vec<u8>,
    pub flushes: usize,
    pub fail_read: bool,
}

impl MockSerial {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.to_vec(),
            pos: 0,
            chunk: 3,
            output: Vec::new(),
            flushes: 0,
            fail_read: false,
        }
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

#[derive(Debug)]
pub struct MockSerialError;

impl core::fmt::Display for MockSerialError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "MockSerial read error")
    }
}

impl core::error::Error for MockSerialError {}

impl embedded_io_async::Error for MockSerialError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl Read for MockSerial {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.pos >= self.input.len() && self.fail_read {
            return Err(MockSerialError);
        }
        // Deliver a few bytes at a time, like a UART would
        let n = buf.len().min(self.chunk).min(self.input.len() - self.pos);
        buf[..n].copy_from_slice(&self.input[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for MockSerial {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}
