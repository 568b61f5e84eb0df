use embedded_io_async::{Read, Write};
use heapless::{String, Vec};

use super::{BoardCommands, ShellError};
use crate::SHELL_LINE_SIZE;
use crate::endpoint::EndpointSelector;

/// Size of the buffer holding the output of one command
const OUTPUT_BUF_SIZE: usize = 512;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;

/// Interactive shell session over a serial port.
///
/// Reads characters, echoes them back, and executes a line with [`BoardCommands`] when it's
/// terminated by `\r`, `\n` or `\r\n`. Backspace and DEL erase the last character. A line longer
/// than `LINE_SIZE` is discarded, unless it's erased back under the limit before it's terminated.
pub struct ShellSession<'a, T, E, const LINE_SIZE: usize = SHELL_LINE_SIZE>
where
    T: Read + Write,
    E: EndpointSelector,
{
    io: T,
    commands: BoardCommands<E>,
    prompt: &'a str,
    line: Vec<u8, LINE_SIZE>,
    // Characters typed past the end of `line`
    overflow: usize,
    last_cr: bool,
}

impl<'a, T: Read + Write, E: EndpointSelector, const LINE_SIZE: usize> ShellSession<'a, T, E, LINE_SIZE> {
    pub fn new(io: T, commands: BoardCommands<E>, prompt: &'a str) -> Self {
        Self {
            io,
            commands,
            prompt,
            line: Vec::new(),
            overflow: 0,
            last_cr: false,
        }
    }

    /// Run the session until the input ends.
    ///
    /// Returns `Ok(())` when the port reports end of input, `Err(ShellError::Io)` when it fails.
    /// Command failures don't end the session.
    pub async fn run(&mut self) -> Result<(), ShellError> {
        self.write_prompt().await?;
        let mut buf = [0u8; 16];
        loop {
            let n = match self.io.read(&mut buf).await {
                Ok(0) => {
                    info!("Shell input closed");
                    return Ok(());
                }
                Ok(n) => n,
                Err(_) => {
                    error!("Shell read error");
                    return Err(ShellError::Io);
                }
            };
            for &byte in &buf[..n] {
                self.process_byte(byte).await?;
            }
        }
    }

    /// Give the serial port back
    pub fn release(self) -> T {
        self.io
    }

    async fn process_byte(&mut self, byte: u8) -> Result<(), ShellError> {
        let last_cr = core::mem::replace(&mut self.last_cr, byte == b'\r');
        match byte {
            // Second half of `\r\n`
            b'\n' if last_cr => Ok(()),
            b'\r' | b'\n' => {
                self.write(b"\r\n").await?;
                self.end_of_line().await?;
                self.write_prompt().await
            }
            BACKSPACE | DELETE => {
                let erased = if self.overflow > 0 {
                    self.overflow -= 1;
                    true
                } else {
                    self.line.pop().is_some()
                };
                if erased {
                    self.write(b"\x08 \x08").await?;
                }
                Ok(())
            }
            0x20..=0x7e => {
                if self.line.push(byte).is_err() {
                    self.overflow += 1;
                }
                self.write(&[byte]).await
            }
            _ => Ok(()),
        }
    }

    async fn end_of_line(&mut self) -> Result<(), ShellError> {
        if core::mem::take(&mut self.overflow) > 0 {
            self.line.clear();
            warn!("Shell line longer than {} bytes discarded", LINE_SIZE);
            return self.write(b"line too long\r\n").await;
        }

        let mut output: String<OUTPUT_BUF_SIZE> = String::new();
        // The line only holds printable ASCII
        let result = match core::str::from_utf8(&self.line) {
            Ok(line) => self.commands.execute(line, &mut output),
            Err(_) => Err(ShellError::InvalidArgument),
        };
        self.line.clear();
        if let Err(e) = result {
            debug!("Shell command failed: {:?}, code {}", e, e.code());
        }
        self.write(output.as_bytes()).await
    }

    async fn write_prompt(&mut self) -> Result<(), ShellError> {
        let prompt = self.prompt;
        self.write(prompt.as_bytes()).await
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), ShellError> {
        self.io.write_all(data).await.map_err(|_| {
            error!("Shell write error");
            ShellError::Io
        })?;
        self.io.flush().await.map_err(|_| ShellError::Io)
    }
}
