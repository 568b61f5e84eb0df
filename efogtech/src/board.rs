//! The board: owner of every device handle the board logic uses.
//!
//! ```rust,ignore
//! let mut board = Board::new(PowerRails::new(en_3v3, en_rgb, en_bl), &ENDPOINTS, uart, BoardConfig::default());
//! board.init()?;
//! let mut reactor = board.uart_power_controller(&USB_STATUS).unwrap();
//! let mut shell = board.shell_session(serial);
//! join(reactor.event_loop(), shell.run()).await;
//! ```

use embedded_hal::digital::OutputPin;

use crate::config::BoardConfig;
use crate::endpoint::EndpointSelector;
use crate::pm::PowerManaged;
use crate::power_rail::{PowerRails, RailError};
#[cfg(feature = "shell")]
use crate::shell::{BoardCommands, ShellSession};
#[cfg(feature = "usb")]
use crate::usb::{UartPowerController, UsbStatus};

pub struct Board<'a, P3, PR, PB, E, U>
where
    P3: OutputPin,
    PR: OutputPin,
    PB: OutputPin,
    E: EndpointSelector,
    U: PowerManaged,
{
    rails: PowerRails<P3, PR, PB>,
    endpoints: E,
    uart: Option<U>,
    config: BoardConfig<'a>,
}

impl<'a, P3, PR, PB, E, U> Board<'a, P3, PR, PB, E, U>
where
    P3: OutputPin,
    PR: OutputPin,
    PB: OutputPin,
    E: EndpointSelector,
    U: PowerManaged,
{
    pub fn new(rails: PowerRails<P3, PR, PB>, endpoints: E, uart: U, config: BoardConfig<'a>) -> Self {
        Self {
            rails,
            endpoints,
            uart: Some(uart),
            config,
        }
    }

    /// Boot hook, call it once before starting any task.
    ///
    /// Disables all power rails.
    pub fn init(&mut self) -> Result<(), RailError> {
        info!("efogtech trackball, firmware version {}", self.config.version);
        self.rails.init()
    }

    pub fn config(&self) -> &BoardConfig<'a> {
        &self.config
    }

    pub fn rails(&mut self) -> &mut PowerRails<P3, PR, PB> {
        &mut self.rails
    }

    pub fn endpoints(&mut self) -> &mut E {
        &mut self.endpoints
    }

    /// Move the UART handle into a new [`UartPowerController`].
    ///
    /// Returns `None` if the UART was already taken.
    #[cfg(feature = "usb")]
    pub fn uart_power_controller<'s>(&mut self, status: &'s UsbStatus) -> Option<UartPowerController<'s, U>> {
        self.uart.take().map(|uart| UartPowerController::new(uart, status))
    }

    /// Take the UART handle out of the board
    pub fn take_uart(&mut self) -> Option<U> {
        self.uart.take()
    }

    /// Teardown: give the rail enable pins back, in `(3V3, RGB, BL)` order
    pub fn release(self) -> (P3, PR, PB) {
        self.rails.release()
    }
}

#[cfg(feature = "shell")]
impl<'a, P3, PR, PB, E, U> Board<'a, P3, PR, PB, E, U>
where
    P3: OutputPin,
    PR: OutputPin,
    PB: OutputPin,
    E: EndpointSelector + Clone,
    U: PowerManaged,
{
    /// The `board` command group, bound to this board's endpoint selector
    pub fn shell(&self) -> BoardCommands<E> {
        BoardCommands::new(self.endpoints.clone(), self.config.version)
    }

    /// An interactive shell session over `io`, using the configured prompt
    pub fn shell_session<T>(&self, io: T) -> ShellSession<'a, T, E>
    where
        T: embedded_io_async::Read + embedded_io_async::Write,
    {
        ShellSession::new(io, self.shell(), self.config.shell.prompt)
    }
}
