use core::convert::Infallible;

use efogtech::RawMutex;
use efogtech::pm::{PmAction, PowerManaged};
use embassy_sync::signal::Signal;
use embedded_io_async::{ErrorType, Read, Write};

/// Latest power action requested for UARTE0
static UARTE_POWER: Signal<RawMutex, PmAction> = Signal::new();

/// Power handle of UARTE0.
///
/// The shell task owns the driver and applies the requested state: it drops the `BufferedUarte` on
/// suspend, which stops RX and TX before disabling the peripheral, and builds a new one on resume.
pub struct UartePower;

impl PowerManaged for UartePower {
    type Error = Infallible;

    fn pm_action(&mut self, action: PmAction) -> Result<(), Self::Error> {
        UARTE_POWER.signal(action);
        Ok(())
    }
}

/// Wait until `action` is the latest requested power action of UARTE0
pub async fn wait_for_power(action: PmAction) {
    while UARTE_POWER.wait().await != action {}
}

/// Wrapper that bridges `embedded-io-async` 0.6 Read/Write to 0.7.
///
/// `embassy_nrf::buffered_uarte::BufferedUarte` implements the 0.6 traits, the shell takes 0.7.
pub struct BufferedUarteWrapper<T>(pub T);

#[derive(Debug)]
pub struct WrapperError;

impl core::fmt::Display for WrapperError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "BufferedUarteWrapper IO error")
    }
}

impl core::error::Error for WrapperError {}

impl embedded_io_async::Error for WrapperError {
    fn kind(&self) -> embedded_io_async::ErrorKind {
        embedded_io_async::ErrorKind::Other
    }
}

impl<T> ErrorType for BufferedUarteWrapper<T> {
    type Error = WrapperError;
}

impl<T: embedded_io_async_06::Read> Read for BufferedUarteWrapper<T> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        embedded_io_async_06::Read::read(&mut self.0, buf)
            .await
            .map_err(|_| WrapperError)
    }
}

impl<T: embedded_io_async_06::Write> Write for BufferedUarteWrapper<T> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        embedded_io_async_06::Write::write(&mut self.0, buf)
            .await
            .map_err(|_| WrapperError)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        embedded_io_async_06::Write::flush(&mut self.0)
            .await
            .map_err(|_| WrapperError)
    }
}
