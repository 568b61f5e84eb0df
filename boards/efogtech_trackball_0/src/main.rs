#![no_main]
#![no_std]

mod uart;

use defmt::*;
use defmt_rtt as _;
use efogtech::controller::EventController;
use efogtech::{Board, BoardConfig, ENDPOINTS, PmAction, PowerRails, USB_STATUS, UsbConnHandler};
use embassy_executor::Spawner;
use embassy_futures::join::join3;
use embassy_futures::select::{Either, select};
use embassy_nrf::buffered_uarte::{self, BufferedUarte};
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::{self, Driver};
use embassy_nrf::{bind_interrupts, peripherals, uarte};
use embassy_usb::Builder;
use panic_probe as _;
use static_cell::StaticCell;

use crate::uart::{BufferedUarteWrapper, UartePower, wait_for_power};

bind_interrupts!(struct Irqs {
    USBD => usb::InterruptHandler<peripherals::USBD>;
    POWER_CLOCK => usb::vbus_detect::InterruptHandler;
    UARTE0 => buffered_uarte::InterruptHandler<peripherals::UARTE0>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("efogtech trackball start!");
    // USB needs the external high frequency crystal
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.hfclk_source = embassy_nrf::config::HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(nrf_config);

    // Rail enable pins: EN_3V3 = P1.00, EN_RGB = P1.03, EN_BL = P0.20
    let en_3v3 = Output::new(p.P1_00, Level::Low, OutputDrive::Standard);
    let en_rgb = Output::new(p.P1_03, Level::Low, OutputDrive::Standard);
    let en_bl = Output::new(p.P0_20, Level::Low, OutputDrive::Standard);

    let mut board = Board::new(
        PowerRails::new(en_3v3, en_rgb, en_bl),
        &ENDPOINTS,
        UartePower,
        BoardConfig::default(),
    );
    if let Err(e) = board.init() {
        error!("Board init failed: {}", e);
    }

    // Usb config
    static CONFIG_DESC: StaticCell<[u8; 128]> = StaticCell::new();
    static BOS_DESC: StaticCell<[u8; 16]> = StaticCell::new();
    static MSOS_DESC: StaticCell<[u8; 16]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
    static USB_HANDLER: StaticCell<UsbConnHandler<'static>> = StaticCell::new();

    let driver = Driver::new(p.USBD, Irqs, HardwareVbusDetect::new(Irqs));
    let mut usb_config = embassy_usb::Config::new(0x4c4b, 0x4643);
    usb_config.manufacturer = Some("efogtech");
    usb_config.product = Some("trackball 0");
    let mut builder = Builder::new(
        driver,
        usb_config,
        CONFIG_DESC.init([0; 128]),
        BOS_DESC.init([0; 16]),
        MSOS_DESC.init([0; 16]),
        CONTROL_BUF.init([0; 64]),
    );
    builder.handler(USB_HANDLER.init(UsbConnHandler::new(&USB_STATUS)));
    let mut usb_device = builder.build();

    let Some(mut uart_power) = board.uart_power_controller(&USB_STATUS) else {
        defmt::panic!("UART power handle already taken");
    };

    // Shell on UARTE0: TX = P0.06, RX = P0.08
    static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
    static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
    let rx_buf = RX_BUF.init([0; 256]);
    let tx_buf = TX_BUF.init([0; 256]);
    let mut uart_config = uarte::Config::default();
    uart_config.baudrate = uarte::Baudrate::BAUD115200;
    let mut uarte0 = p.UARTE0;
    let mut timer0 = p.TIMER0;
    let mut ppi_ch0 = p.PPI_CH0;
    let mut ppi_ch1 = p.PPI_CH1;
    let mut ppi_group0 = p.PPI_GROUP0;
    let mut rxd = p.P0_08;
    let mut txd = p.P0_06;

    let shell_loop = async {
        loop {
            let serial = BufferedUarte::new(
                uarte0.reborrow(),
                timer0.reborrow(),
                ppi_ch0.reborrow(),
                ppi_ch1.reborrow(),
                ppi_group0.reborrow(),
                rxd.reborrow(),
                txd.reborrow(),
                Irqs,
                uart_config.clone(),
                &mut rx_buf[..],
                &mut tx_buf[..],
            );
            let mut shell = board.shell_session(BufferedUarteWrapper(serial));
            match select(shell.run(), wait_for_power(PmAction::Suspend)).await {
                Either::First(Ok(())) => info!("Shell input closed"),
                Either::First(Err(e)) => warn!("Shell session ended: {}", e),
                Either::Second(()) => {
                    // Dropping the driver stops it and disables UARTE0
                    drop(shell);
                    info!("UARTE0 suspended");
                    wait_for_power(PmAction::Resume).await;
                    info!("UARTE0 resumed");
                }
            }
        }
    };

    join3(usb_device.run(), uart_power.event_loop(), shell_loop).await;
}
