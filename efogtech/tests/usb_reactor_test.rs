mod common;
pub(crate) use crate::common::*;

mod usb_reactor_test {
    use efogtech::controller::Controller;
    use efogtech::event::UsbConnStateChangedEvent;
    use efogtech::pm::{PmAction, PowerState};
    use efogtech::usb::{UartPowerController, UsbConnState, UsbStatus};
    use embassy_futures::block_on;

    use super::*;

    fn changed(status: &UsbStatus, conn_state: UsbConnState) -> UsbConnStateChangedEvent {
        status.update(conn_state);
        UsbConnStateChangedEvent { conn_state }
    }

    #[test]
    fn test_hid_connection_resumes_uart() {
        let status = UsbStatus::new();
        let uart = MockUart::default();
        let mut reactor = UartPowerController::new(uart.clone(), &status);
        assert_eq!(reactor.power_state(), None);

        block_on(reactor.process_event(changed(&status, UsbConnState::Hid)));
        assert_eq!(uart.take_actions(), vec![PmAction::Resume]);
        assert_eq!(reactor.power_state(), Some(PowerState::Active));
    }

    #[test]
    fn test_non_hid_states_suspend_uart() {
        let status = UsbStatus::new();
        let uart = MockUart::default();
        let mut reactor = UartPowerController::new(uart.clone(), &status);

        for conn_state in [UsbConnState::Powered, UsbConnState::None] {
            block_on(reactor.process_event(changed(&status, conn_state)));
            assert_eq!(uart.take_actions(), vec![PmAction::Suspend]);
            assert_eq!(reactor.power_state(), Some(PowerState::Suspended));
        }
    }

    #[test]
    fn test_exactly_one_action_per_event() {
        let status = UsbStatus::new();
        let uart = MockUart::default();
        let mut reactor = UartPowerController::new(uart.clone(), &status);

        let sequence = [
            UsbConnState::Powered,
            UsbConnState::Hid,
            UsbConnState::Hid,
            UsbConnState::Powered,
            UsbConnState::None,
            UsbConnState::Hid,
        ];
        for conn_state in sequence {
            block_on(reactor.process_event(changed(&status, conn_state)));
            let expected = if conn_state == UsbConnState::Hid {
                PmAction::Resume
            } else {
                PmAction::Suspend
            };
            // Repeated states still fire their action
            assert_eq!(uart.take_actions(), vec![expected]);
        }
    }

    #[test]
    fn test_state_is_queried_not_taken_from_event() {
        let status = UsbStatus::new();
        status.update(UsbConnState::Hid);
        let uart = MockUart::default();
        let mut reactor = UartPowerController::new(uart.clone(), &status);

        // A stale event payload doesn't matter, the current state is HID
        block_on(reactor.process_event(UsbConnStateChangedEvent {
            conn_state: UsbConnState::None,
        }));
        assert_eq!(uart.take_actions(), vec![PmAction::Resume]);
    }

    #[test]
    fn test_pm_failure_is_not_fatal() {
        let status = UsbStatus::new();
        let uart = MockUart::failing();
        let mut reactor = UartPowerController::new(uart.clone(), &status);

        assert_eq!(reactor.sync_uart_power(), PmAction::Suspend);
        status.update(UsbConnState::Hid);
        assert_eq!(reactor.sync_uart_power(), PmAction::Resume);
        assert_eq!(uart.take_actions(), vec![PmAction::Suspend, PmAction::Resume]);
        assert_eq!(reactor.power_state(), Some(PowerState::Active));
    }
}
