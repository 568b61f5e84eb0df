//! Controller module
//!
//! A controller drives an output device on the board in response to controller events.
//!
//! ```rust,ignore
//! struct MyController;
//!
//! impl Controller for MyController {
//!     type Event = UsbConnStateChangedEvent;
//!
//!     async fn process_event(&mut self, event: Self::Event) {
//!         // handle event
//!     }
//! }
//!
//! // Run the controller
//! let mut c = MyController;
//! c.event_loop().await;
//! ```

use embassy_sync::pubsub::WaitResult;

use crate::event::{ControllerEvent, EventSubscriber};

/// This trait provides the interface for individual output device controllers.
pub trait Controller {
    /// Type of the received events.
    type Event: ControllerEvent;

    /// Create a new event subscriber.
    ///
    /// Default implementation uses the event's `controller_subscriber()` method.
    fn subscriber() -> <Self::Event as ControllerEvent>::Subscriber {
        Self::Event::controller_subscriber()
    }

    /// Process the received event
    async fn process_event(&mut self, event: Self::Event);

    /// Called when `missed` events were dropped from a full channel before this controller read
    /// them.
    async fn process_missed(&mut self, missed: u64) {
        warn!("Controller missed {} events", missed);
    }
}

/// The trait for event-driven controllers.
///
/// This trait is automatically implemented for all types that implement `Controller`.
/// Events are delivered one by one, a new event is not taken from the channel until
/// the previous one is processed. Events dropped from a full channel are reported through
/// [`Controller::process_missed`] before the remaining ones are delivered.
pub trait EventController: Controller {
    /// Event loop that continuously processes incoming events
    async fn event_loop(&mut self) -> ! {
        let mut sub = Self::subscriber();
        loop {
            match sub.next_event().await {
                WaitResult::Message(event) => self.process_event(event).await,
                WaitResult::Lagged(missed) => self.process_missed(missed).await,
            }
        }
    }
}

// Auto impl `EventController` trait for all `Controller`
impl<T: Controller> EventController for T {}
