//! Event system for the board
//!
//! Each controller event type has its own dedicated [`PubSubChannel`](embassy_sync::pubsub::PubSubChannel),
//! declared with [`controller_event!`](crate::controller_event). Publishers never block: when a
//! channel is full the oldest event is dropped, and subscribers which didn't read it are told how
//! many events they missed.

mod endpoint;
#[cfg(feature = "usb")]
mod usb;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::pubsub::{ImmediatePublisher, Subscriber, WaitResult};

pub use endpoint::TransportChangedEvent;
#[cfg(feature = "usb")]
pub use usb::UsbConnStateChangedEvent;

/// Trait for event publishers
pub trait EventPublisher<T> {
    fn publish(&self, message: T);
}

/// Trait for event subscribers
pub trait EventSubscriber<T> {
    /// Wait for the next event.
    ///
    /// Returns [`WaitResult::Lagged`] with the number of dropped events when the subscriber fell
    /// behind, the following calls return the events still in the channel.
    async fn next_event(&mut self) -> WaitResult<T>;
}

/// Events which can be subscribed by controllers
pub trait ControllerEvent: Clone + Send {
    type Publisher: EventPublisher<Self>;
    type Subscriber: EventSubscriber<Self>;

    fn controller_publisher() -> Self::Publisher;

    /// Create a new subscriber of the event.
    ///
    /// Panics when the channel already has the maximum number of subscribers.
    fn controller_subscriber() -> Self::Subscriber;
}

/// Publish a controller event (non-blocking, may drop if buffer full)
///
/// Example: `publish_controller_event(UsbConnStateChangedEvent { .. })`
pub fn publish_controller_event<E: ControllerEvent>(e: E) {
    E::controller_publisher().publish(e);
}

// Implementations for embassy-sync PubSubChannel
impl<'a, M: RawMutex, T: Clone, const CAP: usize, const SUBS: usize, const PUBS: usize> EventPublisher<T>
    for ImmediatePublisher<'a, M, T, CAP, SUBS, PUBS>
{
    fn publish(&self, message: T) {
        self.publish_immediate(message);
    }
}

impl<'a, M: RawMutex, T: Clone, const CAP: usize, const SUBS: usize, const PUBS: usize> EventSubscriber<T>
    for Subscriber<'a, M, T, CAP, SUBS, PUBS>
{
    async fn next_event(&mut self) -> WaitResult<T> {
        self.next_message().await
    }
}

/// Declare the static channel of a controller event and implement [`ControllerEvent`] for it.
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Debug)]
/// pub struct FooEvent {
///     pub value: u8,
/// }
/// controller_event!(FooEvent, channel_size = 4, subs = 2, pubs = 1);
/// ```
#[macro_export]
macro_rules! controller_event {
    ($event:ident, channel_size = $cap:expr, subs = $subs:expr, pubs = $pubs:expr) => {
        $crate::__paste::paste! {
            static [<$event:snake:upper _CONTROLLER_CHANNEL>]: ::embassy_sync::pubsub::PubSubChannel<
                $crate::RawMutex,
                $event,
                { $cap },
                { $subs },
                { $pubs },
            > = ::embassy_sync::pubsub::PubSubChannel::new();

            impl $crate::event::ControllerEvent for $event {
                type Publisher = ::embassy_sync::pubsub::ImmediatePublisher<
                    'static,
                    $crate::RawMutex,
                    $event,
                    { $cap },
                    { $subs },
                    { $pubs },
                >;
                type Subscriber = ::embassy_sync::pubsub::Subscriber<
                    'static,
                    $crate::RawMutex,
                    $event,
                    { $cap },
                    { $subs },
                    { $pubs },
                >;

                fn controller_publisher() -> Self::Publisher {
                    [<$event:snake:upper _CONTROLLER_CHANNEL>].immediate_publisher()
                }

                fn controller_subscriber() -> Self::Subscriber {
                    [<$event:snake:upper _CONTROLLER_CHANNEL>].subscriber().unwrap()
                }
            }
        }
    };
}
