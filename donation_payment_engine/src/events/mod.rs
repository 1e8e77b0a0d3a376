//! Stateless pub-sub hooks for donation lifecycle events.
//!
//! Deployments can attach async handlers to the three lifecycle moments (order created, donation received, order
//! annulled) without the engine knowing anything about them. Handlers receive only the event payload; they have no
//! access to engine internals and cannot influence the transition that produced the event.

mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::{DonationReceivedEvent, OrderAnnulledEvent, OrderCreatedEvent};
pub use hooks::{EventHandlers, EventHooks, EventProducers};

/// Buffer size for the event channels. Handlers that fall this far behind start exerting backpressure on publishers.
pub const EVENT_BUFFER_SIZE: usize = 25;
