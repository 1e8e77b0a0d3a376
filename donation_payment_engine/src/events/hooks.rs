//! Wiring between user-supplied hooks and the event channels.
//!
//! Configure an [`EventHooks`] with the callbacks you care about, build [`EventHandlers`] from it, hand the
//! [`EventProducers`] to the order flow API, and call [`EventHandlers::start_handlers`] to launch the dispatch
//! loops.

use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    channel::{EventHandler, EventProducer, Handler},
    DonationReceivedEvent,
    OrderAnnulledEvent,
    OrderCreatedEvent,
};

/// The producer side of the event channels. Cloneable, so every worker can carry its own copy.
#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_created_producer: Vec<EventProducer<OrderCreatedEvent>>,
    pub donation_received_producer: Vec<EventProducer<DonationReceivedEvent>>,
    pub order_annulled_producer: Vec<EventProducer<OrderAnnulledEvent>>,
}

/// Owns the receiving end of each configured event channel.
pub struct EventHandlers {
    pub on_order_created: Option<EventHandler<OrderCreatedEvent>>,
    pub on_donation_received: Option<EventHandler<DonationReceivedEvent>>,
    pub on_order_annulled: Option<EventHandler<OrderAnnulledEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_created = hooks.on_order_created.map(|f| EventHandler::new(buffer_size, f));
        let on_donation_received = hooks.on_donation_received.map(|f| EventHandler::new(buffer_size, f));
        let on_order_annulled = hooks.on_order_annulled.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_created, on_donation_received, on_order_annulled }
    }

    /// Creates a fresh set of producers, one per configured handler.
    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_created {
            result.order_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_donation_received {
            result.donation_received_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_order_annulled {
            result.order_annulled_producer.push(handler.subscribe());
        }
        result
    }

    /// Launches a dispatch loop for every configured handler. Each loop runs until its last producer is dropped.
    pub fn start_handlers(self) {
        if let Some(handler) = self.on_order_created {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_donation_received {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_order_annulled {
            tokio::spawn(handler.start_handler());
        }
    }
}

/// User-facing hook registration. Each setter takes an async closure and can be chained.
#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_created: Option<Handler<OrderCreatedEvent>>,
    pub on_donation_received: Option<Handler<DonationReceivedEvent>>,
    pub on_order_annulled: Option<Handler<OrderAnnulledEvent>>,
}

impl EventHooks {
    /// Registers a callback for every new donation order.
    pub fn on_order_created<F>(mut self, f: F) -> Self
    where F: Fn(OrderCreatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static {
        self.on_order_created = Some(Arc::new(f));
        self
    }

    /// Registers a callback for confirmed donations. Fired at most once per order.
    pub fn on_donation_received<F>(mut self, f: F) -> Self
    where F: Fn(DonationReceivedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static {
        self.on_donation_received = Some(Arc::new(f));
        self
    }

    /// Registers a callback for cancelled orders.
    pub fn on_order_annulled<F>(mut self, f: F) -> Self
    where F: Fn(OrderAnnulledEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static {
        self.on_order_annulled = Some(Arc::new(f));
        self
    }
}
