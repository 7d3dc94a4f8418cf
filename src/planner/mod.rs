//! Trip lifecycle and confirmation workflow.
//!
//! Every operation mutates the store first and notifies afterwards, so a
//! failed dispatch never leaves persisted state half-done.

mod confirmation;
mod invitation;
mod lifecycle;

pub use lifecycle::validate_dates;

use std::sync::Arc;

use crate::services::{
    clock::Clock,
    links::LinkBuilder,
    mail::{Mailbox, NotificationDispatcher},
    store::TripStore,
};

#[derive(Clone)]
pub struct TripPlanner {
    store: Arc<dyn TripStore>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    links: LinkBuilder,
    sender: Mailbox,
}

impl TripPlanner {
    pub fn new(
        store: Arc<dyn TripStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        links: LinkBuilder,
        sender: Mailbox,
    ) -> Self {
        Self {
            store,
            dispatcher,
            clock,
            links,
            sender,
        }
    }
}
