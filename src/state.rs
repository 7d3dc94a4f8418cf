use std::sync::Arc;

use crate::{
    config::AppConfig,
    planner::TripPlanner,
    services::{
        clock::Clock,
        links::LinkBuilder,
        mail::{Mailbox, NotificationDispatcher},
        store::TripStore,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub planner: TripPlanner,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn TripStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let links = LinkBuilder::new(&config.api_base_url, &config.web_base_url);
        let sender = Mailbox::new(&config.mail_from_name, &config.mail_from_address);
        let planner = TripPlanner::new(store, dispatcher, clock, links, sender);
        Self { config, planner }
    }
}
