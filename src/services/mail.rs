use std::fmt;

use askama::Template;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::trip::Trip;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub name: Option<String>,
    pub address: String,
}

impl Mailbox {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
        }
    }

    pub fn address(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.address),
            None => f.write_str(&self.address),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    pub message_id: String,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("recipient rejected: {0}")]
    Rejected(String),
    #[error("could not render message: {0}")]
    Render(#[from] askama::Error),
}

/// Hands composed notifications to whatever delivers them.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<DispatchReceipt, DispatchError>;
}

/// Sends and logs the outcome. Failures, including messages that could not
/// be composed, are swallowed: the caller's persisted state is authoritative
/// whether or not the message went out.
pub async fn dispatch_logged(
    dispatcher: &dyn NotificationDispatcher,
    composed: Result<Notification, DispatchError>,
) -> bool {
    let notification = match composed {
        Ok(notification) => notification,
        Err(err) => {
            warn!("notification not sent: {err}");
            return false;
        }
    };
    match dispatcher.send(&notification).await {
        Ok(receipt) => {
            info!(
                to = %notification.to.address,
                message_id = %receipt.message_id,
                "notification dispatched"
            );
            true
        }
        Err(err) => {
            warn!(
                to = %notification.to.address,
                subject = %notification.subject,
                "notification dispatch failed: {err}"
            );
            false
        }
    }
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct ConsoleDispatcher;

impl ConsoleDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationDispatcher for ConsoleDispatcher {
    async fn send(&self, notification: &Notification) -> Result<DispatchReceipt, DispatchError> {
        let message_id = format!("<{}@console.planner>", Uuid::new_v4());
        info!(
            from = %notification.from,
            to = %notification.to,
            subject = %notification.subject,
            message_id = %message_id,
            "📧 {}",
            notification.html_body
        );
        Ok(DispatchReceipt { message_id })
    }
}

#[derive(Template)]
#[template(path = "trip_confirmation.html")]
struct TripConfirmationEmail<'a> {
    destination: &'a str,
    starts: &'a str,
    ends: &'a str,
    link: &'a str,
}

#[derive(Template)]
#[template(path = "invitation.html")]
struct InvitationEmail<'a> {
    destination: &'a str,
    starts: &'a str,
    ends: &'a str,
    link: &'a str,
}

/// Asks the trip owner to confirm the trip they just created.
pub fn compose_trip_confirmation(
    from: &Mailbox,
    to: Mailbox,
    trip: &Trip,
    confirmation_link: &str,
) -> Result<Notification, DispatchError> {
    let (starts, ends) = (format_long_date(trip.starts_at), format_long_date(trip.ends_at));
    let html_body = TripConfirmationEmail {
        destination: &trip.destination,
        starts: &starts,
        ends: &ends,
        link: confirmation_link,
    }
    .render()?;
    Ok(Notification {
        from: from.clone(),
        to,
        subject: format!(
            "Confirm your trip to {} from {starts} to {ends}",
            trip.destination
        ),
        html_body,
    })
}

/// Asks an invited participant to confirm their attendance.
pub fn compose_invitation(
    from: &Mailbox,
    to: Mailbox,
    trip: &Trip,
    confirmation_link: &str,
) -> Result<Notification, DispatchError> {
    let (starts, ends) = (format_long_date(trip.starts_at), format_long_date(trip.ends_at));
    let html_body = InvitationEmail {
        destination: &trip.destination,
        starts: &starts,
        ends: &ends,
        link: confirmation_link,
    }
    .render()?;
    Ok(Notification {
        from: from.clone(),
        to,
        subject: format!(
            "Confirm your attendance on the trip to {} from {starts} to {ends}",
            trip.destination
        ),
        html_body,
    })
}

/// `October 20, 2026`
pub fn format_long_date(ts: DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y").to_string()
}
