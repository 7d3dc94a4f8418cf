//! In-memory collaborators for tests.

use std::{
    collections::HashSet,
    sync::{Mutex, PoisonError},
};

use async_trait::async_trait;

use crate::services::mail::{DispatchError, DispatchReceipt, Notification, NotificationDispatcher};

/// Records every send attempt. Sends to addresses in `failing` are recorded
/// and then rejected.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    attempts: Mutex<Vec<Notification>>,
    failing: HashSet<String>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attempts: Mutex::default(),
            failing: addresses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn attempts(&self) -> Vec<Notification> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.attempts()
            .into_iter()
            .map(|notification| notification.to.address)
            .collect()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(&self, notification: &Notification) -> Result<DispatchReceipt, DispatchError> {
        let count = {
            let mut attempts = self.attempts.lock().unwrap_or_else(PoisonError::into_inner);
            attempts.push(notification.clone());
            attempts.len()
        };
        if self.failing.contains(&notification.to.address) {
            return Err(DispatchError::Rejected(notification.to.address.clone()));
        }
        Ok(DispatchReceipt {
            message_id: format!("<recorded-{count}@planner.test>"),
        })
    }
}
