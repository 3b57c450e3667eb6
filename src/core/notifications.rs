use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub const SUBMIT_SUCCESS: &str = "Reserva enviada! Aguarde nosso contato.";
pub const SUBMIT_FAILURE: &str = "Erro ao enviar reserva. Tente novamente.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Queue of notifications that expire after a fixed time-to-live.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    ttl: Duration,
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            created_at: now,
        };
        let id = notification.id;
        self.items.push(notification);
        id
    }

    /// Removes a notification before it expires. Returns whether it was present.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Drops expired notifications and returns the live ones, oldest first.
    pub fn active(&mut self, now: DateTime<Utc>) -> &[Notification] {
        let ttl = self.ttl;
        self.items.retain(|item| now - item.created_at < ttl);
        &self.items
    }

    /// Takes every queued notification, expired or not.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.items)
    }
}
