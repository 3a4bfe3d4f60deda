use std::time::{Duration, Instant};

/// A transient confirmation that dismisses itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    message: String,
    expires_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, now: Instant, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            expires_at: now + ttl,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
