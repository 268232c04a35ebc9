use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a notification stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

const MAX_VISIBLE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Default,
    Destructive,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }
}

struct Toast {
    notification: Notification,
    shown_at: Instant,
}

/// Transient notifications, newest last.
#[derive(Default)]
pub struct Toasts {
    items: VecDeque<Toast>,
}

impl Toasts {
    pub fn push(&mut self, notification: Notification, now: Instant) {
        self.items.push_back(Toast {
            notification,
            shown_at: now,
        });
        while self.items.len() > MAX_VISIBLE {
            self.items.pop_front();
        }
    }

    /// Drop notifications older than [`TOAST_TTL`].
    pub fn prune(&mut self, now: Instant) {
        self.items
            .retain(|t| now.saturating_duration_since(t.shown_at) < TOAST_TTL);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter().map(|t| &t.notification)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_ttl() {
        let start = Instant::now();
        let mut toasts = Toasts::default();
        toasts.push(Notification::info("a", "first"), start);
        toasts.push(Notification::error("b", "second"), start + Duration::from_secs(3));

        toasts.prune(start + TOAST_TTL);
        let titles: Vec<_> = toasts.visible().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["b"]);

        toasts.prune(start + Duration::from_secs(10));
        assert!(toasts.is_empty());
    }

    #[test]
    fn keeps_newest_when_full() {
        let now = Instant::now();
        let mut toasts = Toasts::default();
        for i in 0..5 {
            toasts.push(Notification::info(i.to_string(), ""), now);
        }
        let titles: Vec<_> = toasts.visible().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["2", "3", "4"]);
        assert_eq!(toasts.len(), 3);
    }
}
