use std::time::Duration;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub title: String,
    pub description: Option<String>,
    pub duration: Duration,
}

/// Returned by `enqueue`; hand it to `expire_after` to drive removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub id: ToastId,
    pub after: Duration,
}

/// Ordered (oldest first) queue of transient notifications.
///
/// Unbounded: entries enqueued faster than they expire accumulate.
#[derive(Debug, Default)]
pub struct ToastQueue {
    next_id: u64,
    entries: Vec<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        duration: Option<Duration>,
    ) -> Expiry {
        let id = ToastId(self.next_id);
        self.next_id += 1;
        let duration = duration.unwrap_or(DEFAULT_DURATION);

        let title = title.into();
        tracing::debug!(id = id.0, %title, ?duration, "toast enqueued");
        self.entries.push(Toast {
            id,
            title,
            description: description.filter(|d| !d.is_empty()),
            duration,
        });

        Expiry { id, after: duration }
    }

    /// Removes the entry with `id`. Returns false if it was already gone.
    pub fn expire(&mut self, id: ToastId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|t| t.id != id);
        let removed = self.entries.len() != before;
        if removed {
            tracing::debug!(id = id.0, "toast expired");
        }
        removed
    }

    pub fn list(&self) -> &[Toast] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One-shot timer for a toast. Resolves to its id once the duration has elapsed.
pub async fn expire_after(expiry: Expiry) -> ToastId {
    tokio::time::sleep(expiry.after).await;
    expiry.id
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_ids_unique_within_a_tick() {
        let mut queue = ToastQueue::new();
        let a = queue.enqueue("a", None, None);
        let b = queue.enqueue("b", None, None);
        let c = queue.enqueue("c", None, None);
        assert!(a.id < b.id && b.id < c.id);
    }

    #[test]
    fn test_order_and_defaults() {
        let mut queue = ToastQueue::new();
        queue.enqueue("first", Some("one".to_string()), None);
        queue.enqueue("second", Some(String::new()), Some(Duration::from_millis(50)));

        let titles: Vec<_> = queue.list().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
        assert_eq!(queue.list()[0].duration, DEFAULT_DURATION);
        assert_eq!(queue.list()[0].description.as_deref(), Some("one"));
        assert_eq!(queue.list()[1].description, None);
    }

    #[test]
    fn test_expire_is_idempotent() {
        let mut queue = ToastQueue::new();
        let a = queue.enqueue("a", None, None);
        let b = queue.enqueue("b", None, None);

        assert!(queue.expire(a.id));
        assert!(!queue.expire(a.id));
        assert_eq!(queue.list().len(), 1);
        assert_eq!(queue.list()[0].id, b.id);
    }

    #[test]
    fn test_expire_out_of_order() {
        let mut queue = ToastQueue::new();
        let a = queue.enqueue("a", None, None);
        let b = queue.enqueue("b", None, None);
        let c = queue.enqueue("c", None, None);

        queue.expire(b.id);
        let ids: Vec<_> = queue.list().iter().map(|t| t.id).collect();
        assert_eq!(ids, [a.id, c.id]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_removes_entry() {
        let mut queue = ToastQueue::new();
        let expiry = queue.enqueue("x", Some("y".to_string()), Some(Duration::from_millis(100)));
        queue.enqueue("z", None, None);

        let start = Instant::now();
        let id = expire_after(expiry).await;
        assert!(start.elapsed() >= Duration::from_millis(100));

        assert_eq!(id, expiry.id);
        assert!(queue.list().iter().any(|t| t.id == id));
        queue.expire(id);
        assert!(queue.list().iter().all(|t| t.id != id));
        assert_eq!(queue.list().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_fire_in_duration_order() {
        let mut queue = ToastQueue::new();
        let long = queue.enqueue("long", None, Some(Duration::from_millis(300)));
        let short = queue.enqueue("short", None, Some(Duration::from_millis(100)));

        let first = tokio::select! {
            id = expire_after(long) => id,
            id = expire_after(short) => id,
        };
        assert_eq!(first, short.id);
        queue.expire(first);

        let titles: Vec<_> = queue.list().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["long"]);
    }
}
