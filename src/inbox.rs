use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::debug;

use crate::types::{Notification, NotificationId};

pub const DEFAULT_INBOX_CAPACITY: usize = 10;

/// Bounded notification inbox, newest first.
///
/// Eviction policy: when a push would exceed capacity, the oldest entry
/// (the tail) is dropped silently. Entries are otherwise immutable apart
/// from their read flag.
#[derive(Debug, Clone)]
pub struct NotificationInbox {
    entries: VecDeque<Notification>,
    capacity: usize,
}

impl Default for NotificationInbox {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_INBOX_CAPACITY)
    }
}

impl NotificationInbox {
    /// A capacity of 0 is raised to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, notification: Notification) {
        self.entries.push_front(notification);
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                debug!(id = %evicted.id, category = ?evicted.category, "inbox full, evicted oldest notification");
            }
        }
    }

    /// Mark one entry read. Returns false if the id is not (or no longer)
    /// in the inbox.
    pub fn mark_read(&mut self, id: NotificationId) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    /// Newest-first
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hands out strictly increasing ids derived from wall-clock milliseconds.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> NotificationId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = if millis > self.last { millis } else { self.last + 1 };
        self.last = id;
        NotificationId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NotificationCategory, Priority};
    use chrono::TimeZone;

    fn notification(id: u64) -> Notification {
        Notification {
            id: NotificationId(id),
            category: NotificationCategory::WaterReminder,
            message: format!("notification {}", id),
            priority: Priority::Normal,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            read: false,
        }
    }

    #[test]
    fn test_push_is_newest_first() {
        let mut inbox = NotificationInbox::default();
        inbox.push(notification(1));
        inbox.push(notification(2));
        inbox.push(notification(3));

        let ids: Vec<u64> = inbox.iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut inbox = NotificationInbox::default();
        for id in 1..=15 {
            inbox.push(notification(id));
        }

        assert_eq!(inbox.len(), 10);
        let ids: Vec<u64> = inbox.iter().map(|n| n.id.0).collect();
        assert_eq!(ids, (6..=15).rev().collect::<Vec<u64>>());
        assert!(inbox.get(NotificationId(5)).is_none());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut inbox = NotificationInbox::with_capacity(0);
        assert_eq!(inbox.capacity(), 1);
        inbox.push(notification(1));
        inbox.push(notification(2));
        assert_eq!(inbox.notifications(), vec![notification(2)]);
    }

    #[test]
    fn test_mark_read_and_unread_count() {
        let mut inbox = NotificationInbox::default();
        inbox.push(notification(1));
        inbox.push(notification(2));
        assert_eq!(inbox.unread_count(), 2);

        assert!(inbox.mark_read(NotificationId(1)));
        assert_eq!(inbox.unread_count(), 1);
        assert!(inbox.get(NotificationId(1)).unwrap().read);

        // marking twice stays read
        assert!(inbox.mark_read(NotificationId(1)));
        assert_eq!(inbox.unread_count(), 1);
    }

    #[test]
    fn test_mark_read_missing_is_noop() {
        let mut inbox = NotificationInbox::default();
        inbox.push(notification(1));

        assert!(!inbox.mark_read(NotificationId(42)));
        assert_eq!(inbox.unread_count(), 1);
        assert_eq!(inbox.len(), 1);
    }

    #[test]
    fn test_id_generator_is_strictly_increasing() {
        let mut ids = IdGenerator::new();
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

        let a = ids.next_id(t);
        let b = ids.next_id(t);
        let c = ids.next_id(t - chrono::Duration::seconds(10));
        let d = ids.next_id(t + chrono::Duration::seconds(1));

        assert_eq!(a.0, t.timestamp_millis() as u64);
        assert!(a < b && b < c && c < d);
        assert_eq!(d.0, (t + chrono::Duration::seconds(1)).timestamp_millis() as u64);
    }
}
