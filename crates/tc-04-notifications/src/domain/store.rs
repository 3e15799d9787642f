//! # Notification Store
//!
//! Most-recent-first list of the session's notifications. Identity is the
//! backend `id`: a pushed event that is already present moves to the front
//! instead of appearing twice, and a REST seed never drops events that were
//! pushed before the listing arrived.

use shared_types::notification::{NotificationEvent, NotificationStatus};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationStore {
    items: Vec<NotificationEvent>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[NotificationEvent] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| n.is_unread()).count()
    }

    /// Put a pushed event at index 0. Returns false if it replaced an
    /// existing entry with the same id.
    pub fn push(&mut self, event: NotificationEvent) -> bool {
        let existing = self.items.iter().position(|n| n.id == event.id);
        if let Some(at) = existing {
            self.items.remove(at);
        }
        self.items.insert(0, event);
        existing.is_none()
    }

    /// Replace the list with a REST listing. Entries only known from the
    /// channel stay in front, in their current order.
    pub fn seed(&mut self, fetched: Vec<NotificationEvent>) {
        let fetched_ids: HashSet<i64> = fetched.iter().map(|n| n.id).collect();
        let mut merged: Vec<NotificationEvent> = self
            .items
            .drain(..)
            .filter(|n| !fetched_ids.contains(&n.id))
            .collect();

        let mut seen = HashSet::with_capacity(fetched.len());
        merged.extend(fetched.into_iter().filter(|n| seen.insert(n.id)));
        self.items = merged;
    }

    /// Swap in the server's copy of one notification. Returns false if the
    /// id is unknown locally.
    pub fn replace(&mut self, updated: NotificationEvent) -> bool {
        match self.items.iter_mut().find(|n| n.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Mark everything read at `read_at`. Already-read entries keep their
    /// original timestamp.
    pub fn mark_all_read(&mut self, read_at: &str) {
        for n in self.items.iter_mut().filter(|n| n.is_unread()) {
            n.status = NotificationStatus::Read;
            n.read_at = Some(read_at.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
pub(crate) fn event(id: i64, status: NotificationStatus) -> NotificationEvent {
    use shared_types::notification::NotificationType;

    NotificationEvent {
        id,
        user_id: "u-1".into(),
        claim_number: Some(format!("CLM-{id}")),
        message: format!("Update on claim {id}"),
        kind: NotificationType::ClaimUnderReview,
        status,
        created_at: "2025-03-04T09:00:00".into(),
        read_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use NotificationStatus::{Read, Unread};

    fn ids(store: &NotificationStore) -> Vec<i64> {
        store.items().iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_push_goes_first_and_counts() {
        let mut store = NotificationStore::new();
        store.push(event(1, Read));
        assert!(store.push(event(2, Unread)));

        assert_eq!(ids(&store), vec![2, 1]);
        assert_eq!(store.unread_count(), 1);
    }

    #[test]
    fn test_push_same_id_moves_to_front() {
        let mut store = NotificationStore::new();
        store.push(event(1, Unread));
        store.push(event(2, Unread));

        assert!(!store.push(event(1, Read)));
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.unread_count(), 1);
    }

    #[test]
    fn test_seed_keeps_pushed_only_entries_in_front() {
        let mut store = NotificationStore::new();
        store.push(event(9, Unread));
        store.push(event(3, Unread));

        store.seed(vec![event(3, Read), event(2, Unread), event(1, Read)]);

        assert_eq!(ids(&store), vec![9, 3, 2, 1]);
        assert_eq!(store.items()[1].status, Read);
        assert_eq!(store.unread_count(), 2);
    }

    #[test]
    fn test_replace_and_mark_all() {
        let mut store = NotificationStore::new();
        store.seed(vec![event(2, Unread), event(1, Unread)]);

        let mut read = event(2, Read);
        read.read_at = Some("then".into());
        assert!(store.replace(read));
        assert!(!store.replace(event(77, Read)));
        assert_eq!(store.unread_count(), 1);

        store.mark_all_read("now");
        assert_eq!(store.unread_count(), 0);
        assert_eq!(store.items()[0].read_at.as_deref(), Some("then"));
        assert_eq!(store.items()[1].read_at.as_deref(), Some("now"));

        store.mark_all_read("later");
        assert_eq!(store.unread_count(), 0);
        assert_eq!(store.items()[1].read_at.as_deref(), Some("now"));
    }

    proptest! {
        #[test]
        fn prop_ids_stay_unique(ops in proptest::collection::vec((0i64..8, any::<bool>(), any::<bool>()), 0..40)) {
            let mut store = NotificationStore::new();
            for (id, unread, seed) in ops {
                let status = if unread { Unread } else { Read };
                if seed {
                    store.seed(vec![event(id, status), event(id + 1, status)]);
                } else {
                    store.push(event(id, status));
                }
            }

            let all = ids(&store);
            let unique: HashSet<i64> = all.iter().copied().collect();
            prop_assert_eq!(unique.len(), all.len());
            prop_assert!(store.unread_count() <= store.len());
        }
    }
}
