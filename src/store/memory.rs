//! Process-local message store.
//!
//! Same ordering contract as the MongoDB store: a monotonically increasing
//! sequence number stands in for `_id`. Used by the `memory` backend and by
//! tests, which can also switch it into a failing mode to exercise the 500
//! path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;

use crate::messages::Message;
use crate::store::{MessageStore, StoreError, StoreResult};

#[derive(Default)]
struct Records {
    next_sequence: u64,
    entries: Vec<(u64, Message)>,
}

#[derive(Default)]
pub struct InMemoryMessageStore {
    records: Mutex<Records>,
    closed: AtomicBool,
    failing: AtomicBool,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following operation fail with [`StoreError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of stored messages.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> StoreResult<()> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }

    fn recent_now(&self, limit: usize) -> StoreResult<Vec<Message>> {
        self.check()?;
        let records = self.lock();
        Ok(records
            .entries
            .iter()
            .rev()
            .take(limit)
            .map(|(_, message)| message.clone())
            .collect())
    }

    fn insert_now(&self, message: Message) -> StoreResult<()> {
        self.check()?;
        let mut records = self.lock();
        let sequence = records.next_sequence;
        records.next_sequence += 1;
        records.entries.push((sequence, message));
        Ok(())
    }

    fn wipe_now(&self) -> StoreResult<()> {
        self.check()?;
        self.lock().entries.clear();
        Ok(())
    }
}

impl MessageStore for InMemoryMessageStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn recent(&self, limit: usize) -> BoxFuture<'_, StoreResult<Vec<Message>>> {
        future::ready(self.recent_now(limit)).boxed()
    }

    fn insert(&self, message: Message) -> BoxFuture<'_, StoreResult<()>> {
        future::ready(self.insert_now(message)).boxed()
    }

    fn wipe(&self) -> BoxFuture<'_, StoreResult<()>> {
        future::ready(self.wipe_now()).boxed()
    }

    fn close(&self) -> BoxFuture<'_, StoreResult<()>> {
        self.closed.store(true, Ordering::SeqCst);
        future::ready(Ok(())).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> Message {
        Message {
            message: text.to_string(),
            timestamp: "01:01:2025 00:00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let store = InMemoryMessageStore::new();
        assert!(store.recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_newest_first_by_insertion() {
        let store = InMemoryMessageStore::new();
        for i in 1..=12 {
            store.insert(message(&format!("msg-{i}"))).await.unwrap();
        }

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].message, "msg-12");
        assert_eq!(recent[9].message, "msg-3");
        assert_eq!(store.len(), 12);
    }

    #[tokio::test]
    async fn test_identical_timestamps_keep_insertion_order() {
        let store = InMemoryMessageStore::new();
        store.insert(message("first")).await.unwrap();
        store.insert(message("second")).await.unwrap();

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent[0].message, "second");
        assert_eq!(recent[1].message, "first");
    }

    #[tokio::test]
    async fn test_failing_mode() {
        let store = InMemoryMessageStore::new();
        store.set_failing(true);
        assert!(matches!(store.insert(message("x")).await, Err(StoreError::Unavailable(_))));
        assert!(store.is_empty());

        store.set_failing(false);
        store.insert(message("x")).await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_wipe_and_close() {
        let store = InMemoryMessageStore::new();
        store.insert(message("x")).await.unwrap();
        store.wipe().await.unwrap();
        assert!(store.is_empty());

        store.close().await.unwrap();
        store.close().await.unwrap();
        assert!(store.is_closed());
        assert!(matches!(store.recent(10).await, Err(StoreError::Closed)));
    }
}
