//! The only path from request handlers to the messages collection.

use std::sync::Arc;

use chrono::Local;

use crate::messages::model::{Message, MessageText, RECENT_LIMIT};
use crate::messages::timestamp::format_timestamp;
use crate::store::{MessageStore, StoreResult};

/// Cheap to clone; every clone shares one store handle.
#[derive(Clone)]
pub struct MessageGateway {
    store: Arc<dyn MessageStore>,
}

impl MessageGateway {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// The ten most recently inserted messages, newest first.
    pub async fn list_recent(&self) -> StoreResult<Vec<Message>> {
        self.store.recent(RECENT_LIMIT).await
    }

    /// Store `text` stamped with the current local time. Returns the stamp.
    pub async fn insert(&self, text: MessageText) -> StoreResult<String> {
        let timestamp = format_timestamp(&Local::now());
        self.store
            .insert(Message {
                message: text.into_inner(),
                timestamp: timestamp.clone(),
            })
            .await?;
        Ok(timestamp)
    }

    /// Drop every stored message. Reached only from the lifecycle manager.
    pub(crate) async fn wipe_all(&self) -> StoreResult<()> {
        self.store.wipe().await
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }
}
