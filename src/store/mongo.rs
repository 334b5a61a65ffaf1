//! MongoDB-backed message store.
//!
//! # Responsibilities
//! - Build a driver client with a bounded server-selection timeout
//! - Prove reachability with `ping` so startup fails early
//! - List by `_id` descending, projecting away `_id`
//! - Drop the database when asked to wipe

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::{FutureExt, TryStreamExt};
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};

use crate::config::StoreConfig;
use crate::messages::Message;
use crate::store::{MessageStore, StoreError, StoreResult};

const APP_NAME: &str = "message-board";

/// Message store over one MongoDB collection.
pub struct MongoMessageStore {
    client: Client,
    database: Database,
    collection: Collection<Message>,
    closed: AtomicBool,
}

impl MongoMessageStore {
    /// A single connection attempt. Retries are driven by
    /// [`Application::start`](crate::lifecycle::Application::start).
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.server_selection_timeout =
            Some(Duration::from_millis(config.server_selection_timeout_ms));
        if options.app_name.is_none() {
            options.app_name = Some(APP_NAME.to_string());
        }

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);
        database.run_command(doc! { "ping": 1 }).await?;

        let collection = database.collection::<Message>(&config.collection);

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "Connected to MongoDB"
        );

        Ok(Self {
            client,
            database,
            collection,
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

impl MessageStore for MongoMessageStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    fn recent(&self, limit: usize) -> BoxFuture<'_, StoreResult<Vec<Message>>> {
        async move {
            self.ensure_open()?;
            let cursor = self
                .collection
                .find(doc! {})
                .sort(doc! { "_id": -1 })
                .limit(i64::try_from(limit).unwrap_or(i64::MAX))
                .projection(doc! { "message": 1, "timestamp": 1, "_id": 0 })
                .await?;
            let messages: Vec<Message> = cursor.try_collect().await?;
            Ok(messages)
        }
        .boxed()
    }

    fn insert(&self, message: Message) -> BoxFuture<'_, StoreResult<()>> {
        async move {
            self.ensure_open()?;
            self.collection.insert_one(&message).await?;
            Ok(())
        }
        .boxed()
    }

    fn wipe(&self) -> BoxFuture<'_, StoreResult<()>> {
        async move {
            self.ensure_open()?;
            self.database.drop().await?;
            tracing::info!(database = %self.database.name(), "Dropped database");
            Ok(())
        }
        .boxed()
    }

    fn close(&self) -> BoxFuture<'_, StoreResult<()>> {
        async move {
            if self.closed.swap(true, Ordering::AcqRel) {
                return Ok(());
            }
            self.client.clone().shutdown().await;
            tracing::info!("MongoDB client shut down");
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::retries::{retry, RetryPolicy};

    fn config(uri: &str) -> StoreConfig {
        StoreConfig {
            uri: uri.to_string(),
            database: "board".to_string(),
            collection: "messages".to_string(),
            server_selection_timeout_ms: 50,
            ..StoreConfig::default()
        }
    }

    #[tokio::test]
    async fn test_malformed_uri_is_an_error() {
        let result = MongoMessageStore::connect(&config("not-a-mongo-uri")).await;
        assert!(matches!(result, Err(StoreError::Mongo(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_exhausts_attempts() {
        // Nothing listens on port 9 (discard) on test hosts.
        let config = config("mongodb://127.0.0.1:9/?directConnection=true");
        let policy = RetryPolicy::fixed(2, Duration::from_millis(5));
        let err = retry(&policy, "mongodb connect", |_| MongoMessageStore::connect(&config))
            .await
            .err()
            .expect("connection should fail");
        assert_eq!(err.attempts, 2);
        assert!(matches!(err.source, StoreError::Mongo(_)));
    }
}
