// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store and change feed.
use std::collections::{BTreeMap, HashMap};
use std::pin::Pin;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::task::{Context, Poll};

use futures_core::Stream;
use samiti_core::cbor::{DecodeError, EncodeError, decode_cbor, encode_cbor};
use samiti_core::{Collection, Record, RecordKey};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, trace};

use crate::query::Query;
use crate::traits::{
    ChangeFeed, DataStore, FeedError, Insert, StoreError, Subscription, SubscriptionId,
};

/// Default number of notifications buffered per collection before slow subscribers lag.
pub const DEFAULT_FEED_CAPACITY: usize = 128;

#[derive(Debug)]
struct StoredRecord {
    bytes: Vec<u8>,
    unique_value: Option<String>,
}

#[derive(Debug)]
struct Table {
    next_sequence: u64,
    rows: BTreeMap<u64, StoredRecord>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            next_sequence: 1,
            rows: BTreeMap::new(),
        }
    }
}

#[derive(Debug)]
struct InnerMemoryStore {
    tables: HashMap<Collection, Table>,
    feeds: HashMap<Collection, broadcast::Sender<Insert>>,
    next_subscription_id: SubscriptionId,
    feed_capacity: usize,
}

/// An in-memory store for all collections of the directory, with a change feed for inserts.
///
/// Records are kept encoded, every read decodes a fresh copy. `MemoryStore` is cheap to clone and
/// all clones share the same state.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    inner: Arc<RwLock<InnerMemoryStore>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::default()
    }

    /// Obtain a read-lock on the store.
    fn read_store(&self) -> RwLockReadGuard<'_, InnerMemoryStore> {
        self.inner
            .read()
            .expect("acquire shared read access on store")
    }

    /// Obtain a write-lock on the store.
    fn write_store(&self) -> RwLockWriteGuard<'_, InnerMemoryStore> {
        self.inner
            .write()
            .expect("acquire exclusive write access on store")
    }

    /// Number of records currently held in a collection.
    pub fn len(&self, collection: Collection) -> usize {
        self.read_store()
            .tables
            .get(&collection)
            .map(|table| table.rows.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    /// Announce an already stored record a second time on the change feed.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn redeliver<R: Record>(&self, record: &R) -> Result<(), MemoryStoreError> {
        let bytes = encode_cbor(record)?;
        let store = self.read_store();
        if let Some(tx) = store.feeds.get(&R::COLLECTION) {
            let _ = tx.send(Insert::new(R::COLLECTION, bytes));
        }
        Ok(())
    }

    /// Shut down the change feed of a collection. Open subscriptions end after draining what
    /// was already delivered to them.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn close_feed(&self, collection: Collection) {
        self.write_store().feeds.remove(&collection);
    }

    /// Number of subscribers currently attached to a collection's feed.
    pub fn subscriber_count(&self, collection: Collection) -> usize {
        self.read_store()
            .feeds
            .get(&collection)
            .map(|tx| tx.receiver_count())
            .unwrap_or_default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct MemoryStoreBuilder {
    feed_capacity: usize,
}

impl MemoryStoreBuilder {
    /// Number of notifications buffered per collection. Subscribers further behind than this
    /// observe [`FeedError::Lagged`].
    pub fn feed_capacity(mut self, capacity: usize) -> Self {
        self.feed_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> MemoryStore {
        let inner = InnerMemoryStore {
            tables: HashMap::new(),
            feeds: HashMap::new(),
            next_subscription_id: 1,
            feed_capacity: self.feed_capacity,
        };

        MemoryStore {
            inner: Arc::new(RwLock::new(inner)),
        }
    }
}

impl Default for MemoryStoreBuilder {
    fn default() -> Self {
        Self {
            feed_capacity: DEFAULT_FEED_CAPACITY,
        }
    }
}

impl DataStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn read_all<R: Record>(&self, query: &Query<R>) -> Result<Vec<R>, Self::Error> {
        let records = {
            let store = self.read_store();
            match store.tables.get(&R::COLLECTION) {
                Some(table) => table
                    .rows
                    .values()
                    .map(|row| decode_cbor::<R>(&row.bytes))
                    .collect::<Result<Vec<R>, DecodeError>>()
                    .map_err(|source| MemoryStoreError::Decode {
                        collection: R::COLLECTION,
                        source,
                    })?,
                None => Vec::new(),
            }
        };

        Ok(query.apply(records))
    }

    async fn upsert<R: Record>(&self, mut record: R) -> Result<R, Self::Error> {
        let (insert, tx) = {
            let mut store = self.write_store();
            let table = store.tables.entry(R::COLLECTION).or_default();

            let sequence = if record.key().is_assigned() {
                record.key().sequence()
            } else {
                let sequence = table.next_sequence;
                record.set_key(R::Key::from_sequence(sequence));
                sequence
            };

            let unique_value = record.unique_value().map(str::to_string);
            if let Some(value) = &unique_value {
                let taken = table.rows.iter().any(|(other, row)| {
                    *other != sequence && row.unique_value.as_deref() == Some(value.as_str())
                });
                if taken {
                    return Err(MemoryStoreError::UniqueViolation {
                        collection: R::COLLECTION,
                        value: value.clone(),
                    });
                }
            }

            let bytes = encode_cbor(&record)?;
            table.next_sequence = table.next_sequence.max(sequence + 1);
            let previous = table.rows.insert(
                sequence,
                StoredRecord {
                    bytes: bytes.clone(),
                    unique_value,
                },
            );

            trace!(collection = %R::COLLECTION, key = %record.key(), "upsert record");

            // Only new keys are announced, updates stay silent.
            if previous.is_some() {
                return Ok(record);
            }

            let tx = store.feeds.get(&R::COLLECTION).cloned();
            (Insert::new(R::COLLECTION, bytes), tx)
        };

        if let Some(tx) = tx {
            // Sending fails only when nobody is listening.
            let _ = tx.send(insert);
        }

        Ok(record)
    }

    async fn delete<R: Record>(&self, key: R::Key) -> Result<bool, Self::Error> {
        let mut store = self.write_store();
        let removed = store
            .tables
            .get_mut(&R::COLLECTION)
            .and_then(|table| table.rows.remove(&key.sequence()))
            .is_some();
        trace!(collection = %R::COLLECTION, %key, removed, "delete record");
        Ok(removed)
    }
}

impl ChangeFeed for MemoryStore {
    type Subscription = MemorySubscription;

    async fn subscribe(&self, collection: Collection) -> Result<Self::Subscription, FeedError> {
        let mut store = self.write_store();
        let capacity = store.feed_capacity;
        let rx = store
            .feeds
            .entry(collection)
            .or_insert_with(|| broadcast::channel(capacity).0)
            .subscribe();

        let id = store.next_subscription_id;
        store.next_subscription_id += 1;

        debug!(%collection, id, "subscribe to change feed");

        Ok(MemorySubscription {
            id,
            collection,
            stream: BroadcastStream::new(rx),
        })
    }
}

/// Subscription to the inserts of one collection of a [`MemoryStore`].
#[derive(Debug)]
pub struct MemorySubscription {
    id: SubscriptionId,
    collection: Collection,
    stream: BroadcastStream<Insert>,
}

impl Stream for MemorySubscription {
    type Item = Result<Insert, FeedError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.stream).poll_next(cx) {
            Poll::Ready(Some(Ok(insert))) => Poll::Ready(Some(Ok(insert))),
            Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(missed)))) => {
                Poll::Ready(Some(Err(FeedError::Lagged(missed))))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Subscription for MemorySubscription {
    fn id(&self) -> SubscriptionId {
        self.id
    }

    fn collection(&self) -> Collection {
        self.collection
    }

    async fn unsubscribe(self) -> Result<(), FeedError> {
        debug!(collection = %self.collection, id = self.id, "unsubscribe from change feed");
        // Dropping the receiver detaches it from the channel.
        drop(self.stream);
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("stored record in {collection} could not be decoded: {source}")]
    Decode {
        collection: Collection,
        source: DecodeError,
    },

    #[error("{value:?} is already taken in {collection}")]
    UniqueViolation { collection: Collection, value: String },
}

impl StoreError for MemoryStoreError {
    fn is_unique_violation(&self) -> bool {
        matches!(self, MemoryStoreError::UniqueViolation { .. })
    }
}
