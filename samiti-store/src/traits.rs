// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;
use std::future::Future;

use futures_core::Stream;
use samiti_core::cbor::{DecodeError, decode_cbor};
use samiti_core::{Collection, Record};
use thiserror::Error;

use crate::query::Query;

pub type SubscriptionId = u64;

/// Typed access to the named collections of a relational store.
///
/// Records are addressed by the key the store assigned to them. Writing a record whose key is
/// still unassigned inserts it under the next key of its collection, writing a record with an
/// assigned key replaces the stored value.
pub trait DataStore: Clone + Send + Sync + 'static {
    type Error: StoreError;

    /// Read every record of a collection which passes the query's filter, in the query's order.
    ///
    /// Without an explicit order records are returned by ascending key.
    fn read_all<R: Record>(
        &self,
        query: &Query<R>,
    ) -> impl Future<Output = Result<Vec<R>, Self::Error>> + Send;

    /// Insert or update a record.
    ///
    /// Returns the record as it was stored, including the assigned key.
    fn upsert<R: Record>(&self, record: R) -> impl Future<Output = Result<R, Self::Error>> + Send;

    /// Delete a record.
    ///
    /// Returns `true` when the removal occurred and `false` when no record with that key existed.
    fn delete<R: Record>(
        &self,
        key: R::Key,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

/// Error raised by a [`DataStore`].
pub trait StoreError: Error + Send + Sync + 'static {
    /// Returns `true` when a write was refused because another record of the collection already
    /// holds the same [`Record::unique_value`].
    fn is_unique_violation(&self) -> bool {
        false
    }
}

/// Live notifications about records inserted into a collection.
///
/// Delivery is at-least-once. A record may be announced more than once and notifications from
/// different writers can arrive in any order.
pub trait ChangeFeed: Send + Sync + 'static {
    type Subscription: Subscription;

    fn subscribe(
        &self,
        collection: Collection,
    ) -> impl Future<Output = Result<Self::Subscription, FeedError>> + Send;
}

/// A single subscription to a collection's inserts.
///
/// The stream ends when the feed shuts down. Errors inside the stream report notifications which
/// could not be delivered.
pub trait Subscription: Stream<Item = Result<Insert, FeedError>> + Send + Unpin + 'static {
    fn id(&self) -> SubscriptionId;

    fn collection(&self) -> Collection;

    /// Cancel the subscription. No notifications are delivered after this returns.
    fn unsubscribe(self) -> impl Future<Output = Result<(), FeedError>> + Send;
}

/// Notification about a record inserted into a collection, carrying the encoded record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Insert {
    collection: Collection,
    bytes: Vec<u8>,
}

impl Insert {
    pub fn new(collection: Collection, bytes: Vec<u8>) -> Self {
        Self { collection, bytes }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the inserted record.
    pub fn decode<R: Record>(&self) -> Result<R, FeedError> {
        if self.collection != R::COLLECTION {
            return Err(FeedError::WrongCollection {
                expected: R::COLLECTION,
                actual: self.collection,
            });
        }

        Ok(decode_cbor(&self.bytes)?)
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("subscription fell behind and missed {0} notifications")]
    Lagged(u64),

    #[error("change feed closed")]
    Closed,

    #[error("notification about {actual} delivered to a {expected} subscriber")]
    WrongCollection {
        expected: Collection,
        actual: Collection,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("change feed unavailable: {0}")]
    Unavailable(String),
}
