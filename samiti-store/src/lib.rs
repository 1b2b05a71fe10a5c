// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces to the persistence collaborators of the samiti membership directory.
//!
//! The directory never talks to a database driver directly. It is written against three small
//! contracts:
//!
//! - [`DataStore`]: typed read-all (filtered and ordered through a [`Query`]), insert-or-update by
//!   key and delete by key over the named collections of a relational store.
//! - [`ChangeFeed`]: subscribe to inserts into a collection. Delivery is at-least-once and
//!   carries no ordering guarantee across origins, consumers deduplicate by record key.
//! - [`SessionStorage`]: a handful of durable keys holding opaque bytes, used to persist the
//!   current identity between process runs.
//!
//! ## Store implementations
//!
//! An in-memory [`MemoryStore`] implements both `DataStore` and `ChangeFeed` and is gated by the
//! `memory` feature. Session bytes can be kept in memory ([`MemorySessionStorage`]) or durably in
//! a directory on disk ([`FileSessionStorage`], `file` feature).
//!
//! ```
//! # use samiti_core::{Amount, IdentityId, LedgerEntry, Timestamp};
//! # use samiti_store::{DataStore, MemoryStore, Query};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//!
//! let entry = LedgerEntry::new(IdentityId::new(1), Amount::new(500), "January", Timestamp::now());
//! let entry = store.upsert(entry).await?;
//! assert_eq!(entry.id.to_string(), "1");
//!
//! let entries: Vec<LedgerEntry> = store
//!     .read_all(&Query::all().filter(|entry: &LedgerEntry| entry.amount.value() > 100))
//!     .await?;
//! assert_eq!(entries.len(), 1);
//! # Ok(())
//! # }
//! ```
#[cfg(feature = "memory")]
pub mod memory;
mod query;
pub mod session;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
mod traits;

#[cfg(feature = "memory")]
pub use memory::{MemoryStore, MemoryStoreBuilder, MemoryStoreError, MemorySubscription};
pub use query::Query;
#[cfg(feature = "file")]
pub use session::{FileSessionError, FileSessionStorage};
pub use session::{MemorySessionStorage, SessionStorage};
pub use traits::{
    ChangeFeed, DataStore, FeedError, Insert, StoreError, Subscription, SubscriptionId,
};
