// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store wrappers for observing and disturbing the collaborators in tests.
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use samiti_core::{Collection, Record};
use thiserror::Error;

use crate::query::Query;
use crate::traits::{ChangeFeed, DataStore, FeedError, StoreError};

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// Store which counts the calls made to the store it wraps.
#[derive(Clone, Debug)]
pub struct SpyStore<S> {
    inner: S,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl<S> SpyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            reads: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of upserts and deletes issued so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl<S: DataStore> DataStore for SpyStore<S> {
    type Error = S::Error;

    async fn read_all<R: Record>(&self, query: &Query<R>) -> Result<Vec<R>, Self::Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_all(query).await
    }

    async fn upsert<R: Record>(&self, record: R) -> Result<R, Self::Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(record).await
    }

    async fn delete<R: Record>(&self, key: R::Key) -> Result<bool, Self::Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete::<R>(key).await
    }
}

impl<S: ChangeFeed> ChangeFeed for SpyStore<S> {
    type Subscription = S::Subscription;

    async fn subscribe(&self, collection: Collection) -> Result<Self::Subscription, FeedError> {
        self.inner.subscribe(collection).await
    }
}

/// Store failing reads of chosen collections and, optionally, every subscription attempt.
#[derive(Clone, Debug)]
pub struct FaultyStore<S> {
    inner: S,
    failing_reads: Arc<RwLock<HashSet<Collection>>>,
    failing_subscriptions: Arc<AtomicBool>,
}

impl<S> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failing_reads: Arc::default(),
            failing_subscriptions: Arc::default(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn fail_reads(&self, collection: Collection) {
        self.failing_reads
            .write()
            .expect("acquire exclusive write access on faults")
            .insert(collection);
    }

    pub fn heal_reads(&self, collection: Collection) {
        self.failing_reads
            .write()
            .expect("acquire exclusive write access on faults")
            .remove(&collection);
    }

    pub fn fail_subscriptions(&self, fail: bool) {
        self.failing_subscriptions.store(fail, Ordering::SeqCst);
    }

    fn read_fails(&self, collection: Collection) -> bool {
        self.failing_reads
            .read()
            .expect("acquire shared read access on faults")
            .contains(&collection)
    }

    fn subscribe_fails(&self) -> bool {
        self.failing_subscriptions.load(Ordering::SeqCst)
    }
}

impl<S: DataStore> DataStore for FaultyStore<S> {
    type Error = FaultyStoreError<S::Error>;

    async fn read_all<R: Record>(&self, query: &Query<R>) -> Result<Vec<R>, Self::Error> {
        if self.read_fails(R::COLLECTION) {
            return Err(FaultyStoreError::Injected(R::COLLECTION));
        }
        self.inner
            .read_all(query)
            .await
            .map_err(FaultyStoreError::Inner)
    }

    async fn upsert<R: Record>(&self, record: R) -> Result<R, Self::Error> {
        self.inner
            .upsert(record)
            .await
            .map_err(FaultyStoreError::Inner)
    }

    async fn delete<R: Record>(&self, key: R::Key) -> Result<bool, Self::Error> {
        self.inner
            .delete::<R>(key)
            .await
            .map_err(FaultyStoreError::Inner)
    }
}

impl<S: ChangeFeed> ChangeFeed for FaultyStore<S> {
    type Subscription = S::Subscription;

    async fn subscribe(&self, collection: Collection) -> Result<Self::Subscription, FeedError> {
        if self.subscribe_fails() {
            return Err(FeedError::Unavailable(format!(
                "injected subscription failure for {collection}"
            )));
        }
        self.inner.subscribe(collection).await
    }
}

#[derive(Debug, Error)]
pub enum FaultyStoreError<E> {
    #[error("injected read failure for {0}")]
    Injected(Collection),

    #[error(transparent)]
    Inner(E),
}

impl<E: StoreError> StoreError for FaultyStoreError<E> {
    fn is_unique_violation(&self) -> bool {
        match self {
            FaultyStoreError::Injected(_) => false,
            FaultyStoreError::Inner(err) => err.is_unique_violation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use samiti_core::{Collection, GalleryId, GalleryItem, School};

    use crate::{DataStore, MemoryStore, Query};

    use super::{FaultyStore, FaultyStoreError, SpyStore};

    #[tokio::test]
    async fn spy_counts_calls() {
        let store = SpyStore::new(MemoryStore::new());
        let item = GalleryItem {
            id: GalleryId::UNASSIGNED,
            title: "Picnic".into(),
            description: String::new(),
            url: "https://example.org/picnic.jpg".into(),
        };
        let item = store.upsert(item).await.unwrap();
        store.delete::<GalleryItem>(item.id).await.unwrap();
        let _ = store.read_all::<GalleryItem>(&Query::all()).await.unwrap();

        assert_eq!(store.writes(), 2);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn injected_read_failures() {
        let store = FaultyStore::new(MemoryStore::new());
        store.fail_reads(Collection::Schools);

        assert_matches!(
            store.read_all::<School>(&Query::all()).await,
            Err(FaultyStoreError::Injected(Collection::Schools))
        );
        assert!(store.read_all::<GalleryItem>(&Query::all()).await.is_ok());

        store.heal_reads(Collection::Schools);
        assert!(store.read_all::<School>(&Query::all()).await.is_ok());
    }
}
