// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

type Filter<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;
type Comparator<R> = Arc<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

/// Filter and order applied to a collection read.
///
/// Filters accumulate, a record is returned only if it passes all of them. Ordering is stable,
/// records which compare equal keep the store's key order.
pub struct Query<R> {
    filters: Vec<Filter<R>>,
    order: Option<Comparator<R>>,
    limit: Option<usize>,
}

impl<R> Query<R> {
    /// Every record of the collection, by ascending key.
    pub fn all() -> Self {
        Self {
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn order_by<K, F>(mut self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&R) -> K + Send + Sync + 'static,
    {
        self.order = Some(Arc::new(move |a: &R, b: &R| key(a).cmp(&key(b))));
        self
    }

    pub fn order_by_desc<K, F>(mut self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&R) -> K + Send + Sync + 'static,
    {
        self.order = Some(Arc::new(move |a: &R, b: &R| key(b).cmp(&key(a))));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, record: &R) -> bool {
        self.filters.iter().all(|filter| filter(record))
    }

    /// Apply the query to records given in key order.
    pub fn apply(&self, records: impl IntoIterator<Item = R>) -> Vec<R> {
        let mut records: Vec<R> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();

        if let Some(order) = &self.order {
            records.sort_by(|a, b| order(a, b));
        }

        if let Some(limit) = self.limit {
            records.truncate(limit);
        }

        records
    }
}

impl<R> Default for Query<R> {
    fn default() -> Self {
        Self::all()
    }
}

impl<R> Clone for Query<R> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            order: self.order.clone(),
            limit: self.limit,
        }
    }
}

impl<R> Debug for Query<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("filters", &self.filters.len())
            .field("ordered", &self.order.is_some())
            .field("limit", &self.limit)
            .finish()
    }
}
