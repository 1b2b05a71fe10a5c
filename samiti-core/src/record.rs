// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::keys::RecordKey;

/// Named collections of the relational store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Collection {
    Identities,
    LedgerEntries,
    Schools,
    Students,
    Announcements,
    Gallery,
    Messages,
    Settings,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Identities,
        Collection::LedgerEntries,
        Collection::Schools,
        Collection::Students,
        Collection::Announcements,
        Collection::Gallery,
        Collection::Messages,
        Collection::Settings,
    ];

    /// Table name of the collection in the store.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Identities => "profiles",
            Collection::LedgerEntries => "transactions",
            Collection::Schools => "schools",
            Collection::Students => "students",
            Collection::Announcements => "updates",
            Collection::Gallery => "gallery",
            Collection::Messages => "messages",
            Collection::Settings => "site_settings",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A value which lives in exactly one collection of the store.
///
/// Foreign keys between records (student to school, ledger entry to identity, message to
/// identity) are plain key fields and are not enforced by the store.
pub trait Record: Clone + Debug + Serialize + for<'a> Deserialize<'a> + Send + Sync + 'static {
    const COLLECTION: Collection;

    type Key: RecordKey;

    fn key(&self) -> Self::Key;

    /// Called by the store when it assigns a key to a new record.
    fn set_key(&mut self, key: Self::Key);

    /// Value which must be unique among all records of the collection, if any.
    fn unique_value(&self) -> Option<&str> {
        None
    }
}
