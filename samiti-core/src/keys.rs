// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Debug, Display};
use std::hash::Hash as StdHash;
use std::num::ParseIntError;

use thiserror::Error;

/// Key of a record inside its collection.
///
/// Keys are positive integers handed out by the store in assignment order. The value `0` marks a
/// record which was not written yet; the store replaces it with the next key of the collection.
pub trait RecordKey:
    Copy + Debug + Display + Eq + Ord + StdHash + Send + Sync + 'static
{
    /// Key for the given position of the store's sequence.
    fn from_sequence(seq: u64) -> Self;

    /// Position of this key in the store's sequence.
    fn sequence(&self) -> u64;

    /// Returns `false` for records the store has not seen yet.
    fn is_assigned(&self) -> bool {
        self.sequence() != 0
    }
}

macro_rules! record_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            Debug,
            Default,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Placeholder key of a record which was not written yet.
            pub const UNASSIGNED: Self = Self(0);

            pub const fn new(value: u64) -> Self {
                Self(value)
            }
        }

        impl RecordKey for $name {
            fn from_sequence(seq: u64) -> Self {
                Self(seq)
            }

            fn sequence(&self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = KeyError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Ok(Self(value.trim().parse()?))
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

record_key!(
    /// Key of a member identity.
    IdentityId
);
record_key!(
    /// Key of a ledger entry.
    EntryId
);
record_key!(SchoolId);
record_key!(StudentId);
record_key!(AnnouncementId);
record_key!(GalleryId);
record_key!(
    /// Key of a message. Keys are assigned in insertion order and break timestamp ties.
    MessageId
);
record_key!(
    /// Key of a settings record.
    SettingsId
);

impl SettingsId {
    /// The single contact settings record.
    pub const CONTACT: Self = Self(1);
}

#[derive(Debug, Error)]
#[error("invalid record key: {0}")]
pub struct KeyError(#[from] ParseIntError);
