// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core data types of the samiti membership directory.
//!
//! `samiti-core` holds every value that crosses a component boundary: the identities of members
//! and their [`Role`], the fee ledger, schools and their students, announcements, gallery items,
//! the site-wide contact settings and the [`Message`] type used by the realtime channels.
//!
//! All of these are [`Record`]s. A record belongs to exactly one named [`Collection`] of the
//! relational store and is addressed by a typed key which the store assigns on first insert.
//! Records are exchanged with the store and with durable session storage in CBOR, see [`cbor`].
//!
//! ## Example
//!
//! ```
//! use samiti_core::{IdentityId, Message, Recipient, Role, Timestamp};
//!
//! let role: Role = "finance-secretary".parse().unwrap();
//! assert_eq!(role, Role::FinanceSecretary);
//!
//! let message = Message::new(
//!     IdentityId::new(7),
//!     Recipient::Group,
//!     "Meeting moved to Friday",
//!     Timestamp::from_micros(1_700_000_000_000_000),
//! );
//! assert!(message.is_group());
//! ```
pub mod cbor;
mod content;
mod identity;
mod keys;
mod ledger;
mod message;
mod record;
mod role;
mod school;
mod timestamp;

pub use content::{Announcement, Aspect, ContactSettings, GalleryItem, MediaKind};
pub use identity::{Identity, Profile};
pub use keys::{
    AnnouncementId, EntryId, GalleryId, IdentityId, KeyError, MessageId, RecordKey, SchoolId,
    SettingsId, StudentId,
};
pub use ledger::{Amount, AmountError, LedgerEntry};
pub use message::{GROUP_SENTINEL, Message, Recipient, RecipientError};
pub use record::{Collection, Record};
pub use role::{Role, RoleError};
pub use school::{School, Student};
pub use timestamp::Timestamp;
