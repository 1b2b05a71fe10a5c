// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role-aware membership directory with realtime committee messaging.
//!
//! `samiti` ties the pieces of the directory together around two collaborators: a
//! [`DataStore`](samiti_store::DataStore) holding the organisation's collections, which for
//! messaging also needs to be a [`ChangeFeed`](samiti_store::ChangeFeed), and a
//! [`SessionStorage`](samiti_store::SessionStorage) keeping the logged-in identity across
//! restarts.
//!
//! - [`Session`] holds the current identity. Every access decision is a single capability lookup
//!   on its role, see `samiti-auth`.
//! - [`Directory`] reads all collections into a [`Snapshot`], tolerating failing reads.
//! - [`Messenger`] shows one messaging channel, merging history and live inserts into an
//!   ordered, deduplicated log.
//! - [`Accounts`] registers members and checks logins, [`AdminConsole`] performs writes for the
//!   financial officers.
//!
//! ## Example
//!
//! ```
//! # use samiti::{Channel, Registration, Samiti};
//! # use samiti_core::Role;
//! # use samiti_store::{MemorySessionStorage, MemoryStore};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let samiti = Samiti::open(MemoryStore::new(), MemorySessionStorage::new()).await?;
//!
//! samiti
//!     .register(Registration {
//!         name: "Amal Das".into(),
//!         role: Role::GeneralSecretary,
//!         mobile: "01712345678".into(),
//!         passphrase: "secret".into(),
//!         blood_group: "B+".into(),
//!         address: "Khulna".into(),
//!     })
//!     .await?;
//! samiti
//!     .login("01712345678", "secret", Role::GeneralSecretary)
//!     .await?;
//!
//! let mut messenger = samiti.messenger();
//! messenger.open(Channel::Group).await?;
//! messenger.send("Meeting moved to Friday").await?;
//!
//! let snapshot = samiti.refresh().await;
//! assert_eq!(snapshot.members().len(), 1);
//! # messenger.close().await;
//! # Ok(())
//! # }
//! ```
mod accounts;
mod admin;
mod app;
mod builder;
mod config;
mod directory;
mod error;
mod messaging;
mod session;
mod snapshot;

pub use accounts::{Accounts, ProfileChanges, Registration};
pub use admin::AdminConsole;
pub use app::{Samiti, SamitiError};
pub use builder::SamitiBuilder;
pub use config::{
    Config, DEFAULT_MIN_MOBILE_DIGITS, DEFAULT_MIN_PASSPHRASE_LEN, DEFAULT_SESSION_KEY,
};
pub use directory::Directory;
pub use error::{AccountError, AdminError, MessagingError, SessionError, ValidationError};
pub use messaging::{Channel, ChannelStatus, MessageLog, Messenger};
pub use session::Session;
pub use snapshot::{AccountRow, AccountsView, Ledger, SchoolEntry, SchoolSummary, Snapshot};

pub fn builder() -> SamitiBuilder {
    SamitiBuilder::new()
}
