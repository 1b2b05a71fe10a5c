// SPDX-License-Identifier: MIT OR Apache-2.0

use samiti_auth::AuthorizationDenied;
use samiti_core::{Identity, Role};
use samiti_store::{ChangeFeed, DataStore, SessionStorage};
use thiserror::Error;
use tracing::debug;

use crate::accounts::{Accounts, ProfileChanges, Registration};
use crate::admin::AdminConsole;
use crate::config::Config;
use crate::directory::Directory;
use crate::error::{AccountError, SessionError};
use crate::messaging::Messenger;
use crate::session::Session;
use crate::snapshot::Snapshot;

/// Membership directory bound to a store and a durable session.
pub struct Samiti<S, P> {
    config: Config,
    store: S,
    session: Session<P>,
    directory: Directory<S>,
    accounts: Accounts<S>,
}

impl<S, P> Samiti<S, P>
where
    S: DataStore,
    P: SessionStorage,
{
    /// Open with the default configuration.
    pub async fn open(store: S, storage: P) -> Result<Self, SessionError<P::Error>> {
        Self::open_inner(Config::default(), store, storage).await
    }

    pub(crate) async fn open_inner(
        config: Config,
        store: S,
        storage: P,
    ) -> Result<Self, SessionError<P::Error>> {
        let session = Session::new(storage, config.session_key.clone());
        session.restore().await?;

        Ok(Self {
            directory: Directory::new(store.clone()),
            accounts: Accounts::new(store.clone(), config.clone()),
            config,
            store,
            session,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    /// The logged-in member, if any.
    pub fn current(&self) -> Option<Identity> {
        self.session.current()
    }

    pub fn directory(&self) -> &Directory<S> {
        &self.directory
    }

    pub async fn refresh(&self) -> Snapshot {
        self.directory.refresh().await
    }

    pub async fn register(
        &self,
        registration: Registration,
    ) -> Result<Identity, AccountError<S::Error>> {
        self.accounts.register(registration).await
    }

    /// Authenticate and establish the session.
    pub async fn login(
        &self,
        mobile: &str,
        passphrase: &str,
        role: Role,
    ) -> Result<Identity, SamitiError<S::Error, P::Error>> {
        let identity = self.accounts.authenticate(mobile, passphrase, role).await?;
        self.session.establish(identity.clone()).await?;
        debug!(id = %identity.id, "logged in");
        Ok(identity)
    }

    pub async fn logout(&self) -> Result<(), SessionError<P::Error>> {
        self.session.clear().await
    }

    /// Update the current member's profile and keep the session in step with it.
    pub async fn update_profile(
        &self,
        changes: ProfileChanges,
    ) -> Result<Identity, SamitiError<S::Error, P::Error>> {
        let current = self.session.current().ok_or(SamitiError::NotAuthenticated)?;
        let identity = self.accounts.update_profile(&current, changes).await?;
        self.session.establish(identity.clone()).await?;
        Ok(identity)
    }

    /// Administrative writes, for members holding the admin capability.
    pub fn admin(&self) -> Result<AdminConsole<S, P>, AuthorizationDenied> {
        AdminConsole::open(self.store.clone(), self.session.clone())
    }
}

impl<S, P> Samiti<S, P>
where
    S: DataStore + ChangeFeed,
    P: SessionStorage,
{
    /// A messenger for the current session. Opening a channel checks the session's capabilities.
    pub fn messenger(&self) -> Messenger<S, P> {
        Messenger::new(self.store.clone(), self.session.clone())
    }
}

#[derive(Debug, Error)]
pub enum SamitiError<E, P> {
    #[error(transparent)]
    Account(#[from] AccountError<E>),

    #[error(transparent)]
    Session(#[from] SessionError<P>),

    #[error("no member is logged in")]
    NotAuthenticated,
}
