// SPDX-License-Identifier: MIT OR Apache-2.0

//! The identity of the member currently logged in.
use std::sync::{Arc, RwLock};

use samiti_auth::{AuthorizationDenied, Capabilities, Capability, capabilities, require};
use samiti_core::cbor::{decode_cbor, encode_cbor};
use samiti_core::{Identity, Role, Timestamp};
use samiti_store::SessionStorage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SessionError;

/// Persisted form of a session.
#[derive(Debug, Serialize, Deserialize)]
struct SessionSnapshot {
    identity: Identity,
    established_at: Timestamp,
}

/// Holds at most one authenticated identity and keeps it in durable storage.
///
/// Clones share the same current identity. Every change is written to storage before it becomes
/// visible.
#[derive(Clone, Debug)]
pub struct Session<P> {
    storage: P,
    key: String,
    current: Arc<RwLock<Option<Identity>>>,
}

impl<P> Session<P>
where
    P: SessionStorage,
{
    pub fn new(storage: P, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Load the identity persisted by an earlier [`Session::establish`].
    ///
    /// A snapshot which can not be decoded is erased and treated as "no session".
    pub async fn restore(&self) -> Result<Option<Identity>, SessionError<P::Error>> {
        let bytes = self
            .storage
            .load(&self.key)
            .await
            .map_err(SessionError::Storage)?;

        let identity = match bytes {
            Some(bytes) => match decode_cbor::<SessionSnapshot>(&bytes) {
                Ok(snapshot) => {
                    debug!(
                        id = %snapshot.identity.id,
                        established_at = %snapshot.established_at,
                        "restored session"
                    );
                    Some(snapshot.identity)
                }
                Err(err) => {
                    warn!(key = %self.key, "discarding unreadable session snapshot: {err}");
                    self.storage
                        .remove(&self.key)
                        .await
                        .map_err(SessionError::Storage)?;
                    None
                }
            },
            None => None,
        };

        *self.write_current() = identity.clone();
        Ok(identity)
    }

    /// Replace the current identity and persist it.
    pub async fn establish(&self, identity: Identity) -> Result<(), SessionError<P::Error>> {
        let snapshot = SessionSnapshot {
            identity,
            established_at: Timestamp::now(),
        };
        let bytes = encode_cbor(&snapshot)?;
        self.storage
            .save(&self.key, &bytes)
            .await
            .map_err(SessionError::Storage)?;

        debug!(id = %snapshot.identity.id, role = %snapshot.identity.role, "established session");
        *self.write_current() = Some(snapshot.identity);
        Ok(())
    }

    /// Forget the current identity and erase its persisted snapshot.
    pub async fn clear(&self) -> Result<(), SessionError<P::Error>> {
        self.storage
            .remove(&self.key)
            .await
            .map_err(SessionError::Storage)?;

        if let Some(identity) = self.write_current().take() {
            debug!(id = %identity.id, "cleared session");
        }
        Ok(())
    }
}

impl<P> Session<P> {
    pub fn current(&self) -> Option<Identity> {
        self.read_current().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_current().is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.read_current().as_ref().map(|identity| identity.role)
    }

    /// Capabilities of the current identity. Nobody logged in holds none.
    pub fn capabilities(&self) -> Capabilities {
        self.role().map(capabilities).unwrap_or(Capabilities::NONE)
    }

    /// Returns the current identity if it holds the capability.
    pub fn authorize(&self, capability: Capability) -> Result<Identity, AuthorizationDenied> {
        match self.current() {
            Some(identity) => {
                require(identity.role, capability)?;
                Ok(identity)
            }
            None => {
                debug!(%capability, "capability check without session");
                Err(AuthorizationDenied { capability })
            }
        }
    }

    fn read_current(&self) -> std::sync::RwLockReadGuard<'_, Option<Identity>> {
        self.current
            .read()
            .expect("acquire shared read access on session")
    }

    fn write_current(&self) -> std::sync::RwLockWriteGuard<'_, Option<Identity>> {
        self.current
            .write()
            .expect("acquire exclusive write access on session")
    }
}
