// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::keys::IdentityId;
use crate::record::{Collection, Record};
use crate::role::Role;

/// An authenticated member of the organisation.
///
/// This is the value held by the session and shown throughout the directory. It never carries
/// the member's shared secret, see [`Profile`] for the stored form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub name: String,
    pub role: Role,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub blood_group: String,
    pub profile_pic: String,
}

/// Stored form of an identity, including the shared secret used to log in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub identity: Identity,
    pub passphrase: String,
}

impl Profile {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn into_identity(self) -> Identity {
        self.identity
    }
}

impl Record for Profile {
    const COLLECTION: Collection = Collection::Identities;

    type Key = IdentityId;

    fn key(&self) -> IdentityId {
        self.identity.id
    }

    fn set_key(&mut self, key: IdentityId) {
        self.identity.id = key;
    }

    /// A mobile number identifies at most one member.
    fn unique_value(&self) -> Option<&str> {
        Some(&self.identity.mobile)
    }
}
