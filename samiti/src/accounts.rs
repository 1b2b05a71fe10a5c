// SPDX-License-Identifier: MIT OR Apache-2.0

//! Member registration and login.
//!
//! Logging in compares the stored shared secret with the one given, as the organisation's
//! existing member records expect. This is weak authentication and intentionally left as is.
use samiti_core::{Identity, IdentityId, Profile, Role};
use samiti_store::{DataStore, Query, StoreError};
use tracing::debug;

use crate::config::Config;
use crate::error::{AccountError, ValidationError};

/// Details collected when a member signs up.
#[derive(Clone, Debug)]
pub struct Registration {
    pub name: String,
    pub role: Role,
    pub mobile: String,
    pub passphrase: String,
    pub blood_group: String,
    pub address: String,
}

/// Fields a member may change on their own profile. `None` keeps the current value.
#[derive(Clone, Debug, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub blood_group: Option<String>,
    pub address: Option<String>,
    pub profile_pic: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Accounts<S> {
    store: S,
    config: Config,
}

impl<S> Accounts<S>
where
    S: DataStore,
{
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// Create the profile of a new member. Does not log them in.
    ///
    /// A mobile number already in use is rejected with [`ValidationError::DuplicateMobile`], also
    /// when a concurrent registration claimed it between the lookup and the write.
    pub async fn register(
        &self,
        registration: Registration,
    ) -> Result<Identity, AccountError<S::Error>> {
        let name = registration.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if registration.blood_group.trim().is_empty() {
            return Err(ValidationError::MissingField("blood group").into());
        }

        let mobile = registration.mobile.trim();
        let min = self.config.min_mobile_digits;
        if mobile.len() < min || !mobile.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::MalformedMobile { min }.into());
        }

        let min = self.config.min_passphrase_len;
        if registration.passphrase.chars().count() < min {
            return Err(ValidationError::PassphraseTooShort { min }.into());
        }

        if self.find_by_mobile(mobile).await?.is_some() {
            return Err(ValidationError::DuplicateMobile.into());
        }

        let profile = Profile {
            identity: Identity {
                id: IdentityId::UNASSIGNED,
                name: name.to_string(),
                role: registration.role,
                mobile: mobile.to_string(),
                email: String::new(),
                address: registration.address.trim().to_string(),
                blood_group: registration.blood_group.trim().to_string(),
                profile_pic: String::new(),
            },
            passphrase: registration.passphrase,
        };

        let profile = self.store.upsert(profile).await.map_err(|err| {
            if err.is_unique_violation() {
                AccountError::Validation(ValidationError::DuplicateMobile)
            } else {
                AccountError::Store(err)
            }
        })?;
        debug!(id = %profile.identity.id, role = %profile.identity.role, "registered member");
        Ok(profile.into_identity())
    }

    /// Look up the member matching mobile number, passphrase and role.
    pub async fn authenticate(
        &self,
        mobile: &str,
        passphrase: &str,
        role: Role,
    ) -> Result<Identity, AccountError<S::Error>> {
        let mobile = mobile.trim().to_string();
        let passphrase = passphrase.to_string();
        let query = Query::all().filter(move |profile: &Profile| {
            profile.identity.mobile == mobile
                && profile.passphrase == passphrase
                && profile.identity.role == role
        });

        let profiles = self
            .store
            .read_all(&query)
            .await
            .map_err(AccountError::Store)?;
        profiles
            .into_iter()
            .next()
            .map(Profile::into_identity)
            .ok_or(AccountError::InvalidCredentials)
    }

    /// Apply changes to the profile of `identity` and return the updated identity.
    ///
    /// Role, mobile number and passphrase are not changed here.
    pub async fn update_profile(
        &self,
        identity: &Identity,
        changes: ProfileChanges,
    ) -> Result<Identity, AccountError<S::Error>> {
        let id = identity.id;
        let query = Query::all().filter(move |profile: &Profile| profile.identity.id == id);
        let mut profile = self
            .store
            .read_all(&query)
            .await
            .map_err(AccountError::Store)?
            .into_iter()
            .next()
            .ok_or(AccountError::UnknownMember(id))?;

        if let Some(name) = changes.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ValidationError::EmptyName.into());
            }
            profile.identity.name = name.to_string();
        }
        if let Some(email) = changes.email {
            profile.identity.email = email.trim().to_string();
        }
        if let Some(blood_group) = changes.blood_group {
            profile.identity.blood_group = blood_group.trim().to_string();
        }
        if let Some(address) = changes.address {
            profile.identity.address = address.trim().to_string();
        }
        if let Some(profile_pic) = changes.profile_pic {
            profile.identity.profile_pic = profile_pic;
        }

        let profile = self
            .store
            .upsert(profile)
            .await
            .map_err(AccountError::Store)?;
        debug!(id = %profile.identity.id, "updated profile");
        Ok(profile.into_identity())
    }

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<Profile>, AccountError<S::Error>> {
        let mobile = mobile.to_string();
        let query = Query::all().filter(move |profile: &Profile| profile.identity.mobile == mobile);
        let profiles = self
            .store
            .read_all(&query)
            .await
            .map_err(AccountError::Store)?;
        Ok(profiles.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use samiti_core::{Collection, IdentityId, Record, Role};
    use samiti_store::{DataStore, MemoryStore, Query};

    use crate::config::Config;
    use crate::error::{AccountError, ValidationError};

    use super::{Accounts, ProfileChanges, Registration};

    fn registration(mobile: &str) -> Registration {
        Registration {
            name: "Bina Ghosh".into(),
            role: Role::CulturalSecretary,
            mobile: mobile.into(),
            passphrase: "lotus".into(),
            blood_group: "A+".into(),
            address: "Jessore".into(),
        }
    }

    /// Hands out read results only after yielding, so concurrent callers all read before any of
    /// them writes.
    #[derive(Clone, Debug)]
    struct YieldingReads(MemoryStore);

    impl DataStore for YieldingReads {
        type Error = <MemoryStore as DataStore>::Error;

        async fn read_all<R: Record>(&self, query: &Query<R>) -> Result<Vec<R>, Self::Error> {
            let records = self.0.read_all(query).await?;
            tokio::task::yield_now().await;
            Ok(records)
        }

        async fn upsert<R: Record>(&self, record: R) -> Result<R, Self::Error> {
            self.0.upsert(record).await
        }

        async fn delete<R: Record>(&self, key: R::Key) -> Result<bool, Self::Error> {
            self.0.delete::<R>(key).await
        }
    }

    #[tokio::test]
    async fn register_and_authenticate() {
        let accounts = Accounts::new(MemoryStore::new(), Config::default());
        let bina = accounts.register(registration("01711111111")).await.unwrap();
        assert_eq!(bina.id, IdentityId::new(1));

        let identity = accounts
            .authenticate("01711111111", "lotus", Role::CulturalSecretary)
            .await
            .unwrap();
        assert_eq!(identity, bina);

        // All three must match.
        assert_matches!(
            accounts
                .authenticate("01711111111", "lotus", Role::President)
                .await,
            Err(AccountError::InvalidCredentials)
        );
        assert_matches!(
            accounts
                .authenticate("01711111111", "lily", Role::CulturalSecretary)
                .await,
            Err(AccountError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn registration_is_validated() {
        let accounts = Accounts::new(MemoryStore::new(), Config::default());

        let mut short_mobile = registration("0171");
        assert_matches!(
            accounts.register(short_mobile.clone()).await,
            Err(AccountError::Validation(ValidationError::MalformedMobile { min: 11 }))
        );

        short_mobile.mobile = "01711111111".into();
        short_mobile.passphrase = "abc".into();
        assert_matches!(
            accounts.register(short_mobile).await,
            Err(AccountError::Validation(ValidationError::PassphraseTooShort { min: 4 }))
        );

        let mut nameless = registration("01711111111");
        nameless.name = "  ".into();
        assert_matches!(
            accounts.register(nameless).await,
            Err(AccountError::Validation(ValidationError::EmptyName))
        );

        accounts.register(registration("01711111111")).await.unwrap();
        assert_matches!(
            accounts.register(registration("01711111111")).await,
            Err(AccountError::Validation(ValidationError::DuplicateMobile))
        );
    }

    #[tokio::test]
    async fn profile_changes_keep_role_and_secret() {
        let accounts = Accounts::new(MemoryStore::new(), Config::default());
        let bina = accounts.register(registration("01711111111")).await.unwrap();

        let changes = ProfileChanges {
            email: Some("bina@example.org".into()),
            address: Some("Dhaka".into()),
            ..Default::default()
        };
        let updated = accounts.update_profile(&bina, changes).await.unwrap();
        assert_eq!(updated.id, bina.id);
        assert_eq!(updated.email, "bina@example.org");
        assert_eq!(updated.address, "Dhaka");
        assert_eq!(updated.name, bina.name);

        let again = accounts
            .authenticate("01711111111", "lotus", Role::CulturalSecretary)
            .await
            .unwrap();
        assert_eq!(again, updated);
    }

    #[tokio::test]
    async fn racing_registrations_claim_mobile_once() {
        let store = MemoryStore::new();
        let accounts = Accounts::new(YieldingReads(store.clone()), Config::default());

        let mut other = registration("01711111111");
        other.name = "Chandan Pal".into();
        let (first, second) = tokio::join!(
            accounts.register(registration("01711111111")),
            accounts.register(other),
        );

        assert!(first.is_ok());
        assert_matches!(
            second,
            Err(AccountError::Validation(ValidationError::DuplicateMobile))
        );
        assert_eq!(store.len(Collection::Identities), 1);
    }
}
