// SPDX-License-Identifier: MIT OR Apache-2.0

//! Administrative writes, reserved for the financial officers.
use samiti_auth::{AuthorizationDenied, Capability};
use samiti_core::{
    Amount, Announcement, AnnouncementId, ContactSettings, EntryId, GalleryId, GalleryItem,
    Identity, IdentityId, LedgerEntry, Profile, Record, School, SchoolId, Student, StudentId,
    Timestamp,
};
use samiti_store::{DataStore, SessionStorage};
use tracing::debug;

use crate::error::{AdminError, ValidationError};
use crate::session::Session;

/// Writes to every collection of the directory.
///
/// Each operation checks [`Capability::UseAdmin`] against the session before touching the store,
/// so a console obtained earlier stops working once its identity logs out. Changes show up with
/// the next directory refresh.
#[derive(Clone, Debug)]
pub struct AdminConsole<S, P> {
    store: S,
    session: Session<P>,
}

impl<S, P> AdminConsole<S, P>
where
    S: DataStore,
    P: SessionStorage,
{
    pub(crate) fn open(store: S, session: Session<P>) -> Result<Self, AuthorizationDenied> {
        session.authorize(Capability::UseAdmin)?;
        Ok(Self { store, session })
    }

    /// Record a fee payment. The amount is taken as entered and must be a whole, non-negative
    /// number.
    pub async fn record_payment(
        &self,
        member: IdentityId,
        amount: &str,
        period: &str,
    ) -> Result<LedgerEntry, AdminError<S::Error>> {
        self.authorize()?;
        let amount: Amount = amount.parse().map_err(ValidationError::from)?;
        let period = required("period", period)?;

        let entry = LedgerEntry::new(member, amount, period, Timestamp::now());
        self.save(entry).await
    }

    pub async fn remove_payment(&self, entry: EntryId) -> Result<bool, AdminError<S::Error>> {
        self.remove::<LedgerEntry>(entry).await
    }

    /// Insert a new school or update an existing one.
    pub async fn save_school(&self, school: School) -> Result<School, AdminError<S::Error>> {
        self.authorize()?;
        required("school name", &school.name)?;
        self.save(school).await
    }

    /// Remove a school. Its students stay in the store but are no longer listed.
    pub async fn remove_school(&self, school: SchoolId) -> Result<bool, AdminError<S::Error>> {
        self.remove::<School>(school).await
    }

    pub async fn save_student(&self, student: Student) -> Result<Student, AdminError<S::Error>> {
        self.authorize()?;
        required("student name", &student.name)?;
        self.save(student).await
    }

    pub async fn remove_student(&self, student: StudentId) -> Result<bool, AdminError<S::Error>> {
        self.remove::<Student>(student).await
    }

    pub async fn post_announcement(
        &self,
        announcement: Announcement,
    ) -> Result<Announcement, AdminError<S::Error>> {
        self.authorize()?;
        required("title", &announcement.title)?;
        self.save(announcement).await
    }

    pub async fn remove_announcement(
        &self,
        announcement: AnnouncementId,
    ) -> Result<bool, AdminError<S::Error>> {
        self.remove::<Announcement>(announcement).await
    }

    pub async fn add_gallery_item(
        &self,
        item: GalleryItem,
    ) -> Result<GalleryItem, AdminError<S::Error>> {
        self.authorize()?;
        required("image url", &item.url)?;
        self.save(item).await
    }

    pub async fn remove_gallery_item(&self, item: GalleryId) -> Result<bool, AdminError<S::Error>> {
        self.remove::<GalleryItem>(item).await
    }

    pub async fn save_contact_settings(
        &self,
        settings: ContactSettings,
    ) -> Result<ContactSettings, AdminError<S::Error>> {
        self.authorize()?;
        self.save(settings).await
    }

    /// Delete a member's profile. Their ledger entries and messages are kept.
    pub async fn remove_member(&self, member: IdentityId) -> Result<bool, AdminError<S::Error>> {
        self.remove::<Profile>(member).await
    }

    fn authorize(&self) -> Result<Identity, AuthorizationDenied> {
        self.session.authorize(Capability::UseAdmin)
    }

    async fn save<R: Record>(&self, record: R) -> Result<R, AdminError<S::Error>> {
        let record = self.store.upsert(record).await.map_err(AdminError::Store)?;
        debug!(collection = %R::COLLECTION, key = %record.key(), "admin saved record");
        Ok(record)
    }

    async fn remove<R: Record>(&self, key: R::Key) -> Result<bool, AdminError<S::Error>> {
        self.authorize()?;
        let removed = self
            .store
            .delete::<R>(key)
            .await
            .map_err(AdminError::Store)?;
        debug!(collection = %R::COLLECTION, %key, removed, "admin removed record");
        Ok(removed)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use samiti_core::{
        Amount, AmountError, Announcement, AnnouncementId, Aspect, Collection, ContactSettings,
        GalleryId, GalleryItem, Identity, IdentityId, MediaKind, Profile, Role, School, SchoolId,
        Student, StudentId,
    };
    use samiti_store::test_utils::SpyStore;
    use samiti_store::{DataStore, MemorySessionStorage, MemoryStore, Query};

    use crate::error::{AdminError, ValidationError};
    use crate::session::Session;

    use super::AdminConsole;

    fn officer(role: Role) -> Identity {
        Identity {
            id: IdentityId::new(1),
            name: "Dipa Saha".into(),
            role,
            mobile: "01900000000".into(),
            email: String::new(),
            address: String::new(),
            blood_group: "AB-".into(),
            profile_pic: String::new(),
        }
    }

    async fn treasurer_console() -> (MemoryStore, AdminConsole<MemoryStore, MemorySessionStorage>)
    {
        let store = MemoryStore::new();
        let session = Session::new(MemorySessionStorage::new(), "cm_logged_user");
        session
            .establish(officer(Role::FinanceSecretary))
            .await
            .unwrap();
        let console = AdminConsole::open(store.clone(), session).unwrap();
        (store, console)
    }

    fn announcement(title: &str) -> Announcement {
        Announcement {
            id: AnnouncementId::UNASSIGNED,
            title: title.into(),
            description: String::new(),
            media_url: String::new(),
            media_kind: MediaKind::Image,
            aspect: Aspect::Landscape,
            date: "2025-10-01".into(),
        }
    }

    fn student(school: SchoolId, name: &str, roll: &str) -> Student {
        Student {
            id: StudentId::UNASSIGNED,
            school,
            name: name.into(),
            father_name: String::new(),
            mother_name: String::new(),
            mobile: String::new(),
            class_name: "Three".into(),
            roll: roll.into(),
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn only_financial_officers_open_console() {
        let store = MemoryStore::new();
        let session = Session::new(MemorySessionStorage::new(), "cm_logged_user");
        assert!(AdminConsole::open(store.clone(), session.clone()).is_err());

        session.establish(officer(Role::President)).await.unwrap();
        assert!(AdminConsole::open(store.clone(), session.clone()).is_err());

        session
            .establish(officer(Role::JointFinanceSecretary))
            .await
            .unwrap();
        assert!(AdminConsole::open(store, session).is_ok());
    }

    #[tokio::test]
    async fn console_rechecks_after_logout() {
        let store = SpyStore::new(MemoryStore::new());
        let session = Session::new(MemorySessionStorage::new(), "cm_logged_user");
        session
            .establish(officer(Role::FinanceSecretary))
            .await
            .unwrap();

        let console = AdminConsole::open(store.clone(), session.clone()).unwrap();
        let entry = console
            .record_payment(IdentityId::new(5), "500", "January")
            .await
            .unwrap();
        assert_eq!(entry.amount, Amount::new(500));
        assert_eq!(store.inner().len(Collection::LedgerEntries), 1);

        session.clear().await.unwrap();
        assert_matches!(
            console.remove_payment(entry.id).await,
            Err(AdminError::Denied(_))
        );
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn payments_are_validated() {
        let session = Session::new(MemorySessionStorage::new(), "cm_logged_user");
        session
            .establish(officer(Role::FinanceSecretary))
            .await
            .unwrap();
        let console = AdminConsole::open(MemoryStore::new(), session).unwrap();

        assert_matches!(
            console
                .record_payment(IdentityId::new(5), "-20", "January")
                .await,
            Err(AdminError::Validation(ValidationError::Amount(
                AmountError::Negative(_)
            )))
        );
        assert_matches!(
            console
                .record_payment(IdentityId::new(5), "five hundred", "January")
                .await,
            Err(AdminError::Validation(ValidationError::Amount(
                AmountError::Invalid(_)
            )))
        );
        assert_matches!(
            console.record_payment(IdentityId::new(5), "500", " ").await,
            Err(AdminError::Validation(ValidationError::MissingField("period")))
        );
    }

    #[tokio::test]
    async fn announcements_and_gallery() {
        let (store, console) = treasurer_console().await;

        let first = console.post_announcement(announcement("Durga Puja")).await.unwrap();
        let second = console.post_announcement(announcement("Blood drive")).await.unwrap();
        assert!(first.id < second.id);
        assert_matches!(
            console.post_announcement(announcement("  ")).await,
            Err(AdminError::Validation(ValidationError::MissingField("title")))
        );

        assert!(console.remove_announcement(first.id).await.unwrap());
        assert!(!console.remove_announcement(first.id).await.unwrap());
        let left: Vec<Announcement> = store.read_all(&Query::all()).await.unwrap();
        assert_eq!(left, vec![second]);

        let item = GalleryItem {
            id: GalleryId::UNASSIGNED,
            title: "Prize giving".into(),
            description: String::new(),
            url: "https://img.example/prize.jpg".into(),
        };
        assert_matches!(
            console
                .add_gallery_item(GalleryItem {
                    url: String::new(),
                    ..item.clone()
                })
                .await,
            Err(AdminError::Validation(ValidationError::MissingField("image url")))
        );
        let item = console.add_gallery_item(item).await.unwrap();
        assert_eq!(store.len(Collection::Gallery), 1);
        assert!(console.remove_gallery_item(item.id).await.unwrap());
        assert!(store.is_empty(Collection::Gallery));
    }

    #[tokio::test]
    async fn contact_settings_stay_single() {
        let (store, console) = treasurer_console().await;

        console
            .save_contact_settings(ContactSettings {
                phone1: "01700000000".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        console
            .save_contact_settings(ContactSettings {
                phone1: "01800000000".into(),
                email: "office@samiti.org".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let settings: Vec<ContactSettings> = store.read_all(&Query::all()).await.unwrap();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings[0].phone1, "01800000000");
        assert_eq!(settings[0].email, "office@samiti.org");
    }

    #[tokio::test]
    async fn schools_and_students() {
        let (store, console) = treasurer_console().await;

        let school = console
            .save_school(School {
                id: SchoolId::UNASSIGNED,
                name: "Gita Vidyapith".into(),
                teacher_name: "Sumana Roy".into(),
                teacher_phone: String::new(),
                teacher_image: String::new(),
                established: "2019".into(),
            })
            .await
            .unwrap();
        assert_matches!(
            console
                .save_school(School {
                    name: String::new(),
                    ..school.clone()
                })
                .await,
            Err(AdminError::Validation(ValidationError::MissingField("school name")))
        );

        let ritu = console
            .save_student(student(school.id, "Ritu Paul", "1"))
            .await
            .unwrap();
        console
            .save_student(student(school.id, "Mita Dey", "2"))
            .await
            .unwrap();
        assert_matches!(
            console.save_student(student(school.id, " ", "3")).await,
            Err(AdminError::Validation(ValidationError::MissingField("student name")))
        );
        assert_eq!(store.len(Collection::Students), 2);

        assert!(console.remove_student(ritu.id).await.unwrap());
        assert_eq!(store.len(Collection::Students), 1);

        // Students outlive their school in the store.
        assert!(console.remove_school(school.id).await.unwrap());
        assert!(store.is_empty(Collection::Schools));
        assert_eq!(store.len(Collection::Students), 1);
    }

    #[tokio::test]
    async fn removing_member_keeps_payments() {
        let (store, console) = treasurer_console().await;

        let mut member = officer(Role::Member);
        member.id = IdentityId::UNASSIGNED;
        member.mobile = "01722222222".into();
        let profile = store
            .upsert(Profile {
                identity: member,
                passphrase: "secret".into(),
            })
            .await
            .unwrap();
        let id = profile.identity.id;
        console.record_payment(id, "200", "March").await.unwrap();

        assert!(console.remove_member(id).await.unwrap());
        assert!(!console.remove_member(id).await.unwrap());
        assert!(store.is_empty(Collection::Identities));
        assert_eq!(store.len(Collection::LedgerEntries), 1);
    }
}
