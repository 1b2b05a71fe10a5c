// SPDX-License-Identifier: MIT OR Apache-2.0

mod common;

use assert_matches::assert_matches;
use samiti::{
    AccountError, Channel, MessagingError, ProfileChanges, Samiti, SamitiError, ValidationError,
};
use samiti_auth::{AuthorizationDenied, Capability};
use samiti_core::{
    Amount, Announcement, AnnouncementId, Aspect, Collection, ContactSettings, GalleryId,
    GalleryItem, MediaKind, Role, School, SchoolId, Student, StudentId,
};
use samiti_store::test_utils::{FaultyStore, SpyStore};
use samiti_store::{FileSessionStorage, MemoryStore};

use common::{eventually, member};

#[tokio::test]
async fn session_survives_restart() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = MemoryStore::new();
    let (registrar, _) = member(store.clone(), "Amal Das", "01711111111", Role::President).await;
    drop(registrar);

    let samiti = samiti::builder()
        .session_key("cm_logged_user")
        .build(store.clone(), FileSessionStorage::new(dir.path()))
        .await?;
    assert!(samiti.current().is_none());
    let amal = samiti
        .login("01711111111", common::PASSPHRASE, Role::President)
        .await?;
    drop(samiti);

    let restarted = Samiti::open(store.clone(), FileSessionStorage::new(dir.path())).await?;
    assert_eq!(restarted.current(), Some(amal));

    restarted.logout().await?;
    let restarted = Samiti::open(store, FileSessionStorage::new(dir.path())).await?;
    assert_eq!(restarted.current(), None);
    Ok(())
}

#[tokio::test]
async fn wrong_credentials_leave_session_empty() {
    let store = MemoryStore::new();
    let (samiti, _) = member(store, "Amal Das", "01711111111", Role::President).await;
    samiti.logout().await.unwrap();

    assert_matches!(
        samiti
            .login("01711111111", "guess", Role::President)
            .await,
        Err(SamitiError::Account(AccountError::InvalidCredentials))
    );
    assert!(samiti.current().is_none());

    let unknown_role = "treasurer".parse::<Role>().map_err(ValidationError::from);
    assert_matches!(unknown_role, Err(ValidationError::Role(_)));
}

#[tokio::test]
async fn ledger_totals_cross_check() {
    let store = MemoryStore::new();
    let (u1, first) = member(store.clone(), "Bina Ghosh", "01722222222", Role::Member).await;
    let (_, second) = member(store.clone(), "Chandan Pal", "01733333333", Role::Member).await;
    let (treasurer, _) = member(
        store.clone(),
        "Dipa Saha",
        "01744444444",
        Role::FinanceSecretary,
    )
    .await;

    let console = treasurer.admin().unwrap();
    console.record_payment(first.id, "500", "January").await.unwrap();
    console.record_payment(first.id, "300", "February").await.unwrap();
    console.record_payment(second.id, "100", "January").await.unwrap();

    let snapshot = u1.refresh().await;
    let ledger = snapshot.ledger();
    assert_eq!(ledger.total_for(first.id), Amount::new(800));
    assert_eq!(ledger.total_for(second.id), Amount::new(100));
    assert_eq!(ledger.grand_total(), Amount::new(900));
    assert_eq!(ledger.totals().values().sum::<Amount>(), ledger.grand_total());

    // Plain members see the ledger of the snapshot but not the accounting view.
    assert_eq!(
        snapshot.accounts(Role::Member).unwrap_err(),
        AuthorizationDenied {
            capability: Capability::UseAccounting
        }
    );
    let accounts = snapshot.accounts(Role::FinanceSecretary).unwrap();
    assert_eq!(accounts.rows()[0].member.role, Role::FinanceSecretary);
}

#[tokio::test]
async fn refresh_degrades_instead_of_failing() {
    let store = FaultyStore::new(MemoryStore::new());
    let (treasurer, _) = member(
        store.clone(),
        "Dipa Saha",
        "01744444444",
        Role::FinanceSecretary,
    )
    .await;
    let console = treasurer.admin().unwrap();
    console
        .save_school(School {
            id: SchoolId::UNASSIGNED,
            name: "Gita Vidyapith".into(),
            teacher_name: "Sumana Roy".into(),
            teacher_phone: "01811111111".into(),
            teacher_image: String::new(),
            established: "2019".into(),
        })
        .await
        .unwrap();

    store.fail_reads(Collection::LedgerEntries);
    let snapshot = treasurer.refresh().await;

    assert!(snapshot.degraded().contains(&Collection::LedgerEntries));
    assert_eq!(snapshot.degraded().len(), 1);
    assert!(snapshot.ledger().entries().is_empty());
    assert_eq!(snapshot.members().len(), 1);
    assert_eq!(snapshot.school_summaries().len(), 1);
    assert_eq!(snapshot.contact().website, "#");
}

#[tokio::test]
async fn lowest_role_can_not_message() {
    let store = SpyStore::new(MemoryStore::new());
    let (samiti, _) = member(store.clone(), "Esha Sen", "01755555555", Role::GeneralMember).await;
    let writes = store.writes();

    let mut messenger = samiti.messenger();
    assert_matches!(
        messenger.open(Channel::Group).await,
        Err(MessagingError::Denied(AuthorizationDenied {
            capability: Capability::UseMessaging
        }))
    );
    assert_matches!(
        messenger.send("hello everyone").await,
        Err(MessagingError::Denied(_))
    );

    assert_eq!(store.writes(), writes);
    assert_eq!(store.inner().len(Collection::Messages), 0);
    assert!(samiti.admin().is_err());
}

#[tokio::test]
async fn sent_message_survives_interleaved_refreshes() {
    let store = MemoryStore::new();
    let (samiti, _) = member(store, "Amal Das", "01711111111", Role::GeneralSecretary).await;

    let mut messenger = samiti.messenger();
    messenger.open(Channel::Group).await.unwrap();

    let (first, sent, second) = tokio::join!(
        samiti.refresh(),
        messenger.send("Puja committee meets at six"),
        samiti.refresh(),
    );
    let id = sent.unwrap();
    assert!(!first.is_degraded());
    assert!(!second.is_degraded());

    eventually(|| messenger.messages().iter().any(|message| message.id == id)).await;

    let _ = samiti.refresh().await;
    let _ = samiti.refresh().await;
    assert_eq!(messenger.messages().len(), 1);
    messenger.close().await;
}

#[tokio::test]
async fn profile_update_follows_session() {
    let store = MemoryStore::new();
    let (samiti, amal) = member(store, "Amal Das", "01711111111", Role::President).await;

    let updated = samiti
        .update_profile(ProfileChanges {
            blood_group: Some("O-".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.id, amal.id);
    assert_eq!(samiti.current().map(|identity| identity.blood_group), Some("O-".into()));

    samiti.logout().await.unwrap();
    assert_matches!(
        samiti.update_profile(ProfileChanges::default()).await,
        Err(SamitiError::NotAuthenticated)
    );
}

fn school(name: &str) -> School {
    School {
        id: SchoolId::UNASSIGNED,
        name: name.into(),
        teacher_name: "Sumana Roy".into(),
        teacher_phone: "01811111111".into(),
        teacher_image: String::new(),
        established: "2019".into(),
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
        class_name: "Four".into(),
        roll: roll.into(),
        image: String::new(),
    }
}

fn announcement(title: &str) -> Announcement {
    Announcement {
        id: AnnouncementId::UNASSIGNED,
        title: title.into(),
        description: String::new(),
        media_url: String::new(),
        media_kind: MediaKind::Image,
        aspect: Aspect::Portrait,
        date: "2025-10-01".into(),
    }
}

#[tokio::test]
async fn console_writes_show_after_refresh() {
    let store = MemoryStore::new();
    let (treasurer, _) = member(
        store.clone(),
        "Dipa Saha",
        "01744444444",
        Role::FinanceSecretary,
    )
    .await;
    let (_, leaving) = member(store.clone(), "Bina Ghosh", "01722222222", Role::Member).await;
    let console = treasurer.admin().unwrap();

    let older = console.post_announcement(announcement("Annual meeting")).await.unwrap();
    let dropped = console.post_announcement(announcement("Old notice")).await.unwrap();
    let newer = console.post_announcement(announcement("Durga Puja")).await.unwrap();
    console.remove_announcement(dropped.id).await.unwrap();

    console
        .add_gallery_item(GalleryItem {
            id: GalleryId::UNASSIGNED,
            title: "Prize giving".into(),
            description: String::new(),
            url: "https://img.example/prize.jpg".into(),
        })
        .await
        .unwrap();

    for phone in ["01700000000", "01900000000"] {
        console
            .save_contact_settings(ContactSettings {
                phone1: phone.into(),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let kept = console.save_school(school("Gita Vidyapith")).await.unwrap();
    let closed = console.save_school(school("Shishu Niketan")).await.unwrap();
    console.save_student(student(kept.id, "Mita Dey", "2")).await.unwrap();
    console.save_student(student(kept.id, "Ritu Paul", "1")).await.unwrap();
    console.save_student(student(closed.id, "Tapan Kar", "1")).await.unwrap();
    console.remove_school(closed.id).await.unwrap();

    console.record_payment(leaving.id, "300", "April").await.unwrap();
    console.remove_member(leaving.id).await.unwrap();

    let snapshot = treasurer.refresh().await;
    assert!(!snapshot.is_degraded());

    let titles: Vec<&str> = snapshot
        .announcements()
        .iter()
        .map(|item| item.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Durga Puja", "Annual meeting"]);
    assert_eq!(snapshot.announcements()[0].id, newer.id);
    assert_eq!(snapshot.announcements()[1].id, older.id);

    assert_eq!(snapshot.gallery().len(), 1);
    assert_eq!(snapshot.gallery()[0].title, "Prize giving");

    assert_eq!(store.len(Collection::Settings), 1);
    assert_eq!(snapshot.contact().phone1, "01900000000");
    assert_eq!(snapshot.contact().website, "#");

    // The closed school's student stays stored but is listed nowhere.
    assert_eq!(store.len(Collection::Students), 3);
    let summaries = snapshot.school_summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "Gita Vidyapith");
    assert_eq!(summaries[0].student_count, 2);
    let roster = snapshot
        .school_roster(kept.id, Role::FinanceSecretary)
        .unwrap()
        .unwrap();
    let names: Vec<&str> = roster.students.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Ritu Paul", "Mita Dey"]);
    assert!(snapshot
        .school_roster(closed.id, Role::FinanceSecretary)
        .unwrap()
        .is_none());

    assert!(snapshot.member(leaving.id).is_none());
    assert_eq!(snapshot.members().len(), 1);
    assert_eq!(snapshot.ledger().total_for(leaving.id), Amount::new(300));
}
