// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fetches every collection of the directory into an in-memory [`Snapshot`].
use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use samiti_core::{
    Announcement, Collection, ContactSettings, GalleryItem, LedgerEntry, Profile, Record, School,
    SchoolId, Student,
};
use samiti_store::{DataStore, Query};
use tracing::{debug, warn};

use crate::snapshot::{SchoolEntry, Snapshot};

/// Reads the directory's collections and joins them locally.
///
/// The synchronizer never writes. Mutations made elsewhere become visible with the next
/// [`Directory::refresh`].
#[derive(Clone, Debug)]
pub struct Directory<S> {
    store: S,
}

impl<S> Directory<S>
where
    S: DataStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Take a fresh snapshot of all collections.
    ///
    /// Collections are read concurrently, one read each. A failing read is logged and replaced by
    /// an empty collection; the snapshot lists it in [`Snapshot::degraded`].
    pub async fn refresh(&self) -> Snapshot {
        let profiles_query = Query::all();
        let entries_query = Query::all();
        let schools_query = Query::all();
        let students_query = Query::all();
        let announcements_query = Query::all().order_by_desc(|item: &Announcement| item.id);
        let gallery_query = Query::all();
        let settings_query = Query::all();

        let (profiles, entries, schools, students, announcements, gallery, settings) = tokio::join!(
            self.store.read_all::<Profile>(&profiles_query),
            self.store.read_all::<LedgerEntry>(&entries_query),
            self.store.read_all::<School>(&schools_query),
            self.store.read_all::<Student>(&students_query),
            self.store.read_all::<Announcement>(&announcements_query),
            self.store.read_all::<GalleryItem>(&gallery_query),
            self.store.read_all::<ContactSettings>(&settings_query),
        );

        let mut degraded = BTreeSet::new();
        let profiles = absorb(profiles, &mut degraded);
        let ledger_entries = absorb(entries, &mut degraded);
        let schools = absorb(schools, &mut degraded);
        let students = absorb(students, &mut degraded);
        let announcements = absorb(announcements, &mut degraded);
        let gallery = absorb(gallery, &mut degraded);
        let contact = absorb(settings, &mut degraded)
            .into_iter()
            .next()
            .unwrap_or_default();

        let members = profiles.into_iter().map(Profile::into_identity).collect();
        let schools = join_students(schools, students);

        debug!(
            degraded = degraded.len(),
            schools = schools.len(),
            entries = ledger_entries.len(),
            "refreshed directory snapshot"
        );

        Snapshot {
            members,
            ledger_entries,
            schools,
            announcements,
            gallery,
            contact,
            degraded,
        }
    }
}

/// Substitute an empty collection for a failed read.
fn absorb<R, E>(result: Result<Vec<R>, E>, degraded: &mut BTreeSet<Collection>) -> Vec<R>
where
    R: Record,
    E: Display,
{
    match result {
        Ok(records) => records,
        Err(err) => {
            warn!(collection = %R::COLLECTION, "reading collection failed: {err}");
            degraded.insert(R::COLLECTION);
            Vec::new()
        }
    }
}

/// Attach every student to its school by foreign key. Students of unknown schools are dropped.
fn join_students(schools: Vec<School>, students: Vec<Student>) -> Vec<SchoolEntry> {
    let mut by_school: HashMap<SchoolId, Vec<Student>> = HashMap::new();
    for student in students {
        by_school.entry(student.school).or_default().push(student);
    }

    schools
        .into_iter()
        .map(|school| {
            let mut students = by_school.remove(&school.id).unwrap_or_default();
            students.sort_by(|a, b| a.roll_order().cmp(&b.roll_order()));
            SchoolEntry { school, students }
        })
        .collect()
}
