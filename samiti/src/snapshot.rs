// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeMap, BTreeSet};

use samiti_auth::{AuthorizationDenied, Capability, is_committee, require, sort_by_rank};
use samiti_core::{
    Amount, Announcement, Collection, ContactSettings, GalleryItem, Identity, IdentityId,
    LedgerEntry, Role, School, SchoolId, Student,
};

/// A school together with its students, ordered by roll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchoolEntry {
    pub school: School,
    pub students: Vec<Student>,
}

/// Publicly visible facts about a school.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchoolSummary<'a> {
    pub id: SchoolId,
    pub name: &'a str,
    pub teacher_name: &'a str,
    pub teacher_phone: &'a str,
    pub established: &'a str,
    pub student_count: usize,
}

/// Normalized copy of every directory collection, produced by a single refresh.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub(crate) members: Vec<Identity>,
    pub(crate) ledger_entries: Vec<LedgerEntry>,
    pub(crate) schools: Vec<SchoolEntry>,
    pub(crate) announcements: Vec<Announcement>,
    pub(crate) gallery: Vec<GalleryItem>,
    pub(crate) contact: ContactSettings,
    pub(crate) degraded: BTreeSet<Collection>,
}

impl Snapshot {
    /// Members in key order.
    pub fn members(&self) -> &[Identity] {
        &self.members
    }

    pub fn member(&self, id: IdentityId) -> Option<&Identity> {
        self.members.iter().find(|member| member.id == id)
    }

    /// All members, highest authority first. Members of equal rank keep their key order.
    pub fn members_by_rank(&self) -> Vec<&Identity> {
        let mut members: Vec<&Identity> = self.members.iter().collect();
        sort_by_rank(&mut members, |member| member.role);
        members
    }

    /// Committee officers, highest authority first.
    pub fn committee_roster(&self, viewer: Role) -> Result<Vec<&Identity>, AuthorizationDenied> {
        require(viewer, Capability::ViewCommitteeRoster)?;
        let mut roster: Vec<&Identity> = self
            .members
            .iter()
            .filter(|member| is_committee(member.role))
            .collect();
        sort_by_rank(&mut roster, |member| member.role);
        Ok(roster)
    }

    pub fn school_summaries(&self) -> Vec<SchoolSummary<'_>> {
        self.schools
            .iter()
            .map(|entry| SchoolSummary {
                id: entry.school.id,
                name: &entry.school.name,
                teacher_name: &entry.school.teacher_name,
                teacher_phone: &entry.school.teacher_phone,
                established: &entry.school.established,
                student_count: entry.students.len(),
            })
            .collect()
    }

    /// Students of a school, ordered by roll.
    ///
    /// Returns `Ok(None)` for unknown schools. Viewers without access are denied before the
    /// lookup, so a denial says nothing about whether the school exists.
    pub fn school_roster(
        &self,
        school: SchoolId,
        viewer: Role,
    ) -> Result<Option<&SchoolEntry>, AuthorizationDenied> {
        require(viewer, Capability::ViewSchoolDetail)?;
        Ok(self.schools.iter().find(|entry| entry.school.id == school))
    }

    pub fn ledger(&self) -> Ledger<'_> {
        Ledger {
            entries: &self.ledger_entries,
        }
    }

    /// Ledger totals for the accounting view. General members are not listed, their entries
    /// still count towards the grand total.
    pub fn accounts(&self, viewer: Role) -> Result<AccountsView<'_>, AuthorizationDenied> {
        require(viewer, Capability::UseAccounting)?;
        let mut members = self.members_by_rank();
        members.retain(|member| member.role != Role::GeneralMember);
        Ok(AccountsView {
            ledger: self.ledger(),
            members,
        })
    }

    /// Announcements, newest first.
    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    pub fn gallery(&self) -> &[GalleryItem] {
        &self.gallery
    }

    pub fn contact(&self) -> &ContactSettings {
        &self.contact
    }

    /// Collections which could not be read during this refresh and are shown empty.
    pub fn degraded(&self) -> &BTreeSet<Collection> {
        &self.degraded
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// Aggregates over the ledger entries of a snapshot.
///
/// Nothing is cached, every total is summed from the entries on each call.
#[derive(Clone, Copy, Debug)]
pub struct Ledger<'a> {
    entries: &'a [LedgerEntry],
}

impl<'a> Ledger<'a> {
    pub fn entries(&self) -> &'a [LedgerEntry] {
        self.entries
    }

    pub fn total_for(&self, identity: IdentityId) -> Amount {
        self.entries
            .iter()
            .filter(|entry| entry.identity == identity)
            .map(|entry| entry.amount)
            .sum()
    }

    pub fn grand_total(&self) -> Amount {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    /// Entries of one member, most recent first.
    pub fn entries_for(&self, identity: IdentityId) -> Vec<&'a LedgerEntry> {
        let mut entries: Vec<&LedgerEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.identity == identity)
            .collect();
        entries.sort_by(|a, b| (b.recorded_at, b.id).cmp(&(a.recorded_at, a.id)));
        entries
    }

    /// Total per member which has at least one entry.
    pub fn totals(&self) -> BTreeMap<IdentityId, Amount> {
        let mut totals = BTreeMap::new();
        for entry in self.entries {
            let total = totals.entry(entry.identity).or_insert(Amount::ZERO);
            *total = *total + entry.amount;
        }
        totals
    }
}

/// One row of the accounting view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountRow<'a> {
    pub member: &'a Identity,
    pub total: Amount,
}

#[derive(Clone, Debug)]
pub struct AccountsView<'a> {
    ledger: Ledger<'a>,
    members: Vec<&'a Identity>,
}

impl<'a> AccountsView<'a> {
    pub fn ledger(&self) -> Ledger<'a> {
        self.ledger
    }

    /// Listed members with their totals, highest authority first.
    pub fn rows(&self) -> Vec<AccountRow<'a>> {
        let totals = self.ledger.totals();
        self.members
            .iter()
            .copied()
            .map(|member| AccountRow {
                member,
                total: totals.get(&member.id).copied().unwrap_or(Amount::ZERO),
            })
            .collect()
    }

    pub fn grand_total(&self) -> Amount {
        self.ledger.grand_total()
    }
}
