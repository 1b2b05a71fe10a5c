// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Display, Formatter};

use samiti_core::Role;
use thiserror::Error;
use tracing::debug;

use crate::capability::{Capabilities, Capability};

/// Position of a role in the organisation's hierarchy. Lower ranks carry more authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(u8);

impl Rank {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rank of a role.
pub fn rank(role: Role) -> Rank {
    let rank = match role {
        Role::President => 1,
        Role::VicePresident => 2,
        Role::GeneralSecretary => 3,
        Role::JointGeneralSecretary => 4,
        Role::OrganizingSecretary => 5,
        Role::JointOrganizingSecretary => 6,
        Role::FinanceSecretary => 7,
        Role::JointFinanceSecretary => 8,
        Role::EducationWelfareSecretary => 9,
        Role::CulturalSecretary => 10,
        Role::PublicitySecretary => 11,
        Role::WomensAffairsSecretary => 12,
        Role::TechnologySecretary => 13,
        Role::ReliefSecretary => 14,
        Role::SchoolAffairsSecretary => 15,
        Role::ExecutiveMember => 16,
        Role::Member => 17,
        Role::GeneralMember => 18,
    };
    Rank(rank)
}

/// Returns `false` for the two plain membership roles, `true` for every committee position.
pub fn is_committee(role: Role) -> bool {
    !matches!(role, Role::Member | Role::GeneralMember)
}

/// Capabilities held by a role.
///
/// Committee roles hold everything except [`Capability::UseAdmin`], which is reserved for the two
/// financial officers. Plain members only hold baseline authenticated access.
pub fn capabilities(role: Role) -> Capabilities {
    if !is_committee(role) {
        return Capabilities::NONE;
    }

    let committee = Capabilities::NONE
        .with(Capability::ViewCommitteeRoster)
        .with(Capability::ViewSchoolDetail)
        .with(Capability::UseMessaging)
        .with(Capability::UseAccounting);

    match role {
        Role::FinanceSecretary | Role::JointFinanceSecretary => committee.with(Capability::UseAdmin),
        _ => committee,
    }
}

/// Checks that a role holds a capability.
pub fn require(role: Role, capability: Capability) -> Result<(), AuthorizationDenied> {
    if capabilities(role).contains(capability) {
        Ok(())
    } else {
        debug!(%role, %capability, "capability check denied");
        Err(AuthorizationDenied { capability })
    }
}

/// Stable sort by rank of the role each item maps to. Items of equal rank keep their order.
pub fn sort_by_rank<T, F>(items: &mut [T], role_of: F)
where
    F: Fn(&T) -> Role,
{
    items.sort_by_key(|item| rank(role_of(item)));
}

/// The acting identity does not hold the capability required for an action.
///
/// Carries nothing about the target of the action.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("not permitted to {capability}")]
pub struct AuthorizationDenied {
    pub capability: Capability,
}
