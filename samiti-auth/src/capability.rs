// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Display, Formatter};

/// A named permission derived from a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// See the committee roster with contact details.
    ViewCommitteeRoster,

    /// See the full student roster of a school. School summaries are public.
    ViewSchoolDetail,

    /// Read and post on the group channel and open direct channels.
    UseMessaging,

    /// Reach the fee ledger.
    UseAccounting,

    /// Reach the admin console.
    UseAdmin,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::ViewCommitteeRoster,
        Capability::ViewSchoolDetail,
        Capability::UseMessaging,
        Capability::UseAccounting,
        Capability::UseAdmin,
    ];

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Capability::ViewCommitteeRoster => "view committee roster",
            Capability::ViewSchoolDetail => "view school detail",
            Capability::UseMessaging => "use messaging",
            Capability::UseAccounting => "use accounting",
            Capability::UseAdmin => "use admin",
        };

        write!(f, "{}", s)
    }
}

/// Set of capabilities held by a role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u8);

impl Capabilities {
    /// Baseline: authenticated, nothing else.
    pub const NONE: Capabilities = Capabilities(0);

    pub fn with(mut self, capability: Capability) -> Self {
        self.0 |= capability.bit();
        self
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every capability in `self` is also in `other`.
    pub fn is_subset(&self, other: &Capabilities) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL
            .into_iter()
            .filter(|capability| self.contains(*capability))
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Capabilities::NONE, Capabilities::with)
    }
}
