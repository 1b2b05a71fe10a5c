// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Visitor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Designation of a member inside the organisation.
///
/// The variants are declared in order of authority, the president first and the general member
/// last. Ranking and capabilities derived from a role live in `samiti-auth`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    President,
    VicePresident,
    GeneralSecretary,
    JointGeneralSecretary,
    OrganizingSecretary,
    JointOrganizingSecretary,
    FinanceSecretary,
    JointFinanceSecretary,
    EducationWelfareSecretary,
    CulturalSecretary,
    PublicitySecretary,
    WomensAffairsSecretary,
    TechnologySecretary,
    ReliefSecretary,
    SchoolAffairsSecretary,
    ExecutiveMember,
    Member,
    GeneralMember,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 18] = [
        Role::President,
        Role::VicePresident,
        Role::GeneralSecretary,
        Role::JointGeneralSecretary,
        Role::OrganizingSecretary,
        Role::JointOrganizingSecretary,
        Role::FinanceSecretary,
        Role::JointFinanceSecretary,
        Role::EducationWelfareSecretary,
        Role::CulturalSecretary,
        Role::PublicitySecretary,
        Role::WomensAffairsSecretary,
        Role::TechnologySecretary,
        Role::ReliefSecretary,
        Role::SchoolAffairsSecretary,
        Role::ExecutiveMember,
        Role::Member,
        Role::GeneralMember,
    ];

    /// Stable identifier used on the wire and in persisted snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::President => "president",
            Role::VicePresident => "vice-president",
            Role::GeneralSecretary => "general-secretary",
            Role::JointGeneralSecretary => "joint-general-secretary",
            Role::OrganizingSecretary => "organizing-secretary",
            Role::JointOrganizingSecretary => "joint-organizing-secretary",
            Role::FinanceSecretary => "finance-secretary",
            Role::JointFinanceSecretary => "joint-finance-secretary",
            Role::EducationWelfareSecretary => "education-welfare-secretary",
            Role::CulturalSecretary => "cultural-secretary",
            Role::PublicitySecretary => "publicity-secretary",
            Role::WomensAffairsSecretary => "womens-affairs-secretary",
            Role::TechnologySecretary => "technology-secretary",
            Role::ReliefSecretary => "relief-secretary",
            Role::SchoolAffairsSecretary => "school-affairs-secretary",
            Role::ExecutiveMember => "executive-member",
            Role::Member => "member",
            Role::GeneralMember => "general-member",
        }
    }

    /// Designation title as the organisation writes it.
    pub fn title(&self) -> &'static str {
        match self {
            Role::President => "সভাপতি",
            Role::VicePresident => "সহ সভাপতি",
            Role::GeneralSecretary => "সাধারণ সম্পাদক",
            Role::JointGeneralSecretary => "সহ সাধারণ সম্পাদক",
            Role::OrganizingSecretary => "সাংগঠনিক সম্পাদক",
            Role::JointOrganizingSecretary => "সহ সাংগঠনিক সম্পাদক",
            Role::FinanceSecretary => "অর্থ সম্পাদক",
            Role::JointFinanceSecretary => "সহ অর্থ সম্পাদক",
            Role::EducationWelfareSecretary => "শিক্ষা ও সমাজ কল্যাণ সম্পাদক",
            Role::CulturalSecretary => "সাংস্কৃতিক সম্পাদক",
            Role::PublicitySecretary => "প্রচার ও প্রকাশনা সম্পাদক",
            Role::WomensAffairsSecretary => "মহিলা বিষয়ক সম্পাদক",
            Role::TechnologySecretary => "তথ্য ও প্রযুক্তি বিষয়ক সম্পাদক",
            Role::ReliefSecretary => "ত্রাণ ও পুনর্বাসন বিষয়ক সম্পাদক",
            Role::SchoolAffairsSecretary => "গীতা বিদ্যাপীঠ পরিচালনা বিষয়ক সম্পাদক",
            Role::ExecutiveMember => "নির্বাহী সদস্য",
            Role::Member => "সদস্য",
            Role::GeneralMember => "সাধারণ সদস্য",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    /// Accepts the stable identifier as well as the designation title. Anything else is rejected.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == value || role.title() == value)
            .ok_or_else(|| RoleError::Unknown(value.to_string()))
    }
}

impl TryFrom<&str> for Role {
    type Error = RoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RoleVisitor;

        impl Visitor<'_> for RoleVisitor {
            type Value = Role;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("role identifier encoded as string")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Role::from_str(value).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(RoleVisitor)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("unknown role: {0:?}")]
    Unknown(String),
}
