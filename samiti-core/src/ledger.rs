// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keys::{EntryId, IdentityId};
use crate::record::{Collection, Record};
use crate::timestamp::Timestamp;

/// Non-negative amount of money in whole currency units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.starts_with('-') {
            return Err(AmountError::Negative(value.to_string()));
        }
        value
            .parse::<u64>()
            .map(Amount)
            .map_err(|_| AmountError::Invalid(value.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount can not be negative: {0}")]
    Negative(String),

    #[error("not a valid amount: {0:?}")]
    Invalid(String),
}

/// A fee payment recorded for one member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    #[serde(rename = "user_id")]
    pub identity: IdentityId,
    pub amount: Amount,
    /// Label of the period the fee is paid for, for example a month name.
    #[serde(rename = "month")]
    pub period: String,
    #[serde(rename = "date")]
    pub recorded_at: Timestamp,
}

impl LedgerEntry {
    pub fn new(identity: IdentityId, amount: Amount, period: &str, recorded_at: Timestamp) -> Self {
        Self {
            id: EntryId::UNASSIGNED,
            identity,
            amount,
            period: period.to_string(),
            recorded_at,
        }
    }
}

impl Record for LedgerEntry {
    const COLLECTION: Collection = Collection::LedgerEntries;

    type Key = EntryId;

    fn key(&self) -> EntryId {
        self.id
    }

    fn set_key(&mut self, key: EntryId) {
        self.id = key;
    }
}
