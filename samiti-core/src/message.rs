// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Visitor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keys::{IdentityId, MessageId};
use crate::record::{Collection, Record};
use crate::timestamp::Timestamp;

/// Reserved recipient meaning "everyone allowed on the group channel".
pub const GROUP_SENTINEL: &str = "committee-group";

/// Addressee of a message: the broadcast group or a single member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Recipient {
    Group,
    Identity(IdentityId),
}

impl Display for Recipient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Recipient::Group => write!(f, "{GROUP_SENTINEL}"),
            Recipient::Identity(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for Recipient {
    type Err = RecipientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == GROUP_SENTINEL {
            return Ok(Recipient::Group);
        }

        value
            .parse()
            .map(Recipient::Identity)
            .map_err(|_| RecipientError(value.to_string()))
    }
}

impl From<IdentityId> for Recipient {
    fn from(id: IdentityId) -> Self {
        Recipient::Identity(id)
    }
}

impl Serialize for Recipient {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Recipient {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RecipientVisitor;

        impl Visitor<'_> for RecipientVisitor {
            type Value = Recipient;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("group sentinel or identity key encoded as string")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Recipient::from_str(value).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(RecipientVisitor)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid recipient: {0:?}")]
pub struct RecipientError(String);

/// A chat message, either broadcast to the group or sent to a single member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(rename = "sender_id")]
    pub sender: IdentityId,
    #[serde(rename = "receiver_id")]
    pub recipient: Recipient,
    pub text: String,
    pub timestamp: Timestamp,
}

impl Message {
    /// Prepares a message for sending. The store assigns its key.
    pub fn new(
        sender: IdentityId,
        recipient: Recipient,
        text: &str,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: MessageId::UNASSIGNED,
            sender,
            recipient,
            text: text.to_string(),
            timestamp,
        }
    }

    pub fn is_group(&self) -> bool {
        self.recipient == Recipient::Group
    }

    /// Messages are shown ordered by timestamp, ties broken by key.
    pub fn order_key(&self) -> (Timestamp, MessageId) {
        (self.timestamp, self.id)
    }

    /// Returns `true` if the message was exchanged between exactly these two members, in either
    /// direction.
    pub fn is_between(&self, a: IdentityId, b: IdentityId) -> bool {
        (self.sender == a && self.recipient == Recipient::Identity(b))
            || (self.sender == b && self.recipient == Recipient::Identity(a))
    }
}

impl Record for Message {
    const COLLECTION: Collection = Collection::Messages;

    type Key = MessageId;

    fn key(&self) -> MessageId {
        self.id
    }

    fn set_key(&mut self, key: MessageId) {
        self.id = key;
    }
}
