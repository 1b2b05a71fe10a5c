// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Display, Formatter};

use samiti_core::{IdentityId, Message, Recipient};

/// A conversation shown by the messenger: the committee group or a direct exchange with a peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Group,
    Peer(IdentityId),
}

impl Channel {
    /// Recipient of messages sent on this channel.
    pub fn recipient(&self) -> Recipient {
        match self {
            Channel::Group => Recipient::Group,
            Channel::Peer(peer) => Recipient::Identity(*peer),
        }
    }

    /// Returns `true` if the message belongs to this channel as seen by `viewer`.
    pub fn admits(&self, viewer: IdentityId, message: &Message) -> bool {
        match self {
            Channel::Group => message.is_group(),
            Channel::Peer(peer) => message.is_between(viewer, *peer),
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Group => write!(f, "group"),
            Channel::Peer(peer) => write!(f, "peer {peer}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelStatus {
    #[default]
    Closed,
    Subscribing,
    /// History is loaded. A stale channel lost its change feed and no longer receives new
    /// messages until it is opened again.
    Live { stale: bool },
}

impl ChannelStatus {
    pub fn is_live(&self) -> bool {
        matches!(self, ChannelStatus::Live { .. })
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, ChannelStatus::Live { stale: true })
    }
}
