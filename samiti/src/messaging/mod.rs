// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realtime group and direct-message channels.
//!
//! A [`Messenger`] shows one channel at a time. Opening a channel subscribes to inserts into the
//! messages collection, reads the channel's history and merges both into a [`MessageLog`]
//! ordered by timestamp and key. Notifications may repeat; the log ignores keys it already holds.
//!
//! Sent messages are not appended locally. They appear once the change feed announces them.
mod channel;
mod log;
mod messenger;

pub use channel::{Channel, ChannelStatus};
pub use log::MessageLog;
pub use messenger::Messenger;
