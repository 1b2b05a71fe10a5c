// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeMap, HashSet};

use samiti_core::{Message, MessageId, Timestamp};

/// Messages of one channel, ordered by timestamp with ties broken by key, without duplicates.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    messages: BTreeMap<(Timestamp, MessageId), Message>,
    ids: HashSet<MessageId>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a message into the log.
    ///
    /// Returns `false` without changing the log if a message with the same key is already
    /// present.
    pub fn insert(&mut self, message: Message) -> bool {
        if !self.ids.insert(message.id) {
            return false;
        }
        self.messages.insert(message.order_key(), message);
        true
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.values()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.ids.clear();
    }
}

impl Extend<Message> for MessageLog {
    fn extend<T: IntoIterator<Item = Message>>(&mut self, iter: T) {
        for message in iter {
            self.insert(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use samiti_core::{IdentityId, Message, MessageId, Recipient, Timestamp};

    use super::MessageLog;

    fn message(id: u64, micros: u64, text: &str) -> Message {
        let mut message = Message::new(
            IdentityId::new(1),
            Recipient::Group,
            text,
            Timestamp::from_micros(micros),
        );
        message.id = MessageId::new(id);
        message
    }

    #[test]
    fn same_text_different_ids_both_kept() {
        let mut log = MessageLog::new();
        assert!(log.insert(message(2, 20, "hello")));
        assert!(log.insert(message(1, 10, "hello")));

        let ids: Vec<MessageId> = log.iter().map(|message| message.id).collect();
        assert_eq!(ids, vec![MessageId::new(1), MessageId::new(2)]);
    }

    #[test]
    fn duplicate_ids_are_ignored() {
        let mut log = MessageLog::new();
        log.extend([message(1, 10, "a"), message(2, 20, "b")]);
        assert_eq!(log.len(), 2);

        // Redelivery, even with a different payload, leaves the log untouched.
        assert!(!log.insert(message(1, 10, "a")));
        assert!(!log.insert(message(2, 5, "changed")));
        assert_eq!(log.len(), 2);
        assert_eq!(log.iter().next().map(|m| m.text.as_str()), Some("a"));
    }

    #[test]
    fn timestamp_ties_break_by_key() {
        let mut log = MessageLog::new();
        log.extend([message(7, 10, "late key"), message(3, 10, "early key")]);

        let texts: Vec<&str> = log.iter().map(|message| message.text.as_str()).collect();
        assert_eq!(texts, vec!["early key", "late key"]);
        assert!(log.contains(MessageId::new(3)));
    }
}
