//! Message log: the append-only transcript of one conversation.
//!
//! Insertion order is the display order and the only ordering key. Ids come
//! from a per-log counter that keeps increasing across resets, so a
//! presentation layer keyed on ids never sees a reused key.

use super::message::{Message, MessageDraft, MessageId};

#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: Vec<Message>,
    next_id: MessageId,
}

impl MessageLog {
    /// Create a log holding a single initial message.
    #[must_use]
    pub fn new(initial: MessageDraft) -> Self {
        let mut log = Self { messages: Vec::new(), next_id: 1 };
        log.append(initial);
        log
    }

    /// Append a message and return its freshly allocated id.
    pub fn append(&mut self, draft: MessageDraft) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(draft.into_message(id));
        id
    }

    /// Remove the message with `id`. Returns `false` (and changes nothing)
    /// when the id is absent, e.g. after a reset already cleared it.
    pub fn remove_by_id(&mut self, id: MessageId) -> bool {
        let Some(index) = self.messages.iter().position(|m| m.id() == id) else {
            return false;
        };
        self.messages.remove(index);
        true
    }

    /// Truncate to a single fresh message.
    pub fn reset(&mut self, initial: MessageDraft) -> MessageId {
        self.messages.clear();
        self.append(initial)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn has_loading(&self) -> bool {
        self.messages.iter().any(Message::is_loading)
    }

    #[must_use]
    pub fn has_visualization(&self) -> bool {
        self.messages.iter().any(Message::is_visualization)
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[path = "log_test.rs"]
mod tests;
