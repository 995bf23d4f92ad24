//! # Transcript
//!
//! The ordered, in-memory list of chat entries. Nothing here is persisted: a new
//! process starts with an empty transcript.
//!
//! Entries are append-only with one exception, the transient "typing" entry the
//! dispatcher shows while a reply is pending. It is addressed by a [`TypingId`]
//! so removal is exact even if entries were appended after it.

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Message { sender: Sender, content: String },
    Typing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: u64,
    pub kind: EntryKind,
    pub sent_at: DateTime<Local>,
}

impl Entry {
    pub fn sender(&self) -> Option<Sender> {
        match &self.kind {
            EntryKind::Message { sender, .. } => Some(*sender),
            EntryKind::Typing => None,
        }
    }

    pub fn content(&self) -> &str {
        match &self.kind {
            EntryKind::Message { content, .. } => content,
            EntryKind::Typing => "",
        }
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.kind, EntryKind::Typing)
    }
}

/// Handle to a typing indicator returned by [`Transcript::push_typing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingId(u64);

#[derive(Debug, Default, Clone)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: EntryKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            kind,
            sent_at: Local::now(),
        });
        id
    }

    /// Appends a message to the end of the log.
    pub fn add_message(&mut self, text: impl Into<String>, sender: Sender) {
        self.push(EntryKind::Message {
            sender,
            content: text.into(),
        });
    }

    pub fn push_typing(&mut self) -> TypingId {
        TypingId(self.push(EntryKind::Typing))
    }

    /// Removes the given typing indicator. Returns false if it was already gone.
    pub fn remove_typing(&mut self, typing: TypingId) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !(entry.id == typing.0 && entry.is_typing()));
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Messages only, typing indicators skipped.
    pub fn messages(&self) -> impl Iterator<Item = (Sender, &str)> {
        self.entries.iter().filter_map(|entry| match &entry.kind {
            EntryKind::Message { sender, content } => Some((*sender, content.as_str())),
            EntryKind::Typing => None,
        })
    }

    pub fn typing_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_typing()).count()
    }
}
