use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who said something in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Agent,
}

/// One immutable turn in the conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    id: Uuid,
    speaker: Speaker,
    text: String,
    created_at: DateTime<Local>,
}

impl ConversationEntry {
    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            speaker,
            text: text.into(),
            created_at: Local::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn is_from_user(&self) -> bool {
        self.speaker == Speaker::User
    }
}

/// Append-only conversation log.
///
/// Entries can be added and read, never edited, removed or reordered.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntryLog {
    entries: Vec<ConversationEntry>,
}

impl EntryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return a reference to it
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) -> &ConversationEntry {
        let index = self.entries.len();
        self.entries.push(ConversationEntry::new(speaker, text));
        &self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ConversationEntry> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&ConversationEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// Number of entries spoken by the given party
    pub fn count_by(&self, speaker: Speaker) -> usize {
        self.entries.iter().filter(|e| e.speaker == speaker).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_preserves_order_and_existing_entries() {
        let mut log = EntryLog::new();
        log.push(Speaker::User, "build a CRM");
        let first = log.get(0).cloned().unwrap();

        log.push(Speaker::Agent, "Great idea!");
        log.push(Speaker::User, "Consumers");

        assert_eq!(log.len(), 3);
        assert_eq!(log.get(0), Some(&first));
        let texts: Vec<&str> = log.iter().map(|e| e.text()).collect();
        assert_eq!(texts, vec!["build a CRM", "Great idea!", "Consumers"]);
    }

    #[test]
    fn test_entries_get_unique_ids() {
        let mut log = EntryLog::new();
        let a = log.push(Speaker::User, "a").id();
        let b = log.push(Speaker::User, "a").id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_count_by_speaker() {
        let mut log = EntryLog::new();
        assert!(log.is_empty());

        log.push(Speaker::User, "idea");
        log.push(Speaker::Agent, "ack");
        log.push(Speaker::Agent, "question");

        assert_eq!(log.count_by(Speaker::User), 1);
        assert_eq!(log.count_by(Speaker::Agent), 2);
        assert!(log.get(0).unwrap().is_from_user());
        assert_eq!(log.last().unwrap().text(), "question");
    }
}
