//! In-memory record of processed documents for the current session.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// One successful chat-with-file run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingHistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Local>,
    pub kb_name: String,
    pub file_name: String,
    pub response: String,
    pub doc_path: PathBuf,
    pub model: String,
}

impl ProcessingHistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(
        kb_name: String,
        file_name: String,
        response: String,
        doc_path: PathBuf,
        model: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Local::now(),
            kb_name,
            file_name,
            response,
            doc_path,
            model,
        }
    }
}

/// Ordered processing history. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct ProcessingHistory {
    entries: Vec<ProcessingHistoryEntry>,
}

impl ProcessingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ProcessingHistoryEntry) {
        self.entries.push(entry);
    }

    /// Entries in the order they were recorded.
    pub fn entries(&self) -> &[ProcessingHistoryEntry] {
        &self.entries
    }

    /// Entries, most recent first.
    pub fn newest_first(&self) -> impl Iterator<Item = &ProcessingHistoryEntry> {
        self.entries.iter().rev()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: Uuid) -> Option<&ProcessingHistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(file: &str) -> ProcessingHistoryEntry {
        ProcessingHistoryEntry::new(
            "Docs".to_string(),
            file.to_string(),
            "answer".to_string(),
            PathBuf::from(format!("outputs/{}.md", file)),
            "model-x".to_string(),
        )
    }

    #[test]
    fn test_history_order_and_clear() {
        let mut history = ProcessingHistory::new();
        assert!(history.is_empty());

        history.push(entry("a.pdf"));
        history.push(entry("b.pdf"));

        let chronological: Vec<_> = history.entries().iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(chronological, vec!["a.pdf", "b.pdf"]);

        let newest: Vec<_> = history.newest_first().map(|e| e.file_name.as_str()).collect();
        assert_eq!(newest, vec!["b.pdf", "a.pdf"]);

        let id = history.entries()[0].id;
        assert_eq!(history.get(id).unwrap().file_name, "a.pdf");

        history.clear();
        assert_eq!(history.len(), 0);
    }
}
