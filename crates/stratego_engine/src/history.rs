//! Bounded, timestamped event log.
//!
//! Entries are filed under one of three [`InfoKind`]s. The bound covers the
//! three categories together: once `len() == bound()`, every `add` fails
//! until something is popped or cleared.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use tracing::{debug, instrument};

use crate::error::HistoryError;

/// Default capacity of the log.
pub const DEFAULT_HISTORY_BOUND: usize = 1024;

/// Category of a history entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum InfoKind {
    /// Something the players did that worked.
    Success,
    /// A rejected action or layout.
    Failure,
    /// Advice on how to recover from the last failure.
    Hint,
}

/// A message with the local time it was logged at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEntry {
    text: String,
    timestamp: DateTime<Local>,
}

impl TimedEntry {
    fn now(text: String) -> Self {
        Self {
            text,
            timestamp: Local::now(),
        }
    }

    /// Message.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// When the entry was logged.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Timestamp as `d-m-Y H:M:S`.
    pub fn readable_time(&self) -> String {
        self.timestamp.format("%d-%m-%Y %H:%M:%S").to_string()
    }
}

impl std::fmt::Display for TimedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.readable_time(), self.text)
    }
}

/// The event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: BTreeMap<InfoKind, Vec<TimedEntry>>,
    counter: usize,
    bound: usize,
}

impl History {
    /// Creates an empty log holding at most `bound` entries.
    #[instrument]
    pub fn new(bound: usize) -> Self {
        Self {
            entries: InfoKind::iter().map(|kind| (kind, Vec::new())).collect(),
            counter: 0,
            bound,
        }
    }

    /// Appends `text` under `kind`.
    #[instrument(skip(self, text), fields(len = self.counter))]
    pub fn add(&mut self, kind: InfoKind, text: impl Into<String>) -> Result<(), HistoryError> {
        if self.counter >= self.bound {
            return Err(HistoryError::Full { bound: self.bound });
        }

        let entry = TimedEntry::now(text.into());
        debug!(%kind, text = entry.text(), "History entry");
        self.entries.entry(kind).or_default().push(entry);
        self.counter += 1;
        Ok(())
    }

    /// Appends a success message.
    pub fn add_success(&mut self, text: impl Into<String>) -> Result<(), HistoryError> {
        self.add(InfoKind::Success, text)
    }

    /// Appends a failure message.
    pub fn add_failure(&mut self, text: impl Into<String>) -> Result<(), HistoryError> {
        self.add(InfoKind::Failure, text)
    }

    /// Appends a hint.
    pub fn add_hint(&mut self, text: impl Into<String>) -> Result<(), HistoryError> {
        self.add(InfoKind::Hint, text)
    }

    /// Most recent message of `kind`.
    pub fn last(&self, kind: InfoKind) -> Result<&str, HistoryError> {
        self.entries(kind)
            .last()
            .map(TimedEntry::text)
            .ok_or(HistoryError::Empty(kind))
    }

    /// Most recent success message.
    pub fn last_success(&self) -> Result<&str, HistoryError> {
        self.last(InfoKind::Success)
    }

    /// Most recent failure message.
    pub fn last_failure(&self) -> Result<&str, HistoryError> {
        self.last(InfoKind::Failure)
    }

    /// Most recent hint.
    pub fn last_hint(&self) -> Result<&str, HistoryError> {
        self.last(InfoKind::Hint)
    }

    /// Removes and returns the most recent message of `kind`.
    #[instrument(skip(self))]
    pub fn pop(&mut self, kind: InfoKind) -> Result<String, HistoryError> {
        let entry = self
            .entries
            .get_mut(&kind)
            .and_then(Vec::pop)
            .ok_or(HistoryError::Empty(kind))?;
        self.counter -= 1;
        Ok(entry.text)
    }

    /// Removes and returns the most recent success message.
    pub fn pop_success(&mut self) -> Result<String, HistoryError> {
        self.pop(InfoKind::Success)
    }

    /// Removes and returns the most recent failure message.
    pub fn pop_failure(&mut self) -> Result<String, HistoryError> {
        self.pop(InfoKind::Failure)
    }

    /// Removes and returns the most recent hint.
    pub fn pop_hint(&mut self) -> Result<String, HistoryError> {
        self.pop(InfoKind::Hint)
    }

    /// Entries of `kind`, oldest first.
    pub fn entries(&self, kind: InfoKind) -> &[TimedEntry] {
        self.entries.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Drops every entry of `kind`.
    pub fn clear_kind(&mut self, kind: InfoKind) {
        if let Some(entries) = self.entries.get_mut(&kind) {
            self.counter -= entries.len();
            entries.clear();
        }
    }

    /// Drops every entry.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        for kind in InfoKind::iter() {
            self.clear_kind(kind);
        }
    }

    /// Number of entries across all categories.
    pub fn len(&self) -> usize {
        self.counter
    }

    /// True when nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.counter == 0
    }

    /// Capacity of the log.
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// True when the next `add` would fail.
    pub fn is_full(&self) -> bool {
        self.counter >= self.bound
    }

    /// Entries of `kind` rendered one per line as `[time] text`.
    pub fn render(&self, kind: InfoKind) -> String {
        let entries = self.entries(kind);
        if entries.is_empty() {
            return format!("No {kind} entry.\n");
        }
        entries.iter().map(|entry| format!("{entry}\n")).collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_BOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_last_per_kind() {
        let mut history = History::new(8);
        history.add_success("moved").unwrap();
        history.add_failure("blocked").unwrap();
        history.add_hint("try elsewhere").unwrap();
        history.add_success("attacked").unwrap();

        assert_eq!(history.len(), 4);
        assert_eq!(history.last_success().unwrap(), "attacked");
        assert_eq!(history.last_failure().unwrap(), "blocked");
        assert_eq!(history.last_hint().unwrap(), "try elsewhere");
        let texts: Vec<_> = history
            .entries(InfoKind::Success)
            .iter()
            .map(TimedEntry::text)
            .collect();
        assert_eq!(texts, vec!["moved", "attacked"]);
    }

    #[test]
    fn test_bound_is_shared_across_kinds() {
        let mut history = History::new(2);
        history.add_success("a").unwrap();
        history.add_hint("b").unwrap();
        assert!(history.is_full());

        let before = history.clone();
        assert_eq!(
            history.add_failure("c"),
            Err(HistoryError::Full { bound: 2 })
        );
        assert_eq!(history, before);
    }

    #[test]
    fn test_pop_frees_capacity() {
        let mut history = History::new(1);
        history.add_failure("x").unwrap();
        assert_eq!(history.pop_failure().unwrap(), "x");
        assert_eq!(history.len(), 0);
        history.add_success("y").unwrap();
    }

    #[test]
    fn test_empty_kind_errors() {
        let mut history = History::default();
        assert_eq!(history.bound(), DEFAULT_HISTORY_BOUND);
        assert_eq!(history.last_hint(), Err(HistoryError::Empty(InfoKind::Hint)));
        assert_eq!(
            history.pop(InfoKind::Success),
            Err(HistoryError::Empty(InfoKind::Success))
        );
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut history = History::new(4);
        history.add_success("a").unwrap();
        history.add_success("b").unwrap();
        history.add_hint("c").unwrap();

        history.clear_kind(InfoKind::Success);
        assert_eq!(history.len(), 1);
        assert!(history.entries(InfoKind::Success).is_empty());

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_render_lines() {
        let mut history = History::new(4);
        assert_eq!(history.render(InfoKind::Hint), "No hint entry.\n");

        history.add_success("Red moved").unwrap();
        let rendered = history.render(InfoKind::Success);
        assert!(rendered.starts_with('['));
        assert!(rendered.ends_with("] Red moved\n"));
        // dd-mm-yyyy hh:mm:ss
        assert_eq!(history.entries(InfoKind::Success)[0].readable_time().len(), 19);
    }
}
