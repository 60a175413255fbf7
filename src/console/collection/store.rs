//! Collection Store
//!
//! The local copy of the software list plus its load status. Mutations are
//! only applied after the matching gateway call succeeded, using the request
//! payload rather than a server echo.
//!
//! Every stored record carries a revision stamped from a store-wide counter,
//! so a revision never repeats and always grows when a record changes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::console::error::ConsoleError;
use crate::shared::{Software, SoftwareFields};

/// Load status of the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    record: Software,
    revision: u64,
}

#[derive(Debug, Default)]
pub struct CollectionStore {
    entries: Vec<Entry>,
    status: LoadStatus,
    last_error: Option<String>,
    next_revision: u64,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a load as started. Existing rows stay visible.
    pub fn begin_load(&mut self) {
        self.status = LoadStatus::Loading;
        self.last_error = None;
    }

    /// Replace the whole list with a server snapshot.
    ///
    /// Repeated ids in the payload collapse to their last occurrence.
    pub fn load_succeeded(&mut self, records: Vec<Software>) {
        let mut entries: Vec<Entry> = Vec::with_capacity(records.len());
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(records.len());
        for record in records {
            let revision = self.stamp();
            match positions.get(&record.id) {
                Some(&index) => {
                    tracing::warn!(
                        "[SYNC] Server listed '{}' more than once, keeping the last copy",
                        record.id
                    );
                    entries[index] = Entry { record, revision };
                }
                None => {
                    positions.insert(record.id.clone(), entries.len());
                    entries.push(Entry { record, revision });
                }
            }
        }
        self.entries = entries;
        self.status = LoadStatus::Idle;
    }

    /// Record a failed load; the previous rows are kept
    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.status = LoadStatus::Error;
        self.last_error = Some(message.into());
    }

    /// Append a newly created record
    pub fn insert(&mut self, record: Software) -> Result<(), ConsoleError> {
        if self.contains(&record.id) {
            return Err(ConsoleError::DuplicateId(record.id));
        }
        let revision = self.stamp();
        self.entries.push(Entry { record, revision });
        Ok(())
    }

    /// Merge accepted fields into a record and bump its revision.
    ///
    /// Returns the new revision, or `None` if the id is no longer held.
    pub fn apply_update(
        &mut self,
        id: &str,
        fields: &SoftwareFields,
        now: DateTime<Utc>,
    ) -> Option<u64> {
        let revision = self.next_revision;
        let entry = self.entries.iter_mut().find(|e| e.record.id == id)?;
        entry.record.merge(fields, now);
        entry.revision = revision;
        self.next_revision += 1;
        Some(revision)
    }

    /// Remove a record; absent ids are a no-op
    pub fn remove(&mut self, id: &str) -> Option<Software> {
        let index = self.entries.iter().position(|e| e.record.id == id)?;
        Some(self.entries.remove(index).record)
    }

    /// Show a list-level error without changing the load status
    pub fn report(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn get(&self, id: &str) -> Option<&Software> {
        self.entries.iter().find(|e| e.record.id == id).map(|e| &e.record)
    }

    pub fn revision(&self, id: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.record.id == id).map(|e| e.revision)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.record.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Software> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn stamp(&mut self) -> u64 {
        let revision = self.next_revision;
        self.next_revision += 1;
        revision
    }
}
