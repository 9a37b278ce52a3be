// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Thread-safe ledger entry journal with deduplication.
//!
//! Provides a concurrent journal that ensures entry ID uniqueness while
//! maintaining insertion order, so replayed form submissions cannot apply
//! the same balance change twice.

use crate::base::EntryId;
use crate::entry::LedgerEntry;
use crate::error::CreditError;
use crossbeam::queue::SegQueue;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// A thread-safe entry journal with duplicate detection.
///
/// Combines a [`DashMap`] for O(1) duplicate checking with a [`SegQueue`]
/// to preserve insertion order. All operations are lock-free and safe
/// for concurrent access.
#[derive(Debug)]
pub struct EntryJournal {
    /// Map of entry IDs to entries for O(1) duplicate detection.
    entries: DashMap<EntryId, Arc<LedgerEntry>>,

    /// Queue of entry IDs maintaining FIFO order.
    entry_ids: SegQueue<EntryId>,
}

impl EntryJournal {
    /// Creates a new empty journal.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            entry_ids: SegQueue::new(),
        }
    }

    /// Adds an entry to the journal.
    ///
    /// # Errors
    ///
    /// Returns [`CreditError::DuplicateEntry`] if an entry with the same ID
    /// already exists in the journal.
    pub fn push(&self, entry: Arc<LedgerEntry>) -> Result<(), CreditError> {
        let entry_id = entry.id();

        // Use entry API for atomic check-and-insert to prevent race conditions
        match self.entries.entry(entry_id) {
            Entry::Occupied(_) => Err(CreditError::DuplicateEntry),
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
                self.entry_ids.push(entry_id);
                Ok(())
            }
        }
    }

}

impl Default for EntryJournal {
    fn default() -> Self {
        Self::new()
    }
}
