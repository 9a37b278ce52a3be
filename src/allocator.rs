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

//! Sequential customer number allocation.
//!
//! An atomic fetch-add sequence mints the customer ID and the formatted
//! customer number in one step. Two concurrent registrations always receive
//! distinct numbers; a registration that fails after allocation burns its
//! number rather than recycling it.

use crate::base::{CustomerId, CustomerNumber};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct SequenceAllocator {
    next: AtomicU64,
}

impl SequenceAllocator {
    /// Creates an allocator starting at sequence 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates an allocator resuming from `next`, for stores that already
    /// hold customers.
    pub fn starting_at(next: u64) -> Self {
        Self {
            next: AtomicU64::new(next),
        }
    }

    /// Mints the next customer ID and number pair.
    pub fn allocate(&self) -> (CustomerId, CustomerNumber) {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed);
        (
            CustomerId(sequence as u32),
            CustomerNumber::from_sequence(sequence),
        )
    }
}

impl Default for SequenceAllocator {
    fn default() -> Self {
        Self::new()
    }
}
