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

//! Core identifier types for customers and ledger entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a customer record.
///
/// Wraps a `u32`. Assigned by the registry's allocator at registration
/// time and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CustomerId(pub u32);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a ledger entry.
///
/// Wraps a `u64`. Entry IDs must be globally unique across both debit and
/// credit entries; replays are rejected by the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-facing sequential customer number, e.g. `CUST-000042`.
///
/// Minted from the registry's atomic sequence, so two concurrent
/// registrations can never receive the same number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CustomerNumber(String);

impl CustomerNumber {
    const PREFIX: &'static str = "CUST";
    const WIDTH: usize = 6;

    /// Formats a sequence value as a fixed-width zero-padded number.
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!(
            "{}-{:0width$}",
            Self::PREFIX,
            sequence,
            width = Self::WIDTH
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::CustomerNumber;

    #[test]
    fn customer_number_is_zero_padded() {
        assert_eq!(CustomerNumber::from_sequence(1).as_str(), "CUST-000001");
        assert_eq!(CustomerNumber::from_sequence(42).as_str(), "CUST-000042");
        assert_eq!(
            CustomerNumber::from_sequence(123456).as_str(),
            "CUST-123456"
        );
    }

    #[test]
    fn customer_number_widens_past_fixed_width() {
        // Sequences beyond six digits keep growing instead of truncating.
        assert_eq!(
            CustomerNumber::from_sequence(1_234_567).as_str(),
            "CUST-1234567"
        );
    }
}
