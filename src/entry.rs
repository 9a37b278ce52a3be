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

//! Ledger entries.
//!
//! In the ledger sense: a debit increases the amount a customer owes (new
//! credit sale), a credit decreases it (payment received or return).

use crate::base::{CustomerId, EntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerEntry {
    /// New credit sale: increases the owed balance.
    Debit {
        customer_id: CustomerId,
        entry_id: EntryId,
        amount: Decimal,
    },
    /// Payment or return: decreases the owed balance, floored at zero.
    Credit {
        customer_id: CustomerId,
        entry_id: EntryId,
        amount: Decimal,
    },
}

impl LedgerEntry {
    pub fn id(&self) -> EntryId {
        match self {
            Self::Debit { entry_id, .. } => *entry_id,
            Self::Credit { entry_id, .. } => *entry_id,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        match self {
            Self::Debit { customer_id, .. } => *customer_id,
            Self::Credit { customer_id, .. } => *customer_id,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Self::Debit { amount, .. } => *amount,
            Self::Credit { amount, .. } => *amount,
        }
    }

    pub fn is_debit(&self) -> bool {
        matches!(self, Self::Debit { .. })
    }
}
