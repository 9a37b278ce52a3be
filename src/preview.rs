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

//! Non-authoritative sale preview.
//!
//! Order-entry UIs show a live available-credit figure as line items are
//! added, before the order is submitted. [`SalePreview`] reproduces the
//! availability arithmetic for that purpose using the same calculator as
//! the store side, so the two cannot drift.
//!
//! This is a preview only. The registry's gate re-validates every charge
//! against the stored balance inside the customer's critical section; a
//! preview that said "fits" guarantees nothing once concurrent sales land.
//!
//! # Example
//!
//! ```
//! use mill_ledger_rs::SalePreview;
//! use rust_decimal_macros::dec;
//!
//! let mut preview = SalePreview::new(dec!(10000), dec!(3000));
//! assert_eq!(preview.available(), dec!(7000));
//!
//! preview.add_item(dec!(2500));
//! assert_eq!(preview.available(), dec!(4500));
//! assert!(preview.would_authorize(dec!(4500)));
//! assert!(!preview.would_authorize(dec!(4501)));
//! ```

use crate::credit::available_credit;
use rust_decimal::Decimal;

/// Provisional credit arithmetic for an order being assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalePreview {
    credit_limit: Decimal,
    current_balance: Decimal,
    pending: Decimal,
}

impl SalePreview {
    /// Starts a preview from a snapshot of the customer's stored figures.
    pub fn new(credit_limit: Decimal, current_balance: Decimal) -> Self {
        Self {
            credit_limit,
            current_balance,
            pending: Decimal::ZERO,
        }
    }

    /// Adds a line item to the provisional order total.
    pub fn add_item(&mut self, amount: Decimal) {
        self.pending += amount;
    }

    /// Removes a line item from the provisional order total.
    pub fn remove_item(&mut self, amount: Decimal) {
        self.pending -= amount;
    }

    /// Clears the provisional order.
    pub fn clear(&mut self) {
        self.pending = Decimal::ZERO;
    }

    /// Provisional order total so far.
    pub fn pending_total(&self) -> Decimal {
        self.pending
    }

    /// Balance the customer would owe if the pending order were accepted.
    pub fn projected_balance(&self) -> Decimal {
        self.current_balance + self.pending
    }

    /// Provisional headroom after the pending order.
    pub fn available(&self) -> Decimal {
        available_credit(self.credit_limit, self.projected_balance())
    }

    /// Early client-side rejection check for one more item.
    ///
    /// `false` here saves a round trip; `true` is only a hint.
    pub fn would_authorize(&self, amount: Decimal) -> bool {
        amount > Decimal::ZERO && amount <= self.available()
    }
}
