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

//! Credit availability arithmetic and the per-customer credit record.
//!
//! The derived available figure is recomputed after every limit or balance
//! change; it is never trusted as stored state.
//!
//! # Example
//!
//! ```
//! use mill_ledger_rs::credit::available_credit;
//! use rust_decimal_macros::dec;
//!
//! assert_eq!(available_credit(dec!(10000), dec!(3000)), dec!(7000));
//! assert_eq!(available_credit(dec!(1000), dec!(2500)), dec!(0));
//! ```

use crate::error::CreditError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Computes the headroom for new credit-based sales.
///
/// Pure and deterministic: `max(0, limit - balance)`.
pub fn available_credit(limit: Decimal, balance: Decimal) -> Decimal {
    (limit - balance).max(Decimal::ZERO)
}

/// Account-level credit gate, independent of the numeric balance.
///
/// Only `Active` customers may transact on credit. Transitions are set
/// externally; there is no automatic state machine here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditStatus {
    #[default]
    Active,
    Suspended,
    Blocked,
}

impl CreditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credit sub-record of a customer document.
///
/// Holds the credit limit, the amount currently owed, and the derived
/// availability. `available` always equals
/// `max(0, limit - balance)` after any mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditRecord {
    limit: Decimal,
    balance: Decimal,
    available: Decimal,
    /// Payment due window in days. Informational only; nothing in this
    /// subsystem enforces it.
    terms_days: u16,
    status: CreditStatus,
}

impl CreditRecord {
    /// Creates a record with a zero opening balance.
    ///
    /// # Errors
    ///
    /// Returns [`CreditError::InvalidProfile`] if the limit is negative.
    pub fn new(limit: Decimal, terms_days: u16) -> Result<Self, CreditError> {
        if limit < Decimal::ZERO {
            return Err(CreditError::InvalidProfile("credit limit must not be negative"));
        }
        let record = Self {
            limit,
            balance: Decimal::ZERO,
            available: available_credit(limit, Decimal::ZERO),
            terms_days,
            status: CreditStatus::Active,
        };
        record.assert_invariants();
        Ok(record)
    }

    pub fn limit(&self) -> Decimal {
        self.limit
    }

    /// Amount the customer currently owes.
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Derived headroom for new credit sales.
    pub fn available(&self) -> Decimal {
        self.available
    }

    pub fn terms_days(&self) -> u16 {
        self.terms_days
    }

    pub fn status(&self) -> CreditStatus {
        self.status
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= Decimal::ZERO,
            "Invariant violated: balance went negative: {}",
            self.balance
        );
        debug_assert_eq!(
            self.available,
            available_credit(self.limit, self.balance),
            "Invariant violated: stale available credit"
        );
    }

    fn recompute(&mut self) {
        self.available = available_credit(self.limit, self.balance);
    }

    /// Validates a prospective charge against the record without mutating it.
    ///
    /// Returns the available headroom on success.
    ///
    /// # Errors
    ///
    /// - [`CreditError::InvalidAmount`] - Amount is zero or negative.
    /// - [`CreditError::CreditInactive`] - Credit status is not `Active`.
    /// - [`CreditError::InsufficientCredit`] - Amount exceeds availability.
    pub fn authorize(&self, amount: Decimal) -> Result<Decimal, CreditError> {
        if amount <= Decimal::ZERO {
            return Err(CreditError::InvalidAmount);
        }
        if self.status != CreditStatus::Active {
            return Err(CreditError::CreditInactive { status: self.status });
        }
        if self.available < amount {
            return Err(CreditError::InsufficientCredit {
                available: self.available,
            });
        }
        Ok(self.available)
    }

    /// Increases the owed balance (new credit sale).
    ///
    /// Re-runs the full authorization check before applying, so the gate and
    /// the mutation are one step for callers holding the record.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), CreditError> {
        self.authorize(amount)?;
        self.balance += amount;
        self.recompute();
        self.assert_invariants();
        Ok(())
    }

    /// Decreases the owed balance (payment received or return).
    ///
    /// The balance is floored at zero; the unapplied excess is returned so
    /// callers can reconcile overpayments. Payments are accepted regardless
    /// of credit status.
    pub fn credit_payment(&mut self, amount: Decimal) -> Result<Decimal, CreditError> {
        if amount <= Decimal::ZERO {
            return Err(CreditError::InvalidAmount);
        }
        let excess = (amount - self.balance).max(Decimal::ZERO);
        self.balance = (self.balance - amount).max(Decimal::ZERO);
        self.recompute();
        self.assert_invariants();
        Ok(excess)
    }

    /// Replaces the credit limit and recomputes availability.
    pub fn set_limit(&mut self, limit: Decimal) -> Result<(), CreditError> {
        if limit < Decimal::ZERO {
            return Err(CreditError::InvalidProfile("credit limit must not be negative"));
        }
        self.limit = limit;
        self.recompute();
        self.assert_invariants();
        Ok(())
    }

    pub fn set_status(&mut self, status: CreditStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn available_credit_is_limit_minus_balance() {
        assert_eq!(available_credit(dec!(10000), dec!(3000)), dec!(7000));
    }

    #[test]
    fn available_credit_floors_at_zero() {
        assert_eq!(available_credit(dec!(1000), dec!(2500)), dec!(0));
        assert_eq!(available_credit(dec!(0), dec!(0)), dec!(0));
    }

    #[test]
    fn available_credit_is_idempotent() {
        let first = available_credit(dec!(500.50), dec!(120.25));
        let second = available_credit(dec!(500.50), dec!(120.25));
        assert_eq!(first, second);
    }

    #[test]
    fn new_record_rejects_negative_limit() {
        let result = CreditRecord::new(dec!(-1), 30);
        assert!(matches!(result, Err(CreditError::InvalidProfile(_))));
    }

    #[test]
    fn authorize_accepts_within_available() {
        let mut record = CreditRecord::new(dec!(10000), 30).unwrap();
        record.debit(dec!(3000)).unwrap();
        assert_eq!(record.authorize(dec!(6000)), Ok(dec!(7000)));
    }

    #[test]
    fn authorize_rejects_over_available() {
        let mut record = CreditRecord::new(dec!(10000), 30).unwrap();
        record.debit(dec!(3000)).unwrap();
        assert_eq!(
            record.authorize(dec!(8000)),
            Err(CreditError::InsufficientCredit {
                available: dec!(7000)
            })
        );
    }

    #[test]
    fn authorize_rejects_any_amount_when_suspended() {
        let mut record = CreditRecord::new(dec!(9999), 30).unwrap();
        record.set_status(CreditStatus::Suspended);
        assert_eq!(
            record.authorize(dec!(1)),
            Err(CreditError::CreditInactive {
                status: CreditStatus::Suspended
            })
        );
    }

    #[test]
    fn authorize_rejects_nonpositive_amount() {
        let record = CreditRecord::new(dec!(100), 30).unwrap();
        assert_eq!(record.authorize(dec!(0)), Err(CreditError::InvalidAmount));
        assert_eq!(record.authorize(dec!(-5)), Err(CreditError::InvalidAmount));
    }

    #[test]
    fn authorize_does_not_mutate() {
        let record = CreditRecord::new(dec!(100), 30).unwrap();
        let before = record.clone();
        let _ = record.authorize(dec!(50));
        assert_eq!(record, before);
    }

    #[test]
    fn debit_updates_balance_and_available() {
        let mut record = CreditRecord::new(dec!(10000), 30).unwrap();
        record.debit(dec!(3000)).unwrap();
        record.debit(dec!(2000)).unwrap();
        assert_eq!(record.balance(), dec!(5000));
        assert_eq!(record.available(), dec!(5000));
    }

    #[test]
    fn debit_rejected_leaves_record_unchanged() {
        let mut record = CreditRecord::new(dec!(100), 30).unwrap();
        let result = record.debit(dec!(150));
        assert_eq!(
            result,
            Err(CreditError::InsufficientCredit {
                available: dec!(100)
            })
        );
        assert_eq!(record.balance(), dec!(0));
        assert_eq!(record.available(), dec!(100));
    }

    #[test]
    fn payment_reduces_balance() {
        let mut record = CreditRecord::new(dec!(10000), 30).unwrap();
        record.debit(dec!(5000)).unwrap();
        let excess = record.credit_payment(dec!(2000)).unwrap();
        assert_eq!(excess, dec!(0));
        assert_eq!(record.balance(), dec!(3000));
        assert_eq!(record.available(), dec!(7000));
    }

    #[test]
    fn overpayment_floors_at_zero_and_reports_excess() {
        let mut record = CreditRecord::new(dec!(10000), 30).unwrap();
        record.debit(dec!(5000)).unwrap();
        let excess = record.credit_payment(dec!(9000)).unwrap();
        assert_eq!(excess, dec!(4000));
        assert_eq!(record.balance(), dec!(0));
        assert_eq!(record.available(), dec!(10000));
    }

    #[test]
    fn payment_allowed_while_suspended() {
        let mut record = CreditRecord::new(dec!(1000), 30).unwrap();
        record.debit(dec!(400)).unwrap();
        record.set_status(CreditStatus::Blocked);
        record.credit_payment(dec!(400)).unwrap();
        assert_eq!(record.balance(), dec!(0));
    }

    #[test]
    fn raising_limit_recomputes_available() {
        let mut record = CreditRecord::new(dec!(1000), 30).unwrap();
        record.debit(dec!(800)).unwrap();
        record.set_limit(dec!(2000)).unwrap();
        assert_eq!(record.available(), dec!(1200));
    }

    #[test]
    fn lowering_limit_below_balance_floors_available() {
        let mut record = CreditRecord::new(dec!(1000), 30).unwrap();
        record.debit(dec!(800)).unwrap();
        record.set_limit(dec!(500)).unwrap();
        assert_eq!(record.available(), dec!(0));
        assert_eq!(record.balance(), dec!(800));
    }
}
