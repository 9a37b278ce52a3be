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

//! Property-based tests for the credit ledger.
//!
//! These tests verify invariants that should hold for any sequence of
//! valid ledger operations.

use mill_ledger_rs::credit::CreditRecord;
use mill_ledger_rs::{available_credit, CreditError, CreditStatus, SalePreview};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate a positive amount (0.01 to 100,000.00 with 2 decimal places).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generate a non-negative credit limit (0.00 to 1,000,000.00).
fn arb_limit() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// A record with a random balance already owed against the limit.
fn record_with_balance(limit: Decimal, balance: Decimal) -> CreditRecord {
    let mut record = CreditRecord::new(limit, 30).unwrap();
    if balance > Decimal::ZERO {
        record.debit(balance).unwrap();
    }
    record
}

// =============================================================================
// Availability Calculator Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// availableCredit == max(0, creditLimit - currentBalance), always.
    #[test]
    fn availability_matches_formula(
        limit in arb_limit(),
        balance in arb_limit(),
    ) {
        let expected = if limit > balance { limit - balance } else { Decimal::ZERO };
        prop_assert_eq!(available_credit(limit, balance), expected);
    }

    /// Availability is never negative.
    #[test]
    fn availability_never_negative(
        limit in arb_limit(),
        balance in arb_limit(),
    ) {
        prop_assert!(available_credit(limit, balance) >= Decimal::ZERO);
    }

    /// Recomputing from the same inputs yields the same value.
    #[test]
    fn availability_is_idempotent(
        limit in arb_limit(),
        balance in arb_limit(),
    ) {
        prop_assert_eq!(
            available_credit(limit, balance),
            available_credit(limit, balance)
        );
    }
}

// =============================================================================
// Gate Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// The gate accepts exactly when the amount fits the available headroom.
    #[test]
    fn gate_accepts_iff_amount_fits(
        limit in arb_limit(),
        balance_fraction in 0.0f64..1.0,
        amount in arb_amount(),
    ) {
        let balance = (limit * Decimal::try_from(balance_fraction).unwrap()).round_dp(2);
        let record = record_with_balance(limit, balance);

        let decision = record.authorize(amount);
        if amount <= record.available() {
            prop_assert_eq!(decision, Ok(record.available()));
        } else {
            prop_assert_eq!(
                decision,
                Err(CreditError::InsufficientCredit { available: record.available() })
            );
        }
    }

    /// A non-active credit status rejects every amount.
    #[test]
    fn inactive_credit_rejects_everything(
        limit in arb_limit(),
        amount in arb_amount(),
        suspended in prop::bool::ANY,
    ) {
        let mut record = CreditRecord::new(limit, 30).unwrap();
        let status = if suspended { CreditStatus::Suspended } else { CreditStatus::Blocked };
        record.set_status(status);

        prop_assert_eq!(
            record.authorize(amount),
            Err(CreditError::CreditInactive { status })
        );
    }

    /// The gate never mutates the record.
    #[test]
    fn gate_is_read_only(
        limit in arb_limit(),
        amount in arb_amount(),
    ) {
        let record = CreditRecord::new(limit, 30).unwrap();
        let before = record.clone();
        let _ = record.authorize(amount);
        prop_assert_eq!(record, before);
    }
}

// =============================================================================
// Mutator Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Debit then credit of the same amount returns to the original balance.
    #[test]
    fn debit_then_credit_round_trips(
        limit in arb_limit(),
        amount in arb_amount(),
    ) {
        let mut record = CreditRecord::new(limit, 30).unwrap();

        if record.debit(amount).is_ok() {
            record.credit_payment(amount).unwrap();
            prop_assert_eq!(record.balance(), Decimal::ZERO);
            prop_assert_eq!(record.available(), limit);
        }
    }

    /// Payments never drive the balance below zero.
    #[test]
    fn payments_floor_at_zero(
        limit in arb_limit(),
        payments in prop::collection::vec(arb_amount(), 1..10),
    ) {
        let mut record = CreditRecord::new(limit, 30).unwrap();
        let _ = record.debit(limit / Decimal::TWO);

        for payment in &payments {
            let _ = record.credit_payment(*payment);
            prop_assert!(record.balance() >= Decimal::ZERO);
        }
    }

    /// The derived availability stays consistent through any op sequence.
    #[test]
    fn availability_invariant_survives_any_sequence(
        limit in arb_limit(),
        ops in prop::collection::vec((prop::bool::ANY, arb_amount()), 1..30),
    ) {
        let mut record = CreditRecord::new(limit, 30).unwrap();

        for (is_debit, amount) in &ops {
            if *is_debit {
                let _ = record.debit(*amount);
            } else {
                let _ = record.credit_payment(*amount);
            }

            prop_assert!(record.balance() >= Decimal::ZERO);
            prop_assert!(record.balance() <= limit);
            prop_assert_eq!(
                record.available(),
                available_credit(record.limit(), record.balance())
            );
        }
    }

    /// The excess reported by an overpayment is exactly what was not applied.
    #[test]
    fn overpayment_excess_accounts_for_everything(
        limit in arb_limit(),
        payment in arb_amount(),
    ) {
        let mut record = CreditRecord::new(limit, 30).unwrap();
        let _ = record.debit(limit);
        let balance_before = record.balance();

        let excess = record.credit_payment(payment).unwrap();

        prop_assert_eq!(balance_before - (payment - excess), record.balance());
        prop_assert!(excess <= payment);
    }
}

// =============================================================================
// Preview Mirror Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The preview reproduces the authoritative availability arithmetic.
    #[test]
    fn preview_matches_calculator(
        limit in arb_limit(),
        balance in arb_limit(),
        items in prop::collection::vec(arb_amount(), 0..10),
    ) {
        let mut preview = SalePreview::new(limit, balance);
        let mut pending = Decimal::ZERO;
        for item in &items {
            preview.add_item(*item);
            pending += *item;
        }

        prop_assert_eq!(
            preview.available(),
            available_credit(limit, balance + pending)
        );
    }

    /// An empty preview agrees with the store-side gate for active credit.
    #[test]
    fn preview_agrees_with_gate(
        limit in arb_limit(),
        balance_fraction in 0.0f64..1.0,
        amount in arb_amount(),
    ) {
        let balance = (limit * Decimal::try_from(balance_fraction).unwrap()).round_dp(2);
        let record = record_with_balance(limit, balance);
        let preview = SalePreview::new(record.limit(), record.balance());

        prop_assert_eq!(
            preview.would_authorize(amount),
            record.authorize(amount).is_ok()
        );
    }
}
