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

//! Customer registry.
//!
//! The [`CustomerRegistry`] is the store-facing surface of the credit
//! ledger: it registers customers, answers authorization checks, and applies
//! ledger entries.
//!
//! # Entry Processing
//!
//! - **Debits**: Record a credit sale (gate re-checked atomically, fails if
//!   credit is unavailable).
//! - **Credits**: Record a payment or return (balance floored at zero).
//!
//! # Thread Safety
//!
//! The registry uses [`DashMap`] for concurrent access to customers,
//! allowing entries for different customers to be processed in parallel.
//! Each customer's gate check and balance update run under that customer's
//! own lock, so concurrent debits cannot jointly exceed the credit limit.

use crate::allocator::SequenceAllocator;
use crate::base::CustomerId;
use crate::customer::{Customer, NewCustomer};
use crate::entry::LedgerEntry;
use crate::error::CreditError;
use crate::journal::EntryJournal;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Customer registry managing credit records and ledger entries.
///
/// # Invariants
///
/// - Entry IDs are globally unique across debits and credits.
/// - Customer numbers are minted once from an atomic sequence, never reused.
/// - Email and national ID are unique across all registered customers.
/// - A debit is applied only if the full authorization gate passes inside
///   the customer's critical section.
pub struct CustomerRegistry {
    /// Customer records indexed by customer ID.
    customers: DashMap<CustomerId, Customer>,
    /// Lowercased email -> customer, for uniqueness at registration.
    emails: DashMap<String, CustomerId>,
    /// National ID -> customer, for uniqueness at registration.
    national_ids: DashMap<String, CustomerId>,
    /// Customer ID and number sequence.
    sequence: SequenceAllocator,
    /// Global entry journal for deduplication.
    journal: EntryJournal,
}

impl CustomerRegistry {
    /// Creates a new registry with no customers or entries.
    pub fn new() -> Self {
        Self {
            customers: DashMap::new(),
            emails: DashMap::new(),
            national_ids: DashMap::new(),
            sequence: SequenceAllocator::new(),
            journal: EntryJournal::new(),
        }
    }

    /// Registers a customer, allocating its ID and customer number.
    ///
    /// # Errors
    ///
    /// - [`CreditError::InvalidProfile`] - Profile failed validation.
    /// - [`CreditError::DuplicateIdentity`] - Email or national ID is
    ///   already registered.
    pub fn register(&self, profile: NewCustomer) -> Result<CustomerId, CreditError> {
        profile.validate()?;

        let email_key = profile.email.trim().to_lowercase();
        let national_id_key = profile.national_id.trim().to_string();

        // Reserve identity keys with atomic check-and-insert; the reserved
        // slots are filled with the real ID after allocation.
        match self.emails.entry(email_key.clone()) {
            Entry::Occupied(_) => return Err(CreditError::DuplicateIdentity { field: "email" }),
            Entry::Vacant(vacant) => {
                vacant.insert(CustomerId(0));
            }
        }
        match self.national_ids.entry(national_id_key.clone()) {
            Entry::Occupied(_) => {
                self.emails.remove(&email_key);
                return Err(CreditError::DuplicateIdentity {
                    field: "national ID",
                });
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CustomerId(0));
            }
        }

        let (customer_id, number) = self.sequence.allocate();
        let customer = match Customer::new(customer_id, number.clone(), profile) {
            Ok(customer) => customer,
            Err(err) => {
                self.emails.remove(&email_key);
                self.national_ids.remove(&national_id_key);
                return Err(err);
            }
        };

        self.emails.insert(email_key, customer_id);
        self.national_ids.insert(national_id_key, customer_id);
        self.customers.insert(customer_id, customer);

        tracing::debug!(customer = %customer_id, number = %number, "registered customer");
        Ok(customer_id)
    }

    /// Read-only authorization check for a prospective credit sale.
    ///
    /// Returns the available headroom on success. Does not mutate state;
    /// acceptance here is advisory until the debit itself is processed.
    ///
    /// # Errors
    ///
    /// - [`CreditError::CustomerNotFound`] - Unknown customer ID.
    /// - [`CreditError::AccountInactive`] - Overall status is not active.
    /// - [`CreditError::CreditInactive`] - Credit status is not active.
    /// - [`CreditError::InsufficientCredit`] - Amount exceeds availability.
    pub fn authorize(
        &self,
        customer_id: &CustomerId,
        amount: Decimal,
    ) -> Result<Decimal, CreditError> {
        let customer = self
            .customers
            .get(customer_id)
            .ok_or(CreditError::CustomerNotFound)?;

        let decision = customer.authorize(amount);
        if let Err(err) = &decision {
            tracing::debug!(customer = %customer_id, %amount, error = %err, "authorization rejected");
        }
        decision
    }

    /// Processes a ledger entry, updating the appropriate customer record.
    ///
    /// | Entry | Behavior |
    /// |-------|----------|
    /// | Debit | Gate re-check under the customer lock, then balance increase |
    /// | Credit | Balance decrease, floored at zero |
    ///
    /// # Errors
    ///
    /// - [`CreditError::DuplicateEntry`] - Entry ID already journaled.
    /// - [`CreditError::CustomerNotFound`] - Unknown customer ID.
    /// - [`CreditError::AccountInactive`] / [`CreditError::CreditInactive`] /
    ///   [`CreditError::InsufficientCredit`] - Debit rejected by the gate.
    /// - [`CreditError::InvalidAmount`] - Amount is zero or negative.
    pub fn process(&self, entry: LedgerEntry) -> Result<(), CreditError> {
        // Journal first to validate a unique entry ID. This prevents a
        // replayed submission from applying the same balance change twice.
        let entry_arc = Arc::new(entry);
        self.journal.push(Arc::clone(&entry_arc))?;

        let customer = self
            .customers
            .get(&entry_arc.customer_id())
            .ok_or(CreditError::CustomerNotFound)?;

        match *entry_arc {
            LedgerEntry::Debit { amount, .. } => customer.charge(amount, Utc::now()),
            LedgerEntry::Credit { amount, .. } => customer.apply_payment(amount).map(|_| ()),
        }
    }

    /// Retrieves a customer record by ID.
    ///
    /// Returns `None` if no customer exists for the given ID.
    pub fn get(
        &self,
        customer_id: &CustomerId,
    ) -> Option<dashmap::mapref::one::Ref<'_, CustomerId, Customer>> {
        self.customers.get(customer_id)
    }

    /// Returns an iterator over all customer records.
    ///
    /// Useful for customer pickers and report output.
    pub fn customers(
        &self,
    ) -> impl Iterator<Item = dashmap::mapref::multiple::RefMulti<'_, CustomerId, Customer>> {
        self.customers.iter()
    }

    /// Number of registered customers.
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

impl Default for CustomerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
