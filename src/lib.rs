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

//! # Mill Ledger
//!
//! This library provides a customer credit ledger for flour-mill sales
//! operations: credit-limit enforcement, sale-time authorization, and
//! payment application over a concurrent customer registry.
//!
//! ## Core Components
//!
//! - [`CustomerRegistry`]: Store-facing surface managing customer records
//! - [`Customer`]: Customer document with credit record and sales summary
//! - [`LedgerEntry`]: Ledger operations (debit = credit sale, credit = payment)
//! - [`SalePreview`]: Non-authoritative availability arithmetic for order-entry UIs
//! - [`CreditError`]: Error types for rejected registrations and entries
//!
//! ## Example
//!
//! ```
//! use mill_ledger_rs::{CustomerRegistry, EntryId, LedgerEntry, NewCustomer};
//! use rust_decimal_macros::dec;
//!
//! let registry = CustomerRegistry::new();
//!
//! // Register a customer with a 10,000 credit limit
//! let profile = NewCustomer::sample("Vale Bakery", "orders@valebakery.example", dec!(10000));
//! let customer_id = registry.register(profile).unwrap();
//!
//! // Check, then record, a credit sale
//! assert_eq!(registry.authorize(&customer_id, dec!(3000)), Ok(dec!(10000)));
//! registry
//!     .process(LedgerEntry::Debit {
//!         customer_id,
//!         entry_id: EntryId(1),
//!         amount: dec!(3000),
//!     })
//!     .unwrap();
//!
//! let customer = registry.get(&customer_id).unwrap();
//! assert_eq!(customer.current_balance(), dec!(3000));
//! assert_eq!(customer.available_credit(), dec!(7000));
//! ```
//!
//! ## Thread Safety
//!
//! The registry handles concurrent access to customers, and each customer's
//! authorization gate and balance update run inside one critical section, so
//! two concurrent sales can never jointly exceed a credit limit.

mod allocator;
mod base;
pub mod credit;
pub mod customer;
mod entry;
pub mod error;
mod journal;
mod preview;
mod registry;

pub use allocator::SequenceAllocator;
pub use base::{CustomerId, CustomerNumber, EntryId};
pub use credit::{available_credit, CreditRecord, CreditStatus};
pub use customer::{
    AccountStatus, Address, BusinessType, Customer, CustomerType, NewCustomer, SalesSummary,
};
pub use entry::LedgerEntry;
pub use error::CreditError;
pub use journal::EntryJournal;
pub use preview::SalePreview;
pub use registry::CustomerRegistry;
