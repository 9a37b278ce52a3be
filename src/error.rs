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

//! Error types for credit ledger operations.

use crate::credit::CreditStatus;
use crate::customer::AccountStatus;
use rust_decimal::Decimal;
use thiserror::Error;

/// Credit ledger errors.
///
/// All variants are synchronous rejections surfaced to the caller; none are
/// retriable and none are fatal to the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreditError {
    /// Referenced customer ID does not exist
    #[error("customer not found")]
    CustomerNotFound,

    /// Overall account status disallows transactions
    #[error("customer account is {status}")]
    AccountInactive { status: AccountStatus },

    /// Credit status disallows credit transactions
    #[error("customer credit is {status}")]
    CreditInactive { status: CreditStatus },

    /// Requested amount exceeds available credit
    #[error("insufficient credit ({available} available)")]
    InsufficientCredit { available: Decimal },

    /// Amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Registration data failed validation
    #[error("invalid customer profile: {0}")]
    InvalidProfile(&'static str),

    /// A unique identity field is already registered
    #[error("duplicate customer {field}")]
    DuplicateIdentity { field: &'static str },

    /// Duplicate ledger entry ID
    #[error("duplicate entry ID")]
    DuplicateEntry,
}
