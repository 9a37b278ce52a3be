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

//! Customer records.
//!
//! A [`Customer`] combines identity and business profile with the credit
//! sub-record and a rolling sales summary. All mutation happens under one
//! per-customer lock, so the gate check and the balance update of a credit
//! sale are a single atomic step.
//!
//! # Example
//!
//! ```
//! use mill_ledger_rs::{Customer, CustomerId, CustomerNumber, NewCustomer};
//! use rust_decimal_macros::dec;
//!
//! let profile = NewCustomer::sample("Vale Bakery", "orders@valebakery.example", dec!(10000));
//! let customer = Customer::new(
//!     CustomerId(1),
//!     CustomerNumber::from_sequence(1),
//!     profile,
//! )
//! .unwrap();
//! assert_eq!(customer.available_credit(), dec!(10000));
//! ```

use crate::base::{CustomerId, CustomerNumber};
use crate::credit::{CreditRecord, CreditStatus};
use crate::error::CreditError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;
use std::fmt;

/// Structured postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub postal_code: String,
}

/// Business classification of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
pub enum BusinessType {
    Retailer,
    Wholesaler,
    Distributor,
    Individual,
    Other,
}

impl BusinessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retailer => "retailer",
            Self::Wholesaler => "wholesaler",
            Self::Distributor => "distributor",
            Self::Individual => "individual",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse customer kind used by reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, Deserialize)]
pub enum CustomerType {
    #[default]
    Individual,
    Business,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Business => "business",
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall account status, independent of the credit status.
///
/// Customers are soft-disabled through this field; records are never hard
/// deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, Deserialize)]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rolling sales aggregates, updated on every successful credit sale.
///
/// Informational only; no invariant depends on these figures.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SalesSummary {
    pub purchase_count: u64,
    pub total_amount: Decimal,
    pub last_purchase_at: Option<DateTime<Utc>>,
    pub average_order_value: Decimal,
}

impl SalesSummary {
    fn record_sale(&mut self, amount: Decimal, at: DateTime<Utc>) {
        self.purchase_count += 1;
        self.total_amount += amount;
        self.last_purchase_at = Some(at);
        self.average_order_value = self.total_amount / Decimal::from(self.purchase_count);
    }
}

fn default_credit_terms() -> u16 {
    30
}

/// Registration data for a new customer.
///
/// Optional fields default so the registration surfaces (CSV roster, REST
/// body) only need to carry what they know. Enumerated fields are closed
/// sets; unknown strings fail deserialization at the boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub national_id: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub business_name: String,
    pub business_type: BusinessType,
    #[serde(default)]
    pub customer_type: CustomerType,
    pub credit_limit: Decimal,
    #[serde(default = "default_credit_terms")]
    pub credit_terms_days: u16,
    #[serde(default)]
    pub credit_status: CreditStatus,
    #[serde(default)]
    pub status: AccountStatus,
}

impl NewCustomer {
    /// Checks the profile before any state is allocated.
    pub fn validate(&self) -> Result<(), CreditError> {
        if self.name.trim().is_empty() {
            return Err(CreditError::InvalidProfile("name must not be empty"));
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(CreditError::InvalidProfile("email must be a valid address"));
        }
        if self.national_id.trim().is_empty() {
            return Err(CreditError::InvalidProfile("national ID must not be empty"));
        }
        if self.credit_limit < Decimal::ZERO {
            return Err(CreditError::InvalidProfile("credit limit must not be negative"));
        }
        Ok(())
    }

    /// Minimal valid profile for docs and tests.
    pub fn sample(name: &str, email: &str, credit_limit: Decimal) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: String::new(),
            national_id: format!("NID-{}", email),
            address: Address::default(),
            business_name: String::new(),
            business_type: BusinessType::Retailer,
            customer_type: CustomerType::Business,
            credit_limit,
            credit_terms_days: default_credit_terms(),
            credit_status: CreditStatus::Active,
            status: AccountStatus::Active,
        }
    }
}

#[derive(Debug)]
struct CustomerData {
    number: CustomerNumber,
    name: String,
    email: String,
    phone: String,
    national_id: String,
    address: Address,
    business_name: String,
    business_type: BusinessType,
    customer_type: CustomerType,
    credit: CreditRecord,
    sales: SalesSummary,
    status: AccountStatus,
}

impl CustomerData {
    fn from_profile(number: CustomerNumber, profile: NewCustomer) -> Result<Self, CreditError> {
        profile.validate()?;
        let mut credit = CreditRecord::new(profile.credit_limit, profile.credit_terms_days)?;
        credit.set_status(profile.credit_status);
        Ok(Self {
            number,
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            national_id: profile.national_id,
            address: profile.address,
            business_name: profile.business_name,
            business_type: profile.business_type,
            customer_type: profile.customer_type,
            credit,
            sales: SalesSummary::default(),
            status: profile.status,
        })
    }

    /// Read-only gate: overall status, then the credit record's own checks.
    fn authorize(&self, amount: Decimal) -> Result<Decimal, CreditError> {
        if self.status != AccountStatus::Active {
            return Err(CreditError::AccountInactive {
                status: self.status,
            });
        }
        self.credit.authorize(amount)
    }

    /// Applies a credit sale: gate re-check, balance increase, summary update.
    fn charge(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<(), CreditError> {
        if self.status != AccountStatus::Active {
            return Err(CreditError::AccountInactive {
                status: self.status,
            });
        }
        self.credit.debit(amount)?;
        self.sales.record_sale(amount, at);
        Ok(())
    }

    fn apply_payment(&mut self, amount: Decimal) -> Result<Decimal, CreditError> {
        self.credit.credit_payment(amount)
    }
}

/// Customer document.
#[derive(Debug)]
pub struct Customer {
    id: CustomerId,
    inner: Mutex<CustomerData>,
}

impl Customer {
    const DECIMAL_PRECISION: u32 = 2;

    pub fn new(
        id: CustomerId,
        number: CustomerNumber,
        profile: NewCustomer,
    ) -> Result<Self, CreditError> {
        Ok(Self {
            id,
            inner: Mutex::new(CustomerData::from_profile(number, profile)?),
        })
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn number(&self) -> CustomerNumber {
        self.inner.lock().number.clone()
    }

    pub fn name(&self) -> String {
        self.inner.lock().name.clone()
    }

    pub fn email(&self) -> String {
        self.inner.lock().email.clone()
    }

    pub fn national_id(&self) -> String {
        self.inner.lock().national_id.clone()
    }

    pub fn business_type(&self) -> BusinessType {
        self.inner.lock().business_type
    }

    pub fn customer_type(&self) -> CustomerType {
        self.inner.lock().customer_type
    }

    pub fn status(&self) -> AccountStatus {
        self.inner.lock().status
    }

    pub fn credit_limit(&self) -> Decimal {
        self.inner.lock().credit.limit()
    }

    pub fn current_balance(&self) -> Decimal {
        self.inner.lock().credit.balance()
    }

    pub fn available_credit(&self) -> Decimal {
        self.inner.lock().credit.available()
    }

    pub fn credit_terms_days(&self) -> u16 {
        self.inner.lock().credit.terms_days()
    }

    pub fn credit_status(&self) -> CreditStatus {
        self.inner.lock().credit.status()
    }

    pub fn sales_summary(&self) -> SalesSummary {
        self.inner.lock().sales.clone()
    }

    /// Read-only authorization check for a prospective sale.
    ///
    /// Returns the available headroom on success; never mutates state.
    pub fn authorize(&self, amount: Decimal) -> Result<Decimal, CreditError> {
        self.inner.lock().authorize(amount)
    }

    /// Records a credit sale.
    ///
    /// The authorization gate runs again inside the critical section, so two
    /// concurrent charges cannot both pass against a stale availability read.
    pub fn charge(&self, amount: Decimal, at: DateTime<Utc>) -> Result<(), CreditError> {
        self.inner.lock().charge(amount, at)
    }

    /// Records a payment or return against the owed balance.
    ///
    /// Returns the unapplied excess when the payment exceeds the balance;
    /// the stored balance is floored at zero.
    pub fn apply_payment(&self, amount: Decimal) -> Result<Decimal, CreditError> {
        let excess = self.inner.lock().apply_payment(amount)?;
        if excess > Decimal::ZERO {
            tracing::debug!(customer = %self.id, %excess, "payment exceeded balance, floored at zero");
        }
        Ok(excess)
    }

    pub fn set_credit_limit(&self, limit: Decimal) -> Result<(), CreditError> {
        self.inner.lock().credit.set_limit(limit)
    }

    pub fn set_credit_status(&self, status: CreditStatus) {
        self.inner.lock().credit.set_status(status);
    }

    pub fn set_status(&self, status: AccountStatus) {
        self.inner.lock().status = status;
    }
}

impl Serialize for Customer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = self.inner.lock();
        let mut state = serializer.serialize_struct("Customer", 8)?;
        state.serialize_field("number", data.number.as_str())?;
        state.serialize_field("name", &data.name)?;
        state.serialize_field("business_type", data.business_type.as_str())?;
        state.serialize_field(
            "credit_limit",
            &data.credit.limit().round_dp(Customer::DECIMAL_PRECISION),
        )?;
        state.serialize_field(
            "balance",
            &data.credit.balance().round_dp(Customer::DECIMAL_PRECISION),
        )?;
        state.serialize_field(
            "available",
            &data.credit.available().round_dp(Customer::DECIMAL_PRECISION),
        )?;
        state.serialize_field("credit_status", data.credit.status().as_str())?;
        state.serialize_field("status", data.status.as_str())?;
        state.end()
    }
}
