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

use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use mill_ledger_rs::{
    AccountStatus, Address, BusinessType, CreditStatus, CustomerId, CustomerRegistry,
    CustomerType, EntryId, LedgerEntry, NewCustomer,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;

/// Credit Ledger - Replay customer and ledger CSV files
///
/// Loads a customer roster, replays ledger entries against it, and outputs
/// final credit states to stdout. Customers receive sequential IDs in roster
/// order starting at 1; the entries file references those IDs.
#[derive(Parser, Debug)]
#[command(name = "mill-ledger-rs")]
#[command(about = "A credit ledger that replays customer and entry CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with the customer roster
    ///
    /// Expected format: name,email,national_id,business_type,credit_limit,credit_terms,credit_status,status
    #[arg(value_name = "CUSTOMERS")]
    customers: PathBuf,

    /// Path to CSV file with ledger entries
    ///
    /// Expected format: op,customer,entry,amount
    /// Example: cargo run -- customers.csv entries.csv > report.csv
    #[arg(value_name = "ENTRIES")]
    entries: Option<PathBuf>,
}

fn main() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("MILL_LEDGER_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let registry = CustomerRegistry::new();

    let roster = match File::open(&args.customers) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.customers.display(), e);
            process::exit(1);
        }
    };
    if let Err(e) = load_customers(&registry, BufReader::new(roster)) {
        eprintln!("Error loading customers: {}", e);
        process::exit(1);
    }

    if let Some(path) = &args.entries {
        let entries = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error opening file '{}': {}", path.display(), e);
                process::exit(1);
            }
        };
        if let Err(e) = process_entries(&registry, BufReader::new(entries)) {
            eprintln!("Error processing entries: {}", e);
            process::exit(1);
        }
    }

    if let Err(e) = write_customers(&registry, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw roster record matching the customer CSV format.
///
/// The enumerated columns are closed sets; a row with an unknown value fails
/// deserialization and is rejected.
#[derive(Debug, Deserialize)]
struct CustomerRow {
    name: String,
    email: String,
    national_id: String,
    business_type: BusinessType,
    credit_limit: Decimal,
    credit_terms: u16,
    credit_status: CreditStatus,
    status: AccountStatus,
}

impl CustomerRow {
    fn into_profile(self) -> NewCustomer {
        let customer_type = match self.business_type {
            BusinessType::Individual => CustomerType::Individual,
            _ => CustomerType::Business,
        };
        NewCustomer {
            name: self.name,
            email: self.email,
            phone: String::new(),
            national_id: self.national_id,
            address: Address::default(),
            business_name: String::new(),
            business_type: self.business_type,
            customer_type,
            credit_limit: self.credit_limit,
            credit_terms_days: self.credit_terms,
            credit_status: self.credit_status,
            status: self.status,
        }
    }
}

/// Raw entry record matching the ledger CSV format.
///
/// Fields: `op, customer, entry, amount`
#[derive(Debug, Deserialize)]
struct EntryRow {
    op: String,
    customer: u32,
    entry: u64,
    #[serde(deserialize_with = "csv::invalid_option")]
    amount: Option<Decimal>,
}

impl EntryRow {
    /// Converts an entry row to a LedgerEntry.
    ///
    /// Returns `None` for unknown operations or a missing amount.
    fn into_entry(self) -> Option<LedgerEntry> {
        let customer_id = CustomerId(self.customer);
        let entry_id = EntryId(self.entry);
        let amount = self.amount?;

        match self.op.to_lowercase().as_str() {
            "debit" => Some(LedgerEntry::Debit {
                customer_id,
                entry_id,
                amount,
            }),
            "credit" => Some(LedgerEntry::Credit {
                customer_id,
                entry_id,
                amount,
            }),
            _ => None,
        }
    }
}

/// Load the customer roster from a CSV reader.
///
/// Rows that fail deserialization (including out-of-enum status values) or
/// registration (duplicate email/national ID, invalid profile) are rejected
/// with a log line; processing continues with the remaining rows.
///
/// # CSV Format
///
/// Expected columns:
/// `name, email, national_id, business_type, credit_limit, credit_terms, credit_status, status`
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn load_customers<R: Read>(
    registry: &CustomerRegistry,
    reader: R,
) -> Result<usize, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);

    let mut registered = 0usize;
    for result in rdr.deserialize::<CustomerRow>() {
        match result {
            Ok(row) => match registry.register(row.into_profile()) {
                Ok(_) => registered += 1,
                Err(e) => tracing::warn!(error = %e, "rejecting customer row"),
            },
            Err(e) => {
                tracing::warn!(error = %e, "rejecting malformed customer row");
                continue;
            }
        }
    }

    Ok(registered)
}

/// Process ledger entries from a CSV reader.
///
/// This function uses streaming parsing to handle arbitrarily large entry
/// files without loading everything into memory. Malformed rows and rejected
/// entries (duplicates, gate failures) are skipped with a log line.
///
/// # CSV Format
///
/// Expected columns: `op, customer, entry, amount`
/// - `op`: Operation (debit, credit)
/// - `customer`: Customer ID (u32, roster order starting at 1)
/// - `entry`: Entry ID (u64, globally unique)
/// - `amount`: Decimal amount
///
/// # Example
///
/// ```csv
/// op,customer,entry,amount
/// debit,1,1,2500.00
/// credit,1,2,1000.00
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn process_entries<R: Read>(
    registry: &CustomerRegistry,
    reader: R,
) -> Result<(), csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<EntryRow>() {
        match result {
            Ok(row) => {
                let Some(entry) = row.into_entry() else {
                    tracing::debug!("skipping invalid entry record");
                    continue;
                };

                if let Err(e) = registry.process(entry) {
                    tracing::debug!(entry = %entry.id(), error = %e, "skipping entry");
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed entry row");
                continue;
            }
        }
    }

    Ok(())
}

/// Write final customer credit states to a CSV writer.
///
/// Outputs one row per customer, sorted by customer ID, with money rounded
/// to 2 decimal places.
///
/// # CSV Format
///
/// Columns: `number, name, business_type, credit_limit, balance, available, credit_status, status`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_customers<W: Write>(
    registry: &CustomerRegistry,
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    let mut ids: Vec<CustomerId> = registry.customers().map(|r| *r.key()).collect();
    ids.sort_by_key(|id| id.0);

    for id in ids {
        if let Some(customer) = registry.get(&id) {
            wtr.serialize(customer.value())?;
        }
    }

    wtr.flush()?;
    Ok(())
}
