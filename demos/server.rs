//! Simple REST API server example for the credit ledger.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `POST /customers` - Register a customer
//! - `GET /customers` - List all customers
//! - `GET /customers/:id` - Get a customer's credit state by ID
//! - `POST /customers/:id/authorize` - Read-only credit check for a proposed sale
//! - `PUT /customers/:id/credit` - Update credit limit and/or credit status
//! - `POST /entries` - Record a ledger entry (debit or credit)
//!
//! ## Example Usage
//!
//! ```bash
//! # Register
//! curl -X POST http://localhost:3000/customers \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Vale Bakery", "email": "orders@vale.example", "national_id": "NID-1", "business_type": "Retailer", "credit_limit": "10000.00"}'
//!
//! # Check a proposed sale
//! curl -X POST http://localhost:3000/customers/1/authorize \
//!   -H "Content-Type: application/json" \
//!   -d '{"amount": "6000.00"}'
//!
//! # Record the sale
//! curl -X POST http://localhost:3000/entries \
//!   -H "Content-Type: application/json" \
//!   -d '{"type": "debit", "customer_id": 1, "entry_id": 1, "amount": "6000.00"}'
//!
//! # Record a payment
//! curl -X POST http://localhost:3000/entries \
//!   -H "Content-Type: application/json" \
//!   -d '{"type": "credit", "customer_id": 1, "entry_id": 2, "amount": "2500.00"}'
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use mill_ledger_rs::{
    AccountStatus, CreditError, CreditStatus, CustomerId, CustomerRegistry, EntryId, LedgerEntry,
    NewCustomer,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

// === Request/Response DTOs ===

/// Request body for recording ledger entries.
///
/// Uses a tagged enum for clean JSON representation:
/// ```json
/// {"type": "debit", "customer_id": 1, "entry_id": 1, "amount": "100.00"}
/// ```
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryRequest {
    Debit {
        customer_id: u32,
        entry_id: u64,
        amount: Decimal,
    },
    Credit {
        customer_id: u32,
        entry_id: u64,
        amount: Decimal,
    },
}

impl EntryRequest {
    /// Converts the request DTO into the internal ledger entry.
    fn into_entry(self) -> LedgerEntry {
        match self {
            Self::Debit {
                customer_id,
                entry_id,
                amount,
            } => LedgerEntry::Debit {
                customer_id: CustomerId(customer_id),
                entry_id: EntryId(entry_id),
                amount,
            },
            Self::Credit {
                customer_id,
                entry_id,
                amount,
            } => LedgerEntry::Credit {
                customer_id: CustomerId(customer_id),
                entry_id: EntryId(entry_id),
                amount,
            },
        }
    }
}

/// Request body for the read-only authorization check.
#[derive(Debug, Deserialize)]
pub struct AuthorizeRequest {
    pub amount: Decimal,
}

/// Response body for a passed authorization check.
#[derive(Debug, Serialize)]
pub struct AuthorizeResponse {
    pub available: Decimal,
}

/// Request body for updating the credit sub-record.
#[derive(Debug, Deserialize)]
pub struct CreditUpdateRequest {
    pub credit_limit: Option<Decimal>,
    pub credit_status: Option<CreditStatus>,
    pub status: Option<AccountStatus>,
}

/// Response body for registration.
#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub id: u32,
    pub number: String,
}

/// Response body for customer credit state.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: u32,
    pub number: String,
    pub name: String,
    pub credit_limit: Decimal,
    pub balance: Decimal,
    pub available: Decimal,
    pub credit_status: CreditStatus,
    pub status: AccountStatus,
}

impl CustomerResponse {
    fn from_customer(customer: &mill_ledger_rs::Customer) -> Self {
        Self {
            id: customer.id().0,
            number: customer.number().to_string(),
            name: customer.name(),
            credit_limit: customer.credit_limit(),
            balance: customer.current_balance(),
            available: customer.available_credit(),
            credit_status: customer.credit_status(),
            status: customer.status(),
        }
    }
}

/// Response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the customer registry.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CustomerRegistry>,
}

// === Error Handling ===

/// Wrapper for converting `CreditError` into HTTP responses.
pub struct AppError(CreditError);

impl From<CreditError> for AppError {
    fn from(err: CreditError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            CreditError::CustomerNotFound => (StatusCode::NOT_FOUND, "CUSTOMER_NOT_FOUND"),
            CreditError::AccountInactive { .. } => (StatusCode::FORBIDDEN, "ACCOUNT_INACTIVE"),
            CreditError::CreditInactive { .. } => (StatusCode::FORBIDDEN, "CREDIT_INACTIVE"),
            CreditError::InsufficientCredit { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_CREDIT")
            }
            CreditError::InvalidAmount => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            CreditError::InvalidProfile(_) => (StatusCode::BAD_REQUEST, "INVALID_PROFILE"),
            CreditError::DuplicateIdentity { .. } => (StatusCode::CONFLICT, "DUPLICATE_IDENTITY"),
            CreditError::DuplicateEntry => (StatusCode::CONFLICT, "DUPLICATE_ENTRY"),
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// POST /customers - Register a new customer.
async fn register_customer(
    State(state): State<AppState>,
    Json(profile): Json<NewCustomer>,
) -> Result<(StatusCode, Json<RegisteredResponse>), AppError> {
    let id = state.registry.register(profile)?;
    let number = state
        .registry
        .get(&id)
        .map(|c| c.number().to_string())
        .unwrap_or_default();
    Ok((StatusCode::CREATED, Json(RegisteredResponse { id: id.0, number })))
}

/// GET /customers/:id - Get a customer's credit state by ID.
async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer_id = CustomerId(id);

    state
        .registry
        .get(&customer_id)
        .map(|customer| Json(CustomerResponse::from_customer(customer.value())))
        .ok_or(AppError(CreditError::CustomerNotFound))
}

/// GET /customers - List all customers.
async fn list_customers(State(state): State<AppState>) -> Json<Vec<CustomerResponse>> {
    let customers: Vec<CustomerResponse> = state
        .registry
        .customers()
        .map(|ref_multi| CustomerResponse::from_customer(ref_multi.value()))
        .collect();

    Json(customers)
}

/// POST /customers/:id/authorize - Read-only credit check for a proposed sale.
async fn authorize(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(request): Json<AuthorizeRequest>,
) -> Result<Json<AuthorizeResponse>, AppError> {
    let available = state.registry.authorize(&CustomerId(id), request.amount)?;
    Ok(Json(AuthorizeResponse { available }))
}

/// PUT /customers/:id/credit - Update the credit sub-record.
async fn update_credit(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(request): Json<CreditUpdateRequest>,
) -> Result<StatusCode, AppError> {
    let customer_id = CustomerId(id);
    let customer = state
        .registry
        .get(&customer_id)
        .ok_or(AppError(CreditError::CustomerNotFound))?;

    if let Some(limit) = request.credit_limit {
        customer.set_credit_limit(limit)?;
    }
    if let Some(credit_status) = request.credit_status {
        customer.set_credit_status(credit_status);
    }
    if let Some(status) = request.status {
        customer.set_status(status);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /entries - Record a ledger entry.
async fn create_entry(
    State(state): State<AppState>,
    Json(request): Json<EntryRequest>,
) -> Result<StatusCode, AppError> {
    let entry = request.into_entry();
    state.registry.process(entry)?;
    Ok(StatusCode::CREATED)
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/customers", post(register_customer).get(list_customers))
        .route("/customers/{id}", get(get_customer))
        .route("/customers/{id}/authorize", post(authorize))
        .route("/customers/{id}/credit", put(update_credit))
        .route("/entries", post(create_entry))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("MILL_LEDGER_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState {
        registry: Arc::new(CustomerRegistry::new()),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Credit ledger API server running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  POST /customers               - Register a customer");
    println!("  GET  /customers               - List all customers");
    println!("  GET  /customers/:id           - Get customer credit state");
    println!("  POST /customers/:id/authorize - Check a proposed sale");
    println!("  PUT  /customers/:id/credit    - Update credit limit/status");
    println!("  POST /entries                 - Record a ledger entry");

    axum::serve(listener, app).await.unwrap();
}
