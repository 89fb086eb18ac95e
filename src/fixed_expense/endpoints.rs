//! Route handlers for fixed expenses.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    billing_period::BillingPeriodId,
    extract::{Json, Path, Query},
    fixed_expense::{
        FixedExpense, FixedExpenseFilter, FixedExpenseForm, FixedExpenseId,
        create_fixed_expense, delete_fixed_expense, get_fixed_expense, get_fixed_expenses,
        update_fixed_expense,
    },
};

/// The state needed for managing fixed expenses.
#[derive(Debug, Clone)]
pub struct FixedExpenseState {
    /// The database connection for managing fixed expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for FixedExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for listing fixed expenses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpenseQuery {
    pub billing_period_id: Option<BillingPeriodId>,
}

/// List the fixed expenses of a billing period by installment number.
pub async fn get_fixed_expenses_endpoint(
    State(state): State<FixedExpenseState>,
    Query(query): Query<FixedExpenseQuery>,
) -> Result<Json<Vec<FixedExpense>>, Error> {
    let period_id = query
        .billing_period_id
        .ok_or(Error::MissingFields("billingPeriodId is required"))?;
    let connection = lock_connection(&state.db_connection)?;

    get_fixed_expenses(FixedExpenseFilter::BillingPeriod(period_id), &connection).map(Json)
}

/// Create a fixed expense, responds with the new fixed expense and 201 Created.
pub async fn create_fixed_expense_endpoint(
    State(state): State<FixedExpenseState>,
    Json(form): Json<FixedExpenseForm>,
) -> Result<(StatusCode, Json<FixedExpense>), Error> {
    let new_fixed_expense = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let fixed_expense = create_fixed_expense(&new_fixed_expense, &connection)?;

    Ok((StatusCode::CREATED, Json(fixed_expense)))
}

/// Get a single fixed expense.
pub async fn get_fixed_expense_endpoint(
    State(state): State<FixedExpenseState>,
    Path(fixed_expense_id): Path<FixedExpenseId>,
) -> Result<Json<FixedExpense>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_fixed_expense(fixed_expense_id, &connection).map(Json)
}

/// Replace all of the fields of a fixed expense.
pub async fn update_fixed_expense_endpoint(
    State(state): State<FixedExpenseState>,
    Path(fixed_expense_id): Path<FixedExpenseId>,
    Json(form): Json<FixedExpenseForm>,
) -> Result<Json<FixedExpense>, Error> {
    let new_fixed_expense = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_fixed_expense(fixed_expense_id, &new_fixed_expense, &connection).map(Json)
}

/// Delete a fixed expense, responds with 204 No Content.
pub async fn delete_fixed_expense_endpoint(
    State(state): State<FixedExpenseState>,
    Path(fixed_expense_id): Path<FixedExpenseId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_fixed_expense(fixed_expense_id, &connection)?;
    tracing::debug!("deleted fixed expense {fixed_expense_id}");

    Ok(StatusCode::NO_CONTENT)
}
