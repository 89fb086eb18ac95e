//! Route handlers for expenses.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    billing_period::{BillingPeriodId, get_all_billing_periods},
    expense::{
        Expense, ExpenseDetails, ExpenseFilter, ExpenseForm, ExpenseId, ExpenseWithCategory,
        create_expense, get_all_expenses, get_expense, get_expenses_with_category,
        update_expense,
    },
    extract::{Json, Path},
    report::group_by_week,
};

/// The state needed for managing expenses.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The expenses of one calendar week of a billing period.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseWeek {
    pub week_label: String,
    pub week_start: Date,
    pub expenses: Vec<ExpenseWithCategory>,
}

/// A billing period with its expenses grouped by week.
#[derive(Debug, Serialize)]
pub struct GroupedExpenses {
    pub id: BillingPeriodId,
    pub name: String,
    pub weeks: Vec<ExpenseWeek>,
}

/// List every expense with its category and billing period, the most recent first.
pub async fn get_expenses_endpoint(
    State(state): State<ExpenseState>,
) -> Result<Json<Vec<ExpenseDetails>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_expenses(&connection).map(Json)
}

/// Create an expense, responds with the new expense and 201 Created.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Json(form): Json<ExpenseForm>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let new_expense = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let expense = create_expense(&new_expense, &connection)?;
    tracing::debug!("created expense {} for {}", expense.id, expense.date);

    Ok((StatusCode::CREATED, Json(expense)))
}

/// Get a single expense with its category and billing period.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<ExpenseDetails>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_expense(expense_id, &connection).map(Json)
}

/// Replace all of the fields of an expense.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Json(form): Json<ExpenseForm>,
) -> Result<Json<Expense>, Error> {
    let new_expense = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_expense(expense_id, &new_expense, &connection).map(Json)
}

/// List every billing period, the most recent first, with its expenses
/// grouped into Sunday to Saturday weeks.
pub async fn get_grouped_expenses_endpoint(
    State(state): State<ExpenseState>,
) -> Result<Json<Vec<GroupedExpenses>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_billing_periods(&connection)?
        .into_iter()
        .map(|period| {
            let expenses = get_expenses_with_category(
                ExpenseFilter::BillingPeriod(period.id),
                &connection,
            )?;

            let weeks = group_by_week(period.range(), expenses)
                .into_iter()
                .map(|week| ExpenseWeek {
                    week_label: week.label,
                    week_start: week.week_start,
                    expenses: week.records,
                })
                .collect();

            Ok(GroupedExpenses {
                id: period.id,
                name: period.name,
                weeks,
            })
        })
        .collect::<Result<Vec<_>, Error>>()
        .map(Json)
}
