//! Route handlers for salaries.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    app_state::lock_connection,
    extract::{Json, Path, Query},
    salary::{
        Salary, SalaryForm, SalaryId, delete_salary, get_salaries_for_year, get_salary,
        get_salary_for_month, update_salary, upsert_salary, validate_month,
    },
};

/// The state needed for managing salaries.
#[derive(Debug, Clone)]
pub struct SalaryState {
    /// The database connection for managing salaries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SalaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for looking up salaries.
#[derive(Debug, Deserialize)]
pub struct SalaryQuery {
    pub year: Option<i32>,
    pub month: Option<u8>,
}

/// The salaries matching a [SalaryQuery].
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SalaryQueryResult {
    /// The salary of a single month, `null` if there is none.
    Month(Option<Salary>),
    /// The salaries of a year ordered by month.
    Year(Vec<Salary>),
}

/// Get the salary of a month, or the salaries of a year if no month is given.
pub async fn get_salaries_endpoint(
    State(state): State<SalaryState>,
    Query(query): Query<SalaryQuery>,
) -> Result<Json<SalaryQueryResult>, Error> {
    let year = query.year.ok_or(Error::MissingFields("Year is required"))?;
    let connection = lock_connection(&state.db_connection)?;

    let result = match query.month {
        Some(month) => {
            let month = validate_month(month)?;
            SalaryQueryResult::Month(get_salary_for_month(year, month, &connection)?)
        }
        None => SalaryQueryResult::Year(get_salaries_for_year(year, &connection)?),
    };

    Ok(Json(result))
}

/// Create or replace the salary for a month, responds with 201 Created.
pub async fn upsert_salary_endpoint(
    State(state): State<SalaryState>,
    Json(form): Json<SalaryForm>,
) -> Result<(StatusCode, Json<Salary>), Error> {
    let new_salary = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let salary = upsert_salary(&new_salary, &connection)?;
    tracing::debug!("saved salary for {:02}/{}", salary.month, salary.year);

    Ok((StatusCode::CREATED, Json(salary)))
}

/// Get a single salary.
pub async fn get_salary_endpoint(
    State(state): State<SalaryState>,
    Path(salary_id): Path<SalaryId>,
) -> Result<Json<Salary>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_salary(salary_id, &connection).map(Json)
}

/// Replace all of the fields of a salary.
pub async fn update_salary_endpoint(
    State(state): State<SalaryState>,
    Path(salary_id): Path<SalaryId>,
    Json(form): Json<SalaryForm>,
) -> Result<Json<Salary>, Error> {
    let new_salary = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_salary(salary_id, &new_salary, &connection).map(Json)
}

/// Delete a salary.
pub async fn delete_salary_endpoint(
    State(state): State<SalaryState>,
    Path(salary_id): Path<SalaryId>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_salary(salary_id, &connection)?;

    Ok(Json(json!({ "message": "Salário deletado com sucesso" })))
}
