//! Route handlers for billing periods.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    billing_period::{
        BillingPeriod, BillingPeriodForm, BillingPeriodId, create_billing_period,
        get_all_billing_periods, get_billing_period, get_billing_period_for_date,
        update_billing_period,
    },
    extract::{Json, Path},
    timezone::get_local_date,
};

/// The state needed for managing billing periods.
#[derive(Debug, Clone)]
pub struct BillingPeriodState {
    /// The local timezone as a canonical timezone name, used to find the current period.
    pub local_timezone: String,
    /// The database connection for managing billing periods.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BillingPeriodState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List all billing periods, the most recent first.
pub async fn get_billing_periods_endpoint(
    State(state): State<BillingPeriodState>,
) -> Result<Json<Vec<BillingPeriod>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_billing_periods(&connection).map(Json)
}

/// Create a billing period, responds with the new period and 201 Created.
pub async fn create_billing_period_endpoint(
    State(state): State<BillingPeriodState>,
    Json(form): Json<BillingPeriodForm>,
) -> Result<(StatusCode, Json<BillingPeriod>), Error> {
    let new_period = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let period = create_billing_period(&new_period, &connection)?;

    Ok((StatusCode::CREATED, Json(period)))
}

/// Get a single billing period.
pub async fn get_billing_period_endpoint(
    State(state): State<BillingPeriodState>,
    Path(period_id): Path<BillingPeriodId>,
) -> Result<Json<BillingPeriod>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_billing_period(period_id, &connection).map(Json)
}

/// Replace all of the fields of a billing period.
pub async fn update_billing_period_endpoint(
    State(state): State<BillingPeriodState>,
    Path(period_id): Path<BillingPeriodId>,
    Json(form): Json<BillingPeriodForm>,
) -> Result<Json<BillingPeriod>, Error> {
    let new_period = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_billing_period(period_id, &new_period, &connection).map(Json)
}

/// Get the billing period that contains today's date in the server's timezone.
pub async fn get_current_billing_period_endpoint(
    State(state): State<BillingPeriodState>,
) -> Result<Json<BillingPeriod>, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    get_billing_period_for_date(today, &connection)?
        .map(Json)
        .ok_or(Error::NotFound("Current billing period"))
}
