//! Application router configuration.

use axum::{
    Router,
    routing::{get, put},
};

use crate::{
    AppState, Error,
    billing_period::{
        create_billing_period_endpoint, get_billing_period_endpoint, get_billing_periods_endpoint,
        get_current_billing_period_endpoint, update_billing_period_endpoint,
    },
    category::{create_category_endpoint, get_categories_endpoint},
    endpoints,
    expense::{
        create_expense_endpoint, get_expense_endpoint, get_expenses_endpoint,
        get_grouped_expenses_endpoint, update_expense_endpoint,
    },
    fixed_expense::{
        create_fixed_expense_endpoint, delete_fixed_expense_endpoint, get_fixed_expense_endpoint,
        get_fixed_expenses_endpoint, update_fixed_expense_endpoint,
    },
    report::{get_consolidated_report_endpoint, get_weekly_summary_endpoint},
    salary::{
        delete_salary_endpoint, get_salaries_endpoint, get_salary_endpoint,
        update_salary_endpoint, upsert_salary_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::BILLING_PERIODS,
            get(get_billing_periods_endpoint).post(create_billing_period_endpoint),
        )
        .route(
            endpoints::CURRENT_BILLING_PERIOD,
            get(get_current_billing_period_endpoint),
        )
        .route(
            endpoints::BILLING_PERIOD,
            get(get_billing_period_endpoint).put(update_billing_period_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::EXPENSES,
            get(get_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::GROUPED_EXPENSES,
            get(get_grouped_expenses_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint).put(update_expense_endpoint),
        )
        .route(
            endpoints::FIXED_EXPENSES,
            get(get_fixed_expenses_endpoint).post(create_fixed_expense_endpoint),
        )
        .route(
            endpoints::FIXED_EXPENSE,
            get(get_fixed_expense_endpoint)
                .put(update_fixed_expense_endpoint)
                .delete(delete_fixed_expense_endpoint),
        )
        .route(
            endpoints::CONSOLIDATED_REPORT,
            get(get_consolidated_report_endpoint),
        )
        .route(
            endpoints::WEEKLY_SUMMARY_REPORT,
            get(get_weekly_summary_endpoint),
        )
        .route(
            endpoints::SALARIES,
            get(get_salaries_endpoint).post(upsert_salary_endpoint),
        )
        .route(
            endpoints::SALARY,
            put(update_salary_endpoint)
                .get(get_salary_endpoint)
                .delete(delete_salary_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound("Route")
}
