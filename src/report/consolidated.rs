//! The income, expenses and balance of a billing period, a year, or all time.

use std::collections::BTreeMap;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error,
    app_state::lock_connection,
    billing_period::{BillingPeriodId, PeriodRange, get_billing_period},
    expense::{ExpenseFilter, ExpenseWithCategory, get_expenses_with_category},
    extract::{Json, Query},
    fixed_expense::{FixedExpense, FixedExpenseFilter, get_fixed_expenses},
    money::Amount,
    report::ReportState,
    salary::{Salary, get_all_salaries, get_salaries_for_year, get_salary_for_month},
};

/// The query parameters for the consolidated report.
///
/// `billingPeriodId` takes precedence over `year`. With neither, the report
/// covers everything.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedQuery {
    pub billing_period_id: Option<BillingPeriodId>,
    pub year: Option<i32>,
}

/// Income and spending totals.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedReport {
    pub total_income: Amount,
    /// Variable and fixed expenses combined.
    pub total_expenses: Amount,
    pub balance: Amount,
    /// The variable expenses summed per category name.
    pub expenses_by_category: BTreeMap<String, Amount>,
}

/// Total up salaries, variable expenses and fixed expenses.
pub fn consolidate(
    salaries: &[Salary],
    expenses: &[ExpenseWithCategory],
    fixed_expenses: &[FixedExpense],
) -> ConsolidatedReport {
    let total_income: Amount = salaries.iter().map(|salary| salary.amount).sum();
    let variable: Amount = expenses.iter().map(|expense| expense.expense.amount).sum();
    let fixed: Amount = fixed_expenses
        .iter()
        .map(|fixed_expense| fixed_expense.amount)
        .sum();
    let total_expenses = variable + fixed;

    let mut expenses_by_category = BTreeMap::new();
    for expense in expenses {
        *expenses_by_category
            .entry(expense.category.name.to_string())
            .or_insert(Amount::ZERO) += expense.expense.amount;
    }

    ConsolidatedReport {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        expenses_by_category,
    }
}

/// The first to last day of `year`.
fn year_range(year: i32) -> Result<PeriodRange, Error> {
    let invalid_year = |_| Error::InvalidRequest(format!("{year} is not a valid year"));

    PeriodRange::new(
        Date::from_calendar_date(year, Month::January, 1).map_err(invalid_year)?,
        Date::from_calendar_date(year, Month::December, 31).map_err(invalid_year)?,
    )
}

/// Report the income, expenses and balance for a billing period, a year, or all time.
///
/// For a billing period, the income is the salary of the month the period
/// starts in. For a year, fixed expenses are those of the billing periods
/// that start in that year.
pub async fn get_consolidated_report_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<ConsolidatedQuery>,
) -> Result<Json<ConsolidatedReport>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let (salaries, expenses, fixed_expenses) = match (query.billing_period_id, query.year) {
        (Some(period_id), _) => {
            let period = get_billing_period(period_id, &connection)?;
            let start = period.start_date;

            (
                get_salary_for_month(start.year(), u8::from(start.month()), &connection)?
                    .into_iter()
                    .collect(),
                get_expenses_with_category(ExpenseFilter::BillingPeriod(period.id), &connection)?,
                get_fixed_expenses(FixedExpenseFilter::BillingPeriod(period.id), &connection)?,
            )
        }
        (None, Some(year)) => (
            get_salaries_for_year(year, &connection)?,
            get_expenses_with_category(ExpenseFilter::DateRange(year_range(year)?), &connection)?,
            get_fixed_expenses(FixedExpenseFilter::PeriodStartYear(year), &connection)?,
        ),
        (None, None) => (
            get_all_salaries(&connection)?,
            get_expenses_with_category(ExpenseFilter::All, &connection)?,
            get_fixed_expenses(FixedExpenseFilter::All, &connection)?,
        ),
    };

    Ok(Json(consolidate(&salaries, &expenses, &fixed_expenses)))
}
