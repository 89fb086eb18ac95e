//! The API endpoints URIs.

/// The route for listing and creating billing periods.
pub const BILLING_PERIODS: &str = "/billing-periods";
/// The route for the billing period that contains today's date.
pub const CURRENT_BILLING_PERIOD: &str = "/billing-periods/current";
/// The route to access a single billing period.
pub const BILLING_PERIOD: &str = "/billing-periods/{period_id}";
/// The route for listing and creating categories.
pub const CATEGORIES: &str = "/categories";
/// The route for listing and creating expenses.
pub const EXPENSES: &str = "/expenses";
/// The route for expenses grouped by billing period and week.
pub const GROUPED_EXPENSES: &str = "/expenses/grouped";
/// The route to access a single expense.
pub const EXPENSE: &str = "/expenses/{expense_id}";
/// The route for listing and creating the fixed expenses of a billing period.
pub const FIXED_EXPENSES: &str = "/fixed-expenses";
/// The route to access a single fixed expense.
pub const FIXED_EXPENSE: &str = "/fixed-expenses/{fixed_expense_id}";
/// The route for the income/expense totals report.
pub const CONSOLIDATED_REPORT: &str = "/reports/consolidated";
/// The route for the week by week report of a billing period.
pub const WEEKLY_SUMMARY_REPORT: &str = "/reports/weekly-summary";
/// The route for querying and upserting salaries.
pub const SALARIES: &str = "/salaries";
/// The route to access a single salary.
pub const SALARY: &str = "/salaries/{salary_id}";
