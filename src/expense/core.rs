//! Defines the core data models and database queries for expenses.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    billing_period::{
        BillingPeriod, BillingPeriodId, PeriodRange, billing_period_exists,
        map_billing_period_row_at,
    },
    category::{Category, CategoryId, CategoryName, category_exists},
    database_id::DatabaseId,
    money::Amount,
    report::DatedAmount,
};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for an expense.
pub type ExpenseId = DatabaseId;

/// A single purchase or payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Amount,
    pub description: Option<String>,
    pub date: Date,
    pub category_id: CategoryId,
    pub billing_period_id: Option<BillingPeriodId>,
}

/// An expense with its category and billing period embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDetails {
    #[serde(flatten)]
    pub expense: Expense,
    pub category: Category,
    pub billing_period: Option<BillingPeriod>,
}

/// An expense with its category embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseWithCategory {
    #[serde(flatten)]
    pub expense: Expense,
    pub category: Category,
}

impl DatedAmount for ExpenseWithCategory {
    fn date(&self) -> Date {
        self.expense.date
    }

    fn amount(&self) -> Amount {
        self.expense.amount
    }
}

/// A validated expense that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: Amount,
    pub description: Option<String>,
    pub date: Date,
    pub category_id: CategoryId,
    pub billing_period_id: Option<BillingPeriodId>,
}

/// Request body for creating or replacing an expense.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseForm {
    pub amount: Option<Amount>,
    pub description: Option<String>,
    pub date: Option<Date>,
    pub category_id: Option<CategoryId>,
    pub billing_period_id: Option<BillingPeriodId>,
}

impl ExpenseForm {
    /// Check that the amount, category and date are present.
    ///
    /// A zero amount counts as missing. A blank description becomes `None`.
    ///
    /// # Errors
    /// Returns [Error::MissingFields] if a required field is missing.
    pub fn validate(self) -> Result<NewExpense, Error> {
        let (Some(amount), Some(date), Some(category_id)) =
            (self.amount, self.date, self.category_id)
        else {
            return Err(missing_fields());
        };

        if amount.is_zero() {
            return Err(missing_fields());
        }

        let description = self
            .description
            .map(|description| description.trim().to_owned())
            .filter(|description| !description.is_empty());

        Ok(NewExpense {
            amount,
            description,
            date,
            category_id,
            billing_period_id: self.billing_period_id,
        })
    }
}

fn missing_fields() -> Error {
    Error::MissingFields("Amount, categoryId, and date are required fields.")
}

/// Which expenses to load with [get_expenses_with_category].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpenseFilter {
    /// Every expense.
    All,
    /// The expenses attributed to a billing period.
    BillingPeriod(BillingPeriodId),
    /// The expenses dated within a range, regardless of billing period.
    DateRange(PeriodRange),
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const EXPENSE_COLUMNS: &str =
    "expense.id, expense.amount, expense.description, expense.date, expense.category_id, \
     expense.billing_period_id";

const RETURNING_COLUMNS: &str = "id, amount, description, date, category_id, billing_period_id";

const DETAILS_QUERY: &str = "SELECT expense.id, expense.amount, expense.description, \
        expense.date, expense.category_id, expense.billing_period_id, category.name, \
        billing_period.id, billing_period.name, billing_period.start_date, \
        billing_period.end_date, billing_period.default_electricity_bill, \
        billing_period.default_gas_bill, billing_period.default_condo_fee, \
        billing_period.default_apartment_financing, billing_period.default_internet_bill, \
        billing_period.default_pix_amount
    FROM expense
    INNER JOIN category ON category.id = expense.category_id
    LEFT JOIN billing_period ON billing_period.id = expense.billing_period_id";

/// Create an expense in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category does not exist,
/// - [Error::InvalidBillingPeriod] if the billing period is given but does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(new_expense: &NewExpense, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO expense (amount, description, date, category_id, billing_period_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {RETURNING_COLUMNS}"
        ))?
        .query_row(
            params![
                new_expense.amount,
                new_expense.description,
                new_expense.date,
                new_expense.category_id,
                new_expense.billing_period_id,
            ],
            map_expense_row,
        )
        .map_err(|error| map_write_error(error, new_expense, connection))
}

/// Replace every field of the expense `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense,
/// - [Error::InvalidCategory] or [Error::InvalidBillingPeriod] for unknown references,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    new_expense: &NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "UPDATE expense
             SET amount = ?1, description = ?2, date = ?3, category_id = ?4, billing_period_id = ?5
             WHERE id = ?6
             RETURNING {RETURNING_COLUMNS}"
        ))?
        .query_row(
            params![
                new_expense.amount,
                new_expense.description,
                new_expense.date,
                new_expense.category_id,
                new_expense.billing_period_id,
                id,
            ],
            map_expense_row,
        )
        .map_err(|error| map_write_error(error, new_expense, connection))
}

/// Retrieve an expense with its category and billing period.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<ExpenseDetails, Error> {
    connection
        .prepare(&format!("{DETAILS_QUERY} WHERE expense.id = :id"))?
        .query_row(&[(":id", &id)], map_details_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Expense"),
            error => error.into(),
        })
}

/// Retrieve every expense with its category and billing period, the most
/// recent first.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<ExpenseDetails>, Error> {
    connection
        .prepare(&format!(
            "{DETAILS_QUERY} ORDER BY expense.date DESC, expense.id DESC"
        ))?
        .query_map([], map_details_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Retrieve the expenses selected by `filter` with their categories, the
/// oldest first.
pub fn get_expenses_with_category(
    filter: ExpenseFilter,
    connection: &Connection,
) -> Result<Vec<ExpenseWithCategory>, Error> {
    let select = format!(
        "SELECT {EXPENSE_COLUMNS}, category.name
         FROM expense
         INNER JOIN category ON category.id = expense.category_id"
    );
    let order = "ORDER BY expense.date ASC, expense.id ASC";

    match filter {
        ExpenseFilter::All => connection
            .prepare(&format!("{select} {order}"))?
            .query_map([], map_with_category_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect(),
        ExpenseFilter::BillingPeriod(period_id) => connection
            .prepare(&format!(
                "{select} WHERE expense.billing_period_id = ?1 {order}"
            ))?
            .query_map([period_id], map_with_category_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect(),
        ExpenseFilter::DateRange(range) => connection
            .prepare(&format!(
                "{select} WHERE expense.date BETWEEN ?1 AND ?2 {order}"
            ))?
            .query_map([range.start(), range.end()], map_with_category_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect(),
    }
}

/// Attribute expenses to the billing period `period_id`.
///
/// If `only_unassigned` is set, expenses that already have a billing period
/// are left alone. Returns the number of expenses that were updated.
pub fn assign_expenses_to_billing_period(
    period_id: BillingPeriodId,
    only_unassigned: bool,
    connection: &Connection,
) -> Result<usize, Error> {
    let sql = if only_unassigned {
        "UPDATE expense SET billing_period_id = ?1 WHERE billing_period_id IS NULL"
    } else {
        "UPDATE expense SET billing_period_id = ?1"
    };

    connection.execute(sql, [period_id]).map_err(Error::from)
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            amount INTEGER NOT NULL,
            description TEXT,
            date TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            billing_period_id INTEGER,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT,
            FOREIGN KEY(billing_period_id) REFERENCES billing_period(id) ON UPDATE CASCADE ON DELETE SET NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_billing_period_date ON expense(billing_period_id, date);",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
        (),
    )?;

    Ok(())
}

fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        description: row.get(2)?,
        date: row.get(3)?,
        category_id: row.get(4)?,
        billing_period_id: row.get(5)?,
    })
}

fn map_category_at(row: &Row, offset: usize) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(offset)?;

    Ok(Category {
        id: row.get(4)?,
        name: CategoryName::new_unchecked(&raw_name),
    })
}

fn map_with_category_row(row: &Row) -> Result<ExpenseWithCategory, rusqlite::Error> {
    Ok(ExpenseWithCategory {
        expense: map_expense_row(row)?,
        category: map_category_at(row, 6)?,
    })
}

fn map_details_row(row: &Row) -> Result<ExpenseDetails, rusqlite::Error> {
    let period_id: Option<BillingPeriodId> = row.get(7)?;
    let billing_period = match period_id {
        Some(_) => Some(map_billing_period_row_at(row, 7)?),
        None => None,
    };

    Ok(ExpenseDetails {
        expense: map_expense_row(row)?,
        category: map_category_at(row, 6)?,
        billing_period,
    })
}

/// Work out which reference a failed foreign key constraint was about.
fn map_write_error(error: rusqlite::Error, new_expense: &NewExpense, connection: &Connection) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => {
            match category_exists(new_expense.category_id, connection) {
                Ok(true) => {}
                Ok(false) => return Error::InvalidCategory(new_expense.category_id),
                Err(error) => return error,
            }

            match new_expense.billing_period_id {
                Some(period_id) => match billing_period_exists(period_id, connection) {
                    Ok(false) => Error::InvalidBillingPeriod(period_id),
                    Ok(true) => Error::InvalidCategory(new_expense.category_id),
                    Err(error) => error,
                },
                None => Error::InvalidCategory(new_expense.category_id),
            }
        }
        rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Expense"),
        error => error.into(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
