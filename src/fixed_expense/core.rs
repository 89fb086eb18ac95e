//! Defines the core data models and database queries for fixed expenses.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};

use crate::{Error, billing_period::BillingPeriodId, database_id::DatabaseId, money::Amount};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a fixed expense.
pub type FixedExpenseId = DatabaseId;

/// One installment of a recurring bill, attributed to a billing period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpense {
    pub id: FixedExpenseId,
    pub description: String,
    pub amount: Amount,
    pub installment_number: u32,
    pub total_installments: Option<u32>,
    pub billing_period_id: BillingPeriodId,
}

/// A validated fixed expense that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFixedExpense {
    pub description: String,
    pub amount: Amount,
    pub installment_number: u32,
    pub total_installments: Option<u32>,
    pub billing_period_id: BillingPeriodId,
}

/// Request body for creating or replacing a fixed expense.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpenseForm {
    pub description: Option<String>,
    pub amount: Option<Amount>,
    pub installment_number: Option<u32>,
    pub total_installments: Option<u32>,
    pub billing_period_id: Option<BillingPeriodId>,
}

impl FixedExpenseForm {
    /// Check that the description, amount, installment number and billing
    /// period are present.
    ///
    /// Zero amounts and installment numbers count as missing, and a total of
    /// zero installments is treated as unknown.
    ///
    /// # Errors
    /// Returns [Error::MissingFields] if a required field is missing.
    pub fn validate(self) -> Result<NewFixedExpense, Error> {
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();

        match (self.amount, self.installment_number, self.billing_period_id) {
            (Some(amount), Some(installment_number), Some(billing_period_id))
                if !description.is_empty() && !amount.is_zero() && installment_number != 0 =>
            {
                Ok(NewFixedExpense {
                    description: description.to_owned(),
                    amount,
                    installment_number,
                    total_installments: self.total_installments.filter(|total| *total != 0),
                    billing_period_id,
                })
            }
            _ => Err(Error::MissingFields("Missing required fields")),
        }
    }
}

/// Which fixed expenses to load with [get_fixed_expenses].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixedExpenseFilter {
    /// Every fixed expense.
    All,
    /// The fixed expenses of a billing period.
    BillingPeriod(BillingPeriodId),
    /// The fixed expenses of billing periods that start in the given year.
    PeriodStartYear(i32),
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str = "fixed_expense.id, fixed_expense.description, fixed_expense.amount, \
    fixed_expense.installment_number, fixed_expense.total_installments, \
    fixed_expense.billing_period_id";

const RETURNING_COLUMNS: &str =
    "id, description, amount, installment_number, total_installments, billing_period_id";

/// Create a fixed expense in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidBillingPeriod] if the billing period does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_fixed_expense(
    new_fixed_expense: &NewFixedExpense,
    connection: &Connection,
) -> Result<FixedExpense, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO fixed_expense \
                (description, amount, installment_number, total_installments, billing_period_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {RETURNING_COLUMNS}"
        ))?
        .query_row(
            params![
                new_fixed_expense.description,
                new_fixed_expense.amount,
                new_fixed_expense.installment_number,
                new_fixed_expense.total_installments,
                new_fixed_expense.billing_period_id,
            ],
            map_row,
        )
        .map_err(|error| map_write_error(error, new_fixed_expense.billing_period_id))
}

/// Replace every field of the fixed expense `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a fixed expense,
/// - [Error::InvalidBillingPeriod] if the billing period does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_fixed_expense(
    id: FixedExpenseId,
    new_fixed_expense: &NewFixedExpense,
    connection: &Connection,
) -> Result<FixedExpense, Error> {
    connection
        .prepare(&format!(
            "UPDATE fixed_expense
             SET description = ?1, amount = ?2, installment_number = ?3, \
                total_installments = ?4, billing_period_id = ?5
             WHERE id = ?6
             RETURNING {RETURNING_COLUMNS}"
        ))?
        .query_row(
            params![
                new_fixed_expense.description,
                new_fixed_expense.amount,
                new_fixed_expense.installment_number,
                new_fixed_expense.total_installments,
                new_fixed_expense.billing_period_id,
                id,
            ],
            map_row,
        )
        .map_err(|error| map_write_error(error, new_fixed_expense.billing_period_id))
}

/// Retrieve a fixed expense by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a fixed expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_fixed_expense(
    id: FixedExpenseId,
    connection: &Connection,
) -> Result<FixedExpense, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM fixed_expense WHERE fixed_expense.id = :id"
        ))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(not_found_as_fixed_expense)
}

/// Retrieve the fixed expenses selected by `filter`, ordered by installment number.
pub fn get_fixed_expenses(
    filter: FixedExpenseFilter,
    connection: &Connection,
) -> Result<Vec<FixedExpense>, Error> {
    let order = "ORDER BY fixed_expense.installment_number ASC, fixed_expense.id ASC";

    let mut statement = match filter {
        FixedExpenseFilter::All => {
            connection.prepare(&format!("SELECT {SELECT_COLUMNS} FROM fixed_expense {order}"))?
        }
        FixedExpenseFilter::BillingPeriod(_) => connection.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM fixed_expense
             WHERE fixed_expense.billing_period_id = ?1 {order}"
        ))?,
        FixedExpenseFilter::PeriodStartYear(_) => connection.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM fixed_expense
             INNER JOIN billing_period ON billing_period.id = fixed_expense.billing_period_id
             WHERE CAST(strftime('%Y', billing_period.start_date) AS INTEGER) = ?1 {order}"
        ))?,
    };

    let rows = match filter {
        FixedExpenseFilter::All => statement.query_map([], map_row)?,
        FixedExpenseFilter::BillingPeriod(period_id) => statement.query_map([period_id], map_row)?,
        FixedExpenseFilter::PeriodStartYear(year) => statement.query_map([year], map_row)?,
    };

    rows.map(|maybe_fixed_expense| maybe_fixed_expense.map_err(Error::from))
        .collect()
}

/// Delete the fixed expense `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a fixed expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_fixed_expense(id: FixedExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM fixed_expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Fixed expense"));
    }

    Ok(())
}

/// Create the fixed expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_fixed_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS fixed_expense (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount INTEGER NOT NULL,
            installment_number INTEGER NOT NULL,
            total_installments INTEGER,
            billing_period_id INTEGER NOT NULL,
            FOREIGN KEY(billing_period_id) REFERENCES billing_period(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_fixed_expense_billing_period
            ON fixed_expense(billing_period_id, installment_number);",
    )
}

fn map_row(row: &Row) -> Result<FixedExpense, rusqlite::Error> {
    Ok(FixedExpense {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        installment_number: row.get(3)?,
        total_installments: row.get(4)?,
        billing_period_id: row.get(5)?,
    })
}

fn not_found_as_fixed_expense(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Fixed expense"),
        error => error.into(),
    }
}

fn map_write_error(error: rusqlite::Error, billing_period_id: BillingPeriodId) -> Error {
    match error {
        // The billing period is the only foreign key on the table.
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidBillingPeriod(billing_period_id),
        error => not_found_as_fixed_expense(error),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod form_tests {
    use crate::{Error, fixed_expense::FixedExpenseForm, money::Amount};

    fn valid_form() -> FixedExpenseForm {
        FixedExpenseForm {
            description: Some("Geladeira".to_owned()),
            amount: Some(Amount::from_cents(29990)),
            installment_number: Some(3),
            total_installments: Some(10),
            billing_period_id: Some(1),
        }
    }

    #[test]
    fn valid_form_is_accepted() {
        let new_fixed_expense = valid_form().validate().expect("form should be valid");

        assert_eq!(new_fixed_expense.description, "Geladeira");
        assert_eq!(new_fixed_expense.total_installments, Some(10));
    }

    #[test]
    fn zero_installment_number_is_missing() {
        let form = FixedExpenseForm {
            installment_number: Some(0),
            ..valid_form()
        };

        assert_eq!(
            form.validate(),
            Err(Error::MissingFields("Missing required fields"))
        );
    }

    #[test]
    fn blank_description_is_missing() {
        let form = FixedExpenseForm {
            description: Some(" ".to_owned()),
            ..valid_form()
        };

        assert!(form.validate().is_err());
    }

    #[test]
    fn zero_total_installments_is_unknown() {
        let form = FixedExpenseForm {
            total_installments: Some(0),
            ..valid_form()
        };

        assert_eq!(form.validate().unwrap().total_installments, None);
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error,
        billing_period::{
            BillingPeriod, DefaultBills, NewBillingPeriod, PeriodRange, create_billing_period,
        },
        db::initialize,
        fixed_expense::{
            FixedExpenseFilter, NewFixedExpense, create_fixed_expense, delete_fixed_expense,
            get_fixed_expense, get_fixed_expenses, update_fixed_expense,
        },
        money::Amount,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_test_period(start: Date, end: Date, conn: &Connection) -> BillingPeriod {
        create_billing_period(
            &NewBillingPeriod {
                name: format!("{start}"),
                range: PeriodRange::new(start, end).unwrap(),
                default_bills: DefaultBills::default(),
            },
            conn,
        )
        .unwrap()
    }

    fn installment(number: u32, billing_period_id: i64) -> NewFixedExpense {
        NewFixedExpense {
            description: "Financiamento".to_owned(),
            amount: Amount::from_cents(150000),
            installment_number: number,
            total_installments: Some(360),
            billing_period_id,
        }
    }

    #[test]
    fn create_and_get_fixed_expense() {
        let conn = get_test_connection();
        let period = create_test_period(date!(2025 - 09 - 01), date!(2025 - 09 - 30), &conn);

        let created = create_fixed_expense(&installment(12, period.id), &conn)
            .expect("Could not create fixed expense");

        assert_eq!(get_fixed_expense(created.id, &conn), Ok(created));
    }

    #[test]
    fn unknown_billing_period_is_rejected() {
        let conn = get_test_connection();

        let result = create_fixed_expense(&installment(1, 404), &conn);

        assert_eq!(result, Err(Error::InvalidBillingPeriod(404)));
    }

    #[test]
    fn lists_period_installments_in_order() {
        let conn = get_test_connection();
        let period = create_test_period(date!(2025 - 09 - 01), date!(2025 - 09 - 30), &conn);
        let other = create_test_period(date!(2025 - 10 - 01), date!(2025 - 10 - 31), &conn);
        for number in [3, 1, 2] {
            create_fixed_expense(&installment(number, period.id), &conn).unwrap();
        }
        create_fixed_expense(&installment(4, other.id), &conn).unwrap();

        let numbers: Vec<u32> =
            get_fixed_expenses(FixedExpenseFilter::BillingPeriod(period.id), &conn)
                .unwrap()
                .into_iter()
                .map(|fixed_expense| fixed_expense.installment_number)
                .collect();

        assert_eq!(numbers, [1, 2, 3]);
    }

    #[test]
    fn filters_by_period_start_year() {
        let conn = get_test_connection();
        let december = create_test_period(date!(2024 - 12 - 15), date!(2025 - 01 - 14), &conn);
        let january = create_test_period(date!(2025 - 01 - 15), date!(2025 - 02 - 14), &conn);
        create_fixed_expense(&installment(1, december.id), &conn).unwrap();
        create_fixed_expense(&installment(2, january.id), &conn).unwrap();

        let in_2025 = get_fixed_expenses(FixedExpenseFilter::PeriodStartYear(2025), &conn).unwrap();
        let everything = get_fixed_expenses(FixedExpenseFilter::All, &conn).unwrap();

        assert_eq!(in_2025.len(), 1);
        assert_eq!(in_2025[0].billing_period_id, january.id);
        assert_eq!(everything.len(), 2);
    }

    #[test]
    fn update_replaces_fields() {
        let conn = get_test_connection();
        let period = create_test_period(date!(2025 - 09 - 01), date!(2025 - 09 - 30), &conn);
        let created = create_fixed_expense(&installment(1, period.id), &conn).unwrap();
        let mut replacement = installment(2, period.id);
        replacement.total_installments = None;

        let updated = update_fixed_expense(created.id, &replacement, &conn).unwrap();

        assert_eq!(updated.installment_number, 2);
        assert_eq!(updated.total_installments, None);
    }

    #[test]
    fn update_missing_fixed_expense_returns_not_found() {
        let conn = get_test_connection();
        let period = create_test_period(date!(2025 - 09 - 01), date!(2025 - 09 - 30), &conn);

        let result = update_fixed_expense(5, &installment(1, period.id), &conn);

        assert_eq!(result, Err(Error::NotFound("Fixed expense")));
    }

    #[test]
    fn delete_removes_fixed_expense() {
        let conn = get_test_connection();
        let period = create_test_period(date!(2025 - 09 - 01), date!(2025 - 09 - 30), &conn);
        let created = create_fixed_expense(&installment(1, period.id), &conn).unwrap();

        assert_eq!(delete_fixed_expense(created.id, &conn), Ok(()));
        assert_eq!(
            get_fixed_expense(created.id, &conn),
            Err(Error::NotFound("Fixed expense"))
        );
        assert_eq!(
            delete_fixed_expense(created.id, &conn),
            Err(Error::NotFound("Fixed expense"))
        );
    }
}
