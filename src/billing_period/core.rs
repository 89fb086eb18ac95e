//! Defines the core data models and database queries for billing periods.

use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::DatabaseId, money::Amount};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a billing period.
pub type BillingPeriodId = DatabaseId;

/// An inclusive range of calendar dates where the start is never after the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    start: Date,
    end: Date,
}

impl PeriodRange {
    /// Create a date range from `start` to `end`, inclusive.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Result<Self, Error> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }

        Ok(Self { start, end })
    }

    /// The first day of the range.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The last day of the range.
    pub fn end(&self) -> Date {
        self.end
    }

    /// Whether `date` falls within the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The default amounts for the recurring household bills of a billing period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultBills {
    pub default_electricity_bill: Option<Amount>,
    pub default_gas_bill: Option<Amount>,
    pub default_condo_fee: Option<Amount>,
    pub default_apartment_financing: Option<Amount>,
    pub default_internet_bill: Option<Amount>,
    pub default_pix_amount: Option<Amount>,
}

/// A named date range that expenses and fixed expenses are attributed to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPeriod {
    pub id: BillingPeriodId,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(flatten)]
    pub default_bills: DefaultBills,
}

impl BillingPeriod {
    /// The dates covered by the billing period.
    pub fn range(&self) -> PeriodRange {
        // The table's CHECK constraint keeps stored periods ordered.
        PeriodRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

/// A validated billing period that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBillingPeriod {
    pub name: String,
    pub range: PeriodRange,
    pub default_bills: DefaultBills,
}

/// Request body for creating or replacing a billing period.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPeriodForm {
    pub name: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    #[serde(flatten)]
    pub default_bills: DefaultBills,
}

impl BillingPeriodForm {
    /// Check the required fields and the date range.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingFields] if the name, start date or end date is missing,
    /// - or [Error::InvalidDateRange] if the start date is after the end date.
    pub fn validate(self) -> Result<NewBillingPeriod, Error> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();

        let (Some(start_date), Some(end_date)) = (self.start_date, self.end_date) else {
            return Err(Error::MissingFields("Missing required fields"));
        };

        if name.is_empty() {
            return Err(Error::MissingFields("Missing required fields"));
        }

        Ok(NewBillingPeriod {
            name: name.to_owned(),
            range: PeriodRange::new(start_date, end_date)?,
            default_bills: self.default_bills,
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str = "id, name, start_date, end_date, default_electricity_bill, \
    default_gas_bill, default_condo_fee, default_apartment_financing, default_internet_bill, \
    default_pix_amount";

/// Create a billing period in the database.
///
/// # Errors
/// Returns [Error::SqlError] if there is some SQL error.
pub fn create_billing_period(
    new_period: &NewBillingPeriod,
    connection: &Connection,
) -> Result<BillingPeriod, Error> {
    let bills = &new_period.default_bills;

    connection
        .prepare(&format!(
            "INSERT INTO billing_period (name, start_date, end_date, default_electricity_bill, \
                default_gas_bill, default_condo_fee, default_apartment_financing, \
                default_internet_bill, default_pix_amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            params![
                new_period.name,
                new_period.range.start(),
                new_period.range.end(),
                bills.default_electricity_bill,
                bills.default_gas_bill,
                bills.default_condo_fee,
                bills.default_apartment_financing,
                bills.default_internet_bill,
                bills.default_pix_amount,
            ],
            map_billing_period_row,
        )
        .map_err(Error::from)
}

/// Replace every field of the billing period `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a billing period,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_billing_period(
    id: BillingPeriodId,
    new_period: &NewBillingPeriod,
    connection: &Connection,
) -> Result<BillingPeriod, Error> {
    let bills = &new_period.default_bills;

    connection
        .prepare(&format!(
            "UPDATE billing_period
             SET name = ?1, start_date = ?2, end_date = ?3, default_electricity_bill = ?4, \
                default_gas_bill = ?5, default_condo_fee = ?6, \
                default_apartment_financing = ?7, default_internet_bill = ?8, \
                default_pix_amount = ?9
             WHERE id = ?10
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            params![
                new_period.name,
                new_period.range.start(),
                new_period.range.end(),
                bills.default_electricity_bill,
                bills.default_gas_bill,
                bills.default_condo_fee,
                bills.default_apartment_financing,
                bills.default_internet_bill,
                bills.default_pix_amount,
                id,
            ],
            map_billing_period_row,
        )
        .map_err(not_found_as_billing_period)
}

/// Retrieve a billing period by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a billing period,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_billing_period(
    id: BillingPeriodId,
    connection: &Connection,
) -> Result<BillingPeriod, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM billing_period WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_billing_period_row)
        .map_err(not_found_as_billing_period)
}

/// Retrieve all billing periods, the most recent start date first.
pub fn get_all_billing_periods(connection: &Connection) -> Result<Vec<BillingPeriod>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM billing_period ORDER BY start_date DESC, id DESC"
        ))?
        .query_map([], map_billing_period_row)?
        .map(|maybe_period| maybe_period.map_err(Error::from))
        .collect()
}

/// Find the billing period that contains `date`.
///
/// If periods overlap, the one that started most recently is returned.
pub fn get_billing_period_for_date(
    date: Date,
    connection: &Connection,
) -> Result<Option<BillingPeriod>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM billing_period
             WHERE start_date <= ?1 AND end_date >= ?1
             ORDER BY start_date DESC, id DESC
             LIMIT 1"
        ))?
        .query_row([date], map_billing_period_row)
        .optional()
        .map_err(Error::from)
}

/// Find a billing period by its exact name.
///
/// Names are not unique, the first period created with the name is returned.
pub fn get_billing_period_by_name(
    name: &str,
    connection: &Connection,
) -> Result<Option<BillingPeriod>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM billing_period WHERE name = ?1 ORDER BY id LIMIT 1"
        ))?
        .query_row([name], map_billing_period_row)
        .optional()
        .map_err(Error::from)
}

/// Whether a billing period with `id` exists.
pub fn billing_period_exists(id: BillingPeriodId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS (SELECT 1 FROM billing_period WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Create the billing period table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_billing_period_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS billing_period (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            default_electricity_bill INTEGER,
            default_gas_bill INTEGER,
            default_condo_fee INTEGER,
            default_apartment_financing INTEGER,
            default_internet_bill INTEGER,
            default_pix_amount INTEGER,
            CHECK (start_date <= end_date)
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_billing_period_dates ON billing_period(start_date, end_date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [BillingPeriod].
///
/// The row must have the columns in the order of `SELECT_COLUMNS`, starting at `offset`.
pub(crate) fn map_billing_period_row_at(
    row: &Row,
    offset: usize,
) -> Result<BillingPeriod, rusqlite::Error> {
    Ok(BillingPeriod {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        start_date: row.get(offset + 2)?,
        end_date: row.get(offset + 3)?,
        default_bills: DefaultBills {
            default_electricity_bill: row.get(offset + 4)?,
            default_gas_bill: row.get(offset + 5)?,
            default_condo_fee: row.get(offset + 6)?,
            default_apartment_financing: row.get(offset + 7)?,
            default_internet_bill: row.get(offset + 8)?,
            default_pix_amount: row.get(offset + 9)?,
        },
    })
}

fn map_billing_period_row(row: &Row) -> Result<BillingPeriod, rusqlite::Error> {
    map_billing_period_row_at(row, 0)
}

fn not_found_as_billing_period(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Billing period"),
        error => error.into(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod period_range_tests {
    use time::macros::date;

    use crate::{Error, billing_period::PeriodRange};

    #[test]
    fn rejects_start_after_end() {
        let range = PeriodRange::new(date!(2025 - 10 - 01), date!(2025 - 09 - 30));

        assert_eq!(
            range,
            Err(Error::InvalidDateRange {
                start: date!(2025 - 10 - 01),
                end: date!(2025 - 09 - 30),
            })
        );
    }

    #[test]
    fn accepts_single_day() {
        let range = PeriodRange::new(date!(2025 - 10 - 01), date!(2025 - 10 - 01))
            .expect("a single day should be a valid range");

        assert!(range.contains(date!(2025 - 10 - 01)));
        assert!(!range.contains(date!(2025 - 10 - 02)));
    }
}

#[cfg(test)]
mod form_tests {
    use time::macros::date;

    use crate::{Error, billing_period::BillingPeriodForm};

    #[test]
    fn missing_name_is_rejected() {
        let form = BillingPeriodForm {
            name: Some("  ".to_owned()),
            start_date: Some(date!(2025 - 09 - 01)),
            end_date: Some(date!(2025 - 09 - 30)),
            ..Default::default()
        };

        assert_eq!(
            form.validate(),
            Err(Error::MissingFields("Missing required fields"))
        );
    }

    #[test]
    fn missing_end_date_is_rejected() {
        let form = BillingPeriodForm {
            name: Some("SETEMBRO25".to_owned()),
            start_date: Some(date!(2025 - 09 - 01)),
            ..Default::default()
        };

        assert_eq!(
            form.validate(),
            Err(Error::MissingFields("Missing required fields"))
        );
    }
}
