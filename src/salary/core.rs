//! Defines the core data models and database queries for salaries.

use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId, money::Amount};

/// Database identifier for a salary.
pub type SalaryId = DatabaseId;

/// The income received in a calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Salary {
    pub id: SalaryId,
    pub amount: Amount,
    pub year: i32,
    pub month: u8,
}

/// A validated salary that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSalary {
    pub amount: Amount,
    pub year: i32,
    pub month: u8,
}

/// Request body for upserting or replacing a salary.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SalaryForm {
    pub amount: Option<Amount>,
    pub year: Option<i32>,
    pub month: Option<u8>,
}

impl SalaryForm {
    /// Check that every field is present and the month is valid.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingFields] if the amount, year or month is missing,
    /// - or [Error::InvalidMonth] if the month is not between 1 and 12.
    pub fn validate(self) -> Result<NewSalary, Error> {
        let (Some(amount), Some(year), Some(month)) = (self.amount, self.year, self.month) else {
            return Err(Error::MissingFields("Amount, year and month are required"));
        };

        Ok(NewSalary {
            amount,
            year,
            month: validate_month(month)?,
        })
    }
}

/// Check that `month` is a month number from 1 to 12.
///
/// # Errors
/// Returns [Error::InvalidMonth] otherwise.
pub fn validate_month(month: u8) -> Result<u8, Error> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(Error::InvalidMonth(month))
    }
}

const SELECT_COLUMNS: &str = "id, amount, year, month";

/// Create the salary for the salary's month, or replace the amount of the
/// salary that already exists for that month.
pub fn upsert_salary(new_salary: &NewSalary, connection: &Connection) -> Result<Salary, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO salary (amount, year, month) VALUES (?1, ?2, ?3)
             ON CONFLICT(year, month) DO UPDATE SET amount = excluded.amount
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            params![new_salary.amount, new_salary.year, new_salary.month],
            map_row,
        )
        .map_err(Error::from)
}

/// Replace every field of the salary `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a salary,
/// - [Error::DuplicateSalary] if another salary exists for the new month,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_salary(
    id: SalaryId,
    new_salary: &NewSalary,
    connection: &Connection,
) -> Result<Salary, Error> {
    connection
        .prepare(&format!(
            "UPDATE salary SET amount = ?1, year = ?2, month = ?3 WHERE id = ?4
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            params![new_salary.amount, new_salary.year, new_salary.month, id],
            map_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateSalary {
                year: new_salary.year,
                month: new_salary.month,
            },
            error => not_found_as_salary(error),
        })
}

/// Retrieve a salary by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a salary,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_salary(id: SalaryId, connection: &Connection) -> Result<Salary, Error> {
    connection
        .prepare(&format!("SELECT {SELECT_COLUMNS} FROM salary WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(not_found_as_salary)
}

/// Find the salary of a month, if there is one.
pub fn get_salary_for_month(
    year: i32,
    month: u8,
    connection: &Connection,
) -> Result<Option<Salary>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM salary WHERE year = ?1 AND month = ?2"
        ))?
        .query_row(params![year, month], map_row)
        .optional()
        .map_err(Error::from)
}

/// Retrieve the salaries of `year` ordered by month.
pub fn get_salaries_for_year(year: i32, connection: &Connection) -> Result<Vec<Salary>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM salary WHERE year = ?1 ORDER BY month ASC"
        ))?
        .query_map([year], map_row)?
        .map(|maybe_salary| maybe_salary.map_err(Error::from))
        .collect()
}

/// Retrieve every salary, oldest first.
pub fn get_all_salaries(connection: &Connection) -> Result<Vec<Salary>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM salary ORDER BY year ASC, month ASC"
        ))?
        .query_map([], map_row)?
        .map(|maybe_salary| maybe_salary.map_err(Error::from))
        .collect()
}

/// Delete the salary `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a salary.
pub fn delete_salary(id: SalaryId, connection: &Connection) -> Result<(), Error> {
    match connection.execute("DELETE FROM salary WHERE id = ?1", [id])? {
        0 => Err(Error::NotFound("Salary")),
        _ => Ok(()),
    }
}

/// Create the salary table in the database.
pub fn create_salary_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS salary (
            id INTEGER PRIMARY KEY,
            amount INTEGER NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            UNIQUE(year, month)
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Salary, rusqlite::Error> {
    Ok(Salary {
        id: row.get(0)?,
        amount: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
    })
}

fn not_found_as_salary(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Salary"),
        error => error.into(),
    }
}
