//! Creates the application's database tables.

use rusqlite::{Connection, TransactionBehavior, Transaction as SqlTransaction};

use crate::{
    Error, billing_period::create_billing_period_table, category::create_category_table,
    expense::create_expense_table, fixed_expense::create_fixed_expense_table,
    salary::create_salary_table,
};

/// Create all of the database tables for the application.
///
/// Tables that already exist are left untouched, so it is safe to call this
/// on an existing database.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must come first.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_billing_period_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_fixed_expense_table(&transaction)?;
    create_salary_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
