//! Fixed expenses: the installments of recurring bills, attributed to billing periods.

mod core;
mod endpoints;

pub use core::{
    FixedExpense, FixedExpenseFilter, FixedExpenseForm, FixedExpenseId, create_fixed_expense,
    create_fixed_expense_table, delete_fixed_expense, get_fixed_expense, get_fixed_expenses,
    update_fixed_expense,
};
#[cfg(test)]
pub use core::NewFixedExpense;
pub use endpoints::{
    create_fixed_expense_endpoint, delete_fixed_expense_endpoint, get_fixed_expense_endpoint,
    get_fixed_expenses_endpoint, update_fixed_expense_endpoint,
};
