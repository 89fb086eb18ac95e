//! Expenses: one-off purchases and payments, optionally attributed to a billing period.

mod core;
mod endpoints;

pub use core::{
    Expense, ExpenseDetails, ExpenseFilter, ExpenseForm, ExpenseId, ExpenseWithCategory,
    assign_expenses_to_billing_period, create_expense, create_expense_table, get_all_expenses,
    get_expense, get_expenses_with_category, update_expense,
};
#[cfg(test)]
pub use core::NewExpense;
pub use endpoints::{
    create_expense_endpoint, get_expense_endpoint, get_expenses_endpoint,
    get_grouped_expenses_endpoint, update_expense_endpoint,
};
