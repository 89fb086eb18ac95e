//! Salaries: the monthly income, one per calendar month.

mod core;
mod endpoints;

pub use core::{
    Salary, SalaryForm, SalaryId, create_salary_table, delete_salary, get_all_salaries,
    get_salaries_for_year, get_salary, get_salary_for_month, update_salary, upsert_salary,
    validate_month,
};
#[cfg(test)]
pub use core::NewSalary;
pub use endpoints::{
    delete_salary_endpoint, get_salaries_endpoint, get_salary_endpoint, update_salary_endpoint,
    upsert_salary_endpoint,
};
