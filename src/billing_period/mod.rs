//! Billing periods: named date ranges that expenses are reported against.

mod core;
mod endpoints;

pub use core::{
    BillingPeriod, BillingPeriodForm, BillingPeriodId, PeriodRange, billing_period_exists,
    create_billing_period, create_billing_period_table, get_all_billing_periods,
    get_billing_period, get_billing_period_by_name, get_billing_period_for_date,
    update_billing_period,
};
#[cfg(test)]
pub use core::{DefaultBills, NewBillingPeriod};
pub(crate) use core::map_billing_period_row_at;
pub use endpoints::{
    create_billing_period_endpoint, get_billing_period_endpoint, get_billing_periods_endpoint,
    get_current_billing_period_endpoint, update_billing_period_endpoint,
};
