//! Reports built from expenses, fixed expenses and salaries.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod consolidated;
mod weekly;
mod weekly_summary;

pub use consolidated::get_consolidated_report_endpoint;
pub use weekly::{DatedAmount, group_by_week};
pub use weekly_summary::get_weekly_summary_endpoint;

/// The state needed for generating reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The local timezone as a canonical timezone name, used to find the current period.
    pub local_timezone: String,
    /// The database connection for reading the report data.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}
