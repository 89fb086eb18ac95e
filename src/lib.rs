//! Contas is a household finance tracker.
//!
//! This library provides a JSON REST API for recording expenses, fixed
//! installment bills, salaries and categories against billing periods, and
//! for reporting on them week by week or as consolidated totals.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod billing_period;
mod category;
mod database_id;
mod db;
mod endpoints;
mod error;
mod expense;
mod extract;
mod fixed_expense;
mod logging;
mod money;
mod report;
mod routing;
mod salary;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use billing_period::get_billing_period_by_name;
pub use category::{CategoryName, create_category_if_missing};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use expense::assign_expenses_to_billing_period;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not listen for the Ctrl+C signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
