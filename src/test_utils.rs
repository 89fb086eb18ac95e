//! Helpers shared by the route handler tests.

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, build_router};

/// A test server for the full router backed by an empty in-memory database.
pub(crate) fn get_test_server() -> TestServer {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    let state = AppState::new(connection, "Etc/UTC").expect("Could not create app state");

    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace and ends with a
/// right brace, e.g. '{expense_id}' in '/expenses/{expense_id}'.
///
/// Only the first parameter is replaced. If no parameter is found in
/// `endpoint_path`, the function returns the original `endpoint_path`.
pub(crate) fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

mod format_endpoint_tests {
    use super::format_endpoint;

    #[test]
    fn replaces_parameter() {
        let formatted_path = format_endpoint("/expenses/{expense_id}", 12);

        assert_eq!(formatted_path, "/expenses/12");
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/expenses", 1);

        assert_eq!(formatted_path, "/expenses");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/billing-periods/{period_id}/expenses", 3);

        assert_eq!(formatted_path, "/billing-periods/3/expenses");
    }
}
