//! The week by week spending report of a billing period.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    app_state::lock_connection,
    billing_period::{BillingPeriodId, get_billing_period, get_billing_period_for_date},
    expense::{ExpenseFilter, ExpenseWithCategory, get_expenses_with_category},
    extract::{Json, Query},
    money::Amount,
    report::{ReportState, group_by_week},
    timezone::get_local_date,
};

/// Shown when there is no billing period to report on.
const NO_PERIOD_MESSAGE: &str = "Nenhum período de faturamento encontrado.";

/// The query parameters for the weekly summary.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummaryQuery {
    /// The billing period to report on, defaults to the current one.
    pub billing_period_id: Option<BillingPeriodId>,
}

/// The spending of one calendar week.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub week_label: String,
    pub week_start: Date,
    pub total: Amount,
    pub expenses: Vec<ExpenseWithCategory>,
}

/// The spending of a billing period grouped by week.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub period_name: Option<String>,
    pub weeks: Vec<WeekSummary>,
}

/// Summarize the expenses of a billing period week by week.
///
/// Without a `billingPeriodId` the period containing today's date is used.
/// If no period is found the summary is empty rather than an error.
pub async fn get_weekly_summary_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<WeeklySummaryQuery>,
) -> Result<Json<WeeklySummary>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let period = match query.billing_period_id {
        Some(period_id) => match get_billing_period(period_id, &connection) {
            Ok(period) => Some(period),
            Err(Error::NotFound(_)) => None,
            Err(error) => return Err(error),
        },
        None => {
            let today = get_local_date(&state.local_timezone)?;
            get_billing_period_for_date(today, &connection)?
        }
    };

    let Some(period) = period else {
        return Ok(Json(WeeklySummary {
            message: Some(NO_PERIOD_MESSAGE),
            period_name: None,
            weeks: Vec::new(),
        }));
    };

    let expenses =
        get_expenses_with_category(ExpenseFilter::BillingPeriod(period.id), &connection)?;

    let weeks = group_by_week(period.range(), expenses)
        .into_iter()
        .map(|week| WeekSummary {
            week_label: week.label,
            week_start: week.week_start,
            total: week.total,
            expenses: week.records,
        })
        .collect();

    Ok(Json(WeeklySummary {
        message: None,
        period_name: Some(period.name),
        weeks,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{endpoints, test_utils::get_test_server};

    #[tokio::test]
    async fn summarizes_period_by_week() {
        let server = get_test_server();
        server
            .post(endpoints::CATEGORIES)
            .json(&json!({ "name": "Supermercado" }))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post(endpoints::BILLING_PERIODS)
            .json(&json!({
                "name": "SETEMBRO25",
                "startDate": "2025-09-01",
                "endDate": "2025-09-30",
            }))
            .await
            .assert_status(StatusCode::CREATED);
        for (amount, date) in [
            ("100", "2025-09-01"),
            ("50", "2025-09-06"),
            ("0.1", "2025-09-30"),
        ] {
            server
                .post(endpoints::EXPENSES)
                .json(&json!({
                    "amount": amount,
                    "date": date,
                    "categoryId": 1,
                    "billingPeriodId": 1,
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(endpoints::WEEKLY_SUMMARY_REPORT)
            .add_query_param("billingPeriodId", 1)
            .await;

        response.assert_status_ok();
        let summary = response.json::<Value>();
        assert_eq!(summary["periodName"], "SETEMBRO25");
        assert_eq!(summary.get("message"), None);
        let weeks = summary["weeks"].as_array().unwrap();
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0]["weekLabel"], "Semana (01/09 - 06/09)");
        assert_eq!(weeks[0]["total"], json!(150.0));
        assert_eq!(weeks[0]["expenses"].as_array().unwrap().len(), 2);
        assert_eq!(weeks[1]["weekLabel"], "Semana (28/09 - 30/09)");
        assert_eq!(weeks[1]["total"], json!(0.1));
    }

    #[tokio::test]
    async fn no_period_gives_empty_summary() {
        let server = get_test_server();

        let response = server.get(endpoints::WEEKLY_SUMMARY_REPORT).await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "message": "Nenhum período de faturamento encontrado.",
            "periodName": null,
            "weeks": [],
        }));
    }

    #[tokio::test]
    async fn unknown_period_gives_empty_summary() {
        let server = get_test_server();

        let response = server
            .get(endpoints::WEEKLY_SUMMARY_REPORT)
            .add_query_param("billingPeriodId", 42)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["weeks"], json!([]));
    }
}
