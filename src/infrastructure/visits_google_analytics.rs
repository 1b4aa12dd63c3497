#![allow(non_snake_case)]

use std::time::Duration;

use anyhow::{Context, anyhow};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::{StdResult, VisitsProvider};

/// The production endpoint of the Google Analytics Data API.
pub const GOOGLE_ANALYTICS_DATA_ENDPOINT: &str = "https://analyticsdata.googleapis.com";

/// First day counted in the visit total.
const REPORT_START_DATE: &str = "2020-01-01";

#[derive(Deserialize, Debug)]
struct RunReportResponse {
    #[serde(default)]
    rows: Vec<ReportRow>,
}

#[derive(Deserialize, Debug)]
struct ReportRow {
    #[serde(default)]
    metricValues: Vec<MetricValue>,
}

#[derive(Deserialize, Debug)]
struct MetricValue {
    value: Option<String>,
}

/// Reads the total number of users of a GA4 property.
pub struct GoogleAnalyticsVisits {
    client: Client,
    endpoint: String,
    property_id: String,
    access_token: String,
}

impl GoogleAnalyticsVisits {
    /// Creates a new `GoogleAnalyticsVisits` instance for the given property.
    pub fn try_new(endpoint: &str, property_id: &str, access_token: &str) -> StdResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .with_context(|| "Failed to build Google Analytics HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            property_id: property_id.trim().to_string(),
            access_token: access_token.trim().to_string(),
        })
    }
}

#[async_trait::async_trait]
impl VisitsProvider for GoogleAnalyticsVisits {
    async fn total_visits(&self) -> StdResult<u64> {
        let response = self
            .client
            .post(format!(
                "{}/v1beta/properties/{}:runReport",
                self.endpoint, self.property_id
            ))
            .bearer_auth(&self.access_token)
            .json(&json!({
                "dateRanges": [{ "startDate": REPORT_START_DATE, "endDate": "today" }],
                "metrics": [{ "name": "totalUsers" }],
            }))
            .send()
            .await
            .with_context(|| "Failed to reach Google Analytics Data API")?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Google Analytics Data API error: {status}"));
        }
        let report = response
            .json::<RunReportResponse>()
            .await
            .with_context(|| "Failed to parse Google Analytics report")?;

        let total_users = report
            .rows
            .first()
            .and_then(|row| row.metricValues.first())
            .and_then(|metric| metric.value.as_deref());
        match total_users {
            Some(value) => value
                .parse::<u64>()
                .with_context(|| format!("Invalid totalUsers value: {value}")),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;

    use super::*;

    fn build_provider(server: &MockServer) -> GoogleAnalyticsVisits {
        GoogleAnalyticsVisits::try_new(&server.base_url(), "123456789", "token").unwrap()
    }

    #[tokio::test]
    async fn total_visits_reads_total_users() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/v1beta/properties/123456789:runReport")
                .header("authorization", "Bearer token");
            then.status(200).json_body(json!({
                "rows": [{ "metricValues": [{ "value": "1234" }] }]
            }));
        });
        let provider = build_provider(&server);

        let visits = provider.total_visits().await.unwrap();

        mock.assert();
        assert_eq!(1234, visits);
    }

    #[tokio::test]
    async fn total_visits_is_zero_without_rows() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST")
                .path("/v1beta/properties/123456789:runReport");
            then.status(200).json_body(json!({ "rowCount": 0 }));
        });
        let provider = build_provider(&server);

        assert_eq!(0, provider.total_visits().await.unwrap());
    }

    #[tokio::test]
    async fn total_visits_fails_on_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST")
                .path("/v1beta/properties/123456789:runReport");
            then.status(403)
                .json_body(json!({ "error": { "message": "denied" } }));
        });
        let provider = build_provider(&server);

        provider
            .total_visits()
            .await
            .expect_err("Expected an error status to fail");
    }
}
