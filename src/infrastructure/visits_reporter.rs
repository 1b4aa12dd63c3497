use std::sync::Arc;

use log::{error, warn};

use crate::{StdResult, VisitCounter, VisitsProvider, VisitsReport, VisitsSource};

const NOT_CONFIGURED_MESSAGE: &str =
    "Configure GA_PROPERTY_ID and GA_ACCESS_TOKEN, or DATABASE_URL, to report visits.";

/// Builds the visit report from the analytics provider, falling back to the visit counter.
pub struct VisitsReporter {
    provider: Option<Arc<dyn VisitsProvider>>,
    counter: Option<Arc<dyn VisitCounter>>,
}

impl VisitsReporter {
    /// Creates a new `VisitsReporter` instance. Missing sources are skipped.
    pub fn new(
        provider: Option<Arc<dyn VisitsProvider>>,
        counter: Option<Arc<dyn VisitCounter>>,
    ) -> Self {
        Self { provider, counter }
    }

    fn is_configured(&self) -> bool {
        self.provider.is_some() || self.counter.is_some()
    }

    /// Reports the total visits. Never fails: unavailable sources degrade to a zero count.
    pub async fn report(&self) -> VisitsReport {
        let configured = self.is_configured();
        if let Some(provider) = &self.provider {
            match provider.total_visits().await {
                Ok(visits) if visits > 0 => {
                    return VisitsReport {
                        visits,
                        source: VisitsSource::GoogleAnalytics,
                        configured,
                        message: None,
                    };
                }
                Ok(_) => {}
                Err(e) => warn!("Error retrieving visits from Google Analytics: {e:#}"),
            }
        }

        match &self.counter {
            Some(counter) => match counter.total().await {
                Ok(visits) => VisitsReport {
                    visits,
                    source: VisitsSource::Counter,
                    configured,
                    message: None,
                },
                Err(e) => {
                    error!("Error retrieving visits from counter: {e:#}");
                    VisitsReport {
                        visits: 0,
                        source: VisitsSource::Error,
                        configured,
                        message: Some("Visit counter is unavailable".to_string()),
                    }
                }
            },
            None => VisitsReport {
                visits: 0,
                source: VisitsSource::Fallback,
                configured,
                message: (!configured).then(|| NOT_CONFIGURED_MESSAGE.to_string()),
            },
        }
    }

    /// Records one visit and returns the new total, if a counter is configured.
    pub async fn record_visit(&self) -> StdResult<Option<u64>> {
        match &self.counter {
            Some(counter) => Ok(Some(counter.increment().await?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use crate::{MemoryVisitCounter, MockVisitCounter, MockVisitsProvider};

    use super::*;

    fn provider_returning(visits: StdResult<u64>) -> Arc<dyn VisitsProvider> {
        let mut provider = MockVisitsProvider::new();
        let mut visits = Some(visits);
        provider
            .expect_total_visits()
            .returning(move || visits.take().unwrap())
            .times(1);

        Arc::new(provider)
    }

    #[tokio::test]
    async fn report_without_sources_is_inert() {
        let reporter = VisitsReporter::new(None, None);

        let report = reporter.report().await;

        assert_eq!(0, report.visits);
        assert_eq!(VisitsSource::Fallback, report.source);
        assert!(!report.configured);
        assert!(report.message.is_some());
        assert_eq!(None, reporter.record_visit().await.unwrap());
    }

    #[tokio::test]
    async fn report_prefers_google_analytics() {
        let reporter = VisitsReporter::new(
            Some(provider_returning(Ok(1234))),
            Some(Arc::new(MemoryVisitCounter::new(7))),
        );

        let report = reporter.report().await;

        assert_eq!(1234, report.visits);
        assert_eq!(VisitsSource::GoogleAnalytics, report.source);
        assert!(report.configured);
    }

    #[tokio::test]
    async fn report_falls_back_to_counter_when_analytics_fails() {
        let reporter = VisitsReporter::new(
            Some(provider_returning(Err(anyhow!("denied")))),
            Some(Arc::new(MemoryVisitCounter::new(7))),
        );

        let report = reporter.report().await;

        assert_eq!(7, report.visits);
        assert_eq!(VisitsSource::Counter, report.source);
    }

    #[tokio::test]
    async fn report_zero_from_analytics_without_counter_is_fallback() {
        let reporter = VisitsReporter::new(Some(provider_returning(Ok(0))), None);

        let report = reporter.report().await;

        assert_eq!(0, report.visits);
        assert_eq!(VisitsSource::Fallback, report.source);
        assert!(report.configured);
        assert_eq!(None, report.message);
    }

    #[tokio::test]
    async fn report_counter_failure_is_error_source() {
        let counter = {
            let mut counter = MockVisitCounter::new();
            counter
                .expect_total()
                .returning(|| Err(anyhow!("connection refused")))
                .times(1);

            counter
        };
        let reporter = VisitsReporter::new(None, Some(Arc::new(counter)));

        let report = reporter.report().await;

        assert_eq!(VisitsSource::Error, report.source);
        assert_eq!(0, report.visits);
    }

    #[tokio::test]
    async fn record_visit_increments_counter() {
        let reporter = VisitsReporter::new(None, Some(Arc::new(MemoryVisitCounter::new(1))));

        assert_eq!(Some(2), reporter.record_visit().await.unwrap());
        assert_eq!(2, reporter.report().await.visits);
    }
}
