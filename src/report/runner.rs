//! Report Runner
//!
//! Executes the fixed report queries against a [`RecordSource`] and maps the
//! results into chart points.

use super::definitions::{
    cancer_by_age_group_request, race_and_gender_request, Gender, AGE_GROUP, RACE,
};
use super::error::ReportResult;
use super::points::{to_points, ChartPoint, GenderComparison};
use super::ReportKind;
use crate::client::RecordSource;
use crate::config::ReportsConfig;
use crate::soql::QueryRequest;
use serde::Serialize;
use std::sync::Arc;

/// Output of one report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportData {
    Distribution(Vec<ChartPoint>),
    Comparison(GenderComparison),
}

/// Runs reports against a record source
pub struct ReportRunner {
    source: Arc<dyn RecordSource>,
    config: ReportsConfig,
}

impl ReportRunner {
    /// Create a new runner
    pub fn new(source: Arc<dyn RecordSource>, config: ReportsConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ReportsConfig {
        &self.config
    }

    /// Run a report by kind
    pub async fn run(&self, kind: ReportKind) -> ReportResult<ReportData> {
        match kind {
            ReportKind::CancerByAgeGroup => {
                self.cancer_by_age_group().await.map(ReportData::Distribution)
            }
            ReportKind::MortalityByRaceAndGender => self
                .average_mortality_by_race_and_gender()
                .await
                .map(ReportData::Comparison),
        }
    }

    /// Cancer discharges per age group
    pub async fn cancer_by_age_group(&self) -> ReportResult<Vec<ChartPoint>> {
        let request = cancer_by_age_group_request()?;
        let points = self.execute(&request, AGE_GROUP).await?;

        tracing::info!(
            report = ReportKind::CancerByAgeGroup.slug(),
            points = points.len(),
            "Report complete"
        );
        Ok(points)
    }

    /// Average severity code per race, one series per gender.
    ///
    /// The two requests are independent. They run one after the other unless
    /// `concurrent_fetch` is set.
    pub async fn average_mortality_by_race_and_gender(&self) -> ReportResult<GenderComparison> {
        let (male, female) = if self.config.concurrent_fetch {
            futures_util::future::try_join(
                self.race_and_gender(Gender::Male),
                self.race_and_gender(Gender::Female),
            )
            .await?
        } else {
            let male = self.race_and_gender(Gender::Male).await?;
            let female = self.race_and_gender(Gender::Female).await?;
            (male, female)
        };

        tracing::info!(
            report = ReportKind::MortalityByRaceAndGender.slug(),
            male = male.len(),
            female = female.len(),
            "Report complete"
        );
        Ok(GenderComparison { male, female })
    }

    /// Average severity code per race for one gender
    pub async fn race_and_gender(&self, gender: Gender) -> ReportResult<Vec<ChartPoint>> {
        let request = race_and_gender_request(gender)?;
        self.execute(&request, RACE).await
    }

    async fn execute(
        &self,
        request: &QueryRequest,
        label_field: &str,
    ) -> ReportResult<Vec<ChartPoint>> {
        let records = self.source.fetch(request.fragments()).await?;
        to_points(&records, label_field)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::client::{decode_records, FetchError, Record};
    use crate::soql::Fragment;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Record source answering from canned bodies keyed by a fragment substring
    #[derive(Default)]
    pub(crate) struct MockSource {
        responses: Vec<(String, Result<String, u16>)>,
        pub(crate) requests: Mutex<Vec<Vec<String>>>,
    }

    impl MockSource {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Answer requests containing `needle` with `body`
        pub(crate) fn respond(mut self, needle: &str, body: &str) -> Self {
            self.responses.push((needle.to_string(), Ok(body.to_string())));
            self
        }

        /// Answer requests containing `needle` with an HTTP error status
        pub(crate) fn fail(mut self, needle: &str, status: u16) -> Self {
            self.responses.push((needle.to_string(), Err(status)));
            self
        }
    }

    #[async_trait]
    impl RecordSource for MockSource {
        async fn fetch(&self, fragments: &[Fragment]) -> Result<Vec<Record>, FetchError> {
            let texts: Vec<String> = fragments.iter().map(|f| f.to_string()).collect();
            let joined = texts.join("&");
            self.requests.lock().unwrap().push(texts);

            let (_, response) = self
                .responses
                .iter()
                .find(|(needle, _)| joined.contains(needle.as_str()))
                .ok_or_else(|| FetchError::Status {
                    status: 404,
                    message: format!("no canned response for {}", joined),
                })?;

            match response {
                Ok(body) => decode_records(body),
                Err(status) => Err(FetchError::Status {
                    status: *status,
                    message: "mock failure".into(),
                }),
            }
        }
    }

    pub(crate) const AGE_BODY: &str =
        r#"[{"age_group":"0-17","count":"5"},{"age_group":"18-44","count":"12"}]"#;
    pub(crate) const MALE_BODY: &str =
        r#"[{"race":"Black/African American","avg_apr_severity_of_illness_code":"2.6"},{"race":"White","avg_apr_severity_of_illness_code":"2.4"}]"#;
    pub(crate) const FEMALE_BODY: &str =
        r#"[{"race":"Black/African American","avg_apr_severity_of_illness_code":"2.5"},{"race":"White","avg_apr_severity_of_illness_code":"2.3"}]"#;

    pub(crate) fn full_mock() -> MockSource {
        MockSource::new()
            .respond("$group=age_group", AGE_BODY)
            .respond("%25M%25", MALE_BODY)
            .respond("%25F%25", FEMALE_BODY)
    }

    #[tokio::test]
    async fn test_cancer_by_age_group() {
        let source = Arc::new(full_mock());
        let runner = ReportRunner::new(source.clone(), ReportsConfig::default());

        let points = runner.cancer_by_age_group().await.unwrap();
        assert_eq!(
            points,
            vec![ChartPoint::new("0-17", "5"), ChartPoint::new("18-44", "12")]
        );

        let requests = source.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0],
            vec![
                "$select=age_group%2CCOUNT(age_group)",
                "$where=UPPER(ccs_diagnosis_description)%20like%20%27%25CANCER%25%27",
                "$group=age_group",
            ]
        );
    }

    async fn check_comparison(concurrent_fetch: bool) {
        let source = Arc::new(full_mock());
        let config = ReportsConfig {
            concurrent_fetch,
            ..Default::default()
        };
        let runner = ReportRunner::new(source.clone(), config);

        let comparison = runner.average_mortality_by_race_and_gender().await.unwrap();
        assert_eq!(comparison.male[0], ChartPoint::new("Black/African American", "2.6"));
        assert_eq!(comparison.male[1], ChartPoint::new("White", "2.4"));
        assert_eq!(comparison.female[0], ChartPoint::new("Black/African American", "2.5"));
        assert_eq!(comparison.female[1], ChartPoint::new("White", "2.3"));

        let requests = source.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r[2] == "$group=race"));
    }

    #[tokio::test]
    async fn test_mortality_sequential() {
        check_comparison(false).await;
    }

    #[tokio::test]
    async fn test_mortality_concurrent() {
        check_comparison(true).await;
    }

    #[tokio::test]
    async fn test_sequential_issues_male_first() {
        let source = Arc::new(full_mock());
        let runner = ReportRunner::new(source.clone(), ReportsConfig::default());
        runner.average_mortality_by_race_and_gender().await.unwrap();

        let requests = source.requests.lock().unwrap();
        assert!(requests[0][1].ends_with("%27%25M%25%27"));
        assert!(requests[1][1].ends_with("%27%25F%25%27"));
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces() {
        let source = Arc::new(
            MockSource::new()
                .respond("%25M%25", MALE_BODY)
                .fail("%25F%25", 500),
        );
        let runner = ReportRunner::new(source, ReportsConfig::default());

        let err = runner.average_mortality_by_race_and_gender().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_malformed_body_surfaces() {
        let source = Arc::new(MockSource::new().respond("age_group", r#"{"message":"oops"}"#));
        let runner = ReportRunner::new(source, ReportsConfig::default());

        let err = runner.cancer_by_age_group().await.unwrap_err();
        assert!(err.is_malformed());
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_run_by_kind() {
        let runner = ReportRunner::new(Arc::new(full_mock()), ReportsConfig::default());

        match runner.run(ReportKind::CancerByAgeGroup).await.unwrap() {
            ReportData::Distribution(points) => assert_eq!(points.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        match runner.run(ReportKind::MortalityByRaceAndGender).await.unwrap() {
            ReportData::Comparison(c) => assert_eq!(c.female.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }
}
