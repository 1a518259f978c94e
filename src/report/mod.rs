//! Dashboard Reports
//!
//! Assembles the fixed report queries, runs them through a record source and
//! returns typed chart points.
//!
//! ## Reports
//!
//! - **Cancer by age group**: discharge count per age group for diagnoses
//!   containing "CANCER". Rendered as a doughnut chart.
//! - **Average mortality by race and gender**: average APR severity of
//!   illness code per race, one series per gender. Rendered as a radar chart.
//!
//! ## Data Flow
//!
//! 1. `definitions` builds the ordered select/where/group fragments
//! 2. A [`RecordSource`](crate::client::RecordSource) fetches the records
//! 3. `points` maps each record to a [`ChartPoint`]

mod definitions;
mod error;
mod points;
mod runner;

pub use definitions::{cancer_by_age_group_request, race_and_gender_request, Gender};
pub use error::{ReportError, ReportResult};
pub use points::{to_points, ChartPoint, GenderComparison};
pub use runner::{ReportData, ReportRunner};

#[cfg(test)]
pub(crate) use runner::tests as mock;

use serde::Serialize;
use std::str::FromStr;

/// The reports shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    CancerByAgeGroup,
    MortalityByRaceAndGender,
}

impl ReportKind {
    /// All reports, in page order
    pub const ALL: [ReportKind; 2] = [Self::CancerByAgeGroup, Self::MortalityByRaceAndGender];

    /// URL and CLI name
    pub fn slug(&self) -> &'static str {
        match self {
            Self::CancerByAgeGroup => "cancer-by-age-group",
            Self::MortalityByRaceAndGender => "mortality-by-race-and-gender",
        }
    }

    /// Chart title
    pub fn title(&self) -> &'static str {
        match self {
            Self::CancerByAgeGroup => "Cancer by Age Group",
            Self::MortalityByRaceAndGender => "Average Mortality Code by Race and Gender",
        }
    }

    /// Id of the canvas element the chart is drawn into
    pub fn target_id(&self) -> &'static str {
        match self {
            Self::CancerByAgeGroup => "pie",
            Self::MortalityByRaceAndGender => "radar",
        }
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| ReportError::UnknownReport(s.to_string()))
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
