//! Fixed report queries
//!
//! Pure request builders for the two dashboard reports. Each request is
//! ordered select, where, group.

use crate::soql::{
    build_average, build_count, build_group, build_select, build_where, ClauseResult, Predicate,
    QueryRequest,
};

pub const AGE_GROUP: &str = "age_group";
pub const RACE: &str = "race";
pub const GENDER: &str = "gender";
pub const DIAGNOSIS: &str = "ccs_diagnosis_description";
pub const SEVERITY_CODE: &str = "apr_severity_of_illness_code";

/// Diagnosis substring both reports filter on
pub const CANCER: &str = "CANCER";

/// Patient gender as coded in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

/// Cancer discharges counted per age group
pub fn cancer_by_age_group_request() -> ClauseResult<QueryRequest> {
    let count = build_count(AGE_GROUP)?;

    QueryRequest::new()
        .with(build_select(&[AGE_GROUP.into(), count.into()])?)?
        .with(build_where(&[Predicate::new(DIAGNOSIS, CANCER)])?)?
        .with(build_group(AGE_GROUP)?)
}

/// Average severity code per race for cancer discharges of one gender
pub fn race_and_gender_request(gender: Gender) -> ClauseResult<QueryRequest> {
    let avg = build_average(SEVERITY_CODE)?;

    QueryRequest::new()
        .with(build_select(&[RACE.into(), avg.into()])?)?
        .with(build_where(&[
            Predicate::new(DIAGNOSIS, CANCER),
            Predicate::new(GENDER, gender.code()),
        ])?)?
        .with(build_group(RACE)?)
}
