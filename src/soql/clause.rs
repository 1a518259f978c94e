//! SoQL Clause Builder
//!
//! Turns structured parameters into percent-encoded query-string fragments
//! for the dataset API's `$select`, `$where` and `$group` parameters.
//!
//! ```text
//! $select=age_group%2CCOUNT(age_group)
//! $where=UPPER(ccs_diagnosis_description)%20like%20%27%25CANCER%25%27
//! $group=age_group
//! ```

use super::error::{ClauseError, ClauseResult};
use std::borrow::Cow;
use std::fmt;

pub const SPACE: &str = "%20";
pub const APOSTROPHE: &str = "%27";
pub const PERCENT: &str = "%25";
pub const COMMA: &str = "%2C";

const SELECT_PREFIX: &str = "$select=";
const WHERE_PREFIX: &str = "$where=";
const GROUP_PREFIX: &str = "$group=";

/// The kind of a clause fragment, recovered from its prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Select,
    Where,
    Group,
}

impl ClauseKind {
    /// Query-string prefix for this clause kind
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Select => SELECT_PREFIX,
            Self::Where => WHERE_PREFIX,
            Self::Group => GROUP_PREFIX,
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "select"),
            Self::Where => write!(f, "where"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// An encoded query-string fragment such as `$group=race`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    fn new(kind: ClauseKind, body: String) -> Self {
        Self(format!("{}{}", kind.prefix(), body))
    }

    /// The encoded fragment text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Clause kind, taken from the fragment prefix
    pub fn kind(&self) -> ClauseKind {
        if self.0.starts_with(SELECT_PREFIX) {
            ClauseKind::Select
        } else if self.0.starts_with(WHERE_PREFIX) {
            ClauseKind::Where
        } else {
            ClauseKind::Group
        }
    }

    /// Percent-decoded form, for logs
    pub fn decoded(&self) -> Cow<'_, str> {
        urlencoding::decode(&self.0).unwrap_or(Cow::Borrowed(&self.0))
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Aggregate functions supported in a select clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    Count,
    Avg,
}

impl fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count => write!(f, "COUNT"),
            Self::Avg => write!(f, "AVG"),
        }
    }
}

/// An aggregate applied to one field, rendered as `FUNC(field)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub func: AggregateFunc,
    pub field: String,
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.func, self.field)
    }
}

/// An item in the select clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectExpr {
    /// A bare column
    Field(String),
    /// An aggregate over a column
    Aggregate(Aggregate),
}

impl fmt::Display for SelectExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Aggregate(agg) => fmt::Display::fmt(agg, f),
        }
    }
}

impl From<&str> for SelectExpr {
    fn from(field: &str) -> Self {
        Self::Field(field.to_string())
    }
}

impl From<Aggregate> for SelectExpr {
    fn from(agg: Aggregate) -> Self {
        Self::Aggregate(agg)
    }
}

/// A case-insensitive substring filter on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: String,
    pub value: String,
}

impl Predicate {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Check that a field reference is a non-empty identifier
fn validate_field(field: &str) -> ClauseResult<()> {
    if field.is_empty() {
        return Err(ClauseError::InvalidArgument(
            "field reference must not be empty".into(),
        ));
    }
    if !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ClauseError::InvalidArgument(format!(
            "field reference '{}' is not an identifier",
            field
        )));
    }
    Ok(())
}

fn validate_select(expr: &SelectExpr) -> ClauseResult<()> {
    match expr {
        SelectExpr::Field(name) => validate_field(name),
        SelectExpr::Aggregate(agg) => validate_field(&agg.field),
    }
}

/// Build `$select=` from expressions joined by an encoded comma.
///
/// Order is preserved: the first expression becomes the chart label and the
/// second the chart value.
pub fn build_select(fields: &[SelectExpr]) -> ClauseResult<Fragment> {
    if fields.is_empty() {
        return Err(ClauseError::InvalidArgument(
            "select clause needs at least one field".into(),
        ));
    }

    let mut parts = Vec::with_capacity(fields.len());
    for expr in fields {
        validate_select(expr)?;
        parts.push(expr.to_string());
    }

    Ok(Fragment::new(ClauseKind::Select, parts.join(COMMA)))
}

/// Build `$where=` with one `UPPER(field) like '%value%'` per predicate,
/// joined by an encoded ` AND `.
///
/// Wildcards and quotes inside the value are passed through unescaped.
pub fn build_where(predicates: &[Predicate]) -> ClauseResult<Fragment> {
    if predicates.is_empty() {
        return Err(ClauseError::InvalidArgument(
            "where clause needs at least one predicate".into(),
        ));
    }

    let mut conditions = Vec::with_capacity(predicates.len());
    for predicate in predicates {
        validate_field(&predicate.field)?;
        conditions.push(format!(
            "UPPER({field}){SPACE}like{SPACE}{APOSTROPHE}{PERCENT}{value}{PERCENT}{APOSTROPHE}",
            field = predicate.field,
            value = predicate.value,
        ));
    }

    let separator = format!("{SPACE}AND{SPACE}");
    Ok(Fragment::new(ClauseKind::Where, conditions.join(&separator)))
}

/// Build `$group=field`
pub fn build_group(field: &str) -> ClauseResult<Fragment> {
    validate_field(field)?;
    Ok(Fragment::new(ClauseKind::Group, field.to_string()))
}

/// Build `COUNT(field)`
pub fn build_count(field: &str) -> ClauseResult<Aggregate> {
    validate_field(field)?;
    Ok(Aggregate {
        func: AggregateFunc::Count,
        field: field.to_string(),
    })
}

/// Build `AVG(field)`
pub fn build_average(field: &str) -> ClauseResult<Aggregate> {
    validate_field(field)?;
    Ok(Aggregate {
        func: AggregateFunc::Avg,
        field: field.to_string(),
    })
}
