//! SoQL Query Building
//!
//! Builds the query-string fragments understood by the Socrata-style
//! dataset API and collects them into an ordered request.
//!
//! # Example
//!
//! ```rust
//! use healthstat::soql::{build_count, build_group, build_select, build_where, Predicate, QueryRequest};
//!
//! let count = build_count("age_group")?;
//! let request = QueryRequest::new()
//!     .with(build_select(&["age_group".into(), count.into()])?)?
//!     .with(build_where(&[Predicate::new("ccs_diagnosis_description", "CANCER")])?)?
//!     .with(build_group("age_group")?)?;
//!
//! assert_eq!(request.fragments().len(), 3);
//! # Ok::<(), healthstat::soql::ClauseError>(())
//! ```

mod clause;
mod error;

pub use clause::{
    build_average, build_count, build_group, build_select, build_where, Aggregate, AggregateFunc,
    ClauseKind, Fragment, Predicate, SelectExpr, APOSTROPHE, COMMA, PERCENT, SPACE,
};
pub use error::{ClauseError, ClauseResult};

/// An ordered set of clause fragments, at most one per clause kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    fragments: Vec<Fragment>,
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment, rejecting a second fragment of the same kind
    pub fn push(&mut self, fragment: Fragment) -> ClauseResult<()> {
        let kind = fragment.kind();
        if self.fragments.iter().any(|f| f.kind() == kind) {
            return Err(ClauseError::InvalidArgument(format!(
                "request already has a {} clause",
                kind
            )));
        }
        self.fragments.push(fragment);
        Ok(())
    }

    /// Builder-style [`push`](Self::push)
    pub fn with(mut self, fragment: Fragment) -> ClauseResult<Self> {
        self.push(fragment)?;
        Ok(self)
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragment texts in request order
    pub fn to_strings(&self) -> Vec<String> {
        self.fragments.iter().map(|f| f.to_string()).collect()
    }
}
