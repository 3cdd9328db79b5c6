//! Facet filtering over the loaded dataset.
//!
//! A criteria set is one optional age range plus one membership criterion
//! per categorical facet column. Criteria combine as a conjunction: a row
//! survives when it passes the range and every facet. Within a facet the
//! allowed values are a disjunction.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Reserved value meaning "no restriction" for a facet.
pub const WILDCARD: &str = "all";

/// Categorical facet columns, in the order criteria are applied after the
/// age range.
pub const FACET_COLUMNS: [&str; 8] = [
    "job",
    "marital",
    "default",
    "housing",
    "loan",
    "contact",
    "month",
    "day_of_week",
];

/// Default column for the numeric range criterion.
pub const AGE_COLUMN: &str = "age";

/// Inclusive numeric bound on a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeCriterion {
    pub column: String,
    pub min: i64,
    pub max: i64,
}

impl RangeCriterion {
    pub fn new(column: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            column: column.into(),
            min,
            max,
        }
    }

    /// Parse a `MIN:MAX` argument, e.g. `30:40`.
    pub fn parse(column: &str, spec: &str) -> Result<Self> {
        let (min, max) = spec
            .split_once(':')
            .ok_or_else(|| eyre!("invalid range '{}': expected MIN:MAX", spec))?;
        let min: i64 = min
            .trim()
            .parse()
            .map_err(|_| eyre!("invalid range minimum '{}'", min))?;
        let max: i64 = max
            .trim()
            .parse()
            .map_err(|_| eyre!("invalid range maximum '{}'", max))?;
        if min > max {
            return Err(eyre!("invalid range: {} > {}", min, max));
        }
        Ok(Self::new(column, min, max))
    }

    fn to_expr(&self) -> Expr {
        col(self.column.as_str())
            .gt_eq(lit(self.min))
            .and(col(self.column.as_str()).lt_eq(lit(self.max)))
    }
}

/// Allowed-value set for one categorical column. The wildcard value
/// anywhere in the set means "no restriction"; an empty set matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCriterion {
    pub column: String,
    pub allowed: Vec<String>,
}

impl FacetCriterion {
    pub fn new(column: impl Into<String>, allowed: Vec<String>) -> Self {
        Self {
            column: column.into(),
            allowed,
        }
    }

    /// A pass-through criterion for `column`.
    pub fn wildcard(column: impl Into<String>) -> Self {
        Self::new(column, vec![WILDCARD.to_string()])
    }

    /// Parse a comma-separated allowed list, e.g. `admin.,technician`.
    pub fn parse(column: &str, values: &str) -> Self {
        let allowed = values
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        Self::new(column, allowed)
    }

    pub fn is_wildcard(&self) -> bool {
        self.allowed.iter().any(|v| v == WILDCARD)
    }

    /// Membership predicate as an eq/or disjunction chain. None when the
    /// criterion is a wildcard.
    fn to_expr(&self) -> Option<Expr> {
        if self.is_wildcard() {
            return None;
        }
        let mut expr: Option<Expr> = None;
        for value in &self.allowed {
            let e = col(self.column.as_str()).eq(lit(value.as_str()));
            expr = Some(match expr {
                Some(current) => current.or(e),
                None => e,
            });
        }
        // Empty allowed set selects nothing
        Some(expr.unwrap_or_else(|| lit(false)))
    }
}

/// The full filter: age range first, then the facets in [`FACET_COLUMNS`]
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaSet {
    pub age: Option<RangeCriterion>,
    pub facets: Vec<FacetCriterion>,
}

impl Default for CriteriaSet {
    fn default() -> Self {
        Self::passthrough()
    }
}

impl CriteriaSet {
    /// No age bound and every facet a wildcard: filtering with this yields
    /// a copy of the input.
    pub fn passthrough() -> Self {
        Self {
            age: None,
            facets: FACET_COLUMNS
                .iter()
                .map(|column| FacetCriterion::wildcard(*column))
                .collect(),
        }
    }

    /// Columns referenced by any criterion, wildcard or not.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = Vec::with_capacity(self.facets.len() + 1);
        if let Some(range) = &self.age {
            columns.push(range.column.as_str());
        }
        for facet in &self.facets {
            columns.push(facet.column.as_str());
        }
        columns
    }

    /// Number of restricting (non-wildcard) criteria.
    pub fn active_count(&self) -> usize {
        let facets = self.facets.iter().filter(|f| !f.is_wildcard()).count();
        facets + usize::from(self.age.is_some())
    }

    /// Filter `df` down to the rows satisfying every criterion.
    ///
    /// The result is a new frame: a subset of the input's rows in their
    /// original relative order; the input is never mutated. Referencing a
    /// column the table does not have is an error even for a wildcard
    /// criterion.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        for name in self.columns() {
            if df.column(name).is_err() {
                return Err(eyre!("column not found: {}", name));
            }
        }

        let mut lf = df.clone().lazy();
        if let Some(range) = &self.age {
            lf = lf.filter(range.to_expr());
        }
        for facet in &self.facets {
            if let Some(expr) = facet.to_expr() {
                lf = lf.filter(expr);
            }
        }
        Ok(lf.collect()?)
    }
}
