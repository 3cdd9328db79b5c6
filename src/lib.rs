//! Compare a bank telemarketing campaign's outcome distribution before and
//! after facet filtering.
//!
//! The raw table is loaded once per session and kept unchanged; the
//! filtered view and both summaries are recomputed from the current
//! criteria on demand.

pub mod chart_data;
pub mod chart_export;
pub mod config;
pub mod export;
pub mod filter;
pub mod loader;
pub mod statistics;
pub mod template;

pub use teledash_cli::{Args, ChartFormat, CompressionFormat, FileFormat};

use color_eyre::Result;
use polars::prelude::DataFrame;

use crate::filter::CriteriaSet;
use crate::statistics::{summarize, TargetDistribution};

pub const APP_NAME: &str = "teledash";

/// Raw and filtered summaries for one filter cycle. `filtered` is `None`
/// when the criteria match no rows; callers surface a notice instead of
/// treating that as a failure.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub raw: TargetDistribution,
    pub filtered: Option<TargetDistribution>,
    pub filtered_rows: usize,
}

/// One analysis session: the immutable raw table plus the current criteria.
pub struct Session {
    raw: DataFrame,
    criteria: CriteriaSet,
    target: String,
}

impl Session {
    pub fn new(raw: DataFrame, target: impl Into<String>) -> Self {
        Self {
            raw,
            criteria: CriteriaSet::passthrough(),
            target: target.into(),
        }
    }

    pub fn raw(&self) -> &DataFrame {
        &self.raw
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn criteria(&self) -> &CriteriaSet {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: CriteriaSet) {
        self.criteria = criteria;
    }

    /// Apply the current criteria to the raw table.
    pub fn filtered(&self) -> Result<DataFrame> {
        self.criteria.apply(&self.raw)
    }

    /// Summarize the target column over the raw and the filtered tables.
    pub fn comparison(&self) -> Result<Comparison> {
        let raw_summary = summarize(&self.raw, &self.target)?;
        let filtered = self.filtered()?;
        let filtered_rows = filtered.height();
        let filtered_summary = if filtered_rows == 0 {
            None
        } else {
            Some(summarize(&filtered, &self.target)?)
        };
        Ok(Comparison {
            raw: raw_summary,
            filtered: filtered_summary,
            filtered_rows,
        })
    }
}

/// Render the comparison as an aligned text table.
pub fn render_report(comparison: &Comparison) -> String {
    let target = comparison.raw.column.as_str();
    let mut labels: Vec<&str> = comparison
        .raw
        .categories
        .iter()
        .map(|c| c.value.as_str())
        .collect();
    if let Some(filtered) = &comparison.filtered {
        for category in &filtered.categories {
            if !labels.contains(&category.value.as_str()) {
                labels.push(category.value.as_str());
            }
        }
        labels.sort_unstable();
    }

    let label_width = labels
        .iter()
        .map(|l| l.len())
        .max()
        .unwrap_or(0)
        .max(target.len())
        .max("rows".len());

    let mut out = String::new();
    out.push_str(&format!(
        "{:<label_width$}  {:>10}  {:>10}\n",
        target, "raw %", "filtered %"
    ));
    for label in &labels {
        let raw_pct = comparison
            .raw
            .share(label)
            .map(|s| format!("{:.1}", s.percentage))
            .unwrap_or_else(|| "-".to_string());
        let filtered_pct = comparison
            .filtered
            .as_ref()
            .and_then(|f| f.share(label))
            .map(|s| format!("{:.1}", s.percentage))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<label_width$}  {:>10}  {:>10}\n",
            label, raw_pct, filtered_pct
        ));
    }
    out.push_str(&format!(
        "{:<label_width$}  {:>10}  {:>10}\n",
        "rows", comparison.raw.total_rows, comparison.filtered_rows
    ));

    if comparison.filtered.is_none() {
        out.push('\n');
        out.push_str(
            "No rows match the current filters; the filtered distribution cannot be computed.\n",
        );
    }
    out
}
