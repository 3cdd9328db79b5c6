//! Target-distribution summaries for the raw vs. filtered comparison.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::*;

/// Share of one target category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

/// Percentage breakdown of a target column, categories sorted by the
/// value's natural (lexicographic) order.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDistribution {
    pub column: String,
    pub total_rows: usize,
    pub categories: Vec<CategoryShare>,
}

impl TargetDistribution {
    pub fn share(&self, value: &str) -> Option<&CategoryShare> {
        self.categories.iter().find(|c| c.value == value)
    }
}

/// Computes the percentage of rows per distinct `target` value.
///
/// An empty table is an "empty input" error rather than a summary full of
/// NaN percentages; callers surface that as a user-visible notice.
pub fn summarize(df: &DataFrame, target: &str) -> Result<TargetDistribution> {
    if df.column(target).is_err() {
        return Err(eyre!("column not found: {}", target));
    }
    let total_rows = df.height();
    if total_rows == 0 {
        return Err(eyre!("empty input: no rows to summarize in '{}'", target));
    }

    let counts = df
        .clone()
        .lazy()
        .group_by([col(target)])
        .agg([len().alias("count")])
        .sort_by_exprs(vec![col(target)], SortMultipleOptions::default())
        .collect()?;

    let values = counts.column(target)?;
    let tallies = counts.column("count")?;
    let mut categories = Vec::with_capacity(counts.height());
    for i in 0..counts.height() {
        let value = values.get(i)?.str_value().to_string();
        let count = tallies.get(i)?.try_extract::<u32>()? as usize;
        categories.push(CategoryShare {
            value,
            count,
            percentage: count as f64 * 100.0 / total_rows as f64,
        });
    }

    Ok(TargetDistribution {
        column: target.to_string(),
        total_rows,
        categories,
    })
}
