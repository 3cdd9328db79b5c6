//! Prepare paired bar-panel data from target distributions.

use crate::statistics::TargetDistribution;

pub const RAW_PANEL_TITLE: &str = "Raw data";
pub const FILTERED_PANEL_TITLE: &str = "Filtered data";

/// One labeled bar: target category and its percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub percentage: f64,
}

/// One chart panel: a titled bar series.
#[derive(Debug, Clone, PartialEq)]
pub struct BarPanel {
    pub title: String,
    pub bars: Vec<Bar>,
}

/// Data for the side-by-side raw/filtered comparison chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonChart {
    pub target: String,
    pub panels: [BarPanel; 2],
    /// Shared y-axis upper bound (percent), padded above the tallest bar.
    pub y_max: f64,
}

fn to_bars(summary: &TargetDistribution) -> Vec<Bar> {
    summary
        .categories
        .iter()
        .map(|c| Bar {
            label: c.value.clone(),
            percentage: c.percentage,
        })
        .collect()
}

/// Builds the two panels. A `None` filtered summary (empty filtered set)
/// yields an empty right panel so the chart still renders.
pub fn prepare_comparison(
    raw: &TargetDistribution,
    filtered: Option<&TargetDistribution>,
) -> ComparisonChart {
    let raw_panel = BarPanel {
        title: RAW_PANEL_TITLE.to_string(),
        bars: to_bars(raw),
    };
    let filtered_panel = BarPanel {
        title: FILTERED_PANEL_TITLE.to_string(),
        bars: filtered.map(to_bars).unwrap_or_default(),
    };
    let tallest = raw_panel
        .bars
        .iter()
        .chain(filtered_panel.bars.iter())
        .map(|b| b.percentage)
        .fold(0.0_f64, f64::max);
    let y_max = if tallest > 0.0 { tallest * 1.15 } else { 100.0 };
    ComparisonChart {
        target: raw.column.clone(),
        panels: [raw_panel, filtered_panel],
        y_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::CategoryShare;

    fn summary(column: &str, shares: &[(&str, usize, f64)]) -> TargetDistribution {
        TargetDistribution {
            column: column.to_string(),
            total_rows: shares.iter().map(|(_, n, _)| n).sum(),
            categories: shares
                .iter()
                .map(|(value, count, percentage)| CategoryShare {
                    value: value.to_string(),
                    count: *count,
                    percentage: *percentage,
                })
                .collect(),
        }
    }

    #[test]
    fn panels_carry_both_summaries() {
        let raw = summary("y", &[("no", 6, 60.0), ("yes", 4, 40.0)]);
        let filtered = summary("y", &[("no", 1, 25.0), ("yes", 3, 75.0)]);
        let chart = prepare_comparison(&raw, Some(&filtered));
        assert_eq!(chart.target, "y");
        assert_eq!(chart.panels[0].bars.len(), 2);
        assert_eq!(chart.panels[1].bars[1].percentage, 75.0);
        assert!((chart.y_max - 75.0 * 1.15).abs() < 1e-9);
    }

    #[test]
    fn missing_filtered_summary_leaves_empty_panel() {
        let raw = summary("y", &[("no", 10, 100.0)]);
        let chart = prepare_comparison(&raw, None);
        assert!(chart.panels[1].bars.is_empty());
        assert_eq!(chart.panels[1].title, FILTERED_PANEL_TITLE);
    }
}
