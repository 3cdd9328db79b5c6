mod common;

use teledash::filter::{CriteriaSet, FacetCriterion};
use teledash::statistics::summarize;

#[test]
fn sixty_forty_split() {
    let df = common::sample_bank_df();
    let summary = summarize(&df, "y").unwrap();
    assert_eq!(summary.total_rows, 10);
    assert_eq!(summary.categories.len(), 2);
    assert_eq!(summary.categories[0].value, "no");
    assert!((summary.categories[0].percentage - 60.0).abs() < 1e-9);
    assert_eq!(summary.categories[1].value, "yes");
    assert!((summary.categories[1].percentage - 40.0).abs() < 1e-9);
}

#[test]
fn percentages_sum_to_one_hundred() {
    let df = common::sample_bank_df();
    for column in ["job", "marital", "month", "y"] {
        let summary = summarize(&df, column).unwrap();
        let total: f64 = summary.categories.iter().map(|c| c.percentage).sum();
        assert!(
            (total - 100.0).abs() < 1e-9,
            "{} percentages sum to {}",
            column,
            total
        );
    }
}

#[test]
fn categories_follow_natural_ordering() {
    let df = common::sample_bank_df();
    let summary = summarize(&df, "month").unwrap();
    let order: Vec<&str> = summary.categories.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(order, vec!["aug", "jul", "jun", "may", "nov"]);
}

#[test]
fn counts_back_the_percentages() {
    let df = common::sample_bank_df();
    let summary = summarize(&df, "job").unwrap();
    let admin = summary.share("admin.").unwrap();
    assert_eq!(admin.count, 3);
    assert!((admin.percentage - 30.0).abs() < 1e-9);
}

#[test]
fn summarizing_an_empty_filter_result_is_the_empty_input_condition() {
    let df = common::sample_bank_df();
    let mut criteria = CriteriaSet::passthrough();
    criteria.facets[0] = FacetCriterion::new("job", vec!["entrepreneur".to_string()]);
    let filtered = criteria.apply(&df).unwrap();
    assert_eq!(filtered.height(), 0);

    let err = summarize(&filtered, "y").unwrap_err();
    assert!(err.to_string().contains("empty input"));
}
