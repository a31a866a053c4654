//! Aggregation Core
//!
//! The three deep-dive pipelines over a core report table:
//! vendor ranking, associate ranking, and the target-vendor re-aggregation.
//! Every operation takes its table by value and returns a new frame.

use crate::currency::normalize_currency_column;
use crate::error::{DeepDiveError, Result};
use crate::schema::{
    ensure_columns, ASSOCIATE_NAME, CLOSED_VOLUME, ELIGIBLE_CATEGORY, TARGET_SHARE, TARGET_VOLUME,
    VENDOR_CATEGORY, VENDOR_NAME,
};
use polars::prelude::*;

/// Vendor of interest for the step-4 concentration summary.
pub const DEFAULT_TARGET_VENDOR: &str = "Supreme Lending";

/// Number of associates kept in the step-4 summary.
pub const DEFAULT_TOP_N: usize = 6;

/// Keep rows whose vendor category is the eligible sentinel.
///
/// Hard-coded business filter; rows that do not match are dropped, never
/// reported. Fails if nothing survives so an empty payload is never staged.
pub fn filter_eligible(df: DataFrame) -> Result<DataFrame> {
    ensure_columns(&df, &[VENDOR_CATEGORY])?;

    let filtered = df
        .lazy()
        .filter(col(VENDOR_CATEGORY).eq(lit(ELIGIBLE_CATEGORY)))
        .collect()
        .map_err(|e| DeepDiveError::Polars(format!("Eligibility filter failed: {}", e)))?;

    if filtered.height() == 0 {
        return Err(DeepDiveError::EmptyResult(format!(
            "filtering {} == {:?}",
            VENDOR_CATEGORY, ELIGIBLE_CATEGORY
        )));
    }

    Ok(filtered)
}

/// Group a normalized table by `key` and sum closed volume per group,
/// descending.
///
/// Grouping keeps first-encounter order and the sort maintains it on ties,
/// so rankings are reproducible run to run. Rows with a null or empty key
/// are dropped before grouping.
pub fn rank_by(df: DataFrame, key: &str) -> Result<DataFrame> {
    ensure_columns(&df, &[key, CLOSED_VOLUME])?;

    let ranked = df
        .lazy()
        .filter(col(key).is_not_null().and(col(key).neq(lit(""))))
        .group_by_stable(vec![col(key)])
        .agg([col(CLOSED_VOLUME).sum()])
        .sort_by_exprs(
            vec![col(CLOSED_VOLUME)],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()
        .map_err(|e| DeepDiveError::Polars(format!("Ranking by {} failed: {}", key, e)))?;

    if ranked.height() == 0 {
        return Err(DeepDiveError::EmptyResult(format!("grouping by {}", key)));
    }

    Ok(ranked)
}

/// Step 2: closed volume per vendor, largest first.
pub fn rank_vendors(df: DataFrame) -> Result<DataFrame> {
    let eligible = filter_eligible(df)?;
    let normalized = normalize_currency_column(eligible, CLOSED_VOLUME)?;
    rank_by(normalized, VENDOR_NAME)
}

/// Step 3: closed volume per associate, largest first.
pub fn rank_agents(df: DataFrame) -> Result<DataFrame> {
    let eligible = filter_eligible(df)?;
    let normalized = normalize_currency_column(eligible, CLOSED_VOLUME)?;
    rank_by(normalized, ASSOCIATE_NAME)
}

/// Step 4: per-associate totals with the target vendor's share broken out.
///
/// The pasted-back table is filtered and normalized like the raw report,
/// then each row contributes its volume to the target-vendor column only
/// when its vendor matches. Associates are ranked by target-vendor volume
/// and cut to the top `top_n`. The share is 0.0 for a zero total.
pub fn re_aggregate(df: DataFrame, target_vendor: &str, top_n: usize) -> Result<DataFrame> {
    ensure_columns(
        &df,
        &[VENDOR_CATEGORY, VENDOR_NAME, ASSOCIATE_NAME, CLOSED_VOLUME],
    )?;

    let eligible = filter_eligible(df)?;
    let normalized = normalize_currency_column(eligible, CLOSED_VOLUME)?;

    let summary = normalized
        .lazy()
        .filter(
            col(ASSOCIATE_NAME)
                .is_not_null()
                .and(col(ASSOCIATE_NAME).neq(lit(""))),
        )
        .with_columns([when(col(VENDOR_NAME).eq(lit(target_vendor)))
            .then(col(CLOSED_VOLUME))
            .otherwise(lit(0.0))
            .alias(TARGET_VOLUME)])
        .group_by_stable(vec![col(ASSOCIATE_NAME)])
        .agg([col(CLOSED_VOLUME).sum(), col(TARGET_VOLUME).sum()])
        .with_columns([when(col(CLOSED_VOLUME).gt(lit(0.0)))
            .then(col(TARGET_VOLUME) / col(CLOSED_VOLUME))
            .otherwise(lit(0.0))
            .alias(TARGET_SHARE)])
        .sort_by_exprs(
            vec![col(TARGET_VOLUME)],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .limit(top_n as IdxSize)
        .collect()
        .map_err(|e| DeepDiveError::Polars(format!("Re-aggregation failed: {}", e)))?;

    if summary.height() == 0 {
        return Err(DeepDiveError::EmptyResult(format!(
            "grouping by {}",
            ASSOCIATE_NAME
        )));
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> DataFrame {
        df! [
            VENDOR_CATEGORY => ["M", "M", "N"],
            VENDOR_NAME => ["A", "B", "C"],
            ASSOCIATE_NAME => ["X", "X", "Y"],
            CLOSED_VOLUME => ["$100.00", "$50.00", "$999.00"]
        ]
        .unwrap()
    }

    fn key_at(df: &DataFrame, column: &str, row: usize) -> String {
        df.column(column)
            .unwrap()
            .str()
            .unwrap()
            .get(row)
            .unwrap()
            .to_string()
    }

    fn volume_at(df: &DataFrame, column: &str, row: usize) -> f64 {
        df.column(column).unwrap().f64().unwrap().get(row).unwrap()
    }

    #[test]
    fn test_filter_eligible_drops_other_categories() {
        let filtered = filter_eligible(sample_report()).unwrap();
        assert_eq!(filtered.height(), 2);
        let cats = filtered.column(VENDOR_CATEGORY).unwrap().str().unwrap();
        assert!(cats.into_iter().all(|c| c == Some("M")));
    }

    #[test]
    fn test_filter_eligible_empty_is_an_error() {
        let df = df! [
            VENDOR_CATEGORY => ["N", "Q"],
            CLOSED_VOLUME => ["$1.00", "$2.00"]
        ]
        .unwrap();

        let err = filter_eligible(df).unwrap_err();
        assert!(matches!(err, DeepDiveError::EmptyResult(_)));
    }

    #[test]
    fn test_rank_vendors_scenario() {
        let ranked = rank_vendors(sample_report()).unwrap();

        assert_eq!(ranked.height(), 2);
        assert_eq!(key_at(&ranked, VENDOR_NAME, 0), "A");
        assert_eq!(volume_at(&ranked, CLOSED_VOLUME, 0), 100.0);
        assert_eq!(key_at(&ranked, VENDOR_NAME, 1), "B");
        assert_eq!(volume_at(&ranked, CLOSED_VOLUME, 1), 50.0);
    }

    #[test]
    fn test_rank_agents_scenario() {
        let ranked = rank_agents(sample_report()).unwrap();

        assert_eq!(ranked.height(), 1);
        assert_eq!(key_at(&ranked, ASSOCIATE_NAME, 0), "X");
        assert_eq!(volume_at(&ranked, CLOSED_VOLUME, 0), 150.0);
    }

    #[test]
    fn test_rank_conserves_total_volume() {
        let df = df! [
            VENDOR_CATEGORY => ["M", "M", "M", "M"],
            VENDOR_NAME => ["A", "B", "A", "C"],
            ASSOCIATE_NAME => ["X", "Y", "Y", "X"],
            CLOSED_VOLUME => ["$10.00", "$20.00", "$30.00", "$40.00"]
        ]
        .unwrap();

        let ranked = rank_vendors(df).unwrap();
        let total: f64 = ranked
            .column(CLOSED_VOLUME)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_rank_ties_keep_encounter_order() {
        let df = df! [
            VENDOR_CATEGORY => ["M", "M", "M"],
            VENDOR_NAME => ["First", "Second", "Third"],
            ASSOCIATE_NAME => ["X", "X", "X"],
            CLOSED_VOLUME => ["$50.00", "$50.00", "$50.00"]
        ]
        .unwrap();

        let ranked = rank_vendors(df).unwrap();
        assert_eq!(key_at(&ranked, VENDOR_NAME, 0), "First");
        assert_eq!(key_at(&ranked, VENDOR_NAME, 1), "Second");
        assert_eq!(key_at(&ranked, VENDOR_NAME, 2), "Third");
    }

    #[test]
    fn test_rank_drops_empty_keys() {
        let df = df! [
            VENDOR_CATEGORY => ["M", "M", "M"],
            VENDOR_NAME => [Some("A"), None, Some("")],
            ASSOCIATE_NAME => ["X", "X", "X"],
            CLOSED_VOLUME => ["$10.00", "$20.00", "$30.00"]
        ]
        .unwrap();

        let ranked = rank_vendors(df).unwrap();
        assert_eq!(ranked.height(), 1);
        assert_eq!(key_at(&ranked, VENDOR_NAME, 0), "A");
    }

    #[test]
    fn test_re_aggregate_scenario() {
        let df = df! [
            VENDOR_CATEGORY => ["M", "M"],
            VENDOR_NAME => ["Supreme Lending", "Other"],
            ASSOCIATE_NAME => ["X", "X"],
            CLOSED_VOLUME => ["200", "300"]
        ]
        .unwrap();

        let summary = re_aggregate(df, DEFAULT_TARGET_VENDOR, DEFAULT_TOP_N).unwrap();

        assert_eq!(summary.height(), 1);
        assert_eq!(key_at(&summary, ASSOCIATE_NAME, 0), "X");
        assert_eq!(volume_at(&summary, CLOSED_VOLUME, 0), 500.0);
        assert_eq!(volume_at(&summary, TARGET_VOLUME, 0), 200.0);
        assert_eq!(volume_at(&summary, TARGET_SHARE, 0), 0.4);
    }

    #[test]
    fn test_re_aggregate_truncates_to_top_n() {
        let df = df! [
            VENDOR_CATEGORY => ["M", "M", "M", "M"],
            VENDOR_NAME => ["Supreme Lending", "Supreme Lending", "Supreme Lending", "Other"],
            ASSOCIATE_NAME => ["A", "B", "C", "D"],
            CLOSED_VOLUME => ["300", "200", "100", "400"]
        ]
        .unwrap();

        let summary = re_aggregate(df, DEFAULT_TARGET_VENDOR, 2).unwrap();

        assert_eq!(summary.height(), 2);
        assert_eq!(key_at(&summary, ASSOCIATE_NAME, 0), "A");
        assert_eq!(key_at(&summary, ASSOCIATE_NAME, 1), "B");
    }

    #[test]
    fn test_re_aggregate_zero_total_share() {
        let df = df! [
            VENDOR_CATEGORY => ["M"],
            VENDOR_NAME => ["Other"],
            ASSOCIATE_NAME => ["X"],
            CLOSED_VOLUME => ["0"]
        ]
        .unwrap();

        let summary = re_aggregate(df, DEFAULT_TARGET_VENDOR, DEFAULT_TOP_N).unwrap();
        assert_eq!(volume_at(&summary, TARGET_SHARE, 0), 0.0);
    }

    #[test]
    fn test_re_aggregate_share_bounded_by_total() {
        let df = df! [
            VENDOR_CATEGORY => ["M", "M", "M"],
            VENDOR_NAME => ["Supreme Lending", "Other", "Supreme Lending"],
            ASSOCIATE_NAME => ["X", "X", "Y"],
            CLOSED_VOLUME => ["$1,000.00", "$3,000.00", "$500.00"]
        ]
        .unwrap();

        let summary = re_aggregate(df, DEFAULT_TARGET_VENDOR, DEFAULT_TOP_N).unwrap();
        for row in 0..summary.height() {
            let total = volume_at(&summary, CLOSED_VOLUME, row);
            let target = volume_at(&summary, TARGET_VOLUME, row);
            assert!(target >= 0.0 && target <= total);
        }
    }

    #[test]
    fn test_missing_volume_column() {
        let df = df! [
            VENDOR_CATEGORY => ["M"],
            VENDOR_NAME => ["A"]
        ]
        .unwrap();

        let err = rank_vendors(df).unwrap_err();
        assert!(matches!(err, DeepDiveError::MissingField(_)));
    }
}
