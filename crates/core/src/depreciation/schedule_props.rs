//! Property-based tests for DepreciationScheduler.
//!
//! These tests validate the depreciation ceiling: lifetime totals equal
//! the depreciable base exactly and no run accumulates past it.

use chrono::NaiveDate;
use proptest::prelude::*;

use tally_shared::types::{AssetId, Currency, Money, TenantId};

use crate::depreciation::schedule::{Asset, DepreciationMethod, DepreciationScheduler};

fn arb_asset() -> impl Strategy<Value = Asset> {
    (1_000i64..1_000_000_000i64, 1u32..30u32).prop_flat_map(|(cost_minor, years)| {
        (0i64..cost_minor).prop_map(move |salvage_minor| Asset {
            id: AssetId::new(),
            tenant_id: TenantId::new(),
            name: "Asset".to_string(),
            cost: Money::from_minor(cost_minor, Currency::Qar),
            salvage_value: Money::from_minor(salvage_minor, Currency::Qar),
            useful_life_years: years,
            method: DepreciationMethod::StraightLine,
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Lifetime depreciation equals cost minus salvage exactly.
    #[test]
    fn prop_schedule_sums_to_depreciable_base(asset in arb_asset()) {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let runs = DepreciationScheduler::monthly_schedule(&asset, start).unwrap();
        let base = asset.depreciable_base().unwrap();

        let total: i64 = runs.iter().map(|r| r.amount.minor_units()).sum();
        prop_assert_eq!(total, base.minor_units());
        prop_assert_eq!(
            runs.last().unwrap().accumulated_after.minor_units(),
            base.minor_units()
        );
    }

    /// No run accumulates past the base, and accumulated chains.
    #[test]
    fn prop_no_run_exceeds_cap(asset in arb_asset()) {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let runs = DepreciationScheduler::monthly_schedule(&asset, start).unwrap();
        let cap = asset.depreciable_base().unwrap().minor_units();

        let mut accumulated = 0i64;
        for run in &runs {
            prop_assert_eq!(run.accumulated_before.minor_units(), accumulated);
            accumulated += run.amount.minor_units();
            prop_assert_eq!(run.accumulated_after.minor_units(), accumulated);
            prop_assert!(accumulated <= cap);
        }
    }
}
