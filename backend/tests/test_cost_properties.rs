//! Property tests for the aggregation invariants

use erp_hidden_costs_core_rs::costs::{keys, CostCategory};
use erp_hidden_costs_core_rs::{CompanyProfile, CostCalculator, ParameterSet};
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
}

/// Random values for every known parameter
fn parameter_set() -> impl Strategy<Value = ParameterSet> {
    prop::collection::vec(-1_000.0f64..100_000.0, keys::ALL.len()).prop_map(|values| {
        keys::ALL
            .iter()
            .zip(values)
            .map(|((key, _), value)| (*key, value))
            .collect()
    })
}

fn company(revenue: f64) -> CompanyProfile {
    CompanyProfile::new("Prop", "Services", "Moyenne", revenue, 10).unwrap()
}

proptest! {
    #[test]
    fn category_total_is_sum_of_lines(params in parameter_set()) {
        let calculator = CostCalculator::new();
        for category in CostCategory::ALL {
            let outcome = calculator.calculate_category(category, &params);
            let breakdown = outcome.breakdown().unwrap();
            let sum: f64 = breakdown.lines().iter().map(|(_, item)| item.value).sum();
            prop_assert!(close(outcome.total(), sum));
            prop_assert_eq!(breakdown.lines().len(), 4);
        }
    }

    #[test]
    fn grand_total_is_sum_of_categories(params in parameter_set(), revenue in 1.0f64..1e9) {
        let report = CostCalculator::new().calculate_total_costs(&company(revenue), &params);
        let sum = report.errors().total() + report.resistance().total() + report.unforeseen().total();
        prop_assert!(close(report.total_general(), sum));
        prop_assert!(close(report.revenue_percentage(), report.total_general() / revenue * 100.0));
    }

    #[test]
    fn no_overrun_means_no_planning_cost(params in parameter_set(), slack in 0.0f64..24.0) {
        let actual = params.get(keys::DELAI_REEL_MOIS).unwrap();
        let params = params.with(keys::DELAI_PREVUE_MOIS.0, actual + slack);

        let outcome = CostCalculator::new().calculate_error_costs(&params);
        let planning = outcome.breakdown().unwrap().line("erreurs_planification").unwrap().value;
        prop_assert_eq!(planning, 0.0);
    }

    #[test]
    fn error_only_parameter_leaves_other_categories(params in parameter_set(), bump in 1.0f64..1_000.0) {
        let calculator = CostCalculator::new();
        let hours = params.get(keys::HEURES_CORRECTION).unwrap();
        let bumped = params.clone().with(keys::HEURES_CORRECTION.0, hours + bump);

        prop_assert_eq!(
            calculator.calculate_resistance_costs(&params),
            calculator.calculate_resistance_costs(&bumped)
        );
        prop_assert_eq!(
            calculator.calculate_unforeseen_costs(&params),
            calculator.calculate_unforeseen_costs(&bumped)
        );
    }

    #[test]
    fn degraded_category_contributes_zero(params in parameter_set(), revenue in 1.0f64..1e9) {
        let mut broken = params.clone();
        broken.set_raw("heures_retravail", serde_json::Value::Null);

        let calculator = CostCalculator::new();
        let full = calculator.calculate_total_costs(&company(revenue), &params);
        let degraded = calculator.calculate_total_costs(&company(revenue), &broken);

        prop_assert!(degraded.unforeseen().is_degraded());
        prop_assert!(close(
            degraded.total_general(),
            full.errors().total() + full.resistance().total()
        ));
    }
}
