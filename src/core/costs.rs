use tracing::debug;

use super::input::parse_field;
use super::types::{CostInputs, CostResult};
use super::validation::Validator;

pub fn estimate_costs(inputs: &CostInputs) -> CostResult {
    let mut v = Validator::new();
    let property_value = v.require_positive(
        "propertyValue",
        "Property value",
        parse_field(&inputs.property_value),
    );
    let qi_fee_percentage = v.require_percentage(
        "qiFeePercentage",
        "QI fee percentage",
        parse_field(&inputs.qi_fee_percentage),
    );
    let escrow_fee = v.require_non_negative(
        "escrowFee",
        "Escrow fee",
        parse_field(&inputs.escrow_fee),
        0.0,
    );
    let title_insurance_rate = v.require_percentage(
        "titleInsuranceRate",
        "Title insurance rate",
        parse_field(&inputs.title_insurance_rate),
    );
    let recording_fees = v.require_non_negative(
        "recordingFees",
        "Recording fees",
        parse_field(&inputs.recording_fees),
        0.0,
    );

    if !v.is_clean() {
        let errors = v.finish();
        debug!(errors = errors.len(), "cost inputs rejected");
        return CostResult::invalid(errors);
    }

    let qi_fee = property_value * (qi_fee_percentage / 100.0);
    let title_insurance = property_value * (title_insurance_rate / 100.0);
    let total_costs = qi_fee + escrow_fee + title_insurance + recording_fees;

    debug!(total_costs, "exchange costs estimated");

    CostResult {
        qi_fee,
        escrow_fee,
        title_insurance,
        recording_fees,
        total_costs,
        is_valid: true,
        errors: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_inputs() -> CostInputs {
        CostInputs {
            property_value: "1000000".to_string(),
            qi_fee_percentage: "1.0".to_string(),
            escrow_fee: "1500".to_string(),
            title_insurance_rate: "0.5".to_string(),
            recording_fees: "500".to_string(),
        }
    }

    #[test]
    fn rolls_up_all_cost_components() {
        let result = estimate_costs(&sample_inputs());
        assert!(result.is_valid);
        assert_approx(result.qi_fee, 10_000.0);
        assert_approx(result.escrow_fee, 1_500.0);
        assert_approx(result.title_insurance, 5_000.0);
        assert_approx(result.recording_fees, 500.0);
        assert_approx(result.total_costs, 17_000.0);
    }

    #[test]
    fn defaults_only_need_a_property_value() {
        let inputs = CostInputs::default().with_property_value("$2,000,000");
        let result = estimate_costs(&inputs);
        assert!(result.is_valid);
        assert_approx(result.qi_fee, 20_000.0);
        assert_approx(result.escrow_fee, 0.0);
        assert_approx(result.title_insurance, 10_000.0);
        assert_approx(result.recording_fees, 500.0);
        assert_approx(result.total_costs, 30_500.0);
    }

    #[test]
    fn blank_recording_fees_count_as_zero() {
        let mut inputs = sample_inputs();
        inputs.recording_fees = String::new();
        let result = estimate_costs(&inputs);
        assert!(result.is_valid);
        assert_approx(result.recording_fees, 0.0);
        assert_approx(result.total_costs, 16_500.0);
    }

    #[test]
    fn percentages_outside_range_are_rejected() {
        let mut inputs = sample_inputs();
        inputs.qi_fee_percentage = "100.5".to_string();
        inputs.title_insurance_rate = "-1".to_string();
        let result = estimate_costs(&inputs);
        assert!(!result.is_valid);
        let fields: Vec<_> = result.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["qiFeePercentage", "titleInsuranceRate"]);
        assert_approx(result.total_costs, 0.0);
        assert_approx(result.qi_fee, 0.0);
    }

    #[test]
    fn blank_required_percentage_is_rejected() {
        let mut inputs = sample_inputs();
        inputs.title_insurance_rate = String::new();
        let result = estimate_costs(&inputs);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].field, "titleInsuranceRate");
    }

    #[test]
    fn negative_fees_and_property_value_are_rejected() {
        let mut inputs = sample_inputs();
        inputs.property_value = "-5".to_string();
        inputs.escrow_fee = "-100".to_string();
        inputs.recording_fees = "-1".to_string();
        let result = estimate_costs(&inputs);
        assert_eq!(result, CostResult::invalid(result.errors.clone()));
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.errors[0].field, "propertyValue");
    }

    #[test]
    fn zero_percent_rates_are_allowed() {
        let mut inputs = sample_inputs();
        inputs.qi_fee_percentage = "0".to_string();
        inputs.title_insurance_rate = "0".to_string();
        let result = estimate_costs(&inputs);
        assert!(result.is_valid);
        assert_approx(result.total_costs, 2_000.0);
    }

    proptest! {
        #[test]
        fn total_is_sum_and_rate_fees_scale_linearly(
            value in 1u32..50_000_000,
            qi_bps in 0u32..=10_000,
            title_bps in 0u32..=10_000,
            escrow in 0u32..100_000,
            recording in 0u32..10_000,
        ) {
            let inputs = CostInputs {
                property_value: value.to_string(),
                qi_fee_percentage: format!("{}", f64::from(qi_bps) / 100.0),
                escrow_fee: escrow.to_string(),
                title_insurance_rate: format!("{}", f64::from(title_bps) / 100.0),
                recording_fees: recording.to_string(),
            };
            let single = estimate_costs(&inputs);
            prop_assert!(single.is_valid);
            let sum = single.qi_fee + single.escrow_fee + single.title_insurance + single.recording_fees;
            prop_assert!((single.total_costs - sum).abs() <= EPS);

            let doubled = estimate_costs(&CostInputs {
                property_value: (u64::from(value) * 2).to_string(),
                ..inputs
            });
            prop_assert!((doubled.qi_fee - 2.0 * single.qi_fee).abs() <= EPS);
            prop_assert!((doubled.title_insurance - 2.0 * single.title_insurance).abs() <= EPS);
        }
    }
}
