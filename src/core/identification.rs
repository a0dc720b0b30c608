use tracing::debug;

use super::input::{parse_count, parse_field};
use super::types::{IdentificationInputs, IdentificationResult, RuleResult};
use super::validation::Validator;

pub const MAX_PROPERTIES_WITHOUT_VALUE_LIMIT: u64 = 3;
/// Identified value may not exceed this multiple of the relinquished value.
pub const MAX_IDENTIFIED_RATIO: f64 = 2.0;
/// Share of identified value that must be acquired once the 200% limit is exceeded.
pub const MIN_ACQUIRED_RATIO: f64 = 0.95;

pub fn check_identification(inputs: &IdentificationInputs) -> IdentificationResult {
    let mut v = Validator::new();
    let num_properties = v.require_positive_count(
        "numProperties",
        "Number of properties",
        parse_count(&inputs.num_properties),
    );
    let total_identified = v.require_positive(
        "totalIdentifiedValue",
        "Total identified value",
        parse_field(&inputs.total_identified_value),
    );
    let relinquished = v.require_positive(
        "relinquishedValue",
        "Relinquished property value",
        parse_field(&inputs.relinquished_value),
    );

    if !v.is_clean() {
        let errors = v.finish();
        debug!(errors = errors.len(), "identification inputs rejected");
        return IdentificationResult::invalid(errors);
    }

    let ratio = total_identified / relinquished;
    let percentage = ratio * 100.0;

    let three_property_rule = three_property_rule(num_properties);
    let two_hundred_percent_rule =
        two_hundred_percent_rule(total_identified, relinquished, percentage);
    let ninety_five_percent_rule = ninety_five_percent_rule(ratio, percentage);

    let appears_to_comply = three_property_rule.satisfied || two_hundred_percent_rule.satisfied;
    let summary = if appears_to_comply {
        "Your identification appears to comply with at least one identification rule.".to_string()
    } else if ninety_five_percent_rule.satisfied {
        "Your identification exceeds both the 3-property and 200% limits. It is only valid if you acquire at least 95% of the total identified value.".to_string()
    } else {
        "Your identification does not satisfy the 3-property or 200% rule. Reduce the number or value of identified properties.".to_string()
    };

    debug!(num_properties, percentage, appears_to_comply, "identification checked");

    IdentificationResult {
        three_property_rule,
        two_hundred_percent_rule,
        ninety_five_percent_rule,
        appears_to_comply,
        summary,
        is_valid: true,
        errors: Vec::new(),
    }
}

fn three_property_rule(num_properties: u64) -> RuleResult {
    let satisfied = num_properties <= MAX_PROPERTIES_WITHOUT_VALUE_LIMIT;
    let message = if satisfied {
        format!(
            "You identified {num_properties} {}, which satisfies the 3-property rule regardless of value.",
            plural(num_properties)
        )
    } else {
        format!(
            "You identified {num_properties} properties. The 3-property rule allows at most {MAX_PROPERTIES_WITHOUT_VALUE_LIMIT}; rely on the 200% rule or reduce the number identified."
        )
    };
    RuleResult {
        satisfied,
        message,
        percentage: None,
    }
}

fn two_hundred_percent_rule(
    total_identified: f64,
    relinquished: f64,
    percentage: f64,
) -> RuleResult {
    let satisfied = total_identified <= MAX_IDENTIFIED_RATIO * relinquished;
    let message = if satisfied {
        format!(
            "Identified value is {percentage:.1}% of the relinquished value, within the 200% limit."
        )
    } else {
        format!(
            "Identified value is {percentage:.1}% of the relinquished value, exceeding the 200% limit. Reduce the total identified value to no more than twice the relinquished value."
        )
    };
    RuleResult {
        satisfied,
        message,
        percentage: Some(percentage),
    }
}

fn ninety_five_percent_rule(ratio: f64, percentage: f64) -> RuleResult {
    let satisfied = ratio >= MIN_ACQUIRED_RATIO;
    let message = if satisfied {
        format!(
            "Identified value is {percentage:.1}% of the relinquished value. Acquiring at least 95% of the identified value would satisfy the 95% rule."
        )
    } else {
        format!(
            "Identified value is {percentage:.1}% of the relinquished value, below the 95% threshold. Identify more value if relying on the 95% rule."
        )
    };
    RuleResult {
        satisfied,
        message,
        percentage: Some(percentage),
    }
}

fn plural(count: u64) -> &'static str {
    if count == 1 { "property" } else { "properties" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn inputs(num: &str, total: &str, relinquished: &str) -> IdentificationInputs {
        IdentificationInputs {
            num_properties: num.to_string(),
            total_identified_value: total.to_string(),
            relinquished_value: relinquished.to_string(),
        }
    }

    #[test]
    fn exactly_double_value_satisfies_two_hundred_percent_rule() {
        let result = check_identification(&inputs("5", "2000000", "1000000"));
        assert!(result.is_valid);
        assert!(!result.three_property_rule.satisfied);
        assert!(result.two_hundred_percent_rule.satisfied);
        assert!(result.ninety_five_percent_rule.satisfied);
        assert!(result.appears_to_comply);
        assert_approx(result.two_hundred_percent_rule.percentage.unwrap_or_default(), 200.0);
        assert!(
            result
                .two_hundred_percent_rule
                .message
                .contains("200.0%")
        );
    }

    #[test]
    fn three_properties_pass_and_four_fail_regardless_of_value() {
        let three = check_identification(&inputs("3", "9000000", "1000000"));
        assert!(three.three_property_rule.satisfied);
        assert!(!three.two_hundred_percent_rule.satisfied);
        assert!(three.appears_to_comply);
        assert_eq!(three.three_property_rule.percentage, None);

        let four = check_identification(&inputs("4", "9000000", "1000000"));
        assert!(!four.three_property_rule.satisfied);
        assert!(!four.two_hundred_percent_rule.satisfied);
        assert!(!four.appears_to_comply);
    }

    #[test]
    fn ninety_five_percent_boundary_is_inclusive() {
        let result = check_identification(&inputs("6", "950000", "1000000"));
        assert!(result.ninety_five_percent_rule.satisfied);

        let below = check_identification(&inputs("6", "949999", "1000000"));
        assert!(!below.ninety_five_percent_rule.satisfied);
    }

    #[test]
    fn ninety_five_percent_alone_does_not_establish_compliance() {
        let result = check_identification(&inputs("8", "3000000", "1000000"));
        assert!(result.ninety_five_percent_rule.satisfied);
        assert!(!result.appears_to_comply);
        assert!(result.summary.contains("95%"));
    }

    #[test]
    fn messages_switch_between_affirmative_and_corrective() {
        let ok = check_identification(&inputs("1", "500000", "1000000"));
        assert!(ok.three_property_rule.message.contains("1 property,"));
        assert!(ok.two_hundred_percent_rule.message.contains("within"));
        assert!(ok.ninety_five_percent_rule.message.contains("below"));

        let bad = check_identification(&inputs("10", "2500000", "1000000"));
        assert!(bad.three_property_rule.message.contains("at most 3"));
        assert!(bad.two_hundred_percent_rule.message.contains("exceeding"));
    }

    #[test]
    fn invalid_inputs_produce_zeroed_rules_and_every_error() {
        let result = check_identification(&inputs("2.5", "", "-5"));
        assert!(!result.is_valid);
        let fields: Vec<_> = result.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["numProperties", "totalIdentifiedValue", "relinquishedValue"]
        );
        assert!(!result.appears_to_comply);
        assert_eq!(result.two_hundred_percent_rule.percentage, Some(0.0));
        assert!(!result.ninety_five_percent_rule.satisfied);
    }

    #[test]
    fn zero_properties_is_rejected() {
        let result = check_identification(&inputs("0", "100", "100"));
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].field, "numProperties");
    }

    #[test]
    fn sanitized_count_accepts_surrounding_text() {
        let built = IdentificationInputs::default()
            .with_num_properties("3 homes")
            .with_total_identified_value("$1,500,000")
            .with_relinquished_value("$1,000,000");
        let result = check_identification(&built);
        assert!(result.is_valid);
        assert!(result.three_property_rule.satisfied);
        assert_approx(result.ninety_five_percent_rule.percentage.unwrap_or_default(), 150.0);
    }

    proptest! {
        #[test]
        fn three_property_rule_ignores_value(
            count in 1u32..50,
            total in 1u32..100_000_000,
            relinquished in 1u32..100_000_000,
        ) {
            let result = check_identification(&inputs(
                &count.to_string(),
                &total.to_string(),
                &relinquished.to_string(),
            ));
            prop_assert!(result.is_valid);
            prop_assert_eq!(result.three_property_rule.satisfied, count <= 3);
            prop_assert_eq!(
                result.two_hundred_percent_rule.satisfied,
                u64::from(total) <= 2 * u64::from(relinquished)
            );
            prop_assert_eq!(
                result.appears_to_comply,
                result.three_property_rule.satisfied || result.two_hundred_percent_rule.satisfied
            );
        }
    }
}
