use tracing::debug;

use super::input::parse_field;
use super::types::{BootInputs, BootResult};
use super::validation::Validator;

/// Flat illustrative rate applied to total boot. Not a real tax computation.
pub const BOOT_TAX_RATE: f64 = 0.20;

pub fn compute_boot(inputs: &BootInputs) -> BootResult {
    let mut v = Validator::new();
    let _relinquished = v.require_positive(
        "relinquishedValue",
        "Relinquished property value",
        parse_field(&inputs.relinquished_value),
    );
    let _replacement = v.require_positive(
        "replacementValue",
        "Replacement property value",
        parse_field(&inputs.replacement_value),
    );
    let cash_received = v.require_non_negative(
        "cashReceived",
        "Cash received",
        parse_field(&inputs.cash_received),
        0.0,
    );
    let old_mortgage = v.require_non_negative(
        "oldMortgageBalance",
        "Old mortgage balance",
        parse_field(&inputs.old_mortgage_balance),
        0.0,
    );
    let new_mortgage = v.require_non_negative(
        "newMortgageBalance",
        "New mortgage balance",
        parse_field(&inputs.new_mortgage_balance),
        0.0,
    );

    if !v.is_clean() {
        let errors = v.finish();
        debug!(errors = errors.len(), "boot inputs rejected");
        return BootResult::invalid(errors);
    }

    let cash_boot = cash_received.max(0.0);
    // Debt relief only counts when the new loan does not replace the old one.
    let mortgage_boot = (old_mortgage - new_mortgage).max(0.0);
    let total_boot = cash_boot + mortgage_boot;
    let estimated_tax = total_boot * BOOT_TAX_RATE;

    debug!(cash_boot, mortgage_boot, total_boot, "boot computed");

    BootResult {
        cash_boot,
        mortgage_boot,
        total_boot,
        estimated_tax,
        is_valid: true,
        errors: Vec::new(),
    }
}
