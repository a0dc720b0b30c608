use serde::Serialize;

use super::input::{sanitize_count, sanitize_decimal};
use super::validation::FieldError;

/// Raw text for the boot calculator, one entry per form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootInputs {
    pub relinquished_value: String,
    pub replacement_value: String,
    pub cash_received: String,
    pub old_mortgage_balance: String,
    pub new_mortgage_balance: String,
}

impl BootInputs {
    pub fn with_relinquished_value(mut self, raw: &str) -> Self {
        self.relinquished_value = sanitize_decimal(raw);
        self
    }

    pub fn with_replacement_value(mut self, raw: &str) -> Self {
        self.replacement_value = sanitize_decimal(raw);
        self
    }

    pub fn with_cash_received(mut self, raw: &str) -> Self {
        self.cash_received = sanitize_decimal(raw);
        self
    }

    pub fn with_old_mortgage_balance(mut self, raw: &str) -> Self {
        self.old_mortgage_balance = sanitize_decimal(raw);
        self
    }

    pub fn with_new_mortgage_balance(mut self, raw: &str) -> Self {
        self.new_mortgage_balance = sanitize_decimal(raw);
        self
    }
}

/// Raw text for the exchange cost estimator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostInputs {
    pub property_value: String,
    pub qi_fee_percentage: String,
    pub escrow_fee: String,
    pub title_insurance_rate: String,
    pub recording_fees: String,
}

pub const DEFAULT_QI_FEE_PERCENTAGE: &str = "1.0";
pub const DEFAULT_TITLE_INSURANCE_RATE: &str = "0.5";
pub const DEFAULT_RECORDING_FEES: &str = "500";

impl Default for CostInputs {
    fn default() -> Self {
        Self {
            property_value: String::new(),
            qi_fee_percentage: DEFAULT_QI_FEE_PERCENTAGE.to_string(),
            escrow_fee: String::new(),
            title_insurance_rate: DEFAULT_TITLE_INSURANCE_RATE.to_string(),
            recording_fees: DEFAULT_RECORDING_FEES.to_string(),
        }
    }
}

impl CostInputs {
    pub fn with_property_value(mut self, raw: &str) -> Self {
        self.property_value = sanitize_decimal(raw);
        self
    }

    pub fn with_qi_fee_percentage(mut self, raw: &str) -> Self {
        self.qi_fee_percentage = sanitize_decimal(raw);
        self
    }

    pub fn with_escrow_fee(mut self, raw: &str) -> Self {
        self.escrow_fee = sanitize_decimal(raw);
        self
    }

    pub fn with_title_insurance_rate(mut self, raw: &str) -> Self {
        self.title_insurance_rate = sanitize_decimal(raw);
        self
    }

    pub fn with_recording_fees(mut self, raw: &str) -> Self {
        self.recording_fees = sanitize_decimal(raw);
        self
    }
}

/// Raw text for the identification rules checker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentificationInputs {
    pub num_properties: String,
    pub total_identified_value: String,
    pub relinquished_value: String,
}

impl IdentificationInputs {
    pub fn with_num_properties(mut self, raw: &str) -> Self {
        self.num_properties = sanitize_count(raw);
        self
    }

    pub fn with_total_identified_value(mut self, raw: &str) -> Self {
        self.total_identified_value = sanitize_decimal(raw);
        self
    }

    pub fn with_relinquished_value(mut self, raw: &str) -> Self {
        self.relinquished_value = sanitize_decimal(raw);
        self
    }
}

/// Shared view over every calculator result.
pub trait Calculation {
    fn is_valid(&self) -> bool;
    fn errors(&self) -> &[FieldError];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootResult {
    pub cash_boot: f64,
    pub mortgage_boot: f64,
    pub total_boot: f64,
    pub estimated_tax: f64,
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

impl BootResult {
    pub fn invalid(errors: Vec<FieldError>) -> Self {
        Self {
            cash_boot: 0.0,
            mortgage_boot: 0.0,
            total_boot: 0.0,
            estimated_tax: 0.0,
            is_valid: false,
            errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostResult {
    pub qi_fee: f64,
    pub escrow_fee: f64,
    pub title_insurance: f64,
    pub recording_fees: f64,
    pub total_costs: f64,
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

impl CostResult {
    pub fn invalid(errors: Vec<FieldError>) -> Self {
        Self {
            qi_fee: 0.0,
            escrow_fee: 0.0,
            title_insurance: 0.0,
            recording_fees: 0.0,
            total_costs: 0.0,
            is_valid: false,
            errors,
        }
    }
}

/// Outcome of a single identification rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    pub satisfied: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl RuleResult {
    fn unevaluated(percentage: Option<f64>) -> Self {
        Self {
            satisfied: false,
            message: String::new(),
            percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationResult {
    pub three_property_rule: RuleResult,
    pub two_hundred_percent_rule: RuleResult,
    pub ninety_five_percent_rule: RuleResult,
    pub appears_to_comply: bool,
    pub summary: String,
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

impl IdentificationResult {
    pub fn invalid(errors: Vec<FieldError>) -> Self {
        Self {
            three_property_rule: RuleResult::unevaluated(None),
            two_hundred_percent_rule: RuleResult::unevaluated(Some(0.0)),
            ninety_five_percent_rule: RuleResult::unevaluated(Some(0.0)),
            appears_to_comply: false,
            summary: String::new(),
            is_valid: false,
            errors,
        }
    }
}

macro_rules! impl_calculation {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Calculation for $ty {
                fn is_valid(&self) -> bool {
                    self.is_valid
                }

                fn errors(&self) -> &[FieldError] {
                    &self.errors
                }
            }
        )+
    };
}

impl_calculation!(BootResult, CostResult, IdentificationResult);
