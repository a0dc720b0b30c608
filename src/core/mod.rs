mod boot;
mod costs;
mod identification;
pub mod input;
mod types;
mod validation;

pub use boot::{BOOT_TAX_RATE, compute_boot};
pub use costs::estimate_costs;
pub use identification::check_identification;
pub use types::{
    BootInputs, BootResult, Calculation, CostInputs, CostResult, DEFAULT_QI_FEE_PERCENTAGE,
    DEFAULT_RECORDING_FEES, DEFAULT_TITLE_INSURANCE_RATE, IdentificationInputs,
    IdentificationResult, RuleResult,
};
pub use validation::{FieldError, Validator};
