mod render;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::core::{
    BootInputs, Calculation, CostInputs, DEFAULT_QI_FEE_PERCENTAGE, DEFAULT_RECORDING_FEES,
    DEFAULT_TITLE_INSURANCE_RATE, IdentificationInputs, check_identification, compute_boot,
    estimate_costs,
};
use crate::error::CliError;

pub use render::{format_money, format_percent};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "exchange-calc",
    version,
    about = "Like-kind exchange calculators: boot, transaction costs and identification rules"
)]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(
        long,
        global = true,
        help = "Validate field text as given instead of stripping non-numeric characters"
    )]
    pub strict: bool,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase log verbosity (-v info, -vv debug); RUST_LOG overrides"
    )]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Cash and mortgage-relief boot with an illustrative tax estimate
    Boot(BootArgs),
    /// Roll up intermediary, escrow, title and recording costs
    Costs(CostArgs),
    /// Check an identification against the 3-property, 200% and 95% rules
    Identify(IdentifyArgs),
}

#[derive(Args, Debug)]
pub struct BootArgs {
    #[arg(long, help = "Read a camelCase JSON payload from a file, or '-' for stdin")]
    pub input: Option<PathBuf>,
    #[arg(long, required_unless_present = "input", allow_hyphen_values = true)]
    pub relinquished_value: Option<String>,
    #[arg(long, required_unless_present = "input", allow_hyphen_values = true)]
    pub replacement_value: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub cash_received: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub old_mortgage_balance: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub new_mortgage_balance: Option<String>,
}

#[derive(Args, Debug)]
pub struct CostArgs {
    #[arg(long, help = "Read a camelCase JSON payload from a file, or '-' for stdin")]
    pub input: Option<PathBuf>,
    #[arg(long, required_unless_present = "input", allow_hyphen_values = true)]
    pub property_value: Option<String>,
    #[arg(long, default_value = DEFAULT_QI_FEE_PERCENTAGE, allow_hyphen_values = true)]
    pub qi_fee_percentage: String,
    #[arg(long, allow_hyphen_values = true)]
    pub escrow_fee: Option<String>,
    #[arg(long, default_value = DEFAULT_TITLE_INSURANCE_RATE, allow_hyphen_values = true)]
    pub title_insurance_rate: String,
    #[arg(long, default_value = DEFAULT_RECORDING_FEES, allow_hyphen_values = true)]
    pub recording_fees: String,
}

#[derive(Args, Debug)]
pub struct IdentifyArgs {
    #[arg(long, help = "Read a camelCase JSON payload from a file, or '-' for stdin")]
    pub input: Option<PathBuf>,
    #[arg(long, required_unless_present = "input", allow_hyphen_values = true)]
    pub num_properties: Option<String>,
    #[arg(long, required_unless_present = "input", allow_hyphen_values = true)]
    pub total_identified_value: Option<String>,
    #[arg(long, required_unless_present = "input", allow_hyphen_values = true)]
    pub relinquished_value: Option<String>,
}

/// A payload value may arrive as a JSON string or a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FieldText {
    Text(String),
    Number(serde_json::Number),
}

impl FieldText {
    fn into_text(self) -> String {
        match self {
            FieldText::Text(s) => s,
            FieldText::Number(n) => n.to_string(),
        }
    }
}

fn blank() -> FieldText {
    FieldText::Text(String::new())
}

fn default_qi_fee_percentage() -> FieldText {
    FieldText::Text(DEFAULT_QI_FEE_PERCENTAGE.to_string())
}

fn default_title_insurance_rate() -> FieldText {
    FieldText::Text(DEFAULT_TITLE_INSURANCE_RATE.to_string())
}

fn default_recording_fees() -> FieldText {
    FieldText::Text(DEFAULT_RECORDING_FEES.to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BootPayload {
    relinquished_value: FieldText,
    replacement_value: FieldText,
    #[serde(default = "blank")]
    cash_received: FieldText,
    #[serde(default = "blank")]
    old_mortgage_balance: FieldText,
    #[serde(default = "blank")]
    new_mortgage_balance: FieldText,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CostPayload {
    property_value: FieldText,
    #[serde(default = "default_qi_fee_percentage")]
    qi_fee_percentage: FieldText,
    #[serde(default = "blank")]
    escrow_fee: FieldText,
    #[serde(default = "default_title_insurance_rate")]
    title_insurance_rate: FieldText,
    #[serde(default = "default_recording_fees")]
    recording_fees: FieldText,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct IdentificationPayload {
    num_properties: FieldText,
    total_identified_value: FieldText,
    relinquished_value: FieldText,
}

#[derive(Debug, Serialize)]
struct TaggedResult<'a, T: Serialize> {
    calculator: &'static str,
    #[serde(flatten)]
    result: &'a T,
}

/// What the binary prints and how it exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub valid: bool,
}

pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<Outcome, CliError> {
    let strict = cli.strict;
    let format = cli.format;
    match cli.command {
        Command::Boot(args) => {
            let inputs = boot_inputs_from_args(args, strict)?;
            info!("running boot calculator");
            let result = compute_boot(&inputs);
            finish("boot", format, &result, render::render_boot)
        }
        Command::Costs(args) => {
            let inputs = cost_inputs_from_args(args, strict)?;
            info!("running exchange cost estimator");
            let result = estimate_costs(&inputs);
            finish("costs", format, &result, render::render_costs)
        }
        Command::Identify(args) => {
            let inputs = identification_inputs_from_args(args, strict)?;
            info!("running identification rules checker");
            let result = check_identification(&inputs);
            finish("identify", format, &result, render::render_identification)
        }
    }
}

fn finish<T: Calculation + Serialize>(
    calculator: &'static str,
    format: OutputFormat,
    result: &T,
    render_text: fn(&T) -> String,
) -> Result<Outcome, CliError> {
    let output = match format {
        OutputFormat::Text => render_text(result),
        OutputFormat::Json => {
            let tagged = TaggedResult { calculator, result };
            let mut json = serde_json::to_string_pretty(&tagged)
                .map_err(|source| CliError::Serialize { calculator, source })?;
            json.push('\n');
            json
        }
    };
    if !result.is_valid() {
        debug!(calculator, errors = result.errors().len(), "validation failed");
    }
    Ok(Outcome {
        output,
        valid: result.is_valid(),
    })
}

fn read_payload(path: &Path) -> Result<String, CliError> {
    let read = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        std::fs::read_to_string(path)
    };
    read.map_err(|source| CliError::ReadPayload {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_payload<T: for<'de> Deserialize<'de>>(
    calculator: &'static str,
    json: &str,
) -> Result<T, CliError> {
    serde_json::from_str::<T>(json).map_err(|source| CliError::Payload { calculator, source })
}

/// Stores a field either verbatim or through the input set's sanitizing setter.
fn store<I>(
    inputs: I,
    strict: bool,
    raw: String,
    raw_slot: fn(&mut I, String),
    sanitized: fn(I, &str) -> I,
) -> I {
    if strict {
        let mut inputs = inputs;
        raw_slot(&mut inputs, raw);
        inputs
    } else {
        sanitized(inputs, &raw)
    }
}

fn boot_inputs_from_payload(payload: BootPayload, strict: bool) -> BootInputs {
    let inputs = BootInputs::default();
    let inputs = store(
        inputs,
        strict,
        payload.relinquished_value.into_text(),
        |i, v| i.relinquished_value = v,
        BootInputs::with_relinquished_value,
    );
    let inputs = store(
        inputs,
        strict,
        payload.replacement_value.into_text(),
        |i, v| i.replacement_value = v,
        BootInputs::with_replacement_value,
    );
    let inputs = store(
        inputs,
        strict,
        payload.cash_received.into_text(),
        |i, v| i.cash_received = v,
        BootInputs::with_cash_received,
    );
    let inputs = store(
        inputs,
        strict,
        payload.old_mortgage_balance.into_text(),
        |i, v| i.old_mortgage_balance = v,
        BootInputs::with_old_mortgage_balance,
    );
    store(
        inputs,
        strict,
        payload.new_mortgage_balance.into_text(),
        |i, v| i.new_mortgage_balance = v,
        BootInputs::with_new_mortgage_balance,
    )
}

fn cost_inputs_from_payload(payload: CostPayload, strict: bool) -> CostInputs {
    let inputs = CostInputs::default();
    let inputs = store(
        inputs,
        strict,
        payload.property_value.into_text(),
        |i, v| i.property_value = v,
        CostInputs::with_property_value,
    );
    let inputs = store(
        inputs,
        strict,
        payload.qi_fee_percentage.into_text(),
        |i, v| i.qi_fee_percentage = v,
        CostInputs::with_qi_fee_percentage,
    );
    let inputs = store(
        inputs,
        strict,
        payload.escrow_fee.into_text(),
        |i, v| i.escrow_fee = v,
        CostInputs::with_escrow_fee,
    );
    let inputs = store(
        inputs,
        strict,
        payload.title_insurance_rate.into_text(),
        |i, v| i.title_insurance_rate = v,
        CostInputs::with_title_insurance_rate,
    );
    store(
        inputs,
        strict,
        payload.recording_fees.into_text(),
        |i, v| i.recording_fees = v,
        CostInputs::with_recording_fees,
    )
}

fn identification_inputs_from_payload(
    payload: IdentificationPayload,
    strict: bool,
) -> IdentificationInputs {
    let inputs = IdentificationInputs::default();
    let inputs = store(
        inputs,
        strict,
        payload.num_properties.into_text(),
        |i, v| i.num_properties = v,
        IdentificationInputs::with_num_properties,
    );
    let inputs = store(
        inputs,
        strict,
        payload.total_identified_value.into_text(),
        |i, v| i.total_identified_value = v,
        IdentificationInputs::with_total_identified_value,
    );
    store(
        inputs,
        strict,
        payload.relinquished_value.into_text(),
        |i, v| i.relinquished_value = v,
        IdentificationInputs::with_relinquished_value,
    )
}

fn boot_inputs_from_args(args: BootArgs, strict: bool) -> Result<BootInputs, CliError> {
    let payload = match args.input {
        Some(path) => parse_payload("boot", &read_payload(&path)?)?,
        None => BootPayload {
            relinquished_value: FieldText::Text(args.relinquished_value.unwrap_or_default()),
            replacement_value: FieldText::Text(args.replacement_value.unwrap_or_default()),
            cash_received: FieldText::Text(args.cash_received.unwrap_or_default()),
            old_mortgage_balance: FieldText::Text(args.old_mortgage_balance.unwrap_or_default()),
            new_mortgage_balance: FieldText::Text(args.new_mortgage_balance.unwrap_or_default()),
        },
    };
    Ok(boot_inputs_from_payload(payload, strict))
}

fn cost_inputs_from_args(args: CostArgs, strict: bool) -> Result<CostInputs, CliError> {
    let payload = match args.input {
        Some(path) => parse_payload("costs", &read_payload(&path)?)?,
        None => CostPayload {
            property_value: FieldText::Text(args.property_value.unwrap_or_default()),
            qi_fee_percentage: FieldText::Text(args.qi_fee_percentage),
            escrow_fee: FieldText::Text(args.escrow_fee.unwrap_or_default()),
            title_insurance_rate: FieldText::Text(args.title_insurance_rate),
            recording_fees: FieldText::Text(args.recording_fees),
        },
    };
    Ok(cost_inputs_from_payload(payload, strict))
}

fn identification_inputs_from_args(
    args: IdentifyArgs,
    strict: bool,
) -> Result<IdentificationInputs, CliError> {
    let payload = match args.input {
        Some(path) => parse_payload("identify", &read_payload(&path)?)?,
        None => IdentificationPayload {
            num_properties: FieldText::Text(args.num_properties.unwrap_or_default()),
            total_identified_value: FieldText::Text(args.total_identified_value.unwrap_or_default()),
            relinquished_value: FieldText::Text(args.relinquished_value.unwrap_or_default()),
        },
    };
    Ok(identification_inputs_from_payload(payload, strict))
}
