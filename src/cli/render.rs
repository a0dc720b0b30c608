use std::fmt::Write as _;

use crate::core::{
    BOOT_TAX_RATE, BootResult, Calculation, CostResult, FieldError, IdentificationResult,
    RuleResult,
};

/// `$1,234,567` for whole amounts, `$1,234.50` otherwise.
pub fn format_money(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round();
    let whole = (cents / 100.0).trunc();
    let frac = (cents - whole * 100.0) as u64;

    let digits = format!("{whole:.0}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if frac == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{frac:02}")
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

fn render_errors(out: &mut String, errors: &[FieldError]) {
    let _ = writeln!(out, "Please correct the following:");
    for e in errors {
        let _ = writeln!(out, "  - {}: {}", e.field, e.message);
    }
}

fn line(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<18}{value}");
}

pub fn render_boot(result: &BootResult) -> String {
    let mut out = String::new();
    if !result.is_valid() {
        render_errors(&mut out, result.errors());
        return out;
    }
    let _ = writeln!(out, "Boot calculation");
    line(&mut out, "Cash boot:", &format_money(result.cash_boot));
    line(&mut out, "Mortgage boot:", &format_money(result.mortgage_boot));
    line(&mut out, "Total boot:", &format_money(result.total_boot));
    line(
        &mut out,
        "Estimated tax:",
        &format!(
            "{} (illustrative {} rate)",
            format_money(result.estimated_tax),
            format_percent(BOOT_TAX_RATE * 100.0)
        ),
    );
    out
}

pub fn render_costs(result: &CostResult) -> String {
    let mut out = String::new();
    if !result.is_valid() {
        render_errors(&mut out, result.errors());
        return out;
    }
    let _ = writeln!(out, "Exchange cost estimate");
    line(&mut out, "QI fee:", &format_money(result.qi_fee));
    line(&mut out, "Escrow fee:", &format_money(result.escrow_fee));
    line(&mut out, "Title insurance:", &format_money(result.title_insurance));
    line(&mut out, "Recording fees:", &format_money(result.recording_fees));
    line(&mut out, "Total costs:", &format_money(result.total_costs));
    out
}

fn render_rule(out: &mut String, name: &str, rule: &RuleResult) {
    let status = if rule.satisfied { "satisfied" } else { "not satisfied" };
    match rule.percentage {
        Some(pct) => {
            let _ = writeln!(out, "  {name}: {status} ({})", format_percent(pct));
        }
        None => {
            let _ = writeln!(out, "  {name}: {status}");
        }
    }
    let _ = writeln!(out, "    {}", rule.message);
}

pub fn render_identification(result: &IdentificationResult) -> String {
    let mut out = String::new();
    if !result.is_valid() {
        render_errors(&mut out, result.errors());
        return out;
    }
    let _ = writeln!(out, "Identification rules");
    render_rule(&mut out, "3-property rule", &result.three_property_rule);
    render_rule(&mut out, "200% rule", &result.two_hundred_percent_rule);
    render_rule(&mut out, "95% rule", &result.ninety_five_percent_rule);
    let _ = writeln!(out, "{}", result.summary);
    out
}
