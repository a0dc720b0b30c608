/// Outcome of parsing one decimal text field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ParsedField {
    Blank,
    Invalid,
    Number(f64),
}

impl ParsedField {
    /// Applies an optional field's default. Blank and unparseable text both
    /// fall back to `default`; anything numeric (negative included) is kept so
    /// the validator can still reject it.
    pub fn or_default(self, default: f64) -> f64 {
        match self {
            ParsedField::Number(v) => v,
            ParsedField::Blank | ParsedField::Invalid => default,
        }
    }
}

/// Outcome of parsing one integer count field.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParsedCount {
    Blank,
    Invalid,
    Count(i64),
}

/// Drops everything except ASCII digits and `.`.
pub fn sanitize_decimal(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Drops everything except ASCII digits.
pub fn sanitize_count(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn parse_field(raw: &str) -> ParsedField {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedField::Blank;
    }
    // `f64::from_str` accepts "inf" and "NaN"; neither is a usable amount.
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => ParsedField::Number(v),
        _ => ParsedField::Invalid,
    }
}

pub fn parse_count(raw: &str) -> ParsedCount {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedCount::Blank;
    }
    match trimmed.parse::<i64>() {
        Ok(v) => ParsedCount::Count(v),
        Err(_) => ParsedCount::Invalid,
    }
}
