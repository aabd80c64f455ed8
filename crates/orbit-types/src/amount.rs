//! Token amount conversion between base units and display strings.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid amount: {0}")]
    Invalid(String),

    #[error("too many decimal places (max {0})")]
    TooManyDecimals(u32),

    #[error("amount overflows")]
    Overflow,
}

fn pow10(decimals: u32) -> Result<u128, AmountError> {
    10u128.checked_pow(decimals).ok_or(AmountError::Overflow)
}

/// Format base units with `decimals` places, trimming trailing zeros.
///
/// `format_amount(1_500_000_000_000_000_000, 18) == "1.5"`.
pub fn format_amount(base_units: u128, decimals: u32) -> String {
    let Ok(unit) = pow10(decimals) else {
        return base_units.to_string();
    };
    let whole = base_units / unit;
    let frac = base_units % unit;
    if frac == 0 || decimals == 0 {
        return whole.to_string();
    }
    let frac_str = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, frac_str.trim_end_matches('0'))
}

/// Parse a display amount such as `"1.5"` or `".001"` into base units.
pub fn parse_amount(s: &str, decimals: u32) -> Result<u128, AmountError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole_str, frac_str) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(AmountError::Invalid(s.to_string()));
    }
    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole_str) || !all_digits(frac_str) {
        return Err(AmountError::Invalid(s.to_string()));
    }
    if frac_str.len() > decimals as usize {
        return Err(AmountError::TooManyDecimals(decimals));
    }

    let whole: u128 = if whole_str.is_empty() {
        0
    } else {
        whole_str.parse().map_err(|_| AmountError::Overflow)?
    };
    let frac: u128 = if frac_str.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac_str, width = decimals as usize);
        padded.parse().map_err(|_| AmountError::Overflow)?
    };

    whole
        .checked_mul(pow10(decimals)?)
        .and_then(|w| w.checked_add(frac))
        .ok_or(AmountError::Overflow)
}

/// Hex encoding of an integer with an even number of digits, as required
/// by smart-contract call arguments. Zero encodes as `"00"`.
pub fn to_even_hex(value: u128) -> String {
    let hex = format!("{:x}", value);
    if hex.len() % 2 == 1 {
        format!("0{}", hex)
    } else {
        hex
    }
}
