//! Input masking
//!
//! Keystroke formatters for the registration form. Digit masks strip
//! everything that is not a digit, truncate to the mask capacity and
//! re-insert the literal separators; numeric masks parse the cleaned
//! pt-BR number and re-render it with two decimal places and thousands
//! grouping. `unmask` recovers the raw value and is a left inverse of
//! `apply` for complete inputs.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mask types supported by the form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskType {
    Cpf,
    Cnpj,
    Phone,
    Date,
    Cep,
    Currency,
    Percent,
    Number,
}

/// Result of a caret-preserving mask application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Masked {
    pub text: String,
    /// Caret position as a character offset into `text`.
    pub caret: usize,
}

/// Apply a mask to raw input, producing the display string.
pub fn apply(value: &str, mask: MaskType) -> String {
    if value.is_empty() {
        return String::new();
    }
    match mask {
        MaskType::Cpf => mask_digits(value, 11, &[(3, '.'), (6, '.'), (9, '-')]),
        MaskType::Cnpj => mask_digits(value, 14, &[(2, '.'), (5, '.'), (8, '/'), (12, '-')]),
        MaskType::Date => mask_digits(value, 8, &[(2, '/'), (4, '/')]),
        MaskType::Cep => mask_digits(value, 8, &[(5, '-')]),
        MaskType::Phone => mask_phone(value),
        MaskType::Currency => mask_decimal(value, "R$ ", ""),
        MaskType::Percent => mask_decimal(value, "", "%"),
        MaskType::Number => mask_decimal(value, "", ""),
    }
}

/// Remove a mask, recovering the raw value: the digit string for digit
/// masks, the canonical `1234.56` form for numeric masks.
pub fn unmask(value: &str, mask: MaskType) -> String {
    match mask {
        MaskType::Cpf | MaskType::Cnpj | MaskType::Phone | MaskType::Date | MaskType::Cep => {
            value.chars().filter(char::is_ascii_digit).collect()
        }
        MaskType::Currency | MaskType::Percent | MaskType::Number => {
            if value.trim().is_empty() {
                String::new()
            } else {
                format!("{:.2}", parse_pt_br_decimal(value))
            }
        }
    }
}

/// Numeric value of a currency/percent/number field.
pub fn decimal_value(value: &str) -> Decimal {
    parse_pt_br_decimal(value)
}

/// Apply a mask while keeping the visual caret anchored.
///
/// The caret is re-placed after the same number of significant
/// (non-separator) characters it had behind it before the reformat, so it
/// never jumps to the end of the field mid-edit.
pub fn apply_with_caret(value: &str, caret: usize, mask: MaskType) -> Masked {
    let caret = caret.min(value.chars().count());
    let significant_before = value
        .chars()
        .take(caret)
        .filter(|c| c.is_ascii_digit())
        .count();

    let text = apply(value, mask);

    let mut new_caret = 0;
    let mut seen = 0;
    for (i, ch) in text.chars().enumerate() {
        if seen == significant_before {
            break;
        }
        if ch.is_ascii_digit() {
            seen += 1;
        }
        new_caret = i + 1;
    }
    if significant_before == 0 {
        new_caret = 0;
    }

    Masked { text, caret: new_caret }
}

/// Generic fixed-separator digit mask: `breaks` lists, for each separator,
/// the count of digits that precede it.
fn mask_digits(value: &str, capacity: usize, breaks: &[(usize, char)]) -> String {
    let digits: String = value
        .chars()
        .filter(char::is_ascii_digit)
        .take(capacity)
        .collect();

    let mut out = String::with_capacity(capacity + breaks.len());
    for (i, ch) in digits.chars().enumerate() {
        for &(at, sep) in breaks {
            if i == at {
                out.push(sep);
            }
        }
        out.push(ch);
    }
    out
}

/// Phone mask: `(XX) XXXXX-XXXX` for 11-digit mobiles, `(XX) XXXX-XXXX`
/// for 10-digit landlines; partial input keeps whatever prefix applies.
fn mask_phone(value: &str) -> String {
    let digits: String = value
        .chars()
        .filter(char::is_ascii_digit)
        .take(11)
        .collect();

    if digits.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(16);
    out.push('(');
    out.push_str(&digits[..digits.len().min(2)]);
    if digits.len() > 2 {
        out.push_str(") ");
        let rest = &digits[2..];
        // Hyphen after 5 digits for mobiles, 4 for landlines
        let split = if digits.len() > 10 { 5 } else { 4 };
        if rest.len() > split {
            out.push_str(&rest[..split]);
            out.push('-');
            out.push_str(&rest[split..]);
        } else {
            out.push_str(rest);
        }
    }
    out
}

/// Parse a pt-BR formatted number (`1.234,56`) or a plain decimal
/// (`1234.56`) into a `Decimal`. Unparseable input yields zero, matching
/// the form's behavior of normalizing junk to `0,00` on blur.
fn parse_pt_br_decimal(value: &str) -> Decimal {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.' || *c == '-')
        .collect();

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

fn mask_decimal(value: &str, prefix: &str, suffix: &str) -> String {
    format!(
        "{}{}{}",
        prefix,
        format_grouped(parse_pt_br_decimal(value)),
        suffix
    )
}

/// Render a decimal with pt-BR grouping: thousands `.`, decimal `,`,
/// always two fraction digits.
fn format_grouped(value: Decimal) -> String {
    let plain = format!("{:.2}", value.round_dp(2));
    let (negative, plain) = match plain.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, plain.as_str()),
    };
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}")
}
