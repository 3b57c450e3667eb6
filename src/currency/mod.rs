//! Brazilian Real formatting for estimates shown to clients.

pub const BRL_SYMBOL: &str = "R$";

const DECIMAL_SEPARATOR: char = ',';
const GROUPING_SEPARATOR: char = '.';
const MINOR_UNITS: usize = 2;

/// Formats a number with pt-BR separators and the given precision.
pub fn format_number(value: f64, precision: usize) -> String {
    let body = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac)) => (int_part.to_string(), Some(frac.to_string())),
        None => (body, None),
    };
    let mut rendered = group_digits(&int_part, GROUPING_SEPARATOR);
    if let Some(frac) = frac_part {
        rendered.push(DECIMAL_SEPARATOR);
        rendered.push_str(&frac);
    }
    if value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
        rendered.insert(0, '-');
    }
    rendered
}

/// Renders `value` as `R$ 1.234,56`.
pub fn format_brl(value: f64) -> String {
    format!("{} {}", BRL_SYMBOL, format_number(value, MINOR_UNITS))
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
