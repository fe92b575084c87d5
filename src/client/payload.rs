//! Pure mapping from form state to request body, and from response body
//! to display text.
//!
//! Numeric coercion follows browser `parseInt`/`parseFloat` without a
//! radix argument: leading whitespace is skipped, a `0x` prefix makes
//! `parseInt` read hexadecimal, the longest numeric prefix is taken, and
//! input with no numeric prefix becomes `NaN`. `NaN` and infinities have
//! no JSON form and are sent as `null`. Nothing here validates ranges.

use crate::client::config::{FieldKind, FormConfig, OutputBinding, OutputFormat};
use serde_json::{Map, Number, Value};

/// Build the request body for `config` from the current field values.
///
/// `read` returns the raw value of a named input, or `None` if the page
/// has no such input; missing inputs are left out of the body.
pub fn build_payload<F>(config: &FormConfig, read: F) -> Map<String, Value>
where
    F: Fn(&str) -> Option<String>,
{
    let mut body = Map::new();
    for field in &config.fields {
        let Some(raw) = read(&field.name) else {
            continue;
        };
        let value = match field.kind {
            FieldKind::Text => Value::String(raw),
            FieldKind::Integer => number_or_null(parse_int(&raw)),
            FieldKind::Float => number_or_null(parse_float(&raw)),
        };
        body.insert(field.name.clone(), value);
    }
    body
}

fn number_or_null(value: Option<f64>) -> Value {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Value::from(v as i64),
        Some(v) => Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null),
        None => Value::Null,
    }
}

fn trim_leading(raw: &str) -> &str {
    raw.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Leading-integer parse. `None` stands for `NaN`.
pub fn parse_int(raw: &str) -> Option<f64> {
    let s = trim_leading(raw);
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let mut magnitude = 0.0_f64;
    let mut seen = 0;
    for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
        magnitude = magnitude * f64::from(radix) + f64::from(digit);
        seen += 1;
    }
    if seen == 0 {
        return None;
    }

    Some(if negative { -magnitude } else { magnitude })
}

/// Leading-float parse. `None` stands for `NaN`.
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = trim_leading(raw);
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        if digits > 0 {
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }

    // exponent only counts when at least one digit follows it
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'-' || bytes[j] == b'+') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    let literal = s[..i].trim_end_matches('.');
    literal.parse().ok()
}

/// Render one output binding from a response body.
///
/// Missing keys render as `undefined`, as a page would. Currency values
/// must be numbers; anything else is `None` and the caller treats the
/// response as unusable.
pub fn render_output(binding: &OutputBinding, response: &Value) -> Option<String> {
    let value = response.get(&binding.key);
    match binding.format {
        OutputFormat::Plain => Some(match value {
            None => "undefined".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }),
        OutputFormat::Currency => value.and_then(Value::as_f64).map(format_currency),
    }
}

/// `$` plus the amount with two decimal places, halves rounded away from
/// zero as browser `toFixed(2)` does.
pub fn format_currency(amount: f64) -> String {
    format!("${}", to_fixed_2(amount))
}

fn to_fixed_2(amount: f64) -> String {
    // `{:.2}` rounds exact halves to even. A double lies exactly halfway
    // between two cents only when it is an odd multiple of 1/8.
    let eighths = amount * 8.0;
    let halfway =
        amount.abs() < 1e15 && eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0;
    if !halfway {
        let amount = if amount == 0.0 { 0.0 } else { amount };
        return format!("{:.2}", amount);
    }

    // amount * 100 is an exact multiple of 0.5 here
    let cents = (amount.abs() * 100.0 + 0.5) as u64;
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, cents / 100, cents % 100)
}
