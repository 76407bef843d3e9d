//! Coercion policy shared by the condition evaluator and the validator.
//!
//! Answers arrive as loosely typed JSON. Every comparison goes through the
//! helpers here so the string and numeric views of a value are derived the
//! same way at every call site.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

/// Comparison text that `is_empty` treats as "no answer". The last two are
/// what missing values turn into once they have been stringified upstream.
pub const EMPTY_SENTINELS: [&str; 3] = ["", "undefined", "null"];

/// Text produced for JSON objects.
pub const OBJECT_TEXT: &str = "[object Object]";

static DECIMAL_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("decimal literal pattern compiles")
});

/// Lower-cased string form of an observed answer. Missing and `null` values
/// become `""`.
pub fn coerce_for_comparison(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => value_text(value).to_lowercase(),
    }
}

/// Numeric view of an answer. Missing values and objects are `NaN`; `null`
/// is zero.
pub fn coerce_numeric(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => parse_numeric(text),
        Some(value @ Value::Array(_)) => parse_numeric(&value_text(value)),
        Some(Value::Object(_)) => f64::NAN,
    }
}

/// Parses numeric text. Blank text is zero; `0x`/`0o`/`0b` literals are
/// accepted; anything else that is not a plain decimal literal is `NaN`.
pub fn parse_numeric(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }

    if DECIMAL_LITERAL.is_match(trimmed) {
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn parse_radix_literal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut total = 0.0_f64;
    for ch in digits.chars() {
        match ch.to_digit(radix) {
            Some(digit) => total = total * f64::from(radix) + f64::from(digit),
            None => return Some(f64::NAN),
        }
    }
    Some(total)
}

/// Emptiness used for required checks: missing, `null`, blank strings, empty
/// arrays and empty objects.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

/// Whether comparison text denotes an absent answer.
pub fn is_empty_sentinel(text: &str) -> bool {
    EMPTY_SENTINELS.contains(&text)
}

/// Truthiness of a selection: `null`, `false`, zero, `NaN` and `""` are unset.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// String form of a value before case folding. Arrays join their elements
/// with commas, with `null` elements left blank.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_text(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => OBJECT_TEXT.to_string(),
    }
}

fn number_text(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    number.as_f64().map(float_text).unwrap_or_default()
}

/// Shortest text for a float, printing integral values without a fraction
/// and switching to exponent form outside `[1e-6, 1e21)`.
pub fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        if value.fract() == 0.0 {
            format!("{value:.0}")
        } else {
            value.to_string()
        }
    } else {
        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    }
}
