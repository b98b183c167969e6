//! Coercion of incoming values to the kind of a declared default.
//!
//! A container that declares `port = 8080` as a default expects integers at
//! `port`. Writing `"9090"` there stores `9090`; writing `"abc"` stores `0`.
//! The rules follow loose scripting-language casts: numeric strings parse
//! their leading numeric prefix, truthiness decides booleans, and scalars
//! written over collections become one-element sequences.

use serde_json::Value;

/// The kind of a reference value, which decides how incoming values are cast.
///
/// Checked in declaration order: a float default is [`Kind::Float`] before it
/// could count as generically numeric, and a numeric-looking string default
/// is [`Kind::Integer`] rather than [`Kind::String`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Float,
    Integer,
    Boolean,
    String,
    Collection,
}

impl Kind {
    /// Classifies a reference value. `null` has no kind and disables coercion.
    pub fn of(reference: &Value) -> Option<Kind> {
        match reference {
            Value::Null => None,
            Value::Number(n) if n.is_f64() => Some(Kind::Float),
            Value::Number(_) => Some(Kind::Integer),
            Value::String(s) if is_numeric(s) => Some(Kind::Integer),
            Value::Bool(_) => Some(Kind::Boolean),
            Value::String(_) => Some(Kind::String),
            Value::Array(_) | Value::Object(_) => Some(Kind::Collection),
        }
    }

    /// Casts `incoming` to this kind.
    pub fn cast(self, incoming: Value) -> Value {
        match self {
            Kind::Float => Value::from(to_float(&incoming)),
            Kind::Integer => Value::from(to_int(&incoming)),
            Kind::Boolean => Value::Bool(to_bool(&incoming)),
            Kind::String => Value::String(to_string(&incoming)),
            Kind::Collection => match incoming {
                Value::Array(_) | Value::Object(_) => incoming,
                Value::Null => Value::Array(Vec::new()),
                scalar => Value::Array(vec![scalar]),
            },
        }
    }
}

/// Coerces `incoming` to the kind of `reference`.
///
/// A `null` reference leaves the value untouched.
pub fn coerce(reference: &Value, incoming: Value) -> Value {
    match Kind::of(reference) {
        Some(kind) => kind.cast(incoming),
        None => incoming,
    }
}

/// Loose float cast. Non-finite results (only reachable from huge exponents)
/// are stored as `null` by [`Value::from`].
pub fn to_float(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => numeric_prefix(s).parse().unwrap_or(0.0),
        Value::Array(items) => f64::from(u8::from(!items.is_empty())),
        Value::Object(map) => f64::from(u8::from(!map.is_empty())),
    }
}

/// Loose integer cast; floats truncate toward zero and saturate.
pub fn to_int(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if n.is_u64() {
                i64::MAX
            } else {
                float_to_int(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => {
            let prefix = numeric_prefix(s);
            if prefix.contains(['.', 'e', 'E']) {
                float_to_int(prefix.parse().unwrap_or(0.0))
            } else {
                prefix
                    .parse::<i64>()
                    .or_else(|_| prefix.parse::<f64>().map(float_to_int))
                    .unwrap_or(0)
            }
        }
        Value::Array(items) => i64::from(!items.is_empty()),
        Value::Object(map) => i64::from(!map.is_empty()),
    }
}

/// Truthiness: `null`, `false`, zero, `""`, `"0"` and empty collections are false.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => match n.as_i64() {
            Some(i) => i != 0,
            None => n.as_f64().is_some_and(|f| f != 0.0),
        },
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Canonical string form: `true` is `"1"`, `false` and `null` are empty,
/// numbers are decimal, collections render as JSON.
pub fn to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// True if the whole string (ignoring surrounding whitespace) is a number.
pub fn is_numeric(s: &str) -> bool {
    let trimmed = s.trim_matches(|c: char| c.is_ascii_whitespace());
    !trimmed.is_empty() && numeric_prefix(trimmed).len() == trimmed.len()
}

fn float_to_int(f: f64) -> i64 {
    if f.is_finite() {
        f as i64
    } else {
        0
    }
}

/// Returns the longest leading decimal number in `s`, after leading
/// whitespace: optional sign, digits with an optional fraction, and an
/// optional exponent. Empty if there is none.
fn numeric_prefix(s: &str) -> &str {
    let s = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac_digits = frac_end - (end + 1);
        if mantissa_digits > 0 || frac_digits > 0 {
            mantissa_digits += frac_digits;
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    &s[..end]
}
