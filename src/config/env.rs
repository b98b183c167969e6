use serde_json::{Map, Value};

use super::reader::Reader;
use super::store::insert_at;
use super::ConfigError;

/// Reads environment variables under a prefix into a nested mapping.
///
/// `MYAPP__DATABASE__PORT=5432` with prefix `MYAPP` and separator `__`
/// becomes `{"database": {"port": 5432}}`. Path segments are lower-cased and
/// values are coerced to the most specific type: boolean, integer, float,
/// then string.
#[derive(Debug, Clone)]
pub struct EnvReader {
    prefix: String,
    separator: String,
}

impl EnvReader {
    /// # Panics
    ///
    /// Panics if `separator` is empty.
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        assert!(!separator.is_empty(), "separator must not be empty");
        Self {
            prefix: prefix.into(),
            separator,
        }
    }

    fn collect<I>(&self, vars: I) -> Map<String, Value>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);
        let mut map = Map::new();

        for (key, value) in vars {
            let Some(path_str) = key.strip_prefix(&prefix_with_sep) else {
                continue;
            };
            if path_str.is_empty() {
                continue;
            }

            let path: Vec<String> = path_str
                .split(&self.separator)
                .map(|s| s.to_lowercase())
                .collect();

            insert_at(&mut map, path.as_slice(), coerce_value(&value));
        }

        map
    }
}

impl Reader for EnvReader {
    fn read(&self) -> Result<Map<String, Value>, ConfigError> {
        Ok(self.collect(std::env::vars()))
    }
}

fn coerce_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    // Only if it looks like an integer: optional minus, then digits
    if looks_like_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return Value::from(i);
        }
    }

    if s.contains('.') {
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return Value::from(f);
            }
        }
    }

    Value::String(s.to_string())
}

fn looks_like_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
