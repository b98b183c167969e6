//! Sources that produce a mapping for [`ConfigRegistry::load`](super::ConfigRegistry::load).

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::ConfigError;

/// Anything that can produce a configuration mapping.
pub trait Reader: Send + Sync + std::fmt::Debug {
    fn read(&self) -> Result<Map<String, Value>, ConfigError>;
}

/// An in-memory mapping reads as itself.
impl Reader for Map<String, Value> {
    fn read(&self) -> Result<Map<String, Value>, ConfigError> {
        Ok(self.clone())
    }
}

/// Reads a TOML file.
///
/// Files can be marked as required or optional. Required files that don't exist
/// cause an error; optional files that don't exist read as an empty mapping.
/// TOML datetimes are stored as their string form.
#[derive(Debug, Clone)]
pub struct TomlReader {
    path: PathBuf,
    required: bool,
}

impl TomlReader {
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl Reader for TomlReader {
    fn read(&self) -> Result<Map<String, Value>, ConfigError> {
        let Some(contents) = read_file(&self.path, self.required)? else {
            return Ok(Map::new());
        };
        let table: toml::Table = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(table_to_map(table))
    }
}

/// Reads a JSON file whose root is an object.
#[derive(Debug, Clone)]
pub struct JsonReader {
    path: PathBuf,
    required: bool,
}

impl JsonReader {
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl Reader for JsonReader {
    fn read(&self) -> Result<Map<String, Value>, ConfigError> {
        let Some(contents) = read_file(&self.path, self.required)? else {
            return Ok(Map::new());
        };
        let value: Value = serde_json::from_str(&contents).map_err(|e| ConfigError::JsonError {
            path: self.path.clone(),
            source: e,
        })?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(ConfigError::NotAMapping(self.path.clone())),
        }
    }
}

/// Reads a config file to a string.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
fn read_file(path: &Path, required: bool) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn table_to_map(table: toml::Table) -> Map<String, Value> {
    table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect()
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(table_to_map(table)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_toml_reader_loads_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            name = "app"
            port = 8080
            ratio = 0.5
            started = 1979-05-27T07:32:00Z

            [server]
            hosts = ["a", "b"]
            "#
        )
        .unwrap();

        let map = TomlReader::new(file.path(), true).read().unwrap();

        assert_eq!(
            Value::Object(map),
            json!({
                "name": "app",
                "port": 8080,
                "ratio": 0.5,
                "started": "1979-05-27T07:32:00Z",
                "server": {"hosts": ["a", "b"]},
            })
        );
    }

    #[test]
    fn test_toml_reader_keeps_key_order() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "zeta = 1\nalpha = 2\nmid = 3").unwrap();

        let map = TomlReader::new(file.path(), true).read().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_toml_reader_required_missing() {
        let result = TomlReader::new("/nonexistent/path/config.toml", true).read();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_toml_reader_optional_missing() {
        let map = TomlReader::new("/nonexistent/path/config.toml", false)
            .read()
            .unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_toml_reader_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "key = = broken").unwrap();

        let result = TomlReader::new(file.path(), true).read();
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_json_reader() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"level": 2, "email": null}}"#).unwrap();

        let map = JsonReader::new(file.path(), true).read().unwrap();
        assert_eq!(Value::Object(map), json!({"level": 2, "email": null}));
    }

    #[test]
    fn test_json_reader_rejects_non_object() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[1, 2, 3]").unwrap();

        let result = JsonReader::new(file.path(), true).read();
        assert!(matches!(result, Err(ConfigError::NotAMapping(_))));

        let mut broken = NamedTempFile::new().unwrap();
        writeln!(broken, "{{").unwrap();
        let result = JsonReader::new(broken.path(), true).read();
        assert!(matches!(result, Err(ConfigError::JsonError { .. })));
    }

    #[test]
    fn test_map_reads_as_itself() {
        let source = match json!({"a": 1}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert_eq!(source.read().unwrap(), source);
    }
}
