use std::io::Write;

use nested_config::config::store;
use nested_config::{
    ConfigContainer, ConfigError, ConfigRegistry, Container, Error, Reader, Store, TomlReader,
};
use serde_json::{json, Map, Value};
use tempfile::NamedTempFile;

fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn path_round_trip() {
    let mut store = Store::new();
    for (path, value) in [
        ("k", json!(1)),
        ("a.b", json!("two")),
        ("x.y.z", json!([1, 2])),
        ("m.n", json!({"o": null})),
    ] {
        store.set(path, value.clone());
        assert_eq!(store.get(path).unwrap(), &value, "{path}");
    }
}

#[test]
fn absence_differs_from_falsy_presence() {
    let mut store = Store::new();
    store.set("k", false);
    assert!(store.has("k"));
    assert!(!store.has("missing"));
}

#[test]
fn merge_precedence() {
    let merged = store::merge(map(json!({"a": 1, "b": {"x": 1}})), map(json!({"b": {"y": 2}})));
    assert_eq!(Value::Object(merged), json!({"a": 1, "b": {"x": 1, "y": 2}}));

    let merged = store::merge(map(json!({"b": {"x": 1}})), map(json!({"b": 5})));
    assert_eq!(Value::Object(merged), json!({"b": 5}));
}

#[test]
fn coercion_by_reference_kind() {
    let mut config = ConfigContainer::new(
        Map::new(),
        map(json!({"flag": true, "n": 12345, "f": 50.25})),
    );

    config.set("flag", "0");
    assert_eq!(config.get("flag").unwrap(), &json!(false));
    config.set("flag", 1);
    assert_eq!(config.get("flag").unwrap(), &json!(true));

    config.set("n", "123str");
    assert_eq!(config.get("n").unwrap(), &json!(123));
    config.set("n", "string");
    assert_eq!(config.get("n").unwrap(), &json!(0));

    config.set("f", "15.5$");
    assert_eq!(config.get("f").unwrap(), &json!(15.5));

    config.set("custom", 100);
    assert_eq!(config.get("custom").unwrap(), &json!(100));
}

#[test]
fn deep_path_creation_and_collapse() {
    let mut store = Store::new();
    store.set("a.b.c.d", 4);
    assert_eq!(store.all(), &map(json!({"a": {"b": {"c": {"d": 4}}}})));

    store.set("a.b", "flat");
    assert!(store.lookup("a.b.c.d").is_none());
}

#[test]
fn add_accumulates() {
    let mut store = Store::new();
    store.add("x", "v1");
    assert_eq!(store["x"], json!("v1"));
    store.add("x", "v2");
    assert_eq!(store["x"], json!(["v1", "v2"]));
    store.add("x", "v3");
    assert_eq!(store["x"], json!(["v1", "v2", "v3"]));
}

#[test]
fn defaults_snapshot_stays_constant() {
    let defaults = map(json!({"level": 1, "name": "base"}));
    let mut config = ConfigContainer::new(Map::new(), defaults.clone());

    config.set("level", json!({"nested": true}));
    config.set("name", 7);
    config.remove("level");

    assert_eq!(config.defaults(), &defaults);
    config.set("level", "42");
    assert_eq!(config["level"], json!(42));
}

#[test]
fn registry_loads_toml_section() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[pool]\nsize = 4\n\n[pool.timeouts]\nconnect = 1.5").unwrap();

    let registry = ConfigRegistry::new();
    registry.set("app.name", "loader");
    registry
        .load("database", &TomlReader::new(file.path(), true))
        .unwrap();

    assert_eq!(registry.get("database.pool.size"), Some(json!(4)));
    assert_eq!(registry.get("database.pool.timeouts.connect"), Some(json!(1.5)));
    assert_eq!(registry.name(), "loader");
}

#[test]
fn registry_load_failure_leaves_state() {
    let registry = ConfigRegistry::new();
    registry.set("database", json!({"kept": true}));

    let result = registry.load("database", &TomlReader::new("/nonexistent/db.toml", true));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    assert_eq!(registry.get("database.kept"), Some(json!(true)));
}

#[test]
fn container_wires_configuration() {
    let mut container = Container::new();
    container.register("config", || {
        ConfigContainer::new(map(json!({"port": "9000"})), map(json!({"port": 80})))
    });

    let config = container.get::<ConfigContainer>("config").unwrap();
    assert_eq!(config.get("port").unwrap(), &json!("9000"));
    assert!(container.has("config"));
}

#[test]
fn errors_convert_to_crate_error() {
    fn lookup(store: &Store, container: &mut Container) -> Result<Value, Error> {
        let value = store.get("present")?.clone();
        container.get::<Store>("missing")?;
        Ok(value)
    }

    let mut store = Store::new();
    store.set("present", 1);
    let mut container = Container::new();

    let err = lookup(&store, &mut container).unwrap_err();
    assert!(matches!(err, Error::Container(_)));
    assert_eq!(err.to_string(), "container error: no entry registered under 'missing'");

    let err = lookup(&Store::new(), &mut container).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::KeyNotFound(_))));
}

#[test]
fn custom_reader() {
    #[derive(Debug)]
    struct Fixed;

    impl Reader for Fixed {
        fn read(&self) -> Result<Map<String, Value>, ConfigError> {
            Ok(map(json!({"level": 3})))
        }
    }

    let registry = ConfigRegistry::new();
    registry.load("debug", &Fixed).unwrap();
    assert_eq!(registry.get("debug.level"), Some(json!(3)));
}
