//! pubspec.yaml loading.
//!
//! YAML documents are converted into the same JSON-shaped map the registry
//! API returns, then decoded with [`Pubspec::decode`].

use crate::error::{PubspecError, Result};
use crate::pubspec::Pubspec;
use serde_json::{Map, Number, Value};
use yaml_rust2::{Yaml, YamlLoader};

impl Pubspec {
    /// Parses the contents of a `pubspec.yaml` file.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let docs = YamlLoader::load_from_str(content).map_err(|e| PubspecError::YamlParse {
            message: e.to_string(),
        })?;

        let doc = docs.first().ok_or_else(|| PubspecError::YamlParse {
            message: "document is empty".into(),
        })?;

        Self::decode(&yaml_to_value(doc))
    }
}

/// Converts a YAML node into its JSON-shaped equivalent.
///
/// Aliases and invalid nodes become `null`. Map keys that are not scalars
/// are dropped.
pub fn yaml_to_value(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::Null | Yaml::BadValue | Yaml::Alias(_) => Value::Null,
        Yaml::Boolean(b) => Value::Bool(*b),
        Yaml::Integer(i) => Value::Number((*i).into()),
        Yaml::Real(text) => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(text.clone()), Value::Number),
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Array(items) => Value::Array(items.iter().map(yaml_to_value).collect()),
        Yaml::Hash(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                match scalar_key(key) {
                    Some(key) => {
                        map.insert(key, yaml_to_value(value));
                    }
                    None => tracing::debug!(?key, "skipping non-scalar YAML key"),
                }
            }
            Value::Object(map)
        }
    }
}

fn scalar_key(key: &Yaml) -> Option<String> {
    match key {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}
