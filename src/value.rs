//! Árbol de metadata genérico que producen los extractores y consume el escáner de riesgos.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Valores hoja sin contenido textual.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Null,
}

/// Nodo de metadata: mapa, secuencia, texto o escalar.
///
/// Las claves de los mapas se guardan ordenadas, así que cualquier recorrido
/// sobre el árbol es determinista para la misma entrada.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Mapping(BTreeMap<String, MetadataValue>),
    Sequence(Vec<MetadataValue>),
    String(String),
    Scalar(Scalar),
}

impl MetadataValue {
    pub fn mapping() -> Self {
        Self::Mapping(BTreeMap::new())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// Inserta `value` bajo `key` si el nodo es un mapa. Devuelve `false` en otro caso.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> bool {
        match self {
            Self::Mapping(map) => {
                map.insert(key.into(), value.into());
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        match self {
            Self::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, MetadataValue>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Un contenedor vacío, un texto vacío o `null`.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Mapping(map) => map.is_empty(),
            Self::Sequence(items) => items.is_empty(),
            Self::String(value) => value.is_empty(),
            Self::Scalar(Scalar::Null) => true,
            Self::Scalar(_) => false,
        }
    }
}

impl Default for MetadataValue {
    fn default() -> Self {
        Self::mapping()
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Integer(value))
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::Float(value))
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<BTreeMap<String, MetadataValue>> for MetadataValue {
    fn from(value: BTreeMap<String, MetadataValue>) -> Self {
        Self::Mapping(value)
    }
}

impl From<Vec<MetadataValue>> for MetadataValue {
    fn from(value: Vec<MetadataValue>) -> Self {
        Self::Sequence(value)
    }
}

impl From<serde_json::Value> for MetadataValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::null(),
            Value::Bool(flag) => flag.into(),
            Value::Number(number) => match number.as_i64() {
                Some(integer) => integer.into(),
                None => number.as_f64().map(Self::from).unwrap_or_else(Self::null),
            },
            Value::String(text) => text.into(),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_nested_json() {
        let value = MetadataValue::from(json!({
            "author": "Ana",
            "pages": 3,
            "ratio": 0.5,
            "draft": false,
            "tags": ["a", null],
        }));

        assert_eq!(value.get("author").and_then(MetadataValue::as_str), Some("Ana"));
        assert_eq!(value.get("pages"), Some(&MetadataValue::from(3_i64)));
        assert_eq!(value.get("ratio"), Some(&MetadataValue::from(0.5)));
        assert_eq!(
            value.get("tags"),
            Some(&MetadataValue::Sequence(vec![
                MetadataValue::from("a"),
                MetadataValue::null()
            ]))
        );
    }

    #[test]
    fn serializes_as_plain_json() -> Result<(), Box<dyn std::error::Error>> {
        let mut value = MetadataValue::mapping();
        value.insert("title", "Informe");
        value.insert("count", 2_i64);
        value.insert("missing", MetadataValue::null());

        let json = serde_json::to_string(&value)?;
        assert_eq!(json, r#"{"count":2,"missing":null,"title":"Informe"}"#);

        let back: MetadataValue = serde_json::from_str(&json)?;
        assert_eq!(back, value);
        Ok(())
    }

    #[test]
    fn insert_only_applies_to_mappings() {
        let mut leaf = MetadataValue::from("texto");
        assert!(!leaf.insert("k", "v"));
        assert!(MetadataValue::mapping().is_empty());
        assert!(!leaf.is_empty());
    }
}
