//! Recorrido del árbol de metadata en busca de valores sospechosos.

use crate::value::MetadataValue;

use super::patterns::{MAX_METADATA_VALUE_CHARS, METADATA_PATTERNS};

/// Revisa cada valor textual del árbol y devuelve los indicadores encontrados.
///
/// Las rutas se construyen con `.` entre claves y `[i]` para índices; la raíz
/// tiene ruta vacía. Usa una pila explícita, así que la profundidad del árbol
/// no está limitada por la pila de llamadas.
pub fn scan_metadata(metadata: &MetadataValue) -> Vec<String> {
    let mut indicators = Vec::new();
    let mut pending: Vec<(String, &MetadataValue)> = vec![(String::new(), metadata)];

    while let Some((path, value)) = pending.pop() {
        match value {
            MetadataValue::Mapping(map) => {
                // Se apilan al revés para visitar las claves en orden.
                for (key, child) in map.iter().rev() {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    pending.push((child_path, child));
                }
            }
            MetadataValue::Sequence(items) => {
                for (index, child) in items.iter().enumerate().rev() {
                    pending.push((format!("{path}[{index}]"), child));
                }
            }
            MetadataValue::String(text) => scan_text(text, &path, &mut indicators),
            MetadataValue::Scalar(_) => {}
        }
    }

    if !indicators.is_empty() {
        log::debug!("metadata scan produced {} indicator(s)", indicators.len());
    }
    indicators
}

fn scan_text(text: &str, path: &str, indicators: &mut Vec<String>) {
    let length = text.chars().count();
    if length > MAX_METADATA_VALUE_CHARS {
        indicators.push(format!(
            "Unusually long value at '{path}' ({length} characters)"
        ));
    }

    for pattern in METADATA_PATTERNS.iter() {
        if pattern.regex.is_match(text) {
            indicators.push(format!("Detected '{}' at '{path}'", pattern.description));
        }
    }
}
