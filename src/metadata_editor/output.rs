//! Rutas de salida y normalización de la metadata que introduce el usuario.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::loader::resolve_path;

pub const CLEAN_SUFFIX: &str = "_clean";
pub const DEFAULT_SUFFIX: &str = "_default";
pub const CUSTOM_SUFFIX: &str = "_custom";

/// Determina la ruta del archivo resultante y crea sus directorios padre.
///
/// Sin destino explícito se usa `<nombre><sufijo><extensión>` junto al original.
pub fn ensure_output_path(source: &Path, destination: Option<&Path>, suffix: &str) -> Result<PathBuf> {
    let target = match destination {
        Some(destination) => resolve_path(destination),
        None => {
            let stem = source.file_stem().unwrap_or_default().to_string_lossy();
            let name = match source.extension() {
                Some(extension) => format!("{stem}{suffix}.{}", extension.to_string_lossy()),
                None => format!("{stem}{suffix}"),
            };
            source.with_file_name(name)
        }
    };

    if target == resolve_path(source) {
        return Err(Error::InvalidInput(format!(
            "output path {} would overwrite the source file",
            target.display()
        )));
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|error| Error::io(error, parent.to_path_buf()))?;
    }

    Ok(target)
}

/// Recorta claves y valores y descarta las entradas sin clave.
pub fn normalize_metadata<I, K, V>(entries: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    entries
        .into_iter()
        .filter_map(|(key, value)| {
            let key = key.as_ref().trim();
            (!key.is_empty()).then(|| (key.to_string(), value.as_ref().trim().to_string()))
        })
        .collect()
}

/// Interpreta `clave=valor` separados por comas; los fragmentos sin `=` se ignoran.
pub fn parse_metadata_pairs(input: &str) -> BTreeMap<String, String> {
    normalize_metadata(
        input
            .split(',')
            .filter_map(|item| item.split_once('=')),
    )
}
