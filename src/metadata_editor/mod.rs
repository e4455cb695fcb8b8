//! Funciones para eliminar o reescribir la metadata de archivos soportados.
//!
//! Todas las operaciones generan un archivo nuevo; el original nunca se modifica.

pub mod constants;
mod image;
pub(crate) mod office;
mod output;
mod pdf;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::loader::{FileInfo, FileKind, load_file_info};

use self::constants::DEFAULT_TEMPLATE;
use self::output::{CLEAN_SUFFIX, CUSTOM_SUFFIX, DEFAULT_SUFFIX};

pub use self::image::{apply_image_metadata, remove_image_metadata, verify_image_metadata_clean};
#[cfg(test)]
pub(crate) use self::image::embed_exif_segment;
pub use office::{apply_office_metadata, remove_office_metadata, verify_office_metadata_clean};
pub use output::{ensure_output_path, normalize_metadata, parse_metadata_pairs};
pub use pdf::{apply_pdf_metadata, remove_pdf_metadata, verify_pdf_metadata_clean};

/// Elimina toda la metadata conocida y devuelve la ruta del archivo generado.
pub fn wipe_metadata(path: impl AsRef<Path>, destination: Option<&Path>) -> Result<PathBuf> {
    let info = load_file_info(path)?;
    if info.kind == FileKind::Unknown {
        return Err(unsupported(&info, "Metadata removal"));
    }
    let output_path = ensure_output_path(&info.path, destination, CLEAN_SUFFIX)?;

    log::debug!("wiping {} {} ({})", info.kind.label(), info.path.display(), info.mime);
    match info.kind {
        FileKind::Pdf => remove_pdf_metadata(&info.path, &output_path)?,
        FileKind::Office => {
            remove_office_metadata(&info.path, &output_path)?;
        }
        FileKind::Image => remove_image_metadata(&info.path, &output_path)?,
        FileKind::Unknown => return Err(unsupported(&info, "Metadata removal")),
    }

    Ok(output_path)
}

/// Sustituye la metadata identificativa por la plantilla genérica.
pub fn apply_default_metadata(path: impl AsRef<Path>, destination: Option<&Path>) -> Result<PathBuf> {
    let template = normalize_metadata(DEFAULT_TEMPLATE);
    write_metadata(path.as_ref(), &template, destination, DEFAULT_SUFFIX)
}

/// Escribe los pares `metadata` en una copia del archivo.
pub fn apply_custom_metadata(
    path: impl AsRef<Path>,
    metadata: &BTreeMap<String, String>,
    destination: Option<&Path>,
) -> Result<PathBuf> {
    let metadata = normalize_metadata(metadata);
    if metadata.is_empty() {
        return Err(Error::InvalidInput("no metadata entries were provided".to_string()));
    }
    write_metadata(path.as_ref(), &metadata, destination, CUSTOM_SUFFIX)
}

fn write_metadata(
    path: &Path,
    metadata: &BTreeMap<String, String>,
    destination: Option<&Path>,
    suffix: &str,
) -> Result<PathBuf> {
    let info = load_file_info(path)?;
    if info.kind == FileKind::Unknown {
        return Err(unsupported(&info, "Custom metadata"));
    }
    let output_path = ensure_output_path(&info.path, destination, suffix)?;

    match info.kind {
        FileKind::Pdf => apply_pdf_metadata(&info.path, &output_path, metadata)?,
        FileKind::Office => apply_office_metadata(&info.path, &output_path, metadata)?,
        FileKind::Image => apply_image_metadata(&info.path, &output_path, metadata)?,
        FileKind::Unknown => return Err(unsupported(&info, "Custom metadata")),
    }

    Ok(output_path)
}

fn unsupported(info: &FileInfo, operation: &str) -> Error {
    Error::unsupported(operation, info.mime.clone())
}
