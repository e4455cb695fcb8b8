//! Detección de tipos MIME por contenido, con desempate por extensión.

use infer::Infer;
use std::path::Path;

use crate::error::{Error, Result};

use super::{ensure_readable_file, extension_of};

/// Tipo MIME esperado para cada extensión conocida.
pub const EXTENSION_MIME: [(&str, &str); 26] = [
    (".pdf", "application/pdf"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".png", "image/png"),
    (".gif", "image/gif"),
    (".webp", "image/webp"),
    (".heic", "image/heic"),
    (".heif", "image/heif"),
    (".tif", "image/tiff"),
    (".tiff", "image/tiff"),
    (".txt", "text/plain"),
    (".doc", "application/msword"),
    (
        ".docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (".docm", "application/vnd.ms-word.document.macroEnabled.12"),
    (".xls", "application/vnd.ms-excel"),
    (
        ".xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (".xlsm", "application/vnd.ms-excel.sheet.macroEnabled.12"),
    (
        ".pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    (
        ".pptm",
        "application/vnd.ms-powerpoint.presentation.macroEnabled.12",
    ),
    (".zip", "application/zip"),
    (".rar", "application/x-rar-compressed"),
    (".mp3", "audio/mpeg"),
    (".mp4", "video/mp4"),
    (".avi", "video/x-msvideo"),
    (".rtf", "text/rtf"),
    (".rtf", "application/rtf"),
];

const ZIP_MIME: &str = "application/zip";

pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.to_lowercase();
    EXTENSION_MIME
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|&(_, mime)| mime)
}

/// Primera extensión registrada para `mime`.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let mime = mime.to_lowercase();
    EXTENSION_MIME
        .iter()
        .find(|(_, expected)| *expected == mime)
        .map(|&(ext, _)| ext)
}

/// Detecta el tipo MIME leyendo el contenido del archivo.
///
/// Si el contenido revela un ZIP (genérico u OOXML) y la extensión corresponde a
/// un formato basado en ZIP, se usa el tipo de la extensión. Si no se reconoce el
/// contenido, se recurre a la tabla de extensiones.
pub fn detect_mime(path: &Path) -> Result<Option<String>> {
    let path = ensure_readable_file(path)?;
    let expected = mime_for_extension(&extension_of(&path));

    let sniffed = Infer::new()
        .get_from_path(&path)
        .map_err(|error| Error::io(error, path.clone()))?
        .map(|kind| kind.mime_type().to_string());

    let resolved = match (sniffed, expected) {
        (Some(sniffed), Some(expected))
            if (sniffed == ZIP_MIME || is_zip_based(&sniffed)) && is_zip_based(expected) =>
        {
            Some(expected.to_string())
        }
        (Some(sniffed), _) => Some(sniffed),
        (None, expected) => expected.map(str::to_string),
    };

    log::debug!("{} resolved as {:?}", path.display(), resolved);
    Ok(resolved)
}

fn is_zip_based(mime: &str) -> bool {
    mime.starts_with("application/vnd.openxmlformats-officedocument.")
        || mime.contains("macroEnabled")
}

/// Indica si la extensión del archivo coincide con el tipo detectado.
pub fn extension_matches_mime(path: &Path) -> Result<bool> {
    let Some(mime) = detect_mime(path)? else {
        return Ok(false);
    };
    let extension = extension_of(path);
    Ok(EXTENSION_MIME
        .iter()
        .any(|&(ext, expected)| ext == extension && expected == mime))
}

/// Sugiere la extensión adecuada para el contenido del archivo.
pub fn suggest_extension(path: &Path) -> Result<Option<String>> {
    let Some(mime) = detect_mime(path)? else {
        return Ok(None);
    };

    if let Some(extension) = extension_for_mime(&mime) {
        return Ok(Some(extension.to_string()));
    }

    let current = extension_of(path);
    Ok((!current.is_empty()).then_some(current))
}
