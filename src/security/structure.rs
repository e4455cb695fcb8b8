//! Selección del escaneo estructural según el tipo MIME.

use std::path::Path;

use super::office::scan_office_structure;
use super::pdf::scan_pdf_structure;

pub const PDF_MIME: &str = "application/pdf";

pub const OOXML_MIME_TYPES: [&str; 6] = [
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.ms-word.document.macroEnabled.12",
    "application/vnd.ms-excel.sheet.macroEnabled.12",
    "application/vnd.ms-powerpoint.presentation.macroEnabled.12",
];

pub fn is_ooxml_mime(mime_type: &str) -> bool {
    OOXML_MIME_TYPES.contains(&mime_type)
}

/// Ejecuta el escaneo estructural del formato. Los fallos de lectura se
/// devuelven como un único indicador y nunca interrumpen el análisis.
pub fn scan_structure(path: &Path, mime_type: &str) -> Vec<String> {
    let result = if mime_type == PDF_MIME {
        scan_pdf_structure(path)
    } else if is_ooxml_mime(mime_type) {
        scan_office_structure(path)
    } else {
        return Vec::new();
    };

    match result {
        Ok(indicators) => indicators,
        Err(error) => {
            log::warn!("structure scan of {} failed: {error}", path.display());
            vec![format!("Error analyzing file structure: {error}")]
        }
    }
}
