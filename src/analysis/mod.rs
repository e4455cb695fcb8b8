//! Extracción de metadata por formato y reporte de análisis completo.

mod hashing;
mod image;
mod office;
mod pdf;
mod render;

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::loader::{ensure_readable_file, extension_of, mime::detect_mime};
use crate::security::{PDF_MIME, RiskReport, analyze_risk, is_ooxml_mime};
use crate::value::MetadataValue;

pub use hashing::{HASH_SIZE_LIMIT, HashSummary, file_hashes};
pub use self::image::{extract_image_metadata, maps_link};
pub use office::extract_office_metadata;
pub use pdf::extract_pdf_metadata;
pub use render::render_report;

pub(crate) use self::image::{decode_user_comment, format_name, png_text_chunks, read_exif};
pub(crate) use pdf::{deref_dictionary, encode_pdf_text};

pub const EMPTY_FILE_MIME: &str = "application/x-empty";
pub const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Clone, Copy, Debug, Serialize)]
pub struct AnalysisOptions {
    pub include_hash: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { include_hash: true }
    }
}

/// Resultado del análisis de un archivo.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub file: String,
    pub path: String,
    pub mime_type: String,
    pub extension: String,
    pub metadata: MetadataValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashes: Option<HashSummary>,
    /// Solo presente cuando el archivo resulta sospechoso.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_analysis: Option<RiskReport>,
}

impl AnalysisReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Extrae la metadata según el tipo MIME detectado.
pub fn extract_metadata(path: &Path, mime_type: &str) -> MetadataValue {
    if mime_type.starts_with("image/") {
        extract_image_metadata(path)
    } else if mime_type == PDF_MIME {
        extract_pdf_metadata(path)
    } else if is_ooxml_mime(mime_type) {
        extract_office_metadata(path)
    } else {
        let mut metadata = MetadataValue::mapping();
        metadata.insert("info", "Format not currently supported for deep analysis.");
        metadata
    }
}

pub fn analyze_file(path: impl AsRef<Path>, options: &AnalysisOptions) -> Result<AnalysisReport> {
    let path = ensure_readable_file(path)?;
    let file_metadata = fs::metadata(&path).map_err(|error| Error::io(error, path.clone()))?;

    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = extension_of(&path);

    let hashes = if options.include_hash {
        file_hashes(&path, file_metadata.len())?
    } else {
        None
    };

    if file_metadata.len() == 0 {
        let mut metadata = MetadataValue::mapping();
        metadata.insert("info", "File is empty (0 bytes).");
        return Ok(AnalysisReport {
            file,
            path: path.display().to_string(),
            mime_type: EMPTY_FILE_MIME.to_string(),
            extension,
            metadata,
            hashes,
            security_analysis: None,
        });
    }

    let mime_type = detect_mime(&path)?.unwrap_or_else(|| FALLBACK_MIME.to_string());
    let metadata = extract_metadata(&path, &mime_type);

    let risk = analyze_risk(&path, &metadata, &mime_type);
    if risk.is_suspicious() {
        log::info!(
            "{} flagged with {} indicator(s)",
            path.display(),
            risk.indicators().len()
        );
    }

    Ok(AnalysisReport {
        file,
        path: path.display().to_string(),
        mime_type,
        extension,
        metadata,
        hashes,
        security_analysis: risk.is_suspicious().then_some(risk),
    })
}
