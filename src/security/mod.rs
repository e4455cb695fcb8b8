//! Heurísticas de seguridad sobre metadata y estructura de archivos.
//!
//! Dos escáneres alimentan un único veredicto: el de metadata recorre los
//! valores extraídos y el estructural inspecciona los bytes del PDF o las
//! entradas del contenedor OOXML.

mod metadata_scan;
mod office;
pub mod patterns;
mod pdf;
mod structure;

use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;

use crate::value::MetadataValue;

pub use metadata_scan::scan_metadata;
pub use office::{scan_entry_names, scan_office_structure};
pub use pdf::{BenignGeneratorExemption, JSPDF_EXEMPTION, scan_pdf_bytes, scan_pdf_structure};
pub use structure::{OOXML_MIME_TYPES, PDF_MIME, is_ooxml_mime, scan_structure};

/// Veredicto de riesgo de un archivo.
///
/// `is_suspicious` se deriva siempre de la lista de indicadores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RiskReport {
    is_suspicious: bool,
    indicators: Vec<String>,
}

impl RiskReport {
    pub fn from_indicators(indicators: Vec<String>) -> Self {
        Self {
            is_suspicious: !indicators.is_empty(),
            indicators,
        }
    }

    pub fn is_suspicious(&self) -> bool {
        self.is_suspicious
    }

    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }
}

/// Compila las tablas de patrones; un patrón inválido aborta aquí y no durante un análisis.
pub fn init() {
    LazyLock::force(&patterns::METADATA_PATTERNS);
}

/// Análisis completo: primero los indicadores de metadata y después los estructurales.
pub fn analyze_risk(file_path: &Path, metadata: &MetadataValue, mime_type: &str) -> RiskReport {
    let mut indicators = scan_metadata(metadata);
    indicators.extend(scan_structure(file_path, mime_type));

    log::debug!(
        "risk analysis of {} ({mime_type}): {} indicator(s)",
        file_path.display(),
        indicators.len()
    );

    RiskReport::from_indicators(indicators)
}

#[cfg(test)]
mod tests;
