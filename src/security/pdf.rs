//! Búsqueda de palabras clave peligrosas en los bytes crudos de un PDF.

use memchr::memmem;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

use super::patterns::{OPEN_ACTION_COMPANIONS, OPEN_ACTION_KEYWORD, PDF_THREAT_KEYWORDS};

/// Generador de PDF conocido cuya salida habitual incluye `/OpenAction` con JavaScript.
///
/// Solo se registra en el log; los indicadores se emiten igualmente.
pub struct BenignGeneratorExemption {
    pub name: &'static str,
    pub marker: &'static [u8],
}

/// jsPDF añade `/OpenAction` junto a JavaScript para la impresión automática.
pub const JSPDF_EXEMPTION: BenignGeneratorExemption = BenignGeneratorExemption {
    name: "jsPDF",
    marker: b"jsPDF",
};

impl BenignGeneratorExemption {
    pub fn applies_to(&self, content: &[u8]) -> bool {
        contains_bytes(content, self.marker)
    }
}

pub fn scan_pdf_structure(path: &Path) -> Result<Vec<String>> {
    let content = fs::read(path).map_err(|error| Error::io(error, path.to_path_buf()))?;
    Ok(scan_pdf_bytes(&content))
}

/// Devuelve los indicadores para un PDF ya cargado en memoria, sin duplicados.
pub fn scan_pdf_bytes(content: &[u8]) -> Vec<String> {
    let mut indicators: Vec<String> = Vec::new();

    for (keyword, description) in PDF_THREAT_KEYWORDS {
        if !contains_bytes(content, keyword) {
            continue;
        }

        let indicator = if keyword == OPEN_ACTION_KEYWORD {
            if !open_action_is_suspicious(content) {
                continue;
            }
            format!("Suspicious PDF structure: {description} combined with scripts/launchers")
        } else {
            format!(
                "Suspicious PDF structure: {description} ({})",
                String::from_utf8_lossy(keyword)
            )
        };

        if !indicators.contains(&indicator) {
            indicators.push(indicator);
        }
    }

    indicators
}

fn open_action_is_suspicious(content: &[u8]) -> bool {
    let has_companion = OPEN_ACTION_COMPANIONS
        .iter()
        .any(|keyword| contains_bytes(content, keyword));
    if !has_companion {
        return false;
    }

    if JSPDF_EXEMPTION.applies_to(content) {
        log::debug!(
            "{} marker found next to /OpenAction with scripts; reported anyway",
            JSPDF_EXEMPTION.name
        );
    }

    true
}

pub(crate) fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && memmem::find(haystack, needle).is_some()
}
