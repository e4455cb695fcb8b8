//! Tablas estáticas de patrones sospechosos para metadata y estructura PDF.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// Expresiones buscadas en cada valor textual de la metadata, en orden de evaluación.
pub const METADATA_PATTERN_DEFINITIONS: [(&str, &str); 9] = [
    (r"<script.*?>", "Possible HTML script injection"),
    (r"javascript:", "Possible JavaScript URI scheme"),
    (r"eval\(", "Use of eval() (dynamic code execution)"),
    (r"base64_decode", "Base64 decoding (common in obfuscation)"),
    (r"cmd\.exe", "Reference to Windows command line"),
    (r"powershell", "Reference to PowerShell"),
    (r"/bin/sh", "Reference to Unix shell"),
    (r"auto_open", "Auto-execute macro (Office)"),
    (r"Document_Open", "Auto-execute macro (Office)"),
];

/// Palabras clave buscadas en los bytes crudos de un PDF.
pub const PDF_THREAT_KEYWORDS: [(&[u8], &str); 5] = [
    (b"/JavaScript", "Contains JavaScript code"),
    (b"/JS", "Contains JavaScript code"),
    (b"/OpenAction", "Runs an action when the document is opened"),
    (b"/Launch", "Attempts to launch an external program"),
    (b"/RichMedia", "Embedded rich media content (possible attack vector)"),
];

pub const OPEN_ACTION_KEYWORD: &[u8] = b"/OpenAction";

/// Palabras clave que convierten un `/OpenAction` en hallazgo.
pub const OPEN_ACTION_COMPANIONS: [&[u8]; 3] = [b"/JavaScript", b"/JS", b"/Launch"];

/// Longitud a partir de la cual un valor de metadata se considera anómalo.
pub const MAX_METADATA_VALUE_CHARS: usize = 5000;

pub struct MetadataPattern {
    pub regex: Regex,
    pub description: &'static str,
}

/// Compila la tabla de patrones de metadata sin distinguir mayúsculas.
pub fn compile_metadata_patterns(
    definitions: &[(&'static str, &'static str)],
) -> Result<Vec<MetadataPattern>> {
    definitions
        .iter()
        .map(|&(pattern, description)| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map(|regex| MetadataPattern { regex, description })
                .map_err(|source| Error::regex(source, pattern))
        })
        .collect()
}

pub static METADATA_PATTERNS: LazyLock<Vec<MetadataPattern>> = LazyLock::new(|| {
    compile_metadata_patterns(&METADATA_PATTERN_DEFINITIONS)
        .unwrap_or_else(|error| panic!("built-in metadata pattern table is invalid: {error}"))
});
