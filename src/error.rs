//! Tipos de error compartidos por el analizador y los editores de metadata.

use std::path::PathBuf;

/// Error principal de las operaciones de metaguard.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// La ruta no existe o no es un archivo regular.
    #[error("The file '{}' does not exist or is not a regular file", path.display())]
    FileNotFound { path: PathBuf },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PNG error: {0}")]
    Png(String),

    #[error("EXIF error: {0}")]
    Exif(#[from] exif::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Patrón inválido en una tabla estática; es un defecto de programación.
    #[error("Invalid regex pattern '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{operation} is not supported for {kind} files")]
    UnsupportedFormat { operation: String, kind: String },

    #[error("Metadata verification failed: {0}")]
    Verification(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Crea un error de E/S con el contexto de la ruta.
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn regex(source: regex::Error, pattern: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            source,
        }
    }

    pub fn unsupported(operation: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            operation: operation.into(),
            kind: kind.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }
}

impl From<xmltree::ParseError> for Error {
    fn from(source: xmltree::ParseError) -> Self {
        Self::Xml(source.to_string())
    }
}

impl From<png::EncodingError> for Error {
    fn from(source: png::EncodingError) -> Self {
        Self::Png(source.to_string())
    }
}

impl From<png::DecodingError> for Error {
    fn from(source: png::DecodingError) -> Self {
        Self::Png(source.to_string())
    }
}
