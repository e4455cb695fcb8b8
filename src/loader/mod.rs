//! Validación de rutas y clasificación de archivos antes de analizarlos.

pub mod mime;

use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::security::{PDF_MIME, is_ooxml_mime};

/// Familia de archivo que determina qué extractor y editor se usan.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
    Office,
    Unknown,
}

impl FileKind {
    /// Prioriza el tipo MIME y recurre a la extensión si no es concluyente.
    pub fn infer(extension: &str, mime: Option<&str>) -> Self {
        if mime.is_some_and(|mime| mime.starts_with("image/")) {
            return FileKind::Image;
        }

        if mime == Some(PDF_MIME) || extension == ".pdf" {
            return FileKind::Pdf;
        }

        if mime.is_some_and(is_ooxml_mime)
            || matches!(
                extension,
                ".docx" | ".docm" | ".xlsx" | ".xlsm" | ".pptx" | ".pptm"
            )
        {
            return FileKind::Office;
        }

        FileKind::Unknown
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Pdf => "PDF",
            FileKind::Office => "Office",
            FileKind::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub extension: String,
    pub mime: String,
    pub kind: FileKind,
}

/// Ruta absoluta para `path`; no exige que exista.
pub fn resolve_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    let expanded = match path.strip_prefix("~") {
        Ok(rest) => match env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    };

    fs::canonicalize(&absolute).unwrap_or(absolute)
}

/// Comprueba que `path` es un archivo regular y devuelve su ruta resuelta.
pub fn ensure_readable_file(path: impl AsRef<Path>) -> Result<PathBuf> {
    let resolved = resolve_path(path);
    if !resolved.is_file() {
        return Err(Error::FileNotFound { path: resolved });
    }
    Ok(resolved)
}

/// Extensión en minúsculas con el punto inicial, o cadena vacía.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

pub fn load_file_info(path: impl AsRef<Path>) -> Result<FileInfo> {
    let path = ensure_readable_file(path)?;
    let mime = mime::detect_mime(&path)?;
    let extension = extension_of(&path);
    let kind = FileKind::infer(&extension, mime.as_deref());

    Ok(FileInfo {
        mime: mime.unwrap_or_else(|| "unknown".to_string()),
        path,
        extension,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let missing = dir.path().join("nope.pdf");

        let error = ensure_readable_file(&missing).err();
        assert!(matches!(error, Some(Error::FileNotFound { .. })));
        Ok(())
    }

    #[test]
    fn directories_are_not_files() -> Result<()> {
        let dir = tempdir()?;
        assert!(ensure_readable_file(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn kind_prefers_mime_then_extension() {
        assert_eq!(FileKind::infer(".txt", Some("image/png")), FileKind::Image);
        assert_eq!(FileKind::infer(".pdf", None), FileKind::Pdf);
        assert_eq!(
            FileKind::infer(".bin", Some(crate::security::OOXML_MIME_TYPES[1])),
            FileKind::Office
        );
        assert_eq!(FileKind::infer(".pptm", Some("application/zip")), FileKind::Office);
        assert_eq!(FileKind::infer(".csv", Some("text/csv")), FileKind::Unknown);
    }

    #[test]
    fn load_file_info_classifies_pdf() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("Report.PDF");
        std::fs::write(&path, b"%PDF-1.4\n")?;

        let info = load_file_info(&path)?;
        assert_eq!(info.extension, ".pdf");
        assert_eq!(info.mime, "application/pdf");
        assert_eq!(info.kind, FileKind::Pdf);
        Ok(())
    }
}
