//! Limpieza y escritura del diccionario Info de documentos PDF.

use chrono::{DateTime, Local};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::analysis::{deref_dictionary, encode_pdf_text};
use crate::error::{Error, Result};

/// Nombres estándar del diccionario Info, indexados en minúsculas.
const STANDARD_INFO_KEYS: [&str; 8] = [
    "Title",
    "Author",
    "Subject",
    "Keywords",
    "Creator",
    "Producer",
    "CreationDate",
    "ModDate",
];

/// Escribe en `output_path` una copia sin diccionario Info ni flujo XMP en el catálogo.
pub fn remove_pdf_metadata(path: &Path, output_path: &Path) -> Result<()> {
    let mut doc = Document::load(path)?;

    if let Some(info) = doc.trailer.remove(b"Info")
        && let Object::Reference(id) = info
    {
        doc.objects.remove(&id);
    }

    if let Some(catalog_id) = catalog_id(&doc)
        && let Ok(catalog) = doc.get_object_mut(catalog_id).and_then(Object::as_dict_mut)
        && let Some(Object::Reference(metadata_id)) = catalog.remove(b"Metadata")
    {
        doc.objects.remove(&metadata_id);
    }

    doc.prune_objects();
    save_document(&mut doc, output_path)?;

    if !verify_pdf_metadata_clean(output_path)? {
        let _ = fs::remove_file(output_path);
        return Err(Error::Verification(format!(
            "document information remains in {}",
            path.display()
        )));
    }

    log::info!("PDF metadata removed: {}", output_path.display());
    Ok(())
}

/// Comprueba que el PDF no conserva diccionario Info ni metadata XMP en el catálogo.
pub fn verify_pdf_metadata_clean(path: &Path) -> Result<bool> {
    let doc = Document::load(path)?;

    let info_present = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|info| deref_dictionary(&doc, info))
        .is_some_and(|info| !info.is_empty());

    let xmp_present = catalog_id(&doc)
        .and_then(|id| doc.get_dictionary(id).ok())
        .is_some_and(|catalog| catalog.has(b"Metadata"));

    Ok(!info_present && !xmp_present)
}

/// Fusiona `metadata` con el diccionario Info (creándolo si falta) y actualiza `ModDate`.
pub fn apply_pdf_metadata(
    path: &Path,
    output_path: &Path,
    metadata: &BTreeMap<String, String>,
) -> Result<()> {
    let mut doc = Document::load(path)?;
    let info_id = ensure_info_dictionary(&mut doc);

    let info = doc.get_object_mut(info_id).and_then(Object::as_dict_mut)?;
    for (key, value) in metadata {
        info.set(info_key(key), encode_pdf_text(value));
    }
    info.set("ModDate", Object::string_literal(pdf_date(Local::now())));

    save_document(&mut doc, output_path)?;
    log::info!(
        "PDF metadata written: {} ({} entries)",
        output_path.display(),
        metadata.len()
    );
    Ok(())
}

fn catalog_id(doc: &Document) -> Option<ObjectId> {
    doc.trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .ok()
}

/// Devuelve el objeto Info, convirtiendo un diccionario en línea en objeto indirecto.
fn ensure_info_dictionary(doc: &mut Document) -> ObjectId {
    if let Ok(id) = doc.trailer.get(b"Info").and_then(Object::as_reference)
        && doc.get_dictionary(id).is_ok()
    {
        return id;
    }

    let existing = match doc.trailer.get(b"Info") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };
    let id = doc.add_object(existing);
    doc.trailer.set("Info", id);
    id
}

/// Nombre de clave para el diccionario Info: sin `/` y con la grafía estándar si existe.
pub(crate) fn info_key(key: &str) -> String {
    let key = key.trim().trim_start_matches('/');
    STANDARD_INFO_KEYS
        .iter()
        .find(|standard| standard.eq_ignore_ascii_case(key))
        .map_or_else(|| key.to_string(), |standard| standard.to_string())
}

/// Fecha en formato PDF (`D:AAAAMMDDHHmmSS+HH'mm'`).
pub(crate) fn pdf_date(now: DateTime<Local>) -> String {
    let offset = now.format("%:z").to_string().replace(':', "'");
    format!("D:{}{offset}'", now.format("%Y%m%d%H%M%S"))
}

fn save_document(doc: &mut Document, output_path: &Path) -> Result<()> {
    doc.save(output_path)
        .map_err(|error| match Error::from(error) {
            Error::Io { source, .. } => Error::io(source, output_path.to_path_buf()),
            other => other,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn info_keys_use_standard_spelling() {
        assert_eq!(info_key("author"), "Author");
        assert_eq!(info_key("/moddate"), "ModDate");
        assert_eq!(info_key(" Proyecto "), "Proyecto");
    }

    #[test]
    fn dates_follow_pdf_syntax() {
        let Some(date) = Local.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).single() else {
            return;
        };
        let formatted = pdf_date(date);
        assert!(formatted.starts_with("D:20240305070809"));
        assert!(formatted.ends_with('\''));
    }
}
