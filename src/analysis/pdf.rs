//! Extracción de metadata en PDFs mediante lectura del diccionario Info.

use lopdf::{Dictionary, Document, Object};
use std::path::Path;

use crate::error::Result;
use crate::value::MetadataValue;

pub fn extract_pdf_metadata(path: &Path) -> MetadataValue {
    match read_info_dictionary(path) {
        Ok(metadata) => metadata,
        Err(error) => {
            log::warn!("could not read PDF metadata from {}: {error}", path.display());
            let mut metadata = MetadataValue::mapping();
            metadata.insert("error", format!("Failed to read PDF metadata: {error}"));
            metadata
        }
    }
}

fn read_info_dictionary(path: &Path) -> Result<MetadataValue> {
    let doc = Document::load(path)?;
    let mut metadata = MetadataValue::mapping();

    let Some(info) = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|info| deref_dictionary(&doc, info))
    else {
        return Ok(metadata);
    };

    for (key, value) in info.iter() {
        let key = String::from_utf8_lossy(key).trim_start_matches('/').to_string();
        if let Some(text) = object_to_string(&doc, value) {
            metadata.insert(key, text);
        }
    }

    Ok(metadata)
}

pub(crate) fn deref_dictionary<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(reference) => doc.get_dictionary(*reference).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn object_to_string(doc: &Document, obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_text(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).trim().to_string()),
        Object::Integer(value) => Some(value.to_string()),
        Object::Real(value) => Some(value.to_string()),
        Object::Boolean(value) => Some(value.to_string()),
        Object::Reference(reference) => doc
            .get_object(*reference)
            .ok()
            .and_then(|inner| object_to_string(doc, inner)),
        _ => None,
    }
}

/// Decodifica una cadena de texto PDF: UTF-16BE con BOM o bytes de un solo octeto.
pub(crate) fn decode_pdf_text(bytes: &[u8]) -> String {
    let text = match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => bytes.iter().map(|&byte| char::from(byte)).collect(),
        },
    };
    text.trim().to_string()
}

/// Codifica texto para el diccionario Info; ASCII queda literal y el resto en UTF-16BE.
pub(crate) fn encode_pdf_text(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, lopdf::StringFormat::Hexadecimal)
}
