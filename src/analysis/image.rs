//! Extracción de metadata EXIF y fragmentos de texto PNG.

use exif::{Context, Exif, Field, In, Tag, Value};
use image::{ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};
use crate::value::MetadataValue;

/// Claves de texto PNG que contienen bloques binarios o XML completos.
const IGNORED_TEXT_KEYS: [&str; 4] = ["exif", "icc_profile", "photoshop", "xml:com.adobe.xmp"];

pub fn extract_image_metadata(path: &Path) -> MetadataValue {
    match read_image_metadata(path) {
        Ok(metadata) => metadata,
        Err(error) => {
            log::warn!("could not read image metadata from {}: {error}", path.display());
            let mut metadata = MetadataValue::mapping();
            metadata.insert("error", format!("Error processing image: {error}"));
            metadata
        }
    }
}

fn read_image_metadata(path: &Path) -> Result<MetadataValue> {
    let format = ImageReader::open(path)
        .map_err(|error| Error::io(error, path.to_path_buf()))?
        .with_guessed_format()
        .map_err(|error| Error::io(error, path.to_path_buf()))?
        .format();

    let mut metadata = MetadataValue::mapping();
    if let Some(format) = format {
        metadata.insert("Format", format_name(format));
    }

    let mut has_exif = false;
    if let Some(exif) = read_exif(path)? {
        has_exif = exif.fields().next().is_some();
        push_exif_fields(&exif, &mut metadata);
        push_gps_coordinates(&exif, &mut metadata);
    }

    if format == Some(ImageFormat::Png) {
        for (key, text) in png_text_chunks(path)? {
            if IGNORED_TEXT_KEYS.contains(&key.to_lowercase().as_str()) {
                continue;
            }
            metadata.insert(key, text);
        }
    }

    let only_format = metadata
        .as_mapping()
        .is_some_and(|map| map.keys().all(|key| key == "Format"));
    if !has_exif && only_format {
        metadata.insert("info", "No EXIF data found in image.");
    }

    Ok(metadata)
}

/// Nombre corto del formato en mayúsculas (`PNG`, `JPEG`...).
pub(crate) fn format_name(format: ImageFormat) -> String {
    format!("{format:?}").to_uppercase()
}

/// Lee el bloque EXIF; `None` cuando la imagen no tiene.
pub(crate) fn read_exif(path: &Path) -> Result<Option<Exif>> {
    let file = File::open(path).map_err(|error| Error::io(error, path.to_path_buf()))?;
    let mut reader = BufReader::new(file);

    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(Some(exif)),
        Err(exif::Error::Io(error)) => Err(Error::io(error, path.to_path_buf())),
        Err(error) => {
            log::debug!("no EXIF block in {}: {error}", path.display());
            Ok(None)
        }
    }
}

fn push_exif_fields(exif: &Exif, metadata: &mut MetadataValue) {
    let mut gps = MetadataValue::mapping();

    for field in exif.fields().filter(|field| field.ifd_num == In::PRIMARY) {
        let name = field.tag.to_string();

        if field.tag.context() == Context::Gps {
            gps.insert(name, field_text(field));
            continue;
        }

        if field.tag == Tag::UserComment {
            merge_user_comment(field, metadata);
            continue;
        }

        metadata.insert(name, field_text(field));
    }

    if !gps.is_empty() {
        metadata.insert("GPS", gps);
    }
}

fn field_text(field: &Field) -> String {
    match &field.value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|part| String::from_utf8_lossy(part).trim_end_matches('\0').to_string())
            .collect::<Vec<_>>()
            .join(", ")
            .trim()
            .to_string(),
        _ => field.display_value().to_string(),
    }
}

/// Un comentario con un objeto JSON se incorpora al nivel superior.
fn merge_user_comment(field: &Field, metadata: &mut MetadataValue) {
    let text = match &field.value {
        Value::Undefined(bytes, _) => decode_user_comment(bytes),
        _ => field_text(field),
    };

    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(serde_json::Value::Object(entries)) => {
            for (key, value) in entries {
                metadata.insert(key, MetadataValue::from(value));
            }
        }
        _ if !text.is_empty() => {
            metadata.insert("UserComment", text);
        }
        _ => {}
    }
}

/// Decodifica un `UserComment` con su prefijo de juego de caracteres de 8 bytes.
pub(crate) fn decode_user_comment(bytes: &[u8]) -> String {
    let (prefix, body) = bytes.split_at(bytes.len().min(8));
    let text = match prefix {
        b"UNICODE\0" => {
            let units: Vec<u16> = body
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        b"ASCII\0\0\0" | [0, 0, 0, 0, 0, 0, 0, 0] => String::from_utf8_lossy(body).into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };
    text.trim_matches(|c: char| c == '\0' || c.is_whitespace()).to_string()
}

fn push_gps_coordinates(exif: &Exif, metadata: &mut MetadataValue) {
    let latitude = coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, "S");
    let longitude = coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, "W");

    if let Some(latitude) = latitude {
        metadata.insert("GPS_Latitude", latitude);
    }
    if let Some(longitude) = longitude {
        metadata.insert("GPS_Longitude", longitude);
    }
    if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
        metadata.insert("MapsLink", maps_link(latitude, longitude));
    }
}

/// Convierte grados, minutos y segundos a grados decimales.
fn coordinate(exif: &Exif, value_tag: Tag, ref_tag: Tag, negative_ref: &str) -> Option<f64> {
    let field = exif.get_field(value_tag, In::PRIMARY)?;
    let Value::Rational(parts) = &field.value else {
        return None;
    };
    if parts.len() < 3 || parts.iter().take(3).any(|part| part.denom == 0) {
        return None;
    }

    let decimal = parts[0].to_f64() + parts[1].to_f64() / 60.0 + parts[2].to_f64() / 3600.0;

    let negative = exif
        .get_field(ref_tag, In::PRIMARY)
        .is_some_and(|reference| field_text(reference).eq_ignore_ascii_case(negative_ref));

    Some(if negative { -decimal } else { decimal })
}

pub fn maps_link(latitude: f64, longitude: f64) -> String {
    format!("https://www.google.com/maps?q={latitude},{longitude}")
}

/// Fragmentos tEXt, zTXt e iTXt de un PNG.
pub(crate) fn png_text_chunks(path: &Path) -> Result<Vec<(String, String)>> {
    let file = File::open(path).map_err(|error| Error::io(error, path.to_path_buf()))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let reader = decoder.read_info()?;
    let info = reader.info();

    let mut chunks = Vec::new();
    for chunk in &info.uncompressed_latin1_text {
        chunks.push((chunk.keyword.clone(), chunk.text.clone()));
    }
    for chunk in &info.compressed_latin1_text {
        chunks.push((chunk.keyword.clone(), chunk.get_text()?));
    }
    for chunk in &info.utf8_text {
        chunks.push((chunk.keyword.clone(), chunk.get_text()?));
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_comment_prefixes_are_stripped() {
        assert_eq!(decode_user_comment(b"ASCII\0\0\0hola"), "hola");
        let mut unicode = b"UNICODE\0".to_vec();
        unicode.extend_from_slice(&[0x00, 0x7B, 0x00, 0x7D]);
        assert_eq!(decode_user_comment(&unicode), "{}");
        assert_eq!(decode_user_comment(b"\0\0\0\0\0\0\0\0"), "");
    }

    #[test]
    fn maps_link_uses_decimal_coordinates() {
        assert_eq!(
            maps_link(40.5, -3.25),
            "https://www.google.com/maps?q=40.5,-3.25"
        );
    }
}
