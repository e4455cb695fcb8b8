//! Operaciones relacionadas con metadata EXIF y texto PNG de imágenes.

use exif::experimental::Writer;
use exif::{Exif, Field, In, Tag, Value};
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Cursor};
use std::path::Path;

use crate::analysis::{decode_user_comment, format_name, png_text_chunks, read_exif};
use crate::error::{Error, Result};

/// Claves que se guardan como etiquetas de IFD0; el resto va a `UserComment` en JSON.
const EXIF_TEXT_TAGS: [(&str, Tag); 7] = [
    ("artist", Tag::Artist),
    ("author", Tag::Artist),
    ("make", Tag::Make),
    ("model", Tag::Model),
    ("software", Tag::Software),
    ("copyright", Tag::Copyright),
    ("datetime", Tag::DateTime),
];

/// Cabecera del segmento APP1 que contiene EXIF.
const EXIF_HEADER: &[u8] = b"Exif\0\0";

fn guess_format(path: &Path) -> Result<ImageReader<std::io::BufReader<File>>> {
    ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|error| Error::io(error, path.to_path_buf()))
}

fn open_image(path: &Path) -> Result<(DynamicImage, ImageFormat)> {
    let reader = guess_format(path)?;

    let Some(format) = reader.format() else {
        return Err(Error::unsupported("Image decoding", "unrecognized image"));
    };

    Ok((reader.decode()?, format))
}

/// Guarda en `output_path` una copia de la imagen reconstruida solo a partir de sus píxeles.
pub fn remove_image_metadata(path: &Path, output_path: &Path) -> Result<()> {
    let (img, format) = open_image(path)?;

    img.save_with_format(output_path, format)?;

    let metadata_clean = match verify_image_metadata_clean(output_path) {
        Ok(clean) => clean,
        Err(error) => {
            let _ = fs::remove_file(output_path);
            return Err(error);
        }
    };

    if !metadata_clean {
        let _ = fs::remove_file(output_path);
        return Err(Error::Verification(format!(
            "EXIF or text metadata remains in {}",
            path.display()
        )));
    }

    log::info!("image metadata removed: {}", output_path.display());
    Ok(())
}

/// Comprueba que una imagen carece de campos EXIF y de fragmentos de texto PNG.
pub fn verify_image_metadata_clean(path: &Path) -> Result<bool> {
    let exif_clean = match read_exif(path)? {
        Some(exif) => exif.fields().next().is_none(),
        None => true,
    };

    let is_png = guess_format(path)?.format() == Some(ImageFormat::Png);
    let text_clean = !is_png || png_text_chunks(path)?.is_empty();

    Ok(exif_clean && text_clean)
}

/// Escribe `metadata` en una copia de la imagen.
///
/// En JPEG las claves conocidas pasan a IFD0 y el resto a `UserComment` como
/// objeto JSON. En PNG se escriben fragmentos de texto, conservando los
/// existentes. Otros formatos no admiten metadata personalizada.
pub fn apply_image_metadata(
    path: &Path,
    output_path: &Path,
    metadata: &BTreeMap<String, String>,
) -> Result<()> {
    let format = guess_format(path)?.format();

    let written = match format {
        Some(ImageFormat::Jpeg) => write_jpeg_exif(path, output_path, metadata),
        Some(ImageFormat::Png) => write_png_metadata(path, output_path, metadata),
        Some(other) => return Err(Error::unsupported("Custom metadata", format_name(other))),
        None => return Err(Error::unsupported("Custom metadata", "unrecognized image")),
    };

    if let Err(error) = written {
        let _ = fs::remove_file(output_path);
        return Err(error);
    }

    log::info!(
        "image metadata written: {} ({} entries)",
        output_path.display(),
        metadata.len()
    );
    Ok(())
}

fn write_png_metadata(path: &Path, output_path: &Path, metadata: &BTreeMap<String, String>) -> Result<()> {
    let (img, _) = open_image(path)?;

    let mut chunks: BTreeMap<String, String> = png_text_chunks(path)?.into_iter().collect();
    chunks.extend(metadata.iter().map(|(key, value)| (key.clone(), value.clone())));

    write_png_with_text(img, output_path, &chunks)
}

/// Reescribe el bloque EXIF del JPEG sin recomprimir los píxeles.
fn write_jpeg_exif(path: &Path, output_path: &Path, metadata: &BTreeMap<String, String>) -> Result<()> {
    let existing = read_exif(path)?;
    let little_endian = existing.as_ref().is_some_and(Exif::little_endian);

    let mut tagged: Vec<(Tag, String)> = Vec::new();
    let mut extra = existing_comment_object(existing.as_ref());
    let mut has_extra = false;
    for (key, value) in metadata {
        let value = normalize_exif_date(key, value);
        match exif_tag_for(key) {
            Some(tag) => {
                tagged.retain(|(existing_tag, _)| *existing_tag != tag);
                tagged.push((tag, value));
            }
            None => {
                extra.insert(key.clone(), serde_json::Value::String(value));
                has_extra = true;
            }
        }
    }

    let mut fields: Vec<Field> = existing
        .iter()
        .flat_map(|exif| exif.fields())
        .filter(|field| field.ifd_num == In::PRIMARY)
        .filter(|field| !matches!(field.value, Value::Unknown(..)))
        .filter(|field| tagged.iter().all(|(tag, _)| *tag != field.tag))
        .filter(|field| !has_extra || field.tag != Tag::UserComment)
        .cloned()
        .collect();

    for (tag, value) in tagged {
        fields.push(Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![value.into_bytes()]),
        });
    }
    if has_extra {
        let comment = serde_json::to_string(&extra)?;
        fields.push(Field {
            tag: Tag::UserComment,
            ifd_num: In::PRIMARY,
            value: Value::Undefined(encode_user_comment(&comment), 0),
        });
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, little_endian)?;

    let jpeg = fs::read(path).map_err(|error| Error::io(error, path.to_path_buf()))?;
    let output = embed_exif_segment(&jpeg, &tiff.into_inner())?;
    fs::write(output_path, output).map_err(|error| Error::io(error, output_path.to_path_buf()))
}

fn exif_tag_for(key: &str) -> Option<Tag> {
    EXIF_TEXT_TAGS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|&(_, tag)| tag)
}

/// Fechas `AAAA-MM-DD...` pasan al formato EXIF `AAAA:MM:DD...`.
fn normalize_exif_date(key: &str, value: &str) -> String {
    if !key.to_lowercase().contains("date") {
        return value.to_string();
    }
    match (value.get(..10), value.get(10..)) {
        (Some(date), Some(rest)) if date.contains('-') => format!("{}{rest}", date.replace('-', ":")),
        _ => value.to_string(),
    }
}

/// Objeto JSON de un `UserComment` previo, para conservar sus claves.
fn existing_comment_object(exif: Option<&Exif>) -> serde_json::Map<String, serde_json::Value> {
    let comment = exif
        .and_then(|exif| exif.get_field(Tag::UserComment, In::PRIMARY))
        .and_then(|field| match &field.value {
            Value::Undefined(bytes, _) => Some(decode_user_comment(bytes)),
            _ => None,
        });

    match comment.map(|text| serde_json::from_str::<serde_json::Value>(&text)) {
        Some(Ok(serde_json::Value::Object(entries))) => entries,
        _ => serde_json::Map::new(),
    }
}

/// `UserComment` con prefijo ASCII, o UNICODE (UTF-16BE) si hace falta.
fn encode_user_comment(text: &str) -> Vec<u8> {
    if text.is_ascii() {
        let mut bytes = b"ASCII\0\0\0".to_vec();
        bytes.extend_from_slice(text.as_bytes());
        return bytes;
    }

    let mut bytes = b"UNICODE\0".to_vec();
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    bytes
}

/// Inserta `tiff` como segmento APP1 tras SOI, descartando los bloques EXIF previos.
pub(crate) fn embed_exif_segment(jpeg: &[u8], tiff: &[u8]) -> Result<Vec<u8>> {
    if !jpeg.starts_with(&[0xFF, 0xD8]) {
        return Err(Error::InvalidInput("not a JPEG stream".to_string()));
    }
    let segment_len = u16::try_from(tiff.len() + EXIF_HEADER.len() + 2).map_err(|_| {
        Error::InvalidInput("EXIF block exceeds the JPEG segment size limit".to_string())
    })?;

    let mut output = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    output.extend_from_slice(&jpeg[..2]);
    output.extend_from_slice(&[0xFF, 0xE1]);
    output.extend_from_slice(&segment_len.to_be_bytes());
    output.extend_from_slice(EXIF_HEADER);
    output.extend_from_slice(tiff);

    // Solo se recorren los segmentos con longitud anteriores a SOS.
    let mut pos = 2;
    while let Some(&[0xFF, marker, high, low]) = jpeg.get(pos..pos + 4) {
        if !(0xC0..=0xFE).contains(&marker) || (0xD0..=0xDA).contains(&marker) {
            break;
        }
        let end = pos + 2 + usize::from(u16::from_be_bytes([high, low]));
        let Some(segment) = jpeg.get(pos..end) else {
            break;
        };
        let is_exif = marker == 0xE1 && segment.get(4..10) == Some(EXIF_HEADER);
        if !is_exif {
            output.extend_from_slice(segment);
        }
        pos = end;
    }
    output.extend_from_slice(&jpeg[pos..]);

    Ok(output)
}

fn write_png_with_text(img: DynamicImage, output_path: &Path, chunks: &BTreeMap<String, String>) -> Result<()> {
    let (width, height) = (img.width(), img.height());
    let (color, pixels) = match img.color() {
        ColorType::L8 => (png::ColorType::Grayscale, img.into_bytes()),
        ColorType::La8 => (png::ColorType::GrayscaleAlpha, img.into_bytes()),
        ColorType::Rgb8 => (png::ColorType::Rgb, img.into_bytes()),
        _ => (png::ColorType::Rgba, img.to_rgba8().into_raw()),
    };

    let file = File::create(output_path).map_err(|error| Error::io(error, output_path.to_path_buf()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);

    for (keyword, text) in chunks {
        if text.is_ascii() {
            encoder.add_text_chunk(keyword.clone(), text.clone())?;
        } else {
            encoder.add_itxt_chunk(keyword.clone(), text.clone())?;
        }
    }

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    writer.finish()?;
    Ok(())
}
