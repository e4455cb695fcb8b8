//! Generadores de archivos de prueba compartidos por los tests de la crate.

use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
    <Override PartName="/docProps/custom.xml" ContentType="application/vnd.openxmlformats-officedocument.custom-properties+xml"/>
</Types>
"#;

pub const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>
"#;

const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:body>
        <w:p><w:r><w:t>Documento de prueba</w:t></w:r></w:p>
    </w:body>
</w:document>
"#;

const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
                   xmlns:dc="http://purl.org/dc/elements/1.1/"
                   xmlns:dcterms="http://purl.org/dc/terms/"
                   xmlns:dcmitype="http://purl.org/dc/dcmitype/"
                   xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:creator>Autor Prueba</dc:creator>
    <cp:lastModifiedBy>Editor Prueba</cp:lastModifiedBy>
    <dcterms:created xsi:type="dcterms:W3CDTF">2024-01-01T00:00:00Z</dcterms:created>
    <dcterms:modified xsi:type="dcterms:W3CDTF">2024-02-01T00:00:00Z</dcterms:modified>
    <dc:title>Documento Demo</dc:title>
    <dc:subject>Asunto Demo</dc:subject>
    <cp:revision>6</cp:revision>
</cp:coreProperties>
"#;

const APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"
            xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>Microsoft Word</Application>
    <Company>Compania Demo</Company>
    <Pages>2</Pages>
    <Words>345</Words>
    <Lines>12</Lines>
</Properties>
"#;

pub const CUSTOM_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/custom-properties"
            xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <property fmtid="{D5CDD505-2E9C-101B-9397-08002B2CF9AE}" pid="2" name="CustomField">
        <vt:lpwstr>Dato Confidencial</vt:lpwstr>
    </property>
</Properties>
"#;

/// Documento Word mínimo con propiedades core, app y personalizadas.
pub fn create_sample_docx(path: &Path) -> TestResult {
    write_docx(path, &[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", RELS_XML),
        ("word/document.xml", DOCUMENT_XML),
        ("docProps/core.xml", CORE_XML),
        ("docProps/app.xml", APP_XML),
        ("docProps/custom.xml", CUSTOM_XML),
    ])
}

/// Documento Word sin `custom.xml`.
pub fn create_docx_without_custom(path: &Path) -> TestResult {
    write_docx(path, &[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", RELS_XML),
        ("word/document.xml", DOCUMENT_XML),
        ("docProps/core.xml", CORE_XML),
        ("docProps/app.xml", APP_XML),
    ])
}

pub fn write_docx(path: &Path, entries: &[(&str, &str)]) -> TestResult {
    let file = File::create(path)?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::<'_, ()>::default().compression_method(CompressionMethod::Stored);

    for (name, contents) in entries {
        writer.start_file(*name, options)?;
        writer.write_all(contents.as_bytes())?;
    }

    writer.finish()?;
    Ok(())
}

/// PDF de una página con el diccionario Info indicado y entradas extra en el catálogo.
pub fn create_sample_pdf(path: &Path, info: &[(&str, &str)], catalog_extra: Dictionary) -> TestResult {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, b"BT ET".to_vec()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0.into(), 0.into(), 200.into(), 200.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    for (key, value) in catalog_extra.into_iter() {
        catalog.set(key, value);
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    if !info.is_empty() {
        let mut dict = Dictionary::new();
        for (key, value) in info {
            dict.set(*key, Object::string_literal(*value));
        }
        let info_id = doc.add_object(dict);
        doc.trailer.set("Info", info_id);
    }

    doc.save(path)?;
    Ok(())
}

/// JPEG de 8x8 con un bloque EXIF APP1 construido a partir de `fields`.
pub fn create_jpeg_with_exif(path: &Path, fields: &[exif::Field]) -> TestResult {
    let pixels = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 10, 10]));
    let mut jpeg = Vec::new();
    image::DynamicImage::ImageRgb8(pixels)
        .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)?;

    let mut writer = exif::experimental::Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false)?;
    let output = crate::metadata_editor::embed_exif_segment(&jpeg, &tiff.into_inner())?;

    std::fs::write(path, output)?;
    Ok(())
}

pub fn ascii_field(tag: exif::Tag, value: &str) -> exif::Field {
    exif::Field {
        tag,
        ifd_num: exif::In::PRIMARY,
        value: exif::Value::Ascii(vec![value.as_bytes().to_vec()]),
    }
}

pub fn rational_field(tag: exif::Tag, parts: [(u32, u32); 3]) -> exif::Field {
    exif::Field {
        tag,
        ifd_num: exif::In::PRIMARY,
        value: exif::Value::Rational(
            parts
                .iter()
                .map(|&(num, denom)| exif::Rational { num, denom })
                .collect(),
        ),
    }
}

/// PNG RGB de 4x4 con fragmentos de texto tEXt.
pub fn create_png_with_text(path: &Path, chunks: &[(&str, &str)]) -> TestResult {
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), 4, 4);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    for (keyword, text) in chunks {
        encoder.add_text_chunk(keyword.to_string(), text.to_string())?;
    }

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&[90_u8; 4 * 4 * 3])?;
    writer.finish()?;
    Ok(())
}
