//! Lectura de metadata en documentos Office empaquetados en ZIP.

use std::path::Path;

use crate::error::Result;
use crate::metadata_editor::constants::{
    APP_PART, CORE_PART, CUSTOM_PART, DocPart, OFFICE_PROPERTIES,
};
use crate::metadata_editor::office::{
    app_field_spec, core_field_spec, custom_property_values, find_field_text, open_package,
    parse_xml, read_entry,
};
use crate::value::MetadataValue;

pub fn extract_office_metadata(path: &Path) -> MetadataValue {
    match read_doc_props(path) {
        Ok(metadata) => metadata,
        Err(error) => {
            log::warn!("could not read Office metadata from {}: {error}", path.display());
            let mut metadata = MetadataValue::mapping();
            metadata.insert("error", format!("Failed to read Office metadata: {error}"));
            metadata
        }
    }
}

fn read_doc_props(path: &Path) -> Result<MetadataValue> {
    let mut archive = open_package(path)?;
    let mut metadata = MetadataValue::mapping();

    let core = read_entry(&mut archive, CORE_PART)?
        .map(|contents| parse_xml(&contents))
        .transpose()?;
    let app = read_entry(&mut archive, APP_PART)?
        .map(|contents| parse_xml(&contents))
        .transpose()?;

    for property in &OFFICE_PROPERTIES {
        let (root, spec) = match property.part {
            DocPart::Core => (core.as_ref(), core_field_spec(property.tag)),
            DocPart::App => (app.as_ref(), app_field_spec(property.tag)),
        };
        let (Some(root), Some(spec)) = (root, spec) else {
            continue;
        };
        if let Some(text) = find_field_text(root, &spec).filter(|text| !text.is_empty()) {
            metadata.insert(property.key, text);
        }
    }

    if let Some(contents) = read_entry(&mut archive, CUSTOM_PART)? {
        let root = parse_xml(&contents)?;
        let mut custom = MetadataValue::mapping();
        for (name, value) in custom_property_values(&root) {
            custom.insert(name, value);
        }
        if !custom.is_empty() {
            metadata.insert("custom", custom);
        }
    }

    Ok(metadata)
}
