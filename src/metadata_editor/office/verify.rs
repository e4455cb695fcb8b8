use std::path::Path;

use crate::error::Result;
use crate::metadata_editor::constants::{
    APP_PART, APP_SANITIZE_FIELDS, CORE_PART, CORE_SANITIZE_FIELDS, CUSTOM_PART,
    CUSTOM_PROPERTIES_EMPTY,
};

use super::archive::{open_package, read_entry};
use super::xml::{
    FieldSpec, app_field_spec, core_field_spec, element_matches_expected_value,
    element_text_content, parse_xml,
};

/// Comprueba que un documento Office limpio no conserva metadata sensible.
pub fn verify_office_metadata_clean(path: &Path) -> Result<bool> {
    let mut archive = open_package(path)?;

    let core_clean = match read_entry(&mut archive, CORE_PART)? {
        Some(contents) => is_xml_metadata_clean(&contents, &CORE_SANITIZE_FIELDS, core_field_spec)?,
        None => true,
    };

    let app_clean = match read_entry(&mut archive, APP_PART)? {
        Some(contents) => is_xml_metadata_clean(&contents, &APP_SANITIZE_FIELDS, app_field_spec)?,
        None => true,
    };

    let custom_clean = match read_entry(&mut archive, CUSTOM_PART)? {
        Some(contents) => is_custom_metadata_clean(&contents)?,
        None => true,
    };

    log::debug!(
        "verification of {}: core={core_clean} app={app_clean} custom={custom_clean}",
        path.display()
    );

    Ok(core_clean && app_clean && custom_clean)
}

fn is_xml_metadata_clean(
    contents: &[u8],
    expected_values: &[(&'static str, &str)],
    lookup: fn(&'static str) -> Option<FieldSpec>,
) -> Result<bool> {
    let root = parse_xml(contents)?;

    Ok(expected_values.iter().all(|&(tag, expected)| match lookup(tag) {
        Some(spec) => element_matches_expected_value(&root, spec, expected),
        None => true,
    }))
}

fn is_custom_metadata_clean(contents: &[u8]) -> Result<bool> {
    if contents == CUSTOM_PROPERTIES_EMPTY.as_bytes() {
        return Ok(true);
    }

    let root = parse_xml(contents)?;

    let has_property_elements = root
        .children
        .iter()
        .any(|node| matches!(node, xmltree::XMLNode::Element(_)));

    Ok(!has_property_elements && element_text_content(&root).is_empty())
}
