use crate::error::Result;
use crate::metadata_editor::constants::{
    APP_SANITIZE_FIELDS, CORE_SANITIZE_FIELDS, CUSTOM_PROPERTIES_EMPTY,
};

use super::xml::{FieldSpec, apply_update_to_element, app_field_spec, core_field_spec, parse_xml, write_xml};

/// Normaliza los campos principales de metadata para eliminar rastros de autoría.
pub(crate) fn sanitize_core_properties(contents: Vec<u8>) -> Result<(Vec<u8>, bool)> {
    apply_xml_updates(contents, &CORE_SANITIZE_FIELDS, core_field_spec)
}

/// Elimina valores específicos de metadata de aplicación (app.xml).
pub(crate) fn sanitize_app_properties(contents: Vec<u8>) -> Result<(Vec<u8>, bool)> {
    apply_xml_updates(contents, &APP_SANITIZE_FIELDS, app_field_spec)
}

/// Reemplaza el XML de propiedades personalizadas por una plantilla vacía.
pub(crate) fn sanitize_custom_properties(contents: Vec<u8>) -> (Vec<u8>, bool) {
    let sanitized = CUSTOM_PROPERTIES_EMPTY.as_bytes().to_vec();
    let modified = contents != sanitized;
    (sanitized, modified)
}

pub(crate) fn apply_xml_updates(
    contents: Vec<u8>,
    updates: &[(&'static str, &str)],
    lookup: fn(&'static str) -> Option<FieldSpec>,
) -> Result<(Vec<u8>, bool)> {
    let mut root = parse_xml(&contents)?;

    let mut modified = false;
    for &(tag, value) in updates {
        match lookup(tag) {
            Some(spec) => modified |= apply_update_to_element(&mut root, spec, value),
            None => log::warn!("unknown Office property tag '{tag}'"),
        }
    }

    if !modified {
        return Ok((contents, false));
    }

    Ok((write_xml(&root)?, true))
}
