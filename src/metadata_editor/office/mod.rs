//! Utilidades para limpiar y modificar metadata de documentos Office basados en ZIP.

mod archive;
mod clean;
mod edit;
mod sanitize;
mod verify;
mod xml;

pub use clean::remove_office_metadata;
pub use edit::apply_office_metadata;
pub use verify::verify_office_metadata_clean;

pub(crate) use archive::{open_package, read_entry, rewrite_package};
pub(crate) use sanitize::{
    apply_xml_updates, sanitize_app_properties, sanitize_core_properties,
    sanitize_custom_properties,
};
pub(crate) use xml::{
    app_field_spec, core_field_spec, custom_property_values, find_field_text, parse_xml,
};
