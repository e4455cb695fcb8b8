use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use xmltree::{Element, XMLNode};

use crate::error::Result;
use crate::metadata_editor::constants::{
    APP_PART, CONTENT_TYPES_NS, CONTENT_TYPES_PART, CORE_PART, CORE_PROPERTIES_EMPTY, CUSTOM_NS,
    CUSTOM_PART, CUSTOM_PROPERTIES_EMPTY, CUSTOM_PROPERTY_FMTID, DocPart, PACKAGE_RELS_NS,
    PACKAGE_RELS_PART, VT_NS, editable_office_property,
};

use super::archive::open_package;
use super::xml::{app_field_spec, core_field_spec, parse_xml, write_xml};
use super::{apply_xml_updates, rewrite_package};

/// Parte de propiedades que puede faltar en el paquete y hay que registrar.
struct PackagePart {
    name: &'static str,
    content_type: &'static str,
    relationship: &'static str,
}

const CORE_PACKAGE_PART: PackagePart = PackagePart {
    name: CORE_PART,
    content_type: "application/vnd.openxmlformats-package.core-properties+xml",
    relationship: "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
};

const CUSTOM_PACKAGE_PART: PackagePart = PackagePart {
    name: CUSTOM_PART,
    content_type: "application/vnd.openxmlformats-officedocument.custom-properties+xml",
    relationship: "http://schemas.openxmlformats.org/officeDocument/2006/relationships/custom-properties",
};

/// Escribe en `output_path` una copia del documento con la metadata indicada.
///
/// Las claves conocidas van a `core.xml` o `app.xml`; el resto se guarda como
/// propiedades personalizadas.
pub fn apply_office_metadata(
    path: &Path,
    output_path: &Path,
    metadata: &BTreeMap<String, String>,
) -> Result<()> {
    let mut core_updates = Vec::new();
    let mut app_updates = Vec::new();
    let mut custom = Vec::new();

    for (key, value) in metadata {
        match editable_office_property(&key.to_lowercase()) {
            Some(property) if property.part == DocPart::Core => {
                core_updates.push((property.tag, value.as_str()))
            }
            Some(property) => app_updates.push((property.tag, value.as_str())),
            None => custom.push((key.as_str(), value.as_str())),
        }
    }

    let (has_core, has_app, has_custom) = {
        let archive = open_package(path)?;
        let names: Vec<&str> = archive.file_names().collect();
        (
            names.contains(&CORE_PART),
            names.contains(&APP_PART),
            names.contains(&CUSTOM_PART),
        )
    };

    let mut additions = Vec::new();
    let mut new_parts = Vec::new();

    if !core_updates.is_empty() && !has_core {
        let (contents, _) = apply_xml_updates(
            CORE_PROPERTIES_EMPTY.as_bytes().to_vec(),
            &core_updates,
            core_field_spec,
        )?;
        additions.push((CORE_PART, contents));
        new_parts.push(&CORE_PACKAGE_PART);
    }

    if !custom.is_empty() && !has_custom {
        let (contents, _) = upsert_custom_properties(CUSTOM_PROPERTIES_EMPTY.as_bytes().to_vec(), &custom)?;
        additions.push((CUSTOM_PART, contents));
        new_parts.push(&CUSTOM_PACKAGE_PART);
    }

    if !app_updates.is_empty() && !has_app {
        log::warn!(
            "{} has no {APP_PART}; application properties were skipped",
            path.display()
        );
    }

    let result = rewrite_package(path, output_path, additions, |name, contents| match name {
        CORE_PART if !core_updates.is_empty() => {
            apply_xml_updates(contents, &core_updates, core_field_spec)
        }
        APP_PART if !app_updates.is_empty() => apply_xml_updates(contents, &app_updates, app_field_spec),
        CUSTOM_PART if !custom.is_empty() => upsert_custom_properties(contents, &custom),
        CONTENT_TYPES_PART if !new_parts.is_empty() => register_content_types(contents, &new_parts),
        PACKAGE_RELS_PART if !new_parts.is_empty() => register_relationships(contents, &new_parts),
        _ => Ok((contents, false)),
    });

    if let Err(error) = result {
        let _ = fs::remove_file(output_path);
        return Err(error);
    }

    log::info!(
        "Office metadata written: {} ({} core, {} app, {} custom)",
        output_path.display(),
        core_updates.len(),
        app_updates.len(),
        custom.len()
    );
    Ok(())
}

/// Inserta o actualiza propiedades de texto en `custom.xml`.
pub(crate) fn upsert_custom_properties(
    contents: Vec<u8>,
    properties: &[(&str, &str)],
) -> Result<(Vec<u8>, bool)> {
    let mut root = parse_xml(&contents)?;

    let mut next_pid = root
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(child) => child.attributes.get("pid")?.parse::<u32>().ok(),
            _ => None,
        })
        .max()
        .map_or(2, |pid| pid + 1);

    for &(name, value) in properties {
        let existing = root.children.iter_mut().find_map(|node| match node {
            XMLNode::Element(child)
                if child.name == "property"
                    && child.attributes.get("name").map(String::as_str) == Some(name) =>
            {
                Some(child)
            }
            _ => None,
        });

        match existing {
            Some(property) => {
                property.children = vec![XMLNode::Element(text_value(value))];
            }
            None => {
                let mut property = Element::new("property");
                property.namespace = Some(CUSTOM_NS.to_string());
                property
                    .attributes
                    .insert("fmtid".to_string(), CUSTOM_PROPERTY_FMTID.to_string());
                property
                    .attributes
                    .insert("pid".to_string(), next_pid.to_string());
                property
                    .attributes
                    .insert("name".to_string(), name.to_string());
                property.children.push(XMLNode::Element(text_value(value)));
                root.children.push(XMLNode::Element(property));
                next_pid += 1;
            }
        }
    }

    Ok((write_xml(&root)?, !properties.is_empty()))
}

fn text_value(value: &str) -> Element {
    let mut element = Element::new("lpwstr");
    element.prefix = Some("vt".to_string());
    element.namespace = Some(VT_NS.to_string());
    element.children.push(XMLNode::Text(value.to_string()));
    element
}

fn register_content_types(contents: Vec<u8>, parts: &[&PackagePart]) -> Result<(Vec<u8>, bool)> {
    let mut root = parse_xml(&contents)?;
    let mut modified = false;

    for part in parts {
        let part_name = format!("/{}", part.name);
        let registered = child_elements(&root)
            .any(|child| child.attributes.get("PartName") == Some(&part_name));
        if registered {
            continue;
        }

        let mut entry = Element::new("Override");
        entry.namespace = Some(CONTENT_TYPES_NS.to_string());
        entry.attributes.insert("PartName".to_string(), part_name);
        entry
            .attributes
            .insert("ContentType".to_string(), part.content_type.to_string());
        root.children.push(XMLNode::Element(entry));
        modified = true;
    }

    if !modified {
        return Ok((contents, false));
    }
    Ok((write_xml(&root)?, true))
}

fn register_relationships(contents: Vec<u8>, parts: &[&PackagePart]) -> Result<(Vec<u8>, bool)> {
    let mut root = parse_xml(&contents)?;
    let mut modified = false;

    for part in parts {
        let registered = child_elements(&root)
            .any(|child| child.attributes.get("Type").map(String::as_str) == Some(part.relationship));
        if registered {
            continue;
        }

        let ids: Vec<String> = child_elements(&root)
            .filter_map(|child| child.attributes.get("Id").cloned())
            .collect();
        let id = (1..)
            .map(|n| format!("rId{n}"))
            .find(|candidate| !ids.contains(candidate))
            .unwrap_or_else(|| "rIdMeta".to_string());

        let mut relationship = Element::new("Relationship");
        relationship.namespace = Some(PACKAGE_RELS_NS.to_string());
        relationship.attributes.insert("Id".to_string(), id);
        relationship
            .attributes
            .insert("Type".to_string(), part.relationship.to_string());
        relationship
            .attributes
            .insert("Target".to_string(), part.name.to_string());
        root.children.push(XMLNode::Element(relationship));
        modified = true;
    }

    if !modified {
        return Ok((contents, false));
    }
    Ok((write_xml(&root)?, true))
}

fn child_elements(root: &Element) -> impl Iterator<Item = &Element> {
    root.children.iter().filter_map(|node| match node {
        XMLNode::Element(child) => Some(child),
        _ => None,
    })
}
