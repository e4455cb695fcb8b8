use std::io::Cursor;

use xmltree::{Element, EmitterConfig, XMLNode};

use crate::error::{Error, Result};
use crate::metadata_editor::constants::{APP_NS, CP_NS, DC_NS, DCTERMS_NS};

/// Describe la información necesaria para localizar un nodo en el XML de propiedades.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FieldSpec {
    pub(crate) prefix: Option<&'static str>,
    pub(crate) local_name: &'static str,
    pub(crate) namespace: &'static str,
}

/// Obtiene el campo de `core.xml` a partir de una etiqueta `prefijo:nombre`.
pub(crate) fn core_field_spec(tag: &'static str) -> Option<FieldSpec> {
    let (prefix, local_name) = tag.split_once(':')?;
    let (prefix, namespace) = match prefix {
        "dc" => ("dc", DC_NS),
        "cp" => ("cp", CP_NS),
        "dcterms" => ("dcterms", DCTERMS_NS),
        _ => return None,
    };

    Some(FieldSpec {
        prefix: Some(prefix),
        local_name,
        namespace,
    })
}

/// Los campos de `app.xml` usan el espacio de nombres por defecto y no llevan prefijo.
pub(crate) fn app_field_spec(tag: &'static str) -> Option<FieldSpec> {
    if tag.is_empty() || tag.contains(':') {
        return None;
    }

    Some(FieldSpec {
        prefix: None,
        local_name: tag,
        namespace: APP_NS,
    })
}

pub(crate) fn parse_xml(contents: &[u8]) -> Result<Element> {
    Element::parse(Cursor::new(contents)).map_err(|error| Error::Xml(error.to_string()))
}

pub(crate) fn write_xml(root: &Element) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut config = EmitterConfig::new();
    config.perform_indent = false;
    config.write_document_declaration = true;
    root.write_with_config(&mut output, config)
        .map_err(|error| Error::Xml(error.to_string()))?;
    Ok(output)
}

/// Inserta o sustituye el contenido de un elemento de metadata.
pub(crate) fn apply_update_to_element(root: &mut Element, spec: FieldSpec, new_value: &str) -> bool {
    for node in root.children.iter_mut() {
        if let XMLNode::Element(child) = node
            && element_matches(child, &spec)
        {
            return set_element_text(child, new_value);
        }
    }

    if new_value.is_empty() {
        return false;
    }

    let mut new_child = Element::new(spec.local_name);
    new_child.prefix = spec.prefix.map(str::to_string);
    new_child.namespace = Some(spec.namespace.to_string());
    new_child.children.push(XMLNode::Text(new_value.to_string()));
    root.children.push(XMLNode::Element(new_child));
    true
}

pub(crate) fn element_matches(element: &Element, spec: &FieldSpec) -> bool {
    element.name == spec.local_name && element.namespace.as_deref() == Some(spec.namespace)
}

/// Sustituye el texto de un elemento si difiere del valor actual.
pub(crate) fn set_element_text(element: &mut Element, new_value: &str) -> bool {
    if element_text_content(element) == new_value.trim() && !has_child_elements(element) {
        return false;
    }

    element.children.clear();
    if !new_value.is_empty() {
        element.children.push(XMLNode::Text(new_value.to_string()));
    }

    true
}

fn has_child_elements(element: &Element) -> bool {
    element
        .children
        .iter()
        .any(|node| matches!(node, XMLNode::Element(_)))
}

/// Devuelve el texto plano contenido dentro de un elemento.
pub(crate) fn element_text_content(element: &Element) -> String {
    let mut content = String::new();
    for node in &element.children {
        match node {
            XMLNode::Text(text) | XMLNode::CData(text) => content.push_str(text),
            _ => {}
        }
    }
    content.trim().to_string()
}

/// Texto del primer hijo que coincide con `spec`.
pub(crate) fn find_field_text(root: &Element, spec: &FieldSpec) -> Option<String> {
    root.children.iter().find_map(|node| match node {
        XMLNode::Element(child) if element_matches(child, spec) => Some(element_text_content(child)),
        _ => None,
    })
}

/// Comprueba que el contenido almacenado en un elemento coincide con el valor esperado.
pub(crate) fn element_matches_expected_value(root: &Element, spec: FieldSpec, expected: &str) -> bool {
    match find_field_text(root, &spec) {
        Some(text) => text == expected,
        None => expected.is_empty(),
    }
}

/// Pares nombre/valor de `custom.xml`, en el orden del documento.
pub(crate) fn custom_property_values(root: &Element) -> Vec<(String, String)> {
    let mut props = Vec::new();
    for node in &root.children {
        let XMLNode::Element(child) = node else {
            continue;
        };
        if child.name != "property" {
            continue;
        }
        let name = match child.attributes.get("name") {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => continue,
        };
        let value = child
            .children
            .iter()
            .find_map(|node| match node {
                XMLNode::Element(value_node) => Some(element_text_content(value_node)),
                _ => None,
            })
            .unwrap_or_default();
        props.push((name, value));
    }
    props
}
