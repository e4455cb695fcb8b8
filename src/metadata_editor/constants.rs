//! Valores compartidos para normalizar propiedades de metadata.

pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
pub const CP_NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";
pub const APP_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";
pub const CUSTOM_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/custom-properties";
pub const VT_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";
pub const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
pub const PACKAGE_RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Identificador de formato que Office asigna a las propiedades personalizadas.
pub const CUSTOM_PROPERTY_FMTID: &str = "{D5CDD505-2E9C-101B-9397-08002B2CF9AE}";

pub const CORE_PART: &str = "docProps/core.xml";
pub const APP_PART: &str = "docProps/app.xml";
pub const CUSTOM_PART: &str = "docProps/custom.xml";
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const PACKAGE_RELS_PART: &str = "_rels/.rels";

pub const CORE_SANITIZE_FIELDS: [(&str, &str); 12] = [
    ("dc:creator", ""),
    ("cp:lastModifiedBy", ""),
    ("dcterms:created", ""),
    ("dcterms:modified", ""),
    ("cp:lastPrinted", ""),
    ("dc:title", ""),
    ("dc:subject", ""),
    ("dc:description", ""),
    ("cp:keywords", ""),
    ("cp:category", ""),
    ("cp:contentStatus", ""),
    ("cp:revision", "1"),
];

pub const APP_SANITIZE_FIELDS: [(&str, &str); 6] = [
    ("Application", ""),
    ("Company", ""),
    ("Manager", ""),
    ("Pages", "0"),
    ("Words", "0"),
    ("Lines", "0"),
];

pub const CUSTOM_PROPERTIES_EMPTY: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/custom-properties\" xmlns:vt=\"http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes\"/>\n";

pub const CORE_PROPERTIES_EMPTY: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" xmlns:dcmitype=\"http://purl.org/dc/dcmitype/\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"/>\n";

/// Parte de `docProps` donde vive una propiedad.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DocPart {
    Core,
    App,
}

/// Propiedad Office expuesta con un nombre estable.
pub struct OfficeProperty {
    pub key: &'static str,
    pub part: DocPart,
    pub tag: &'static str,
    /// Si puede escribirse con metadata personalizada.
    pub editable: bool,
}

const fn property(key: &'static str, part: DocPart, tag: &'static str, editable: bool) -> OfficeProperty {
    OfficeProperty {
        key,
        part,
        tag,
        editable,
    }
}

pub const OFFICE_PROPERTIES: [OfficeProperty; 17] = [
    property("author", DocPart::Core, "dc:creator", true),
    property("last_modified_by", DocPart::Core, "cp:lastModifiedBy", true),
    property("title", DocPart::Core, "dc:title", true),
    property("subject", DocPart::Core, "dc:subject", true),
    property("comments", DocPart::Core, "dc:description", true),
    property("category", DocPart::Core, "cp:category", true),
    property("keywords", DocPart::Core, "cp:keywords", true),
    property("content_status", DocPart::Core, "cp:contentStatus", false),
    property("revision", DocPart::Core, "cp:revision", false),
    property("created", DocPart::Core, "dcterms:created", false),
    property("modified", DocPart::Core, "dcterms:modified", false),
    property("last_printed", DocPart::Core, "cp:lastPrinted", false),
    property("company", DocPart::App, "Company", true),
    property("manager", DocPart::App, "Manager", false),
    property("application", DocPart::App, "Application", false),
    property("pages", DocPart::App, "Pages", false),
    property("words", DocPart::App, "Words", false),
];

pub fn editable_office_property(key: &str) -> Option<&'static OfficeProperty> {
    OFFICE_PROPERTIES
        .iter()
        .find(|property| property.editable && property.key == key)
}

/// Plantilla neutra que aplica la opción de metadata por defecto.
pub const DEFAULT_TEMPLATE: [(&str, &str); 6] = [
    ("author", "Anonymous"),
    ("title", "Untitled"),
    ("subject", "General"),
    ("keywords", "document"),
    ("creator", "metaguard"),
    ("producer", "metaguard"),
];
