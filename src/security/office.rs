//! Inspección de las entradas de un contenedor OOXML (ZIP).

use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

use crate::error::{Error, Result};

const VBA_PROJECT_ENTRY: &str = "vbaProject.bin";
const OLE_OBJECT_MARKER: &str = "embeddings/oleObject";

/// Revisa los nombres de las entradas del ZIP. Un archivo que no es ZIP no produce hallazgos.
pub fn scan_office_structure(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|error| Error::io(error, path.to_path_buf()))?;

    let archive = match ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(error) => {
            log::debug!("{} is not a ZIP container: {error}", path.display());
            return Ok(Vec::new());
        }
    };

    Ok(scan_entry_names(archive.file_names()))
}

pub fn scan_entry_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut has_vba_project = false;
    let mut ole_objects = 0_usize;

    for name in names {
        if name.ends_with(VBA_PROJECT_ENTRY) {
            has_vba_project = true;
        }
        if name.contains(OLE_OBJECT_MARKER) {
            ole_objects += 1;
        }
    }

    let mut indicators = Vec::new();
    if has_vba_project {
        indicators.push("Contains VBA macros (vbaProject.bin)".to_string());
    }
    if ole_objects > 0 {
        indicators.push(format!("Contains {ole_objects} embedded OLE object(s)"));
    }
    indicators
}
