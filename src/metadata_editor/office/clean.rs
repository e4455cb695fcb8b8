use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::metadata_editor::constants::{APP_PART, CORE_PART, CUSTOM_PART};

use super::{
    rewrite_package, sanitize_app_properties, sanitize_core_properties, sanitize_custom_properties,
    verify::verify_office_metadata_clean,
};

/// Escribe en `output_path` una copia del documento sin metadata sensible.
///
/// Devuelve `false` si el original ya estaba limpio. Si la verificación
/// posterior falla, la copia se elimina.
pub fn remove_office_metadata(path: &Path, output_path: &Path) -> Result<bool> {
    let rewritten = rewrite_package(path, output_path, Vec::new(), |name, contents| match name {
        CORE_PART => sanitize_core_properties(contents),
        APP_PART => sanitize_app_properties(contents),
        CUSTOM_PART => Ok(sanitize_custom_properties(contents)),
        _ => Ok((contents, false)),
    });

    let cleaned_anything = match rewritten {
        Ok(changed) => changed,
        Err(error) => {
            let _ = fs::remove_file(output_path);
            return Err(error);
        }
    };

    let metadata_clean = match verify_office_metadata_clean(output_path) {
        Ok(clean) => clean,
        Err(error) => {
            let _ = fs::remove_file(output_path);
            return Err(error);
        }
    };

    if !metadata_clean {
        let _ = fs::remove_file(output_path);
        return Err(Error::Verification(format!(
            "sensitive Office properties remain in {}",
            path.display()
        )));
    }

    if cleaned_anything {
        log::info!("Office metadata removed: {}", output_path.display());
    } else {
        log::info!("no sensitive Office metadata found in {}", path.display());
    }

    Ok(cleaned_anything)
}
