use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};

/// Abre un paquete OOXML para lectura.
pub(crate) fn open_package(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|error| Error::io(error, path.to_path_buf()))?;
    Ok(ZipArchive::new(file)?)
}

/// Lee una entrada del paquete; `None` si no existe.
pub(crate) fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<Vec<u8>>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(error) => return Err(error.into()),
    };

    let mut contents = Vec::new();
    entry.read_to_end(&mut contents)?;
    Ok(Some(contents))
}

/// Copia un documento Office en `output_path` aplicando una transformación por entrada.
///
/// Las entradas de `additions` se escriben al final del paquete. Devuelve si
/// alguna entrada cambió o se añadió.
pub(crate) fn rewrite_package<F>(
    path: &Path,
    output_path: &Path,
    additions: Vec<(&str, Vec<u8>)>,
    mut transform: F,
) -> Result<bool>
where
    F: FnMut(&str, Vec<u8>) -> Result<(Vec<u8>, bool)>,
{
    let mut archive = open_package(path)?;

    let target_file =
        File::create(output_path).map_err(|error| Error::io(error, output_path.to_path_buf()))?;
    let mut writer = ZipWriter::new(target_file);

    let mut modified_any = !additions.is_empty();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();

        let mut options = FileOptions::<'_, ()>::default().compression_method(file.compression());
        if let Some(mode) = file.unix_mode() {
            options = options.unix_permissions(mode);
        }
        if let Some(time) = file.last_modified() {
            options = options.last_modified_time(time);
        }

        if file.is_dir() {
            writer.add_directory(name, options)?;
            continue;
        }

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;

        let (data_to_write, changed) = transform(&name, contents)?;
        modified_any |= changed;

        writer.start_file(name, options)?;
        writer.write_all(&data_to_write)?;
    }

    let options = FileOptions::<'_, ()>::default().compression_method(CompressionMethod::Deflated);
    for (name, contents) in additions {
        writer.start_file(name, options)?;
        writer.write_all(&contents)?;
    }

    writer.finish()?;

    Ok(modified_any)
}
