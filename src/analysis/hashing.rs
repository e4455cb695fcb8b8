//! Cálculo de hashes para identificar el archivo analizado.

use md5::Md5;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

pub const HASH_SIZE_LIMIT: u64 = 32 * 1024 * 1024; // 32 MiB

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HashSummary {
    pub md5: String,
    pub sha256: String,
}

/// Devuelve los hashes del archivo, o `None` si supera [`HASH_SIZE_LIMIT`].
pub fn file_hashes(path: &Path, len: u64) -> Result<Option<HashSummary>> {
    if len > HASH_SIZE_LIMIT {
        log::debug!(
            "hash skipped for {} ({len} bytes > {} MiB)",
            path.display(),
            HASH_SIZE_LIMIT / (1024 * 1024)
        );
        return Ok(None);
    }

    let mut file = File::open(path).map_err(|error| Error::io(error, path.to_path_buf()))?;

    let mut md5 = Md5::new();
    let mut sha256 = Sha256::new();
    let mut buffer = [0_u8; 8192];
    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|error| Error::io(error, path.to_path_buf()))?;
        if bytes_read == 0 {
            break;
        }
        md5.update(&buffer[..bytes_read]);
        sha256.update(&buffer[..bytes_read]);
    }

    Ok(Some(HashSummary {
        md5: format!("{:x}", md5.finalize()),
        sha256: format!("{:x}", sha256.finalize()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn hashes_known_content() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("abc.txt");
        std::fs::write(&path, b"abc")?;

        let hashes = file_hashes(&path, 3)?;
        assert_eq!(
            hashes,
            Some(HashSummary {
                md5: "900150983cd24fb0d6963f7d28e17f72".to_string(),
                sha256: "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
                    .to_string(),
            })
        );
        Ok(())
    }

    #[test]
    fn large_files_are_skipped() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("big.bin");
        std::fs::write(&path, b"x")?;

        assert_eq!(file_hashes(&path, HASH_SIZE_LIMIT + 1)?, None);
        Ok(())
    }
}
