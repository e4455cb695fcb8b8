//! Análisis de metadata, evaluación de riesgos y saneamiento de imágenes, PDF y documentos Office.

pub mod analysis;
pub mod error;
pub mod loader;
pub mod metadata_editor;
pub mod security;
pub mod value;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
