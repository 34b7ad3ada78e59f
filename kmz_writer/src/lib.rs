mod kml;

use std::io::{Cursor, Write};

use cadastral::ResolutionResult;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Conventional name of the KML document at the archive root; standard
/// geo viewers look it up there.
const DOCUMENT_NAME: &str = "doc.kml";

/// The finished archive. Immutable once produced; streamed to the caller
/// and discarded.
#[derive(Debug)]
pub struct KmzDocument(Vec<u8>);

impl KmzDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum KmzError {
    #[error("Failed to write the KML document")]
    Kml(#[from] std::fmt::Error),
    #[error("Failed to build the KMZ archive")]
    Archive(#[from] zip::result::ZipError),
    #[error("Failed to write the archive bytes")]
    Io(#[from] std::io::Error),
}

/// Serializes a resolution result into a KMZ archive. An empty result still
/// produces a valid archive with an empty folder; presenting "no parcels"
/// is the caller's decision.
pub fn encode(folder_name: &str, result: &ResolutionResult) -> Result<KmzDocument, KmzError> {
    let document = kml::document(folder_name, result.parcels())?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file(DOCUMENT_NAME, options)?;
    writer.write_all(document.as_bytes())?;
    let cursor = writer.finish()?;
    Ok(KmzDocument(cursor.into_inner()))
}
