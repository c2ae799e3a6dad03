//! Bundling digests for download, plus the request-scoped artifact store.

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::Mutex;

use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::Result;
use crate::digest::PageDigest;

/// Archive filename used when several digests are bundled together.
pub const ARCHIVE_NAME: &str = "webpage_markdown_files.zip";

/// A downloadable artifact: a lone digest keeps its own filename, several
/// digests are packed into one compressed archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bundle {
    Single { filename: String, content: String },
    Archive { filename: String, bytes: Vec<u8> },
}

/// Package digests for download.
///
/// Returns `None` for an empty batch, the raw content for a single digest,
/// and a deflated zip archive named [`ARCHIVE_NAME`] otherwise.
pub fn bundle_digests(digests: &[PageDigest]) -> Result<Option<Bundle>> {
    match digests {
        [] => Ok(None),
        [single] => Ok(Some(Bundle::Single {
            filename: single.filename.clone(),
            content: single.content.clone(),
        })),
        many => Ok(Some(Bundle::Archive {
            filename: ARCHIVE_NAME.to_string(),
            bytes: zip_digests(many)?,
        })),
    }
}

fn zip_digests(digests: &[PageDigest]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for digest in digests {
        writer.start_file(digest.filename.as_str(), options)?;
        writer.write_all(digest.content.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

/// In-memory store of digests awaiting download, keyed by request id.
///
/// Entries are evicted when taken; nothing survives a process restart.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    entries: Mutex<HashMap<Uuid, Vec<PageDigest>>>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a batch of digests and return the request id to fetch them with.
    pub fn put(&self, digests: Vec<PageDigest>) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.lock().expect("artifact store lock poisoned").insert(id, digests);
        id
    }

    /// Remove and return the digests for a request id.
    pub fn take(&self, id: Uuid) -> Option<Vec<PageDigest>> {
        self.entries.lock().expect("artifact store lock poisoned").remove(&id)
    }

    /// Drop every stored batch.
    pub fn clear(&self) {
        self.entries.lock().expect("artifact store lock poisoned").clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("artifact store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
