//! Upload validation and zip archive expansion.

use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use crate::error::IngestError;
use crate::types::{extension, ExtractionItem};

/// Extensions accepted as single-file uploads without expansion.
pub const SINGLE_FILE_EXTENSIONS: &[&str] = &["pdf", "ipynb", "txt", "html", "htm"];

/// Largest uncompressed entry read out of an uploaded archive.
pub const MAX_ENTRY_BYTES: u64 = 256 * 1024 * 1024;

/// Whether `file_name` is a directly supported single-file type.
pub fn is_single_file_type(file_name: &str) -> bool {
    extension(file_name).is_some_and(|ext| SINGLE_FILE_EXTENSIONS.contains(&ext.as_str()))
}

/// Expand an uploaded file into the items it contains.
///
/// A supported single file is returned as-is. Otherwise the content must be a
/// zip archive, whose file entries are returned in archive order. Anything
/// else is rejected with [`IngestError::UnsupportedFormat`].
pub fn expand(file_name: &str, content: Vec<u8>) -> Result<Vec<ExtractionItem>, IngestError> {
    expand_with_limit(file_name, content, MAX_ENTRY_BYTES)
}

/// [`expand`] with an explicit per-entry size cap.
///
/// An entry that inflates past `max_entry_bytes` fails the whole archive with
/// [`IngestError::Extraction`]. Sizes declared in entry headers are never
/// trusted for allocation.
pub fn expand_with_limit(
    file_name: &str,
    content: Vec<u8>,
    max_entry_bytes: u64,
) -> Result<Vec<ExtractionItem>, IngestError> {
    if is_single_file_type(file_name) {
        return Ok(vec![ExtractionItem::new(content, file_name)]);
    }

    match ZipArchive::new(Cursor::new(content.as_slice())) {
        Ok(mut archive) => read_entries(&mut archive, file_name, max_entry_bytes),
        Err(_) => {
            let ext = extension(file_name)
                .map(|e| format!(".{e}"))
                .unwrap_or_else(|| file_name.to_string());
            Err(IngestError::UnsupportedFormat(ext))
        }
    }
}

fn read_entries<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    archive_name: &str,
    max_entry_bytes: u64,
) -> Result<Vec<ExtractionItem>, IngestError> {
    let mut items = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| IngestError::extraction(archive_name, e))?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let mut bytes = Vec::new();
        (&mut entry)
            .take(max_entry_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|e| IngestError::extraction(archive_name, format!("{name}: {e}")))?;
        if bytes.len() as u64 > max_entry_bytes {
            return Err(IngestError::extraction(
                archive_name,
                format!("{name} exceeds {max_entry_bytes} bytes"),
            ));
        }
        items.push(ExtractionItem::new(bytes, name));
    }

    debug!(
        archive = %archive_name,
        entries = ?items.iter().map(|i| i.file_name.as_str()).collect::<Vec<_>>(),
        "Expanded zip archive"
    );

    Ok(items)
}

/// Build a zip archive in memory from `(name, bytes)` entries.
#[cfg(test)]
pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
        } else {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(bytes).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}
