use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::error::Result;
use crate::io::AddressSpace;

use super::inflate::inflate;
use super::parser::PckParser;
use super::structures::{ArchiveVersion, PckArchive, PckEntry};

/// PCK archive extractor
pub struct PckExtractor {
    parser: PckParser,
    archive: PckArchive,
}

impl PckExtractor {
    /// Parse the archive table from `space`.
    pub async fn open(space: Arc<AddressSpace>) -> Result<Self> {
        let parser = PckParser::new(space);
        let archive = parser.parse().await?;
        Ok(Self { parser, archive })
    }

    /// Wrap an already parsed table.
    pub fn from_parts(space: Arc<AddressSpace>, archive: PckArchive) -> Self {
        Self {
            parser: PckParser::new(space),
            archive,
        }
    }

    pub fn archive(&self) -> &PckArchive {
        &self.archive
    }

    pub fn version(&self) -> ArchiveVersion {
        self.archive.version()
    }

    /// Entries in table order
    pub fn entries(&self) -> &[PckEntry] {
        &self.archive.entries
    }

    pub fn space(&self) -> &Arc<AddressSpace> {
        self.parser.space()
    }

    /// Extract entry data to memory
    ///
    /// Data is inflated only when the stored and declared sizes differ.
    pub async fn extract_to_memory(&self, entry: &PckEntry) -> Result<Vec<u8>> {
        let stored = self
            .space()
            .read_bytes(entry.data_offset, entry.compressed_size as usize)
            .await?;

        if !entry.is_compressed() {
            return Ok(stored);
        }

        let data = inflate(&stored)?;
        if data.len() != entry.uncompressed_size as usize {
            warn!(
                name = %entry.name,
                declared = entry.uncompressed_size,
                actual = data.len(),
                "inflated size differs from declared size"
            );
        }
        Ok(data)
    }

    /// Extract entry data into `writer`
    pub async fn extract_to_writer<W>(&self, entry: &PckEntry, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let data = self.extract_to_memory(entry).await?;
        writer.write_all(&data).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Extract entry to disk
    pub async fn extract_to_file(&self, entry: &PckEntry, output_path: &Path) -> Result<()> {
        // Nothing is created on disk for an entry that fails to decode
        let data = self.extract_to_memory(entry).await?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = fs::File::create(output_path).await?;
        file.write_all(&data).await?;
        file.flush().await?;

        Ok(())
    }

    /// Extract entry to stdout
    pub async fn extract_to_stdout(&self, entry: &PckEntry) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        self.extract_to_writer(entry, &mut stdout).await
    }
}

impl fmt::Debug for PckExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PckExtractor")
            .field("trailer", &self.archive.trailer)
            .field("entries", &self.archive.entries.len())
            .field("extended", &self.space().is_extended())
            .finish()
    }
}

/// Output location of `entry` under `root`.
///
/// Only normal components of the normalized name are kept, so names cannot
/// climb out of `root`. With `junk_paths` only the final component is used.
/// Returns `None` when no normal component remains.
pub fn output_path(root: &Path, entry: &PckEntry, junk_paths: bool) -> Option<PathBuf> {
    let name = entry.normalized_name();
    let mut parts: Vec<&str> = Path::new(&name)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        return None;
    }
    if junk_paths {
        parts.drain(..parts.len() - 1);
    }

    let mut path = root.to_path_buf();
    path.extend(parts);
    Some(path)
}
