use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::AsyncWrite;

use crate::error::Result;
use crate::io::{AddressSpace, open_source};

use super::extractor::PckExtractor;
use super::structures::PckEntry;

/// Extension of the primary file of an extended pair.
pub const EXTENDED_EXTENSION: &str = "pkx";
/// Extension of the companion holding the low addresses of an extended pair.
pub const COMPANION_EXTENSION: &str = "pck";

/// Open an archive from a path or URL.
///
/// `secondary` is the extension container for extended archives; it is
/// read before the primary in the logical address space.
pub async fn open_archive(primary: &str, secondary: Option<&str>) -> Result<PckExtractor> {
    let base = open_source(primary).await?;
    let extension = match secondary {
        Some(location) => Some(open_source(location).await?),
        None => None,
    };

    let space = Arc::new(AddressSpace::new(base, extension));
    PckExtractor::open(space).await
}

/// Entries of an opened archive, in table order.
pub fn list_entries(archive: &PckExtractor) -> &[PckEntry] {
    archive.entries()
}

/// Write one entry's (inflated) data to `destination`.
pub async fn extract_entry<W>(
    archive: &PckExtractor,
    entry: &PckEntry,
    destination: &mut W,
) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    archive.extract_to_writer(entry, destination).await
}

/// Split `location` into stem and extension, looking only at the last segment.
fn split_extension(location: &str) -> Option<(&str, &str)> {
    let segment_start = location.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let dot = location[segment_start..].rfind('.')? + segment_start;
    Some((&location[..dot], &location[dot + 1..]))
}

/// Companion container for an extended primary (`x.pkx` -> `x.pck`).
///
/// Returns `None` when `primary` does not carry the extended extension.
pub fn companion_path(primary: &str) -> Option<String> {
    let (stem, extension) = split_extension(primary)?;
    extension
        .eq_ignore_ascii_case(EXTENDED_EXTENSION)
        .then(|| format!("{stem}.{COMPANION_EXTENSION}"))
}

/// Default extraction root: `<stem>.files` in the current directory.
pub fn default_output_dir(primary: &str) -> PathBuf {
    let segment = primary
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("archive");
    let stem = segment.rsplit_once('.').map_or(segment, |(stem, _)| stem);
    PathBuf::from(format!("{stem}.files"))
}
