//! Archive table parsing.
//!
//! Reading starts at the end of the address space:
//! 1. Locate the trailer to learn the version, entry count and FAT offset
//! 2. Walk `entry_count` length-prefixed records from the FAT offset
//! 3. Decode each record with the layout chosen by the version
//!
//! Any failure aborts the whole open; there is no partial table.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::io::{AddressSpace, ReadAt};

use super::record::{RECORD_HEADER_SIZE, RecordLayout, decode_record, decode_record_size};
use super::structures::{PckArchive, PckEntry, Trailer};

/// Low-level PCK table parser.
///
/// Typically used through [`PckExtractor`](super::PckExtractor)
/// rather than directly.
pub struct PckParser {
    space: Arc<AddressSpace>,
}

impl PckParser {
    pub fn new(space: Arc<AddressSpace>) -> Self {
        Self { space }
    }

    /// Find and decode the trailer.
    pub async fn locate_trailer(&self) -> Result<Trailer> {
        Trailer::locate(&self.space).await
    }

    /// Read the record starting at `offset`.
    ///
    /// Returns the entry and the number of bytes the record occupies,
    /// header included. The size pair is checked before the payload is read.
    pub async fn read_record(
        &self,
        offset: u64,
        index: u32,
        layout: RecordLayout,
    ) -> Result<(PckEntry, u64)> {
        let mut header = [0u8; RECORD_HEADER_SIZE];
        self.space.read_exact_at(offset, &mut header).await?;
        let size = decode_record_size(&header, index)?;

        let payload = self
            .space
            .read_bytes(offset + RECORD_HEADER_SIZE as u64, size as usize)
            .await?;
        let entry = decode_record(&payload, layout, index)?;

        Ok((entry, RECORD_HEADER_SIZE as u64 + size as u64))
    }

    /// Read every FAT record described by `trailer`, in table order.
    pub async fn read_fat(&self, trailer: &Trailer) -> Result<Vec<PckEntry>> {
        let layout = trailer.version.record_layout();
        let mut entries = Vec::with_capacity(trailer.entry_count.min(1 << 16) as usize);
        let mut cursor = trailer.fat_offset;

        for index in 0..trailer.entry_count {
            let (entry, consumed) = self.read_record(cursor, index, layout).await?;
            if entry.name_lossy {
                warn!(index, name = %entry.name, "entry name is not valid GBK");
            }
            cursor += consumed;
            entries.push(entry);
        }

        debug!(
            "read {} FAT records ({} bytes)",
            entries.len(),
            cursor - trailer.fat_offset
        );
        Ok(entries)
    }

    /// Locate the trailer and read the full table.
    pub async fn parse(&self) -> Result<PckArchive> {
        let trailer = self.locate_trailer().await?;
        let entries = self.read_fat(&trailer).await?;
        Ok(PckArchive { trailer, entries })
    }

    pub fn space(&self) -> &Arc<AddressSpace> {
        &self.space
    }
}
