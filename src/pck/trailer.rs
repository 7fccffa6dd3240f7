//! Trailer location.
//!
//! The archive ends with a fixed-size footer. Its last four bytes are the
//! version, preceded by the entry count. The obfuscated FAT offset sits at
//! the start of the footer, whose length depends on the version family.

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use crate::error::{Error, Result};
use crate::io::AddressSpace;

use super::structures::{ArchiveVersion, KEY_1, KEY_1_WIDE, Trailer};

/// Distance from the end to the FAT offset field in old archives.
pub const OLD_TRAILER_SIZE: u64 = 272;
/// Distance from the end to the FAT offset field in new archives.
pub const NEW_TRAILER_SIZE: u64 = 280;

const VERSION_FROM_END: u64 = 4;
const ENTRY_COUNT_FROM_END: u64 = 8;

impl Trailer {
    /// Read version, entry count and FAT offset from the end of `space`.
    pub async fn locate(space: &AddressSpace) -> Result<Self> {
        let total = space.total_length();
        let tail_offset = |from_end: u64| {
            total.checked_sub(from_end).ok_or(Error::OutOfBounds {
                offset: 0,
                length: from_end,
                total,
            })
        };

        let raw_version = LittleEndian::read_u32(
            &space.read_bytes(tail_offset(VERSION_FROM_END)?, 4).await?,
        );
        let version =
            ArchiveVersion::from_u32(raw_version).ok_or(Error::UnknownVersion(raw_version))?;

        if space.is_extended() && !version.is_new() {
            return Err(Error::UnsupportedExtended(version));
        }

        let entry_count = LittleEndian::read_u32(
            &space.read_bytes(tail_offset(ENTRY_COUNT_FROM_END)?, 4).await?,
        );

        let fat_offset = if version.is_new() {
            let raw = space.read_bytes(tail_offset(NEW_TRAILER_SIZE)?, 8).await?;
            LittleEndian::read_u64(&raw) ^ KEY_1_WIDE
        } else {
            let raw = space.read_bytes(tail_offset(OLD_TRAILER_SIZE)?, 4).await?;
            (LittleEndian::read_u32(&raw) ^ KEY_1) as u64
        };

        debug!("located trailer: version {version}, {entry_count} entries, FAT at {fat_offset:#x}");

        Ok(Self {
            version,
            entry_count,
            fat_offset,
        })
    }
}
