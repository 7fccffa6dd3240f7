use std::fmt;

use super::record::{RecordLayout, normalize_name};

/// XOR key applied to the FAT offset and to each record's size field.
pub const KEY_1: u32 = 0xA893_7462;
/// Second key folded into each record's size check field.
pub const KEY_3: u32 = 0x5937_4231;

/// XOR mask for the 64-bit FAT offset of [`ArchiveVersion::New`] archives.
pub const KEY_1_WIDE: u64 = KEY_1 as u64 | 0xFFFF_FFFF_0000_0000;

/// Archive format version, stored in the last four bytes of the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveVersion {
    OldA,
    OldB,
    New,
}

impl ArchiveVersion {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            131073 => Some(ArchiveVersion::OldA),
            131074 => Some(ArchiveVersion::OldB),
            131075 => Some(ArchiveVersion::New),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            ArchiveVersion::OldA => 131073,
            ArchiveVersion::OldB => 131074,
            ArchiveVersion::New => 131075,
        }
    }

    /// New archives use 64-bit offsets and may span two files.
    pub fn is_new(&self) -> bool {
        matches!(self, ArchiveVersion::New)
    }

    /// Record layout shared by every FAT record of this version.
    pub fn record_layout(&self) -> RecordLayout {
        if self.is_new() {
            RecordLayout::Wide
        } else {
            RecordLayout::Narrow
        }
    }
}

impl fmt::Display for ArchiveVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let family = if self.is_new() { "new" } else { "old" };
        write!(f, "{} ({family})", self.as_u32())
    }
}

/// Location of the file allocation table, recovered from the archive tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    pub version: ArchiveVersion,
    pub entry_count: u32,
    /// Absolute offset of the first FAT record in the address space.
    pub fat_offset: u64,
}

/// One file stored in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PckEntry {
    /// Name as stored, possibly using `\` separators.
    pub name: String,
    /// Set when the stored name contained undecodable bytes.
    pub name_lossy: bool,
    pub data_offset: u64,
    pub uncompressed_size: u32,
    pub compressed_size: u32,
}

impl PckEntry {
    /// Stored data is deflated whenever the two sizes differ.
    pub fn is_compressed(&self) -> bool {
        self.compressed_size != self.uncompressed_size
    }

    /// Name with separators canonicalized to `/`.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Parsed archive: version, FAT location and entries in table order.
#[derive(Debug, Clone)]
pub struct PckArchive {
    pub trailer: Trailer,
    pub entries: Vec<PckEntry>,
}

impl PckArchive {
    pub fn version(&self) -> ArchiveVersion {
        self.trailer.version
    }
}
