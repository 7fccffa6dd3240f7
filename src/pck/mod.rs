//! PCK archive parsing and extraction.
//!
//! ## Architecture
//!
//! - [`structures`]: versions, trailer, entries and the obfuscation keys
//! - `trailer`: recovers the FAT location from the archive tail
//! - `record`: decodes individual FAT records and entry names
//! - [`parser`]: walks the FAT over an [`AddressSpace`](crate::io::AddressSpace)
//! - [`extractor`]: reads, inflates and writes entry data
//!
//! ## PCK Format Overview
//!
//! A PCK archive consists of:
//! 1. Entry data, each blob optionally zlib-deflated
//! 2. The file allocation table (FAT): one length-prefixed record per entry
//! 3. A fixed-size trailer ending in the entry count and version
//!
//! Table offsets and record lengths are XOR-obfuscated. Version 131075
//! archives use 64-bit offsets and may be split into a `.pck` file holding
//! the low addresses and a `.pkx` file holding the rest plus the trailer.
//!
//! ## Limitations
//!
//! - Read-only; archives cannot be created or modified
//! - No integrity verification beyond the per-record size check

pub mod extractor;
mod inflate;
mod open;
pub mod parser;
mod record;
pub mod structures;
mod trailer;

pub use extractor::{PckExtractor, output_path};
pub use open::{
    COMPANION_EXTENSION, EXTENDED_EXTENSION, companion_path, default_output_dir, extract_entry,
    list_entries, open_archive,
};
pub use parser::PckParser;
pub use record::{RecordLayout, decode_entry_name, normalize_name};
pub use structures::*;
pub use trailer::{NEW_TRAILER_SIZE, OLD_TRAILER_SIZE};
