//! # runpck
//!
//! An extractor for PCK game archives.
//!
//! A PCK archive stores its file allocation table (FAT) at the end, behind an
//! obfuscated trailer. Each table record names one entry and points at its
//! data, which may be zlib-deflated. Large archives of the newest version are
//! split into two files that are read as one logical stream.
//!
//! ## Features
//!
//! - Versions 131073 and 131074 (32-bit offsets) and 131075 (64-bit offsets)
//! - Extended archives split across a `.pck`/`.pkx` pair
//! - Compressed and uncompressed FAT records and entry data
//! - GBK entry names with lossy fallback
//! - Local files and HTTP/HTTPS URLs via Range requests
//!
//! ## Example
//!
//! ```no_run
//! use runpck::open_archive;
//!
//! #[tokio::main]
//! async fn main() -> runpck::Result<()> {
//!     let archive = open_archive("models.pkx", Some("models.pck")).await?;
//!
//!     println!("version {}", archive.version());
//!     for entry in archive.entries() {
//!         println!("{} ({} bytes)", entry.normalized_name(), entry.uncompressed_size);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod pck;

pub use cli::Cli;
pub use error::{Error, ErrorKind, Result};
pub use io::{AddressSpace, HttpRangeReader, LocalFileReader, MemoryReader, ReadAt};
pub use pck::{
    ArchiveVersion, PckArchive, PckEntry, PckExtractor, Trailer, extract_entry, list_entries,
    open_archive,
};
