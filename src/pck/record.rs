//! FAT record decoding.
//!
//! Each record on disk is an 8-byte obfuscated size pair followed by a
//! payload. The payload is either the fixed-size record itself or a zlib
//! stream that inflates to it. Field placement depends only on the
//! archive version, so the layout is picked once per archive.

use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::GBK;
use std::io::Cursor;

use crate::error::{Error, Result};

use super::inflate::inflate_limited;
use super::structures::{KEY_1, KEY_3, PckEntry};

/// Size of the obfuscated `(size, size_check)` pair preceding each record.
pub const RECORD_HEADER_SIZE: usize = 8;

/// Width of the NUL-padded name slot at the start of every record.
pub const NAME_SLOT_SIZE: usize = 260;

/// Fixed record layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// 276-byte record with 32-bit data offsets (old versions).
    Narrow,
    /// 288-byte record with 64-bit data offsets (new version).
    Wide,
}

impl RecordLayout {
    /// Size of an uncompressed record.
    pub const fn size(&self) -> usize {
        match self {
            RecordLayout::Narrow => 276,
            RecordLayout::Wide => 288,
        }
    }

    /// Start of the offset/size fields.
    const fn fields_start(&self) -> usize {
        match self {
            RecordLayout::Narrow => 260,
            RecordLayout::Wide => 264,
        }
    }
}

/// Decode the obfuscated size pair of a record header.
///
/// Returns the payload size, or [`Error::SizeMismatch`] when the two fields
/// disagree after removing their keys.
pub fn decode_record_size(header: &[u8; RECORD_HEADER_SIZE], index: u32) -> Result<u32> {
    let mut cursor = Cursor::new(&header[..]);
    let size = cursor.read_u32::<LittleEndian>()? ^ KEY_1;
    let size_check = cursor.read_u32::<LittleEndian>()? ^ KEY_1 ^ KEY_3;

    if size != size_check {
        return Err(Error::SizeMismatch {
            index,
            size,
            size_check,
        });
    }
    Ok(size)
}

/// Decode one record payload into an entry.
///
/// A payload whose length differs from the layout size is inflated first.
pub fn decode_record(payload: &[u8], layout: RecordLayout, index: u32) -> Result<PckEntry> {
    let expected = layout.size();
    let inflated;
    let record = if payload.len() == expected {
        payload
    } else {
        // one byte past the layout is enough to tell an oversized record
        inflated = inflate_limited(payload, expected + 1)?;
        if inflated.len() != expected {
            return Err(Error::InvalidRecordLength {
                index,
                expected,
                actual: inflated.len(),
            });
        }
        &inflated[..]
    };

    let (name, name_lossy) = decode_entry_name(&record[..NAME_SLOT_SIZE]);

    let mut cursor = Cursor::new(&record[layout.fields_start()..]);
    let data_offset = match layout {
        RecordLayout::Narrow => cursor.read_u32::<LittleEndian>()? as u64,
        RecordLayout::Wide => cursor.read_u64::<LittleEndian>()?,
    };
    let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
    let compressed_size = cursor.read_u32::<LittleEndian>()?;

    Ok(PckEntry {
        name,
        name_lossy,
        data_offset,
        uncompressed_size,
        compressed_size,
    })
}

/// Decode a NUL-terminated GBK name slot.
///
/// Bytes after the first NUL are padding. Invalid sequences become U+FFFD
/// and the returned flag is set.
pub fn decode_entry_name(slot: &[u8]) -> (String, bool) {
    // NUL never appears as a GBK trail byte, so cutting at the byte level is safe
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    let (name, had_errors) = GBK.decode_without_bom_handling(&slot[..end]);
    (name.into_owned(), had_errors)
}

/// Canonicalize separators: every run of `\` or `/` becomes a single `/`.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if c == '\\' || c == '/' {
            if !in_separator {
                out.push('/');
            }
            in_separator = true;
        } else {
            out.push(c);
            in_separator = false;
        }
    }
    out
}
