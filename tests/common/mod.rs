//! Synthetic PCK archive builder for integration tests.

#![allow(dead_code)]

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

pub const KEY_1: u32 = 0xA893_7462;
pub const KEY_3: u32 = 0x5937_4231;

pub const OLD_A: u32 = 131073;
pub const NEW: u32 = 131075;

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub struct TestEntry {
    pub name: Vec<u8>,
    /// Bytes stored in the archive
    pub stored: Vec<u8>,
    pub uncompressed_size: u32,
    pub compress_record: bool,
}

impl TestEntry {
    /// Entry stored as-is.
    pub fn stored(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.as_bytes().to_vec(),
            stored: data.to_vec(),
            uncompressed_size: data.len() as u32,
            compress_record: false,
        }
    }

    /// Entry stored deflated.
    pub fn deflated(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.as_bytes().to_vec(),
            stored: deflate(data),
            uncompressed_size: data.len() as u32,
            compress_record: false,
        }
    }

    pub fn with_compressed_record(mut self) -> Self {
        self.compress_record = true;
        self
    }
}

/// Build a complete archive image: entry data, FAT and trailer.
pub fn build_archive(version: u32, entries: &[TestEntry]) -> Vec<u8> {
    let new = version == NEW;
    // leading bytes so no entry sits at offset zero
    let mut out = b"PCKTEST\0".to_vec();

    let mut offsets = Vec::new();
    for entry in entries {
        offsets.push(out.len() as u64);
        out.extend_from_slice(&entry.stored);
    }

    let fat_offset = out.len() as u64;
    for (entry, offset) in entries.iter().zip(offsets) {
        let mut record = vec![0u8; 260];
        record[..entry.name.len()].copy_from_slice(&entry.name);
        if new {
            record.extend_from_slice(&[0u8; 4]);
            record.extend_from_slice(&offset.to_le_bytes());
        } else {
            record.extend_from_slice(&(offset as u32).to_le_bytes());
        }
        record.extend_from_slice(&entry.uncompressed_size.to_le_bytes());
        record.extend_from_slice(&(entry.stored.len() as u32).to_le_bytes());
        record.resize(if new { 288 } else { 276 }, 0);

        let payload = if entry.compress_record {
            deflate(&record)
        } else {
            record
        };
        let size = payload.len() as u32;
        out.extend_from_slice(&(size ^ KEY_1).to_le_bytes());
        out.extend_from_slice(&(size ^ KEY_1 ^ KEY_3).to_le_bytes());
        out.extend_from_slice(&payload);
    }

    let trailer_size = if new { 280 } else { 272 };
    let mut trailer = vec![0u8; trailer_size];
    if new {
        let mask = KEY_1 as u64 | 0xFFFF_FFFF_0000_0000;
        trailer[..8].copy_from_slice(&(fat_offset ^ mask).to_le_bytes());
    } else {
        trailer[..4].copy_from_slice(&(fat_offset as u32 ^ KEY_1).to_le_bytes());
    }
    trailer[trailer_size - 8..trailer_size - 4]
        .copy_from_slice(&(entries.len() as u32).to_le_bytes());
    trailer[trailer_size - 4..].copy_from_slice(&version.to_le_bytes());
    out.extend(trailer);

    out
}
