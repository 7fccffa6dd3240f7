//! Logical address space over one or two containers.
//!
//! Extended archives are split across two physical files. The extension
//! container holds the low addresses `[0, ext_len)` and the base container
//! holds `[ext_len, ext_len + base_len)`, including the trailer. Everything
//! above this layer reads the pair as one contiguous stream.

use std::sync::Arc;

use async_trait::async_trait;

use super::ReadAt;
use crate::error::{Error, Result};

/// A single seekable stream over a base container and an optional extension.
///
/// Reads are positioned and stateless, so one space can be shared across
/// tasks extracting different entries.
#[derive(Clone)]
pub struct AddressSpace {
    base: Arc<dyn ReadAt>,
    extension: Option<Arc<dyn ReadAt>>,
}

impl AddressSpace {
    /// Address space backed by one container.
    pub fn single(base: Arc<dyn ReadAt>) -> Self {
        Self {
            base,
            extension: None,
        }
    }

    /// Address space where `extension` precedes `base`.
    pub fn extended(extension: Arc<dyn ReadAt>, base: Arc<dyn ReadAt>) -> Self {
        Self {
            base,
            extension: Some(extension),
        }
    }

    pub fn new(base: Arc<dyn ReadAt>, extension: Option<Arc<dyn ReadAt>>) -> Self {
        Self { base, extension }
    }

    /// Whether two containers are concatenated.
    pub fn is_extended(&self) -> bool {
        self.extension.is_some()
    }

    /// Length of the low-address extension part (zero when not extended).
    pub fn extension_len(&self) -> u64 {
        self.extension.as_ref().map_or(0, |ext| ext.size())
    }

    pub fn total_length(&self) -> u64 {
        self.extension_len() + self.base.size()
    }

    /// Read exactly `length` bytes at logical `offset`.
    ///
    /// The range is checked before the buffer is allocated, so a corrupt
    /// length field cannot trigger a huge allocation.
    pub async fn read_bytes(&self, offset: u64, length: usize) -> Result<Vec<u8>> {
        let total = self.total_length();
        let requested = length as u64;
        if offset.checked_add(requested).is_none_or(|end| end > total) {
            return Err(Error::OutOfBounds {
                offset,
                length: requested,
                total,
            });
        }

        let mut buf = vec![0u8; length];
        self.read_exact_at(offset, &mut buf).await?;
        Ok(buf)
    }
}

#[async_trait]
impl ReadAt for AddressSpace {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let Some(ext) = &self.extension else {
            return self.base.read_at(offset, buf).await;
        };

        let ext_len = ext.size();
        if offset >= ext_len {
            return self.base.read_at(offset - ext_len, buf).await;
        }

        let available = self.total_length() - offset;
        let len = (buf.len() as u64).min(available) as usize;
        let head = (ext_len - offset).min(len as u64) as usize;

        let (low, high) = buf[..len].split_at_mut(head);
        ext.read_exact_at(offset, low).await?;
        if !high.is_empty() {
            self.base.read_exact_at(0, high).await?;
        }
        Ok(len)
    }

    fn size(&self) -> u64 {
        self.total_length()
    }

    fn transferred_bytes(&self) -> u64 {
        self.base.transferred_bytes()
            + self
                .extension
                .as_ref()
                .map_or(0, |ext| ext.transferred_bytes())
    }
}
