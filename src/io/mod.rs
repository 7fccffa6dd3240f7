mod http;
mod local;
mod memory;
mod span;

pub use http::HttpRangeReader;
pub use local::LocalFileReader;
pub use memory::MemoryReader;
pub use span::AddressSpace;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Trait for random access reading from a data source
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Bytes pulled over the network so far (zero for local sources)
    fn transferred_bytes(&self) -> u64 {
        0
    }

    /// Fill `buf` completely from `offset`.
    ///
    /// Fails with [`Error::OutOfBounds`] without touching the source when the
    /// range does not fit inside [`size()`](ReadAt::size).
    async fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let total = self.size();
        let length = buf.len() as u64;
        if offset.checked_add(length).is_none_or(|end| end > total) {
            return Err(Error::OutOfBounds {
                offset,
                length,
                total,
            });
        }

        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_at(offset + filled as u64, &mut buf[filled..]).await?;
            if n == 0 {
                return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
            }
            filled += n;
        }
        Ok(())
    }
}

/// Whether `location` should be fetched over HTTP rather than from disk.
pub fn is_http_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Open a container from a local path or an http(s) URL.
pub async fn open_source(location: &str) -> Result<Arc<dyn ReadAt>> {
    if is_http_url(location) {
        Ok(Arc::new(HttpRangeReader::new(location.to_string()).await?))
    } else {
        Ok(Arc::new(LocalFileReader::new(std::path::Path::new(
            location,
        ))?))
    }
}
