use flate2::read::ZlibDecoder;
use std::io::Read;
use tracing::trace;

use crate::error::{Error, Result};

/// Inflate a complete zlib stream.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut result = Vec::new();

    decoder
        .read_to_end(&mut result)
        .map_err(|e| Error::Decompression(format!("zlib: {e}")))?;

    trace!("zlib: {} bytes -> {} bytes", data.len(), result.len());
    Ok(result)
}

/// Inflate at most `limit` bytes of a zlib stream.
///
/// Output past `limit` is never produced, so the result length tells the
/// caller whether the stream was longer than allowed.
pub fn inflate_limited(data: &[u8], limit: usize) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data).take(limit as u64);
    let mut result = Vec::with_capacity(limit.min(data.len().saturating_mul(4)));

    decoder
        .read_to_end(&mut result)
        .map_err(|e| Error::Decompression(format!("zlib: {e}")))?;

    trace!("zlib: {} bytes -> {} bytes (limit {})", data.len(), result.len(), limit);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::pck::record::tests::deflate;

    #[test]
    fn test_inflate() {
        let data = b"repeated text, ".repeat(30);
        assert_eq!(inflate(&deflate(&data)).unwrap(), data);
    }

    #[test]
    fn test_inflate_limited_stops_at_limit() {
        let data = vec![0x5Au8; 1 << 20];
        let out = inflate_limited(&deflate(&data), 289).unwrap();
        assert_eq!(out.len(), 289);
        assert!(out.iter().all(|&b| b == 0x5A));

        let short = inflate_limited(&deflate(b"short"), 289).unwrap();
        assert_eq!(short, b"short");
    }

    #[test]
    fn test_inflate_garbage() {
        let err = inflate(b"definitely not zlib").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Compression);
    }
}
