//! Reading one compressed section from the file body

use super::cursor::ByteCursor;
use super::header::SectionSize;
use crate::compression::{self, CompressionFlags, CompressionMethod};
use crate::error::Result;

/// Read the bytes of one section and return its uncompressed contents.
///
/// - `on_disk == 0`, `uncompressed > 0`: stored raw, read verbatim.
/// - both zero: empty section.
/// - otherwise: read `on_disk` bytes (or `uncompressed` bytes when the method
///   is none) and decompress them.
pub fn read_section(
    cursor: &mut ByteCursor<'_>,
    size: SectionSize,
    flags: CompressionFlags,
    chunked: bool,
    section: &'static str,
) -> Result<Vec<u8>> {
    let uncompressed = size.uncompressed as usize;
    let on_disk = size.on_disk as usize;

    if on_disk == 0 {
        if uncompressed == 0 {
            return Ok(Vec::new());
        }
        tracing::debug!("{section}: {uncompressed} bytes stored uncompressed");
        return cursor.read_bytes(uncompressed);
    }

    let method = flags.method()?;
    let read_size = if method == CompressionMethod::None {
        uncompressed
    } else {
        on_disk
    };

    tracing::debug!(
        "{section}: {read_size} bytes on disk, {uncompressed} uncompressed ({})",
        method.as_str()
    );
    let raw = cursor.read_bytes(read_size)?;
    compression::decompress(&raw, method, uncompressed, chunked, section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_empty_section() {
        let data = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&data, "file");
        let out = read_section(
            &mut cursor,
            SectionSize::default(),
            CompressionFlags(2),
            true,
            "keys",
        )
        .unwrap();
        assert!(out.is_empty());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_raw_section_ignores_method() {
        let data = [1u8, 2, 3, 4, 5];
        let mut cursor = ByteCursor::new(&data, "file");
        let size = SectionSize {
            uncompressed: 4,
            on_disk: 0,
        };
        let out = read_section(&mut cursor, size, CompressionFlags(0x0F), true, "values").unwrap();
        assert_eq!(out, vec![1, 2, 3, 4]);
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_method_none_reads_uncompressed_size() {
        let data = [9u8, 8, 7, 6];
        let mut cursor = ByteCursor::new(&data, "file");
        let size = SectionSize {
            uncompressed: 3,
            on_disk: 100,
        };
        let out = read_section(&mut cursor, size, CompressionFlags(0), true, "nodes").unwrap();
        assert_eq!(out, vec![9, 8, 7]);
    }

    #[test]
    fn test_lz4_block_section() {
        let payload = b"AAAAAAAAAAAAAAAAAAAABBBBBBBBBBBBBBBB".to_vec();
        let mut data = lz4_flex::block::compress(&payload);
        let on_disk = data.len() as u32;
        data.extend_from_slice(&[0xFF; 4]);

        let mut cursor = ByteCursor::new(&data, "file");
        let size = SectionSize {
            uncompressed: payload.len() as u32,
            on_disk,
        };
        let out = read_section(&mut cursor, size, CompressionFlags(2), false, "names").unwrap();
        assert_eq!(out, payload);
        assert_eq!(cursor.remaining(), 4);
    }

    #[test]
    fn test_section_past_end_is_truncated() {
        let data = [0u8; 8];
        let mut cursor = ByteCursor::new(&data, "file");
        let size = SectionSize {
            uncompressed: 64,
            on_disk: 32,
        };
        let err = read_section(&mut cursor, size, CompressionFlags(2), true, "nodes").unwrap_err();
        assert!(matches!(err, Error::TruncatedInput { needed: 32, available: 8, .. }));
    }

    #[test]
    fn test_unknown_method_in_compressed_section() {
        let data = [0u8; 8];
        let mut cursor = ByteCursor::new(&data, "file");
        let size = SectionSize {
            uncompressed: 16,
            on_disk: 8,
        };
        let err = read_section(&mut cursor, size, CompressionFlags(9), true, "nodes").unwrap_err();
        assert!(matches!(err, Error::UnsupportedCompressionMethod { method: 9 }));
    }
}
