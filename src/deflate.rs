use crate::header::ZLIB_HEADER;

#[cfg(not(any(feature = "miniz", feature = "libdeflate")))]
compile_error!("either the `miniz` or `libdeflate` feature must be enabled");

#[derive(Debug)]
pub(crate) enum DeflateError {
    BadData { msg: String },
    Compress { msg: String },
    LimitExceeded { limit: usize },
}

/// Inflate a raw deflate stream. Bytes trailing the final deflate block are
/// ignored. The size hint is the declared decompressed length, which may be
/// wrong. Output beyond `limit` bytes fails with [`DeflateError::LimitExceeded`].
#[cfg(feature = "libdeflate")]
pub(crate) fn inflate(body: &[u8], size_hint: usize, limit: usize) -> Result<Vec<u8>, DeflateError> {
    use libdeflater::{DecompressionError, Decompressor};

    // the declared length comes from the file, so it only steers the first
    // allocation within a bound of the compressed size
    let hint = size_hint.min(body.len().saturating_mul(64));
    let mut capacity = hint.max(body.len().saturating_mul(4)).max(64).min(limit);
    let mut decompressor = Decompressor::new();
    loop {
        let mut out = vec![0u8; capacity];
        match decompressor.deflate_decompress(body, &mut out) {
            Ok(written) => {
                out.truncate(written);
                return Ok(out);
            }
            Err(DecompressionError::InsufficientSpace) if capacity >= limit => {
                return Err(DeflateError::LimitExceeded { limit });
            }
            Err(DecompressionError::InsufficientSpace) => {
                capacity = capacity.saturating_mul(2).min(limit);
            }
            Err(e) => return Err(DeflateError::BadData { msg: e.to_string() }),
        }
    }
}

#[cfg(all(feature = "miniz", not(feature = "libdeflate")))]
pub(crate) fn inflate(body: &[u8], size_hint: usize, limit: usize) -> Result<Vec<u8>, DeflateError> {
    use miniz_oxide::inflate::{decompress_to_vec_with_limit, TINFLStatus};

    let _ = size_hint;
    decompress_to_vec_with_limit(body, limit).map_err(|e| match e.status {
        TINFLStatus::HasMoreOutput => DeflateError::LimitExceeded { limit },
        status => DeflateError::BadData {
            msg: format!("{:?}", status),
        },
    })
}

/// Compress into a zlib stream that starts with [`ZLIB_HEADER`].
///
/// The FLEVEL bits of the zlib header are informational only, so the header
/// is normalized to the default level bytes that readers of the container
/// require regardless of the level used.
#[cfg(feature = "libdeflate")]
pub(crate) fn compress_zlib(data: &[u8], level: u8) -> Result<Vec<u8>, DeflateError> {
    use libdeflater::{CompressionLvl, Compressor};

    let lvl = CompressionLvl::new(i32::from(level)).map_err(|e| DeflateError::Compress {
        msg: format!("{:?}", e),
    })?;
    let mut compressor = Compressor::new(lvl);
    let mut out = vec![0u8; compressor.zlib_compress_bound(data.len())];
    let written = compressor
        .zlib_compress(data, &mut out)
        .map_err(|e| DeflateError::Compress { msg: e.to_string() })?;
    out.truncate(written);
    out[..2].copy_from_slice(&ZLIB_HEADER);
    Ok(out)
}

#[cfg(all(feature = "miniz", not(feature = "libdeflate")))]
pub(crate) fn compress_zlib(data: &[u8], level: u8) -> Result<Vec<u8>, DeflateError> {
    let mut out = miniz_oxide::deflate::compress_to_vec_zlib(data, level);
    if out.len() < ZLIB_HEADER.len() {
        return Err(DeflateError::Compress {
            msg: String::from("compressor produced no zlib header"),
        });
    }
    out[..2].copy_from_slice(&ZLIB_HEADER);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zlib_header_for_every_level() {
        for level in 0..=9 {
            let out = compress_zlib(b"abcabcabcabc", level).unwrap();
            assert_eq!(&out[..2], &ZLIB_HEADER, "level {}", level);
            let inflated = inflate(&out[2..], 12, usize::MAX).unwrap();
            assert_eq!(inflated, b"abcabcabcabc");
        }
    }

    #[test]
    fn inflate_ignores_bad_size_hint() {
        let data = vec![7u8; 10_000];
        let out = compress_zlib(&data, 6).unwrap();
        assert_eq!(inflate(&out[2..], 3, usize::MAX).unwrap(), data);
    }

    #[test]
    fn inflate_rejects_garbage() {
        // block type 0b11 is reserved
        assert!(inflate(&[0xff, 0xff, 0xff, 0xff], 0, usize::MAX).is_err());
    }

    #[test]
    fn inflate_untrusted_size_hint() {
        let out = compress_zlib(b"hello world", 6).unwrap();
        let inflated = inflate(&out[2..], i32::MAX as usize, usize::MAX).unwrap();
        assert_eq!(inflated, b"hello world");
    }

    #[test]
    fn inflate_respects_limit() {
        let data = vec![0u8; 1 << 20];
        let out = compress_zlib(&data, 9).unwrap();
        assert!(out.len() < 4096);

        let err = inflate(&out[2..], data.len(), 1 << 16).unwrap_err();
        assert!(matches!(err, DeflateError::LimitExceeded { limit } if limit == 1 << 16));

        assert_eq!(inflate(&out[2..], 0, 1 << 21).unwrap().len(), data.len());
    }
}
