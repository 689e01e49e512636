//! Compression codecs accepted for source archives.
//!
//! # Supported Codecs
//!
//! - **Gzip** (.tar.gz, .tgz)
//! - **Bzip2** (.tar.bz2, .tbz2)
//! - **Xz** (.tar.xz, .txz)
//! - **Zstd** (.tar.zst, .tzst)
//!
//! Destination archives are always written uncompressed.

use std::io;
use std::io::BufRead;
use std::io::Read;

/// Compression codec wrapped around a tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip compression (deflate algorithm).
    Gzip,

    /// Bzip2 compression (Burrows-Wheeler algorithm).
    Bzip2,

    /// Xz compression (LZMA2 algorithm).
    Xz,

    /// Zstd compression (Zstandard algorithm).
    Zstd,
}

impl CompressionCodec {
    /// Every supported codec.
    pub const ALL: [Self; 4] = [Self::Gzip, Self::Bzip2, Self::Xz, Self::Zstd];

    /// Returns the leading magic bytes of a stream compressed with this codec.
    ///
    /// # Examples
    ///
    /// ```
    /// use preptar_core::formats::compression::CompressionCodec;
    ///
    /// assert_eq!(CompressionCodec::Gzip.magic(), &[0x1f, 0x8b]);
    /// ```
    #[must_use]
    pub const fn magic(self) -> &'static [u8] {
        match self {
            Self::Gzip => &[0x1f, 0x8b],
            Self::Bzip2 => b"BZh",
            Self::Xz => &[0xfd, b'7', b'z', b'X', b'Z', 0x00],
            Self::Zstd => &[0x28, 0xb5, 0x2f, 0xfd],
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }
}

/// Wraps `reader` in the decoder for `codec`, or returns it unchanged.
///
/// Multi-member gzip, bzip2 and xz streams are decoded as one.
///
/// # Errors
///
/// Returns an error if the zstd decoder cannot be initialised.
pub fn decoder<'a, R: BufRead + 'a>(
    codec: Option<CompressionCodec>,
    reader: R,
) -> io::Result<Box<dyn Read + 'a>> {
    Ok(match codec {
        None => Box::new(reader),
        Some(CompressionCodec::Gzip) => Box::new(flate2::bufread::MultiGzDecoder::new(reader)),
        Some(CompressionCodec::Bzip2) => Box::new(bzip2::bufread::MultiBzDecoder::new(reader)),
        Some(CompressionCodec::Xz) => Box::new(xz2::bufread::XzDecoder::new_multi_decoder(reader)),
        Some(CompressionCodec::Zstd) => {
            Box::new(zstd::stream::read::Decoder::with_buffer(reader)?)
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    const PAYLOAD: &[u8] = b"tar bytes would go here";

    fn decode(codec: Option<CompressionCodec>, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        decoder(codec, data).unwrap().read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_codec_name() {
        assert_eq!(CompressionCodec::Gzip.name(), "gzip");
        assert_eq!(CompressionCodec::Zstd.name(), "zstd");
    }

    #[test]
    fn test_plain_passthrough() {
        assert_eq!(decode(None, PAYLOAD), PAYLOAD);
    }

    #[test]
    fn test_gzip_decoding() {
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        enc.write_all(PAYLOAD).unwrap();
        let data = enc.finish().unwrap();
        assert!(data.starts_with(CompressionCodec::Gzip.magic()));
        assert_eq!(decode(Some(CompressionCodec::Gzip), &data), PAYLOAD);
    }

    #[test]
    fn test_bzip2_decoding() {
        let mut enc = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::fast());
        enc.write_all(PAYLOAD).unwrap();
        let data = enc.finish().unwrap();
        assert!(data.starts_with(CompressionCodec::Bzip2.magic()));
        assert_eq!(decode(Some(CompressionCodec::Bzip2), &data), PAYLOAD);
    }

    #[test]
    fn test_xz_decoding() {
        let mut enc = xz2::write::XzEncoder::new(Vec::new(), 1);
        enc.write_all(PAYLOAD).unwrap();
        let data = enc.finish().unwrap();
        assert!(data.starts_with(CompressionCodec::Xz.magic()));
        assert_eq!(decode(Some(CompressionCodec::Xz), &data), PAYLOAD);
    }

    #[test]
    fn test_zstd_decoding() {
        let data = zstd::encode_all(PAYLOAD, 1).unwrap();
        assert!(data.starts_with(CompressionCodec::Zstd.magic()));
        assert_eq!(decode(Some(CompressionCodec::Zstd), &data), PAYLOAD);
    }

    #[test]
    fn test_concatenated_gzip_members() {
        let mut data = Vec::new();
        for part in [&b"first "[..], &b"second"[..]] {
            let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
            enc.write_all(part).unwrap();
            data.extend(enc.finish().unwrap());
        }
        assert_eq!(decode(Some(CompressionCodec::Gzip), &data), b"first second");
    }
}
