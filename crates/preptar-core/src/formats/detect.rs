//! Compression detection from leading magic bytes.

use std::io;
use std::io::BufRead;

use super::compression::CompressionCodec;

/// Identifies the codec whose magic bytes prefix `head`.
///
/// Returns `None` for anything else, which is read as a plain tar stream.
///
/// # Examples
///
/// ```
/// use preptar_core::formats::compression::CompressionCodec;
/// use preptar_core::formats::detect::detect_codec;
///
/// assert_eq!(detect_codec(b"BZh91AY&SY"), Some(CompressionCodec::Bzip2));
/// assert_eq!(detect_codec(b"root/a.txt\0\0\0"), None);
/// ```
#[must_use]
pub fn detect_codec(head: &[u8]) -> Option<CompressionCodec> {
    CompressionCodec::ALL
        .into_iter()
        .find(|codec| head.starts_with(codec.magic()))
}

/// Peeks at the buffered head of `reader` and identifies its codec.
///
/// Nothing is consumed from the reader.
///
/// # Errors
///
/// Returns an error if filling the read buffer fails.
pub fn sniff<R: BufRead>(reader: &mut R) -> io::Result<Option<CompressionCodec>> {
    let head = reader.fill_buf()?;
    Ok(detect_codec(head))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::BufReader;
    use std::io::Read;

    #[test]
    fn test_detect_each_codec() {
        for codec in CompressionCodec::ALL {
            let mut head = codec.magic().to_vec();
            head.extend_from_slice(b"payload");
            assert_eq!(detect_codec(&head), Some(codec));
        }
    }

    #[test]
    fn test_detect_plain_and_short_input() {
        assert_eq!(detect_codec(b""), None);
        assert_eq!(detect_codec(&[0x1f]), None);
        assert_eq!(detect_codec(&[0xfd, b'7', b'z']), None);
    }

    #[test]
    fn test_sniff_does_not_consume() {
        let data = [0x1f, 0x8b, 0x08, 0x00];
        let mut reader = BufReader::new(&data[..]);
        assert_eq!(sniff(&mut reader).unwrap(), Some(CompressionCodec::Gzip));

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, data);
    }
}
