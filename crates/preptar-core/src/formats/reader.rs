//! Source archive opening.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use crate::FilterConfig;
use crate::PrepError;
use crate::Result;

use super::compression::CompressionCodec;
use super::compression::decoder;
use super::detect::sniff;

/// A source archive opened for sequential reading.
pub struct SourceArchive {
    archive: tar::Archive<Box<dyn Read>>,
    codec: Option<CompressionCodec>,
}

impl SourceArchive {
    /// Opens `path` with a buffered reader of `config.read_buffer_size`,
    /// detecting and decoding any supported compression.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::SourceOpen`] if the file cannot be opened, read,
    /// or its decoder cannot be initialised.
    pub fn open(path: &Path, config: &FilterConfig) -> Result<Self> {
        let open_error = |source| PrepError::SourceOpen {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_error)?;
        let mut reader = BufReader::with_capacity(config.read_buffer_size, file);
        let codec = sniff(&mut reader).map_err(open_error)?;
        let stream = decoder(codec, reader).map_err(open_error)?;

        Ok(Self {
            archive: tar::Archive::new(stream),
            codec,
        })
    }

    /// Returns the compression codec detected on open.
    #[must_use]
    pub const fn codec(&self) -> Option<CompressionCodec> {
        self.codec
    }

    /// Returns the underlying tar reader.
    pub fn archive_mut(&mut self) -> &mut tar::Archive<Box<dyn Read>> {
        &mut self.archive
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;
    use std::io::Write;

    #[test]
    fn test_open_missing_file() {
        let err = SourceArchive::open(Path::new("/nonexistent/src.tar"), &FilterConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, PrepError::SourceOpen { .. }));
    }

    #[test]
    fn test_open_plain_and_gzip() {
        let temp = tempfile::tempdir().unwrap();
        let data = TarTestBuilder::new().add_file("root/a.txt", b"abc").build();

        let plain = temp.path().join("src.tar");
        std::fs::write(&plain, &data).unwrap();

        let gz = temp.path().join("src.tar.gz");
        let mut enc = flate2::write::GzEncoder::new(
            File::create(&gz).unwrap(),
            flate2::Compression::default(),
        );
        enc.write_all(&data).unwrap();
        enc.finish().unwrap();

        for (path, codec) in [(plain, None), (gz, Some(CompressionCodec::Gzip))] {
            let mut source = SourceArchive::open(&path, &FilterConfig::default()).unwrap();
            assert_eq!(source.codec(), codec);
            let count = source.archive_mut().entries().unwrap().count();
            assert_eq!(count, 1);
        }
    }
}
