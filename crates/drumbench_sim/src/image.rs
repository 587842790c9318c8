//! Loader for fixed memory images stored as one hexadecimal byte per line.

use crate::error::SimError;
use std::io;
use std::path::{Path, PathBuf};

/// An immutable, fully-populated byte table read from a memory image file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryImage {
    path: PathBuf,
    data: Vec<u8>,
}

impl MemoryImage {
    /// Builds an image from bytes already in memory.
    pub fn from_bytes(path: impl Into<PathBuf>, data: Vec<u8>) -> Result<Self, SimError> {
        let path = path.into();
        if data.is_empty() {
            return Err(SimError::EmptyImage { path });
        }
        Ok(Self { path, data })
    }

    /// Parses image text: one hexadecimal byte per line.
    ///
    /// Blank lines and `//` comments are skipped.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self, SimError> {
        let path = path.into();
        let mut data = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let entry = raw.split("//").next().unwrap_or_default().trim();
            if entry.is_empty() {
                continue;
            }
            let byte = u8::from_str_radix(entry, 16).map_err(|_| SimError::ImageParse {
                path: path.clone(),
                line: index + 1,
                text: entry.to_string(),
            })?;
            data.push(byte);
        }
        Self::from_bytes(path, data)
    }

    /// Returns the file the image was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: construction rejects empty images.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the entry at `index` modulo the image length.
    pub fn at(&self, index: usize) -> u8 {
        self.data[index % self.data.len()]
    }

    /// Returns all entries.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

/// Loads a memory image from disk.
///
/// A missing file is reported as [`SimError::ImageNotFound`] so callers can
/// treat it as a setup failure.
pub fn load_image(path: &Path) -> Result<MemoryImage, SimError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            SimError::ImageNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SimError::ImageIo {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let image = MemoryImage::parse(path, &text)?;
    tracing::debug!(path = %path.display(), entries = image.len(), "loaded memory image");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_lines() {
        let image = MemoryImage::parse("t.mem", "00\n7f\nFF\n80\n").unwrap();
        assert_eq!(image.as_slice(), &[0x00, 0x7f, 0xff, 0x80]);
        assert_eq!(image.len(), 4);
    }

    #[test]
    fn parse_skips_blanks_and_comments() {
        let image = MemoryImage::parse("t.mem", "// kick\n01\n\n  02  // second\n").unwrap();
        assert_eq!(image.as_slice(), &[0x01, 0x02]);
    }

    #[test]
    fn parse_reports_line_number() {
        let err = MemoryImage::parse("t.mem", "01\n02\nzz\n").unwrap_err();
        match err {
            SimError::ImageParse { line, text, .. } => {
                assert_eq!(line, 3);
                assert_eq!(text, "zz");
            }
            other => panic!("expected ImageParse, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_values_wider_than_a_byte() {
        assert!(matches!(
            MemoryImage::parse("t.mem", "100\n"),
            Err(SimError::ImageParse { .. })
        ));
    }

    #[test]
    fn empty_image_rejected() {
        assert!(matches!(
            MemoryImage::parse("t.mem", "\n// nothing\n"),
            Err(SimError::EmptyImage { .. })
        ));
    }

    #[test]
    fn at_wraps() {
        let image = MemoryImage::from_bytes("t", vec![1, 2, 3]).unwrap();
        assert_eq!(image.at(0), 1);
        assert_eq!(image.at(4), 2);
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kick.mem");
        std::fs::write(&path, "10\n20\n").unwrap();
        let image = load_image(&path).unwrap();
        assert_eq!(image.as_slice(), &[0x10, 0x20]);
        assert_eq!(image.path(), path.as_path());
    }

    #[test]
    fn load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("kick.mem")).unwrap_err();
        assert!(matches!(err, SimError::ImageNotFound { .. }));
    }
}
