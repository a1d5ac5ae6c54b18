use crate::cursor::{Cursor, ReadError};
use crate::util::ascii_lossy;

/// The six bytes at the start of every game state file
///
/// Neither field is checked against known values. The magic tag has no
/// enforced constant and the version is only reported.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileHeader {
    magic: [u8; 4],
    version: u16,
}

impl FileHeader {
    /// Number of bytes occupied by the header
    pub const SIZE: usize = 6;

    /// Creates a header from its parts
    pub fn new(magic: [u8; 4], version: u16) -> Self {
        FileHeader { magic, version }
    }

    /// Reads the header from the cursor
    ///
    /// When fewer than [`FileHeader::SIZE`] bytes remain, nothing is consumed.
    pub fn decode(cursor: &mut Cursor) -> Result<Self, ReadError> {
        let mut lookahead = cursor.clone();
        let magic = lookahead.read_bytes(4)?;
        let version = lookahead.read_u16()?;

        let mut tag = [0u8; 4];
        tag.copy_from_slice(magic);
        *cursor = lookahead;
        Ok(FileHeader::new(tag, version))
    }

    /// Parses the header from the start of a byte slice
    ///
    /// ```
    /// use cgs::FileHeader;
    ///
    /// let header = FileHeader::from_slice(b"CGS1\x01\x00").unwrap();
    /// assert_eq!(header.magic_ascii(), "CGS1");
    /// assert_eq!(header.version(), 1);
    /// ```
    pub fn from_slice(data: &[u8]) -> Result<Self, ReadError> {
        FileHeader::decode(&mut Cursor::new(data))
    }

    /// The raw magic tag
    pub fn magic(&self) -> [u8; 4] {
        self.magic
    }

    /// The magic tag with any non-ascii bytes dropped
    pub fn magic_ascii(&self) -> String {
        ascii_lossy(&self.magic)
    }

    /// The format version
    pub fn version(&self) -> u16 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header() {
        let data = b"CGS1\x02\x01trailing";
        let mut cursor = Cursor::new(&data[..]);
        let header = FileHeader::decode(&mut cursor).unwrap();
        assert_eq!(header.magic(), *b"CGS1");
        assert_eq!(header.version(), 0x0102);
        assert_eq!(cursor.position(), FileHeader::SIZE);
    }

    #[test]
    fn test_header_unknown_magic_accepted() {
        let header = FileHeader::from_slice(b"\x00\xffZZ\xff\xff").unwrap();
        assert_eq!(header.magic_ascii(), "\0ZZ");
        assert_eq!(header.version(), u16::MAX);
    }

    #[test]
    fn test_header_too_short() {
        let data = b"CGS1\x01";
        let mut cursor = Cursor::new(&data[..]);
        let err = FileHeader::decode(&mut cursor).unwrap_err();
        assert_eq!(err.position(), 4);
        assert_eq!(cursor.position(), 0);
    }
}
