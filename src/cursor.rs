use crate::util::get_split;
use std::fmt;

/// A read asked for more bytes than the buffer had left
///
/// The cursor that produced the error has not moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadError {
    position: usize,
    needed: usize,
    remaining: usize,
}

impl ReadError {
    /// The offset the read was attempted at
    pub fn position(&self) -> usize {
        self.position
    }

    /// The number of bytes the read required
    pub fn needed(&self) -> usize {
        self.needed
    }

    /// The number of bytes that were left in the buffer
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "buffer exhausted at {}: needed {} bytes but only {} remain",
            self.position, self.needed, self.remaining
        )
    }
}

/// Forward-only, bounds-checked reader over a borrowed byte slice
///
/// All fixed width fields are little endian.
///
/// ```
/// use cgs::Cursor;
///
/// let data = [0x2a, 0x00, 0x00, 0x00, 0x01];
/// let mut cursor = Cursor::new(&data[..]);
/// assert_eq!(cursor.read_u32().unwrap(), 42);
/// assert_eq!(cursor.position(), 4);
///
/// // Not enough data: the error is reported and the position is unchanged
/// assert!(cursor.read_u16().is_err());
/// assert_eq!(cursor.position(), 4);
/// assert_eq!(cursor.read_bool().unwrap(), true);
/// ```
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    original_length: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned at the start of the data
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            original_length: data.len(),
        }
    }

    /// The bytes not yet consumed
    #[inline]
    pub fn remainder(&self) -> &'a [u8] {
        self.data
    }

    /// Number of bytes not yet consumed
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Offset of the next read from the start of the buffer
    #[inline]
    pub fn position(&self) -> usize {
        self.original_length - self.data.len()
    }

    #[inline]
    fn exhausted(&self, needed: usize) -> ReadError {
        ReadError {
            position: self.position(),
            needed,
            remaining: self.remaining(),
        }
    }

    #[inline]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let (head, rest) = get_split::<N>(self.data).ok_or_else(|| self.exhausted(N))?;
        self.data = rest;
        Ok(head)
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        self.read_array().map(u16::from_le_bytes)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        self.read_array().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        self.read_array().map(i32::from_le_bytes)
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32, ReadError> {
        self.read_array().map(f32::from_le_bytes)
    }

    /// Reads a single byte where any nonzero value is true
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, ReadError> {
        let (&first, rest) = self.data.split_first().ok_or_else(|| self.exhausted(1))?;
        self.data = rest;
        Ok(first != 0)
    }

    /// Reads the next `len` bytes as a borrowed run
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        if len > self.data.len() {
            return Err(self.exhausted(len));
        }

        let (head, rest) = self.data.split_at(len);
        self.data = rest;
        Ok(head)
    }

    /// Advances past `len` bytes without looking at them
    #[inline]
    pub fn skip(&mut self, len: usize) -> Result<(), ReadError> {
        self.read_bytes(len).map(|_| ())
    }
}
