use crate::cursor::ReadError;
use crate::section::SectionKind;
use std::fmt;

/// What went wrong while decoding part of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum AnomalyKind {
    /// A read needed more bytes than remained
    BufferExhausted,

    /// A key length field exceeded its ceiling or the remaining bytes
    KeyLengthInvalid { len: u32 },

    /// A string value length field exceeded its ceiling or the remaining bytes
    ValueLengthInvalid { len: u32 },

    /// The section declared more entries than the entry count ceiling
    CountImplausible { count: u32 },
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AnomalyKind::BufferExhausted => write!(f, "buffer exhausted"),
            AnomalyKind::KeyLengthInvalid { len } => write!(f, "invalid key length: {}", len),
            AnomalyKind::ValueLengthInvalid { len } => {
                write!(f, "invalid value length: {}", len)
            }
            AnomalyKind::CountImplausible { count } => {
                write!(f, "implausible entry count: {}", count)
            }
        }
    }
}

/// A recorded decoding failure
///
/// Everything decoded after the first anomaly is suspect: the cursor may have
/// drifted into the middle of unrelated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Anomaly {
    section: SectionKind,
    entry_index: Option<u32>,
    kind: AnomalyKind,
    offset: usize,
}

impl Anomaly {
    pub fn new(
        section: SectionKind,
        entry_index: Option<u32>,
        kind: AnomalyKind,
        offset: usize,
    ) -> Self {
        Anomaly {
            section,
            entry_index,
            kind,
            offset,
        }
    }

    /// The section being decoded
    pub fn section(&self) -> SectionKind {
        self.section
    }

    /// Index of the failing entry, or `None` when the section's count field
    /// itself was the problem
    pub fn entry_index(&self) -> Option<u32> {
        self.entry_index
    }

    pub fn kind(&self) -> &AnomalyKind {
        &self.kind
    }

    /// Byte offset of the field whose read or validation failed
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.entry_index {
            Some(index) => write!(
                f,
                "[{} {}] {} (offset: {})",
                self.section, index, self.kind, self.offset
            ),
            None => write!(f, "[{}] {} (offset: {})", self.section, self.kind, self.offset),
        }
    }
}

/// An anomaly before it is attributed to a section and entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryError {
    kind: AnomalyKind,
    offset: usize,
}

impl EntryError {
    #[inline]
    pub fn new(kind: AnomalyKind, offset: usize) -> Self {
        EntryError { kind, offset }
    }

    pub fn kind(&self) -> &AnomalyKind {
        &self.kind
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub(crate) fn attribute(self, section: SectionKind, entry_index: Option<u32>) -> Anomaly {
        Anomaly::new(section, entry_index, self.kind, self.offset)
    }
}

impl std::error::Error for EntryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (offset: {})", self.kind, self.offset)
    }
}

impl From<ReadError> for EntryError {
    fn from(error: ReadError) -> Self {
        EntryError::new(AnomalyKind::BufferExhausted, error.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anomaly_display() {
        let anomaly = Anomaly::new(
            SectionKind::Int,
            Some(3),
            AnomalyKind::KeyLengthInvalid { len: 5000 },
            48,
        );
        assert_eq!(
            anomaly.to_string(),
            "[Int 3] invalid key length: 5000 (offset: 48)"
        );

        let anomaly = Anomaly::new(
            SectionKind::String,
            None,
            AnomalyKind::CountImplausible { count: 200_000 },
            6,
        );
        assert_eq!(
            anomaly.to_string(),
            "[String] implausible entry count: 200000 (offset: 6)"
        );
    }
}
