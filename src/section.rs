use crate::anomaly::{Anomaly, AnomalyKind, EntryError};
use crate::cursor::Cursor;
use crate::options::DecodeOptions;
use crate::util::to_usize;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Smallest possible entry: a zero length key followed by a bool
const MIN_ENTRY_LEN: usize = 5;

/// The four sections of a game state file, in on-disk order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SectionKind {
    Int,
    Bool,
    Float,
    String,
}

impl SectionKind {
    /// Sections are not self-describing, so this order is part of the format
    pub const ORDER: [SectionKind; 4] = [
        SectionKind::Int,
        SectionKind::Bool,
        SectionKind::Float,
        SectionKind::String,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::Int => "Int",
            SectionKind::Bool => "Bool",
            SectionKind::Float => "Float",
            SectionKind::String => "String",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded key and its value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Entry<T> {
    key: String,
    value: T,
}

impl<T> Entry<T> {
    pub fn new(key: impl Into<String>, value: T) -> Self {
        Entry {
            key: key.into(),
            value,
        }
    }

    /// The key, with invalid utf-8 replaced
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_parts(self) -> (String, T) {
        (self.key, self.value)
    }
}

/// How far decoding of a section got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SectionStatus {
    /// Every declared entry was consumed
    Complete,

    /// An anomaly stopped the entry loop early
    Aborted,

    /// The declared count exceeded the entry count ceiling
    Rejected,

    /// The count field could not be read
    Unreadable,

    /// An earlier section caused the decode to be abandoned
    NotAttempted,
}

/// The outcome of decoding one section
///
/// `entries` only holds the materialized prefix. Entries past the
/// materialization cap are counted in `consumed` but not kept.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Section<T> {
    status: SectionStatus,
    declared_count: Option<u32>,
    consumed: u32,
    entries: Vec<Entry<T>>,
}

impl<T> Section<T> {
    fn empty(status: SectionStatus, declared_count: Option<u32>) -> Self {
        Section {
            status,
            declared_count,
            consumed: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn not_attempted() -> Self {
        Section::empty(SectionStatus::NotAttempted, None)
    }

    pub fn status(&self) -> SectionStatus {
        self.status
    }

    /// The entry count claimed by the file, if it could be read
    pub fn declared_count(&self) -> Option<u32> {
        self.declared_count
    }

    /// Number of entries successfully read or stepped over
    pub fn consumed(&self) -> u32 {
        self.consumed
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry<T>> {
        self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Section<T> {
    type Item = &'a Entry<T>;
    type IntoIter = std::slice::Iter<'a, Entry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A value kind that can appear in a section
pub trait SectionValue: Sized {
    /// The section holding values of this kind
    const KIND: SectionKind;

    /// Read a value positioned after its key
    fn read(cursor: &mut Cursor, options: &DecodeOptions) -> Result<Self, EntryError>;

    /// Step over a value positioned after its key, validating it exactly as
    /// [`SectionValue::read`] would
    fn skip(cursor: &mut Cursor, options: &DecodeOptions) -> Result<(), EntryError>;
}

impl SectionValue for i32 {
    const KIND: SectionKind = SectionKind::Int;

    #[inline]
    fn read(cursor: &mut Cursor, _options: &DecodeOptions) -> Result<Self, EntryError> {
        Ok(cursor.read_i32()?)
    }

    #[inline]
    fn skip(cursor: &mut Cursor, _options: &DecodeOptions) -> Result<(), EntryError> {
        Ok(cursor.skip(4)?)
    }
}

impl SectionValue for bool {
    const KIND: SectionKind = SectionKind::Bool;

    #[inline]
    fn read(cursor: &mut Cursor, _options: &DecodeOptions) -> Result<Self, EntryError> {
        Ok(cursor.read_bool()?)
    }

    #[inline]
    fn skip(cursor: &mut Cursor, _options: &DecodeOptions) -> Result<(), EntryError> {
        Ok(cursor.skip(1)?)
    }
}

impl SectionValue for f32 {
    const KIND: SectionKind = SectionKind::Float;

    #[inline]
    fn read(cursor: &mut Cursor, _options: &DecodeOptions) -> Result<Self, EntryError> {
        Ok(cursor.read_f32()?)
    }

    #[inline]
    fn skip(cursor: &mut Cursor, _options: &DecodeOptions) -> Result<(), EntryError> {
        Ok(cursor.skip(4)?)
    }
}

/// A string value with invalid utf-8 replaced
///
/// Replacement characters are wider than the bytes they stand for, so the
/// on-disk length is kept alongside the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StringValue {
    text: String,
    raw_len: usize,
}

impl StringValue {
    /// Decode raw bytes, replacing invalid utf-8
    pub fn from_bytes(data: &[u8]) -> Self {
        StringValue {
            text: String::from_utf8_lossy(data).into_owned(),
            raw_len: data.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of bytes the value occupied in the file
    pub fn raw_len(&self) -> usize {
        self.raw_len
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl From<&str> for StringValue {
    fn from(text: &str) -> Self {
        StringValue::from_bytes(text.as_bytes())
    }
}

impl PartialEq<str> for StringValue {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for StringValue {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl SectionValue for StringValue {
    const KIND: SectionKind = SectionKind::String;

    fn read(cursor: &mut Cursor, options: &DecodeOptions) -> Result<Self, EntryError> {
        let len = read_len(cursor, options.max_value_len(), |len| {
            AnomalyKind::ValueLengthInvalid { len }
        })?;
        let data = cursor.read_bytes(len)?;
        Ok(StringValue::from_bytes(data))
    }

    fn skip(cursor: &mut Cursor, options: &DecodeOptions) -> Result<(), EntryError> {
        let len = read_len(cursor, options.max_value_len(), |len| {
            AnomalyKind::ValueLengthInvalid { len }
        })?;
        Ok(cursor.skip(len)?)
    }
}

/// Reads a u32 length prefix and rejects it when it is above the ceiling or
/// runs past the end of the buffer. The error offset is that of the prefix.
#[inline]
fn read_len(
    cursor: &mut Cursor,
    ceiling: u32,
    invalid: impl FnOnce(u32) -> AnomalyKind,
) -> Result<usize, EntryError> {
    let offset = cursor.position();
    let len = cursor.read_u32()?;
    let size = to_usize(len);
    if len > ceiling || size > cursor.remaining() {
        return Err(EntryError::new(invalid(len), offset));
    }

    Ok(size)
}

#[inline]
fn read_key_len(cursor: &mut Cursor, options: &DecodeOptions) -> Result<usize, EntryError> {
    read_len(cursor, options.max_key_len(), |len| {
        AnomalyKind::KeyLengthInvalid { len }
    })
}

fn record(anomalies: &mut Vec<Anomaly>, anomaly: Anomaly) {
    warn!(
        section = %anomaly.section(),
        entry = ?anomaly.entry_index(),
        offset = anomaly.offset(),
        "{}",
        anomaly.kind()
    );
    anomalies.push(anomaly);
}

/// Decodes a single section of values of kind `T`
///
/// ```
/// use cgs::{Cursor, DecodeOptions, SectionDecoder, SectionStatus};
///
/// // one entry: key "pop" = 7
/// let data = b"\x01\x00\x00\x00\x03\x00\x00\x00pop\x07\x00\x00\x00";
/// let mut cursor = Cursor::new(&data[..]);
/// let mut anomalies = Vec::new();
///
/// let section = SectionDecoder::<i32>::new(DecodeOptions::new())
///     .decode(&mut cursor, &mut anomalies);
///
/// assert_eq!(section.status(), SectionStatus::Complete);
/// assert_eq!(section.entries()[0].key(), "pop");
/// assert_eq!(*section.entries()[0].value(), 7);
/// assert!(anomalies.is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SectionDecoder<T> {
    options: DecodeOptions,
    kind: PhantomData<fn() -> T>,
}

impl<T> SectionDecoder<T>
where
    T: SectionValue,
{
    pub fn new(options: DecodeOptions) -> Self {
        SectionDecoder {
            options,
            kind: PhantomData,
        }
    }

    /// Decode the count field and the entries that follow it
    ///
    /// Failures are appended to `anomalies` and never returned. The cursor is
    /// left wherever the last successful read put it.
    pub fn decode(&self, cursor: &mut Cursor, anomalies: &mut Vec<Anomaly>) -> Section<T> {
        let kind = T::KIND;
        let count_offset = cursor.position();
        let count = match cursor.read_u32() {
            Ok(count) => count,
            Err(e) => {
                record(anomalies, EntryError::from(e).attribute(kind, None));
                return Section::empty(SectionStatus::Unreadable, None);
            }
        };

        debug!(section = %kind, count, offset = count_offset, "decoding section");

        if count > self.options.max_entry_count() {
            let anomaly = Anomaly::new(
                kind,
                None,
                AnomalyKind::CountImplausible { count },
                count_offset,
            );
            record(anomalies, anomaly);
            return Section::empty(SectionStatus::Rejected, Some(count));
        }

        let cap = to_usize(count).min(self.options.max_materialized_entries());
        let mut entries = Vec::with_capacity(cap.min(cursor.remaining() / MIN_ENTRY_LEN));
        let mut status = SectionStatus::Complete;
        let mut consumed = 0;

        for index in 0..count {
            let result = if to_usize(index) < cap {
                self.read_entry(cursor).map(|entry| entries.push(entry))
            } else {
                self.skip_entry(cursor)
            };

            if let Err(e) = result {
                record(anomalies, e.attribute(kind, Some(index)));
                status = SectionStatus::Aborted;
                break;
            }

            consumed += 1;
        }

        Section {
            status,
            declared_count: Some(count),
            consumed,
            entries,
        }
    }

    /// Read one key and value
    pub fn read_entry(&self, cursor: &mut Cursor) -> Result<Entry<T>, EntryError> {
        let key_len = read_key_len(cursor, &self.options)?;
        let key = String::from_utf8_lossy(cursor.read_bytes(key_len)?).into_owned();
        let value = T::read(cursor, &self.options)?;
        Ok(Entry::new(key, value))
    }

    /// Step over one key and value with the same validation as
    /// [`SectionDecoder::read_entry`]
    pub fn skip_entry(&self, cursor: &mut Cursor) -> Result<(), EntryError> {
        let key_len = read_key_len(cursor, &self.options)?;
        cursor.skip(key_len)?;
        T::skip(cursor, &self.options)
    }
}
