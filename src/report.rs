use crate::anomaly::Anomaly;
use crate::cursor::Cursor;
use crate::errors::{Error, ErrorKind};
use crate::header::FileHeader;
use crate::options::{DecodeOptions, ImplausibleCountStrategy};
use crate::section::{
    Section, SectionDecoder, SectionKind, SectionStatus, SectionValue, StringValue,
};
use tracing::{debug, warn};

/// Everything that could be recovered from a game state buffer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FormatReport {
    header: FileHeader,
    ints: Section<i32>,
    bools: Section<bool>,
    floats: Section<f32>,
    strings: Section<StringValue>,
    anomalies: Vec<Anomaly>,
    final_offset: usize,
    total_size: usize,
}

impl FormatReport {
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn ints(&self) -> &Section<i32> {
        &self.ints
    }

    pub fn bools(&self) -> &Section<bool> {
        &self.bools
    }

    pub fn floats(&self) -> &Section<f32> {
        &self.floats
    }

    pub fn strings(&self) -> &Section<StringValue> {
        &self.strings
    }

    /// Anomalies in the order they were encountered
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    /// Offset just past the last successful read
    pub fn final_offset(&self) -> usize {
        self.final_offset
    }

    /// Length of the decoded buffer
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Bytes that were never reached by a successful read
    pub fn unread(&self) -> usize {
        self.total_size - self.final_offset
    }

    /// True when every byte was accounted for and nothing looked wrong
    pub fn is_complete(&self) -> bool {
        self.anomalies.is_empty() && self.final_offset == self.total_size
    }

    /// The entry count a section declared, if it could be read
    pub fn declared_count(&self, kind: SectionKind) -> Option<u32> {
        match kind {
            SectionKind::Int => self.ints.declared_count(),
            SectionKind::Bool => self.bools.declared_count(),
            SectionKind::Float => self.floats.declared_count(),
            SectionKind::String => self.strings.declared_count(),
        }
    }

    pub fn section_status(&self, kind: SectionKind) -> SectionStatus {
        match kind {
            SectionKind::Int => self.ints.status(),
            SectionKind::Bool => self.bools.status(),
            SectionKind::Float => self.floats.status(),
            SectionKind::String => self.strings.status(),
        }
    }
}

/// Decodes game state buffers with a fixed set of options
///
/// ```
/// use cgs::{DecodeOptions, Decoder};
///
/// let data = b"CGS1\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00";
/// let decoder = Decoder::with_options(DecodeOptions::new().with_max_materialized_entries(10));
/// let report = decoder.decode(&data[..])?;
/// assert!(report.is_complete());
/// assert_eq!(report.header().version(), 1);
/// # Ok::<(), cgs::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    /// Creates a decoder with the default options
    pub fn new() -> Self {
        Decoder::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Decoder { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode the header and then each section in on-disk order
    ///
    /// Only a buffer too short for the header is an error. Every other
    /// problem is recorded as an anomaly on the returned report.
    pub fn decode(&self, data: &[u8]) -> Result<FormatReport, Error> {
        let mut cursor = Cursor::new(data);
        let header = FileHeader::decode(&mut cursor)
            .map_err(|_| Error::from(ErrorKind::FileTooSmall { len: data.len() }))?;

        debug!(
            magic = %header.magic_ascii(),
            version = header.version(),
            size = data.len(),
            "decoding game state"
        );

        let mut run = SectionRun {
            cursor,
            anomalies: Vec::new(),
            options: self.options,
            abandoned: false,
        };

        let ints = run.decode();
        let bools = run.decode();
        let floats = run.decode();
        let strings = run.decode();

        let final_offset = run.cursor.position();
        debug!(
            final_offset,
            total_size = data.len(),
            anomalies = run.anomalies.len(),
            "decoded game state"
        );

        Ok(FormatReport {
            header,
            ints,
            bools,
            floats,
            strings,
            anomalies: run.anomalies,
            final_offset,
            total_size: data.len(),
        })
    }
}

/// State threaded through the sections of a single decode
struct SectionRun<'a> {
    cursor: Cursor<'a>,
    anomalies: Vec<Anomaly>,
    options: DecodeOptions,
    abandoned: bool,
}

impl SectionRun<'_> {
    fn decode<T: SectionValue>(&mut self) -> Section<T> {
        if self.abandoned {
            return Section::not_attempted();
        }

        let section =
            SectionDecoder::<T>::new(self.options).decode(&mut self.cursor, &mut self.anomalies);

        if section.status() == SectionStatus::Rejected
            && self.options.implausible_count() == ImplausibleCountStrategy::Abandon
        {
            warn!(section = %T::KIND, "abandoning remaining sections");
            self.abandoned = true;
        }

        section
    }
}

/// Decode a game state buffer with the default options
///
/// ```
/// let data = b"CGS1\x01\x00";
/// let report = cgs::decode(&data[..]).unwrap();
/// assert_eq!(report.anomalies().len(), 4);
///
/// assert!(cgs::decode(b"CGS").is_err());
/// ```
pub fn decode(data: &[u8]) -> Result<FormatReport, Error> {
    Decoder::new().decode(data)
}

/// Decode a game state buffer with the given options
pub fn decode_with(data: &[u8], options: DecodeOptions) -> Result<FormatReport, Error> {
    Decoder::with_options(options).decode(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::AnomalyKind;
    use crate::section::Entry;
    use quickcheck_macros::quickcheck;

    fn push_str(out: &mut Vec<u8>, s: &str) {
        out.extend_from_slice(&(s.len() as u32).to_le_bytes());
        out.extend_from_slice(s.as_bytes());
    }

    fn sample() -> Vec<u8> {
        let mut out = b"CGS1".to_vec();
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        push_str(&mut out, "population");
        out.extend_from_slice(&42000i32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        push_str(&mut out, "cityName");
        push_str(&mut out, "Newtown");
        out
    }

    #[test]
    fn test_sample() {
        let data = sample();
        let report = decode(&data).unwrap();
        assert_eq!(report.header().magic(), *b"CGS1");
        assert_eq!(report.ints().entries(), &[Entry::new("population", 42000)]);
        assert!(report.bools().is_empty());
        assert!(report.floats().is_empty());
        assert_eq!(
            report.strings().entries(),
            &[Entry::new("cityName", StringValue::from("Newtown"))]
        );
        assert!(report.anomalies().is_empty());
        assert_eq!(report.final_offset(), report.total_size());
        assert!(report.is_complete());
        assert_eq!(report.declared_count(SectionKind::Bool), Some(0));
    }

    #[test]
    fn test_too_small() {
        for len in 0..FileHeader::SIZE {
            let err = decode(&sample()[..len]).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::FileTooSmall { len: x } if *x == len));
        }
    }

    #[test]
    fn test_header_only() {
        let report = decode(b"CGS1\x01\x00").unwrap();
        assert_eq!(report.anomalies().len(), 4);
        for (anomaly, kind) in report.anomalies().iter().zip(SectionKind::ORDER) {
            assert_eq!(anomaly.section(), kind);
            assert_eq!(*anomaly.kind(), AnomalyKind::BufferExhausted);
            assert_eq!(anomaly.offset(), 6);
        }
        assert_eq!(report.final_offset(), 6);
        assert_eq!(report.section_status(SectionKind::String), SectionStatus::Unreadable);
    }

    #[test]
    fn test_implausible_count_abandon() {
        let mut data = b"CGS1\x01\x00".to_vec();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());

        let options =
            DecodeOptions::new().with_implausible_count(ImplausibleCountStrategy::Abandon);
        let report = decode_with(&data, options).unwrap();
        assert_eq!(report.anomalies().len(), 1);
        assert_eq!(report.section_status(SectionKind::Bool), SectionStatus::Rejected);
        assert_eq!(report.section_status(SectionKind::Float), SectionStatus::NotAttempted);
        assert_eq!(report.section_status(SectionKind::String), SectionStatus::NotAttempted);
        assert_eq!(report.final_offset(), 14);

        let report = decode(&data).unwrap();
        assert_eq!(report.anomalies().len(), 1);
        assert_eq!(report.section_status(SectionKind::Float), SectionStatus::Complete);
        assert_eq!(report.section_status(SectionKind::String), SectionStatus::Complete);
        assert_eq!(report.final_offset(), data.len());
    }

    #[quickcheck]
    fn never_reads_past_end(data: Vec<u8>) -> bool {
        match decode(&data) {
            Ok(report) => {
                report.final_offset() <= report.total_size() && report.total_size() == data.len()
            }
            Err(_) => data.len() < FileHeader::SIZE,
        }
    }

    #[quickcheck]
    fn deterministic(data: Vec<u8>) -> bool {
        // compare debug output as NaN floats are never equal to themselves
        format!("{:?}", decode(&data).ok()) == format!("{:?}", decode(&data).ok())
    }
}
