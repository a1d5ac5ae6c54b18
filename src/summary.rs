//! Human readable rendering of a [`FormatReport`]

use crate::report::FormatReport;
use crate::section::{Section, SectionKind};
use std::fmt::{self, Write as _};
use std::io;

/// Customizes the summary output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    int_entries: usize,
    bool_entries: usize,
    float_entries: usize,
    string_entries: usize,
    large_string_len: usize,
    inline_preview: usize,
    list_preview: usize,
}

impl SummaryOptions {
    /// Ten int entries and twenty string entries are listed, with bools and
    /// floats only counted
    pub fn new() -> Self {
        SummaryOptions {
            int_entries: 10,
            bool_entries: 0,
            float_entries: 0,
            string_entries: 20,
            large_string_len: 1000,
            inline_preview: 50,
            list_preview: 100,
        }
    }

    /// Number of entries listed for the given section
    pub fn with_entries(mut self, kind: SectionKind, entries: usize) -> Self {
        match kind {
            SectionKind::Int => self.int_entries = entries,
            SectionKind::Bool => self.bool_entries = entries,
            SectionKind::Float => self.float_entries = entries,
            SectionKind::String => self.string_entries = entries,
        }
        self
    }

    /// String values longer than this many bytes are abbreviated and listed
    /// again at the end
    pub fn with_large_string_len(mut self, len: usize) -> Self {
        self.large_string_len = len;
        self
    }

    pub fn entries(&self, kind: SectionKind) -> usize {
        match kind {
            SectionKind::Int => self.int_entries,
            SectionKind::Bool => self.bool_entries,
            SectionKind::Float => self.float_entries,
            SectionKind::String => self.string_entries,
        }
    }

    /// The smallest materialization cap that still lets every listed entry be
    /// shown
    pub fn materialization_cap(&self) -> usize {
        SectionKind::ORDER
            .iter()
            .map(|&kind| self.entries(kind))
            .max()
            .unwrap_or(0)
    }
}

impl Default for SummaryOptions {
    fn default() -> Self {
        SummaryOptions::new()
    }
}

/// Renders a report the way `cgsinfo` prints it
///
/// ```
/// use cgs::summary::Summary;
///
/// let report = cgs::decode(b"CGS1\x01\x00")?;
/// let out = Summary::new(&report).to_string();
/// assert!(out.starts_with("File size: 6 bytes\nHeader: CGS1\nVersion: 1\n"));
/// assert!(out.ends_with("Parsed up to position: 6 / 6 bytes\n"));
/// # Ok::<(), cgs::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a> {
    report: &'a FormatReport,
    options: SummaryOptions,
}

impl<'a> Summary<'a> {
    pub fn new(report: &'a FormatReport) -> Self {
        Summary {
            report,
            options: SummaryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SummaryOptions) -> Self {
        self.options = options;
        self
    }

    /// Write the summary to the given writer
    pub fn to_writer<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{}", self)
    }

    fn write_count<T>(
        &self,
        f: &mut fmt::Formatter,
        kind: SectionKind,
        section: &Section<T>,
    ) -> fmt::Result {
        if let Some(count) = section.declared_count() {
            writeln!(f, "{} values count: {}", kind, Grouped(u64::from(count)))?;
        }
        Ok(())
    }

    fn write_entries<T: fmt::Display>(
        &self,
        f: &mut fmt::Formatter,
        kind: SectionKind,
        section: &Section<T>,
    ) -> fmt::Result {
        self.write_count(f, kind, section)?;
        let listed = section.iter().take(self.options.entries(kind));
        for (i, entry) in listed.enumerate() {
            writeln!(f, "  [{} {}] {} = {}", kind, i, entry.key(), entry.value())?;
        }
        Ok(())
    }

    fn write_strings(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = SectionKind::String;
        let section = self.report.strings();
        self.write_count(f, kind, section)?;
        if section.declared_count().is_none() {
            return Ok(());
        }

        let mut total = 0u64;
        let mut large = Vec::new();
        let listed = section.iter().take(self.options.entries(kind));
        for (i, entry) in listed.enumerate() {
            let value = entry.value();
            total += value.raw_len() as u64;

            if value.raw_len() > self.options.large_string_len {
                large.push(entry);
                writeln!(
                    f,
                    "  [{} {}] {} = {} bytes: {}...",
                    kind,
                    i,
                    entry.key(),
                    Grouped(value.raw_len() as u64),
                    preview(value.as_str(), self.options.inline_preview)
                )?;
            } else {
                writeln!(f, "  [{} {}] {} = {}", kind, i, entry.key(), value)?;
            }
        }

        writeln!(f, "Total string data size: {} bytes", Grouped(total))?;

        if !large.is_empty() {
            writeln!(f)?;
            writeln!(f, "Large strings (>1KB):")?;
            for entry in large {
                let value = entry.value().as_str();
                let shown = preview(value, self.options.list_preview);
                let ellipsis = if shown.len() < value.len() { "..." } else { "" };
                writeln!(
                    f,
                    "  {}: {} bytes - {}{}",
                    entry.key(),
                    Grouped(entry.value().raw_len() as u64),
                    shown,
                    ellipsis
                )?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let report = self.report;
        let header = report.header();
        writeln!(f, "File size: {} bytes", Grouped(report.total_size() as u64))?;
        writeln!(f, "Header: {}", header.magic_ascii())?;
        writeln!(f, "Version: {}", header.version())?;

        self.write_entries(f, SectionKind::Int, report.ints())?;
        self.write_entries(f, SectionKind::Bool, report.bools())?;
        self.write_entries(f, SectionKind::Float, report.floats())?;
        self.write_strings(f)?;

        if !report.anomalies().is_empty() {
            writeln!(f)?;
            writeln!(f, "Anomalies:")?;
            for anomaly in report.anomalies() {
                writeln!(f, "  {}", anomaly)?;
            }
        }

        writeln!(
            f,
            "Parsed up to position: {} / {} bytes",
            Grouped(report.final_offset() as u64),
            Grouped(report.total_size() as u64)
        )
    }
}

/// The first `chars` characters of `s`
fn preview(s: &str, chars: usize) -> &str {
    match s.char_indices().nth(chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

#[cfg(feature = "faster_writer")]
fn with_digits<R>(n: u64, f: impl FnOnce(&str) -> R) -> R {
    let mut buf = itoa::Buffer::new();
    f(buf.format(n))
}

#[cfg(not(feature = "faster_writer"))]
fn with_digits<R>(n: u64, f: impl FnOnce(&str) -> R) -> R {
    f(&n.to_string())
}

/// Formats a number with thousands separators
struct Grouped(u64);

impl fmt::Display for Grouped {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        with_digits(self.0, |digits| {
            for (i, c) in digits.char_indices() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    f.write_char(',')?;
                }
                f.write_char(c)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn push_str(out: &mut Vec<u8>, s: impl AsRef<[u8]>) {
        let s = s.as_ref();
        out.extend_from_slice(&(s.len() as u32).to_le_bytes());
        out.extend_from_slice(s);
    }

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(42000, "42,000")]
    #[case(1234567, "1,234,567")]
    #[case(u64::MAX, "18,446,744,073,709,551,615")]
    fn test_grouped(#[case] input: u64, #[case] expected: &str) {
        assert_eq!(Grouped(input).to_string(), expected);
    }

    #[rstest]
    #[case("hello", 3, "hel")]
    #[case("hello", 10, "hello")]
    #[case("åäö", 2, "åä")]
    fn test_preview(#[case] input: &str, #[case] chars: usize, #[case] expected: &str) {
        assert_eq!(preview(input, chars), expected);
    }

    #[test]
    fn test_summary() {
        let large = "x".repeat(1500);
        let mut data = b"CGS1\x01\x00".to_vec();
        data.extend_from_slice(&1u32.to_le_bytes());
        push_str(&mut data, "population");
        data.extend_from_slice(&42000i32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        push_str(&mut data, "paused");
        data.push(1);
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&2u32.to_le_bytes());
        push_str(&mut data, "cityName");
        push_str(&mut data, "Newtown");
        push_str(&mut data, "blob");
        push_str(&mut data, &large);

        let report = crate::decode(&data).unwrap();
        let out = Summary::new(&report).to_string();
        let expected = format!(
            "File size: {size} bytes
Header: CGS1
Version: 1
Int values count: 1
  [Int 0] population = 42000
Bool values count: 1
Float values count: 0
String values count: 2
  [String 0] cityName = Newtown
  [String 1] blob = 1,500 bytes: {inline}...
Total string data size: 1,507 bytes

Large strings (>1KB):
  blob: 1,500 bytes - {list}...
Parsed up to position: {size} / {size} bytes
",
            size = Grouped(data.len() as u64),
            inline = "x".repeat(50),
            list = "x".repeat(100),
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_summary_counts_raw_string_bytes() {
        let mut data = b"CGS1\x01\x00".to_vec();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        push_str(&mut data, "blob");
        push_str(&mut data, [0xffu8; 500]);

        let report = crate::decode(&data).unwrap();
        let out = Summary::new(&report).to_string();
        let line = format!("  [String 0] blob = {}\n", "\u{fffd}".repeat(500));
        assert!(out.contains(&line));
        assert!(out.contains("Total string data size: 500 bytes\n"));
        assert!(!out.contains("Large strings"));
    }

    #[test]
    fn test_summary_lists_anomalies() {
        let mut data = b"CGS1\x01\x00".to_vec();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&5000u32.to_le_bytes());

        let report = crate::decode(&data).unwrap();
        let out = Summary::new(&report)
            .with_options(SummaryOptions::new().with_entries(SectionKind::Bool, 5))
            .to_string();
        assert!(out.contains("Anomalies:\n  [Int 0] invalid key length: 5000 (offset: 10)\n"));
        assert!(out.ends_with("Parsed up to position: 14 / 14 bytes\n"));
        assert!(!out.contains("Bool values count"));
    }

    #[test]
    fn test_materialization_cap() {
        assert_eq!(SummaryOptions::new().materialization_cap(), 20);
        let options = SummaryOptions::new().with_entries(SectionKind::Float, 50);
        assert_eq!(options.materialization_cap(), 50);
    }
}
