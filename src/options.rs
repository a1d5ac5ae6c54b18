/// Customize how the decoder reacts when a section declares more entries than
/// [`DecodeOptions::max_entry_count`]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ImplausibleCountStrategy {
    /// Give up on the section and attempt the next one from just after the
    /// count field
    SkipSection,

    /// Give up on the section and every section after it
    Abandon,
}

/// Sanity ceilings and reporting limits for a decode
///
/// None of the ceilings are guarantees of the format. They are defensive
/// limits that keep work proportional to the buffer when length fields are
/// garbage.
///
/// ```
/// use cgs::{DecodeOptions, ImplausibleCountStrategy};
///
/// let options = DecodeOptions::new()
///     .with_max_materialized_entries(10)
///     .with_implausible_count(ImplausibleCountStrategy::Abandon);
///
/// assert_eq!(options.max_materialized_entries(), 10);
/// assert_eq!(options.max_entry_count(), 100_000);
/// assert_eq!(options.max_key_len(), 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecodeOptions {
    max_materialized_entries: usize,
    max_entry_count: u32,
    max_key_len: u32,
    max_value_len: u32,
    implausible_count: ImplausibleCountStrategy,
}

impl DecodeOptions {
    pub const DEFAULT_MAX_ENTRY_COUNT: u32 = 100_000;
    pub const DEFAULT_MAX_KEY_LEN: u32 = 1000;
    pub const DEFAULT_MAX_VALUE_LEN: u32 = 16 * 1024 * 1024;

    /// Creates the default options: every entry is materialized
    #[inline]
    pub fn new() -> Self {
        DecodeOptions {
            max_materialized_entries: usize::MAX,
            max_entry_count: Self::DEFAULT_MAX_ENTRY_COUNT,
            max_key_len: Self::DEFAULT_MAX_KEY_LEN,
            max_value_len: Self::DEFAULT_MAX_VALUE_LEN,
            implausible_count: ImplausibleCountStrategy::SkipSection,
        }
    }

    /// Only keep the first `max` entries of each section. Entries past the cap
    /// are still validated and stepped over.
    #[inline]
    pub fn with_max_materialized_entries(mut self, max: usize) -> Self {
        self.max_materialized_entries = max;
        self
    }

    /// Section counts above this are rejected without reading any entry
    #[inline]
    pub fn with_max_entry_count(mut self, max: u32) -> Self {
        self.max_entry_count = max;
        self
    }

    /// Key length fields above this are treated as corruption
    #[inline]
    pub fn with_max_key_len(mut self, max: u32) -> Self {
        self.max_key_len = max;
        self
    }

    /// String value length fields above this are treated as corruption
    #[inline]
    pub fn with_max_value_len(mut self, max: u32) -> Self {
        self.max_value_len = max;
        self
    }

    #[inline]
    pub fn with_implausible_count(mut self, strategy: ImplausibleCountStrategy) -> Self {
        self.implausible_count = strategy;
        self
    }

    #[inline]
    pub fn max_materialized_entries(&self) -> usize {
        self.max_materialized_entries
    }

    #[inline]
    pub fn max_entry_count(&self) -> u32 {
        self.max_entry_count
    }

    #[inline]
    pub fn max_key_len(&self) -> u32 {
        self.max_key_len
    }

    #[inline]
    pub fn max_value_len(&self) -> u32 {
        self.max_value_len
    }

    #[inline]
    pub fn implausible_count(&self) -> ImplausibleCountStrategy {
        self.implausible_count
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions::new()
    }
}
