/*!

A bounds-checked, recovering decoder for the binary game state files
(`userGameState.cgs`) written by Cities: Skylines.

The file is a 6 byte header followed by four sections of key/value entries:
ints, bools, floats, and strings, always in that order. Sections are not
self-describing and carry no checksum, so a single corrupt length field throws
off everything after it. Instead of failing on the first problem, the decoder
records an [`Anomaly`] for it, keeps what was decoded before it, and moves on
to the next section. The gap between [`FormatReport::final_offset`] and
[`FormatReport::total_size`] shows how much of the file could not be trusted.

## Layout

All numbers are little endian.

```text
header   magic: [u8; 4]  version: u16
section  count: u32, then `count` entries of
entry    key_len: u32  key: [u8; key_len]  value
value    int: i32 | bool: u8 | float: f32 | string: len: u32, [u8; len]
```

## Quick Start

```rust
let mut data = b"CGS1\x01\x00".to_vec();

// ints: population = 42000
data.extend_from_slice(&1u32.to_le_bytes());
data.extend_from_slice(&10u32.to_le_bytes());
data.extend_from_slice(b"population");
data.extend_from_slice(&42000i32.to_le_bytes());

// no bools or floats
data.extend_from_slice(&0u32.to_le_bytes());
data.extend_from_slice(&0u32.to_le_bytes());

// strings: cityName = "Newtown"
data.extend_from_slice(&1u32.to_le_bytes());
data.extend_from_slice(&8u32.to_le_bytes());
data.extend_from_slice(b"cityName");
data.extend_from_slice(&7u32.to_le_bytes());
data.extend_from_slice(b"Newtown");

let report = cgs::decode(&data)?;
assert_eq!(report.header().magic_ascii(), "CGS1");
assert_eq!(report.ints().entries()[0].key(), "population");
assert_eq!(*report.ints().entries()[0].value(), 42000);
assert_eq!(report.strings().entries()[0].value(), "Newtown");
assert!(report.is_complete());

// Cut the file off in the middle of "Newtown"
let report = cgs::decode(&data[..data.len() - 3])?;
assert!(report.strings().is_empty());
assert_eq!(report.anomalies().len(), 1);
assert!(report.final_offset() < report.total_size());
# Ok::<(), cgs::Error>(())
```

## Sanity Ceilings

Length and count fields are untrusted. A section declaring more than 100,000
entries is rejected outright and a key longer than 1,000 bytes is treated as
corruption. These limits, along with how many entries are kept in memory, are
set through [`DecodeOptions`]. Entries beyond the materialization cap are
still validated and stepped over so later sections are found at the right
offset.

*/

mod anomaly;
mod cursor;
mod errors;
mod header;
pub mod location;
mod options;
mod report;
mod section;
pub mod summary;
pub(crate) mod util;

pub use self::anomaly::{Anomaly, AnomalyKind, EntryError};
pub use self::cursor::{Cursor, ReadError};
pub use self::errors::*;
pub use self::header::FileHeader;
pub use self::location::{default_path, read_file, resolve_path};
pub use self::options::{DecodeOptions, ImplausibleCountStrategy};
pub use self::report::{decode, decode_with, Decoder, FormatReport};
pub use self::section::{
    Entry, Section, SectionDecoder, SectionKind, SectionStatus, SectionValue, StringValue,
};
