use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use super::model::CustomerRecord;

// ---------------------------------------------------------------------------
// Output layout
// ---------------------------------------------------------------------------

/// JSON layout of the customer files: `", "` between members, `": "` after
/// keys, and everything outside printable ASCII written as `\uXXXX`.
///
/// ```text
/// {"latitude": "52.986375", "user_id": 12, "name": "Seán", "longitude": "-6.043701"}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let bytes = fragment.as_bytes();
        let mut start = 0;

        for (i, ch) in fragment.char_indices() {
            if matches!(ch, ' '..='~') {
                continue;
            }
            writer.write_all(&bytes[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }

        writer.write_all(&bytes[start..])
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write each record as one JSON line, in iteration order.
pub fn write_records<'a, W, I>(mut out: W, records: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a CustomerRecord>,
{
    for record in records {
        let mut ser = Serializer::with_formatter(&mut out, SpacedAsciiFormatter);
        record.serialize(&mut ser)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}
