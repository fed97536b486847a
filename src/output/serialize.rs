//! Batch serializers for clean and error artifacts

use super::schema::json_to_arrow;
use super::writer::{write_parquet_bytes, ParquetWriterConfig};
use crate::error::Result;
use crate::partition::RejectionRecord;
use crate::validate::NormalizedRecord;
use bytes::Bytes;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use std::io;

/// Encode valid records as a Parquet file
///
/// Returns `None` for an empty slice; no clean artifact should be written.
pub fn serialize_clean(
    records: &[NormalizedRecord],
    config: &ParquetWriterConfig,
) -> Result<Option<Bytes>> {
    if records.is_empty() {
        return Ok(None);
    }

    let rows: Vec<_> = records.iter().map(NormalizedRecord::fields).collect();
    let batch = json_to_arrow(&rows, None)?;
    write_parquet_bytes(&batch, config).map(Some)
}

/// Encode rejections as newline-joined JSON objects, no trailing newline
///
/// Each line uses `", "` and `": "` separators and escapes everything outside
/// printable ASCII as `\uXXXX`, so journals match the ones already in the
/// error bucket byte for byte.
///
/// Returns `None` for an empty slice; no error artifact should be written.
pub fn serialize_errors(rejections: &[RejectionRecord]) -> Result<Option<Bytes>> {
    if rejections.is_empty() {
        return Ok(None);
    }

    let mut buf = Vec::new();
    for (i, rejection) in rejections.iter().enumerate() {
        if i > 0 {
            buf.push(b'\n');
        }
        let mut serializer = Serializer::with_formatter(&mut buf, JournalFormatter);
        rejection.serialize(&mut serializer)?;
    }
    Ok(Some(Bytes::from(buf)))
}

/// Spaced separators with ASCII-only string output
struct JournalFormatter;

impl Formatter for JournalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    // Quotes, backslashes and C0 controls never reach here; serde_json
    // escapes those itself.
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if matches!(ch, ' '..='~') {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units).iter() {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}
