//! # Document I/O and Canonical Formatting
//!
//! Reads test documents into `serde_json::Value` and writes them back in a
//! canonical textual form:
//!
//! - object keys sorted by code point,
//! - four-space indentation, `": "` between key and value,
//! - non-ASCII characters escaped as `\uXXXX` (surrogate pairs above
//!   U+FFFF),
//! - no trailing newline,
//! - every number written exactly as it appeared in the source text
//!   (`1e-07` stays `1e-07`, 256-bit integers are never rounded).
//!
//! Number text survives because the workspace builds `serde_json` with
//! `arbitrary_precision`.
//!
//! This is the layout the existing test corpus was generated with, so
//! formatting an already-formatted file is byte-for-byte a no-op.
//!
//! Key order comes from `serde_json::Map`, which is a `BTreeMap` unless
//! the `preserve_order` feature is enabled somewhere in the build. We
//! never enable it.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::Value;

use crate::error::CoreError;

const INDENT: &[u8] = b"    ";

/// Pretty formatter that escapes everything outside ASCII.
struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> AsciiPrettyFormatter<'a> {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(INDENT),
        }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }
}

/// Read and parse a JSON document.
///
/// # Errors
///
/// - [`CoreError::NotAFile`] if `path` is not a regular file.
/// - [`CoreError::Io`] if the file cannot be read.
/// - [`CoreError::Parse`] if the contents are not valid JSON.
pub fn read_json_file(path: &Path) -> Result<Value, CoreError> {
    if !path.is_file() {
        return Err(CoreError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| CoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Render a document in canonical form.
pub fn to_canonical_string(value: &Value) -> Result<String, CoreError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, AsciiPrettyFormatter::new());
    value.serialize(&mut ser)?;
    // The formatter only ever emits ASCII.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a document in canonical form, creating parent directories.
pub fn write_json_file(path: &Path, value: &Value) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
        }
    }
    let text = to_canonical_string(value)?;
    fs::write(path, text).map_err(|e| CoreError::io(path, e))
}

/// Rewrite a JSON file in canonical form.
pub fn format_json_file(path: &Path) -> Result<(), CoreError> {
    let value = read_json_file(path)?;
    write_json_file(path, &value)
}
