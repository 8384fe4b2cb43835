//! Label-prefixed, append-only merging of CSV documents.
//!
//! The first line of a source document is its header. It is written, prefixed
//! with the header label, only when this call creates the destination. Every
//! other line is written prefixed with the data label.
//!
//! A new destination is published whole (header first) with a no-clobber
//! rename, so concurrent appenders only ever add rows after a header.

use std::{
    fs::OpenOptions,
    io::{self, BufWriter, ErrorKind, Write},
    path::Path,
};

use tracing::{debug, info, warn};

use crate::error::Result;

/// Leading column values added to header and data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPair {
    pub header: String,
    pub data: String,
}

impl LabelPair {
    pub fn new(header: impl Into<String>, data: impl Into<String>) -> Self {
        LabelPair {
            header: header.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendReport {
    pub header_written: bool,
    pub rows_written: usize,
}

/// Append the rows of `source` to `dest`.
///
/// A source without any line is a no-op and `dest` is left untouched.
pub fn append(source: &Path, dest: &Path, labels: &LabelPair) -> Result<AppendReport> {
    let text = std::fs::read_to_string(source)?;
    if text.lines().next().is_none() {
        warn!(source = %source.display(), "source has no header line, nothing to append");
        return Ok(AppendReport::default());
    }

    let published = if dest.exists() {
        None
    } else {
        publish_new(&text, dest, labels)?
    };
    let report = match published {
        Some(report) => report,
        None => append_rows(&text, dest, labels)?,
    };

    info!(
        source = %source.display(),
        dest = %dest.display(),
        header_written = report.header_written,
        rows_written = report.rows_written,
        "appended rows"
    );
    Ok(report)
}

/// Stage header and rows in a sibling temp file and move it to `dest` only
/// if `dest` still does not exist.
///
/// Returns `None` when another writer created `dest` first. Either way the
/// destination always starts with the header of whoever created it.
fn publish_new(text: &str, dest: &Path, labels: &LabelPair) -> io::Result<Option<AppendReport>> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    builder.prefix(".append-");
    // default creation mode instead of the private temp file mode
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut staged = builder.tempfile_in(dir)?;
    let report = {
        let mut out = BufWriter::new(staged.as_file_mut());
        let report = write_labeled(text, true, labels, &mut out)?;
        out.flush()?;
        report
    };

    match staged.persist_noclobber(dest) {
        Ok(_) => {
            debug!(dest = %dest.display(), "created destination");
            Ok(Some(report))
        }
        Err(err) if err.error.kind() == ErrorKind::AlreadyExists => {
            debug!(dest = %dest.display(), "destination created concurrently");
            Ok(None)
        }
        Err(err) => Err(err.error),
    }
}

/// Append data rows only; the header of `text` is skipped.
fn append_rows(text: &str, dest: &Path, labels: &LabelPair) -> io::Result<AppendReport> {
    let file = OpenOptions::new().append(true).open(dest)?;
    let mut out = BufWriter::new(file);
    let report = write_labeled(text, false, labels, &mut out)?;
    out.flush()?;
    Ok(report)
}

/// Write every line of `text` with its label to `out`.
///
/// Lines are split on `\n` (a `\r` before it is dropped); a final newline
/// does not produce an empty trailing row.
pub fn write_labeled<W: Write>(
    text: &str,
    emit_header: bool,
    labels: &LabelPair,
    out: &mut W,
) -> io::Result<AppendReport> {
    let mut report = AppendReport::default();
    let mut lines = text.lines();

    if let Some(header) = lines.next()
        && emit_header
    {
        writeln!(out, "{},{}", labels.header, header)?;
        report.header_written = true;
    }

    for line in lines {
        writeln!(out, "{},{}", labels.data, line)?;
        report.rows_written += 1;
    }
    Ok(report)
}
