//! Rendering of multi-value column rows for `mvcol`.
//!
//! Each row becomes one tab-separated line: `row`, value count, and the
//! values joined by commas. Strings are debug-quoted, bytes are lowercase hex.

use anyhow::{bail, Result};
use mvcolumn::{CellType, MultiValueReader};
use std::fmt::Display;
use std::io::Write;
use std::ops::Range;

/// Picks the element width for `ty`.
///
/// Fixed-width types default to their natural width and reject any other
/// explicit value. Strings and bytes have no natural width, so one must be
/// given.
pub fn resolve_element_size(ty: CellType, explicit: Option<usize>) -> Result<usize> {
    match (ty.natural_width(), explicit) {
        (Some(natural), None) => Ok(natural),
        (Some(natural), Some(given)) if given == natural => Ok(given),
        (Some(natural), Some(given)) => {
            bail!("{ty} values are {natural} bytes wide, got --element-size {given}")
        }
        (None, Some(given)) if given > 0 => Ok(given),
        (None, _) => bail!("--element-size is required for {ty} columns"),
    }
}

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Renders the values of `row` decoded as `ty`.
pub fn format_row<R: MultiValueReader + ?Sized>(
    reader: &R,
    ty: CellType,
    row: usize,
) -> Result<String> {
    let n = reader.value_count(row)?;
    let rendered = match ty {
        CellType::Int => {
            let mut buf = vec![0i32; n];
            reader.get_int_array(row, &mut buf)?;
            join(&buf)
        }
        CellType::Short => {
            let mut buf = vec![0i16; n];
            reader.get_short_array(row, &mut buf)?;
            join(&buf)
        }
        CellType::Long => {
            let mut buf = vec![0i64; n];
            reader.get_long_array(row, &mut buf)?;
            join(&buf)
        }
        CellType::Float => {
            let mut buf = vec![0f32; n];
            reader.get_float_array(row, &mut buf)?;
            join(&buf)
        }
        CellType::Double => {
            let mut buf = vec![0f64; n];
            reader.get_double_array(row, &mut buf)?;
            join(&buf)
        }
        CellType::Char => {
            let mut buf = vec!['\0'; n];
            reader.get_char_array(row, &mut buf)?;
            join(&buf)
        }
        CellType::String => {
            let mut buf = vec![String::new(); n];
            reader.get_string_array(row, &mut buf)?;
            buf.iter()
                .map(|s| format!("{s:?}"))
                .collect::<Vec<_>>()
                .join(",")
        }
        CellType::Bytes => {
            let mut buf = vec![b"".as_slice(); n];
            reader.get_bytes_array(row, &mut buf)?;
            buf.iter().map(|b| hex(b)).collect::<Vec<_>>().join(",")
        }
    };
    Ok(rendered)
}

/// Writes one line per row in `rows` to `out`, clamped to the column's rows.
///
/// Returns the number of rows written.
pub fn dump_rows<R: MultiValueReader + ?Sized, W: Write>(
    reader: &R,
    ty: CellType,
    rows: Range<usize>,
    out: &mut W,
) -> Result<usize> {
    let num_docs = reader.metadata().num_docs;
    let rows = rows.start.min(num_docs)..rows.end.min(num_docs);
    let mut written = 0;
    for row in rows {
        let count = reader.value_count(row)?;
        writeln!(out, "{row}\t{count}\t{}", format_row(reader, ty, row)?)?;
        written += 1;
    }
    Ok(written)
}
