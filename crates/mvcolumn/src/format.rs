//! Multi-value column file layout.
//!
//! ```text
//! [HEADER] num_docs x (start_offset: i32 BE | num_values: i32 BE)
//! [DATA]   total_values x element_size bytes
//! ```
//!
//! `total_values` is not stored anywhere; it is `start + count` of the last
//! header row.

use cellbuf::{CellError, CellRegion, FixedWidthCellBuffer};

/// Width of each header integer.
pub const HEADER_INT_BYTES: usize = 4;

/// Header columns: start offset, value count.
pub const HEADER_COLS: usize = 2;

pub const HEADER_ROW_BYTES: usize = HEADER_INT_BYTES * HEADER_COLS;

pub const START_OFFSET_COL: usize = 0;
pub const NUM_VALUES_COL: usize = 1;

/// The data section is a single column of elements.
pub const DATA_COL: usize = 0;

/// Bytes occupied by the header of a column with `num_docs` rows.
pub fn header_size(num_docs: usize) -> Option<usize> {
    num_docs.checked_mul(HEADER_ROW_BYTES)
}

/// Bytes occupied by `total_values` elements of `element_size` bytes.
pub fn data_size(total_values: usize, element_size: usize) -> Option<usize> {
    total_values.checked_mul(element_size)
}

/// Wraps a header region as a `num_docs x 2` grid of 4-byte cells.
pub fn header_buffer(
    region: CellRegion,
    num_docs: usize,
) -> Result<FixedWidthCellBuffer, CellError> {
    FixedWidthCellBuffer::new(region, num_docs, &[HEADER_INT_BYTES; HEADER_COLS])
}

/// Wraps a data region as a single column of `element_size`-byte cells.
pub fn data_buffer(
    region: CellRegion,
    total_values: usize,
    element_size: usize,
) -> Result<FixedWidthCellBuffer, CellError> {
    FixedWidthCellBuffer::new(region, total_values, &[element_size])
}

/// Reads the raw `(start_offset, num_values)` pair of header row `row`.
pub fn header_entry(header: &FixedWidthCellBuffer, row: usize) -> Result<(i32, i32), CellError> {
    Ok((
        header.get_int(row, START_OFFSET_COL)?,
        header.get_int(row, NUM_VALUES_COL)?,
    ))
}
