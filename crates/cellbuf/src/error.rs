use std::io;

use thiserror::Error;

/// Errors raised while building or reading a [`FixedWidthCellBuffer`](crate::FixedWidthCellBuffer).
#[derive(Debug, Error)]
pub enum CellError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The declared column widths cannot describe a buffer (no columns, a
    /// zero-width column, or a total size that overflows `usize`).
    #[error("invalid cell layout: {0}")]
    InvalidLayout(&'static str),

    /// The backing region holds fewer bytes than `num_rows * row_width`.
    #[error("cell region too small: expected {expected} bytes, got {actual}")]
    RegionTooSmall { expected: usize, actual: usize },

    #[error("cell ({row}, {col}) out of bounds for {num_rows}x{num_cols} buffer")]
    OutOfBounds {
        row: usize,
        col: usize,
        num_rows: usize,
        num_cols: usize,
    },

    /// A typed getter was applied to a column whose declared width does not
    /// fit the requested type.
    #[error("column {col} is {width} bytes wide, {expected} required")]
    WidthMismatch {
        col: usize,
        width: usize,
        expected: usize,
    },

    #[error("cell ({row}, {col}) holds lone surrogate 0x{unit:04x}")]
    InvalidChar { row: usize, col: usize, unit: u16 },

    #[error("cell ({row}, {col}) is not valid utf-8")]
    InvalidUtf8 { row: usize, col: usize },
}
