//! # cellbuf: fixed-width cell buffers
//!
//! A [`FixedWidthCellBuffer`] views a contiguous byte region as a grid of
//! `num_rows x num_cols` cells. Each column declares its own byte width, so
//! locating any cell is pure arithmetic:
//!
//! ```text
//! row_width       = sum(column_widths)
//! offset(row,col) = row * row_width + sum(column_widths[..col])
//!
//! ┌──────────── row 0 ────────────┬──────────── row 1 ────────────┐
//! │ col 0 (w0) │ col 1 (w1) │ ... │ col 0 (w0) │ col 1 (w1) │ ... │
//! └───────────────────────────────┴───────────────────────────────┘
//! ```
//!
//! Typed getters reinterpret a cell as `i32`/`i16`/`i64`/`f32`/`f64`
//! (big-endian), a UTF-16 code unit, NUL-padded UTF-8 text, or raw bytes.
//!
//! The region behind a buffer is a [`CellRegion`]: either bytes read into
//! memory or a read-only memory mapping, picked by [`AccessMode`].

mod buffer;
mod cell_type;
mod error;
mod region;

pub use buffer::FixedWidthCellBuffer;
pub use cell_type::CellType;
pub use error::CellError;
pub use region::{AccessMode, CellRegion};
