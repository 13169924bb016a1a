//! # mvcolumn: multi-value column reader
//!
//! Reads immutable column files in which every row holds a variable-length
//! list of fixed-width values. Any row is located and decoded in O(1).
//!
//! ## File layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │ HEADER (num_docs rows, 8 bytes each)             │
//! │                                                  │
//! │ start_offset (i32 BE) | num_values (i32 BE)      │
//! │                                                  │
//! │ ... one record per row, in row order ...         │
//! ├──────────────────────────────────────────────────┤
//! │ DATA (total_values cells, element_size each)     │
//! │                                                  │
//! │ values of row 0 | values of row 1 | ...          │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! `num_docs` and `element_size` are not stored in the file; they come from
//! segment metadata and are passed to [`MultiValueColumnReader::open`].
//! `total_values` is derived from the last header record.

mod error;
pub mod format;
mod metadata;
mod options;
mod reader;
mod traits;

#[cfg(test)]
mod testutil;

pub use cellbuf::{AccessMode, CellType};
pub use error::ColumnError;
pub use metadata::ColumnMetadata;
pub use options::ReaderOptions;
pub use reader::MultiValueColumnReader;
pub use traits::MultiValueReader;
