use cellbuf::CellError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColumnError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Cell(#[from] CellError),

    /// `num_docs == 0`: there is no last header row to derive the value count from.
    #[error("column has no documents")]
    EmptyColumn,

    #[error("element size must be positive")]
    InvalidElementSize,

    #[error("column file truncated: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: u64, actual: u64 },

    #[error("corrupt header at row {row}: {reason}")]
    CorruptHeader { row: usize, reason: String },

    #[error("{0} size overflows")]
    SizeOverflow(&'static str),

    #[error("row {row} out of bounds for {num_docs} documents")]
    OutOfBounds { row: usize, num_docs: usize },

    #[error("row {row} has {needed} values, output holds {capacity}")]
    OutputTooSmall {
        row: usize,
        needed: usize,
        capacity: usize,
    },

    #[error("reader is closed")]
    Closed,
}

impl ColumnError {
    /// `true` for errors caused by the file contents or the layout parameters
    /// rather than by I/O or by the caller's arguments at read time.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            ColumnError::EmptyColumn
                | ColumnError::InvalidElementSize
                | ColumnError::Truncated { .. }
                | ColumnError::CorruptHeader { .. }
                | ColumnError::SizeOverflow(_)
        )
    }
}
