use cellbuf::AccessMode;
use std::fmt;

/// Shape of an opened multi-value column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub num_docs: usize,
    pub element_size: usize,
    /// Derived from the last header row at open time.
    pub total_values: usize,
    pub header_bytes: usize,
    pub data_bytes: usize,
    pub access_mode: AccessMode,
}

impl ColumnMetadata {
    /// Bytes of the file covered by header and data sections.
    pub fn file_bytes(&self) -> usize {
        self.header_bytes + self.data_bytes
    }
}

impl fmt::Display for ColumnMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "docs={} values={} element_size={} header={}B data={}B mode={}",
            self.num_docs,
            self.total_values,
            self.element_size,
            self.header_bytes,
            self.data_bytes,
            self.access_mode
        )
    }
}
