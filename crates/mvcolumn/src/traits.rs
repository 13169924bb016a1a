use crate::error::ColumnError;
use crate::metadata::ColumnMetadata;

/// Read surface shared by column readers whose rows hold several values.
///
/// Every array getter writes the values of `row` into the front of `out`
/// and returns how many it wrote. `out` must be at least
/// [`value_count(row)`](MultiValueReader::value_count) long.
pub trait MultiValueReader {
    /// `true` while the reader can serve reads.
    fn is_open(&self) -> bool;

    /// Releases the file handle and regions. Safe to call more than once.
    fn close(&mut self) -> bool;

    fn metadata(&self) -> ColumnMetadata;

    fn value_count(&self, row: usize) -> Result<usize, ColumnError>;

    fn get_int_array(&self, row: usize, out: &mut [i32]) -> Result<usize, ColumnError>;
    fn get_short_array(&self, row: usize, out: &mut [i16]) -> Result<usize, ColumnError>;
    fn get_long_array(&self, row: usize, out: &mut [i64]) -> Result<usize, ColumnError>;
    fn get_float_array(&self, row: usize, out: &mut [f32]) -> Result<usize, ColumnError>;
    fn get_double_array(&self, row: usize, out: &mut [f64]) -> Result<usize, ColumnError>;
    fn get_char_array(&self, row: usize, out: &mut [char]) -> Result<usize, ColumnError>;
    fn get_string_array(&self, row: usize, out: &mut [String]) -> Result<usize, ColumnError>;
    fn get_bytes_array<'a>(
        &'a self,
        row: usize,
        out: &mut [&'a [u8]],
    ) -> Result<usize, ColumnError>;
}
