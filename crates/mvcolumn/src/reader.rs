use cellbuf::{AccessMode, CellError, CellRegion, FixedWidthCellBuffer};
use std::fs::File;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ColumnError;
use crate::format::{self, DATA_COL};
use crate::metadata::ColumnMetadata;
use crate::options::ReaderOptions;
use crate::traits::MultiValueReader;

/// Header and data buffers of an open column. Dropped together on close.
struct Sections {
    header: FixedWidthCellBuffer,
    data: FixedWidthCellBuffer,
}

/// Reads a column whose rows each hold a variable number of fixed-width
/// values.
///
/// Take the rows `(1,2,4)`, `(3,4)`, `(5,6)`. The seven values are stored
/// back to back in a data section, and a header section records where each
/// row starts and how many values it has:
///
/// ```text
/// HEADER (start, count)   DATA
/// 0 3                     1 2 4 3 4 5 6
/// 3 2
/// 5 2
/// ```
///
/// Reading row 1 looks up `(3, 2)` in the header and then decodes data cells
/// 3 and 4.
///
/// # Opening
///
/// The size of the data section is not stored: it is the `start + count` of
/// the last header row. [`open`](MultiValueColumnReader::open) therefore
/// attaches the header first, derives the value count from it, and only then
/// attaches the data section. Both sections are either memory-mapped or
/// loaded into memory according to [`ReaderOptions::access_mode`].
///
/// # Concurrency
///
/// Nothing is mutated after open, so `&self` reads may run from any number
/// of threads. [`close`](MultiValueColumnReader::close) takes `&mut self`.
pub struct MultiValueColumnReader {
    path: Option<PathBuf>,
    file: Option<File>,
    sections: Option<Sections>,
    num_docs: usize,
    element_size: usize,
    total_values: usize,
    access_mode: AccessMode,
}

impl MultiValueColumnReader {
    /// Opens the column file at `path`.
    ///
    /// `num_docs` and `element_size` come from segment metadata kept outside
    /// this file.
    ///
    /// # Errors
    ///
    /// - [`ColumnError::EmptyColumn`] if `num_docs == 0`.
    /// - [`ColumnError::InvalidElementSize`] if `element_size == 0`.
    /// - [`ColumnError::Truncated`] if the file is shorter than the header, or
    ///   than header plus the derived data section.
    /// - [`ColumnError::CorruptHeader`] if header rows are negative or not
    ///   contiguous (contiguity only with `verify_header`).
    /// - [`ColumnError::Io`] on any open, read or mapping failure.
    pub fn open<P: AsRef<Path>>(
        path: P,
        num_docs: usize,
        element_size: usize,
        options: ReaderOptions,
    ) -> Result<Self, ColumnError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::build(file, Some(path.to_path_buf()), num_docs, element_size, options)
    }

    /// Like [`open`](MultiValueColumnReader::open) for an already opened file.
    pub fn from_file(
        file: File,
        num_docs: usize,
        element_size: usize,
        options: ReaderOptions,
    ) -> Result<Self, ColumnError> {
        Self::build(file, None, num_docs, element_size, options)
    }

    fn build(
        file: File,
        path: Option<PathBuf>,
        num_docs: usize,
        element_size: usize,
        options: ReaderOptions,
    ) -> Result<Self, ColumnError> {
        if num_docs == 0 {
            return Err(ColumnError::EmptyColumn);
        }
        if element_size == 0 {
            return Err(ColumnError::InvalidElementSize);
        }
        let mode = options.access_mode;
        let file_len = file.metadata()?.len();

        // Phase 1: header.
        let header_bytes =
            format::header_size(num_docs).ok_or(ColumnError::SizeOverflow("header"))?;
        ensure_file_len(file_len, header_bytes as u64)?;
        let header_region = CellRegion::read(&file, 0, header_bytes, mode)?;
        let header = format::header_buffer(header_region, num_docs)?;
        if options.verify_header {
            verify_header(&header)?;
        }

        // Phase 2: data, sized from the last header row.
        let total_values = derive_total_values(&header)?;
        let data_bytes = format::data_size(total_values, element_size)
            .ok_or(ColumnError::SizeOverflow("data"))?;
        let end = (header_bytes as u64)
            .checked_add(data_bytes as u64)
            .ok_or(ColumnError::SizeOverflow("file"))?;
        ensure_file_len(file_len, end)?;
        let data_region = CellRegion::read(&file, header_bytes as u64, data_bytes, mode)?;
        let data = format::data_buffer(data_region, total_values, element_size)?;

        debug!(
            path = ?path,
            num_docs,
            total_values,
            element_size,
            mode = %mode,
            "opened multi-value column"
        );

        Ok(Self {
            path,
            file: Some(file),
            sections: Some(Sections { header, data }),
            num_docs,
            element_size,
            total_values,
            access_mode: mode,
        })
    }

    /// Always `true` between a successful open and [`close`](Self::close).
    pub fn is_open(&self) -> bool {
        self.sections.is_some()
    }

    /// Releases the file handle and both regions.
    ///
    /// Returns `true` on success. Closing an already closed reader is a no-op
    /// that also returns `true`. Reads after close fail with
    /// [`ColumnError::Closed`].
    pub fn close(&mut self) -> bool {
        let was_open = self.sections.take().is_some();
        drop(self.file.take());
        if was_open {
            debug!(path = ?self.path, "closed multi-value column");
        }
        true
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Number of values across all rows.
    pub fn total_values(&self) -> usize {
        self.total_values
    }

    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn metadata(&self) -> ColumnMetadata {
        let header_bytes = self.num_docs * format::HEADER_ROW_BYTES;
        ColumnMetadata {
            num_docs: self.num_docs,
            element_size: self.element_size,
            total_values: self.total_values,
            header_bytes,
            data_bytes: self.total_values * self.element_size,
            access_mode: self.access_mode,
        }
    }

    /// Data cells holding the values of `row`.
    pub fn row_range(&self, row: usize) -> Result<Range<usize>, ColumnError> {
        self.locate(row).map(|(_, range)| range)
    }

    pub fn value_count(&self, row: usize) -> Result<usize, ColumnError> {
        self.row_range(row).map(|range| range.len())
    }

    fn locate(&self, row: usize) -> Result<(&Sections, Range<usize>), ColumnError> {
        let sections = self.sections.as_ref().ok_or(ColumnError::Closed)?;
        if row >= self.num_docs {
            return Err(ColumnError::OutOfBounds {
                row,
                num_docs: self.num_docs,
            });
        }
        let (start, count) = format::header_entry(&sections.header, row)?;
        let start = non_negative(row, start, "start offset")?;
        let count = non_negative(row, count, "value count")?;
        let end = start
            .checked_add(count)
            .ok_or(ColumnError::SizeOverflow("row"))?;
        Ok((sections, start..end))
    }

    /// Shared traversal behind every array getter: resolve the row, check
    /// capacity, decode each data cell with `read`.
    fn read_row<'a, T>(
        &'a self,
        row: usize,
        out: &mut [T],
        read: impl Fn(&'a FixedWidthCellBuffer, usize) -> Result<T, CellError>,
    ) -> Result<usize, ColumnError> {
        let (sections, range) = self.locate(row)?;
        let needed = range.len();
        if out.len() < needed {
            return Err(ColumnError::OutputTooSmall {
                row,
                needed,
                capacity: out.len(),
            });
        }
        for (slot, cell) in out.iter_mut().zip(range) {
            *slot = read(&sections.data, cell)?;
        }
        Ok(needed)
    }

    pub fn get_int_array(&self, row: usize, out: &mut [i32]) -> Result<usize, ColumnError> {
        self.read_row(row, out, |data, cell| data.get_int(cell, DATA_COL))
    }

    pub fn get_short_array(&self, row: usize, out: &mut [i16]) -> Result<usize, ColumnError> {
        self.read_row(row, out, |data, cell| data.get_short(cell, DATA_COL))
    }

    pub fn get_long_array(&self, row: usize, out: &mut [i64]) -> Result<usize, ColumnError> {
        self.read_row(row, out, |data, cell| data.get_long(cell, DATA_COL))
    }

    pub fn get_float_array(&self, row: usize, out: &mut [f32]) -> Result<usize, ColumnError> {
        self.read_row(row, out, |data, cell| data.get_float(cell, DATA_COL))
    }

    pub fn get_double_array(&self, row: usize, out: &mut [f64]) -> Result<usize, ColumnError> {
        self.read_row(row, out, |data, cell| data.get_double(cell, DATA_COL))
    }

    pub fn get_char_array(&self, row: usize, out: &mut [char]) -> Result<usize, ColumnError> {
        self.read_row(row, out, |data, cell| data.get_char(cell, DATA_COL))
    }

    pub fn get_string_array(&self, row: usize, out: &mut [String]) -> Result<usize, ColumnError> {
        self.read_row(row, out, |data, cell| data.get_string(cell, DATA_COL))
    }

    /// Fills `out` with borrowed slices of the data section; no bytes are copied.
    pub fn get_bytes_array<'a>(
        &'a self,
        row: usize,
        out: &mut [&'a [u8]],
    ) -> Result<usize, ColumnError> {
        self.read_row(row, out, |data, cell| data.get_bytes(cell, DATA_COL))
    }
}

impl MultiValueReader for MultiValueColumnReader {
    fn is_open(&self) -> bool {
        MultiValueColumnReader::is_open(self)
    }

    fn close(&mut self) -> bool {
        MultiValueColumnReader::close(self)
    }

    fn metadata(&self) -> ColumnMetadata {
        MultiValueColumnReader::metadata(self)
    }

    fn value_count(&self, row: usize) -> Result<usize, ColumnError> {
        MultiValueColumnReader::value_count(self, row)
    }

    fn get_int_array(&self, row: usize, out: &mut [i32]) -> Result<usize, ColumnError> {
        MultiValueColumnReader::get_int_array(self, row, out)
    }

    fn get_short_array(&self, row: usize, out: &mut [i16]) -> Result<usize, ColumnError> {
        MultiValueColumnReader::get_short_array(self, row, out)
    }

    fn get_long_array(&self, row: usize, out: &mut [i64]) -> Result<usize, ColumnError> {
        MultiValueColumnReader::get_long_array(self, row, out)
    }

    fn get_float_array(&self, row: usize, out: &mut [f32]) -> Result<usize, ColumnError> {
        MultiValueColumnReader::get_float_array(self, row, out)
    }

    fn get_double_array(&self, row: usize, out: &mut [f64]) -> Result<usize, ColumnError> {
        MultiValueColumnReader::get_double_array(self, row, out)
    }

    fn get_char_array(&self, row: usize, out: &mut [char]) -> Result<usize, ColumnError> {
        MultiValueColumnReader::get_char_array(self, row, out)
    }

    fn get_string_array(&self, row: usize, out: &mut [String]) -> Result<usize, ColumnError> {
        MultiValueColumnReader::get_string_array(self, row, out)
    }

    fn get_bytes_array<'a>(
        &'a self,
        row: usize,
        out: &mut [&'a [u8]],
    ) -> Result<usize, ColumnError> {
        MultiValueColumnReader::get_bytes_array(self, row, out)
    }
}

fn ensure_file_len(actual: u64, expected: u64) -> Result<(), ColumnError> {
    if actual < expected {
        return Err(ColumnError::Truncated { expected, actual });
    }
    Ok(())
}

fn non_negative(row: usize, value: i32, what: &str) -> Result<usize, ColumnError> {
    usize::try_from(value).map_err(|_| ColumnError::CorruptHeader {
        row,
        reason: format!("negative {what} {value}"),
    })
}

/// Checks that rows tile the data section with no gaps or overlaps:
/// `start(0) == 0` and `start(r + 1) == start(r) + count(r)`.
fn verify_header(header: &FixedWidthCellBuffer) -> Result<(), ColumnError> {
    let mut expected = 0usize;
    for row in 0..header.num_rows() {
        let (start, count) = format::header_entry(header, row)?;
        let start = non_negative(row, start, "start offset")?;
        let count = non_negative(row, count, "value count")?;
        if start != expected {
            return Err(ColumnError::CorruptHeader {
                row,
                reason: format!("start offset {start}, expected {expected}"),
            });
        }
        expected = expected
            .checked_add(count)
            .ok_or(ColumnError::SizeOverflow("value count"))?;
    }
    Ok(())
}

fn derive_total_values(header: &FixedWidthCellBuffer) -> Result<usize, ColumnError> {
    let last = header.num_rows() - 1;
    let (start, count) = format::header_entry(header, last)?;
    let start = non_negative(last, start, "start offset")?;
    let count = non_negative(last, count, "value count")?;
    start
        .checked_add(count)
        .ok_or(ColumnError::SizeOverflow("value count"))
}
