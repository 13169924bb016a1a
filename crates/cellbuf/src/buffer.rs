use byteorder::{BigEndian, ByteOrder};

use crate::cell_type::CellType;
use crate::error::CellError;
use crate::region::CellRegion;

/// Row-major grid of fixed-width cells over a single byte region.
///
/// Every column has its own declared width; a row is the concatenation of
/// one cell per column, so the cell at `(row, col)` starts at
/// `row * row_width + sum(column_widths[..col])`.
///
/// The buffer never changes after construction, which makes it safe to share
/// across threads and read without synchronisation.
#[derive(Debug)]
pub struct FixedWidthCellBuffer {
    region: CellRegion,
    num_rows: usize,
    column_widths: Vec<usize>,
    /// Byte offset of each column inside a row.
    column_offsets: Vec<usize>,
    row_width: usize,
}

impl FixedWidthCellBuffer {
    /// Builds a buffer of `num_rows` rows with one column per entry of
    /// `column_widths`.
    ///
    /// # Errors
    ///
    /// - [`CellError::InvalidLayout`] if there are no columns, a column is zero
    ///   bytes wide, or the total size overflows.
    /// - [`CellError::RegionTooSmall`] if `region` holds fewer than
    ///   `num_rows * row_width` bytes. Trailing bytes beyond that are ignored.
    pub fn new(
        region: CellRegion,
        num_rows: usize,
        column_widths: &[usize],
    ) -> Result<Self, CellError> {
        if column_widths.is_empty() {
            return Err(CellError::InvalidLayout("buffer needs at least one column"));
        }
        if column_widths.contains(&0) {
            return Err(CellError::InvalidLayout("column width must be positive"));
        }

        let mut column_offsets = Vec::with_capacity(column_widths.len());
        let mut row_width = 0usize;
        for &width in column_widths {
            column_offsets.push(row_width);
            row_width = row_width
                .checked_add(width)
                .ok_or(CellError::InvalidLayout("row width overflows"))?;
        }

        let expected = num_rows
            .checked_mul(row_width)
            .ok_or(CellError::InvalidLayout("buffer size overflows"))?;
        if region.len() < expected {
            return Err(CellError::RegionTooSmall {
                expected,
                actual: region.len(),
            });
        }

        Ok(Self {
            region,
            num_rows,
            column_widths: column_widths.to_vec(),
            column_offsets,
            row_width,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.column_widths.len()
    }

    /// Sum of all column widths.
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// Declared width of `col`, or `None` if there is no such column.
    pub fn column_width(&self, col: usize) -> Option<usize> {
        self.column_widths.get(col).copied()
    }

    /// `true` if the backing region is a memory mapping.
    pub fn is_mapped(&self) -> bool {
        self.region.is_mapped()
    }

    /// Byte offset of cell `(row, col)` within the region.
    pub fn cell_offset(&self, row: usize, col: usize) -> Result<usize, CellError> {
        self.check_bounds(row, col)?;
        Ok(row * self.row_width + self.column_offsets[col])
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), CellError> {
        if row >= self.num_rows || col >= self.column_widths.len() {
            return Err(CellError::OutOfBounds {
                row,
                col,
                num_rows: self.num_rows,
                num_cols: self.column_widths.len(),
            });
        }
        Ok(())
    }

    fn cell(&self, row: usize, col: usize) -> Result<&[u8], CellError> {
        let start = self.cell_offset(row, col)?;
        Ok(&self.region[start..start + self.column_widths[col]])
    }

    /// Cell bytes for a fixed-width numeric type; the declared width must be
    /// exactly the type's width.
    fn numeric_cell(&self, row: usize, col: usize, ty: CellType) -> Result<&[u8], CellError> {
        let cell = self.cell(row, col)?;
        let expected = ty.natural_width().unwrap_or(cell.len());
        if cell.len() != expected {
            return Err(CellError::WidthMismatch {
                col,
                width: cell.len(),
                expected,
            });
        }
        Ok(cell)
    }

    pub fn get_int(&self, row: usize, col: usize) -> Result<i32, CellError> {
        Ok(BigEndian::read_i32(self.numeric_cell(row, col, CellType::Int)?))
    }

    pub fn get_short(&self, row: usize, col: usize) -> Result<i16, CellError> {
        Ok(BigEndian::read_i16(self.numeric_cell(row, col, CellType::Short)?))
    }

    pub fn get_long(&self, row: usize, col: usize) -> Result<i64, CellError> {
        Ok(BigEndian::read_i64(self.numeric_cell(row, col, CellType::Long)?))
    }

    pub fn get_float(&self, row: usize, col: usize) -> Result<f32, CellError> {
        Ok(BigEndian::read_f32(self.numeric_cell(row, col, CellType::Float)?))
    }

    pub fn get_double(&self, row: usize, col: usize) -> Result<f64, CellError> {
        Ok(BigEndian::read_f64(self.numeric_cell(row, col, CellType::Double)?))
    }

    /// Decodes the first two bytes of the cell as one big-endian UTF-16 code
    /// unit. Wider cells are allowed; the remaining bytes are ignored.
    pub fn get_char(&self, row: usize, col: usize) -> Result<char, CellError> {
        let cell = self.cell(row, col)?;
        if cell.len() < 2 {
            return Err(CellError::WidthMismatch {
                col,
                width: cell.len(),
                expected: 2,
            });
        }
        let unit = BigEndian::read_u16(cell);
        char::from_u32(u32::from(unit)).ok_or(CellError::InvalidChar { row, col, unit })
    }

    /// Decodes the cell as UTF-8 text, dropping trailing NUL padding.
    pub fn get_string(&self, row: usize, col: usize) -> Result<String, CellError> {
        let cell = self.cell(row, col)?;
        let end = cell.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        std::str::from_utf8(&cell[..end])
            .map(str::to_owned)
            .map_err(|_| CellError::InvalidUtf8 { row, col })
    }

    /// Raw cell bytes, exactly the declared column width long.
    pub fn get_bytes(&self, row: usize, col: usize) -> Result<&[u8], CellError> {
        self.cell(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    // Two rows of (i32, i64, [u8; 6]).
    fn mixed_buffer() -> FixedWidthCellBuffer {
        let mut bytes = Vec::new();
        for (i, l, s) in [(7i32, -9i64, b"abc\0\0\0"), (i32::MIN, i64::MAX, b"hello!")] {
            bytes.write_i32::<BigEndian>(i).unwrap();
            bytes.write_i64::<BigEndian>(l).unwrap();
            bytes.extend_from_slice(s);
        }
        FixedWidthCellBuffer::new(CellRegion::from_vec(bytes), 2, &[4, 8, 6]).unwrap()
    }

    fn single_column(width: usize, bytes: Vec<u8>) -> FixedWidthCellBuffer {
        let rows = bytes.len() / width;
        FixedWidthCellBuffer::new(CellRegion::from_vec(bytes), rows, &[width]).unwrap()
    }

    // -------------------- Layout --------------------

    #[test]
    fn offsets_follow_row_major_layout() {
        let buf = mixed_buffer();
        assert_eq!(buf.num_rows(), 2);
        assert_eq!(buf.num_cols(), 3);
        assert_eq!(buf.row_width(), 18);
        assert_eq!(buf.cell_offset(0, 0).unwrap(), 0);
        assert_eq!(buf.cell_offset(0, 2).unwrap(), 12);
        assert_eq!(buf.cell_offset(1, 1).unwrap(), 22);
        assert_eq!(buf.column_width(2), Some(6));
        assert_eq!(buf.column_width(3), None);
        assert!(!buf.is_mapped());
    }

    #[test]
    fn mixed_columns_decode() {
        let buf = mixed_buffer();
        assert_eq!(buf.get_int(0, 0).unwrap(), 7);
        assert_eq!(buf.get_long(0, 1).unwrap(), -9);
        assert_eq!(buf.get_string(0, 2).unwrap(), "abc");
        assert_eq!(buf.get_int(1, 0).unwrap(), i32::MIN);
        assert_eq!(buf.get_long(1, 1).unwrap(), i64::MAX);
        assert_eq!(buf.get_string(1, 2).unwrap(), "hello!");
        assert_eq!(buf.get_bytes(0, 2).unwrap(), b"abc\0\0\0");
    }

    #[test]
    fn region_too_small_rejected() {
        let err = FixedWidthCellBuffer::new(CellRegion::from_vec(vec![0; 15]), 2, &[4, 4])
            .unwrap_err();
        assert!(matches!(
            err,
            CellError::RegionTooSmall {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn trailing_bytes_tolerated() {
        let buf = single_column(4, vec![0, 0, 0, 1, 0xff]);
        assert_eq!(buf.num_rows(), 1);
        assert_eq!(buf.get_int(0, 0).unwrap(), 1);
    }

    #[test]
    fn bad_layouts_rejected() {
        let region = || CellRegion::from_vec(vec![0; 8]);
        assert!(matches!(
            FixedWidthCellBuffer::new(region(), 1, &[]),
            Err(CellError::InvalidLayout(_))
        ));
        assert!(matches!(
            FixedWidthCellBuffer::new(region(), 1, &[4, 0]),
            Err(CellError::InvalidLayout(_))
        ));
        assert!(matches!(
            FixedWidthCellBuffer::new(region(), usize::MAX, &[4]),
            Err(CellError::InvalidLayout(_))
        ));
    }

    #[test]
    fn zero_rows_is_valid() {
        let buf = FixedWidthCellBuffer::new(CellRegion::from_vec(Vec::new()), 0, &[8]).unwrap();
        assert_eq!(buf.num_rows(), 0);
        assert!(matches!(
            buf.get_long(0, 0),
            Err(CellError::OutOfBounds { .. })
        ));
    }

    // -------------------- Bounds --------------------

    #[test]
    fn out_of_bounds_row_and_col() {
        let buf = mixed_buffer();
        assert!(matches!(
            buf.get_int(2, 0),
            Err(CellError::OutOfBounds {
                row: 2,
                col: 0,
                num_rows: 2,
                num_cols: 3
            })
        ));
        assert!(matches!(
            buf.get_bytes(0, 3),
            Err(CellError::OutOfBounds { col: 3, .. })
        ));
    }

    // -------------------- Numeric boundary values --------------------

    #[test]
    fn int_boundaries() {
        let values = [0, 1, -1, i32::MIN, i32::MAX];
        let mut bytes = Vec::new();
        for v in values {
            bytes.write_i32::<BigEndian>(v).unwrap();
        }
        let buf = single_column(4, bytes);
        for (row, v) in values.iter().enumerate() {
            assert_eq!(buf.get_int(row, 0).unwrap(), *v);
        }
    }

    #[test]
    fn short_and_long_boundaries() {
        let shorts = [0i16, -1, i16::MIN, i16::MAX];
        let mut bytes = Vec::new();
        for v in shorts {
            bytes.write_i16::<BigEndian>(v).unwrap();
        }
        let buf = single_column(2, bytes);
        for (row, v) in shorts.iter().enumerate() {
            assert_eq!(buf.get_short(row, 0).unwrap(), *v);
        }

        let longs = [0i64, -1, i64::MIN, i64::MAX];
        let mut bytes = Vec::new();
        for v in longs {
            bytes.write_i64::<BigEndian>(v).unwrap();
        }
        let buf = single_column(8, bytes);
        for (row, v) in longs.iter().enumerate() {
            assert_eq!(buf.get_long(row, 0).unwrap(), *v);
        }
    }

    #[test]
    fn float_and_double_are_bit_exact() {
        let floats = [0.0f32, -0.0, f32::MIN, f32::MAX, f32::MIN_POSITIVE, -1.5];
        let mut bytes = Vec::new();
        for v in floats {
            bytes.write_f32::<BigEndian>(v).unwrap();
        }
        let buf = single_column(4, bytes);
        for (row, v) in floats.iter().enumerate() {
            assert_eq!(buf.get_float(row, 0).unwrap().to_bits(), v.to_bits());
        }

        let doubles = [0.0f64, -0.0, f64::MIN, f64::MAX, f64::EPSILON, 1e300];
        let mut bytes = Vec::new();
        for v in doubles {
            bytes.write_f64::<BigEndian>(v).unwrap();
        }
        let buf = single_column(8, bytes);
        for (row, v) in doubles.iter().enumerate() {
            assert_eq!(buf.get_double(row, 0).unwrap().to_bits(), v.to_bits());
        }
    }

    #[test]
    fn cells_are_big_endian() {
        let buf = single_column(4, vec![0x01, 0x02, 0x03, 0x04]);
        assert_eq!(buf.get_int(0, 0).unwrap(), 0x0102_0304);
    }

    #[test]
    fn numeric_width_mismatch_rejected() {
        let buf = single_column(8, vec![0; 16]);
        assert!(matches!(
            buf.get_int(0, 0),
            Err(CellError::WidthMismatch {
                col: 0,
                width: 8,
                expected: 4
            })
        ));
        assert!(matches!(
            buf.get_short(1, 0),
            Err(CellError::WidthMismatch { .. })
        ));
        assert!(buf.get_double(1, 0).is_ok());
    }

    // -------------------- Char / string / bytes --------------------

    #[test]
    fn chars_decode_utf16_units() {
        let mut bytes = Vec::new();
        for c in ['a', 'é', '€'] {
            bytes.write_u16::<BigEndian>(c as u16).unwrap();
        }
        let buf = single_column(2, bytes);
        assert_eq!(buf.get_char(0, 0).unwrap(), 'a');
        assert_eq!(buf.get_char(1, 0).unwrap(), 'é');
        assert_eq!(buf.get_char(2, 0).unwrap(), '€');
    }

    #[test]
    fn lone_surrogate_is_invalid_char() {
        let buf = single_column(2, vec![0xd8, 0x00]);
        assert!(matches!(
            buf.get_char(0, 0),
            Err(CellError::InvalidChar { unit: 0xd800, .. })
        ));
    }

    #[test]
    fn char_needs_two_bytes() {
        let buf = single_column(1, vec![b'x']);
        assert!(matches!(
            buf.get_char(0, 0),
            Err(CellError::WidthMismatch { expected: 2, .. })
        ));
    }

    #[test]
    fn strings_trim_trailing_padding_only() {
        let buf = single_column(
            8,
            [b"\0ab\0cd\0\0".as_slice(), b"\0\0\0\0\0\0\0\0", "héllo\0\0".as_bytes()].concat(),
        );
        assert_eq!(buf.get_string(0, 0).unwrap(), "\0ab\0cd");
        assert_eq!(buf.get_string(1, 0).unwrap(), "");
        assert_eq!(buf.get_string(2, 0).unwrap(), "héllo");
    }

    #[test]
    fn invalid_utf8_string_rejected() {
        let buf = single_column(2, vec![0xff, 0xfe]);
        assert!(matches!(
            buf.get_string(0, 0),
            Err(CellError::InvalidUtf8 { row: 0, col: 0 })
        ));
        assert_eq!(buf.get_bytes(0, 0).unwrap(), &[0xff, 0xfe]);
    }

    #[test]
    fn repeated_reads_are_identical() {
        let buf = mixed_buffer();
        let first: Vec<u8> = buf.get_bytes(1, 2).unwrap().to_vec();
        for _ in 0..3 {
            assert_eq!(buf.get_bytes(1, 2).unwrap(), first.as_slice());
            assert_eq!(buf.get_long(1, 1).unwrap(), i64::MAX);
        }
    }
}
