//! Column file fixtures for tests.

use byteorder::{BigEndian, WriteBytesExt};
use std::path::{Path, PathBuf};

/// Encodes `rows` as a column file: contiguous header then data.
pub fn column_bytes<T>(rows: &[Vec<T>], mut put: impl FnMut(&mut Vec<u8>, &T)) -> Vec<u8> {
    let mut header = Vec::new();
    let mut data = Vec::new();
    let mut start = 0i32;
    for row in rows {
        header.write_i32::<BigEndian>(start).unwrap();
        header.write_i32::<BigEndian>(row.len() as i32).unwrap();
        start += row.len() as i32;
        for v in row {
            put(&mut data, v);
        }
    }
    header.extend_from_slice(&data);
    header
}

/// Header bytes for explicit `(start, count)` pairs, valid or not.
pub fn raw_header(entries: &[(i32, i32)]) -> Vec<u8> {
    let mut out = Vec::new();
    for &(start, count) in entries {
        out.write_i32::<BigEndian>(start).unwrap();
        out.write_i32::<BigEndian>(count).unwrap();
    }
    out
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

pub fn int_rows(rows: &[Vec<i32>]) -> Vec<u8> {
    column_bytes(rows, |buf, v| buf.write_i32::<BigEndian>(*v).unwrap())
}

/// `(1,2,4) (3,4) (5,6)`
pub fn sample_int_rows() -> Vec<Vec<i32>> {
    vec![vec![1, 2, 4], vec![3, 4], vec![5, 6]]
}
