use std::fmt;
use std::str::FromStr;

/// The closed set of logical types a cell can be decoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    Int,
    Short,
    Long,
    Float,
    Double,
    Char,
    String,
    Bytes,
}

impl CellType {
    pub const ALL: [CellType; 8] = [
        CellType::Int,
        CellType::Short,
        CellType::Long,
        CellType::Float,
        CellType::Double,
        CellType::Char,
        CellType::String,
        CellType::Bytes,
    ];

    /// Encoded width in bytes, or `None` for types bounded by the declared
    /// column width.
    pub fn natural_width(self) -> Option<usize> {
        match self {
            CellType::Int | CellType::Float => Some(4),
            CellType::Short | CellType::Char => Some(2),
            CellType::Long | CellType::Double => Some(8),
            CellType::String | CellType::Bytes => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CellType::Int => "int",
            CellType::Short => "short",
            CellType::Long => "long",
            CellType::Float => "float",
            CellType::Double => "double",
            CellType::Char => "char",
            CellType::String => "string",
            CellType::Bytes => "bytes",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown cell type '{s}'"))
    }
}
