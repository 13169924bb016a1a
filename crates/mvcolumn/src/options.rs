use cellbuf::AccessMode;

/// Settings chosen once when a column is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Whether header and data sections are mapped or loaded into memory.
    pub access_mode: AccessMode,

    /// If `true`, every header row is checked for contiguity at open time.
    /// The file length check is performed regardless.
    pub verify_header: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            access_mode: AccessMode::MemoryMapped,
            verify_header: true,
        }
    }
}

impl ReaderOptions {
    pub fn memory_mapped() -> Self {
        Self {
            access_mode: AccessMode::MemoryMapped,
            ..Self::default()
        }
    }

    pub fn load_to_memory() -> Self {
        Self {
            access_mode: AccessMode::LoadToMemory,
            ..Self::default()
        }
    }

    pub fn with_access_mode(mut self, access_mode: AccessMode) -> Self {
        self.access_mode = access_mode;
        self
    }

    pub fn with_verify_header(mut self, verify_header: bool) -> Self {
        self.verify_header = verify_header;
        self
    }
}
