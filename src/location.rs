/// Access to the URL fragment of the current page.
pub trait Location {
    /// Current fragment, as `location.hash` reports it (may start with `#`, may be empty).
    fn hash(&self) -> String;

    /// Whether the current history entry's URL can be replaced in place.
    fn supports_replace(&self) -> bool;

    /// Replace the URL of the current history entry. Only called when `supports_replace` holds.
    fn replace_hash(&mut self, hash: &str);

    /// Assign the fragment directly; hosts may record a new history entry.
    fn assign_hash(&mut self, hash: &str);
}

/// How a fragment write reached the URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    Replace,
    Assign,
}

/// Store an encoded grid in the URL, preferring to replace the current
/// history entry so edits do not flood back/forward navigation.
pub fn write_hash<L: Location + ?Sized>(location: &mut L, encoded: &str) -> WriteMode {
    let hash = format!("#{}", encoded);
    if location.supports_replace() {
        location.replace_hash(&hash);
        WriteMode::Replace
    } else {
        location.assign_hash(&hash);
        WriteMode::Assign
    }
}

/// A single recorded fragment write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashWrite {
    pub mode: WriteMode,
    pub hash: String,
}

/// In-memory location that records every write.
#[derive(Debug)]
pub struct MemoryLocation {
    hash: String,
    replace_supported: bool,
    writes: Vec<HashWrite>,
    history_len: usize,
}

impl MemoryLocation {
    pub fn new(hash: &str) -> Self {
        MemoryLocation {
            hash: hash.to_string(),
            replace_supported: true,
            writes: Vec::new(),
            history_len: 1,
        }
    }

    /// A host without `history.replaceState`.
    pub fn without_replace(hash: &str) -> Self {
        MemoryLocation {
            replace_supported: false,
            ..MemoryLocation::new(hash)
        }
    }

    /// Simulate the user editing the address bar or navigating. Not recorded as a write.
    pub fn navigate(&mut self, hash: &str) {
        self.hash = hash.to_string();
        self.history_len += 1;
    }

    pub fn writes(&self) -> &[HashWrite] {
        &self.writes
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }
}

impl Location for MemoryLocation {
    fn hash(&self) -> String {
        self.hash.clone()
    }

    fn supports_replace(&self) -> bool {
        self.replace_supported
    }

    fn replace_hash(&mut self, hash: &str) {
        self.hash = hash.to_string();
        self.writes.push(HashWrite {
            mode: WriteMode::Replace,
            hash: hash.to_string(),
        });
    }

    fn assign_hash(&mut self, hash: &str) {
        self.hash = hash.to_string();
        self.history_len += 1;
        self.writes.push(HashWrite {
            mode: WriteMode::Assign,
            hash: hash.to_string(),
        });
    }
}
