use std::fs;
use std::io;
use std::path::Path;

/// The instruction stream: raw bytes, loaded once and never modified.
///
/// Every byte is one symbol. Bytes outside `><+-.,[]` are comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    code: Vec<u8>,
}

impl Program {
    pub fn new(code: impl Into<Vec<u8>>) -> Self {
        Self { code: code.into() }
    }

    /// Load a program file verbatim.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let code = fs::read(path)?;
        tracing::debug!(path = %path.display(), len = code.len(), "program loaded");
        Ok(Self { code })
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.code.get(index).copied()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }
}

impl From<&str> for Program {
    fn from(code: &str) -> Self {
        Self::new(code.as_bytes())
    }
}

/// True for the eight instruction symbols.
pub fn is_instruction(byte: u8) -> bool {
    matches!(byte, b'>' | b'<' | b'+' | b'-' | b'.' | b',' | b'[' | b']')
}
