use std::collections::VecDeque;

/// History of every byte emitted by `.`, redrawn by the visualizer each frame.
///
/// Unbounded by default. With a limit it behaves as a ring buffer that
/// evicts the oldest bytes first.
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    bytes: VecDeque<u8>,
    limit: Option<usize>,
}

impl OutputLog {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A zero limit is treated as one byte.
    pub fn bounded(limit: usize) -> Self {
        Self {
            bytes: VecDeque::new(),
            limit: Some(limit.max(1)),
        }
    }

    pub fn from_limit(limit: Option<usize>) -> Self {
        match limit {
            Some(limit) => Self::bounded(limit),
            None => Self::unbounded(),
        }
    }

    pub fn push(&mut self, byte: u8) {
        if let Some(limit) = self.limit {
            while self.bytes.len() >= limit {
                self.bytes.pop_front();
            }
        }
        self.bytes.push_back(byte);
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.bytes.iter().copied()
    }
}
