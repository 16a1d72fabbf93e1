/// Number of cells on a freshly created tape.
pub const TAPE_CAPACITY: usize = 30_000;

/// Fixed-capacity byte memory with a single data pointer.
///
/// The pointer never leaves `0..capacity`: moving left from cell 0 is a
/// no-op, and moving right from the last cell is refused so the caller can
/// report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// A zeroed tape of [`TAPE_CAPACITY`] cells.
    pub fn new() -> Self {
        Self::with_capacity(TAPE_CAPACITY)
    }

    /// A zeroed tape with a custom number of cells (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: vec![0; capacity.max(1)],
            pointer: 0,
        }
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn current(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn set_current(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    pub fn increment(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_sub(1);
    }

    /// Clamped at cell 0.
    pub fn move_left(&mut self) {
        self.pointer = self.pointer.saturating_sub(1);
    }

    /// Returns `false` without moving when already on the last cell.
    pub fn move_right(&mut self) -> bool {
        if self.pointer + 1 >= self.cells.len() {
            return false;
        }
        self.pointer += 1;
        true
    }
}
