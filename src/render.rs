//! Frame rendering for visual mode.
//!
//! A frame has three regions stacked vertically:
//!
//! ```text
//!                +12 ++++[>++++<-]>.>,[.,]++++++++ +40
//!                          ^
//!
//!                 0     1     2     3     4
//!                [004] [000] [000] [000] [000]
//!                  .     .     .     .     .
//!
//!                ┌─────────────────────────────┐
//!                │ hello                       │
//!                └─────────────────────────────┘
//!                step 17  ip 22  dp 0 ...
//! ```
//!
//! The program viewport is centered on `ip` and clamped to the program; the
//! tape viewport is centered on `dp`; the output box shows the most recent
//! wrapped lines of everything printed so far. Frames are plain data
//! ([`Frame`]) and only become ANSI text in [`Line::paint`].

use std::ops::Range;

use crate::interpreter::Interpreter;
use crate::program::is_instruction;
use crate::theme::Palette;

/// Smallest terminal the layout fits in.
pub const MIN_COLUMNS: u16 = 48;
pub const MIN_ROWS: u16 = 12;

/// Width of one tape cell: `[xxx] `.
pub const CELL_WIDTH: usize = 6;

/// Preferred blank margin on each side of the frame.
pub const SIDE_PADDING: usize = 16;

// program, caret, blank, tape index/value/char, blank, box top, box bottom, status
const FIXED_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Terminal too small, must be at least: {min_columns}:{min_rows} (current size {columns}:{rows})")]
pub struct TerminalTooSmall {
    pub columns: u16,
    pub rows: u16,
    pub min_columns: u16,
    pub min_rows: u16,
}

/// Geometry of a frame for one terminal size and program length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Terminal width; no frame line is wider.
    pub columns: usize,
    /// Blank columns left of every region.
    pub gutter: usize,
    /// Program viewport width; also the outer width of the output box.
    pub program_width: usize,
    pub tape_cells: usize,
    /// Text columns inside the output box.
    pub output_columns: usize,
    /// Maximum text rows inside the output box.
    pub output_rows: usize,
}

impl Layout {
    pub fn compute(columns: u16, rows: u16, program_len: usize) -> Result<Self, TerminalTooSmall> {
        if columns < MIN_COLUMNS || rows < MIN_ROWS {
            return Err(TerminalTooSmall {
                columns,
                rows,
                min_columns: MIN_COLUMNS,
                min_rows: MIN_ROWS,
            });
        }

        let columns = usize::from(columns);
        let min_width = usize::from(MIN_COLUMNS);
        let gutter = SIDE_PADDING.min((columns - min_width) / 2);
        let avail = (columns - 2 * gutter).min(program_len).max(min_width);

        let tape_cells = avail / CELL_WIDTH;
        // the last cell's trailing space is not part of the viewport
        let program_width = tape_cells * CELL_WIDTH - 1;

        Ok(Self {
            columns,
            gutter,
            program_width,
            tape_cells,
            output_columns: program_width - 3,
            output_rows: usize::from(rows) - FIXED_ROWS,
        })
    }
}

/// Window of at most `width` program bytes around `ip`, kept inside `0..len`.
pub fn program_window(len: usize, ip: usize, width: usize) -> Range<usize> {
    let width = width.min(len);
    let half = width / 2;
    let start = if ip < half {
        0
    } else if ip + half >= len {
        len - width
    } else {
        ip - half
    };
    start..start + width
}

/// Window of `cells` tape cells around `dp`, kept inside `0..capacity`.
pub fn tape_window(dp: usize, cells: usize, capacity: usize) -> Range<usize> {
    let cells = cells.min(capacity);
    let start = dp.saturating_sub(cells / 2).min(capacity - cells);
    start..start + cells
}

/// Character-wrap output bytes at `columns`.
///
/// `\n` starts a new line without using a column; other non-printable bytes
/// show as `.`. Always returns at least one (possibly empty) line.
pub fn wrap_output(bytes: impl IntoIterator<Item = u8>, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut col = 0;

    for b in bytes {
        if b == b'\n' {
            lines.push(std::mem::take(&mut current));
            col = 0;
            continue;
        }
        if col >= columns {
            lines.push(std::mem::take(&mut current));
            col = 0;
        }
        current.push(printable_or(b, '.'));
        col += 1;
    }
    lines.push(current);
    lines
}

fn is_printable(byte: u8) -> bool {
    (32..=126).contains(&byte)
}

fn printable_or(byte: u8, placeholder: char) -> char {
    if is_printable(byte) { byte as char } else { placeholder }
}

/// What a piece of text means; mapped to a terminal style by a [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Plain,
    /// Truncation counts, comments, placeholders.
    Muted,
    /// The instruction at `ip` and the cell at `dp`.
    Cursor,
    /// Printable character under a tape cell.
    Printable,
    Border,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    fn gutter(width: usize) -> Self {
        let mut line = Self::default();
        line.push(" ".repeat(width), Role::Plain);
        line
    }

    fn push(&mut self, text: impl Into<String>, role: Role) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.role == role => last.text.push_str(&text),
            _ => self.spans.push(Span { text, role }),
        }
    }

    /// The line without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// The line as ANSI-styled text.
    pub fn paint(&self, palette: &Palette) -> String {
        self.spans
            .iter()
            .map(|s| palette.style(s.role).paint(s.text.as_str()).to_string())
            .collect()
    }
}

/// One full screen of visual mode output, top row first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<Line>,
}

impl Frame {
    pub fn text(&self) -> Vec<String> {
        self.lines.iter().map(Line::text).collect()
    }
}

/// Build the frame for the interpreter's current state.
pub fn render(
    state: &Interpreter,
    columns: u16,
    rows: u16,
    status: &str,
) -> Result<Frame, TerminalTooSmall> {
    let layout = Layout::compute(columns, rows, state.program().len())?;
    let mut lines = Vec::with_capacity(usize::from(rows));

    let (program_line, caret_line) = program_lines(state, &layout);
    lines.push(program_line);
    lines.push(caret_line);
    lines.push(Line::default());

    lines.extend(tape_lines(state, &layout));
    lines.push(Line::default());

    lines.extend(output_box(state, &layout));

    let mut status_line = Line::gutter(layout.gutter);
    let room = usize::from(columns) - layout.gutter;
    status_line.push(status.chars().take(room).collect::<String>(), Role::Status);
    lines.push(status_line);

    Ok(Frame { lines })
}

fn program_lines(state: &Interpreter, layout: &Layout) -> (Line, Line) {
    let code = state.program().as_bytes();
    let ip = state.ip();
    // a long program may be cut on both sides; keep room for "+N " and " +N"
    let (lead, width) = if code.len() > layout.program_width {
        let label_width = code.len().to_string().len() + 2;
        let lead = layout.gutter.max(label_width);
        let room = layout.columns.saturating_sub(lead + label_width);
        (lead, layout.program_width.min(room).max(1))
    } else {
        (layout.gutter, layout.program_width)
    };
    let window = program_window(code.len(), ip, width);

    let mut line = Line::default();
    let left_cut = window.start;
    if left_cut > 0 {
        let label = format!("+{left_cut} ");
        line.push(" ".repeat(lead - label.len()), Role::Plain);
        line.push(label, Role::Muted);
    } else {
        line.push(" ".repeat(lead), Role::Plain);
    }

    for (i, &b) in code[window.clone()].iter().enumerate() {
        let index = window.start + i;
        let ch = printable_or(b, '·');
        let role = if index == ip {
            Role::Cursor
        } else if is_instruction(b) {
            Role::Plain
        } else {
            Role::Muted
        };
        line.push(ch.to_string(), role);
    }

    let right_cut = code.len() - window.end;
    if right_cut > 0 {
        line.push(format!(" +{right_cut}"), Role::Muted);
    }

    let mut caret = Line::gutter(lead);
    if window.contains(&ip) {
        caret.push(" ".repeat(ip - window.start), Role::Plain);
        caret.push("^", Role::Plain);
    }

    (line, caret)
}

fn tape_lines(state: &Interpreter, layout: &Layout) -> [Line; 3] {
    let tape = state.tape();
    let dp = tape.pointer();
    let window = tape_window(dp, layout.tape_cells, tape.capacity());

    let mut indices = Line::gutter(layout.gutter);
    let mut values = Line::gutter(layout.gutter);
    let mut chars = Line::gutter(layout.gutter);

    for index in window {
        let value = tape.cells()[index];
        indices.push(format!(" {index:<5}"), Role::Plain);

        let role = if index == dp { Role::Cursor } else { Role::Plain };
        values.push(format!("[{value:03}]"), role);
        values.push(" ", Role::Plain);

        chars.push("  ", Role::Plain);
        if is_printable(value) {
            chars.push((value as char).to_string(), Role::Printable);
        } else {
            chars.push(".", Role::Muted);
        }
        chars.push("   ", Role::Plain);
    }

    [indices, values, chars]
}

fn output_box(state: &Interpreter, layout: &Layout) -> Vec<Line> {
    let inner = layout.program_width - 2;
    let wrapped = match state.output_log() {
        Some(log) => wrap_output(log.iter(), layout.output_columns),
        None => vec![String::new()],
    };
    let shown = wrapped.len().min(layout.output_rows);

    let mut lines = Vec::with_capacity(shown + 2);

    let mut top = Line::gutter(layout.gutter);
    top.push(format!("┌{}┐", "─".repeat(inner)), Role::Border);
    lines.push(top);

    for text in &wrapped[wrapped.len() - shown..] {
        let mut row = Line::gutter(layout.gutter);
        row.push("│", Role::Border);
        row.push(format!(" {text:<width$}", width = layout.output_columns), Role::Plain);
        row.push("│", Role::Border);
        lines.push(row);
    }

    let mut bottom = Line::gutter(layout.gutter);
    bottom.push(format!("└{}┘", "─".repeat(inner)), Role::Border);
    lines.push(bottom);

    lines
}
