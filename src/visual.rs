//! Key-driven stepping with a live frame redraw before every step.

use std::io;

use crate::interpreter::{Interpreter, InterpreterError};
use crate::io::ProgramIo;
use crate::render::{TerminalTooSmall, render};
use crate::terminal::{Key, Terminal, TerminalSession};

/// How a visual run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The program ran off its end.
    Finished,
    /// The user pressed `q`, Esc or Ctrl+C.
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum VisualError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
    #[error(transparent)]
    TooSmall(#[from] TerminalTooSmall),
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
}

/// Step `state` one instruction per key press, drawing a frame before each
/// step and a final frame once the program finishes.
///
/// Raw mode is held for the whole run and released on every return path.
pub fn run<T: Terminal>(terminal: &mut T, state: &mut Interpreter) -> Result<Outcome, VisualError> {
    tracing::debug!(len = state.program().len(), "entering visual mode");
    let mut session = TerminalSession::enter(terminal)?;
    let result = drive(session.terminal(), state);
    session.finish()?;
    tracing::debug!(steps = state.steps(), "leaving visual mode");
    result
}

fn drive<T: Terminal>(terminal: &mut T, state: &mut Interpreter) -> Result<Outcome, VisualError> {
    while !state.is_finished() {
        draw(terminal, state)?;
        match read_key(terminal)? {
            None | Some(Key::Char(b'q') | Key::Escape | Key::Interrupt) => return Ok(Outcome::Quit),
            Some(_) => {}
        }

        let mut io = TerminalIo { terminal: &mut *terminal };
        match state.step(&mut io) {
            Ok(_) => {}
            Err(InterpreterError::Io { source, .. }) if source.kind() == io::ErrorKind::Interrupted => {
                return Ok(Outcome::Quit);
            }
            Err(e) => return Err(e.into()),
        }
    }

    // Leave the last state on screen until a key is pressed
    draw(terminal, state)?;
    read_key(terminal)?;
    Ok(Outcome::Finished)
}

fn draw<T: Terminal>(terminal: &mut T, state: &Interpreter) -> Result<(), VisualError> {
    let (columns, rows) = terminal.size()?;
    let frame = render(state, columns, rows, &status_line(state))?;
    terminal.draw(&frame)?;
    Ok(())
}

/// `None` when the read was interrupted.
fn read_key<T: Terminal>(terminal: &mut T) -> io::Result<Option<Key>> {
    match terminal.next_key() {
        Ok(key) => Ok(Some(key)),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e),
    }
}

fn status_line(state: &Interpreter) -> String {
    let position = format!("step {}  ip {}  dp {}", state.steps(), state.ip(), state.dp());
    match state.current_instruction() {
        None => format!("{position}  finished  [any key] exit"),
        Some(b',') => format!("{position}  next ','  [any key] step, then a key for input  [ctrl+d] EOF  [q] quit"),
        Some(b) if b.is_ascii_graphic() => format!("{position}  next '{}'  [any key] step  [q] quit", b as char),
        Some(b) => format!("{position}  next 0x{b:02x}  [any key] step  [q] quit"),
    }
}

/// Routes `.` to the terminal and takes `,` from the next key press.
struct TerminalIo<'a, T: Terminal> {
    terminal: &'a mut T,
}

impl<T: Terminal> ProgramIo for TerminalIo<'_, T> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.terminal.write_output(byte)
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.terminal.next_key()? {
                Key::Char(b) => return Ok(Some(b)),
                Key::Escape => return Ok(Some(0x1b)),
                Key::EndOfInput => return Ok(None),
                Key::Interrupt => return Err(io::ErrorKind::Interrupted.into()),
                Key::Other => continue,
            }
        }
    }
}
