//! Terminal access for visual mode.
//!
//! The run loop only talks to the [`Terminal`] trait. [`CrosstermTerminal`]
//! is the real implementation; crossterm covers the platform differences.
//!
//! Raw mode is held by a [`TerminalSession`] for the lifetime of a visual
//! run. Releasing it is guarded by a process-wide flag so that whichever
//! path gets there first (session drop, panic hook, or the ctrl+c handler
//! via [`restore_terminal`]) is the only one that touches the terminal.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};

use crate::render::Frame;
use crate::theme::Palette;

/// A key press, reduced to what the run loop cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A key producing a single byte. Enter is `b'\n'`.
    Char(u8),
    Escape,
    /// Ctrl+C. Raw mode swallows SIGINT, so it arrives as a key.
    Interrupt,
    /// Ctrl+D.
    EndOfInput,
    Other,
}

pub trait Terminal {
    fn enable_raw_mode(&mut self) -> io::Result<()>;
    fn disable_raw_mode(&mut self) -> io::Result<()>;
    /// `(columns, rows)`
    fn size(&self) -> io::Result<(u16, u16)>;
    /// Clear the screen and draw `frame` from the top-left corner.
    fn draw(&mut self, frame: &Frame) -> io::Result<()>;
    /// Block until the next key press.
    fn next_key(&mut self) -> io::Result<Key>;
    /// Program output produced by `.` while visualizing.
    fn write_output(&mut self, byte: u8) -> io::Result<()>;
}

static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Leave raw mode and show the cursor, if a visual run still holds the
/// terminal. Safe to call from signal handlers and more than once.
pub fn restore_terminal() {
    if !RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
        return;
    }
    let mut stdout = io::stdout();
    let _ = terminal::disable_raw_mode();
    let _ = execute!(stdout, Show, Print("\r\n"));
    let _ = stdout.flush();
    tracing::debug!("raw mode disabled");
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
    });
}

/// The process terminal, drawn through crossterm.
pub struct CrosstermTerminal {
    stdout: io::Stdout,
    palette: Palette,
}

impl CrosstermTerminal {
    pub fn new(palette: Palette) -> Self {
        Self {
            stdout: io::stdout(),
            palette,
        }
    }
}

impl Terminal for CrosstermTerminal {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        install_panic_hook();
        terminal::enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);
        tracing::debug!("raw mode enabled");
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if !RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(self.stdout, Show, Print("\r\n"))?;
        tracing::debug!("raw mode disabled");
        Ok(())
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        queue!(self.stdout, Hide, Clear(ClearType::All), MoveTo(0, 0))?;
        for (row, line) in frame.lines.iter().enumerate() {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(self.stdout, MoveTo(0, row), Print(line.paint(&self.palette)))?;
        }
        self.stdout.flush()
    }

    fn next_key(&mut self) -> io::Result<Key> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(map_key(key));
                }
            }
        }
    }

    fn write_output(&mut self, byte: u8) -> io::Result<()> {
        self.stdout.write_all(&[byte])?;
        self.stdout.flush()
    }
}

fn map_key(key: KeyEvent) -> Key {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Key::Interrupt,
        KeyCode::Char('d') if ctrl => Key::EndOfInput,
        KeyCode::Char(c) if c.is_ascii() => Key::Char(c as u8),
        KeyCode::Enter => Key::Char(b'\n'),
        KeyCode::Tab => Key::Char(b'\t'),
        KeyCode::Backspace => Key::Char(0x08),
        KeyCode::Esc => Key::Escape,
        _ => Key::Other,
    }
}

/// Raw mode for as long as the session lives.
pub struct TerminalSession<'a, T: Terminal> {
    terminal: &'a mut T,
    active: bool,
}

impl<'a, T: Terminal> TerminalSession<'a, T> {
    pub fn enter(terminal: &'a mut T) -> io::Result<Self> {
        terminal.enable_raw_mode()?;
        Ok(Self {
            terminal,
            active: true,
        })
    }

    pub fn terminal(&mut self) -> &mut T {
        &mut *self.terminal
    }

    /// Release raw mode now, reporting any failure.
    pub fn finish(mut self) -> io::Result<()> {
        self.active = false;
        self.terminal.disable_raw_mode()
    }
}

impl<T: Terminal> Drop for TerminalSession<'_, T> {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            let _ = self.terminal.disable_raw_mode();
        }
    }
}
