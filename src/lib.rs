//! A step-through Brainfuck interpreter with a live terminal visualizer.
//!
//! Programs run on a 30,000 cell byte tape, one instruction per
//! [`Interpreter::step`]. Loops are matched lazily as they execute, so a
//! malformed bracket that is never reached is never an error.
//!
//! Visual mode ([`visual::run`]) redraws a [`Frame`] of the program, the
//! tape and everything printed so far before every step, and waits for a
//! key press between steps.
//!
//! ```
//! use rust_bfi::{BufferIo, Interpreter, Program};
//!
//! let mut bf = Interpreter::new(Program::from(",[.,]"));
//! let mut io = BufferIo::new(*b"echo");
//! bf.run(&mut io).unwrap();
//! assert_eq!(io.output(), b"echo");
//! ```

pub mod cli_util;
pub mod config;
pub mod interpreter;
pub mod io;
pub mod logging;
pub mod output_log;
pub mod program;
pub mod render;
pub mod tape;
pub mod terminal;
pub mod theme;
pub mod visual;

pub use config::Config;
pub use interpreter::{Interpreter, InterpreterError, Step, UnmatchedBracketKind};
pub use io::{BufferIo, ProgramIo, StdIo};
pub use output_log::OutputLog;
pub use program::Program;
pub use render::{Frame, Layout, TerminalTooSmall, render};
pub use tape::{TAPE_CAPACITY, Tape};
pub use terminal::{CrosstermTerminal, Terminal};
pub use theme::Palette;
