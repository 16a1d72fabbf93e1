//! The step-wise Brainfuck execution engine.
//!
//! The interpreter operates on a memory tape (30,000 cells by default) with
//! a single data pointer, one instruction per [`Interpreter::step`] call.
//!
//! Behaviors:
//! - Memory tape initialized to 0; cells wrap modulo 256.
//! - Moving left from cell 0 is a no-op; moving right past the last cell is
//!   a [`InterpreterError::PointerOutOfBounds`] error.
//! - Input `,` reads a single byte; on EOF the current cell is set to 0.
//! - Output `.` emits the byte at the current cell.
//! - Loops are resolved lazily by scanning for the matching bracket every
//!   time a jump is taken. An unmatched bracket is only reported when it is
//!   executed and its jump is taken.
//! - Any byte outside `><+-.,[]` is ignored.
//!
//! Quick start:
//!
//! ```
//! use rust_bfi::{BufferIo, Interpreter, Program};
//!
//! let mut bf = Interpreter::new(Program::from("++++++++[>++++++++<-]>+."));
//! let mut io = BufferIo::default();
//! bf.run(&mut io).expect("program should run");
//! assert_eq!(io.output(), b"A");
//! ```

use std::fmt;

use crate::io::ProgramIo;
use crate::output_log::OutputLog;
use crate::program::Program;
use crate::tape::Tape;

/// Errors that can occur while interpreting a program.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    /// A taken jump found no matching bracket.
    #[error("Unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBracket { ip: usize, kind: UnmatchedBracketKind },

    /// `>` on the last cell of the tape.
    #[error("Pointer out of bounds at instruction {ip} (ptr={ptr})")]
    PointerOutOfBounds { ip: usize, ptr: usize },

    /// The output sink or input source failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: u64 },
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

/// Outcome of a successful [`Interpreter::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One instruction was executed.
    Continue,
    /// `ip` was already past the last instruction; nothing happened.
    EndOfProgram,
}

/// Execution context: program, tape, instruction pointer and, in visual
/// mode, the log of everything printed so far.
#[derive(Debug, Clone)]
pub struct Interpreter {
    program: Program,
    tape: Tape,
    ip: usize,
    steps: u64,
    output_log: Option<OutputLog>,
}

impl Interpreter {
    /// Create an interpreter with a zeroed 30,000-cell tape.
    pub fn new(program: Program) -> Self {
        Self::with_tape(program, Tape::new())
    }

    /// Create an interpreter over a caller-provided tape.
    pub fn with_tape(program: Program, tape: Tape) -> Self {
        Self {
            program,
            tape,
            ip: 0,
            steps: 0,
            output_log: None,
        }
    }

    /// Record every emitted byte into `log` as well as sending it to the
    /// I/O sink.
    pub fn with_output_log(mut self, log: OutputLog) -> Self {
        self.output_log = Some(log);
        self
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn dp(&self) -> usize {
        self.tape.pointer()
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn output_log(&self) -> Option<&OutputLog> {
        self.output_log.as_ref()
    }

    /// The instruction `step` would execute next, if any.
    pub fn current_instruction(&self) -> Option<u8> {
        self.program.get(self.ip)
    }

    pub fn is_finished(&self) -> bool {
        self.ip >= self.program.len()
    }

    /// Execute exactly one instruction.
    pub fn step(&mut self, io: &mut dyn ProgramIo) -> Result<Step, InterpreterError> {
        let Some(instr) = self.program.get(self.ip) else {
            return Ok(Step::EndOfProgram);
        };
        tracing::trace!(ip = self.ip, dp = self.tape.pointer(), instr = %(instr as char), "step");

        match instr {
            b'>' => {
                if !self.tape.move_right() {
                    return Err(InterpreterError::PointerOutOfBounds {
                        ip: self.ip,
                        ptr: self.tape.pointer(),
                    });
                }
            }
            b'<' => self.tape.move_left(),
            b'+' => self.tape.increment(),
            b'-' => self.tape.decrement(),
            b'.' => {
                let byte = self.tape.current();
                io.write_byte(byte)
                    .map_err(|source| InterpreterError::Io { ip: self.ip, source })?;
                if let Some(log) = self.output_log.as_mut() {
                    log.push(byte);
                }
            }
            b',' => {
                let byte = io
                    .read_byte()
                    .map_err(|source| InterpreterError::Io { ip: self.ip, source })?;
                // EOF stores 0
                self.tape.set_current(byte.unwrap_or(0));
            }
            b'[' => {
                if self.tape.current() == 0 {
                    let target = matching_close(self.program.as_bytes(), self.ip).ok_or(
                        InterpreterError::UnmatchedBracket {
                            ip: self.ip,
                            kind: UnmatchedBracketKind::Open,
                        },
                    )?;
                    tracing::trace!(from = self.ip, to = target, "jump forward");
                    self.ip = target;
                }
            }
            b']' => {
                if self.tape.current() != 0 {
                    let target = matching_open(self.program.as_bytes(), self.ip).ok_or(
                        InterpreterError::UnmatchedBracket {
                            ip: self.ip,
                            kind: UnmatchedBracketKind::Close,
                        },
                    )?;
                    tracing::trace!(from = self.ip, to = target, "jump back");
                    self.ip = target;
                }
            }
            _ => {}
        }

        // Resume just past the current (or jumped-to) bracket
        self.ip += 1;
        self.steps += 1;
        Ok(Step::Continue)
    }

    /// Execute the program until completion.
    pub fn run(&mut self, io: &mut dyn ProgramIo) -> Result<(), InterpreterError> {
        self.run_with_limit(io, None)
    }

    /// Execute until completion, aborting once `max_steps` instructions have
    /// run without the program finishing.
    pub fn run_with_limit(
        &mut self,
        io: &mut dyn ProgramIo,
        max_steps: Option<u64>,
    ) -> Result<(), InterpreterError> {
        let result = self.drive(io, max_steps);
        let flushed = io
            .flush()
            .map_err(|source| InterpreterError::Io { ip: self.ip, source });
        result.and(flushed)
    }

    fn drive(&mut self, io: &mut dyn ProgramIo, max_steps: Option<u64>) -> Result<(), InterpreterError> {
        while !self.is_finished() {
            if let Some(limit) = max_steps {
                if self.steps >= limit {
                    return Err(InterpreterError::StepLimitExceeded { limit });
                }
            }
            self.step(io)?;
        }
        Ok(())
    }
}

/// Index of the `]` closing the `[` at `open`.
fn matching_close(code: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in code.iter().enumerate().skip(open + 1) {
        match b {
            b'[' => depth += 1,
            b']' if depth == 0 => return Some(i),
            b']' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Index of the `[` opening the `]` at `close`. Index 0 is included in the scan.
fn matching_open(code: &[u8], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in code[..close].iter().enumerate().rev() {
        match b {
            b']' => depth += 1,
            b'[' if depth == 0 => return Some(i),
            b'[' => depth -= 1,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::BufferIo;

    fn run_program(code: &str) -> (Interpreter, Result<(), InterpreterError>) {
        let mut bf = Interpreter::with_tape(Program::from(code), Tape::with_capacity(10));
        let result = bf.run(&mut BufferIo::default());
        (bf, result)
    }

    #[test]
    fn well_bracketed_program_finishes_at_end() {
        let (bf, result) = run_program("++[>+[>+<-]<-]>>.");
        assert!(result.is_ok());
        assert_eq!(bf.ip(), bf.program().len());
    }

    #[test]
    fn empty_loop_on_zero_cell_is_a_single_step() {
        let mut bf = Interpreter::new(Program::from("[]"));
        let mut io = BufferIo::default();
        assert_eq!(bf.step(&mut io).unwrap(), Step::Continue);
        assert_eq!(bf.ip(), 2);
        assert_eq!(bf.steps(), 1);
        assert!(bf.tape().cells().iter().all(|&c| c == 0));
        assert_eq!(bf.step(&mut io).unwrap(), Step::EndOfProgram);
    }

    #[test]
    fn loop_body_runs_once_per_unit() {
        // 3 '+', then per iteration '-' and ']' (2 steps), plus the first '['
        let (bf, result) = run_program("+++[-]");
        assert!(result.is_ok());
        assert_eq!(bf.tape().cells()[0], 0);
        assert_eq!(bf.steps(), 3 + 1 + 3 * 2);
    }

    #[test]
    fn pointer_never_goes_negative() {
        let (bf, result) = run_program("<<<");
        assert!(result.is_ok());
        assert_eq!(bf.dp(), 0);
    }

    #[test]
    fn wrapping_subtraction() {
        let (bf, result) = run_program("-");
        assert!(result.is_ok());
        assert_eq!(bf.tape().cells()[0], 255);
    }

    #[test]
    fn wrapping_addition() {
        let (bf, result) = run_program(&"+".repeat(256));
        assert!(result.is_ok());
        assert_eq!(bf.tape().cells()[0], 0);

        let (bf, _) = run_program("-+");
        assert_eq!(bf.tape().cells()[0], 0);
    }

    #[test]
    fn increments_up_to_255_without_wrapping() {
        let (bf, result) = run_program(&"+".repeat(255));
        assert!(result.is_ok());
        assert_eq!(bf.tape().cells()[0], 255);
    }

    #[test]
    fn unmatched_open_bracket_returns_error() {
        // The starting cell is zero, so the '[' jump is taken and finds no ']'.
        let (bf, result) = run_program("[+");
        assert!(matches!(
            result,
            Err(InterpreterError::UnmatchedBracket { kind: UnmatchedBracketKind::Open, ip: 0 })
        ));
        assert_eq!(bf.ip(), 0);
    }

    #[test]
    fn unmatched_open_bracket_is_not_reported_when_loop_is_entered() {
        let (bf, result) = run_program("+[");
        assert!(result.is_ok());
        assert_eq!(bf.ip(), 2);
    }

    #[test]
    fn unmatched_close_bracket_returns_error() {
        let (_, result) = run_program("+]");
        assert!(matches!(
            result,
            Err(InterpreterError::UnmatchedBracket { kind: UnmatchedBracketKind::Close, ip: 1 })
        ));
    }

    #[test]
    fn stray_close_bracket_on_zero_cell_is_ignored() {
        let (_, result) = run_program("[]]");
        assert!(result.is_ok());
    }

    #[test]
    fn backward_scan_matches_bracket_at_index_zero() {
        assert_eq!(matching_open(b"[-]", 2), Some(0));
        assert_eq!(matching_open(b"-]", 1), None);
    }

    #[test]
    fn nested_brackets_skip_inner_pairs() {
        assert_eq!(matching_close(b"[[][]]x", 0), Some(5));
        assert_eq!(matching_open(b"[[][]]x", 5), Some(0));
        assert_eq!(matching_close(b"[[]", 0), None);
        assert_eq!(matching_open(b"[]]", 2), None);
    }

    #[test]
    fn jump_targets_are_symmetric() {
        let code = b"+[>[-]<[>+<-]]";
        for (i, &b) in code.iter().enumerate() {
            if b == b'[' {
                let close = matching_close(code, i).unwrap();
                assert_eq!(matching_open(code, close), Some(i));
            }
        }
    }

    #[test]
    fn right_pointer_out_of_bounds_errors() {
        let mut bf = Interpreter::with_tape(Program::from(">>>"), Tape::with_capacity(3));
        let result = bf.run(&mut BufferIo::default());
        assert!(matches!(result, Err(InterpreterError::PointerOutOfBounds { ip: 2, ptr: 2 })));
    }

    #[test]
    fn output_reaches_sink_and_halts_at_end() {
        let mut bf = Interpreter::new(Program::from("++."));
        let mut io = BufferIo::default();
        bf.run(&mut io).unwrap();
        assert_eq!(io.output(), &[2]);
        assert_eq!(bf.ip(), 3);
    }

    #[test]
    fn input_is_echoed() {
        let mut bf = Interpreter::new(Program::from(",."));
        let mut io = BufferIo::new(*b"A");
        bf.run(&mut io).unwrap();
        assert_eq!(io.output(), &[65]);
    }

    #[test]
    fn eof_stores_zero() {
        let mut bf = Interpreter::new(Program::from("+,"));
        bf.run(&mut BufferIo::default()).unwrap();
        assert_eq!(bf.tape().cells()[0], 0);
    }

    #[test]
    fn comments_are_no_ops() {
        let mut bf = Interpreter::new(Program::from("a+b\n+ c."));
        let mut io = BufferIo::default();
        bf.run(&mut io).unwrap();
        assert_eq!(io.output(), &[2]);
    }

    #[test]
    fn output_log_records_emitted_bytes() {
        let mut bf = Interpreter::new(Program::from("+.+.")).with_output_log(OutputLog::unbounded());
        bf.run(&mut BufferIo::default()).unwrap();
        let logged: Vec<u8> = bf.output_log().unwrap().iter().collect();
        assert_eq!(logged, vec![1, 2]);
    }

    #[test]
    fn step_limit_aborts_infinite_loop() {
        let mut bf = Interpreter::new(Program::from("+[]"));
        let result = bf.run_with_limit(&mut BufferIo::default(), Some(50));
        assert!(matches!(result, Err(InterpreterError::StepLimitExceeded { limit: 50 })));
        assert_eq!(bf.steps(), 50);
    }

    #[test]
    fn step_limit_is_not_hit_by_finishing_program() {
        let mut bf = Interpreter::new(Program::from("+++"));
        assert!(bf.run_with_limit(&mut BufferIo::default(), Some(3)).is_ok());
    }
}
