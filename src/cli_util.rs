use std::io::{self, Write};

use crate::interpreter::InterpreterError;

/// Pretty-print an [`InterpreterError`] with caret positioning.
/// If `program` is `Some("bfi")`, messages are prefixed with "bfi: ...".
pub fn print_interpreter_error(program: Option<&str>, code: &[u8], err: &InterpreterError) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    match err {
        InterpreterError::UnmatchedBracket { ip, kind } => {
            let msg = prefix_program(&format!("Parse error: unmatched bracket {kind}"));
            print_error_with_context(&msg, code, *ip);
        }
        InterpreterError::PointerOutOfBounds { ip, ptr } => {
            let msg = prefix_program(&format!("Runtime error: pointer out of bounds (ptr={ptr})"));
            print_error_with_context(&msg, code, *ip);
        }
        InterpreterError::Io { ip, source } => {
            let msg = prefix_program(&format!("I/O error: {source}"));
            print_error_with_context(&msg, code, *ip);
        }
        InterpreterError::StepLimitExceeded { limit } => {
            eprintln!("{}", prefix_program(&format!("Execution aborted: step limit exceeded ({limit})")));
            let _ = io::stderr().flush();
        }
    }
}

/// Print a concise error with instruction index and a caret context window.
pub fn print_error_with_context(prefix: &str, code: &[u8], pos: usize) {
    eprintln!("{prefix} at instruction {pos}");
    let (window, caret) = context_window(code, pos);
    eprintln!("  {window}");
    eprintln!("  {caret}");
    let _ = io::stderr().flush();
}

/// A short excerpt around `pos`, one column per byte, and the caret line
/// pointing at it.
fn context_window(code: &[u8], pos: usize) -> (String, String) {
    // Show a short window around the position for context
    const WINDOW: usize = 32;

    let start = pos.saturating_sub(WINDOW);
    let end = (pos + WINDOW + 1).min(code.len());
    let excerpt = code
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .map(|&b| match b {
            b' '..=b'~' => b as char,
            _ => ' ',
        })
        .collect();

    let mut underline = " ".repeat(pos.saturating_sub(start));
    underline.push('^');
    (excerpt, underline)
}
