use rust_bfi::render::{MIN_COLUMNS, MIN_ROWS, program_window};
use rust_bfi::{BufferIo, Interpreter, OutputLog, Program, TerminalTooSmall, render};

fn run_steps(bf: &mut Interpreter, n: usize) {
    let mut io = BufferIo::default();
    for _ in 0..n {
        bf.step(&mut io).unwrap();
    }
}

#[test]
fn program_viewport_examples() {
    assert_eq!(program_window(100, 50, 20), 40..60);
    assert_eq!(program_window(100, 5, 20), 0..20);
    assert_eq!(program_window(100, 95, 20), 80..100);
}

#[test]
fn frame_tracks_execution() {
    let mut bf = Interpreter::new(Program::from("++>+++<.")).with_output_log(OutputLog::unbounded());
    run_steps(&mut bf, 3);

    let frame = render(&bf, 80, 24, "status").unwrap();
    let text = frame.text();

    // program line, caret under ip 3
    assert_eq!(text[0].trim_end(), format!("{}++>+++<.", " ".repeat(16)));
    assert_eq!(text[1], format!("{}   ^", " ".repeat(16)));
    // data pointer on cell 1, cell 0 holds 2
    assert!(text[4].contains("[002] [000]"));
    assert_eq!(text.last().unwrap().trim(), "status");
}

#[test]
fn output_box_shows_printed_bytes() {
    let mut bf = Interpreter::new(Program::from("++++++++[>++++++++<-]>+.+."))
        .with_output_log(OutputLog::unbounded());
    let mut io = BufferIo::default();
    bf.run(&mut io).unwrap();
    assert_eq!(io.output(), b"AB");

    let frame = render(&bf, 80, 24, "").unwrap();
    assert!(frame.text().iter().any(|line| line.contains("│ AB ")));
}

#[test]
fn too_small_terminal_is_reported() {
    let bf = Interpreter::new(Program::from("+"));
    let err = render(&bf, MIN_COLUMNS - 1, MIN_ROWS, "").unwrap_err();
    assert_eq!(
        err,
        TerminalTooSmall {
            columns: MIN_COLUMNS - 1,
            rows: MIN_ROWS,
            min_columns: MIN_COLUMNS,
            min_rows: MIN_ROWS,
        }
    );
    assert!(err.to_string().starts_with("Terminal too small, must be at least: 48:12"));
}
