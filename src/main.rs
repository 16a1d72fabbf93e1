use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use rust_bfi::cli_util::print_interpreter_error;
use rust_bfi::terminal::restore_terminal;
use rust_bfi::visual::{self, Outcome, VisualError};
use rust_bfi::{Config, CrosstermTerminal, Interpreter, OutputLog, Program, StdIo, logging};

/// Environment fallback for `--max-steps`.
const MAX_STEPS_ENV: &str = "BFI_MAX_STEPS";

const USAGE: &str = r#"Usage:
  {0} <PATH> [--visualize|-v] [--max-steps <N>]

Options:
  --visualize, -v      Step through the program one key press at a time
  --max-steps <N>      Abort after N instructions (env: BFI_MAX_STEPS)
  --help,      -h      Show this help

Visual mode keys:
  any key   execute the next instruction
  q, Esc    quit (ctrl+c also works)
  When the next instruction is `,`, the key after the step key is the input
  byte; ctrl+d stores 0 (end of input).

Notes:
- Input (`,`) reads a single byte from stdin; on EOF the current cell is set to 0.
- Characters outside of Brainfuck's ><+-.,[] are ignored.
- Colors and the visual output limit are read from bfi.toml in the config
  directory, or from the file named by BFI_CONFIG.
"#;

#[derive(Parser, Debug)]
#[command(name = "bfi", disable_help_flag = true)]
struct Cli {
    /// Brainfuck source file
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Render the program, tape and output between steps
    #[arg(short = 'v', long = "visualize")]
    visualize: bool,

    /// Abort once this many instructions have run
    #[arg(long = "max-steps", value_name = "N")]
    max_steps: Option<u64>,

    /// Show help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,
}

fn usage(program: &str) -> String {
    USAGE.replace("{0}", program)
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    if code == 0 {
        print!("{}", usage(program));
        let _ = io::stdout().flush();
    } else {
        eprint!("{}", usage(program));
        let _ = io::stderr().flush();
    }
    std::process::exit(code);
}

/// `--max-steps`, then `BFI_MAX_STEPS`, then unlimited.
fn resolve_max_steps(flag: Option<u64>, env_value: Option<String>) -> Option<u64> {
    flag.or_else(|| env_value.and_then(|v| v.trim().parse().ok()))
}

fn run_batch(program: &str, code: Program, max_steps: Option<u64>) -> i32 {
    let mut bf = Interpreter::new(code);
    let mut stdio = StdIo;
    match bf.run_with_limit(&mut stdio, max_steps) {
        Ok(()) => 0,
        Err(err) => {
            let _ = io::stdout().flush();
            print_interpreter_error(Some(program), bf.program().as_bytes(), &err);
            1
        }
    }
}

fn run_visual(program: &str, code: Program) -> i32 {
    let config = Config::load();
    let mut bf = Interpreter::new(code).with_output_log(OutputLog::from_limit(config.output_limit));
    let mut terminal = CrosstermTerminal::new(config.palette);

    match visual::run(&mut terminal, &mut bf) {
        Ok(Outcome::Finished) | Ok(Outcome::Quit) => 0,
        Err(VisualError::Interpreter(err)) => {
            print_interpreter_error(Some(program), bf.program().as_bytes(), &err);
            1
        }
        Err(err) => {
            eprintln!("{program}: {err}");
            let _ = io::stderr().flush();
            1
        }
    }
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bfi"));

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{program}: {}", e.kind().as_str().unwrap_or("invalid arguments"));
            usage_and_exit(&program, 1);
        }
    };

    if cli.help {
        usage_and_exit(&program, 0);
    }

    let Some(path) = cli.path else {
        eprintln!("{program}: missing program path");
        usage_and_exit(&program, 1);
    };

    logging::init();

    // Install SIGINT/SIGTERM handler to restore the terminal, flush and exit(0)
    if let Err(e) = ctrlc::set_handler(|| {
        restore_terminal();
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(0);
    }) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        std::process::exit(1);
    }

    let code = match Program::from_path(&path) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{program}: failed to read file {}: {e}", path.display());
            let _ = io::stderr().flush();
            std::process::exit(1);
        }
    };

    let exit = if cli.visualize {
        run_visual(&program, code)
    } else {
        let max_steps = resolve_max_steps(cli.max_steps, env::var(MAX_STEPS_ENV).ok());
        run_batch(&program, code, max_steps)
    };

    std::process::exit(exit);
}
