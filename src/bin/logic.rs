use std::fs::File;
use std::io::{self, BufReader, Cursor};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use color_eyre::Result;
use logic::{Interpreter, InterpreterConfig};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(author, version, about = "Interpreter for Boolean functions defined by truth tables")]
struct Cli {
    /// Script to run, commands are read interactively from stdin if missing
    #[arg(value_name = "FILE", conflicts_with = "code")]
    file: Option<PathBuf>,

    /// Run the given code instead of a script
    #[arg(short, long, value_name = "CODE")]
    code: Option<String>,

    /// Log more details on stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let mut out = io::stdout();
    let mut err = io::stderr();
    let result = match (cli.code, cli.file) {
        (Some(code), _) => {
            let mut interpreter = Interpreter::new(InterpreterConfig::batch());
            interpreter.run(Cursor::new(code), &mut out, &mut err)
        }
        (None, Some(path)) => {
            let file = File::open(&path)?;
            let mut interpreter = Interpreter::new(InterpreterConfig::batch());
            interpreter.run(BufReader::new(file), &mut out, &mut err)
        }
        (None, None) => {
            let mut interpreter = Interpreter::new(InterpreterConfig::interactive());
            interpreter.run(io::stdin().lock(), &mut out, &mut err)
        }
    };

    // The failure was already reported by the interpreter
    if result.is_err() {
        process::exit(1);
    }
    Ok(())
}
