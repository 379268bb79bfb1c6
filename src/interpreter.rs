//! Line-oriented interpreter running commands over a workspace of Boolean functions

use crate::{parse_with, BooleanFunction, LogicError, Runtime};
use itertools::Itertools;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, Write};
use std::str::FromStr;

static PROMPT: &str = ">>> ";
static COMMENT: char = '#';
static STATEMENT_SEPARATOR: char = ';';

static RE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$?([a-zA-Z]+)$").unwrap());
static RE_LET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?([a-zA-Z]+)\s*=\s*(\S.*)$").unwrap());

/// Behaviour of the interpreter on failures and user interaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Stop at the first failing statement and return its error
    pub terminate_on_failure: bool,

    /// Write a prompt before reading each line
    pub print_prompts: bool,
}

impl InterpreterConfig {
    /// Settings for a user typing commands: show prompts and keep going after errors
    pub fn interactive() -> Self {
        Self {
            terminate_on_failure: false,
            print_prompts: true,
        }
    }

    /// Settings for scripts and inline code: no prompt, stop on the first error
    pub fn batch() -> Self {
        Self {
            terminate_on_failure: true,
            print_prompts: false,
        }
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self::batch()
    }
}

/// Commands understood by the interpreter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// ```let name = expression```
    Let,
    Print,
    Delete,
    Minterms,
    Maxterms,
    Variables,
    Quit,
}

static COMMAND_ALIASES: [(&str, Command); 14] = [
    ("let", Command::Let),
    ("l", Command::Let),
    ("print", Command::Print),
    ("p", Command::Print),
    ("delete", Command::Delete),
    ("d", Command::Delete),
    ("minterms", Command::Minterms),
    ("min", Command::Minterms),
    ("maxterms", Command::Maxterms),
    ("max", Command::Maxterms),
    ("variables", Command::Variables),
    ("v", Command::Variables),
    ("quit", Command::Quit),
    ("q", Command::Quit),
];

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Let => "let",
            Command::Print => "print",
            Command::Delete => "delete",
            Command::Minterms => "minterms",
            Command::Maxterms => "maxterms",
            Command::Variables => "variables",
            Command::Quit => "quit",
        }
    }
}

impl FromStr for Command {
    type Err = LogicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        COMMAND_ALIASES
            .iter()
            .find(|(alias, _)| *alias == s)
            .map(|(_, command)| *command)
            .ok_or_else(|| LogicError::UnknownCommand(s.to_string()))
    }
}

/// Outcome of a successful statement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run statements against a [Runtime] workspace.
///
/// ```
/// use logic::{Interpreter, InterpreterConfig};
/// # use logic::LogicError;
/// # fn main() -> Result<(), LogicError> {
///
/// let script = "let f = a & b  # conjunction\nlet g = !$f; minterms g\n";
/// let mut out = vec![];
/// let mut err = vec![];
/// let mut interpreter = Interpreter::new(InterpreterConfig::batch());
/// interpreter.run(script.as_bytes(), &mut out, &mut err)?;
///
/// assert_eq!(String::from_utf8_lossy(&out), "0, 1, 2\n");
/// assert_eq!(interpreter.runtime().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Interpreter {
    runtime: Runtime,
    config: InterpreterConfig,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            runtime: Runtime::default(),
            config,
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Read and execute all lines of the input until its end or a ```quit``` command.
    ///
    /// Failures are reported on the error stream. They stop the run only if the configuration
    /// requests it, the error is then returned.
    pub fn run<R: BufRead, W: Write, E: Write>(
        &mut self,
        mut input: R,
        out: &mut W,
        err: &mut E,
    ) -> Result<(), LogicError> {
        let mut line = String::new();
        loop {
            if self.config.print_prompts {
                write!(out, "{}", PROMPT)?;
                out.flush()?;
            }
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }

            for statement in statements(&line) {
                match self.execute(statement, out) {
                    Ok(Flow::Continue) => (),
                    Ok(Flow::Quit) => return Ok(()),
                    Err(e) => {
                        writeln!(err, "ERROR: {}", e)?;
                        if self.config.terminate_on_failure {
                            return Err(e);
                        }
                    }
                }
            }
        }
    }

    /// Execute a single statement: a command followed by its arguments
    pub fn execute<W: Write>(&mut self, statement: &str, out: &mut W) -> Result<Flow, LogicError> {
        let statement = statement.trim();
        let (word, args) = statement
            .split_once(char::is_whitespace)
            .map(|(word, args)| (word, args.trim()))
            .unwrap_or((statement, ""));
        let command: Command = word.parse()?;
        debug!("{} {}", command.name(), args);

        match command {
            Command::Quit => {
                if !args.is_empty() {
                    return Err(bad_arguments(command, args));
                }
                return Ok(Flow::Quit);
            }
            Command::Let => {
                let captures = RE_LET
                    .captures(args)
                    .ok_or_else(|| bad_arguments(command, args))?;
                let runtime = &self.runtime;
                let function = parse_with(&captures[2], |name| runtime.lookup(name))?;
                self.runtime.save(&captures[1], function);
            }
            Command::Delete => {
                let name = function_name(command, args)?;
                self.runtime.remove(name)?;
            }
            Command::Print => {
                let function = self.named_function(command, args)?;
                writeln!(out, "{}", function.to_string().trim_end())?;
            }
            Command::Minterms => {
                let table = self.named_function(command, args)?.truth_table()?;
                writeln!(out, "{}", table.minterms().iter().join(", "))?;
            }
            Command::Maxterms => {
                let table = self.named_function(command, args)?.truth_table()?;
                writeln!(out, "{}", table.maxterms().iter().join(", "))?;
            }
            Command::Variables => {
                let table = self.named_function(command, args)?.truth_table()?;
                writeln!(out, "{}", table.variables().join(", "))?;
            }
        }
        Ok(Flow::Continue)
    }

    fn named_function(&self, command: Command, args: &str) -> Result<&BooleanFunction, LogicError> {
        self.runtime.get(function_name(command, args)?)
    }
}

/// Non-empty statements of a line, ignoring the trailing comment
fn statements(line: &str) -> impl Iterator<Item = &str> {
    let code = line.split(COMMENT).next().unwrap_or_default();
    code.split(STATEMENT_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn function_name(command: Command, args: &str) -> Result<&str, LogicError> {
    RE_NAME
        .captures(args)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| bad_arguments(command, args))
}

fn bad_arguments(command: Command, args: &str) -> LogicError {
    LogicError::BadCommandArguments(command.name().to_string(), args.to_string())
}
