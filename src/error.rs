use thiserror::Error;

/// Errors raised while building truth tables, parsing expressions or running commands.
#[derive(Error, Debug)]
pub enum LogicError {
    /// Malformed structural input: variable list, operator symbol or condition value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A line index outside of the valid bounds of a table
    #[error("Index {index} is out of range for a truth table of size {size}")]
    OutOfRange { index: u64, size: u128 },

    /// An operation was called before its precondition was met
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// The accumulated lines do not form a valid truth table
    #[error("Illegal truth table: {0}")]
    IllegalTruthTable(String),

    /// The tokenizer met some unrecognized input
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    /// The expression is structurally invalid
    #[error("Bad Boolean function: {0}")]
    BadBooleanFunction(String),

    /// A reference could not be resolved
    #[error("Boolean function not found in the current workspace: {0}")]
    BooleanFunctionNotFound(String),

    /// The first word of a statement is not a known command
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// The arguments of a command could not be understood
    #[error("Unknown args to command '{0}': {1}")]
    BadCommandArguments(String, String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
