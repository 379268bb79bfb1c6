//! Define and combine Boolean functions represented by complete truth tables.
//!
//! A [truth table](TruthTable) declares an ordered list of named variables and associates a Boolean value to each
//! of the ```2^n``` assignments of these variables. Bit ```j``` of a line index gives the value of the ```j```-th
//! variable: the first declared variable is the least significant one.
//! A [BooleanFunction] is either a fixed value or a truth table, it is the unit value manipulated by
//! [operators](UnaryOperator) and produced by the [expression parser](parse).
//!
//! ```
//! use logic::{TruthTable, BooleanFunction};
//! # use logic::LogicError;
//! # fn main() -> Result<(), LogicError> {
//!
//! // All lines of a fresh table are false
//! let mut table = TruthTable::new(["a", "b"])?;
//! table.set(3, true)?;
//!
//! // The same function is obtained by parsing an expression
//! let f: BooleanFunction = "a & b".parse()?;
//! assert_eq!(f, BooleanFunction::from(table));
//! # Ok(())
//! # }
//! ```
//!
//! # Expressions
//!
//! Expressions combine variable names, constants (```0``` and ```1```) and references to stored functions
//! (```$name```) with binary operators (```&```, ```|```, ```^``` and ```==```), the prefix negation (```!```) and
//! suffix operators extracting a line (```[3]```) or fixing some variables (```[a=1, b=0]```).
//!
//! Binary operators have no relative priority: unparenthesized chains are grouped to the right and
//! ```a & b | c``` is read as ```a & (b | c)```.
//! When both operands share a variable, the combined table keeps a single column for it.
//!
//! ```
//! use logic::{parse, BooleanFunction};
//! # use logic::LogicError;
//! # fn main() -> Result<(), LogicError> {
//!
//! let f = parse("(a & b) | (b & c)")?;
//! let table = f.truth_table()?;
//! assert_eq!(table.variables(), ["a", "b", "c"]);
//! assert_eq!(table.minterms(), vec![3, 6, 7]);
//!
//! // Fix some variables, or extract a single line
//! assert_eq!(parse("(a & b)[b=1]")?, parse("a")?);
//! assert_eq!(parse("(a & b)[3]")?, BooleanFunction::from(true));
//!
//! // Compare complete functions
//! assert_eq!(parse("!(a | b) == (!a & !b)")?, BooleanFunction::from(true));
//! # Ok(())
//! # }
//! ```
//!
//! # Interpreter
//!
//! The [Interpreter] runs ```;```-separated commands over a [Runtime] workspace of named functions, which
//! can be referenced in the expressions of the following commands.
//!
//! ```
//! use logic::{Interpreter, InterpreterConfig};
//! # use logic::LogicError;
//! # fn main() -> Result<(), LogicError> {
//!
//! let mut out = vec![];
//! let mut interpreter = Interpreter::new(InterpreterConfig::batch());
//! interpreter.run("let f = a ^ b; let g = $f & c; minterms g".as_bytes(), &mut out, &mut std::io::sink())?;
//! assert_eq!(String::from_utf8_lossy(&out), "5, 6\n");
//! # Ok(())
//! # }
//! ```

mod builder;
mod condition;
mod error;
mod function;
mod interpreter;
mod operator;
mod parse;
mod runtime;
mod table;

#[macro_use]
extern crate pest_derive;

// Export public structures and API
pub use builder::TruthTableBuilder;
pub use condition::TruthTableCondition;
pub use error::LogicError;
pub use function::BooleanFunction;
pub use interpreter::{Command, Flow, Interpreter, InterpreterConfig};
pub use operator::{
    create_binary_operator, create_unary_operator, operator_from_symbol, BinaryOperator, Fixity,
    Operator, UnaryOperator,
};
pub use parse::{parse, parse_with, BooleanFunctionAccumulator};
pub use runtime::Runtime;
pub use table::{variable_value_in_line, TruthTable, MAX_VARIABLES};
