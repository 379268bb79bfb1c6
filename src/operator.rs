//! Unary and binary operators acting on Boolean functions

use crate::{BooleanFunction, LogicError};
use itertools::Itertools;
use once_cell::sync::Lazy;
use pest::Parser;
use regex::Regex;
use std::fmt;

#[derive(Parser)]
#[grammar_inline = r####"
conditions = { SOI ~ "[" ~ condition ~ ( "," ~ condition )* ~ "]" ~ EOI }
condition  = { name ~ "=" ~ value }
name       = @{ ASCII_ALPHA+ }
value      = @{ ASCII_DIGIT+ }

WHITESPACE = _{ " " | "\t" }
"####]
struct ConditionParser;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SymbolKind {
    Equals,
    Not,
    And,
    Or,
    Xor,
    Index,
    Conditions,
}

/// Patterns of all operator symbols.
///
/// The first matching pattern wins: the generic condition list must come after the index.
/// Blanks inside brackets are limited to spaces and tabs, as in the condition grammar.
pub(crate) static OPERATOR_PATTERNS: [(&str, SymbolKind); 7] = [
    ("==", SymbolKind::Equals),
    ("!", SymbolKind::Not),
    ("&", SymbolKind::And),
    (r"\|", SymbolKind::Or),
    (r"\^", SymbolKind::Xor),
    (r"\[[ \t]*[0-9]+[ \t]*\]", SymbolKind::Index),
    (
        r"\[[ \t]*[a-zA-Z]+[ \t]*=[ \t]*[0-9]+[ \t]*(?:,[ \t]*[a-zA-Z]+[ \t]*=[ \t]*[0-9]+[ \t]*)*\]",
        SymbolKind::Conditions,
    ),
];

static RE_SYMBOLS: Lazy<Vec<(Regex, SymbolKind)>> = Lazy::new(|| {
    OPERATOR_PATTERNS
        .iter()
        .map(|(p, k)| (Regex::new(&format!("^(?:{})$", p)).unwrap(), *k))
        .collect()
});

/// Position of a unary operator relative to its operand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fixity {
    /// Written before a parenthesized operand: ```!(a)```
    Prefix,
    /// Written after a closed group: ```(a)[0]```
    Suffix,
}

/// Operators applied to a single Boolean function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Negate the constant or each line of the table
    Not,

    /// Extract the value of a line as a constant
    Index(u64),

    /// Fix the value of some variables, reducing the table
    Conditions(Vec<(String, bool)>),
}

/// Operators combining two Boolean functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    And,
    Or,
    Xor,
    /// Structural comparison of the two functions, giving a constant
    Equals,
}

/// Any operator recognized from its symbol
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    Unary(UnaryOperator),
    Binary(BinaryOperator),
}

impl UnaryOperator {
    pub fn fixity(&self) -> Fixity {
        match self {
            UnaryOperator::Not => Fixity::Prefix,
            UnaryOperator::Index(_) | UnaryOperator::Conditions(_) => Fixity::Suffix,
        }
    }

    pub fn apply(&self, function: &BooleanFunction) -> Result<BooleanFunction, LogicError> {
        match self {
            UnaryOperator::Not => Ok(function.map_values(|b| !b)),
            UnaryOperator::Index(position) => match function {
                // Indexing a scalar leaves it unchanged
                BooleanFunction::Constant(_) => Ok(function.clone()),
                BooleanFunction::Table(t) => t.get(*position).map(BooleanFunction::Constant),
            },
            UnaryOperator::Conditions(conditions) => {
                let table = match function {
                    BooleanFunction::Table(t) => t,
                    BooleanFunction::Constant(_) => {
                        return Err(LogicError::InvalidArgument(format!(
                            "a constant has no variable to fix in {}",
                            self
                        )))
                    }
                };
                let mut condition = table.condition_builder();
                for (variable, value) in conditions {
                    condition.add_condition(variable, *value)?;
                }
                condition.process()?;
                condition.result()
            }
        }
    }
}

impl BinaryOperator {
    pub fn apply(
        &self,
        first: &BooleanFunction,
        second: &BooleanFunction,
    ) -> Result<BooleanFunction, LogicError> {
        match self {
            BinaryOperator::And => first.combine(second, |a, b| a && b),
            BinaryOperator::Or => first.combine(second, |a, b| a || b),
            BinaryOperator::Xor => first.combine(second, |a, b| a != b),
            BinaryOperator::Equals => Ok(BooleanFunction::Constant(first == second)),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::And => "&",
            BinaryOperator::Or => "|",
            BinaryOperator::Xor => "^",
            BinaryOperator::Equals => "==",
        }
    }
}

fn parse_index(symbol: &str) -> Result<u64, LogicError> {
    symbol
        .trim_matches(|c: char| c == '[' || c == ']' || c.is_whitespace())
        .parse()
        .map_err(|_| LogicError::InvalidArgument(format!("Invalid index: {}", symbol)))
}

fn parse_conditions(symbol: &str) -> Result<Vec<(String, bool)>, LogicError> {
    let parsed = ConditionParser::parse(Rule::conditions, symbol)
        .map_err(|e| LogicError::InvalidArgument(format!("Invalid conditions {}: {}", symbol, e)))?;

    parsed
        .flat_map(|conditions| conditions.into_inner())
        .filter(|pair| pair.as_rule() == Rule::condition)
        .map(|condition| {
            let mut inner = condition.into_inner();
            let name = inner.next().map(|p| p.as_str()).unwrap_or_default();
            let value = match inner.next().map(|p| p.as_str()) {
                Some("0") => false,
                Some("1") => true,
                Some(v) => {
                    return Err(LogicError::InvalidArgument(format!(
                        "The value of '{}' needs to be 0 or 1, got {}",
                        name, v
                    )))
                }
                None => return Err(LogicError::InvalidArgument(symbol.into())),
            };
            Ok((name.to_string(), value))
        })
        .collect()
}

/// Recognize an operator from its exact symbol.
///
/// ```
/// use logic::{operator_from_symbol, BinaryOperator, Operator, UnaryOperator};
/// # use logic::LogicError;
/// # fn main() -> Result<(), LogicError> {
///
/// assert_eq!(operator_from_symbol("^")?, Operator::Binary(BinaryOperator::Xor));
/// assert_eq!(operator_from_symbol("[2]")?, Operator::Unary(UnaryOperator::Index(2)));
/// assert_eq!(
///     operator_from_symbol("[a = 1, b = 0]")?,
///     Operator::Unary(UnaryOperator::Conditions(vec![("a".into(), true), ("b".into(), false)]))
/// );
/// assert!(operator_from_symbol(" & ").is_err());
/// # Ok(())
/// # }
/// ```
pub fn operator_from_symbol(symbol: &str) -> Result<Operator, LogicError> {
    let kind = RE_SYMBOLS
        .iter()
        .find(|(re, _)| re.is_match(symbol))
        .map(|(_, kind)| *kind)
        .ok_or_else(|| LogicError::InvalidArgument(format!("Unknown operator: {}", symbol)))?;

    Ok(match kind {
        SymbolKind::Equals => Operator::Binary(BinaryOperator::Equals),
        SymbolKind::And => Operator::Binary(BinaryOperator::And),
        SymbolKind::Or => Operator::Binary(BinaryOperator::Or),
        SymbolKind::Xor => Operator::Binary(BinaryOperator::Xor),
        SymbolKind::Not => Operator::Unary(UnaryOperator::Not),
        SymbolKind::Index => Operator::Unary(UnaryOperator::Index(parse_index(symbol)?)),
        SymbolKind::Conditions => {
            Operator::Unary(UnaryOperator::Conditions(parse_conditions(symbol)?))
        }
    })
}

pub fn create_unary_operator(symbol: &str) -> Result<UnaryOperator, LogicError> {
    match operator_from_symbol(symbol)? {
        Operator::Unary(op) => Ok(op),
        Operator::Binary(_) => Err(LogicError::InvalidArgument(format!(
            "Not a unary operator: {}",
            symbol
        ))),
    }
}

pub fn create_binary_operator(symbol: &str) -> Result<BinaryOperator, LogicError> {
    match operator_from_symbol(symbol)? {
        Operator::Binary(op) => Ok(op),
        Operator::Unary(_) => Err(LogicError::InvalidArgument(format!(
            "Not a binary operator: {}",
            symbol
        ))),
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOperator::Not => write!(f, "!"),
            UnaryOperator::Index(position) => write!(f, "[{}]", position),
            UnaryOperator::Conditions(conditions) => write!(
                f,
                "[{}]",
                conditions
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, *value as u8))
                    .join(", ")
            ),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operator::Unary(op) => write!(f, "{}", op),
            Operator::Binary(op) => write!(f, "{}", op),
        }
    }
}
