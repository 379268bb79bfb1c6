//! Parse infix expressions into Boolean functions
//!
//! Expressions are split into tokens, reordered in postfix notation and folded by a
//! [BooleanFunctionAccumulator].

use crate::operator::{operator_from_symbol, OPERATOR_PATTERNS};
use crate::{BinaryOperator, BooleanFunction, Fixity, LogicError, Operator, UnaryOperator};
use itertools::Itertools;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static RE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    let operators = OPERATOR_PATTERNS.iter().map(|(p, _)| *p).join("|");
    Regex::new(&format!(
        r"^\s*(?:({})|(\()|(\))|(\$?[a-zA-Z]+)|([0-9]+))",
        operators
    ))
    .unwrap()
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Operand {
    Variable(String),
    Reference(String),
    Literal(bool),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    Open,
    Close,
    Unary(UnaryOperator),
    Binary(BinaryOperator),
    Operand(Operand),
}

impl Token {
    fn is_prefix(&self) -> bool {
        matches!(self, Token::Unary(op) if op.fixity() == Fixity::Prefix)
    }

    fn is_suffix(&self) -> bool {
        matches!(self, Token::Unary(op) if op.fixity() == Fixity::Suffix)
    }
}

fn operand(text: &str, position: usize) -> Result<Operand, LogicError> {
    if let Some(name) = text.strip_prefix('$') {
        return Ok(Operand::Reference(name.to_string()));
    }
    match text {
        "0" => Ok(Operand::Literal(false)),
        "1" => Ok(Operand::Literal(true)),
        t if t.starts_with(|c: char| c.is_ascii_digit()) => Err(LogicError::UnknownToken(format!(
            "'{}' at index {} is not a Boolean literal",
            t, position
        ))),
        t => Ok(Operand::Variable(t.to_string())),
    }
}

/// Split an expression into infix tokens.
///
/// Each operand is wrapped into its own pair of parentheses.
pub(crate) fn tokenize(expression: &str) -> Result<Vec<Token>, LogicError> {
    let mut tokens = vec![];
    let mut position = 0;
    while position < expression.len() {
        let rest = &expression[position..];
        if rest.trim().is_empty() {
            break;
        }
        let captures = RE_TOKEN.captures(rest).ok_or_else(|| {
            let skipped = rest.len() - rest.trim_start().len();
            LogicError::UnknownToken(format!(
                "unexpected input at index {}: '{}'",
                position + skipped,
                rest.trim()
            ))
        })?;

        if let Some(m) = captures.get(1) {
            tokens.push(match operator_from_symbol(m.as_str())? {
                Operator::Unary(op) => Token::Unary(op),
                Operator::Binary(op) => Token::Binary(op),
            });
        } else if captures.get(2).is_some() {
            tokens.push(Token::Open);
        } else if captures.get(3).is_some() {
            tokens.push(Token::Close);
        } else if let Some(m) = captures.get(4).or_else(|| captures.get(5)) {
            let value = operand(m.as_str(), position + m.start())?;
            tokens.extend([Token::Open, Token::Operand(value), Token::Close]);
        }

        // The whole match includes the leading whitespace
        position += captures.get(0).map(|m| m.end()).unwrap_or(rest.len());
    }
    Ok(tokens)
}

fn misplaced(op: &UnaryOperator, expected: &str) -> LogicError {
    LogicError::BadBooleanFunction(format!("the operator '{}' must be {}", op, expected))
}

/// Reorder infix tokens in postfix notation.
///
/// Binary operators have no relative priority: they are emitted when their enclosing group is
/// closed, which groups unparenthesized chains to the right.
/// Prefix operators are released with the group that follows them, suffix operators apply
/// directly to the group which precedes them.
pub(crate) fn to_postfix(infix: Vec<Token>) -> Result<Vec<Token>, LogicError> {
    let mut output = Vec::with_capacity(infix.len());
    let mut stack: Vec<Token> = vec![];

    for (idx, token) in infix.iter().enumerate() {
        if let Token::Unary(op) = token {
            match op.fixity() {
                Fixity::Prefix => {
                    let next = infix.get(idx + 1);
                    if !matches!(next, Some(Token::Open)) && !next.map_or(false, Token::is_prefix) {
                        return Err(misplaced(op, "followed by a parenthesized group"));
                    }
                }
                Fixity::Suffix => {
                    let previous = idx.checked_sub(1).and_then(|i| infix.get(i));
                    if !matches!(previous, Some(Token::Close))
                        && !previous.map_or(false, Token::is_suffix)
                    {
                        return Err(misplaced(op, "placed after a closed group"));
                    }
                }
            }
        }

        match token {
            Token::Operand(_) => output.push(token.clone()),
            Token::Close => {
                loop {
                    match stack.pop() {
                        Some(Token::Open) => break,
                        Some(t) => output.push(t),
                        None => {
                            return Err(LogicError::BadBooleanFunction(
                                "unbalanced closing parenthesis".into(),
                            ))
                        }
                    }
                }
                while stack.last().map_or(false, Token::is_prefix) {
                    if let Some(t) = stack.pop() {
                        output.push(t);
                    }
                }
            }
            t if t.is_suffix() => output.push(t.clone()),
            t => stack.push(t.clone()),
        }
    }

    while let Some(token) = stack.pop() {
        if token == Token::Open {
            return Err(LogicError::BadBooleanFunction(
                "unbalanced opening parenthesis".into(),
            ));
        }
        output.push(token);
    }
    Ok(output)
}

/// Evaluation stack folding postfix tokens into a single Boolean function.
///
/// ```
/// use logic::{BinaryOperator, BooleanFunctionAccumulator, UnaryOperator};
/// # use logic::LogicError;
/// # fn main() -> Result<(), LogicError> {
///
/// let mut acc = BooleanFunctionAccumulator::default();
/// acc.push_variable("a")?;
/// acc.push_variable("b")?;
/// acc.push_binary(&BinaryOperator::Or)?;
/// acc.push_unary(&UnaryOperator::Not)?;
/// assert!(acc.can_be_popped());
///
/// let nor = acc.pop()?;
/// assert_eq!(nor.truth_table()?.minterms(), vec![0]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct BooleanFunctionAccumulator {
    stack: Vec<BooleanFunction>,
}

impl BooleanFunctionAccumulator {
    pub fn push(&mut self, function: BooleanFunction) {
        self.stack.push(function);
    }

    /// Push a fresh function of a single variable
    pub fn push_variable(&mut self, name: &str) -> Result<(), LogicError> {
        self.push(BooleanFunction::variable(name)?);
        Ok(())
    }

    pub fn push_constant(&mut self, value: bool) {
        self.push(BooleanFunction::Constant(value));
    }

    /// Replace the top of the stack by the result of the operator
    pub fn push_unary(&mut self, operator: &UnaryOperator) -> Result<(), LogicError> {
        let operand = self.stack.pop().ok_or_else(|| {
            LogicError::IllegalState("Cannot push a unary operator on an empty stack".into())
        })?;
        self.push(operator.apply(&operand)?);
        Ok(())
    }

    /// Replace the two top items by the result of the operator, the deepest one is the left operand
    pub fn push_binary(&mut self, operator: &BinaryOperator) -> Result<(), LogicError> {
        if self.stack.len() < 2 {
            return Err(LogicError::IllegalState(format!(
                "Cannot push the binary operator '{}' on a stack of {} item(s)",
                operator,
                self.stack.len()
            )));
        }
        match (self.stack.pop(), self.stack.pop()) {
            (Some(second), Some(first)) => {
                self.push(operator.apply(&first, &second)?);
                Ok(())
            }
            _ => Err(LogicError::IllegalState(format!(
                "Missing operands for the binary operator '{}'",
                operator
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Test if the stack holds exactly one result
    pub fn can_be_popped(&self) -> bool {
        self.stack.len() == 1
    }

    pub fn pop(&mut self) -> Result<BooleanFunction, LogicError> {
        if !self.can_be_popped() {
            return Err(LogicError::IllegalState(format!(
                "the stack holds {} items instead of a single result",
                self.stack.len()
            )));
        }
        self.stack
            .pop()
            .ok_or_else(|| LogicError::IllegalState("the stack is empty".into()))
    }
}

// An empty evaluation stack means that the expression lacks an operand
fn missing_operand(e: LogicError) -> LogicError {
    match e {
        LogicError::IllegalState(msg) => LogicError::BadBooleanFunction(msg),
        e => e,
    }
}

/// Parse an expression, resolving ```$name``` references with the given closure.
///
/// ```
/// use logic::{parse_with, BooleanFunction, LogicError};
/// # fn main() -> Result<(), LogicError> {
///
/// let stored = BooleanFunction::variable("x")?;
/// let f = parse_with("!($f)", |name| match name {
///     "f" => Ok(stored.clone()),
///     _ => Err(LogicError::BooleanFunctionNotFound(name.into())),
/// })?;
/// assert_eq!(f.truth_table()?.minterms(), vec![0]);
/// # Ok(())
/// # }
/// ```
pub fn parse_with<F>(expression: &str, mut lookup: F) -> Result<BooleanFunction, LogicError>
where
    F: FnMut(&str) -> Result<BooleanFunction, LogicError>,
{
    let infix = tokenize(expression)?;
    debug!("infix: {}", infix.iter().join(" "));
    let postfix = to_postfix(infix)?;
    debug!("postfix: {}", postfix.iter().join(" "));

    let mut acc = BooleanFunctionAccumulator::default();
    for token in postfix {
        match token {
            Token::Operand(Operand::Variable(name)) => acc.push_variable(&name)?,
            Token::Operand(Operand::Literal(value)) => acc.push_constant(value),
            Token::Operand(Operand::Reference(name)) => acc.push(lookup(&name)?),
            Token::Unary(op) => acc.push_unary(&op).map_err(missing_operand)?,
            Token::Binary(op) => acc.push_binary(&op).map_err(missing_operand)?,
            Token::Open | Token::Close => {
                return Err(LogicError::BadBooleanFunction(
                    "parenthesis left in postfix notation".into(),
                ))
            }
        }
    }

    if !acc.can_be_popped() {
        return Err(LogicError::BadBooleanFunction(format!(
            "Missing operator tokens: {} operands left in '{}'",
            acc.len(),
            expression
        )));
    }
    acc.pop()
}

/// Parse an expression without any reference to stored functions
pub fn parse(expression: &str) -> Result<BooleanFunction, LogicError> {
    parse_with(expression, |name| {
        Err(LogicError::BooleanFunctionNotFound(name.to_string()))
    })
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Variable(name) => write!(f, "{}", name),
            Operand::Reference(name) => write!(f, "${}", name),
            Operand::Literal(value) => write!(f, "{}", *value as u8),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Open => write!(f, "("),
            Token::Close => write!(f, ")"),
            Token::Unary(op) => write!(f, "{}", op),
            Token::Binary(op) => write!(f, "{}", op),
            Token::Operand(o) => write!(f, "{}", o),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parse::*;
    use crate::TruthTable;

    fn var(name: &str) -> BooleanFunction {
        BooleanFunction::variable(name).unwrap()
    }

    fn postfix(expression: &str) -> Result<String, LogicError> {
        Ok(to_postfix(tokenize(expression)?)?.iter().join(" "))
    }

    #[test]
    fn tokens() -> Result<(), LogicError> {
        let tokens = tokenize("  !( a&$b)[ 1 ] ==0 ")?;
        assert_eq!(tokens.iter().join(" "), "! ( ( a ) & ( $b ) ) [1] == ( 0 )");

        let tokens = tokenize("f[x = 1, y=0]^g")?;
        assert_eq!(tokens.iter().join(" "), "( f ) [x=1, y=0] ^ ( g )");
        assert!(tokenize("   ")?.is_empty());

        let tokens = tokenize("f[\tx=1,  y=0\t]")?;
        assert_eq!(tokens.iter().join(" "), "( f ) [x=1, y=0]");
        assert!(matches!(
            tokenize("f[x=1,\ry=0]"),
            Err(LogicError::UnknownToken(_))
        ));
        Ok(())
    }

    #[test]
    fn unknown_tokens() {
        for expression in ["a @ b", "$", "a & $", "2", "a | 10", "a ~"] {
            assert!(
                matches!(parse(expression), Err(LogicError::UnknownToken(_))),
                "{}",
                expression
            );
        }
        match tokenize("ab # c") {
            Err(LogicError::UnknownToken(msg)) => assert!(msg.contains("index 3")),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn postfix_order() -> Result<(), LogicError> {
        assert_eq!(postfix("a & b")?, "a b &");
        assert_eq!(postfix("a & b | c")?, "a b c | &");
        assert_eq!(postfix("(a & b) | c")?, "a b & c |");
        assert_eq!(postfix("!(a | b)")?, "a b | !");
        assert_eq!(postfix("!!a & b")?, "a ! ! b &");
        assert_eq!(postfix("a & b[0]")?, "a b [0] &");
        assert_eq!(postfix("(a & b)[1][0]")?, "a b & [1] [0]");
        Ok(())
    }

    #[test_log::test]
    fn parse_and() -> Result<(), LogicError> {
        let f = parse("a & b")?;
        let expected = var("a").operate_with(&BinaryOperator::And, &var("b"))?;
        assert_eq!(f, expected);

        let table = f.truth_table()?;
        assert_eq!(table.variables(), ["a", "b"]);
        assert_eq!(table.minterms(), vec![3]);
        Ok(())
    }

    #[test]
    fn parse_de_morgan() -> Result<(), LogicError> {
        let f = parse("!(a | b)")?;
        assert_eq!(f.truth_table()?.minterms(), vec![0]);
        assert_eq!(f, parse("!a & !b")?);
        Ok(())
    }

    #[test]
    fn parse_index() -> Result<(), LogicError> {
        assert_eq!(parse("a[0]")?, BooleanFunction::from(false));
        assert_eq!(parse("a[1]")?, BooleanFunction::from(true));
        assert_eq!(parse("(a & b)[3]")?, BooleanFunction::from(true));
        assert_eq!(parse("1[5]")?, BooleanFunction::from(true));
        assert!(matches!(
            parse("a[2]"),
            Err(LogicError::OutOfRange { index: 2, .. })
        ));
        Ok(())
    }

    #[test]
    fn parse_conditions() -> Result<(), LogicError> {
        assert_eq!(parse("(a & b)[a=1]")?, var("b"));
        assert_eq!(parse("(a | b)[a=0, b=0]")?, BooleanFunction::from(false));
        assert_eq!(parse("(a ^ b)[b = 1]")?, parse("!a")?);
        assert!(matches!(
            parse("(a & b)[c=1]"),
            Err(LogicError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse("a[a=3]"),
            Err(LogicError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse("1[a=1]"),
            Err(LogicError::InvalidArgument(_))
        ));
        Ok(())
    }

    #[test]
    fn parse_constants() -> Result<(), LogicError> {
        assert_eq!(parse("1")?, BooleanFunction::from(true));
        assert_eq!(parse("!(1) ^ 1")?, BooleanFunction::from(true));
        assert_eq!(parse("a & 1")?, var("a"));
        assert_eq!(parse("0 | a")?, var("a"));
        Ok(())
    }

    #[test]
    fn parse_equals() -> Result<(), LogicError> {
        assert_eq!(parse("a == a")?, BooleanFunction::from(true));
        assert_eq!(parse("a == b")?, BooleanFunction::from(false));
        assert_eq!(parse("(a & a) == a")?, BooleanFunction::from(true));
        assert_eq!(parse("!(a & b) == (!a | !b)")?, BooleanFunction::from(true));
        Ok(())
    }

    #[test]
    fn lazy_grouping() -> Result<(), LogicError> {
        assert_eq!(parse("a & b | c")?, parse("a & (b | c)")?);
        assert_ne!(parse("a & b | c")?, parse("(a & b) | c")?);
        assert_eq!(parse("a & b | c")?.truth_table()?.minterms(), vec![3, 5, 7]);
        Ok(())
    }

    #[test]
    fn shared_variables() -> Result<(), LogicError> {
        let f = parse("(a & b) & (b & c)")?;
        let table = f.truth_table()?;
        assert_eq!(table.variables(), ["a", "b", "c"]);
        assert_eq!(table.minterms(), vec![7]);
        Ok(())
    }

    #[test_log::test]
    fn bad_functions() {
        for expression in [
            "a &", "& a", "(a & b", "a & b)", "a b", "", "()", "a !", "[0]", "a & [1]", "!",
        ] {
            assert!(
                matches!(parse(expression), Err(LogicError::BadBooleanFunction(_))),
                "{}",
                expression
            );
        }
    }

    #[test]
    fn references() -> Result<(), LogicError> {
        assert!(matches!(
            parse("$missing"),
            Err(LogicError::BooleanFunctionNotFound(name)) if name == "missing"
        ));

        let mut table = TruthTable::new(["x", "y"])?;
        table.set(1, true)?;
        let stored = BooleanFunction::from(table);
        let mut calls = 0;
        let f = parse_with("$f | $f[x=0]", |name| {
            calls += 1;
            match name {
                "f" => Ok(stored.clone()),
                _ => Err(LogicError::BooleanFunctionNotFound(name.into())),
            }
        })?;
        assert_eq!(calls, 2);
        assert_eq!(f.truth_table()?.variables(), ["x", "y"]);
        assert_eq!(f.truth_table()?.minterms(), vec![1]);
        Ok(())
    }

    #[test]
    fn lookup_errors_are_kept() {
        let result = parse_with("a & $f", |_| {
            Err(LogicError::IllegalState("workspace locked".into()))
        });
        assert!(matches!(
            result,
            Err(LogicError::IllegalState(msg)) if msg == "workspace locked"
        ));

        let result = parse_with("!$f", |name| {
            Err(LogicError::UnknownCommand(name.to_string()))
        });
        assert!(matches!(result, Err(LogicError::UnknownCommand(name)) if name == "f"));
    }

    #[test]
    fn accumulator() -> Result<(), LogicError> {
        let mut acc = BooleanFunctionAccumulator::default();
        assert!(acc.is_empty());
        assert!(!acc.can_be_popped());
        assert!(matches!(
            acc.push_unary(&UnaryOperator::Not),
            Err(LogicError::IllegalState(_))
        ));

        acc.push_constant(true);
        assert!(matches!(
            acc.push_binary(&BinaryOperator::And),
            Err(LogicError::IllegalState(_))
        ));
        acc.push_variable("a")?;
        assert_eq!(acc.len(), 2);
        assert!(matches!(acc.pop(), Err(LogicError::IllegalState(_))));

        acc.push_binary(&BinaryOperator::Xor)?;
        assert_eq!(acc.pop()?, parse("!a")?);
        assert!(acc.is_empty());
        Ok(())
    }
}
