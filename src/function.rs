//! Boolean functions: fixed values or truth tables over named variables

use crate::table::{last_line, variable_value_in_line, MAX_VARIABLES};
use crate::{BinaryOperator, LogicError, TruthTable, TruthTableBuilder, UnaryOperator};
use bit_set::BitSet;
use log::trace;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The unit value manipulated by operators and produced by the parser.
///
/// A Boolean function is either a fixed value or a complete [truth table](TruthTable).
/// Two functions are equal if they are the same constant or if their tables declare the same
/// variables in the same order with the same values. A constant is never equal to a table.
///
/// ```
/// use logic::{BinaryOperator, BooleanFunction, UnaryOperator};
/// # use logic::LogicError;
/// # fn main() -> Result<(), LogicError> {
///
/// let a = BooleanFunction::variable("a")?;
/// let b = BooleanFunction::variable("b")?;
///
/// let nand = a.operate_with(&BinaryOperator::And, &b)?.operate(&UnaryOperator::Not)?;
/// assert_eq!(nand.truth_table()?.maxterms(), vec![3]);
/// assert_eq!(nand, "!(a & b)".parse::<BooleanFunction>()?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BooleanFunction {
    /// A fixed Boolean value
    Constant(bool),

    /// A function of the variables declared by the table
    Table(TruthTable),
}

impl BooleanFunction {
    /// A fresh function of a single variable: ```false``` on line 0 and ```true``` on line 1
    pub fn variable(name: impl Into<String>) -> Result<Self, LogicError> {
        let mut table = TruthTable::new([name.into()])?;
        table.set(1, true)?;
        Ok(Self::Table(table))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    pub fn has_truth_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }

    pub fn constant(&self) -> Result<bool, LogicError> {
        match self {
            Self::Constant(b) => Ok(*b),
            Self::Table(_) => Err(LogicError::IllegalState(
                "the Boolean function is not a constant".into(),
            )),
        }
    }

    pub fn truth_table(&self) -> Result<&TruthTable, LogicError> {
        match self {
            Self::Table(t) => Ok(t),
            Self::Constant(_) => Err(LogicError::IllegalState(
                "the Boolean function is a constant without truth table".into(),
            )),
        }
    }

    pub fn truth_table_mut(&mut self) -> Result<&mut TruthTable, LogicError> {
        match self {
            Self::Table(t) => Ok(t),
            Self::Constant(_) => Err(LogicError::IllegalState(
                "the Boolean function is a constant without truth table".into(),
            )),
        }
    }

    /// Apply a unary operator to this function
    pub fn operate(&self, operator: &UnaryOperator) -> Result<Self, LogicError> {
        operator.apply(self)
    }

    /// Apply a binary operator, using this function as the left operand
    pub fn operate_with(
        &self,
        operator: &BinaryOperator,
        other: &BooleanFunction,
    ) -> Result<Self, LogicError> {
        operator.apply(self, other)
    }

    /// Transform the constant or each line of the table
    pub(crate) fn map_values<F: Fn(bool) -> bool>(&self, f: F) -> Self {
        match self {
            Self::Constant(b) => Self::Constant(f(*b)),
            Self::Table(t) => Self::Table(t.map_values(f)),
        }
    }

    /// Combine two functions line by line.
    ///
    /// Constants are broadcast against all lines of a table, two tables are joined on the
    /// cross-product of their variables.
    pub(crate) fn combine<F: Fn(bool, bool) -> bool>(
        &self,
        other: &Self,
        f: F,
    ) -> Result<Self, LogicError> {
        Ok(match (self, other) {
            (Self::Constant(b1), Self::Constant(b2)) => Self::Constant(f(*b1, *b2)),
            (Self::Constant(b), Self::Table(t)) => Self::Table(t.map_values(|v| f(*b, v))),
            (Self::Table(t), Self::Constant(b)) => Self::Table(t.map_values(|v| f(v, *b))),
            (Self::Table(t1), Self::Table(t2)) => Self::Table(join_tables(t1, t2, f)?),
        })
    }
}

/// Build the cross-product of two tables, then merge the columns sharing a variable.
///
/// The variables of the first table have the lowest significance.
fn join_tables<F: Fn(bool, bool) -> bool>(
    first: &TruthTable,
    second: &TruthTable,
    f: F,
) -> Result<TruthTable, LogicError> {
    let width = first.num_variables() + second.num_variables();
    if width > MAX_VARIABLES {
        return Err(LogicError::InvalidArgument(format!(
            "combining these tables requires {} variables, at most {} are supported",
            width, MAX_VARIABLES
        )));
    }
    trace!("join({:?}, {:?})", first.variables(), second.variables());

    let shift = first.num_variables();
    let mask = last_line(shift);
    let mut product = TruthTableBuilder::default();
    product.set_variables(first.variables().iter().chain(second.variables()).cloned());
    for line in 0..=last_line(width) {
        let value = f(first.value_at(line & mask), second.value_at(line >> shift));
        product.set(line, value);
    }

    collapse_duplicate_columns(product)
}

/// Group the columns of a list of variables by name, in order of first occurrence
fn column_groups(variables: &[String]) -> Vec<(String, Vec<usize>)> {
    let mut groups: Vec<(String, Vec<usize>)> = vec![];
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (column, name) in variables.iter().enumerate() {
        let group = *seen.entry(name.as_str()).or_insert_with(|| {
            groups.push((name.clone(), vec![]));
            groups.len() - 1
        });
        groups[group].1.push(column);
    }
    groups
}

/// Merge the columns associated to the same variable.
///
/// The same variable must take the same value in all its columns: lines where these columns
/// disagree are dropped. The first column of each variable is kept to index the remaining lines.
fn collapse_duplicate_columns(product: TruthTableBuilder) -> Result<TruthTable, LogicError> {
    let groups = column_groups(product.variables());
    if groups.iter().all(|(_, columns)| columns.len() == 1) {
        return product.build();
    }

    let width = product.variables().len();
    let removed: BitSet = groups
        .iter()
        .flat_map(|(_, columns)| columns.iter().skip(1).copied())
        .collect();
    let kept: Vec<usize> = (0..width).filter(|c| !removed.contains(*c)).collect();

    let mut collapsed = TruthTableBuilder::default();
    collapsed.set_variables(groups.iter().map(|(name, _)| name.as_str()));
    for line in 0..=last_line(width) {
        let consistent = groups.iter().all(|(_, columns)| {
            let reference = variable_value_in_line(columns[0], line);
            columns[1..]
                .iter()
                .all(|c| variable_value_in_line(*c, line) == reference)
        });
        if !consistent {
            continue;
        }
        let target = kept.iter().enumerate().fold(0u64, |word, (bit, column)| {
            word | ((variable_value_in_line(*column, line) as u64) << bit)
        });
        collapsed.set(target, product.get_value(line));
    }
    collapsed.build()
}

impl From<bool> for BooleanFunction {
    fn from(b: bool) -> Self {
        Self::Constant(b)
    }
}

impl From<TruthTable> for BooleanFunction {
    fn from(table: TruthTable) -> Self {
        Self::Table(table)
    }
}

impl FromStr for BooleanFunction {
    type Err = LogicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}

impl fmt::Display for BooleanFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Constant(true) => writeln!(f, "1"),
            Self::Constant(false) => writeln!(f, "0"),
            Self::Table(t) => write!(f, "{}", t),
        }
    }
}
