//! Truth tables indexed by the binary encoding of variable assignments

use crate::{LogicError, TruthTableCondition};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::iter;
use std::ops::RangeInclusive;

/// Maximum number of variables declared by a single truth table
pub const MAX_VARIABLES: usize = 64;

static RESULT_TITLE: &str = "F";

/// Extract the value assigned to the variable in the given column for a line of a table.
///
/// Bit ```j``` of the line index is the value of the ```j```-th declared variable.
///
/// ```
/// # use logic::variable_value_in_line;
/// assert!( variable_value_in_line(0, 0b101));
/// assert!(!variable_value_in_line(1, 0b101));
/// assert!( variable_value_in_line(2, 0b101));
/// ```
pub fn variable_value_in_line(column: usize, line: u64) -> bool {
    (line >> column) & 1 == 1
}

/// Index of the last line of a table with the given number of variables
pub(crate) fn last_line(num_variables: usize) -> u64 {
    match num_variables {
        0 => 0,
        n => u64::MAX >> (MAX_VARIABLES - n.min(MAX_VARIABLES)),
    }
}

/// Number of lines of a table with the given number of variables, saturating for oversized lists
pub(crate) fn table_size(num_variables: usize) -> u128 {
    1u128.checked_shl(num_variables as u32).unwrap_or(u128::MAX)
}

/// A complete enumeration of the output of a Boolean function.
///
/// The table declares an ordered list of unique variables and stores one value for each of the
/// ```2^n``` possible assignments of these variables. The index of a line encodes the assignment:
/// its bit ```j``` gives the value of the ```j```-th variable, the first declared variable is the
/// least significant one.
///
/// Only the lines associated to the ```true``` value are materialized, all other lines are
/// implicitly ```false```. A fresh table is thus cheap to declare even with many variables,
/// but enumerating its lines remains exponential.
///
/// ```
/// use logic::TruthTable;
/// # use logic::LogicError;
/// # fn main() -> Result<(), LogicError> {
///
/// let mut table = TruthTable::new(["a", "b"])?;
/// table.set(3, true)?;
///
/// assert_eq!(table.size(), 4);
/// assert_eq!(table.minterms(), vec![3]);
/// assert_eq!(table.maxterms(), vec![0, 1, 2]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TruthTable {
    variables: Vec<String>,
    values: BTreeSet<u64>,
}

impl TruthTable {
    /// Create a table where all lines are ```false```.
    ///
    /// Returns an error if the list of variables is empty, has more than [MAX_VARIABLES] entries
    /// or contains the same name more than once.
    pub fn new<S: Into<String>>(variables: impl IntoIterator<Item = S>) -> Result<Self, LogicError> {
        let variables: Vec<String> = variables.into_iter().map(Into::into).collect();
        if variables.is_empty() {
            return Err(LogicError::InvalidArgument(
                "variables' size needs to be non-zero".into(),
            ));
        }
        if variables.len() > MAX_VARIABLES {
            return Err(LogicError::InvalidArgument(format!(
                "a truth table can not have more than {} variables, got {}",
                MAX_VARIABLES,
                variables.len()
            )));
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = variables.iter().find(|v| !seen.insert(v.as_str())) {
            return Err(LogicError::InvalidArgument(format!(
                "the variable '{}' is declared more than once",
                duplicate
            )));
        }
        Ok(Self {
            variables,
            values: BTreeSet::new(),
        })
    }

    pub(crate) fn with_values(mut self, values: BTreeSet<u64>) -> Self {
        self.values = values;
        self
    }

    /// The ordered list of variables
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Column of a variable in this table
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v == name)
    }

    /// Number of lines in the table: ```2^n``` for ```n``` variables
    pub fn size(&self) -> u128 {
        table_size(self.variables.len())
    }

    /// Iterate over the indices of all lines
    pub fn lines(&self) -> RangeInclusive<u64> {
        0..=last_line(self.variables.len())
    }

    fn check_index(&self, index: u64) -> Result<(), LogicError> {
        if index as u128 >= self.size() {
            return Err(LogicError::OutOfRange {
                index,
                size: self.size(),
            });
        }
        Ok(())
    }

    /// Get the value associated to a line
    pub fn get(&self, index: u64) -> Result<bool, LogicError> {
        self.check_index(index)?;
        Ok(self.value_at(index))
    }

    /// Assign the value of a line
    pub fn set(&mut self, index: u64, value: bool) -> Result<(), LogicError> {
        self.check_index(index)?;
        match value {
            true => self.values.insert(index),
            false => self.values.remove(&index),
        };
        Ok(())
    }

    /// Unchecked read, the caller guarantees that the line exists
    pub(crate) fn value_at(&self, line: u64) -> bool {
        self.values.contains(&line)
    }

    /// Ascending list of lines associated to the ```true``` value
    pub fn minterms(&self) -> Vec<u64> {
        self.values.iter().copied().collect()
    }

    /// Ascending list of lines associated to the ```false``` value
    pub fn maxterms(&self) -> Vec<u64> {
        self.lines().filter(|line| !self.value_at(*line)).collect()
    }

    /// Start a new set of fixed-value conditions on the variables of this table
    pub fn condition_builder(&self) -> TruthTableCondition<'_> {
        TruthTableCondition::new(self)
    }

    /// Copy of this table where each value is transformed by the closure
    pub(crate) fn map_values<F: Fn(bool) -> bool>(&self, f: F) -> Self {
        let values = self
            .lines()
            .filter(|line| f(self.value_at(*line)))
            .collect();
        Self {
            variables: self.variables.clone(),
            values,
        }
    }
}

fn digit(b: bool) -> &'static str {
    match b {
        true => "1",
        false => "0",
    }
}

fn write_row<'a>(
    f: &mut fmt::Formatter,
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> fmt::Result {
    write!(f, "|")?;
    for (cell, width) in cells.zip(widths) {
        write!(f, "{:^width$}|", cell, width = *width)?;
    }
    writeln!(f)
}

// The most significant variable comes first, followed by the result column
impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let titles: Vec<&str> = self
            .variables
            .iter()
            .rev()
            .map(String::as_str)
            .chain(iter::once(RESULT_TITLE))
            .collect();
        let widths: Vec<usize> = titles.iter().map(|t| t.len() + 2).collect();
        write_row(f, &widths, titles.iter().copied())?;

        let columns = self.variables.len();
        for line in self.lines() {
            let cells = (0..columns)
                .rev()
                .map(|column| digit(variable_value_in_line(column, line)))
                .chain(iter::once(digit(self.value_at(line))));
            write_row(f, &widths, cells)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::table::*;

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("v{}", i)).collect()
    }

    #[test]
    fn construct_with_valid_variables() -> Result<(), LogicError> {
        for count in 1..=MAX_VARIABLES {
            let table = TruthTable::new(names(count))?;
            assert_eq!(table.size(), 1u128 << count);
            assert_eq!(table.num_variables(), count);
        }
        Ok(())
    }

    #[test]
    fn reject_invalid_variables() {
        let empty: Vec<String> = vec![];
        assert!(matches!(
            TruthTable::new(empty),
            Err(LogicError::InvalidArgument(_))
        ));
        assert!(matches!(
            TruthTable::new(names(MAX_VARIABLES + 1)),
            Err(LogicError::InvalidArgument(_))
        ));
        assert!(matches!(
            TruthTable::new(["a", "b", "a"]),
            Err(LogicError::InvalidArgument(_))
        ));
    }

    #[test]
    fn get_and_set() -> Result<(), LogicError> {
        let mut table = TruthTable::new(["a", "b"])?;
        for line in table.lines() {
            assert!(!table.get(line)?);
        }

        table.set(0, true)?;
        table.set(3, true)?;
        table.set(3, false)?;
        table.set(3, true)?;
        assert!(table.get(0)?);
        assert!(!table.get(1)?);
        assert!(!table.get(2)?);
        assert!(table.get(3)?);

        assert!(matches!(
            table.get(4),
            Err(LogicError::OutOfRange { index: 4, size: 4 })
        ));
        assert!(matches!(
            table.set(17, true),
            Err(LogicError::OutOfRange { .. })
        ));

        let mut wide = TruthTable::new(names(MAX_VARIABLES))?;
        assert!(!wide.get(u64::MAX)?);
        wide.set(u64::MAX, true)?;
        wide.set(1 << 40, true)?;
        assert!(wide.get(u64::MAX)?);
        assert!(wide.get(1 << 40)?);
        assert!(!wide.get(u64::MAX - 1)?);
        assert_eq!(wide.minterms(), vec![1 << 40, u64::MAX]);
        wide.set(u64::MAX, false)?;
        assert_eq!(wide.minterms(), vec![1 << 40]);
        Ok(())
    }

    #[test]
    fn line_values() {
        for columns in 0..6 {
            for line in 0..(1u64 << columns) {
                for column in 0..columns {
                    let expected = (line / (1 << column)) % 2 == 1;
                    assert_eq!(variable_value_in_line(column, line), expected);
                }
            }
        }
    }

    #[test]
    fn minterms_and_maxterms() -> Result<(), LogicError> {
        let mut table = TruthTable::new(["a", "b", "c"])?;
        table.set(6, true)?;
        table.set(1, true)?;
        table.set(4, true)?;
        assert_eq!(table.minterms(), vec![1, 4, 6]);
        assert_eq!(table.maxterms(), vec![0, 2, 3, 5, 7]);
        Ok(())
    }

    #[test]
    fn copies_are_independent() -> Result<(), LogicError> {
        let mut table = TruthTable::new(["a", "b"])?;
        table.set(0, true)?;
        let mut copy = table.clone();
        copy.set(1, true)?;

        assert!(!table.get(1)?);
        assert!(copy.get(1)?);
        assert_ne!(table, copy);
        Ok(())
    }

    #[test]
    fn structural_equality() -> Result<(), LogicError> {
        let mut t1 = TruthTable::new(["a", "b"])?;
        let mut t2 = TruthTable::new(["a", "b"])?;
        let mut t3 = TruthTable::new(["b", "a"])?;
        t1.set(1, true)?;
        t2.set(1, true)?;
        t3.set(1, true)?;
        assert_eq!(t1, t2);
        assert_ne!(t1, t3);

        // Clearing a line must not leave a trace in the comparison
        t2.set(2, true)?;
        t2.set(2, false)?;
        assert_eq!(t1, t2);
        Ok(())
    }

    #[test]
    fn display() -> Result<(), LogicError> {
        let mut table = TruthTable::new(["a", "b"])?;
        table.set(3, true)?;
        let expected = "\
| b | a | F |
| 0 | 0 | 0 |
| 0 | 1 | 0 |
| 1 | 0 | 0 |
| 1 | 1 | 1 |
";
        assert_eq!(format!("{}", table), expected);

        let table = TruthTable::new(["first"])?;
        assert_eq!(
            format!("{}", table),
            "| first | F |\n|   0   | 0 |\n|   1   | 0 |\n"
        );
        Ok(())
    }
}
