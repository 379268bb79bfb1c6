use crate::table::table_size;
use crate::{LogicError, TruthTable};
use std::collections::BTreeSet;

/// Accumulate the lines of a truth table before its shape is known to be valid.
///
/// Intermediate combinations of tables can declare the same variable several times or grow one
/// line at a time. The builder tolerates these states and validates the result only when it is
/// [built](TruthTableBuilder::build) into a [TruthTable].
#[derive(Clone, Debug, Default)]
pub struct TruthTableBuilder {
    variables: Vec<String>,
    values: BTreeSet<u64>,
    len: u128,
}

impl TruthTableBuilder {
    /// Replace the list of variables, duplicates are accepted at this stage
    pub fn set_variables<S: Into<String>>(&mut self, variables: impl IntoIterator<Item = S>) {
        self.variables = variables.into_iter().map(Into::into).collect();
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Assign a line, growing the table with ```false``` lines if needed
    pub fn set(&mut self, line: u64, value: bool) {
        self.len = self.len.max(line as u128 + 1);
        match value {
            true => self.values.insert(line),
            false => self.values.remove(&line),
        };
    }

    /// Raw read of a line, lines which have not been assigned are ```false```
    pub fn get_value(&self, line: u64) -> bool {
        self.values.contains(&line)
    }

    /// The number of lines accumulated so far
    pub fn len(&self) -> u128 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The size expected from the current list of variables
    pub fn tentative_size(&self) -> u128 {
        table_size(self.variables.len())
    }

    /// Validate the accumulated lines and freeze them into a truth table.
    ///
    /// The number of lines must be a power of two greater than one and match the number of
    /// variables, which must be unique.
    pub fn build(self) -> Result<TruthTable, LogicError> {
        if self.len < 2 || !self.len.is_power_of_two() {
            return Err(LogicError::IllegalTruthTable(format!(
                "the size {} is not a power of two greater than 1",
                self.len
            )));
        }
        if self.len != self.tentative_size() {
            return Err(LogicError::IllegalTruthTable(format!(
                "{} lines do not match the {} declared variables",
                self.len,
                self.variables.len()
            )));
        }
        let table = TruthTable::new(self.variables)
            .map_err(|e| LogicError::IllegalTruthTable(e.to_string()))?;
        Ok(table.with_values(self.values))
    }
}
