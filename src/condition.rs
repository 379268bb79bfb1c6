//! Restrict truth tables by fixing the value of some of their variables

use crate::table::variable_value_in_line;
use crate::{BooleanFunction, LogicError, TruthTable, TruthTableBuilder};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
enum Restriction {
    Constant(bool),
    Table(TruthTable),
}

/// A set of fixed-value conditions applied to the variables of a borrowed truth table.
///
/// Conditions are accumulated with [add_condition](Self::add_condition) and applied with
/// [process](Self::process), which keeps the lines consistent with all conditions.
/// The constrained variables are removed from the result, which can collapse to a single
/// constant value when all variables are fixed.
///
/// ```
/// use logic::TruthTable;
/// # use logic::LogicError;
/// # fn main() -> Result<(), LogicError> {
///
/// let mut table = TruthTable::new(["a", "b"])?;
/// table.set(3, true)?;
///
/// let mut condition = table.condition_builder();
/// condition.add_condition("a", true)?;
/// condition.process()?;
/// assert!(!condition.has_collapsed_to_constant()?);
/// assert_eq!(condition.truth_table()?.variables(), ["b"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct TruthTableCondition<'a> {
    table: &'a TruthTable,
    conditions: BTreeMap<usize, bool>,
    result: Option<Restriction>,
}

impl<'a> TruthTableCondition<'a> {
    pub fn new(table: &'a TruthTable) -> Self {
        Self {
            table,
            conditions: BTreeMap::new(),
            result: None,
        }
    }

    /// Fix the value of a variable, replacing any previous condition on it
    pub fn add_condition(&mut self, variable: &str, value: bool) -> Result<&mut Self, LogicError> {
        let column = self.table.variable_index(variable).ok_or_else(|| {
            LogicError::InvalidArgument(format!(
                "the variable '{}' is not part of the truth table",
                variable
            ))
        })?;
        self.conditions.insert(column, value);
        Ok(self)
    }

    /// Apply all recorded conditions to the table, discarding the previous result
    pub fn process(&mut self) -> Result<(), LogicError> {
        let mut builder = TruthTableBuilder::default();
        builder.set_variables(
            self.table
                .variables()
                .iter()
                .enumerate()
                .filter(|(column, _)| !self.conditions.contains_key(column))
                .map(|(_, name)| name.as_str()),
        );

        let mut next_line = 0;
        for line in self.table.lines() {
            let consistent = self
                .conditions
                .iter()
                .all(|(column, value)| variable_value_in_line(*column, line) == *value);
            if consistent {
                builder.set(next_line, self.table.value_at(line));
                next_line += 1;
            }
        }

        self.result = Some(match builder.len() {
            1 => Restriction::Constant(builder.get_value(0)),
            _ => Restriction::Table(builder.build()?),
        });
        Ok(())
    }

    fn processed(&self) -> Result<&Restriction, LogicError> {
        self.result.as_ref().ok_or_else(|| {
            LogicError::IllegalState("the conditions have not been processed yet".into())
        })
    }

    /// Test if all variables of the table have been fixed by the last processing
    pub fn has_collapsed_to_constant(&self) -> Result<bool, LogicError> {
        Ok(matches!(self.processed()?, Restriction::Constant(_)))
    }

    /// The only remaining value when the table collapsed
    pub fn constant(&self) -> Result<bool, LogicError> {
        match self.processed()? {
            Restriction::Constant(b) => Ok(*b),
            Restriction::Table(_) => Err(LogicError::IllegalState(
                "the conditions did not collapse to a constant".into(),
            )),
        }
    }

    /// The reduced table when some variables remain free
    pub fn truth_table(&self) -> Result<&TruthTable, LogicError> {
        match self.processed()? {
            Restriction::Table(t) => Ok(t),
            Restriction::Constant(_) => Err(LogicError::IllegalState(
                "the conditions collapsed to a constant".into(),
            )),
        }
    }

    /// Wrap the last result into a Boolean function
    pub fn result(&self) -> Result<BooleanFunction, LogicError> {
        Ok(match self.processed()? {
            Restriction::Constant(b) => BooleanFunction::Constant(*b),
            Restriction::Table(t) => BooleanFunction::Table(t.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::condition::*;

    // a | (b & !c)
    fn sample() -> Result<TruthTable, LogicError> {
        let mut table = TruthTable::new(["a", "b", "c"])?;
        for line in table.lines() {
            let a = variable_value_in_line(0, line);
            let b = variable_value_in_line(1, line);
            let c = variable_value_in_line(2, line);
            table.set(line, a || (b && !c))?;
        }
        Ok(table)
    }

    #[test]
    fn query_before_processing() -> Result<(), LogicError> {
        let table = sample()?;
        let mut condition = table.condition_builder();
        condition.add_condition("a", true)?;
        assert!(matches!(
            condition.has_collapsed_to_constant(),
            Err(LogicError::IllegalState(_))
        ));
        assert!(matches!(
            condition.constant(),
            Err(LogicError::IllegalState(_))
        ));
        assert!(matches!(
            condition.truth_table(),
            Err(LogicError::IllegalState(_))
        ));
        Ok(())
    }

    #[test]
    fn unknown_variable() -> Result<(), LogicError> {
        let table = sample()?;
        let mut condition = table.condition_builder();
        assert!(matches!(
            condition.add_condition("d", true),
            Err(LogicError::InvalidArgument(_))
        ));
        Ok(())
    }

    #[test]
    fn reduce_table() -> Result<(), LogicError> {
        let table = sample()?;
        let mut condition = table.condition_builder();
        condition.add_condition("b", true)?;
        condition.process()?;
        assert!(!condition.has_collapsed_to_constant()?);

        // a | !c remains
        let reduced = condition.truth_table()?;
        assert_eq!(reduced.variables(), ["a", "c"]);
        assert_eq!(reduced.minterms(), vec![0, 1, 3]);
        assert!(matches!(
            condition.constant(),
            Err(LogicError::IllegalState(_))
        ));
        Ok(())
    }

    #[test]
    fn collapse_to_constant() -> Result<(), LogicError> {
        let table = sample()?;
        for line in table.lines() {
            let mut condition = table.condition_builder();
            for (column, name) in table.variables().iter().enumerate() {
                condition.add_condition(name, variable_value_in_line(column, line))?;
            }
            condition.process()?;
            assert!(condition.has_collapsed_to_constant()?);
            assert_eq!(condition.constant()?, table.get(line)?);
            assert!(matches!(
                condition.truth_table(),
                Err(LogicError::IllegalState(_))
            ));
        }
        Ok(())
    }

    #[test]
    fn replace_and_accumulate_conditions() -> Result<(), LogicError> {
        let table = sample()?;
        let mut condition = table.condition_builder();
        condition.add_condition("a", true)?.add_condition("a", false)?;
        condition.process()?;

        // b & !c remains
        assert_eq!(condition.truth_table()?.variables(), ["b", "c"]);
        assert_eq!(condition.truth_table()?.minterms(), vec![1]);

        // Conditions are kept across processing
        condition.add_condition("c", false)?;
        condition.process()?;
        assert_eq!(condition.truth_table()?.variables(), ["b"]);
        assert_eq!(condition.truth_table()?.minterms(), vec![1]);
        Ok(())
    }

    #[test]
    fn process_is_idempotent() -> Result<(), LogicError> {
        let table = sample()?;
        let mut condition = table.condition_builder();
        condition.add_condition("c", true)?;
        condition.process()?;
        let first = condition.result()?;
        condition.process()?;
        assert_eq!(first, condition.result()?);
        Ok(())
    }

    #[test]
    fn no_condition_keeps_table() -> Result<(), LogicError> {
        let table = sample()?;
        let mut condition = table.condition_builder();
        condition.process()?;
        assert_eq!(condition.truth_table()?, &table);
        Ok(())
    }
}
