use std::fmt;

use itertools::Itertools;

use super::assignment::Assignment;
use super::error::Result;
use super::literal::Literal;
use super::registry::VariableId;

#[derive(Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<Literal>,
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lit in &self.literals {
            write!(f, "{:?},", lit)?;
        }
        Ok(())
    }
}

/// DIMACS line body, including the terminating `0`.
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lit in &self.literals {
            write!(f, "{} ", lit)?;
        }
        write!(f, "0")
    }
}

impl Clause {
    pub fn new(literals: Vec<Literal>) -> Clause {
        Clause { literals }
    }

    /// Fails on a `0` literal.
    pub fn new_vec(arr: Vec<Vec<i64>>) -> Result<Vec<Clause>> {
        arr.into_iter()
            .map(|v| {
                v.into_iter()
                    .map(Literal::try_from)
                    .collect::<Result<Vec<_>>>()
                    .map(Clause::new)
            })
            .collect()
    }

    /// `v1 ∨ v2 ∨ ...`
    pub fn at_least_one(variables: &[VariableId]) -> Clause {
        Clause::new(variables.iter().copied().map(Literal::positive).collect())
    }

    /// `¬a ∨ ¬b` for every unordered pair of distinct variables.
    pub fn at_most_one(variables: &[VariableId]) -> impl Iterator<Item = Clause> + '_ {
        variables
            .iter()
            .tuple_combinations()
            .map(|(&a, &b)| Clause::new(vec![Literal::negative(a), Literal::negative(b)]))
    }

    /// Exactly-one as one at-least-one clause followed by the pairwise at-most-one clauses.
    pub fn exactly_one(variables: Vec<VariableId>) -> impl Iterator<Item = Clause> {
        let at_least = Clause::at_least_one(&variables);
        let at_most: Vec<Clause> = Clause::at_most_one(&variables).collect();
        std::iter::once(at_least).chain(at_most)
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.literals.iter().any(|l| l.is_satisfied_by(assignment))
    }

    pub fn to_dimacs(&self) -> Vec<i64> {
        self.literals.iter().map(|l| l.to_dimacs()).collect()
    }
}

/// Every generated clause, in emission order, plus the variable count for the header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClauseSet {
    pub num_vars: usize,
    pub clauses: Vec<Clause>,
}

impl ClauseSet {
    pub fn new(num_vars: usize, clauses: Vec<Clause>) -> Self {
        ClauseSet { num_vars, clauses }
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.clauses.iter()
    }

    /// Index and clause of the first clause the assignment falsifies.
    pub fn first_unsatisfied(&self, assignment: &Assignment) -> Option<(usize, &Clause)> {
        self.clauses
            .iter()
            .enumerate()
            .find(|(_, clause)| !clause.is_satisfied_by(assignment))
    }
}
