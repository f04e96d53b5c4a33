use dimacs::*;
use std::fs;
use std::path::Path;

use crate::encoding::{Clause, ClauseSet, Error, Result};

/// Reads a DIMACS CNF, e.g. one produced by the emitter, back into clauses.
pub fn read_cnf(contents: &str) -> Result<ClauseSet> {
    let (num_vars, clauses) = match parse_dimacs(contents)
        .map_err(|e| Error::MalformedCnf(format!("{e:?}")))?
    {
        Instance::Cnf { num_vars, clauses } => (num_vars, clauses),
        Instance::Sat { .. } => {
            return Err(Error::MalformedCnf(
                "received SAT input, expected CNF".to_string(),
            ))
        }
    };
    let mut cnf_vec: Vec<Vec<i64>> = vec![];
    for clause in clauses.iter() {
        let mut clause_vec = Vec::new();
        for l in clause.lits().iter() {
            let val = l.var().to_u64() as i64;
            clause_vec.push(match l.sign() {
                Sign::Pos => val,
                Sign::Neg => -val,
            });
        }
        cnf_vec.push(clause_vec);
    }
    Ok(ClauseSet::new(num_vars as usize, Clause::new_vec(cnf_vec)?))
}

pub fn read_cnf_file(path: impl AsRef<Path>) -> Result<ClauseSet> {
    let contents = fs::read_to_string(path)?;
    read_cnf(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{emit_cnf, ClauseBuilder, PreferenceStore, VariableRegistry};

    #[test]
    fn reads_back_emitted_cnf() {
        let store = PreferenceStore::parse("m1: 1 2\nm2: 2 1\nw1: 2 1\nw2: 1 2\n").unwrap();
        let registry = VariableRegistry::for_store(&store);
        let clauses = ClauseBuilder::new(&store, &registry).build().unwrap();
        let parsed = read_cnf(&emit_cnf(&clauses)).unwrap();
        assert_eq!(parsed, clauses);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            read_cnf("p cnf 2 1\n1 x 0\n"),
            Err(Error::MalformedCnf(_))
        ));
    }
}
