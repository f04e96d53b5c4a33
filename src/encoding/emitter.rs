//! Text artifacts handed across the solver boundary.
//!
//! The CNF is standard DIMACS: a `p cnf <vars> <clauses>` header and one
//! clause per line terminated by `0`. The variable map has one
//! `<id> <receiver>_<proposer>` line per variable, in id order.

use std::io::{self, Write};

use super::clause::ClauseSet;
use super::registry::VariableRegistry;

pub fn write_cnf<W: Write>(clauses: &ClauseSet, mut out: W) -> io::Result<()> {
    writeln!(out, "p cnf {} {}", clauses.num_vars, clauses.len())?;
    for clause in clauses.iter() {
        writeln!(out, "{clause}")?;
    }
    out.flush()
}

pub fn write_map<W: Write>(registry: &VariableRegistry, mut out: W) -> io::Result<()> {
    for (id, pair) in registry.iter() {
        writeln!(out, "{id} {pair}")?;
    }
    out.flush()
}

pub fn emit_cnf(clauses: &ClauseSet) -> String {
    let header = format!("p cnf {} {}\n", clauses.num_vars, clauses.len());
    clauses
        .iter()
        .fold(header, |out, clause| out + &clause.to_string() + "\n")
}

pub fn emit_map(registry: &VariableRegistry) -> String {
    registry
        .iter()
        .map(|(id, pair)| format!("{id} {pair}\n"))
        .collect()
}
