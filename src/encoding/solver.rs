//! Seam to the external SAT solver.
//!
//! The solver is an opaque synchronous dependency: it receives DIMACS text
//! and returns a transcript with `x<id> = <0|1>` lines.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use mockall::automock;

use super::builder::ClauseBuilder;
use super::decoder::decode_assignment;
use super::emitter::emit_cnf;
use super::error::{Error, Result};
use super::matching::Matching;
use super::preferences::PreferenceStore;
use super::registry::VariableRegistry;
use super::Assignment;

#[automock]
pub trait ExternalSolver {
    /// Solves the DIMACS formula and returns the raw transcript.
    fn solve(&self, cnf: &str) -> Result<String>;
}

/// Runs `program args.. <cnf file>` and reads the transcript from its stdout.
pub struct CommandSolver {
    pub program: String,
    pub args: Vec<String>,
    pub cnf_path: PathBuf,
}

impl ExternalSolver for CommandSolver {
    fn solve(&self, cnf: &str) -> Result<String> {
        fs::write(&self.cnf_path, cnf)?;
        log::info!("running {} on {}", self.program, self.cnf_path.display());
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.cnf_path)
            .output()?;

        // SAT solvers conventionally exit with 10 or 20, so only an empty
        // transcript from a failed run counts as an error.
        if !output.status.success() && output.stdout.is_empty() {
            return Err(Error::Solver(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Encodes `store`, hands the CNF to `solver` and decodes its answer.
pub fn solve_with(store: &PreferenceStore, solver: &dyn ExternalSolver) -> Result<Option<Matching>> {
    let registry = VariableRegistry::for_store(store);
    let clauses = ClauseBuilder::new(store, &registry).build()?;
    let transcript = solver.solve(&emit_cnf(&clauses))?;
    decode_assignment(&Assignment::parse_transcript(&transcript), &registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::matching::Outcome;

    const CLASSIC: &str = "m1: 1 2\nm2: 2 1\nw1: 1 2\nw2: 2 1\n";

    #[test]
    fn decodes_what_the_solver_returns() {
        let store = PreferenceStore::parse(CLASSIC).unwrap();
        let mut solver = MockExternalSolver::new();
        solver
            .expect_solve()
            .withf(|cnf| cnf.starts_with("p cnf 8 24\n"))
            .times(1)
            .returning(|_| Ok("SAT\nx1 = 1\nx2 = 0\nx3 = 0\nx4 = 1\n".to_string()));

        let matching = solve_with(&store, &solver).unwrap().unwrap();
        assert_eq!(matching.outcome(1), Some(Outcome::Matched(1)));
        assert_eq!(matching.outcome(2), Some(Outcome::Matched(2)));
        assert!(matching.blocking_pairs(&store).is_empty());
    }

    #[test]
    fn empty_transcript_is_no_result() {
        let store = PreferenceStore::parse(CLASSIC).unwrap();
        let mut solver = MockExternalSolver::new();
        solver
            .expect_solve()
            .returning(|_| Ok("UNSATISFIABLE\n".to_string()));
        assert_eq!(solve_with(&store, &solver).unwrap(), None);
    }

    #[test]
    fn solver_errors_propagate() {
        let store = PreferenceStore::parse(CLASSIC).unwrap();
        let mut solver = MockExternalSolver::new();
        solver
            .expect_solve()
            .returning(|_| Err(Error::Solver("crashed".to_string())));
        assert!(matches!(solve_with(&store, &solver), Err(Error::Solver(_))));
    }
}
