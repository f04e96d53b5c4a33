//! Turns a solver transcript back into a matching.
//!
//! The assignment is taken on trust: clauses are not re-checked here. Use
//! [`ClauseSet::first_unsatisfied`](super::clause::ClauseSet::first_unsatisfied)
//! or [`Matching::blocking_pairs`] when the solver output needs verifying.

use super::assignment::Assignment;
use super::error::{Error, Result};
use super::matching::{Matching, Outcome};
use super::registry::{Receiver, VariableRegistry};

/// Decodes a raw transcript against a persisted variable map.
///
/// Returns `Ok(None)` when the transcript holds no assignment lines at all.
pub fn decode(solver_output: &str, registry_text: &str) -> Result<Option<Matching>> {
    let registry = VariableRegistry::parse_map(registry_text)?;
    decode_assignment(&Assignment::parse_transcript(solver_output), &registry)
}

pub fn decode_assignment(
    assignment: &Assignment,
    registry: &VariableRegistry,
) -> Result<Option<Matching>> {
    if assignment.is_empty() {
        log::info!("solver output contains no assignment");
        return Ok(None);
    }

    let mut matching = Matching::new();
    for variable in assignment.true_variables() {
        let pair = registry
            .pair(variable)
            .map_err(|_| Error::UnknownVariable(variable))?;
        let outcome = match pair.receiver {
            Receiver::Real(receiver) => Outcome::Matched(receiver),
            Receiver::Sentinel(_) => Outcome::Unmatched,
        };
        if let Some(previous) = matching.record(pair.proposer, outcome) {
            if previous != outcome {
                log::warn!(
                    "m{} decoded as both {previous} and {outcome}, keeping {outcome}",
                    pair.proposer
                );
            }
        }
    }
    log::debug!("decoded outcomes for {} proposers", matching.len());
    Ok(Some(matching))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::emitter::emit_map;
    use crate::encoding::registry::SENTINEL_COUNT;

    // 1 1_1, 2 1_2, 3 2_1, 4 2_2, 5 none1_1, 6 none1_2, 7 none2_1, 8 none2_2
    fn map() -> String {
        emit_map(&VariableRegistry::build([1, 2], SENTINEL_COUNT, [1, 2]))
    }

    #[test]
    fn keeps_only_true_pairs() {
        let transcript = "SAT\nx1 = 0\nx2 = 1\nx3 = 1\nx4 = 0\nx5 = 0\nx6 = 0\nx7 = 0\nx8 = 0\n";
        let matching = decode(transcript, &map()).unwrap().unwrap();
        assert_eq!(matching.outcome(1), Some(Outcome::Matched(2)));
        assert_eq!(matching.outcome(2), Some(Outcome::Matched(1)));
        assert_eq!(matching.len(), 2);
    }

    #[test]
    fn sentinel_pairs_decode_as_unmatched() {
        let matching = decode("x1 = 1\nx8 = 1\n", &map()).unwrap().unwrap();
        assert_eq!(matching.outcome(1), Some(Outcome::Matched(1)));
        assert_eq!(matching.outcome(2), Some(Outcome::Unmatched));
        assert_eq!(matching.to_result_lines(), "m1 w1\nm2 unmatched\n");
    }

    #[test]
    fn no_assignment_lines_means_no_result() {
        assert_eq!(decode("", &map()).unwrap(), None);
        assert_eq!(decode("c UNSATISFIABLE\n", &map()).unwrap(), None);
    }

    #[test]
    fn all_false_is_an_empty_result() {
        let matching = decode("x1 = 0\n", &map()).unwrap().unwrap();
        assert!(matching.is_empty());
    }

    #[test]
    fn unknown_true_variable_is_fatal() {
        let err = decode("x1 = 1\nx99 = 1\n", &map()).unwrap_err();
        assert!(matches!(err, Error::UnknownVariable(99)));
        // False unknowns are never looked up.
        assert!(decode("x1 = 1\nx99 = 0\n", &map()).is_ok());
    }

    #[test]
    fn malformed_map_is_fatal() {
        assert!(matches!(
            decode("x1 = 1\n", "1 one_1\n"),
            Err(Error::MalformedMapLine { line: 1, .. })
        ));
    }
}
