use thiserror::Error;

use super::preferences::{PersonId, Side};
use super::registry::{Pair, VariableId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("{side} {id} is defined twice")]
    DuplicatePerson { side: Side, id: PersonId },

    #[error("{side} {id} lists {target} more than once")]
    DuplicatePreference {
        side: Side,
        id: PersonId,
        target: PersonId,
    },

    #[error("{side} {id} lists unknown {} {target}", .side.other())]
    UnknownPerson {
        side: Side,
        id: PersonId,
        target: PersonId,
    },

    #[error("no variable registered for pair {0}")]
    KeyNotFound(Pair),

    #[error("variable {0} is outside the registered range")]
    IdOutOfRange(VariableId),

    #[error("variable {0} has no registry entry")]
    UnknownVariable(VariableId),

    #[error("variable map line {line}: {reason}")]
    MalformedMapLine { line: usize, reason: String },

    #[error("invalid DIMACS input: {0}")]
    MalformedCnf(String),

    #[error("external solver failed: {0}")]
    Solver(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
