//! CNF encoding of the stable matching problem and decoding of solver answers.

pub mod assignment;
pub mod builder;
pub mod clause;
pub mod decoder;
pub mod emitter;
pub mod error;
pub mod literal;
pub mod matching;
pub mod preferences;
pub mod registry;
pub mod solver;

pub use assignment::Assignment;
pub use builder::ClauseBuilder;
pub use clause::{Clause, ClauseSet};
pub use decoder::{decode, decode_assignment};
pub use emitter::{emit_cnf, emit_map, write_cnf, write_map};
pub use error::{Error, Result};
pub use literal::Literal;
pub use matching::{BlockingPair, Matching, Outcome};
pub use preferences::{PersonId, PreferenceList, PreferenceStore, Side};
pub use registry::{Pair, Receiver, VariableId, VariableRegistry, SENTINEL_COUNT};
pub use solver::{solve_with, CommandSolver, ExternalSolver};
