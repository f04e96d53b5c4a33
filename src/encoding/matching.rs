//! The decoded result: one outcome per proposer.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

use super::assignment::Assignment;
use super::error::Result;
use super::preferences::{PersonId, PreferenceStore};
use super::registry::{Receiver, VariableRegistry};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Matched(PersonId),
    Unmatched,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Matched(receiver) => write!(f, "w{receiver}"),
            Outcome::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// A pair that would rather be together than with their assigned partners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockingPair {
    pub receiver: PersonId,
    pub proposer: PersonId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matching {
    outcomes: BTreeMap<PersonId, Outcome>,
}

impl Matching {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the outcome of `proposer`, returning the one it replaces.
    pub fn record(&mut self, proposer: PersonId, outcome: Outcome) -> Option<Outcome> {
        self.outcomes.insert(proposer, outcome)
    }

    pub fn outcome(&self, proposer: PersonId) -> Option<Outcome> {
        self.outcomes.get(&proposer).copied()
    }

    pub fn partner_of_receiver(&self, receiver: PersonId) -> Option<PersonId> {
        self.outcomes
            .iter()
            .find(|&(_, &outcome)| outcome == Outcome::Matched(receiver))
            .map(|(&proposer, _)| proposer)
    }

    /// Proposers in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (PersonId, Outcome)> + '_ {
        self.outcomes.iter().map(|(&p, &o)| (p, o))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// One `m<id> w<id>` or `m<id> unmatched` line per proposer.
    pub fn write_result<W: Write>(&self, mut out: W) -> io::Result<()> {
        for (proposer, outcome) in self.iter() {
            writeln!(out, "m{proposer} {outcome}")?;
        }
        out.flush()
    }

    pub fn to_result_lines(&self) -> String {
        self.iter()
            .map(|(proposer, outcome)| format!("m{proposer} {outcome}\n"))
            .collect()
    }

    /// Total assignment encoding this matching. Unmatched proposers take the first sentinel.
    pub fn to_assignment(&self, registry: &VariableRegistry) -> Result<Assignment> {
        let mut assignment: Assignment = registry.iter().map(|(id, _)| (id, false)).collect();
        for (proposer, outcome) in self.iter() {
            let receiver = match outcome {
                Outcome::Matched(r) => Receiver::Real(r),
                Outcome::Unmatched => Receiver::Sentinel(1),
            };
            assignment.set(registry.variable(receiver, proposer)?, true);
        }
        Ok(assignment)
    }

    /// Every blocking pair, found by checking all receiver/proposer combinations.
    ///
    /// Being unmatched, or matched to someone not on one's list, ranks below
    /// every listed partner.
    pub fn blocking_pairs(&self, store: &PreferenceStore) -> Vec<BlockingPair> {
        let mut pairs = Vec::new();
        for receiver in store.receiver_ids() {
            let Some(ranking) = store.receiver(receiver) else {
                continue;
            };
            let current = self
                .partner_of_receiver(receiver)
                .and_then(|m| ranking.rank(m))
                .unwrap_or(ranking.len());
            for &proposer in &ranking.ids()[..current] {
                let Some(prefs) = store.proposer(proposer) else {
                    continue;
                };
                let Some(wanted) = prefs.rank(receiver) else {
                    continue;
                };
                let held = match self.outcome(proposer) {
                    Some(Outcome::Matched(r)) => prefs.rank(r).unwrap_or(prefs.len()),
                    Some(Outcome::Unmatched) | None => prefs.len(),
                };
                if wanted < held {
                    pairs.push(BlockingPair { receiver, proposer });
                }
            }
        }
        pairs
    }
}

impl FromIterator<(PersonId, Outcome)> for Matching {
    fn from_iter<T: IntoIterator<Item = (PersonId, Outcome)>>(iter: T) -> Self {
        Matching {
            outcomes: iter.into_iter().collect(),
        }
    }
}
