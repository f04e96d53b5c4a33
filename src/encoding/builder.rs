//! Generates the CNF encoding of a stable matching.
//!
//! Three clause families are produced, in this order:
//! - every real receiver is paired with exactly one proposer,
//! - every proposer is paired with exactly one receiver or sentinel,
//! - no receiver/proposer pair blocks the matching.
//!
//! Each family is a lazy sequence so it can be inspected on its own.

use itertools::Either;

use super::clause::{Clause, ClauseSet};
use super::error::Result;
use super::literal::Literal;
use super::preferences::{PersonId, PreferenceList, PreferenceStore};
use super::registry::{Pair, Receiver, VariableId, VariableRegistry};

#[derive(Clone, Copy)]
pub struct ClauseBuilder<'a> {
    store: &'a PreferenceStore,
    registry: &'a VariableRegistry,
}

impl<'a> ClauseBuilder<'a> {
    pub fn new(store: &'a PreferenceStore, registry: &'a VariableRegistry) -> Self {
        ClauseBuilder { store, registry }
    }

    /// The numbering the clauses refer to, for emission next to the CNF.
    pub fn registry(&self) -> &'a VariableRegistry {
        self.registry
    }

    /// Collects all three families.
    pub fn build(&self) -> Result<ClauseSet> {
        let mut clauses = Vec::new();

        clauses.extend(self.receiver_cardinality().collect::<Result<Vec<_>>>()?);
        log::debug!("receiver cardinality: {} clauses", clauses.len());

        let before = clauses.len();
        clauses.extend(self.proposer_cardinality().collect::<Result<Vec<_>>>()?);
        log::debug!("proposer cardinality: {} clauses", clauses.len() - before);

        let before = clauses.len();
        clauses.extend(self.stability().collect::<Result<Vec<_>>>()?);
        log::debug!("stability: {} clauses", clauses.len() - before);

        log::info!(
            "encoded {} variables into {} clauses",
            self.registry.len(),
            clauses.len()
        );
        Ok(ClauseSet::new(self.registry.len(), clauses))
    }

    /// Exactly one proposer per real receiver. Sentinels are left unconstrained.
    pub fn receiver_cardinality(&self) -> impl Iterator<Item = Result<Clause>> + 'a {
        let registry = self.registry;
        registry.real_receivers().flat_map(move |r| {
            let receiver = Receiver::Real(r);
            exactly_one(
                registry
                    .proposers()
                    .iter()
                    .map(|&p| registry.variable(receiver, p))
                    .collect(),
            )
        })
    }

    /// Exactly one receiver or sentinel per proposer.
    pub fn proposer_cardinality(&self) -> impl Iterator<Item = Result<Clause>> + 'a {
        let registry = self.registry;
        registry.proposers().iter().flat_map(move |&p| {
            exactly_one(
                registry
                    .receivers()
                    .iter()
                    .map(|&r| registry.variable(r, p))
                    .collect(),
            )
        })
    }

    /// No-blocking-pair clauses for every receiver with a preference list.
    pub fn stability(&self) -> impl Iterator<Item = Result<Clause>> + 'a {
        let this = *self;
        self.store
            .receiver_ids()
            .flat_map(move |f| this.stability_for(f))
    }

    /// Clauses `¬(f, m) ∨ ¬(c, m')` for each `m'` that `f` ranks above `m` and
    /// that ranks `f` above its competitor `c`. Sentinels and receivers missing
    /// from the list of `m'` rank below every listed receiver.
    pub fn stability_for(&self, f: PersonId) -> impl Iterator<Item = Result<Clause>> + 'a {
        let store = self.store;
        let registry = self.registry;
        let ranking: &'a [PersonId] = store.receiver(f).map(PreferenceList::ids).unwrap_or(&[]);

        ranking.iter().enumerate().flat_map(move |(rank, &m)| {
            ranking[..rank].iter().flat_map(move |&better| {
                let better_prefs = store.proposer(better);
                registry
                    .receivers()
                    .iter()
                    .filter(move |&&c| c != Receiver::Real(f))
                    .filter_map(move |&c| {
                        let prefs = better_prefs?;
                        let f_rank = prefs.rank(f)?;
                        (f_rank < competitor_rank(prefs, c)).then(|| {
                            blocking_clause(
                                registry,
                                Pair::new(Receiver::Real(f), m),
                                Pair::new(c, better),
                            )
                        })
                    })
            })
        })
    }
}

fn competitor_rank(prefs: &PreferenceList, competitor: Receiver) -> usize {
    match competitor {
        Receiver::Real(id) => prefs.rank(id).unwrap_or(prefs.len()),
        Receiver::Sentinel(_) => prefs.len(),
    }
}

fn blocking_clause(registry: &VariableRegistry, current: Pair, rival: Pair) -> Result<Clause> {
    Ok(Clause::new(vec![
        Literal::negative(registry.id(current)?),
        Literal::negative(registry.id(rival)?),
    ]))
}

fn exactly_one(
    variables: Result<Vec<VariableId>>,
) -> impl Iterator<Item = Result<Clause>> {
    match variables {
        Ok(variables) => Either::Left(Clause::exactly_one(variables).map(Ok)),
        Err(e) => Either::Right(std::iter::once(Err(e))),
    }
}
