//! Dense numbering of `(receiver, proposer)` pairs.
//!
//! Receivers come first in input order, then the sentinels, and for each
//! receiver every proposer in input order. Ids start at 1 so they can be
//! used directly as DIMACS variables.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;

use super::error::{Error, Result};
use super::preferences::{PersonId, PreferenceStore};

pub type VariableId = usize;

/// Number of reserved "unmatched" receivers.
pub const SENTINEL_COUNT: u8 = 2;

const SENTINEL_TOKEN: &str = "none";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Receiver {
    Real(PersonId),
    /// Stands for "proposer stays unmatched". Numbered from 1.
    Sentinel(u8),
}

impl Receiver {
    pub fn is_sentinel(self) -> bool {
        matches!(self, Receiver::Sentinel(_))
    }
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Receiver::Real(id) => write!(f, "{id}"),
            Receiver::Sentinel(n) => write!(f, "{SENTINEL_TOKEN}{n}"),
        }
    }
}

impl FromStr for Receiver {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(n) = s.strip_prefix(SENTINEL_TOKEN) {
            return n
                .parse()
                .map(Receiver::Sentinel)
                .map_err(|_| format!("bad sentinel {s:?}"));
        }
        s.parse()
            .map(Receiver::Real)
            .map_err(|_| format!("bad receiver {s:?}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    pub receiver: Receiver,
    pub proposer: PersonId,
}

impl Pair {
    pub fn new(receiver: Receiver, proposer: PersonId) -> Self {
        Pair { receiver, proposer }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}_{}", self.receiver, self.proposer)
    }
}

impl FromStr for Pair {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (receiver, proposer) = s
            .split_once('_')
            .ok_or_else(|| format!("expected `<receiver>_<proposer>`, found {s:?}"))?;
        let proposer = proposer
            .parse()
            .map_err(|_| format!("bad proposer {proposer:?}"))?;
        Ok(Pair::new(receiver.parse()?, proposer))
    }
}

/// Bijection between pairs and `1..=len()`. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableRegistry {
    pairs: Vec<Pair>,
    ids: HashMap<Pair, VariableId>,
    receivers: Vec<Receiver>,
    proposers: Vec<PersonId>,
}

impl VariableRegistry {
    pub fn build(
        receivers: impl IntoIterator<Item = PersonId>,
        sentinels: u8,
        proposers: impl IntoIterator<Item = PersonId>,
    ) -> Self {
        let receivers: Vec<Receiver> = receivers
            .into_iter()
            .map(Receiver::Real)
            .chain((1..=sentinels).map(Receiver::Sentinel))
            .collect();
        let proposers: Vec<PersonId> = proposers.into_iter().collect();

        let pairs: Vec<Pair> = receivers
            .iter()
            .flat_map(|&r| proposers.iter().map(move |&p| Pair::new(r, p)))
            .collect();
        Self::from_pairs(pairs, receivers, proposers)
    }

    pub fn for_store(store: &PreferenceStore) -> Self {
        Self::build(store.receiver_ids(), SENTINEL_COUNT, store.proposer_ids())
    }

    fn from_pairs(pairs: Vec<Pair>, receivers: Vec<Receiver>, proposers: Vec<PersonId>) -> Self {
        let ids = pairs
            .iter()
            .enumerate()
            .map(|(index, &pair)| (pair, index + 1))
            .collect();
        VariableRegistry {
            pairs,
            ids,
            receivers,
            proposers,
        }
    }

    /// Reloads a registry written by [`super::emitter::emit_map`].
    pub fn parse_map(text: &str) -> Result<Self> {
        let mut entries: Vec<(VariableId, Pair, usize)> = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let malformed = |reason: String| Error::MalformedMapLine {
                line: index + 1,
                reason,
            };
            let (id, pair) = line
                .split_once(char::is_whitespace)
                .ok_or_else(|| malformed(format!("expected `<id> <pair>`, found {line:?}")))?;
            let id: VariableId = id
                .parse()
                .map_err(|_| malformed(format!("bad variable id {id:?}")))?;
            let pair: Pair = pair.trim().parse().map_err(malformed)?;
            entries.push((id, pair, index + 1));
        }

        entries.sort_by_key(|&(id, _, _)| id);
        let mut pairs = Vec::with_capacity(entries.len());
        let mut receivers = IndexSet::new();
        let mut proposers = IndexSet::new();
        let mut seen = HashSet::new();
        for (expected, (id, pair, line)) in (1..).zip(entries) {
            if id != expected {
                return Err(Error::MalformedMapLine {
                    line,
                    reason: format!("variable {id} breaks the numbering at {expected}"),
                });
            }
            if !seen.insert(pair) {
                return Err(Error::MalformedMapLine {
                    line,
                    reason: format!("pair {pair} is registered twice"),
                });
            }
            receivers.insert(pair.receiver);
            proposers.insert(pair.proposer);
            pairs.push(pair);
        }

        Ok(Self::from_pairs(
            pairs,
            receivers.into_iter().collect(),
            proposers.into_iter().collect(),
        ))
    }

    pub fn id(&self, pair: Pair) -> Result<VariableId> {
        self.ids.get(&pair).copied().ok_or(Error::KeyNotFound(pair))
    }

    pub fn variable(&self, receiver: Receiver, proposer: PersonId) -> Result<VariableId> {
        self.id(Pair::new(receiver, proposer))
    }

    /// Fails with `IdOutOfRange` for ids outside `1..=len()`.
    pub fn pair(&self, id: VariableId) -> Result<Pair> {
        id.checked_sub(1)
            .and_then(|index| self.pairs.get(index))
            .copied()
            .ok_or(Error::IdOutOfRange(id))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Every `(id, pair)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, Pair)> + '_ {
        self.pairs.iter().enumerate().map(|(i, &p)| (i + 1, p))
    }

    /// Real receivers followed by the sentinels.
    pub fn receivers(&self) -> &[Receiver] {
        &self.receivers
    }

    pub fn real_receivers(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.receivers.iter().filter_map(|r| match r {
            Receiver::Real(id) => Some(*id),
            Receiver::Sentinel(_) => None,
        })
    }

    pub fn proposers(&self) -> &[PersonId] {
        &self.proposers
    }
}
