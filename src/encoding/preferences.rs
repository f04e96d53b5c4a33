//! Ranked preference lists of both populations.
//!
//! Input lines look like `m1: 2 1 3` for proposers and `w2: 1 3` for
//! receivers, ids in decreasing order of preference. Omitting somebody
//! marks them unacceptable. Blank lines and `#` comments are skipped.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use super::error::{Error, Result};

pub type PersonId = u32;

/// Which population a person belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Proposer,
    Receiver,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Proposer => Side::Receiver,
            Side::Receiver => Side::Proposer,
        }
    }

    pub fn prefix(self) -> char {
        match self {
            Side::Proposer => 'm',
            Side::Receiver => 'w',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Proposer => write!(f, "proposer"),
            Side::Receiver => write!(f, "receiver"),
        }
    }
}

/// A strict ranking, most preferred first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreferenceList {
    order: Vec<PersonId>,
    ranks: HashMap<PersonId, usize>,
}

impl PreferenceList {
    pub fn ids(&self) -> &[PersonId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Zero-based position of `id`, `None` if `id` is unacceptable.
    pub fn rank(&self, id: PersonId) -> Option<usize> {
        self.ranks.get(&id).copied()
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.ranks.contains_key(&id)
    }
}

/// Both populations' preferences, kept in input order.
#[derive(Clone, Debug, Default)]
pub struct PreferenceStore {
    proposers: IndexMap<PersonId, PreferenceList>,
    receivers: IndexMap<PersonId, PreferenceList>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parses a whole preference file and checks cross references.
    pub fn parse(text: &str) -> Result<Self> {
        let mut store = Self::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (side, id, list) = parse_line(line).map_err(|reason| Error::MalformedLine {
                line: index + 1,
                reason,
            })?;
            store.insert(side, id, list)?;
        }
        store.validate()?;
        log::debug!(
            "loaded {} proposers and {} receivers",
            store.proposers.len(),
            store.receivers.len()
        );
        Ok(store)
    }

    /// Adds one person's ranking. Cross references are checked by `validate`.
    pub fn insert(&mut self, side: Side, id: PersonId, ranking: Vec<PersonId>) -> Result<()> {
        let mut ranks = HashMap::with_capacity(ranking.len());
        for (rank, &target) in ranking.iter().enumerate() {
            if ranks.insert(target, rank).is_some() {
                return Err(Error::DuplicatePreference { side, id, target });
            }
        }
        let list = PreferenceList {
            order: ranking,
            ranks,
        };
        let population = match side {
            Side::Proposer => &mut self.proposers,
            Side::Receiver => &mut self.receivers,
        };
        if population.contains_key(&id) {
            return Err(Error::DuplicatePerson { side, id });
        }
        population.insert(id, list);
        Ok(())
    }

    /// Fails on the first list entry that names nobody in the other population.
    pub fn validate(&self) -> Result<()> {
        let sides = [
            (Side::Proposer, &self.proposers, &self.receivers),
            (Side::Receiver, &self.receivers, &self.proposers),
        ];
        for (side, population, others) in sides {
            for (&id, list) in population {
                if let Some(&target) = list.ids().iter().find(|t| !others.contains_key(*t)) {
                    return Err(Error::UnknownPerson { side, id, target });
                }
            }
        }
        Ok(())
    }

    pub fn proposer_ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.proposers.keys().copied()
    }

    pub fn receiver_ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.receivers.keys().copied()
    }

    pub fn proposer(&self, id: PersonId) -> Option<&PreferenceList> {
        self.proposers.get(&id)
    }

    pub fn receiver(&self, id: PersonId) -> Option<&PreferenceList> {
        self.receivers.get(&id)
    }

    pub fn list(&self, side: Side, id: PersonId) -> Option<&PreferenceList> {
        match side {
            Side::Proposer => self.proposer(id),
            Side::Receiver => self.receiver(id),
        }
    }

    /// Rank `of` holds in the list of `who`, if `who` exists and finds `of` acceptable.
    pub fn rank(&self, side: Side, who: PersonId, of: PersonId) -> Option<usize> {
        self.list(side, who).and_then(|list| list.rank(of))
    }
}

fn parse_line(line: &str) -> std::result::Result<(Side, PersonId, Vec<PersonId>), String> {
    let side = match line.chars().next() {
        Some('m') => Side::Proposer,
        Some('w') => Side::Receiver,
        _ => return Err(format!("expected `m<id>:` or `w<id>:`, found {line:?}")),
    };
    let (head, tail) = line
        .split_once(':')
        .ok_or_else(|| format!("missing `:` in {line:?}"))?;
    let id = parse_id(head[1..].trim())?;
    let ranking = tail
        .split_whitespace()
        .map(parse_id)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((side, id, ranking))
}

fn parse_id(token: &str) -> std::result::Result<PersonId, String> {
    token
        .parse()
        .map_err(|_| format!("{token:?} is not a person id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_populations_in_order() {
        let store = PreferenceStore::parse("m2: 1 2\nm1: 2\n\n# comment\nw1: 1 2\nw2: 2 1\n")
            .unwrap();
        assert_eq!(store.proposer_ids().collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(store.receiver_ids().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(store.proposer(1).unwrap().ids(), &[2]);
        assert_eq!(store.rank(Side::Receiver, 2, 1), Some(1));
        assert_eq!(store.rank(Side::Proposer, 1, 1), None);
    }

    #[test]
    fn empty_list_is_allowed() {
        let store = PreferenceStore::parse("m1:\nw1: 1").unwrap();
        assert!(store.proposer(1).unwrap().is_empty());
    }

    #[test]
    fn reports_line_of_malformed_input() {
        let err = PreferenceStore::parse("m1: 1\nx2: 1\n").unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line: 2, .. }));

        let err = PreferenceStore::parse("m1 1 2").unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line: 1, .. }));

        let err = PreferenceStore::parse("w1: 1 two").unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn rejects_unknown_references() {
        let err = PreferenceStore::parse("m1: 1 3\nw1: 1").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownPerson {
                side: Side::Proposer,
                id: 1,
                target: 3
            }
        ));
    }

    #[test]
    fn rejects_duplicates() {
        let err = PreferenceStore::parse("m1: 1 1\nw1: 1").unwrap_err();
        assert!(matches!(err, Error::DuplicatePreference { .. }));

        let err = PreferenceStore::parse("m1: 1\nm1: 1\nw1: 1").unwrap_err();
        assert!(matches!(err, Error::DuplicatePerson { id: 1, .. }));
    }
}
