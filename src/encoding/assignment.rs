//! Truth values read back from a solver transcript.
//!
//! Only lines shaped like `x<id> = <0|1>` are recognised. Anything else in
//! the transcript (banners, statistics, comments) is skipped.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::registry::VariableId;

lazy_static! {
    static ref ASSIGNMENT_LINE_RE: Regex = Regex::new(r"^x(\d+)\s*=\s*([01])\b").unwrap();
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    values: BTreeMap<VariableId, bool>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an assignment from a transcript. A repeated variable keeps its last value.
    pub fn parse_transcript(text: &str) -> Self {
        let mut assignment = Assignment::new();
        let mut skipped = 0usize;
        for line in text.lines() {
            match parse_line(line.trim()) {
                Some((variable, value)) => {
                    if let Some(previous) = assignment.set(variable, value) {
                        if previous != value {
                            log::debug!("x{variable} reassigned from {previous} to {value}");
                        }
                    }
                }
                None => skipped += 1,
            }
        }
        log::debug!(
            "read {} assignments, skipped {skipped} transcript lines",
            assignment.len()
        );
        assignment
    }

    /// Returns the previous value, if any.
    pub fn set(&mut self, variable: VariableId, value: bool) -> Option<bool> {
        self.values.insert(variable, value)
    }

    pub fn value(&self, variable: VariableId) -> Option<bool> {
        self.values.get(&variable).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Variables assigned true, ascending.
    pub fn true_variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.values
            .iter()
            .filter_map(|(&variable, &value)| value.then_some(variable))
    }

    /// Renders the assignment in the transcript format it is parsed from.
    pub fn to_transcript(&self) -> String {
        self.values
            .iter()
            .map(|(variable, &value)| format!("x{variable} = {}\n", u8::from(value)))
            .collect()
    }
}

impl FromIterator<(VariableId, bool)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (VariableId, bool)>>(iter: T) -> Self {
        Assignment {
            values: iter.into_iter().collect(),
        }
    }
}

fn parse_line(line: &str) -> Option<(VariableId, bool)> {
    let captures = ASSIGNMENT_LINE_RE.captures(line)?;
    let variable = captures[1].parse().ok()?;
    Some((variable, &captures[2] == "1"))
}
