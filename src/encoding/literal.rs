use std::fmt;

use super::assignment::Assignment;
use super::error::Error;
use super::registry::VariableId;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    pub variable: VariableId,
    pub polarity: bool,
}

impl Literal {
    pub fn positive(variable: VariableId) -> Self {
        Literal {
            variable,
            polarity: true,
        }
    }

    pub fn negative(variable: VariableId) -> Self {
        Literal {
            variable,
            polarity: false,
        }
    }

    /// Signed DIMACS form.
    pub fn to_dimacs(self) -> i64 {
        let value = self.variable as i64;
        if self.polarity {
            value
        } else {
            -value
        }
    }

    /// Unassigned variables count as false.
    pub fn is_satisfied_by(self, assignment: &Assignment) -> bool {
        assignment.value(self.variable).unwrap_or(false) == self.polarity
    }
}

impl TryFrom<i64> for Literal {
    type Error = Error;

    fn try_from(val: i64) -> Result<Self, Self::Error> {
        if val == 0 {
            return Err(Error::MalformedCnf("0 cannot be a literal".to_string()));
        }
        Ok(Literal {
            variable: val.unsigned_abs() as VariableId,
            polarity: val > 0,
        })
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.polarity {
            write!(f, "{}", self.variable)
        } else {
            write!(f, "¬{}", self.variable)
        }
    }
}
