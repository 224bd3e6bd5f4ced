use std::fmt;
use std::str::FromStr;

/// Rule used to route a sample left or right at an internal node.
///
/// Chosen once per tree and applied uniformly to every node, both while
/// searching for splits and at prediction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Predicate {
    /// `sample[feature] < value` goes left. For ordered (numeric) features.
    #[default]
    Threshold,
    /// `sample[feature] == value` goes left. For categorical features.
    Equality,
}

impl Predicate {
    /// Return `true` when `sample_value` is routed to the left child of a node
    /// that splits on `split_value`.
    #[must_use]
    pub fn goes_left<V: PartialOrd>(self, sample_value: &V, split_value: &V) -> bool {
        match self {
            Predicate::Threshold => sample_value < split_value,
            Predicate::Equality => sample_value == split_value,
        }
    }

    /// Operator shown when rendering a node.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Predicate::Threshold => "<",
            Predicate::Equality => "=",
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Threshold => write!(f, "threshold"),
            Predicate::Equality => write!(f, "equality"),
        }
    }
}

/// Error returned when parsing an unknown predicate name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown predicate: {0} (expected threshold or equality)")]
pub struct ParsePredicateError(String);

impl FromStr for Predicate {
    type Err = ParsePredicateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "threshold" => Ok(Predicate::Threshold),
            "equality" => Ok(Predicate::Equality),
            other => Err(ParsePredicateError(other.to_string())),
        }
    }
}
