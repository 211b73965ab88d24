//! History condition expressions.
//!
//! A [`Condition`] is a boolean expression over the ordered history of node
//! names already executed in a scenario (oldest first). Conditions are pure
//! data: evaluation lives in `trellis-eval`, this module only defines the
//! expression tree, its combinators, and the node names it references.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Boolean expression over an execution history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// True iff some contiguous window of the history equals `names`.
    Sequence { names: Vec<String> },
    /// True iff `newer` occurs in the history and its latest occurrence is
    /// more recent than the latest occurrence of `older` (or `older` never
    /// occurs).
    MoreRecent { older: String, newer: String },
    /// True iff the history is non-empty and its last element is in `names`.
    LastIn { names: BTreeSet<String> },
    And {
        left: Box<Condition>,
        right: Box<Condition>,
    },
    Or {
        left: Box<Condition>,
        right: Box<Condition>,
    },
    Not { inner: Box<Condition> },
}

impl Condition {
    /// `names` executed back to back, anywhere in the history.
    pub fn sequence<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::Sequence {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// `newer` was executed more recently than `older`.
    pub fn more_recent(older: impl Into<String>, newer: impl Into<String>) -> Self {
        Condition::MoreRecent {
            older: older.into(),
            newer: newer.into(),
        }
    }

    /// The last executed node is one of `names`.
    pub fn last_in<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::LastIn {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn and(self, other: Condition) -> Self {
        and(self, other)
    }

    pub fn or(self, other: Condition) -> Self {
        or(self, other)
    }

    pub fn negate(self) -> Self {
        not(self)
    }

    /// Every node name mentioned anywhere in the expression.
    pub fn referenced_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Condition::Sequence { names } => out.extend(names.iter().map(String::as_str)),
            Condition::MoreRecent { older, newer } => {
                out.insert(older.as_str());
                out.insert(newer.as_str());
            }
            Condition::LastIn { names } => out.extend(names.iter().map(String::as_str)),
            Condition::And { left, right } | Condition::Or { left, right } => {
                left.collect_names(out);
                right.collect_names(out);
            }
            Condition::Not { inner } => inner.collect_names(out),
        }
    }
}

/// Both conditions hold.
pub fn and(left: Condition, right: Condition) -> Condition {
    Condition::And {
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// At least one condition holds.
pub fn or(left: Condition, right: Condition) -> Condition {
    Condition::Or {
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// The condition does not hold.
pub fn not(inner: Condition) -> Condition {
    Condition::Not {
        inner: Box::new(inner),
    }
}
