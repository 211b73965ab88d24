//! Condition evaluator.
//!
//! Evaluates [`Condition`] trees and [`Guard`]s against an execution history:
//! the node names already executed in the scenario, oldest first. Every
//! primitive is pure, so evaluation is a plain recursive fold.

use trellis_core::{Condition, Guard};

/// Evaluate `condition` over `history`.
pub fn eval_condition<S: AsRef<str>>(condition: &Condition, history: &[S]) -> bool {
    match condition {
        Condition::Sequence { names } => contains_window(history, names),
        Condition::MoreRecent { older, newer } => more_recent(history, older, newer),
        Condition::LastIn { names } => history
            .last()
            .is_some_and(|last| names.contains(last.as_ref())),
        Condition::And { left, right } => {
            eval_condition(left, history) && eval_condition(right, history)
        }
        Condition::Or { left, right } => {
            eval_condition(left, history) || eval_condition(right, history)
        }
        Condition::Not { inner } => !eval_condition(inner, history),
    }
}

/// Whether `guard` accepts `history`.
///
/// A predecessor guard inspects only the last executed node and never
/// accepts an empty history.
pub fn guard_accepts<S: AsRef<str>>(guard: &Guard, history: &[S]) -> bool {
    match guard {
        Guard::Predecessors(names) => history
            .last()
            .is_some_and(|last| names.contains(last.as_ref())),
        Guard::When(condition) => eval_condition(condition, history),
    }
}

/// An absent guard accepts every history.
pub fn optional_guard_accepts<S: AsRef<str>>(guard: Option<&Guard>, history: &[S]) -> bool {
    guard.map_or(true, |g| guard_accepts(g, history))
}

fn contains_window<S: AsRef<str>>(history: &[S], names: &[String]) -> bool {
    if names.is_empty() {
        return true;
    }
    history.windows(names.len()).any(|window| {
        window
            .iter()
            .zip(names)
            .all(|(seen, expected)| seen.as_ref() == expected.as_str())
    })
}

fn more_recent<S: AsRef<str>>(history: &[S], older: &str, newer: &str) -> bool {
    let Some(newer_at) = history.iter().rposition(|n| n.as_ref() == newer) else {
        return false;
    };
    match history.iter().rposition(|n| n.as_ref() == older) {
        None => true,
        Some(older_at) => newer_at > older_at,
    }
}
