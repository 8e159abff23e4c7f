//! Flow-sensitive linearity checking.
//!
//! A binding whose declared universe is [`Universe::Linear`] must be consumed
//! exactly once along every path from its declaration to the end of its
//! scope. This module walks a small statement-level representation of a
//! function body and tracks, per binding, whether it has been consumed,
//! borrowed, or left untouched at each program point.
//!
//! The checker is independent of the surface grammar: callers build a
//! [`Stmt`] tree themselves (from a function body, once one exists) and hand
//! it to [`check`] together with the set of bindings in scope.

use std::collections::HashMap;
use std::ops::Range;

use crate::file::SourceFile;
use crate::tir::error::TirError;
use crate::tir::universe::Universe;

/// A stable handle into the binding arena passed to [`check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub usize);

/// Static information about one binding: its name, universe, and the
/// position of its declaration (used when it is never consumed).
#[derive(Debug, Clone)]
pub struct BindingMeta {
    pub name: String,
    pub universe: Universe,
    pub declared_position: Range<usize>,
}

/// One node of the statement tree the checker walks.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// Consumes `binding` exactly here (a function-call argument, a `return`,
    /// a move into a field, ...).
    Consume { binding: BindingId, position: Range<usize> },
    /// Splits `binding` into `fields`, each of which must itself be consumed.
    /// `binding` itself counts as consumed by the destructure.
    Destructure { binding: BindingId, fields: Vec<BindingId>, position: Range<usize> },
    /// A read- or write-scoped borrow: `body` runs with `binding` borrowed,
    /// and the borrow is released (but `binding` is NOT consumed) afterward.
    Borrow { binding: BindingId, mutable: bool, position: Range<usize>, body: Vec<Stmt> },
    /// Two mutually exclusive branches; both must agree on the consumption
    /// state of every outer binding when they rejoin.
    If { position: Range<usize>, then_branch: Vec<Stmt>, else_branch: Vec<Stmt> },
    /// A body that may execute zero or more times. Per the loop rule, the
    /// state entering the loop must equal the state leaving one iteration.
    Loop { body: Vec<Stmt> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsumptionState {
    Unconsumed,
    Consumed,
    BorrowedRead,
    BorrowedWrite,
}

#[derive(Debug, Clone)]
struct Entry {
    state: ConsumptionState,
    last_position: Range<usize>,
}

struct Checker<'base> {
    source: SourceFile,
    bindings: &'base [BindingMeta],
}

type Env = HashMap<usize, Entry>;

impl<'base> Checker<'base> {
    fn meta(&self, binding: BindingId) -> &BindingMeta {
        &self.bindings[binding.0]
    }

    fn tracked(&self, binding: BindingId) -> bool {
        self.meta(binding).universe.is_linear()
    }

    fn consume(&self, env: &mut Env, binding: BindingId, position: Range<usize>) -> Result<(), TirError> {
        if !self.tracked(binding) {
            return Ok(());
        }

        let meta = self.meta(binding);
        let current = env.entry(binding.0).or_insert_with(|| Entry {
            state: ConsumptionState::Unconsumed,
            last_position: meta.declared_position.clone(),
        });

        match current.state {
            ConsumptionState::Consumed => {
                return Err(TirError::value_consumed_twice(
                    meta.name.clone(),
                    position,
                    current.last_position.clone(),
                    self.source.clone(),
                ));
            }
            ConsumptionState::BorrowedRead | ConsumptionState::BorrowedWrite => {
                return Err(TirError::value_consumed_twice(
                    meta.name.clone(),
                    position.clone(),
                    current.last_position.clone(),
                    self.source.clone(),
                ));
            }
            ConsumptionState::Unconsumed => {}
        }

        current.state = ConsumptionState::Consumed;
        current.last_position = position;
        Ok(())
    }

    fn walk(&self, env: &mut Env, body: &[Stmt]) -> Result<(), TirError> {
        for stmt in body {
            self.walk_one(env, stmt)?;
        }
        Ok(())
    }

    fn walk_one(&self, env: &mut Env, stmt: &Stmt) -> Result<(), TirError> {
        match stmt {
            Stmt::Consume { binding, position } => self.consume(env, *binding, position.clone()),
            Stmt::Destructure { binding, fields, position } => {
                self.consume(env, *binding, position.clone())?;
                for field in fields {
                    if self.tracked(*field) {
                        env.entry(field.0).or_insert_with(|| Entry {
                            state: ConsumptionState::Unconsumed,
                            last_position: self.meta(*field).declared_position.clone(),
                        });
                    }
                }
                Ok(())
            }
            Stmt::Borrow { binding, mutable, position, body } => {
                let meta = self.meta(*binding);
                if self.tracked(*binding) {
                    let entry = env.entry(binding.0).or_insert_with(|| Entry {
                        state: ConsumptionState::Unconsumed,
                        last_position: meta.declared_position.clone(),
                    });
                    match entry.state {
                        ConsumptionState::Consumed => {
                            return Err(TirError::value_consumed_twice(
                                meta.name.clone(),
                                position.clone(),
                                entry.last_position.clone(),
                                self.source.clone(),
                            ));
                        }
                        ConsumptionState::BorrowedWrite => {
                            return Err(TirError::value_consumed_twice(
                                meta.name.clone(),
                                position.clone(),
                                entry.last_position.clone(),
                                self.source.clone(),
                            ));
                        }
                        ConsumptionState::BorrowedRead if *mutable => {
                            return Err(TirError::value_consumed_twice(
                                meta.name.clone(),
                                position.clone(),
                                entry.last_position.clone(),
                                self.source.clone(),
                            ));
                        }
                        ConsumptionState::Unconsumed | ConsumptionState::BorrowedRead => {}
                    }
                    entry.state = if *mutable { ConsumptionState::BorrowedWrite } else { ConsumptionState::BorrowedRead };
                    entry.last_position = position.clone();
                }

                self.walk(env, body)?;

                if self.tracked(*binding) {
                    if let Some(entry) = env.get_mut(&binding.0) {
                        entry.state = ConsumptionState::Unconsumed;
                    }
                }
                Ok(())
            }
            Stmt::If { position, then_branch, else_branch } => {
                let mut then_env = env.clone();
                self.walk(&mut then_env, then_branch)?;

                let mut else_env = env.clone();
                self.walk(&mut else_env, else_branch)?;

                for meta in self.bindings.iter().enumerate().filter(|(_, meta)| meta.universe.is_linear()) {
                    let (index, meta) = meta;
                    let then_state = then_env.get(&index).map(|entry| entry.state).unwrap_or(ConsumptionState::Unconsumed);
                    let else_state = else_env.get(&index).map(|entry| entry.state).unwrap_or(ConsumptionState::Unconsumed);

                    let then_consumed = then_state == ConsumptionState::Consumed;
                    let else_consumed = else_state == ConsumptionState::Consumed;

                    if then_consumed != else_consumed {
                        return Err(TirError::inconsistent_consumption(meta.name.clone(), position.clone(), self.source.clone()));
                    }
                }

                *env = then_env;
                Ok(())
            }
            Stmt::Loop { body } => {
                let before = env.clone();
                self.walk(env, body)?;

                for (index, meta) in self.bindings.iter().enumerate().filter(|(_, meta)| meta.universe.is_linear()) {
                    let before_state = before.get(&index).map(|entry| entry.state).unwrap_or(ConsumptionState::Unconsumed);
                    let after_state = env.get(&index).map(|entry| entry.state).unwrap_or(ConsumptionState::Unconsumed);

                    if before_state != after_state {
                        let position = env.get(&index).map(|entry| entry.last_position.clone()).unwrap_or_else(|| meta.declared_position.clone());
                        return Err(TirError::value_consumed_twice(meta.name.clone(), position, meta.declared_position.clone(), self.source.clone()));
                    }
                }

                Ok(())
            }
        }
    }
}

/// Checks that every linear binding in `bindings` is consumed exactly once
/// on every path through `body`.
pub fn check(source: SourceFile, bindings: &[BindingMeta], body: &[Stmt]) -> Result<(), TirError> {
    let checker = Checker { source: source.clone(), bindings };
    let mut env = Env::new();
    checker.walk(&mut env, body)?;

    for (index, meta) in bindings.iter().enumerate().filter(|(_, meta)| meta.universe.is_linear()) {
        let consumed = env.get(&index).map(|entry| entry.state == ConsumptionState::Consumed).unwrap_or(false);
        if !consumed {
            return Err(TirError::value_not_consumed(meta.name.clone(), meta.declared_position.clone(), source.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SourceFile {
        SourceFile::new(vec!["<memory>".into()], "irrelevant".to_string())
    }

    fn linear(name: &str, position: Range<usize>) -> BindingMeta {
        BindingMeta { name: name.to_string(), universe: Universe::Linear, declared_position: position }
    }

    #[test]
    fn consuming_once_passes() {
        let bindings = vec![linear("handle", 0..6)];
        let body = vec![Stmt::Consume { binding: BindingId(0), position: 10..16 }];
        check(source(), &bindings, &body).unwrap();
    }

    #[test]
    fn forgetting_a_binding_is_an_error() {
        let bindings = vec![linear("handle", 0..6)];
        let error = check(source(), &bindings, &[]).unwrap_err();
        assert!(matches!(error, TirError::ValueNotConsumed(_)));
    }

    #[test]
    fn consuming_twice_is_an_error() {
        let bindings = vec![linear("handle", 0..6)];
        let body = vec![
            Stmt::Consume { binding: BindingId(0), position: 10..16 },
            Stmt::Consume { binding: BindingId(0), position: 20..26 },
        ];
        let error = check(source(), &bindings, &body).unwrap_err();
        assert!(matches!(error, TirError::ValueConsumedTwice(_)));
    }

    #[test]
    fn consuming_on_both_branches_passes() {
        let bindings = vec![linear("handle", 0..6)];
        let body = vec![Stmt::If {
            position: 8..9,
            then_branch: vec![Stmt::Consume { binding: BindingId(0), position: 10..16 }],
            else_branch: vec![Stmt::Consume { binding: BindingId(0), position: 20..26 }],
        }];
        check(source(), &bindings, &body).unwrap();
    }

    #[test]
    fn consuming_on_only_one_branch_is_an_error() {
        let bindings = vec![linear("handle", 0..6)];
        let body = vec![Stmt::If {
            position: 8..9,
            then_branch: vec![Stmt::Consume { binding: BindingId(0), position: 10..16 }],
            else_branch: vec![],
        }];
        let error = check(source(), &bindings, &body).unwrap_err();
        assert!(matches!(error, TirError::InconsistentConsumption(_)));
    }

    #[test]
    fn destructuring_consumes_the_parent_and_every_field() {
        let bindings = vec![linear("pair", 0..4), linear("left", 4..8), linear("right", 8..12)];
        let body = vec![
            Stmt::Destructure { binding: BindingId(0), fields: vec![BindingId(1), BindingId(2)], position: 20..24 },
            Stmt::Consume { binding: BindingId(1), position: 30..34 },
            Stmt::Consume { binding: BindingId(2), position: 40..44 },
        ];
        check(source(), &bindings, &body).unwrap();
    }

    #[test]
    fn forgetting_a_field_after_destructure_is_an_error() {
        let bindings = vec![linear("pair", 0..4), linear("left", 4..8), linear("right", 8..12)];
        let body = vec![
            Stmt::Destructure { binding: BindingId(0), fields: vec![BindingId(1), BindingId(2)], position: 20..24 },
            Stmt::Consume { binding: BindingId(1), position: 30..34 },
        ];
        let error = check(source(), &bindings, &body).unwrap_err();
        assert!(matches!(error, TirError::ValueNotConsumed(_)));
    }

    #[test]
    fn consuming_inside_a_borrow_scope_is_rejected() {
        let bindings = vec![linear("handle", 0..6)];
        let body = vec![
            Stmt::Borrow {
                binding: BindingId(0),
                mutable: false,
                position: 10..16,
                body: vec![Stmt::Consume { binding: BindingId(0), position: 12..14 }],
            },
            Stmt::Consume { binding: BindingId(0), position: 20..26 },
        ];
        let error = check(source(), &bindings, &body).unwrap_err();
        assert!(matches!(error, TirError::ValueConsumedTwice(_)));
    }

    #[test]
    fn a_binding_released_from_borrow_can_still_be_consumed() {
        let bindings = vec![linear("handle", 0..6)];
        let body = vec![
            Stmt::Borrow { binding: BindingId(0), mutable: false, position: 10..16, body: vec![] },
            Stmt::Consume { binding: BindingId(0), position: 20..26 },
        ];
        check(source(), &bindings, &body).unwrap();
    }

    #[test]
    fn consuming_inside_a_loop_body_is_rejected() {
        let bindings = vec![linear("handle", 0..6)];
        let body = vec![Stmt::Loop {
            body: vec![Stmt::Consume { binding: BindingId(0), position: 10..16 }],
        }];
        let error = check(source(), &bindings, &body).unwrap_err();
        assert!(matches!(error, TirError::ValueConsumedTwice(_)));
    }

    #[test]
    fn free_bindings_are_never_tracked() {
        let bindings = vec![BindingMeta { name: "counter".to_string(), universe: Universe::Free, declared_position: 0..7 }];
        check(source(), &bindings, &[]).unwrap();
    }
}
