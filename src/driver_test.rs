// SPDX-License-Identifier: GPL-3.0-or-later
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Tests for the run-to-end and run-to-sync drivers.

use super::{run_to_end, run_to_sync};
use crate::ast::{Clause, LExpr, Literal, PrimitiveValue, RExpr};
use crate::event::{Event, EventTag};
use crate::store::Store;

fn literal_assignment(name: &str, s: &str) -> Clause {
    Clause::Assignment(
        LExpr::name(name),
        RExpr::LiteralExpression(Literal::PrimitiveLiteral(PrimitiveValue::SmallPrimitive(s.to_string()))),
    )
}

#[test]
fn run_to_end_drains_the_whole_program() {
    let program = vec![literal_assignment("x", "alpha")];
    let (store, events) = run_to_end(program, Store::new(), None).unwrap();
    assert_eq!(store.idents.len(), 1);
    assert!(events.iter().any(|e| matches!(e, Event::Clause { tag: EventTag::SmallLiteralAssignment, .. })));
}

#[test]
fn run_to_end_honors_a_step_budget() {
    let program = vec![literal_assignment("x", "alpha"), literal_assignment("y", "beta")];
    let (store, _) = run_to_end(program, Store::new(), Some(1)).unwrap();
    // One step only declares `x`; nothing has been allocated or assigned yet.
    assert!(store.idents.is_empty());
}

#[test]
fn run_to_sync_stops_before_consuming_the_synchronization_clause() {
    let program = vec![literal_assignment("x", "alpha"), Clause::Synchronization(LExpr::name("x"))];
    let (config, events) = run_to_sync(program, Store::new(), None).unwrap();
    assert_eq!(config.program.len(), 1);
    assert!(matches!(config.program.front(), Some(Clause::Synchronization(_))));
    assert!(!events.iter().any(|e| matches!(e, Event::Synchronization { .. })));
}

#[test]
fn run_to_sync_drains_fully_when_no_synchronization_is_present() {
    let program = vec![literal_assignment("x", "alpha")];
    let (config, _) = run_to_sync(program, Store::new(), None).unwrap();
    assert!(config.is_done());
}
