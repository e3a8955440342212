// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for event construction.

use super::{Event, EventTag};
use crate::ast::{Clause, LExpr, RExpr};
use crate::store::Store;
use crate::value::ShallowValue;

#[test]
fn clause_event_carries_a_snapshot() {
    let store = Store::new();
    let clause = Clause::Assignment(LExpr::name("x"), RExpr::LiteralExpression(
        crate::ast::Literal::PrimitiveLiteral(crate::ast::PrimitiveValue::SmallPrimitive("a".into())),
    ));
    let event = Event::clause(clause.clone(), store.clone(), EventTag::Declaration);
    match event {
        Event::Clause { clause: c, store: s, tag } => {
            assert_eq!(c, clause);
            assert_eq!(*s, store);
            assert_eq!(tag, EventTag::Declaration);
        }
        Event::Synchronization { .. } => panic!("expected a clause event"),
    }
}

#[test]
fn synchronization_event_carries_the_value() {
    let lexpr = LExpr::name("x");
    let value = ShallowValue::SmallPrimitive("z".into());
    let event = Event::synchronization(lexpr.clone(), value.clone());
    assert_eq!(event, Event::Synchronization { lexpr, value });
}
