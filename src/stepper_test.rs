// SPDX-License-Identifier: GPL-3.0-or-later
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Scenario tests for the stepper, covering spec §8's six seed programs
//! plus the individual desugaring/retry rules.

use super::{step, Configuration};
use crate::address::Address;
use crate::ast::{
    Abstraction, Bid, Clause, LExpr, Literal, Materialization, PrimitiveValue, RExpr, Target,
};
use crate::event::{Event, EventTag};
use crate::store::environment::Shareable;
use crate::store::Store;
use crate::value::ShallowValue;

fn run_all(mut config: Configuration) -> (Configuration, Vec<Event>) {
    let mut events = Vec::new();
    while !config.is_done() {
        let (next, step_events) = step(config).unwrap();
        config = next;
        events.extend(step_events);
    }
    (config, events)
}

fn small(s: &str) -> PrimitiveValue {
    PrimitiveValue::SmallPrimitive(s.to_string())
}

fn large(s: &str) -> PrimitiveValue {
    PrimitiveValue::LargePrimitive(s.to_string())
}

fn literal_assignment(name: &str, value: PrimitiveValue) -> Clause {
    Clause::Assignment(LExpr::name(name), RExpr::LiteralExpression(Literal::PrimitiveLiteral(value)))
}

fn bid_assignment(dst: &str, src: &str, m: Materialization) -> Clause {
    Clause::Assignment(
        LExpr::name(dst),
        RExpr::BidExpression(Bid::new(Target::NonSynchronizing(LExpr::name(src)), m)),
    )
}

#[test]
fn seed_scenario_1_small_literal() {
    let program = vec![literal_assignment("x", small("alpha"))];
    let (config, events) = run_all(Configuration::new(program, Store::new()));

    assert_eq!(config.store.idents.len(), 1);
    let (_, ident) = config.store.idents.iter().next().unwrap();
    assert!(ident.stack_address.is_some());
    assert!(ident.heap_address.is_none());

    let tags: Vec<EventTag> = events
        .iter()
        .filter_map(|e| match e {
            Event::Clause { tag, .. } => Some(*tag),
            Event::Synchronization { .. } => None,
        })
        .collect();
    assert_eq!(
        tags,
        vec![EventTag::Declaration, EventTag::Allocation, EventTag::SmallLiteralAssignment]
    );
}

#[test]
fn seed_scenario_2_large_literal_then_copy() {
    let program = vec![
        literal_assignment("x", large("beta")),
        bid_assignment("y", "x", Materialization::Copy),
    ];
    let (config, _) = run_all(Configuration::new(program, Store::new()));

    let x = config.store.environment.globals.get("x").unwrap().unwrap().address();
    let y = config.store.environment.globals.get("y").unwrap().unwrap().address();
    let x_ident = config.store.ident(x).unwrap();
    let y_ident = config.store.ident(y).unwrap();

    assert_ne!(x_ident.stack_address, y_ident.stack_address);
    assert_ne!(x_ident.heap_address, y_ident.heap_address);
    assert_eq!(
        crate::inspector::inspect(x, &config.store),
        Ok(ShallowValue::LargePrimitive("beta".into()))
    );
    assert_eq!(
        crate::inspector::inspect(y, &config.store),
        Ok(ShallowValue::LargePrimitive("beta".into()))
    );
}

#[test]
fn seed_scenario_3_move_clears_source_heap() {
    let program = vec![
        literal_assignment("x", large("gamma")),
        bid_assignment("y", "x", Materialization::Move),
    ];
    let (config, _) = run_all(Configuration::new(program, Store::new()));

    let x = config.store.environment.globals.get("x").unwrap().unwrap().address();
    let y = config.store.environment.globals.get("y").unwrap().unwrap().address();

    assert_eq!(config.store.ident(x).unwrap().heap_address, None);
    assert!(config.store.ident(y).unwrap().heap_address.is_some());
    assert_eq!(
        crate::inspector::inspect(y, &config.store),
        Ok(ShallowValue::LargePrimitive("gamma".into()))
    );
    assert!(crate::inspector::inspect(x, &config.store).is_err());
}

#[test]
fn seed_scenario_4_reference_alias() {
    let program = vec![
        literal_assignment("x", small("delta")),
        bid_assignment("y", "x", Materialization::Refr),
    ];
    let (config, _) = run_all(Configuration::new(program, Store::new()));

    let x_share = config.store.environment.globals.get("x").unwrap().unwrap();
    let y_share = config.store.environment.globals.get("y").unwrap().unwrap();
    assert_eq!(y_share, Shareable::Borrowed(x_share.address()));
    assert_eq!(
        crate::inspector::inspect(x_share.address(), &config.store),
        Ok(ShallowValue::SmallPrimitive("delta".into()))
    );
}

#[test]
fn seed_scenario_5_application_with_capture_restores_frame_depth() {
    let abstraction = Abstraction::new(
        "n",
        vec![bid_assignment("r", "n", Materialization::Move)],
        RExpr::BidExpression(Bid::new(Target::NonSynchronizing(LExpr::name("r")), Materialization::Move)),
    );
    let program = vec![
        Clause::Assignment(
            LExpr::name("f"),
            RExpr::LiteralExpression(Literal::CaptureExpression(Vec::new(), abstraction)),
        ),
        literal_assignment("x", small("epsilon")),
        Clause::Assignment(
            LExpr::name("y"),
            RExpr::Application(
                Target::NonSynchronizing(LExpr::name("f")),
                Box::new(Bid::new(Target::NonSynchronizing(LExpr::name("x")), Materialization::Copy)),
            ),
        ),
    ];
    let start_depth = Configuration::new(program.clone(), Store::new()).store.environment.frames.len();
    let (config, _) = run_all(Configuration::new(program, Store::new()));

    assert_eq!(config.store.environment.frames.len(), start_depth);
    let y = config.store.environment.globals.get("y").unwrap().unwrap().address();
    assert_eq!(
        crate::inspector::inspect(y, &config.store),
        Ok(ShallowValue::SmallPrimitive("epsilon".into()))
    );
}

#[test]
fn seed_scenario_6_synchronization_event() {
    let program = vec![literal_assignment("x", small("zeta")), Clause::Synchronization(LExpr::name("x"))];
    let (_, events) = run_all(Configuration::new(program, Store::new()));

    let sync_events: Vec<&Event> = events.iter().filter(|e| matches!(e, Event::Synchronization { .. })).collect();
    assert_eq!(sync_events.len(), 1);
    assert_eq!(
        sync_events[0],
        &Event::synchronization(LExpr::name("x"), ShallowValue::SmallPrimitive("zeta".into()))
    );
}

#[test]
fn return_with_empty_frame_stack_errors() {
    let config = Configuration::new(vec![Clause::Return], Store::new());
    let err = step(config).unwrap_err();
    assert_eq!(err, crate::error::Error::StackReturn);
}

#[test]
fn return_deallocates_owned_locals_but_not_closure_borrows() {
    let mut store = Store::new();
    let outer_addr = Address::new(0);
    store.idents.insert(outer_addr, crate::store::ident::Ident::bare());
    let mut frame = crate::store::environment::Frame::default();
    frame.locals.insert(
        "owned".to_string(),
        Some(Shareable::Owned(Address::new(1))),
    );
    frame.closure.insert(
        "borrowed".to_string(),
        Some(Shareable::Borrowed(outer_addr)),
    );
    store.idents.insert(Address::new(1), crate::store::ident::Ident::bare());
    store.environment.push_frame(frame);

    let config = Configuration::new(vec![Clause::Return], store);
    let (config, events) = step(config).unwrap();

    assert!(config.store.ident(Address::new(1)).is_none());
    assert!(config.store.ident(outer_addr).is_some(), "closure borrows are never deallocated");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Event::Clause { tag: EventTag::Return, .. }));
}
