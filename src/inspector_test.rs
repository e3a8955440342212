// SPDX-License-Identifier: GPL-3.0-or-later
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Tests for identity inspection (P1 via recompose, deep capture).

use super::{inspect, inspect_deep};
use crate::address::Address;
use crate::error::Error;
use crate::store::environment::Shareable;
use crate::store::ident::Ident;
use crate::store::Store;
use crate::value::{HeapValue, ShallowValue, StackValue};

#[test]
fn inspect_small_primitive() {
    let mut store = Store::new();
    store.memory.stack.insert(Address::new(0), StackValue::SmallStack("alpha".into()));
    store.idents.insert(
        Address::new(1),
        Ident {
            stack_address: Some(Address::new(0)),
            ..Ident::bare()
        },
    );
    assert_eq!(
        inspect(Address::new(1), &store),
        Ok(ShallowValue::SmallPrimitive("alpha".into()))
    );
}

#[test]
fn inspect_large_primitive_requires_matching_sentinel() {
    let mut store = Store::new();
    store.memory.stack.insert(Address::new(0), StackValue::LargeStack("beta".into()));
    store.memory.heap.insert(Address::new(1), HeapValue::LargeHeap("beta".into()));
    store.idents.insert(
        Address::new(2),
        Ident {
            stack_address: Some(Address::new(0)),
            heap_address: Some(Address::new(1)),
            ..Ident::bare()
        },
    );
    assert_eq!(
        inspect(Address::new(2), &store),
        Ok(ShallowValue::LargePrimitive("beta".into()))
    );
}

#[test]
fn inspect_unknown_identity_errors() {
    let store = Store::new();
    assert_eq!(inspect(Address::new(9), &store), Err(Error::IdentResolution(Address::new(9))));
}

#[test]
fn inspect_dangling_stack_address_errors() {
    let mut store = Store::new();
    store.idents.insert(
        Address::new(0),
        Ident {
            stack_address: Some(Address::new(5)),
            ..Ident::bare()
        },
    );
    assert_eq!(
        inspect(Address::new(0), &store),
        Err(Error::StackResolution(Address::new(5)))
    );
}

#[test]
fn inspect_large_value_missing_heap_cell_is_a_recomposition_error() {
    let mut store = Store::new();
    store.memory.stack.insert(Address::new(0), StackValue::LargeStack("gamma".into()));
    store.idents.insert(
        Address::new(1),
        Ident {
            stack_address: Some(Address::new(0)),
            heap_address: None,
            ..Ident::bare()
        },
    );
    assert!(matches!(
        inspect(Address::new(1), &store),
        Err(Error::Recomposition { .. })
    ));
}

#[test]
fn inspect_deep_walks_present_dependents() {
    let mut store = Store::new();
    store.memory.stack.insert(Address::new(0), StackValue::SmallStack("outer".into()));
    store.memory.stack.insert(Address::new(1), StackValue::SmallStack("inner".into()));
    let mut dependents = std::collections::HashMap::new();
    dependents.insert("n".to_string(), Some(Shareable::Owned(Address::new(3))));
    store.idents.insert(
        Address::new(2),
        Ident {
            dependents,
            stack_address: Some(Address::new(0)),
            heap_address: None,
        },
    );
    store.idents.insert(
        Address::new(3),
        Ident {
            stack_address: Some(Address::new(1)),
            ..Ident::bare()
        },
    );

    let deep = inspect_deep(Address::new(2), &store).unwrap();
    assert_eq!(deep.shallow, ShallowValue::SmallPrimitive("outer".into()));
    assert_eq!(
        deep.dependents.get("n").unwrap().shallow,
        ShallowValue::SmallPrimitive("inner".into())
    );
}
