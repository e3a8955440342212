// SPDX-License-Identifier: GPL-3.0-or-later
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Tests for identity bareness.

use super::Ident;
use crate::address::Address;

#[test]
fn fresh_identity_is_bare() {
    assert!(Ident::bare().is_bare());
}

#[test]
fn identity_with_stack_address_is_not_bare() {
    let mut ident = Ident::bare();
    ident.stack_address = Some(Address::new(1));
    assert!(!ident.is_bare());
}

#[test]
fn identity_with_heap_address_only_is_not_bare() {
    let mut ident = Ident::bare();
    ident.heap_address = Some(Address::new(2));
    assert!(!ident.is_bare());
}
