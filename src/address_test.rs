// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for the address allocator.

use super::{Address, AddressAllocator};

#[test]
fn fresh_addresses_are_strictly_increasing() {
    let mut alloc = AddressAllocator::new();
    let a = alloc.fresh();
    let b = alloc.fresh();
    let c = alloc.fresh();
    assert!(a < b);
    assert!(b < c);
}

#[test]
fn fresh_like_mirrors_presence() {
    let mut alloc = AddressAllocator::new();
    assert_eq!(alloc.fresh_like(None), None);
    let seed = alloc.fresh();
    assert!(alloc.fresh_like(Some(seed)).is_some());
}

#[test]
fn fresh_like_mints_a_new_address_not_the_input() {
    let mut alloc = AddressAllocator::new();
    let seed = alloc.fresh();
    let minted = alloc.fresh_like(Some(seed)).unwrap();
    assert_ne!(seed, minted);
}

#[test]
fn debug_format_is_hash_prefixed() {
    assert_eq!(format!("{:?}", Address::new(7)), "#7");
}
