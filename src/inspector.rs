// SPDX-License-Identifier: GPL-3.0-or-later

//! Reconstructing shallow and deep values from an identity (spec §4.5).

#[cfg(test)]
mod inspector_test;

use std::collections::HashMap;

use crate::address::Address;
use crate::error::Error;
use crate::store::Store;
use crate::value::{self, DeepValue, ShallowValue};

/// Reconstruct an identity's shallow value by reading its stack/heap cells
/// and recomposing them.
///
/// Absent addresses on the identity yield absent cells (`None`), which
/// `recompose` may or may not accept depending on the value's shape;
/// recomposition failure is surfaced rather than masked (spec §4.5).
pub fn inspect(addr: Address, store: &Store) -> Result<ShallowValue, Error> {
    let ident = store.ident(addr).ok_or(Error::IdentResolution(addr))?;
    let stack = match ident.stack_address {
        Some(a) => Some(
            store
                .memory
                .stack_cell(a)
                .cloned()
                .ok_or(Error::StackResolution(a))?,
        ),
        None => None,
    };
    let heap = match ident.heap_address {
        Some(a) => Some(
            store
                .memory
                .heap_cell(a)
                .cloned()
                .ok_or(Error::HeapResolution(a))?,
        ),
        None => None,
    };
    value::recompose(stack, heap)
}

/// Recursively reconstruct a [`DeepValue`]: the identity's own shallow
/// value paired with the deep values of every present dependent.
///
/// Used only for diagnostics and for expanding a [`SynchronizationEvent`](
/// crate::event::Event::Synchronization)'s shallow value into the deep
/// capture the spec anticipates a consumer building (spec §4.5, S12).
pub fn inspect_deep(addr: Address, store: &Store) -> Result<DeepValue, Error> {
    let shallow = inspect(addr, store)?;
    let ident = store.ident(addr).ok_or(Error::IdentResolution(addr))?;
    let mut dependents = HashMap::new();
    for (name, share) in &ident.dependents {
        if let Some(share) = share {
            dependents.insert(name.clone(), inspect_deep(share.address(), store)?);
        }
    }
    Ok(DeepValue { shallow, dependents })
}
