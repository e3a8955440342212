// SPDX-License-Identifier: GPL-3.0-or-later

//! Materialization: writing a concrete value into an identity's stack/heap
//! cells via move, copy, or literal decomposition (spec §4.6, S6–S10).
//!
//! These are the stepper's heaviest rules, split out of `stepper.rs` the
//! way the teacher splits per-concern helper methods into their own files
//! (`process/function.rs`, `process/value_alloc.rs`, …) rather than one
//! monolithic module.

#[cfg(test)]
mod materialize_test;

use crate::address::Address;
use crate::ast::{Bid, Clause, LExpr, Materialization, RExpr, Target};
use crate::error::Error;
use crate::store::delta::Delta;
use crate::store::environment::Shareable;
use crate::store::ident::Ident;
use crate::store::Store;
use crate::value::{self, ShallowValue};

/// Overwrite `addr`'s stack/heap cells with the decomposition of `value`
/// (S8/S9/S10), deleting whatever cells it held before. Used both for a
/// slot's first materialization (no previous cells) and for
/// re-materializing an already-present identity with a fresh literal.
pub fn materialize_literal(addr: Address, value: &ShallowValue, store: &mut Store) -> Result<Delta, Error> {
    let old = store.ident(addr).ok_or(Error::IdentResolution(addr))?.clone();
    let mut delta = Delta::empty();
    if let Some(old_stack) = old.stack_address {
        delta.delete_stack(old_stack);
    }
    if let Some(old_heap) = old.heap_address {
        delta.delete_heap(old_heap);
    }

    let (stack, heap) = value::decompose(value);
    let new_stack_addr = stack.as_ref().map(|_| store.allocator.fresh());
    if let (Some(a), Some(v)) = (new_stack_addr, stack) {
        delta.set_stack(a, v);
    }
    let new_heap_addr = heap.as_ref().map(|_| store.allocator.fresh());
    if let (Some(a), Some(v)) = (new_heap_addr, heap) {
        delta.set_heap(a, v);
    }

    delta.set_ident(
        addr,
        Ident {
            dependents: old.dependents,
            stack_address: new_stack_addr,
            heap_address: new_heap_addr,
        },
    );
    Ok(delta)
}

/// S6: move `r`'s value into `l_addr`.
///
/// `r`'s heap address is transferred to `l_addr` outright; `r`'s stack
/// cell is copied into a fresh address for `l_addr` and then deleted, but
/// `r`'s identity keeps pointing at the now-deleted stack address: a
/// deliberately dangling reference, so a later `inspect(r)` fails loudly
/// (seed scenario 3) instead of silently reporting a stale value.
pub fn materialize_move(
    l: &LExpr,
    l_addr: Address,
    r: &LExpr,
    r_addr: Address,
    store: &mut Store,
) -> Result<(Delta, Vec<Clause>), Error> {
    let lid = store.ident(l_addr).ok_or(Error::IdentResolution(l_addr))?.clone();
    let rid = store.ident(r_addr).ok_or(Error::IdentResolution(r_addr))?.clone();

    let mut delta = Delta::empty();
    let new_stack_addr = store.allocator.fresh_like(rid.stack_address);
    if let Some(r_stack) = rid.stack_address {
        let cell = store.memory.stack_cell(r_stack).cloned();
        if let (Some(a), Some(v)) = (new_stack_addr, cell) {
            delta.set_stack(a, v);
        }
        delta.delete_stack(r_stack);
    }
    if let Some(old_l_stack) = lid.stack_address {
        delta.delete_stack(old_l_stack);
    }
    if let Some(old_l_heap) = lid.heap_address {
        delta.delete_heap(old_l_heap);
    }

    delta.set_ident(
        l_addr,
        Ident {
            dependents: lid.dependents,
            stack_address: new_stack_addr,
            heap_address: rid.heap_address,
        },
    );
    delta.set_ident(
        r_addr,
        Ident {
            dependents: rid.dependents.clone(),
            stack_address: rid.stack_address,
            heap_address: None,
        },
    );

    let follow_ups = dependent_clauses(l, r, &rid, Materialization::Move);
    Ok((delta, follow_ups))
}

/// S7: copy `r`'s value into `l_addr`, leaving `r` fully intact.
pub fn materialize_copy(
    l: &LExpr,
    l_addr: Address,
    r: &LExpr,
    r_addr: Address,
    store: &mut Store,
) -> Result<(Delta, Vec<Clause>), Error> {
    let lid = store.ident(l_addr).ok_or(Error::IdentResolution(l_addr))?.clone();
    let rid = store.ident(r_addr).ok_or(Error::IdentResolution(r_addr))?.clone();

    let mut delta = Delta::empty();
    let new_stack_addr = store.allocator.fresh_like(rid.stack_address);
    if let Some(r_stack) = rid.stack_address {
        let cell = store.memory.stack_cell(r_stack).cloned();
        if let (Some(a), Some(v)) = (new_stack_addr, cell) {
            delta.set_stack(a, v);
        }
    }
    let new_heap_addr = store.allocator.fresh_like(rid.heap_address);
    if let Some(r_heap) = rid.heap_address {
        let cell = store.memory.heap_cell(r_heap).cloned();
        if let (Some(a), Some(v)) = (new_heap_addr, cell) {
            delta.set_heap(a, v);
        }
    }
    if let Some(old_l_stack) = lid.stack_address {
        delta.delete_stack(old_l_stack);
    }
    if let Some(old_l_heap) = lid.heap_address {
        delta.delete_heap(old_l_heap);
    }

    delta.set_ident(
        l_addr,
        Ident {
            dependents: lid.dependents,
            stack_address: new_stack_addr,
            heap_address: new_heap_addr,
        },
    );

    let follow_ups = dependent_clauses(l, r, &rid, Materialization::Copy);
    Ok((delta, follow_ups))
}

/// Build the `Assignment(L.d, BidExpression(Bid(Synchronizing(R.d), m)))`
/// follow-up clauses for every present dependent of `rid`, in a
/// deterministic (name-sorted) order.
fn dependent_clauses(l: &LExpr, r: &LExpr, rid: &Ident, m: Materialization) -> Vec<Clause> {
    let mut names: Vec<&String> = rid
        .dependents
        .iter()
        .filter_map(|(name, share)| share.map(|_| name))
        .collect();
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let target = Target::Synchronizing(r.clone().qualified(name.clone()));
            Clause::Assignment(
                l.clone().qualified(name.clone()),
                RExpr::BidExpression(Bid::new(target, m)),
            )
        })
        .collect()
}
