// SPDX-License-Identifier: GPL-3.0-or-later

//! Declaration, allocation, and deallocation of identities (spec §4.4).
//!
//! Every function here returns a [`Delta`] describing the edit(s) it wants
//! made, rather than mutating the store directly, so the stepper can fold
//! several allocator calls into the single auditable apply of one
//! reduction step (spec §4.2). The one exception is the shadowing-aware
//! walk in [`allocate`]: pushing a fresh frame is a structural change to
//! the environment that a per-key `Delta` cannot express, so that one case
//! mutates `store.environment` directly before returning a delta for the
//! namespace entry inside the newly pushed frame.

#[cfg(test)]
mod allocator_test;

use std::collections::HashSet;

use crate::address::Address;
use crate::ast::LExpr;
use crate::error::{AllocationReason, Error};
use crate::resolver;
use crate::store::delta::Delta;
use crate::store::environment::{Frame, NamespacePart, NamespaceScope, Shareable};
use crate::store::ident::Ident;
use crate::store::Store;

/// `declare(lexpr)`: insert a declared-but-unallocated slot at the correct
/// scope.
///
/// Unqualified names are declared in the top frame's locals, or globals if
/// the frame stack is empty (spec §3: "when the stack is empty,
/// declarations target globals"). Qualified names insert the suffix into
/// the prefix identity's dependents.
pub fn declare(lexpr: &LExpr, store: &Store) -> Result<Delta, Error> {
    match lexpr {
        LExpr::Unqualified(name) => {
            let scope = store.environment.declaration_scope();
            let mut delta = Delta::empty();
            delta.set_namespace(scope, name.clone(), None);
            Ok(delta)
        }
        LExpr::Qualified(prefix, suffix) => {
            let (addr, mut ident) = resolve_prefix_ident(lexpr, prefix, store)?;
            ident.dependents.insert(suffix.clone(), None);
            let mut delta = Delta::empty();
            delta.set_ident(addr, ident);
            Ok(delta)
        }
    }
}

/// `allocate(lexpr, share)`: write a share into a slot that currently
/// resolves to absent.
///
/// For unqualified names, if the top frame's locals already bind the name
/// to a *present* identity, a fresh frame is pushed on top and the slot is
/// allocated there instead: this is the mechanism by which re-binding a
/// name does not clobber the identity it already points to (spec §4.4,
/// §9). Otherwise the slot is located by walking down to whichever scope
/// currently declares the name.
pub fn allocate(lexpr: &LExpr, share: Shareable, store: &mut Store) -> Result<Delta, Error> {
    match lexpr {
        LExpr::Unqualified(name) => {
            let shadowed = store
                .environment
                .frames
                .last()
                .is_some_and(|frame| matches!(frame.locals.get(name), Some(Some(_))));

            if shadowed {
                let mut delta = Delta::empty();
                let scope = store.environment.push_frame(Frame::default());
                delta.set_namespace(scope, name.clone(), Some(share));
                return Ok(delta);
            }

            match resolver::resolve(lexpr, store)? {
                Some(_) => Err(Error::Allocation(lexpr.clone(), AllocationReason::AlreadyAllocated)),
                None => {
                    let scope = locate_declared_scope(name, store)
                        .ok_or_else(|| Error::NameResolution(lexpr.clone()))?;
                    let mut delta = Delta::empty();
                    delta.set_namespace(scope, name.clone(), Some(share));
                    Ok(delta)
                }
            }
        }
        LExpr::Qualified(prefix, suffix) => {
            if resolver::resolve(lexpr, store)?.is_some() {
                return Err(Error::Allocation(lexpr.clone(), AllocationReason::AlreadyAllocated));
            }
            let (addr, mut ident) = resolve_prefix_ident(lexpr, prefix, store)?;
            ident.dependents.insert(suffix.clone(), Some(share));
            let mut delta = Delta::empty();
            delta.set_ident(addr, ident);
            Ok(delta)
        }
    }
}

/// `allocateNew(lexpr)`: mint a fresh identity address, allocate `lexpr` as
/// `Owned` of it, and insert a bare identity entry. Returns the delta and
/// the freshly minted address.
pub fn allocate_new(lexpr: &LExpr, store: &mut Store) -> Result<(Delta, Address), Error> {
    let addr = store.allocator.fresh();
    let mut delta = allocate(lexpr, Shareable::Owned(addr), store)?;
    delta.set_ident(addr, Ident::bare());
    Ok((delta, addr))
}

/// `deallocate(identAddr)`: recursively deallocate owned dependents, then
/// remove the identity entry and its stack/heap cells, if any.
///
/// Borrowed dependents are never followed (I5). A `visited` set guards
/// against cycles in the dependents graph (spec §9's open question,
/// resolved here by treating re-entry as a no-op rather than recursing
/// forever).
pub fn deallocate(addr: Address, store: &Store, visited: &mut HashSet<Address>, delta: &mut Delta) {
    if !visited.insert(addr) {
        return;
    }
    let Some(ident) = store.ident(addr) else {
        return;
    };
    for share in ident.dependents.values().flatten() {
        if let Shareable::Owned(dep_addr) = share {
            deallocate(*dep_addr, store, visited, delta);
        }
    }
    if let Some(stack_addr) = ident.stack_address {
        delta.delete_stack(stack_addr);
    }
    if let Some(heap_addr) = ident.heap_address {
        delta.delete_heap(heap_addr);
    }
    delta.delete_ident(addr);
}

/// Resolve `prefix` to a present identity and read a clone of its record,
/// for the qualified branches of [`declare`]/[`allocate`].
fn resolve_prefix_ident(
    lexpr: &LExpr,
    prefix: &LExpr,
    store: &Store,
) -> Result<(Address, Ident), Error> {
    let prefix_share = resolver::resolve(prefix, store)?
        .ok_or_else(|| Error::Allocation(lexpr.clone(), AllocationReason::UnresolvedPrefix))?;
    let addr = prefix_share.address();
    let ident = store.ident(addr).ok_or(Error::IdentResolution(addr))?.clone();
    Ok((addr, ident))
}

/// Walk frames top-down (locals, then closure), then globals, returning
/// the scope handle of whichever one already declares `name` (spec §4.4's
/// "bubble down to the frame that declared it").
fn locate_declared_scope(name: &str, store: &Store) -> Option<NamespaceScope> {
    for (depth, frame) in store.environment.frames.iter().enumerate().rev() {
        if frame.locals.contains_key(name) {
            return Some(NamespaceScope::Frame(depth, NamespacePart::Locals));
        }
        if frame.closure.contains_key(name) {
            return Some(NamespaceScope::Frame(depth, NamespacePart::Closure));
        }
    }
    if store.environment.globals.contains_key(name) {
        Some(NamespaceScope::Globals)
    } else {
        None
    }
}
