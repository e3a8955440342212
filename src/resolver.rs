// SPDX-License-Identifier: GPL-3.0-or-later

//! Name resolution across nested scopes (spec §4.3).
//!
//! `resolve` walks an [`LExpr`] against a [`Store`]'s environment and
//! returns the shareable identity address a name is bound to, or `None`
//! when the name is declared but not yet materialized, a state distinct
//! from "not declared at all" (which is [`Error::NameResolution`]).

#[cfg(test)]
mod resolver_test;

use crate::address::Address;
use crate::ast::LExpr;
use crate::error::{AllocationReason, Error};
use crate::store::environment::Shareable;
use crate::store::Store;

/// Resolve a name expression to its shareable identity address, if any
/// (I4).
///
/// - Unqualified names walk the frame stack top-down, consulting each
///   frame's `locals` then its `closure` before moving to the next frame,
///   finally falling back to `globals`. The first scope that declares the
///   name wins, even if its value is absent.
/// - Qualified `prefix.suffix` expressions resolve `prefix` first (which
///   must be present), then look `suffix` up among its dependents.
///
/// Returns `Ok(None)` for a name that is declared but not yet allocated
/// (present key, absent value) and `Err(NameResolution)` for a name not
/// declared anywhere.
pub fn resolve(lexpr: &LExpr, store: &Store) -> Result<Option<Shareable>, Error> {
    match lexpr {
        LExpr::Unqualified(name) => resolve_unqualified(name, store)
            .ok_or_else(|| Error::NameResolution(lexpr.clone())),
        LExpr::Qualified(prefix, suffix) => {
            let prefix_share = resolve(prefix, store)?
                .ok_or_else(|| Error::Allocation(lexpr.clone(), AllocationReason::UnresolvedPrefix))?;
            let ident = store
                .ident(prefix_share.address())
                .ok_or(Error::IdentResolution(prefix_share.address()))?;
            ident
                .dependents
                .get(suffix)
                .copied()
                .ok_or_else(|| Error::NameResolution(lexpr.clone()))
        }
    }
}

/// Walk frames top-down (locals, then closure, per frame), then globals.
/// `Some(None)` means the name is declared in some scope but unallocated;
/// `None` means no scope declares it at all.
fn resolve_unqualified(name: &str, store: &Store) -> Option<Option<Shareable>> {
    for frame in store.environment.frames.iter().rev() {
        if let Some(share) = frame.locals.get(name) {
            return Some(*share);
        }
        if let Some(share) = frame.closure.get(name) {
            return Some(*share);
        }
    }
    store.environment.globals.get(name).copied()
}

/// Share-strip: discard the owned/borrowed distinction, keeping only the
/// address, for callers that do not care about cascading deallocation.
#[must_use]
pub const fn address_of(share: Shareable) -> Address {
    share.address()
}
