// SPDX-License-Identifier: GPL-3.0-or-later

//! Identities: the records named by identity addresses.

#[cfg(test)]
mod ident_test;

use std::collections::HashMap;

use crate::address::Address;
use crate::ast::Name;
use crate::store::environment::Shareable;

/// A record carrying optional stack/heap addresses and a dependents
/// namespace (spec §3).
///
/// An identity is "bare" when both addresses are absent; it is
/// "primitive-bearing" once it has a stack address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ident {
    /// Named sub-identities, used for captures and qualified dependent
    /// access (`prefix.suffix`).
    pub dependents: HashMap<Name, Option<Shareable>>,
    /// The stack address holding this identity's value, if materialized.
    pub stack_address: Option<Address>,
    /// The heap address holding this identity's value, if it is large.
    pub heap_address: Option<Address>,
}

impl Ident {
    /// A bare identity: no dependents, no addresses.
    #[must_use]
    pub fn bare() -> Self {
        Self::default()
    }

    /// Whether this identity has neither a stack nor a heap address.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.stack_address.is_none() && self.heap_address.is_none()
    }
}
