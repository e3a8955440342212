// SPDX-License-Identifier: GPL-3.0-or-later

//! Delta patching: the three-valued edit discipline and its two operators.
//!
//! Every mutation the stepper makes is built up as a [`Delta`] and folded
//! into the store once, so a single reduction step has one auditable point
//! of mutation (spec §4.2).

#[cfg(test)]
mod delta_test;

use std::collections::HashMap;
use std::hash::Hash;

use crate::address::Address;
use crate::store::environment::{NamespaceScope, Shareable};
use crate::store::ident::Ident;
use crate::store::{Name, Store};
use crate::value::{HeapValue, StackValue};

/// One edit to a single key in one of the store's mappings.
///
/// A key wholly absent from a delta's map means "no change"; `Set`
/// overwrites; `Deleted` removes the key entirely. The three states must
/// never collapse into each other (§9).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Patch<V> {
    /// Set (insert or overwrite) the key's value.
    Set(V),
    /// Remove the key.
    Deleted,
}

/// A bundle of edits across every sub-mapping of a [`Store`], produced by
/// one reduction step and applied (or merged with another delta) as a
/// unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Delta {
    /// Edits to the identity table.
    pub idents: HashMap<Address, Patch<Ident>>,
    /// Edits to stack memory.
    pub stack: HashMap<Address, Patch<StackValue>>,
    /// Edits to heap memory.
    pub heap: HashMap<Address, Patch<HeapValue>>,
    /// Edits to namespace entries, keyed by (scope, name).
    pub namespace: HashMap<(NamespaceScope, Name), Patch<Option<Shareable>>>,
}

impl Delta {
    /// The empty delta: identity element for [`Delta::merge`].
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Record that an identity address should be set.
    pub fn set_ident(&mut self, addr: Address, ident: Ident) -> &mut Self {
        self.idents.insert(addr, Patch::Set(ident));
        self
    }

    /// Record that an identity address should be removed.
    pub fn delete_ident(&mut self, addr: Address) -> &mut Self {
        self.idents.insert(addr, Patch::Deleted);
        self
    }

    /// Record that a stack cell should be set.
    pub fn set_stack(&mut self, addr: Address, value: StackValue) -> &mut Self {
        self.stack.insert(addr, Patch::Set(value));
        self
    }

    /// Record that a stack cell should be removed.
    pub fn delete_stack(&mut self, addr: Address) -> &mut Self {
        self.stack.insert(addr, Patch::Deleted);
        self
    }

    /// Record that a heap cell should be set.
    pub fn set_heap(&mut self, addr: Address, value: HeapValue) -> &mut Self {
        self.heap.insert(addr, Patch::Set(value));
        self
    }

    /// Record that a heap cell should be removed.
    pub fn delete_heap(&mut self, addr: Address) -> &mut Self {
        self.heap.insert(addr, Patch::Deleted);
        self
    }

    /// Record that a namespace entry should be set (possibly to
    /// declared-but-absent, `None`).
    pub fn set_namespace(
        &mut self,
        scope: NamespaceScope,
        name: Name,
        value: Option<Shareable>,
    ) -> &mut Self {
        self.namespace.insert((scope, name), Patch::Set(value));
        self
    }

    /// Record that a namespace entry should be removed entirely.
    pub fn delete_namespace(&mut self, scope: NamespaceScope, name: Name) -> &mut Self {
        self.namespace.insert((scope, name), Patch::Deleted);
        self
    }

    /// Right-biased merge (`⊕`): for any key present in both, `other`'s edit
    /// wins, matching "later edits win" (spec §4.2) so that sequential
    /// apply agrees with apply-of-merge (P2: `store ◁ (d1 ⊕ d2) = (store ◁
    /// d1) ◁ d2`, where `d2` is applied second and so must win). Keys
    /// present in only one side pass through unchanged. Associative, with
    /// [`Delta::empty`] as the neutral element.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        merge_into(&mut self.idents, other.idents);
        merge_into(&mut self.stack, other.stack);
        merge_into(&mut self.heap, other.heap);
        merge_into(&mut self.namespace, other.namespace);
        self
    }
}

fn merge_into<K: Eq + Hash, V>(into: &mut HashMap<K, V>, from: HashMap<K, V>) {
    for (k, v) in from {
        into.insert(k, v);
    }
}

impl Store {
    /// Apply (`◁`) a delta to this store in place, folding each edit
    /// key-by-key.
    pub fn apply(&mut self, delta: Delta) {
        for (addr, patch) in delta.idents {
            match patch {
                Patch::Set(ident) => {
                    self.idents.insert(addr, ident);
                }
                Patch::Deleted => {
                    self.idents.remove(&addr);
                }
            }
        }
        for (addr, patch) in delta.stack {
            match patch {
                Patch::Set(value) => {
                    self.memory.stack.insert(addr, value);
                }
                Patch::Deleted => {
                    self.memory.stack.remove(&addr);
                }
            }
        }
        for (addr, patch) in delta.heap {
            match patch {
                Patch::Set(value) => {
                    self.memory.heap.insert(addr, value);
                }
                Patch::Deleted => {
                    self.memory.heap.remove(&addr);
                }
            }
        }
        for ((scope, name), patch) in delta.namespace {
            let Some(namespace) = self.environment.namespace_mut(scope) else {
                continue;
            };
            match patch {
                Patch::Set(value) => {
                    namespace.insert(name, value);
                }
                Patch::Deleted => {
                    namespace.remove(&name);
                }
            }
        }
    }
}
