// SPDX-License-Identifier: GPL-3.0-or-later

//! Split stack/heap memory: two address-keyed mappings to values.

#[cfg(test)]
mod memory_test;

use std::collections::HashMap;

use crate::address::Address;
use crate::value::{HeapValue, StackValue};

/// The two mappings memory is split into (spec §3).
///
/// A missing key means the address holds no value; inspecting it yields
/// "absent" rather than an error (§4.5).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Memory {
    /// `stackAddress -> StackValue` cells.
    pub stack: HashMap<Address, StackValue>,
    /// `heapAddress -> HeapValue` cells.
    pub heap: HashMap<Address, HeapValue>,
}

impl Memory {
    /// Empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a stack cell, if present.
    #[must_use]
    pub fn stack_cell(&self, addr: Address) -> Option<&StackValue> {
        self.stack.get(&addr)
    }

    /// Read a heap cell, if present.
    #[must_use]
    pub fn heap_cell(&self, addr: Address) -> Option<&HeapValue> {
        self.heap.get(&addr)
    }
}
