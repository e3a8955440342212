// SPDX-License-Identifier: GPL-3.0-or-later

//! Address type and the monotonic allocator that mints fresh addresses.
//!
//! An [`Address`] is an opaque, strictly-increasing integer shared across
//! three use-site roles (identity address, stack address, heap address).
//! Uniqueness is required across roles, not just within one: a single
//! [`AddressAllocator`] is threaded through a run so no two roles ever see
//! the same number (invariant I6).

#[cfg(test)]
mod address_test;

use core::fmt;

/// An opaque, globally unique address minted during a run.
///
/// Newtype over `u64` so identity, stack, and heap addresses can never be
/// mixed up at the type level even though they share one counter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u64);

impl Address {
    /// Wrap a raw value. Only the allocator should mint new addresses in
    /// normal operation; this is exposed for tests and deterministic
    /// fixtures.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Monotonic address counter.
///
/// The single mutable resource in the interpreter (spec §5): every fresh
/// address, regardless of role, is drawn from this counter in the order the
/// clauses that request them are reduced.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddressAllocator {
    next: u64,
}

impl AddressAllocator {
    /// Create an allocator that mints addresses starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Mint a fresh address, strictly greater than every address minted so
    /// far (I6, P3).
    pub const fn fresh(&mut self) -> Address {
        let addr = Address(self.next);
        self.next += 1;
        addr
    }

    /// `freshAddressLike`: mint a fresh address only if `like` is present,
    /// otherwise stay absent.
    ///
    /// Used by move/copy so a slot that never had a heap cell keeps not
    /// having one, instead of spuriously gaining an unused address.
    pub const fn fresh_like(&mut self, like: Option<Address>) -> Option<Address> {
        match like {
            Some(_) => Some(self.fresh()),
            None => None,
        }
    }
}
