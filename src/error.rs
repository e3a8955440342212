// SPDX-License-Identifier: GPL-3.0-or-later

//! Error kinds surfaced by the resolver, allocator, inspector, and stepper.
//!
//! Every step is a fallible transformation (spec §7): on error the driver
//! halts and reports the error alongside the accumulated event log and the
//! last good store. The only recoverable "failure" (resolve returning
//! absent inside S3) is not represented here; it is a signal to declare,
//! not an error.

use core::fmt;

use crate::address::Address;
use crate::ast::LExpr;

/// Why an allocate call failed.
///
/// Promoted from the spec's generic "allocate for already-allocated lexpr"
/// check into a named reason (spec §7, §9).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocationReason {
    /// The lexpr already resolves to a present identity; allocate cannot
    /// re-point an existing identity (used by both S4's `Refr` guard and
    /// general re-allocation attempts).
    AlreadyAllocated,
    /// The lexpr's qualifying prefix did not resolve to a present identity.
    UnresolvedPrefix,
    /// The lexpr resolved, but to a declared-absent slot where a present
    /// identity was required (a bid's source, a synchronization target, or
    /// an application's callee).
    SourceAbsent,
}

impl fmt::Display for AllocationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAllocated => write!(f, "lexpr already resolves to a present identity"),
            Self::UnresolvedPrefix => write!(f, "qualifying prefix did not resolve"),
            Self::SourceAbsent => write!(f, "lexpr resolves to a declared-absent slot"),
        }
    }
}

/// Every error kind the interpreter can surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A name was absent from every enclosing scope.
    NameResolution(LExpr),
    /// `lexpr` resolved to an absent slot where a present identity was
    /// required.
    Allocation(LExpr, AllocationReason),
    /// An identity address was not present in the identity table (invariant
    /// breach).
    IdentResolution(Address),
    /// A stack address was present on an identity but missing from memory.
    StackResolution(Address),
    /// A heap address was present on an identity but missing from memory.
    HeapResolution(Address),
    /// Stack/heap tags were inconsistent during recomposition.
    Recomposition {
        /// Description of the stack side of the pair, if any.
        stack: Option<&'static str>,
        /// Description of the heap side of the pair, if any.
        heap: Option<&'static str>,
    },
    /// `Return` was reduced with an empty frame stack.
    StackReturn,
    /// An interpreter-internal invariant was violated (unreachable clause
    /// shapes after desugaring, etc.) or a guard condition failed.
    Generic(String),
}

impl Error {
    /// Build a [`Error::Generic`] from a formatted message.
    #[must_use]
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameResolution(lexpr) => {
                write!(f, "name `{}` is not declared in any enclosing scope", lexpr.terminal_name())
            }
            Self::Allocation(lexpr, reason) => {
                write!(f, "cannot allocate `{}`: {reason}", lexpr.terminal_name())
            }
            Self::IdentResolution(addr) => write!(f, "identity {addr} not present in the identity table"),
            Self::StackResolution(addr) => write!(f, "stack address {addr} missing from memory"),
            Self::HeapResolution(addr) => write!(f, "heap address {addr} missing from memory"),
            Self::Recomposition { stack, heap } => write!(
                f,
                "inconsistent stack/heap pair during recomposition: stack={stack:?}, heap={heap:?}"
            ),
            Self::StackReturn => write!(f, "return with an empty frame stack"),
            Self::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Convenience alias for results produced by this crate.
pub type Result<T> = core::result::Result<T, Error>;
